use eth_client_study::wallet::{Keypair, address_from_public_key};
use eth_client_study_scripts::init_logging;
use log::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    let keypair = Keypair::generate();
    info!("Private key: {}", keypair.private_key_hex());
    info!("Public key: {}", keypair.public_key_hex());

    let address = keypair.address();
    info!("Address: {address}");

    let derived = address_from_public_key(&keypair.public_key_bytes());
    info!("Address derived by hand: {derived}");
    anyhow::ensure!(derived == address, "manual derivation disagrees with the signer");
    Ok(())
}
