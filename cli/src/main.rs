use anyhow::Result;
use bigdecimal::BigDecimal;
use clap::{Parser, Subcommand};
use eth_client_study::config::{self, PRIVATE_KEY};
use eth_client_study::contracts::{STORE_ADDRESS, TOKEN_ADDRESS, TOKEN_HOLDER};
use eth_client_study::receipt::{ReceiptOutcome, ReceiptPolling};
use eth_client_study::utils::{eth_to_wei, format_timestamp, wei_to_eth};
use eth_client_study::{Address, B256, Keypair, StudyClient};
use futures::StreamExt;
use url::Url;

/// Query and transact against an Ethereum node over JSON-RPC
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTTP JSON-RPC endpoint of the node
    #[arg(short, long, env = "RPC_HTTP_URL", default_value = "http://localhost:8545")]
    url: String,

    /// WebSocket endpoint, derived from --url when omitted
    #[arg(long, env = "RPC_WS_URL")]
    ws_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Key management commands
    Wallet {
        #[command(subcommand)]
        command: WalletCommand,
    },
    /// Show the balance of an account
    Balance {
        address: Address,
        /// Balance as of this block instead of the latest one
        #[arg(long, conflicts_with = "pending")]
        block: Option<u64>,
        /// Include pending transactions
        #[arg(long)]
        pending: bool,
    },
    /// Show a block, the latest one by default
    Block {
        number: Option<u64>,
        /// Print the whole block as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up a transaction and its receipt
    Tx { hash: B256 },
    /// Print all receipts of a block as JSON
    Receipts { number: u64 },
    /// Show ERC-20 metadata and a holder's balance
    Token {
        #[arg(long, default_value_t = TOKEN_ADDRESS)]
        token: Address,
        #[arg(long, default_value_t = TOKEN_HOLDER)]
        holder: Address,
        #[arg(long)]
        json: bool,
    },
    /// Send ETH from the account in PRIVATE_KEY1
    Transfer {
        /// Destination account address
        #[arg(long)]
        to: Address,
        /// Amount of ETH to send
        #[arg(long)]
        amount: BigDecimal,
        /// Return right after broadcasting
        #[arg(long)]
        no_wait: bool,
    },
    /// Print new block headers as they arrive
    WatchHeads,
    /// List past ItemSet events of a Store contract
    ItemSetHistory {
        #[arg(long, default_value_t = STORE_ADDRESS)]
        contract: Address,
        #[arg(long)]
        from: u64,
        /// Last block, 0 for latest
        #[arg(long, default_value = "0")]
        to: u64,
    },
}

#[derive(Debug, Subcommand)]
enum WalletCommand {
    /// Generate a new key pair
    New,
    /// Show the public key and address of a private key
    Inspect {
        /// Hex private key, read from PRIVATE_KEY1 when omitted
        private_key: Option<String>,
    },
}

impl WalletCommand {
    fn execute(&self) -> Result<()> {
        let keypair = match self {
            WalletCommand::New => Keypair::generate(),
            WalletCommand::Inspect { private_key } => {
                let key = match private_key {
                    Some(key) => key.clone(),
                    None => config::env_var(PRIVATE_KEY)?,
                };
                Keypair::from_hex(&key)?
            }
        };
        if matches!(self, WalletCommand::New) {
            println!("Private key: {}", keypair.private_key_hex());
        }
        println!("Public key: {}", keypair.public_key_hex());
        println!("Address: {}", keypair.address());
        Ok(())
    }
}

impl Command {
    async fn execute(&self, client: &StudyClient, ws_url: Option<Url>) -> Result<()> {
        match self {
            Command::Wallet { command } => command.execute(),
            Command::Balance {
                address,
                block,
                pending,
            } => self.handle_balance(client, *address, *block, *pending).await,
            Command::Block { number, json } => self.handle_block(client, *number, *json).await,
            Command::Tx { hash } => self.handle_tx(client, *hash).await,
            Command::Receipts { number } => {
                let receipts = client.block_receipts(*number).await?;
                println!("{}", serde_json::to_string_pretty(&receipts)?);
                Ok(())
            }
            Command::Token {
                token,
                holder,
                json,
            } => self.handle_token(client, *token, *holder, *json).await,
            Command::Transfer {
                to,
                amount,
                no_wait,
            } => {
                self.handle_transfer(client, *to, amount.clone(), *no_wait)
                    .await
            }
            Command::WatchHeads => self.handle_watch_heads(client, ws_url).await,
            Command::ItemSetHistory { contract, from, to } => {
                let events = match ws_url {
                    Some(url) => client.events_client_with_url(url).await?,
                    None => client.events_client().await?,
                };
                for event in events.item_set_history(*contract, *from, *to).await? {
                    println!("{}", serde_json::to_string(&event)?);
                }
                Ok(())
            }
        }
    }

    async fn handle_balance(
        &self,
        client: &StudyClient,
        address: Address,
        block: Option<u64>,
        pending: bool,
    ) -> Result<()> {
        let wei = match (block, pending) {
            (_, true) => client.pending_balance(address).await?,
            (Some(number), false) => client.balance_at(address, number).await?,
            (None, false) => client.balance(address).await?,
        };
        println!("{address}: {wei} wei ({} ETH)", wei_to_eth(wei));
        Ok(())
    }

    async fn handle_block(&self, client: &StudyClient, number: Option<u64>, json: bool) -> Result<()> {
        let number = match number {
            Some(number) => number,
            None => client.block_number().await?,
        };
        let block = client.block_by_number(number).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&block)?);
            return Ok(());
        }
        println!("Number: {}", block.header.number);
        println!("Hash: {}", block.header.hash);
        println!("Time: {}", format_timestamp(block.header.timestamp));
        println!("Gas used: {} / {}", block.header.gas_used, block.header.gas_limit);
        println!("Miner: {}", block.header.beneficiary);
        println!("Transactions: {}", block.transactions.len());
        Ok(())
    }

    async fn handle_tx(&self, client: &StudyClient, hash: B256) -> Result<()> {
        let lookup = client.transaction_by_hash(hash).await?;
        println!("{}", serde_json::to_string_pretty(&lookup.transaction)?);
        if lookup.is_pending {
            println!("Transaction is pending");
            return Ok(());
        }
        let receipt = client.receipt(hash).await?;
        println!(
            "Receipt: {} in block {}, gas used {}",
            ReceiptOutcome::from(&receipt),
            receipt.block_number.unwrap_or_default(),
            receipt.gas_used
        );
        Ok(())
    }

    async fn handle_token(
        &self,
        client: &StudyClient,
        token: Address,
        holder: Address,
        json: bool,
    ) -> Result<()> {
        let info = client.token_info(token, holder).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&info)?);
        } else {
            println!("{} ({}), {} decimals", info.name, info.symbol, info.decimals);
            println!("Balance of {holder}: {} ({} raw)", info.balance_in_units(), info.balance);
        }
        Ok(())
    }

    async fn handle_transfer(
        &self,
        client: &StudyClient,
        to: Address,
        amount: BigDecimal,
        no_wait: bool,
    ) -> Result<()> {
        let keypair = Keypair::from_hex(&config::env_var(PRIVATE_KEY)?)?;
        let account = client.account(keypair.into_signer()).await?;
        println!("Using account: {}", account.address());

        let value = eth_to_wei(amount.clone())?;
        log::debug!("Transferring {value} wei from {} to {to}", account.address());
        let tx_hash = account.transfer_eth(to, value).await?;
        println!("Transfer transaction hash for {amount} ETH: {tx_hash}");
        if no_wait {
            return Ok(());
        }
        let receipt = client
            .wait_for_transaction(tx_hash, &ReceiptPolling::default())
            .await?;
        println!("Transfer {}", ReceiptOutcome::from(&receipt));
        Ok(())
    }

    async fn handle_watch_heads(&self, client: &StudyClient, ws_url: Option<Url>) -> Result<()> {
        log::debug!("Subscribing to new heads via {ws_url:?}");
        let events = match ws_url {
            Some(url) => client.events_client_with_url(url).await?,
            None => client.events_client().await?,
        };
        let mut heads = events.new_heads().await?;
        println!("Watching new blocks (Ctrl+C to exit)...");
        while let Some(header) = heads.next().await {
            println!(
                "{} {} {} tx root {}",
                header.number,
                header.hash,
                format_timestamp(header.timestamp),
                header.transactions_root
            );
        }
        anyhow::bail!("Head subscription ended")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    config::load_dotenv()?;

    let args = Args::parse();
    let endpoint = Url::parse(&args.url)?;
    let ws_url = args.ws_url.as_deref().map(Url::parse).transpose()?;
    log::debug!("Using RPC endpoint {endpoint}");
    let client = StudyClient::new(endpoint);

    args.command.execute(&client, ws_url).await
}
