use alloy::primitives::{Address, B256, keccak256};
use alloy::signers::k256::ecdsa::{SigningKey, VerifyingKey};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, anyhow};
use std::str::FromStr;

/// Length of an uncompressed SEC1 public key, including the `0x04` tag byte.
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

/// A secp256k1 keypair held in memory.
#[derive(Clone, Debug)]
pub struct Keypair {
    signer: PrivateKeySigner,
}

impl Keypair {
    /// Generates a new random private key.
    pub fn generate() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    /// Parses a hex-encoded private key, with or without the `0x` prefix.
    pub fn from_hex(private_key: &str) -> anyhow::Result<Self> {
        let trimmed = private_key.trim();
        let bytes = B256::from_str(trimmed.strip_prefix("0x").unwrap_or(trimmed))
            .context("Private key must be 32 hex-encoded bytes")?;
        let signer = PrivateKeySigner::from_bytes(&bytes)
            .map_err(|e| anyhow!("Failed to parse private key: {e}"))?;
        Ok(Self { signer })
    }

    /// Returns the underlying signer.
    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    /// Consumes the keypair, returning the signer.
    pub fn into_signer(self) -> PrivateKeySigner {
        self.signer
    }

    /// Returns the private key
    pub fn private_key(&self) -> &SigningKey {
        self.signer.credential()
    }

    /// Returns the public key
    pub fn public_key(&self) -> VerifyingKey {
        *self.signer.credential().verifying_key()
    }

    /// Private key as lowercase hex, without the `0x` prefix.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key().to_bytes())
    }

    /// Uncompressed SEC1 encoding of the public key (`0x04 || X || Y`).
    pub fn public_key_bytes(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LEN] {
        let point = self.public_key().to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Public key as hex, without the `0x04` tag byte.
    pub fn public_key_hex(&self) -> String {
        hex::encode(&self.public_key_bytes()[1..])
    }

    /// Address as computed by the signer library.
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl From<PrivateKeySigner> for Keypair {
    fn from(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }
}

/// Derives an address by hand: the last 20 bytes of the keccak-256 hash
/// of the public key coordinates, skipping the `0x04` tag byte.
pub fn address_from_public_key(public_key: &[u8; UNCOMPRESSED_PUBLIC_KEY_LEN]) -> Address {
    let hash = keccak256(&public_key[1..]);
    Address::from_slice(&hash[12..])
}
