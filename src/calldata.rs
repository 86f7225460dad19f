//! Hand-built ABI call data.
//!
//! A call is the 4-byte selector of the function signature followed by each
//! static argument left-padded to a 32-byte word. This is all the ERC-20
//! `transfer` and Store calls need; dynamic types go through the ABI encoder.

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, B256, U256, keccak256};
use displaydoc::Display;
use thiserror::Error;

/// Size of an ABI word.
pub const WORD: usize = 32;

/// Represents errors raised while building call data.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Value of {0} bytes does not fit in a 32-byte word
    WordOverflow(usize),
    /// Function `{0}` is not part of the ABI
    UnknownFunction(String),
    /// Failed to encode arguments for `{name}`: {reason}
    Encoding { name: String, reason: String },
}

/// First four bytes of the keccak-256 hash of a function signature
/// such as `transfer(address,uint256)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Left-pads `bytes` with zeros to a full word.
pub fn left_pad_32(bytes: &[u8]) -> Result<[u8; WORD], Error> {
    if bytes.len() > WORD {
        return Err(Error::WordOverflow(bytes.len()));
    }
    let mut word = [0u8; WORD];
    word[WORD - bytes.len()..].copy_from_slice(bytes);
    Ok(word)
}

/// Packs a string into a `bytes32`, left-aligned and zero-filled.
/// Anything past 32 bytes is dropped.
pub fn bytes32_from_str(value: &str) -> B256 {
    let mut word = [0u8; WORD];
    let bytes = value.as_bytes();
    let len = bytes.len().min(WORD);
    word[..len].copy_from_slice(&bytes[..len]);
    B256::from(word)
}

/// Reads a `bytes32` back as text, ignoring trailing zero bytes.
pub fn bytes32_to_string(value: &B256) -> String {
    let end = value
        .iter()
        .rposition(|b| *b != 0)
        .map(|i| i + 1)
        .unwrap_or(0);
    String::from_utf8_lossy(&value[..end]).into_owned()
}

/// Concatenates a selector with already padded words.
fn call(selector: [u8; 4], words: &[[u8; WORD]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + words.len() * WORD);
    data.extend_from_slice(&selector);
    for word in words {
        data.extend_from_slice(word);
    }
    data
}

/// `transfer(address,uint256)` call data.
pub fn erc20_transfer(to: Address, amount: U256) -> Vec<u8> {
    let to_word = B256::left_padding_from(to.as_slice());
    let amount_word: [u8; WORD] = amount.to_be_bytes();
    call(
        selector("transfer(address,uint256)"),
        &[to_word.0, amount_word],
    )
}

/// `setItem(bytes32,bytes32)` call data.
pub fn store_set_item(key: B256, value: B256) -> Vec<u8> {
    call(selector("setItem(bytes32,bytes32)"), &[key.0, value.0])
}

/// `items(bytes32)` call data.
pub fn store_items(key: B256) -> Vec<u8> {
    call(selector("items(bytes32)"), &[key.0])
}

/// Encodes a call to `name` through a parsed JSON ABI.
/// Uses the first overload with the matching name.
pub fn encode_with_abi(abi: &JsonAbi, name: &str, args: &[DynSolValue]) -> Result<Vec<u8>, Error> {
    let function = abi
        .function(name)
        .and_then(|overloads| overloads.first())
        .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
    function
        .abi_encode_input(args)
        .map_err(|e| Error::Encoding {
            name: name.to_string(),
            reason: e.to_string(),
        })
}
