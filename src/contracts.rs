use alloy::json_abi::JsonAbi;
use alloy::primitives::{Address, B256, address, b256};
use alloy_sol_types::sol;

sol! {
    /// Minimal key/value store emitting `ItemSet` on every write.
    contract Store {
        constructor(string _version);

        event ItemSet(bytes32 key, bytes32 value);

        function items(bytes32 key) external view returns (bytes32);
        function setItem(bytes32 key, bytes32 value) external;
        function version() external view returns (string);
    }

    /// The subset of ERC-20 the study programs touch.
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    /// Counter with a signed running count.
    contract Counter {
        function getCount() external view returns (int256);
        function increment() external;
        function decrement() external;
    }
}

/// Chain id of the Sepolia test network.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Store contract deployed on Sepolia.
pub const STORE_ADDRESS: Address = address!("0x183AdfEe585d04Db1Ab151840D6399009beC2bC4");

/// ERC-20 token deployed on Sepolia.
pub const TOKEN_ADDRESS: Address = address!("0x2f8C29909a2697E4E0449662302aAa1750f2cF98");

/// Account holding a balance of [`TOKEN_ADDRESS`].
pub const TOKEN_HOLDER: Address = address!("0xFA73Ee972cB6A7af855846635Ad65427a7009d4e");

/// Account queried for native balances.
pub const BALANCE_ACCOUNT: Address = address!("0x25836239F7b632635F815689389C537133248edb");

/// Recipient of the sample native and token transfers.
pub const TRANSFER_RECIPIENT: Address = address!("0xac787ff5df204282fc4a9216e2c5e5fc3d703574");

/// Block used by the block, transaction and receipt queries.
pub const REFERENCE_BLOCK: u64 = 5_671_744;

/// Block used by the historical balance query.
pub const HISTORICAL_BALANCE_BLOCK: u64 = 5_532_993;

/// Hash of a Sepolia block with transactions.
pub const REFERENCE_BLOCK_HASH: B256 =
    b256!("0xae713dea1419ac72b928ebe6ba9915cd4fc1ef125a606f90f5e783c47cb1a4b5");

/// Hash of a mined Sepolia transaction.
pub const REFERENCE_TX_HASH: B256 =
    b256!("0x20294a03e8766e9aeab58327fc4112756017c6c28f6f99c7722f4a29075601c5");

/// Gas limit of a plain value transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Gas limit used for Store `setItem` calls.
pub const CALL_GAS_LIMIT: u64 = 300_000;

/// Gas limit used for deployments and bound-contract transactions.
pub const DEPLOY_GAS_LIMIT: u64 = 3_000_000;

/// Headroom added on top of an ERC-20 transfer gas estimate.
pub const TOKEN_TRANSFER_GAS_BUFFER: u64 = 1_000;

/// JSON ABI of the Store contract, as emitted by solc.
pub const STORE_ABI_JSON: &str = r#"[{"inputs":[{"internalType":"string","name":"_version","type":"string"}],"stateMutability":"nonpayable","type":"constructor"},{"anonymous":false,"inputs":[{"indexed":false,"internalType":"bytes32","name":"key","type":"bytes32"},{"indexed":false,"internalType":"bytes32","name":"value","type":"bytes32"}],"name":"ItemSet","type":"event"},{"inputs":[{"internalType":"bytes32","name":"","type":"bytes32"}],"name":"items","outputs":[{"internalType":"bytes32","name":"","type":"bytes32"}],"stateMutability":"view","type":"function"},{"inputs":[{"internalType":"bytes32","name":"key","type":"bytes32"},{"internalType":"bytes32","name":"value","type":"bytes32"}],"name":"setItem","outputs":[],"stateMutability":"nonpayable","type":"function"},{"inputs":[],"name":"version","outputs":[{"internalType":"string","name":"","type":"string"}],"stateMutability":"view","type":"function"}]"#;

/// Parses [`STORE_ABI_JSON`].
pub fn store_abi() -> anyhow::Result<JsonAbi> {
    serde_json::from_str(STORE_ABI_JSON)
        .map_err(|e| anyhow::anyhow!("Failed to parse Store ABI: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::{SolCall, SolEvent};

    #[test]
    fn json_abi_agrees_with_bindings() {
        let abi = store_abi().unwrap();
        let set_item = &abi.function("setItem").unwrap()[0];
        assert_eq!(set_item.selector(), Store::setItemCall::SELECTOR);
        let items = &abi.function("items").unwrap()[0];
        assert_eq!(items.selector(), Store::itemsCall::SELECTOR);
        let item_set = &abi.event("ItemSet").unwrap()[0];
        assert_eq!(item_set.selector(), Store::ItemSet::SIGNATURE_HASH);
        assert!(abi.constructor().is_some());
    }

    #[test]
    fn erc20_transfer_selector() {
        assert_eq!(IERC20::transferCall::SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(IERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
    }
}
