//! Protocol constants shared by the L1 and L2 sides of the bridge.

use alloy_primitives::{Address, B256, address, b256};

/// `keccak256("zksyncCreate2")`, the domain separator of L2 `CREATE2` addresses.
pub const CREATE2_PREFIX: B256 =
    b256!("2020dba91b30cc0006188af794c2fb30dd8520db7e2c088b7fc7c103c00ca494");

/// Offset added to an L1 contract address when it acts as an L2 transaction sender.
pub const L1_TO_L2_ALIAS_OFFSET: Address = address!("1111000000000000000000000000000000001111");

/// Version byte stored in the first byte of every bytecode hash.
pub const BYTECODE_HASH_VERSION: u8 = 1;

/// Size of an EVM word in bytes.
pub const WORD_SIZE: usize = 32;

/// Largest bytecode length, in words, that fits the 2-byte length field of a bytecode hash.
pub const MAX_BYTECODE_WORDS: u16 = u16::MAX;

/// Floor price for L2 gas, in wei.
pub const FAIR_L2_GAS_PRICE: u128 = 500_000_000;

/// L1 gas charged per byte of pubdata published by an L2 transaction.
pub const L1_GAS_PER_PUBDATA_BYTE: u128 = 17;

/// Gas-per-pubdata limit every bridge priority transaction is submitted with.
pub const REQUIRED_L2_GAS_PRICE_PER_PUBDATA: u64 = 800;

/// Maximum L2 gas limit accepted for a priority transaction.
pub const PRIORITY_TX_MAX_GAS_LIMIT: u64 = 72_000_000;

/// L2 gas limit for each deployment of the bridge counterpart (implementation and proxy).
pub const DEPLOY_L2_BRIDGE_COUNTERPART_GAS_LIMIT: u64 = 10_000_000;

/// L1 gas limit of the transaction publishing the bridge factory dependencies.
pub const PUBLISH_BYTECODES_L1_GAS_LIMIT: u64 = 2_100_000;

/// Confirmation depth required before a bridge initialization transaction counts as landed.
pub const MIN_INIT_CONFIRMATIONS: u64 = 2;

/// L2 system contract that relays L2 to L1 messages.
pub const L2_TO_L1_MESSENGER_ADDRESS: Address =
    address!("0000000000000000000000000000000000008008");

/// L2 system contract holding the native ETH balance.
pub const L2_ETH_TOKEN_ADDRESS: Address = address!("000000000000000000000000000000000000800a");

/// Shard the bridge's L2 to L1 logs are emitted on.
pub const L2_LOG_SHARD_ID: u8 = 0;

/// Maximum depth of a withdrawal Merkle proof (exclusive).
pub const MAX_MERKLE_PROOF_LEN: usize = 256;
