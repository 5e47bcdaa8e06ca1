//! Transaction types exchanged with the L1 client.

use alloy_primitives::{Address, B256, Bytes, U256};

/// An unsigned L1 transaction with every field the signer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L1Transaction {
    /// Call target.
    pub to: Address,
    /// Value attached to the call.
    pub value: U256,
    /// Calldata.
    pub input: Bytes,
    /// Sender nonce.
    pub nonce: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Legacy gas price in wei.
    pub gas_price: u128,
    /// Chain the transaction is valid on.
    pub chain_id: u64,
}

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Transaction hash.
    pub hash: B256,
    /// Sender nonce.
    pub nonce: u64,
    /// EIP-2718 encoding.
    pub raw: Bytes,
}

/// What became of a submitted transaction once it has enough confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionOutcome {
    /// Transaction hash.
    pub tx_hash: B256,
    /// Block the transaction landed in.
    pub block_number: Option<u64>,
    /// Whether execution succeeded.
    pub success: bool,
    /// Gas consumed by execution.
    pub gas_used: u64,
}
