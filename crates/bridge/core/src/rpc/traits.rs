//! Trait definitions for the L1 RPC client and transaction signer.

use alloy_primitives::{Address, B256, Bytes};
use async_trait::async_trait;

use super::{L1Transaction, RpcResult, SignedTransaction, TransactionOutcome};

/// L1 client trait for the reads and broadcasts the bridge needs.
#[async_trait]
pub trait L1Client: Send + Sync {
    /// Returns the chain id of the node.
    async fn chain_id(&self) -> RpcResult<u64>;

    /// Returns the node's current gas price in wei.
    async fn gas_price(&self) -> RpcResult<u128>;

    /// Returns the next nonce of `address`, counting pending transactions.
    async fn pending_nonce(&self, address: Address) -> RpcResult<u64>;

    /// Executes a read-only call against the latest block.
    async fn call_contract(&self, to: Address, data: Bytes) -> RpcResult<Bytes>;

    /// Estimates the gas `tx` would use if sent from `from`.
    async fn estimate_gas(&self, from: Address, tx: &L1Transaction) -> RpcResult<u64>;

    /// Broadcasts a signed transaction and returns its hash.
    async fn send_transaction(&self, tx: &SignedTransaction) -> RpcResult<B256>;

    /// Waits until `tx_hash` is buried under `confirmations` blocks.
    async fn wait_for_transaction(
        &self,
        tx_hash: B256,
        confirmations: u64,
    ) -> RpcResult<TransactionOutcome>;
}

/// Signs L1 transactions for a single account.
pub trait TransactionSigner: Send + Sync {
    /// Returns the signing account.
    fn address(&self) -> Address;

    /// Signs `tx`.
    fn sign_transaction(&self, tx: &L1Transaction) -> RpcResult<SignedTransaction>;
}
