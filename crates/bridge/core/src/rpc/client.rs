//! L1 RPC client implementation.

use std::time::Duration;

use alloy_network::ReceiptResponse;
use alloy_primitives::{Address, B256, Bytes};
use alloy_provider::{PendingTransactionBuilder, PendingTransactionError, Provider, RootProvider};
use alloy_rpc_types_eth::{TransactionInput, TransactionRequest};
use alloy_transport::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use backon::Retryable;
use url::Url;

use super::{
    L1Client, L1Transaction, SignedTransaction, TransactionOutcome,
    error::{RpcError, RpcResult},
};
use crate::config::RetryConfig;

/// Default time to wait for a transaction to reach its confirmation depth.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for the L1 client.
#[derive(Debug, Clone)]
pub struct L1ClientConfig {
    /// RPC endpoint URL.
    pub endpoint: Url,
    /// Maximum time to wait for confirmations.
    pub receipt_timeout: Duration,
    /// Retry configuration for reads.
    pub retry_config: RetryConfig,
}

impl L1ClientConfig {
    /// Creates a new L1 client configuration with defaults.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
            retry_config: RetryConfig::default(),
        }
    }

    /// Sets the confirmation timeout.
    pub const fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    /// Sets the retry configuration.
    pub const fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }
}

/// L1 RPC client implementation using Alloy.
#[derive(Debug, Clone)]
pub struct AlloyL1Client {
    provider: RootProvider,
    receipt_timeout: Duration,
    retry_config: RetryConfig,
}

impl AlloyL1Client {
    /// Creates a new L1 client from the given configuration.
    pub fn new(config: L1ClientConfig) -> Self {
        Self {
            provider: RootProvider::new_http(config.endpoint),
            receipt_timeout: config.receipt_timeout,
            retry_config: config.retry_config,
        }
    }

    fn request(tx: &L1Transaction) -> TransactionRequest {
        TransactionRequest::default()
            .to(tx.to)
            .value(tx.value)
            .input(TransactionInput::new(tx.input.clone()))
            .nonce(tx.nonce)
            .gas_price(tx.gas_price)
    }
}

#[async_trait]
impl L1Client for AlloyL1Client {
    async fn chain_id(&self) -> RpcResult<u64> {
        let backoff = self.retry_config.to_backoff_builder();

        (|| async { self.provider.get_chain_id().await.map_err(RpcError::from) })
            .retry(backoff)
            .when(|e| e.is_retryable())
            .notify(|err, dur| {
                tracing::debug!(error = %err, delay = ?dur, "Retrying L1Client::chain_id");
            })
            .await
    }

    async fn gas_price(&self) -> RpcResult<u128> {
        let backoff = self.retry_config.to_backoff_builder();

        (|| async { self.provider.get_gas_price().await.map_err(RpcError::from) })
            .retry(backoff)
            .when(|e| e.is_retryable())
            .notify(|err, dur| {
                tracing::debug!(error = %err, delay = ?dur, "Retrying L1Client::gas_price");
            })
            .await
    }

    async fn pending_nonce(&self, address: Address) -> RpcResult<u64> {
        let backoff = self.retry_config.to_backoff_builder();

        (|| async {
            self.provider.get_transaction_count(address).pending().await.map_err(RpcError::from)
        })
        .retry(backoff)
        .when(|e| e.is_retryable())
        .notify(|err, dur| {
            tracing::debug!(error = %err, delay = ?dur, "Retrying L1Client::pending_nonce");
        })
        .await
    }

    async fn call_contract(&self, to: Address, data: Bytes) -> RpcResult<Bytes> {
        let backoff = self.retry_config.to_backoff_builder();

        (|| async {
            let req =
                TransactionRequest::default().to(to).input(TransactionInput::new(data.clone()));
            self.provider.call(req).await.map_err(RpcError::from)
        })
        .retry(backoff)
        .when(|e| e.is_retryable())
        .notify(|err, dur| {
            tracing::debug!(error = %err, delay = ?dur, "Retrying L1Client::call_contract");
        })
        .await
    }

    async fn estimate_gas(&self, from: Address, tx: &L1Transaction) -> RpcResult<u64> {
        let backoff = self.retry_config.to_backoff_builder();

        (|| async {
            let req = Self::request(tx).from(from);
            self.provider.estimate_gas(req).await.map_err(RpcError::from)
        })
        .retry(backoff)
        .when(|e| e.is_retryable())
        .notify(|err, dur| {
            tracing::debug!(error = %err, delay = ?dur, "Retrying L1Client::estimate_gas");
        })
        .await
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> RpcResult<B256> {
        let pending = self
            .provider
            .send_raw_transaction(&tx.raw)
            .await
            .map_err(send_error)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_transaction(
        &self,
        tx_hash: B256,
        confirmations: u64,
    ) -> RpcResult<TransactionOutcome> {
        let receipt = PendingTransactionBuilder::new(self.provider.clone(), tx_hash)
            .with_required_confirmations(confirmations)
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(|e| match e {
                PendingTransactionError::TxWatcher(_) => RpcError::Timeout(e.to_string()),
                PendingTransactionError::TransportError(e) => RpcError::from(e),
                _ => RpcError::Transport(e.to_string()),
            })?;

        Ok(TransactionOutcome {
            tx_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            success: receipt.status(),
            gas_used: receipt.gas_used(),
        })
    }
}

/// A node answering a submission with an error refused it. Anything else is a transport fault.
fn send_error(err: TransportError) -> RpcError {
    match err {
        TransportError::ErrorResp(_) => RpcError::Rejected(err.to_string()),
        TransportError::Transport(TransportErrorKind::HttpError(ref http)) if http.status < 500 => {
            RpcError::Rejected(err.to_string())
        }
        err => RpcError::from(err),
    }
}
