//! Mailbox contract client.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use era_bridge_primitives::{GasParams, contracts::IMailbox};

use super::call_view;
use crate::{BaseCostOracle, BridgeResult, rpc::L1Client};

/// Reads the L1 mailbox through an [`L1Client`].
#[derive(Debug)]
pub struct MailboxClient<C> {
    address: Address,
    client: Arc<C>,
}

impl<C> Clone for MailboxClient<C> {
    fn clone(&self) -> Self {
        Self { address: self.address, client: Arc::clone(&self.client) }
    }
}

impl<C: L1Client> MailboxClient<C> {
    /// Creates a client for the mailbox at `address`.
    pub const fn new(address: Address, client: Arc<C>) -> Self {
        Self { address, client }
    }

    /// Returns the mailbox address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the minimum value a priority transaction with `params` must carry.
    pub async fn l2_transaction_base_cost(&self, params: &GasParams) -> BridgeResult<U256> {
        let call = IMailbox::l2TransactionBaseCostCall {
            _gasPrice: U256::from(params.gas_price),
            _l2GasLimit: U256::from(params.l2_gas_limit),
            _l2GasPerPubdataByteLimit: U256::from(params.gas_per_pubdata_byte),
        };
        call_view(self.client.as_ref(), self.address, call).await
    }

    /// Returns the rollup governor.
    pub async fn governor(&self) -> BridgeResult<Address> {
        call_view(self.client.as_ref(), self.address, IMailbox::getGovernorCall {}).await
    }

    /// Returns the logs root of `batch`, zero while the batch is not executed.
    pub async fn l2_logs_root_hash(&self, batch: u64) -> BridgeResult<B256> {
        let call = IMailbox::l2LogsRootHashCall { _batchNumber: U256::from(batch) };
        call_view(self.client.as_ref(), self.address, call).await
    }
}

#[async_trait]
impl<C: L1Client> BaseCostOracle for MailboxClient<C> {
    async fn l2_transaction_base_cost(&self, params: &GasParams) -> BridgeResult<U256> {
        Self::l2_transaction_base_cost(self, params).await
    }
}
