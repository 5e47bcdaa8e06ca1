//! L1 bridge contract client.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use era_bridge_primitives::contracts::IL1Bridge;

use super::call_view;
use crate::{BridgeResult, rpc::L1Client};

/// Reads the L1 side of the bridge through an [`L1Client`].
#[derive(Debug)]
pub struct L1BridgeClient<C> {
    address: Address,
    client: Arc<C>,
}

impl<C> Clone for L1BridgeClient<C> {
    fn clone(&self) -> Self {
        Self { address: self.address, client: Arc::clone(&self.client) }
    }
}

impl<C: L1Client> L1BridgeClient<C> {
    /// Creates a client for the bridge at `address`.
    pub const fn new(address: Address, client: Arc<C>) -> Self {
        Self { address, client }
    }

    /// Returns the bridge address.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns the L2 counterpart the bridge deployed, zero before initialization.
    pub async fn l2_bridge(&self) -> BridgeResult<Address> {
        call_view(self.client.as_ref(), self.address, IL1Bridge::l2BridgeCall {}).await
    }

    /// Returns whether the withdrawal at `index` of `batch` has been finalized.
    pub async fn is_withdrawal_finalized(&self, batch: u64, index: u64) -> BridgeResult<bool> {
        let call = IL1Bridge::isWithdrawalFinalizedCall {
            _l2BatchNumber: U256::from(batch),
            _l2MessageIndex: U256::from(index),
        };
        call_view(self.client.as_ref(), self.address, call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BridgeError,
        test_utils::{L1_BRIDGE, MockL1},
    };

    #[tokio::test]
    async fn test_l2_bridge_defaults_to_zero() {
        let bridge = L1BridgeClient::new(L1_BRIDGE, Arc::new(MockL1::new()));
        assert_eq!(bridge.l2_bridge().await.unwrap(), Address::ZERO);
    }

    #[tokio::test]
    async fn test_finalized_withdrawals() {
        let l1 = Arc::new(MockL1::new().with_finalized_withdrawal(4, 2));
        let bridge = L1BridgeClient::new(L1_BRIDGE, l1);

        assert!(bridge.is_withdrawal_finalized(4, 2).await.unwrap());
        assert!(!bridge.is_withdrawal_finalized(4, 3).await.unwrap());
    }

    #[tokio::test]
    async fn test_undecodable_output() {
        let l1 = Arc::new(MockL1::new().with_raw_output(L1_BRIDGE, vec![0x01]));
        let bridge = L1BridgeClient::new(L1_BRIDGE, l1);

        let err = bridge.l2_bridge().await.unwrap_err();
        assert!(matches!(err, BridgeError::Contract(msg) if msg.contains("l2Bridge()")));
    }
}
