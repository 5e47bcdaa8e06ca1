//! Finalization checks that need L1 state.

use std::sync::Arc;

use alloy_primitives::B256;
use era_bridge_primitives::{FinalizeWithdrawalCall, WithdrawalFinalizer, WithdrawalProof};
use tracing::debug;

use crate::{
    BridgeConfig, BridgeError, BridgeResult, FinalizerConfig, L1BridgeClient, MailboxClient,
    rpc::L1Client,
};

/// Prepares withdrawal finalizations for one bridge.
///
/// Like [`WithdrawalFinalizer`], the service never submits; it returns the call once the
/// proof is valid, unused and, when configured, included in its batch.
#[derive(Debug)]
pub struct WithdrawalService<C> {
    finalizer: WithdrawalFinalizer,
    l1_bridge: L1BridgeClient<C>,
    mailbox: Option<MailboxClient<C>>,
}

impl<C: L1Client> WithdrawalService<C> {
    /// Creates a service for the bridge pair in `bridge`.
    pub fn new(
        bridge: &BridgeConfig,
        config: &FinalizerConfig,
        client: Arc<C>,
    ) -> BridgeResult<Self> {
        bridge.validate()?;
        let counterpart = bridge.require_counterpart()?;

        let finalizer = WithdrawalFinalizer::new(bridge.bridge_l1_address, counterpart)
            .with_layout(config.layout);
        let mailbox =
            config.mailbox_address.map(|address| MailboxClient::new(address, Arc::clone(&client)));
        Ok(Self {
            finalizer,
            l1_bridge: L1BridgeClient::new(bridge.bridge_l1_address, client),
            mailbox,
        })
    }

    /// Returns the stateless finalizer.
    pub const fn finalizer(&self) -> &WithdrawalFinalizer {
        &self.finalizer
    }

    /// Validates `proof` against the bridge and L1 state and returns the finalize call.
    pub async fn prepare_finalization(
        &self,
        proof: &WithdrawalProof,
    ) -> BridgeResult<FinalizeWithdrawalCall> {
        let call = self.finalizer.validate(proof)?;

        let (batch, index) = (proof.l1_batch_number, proof.l2_message_index);
        if self.l1_bridge.is_withdrawal_finalized(batch, index).await? {
            return Err(BridgeError::AlreadyFinalized { batch, index });
        }

        if let Some(mailbox) = &self.mailbox {
            let root = mailbox.l2_logs_root_hash(batch).await?;
            if root == B256::ZERO {
                return Err(BridgeError::BatchNotExecuted { batch });
            }
            self.finalizer.verify_inclusion(proof, root)?;
        }

        debug!(batch, index, to = %call.to, "Withdrawal ready for finalization");
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolCall;
    use alloy_primitives::{Address, Bytes, U256};
    use era_bridge_primitives::{WithdrawalError, calculate_root, contracts::IL1Bridge, l2_log_leaf};

    use super::*;
    use crate::test_utils::{L1_BRIDGE, L2_BRIDGE, MAILBOX, MockL1, bridge_config};

    fn message(sender: Address) -> Bytes {
        let mut message = IL1Bridge::finalizeWithdrawalCall::SELECTOR.to_vec();
        message.extend_from_slice(sender.into_word().as_slice());
        message.extend_from_slice(Address::repeat_byte(0x55).into_word().as_slice());
        message.extend_from_slice(Address::repeat_byte(0x66).into_word().as_slice());
        message.extend_from_slice(&U256::from(1_000u64).to_be_bytes::<32>());
        message.into()
    }

    fn proof() -> WithdrawalProof {
        WithdrawalProof {
            l1_batch_number: 12,
            l2_message_index: 1,
            l2_tx_number_in_block: 3,
            message: message(L2_BRIDGE),
            merkle_proof: vec![B256::repeat_byte(1), B256::repeat_byte(2)],
        }
    }

    fn batch_root(proof: &WithdrawalProof) -> B256 {
        let leaf = l2_log_leaf(proof.l2_tx_number_in_block, L2_BRIDGE, &proof.message);
        calculate_root(&proof.merkle_proof, proof.l2_message_index, leaf).unwrap()
    }

    fn service(l1: MockL1, inclusion: bool) -> WithdrawalService<MockL1> {
        let mut config = FinalizerConfig::default();
        if inclusion {
            config = config.with_inclusion_check(MAILBOX);
        }
        WithdrawalService::new(&bridge_config(), &config, Arc::new(l1)).unwrap()
    }

    #[tokio::test]
    async fn test_prepares_call_for_unfinalized_withdrawal() {
        let call = service(MockL1::new(), false).prepare_finalization(&proof()).await.unwrap();
        assert_eq!(call.to, L1_BRIDGE);
        assert_eq!(&call.calldata[..4], IL1Bridge::finalizeWithdrawalCall::SELECTOR.as_slice());
    }

    #[tokio::test]
    async fn test_replay_is_rejected() {
        let err = service(MockL1::new().with_finalized_withdrawal(12, 1), false)
            .prepare_finalization(&proof())
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::AlreadyFinalized { batch: 12, index: 1 }));
    }

    #[tokio::test]
    async fn test_validation_runs_before_any_read() {
        let l1 = Arc::new(MockL1::new());
        let service = WithdrawalService::new(
            &bridge_config(),
            &FinalizerConfig::default(),
            Arc::clone(&l1),
        )
        .unwrap();
        let proof = WithdrawalProof { message: message(Address::repeat_byte(0x44)), ..proof() };

        let err = service.prepare_finalization(&proof).await.unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Withdrawal(WithdrawalError::UnauthorizedSender { .. })
        ));
        assert_eq!(l1.calls_to(L1_BRIDGE), 0);
    }

    #[tokio::test]
    async fn test_inclusion_verified_against_batch_root() {
        let proof = proof();
        let l1 = MockL1::new().with_logs_root(12, batch_root(&proof));
        assert!(service(l1, true).prepare_finalization(&proof).await.is_ok());
    }

    #[tokio::test]
    async fn test_inclusion_mismatch() {
        let l1 = MockL1::new().with_logs_root(12, B256::repeat_byte(0xee));
        let err = service(l1, true).prepare_finalization(&proof()).await.unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Withdrawal(WithdrawalError::InclusionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_unexecuted_batch() {
        let err = service(MockL1::new(), true).prepare_finalization(&proof()).await.unwrap_err();
        assert!(matches!(err, BridgeError::BatchNotExecuted { batch: 12 }));
    }

    #[test]
    fn test_requires_counterpart() {
        let bridge =
            BridgeConfig { bridge_l2_counterpart_address: Address::ZERO, ..bridge_config() };
        let err =
            WithdrawalService::new(&bridge, &FinalizerConfig::default(), Arc::new(MockL1::new()))
                .unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
    }
}
