//! Validation of L2 to L1 withdrawal messages.
//!
//! A withdrawal is finalized on L1 by replaying the message the L2 bridge sent, together
//! with the Merkle proof of its inclusion in an executed batch. [`WithdrawalFinalizer`]
//! rejects anything the L1 bridge would revert on, then hands back the finalize call
//! without submitting it.

use alloy_primitives::{Address, B256, Bytes, U256, hex};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::{
    L2_ETH_TOKEN_ADDRESS, WithdrawalError, WithdrawalResult, calculate_root,
    contracts::{IL1Bridge, IMailbox},
    l2_log_leaf,
};

/// Length of the ABI payload following the sender in a token withdrawal message:
/// `l1Receiver`, `l1Token` and `amount` words.
pub const TOKEN_WITHDRAWAL_PAYLOAD_LEN: usize = 96;

/// Length of a packed ETH withdrawal message.
pub const ETH_WITHDRAWAL_MESSAGE_LEN: usize = 96;

/// Proof material for a withdrawal, as served by the L2 node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalProof {
    /// Batch the withdrawal was executed in.
    pub l1_batch_number: u64,
    /// Index of the message in the batch's logs tree.
    pub l2_message_index: u64,
    /// Position of the withdrawing transaction in its batch.
    pub l2_tx_number_in_block: u16,
    /// Message sent to L1.
    pub message: Bytes,
    /// Sibling hashes from the leaf to the root.
    #[serde(alias = "proof")]
    pub merkle_proof: Vec<B256>,
}

/// Wire layout of a withdrawal message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLayout {
    /// `selector (4) || pad32(l2Sender) || payload`.
    Padded {
        /// Selector of the L1 finalize entry point.
        selector: [u8; 4],
        /// Length of the payload following the sender word.
        payload_len: usize,
    },
    /// `finalizeEthWithdrawal selector (4) || l1Receiver (20) || amount (32) ||
    /// l2Sender (20) || l1WethReceiver (20)`, sent through the L2 ETH token.
    ///
    /// The selector is that of the chain-id aware mailbox entry point, `0x0fdef251`.
    EthWithdrawal,
}

impl Default for MessageLayout {
    fn default() -> Self {
        Self::Padded {
            selector: IL1Bridge::finalizeWithdrawalCall::SELECTOR,
            payload_len: TOKEN_WITHDRAWAL_PAYLOAD_LEN,
        }
    }
}

impl MessageLayout {
    /// Returns the exact length of a message in this layout.
    pub const fn message_len(&self) -> usize {
        match self {
            Self::Padded { payload_len, .. } => 4 + 32 + *payload_len,
            Self::EthWithdrawal => ETH_WITHDRAWAL_MESSAGE_LEN,
        }
    }

    /// Returns the selector every message starts with.
    pub const fn selector(&self) -> [u8; 4] {
        match self {
            Self::Padded { selector, .. } => *selector,
            Self::EthWithdrawal => IMailbox::finalizeEthWithdrawalCall::SELECTOR,
        }
    }

    /// Returns the L2 contract that emits the message log.
    pub const fn log_sender(&self, counterpart: Address) -> Address {
        match self {
            Self::Padded { .. } => counterpart,
            Self::EthWithdrawal => L2_ETH_TOKEN_ADDRESS,
        }
    }
}

/// Fields extracted from a validated message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalMessage {
    /// L2 contract that initiated the withdrawal.
    pub l2_sender: Address,
    /// L1 contract the message is addressed to, for layouts that carry one.
    pub l1_receiver: Option<Address>,
    /// Bytes following the sender.
    pub payload: Bytes,
}

impl WithdrawalMessage {
    /// Returns the withdrawn amount of a packed ETH withdrawal.
    pub fn eth_amount(&self) -> Option<U256> {
        // The payload of an ETH message is `amount (32) || l1WethReceiver (20)`.
        (self.l1_receiver.is_some() && self.payload.len() >= 32)
            .then(|| U256::from_be_slice(&self.payload[..32]))
    }
}

/// A finalize call ready to be submitted to L1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeWithdrawalCall {
    /// Contract to call.
    pub to: Address,
    /// ABI-encoded `finalizeWithdrawal` call.
    pub calldata: Bytes,
}

/// Validates withdrawal proofs for a single bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalFinalizer {
    bridge_l1_address: Address,
    bridge_l2_counterpart: Address,
    layout: MessageLayout,
}

impl WithdrawalFinalizer {
    /// Creates a finalizer for token withdrawals of the given bridge pair.
    pub fn new(bridge_l1_address: Address, bridge_l2_counterpart: Address) -> Self {
        Self { bridge_l1_address, bridge_l2_counterpart, layout: MessageLayout::default() }
    }

    /// Sets the expected message layout.
    pub const fn with_layout(mut self, layout: MessageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Returns the expected message layout.
    pub const fn layout(&self) -> MessageLayout {
        self.layout
    }

    /// Returns the L1 bridge address.
    pub const fn bridge_l1_address(&self) -> Address {
        self.bridge_l1_address
    }

    /// Returns the configured L2 counterpart.
    pub const fn bridge_l2_counterpart(&self) -> Address {
        self.bridge_l2_counterpart
    }

    /// Checks the message shape, selector, receiver and sender, in that order.
    pub fn parse_message(&self, message: &[u8]) -> WithdrawalResult<WithdrawalMessage> {
        let expected_len = self.layout.message_len();
        if message.len() != expected_len {
            return Err(WithdrawalError::MalformedMessage {
                reason: format!("expected {expected_len} bytes, got {}", message.len()),
            });
        }

        let selector = self.layout.selector();
        if message[..4] != selector {
            return Err(WithdrawalError::WrongSelector {
                expected: hex::encode_prefixed(selector),
                actual: hex::encode_prefixed(&message[..4]),
            });
        }

        let parsed = match self.layout {
            MessageLayout::Padded { .. } => {
                if message[4..16].iter().any(|b| *b != 0) {
                    return Err(WithdrawalError::MalformedMessage {
                        reason: "non-zero padding in the sender word".to_string(),
                    });
                }
                WithdrawalMessage {
                    l2_sender: Address::from_slice(&message[16..36]),
                    l1_receiver: None,
                    payload: Bytes::copy_from_slice(&message[36..]),
                }
            }
            MessageLayout::EthWithdrawal => {
                let l1_receiver = Address::from_slice(&message[4..24]);
                if l1_receiver != self.bridge_l1_address {
                    return Err(WithdrawalError::UnauthorizedReceiver {
                        expected: self.bridge_l1_address,
                        actual: l1_receiver,
                    });
                }
                let mut payload = message[24..56].to_vec();
                payload.extend_from_slice(&message[76..96]);
                WithdrawalMessage {
                    l2_sender: Address::from_slice(&message[56..76]),
                    l1_receiver: Some(l1_receiver),
                    payload: payload.into(),
                }
            }
        };

        if parsed.l2_sender != self.bridge_l2_counterpart {
            return Err(WithdrawalError::UnauthorizedSender {
                expected: self.bridge_l2_counterpart,
                actual: parsed.l2_sender,
            });
        }
        Ok(parsed)
    }

    /// Validates `proof` and returns the finalize call for it.
    ///
    /// Does not check inclusion against the batch root; see [`Self::verify_inclusion`].
    pub fn validate(&self, proof: &WithdrawalProof) -> WithdrawalResult<FinalizeWithdrawalCall> {
        self.parse_message(&proof.message)?;
        if proof.merkle_proof.is_empty() {
            return Err(WithdrawalError::MissingProof);
        }
        Ok(self.finalize_call(proof))
    }

    /// Checks that `proof` leads to `batch_root`, the logs root committed for its batch.
    pub fn verify_inclusion(
        &self,
        proof: &WithdrawalProof,
        batch_root: B256,
    ) -> WithdrawalResult<()> {
        let leaf = l2_log_leaf(
            proof.l2_tx_number_in_block,
            self.layout.log_sender(self.bridge_l2_counterpart),
            &proof.message,
        );
        let computed = calculate_root(&proof.merkle_proof, proof.l2_message_index, leaf)?;
        if computed != batch_root {
            return Err(WithdrawalError::InclusionMismatch { expected: batch_root, computed });
        }
        Ok(())
    }

    fn finalize_call(&self, proof: &WithdrawalProof) -> FinalizeWithdrawalCall {
        let calldata = IL1Bridge::finalizeWithdrawalCall {
            _l2BatchNumber: U256::from(proof.l1_batch_number),
            _l2MessageIndex: U256::from(proof.l2_message_index),
            _l2TxNumberInBatch: proof.l2_tx_number_in_block,
            _message: proof.message.clone(),
            _merkleProof: proof.merkle_proof.clone(),
        }
        .abi_encode();
        FinalizeWithdrawalCall { to: self.bridge_l1_address, calldata: calldata.into() }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, b256};
    use rstest::rstest;

    use super::*;

    const L1_BRIDGE: Address = address!("1000000000000000000000000000000000000001");
    const L2_BRIDGE: Address = address!("3333333333333333333333333333333333333333");
    const STRANGER: Address = address!("4444444444444444444444444444444444444444");

    fn token_message(sender: Address) -> Vec<u8> {
        let mut message = IL1Bridge::finalizeWithdrawalCall::SELECTOR.to_vec();
        message.extend_from_slice(sender.into_word().as_slice());
        message.extend_from_slice(&[0u8; TOKEN_WITHDRAWAL_PAYLOAD_LEN]);
        message
    }

    fn eth_message(receiver: Address, sender: Address) -> Vec<u8> {
        let mut message = IMailbox::finalizeEthWithdrawalCall::SELECTOR.to_vec();
        message.extend_from_slice(receiver.as_slice());
        message.extend_from_slice(U256::from(1_000u64).to_be_bytes::<32>().as_slice());
        message.extend_from_slice(sender.as_slice());
        message.extend_from_slice(&[0x55; 20]);
        message
    }

    fn proof(message: Vec<u8>) -> WithdrawalProof {
        WithdrawalProof {
            l1_batch_number: 42,
            l2_message_index: 5,
            l2_tx_number_in_block: 7,
            message: message.into(),
            merkle_proof: vec![B256::repeat_byte(1), B256::repeat_byte(2), B256::repeat_byte(3)],
        }
    }

    fn finalizer() -> WithdrawalFinalizer {
        WithdrawalFinalizer::new(L1_BRIDGE, L2_BRIDGE)
    }

    fn eth_finalizer() -> WithdrawalFinalizer {
        finalizer().with_layout(MessageLayout::EthWithdrawal)
    }

    #[test]
    fn test_valid_token_withdrawal() {
        let proof = proof(token_message(L2_BRIDGE));
        let call = finalizer().validate(&proof).unwrap();
        assert_eq!(call.to, L1_BRIDGE);

        let decoded = IL1Bridge::finalizeWithdrawalCall::abi_decode(&call.calldata).unwrap();
        assert_eq!(decoded._l2BatchNumber, U256::from(42u64));
        assert_eq!(decoded._l2MessageIndex, U256::from(5u64));
        assert_eq!(decoded._l2TxNumberInBatch, 7);
        assert_eq!(decoded._message, proof.message);
        assert_eq!(decoded._merkleProof, proof.merkle_proof);
    }

    #[test]
    fn test_empty_message_is_malformed() {
        let err = finalizer().validate(&proof(Vec::new())).unwrap_err();
        assert!(matches!(err, WithdrawalError::MalformedMessage { .. }));
    }

    #[test]
    fn test_truncated_message_is_malformed() {
        let mut message = token_message(L2_BRIDGE);
        message.pop();
        let err = finalizer().validate(&proof(message)).unwrap_err();
        assert!(matches!(err, WithdrawalError::MalformedMessage { .. }));
    }

    #[test]
    fn test_random_selector_is_rejected() {
        let mut message = token_message(L2_BRIDGE);
        message[..4].copy_from_slice(&[0xab, 0xcd, 0xef, 0x01]);
        assert_eq!(
            finalizer().validate(&proof(message)),
            Err(WithdrawalError::WrongSelector {
                expected: "0x11a2ccc1".to_string(),
                actual: "0xabcdef01".to_string(),
            })
        );
    }

    #[test]
    fn test_foreign_sender_is_unauthorized() {
        assert_eq!(
            finalizer().validate(&proof(token_message(STRANGER))),
            Err(WithdrawalError::UnauthorizedSender { expected: L2_BRIDGE, actual: STRANGER })
        );
    }

    #[test]
    fn test_dirty_sender_padding_is_malformed() {
        let mut message = token_message(L2_BRIDGE);
        message[4] = 1;
        let err = finalizer().validate(&proof(message)).unwrap_err();
        assert!(matches!(err, WithdrawalError::MalformedMessage { .. }));
    }

    #[test]
    fn test_missing_proof_is_rejected() {
        let mut proof = proof(token_message(L2_BRIDGE));
        proof.merkle_proof.clear();
        assert_eq!(finalizer().validate(&proof), Err(WithdrawalError::MissingProof));
    }

    #[test]
    fn test_checks_run_in_order() {
        // A foreign sender with a bad selector reports the selector.
        let mut message = token_message(STRANGER);
        message[0] ^= 0xff;
        let mut proof = proof(message);
        proof.merkle_proof.clear();
        assert!(matches!(
            finalizer().validate(&proof),
            Err(WithdrawalError::WrongSelector { .. })
        ));
    }

    #[test]
    fn test_custom_padded_layout() {
        let layout = MessageLayout::Padded { selector: [1, 2, 3, 4], payload_len: 0 };
        let mut message = vec![1, 2, 3, 4];
        message.extend_from_slice(L2_BRIDGE.into_word().as_slice());
        let parsed = finalizer().with_layout(layout).parse_message(&message).unwrap();
        assert_eq!(parsed.l2_sender, L2_BRIDGE);
        assert!(parsed.payload.is_empty());
    }

    #[test]
    fn test_valid_eth_withdrawal() {
        let parsed = eth_finalizer().parse_message(&eth_message(L1_BRIDGE, L2_BRIDGE)).unwrap();
        assert_eq!(parsed.l2_sender, L2_BRIDGE);
        assert_eq!(parsed.l1_receiver, Some(L1_BRIDGE));
        assert_eq!(parsed.eth_amount(), Some(U256::from(1_000u64)));
    }

    #[test]
    fn test_eth_withdrawal_golden_message() {
        // selector || l1Receiver || amount (1000) || l2Sender || l1WethReceiver
        let message = hex!(
            "0fdef251100000000000000000000000000000000000000100000000000000000000000000000000000000000000000000000000000003e833333333333333333333333333333333333333335555555555555555555555555555555555555555"
        );
        assert_eq!(message.as_slice(), eth_message(L1_BRIDGE, L2_BRIDGE).as_slice());
        assert!(eth_finalizer().validate(&proof(message.to_vec())).is_ok());

        // The selector of the entry point without a chain id is not accepted.
        let mut legacy = message;
        legacy[..4].copy_from_slice(&[0x6c, 0x09, 0x60, 0xf9]);
        assert_eq!(
            eth_finalizer().validate(&proof(legacy.to_vec())),
            Err(WithdrawalError::WrongSelector {
                expected: "0x0fdef251".to_string(),
                actual: "0x6c0960f9".to_string(),
            })
        );
    }

    #[rstest]
    #[case::empty(Vec::new())]
    #[case::random_selector(vec![0xab; ETH_WITHDRAWAL_MESSAGE_LEN])]
    #[case::foreign_receiver(eth_message(STRANGER, L2_BRIDGE))]
    #[case::foreign_sender(eth_message(L1_BRIDGE, STRANGER))]
    fn test_eth_withdrawal_rejections(#[case] message: Vec<u8>) {
        let err = eth_finalizer().validate(&proof(message.clone())).unwrap_err();
        match err {
            WithdrawalError::MalformedMessage { .. } => assert!(message.is_empty()),
            WithdrawalError::WrongSelector { .. } => assert_eq!(message[0], 0xab),
            WithdrawalError::UnauthorizedReceiver { actual, .. } => assert_eq!(actual, STRANGER),
            WithdrawalError::UnauthorizedSender { actual, .. } => assert_eq!(actual, STRANGER),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_verify_inclusion() {
        let proof = proof(token_message(L2_BRIDGE));
        let root = b256!("a45da89fd155ea1f15cebfc6af72b2a2bf74ab419669d564f404953e08750906");
        assert_eq!(finalizer().verify_inclusion(&proof, root), Ok(()));
        assert_eq!(
            finalizer().verify_inclusion(&proof, B256::ZERO),
            Err(WithdrawalError::InclusionMismatch { expected: B256::ZERO, computed: root })
        );
    }

    #[test]
    fn test_proof_deserializes_from_node_json() {
        let json = r#"{
            "l1BatchNumber": 42,
            "l2MessageIndex": 5,
            "l2TxNumberInBlock": 7,
            "message": "0x11a2ccc1",
            "proof": ["0x0101010101010101010101010101010101010101010101010101010101010101"]
        }"#;
        let proof: WithdrawalProof = serde_json::from_str(json).unwrap();
        assert_eq!(proof.l1_batch_number, 42);
        assert_eq!(proof.message, Bytes::from(vec![0x11, 0xa2, 0xcc, 0xc1]));
        assert_eq!(proof.merkle_proof, vec![B256::repeat_byte(1)]);
    }
}
