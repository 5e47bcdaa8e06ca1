//! Inclusion of L2 to L1 messages in a batch's logs tree.

use alloy_primitives::{Address, B256, keccak256};

use crate::{
    L2_LOG_SHARD_ID, L2_TO_L1_MESSENGER_ADDRESS, MAX_MERKLE_PROOF_LEN, WithdrawalError,
    WithdrawalResult,
};

/// Length of a serialized L2 to L1 log.
pub const L2_LOG_LEN: usize = 88;

/// Computes the tree leaf of the log emitted when `sender` sends `message` to L1.
///
/// The log is `shard (u8) || isService (bool) || txNumberInBatch (u16) || messenger ||
/// pad32(sender) || keccak256(message)`.
pub fn l2_log_leaf(tx_number_in_batch: u16, sender: Address, message: &[u8]) -> B256 {
    let mut log = Vec::with_capacity(L2_LOG_LEN);
    log.push(L2_LOG_SHARD_ID);
    log.push(1);
    log.extend_from_slice(&tx_number_in_batch.to_be_bytes());
    log.extend_from_slice(L2_TO_L1_MESSENGER_ADDRESS.as_slice());
    log.extend_from_slice(sender.into_word().as_slice());
    log.extend_from_slice(keccak256(message).as_slice());
    keccak256(log)
}

/// Folds `leaf` up the tree along `path`.
///
/// Bit `i` of `index` tells whether the node at depth `i` is a right child.
pub fn calculate_root(path: &[B256], index: u64, leaf: B256) -> WithdrawalResult<B256> {
    if path.is_empty() {
        return Err(WithdrawalError::MissingProof);
    }
    if path.len() >= MAX_MERKLE_PROOF_LEN {
        return Err(WithdrawalError::ProofTooLong { len: path.len() });
    }
    if path.len() < 64 && index >> path.len() != 0 {
        return Err(WithdrawalError::MessageIndexOutOfRange { index, depth: path.len() });
    }

    let mut node = leaf;
    let mut index = index;
    let mut pair = [0u8; 64];
    for sibling in path {
        let (left, right) = if index & 1 == 0 { (&node, sibling) } else { (sibling, &node) };
        pair[..32].copy_from_slice(left.as_slice());
        pair[32..].copy_from_slice(right.as_slice());
        node = keccak256(pair);
        index >>= 1;
    }
    Ok(node)
}
