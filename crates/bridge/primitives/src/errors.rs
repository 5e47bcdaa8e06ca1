//! Error types for the bridge protocol computations.

use alloy_primitives::{Address, B256, U256};
use thiserror::Error;

use crate::BridgeInitState;

/// A [Result] type alias where the error is [`BytecodeError`].
pub type BytecodeResult<T> = Result<T, BytecodeError>;

/// Reasons a bytecode cannot be hashed for deployment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BytecodeError {
    /// The bytecode has no content.
    #[error("invalid bytecode: empty")]
    Empty,
    /// The bytecode length is not a whole number of words.
    #[error("invalid bytecode: length {len} is not a multiple of 32")]
    NotWordAligned {
        /// Length of the bytecode in bytes.
        len: usize,
    },
    /// The execution environment only runs bytecode with an odd number of words.
    #[error("invalid bytecode: {words} words, expected an odd count")]
    EvenWordCount {
        /// Length of the bytecode in words.
        words: usize,
    },
    /// The bytecode is larger than the deployable maximum.
    #[error("invalid bytecode: {words} words exceeds the maximum of {max}")]
    TooLong {
        /// Length of the bytecode in words.
        words: usize,
        /// Maximum accepted length in words.
        max: u16,
    },
}

/// Malformed fixed-width inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// An address was not exactly 20 bytes.
    #[error("invalid address: expected 20 bytes, got {len}")]
    InvalidAddress {
        /// Length of the rejected input.
        len: usize,
    },
    /// A hash was not exactly 32 bytes.
    #[error("invalid hash: expected 32 bytes, got {len}")]
    InvalidHash {
        /// Length of the rejected input.
        len: usize,
    },
    /// A 32-byte value does not carry a known bytecode hash version.
    #[error("invalid hash: unsupported bytecode hash prefix {version:#04x}{marker:02x}")]
    UnknownHashVersion {
        /// The version byte.
        version: u8,
        /// The byte following the version, which must be zero.
        marker: u8,
    },
}

/// A [Result] type alias where the error is [`GasParamsError`].
pub type GasParamsResult<T> = Result<T, GasParamsError>;

/// Invalid gas parameters for a priority transaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GasParamsError {
    /// The L2 gas limit is zero.
    #[error("invalid gas params: l2 gas limit must be non-zero")]
    ZeroL2GasLimit,
    /// The gas-per-pubdata limit is zero.
    #[error("invalid gas params: gas per pubdata byte must be non-zero")]
    ZeroGasPerPubdata,
    /// The L2 gas limit exceeds the priority transaction maximum.
    #[error("invalid gas params: l2 gas limit {limit} exceeds the maximum of {max}")]
    L2GasLimitTooHigh {
        /// The requested limit.
        limit: u64,
        /// The maximum accepted limit.
        max: u64,
    },
    /// A safety margin would lower the cost or divides by zero.
    #[error("invalid gas params: safety margin {numerator}/{denominator} must be at least 1")]
    InvalidMargin {
        /// Margin numerator.
        numerator: u64,
        /// Margin denominator.
        denominator: u64,
    },
    /// The value attached to a priority transaction does not cover its cost.
    #[error("invalid gas params: value {provided} does not cover the required {required}")]
    InsufficientValue {
        /// Minimum value the transaction must carry.
        required: U256,
        /// Value the transaction carries.
        provided: U256,
    },
}

/// A [Result] type alias where the error is [`WithdrawalError`].
pub type WithdrawalResult<T> = Result<T, WithdrawalError>;

/// Reasons a withdrawal cannot be finalized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalError {
    /// The message does not have the layout's shape.
    #[error("malformed withdrawal message: {reason}")]
    MalformedMessage {
        /// What is wrong with the message.
        reason: String,
    },
    /// The message does not start with the finalize selector.
    #[error("wrong selector: expected {expected}, got {actual}")]
    WrongSelector {
        /// Selector of the finalize entry point.
        expected: String,
        /// Selector found in the message.
        actual: String,
    },
    /// The message is addressed to a different L1 contract.
    #[error("unauthorized receiver: expected {expected}, got {actual}")]
    UnauthorizedReceiver {
        /// The configured L1 bridge.
        expected: Address,
        /// The receiver embedded in the message.
        actual: Address,
    },
    /// The message was not sent by the configured L2 counterpart.
    #[error("unauthorized sender: expected {expected}, got {actual}")]
    UnauthorizedSender {
        /// The configured L2 counterpart.
        expected: Address,
        /// The sender embedded in the message.
        actual: Address,
    },
    /// No Merkle proof accompanies the message.
    #[error("missing merkle proof")]
    MissingProof,
    /// The Merkle proof is deeper than any batch tree.
    #[error("merkle proof of length {len} is too long")]
    ProofTooLong {
        /// Number of nodes in the proof.
        len: usize,
    },
    /// The message index does not fit a tree of the proof's depth.
    #[error("message index {index} out of range for a proof of depth {depth}")]
    MessageIndexOutOfRange {
        /// Index of the message in the batch.
        index: u64,
        /// Depth of the proof.
        depth: usize,
    },
    /// The proof does not lead to the batch's logs root.
    #[error("inclusion mismatch: batch root {expected}, computed {computed}")]
    InclusionMismatch {
        /// Root committed on L1 for the batch.
        expected: B256,
        /// Root computed from the proof.
        computed: B256,
    },
}

/// Invalid bridge initialization state changes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStateError {
    /// The requested state is not the direct successor of the current one.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current state.
        from: BridgeInitState,
        /// Requested state.
        to: BridgeInitState,
    },
}
