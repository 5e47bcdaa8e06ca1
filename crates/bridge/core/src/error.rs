//! Error types for the bridge services.

use alloy_primitives::{Address, B256};
use era_bridge_primitives::{
    BytecodeError, GasParamsError, InitStateError, InputError, WithdrawalError,
};
use thiserror::Error;

use crate::{ArtifactError, ConfigError, rpc::RpcError};

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Main error type for the bridge services.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// RPC call failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Contract artifacts could not be loaded.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// A bytecode cannot be hashed.
    #[error(transparent)]
    Bytecode(#[from] BytecodeError),

    /// A fixed-width input is malformed.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Gas parameters are invalid.
    #[error(transparent)]
    GasParams(#[from] GasParamsError),

    /// A withdrawal failed validation.
    #[error(transparent)]
    Withdrawal(#[from] WithdrawalError),

    /// The bridge is not in the state an operation requires.
    #[error(transparent)]
    InitState(#[from] InitStateError),

    /// A contract returned data that does not decode.
    #[error("contract error: {0}")]
    Contract(String),

    /// The node serves a different chain than configured.
    #[error("chain id mismatch: configured {expected}, node reports {actual}")]
    ChainIdMismatch {
        /// Configured chain id.
        expected: u64,
        /// Chain id reported by the node.
        actual: u64,
    },

    /// A submitted transaction reverted.
    #[error("{stage} transaction {tx_hash} reverted")]
    TransactionReverted {
        /// Which step of the operation the transaction belongs to.
        stage: &'static str,
        /// Hash of the reverted transaction.
        tx_hash: B256,
    },

    /// The L1 bridge points at a different L2 counterpart than expected.
    #[error("L1 bridge reports counterpart {actual}, expected {expected}")]
    CounterpartMismatch {
        /// Counterpart derived from the deployment parameters.
        expected: Address,
        /// Counterpart reported by the L1 bridge.
        actual: Address,
    },

    /// The withdrawal was already finalized on L1.
    #[error("withdrawal {index} of batch {batch} is already finalized")]
    AlreadyFinalized {
        /// Batch of the withdrawal.
        batch: u64,
        /// Index of the withdrawal message in the batch.
        index: u64,
    },

    /// The batch has no logs root on L1 yet.
    #[error("batch {batch} is not executed on L1")]
    BatchNotExecuted {
        /// The batch number.
        batch: u64,
    },
}

impl BridgeError {
    /// Returns true if the operation may succeed when repeated later.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Rpc(e) => e.is_retryable(),
            Self::BatchNotExecuted { .. } => true,
            _ => false,
        }
    }
}
