#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod artifacts;
pub use artifacts::{ArtifactError, BridgeArtifacts, read_bytecode};

mod config;
pub use config::{
    BridgeConfig, ConfigError, DEFAULT_RETRY_INITIAL_DELAY, DEFAULT_RETRY_MAX_DELAY,
    DEFAULT_RPC_MAX_RETRIES, FinalizerConfig, InitConfig, RetryConfig, WethInitConfig,
    validate_url,
};

mod contracts;
pub use contracts::{L1BridgeClient, MailboxClient};

mod error;
pub use error::{BridgeError, BridgeResult};

mod estimator;
pub use estimator::{BaseCostOracle, FeeEstimate, PriorityFeeEstimator};

pub mod rpc;
pub use rpc::{
    AlloyL1Client, L1Client, L1ClientConfig, LocalTransactionSigner, RpcError, RpcResult,
    TransactionSigner,
};

mod sequencer;
pub use sequencer::{BridgeInitSequencer, InitOutcome, InitPlan};

mod weth;
pub use weth::{GovernanceCall, WethTokenInitializer};

mod withdrawal;
pub use withdrawal::WithdrawalService;

#[cfg(test)]
pub(crate) mod test_utils;
