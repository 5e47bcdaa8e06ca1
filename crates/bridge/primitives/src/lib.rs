#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod constants;
pub use constants::*;

mod errors;
pub use errors::{
    BytecodeError, BytecodeResult, GasParamsError, GasParamsResult, InitStateError, InputError,
    WithdrawalError, WithdrawalResult,
};

mod bytecode;
pub use bytecode::{BytecodeHash, BytecodeHasher, hash_bytecode};

mod address;
pub use address::{
    DeploymentSpec, SenderKind, address_from_slice, apply_l1_to_l2_alias, b256_from_slice,
    derive_create2_address, undo_l1_to_l2_alias,
};

mod fee;
pub use fee::{GasParams, LocalFeeModel, SafetyMargin};

pub mod contracts;

mod priority;
pub use priority::PriorityTransaction;

mod init;
pub use init::{
    BridgeBytecodes, BridgeContractHashes, BridgeInitState, BridgeL2Addresses,
    bridge_proxy_constructor_input, l1_bridge_initialize_calldata, l2_bridge_initialize_calldata,
};

mod merkle;
pub use merkle::{L2_LOG_LEN, calculate_root, l2_log_leaf};

mod weth;
pub use weth::WethTokenUpgrade;

mod withdrawal;
pub use withdrawal::{
    ETH_WITHDRAWAL_MESSAGE_LEN, FinalizeWithdrawalCall, MessageLayout,
    TOKEN_WITHDRAWAL_PAYLOAD_LEN, WithdrawalFinalizer, WithdrawalMessage, WithdrawalProof,
};
