//! L1 RPC access.

mod client;
pub use client::{AlloyL1Client, DEFAULT_RECEIPT_TIMEOUT, L1ClientConfig};

mod error;
pub use error::{RpcError, RpcResult};

mod signer;
pub use signer::LocalTransactionSigner;

mod traits;
pub use traits::{L1Client, TransactionSigner};

mod types;
pub use types::{L1Transaction, SignedTransaction, TransactionOutcome};
