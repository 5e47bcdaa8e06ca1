//! Clients for the L1 contracts the bridge reads from.

use alloy_primitives::Address;
use alloy_sol_types::SolCall;

use crate::{BridgeError, BridgeResult, rpc::L1Client};

mod l1_bridge;
pub use l1_bridge::L1BridgeClient;

mod mailbox;
pub use mailbox::MailboxClient;

/// Executes a view call and decodes its return value.
async fn call_view<C, T>(client: &C, to: Address, call: T) -> BridgeResult<T::Return>
where
    C: L1Client + ?Sized,
    T: SolCall + Send,
{
    let output = client.call_contract(to, call.abi_encode().into()).await?;
    T::abi_decode_returns(&output).map_err(|e| {
        BridgeError::Contract(format!("failed to decode {} output: {e}", T::SIGNATURE))
    })
}
