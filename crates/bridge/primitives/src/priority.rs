//! L1 to L2 priority transactions.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;

use crate::{GasParams, GasParamsError, GasParamsResult, contracts::IMailbox};

/// A transaction requested on L2 through the L1 mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTransaction {
    /// L2 target of the call.
    pub to: Address,
    /// Value transferred to `to` on L2.
    pub l2_value: U256,
    /// L2 calldata.
    pub calldata: Bytes,
    /// Gas limit of the L2 execution.
    pub l2_gas_limit: u64,
    /// Maximum L2 gas paid per byte of pubdata.
    pub gas_per_pubdata_byte: u64,
    /// Bytecodes published alongside the transaction.
    pub factory_deps: Vec<Bytes>,
    /// Receiver of unspent L2 gas.
    pub refund_recipient: Address,
    /// Amount paid to the mailbox for the request.
    pub required_value: U256,
}

impl PriorityTransaction {
    /// Creates a call to `to` with no value, calldata or dependencies.
    pub const fn new(to: Address, l2_gas_limit: u64, gas_per_pubdata_byte: u64) -> Self {
        Self {
            to,
            l2_value: U256::ZERO,
            calldata: Bytes::new(),
            l2_gas_limit,
            gas_per_pubdata_byte,
            factory_deps: Vec::new(),
            refund_recipient: Address::ZERO,
            required_value: U256::ZERO,
        }
    }

    /// Creates a transaction that only publishes `factory_deps` on L2.
    pub fn publish_bytecodes(
        factory_deps: Vec<Bytes>,
        l2_gas_limit: u64,
        gas_per_pubdata_byte: u64,
    ) -> Self {
        let mut tx = Self::new(Address::ZERO, l2_gas_limit, gas_per_pubdata_byte);
        tx.factory_deps = factory_deps;
        tx
    }

    /// Sets the L2 calldata.
    pub fn with_calldata(mut self, calldata: Bytes) -> Self {
        self.calldata = calldata;
        self
    }

    /// Sets the receiver of unspent L2 gas.
    pub const fn with_refund_recipient(mut self, refund_recipient: Address) -> Self {
        self.refund_recipient = refund_recipient;
        self
    }

    /// Sets the amount paid for the request.
    pub const fn with_required_value(mut self, required_value: U256) -> Self {
        self.required_value = required_value;
        self
    }

    /// Returns the gas parameters of the transaction at the given L1 gas price.
    pub const fn gas_params(&self, gas_price: u128) -> GasParams {
        GasParams::new(gas_price, self.l2_gas_limit, self.gas_per_pubdata_byte)
    }

    /// Checks that the paid amount covers `base_cost` plus the L2 value.
    pub fn ensure_covers(&self, base_cost: U256) -> GasParamsResult<()> {
        let required = base_cost.saturating_add(self.l2_value);
        if self.required_value < required {
            return Err(GasParamsError::InsufficientValue {
                required,
                provided: self.required_value,
            });
        }
        Ok(())
    }

    /// Encodes the mailbox `requestL2Transaction` call.
    ///
    /// The payment travels as the `_amount` argument, so the L1 call itself carries no value.
    pub fn calldata(&self) -> Bytes {
        IMailbox::requestL2TransactionCall {
            _request: IMailbox::L2TransactionRequest {
                l2Contract: self.to,
                l2Value: self.l2_value,
                l2GasLimit: U256::from(self.l2_gas_limit),
                l2GasPerPubdataByteLimit: U256::from(self.gas_per_pubdata_byte),
            },
            _calldata: self.calldata.clone(),
            _factoryDeps: self.factory_deps.clone(),
            _refundRecipient: self.refund_recipient,
            _amount: self.required_value,
        }
        .abi_encode()
        .into()
    }
}
