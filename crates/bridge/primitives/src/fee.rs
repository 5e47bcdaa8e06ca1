//! Gas parameters and the priority transaction base-cost formula.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{
    FAIR_L2_GAS_PRICE, GasParamsError, GasParamsResult, L1_GAS_PER_PUBDATA_BYTE,
    PRIORITY_TX_MAX_GAS_LIMIT,
};

/// Gas parameters of a priority transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasParams {
    /// L1 gas price, in wei.
    pub gas_price: u128,
    /// Gas limit of the L2 execution.
    pub l2_gas_limit: u64,
    /// Maximum L2 gas paid per byte of published pubdata.
    pub gas_per_pubdata_byte: u64,
}

impl GasParams {
    /// Creates a new set of gas parameters.
    pub const fn new(gas_price: u128, l2_gas_limit: u64, gas_per_pubdata_byte: u64) -> Self {
        Self { gas_price, l2_gas_limit, gas_per_pubdata_byte }
    }

    /// Rejects parameters no priority transaction can be submitted with.
    pub const fn validate(&self) -> GasParamsResult<()> {
        if self.l2_gas_limit == 0 {
            return Err(GasParamsError::ZeroL2GasLimit);
        }
        if self.gas_per_pubdata_byte == 0 {
            return Err(GasParamsError::ZeroGasPerPubdata);
        }
        if self.l2_gas_limit > PRIORITY_TX_MAX_GAS_LIMIT {
            return Err(GasParamsError::L2GasLimitTooHigh {
                limit: self.l2_gas_limit,
                max: PRIORITY_TX_MAX_GAS_LIMIT,
            });
        }
        Ok(())
    }
}

/// Multiplier applied on top of the quoted base cost before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SafetyMargin {
    numerator: u64,
    denominator: u64,
}

impl Default for SafetyMargin {
    fn default() -> Self {
        Self::DOUBLE
    }
}

impl SafetyMargin {
    /// Submits exactly the quoted cost.
    pub const NONE: Self = Self { numerator: 1, denominator: 1 };

    /// Submits twice the quoted cost.
    pub const DOUBLE: Self = Self { numerator: 2, denominator: 1 };

    /// Creates a margin of `numerator / denominator`, which must be at least 1.
    pub const fn new(numerator: u64, denominator: u64) -> GasParamsResult<Self> {
        if denominator == 0 || numerator < denominator {
            return Err(GasParamsError::InvalidMargin { numerator, denominator });
        }
        Ok(Self { numerator, denominator })
    }

    /// Creates an integer margin.
    pub const fn times(factor: u64) -> GasParamsResult<Self> {
        Self::new(factor, 1)
    }

    /// Returns the margin numerator.
    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Returns the margin denominator.
    pub const fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Applies the margin to `cost`. The result is never below `cost`.
    pub fn apply(&self, cost: U256) -> U256 {
        cost.saturating_mul(U256::from(self.numerator)) / U256::from(self.denominator)
    }
}

impl std::fmt::Display for SafetyMargin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}x", self.numerator)
        } else {
            write!(f, "{}/{}x", self.numerator, self.denominator)
        }
    }
}

/// In-process model of the mailbox `l2TransactionBaseCost` formula.
///
/// The L2 gas price is the fair price, raised when the L1 cost of publishing pubdata
/// would not be covered: `max(FAIR_L2_GAS_PRICE, ceil(17 * gasPrice / gasPerPubdata))`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalFeeModel;

impl LocalFeeModel {
    /// Returns the L2 gas price charged for the given parameters.
    pub fn l2_gas_price(&self, params: &GasParams) -> GasParamsResult<U256> {
        params.validate()?;
        let pubdata_price = U256::from(L1_GAS_PER_PUBDATA_BYTE) * U256::from(params.gas_price);
        let per_pubdata = U256::from(params.gas_per_pubdata_byte);
        let min_l2_gas_price = (pubdata_price + per_pubdata - U256::from(1)) / per_pubdata;
        Ok(min_l2_gas_price.max(U256::from(FAIR_L2_GAS_PRICE)))
    }

    /// Returns the base cost of a priority transaction, in wei.
    pub fn base_cost(&self, params: &GasParams) -> GasParamsResult<U256> {
        Ok(self.l2_gas_price(params)? * U256::from(params.l2_gas_limit))
    }
}
