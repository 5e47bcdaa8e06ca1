//! Priority transaction cost estimation.

use alloy_primitives::U256;
use async_trait::async_trait;
use era_bridge_primitives::{GasParams, LocalFeeModel, SafetyMargin};
use tracing::debug;

use crate::BridgeResult;

/// Source of the minimum value a priority transaction must carry.
#[async_trait]
pub trait BaseCostOracle: Send + Sync {
    /// Returns the base cost of a priority transaction with `params`.
    async fn l2_transaction_base_cost(&self, params: &GasParams) -> BridgeResult<U256>;
}

#[async_trait]
impl BaseCostOracle for LocalFeeModel {
    async fn l2_transaction_base_cost(&self, params: &GasParams) -> BridgeResult<U256> {
        Ok(self.base_cost(params)?)
    }
}

/// A base cost together with the value to attach after the margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeEstimate {
    /// Authoritative lower bound returned by the oracle.
    pub base_cost: U256,
    /// Margin applied on top of the base cost.
    pub margin: SafetyMargin,
    /// Value to attach to the transaction.
    pub value: U256,
}

/// Quotes priority transaction costs from a [`BaseCostOracle`].
#[derive(Debug, Clone)]
pub struct PriorityFeeEstimator<O> {
    oracle: O,
}

impl<O: BaseCostOracle> PriorityFeeEstimator<O> {
    /// Creates an estimator backed by `oracle`.
    pub const fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Returns the oracle.
    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Returns the base cost of a priority transaction.
    ///
    /// Invalid parameters are rejected before the oracle is queried.
    pub async fn estimate_base_cost(&self, params: GasParams) -> BridgeResult<U256> {
        params.validate()?;
        let base_cost = self.oracle.l2_transaction_base_cost(&params).await?;
        debug!(
            gas_price = params.gas_price,
            l2_gas_limit = params.l2_gas_limit,
            %base_cost,
            "Estimated priority transaction base cost"
        );
        Ok(base_cost)
    }

    /// Returns the base cost of a priority transaction and the value to attach with `margin`.
    pub async fn estimate(
        &self,
        params: GasParams,
        margin: SafetyMargin,
    ) -> BridgeResult<FeeEstimate> {
        let base_cost = self.estimate_base_cost(params).await?;
        Ok(FeeEstimate { base_cost, margin, value: margin.apply(base_cost) })
    }
}
