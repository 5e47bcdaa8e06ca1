//! Configuration types and validation for the bridge services.

use std::time::Duration;

use alloy_primitives::Address;
use backon::ExponentialBuilder;
use era_bridge_primitives::{
    DEPLOY_L2_BRIDGE_COUNTERPART_GAS_LIMIT, MIN_INIT_CONFIRMATIONS, MessageLayout,
    PRIORITY_TX_MAX_GAS_LIMIT, PUBLISH_BYTECODES_L1_GAS_LIMIT, REQUIRED_L2_GAS_PRICE_PER_PUBDATA,
    SafetyMargin, WethTokenUpgrade,
};
use thiserror::Error;
use url::Url;

/// Default number of attempts for retried RPC reads.
pub const DEFAULT_RPC_MAX_RETRIES: u32 = 5;

/// Default initial delay between RPC read retries.
pub const DEFAULT_RETRY_INITIAL_DELAY: Duration = Duration::from_millis(100);

/// Default maximum delay between RPC read retries.
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(10);

/// Errors that can occur during configuration validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid URL format.
    #[error("invalid {field} URL: {reason}")]
    InvalidUrl {
        /// The field name that contains the invalid URL.
        field: &'static str,
        /// The reason the URL is invalid.
        reason: String,
    },
    /// A field value is out of the allowed range.
    #[error("{field} must be {constraint}, got {value}")]
    OutOfRange {
        /// The field name that is out of range.
        field: &'static str,
        /// The constraint description.
        constraint: &'static str,
        /// The actual value.
        value: String,
    },
    /// An address that must be set is zero.
    #[error("{field} must be a non-zero address")]
    ZeroAddress {
        /// The field name holding the zero address.
        field: &'static str,
    },
}

/// Validate that a URL has a scheme and host.
pub fn validate_url(url: &Url, field: &'static str) -> Result<(), ConfigError> {
    if url.scheme().is_empty() {
        return Err(ConfigError::InvalidUrl { field, reason: "missing scheme".to_string() });
    }

    if url.host().is_none() {
        return Err(ConfigError::InvalidUrl { field, reason: "missing host".to_string() });
    }

    Ok(())
}

fn validate_non_zero(address: Address, field: &'static str) -> Result<(), ConfigError> {
    if address.is_zero() {
        return Err(ConfigError::ZeroAddress { field });
    }
    Ok(())
}

/// Where the bridge lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// URL of the L1 RPC endpoint.
    pub rpc_endpoint: Url,
    /// Address of the bridge on L1.
    pub bridge_l1_address: Address,
    /// Address of the bridge's counterpart on L2.
    ///
    /// Zero until the counterpart is deployed.
    pub bridge_l2_counterpart_address: Address,
    /// Chain id of the L1.
    pub chain_id: u64,
}

impl BridgeConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(&self.rpc_endpoint, "rpc-endpoint")?;
        validate_non_zero(self.bridge_l1_address, "bridge-l1-address")?;
        if self.chain_id == 0 {
            return Err(ConfigError::OutOfRange {
                field: "chain-id",
                constraint: "greater than 0",
                value: self.chain_id.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the L2 counterpart, which must be set.
    pub fn require_counterpart(&self) -> Result<Address, ConfigError> {
        validate_non_zero(self.bridge_l2_counterpart_address, "bridge-l2-counterpart-address")?;
        Ok(self.bridge_l2_counterpart_address)
    }
}

/// Parameters of the bridge initialization sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitConfig {
    /// Address of the L1 mailbox that accepts priority transactions.
    pub mailbox_address: Address,
    /// Governor of the bridge. Read from the mailbox when unset.
    pub governor: Option<Address>,
    /// L2 gas limit of the bytecode publication.
    pub priority_tx_max_gas_limit: u64,
    /// L2 gas limit of each counterpart deployment.
    pub deploy_counterpart_gas_limit: u64,
    /// L2 gas paid per byte of pubdata.
    pub gas_per_pubdata_byte: u64,
    /// L1 gas limit of the publication transaction.
    pub publish_l1_gas_limit: u64,
    /// Blocks each transaction must be buried under.
    pub confirmations: u64,
    /// Margin applied to the publication cost.
    pub safety_margin: SafetyMargin,
    /// L1 gas price in wei. Read from the node when unset.
    pub gas_price: Option<u128>,
    /// First nonce to use. Read from the node when unset.
    pub nonce: Option<u64>,
}

impl InitConfig {
    /// Creates a configuration with the protocol defaults.
    pub const fn new(mailbox_address: Address) -> Self {
        Self {
            mailbox_address,
            governor: None,
            priority_tx_max_gas_limit: PRIORITY_TX_MAX_GAS_LIMIT,
            deploy_counterpart_gas_limit: DEPLOY_L2_BRIDGE_COUNTERPART_GAS_LIMIT,
            gas_per_pubdata_byte: REQUIRED_L2_GAS_PRICE_PER_PUBDATA,
            publish_l1_gas_limit: PUBLISH_BYTECODES_L1_GAS_LIMIT,
            confirmations: MIN_INIT_CONFIRMATIONS,
            safety_margin: SafetyMargin::DOUBLE,
            gas_price: None,
            nonce: None,
        }
    }

    /// Sets the governor.
    pub const fn with_governor(mut self, governor: Address) -> Self {
        self.governor = Some(governor);
        self
    }

    /// Sets the L1 gas price.
    pub const fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Sets the first nonce.
    pub const fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Sets the publication safety margin.
    pub const fn with_safety_margin(mut self, safety_margin: SafetyMargin) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_non_zero(self.mailbox_address, "mailbox-address")?;
        if self.confirmations < MIN_INIT_CONFIRMATIONS {
            return Err(ConfigError::OutOfRange {
                field: "confirmations",
                constraint: "at least 2",
                value: self.confirmations.to_string(),
            });
        }
        for (field, limit) in [
            ("priority-tx-max-gas-limit", self.priority_tx_max_gas_limit),
            ("deploy-counterpart-gas-limit", self.deploy_counterpart_gas_limit),
            ("publish-l1-gas-limit", self.publish_l1_gas_limit),
        ] {
            if limit == 0 {
                return Err(ConfigError::OutOfRange {
                    field,
                    constraint: "greater than 0",
                    value: limit.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Parameters of the L2 WETH token upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WethInitConfig {
    /// Address of the L1 mailbox that accepts priority transactions.
    pub mailbox_address: Address,
    /// Token, implementation and bridge addresses.
    pub upgrade: WethTokenUpgrade,
    /// Margin applied to the request cost when submitting.
    pub safety_margin: SafetyMargin,
    /// Blocks the submission must be buried under.
    pub confirmations: u64,
    /// L1 gas price in wei. Read from the node when unset.
    pub gas_price: Option<u128>,
    /// Nonce of the submission. Read from the node when unset.
    pub nonce: Option<u64>,
}

impl WethInitConfig {
    /// Creates a configuration with a doubled fee and one confirmation.
    pub const fn new(mailbox_address: Address, upgrade: WethTokenUpgrade) -> Self {
        Self {
            mailbox_address,
            upgrade,
            safety_margin: SafetyMargin::DOUBLE,
            confirmations: 1,
            gas_price: None,
            nonce: None,
        }
    }

    /// Sets the L1 gas price.
    pub const fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    /// Sets the nonce.
    pub const fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_non_zero(self.mailbox_address, "mailbox-address")?;
        validate_non_zero(self.upgrade.token_proxy, "l2-weth-token-proxy")?;
        validate_non_zero(self.upgrade.token_implementation, "l2-weth-token-impl")?;
        validate_non_zero(self.upgrade.l2_weth_bridge, "l2-weth-bridge")?;
        validate_non_zero(self.upgrade.l1_weth_token, "l1-weth-token")?;
        if self.confirmations == 0 {
            return Err(ConfigError::OutOfRange {
                field: "confirmations",
                constraint: "greater than 0",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// How withdrawals are checked before finalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalizerConfig {
    /// Layout of the withdrawal message.
    pub layout: MessageLayout,
    /// Mailbox to read batch roots from. Inclusion is not checked when unset.
    pub mailbox_address: Option<Address>,
}

impl FinalizerConfig {
    /// Enables inclusion checks against the batch roots stored by `mailbox`.
    pub const fn with_inclusion_check(mut self, mailbox: Address) -> Self {
        self.mailbox_address = Some(mailbox);
        self
    }

    /// Sets the message layout.
    pub const fn with_layout(mut self, layout: MessageLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Retry configuration for RPC reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_attempts: u32,
    /// Initial delay for exponential backoff.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RPC_MAX_RETRIES,
            initial_delay: DEFAULT_RETRY_INITIAL_DELAY,
            max_delay: DEFAULT_RETRY_MAX_DELAY,
        }
    }
}

impl RetryConfig {
    /// Creates a `backon` [`ExponentialBuilder`] from this configuration.
    pub fn to_backoff_builder(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts as usize)
            .with_jitter()
    }
}
