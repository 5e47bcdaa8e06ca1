//! CLI definition for the bridge binary.

use std::{path::PathBuf, time::Duration};

use alloy_primitives::{Address, B256, Bytes, U256, utils::parse_units};
use clap::{
    Args, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Color, Style},
    },
};
use era_bridge_core::{
    BridgeConfig, DEFAULT_RETRY_INITIAL_DELAY, DEFAULT_RETRY_MAX_DELAY, DEFAULT_RPC_MAX_RETRIES,
    InitConfig, L1ClientConfig, RetryConfig, WethInitConfig,
};
use era_bridge_primitives::{
    DEPLOY_L2_BRIDGE_COUNTERPART_GAS_LIMIT, MIN_INIT_CONFIRMATIONS, MessageLayout,
    REQUIRED_L2_GAS_PRICE_PER_PUBDATA, SafetyMargin, WethTokenUpgrade,
};
use eyre::eyre;
use url::Url;

use crate::logging::LogArgs;

/// Drives the L1 <> L2 ERC20 bridge: address derivation, fee quotes, initialization
/// and withdrawal finalization.
#[derive(Debug, Clone, Parser)]
#[command(name = "era-bridge")]
#[command(version, about, long_about = None)]
#[command(styles = styles())]
pub(crate) struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging configuration arguments.
    #[command(flatten)]
    pub logging: LogArgs,
}

const fn styles() -> Styles {
    Styles::styled()
        .usage(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .header(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .valid(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

/// Available commands.
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Commands {
    /// Print the L2 address of a `CREATE2` deployment.
    DeriveAddress(DeriveAddressArgs),
    /// Print the bytecode hash of a hex-encoded bytecode file.
    HashBytecode(HashBytecodeArgs),
    /// Quote the value a priority transaction must carry.
    EstimateCost(EstimateCostArgs),
    /// Publish the counterpart bytecodes and initialize the L1 bridge.
    InitBridges(InitBridgesArgs),
    /// Validate a withdrawal proof and print the finalize call. Never submits.
    FinalizeWithdrawal(FinalizeWithdrawalArgs),
    /// Upgrade the L2 WETH token and bind it to its bridge. Prints the governance call
    /// unless a private key is given.
    InitL2WethToken(InitL2WethTokenArgs),
}

/// Connection and bridge pair settings.
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "Bridge")]
pub(crate) struct BridgeArgs {
    /// URL of the L1 RPC endpoint.
    #[arg(long = "rpc-endpoint", env = "BRIDGE_RPC_ENDPOINT", value_parser = parse_url)]
    pub rpc_endpoint: Option<Url>,

    /// Address of the L1 bridge.
    #[arg(long = "bridge-l1-address", env = "BRIDGE_L1_ADDRESS", value_parser = parse_address)]
    pub bridge_l1_address: Address,

    /// Address of the L2 counterpart. Zero until the bridge is initialized.
    #[arg(
        long = "bridge-l2-counterpart-address",
        env = "BRIDGE_L2_COUNTERPART_ADDRESS",
        default_value_t = Address::ZERO,
        value_parser = parse_address
    )]
    pub bridge_l2_counterpart_address: Address,

    /// Chain id of the L1.
    #[arg(long = "chain-id", env = "BRIDGE_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Maximum number of retries for RPC reads.
    #[arg(
        long = "rpc-max-retries",
        env = "BRIDGE_RPC_MAX_RETRIES",
        default_value_t = DEFAULT_RPC_MAX_RETRIES
    )]
    pub rpc_max_retries: u32,

    /// Initial delay between RPC read retries.
    #[arg(
        long = "rpc-retry-initial-delay",
        env = "BRIDGE_RPC_RETRY_INITIAL_DELAY",
        default_value_t = humantime::Duration::from(DEFAULT_RETRY_INITIAL_DELAY)
    )]
    pub rpc_retry_initial_delay: humantime::Duration,

    /// Maximum delay between RPC read retries.
    #[arg(
        long = "rpc-retry-max-delay",
        env = "BRIDGE_RPC_RETRY_MAX_DELAY",
        default_value_t = humantime::Duration::from(DEFAULT_RETRY_MAX_DELAY)
    )]
    pub rpc_retry_max_delay: humantime::Duration,
}

impl BridgeArgs {
    /// Builds and validates the bridge configuration. Requires the endpoint and chain id.
    pub(crate) fn to_config(&self) -> eyre::Result<BridgeConfig> {
        let config = BridgeConfig {
            rpc_endpoint: self
                .rpc_endpoint
                .clone()
                .ok_or_else(|| eyre!("--rpc-endpoint is required"))?,
            bridge_l1_address: self.bridge_l1_address,
            bridge_l2_counterpart_address: self.bridge_l2_counterpart_address,
            chain_id: self.chain_id.ok_or_else(|| eyre!("--chain-id is required"))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns the retry policy for RPC reads.
    pub(crate) fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.rpc_max_retries,
            initial_delay: self.rpc_retry_initial_delay.into(),
            max_delay: self.rpc_retry_max_delay.into(),
        }
    }

    /// Returns the client configuration for `config`.
    pub(crate) fn client_config(&self, config: &BridgeConfig) -> L1ClientConfig {
        L1ClientConfig::new(config.rpc_endpoint.clone()).with_retry_config(self.retry_config())
    }
}

/// Arguments of `derive-address`.
#[derive(Debug, Clone, Args)]
pub(crate) struct DeriveAddressArgs {
    /// Deployer address.
    #[arg(long, value_parser = parse_address)]
    pub deployer: Address,

    /// Hash of the deployed bytecode.
    #[arg(long = "bytecode-hash")]
    pub bytecode_hash: B256,

    /// ABI-encoded constructor arguments.
    #[arg(long = "constructor-input", default_value = "0x")]
    pub constructor_input: Bytes,

    /// `CREATE2` salt. Zero when unset.
    #[arg(long)]
    pub salt: Option<B256>,

    /// The deployer is an L1 contract; apply the L1 to L2 alias first.
    #[arg(long)]
    pub alias: bool,
}

/// Arguments of `hash-bytecode`.
#[derive(Debug, Clone, Args)]
pub(crate) struct HashBytecodeArgs {
    /// File holding the hex-encoded bytecode.
    pub path: PathBuf,

    /// Largest accepted bytecode, in 32-byte words.
    #[arg(long = "max-words")]
    pub max_words: Option<u16>,
}

/// Arguments of `estimate-cost`.
#[derive(Debug, Clone, Args)]
pub(crate) struct EstimateCostArgs {
    /// URL of the L1 RPC endpoint.
    #[arg(long = "rpc-endpoint", env = "BRIDGE_RPC_ENDPOINT", value_parser = parse_url)]
    pub rpc_endpoint: Option<Url>,

    /// Address of the mailbox to quote from.
    #[arg(long = "mailbox-address", env = "BRIDGE_MAILBOX_ADDRESS", value_parser = parse_address)]
    pub mailbox_address: Option<Address>,

    /// L1 gas price in gwei. Read from the node when unset.
    #[arg(long = "gas-price", value_parser = parse_gwei)]
    pub gas_price: Option<u128>,

    /// L2 gas limit of the priority transaction.
    #[arg(long = "l2-gas-limit", default_value_t = DEPLOY_L2_BRIDGE_COUNTERPART_GAS_LIMIT)]
    pub l2_gas_limit: u64,

    /// L2 gas per pubdata byte.
    #[arg(long = "gas-per-pubdata", default_value_t = REQUIRED_L2_GAS_PRICE_PER_PUBDATA)]
    pub gas_per_pubdata: u64,

    /// Multiplier on the base cost, as `N` or `N/D`.
    #[arg(long, default_value = "2", value_parser = parse_margin)]
    pub margin: SafetyMargin,

    /// Use the local fee model instead of the mailbox. Requires `--gas-price`.
    #[arg(long)]
    pub offline: bool,
}

/// Arguments of `init-bridges`.
#[derive(Debug, Clone, Args)]
pub(crate) struct InitBridgesArgs {
    /// Bridge settings.
    #[command(flatten)]
    pub bridge: BridgeArgs,

    /// Hex-encoded private key of the deployer.
    #[arg(long = "private-key", env = "BRIDGE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,

    /// Directory holding the compiled L2 contract artifacts.
    #[arg(long = "artifacts-dir", env = "BRIDGE_ARTIFACTS_DIR")]
    pub artifacts_dir: PathBuf,

    /// Address of the mailbox.
    #[arg(long = "mailbox-address", env = "BRIDGE_MAILBOX_ADDRESS", value_parser = parse_address)]
    pub mailbox_address: Address,

    /// L2 governor. Read from the mailbox when unset.
    #[arg(long, value_parser = parse_address)]
    pub governor: Option<Address>,

    /// L1 gas price in gwei. Read from the node when unset.
    #[arg(long = "gas-price", value_parser = parse_gwei)]
    pub gas_price: Option<u128>,

    /// Nonce of the first transaction. Read from the node when unset.
    #[arg(long)]
    pub nonce: Option<u64>,

    /// Multiplier on the publication base cost, as `N` or `N/D`.
    #[arg(long, default_value = "2", value_parser = parse_margin)]
    pub margin: SafetyMargin,

    /// Confirmations to wait for on each transaction.
    #[arg(long, default_value_t = MIN_INIT_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Time to wait for each receipt.
    #[arg(long = "receipt-timeout", default_value = "5m", value_parser = parse_duration)]
    pub receipt_timeout: Duration,
}

impl InitBridgesArgs {
    /// Returns the sequencer configuration.
    pub(crate) fn init_config(&self) -> InitConfig {
        let mut config = InitConfig::new(self.mailbox_address).with_safety_margin(self.margin);
        config.confirmations = self.confirmations;
        if let Some(governor) = self.governor {
            config = config.with_governor(governor);
        }
        if let Some(gas_price) = self.gas_price {
            config = config.with_gas_price(gas_price);
        }
        if let Some(nonce) = self.nonce {
            config = config.with_nonce(nonce);
        }
        config
    }
}

/// Withdrawal message layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LayoutArg {
    /// ERC20 bridge messages: selector, padded sender, payload.
    #[default]
    Padded,
    /// Packed ETH withdrawal messages.
    Eth,
}

impl From<LayoutArg> for MessageLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::Padded => Self::default(),
            LayoutArg::Eth => Self::EthWithdrawal,
        }
    }
}

/// Arguments of `finalize-withdrawal`.
#[derive(Debug, Clone, Args)]
pub(crate) struct FinalizeWithdrawalArgs {
    /// Bridge settings.
    #[command(flatten)]
    pub bridge: BridgeArgs,

    /// JSON file holding the withdrawal proof.
    #[arg(long)]
    pub proof: PathBuf,

    /// Layout of the withdrawal message.
    #[arg(long, default_value = "padded")]
    pub layout: LayoutArg,

    /// Verify inclusion against the batch root served by this mailbox.
    #[arg(long = "mailbox-address", env = "BRIDGE_MAILBOX_ADDRESS", value_parser = parse_address)]
    pub mailbox_address: Option<Address>,

    /// Only validate the proof locally; skip the replay and inclusion checks.
    #[arg(long)]
    pub offline: bool,
}

/// Arguments of `init-l2-weth-token`.
#[derive(Debug, Clone, Args)]
pub(crate) struct InitL2WethTokenArgs {
    /// URL of the L1 RPC endpoint.
    #[arg(long = "rpc-endpoint", env = "BRIDGE_RPC_ENDPOINT", value_parser = parse_url)]
    pub rpc_endpoint: Url,

    /// Address of the mailbox.
    #[arg(long = "mailbox-address", env = "BRIDGE_MAILBOX_ADDRESS", value_parser = parse_address)]
    pub mailbox_address: Address,

    /// L2 side of the WETH bridge.
    #[arg(
        long = "l2-weth-bridge",
        env = "CONTRACTS_L2_WETH_BRIDGE_ADDR",
        value_parser = parse_address
    )]
    pub l2_weth_bridge: Address,

    /// Proxy of the L2 WETH token.
    #[arg(
        long = "l2-weth-token-proxy",
        env = "CONTRACTS_L2_WETH_TOKEN_PROXY_ADDR",
        value_parser = parse_address
    )]
    pub l2_weth_token_proxy: Address,

    /// New implementation of the L2 WETH token.
    #[arg(
        long = "l2-weth-token-impl",
        env = "CONTRACTS_L2_WETH_TOKEN_IMPL_ADDR",
        value_parser = parse_address
    )]
    pub l2_weth_token_impl: Address,

    /// WETH token on L1.
    #[arg(
        long = "l1-weth-token",
        env = "CONTRACTS_L1_WETH_TOKEN_ADDR",
        value_parser = parse_address
    )]
    pub l1_weth_token: Address,

    /// Hex-encoded private key of the token proxy admin. Submits the upgrade when set.
    #[arg(long = "private-key", env = "BRIDGE_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// L1 gas price in gwei. Read from the node when unset.
    #[arg(long = "gas-price", value_parser = parse_gwei)]
    pub gas_price: Option<u128>,

    /// Nonce of the submission. Read from the node when unset.
    #[arg(long)]
    pub nonce: Option<u64>,

    /// Time to wait for the receipt.
    #[arg(long = "receipt-timeout", default_value = "5m", value_parser = parse_duration)]
    pub receipt_timeout: Duration,
}

impl InitL2WethTokenArgs {
    /// Returns the upgrade configuration.
    pub(crate) fn weth_config(&self) -> WethInitConfig {
        let upgrade = WethTokenUpgrade {
            token_proxy: self.l2_weth_token_proxy,
            token_implementation: self.l2_weth_token_impl,
            l2_weth_bridge: self.l2_weth_bridge,
            l1_weth_token: self.l1_weth_token,
        };
        let mut config = WethInitConfig::new(self.mailbox_address, upgrade);
        if let Some(gas_price) = self.gas_price {
            config = config.with_gas_price(gas_price);
        }
        if let Some(nonce) = self.nonce {
            config = config.with_nonce(nonce);
        }
        config
    }

    /// Returns the client configuration.
    pub(crate) fn client_config(&self) -> L1ClientConfig {
        L1ClientConfig::new(self.rpc_endpoint.clone()).with_receipt_timeout(self.receipt_timeout)
    }
}

/// Parse a duration string like "12s", "5m", "1h".
fn parse_duration(s: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}

/// Parse a URL string.
fn parse_url(s: &str) -> Result<Url, url::ParseError> {
    Url::parse(s)
}

/// Parse an Ethereum address from hex string.
fn parse_address(s: &str) -> Result<Address, alloy_primitives::hex::FromHexError> {
    s.parse()
}

/// Parse a gas price in gwei, like "30" or "0.5", into wei.
fn parse_gwei(s: &str) -> Result<u128, String> {
    let wei: U256 = parse_units(s, "gwei").map_err(|e| e.to_string())?.get_absolute();
    u128::try_from(wei).map_err(|_| format!("gas price {s} gwei is out of range"))
}

/// Parse a safety margin written as `N` or `N/D`.
fn parse_margin(s: &str) -> Result<SafetyMargin, String> {
    let (numerator, denominator) = s.split_once('/').unwrap_or((s, "1"));
    let parse = |part: &str| part.trim().parse::<u64>().map_err(|e| format!("{s}: {e}"));
    SafetyMargin::new(parse(numerator)?, parse(denominator)?).map_err(|e| e.to_string())
}
