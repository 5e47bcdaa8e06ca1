//! Log arguments and tracing subscriber setup.

use std::io;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

/// Stdout log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// Timestamp, level, target and fields.
    #[default]
    Full,
    /// Level, target and fields.
    Compact,
    /// One JSON object per event.
    Json,
}

/// Log-related CLI arguments.
///
/// Verbosity levels: 1=ERROR, 2=WARN, 3=INFO (default), 4=DEBUG, 5=TRACE.
#[derive(Debug, Clone, Parser)]
#[command(next_help_heading = "Logging")]
pub(crate) struct LogArgs {
    /// Increase logging verbosity (1=ERROR, 2=WARN, 3=INFO, 4=DEBUG, 5=TRACE).
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        default_value = "3",
        env = "BRIDGE_LOG_LEVEL",
        global = true
    )]
    pub level: u8,

    /// Suppress stdout logging.
    #[arg(long = "quiet", short = 'q', global = true)]
    pub quiet: bool,

    /// Stdout log format.
    #[arg(long = "log-format", default_value = "full", env = "BRIDGE_LOG_FORMAT", global = true)]
    pub format: LogFormat,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self { level: 3, quiet: false, format: LogFormat::Full }
    }
}

/// Stdout logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StdoutLogConfig {
    /// Output format.
    pub format: LogFormat,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LogConfig {
    /// Default level, overridable through `RUST_LOG`.
    pub global_level: LevelFilter,
    /// Stdout logging, `None` when quiet.
    pub stdout_logs: Option<StdoutLogConfig>,
}

impl From<LogArgs> for LogConfig {
    fn from(args: LogArgs) -> Self {
        let stdout_logs = (!args.quiet).then_some(StdoutLogConfig { format: args.format });
        Self { global_level: verbosity_to_level_filter(args.level), stdout_logs }
    }
}

/// Maps a `-v` count to a level filter.
pub(crate) const fn verbosity_to_level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

impl LogConfig {
    /// Installs the global tracing subscriber. Must only be called once.
    pub(crate) fn init_tracing_subscriber(&self) -> eyre::Result<()> {
        let filter =
            EnvFilter::builder().with_default_directive(self.global_level.into()).from_env_lossy();

        tracing_subscriber::registry()
            .with(filter)
            .with(self.stdout_logs.as_ref().map(build_stdout_layer))
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {}", e))
    }
}

fn build_stdout_layer<S>(config: &StdoutLogConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a> + Send + Sync,
{
    let base = tracing_subscriber::fmt::layer().with_writer(io::stdout).with_ansi(true);

    match config.format {
        LogFormat::Full => Box::new(base),
        LogFormat::Compact => Box::new(base.compact()),
        LogFormat::Json => Box::new(base.json()),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        log: LogArgs,
    }

    fn parse_log_args(args: &[&str]) -> LogArgs {
        TestCli::parse_from(std::iter::once("test").chain(args.iter().copied())).log
    }

    #[rstest]
    #[case::default(&[], 3)]
    #[case::single_v(&["-v"], 1)]
    #[case::double_v(&["-vv"], 2)]
    #[case::quad_v(&["-vvvv"], 4)]
    fn verbosity_parsing(#[case] args: &[&str], #[case] expected: u8) {
        assert_eq!(parse_log_args(args).level, expected);
    }

    #[rstest]
    #[case::off(0, LevelFilter::OFF)]
    #[case::error(1, LevelFilter::ERROR)]
    #[case::info(3, LevelFilter::INFO)]
    #[case::trace(5, LevelFilter::TRACE)]
    #[case::saturates(9, LevelFilter::TRACE)]
    fn level_mapping(#[case] level: u8, #[case] expected: LevelFilter) {
        assert_eq!(verbosity_to_level_filter(level), expected);
    }

    #[rstest]
    #[case::full("full", LogFormat::Full)]
    #[case::compact("compact", LogFormat::Compact)]
    #[case::json("json", LogFormat::Json)]
    fn format_parsing(#[case] format: &str, #[case] expected: LogFormat) {
        assert_eq!(parse_log_args(&["--log-format", format]).format, expected);
    }

    #[test]
    fn default_config_logs_info_to_stdout() {
        let config = LogConfig::from(LogArgs::default());
        assert_eq!(config.global_level, LevelFilter::INFO);
        assert_eq!(config.stdout_logs, Some(StdoutLogConfig { format: LogFormat::Full }));
    }

    #[test]
    fn quiet_disables_stdout() {
        let config = LogConfig::from(parse_log_args(&["-q"]));
        assert!(config.stdout_logs.is_none());
    }
}
