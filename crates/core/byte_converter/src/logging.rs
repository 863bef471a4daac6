use std::sync::Arc;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_MAX_LEVEL: tracing::Level = tracing::Level::INFO;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct LogConfigArgs {
    /// Log at DEBUG level
    #[arg(long)]
    pub debug: bool,

    /// Log level: error, warn, info, debug or trace. Takes precedence over `--debug`
    #[arg(long)]
    pub log_level: Option<tracing::Level>,
}

/// Install the global subscriber, logging to stderr.
///
/// The command line flags win over `RUST_LOG`, which wins over the config file level.
/// INFO is used when none is set.
pub fn log_init(flags: &LogConfigArgs, config_level: Option<tracing::Level>) {
    logger(flags, config_level).init();
}

fn logger(
    flags: &LogConfigArgs,
    config_level: Option<tracing::Level>,
) -> Arc<dyn tracing::Subscriber + Send + Sync> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339());

    if let Some(log_level) = flag_level(flags) {
        return Arc::new(subscriber.with_max_level(log_level).finish());
    }

    if std::env::var("RUST_LOG").is_ok() {
        return Arc::new(
            subscriber
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .finish(),
        );
    }

    Arc::new(
        subscriber
            .with_max_level(config_level.unwrap_or(DEFAULT_MAX_LEVEL))
            .finish(),
    )
}

fn flag_level(flags: &LogConfigArgs) -> Option<tracing::Level> {
    flags
        .log_level
        .or(flags.debug.then_some(tracing::Level::DEBUG))
}
