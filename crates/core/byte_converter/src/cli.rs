use crate::config::parse_resume_interval;
use crate::config::ConverterConfig;
use crate::config::DEFAULT_CONFIG_PATH;
use crate::logging::log_init;
use crate::logging::LogConfigArgs;
use crate::ByteSource;
use crate::Converter;
use crate::ReaderSource;
use crate::TextSink;
use crate::WriterSink;
use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Decode a stream of tagged bytes, one value per line.
///
/// Each input byte holds a 2-bit type (unsigned, signed, letter or reserved)
/// and a 6-bit payload. Reserved bytes are skipped.
#[derive(Debug, Clone, Parser)]
#[command(about, version, long_about)]
pub struct Args {
    /// Path to the configuration file.
    ///
    /// A missing file is ignored unless this option is given explicitly.
    #[arg(long, env = "BYTE_CONVERTER_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    /// File to read the encoded bytes from [default: stdin]
    #[arg(long)]
    pub input: Option<Utf8PathBuf>,

    /// File to write the decoded values to [default: stdout]
    #[arg(long)]
    pub output: Option<Utf8PathBuf>,

    /// Delay between two decoded values, e.g. `100ms` or `1s`
    #[arg(long, value_parser = parse_resume_interval)]
    pub resume_interval: Option<Duration>,

    #[command(flatten)]
    pub log_args: LogConfigArgs,
}

impl Args {
    /// Load the config file and apply the command line overrides.
    pub fn config(&self) -> anyhow::Result<ConverterConfig> {
        let (path, required) = match &self.config {
            Some(path) => (path.clone(), true),
            None => (Utf8PathBuf::from(DEFAULT_CONFIG_PATH), false),
        };
        let mut config = ConverterConfig::try_new(&path, required)?;

        if let Some(input) = &self.input {
            config.input = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if let Some(resume_interval) = self.resume_interval {
            config.resume_interval = resume_interval;
        }
        Ok(config)
    }
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = args.config()?;
    log_init(&args.log_args, config.log_level);

    let source: Arc<dyn ByteSource> = match &config.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open input file '{path}'"))?;
            Arc::new(ReaderSource::new(file))
        }
        None => Arc::new(ReaderSource::new(tokio::io::stdin())),
    };
    let sink: Arc<dyn TextSink> = match &config.output {
        Some(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("failed to create output file '{path}'"))?;
            Arc::new(WriterSink::new(file))
        }
        None => Arc::new(WriterSink::new(tokio::io::stdout())),
    };

    let mut converter = Converter::new(source, sink);
    converter.start();

    let mut ticks = resume_ticks(config.resume_interval);
    let interrupt = interrupt();
    tokio::pin!(interrupt);
    loop {
        tokio::select! {
            _ = ticks.tick() => {
                if !converter.resume() {
                    break;
                }
            }
            signal = &mut interrupt => {
                signal.context("failed to listen for interrupt signals")?;
                info!("Interrupted, stopping the converter");
                break;
            }
        }
    }

    converter
        .shutdown()
        .await
        .context("the converter did not stop cleanly")?;
    Ok(())
}

// The worker handles its first byte unprompted, so the first resume is due one period later.
fn resume_ticks(period: Duration) -> tokio::time::Interval {
    tokio::time::interval_at(tokio::time::Instant::now() + period, period)
}

#[cfg(not(windows))]
async fn interrupt() -> std::io::Result<()> {
    use tokio::signal::unix::signal;
    use tokio::signal::unix::SignalKind;

    let mut signals = signal(SignalKind::interrupt())?;
    let _ = signals.recv().await;
    Ok(())
}

#[cfg(windows)]
async fn interrupt() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
