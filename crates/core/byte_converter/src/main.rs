use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = byte_converter::cli::Args::parse();
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(byte_converter::cli::run(args));
    // A blocking read of stdin cannot be cancelled and must not hold the process on exit.
    runtime.shutdown_background();
    result
}
