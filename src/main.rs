use anyhow::Context;
use broker_converter::Converter;
use broker_converter::cli::args::Args;
use broker_converter::cli::logging::setup_logging;
use clap::Parser;
use std::process;
use tracing::info;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    args.validate().context("Invalid arguments")?;

    let config = args.to_config();
    info!("Converting {} exports to {}", config.broker, config.output_path.display());

    let converter = Converter::new(config).context("Cannot start conversion")?;
    converter
        .convert()
        .with_context(|| format!("Conversion of {} failed", args.input_path.display()))?;
    Ok(())
}
