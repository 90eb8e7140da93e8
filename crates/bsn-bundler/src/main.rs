use anyhow::{Context, anyhow};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

use bsn_bundler::combine::Combine;
use bsn_bundler::{BuildOptions, Bundler, Config, Emit};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Only bundle these modules (comma-separated, in this order)
    #[arg(long, value_delimiter = ',', conflicts_with = "ignore")]
    only: Option<Vec<String>>,

    /// Bundle every module except these (comma-separated)
    #[arg(long, value_delimiter = ',')]
    ignore: Option<Vec<String>>,

    /// Compress the bundle body with the configured minifier
    #[arg(short, long)]
    minify: bool,

    /// Directory containing the module sources
    #[arg(long)]
    lib_dir: Option<PathBuf>,

    /// package.json to take version and license from
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Write the bundle to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Settings given on the command line, as the highest precedence config layer
    fn overrides(&self) -> Config {
        Config {
            lib_dir: self.lib_dir.clone(),
            manifest: self.manifest.clone(),
            minify: self.minify.then_some(true),
            only: self.only.clone(),
            ignore: self.ignore.clone(),
            ..Config::default()
        }
        .with_clean_lists()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout carries nothing but the bundle
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    debug!(
        "Verbosity level: {} (log level: {})",
        cli.verbose, log_level
    );

    let config = cli.overrides().combine(Config::load(cli.config.as_deref())?);
    debug!("Configuration: {:?}", config);

    let emit = if cli.output.is_some() {
        Emit::Return
    } else {
        Emit::Stdout
    };
    let options = BuildOptions::from_config(&config, emit)?;

    let bundler = Bundler::new(&config)?;
    let artifact = bundler.build(&options).await?;

    if let Some(output_path) = &cli.output {
        let artifact =
            artifact.ok_or_else(|| anyhow!("Bundle was not returned for file output"))?;
        fs::write(output_path, artifact)
            .with_context(|| format!("Failed to write output file: {:?}", output_path))?;
        info!("Bundle written to {:?}", output_path);
    }

    Ok(())
}
