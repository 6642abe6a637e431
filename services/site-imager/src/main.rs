//! MODIS site imager.
//!
//! Builds one false-color RGBA PNG per site and provider date from
//! surface reflectance subsets that were fetched beforehand.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use site_imager::{load_sites, ImagerConfig, ImagingPipeline, LocalSubsetSource};

#[derive(Parser, Debug)]
#[command(name = "site-imager")]
#[command(about = "Build false-color MODIS images for a table of sites")]
#[command(after_help = "The site table is a YAML list. Each entry carries the columns of the \
provider's sites.csv as keys: site_tag, latitude, longitude, start_date, end_date, \
kmAboveBelow, kmLeftRight.")]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/imager.yaml", env = "IMAGER_CONFIG")]
    config: PathBuf,

    /// Only image this product (default: all configured)
    #[arg(short, long)]
    product: Option<String>,

    /// Only image this site tag (default: every site in the table)
    #[arg(short, long)]
    site: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format: json or pretty
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, &args.log_format)?;

    let mut config = ImagerConfig::load(&args.config)?;
    config.apply_env_overrides();
    if let Some(product) = &args.product {
        config.products = vec![product.clone()];
    }
    info!(
        config = %args.config.display(),
        products = ?config.products,
        img_dir = %config.img_dir.display(),
        "Loaded configuration"
    );

    let mut sites = load_sites(&config.sites_file)?;
    if let Some(tag) = &args.site {
        sites.retain(|s| &s.site_tag == tag);
        if sites.is_empty() {
            bail!("site {} not found in {}", tag, config.sites_file.display());
        }
    }
    info!(sites = sites.len(), "Loaded site table");

    let source = LocalSubsetSource::new(&config.data_dir);
    let pipeline = ImagingPipeline::new(config, source)?;
    let summary = pipeline.run(&sites);

    info!(
        written = summary.written,
        skipped = summary.skipped,
        "Done writing images"
    );
    Ok(())
}

fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if log_format.eq_ignore_ascii_case("json") {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
