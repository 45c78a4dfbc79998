use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};

use replay::{run_query, source_for, Query, SourceConfig};

#[derive(Parser, Debug)]
#[command(name = "replay", version)]
#[command(about = "Read the state of a set of fields at a point in time")]
#[command(after_help = "Examples:\n  \
    replay --field ambientTemp --field schedule /tmp/ehub_data 2016-01-01T03:00\n  \
    replay --field ambientTemp s3://net.energyhub.assets/public/dev-exercises/audit-data/ 2016-01-01T03:00")]
struct Cli {
    /// Directory or s3://bucket/prefix holding YYYY/MM/DD.jsonl.gz partitions
    data_source: String,

    /// Target time, e.g. 2016-01-01T03:00 or 2016-01-01T03:00:00.000001+02:00
    date_time: String,

    /// Field to report; repeat for more fields
    #[arg(long = "field", required = true)]
    fields: Vec<String>,

    /// Show debug logs on stderr
    #[arg(long)]
    debug: bool,

    /// Bucket region for s3:// sources
    #[arg(long, default_value = "us-east-1")]
    s3_region: String,

    /// S3-compatible endpoint base URL (path-style requests)
    #[arg(long)]
    s3_endpoint: Option<String>,

    /// HTTP timeout in seconds for remote sources
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Keep downloaded remote partitions here and reuse them
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    debug!("{cli:?}");

    let mut config = SourceConfig::new();
    config.region = cli.s3_region;
    config.endpoint = cli.s3_endpoint;
    config.timeout = Duration::from_secs(cli.timeout_secs);
    config.cache_dir = cli.cache_dir;

    let source = source_for(&cli.data_source, &config).context("error opening data source")?;
    let query = Query::new(cli.fields, cli.data_source, cli.date_time);
    let state = run_query(&query, &*source).context("error getting state")?;

    let line = serde_json::to_string(&state.to_output()).context("error encoding output")?;

    // Only the result goes to stdout.
    let mut out = io::stdout().lock();
    writeln!(out, "{line}").context("error writing output")?;
    out.flush()?;
    Ok(())
}
