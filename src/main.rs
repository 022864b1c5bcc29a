use anyhow::{Context, Result};
use best_days::{run, PriceBasis, RunConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "best_days")]
#[command(about = "Historical and predicted best days of the month to buy and sell", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Ticker symbol (e.g. AAPL)
    ticker: String,

    /// History period understood by the provider (e.g. 1y, 5y, max)
    period: String,

    /// Number of future months to predict
    months: i64,

    /// Price used to rank days (close | open | intraday)
    #[arg(long, default_value_t = PriceBasis::Close)]
    basis: PriceBasis,

    /// Read the series from a local CSV instead of the network
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory for the output files
    #[arg(long, env = "BEST_DAYS_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Skip the SVG chart
    #[arg(long, default_value_t = false)]
    no_plot: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(&self.ticker, &self.period, self.months);
        config.analysis.basis = self.basis;
        config.output_dir = self.out_dir;
        config.input = self.input;
        config.plot = !self.no_plot;
        config
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config();
    let loader = config.loader()?;
    let report = run(&config, loader.as_ref())
        .with_context(|| format!("analysis of {} ({}) failed", config.ticker, config.period))?;

    println!("month    kind  date        fallback");
    for month in report.predictions() {
        for point in month.points() {
            println!(
                "{}  {:<4}  {}  {}",
                month.period,
                point.kind.to_string(),
                point.date,
                point.is_fallback
            );
        }
    }
    println!("{}", report.disclaimer());

    Ok(())
}
