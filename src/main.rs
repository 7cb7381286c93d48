use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sea_ice::config::PipelineConfig;
use sea_ice::pipeline;

#[derive(Parser)]
#[command(name = "sea-ice")]
#[command(about = "Arctic sea-ice chart summaries and December extent projections")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the late-December chart archives from the portal
    Fetch(FetchArgs),
    /// Extract downloaded archives and summarize their shapefiles to JSON
    Process(ProcessArgs),
    /// Chart the JSON summary
    Plot(PlotArgs),
    /// Download the December extent CSV, fit trends and chart projections
    Project(ProjectArgs),
    /// Run fetch, process, plot and project in order
    All {
        /// Keep archives that were already downloaded
        #[arg(long)]
        skip_existing: bool,
    },
}

#[derive(Args)]
struct FetchArgs {
    /// Portal directory holding the year folders
    #[arg(long)]
    base_url: Option<String>,

    /// Directory to save the archives in
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Keep archives that were already downloaded
    #[arg(long)]
    skip_existing: bool,
}

#[derive(Args)]
struct ProcessArgs {
    /// Directory holding the downloaded .tar archives
    #[arg(long)]
    tar_dir: Option<PathBuf>,

    /// Directory to extract shapefiles into
    #[arg(long)]
    extract_dir: Option<PathBuf>,

    /// Summary JSON to write
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct PlotArgs {
    /// Summary JSON to read
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Chart PNG to write
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct ProjectArgs {
    /// Local path of the extent CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Use the local CSV instead of downloading it
    #[arg(long)]
    local_csv: bool,

    /// Chart PNG to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Years to project past the last observation
    #[arg(long)]
    future_years: Option<u32>,

    /// Degree of the polynomial trend
    #[arg(long)]
    degree: Option<usize>,
}

/// Initialize tracing to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "sea_ice=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run_all(config: &PipelineConfig, skip_existing: bool) -> anyhow::Result<()> {
    pipeline::fetch(config, skip_existing).await?;
    pipeline::process(config)?;
    pipeline::plot(config)?;
    pipeline::project(config, false).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = PipelineConfig::from_env();

    match cli.command {
        Some(Commands::Fetch(args)) => {
            config.base_url = args.base_url.unwrap_or(config.base_url);
            config.download_dir = args.download_dir.unwrap_or(config.download_dir);

            let files = pipeline::fetch(&config, args.skip_existing).await?;
            tracing::info!("{} archives in {}", files.len(), config.download_dir.display());
        }
        Some(Commands::Process(args)) => {
            config.download_dir = args.tar_dir.unwrap_or(config.download_dir);
            config.extract_dir = args.extract_dir.unwrap_or(config.extract_dir);
            config.summary_path = args.output.unwrap_or(config.summary_path);

            let count = pipeline::process(&config)?;
            tracing::info!("Summarized {} shapefiles", count);
        }
        Some(Commands::Plot(args)) => {
            config.summary_path = args.input.unwrap_or(config.summary_path);
            config.chart_path = args.output.unwrap_or(config.chart_path);

            pipeline::plot(&config)?;
        }
        Some(Commands::Project(args)) => {
            config.extent_csv = args.csv.unwrap_or(config.extent_csv);
            config.projection_chart = args.output.unwrap_or(config.projection_chart);
            config.future_years = args.future_years.unwrap_or(config.future_years);
            config.degree = args.degree.unwrap_or(config.degree);

            pipeline::project(&config, args.local_csv).await?;
        }
        Some(Commands::All { skip_existing }) => run_all(&config, skip_existing).await?,
        None => run_all(&config, false).await?,
    }

    Ok(())
}
