use anyhow::{Context, Result};
use catalog_insights::catalog::{Catalog, RawRowSource};
use catalog_insights::cli_style::{
    box_chars, color_enabled, colors, get_styles, paint, paint_bold, print_error, print_success,
};
use catalog_insights::config::{AppConfig, CliConfig, FileConfig, SourceKind};
use catalog_insights::dashboard::{CatalogSnapshot, DashboardSession, SelectionRequest};
use catalog_insights::query::{Dimension, DimensionOptions};
use catalog_insights::render::{
    present, present_preview, DashboardRenderer, JsonRenderer, PresentOptions, TerminalRenderer,
};
use catalog_insights::table_store::SqliteTableStore;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(
    name = "catalog-insights",
    version = env!("CATALOG_INSIGHTS_VERSION"),
    styles = get_styles(),
    about = "Filter and aggregate a title catalog into dashboard figures."
)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, global = true, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the dataset CSV files.
    #[clap(long, global = true, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite table store.
    #[clap(long, global = true, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Where the title rows are read from.
    #[clap(long, global = true, value_enum)]
    pub source: Option<SourceKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Imports every configured dataset CSV into the table store.
    Import,

    /// Prints the kinds, release years and primary countries available for filtering.
    Options {
        #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Runs the pipeline for a selection and prints the dashboard.
    Report(ReportArgs),
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Kinds to keep. All kinds when omitted.
    #[clap(long = "kind")]
    kinds: Vec<String>,

    /// Release years to keep. All years when omitted.
    #[clap(long = "year")]
    years: Vec<String>,

    /// Primary countries to keep.
    #[clap(long = "country", conflicts_with = "all_countries")]
    countries: Vec<String>,

    /// Selects every primary country.
    #[clap(long)]
    all_countries: bool,

    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also lists the filtered titles.
    #[clap(long)]
    detail: bool,

    /// Shows the first N raw rows before the dashboard.
    #[clap(long, value_name = "N")]
    preview: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        data_dir: cli_args.data_dir.clone(),
        db_path: cli_args.db_path.clone(),
        source: cli_args.source,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    match cli_args.command {
        Command::Import => run_import(&config),
        Command::Options { format } => run_options(&config, format),
        Command::Report(args) => run_report(&config, args),
    }
}

fn run_import(config: &AppConfig) -> Result<()> {
    info!(
        "Importing {} datasets from {:?} into {:?}",
        config.datasets.len(),
        config.data_dir,
        config.db_path
    );
    let mut store = SqliteTableStore::open(&config.db_path)?;
    let report = store.import_datasets(&config.data_dir, &config.datasets)?;

    for (table, rows) in &report.imported {
        print_success(&format!("{}: {} rows", table, rows));
    }
    for path in &report.missing {
        print_error(&format!("missing: {}", path.display()));
    }
    if report
        .imported
        .iter()
        .all(|(table, _)| table != &config.titles_table)
    {
        warn!(
            "Titles table '{}' was not imported, reports from the store will fail",
            config.titles_table
        );
    }
    Ok(())
}

fn load_snapshot(source: &dyn RawRowSource, config: &AppConfig) -> Result<CatalogSnapshot> {
    let catalog = catalog_insights::load_catalog(source, &config.columns)
        .with_context(|| format!("Failed to load catalog from {}", source.describe()))?;
    Ok(CatalogSnapshot::new(catalog))
}

fn run_options(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let source = config.titles_source();
    let snapshot = load_snapshot(source.as_ref(), config)?;
    let options = snapshot.options();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, options)?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_options(&mut out, options, color_enabled())?,
    }
    Ok(())
}

fn write_options<W: Write>(out: &mut W, options: &DimensionOptions, color: bool) -> Result<()> {
    let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
    for (dimension, values) in [
        (Dimension::Kind, &options.kinds),
        (Dimension::Year, &years),
        (Dimension::Country, &options.countries),
    ] {
        writeln!(
            out,
            "{} {} ({})",
            paint(box_chars::BULLET, colors::PURPLE, color),
            paint_bold(&dimension.to_string(), colors::CYAN, color),
            values.len()
        )?;
        writeln!(out, "  {}", values.join(", "))?;
    }
    Ok(())
}

fn run_report(config: &AppConfig, args: ReportArgs) -> Result<()> {
    let source = config.titles_source();
    info!("Loading catalog from {}...", source.describe());
    let raw = source
        .read_rows()
        .with_context(|| format!("Failed to read {}", source.describe()))?;

    let preview = args.preview.map(|n| raw.head(n));
    let catalog = Catalog::from_raw(raw, &config.columns)?;
    info!(
        "Catalog has {} titles ({} duplicate rows dropped)",
        catalog.len(),
        catalog.duplicates_dropped()
    );

    let mut session = DashboardSession::new(
        CatalogSnapshot::new(catalog),
        config.pipeline_settings(),
        config.country_default,
    );
    let request = SelectionRequest {
        kinds: args.kinds,
        years: args.years,
        countries: args.countries,
        all_countries: args.all_countries,
    };
    session.apply_all(request.changes())?;
    let outcome = session.refresh();
    let present_options = PresentOptions {
        show_detail: args.detail,
    };

    let stdout = std::io::stdout();
    match args.format {
        OutputFormat::Text => {
            let mut renderer = TerminalRenderer::new(stdout.lock(), color_enabled());
            render_report(&mut renderer, preview.as_ref(), &outcome, present_options)?;
        }
        OutputFormat::Json => {
            let mut renderer = JsonRenderer::new();
            render_report(&mut renderer, preview.as_ref(), &outcome, present_options)?;
            renderer.write_to(&mut stdout.lock())?;
        }
    }
    Ok(())
}

fn render_report(
    renderer: &mut dyn DashboardRenderer,
    preview: Option<&catalog_insights::catalog::RawTable>,
    outcome: &catalog_insights::DashboardOutcome,
    options: PresentOptions,
) -> Result<()> {
    if let Some(head) = preview {
        present_preview(head, head.len(), renderer)?;
    }
    present(outcome, options, renderer)
}
