use anyhow::{Context, Result};
use catalog_insights::cli_style::{
    box_chars, color_enabled, colors, get_prompt, get_styles, paint, paint_bold, print_error,
    print_success,
};
use catalog_insights::config::{AppConfig, CliConfig, FileConfig, SourceKind};
use catalog_insights::dashboard::{CatalogSnapshot, DashboardSession, SelectionChange};
use catalog_insights::load_catalog;
use catalog_insights::query::{Dimension, FilterSelection};
use catalog_insights::render::{present, PresentOptions, TerminalRenderer};
use clap::{CommandFactory, Parser, Subcommand};
use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
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
    name = "cli-explore",
    version = env!("CATALOG_INSIGHTS_VERSION"),
    styles = get_styles(),
    about = "Interactive catalog dashboard."
)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    #[clap(long, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    #[clap(long, value_enum)]
    pub source: Option<SourceKind>,
}

#[derive(Parser)]
#[command(styles=get_styles(), name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Adds kinds to the selection.
    Kind {
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Adds release years to the selection.
    Year {
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Adds primary countries to the selection.
    Country {
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Removes values from a dimension's selection.
    Drop {
        dimension: Dimension,
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Empties a dimension's selection, so it no longer filters.
    Clear { dimension: Dimension },

    /// Selects every option of a dimension.
    All { dimension: Dimension },

    /// Restores the initial selection.
    Reset,

    /// Shows the current selection and dashboard.
    Show,

    /// Lists the values available for each dimension.
    Options,

    /// Toggles the listing of filtered titles.
    Detail,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

struct ExploreState {
    session: DashboardSession,
    show_detail: bool,
    color: bool,
}

impl ExploreState {
    fn print_selection(&self) {
        let selection: &FilterSelection = self.session.selection();
        let years: Vec<String> = selection.years.iter().map(|y| y.to_string()).collect();
        let kinds: Vec<String> = selection.kinds.iter().cloned().collect();
        let countries: Vec<String> = selection.countries.iter().cloned().collect();
        for (dimension, values) in [
            (Dimension::Kind, kinds),
            (Dimension::Year, years),
            (Dimension::Country, countries),
        ] {
            let shown = if values.is_empty() {
                paint("(any)", colors::DIM, self.color)
            } else {
                values.join(", ")
            };
            println!(
                " {} {}: {}",
                paint(box_chars::BULLET, colors::PURPLE, self.color),
                paint_bold(&dimension.to_string(), colors::CYAN, self.color),
                shown
            );
        }
    }

    fn print_dashboard(&self) -> Result<()> {
        let outcome = self.session.refresh();
        let stdout = std::io::stdout();
        let mut renderer = TerminalRenderer::new(stdout.lock(), self.color);
        present(
            &outcome,
            PresentOptions {
                show_detail: self.show_detail,
            },
            &mut renderer,
        )
    }

    fn print_options(&self) {
        let options = self.session.snapshot().options();
        let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
        for (dimension, values) in [
            (Dimension::Kind, &options.kinds),
            (Dimension::Year, &years),
            (Dimension::Country, &options.countries),
        ] {
            println!(
                " {} {} ({})",
                paint(box_chars::BULLET_EMPTY, colors::PURPLE, self.color),
                paint_bold(&dimension.to_string(), colors::CYAN, self.color),
                values.len()
            );
            println!("   {}", values.join(", "));
        }
    }

    fn change(&mut self, change: SelectionChange) -> CommandExecutionResult {
        if let Err(err) = self.session.apply(change) {
            return CommandExecutionResult::Error(err.to_string());
        }
        self.print_selection();
        self.dashboard()
    }

    fn dashboard(&self) -> CommandExecutionResult {
        match self.print_dashboard() {
            Ok(()) => CommandExecutionResult::Ok,
            Err(err) => CommandExecutionResult::Error(format!("{:#}", err)),
        }
    }
}

fn execute_command(line: String, state: &mut ExploreState) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => match cli.command {
            InnerCommand::Kind { values } => {
                state.change(SelectionChange::Select(Dimension::Kind, values))
            }
            InnerCommand::Year { values } => {
                state.change(SelectionChange::Select(Dimension::Year, values))
            }
            InnerCommand::Country { values } => {
                state.change(SelectionChange::Select(Dimension::Country, values))
            }
            InnerCommand::Drop { dimension, values } => {
                state.change(SelectionChange::Deselect(dimension, values))
            }
            InnerCommand::Clear { dimension } => state.change(SelectionChange::Clear(dimension)),
            InnerCommand::All { dimension } => state.change(SelectionChange::SelectAll(dimension)),
            InnerCommand::Reset => state.change(SelectionChange::Reset),
            InnerCommand::Show => {
                state.print_selection();
                state.dashboard()
            }
            InnerCommand::Options => {
                state.print_options();
                CommandExecutionResult::Ok
            }
            InnerCommand::Detail => {
                state.show_detail = !state.show_detail;
                print_success(if state.show_detail {
                    "Title listing on"
                } else {
                    "Title listing off"
                });
                state.dashboard()
            }
            InnerCommand::Exit => CommandExecutionResult::Exit,
        },
        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
            CommandExecutionResult::Ok
        }
    }
}

#[derive(rustyline_derive::Hinter)]
struct ExploreHelper {
    commands_names: Vec<String>,
}

impl ExploreHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        ExploreHelper { commands_names }
    }
}

impl Completer for ExploreHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for ExploreHelper {}
impl Validator for ExploreHelper {}
impl Helper for ExploreHelper {}

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

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        data_dir: cli_args.data_dir,
        db_path: cli_args.db_path,
        source: cli_args.source,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let source = config.titles_source();
    let catalog = load_catalog(source.as_ref(), &config.columns)
        .with_context(|| format!("Failed to load catalog from {}", source.describe()))?;
    let session = DashboardSession::new(
        CatalogSnapshot::new(catalog),
        config.pipeline_settings(),
        config.country_default,
    );
    let mut state = ExploreState {
        session,
        show_detail: false,
        color: color_enabled(),
    };

    InnerCli::command().print_long_help()?;
    state.print_selection();
    state.print_dashboard()?;

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<ExploreHelper, FileHistory>::with_config(rl_config)?;
    rl.set_helper(Some(ExploreHelper::new()));

    let prompt = get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut state) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => print_error(&err),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                print_error(&format!("{:?}", e));
                break;
            }
        }
    }
    Ok(())
}
