// AlignChart CLI - edit an alignment chart from the terminal
// Every command opens the chart store, applies one interaction, saves and re-renders.

mod exit_codes;
mod logger;
mod prompt;
mod view;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use log::info;

use alignchart_config::Settings;
use alignchart_engine::cells::PurgePolicy;
use alignchart_engine::chart::{AlwaysYes, Chart, ChartOptions, Command, Confirm, Outcome};
use alignchart_engine::dispatch::Dispatcher;
use alignchart_engine::export::{ExportOptions, Exporter};
use alignchart_engine::grid::Axis;
use alignchart_engine::layout::EditTarget;
use alignchart_io::{upload, SqliteStore, SvgExporter};

use exit_codes::{EXIT_DECLINED, EXIT_ERROR, EXIT_IO, EXIT_REJECTED, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "achart")]
#[command(about = "Editable two-axis alignment chart (terminal front end)")]
#[command(version, long_version = long_version())]
struct Cli {
    /// Chart store file (SQLite). Overrides "store.path" from settings
    #[arg(long, global = true, env = "ACHART_STORE")]
    store: Option<PathBuf>,

    /// Settings file to use instead of the platform config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    Top,
    Left,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Top => Axis::Top,
            AxisArg::Left => Axis::Left,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the chart as a text grid
    Show,

    /// Print the rendered layout tree as JSON
    Layout {
        /// Pretty-print
        #[arg(long)]
        pretty: bool,
    },

    /// Rename a row header (0-based index)
    RenameRow { row: usize, text: String },

    /// Rename a column header (0-based index)
    RenameCol { col: usize, text: String },

    /// Rename an axis title
    RenameAxis { axis: AxisArg, text: String },

    /// Append a row
    AddRow,

    /// Append a column
    AddCol,

    /// Delete a row (only while there are more than 3)
    DeleteRow {
        row: usize,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Delete a column (only while there are more than 3)
    DeleteCol {
        col: usize,
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Set a cell caption; empty text or the default caption clears the override
    Caption { row: usize, col: usize, text: String },

    /// Set or clear a cell's background image
    #[command(group(ArgGroup::new("source").required(true).args(["file", "url", "clear"])))]
    #[command(after_help = "\
Examples:
  achart image 0 0 --file paladin.png
  achart image 1 2 --url https://example.com/rogue.jpg
  achart image 1 2 --url          (prompts for the URL)
  achart image 1 2 --clear")]
    Image {
        row: usize,
        col: usize,
        /// Upload an image file from this device
        #[arg(long)]
        file: Option<PathBuf>,
        /// Use an image URL; prompts when no value is given
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        url: Option<String>,
        /// Remove the image
        #[arg(long)]
        clear: bool,
    },

    /// Reset the chart to its defaults, removing all images and captions
    Reset {
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Export the chart as an image named after the axis titles
    Export {
        /// Output directory (default: "export.directory" or the current directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into() }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  alignchart-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  alignchart-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(CliError { code, message }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> Result<u8, CliError> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let store_path = cli.store.clone().unwrap_or_else(|| settings.effective_store_path());
    let store = SqliteStore::open(&store_path)
        .map_err(|e| CliError::io(format!("cannot open {}: {}", store_path.display(), e)))?;

    let options = ChartOptions {
        purge_policy: if settings.renumber_on_delete {
            PurgePolicy::Renumber
        } else {
            PurgePolicy::ExactIndex
        },
    };
    let chart = Chart::open(store, options)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", store_path.display(), e)))?;
    let mut dispatcher = Dispatcher::new(chart);
    let mut skip_confirm = false;

    match cli.command {
        Commands::Show => {
            print!("{}", view::render_text(dispatcher.chart().layout()));
            return Ok(EXIT_SUCCESS);
        }
        Commands::Layout { pretty } => {
            let layout = dispatcher.chart().layout();
            let json = if pretty {
                serde_json::to_string_pretty(layout)
            } else {
                serde_json::to_string(layout)
            }
            .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string() })?;
            println!("{}", json);
            return Ok(EXIT_SUCCESS);
        }
        Commands::Export { output } => return cmd_export(dispatcher.chart(), &settings, output),
        Commands::RenameRow { row, text } => {
            dispatcher.post(Command::Commit { target: EditTarget::RowLabel { row }, text })
        }
        Commands::RenameCol { col, text } => {
            dispatcher.post(Command::Commit { target: EditTarget::ColLabel { col }, text })
        }
        Commands::RenameAxis { axis, text } => dispatcher.post(Command::Commit {
            target: EditTarget::Axis { axis: axis.into() },
            text,
        }),
        Commands::Caption { row, col, text } => {
            dispatcher.post(Command::Commit { target: EditTarget::Caption { row, col }, text })
        }
        Commands::AddRow => dispatcher.post(Command::AddRow),
        Commands::AddCol => dispatcher.post(Command::AddCol),
        Commands::DeleteRow { row, yes } => {
            skip_confirm = yes;
            dispatcher.post(Command::DeleteRow(row));
        }
        Commands::DeleteCol { col, yes } => {
            skip_confirm = yes;
            dispatcher.post(Command::DeleteCol(col));
        }
        Commands::Reset { yes } => {
            skip_confirm = yes;
            dispatcher.post(Command::Reset);
        }
        Commands::Image { row, col, file, url, clear } => {
            if clear {
                dispatcher.post(Command::ClearImage { row, col });
            } else if let Some(path) = file {
                dispatcher.spawn_upload(row, col, upload::read_data_uri(path, settings.upload_max_bytes));
            } else if let Some(url) = url {
                match resolve_url(url, prompt::prompt_url) {
                    Some(reference) => dispatcher.post(Command::SetImage { row, col, reference }),
                    None => return Ok(EXIT_SUCCESS),
                }
            }
        }
    }

    let mut confirm: Box<dyn Confirm> = if skip_confirm {
        Box::new(AlwaysYes)
    } else {
        Box::new(prompt::StdinConfirm)
    };
    let outcomes = dispatcher.run(confirm.as_mut()).map_err(CliError::io)?;

    Ok(exit_code_for(&outcomes))
}

/// `--url` with no value asks on the terminal; a given but blank value is a no-op.
fn resolve_url(value: String, ask: impl FnOnce() -> Option<String>) -> Option<String> {
    if value.is_empty() {
        return ask();
    }
    Some(value.trim().to_string()).filter(|url| !url.is_empty())
}

fn exit_code_for(outcomes: &[Outcome]) -> u8 {
    if outcomes.contains(&Outcome::Declined) {
        EXIT_DECLINED
    } else if outcomes.contains(&Outcome::Rejected) {
        EXIT_REJECTED
    } else {
        EXIT_SUCCESS
    }
}

fn cmd_export(
    chart: &Chart<SqliteStore>,
    settings: &Settings,
    output: Option<PathBuf>,
) -> Result<u8, CliError> {
    let options = ExportOptions {
        background: settings.export_background.clone(),
        allow_cross_origin: settings.export_allow_cross_origin,
    };
    let request = chart.export_request(&options);
    let exporter = SvgExporter::default();
    let bytes = exporter
        .export(&request)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e })?;

    let dir = output
        .or_else(|| settings.export_directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir).map_err(|e| CliError::io(e.to_string()))?;
    let path = dir.join(request.file_name(exporter.extension()));
    fs::write(&path, bytes).map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;

    info!("Exported chart to {}", path.display());
    println!("{}", path.display());
    Ok(EXIT_SUCCESS)
}
