use checkpoint_report::Result;
use checkpoint_report::diagnostics;
use checkpoint_report::layout::Layout;
use checkpoint_report::log::source::{ArgPicker, PromptPicker};
use checkpoint_report::log::{
    FilePicker, LogExtractor, MainTimeline, SubTimeline, choose_log_path, read_log_file,
};
use checkpoint_report::open::{DEFAULT_VIEWER, SystemOpener, open_report};
use checkpoint_report::report;
use checkpoint_report::sheet::{TableWriter, Workbook};
use checkpoint_report::stats::Stats;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "./log-parsed.xlsx";

#[derive(Parser)]
#[command(name = "checkpoint-report")]
#[command(about = "Checkpoint timing report from MAIN_/SUB_ log lines", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Used when no subcommand is given.
    #[command(flatten)]
    report: ReportArgs,

    #[command(subcommand)]
    cmd: Option<Commands>,
}

#[derive(Args)]
struct ReportArgs {
    /// Log file. Prompted for when omitted; falls back to ./222.log.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Output file: .xlsx, .csv, or .html/.htm.
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    out: PathBuf,

    /// Header layout JSON (main rows and sub columns). Up to 18 main
    /// headers; rows 14-18 are shared with the stats block.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Do not open the report after writing it.
    #[arg(long)]
    no_open: bool,

    /// Application tried when the default handler fails.
    #[arg(long, default_value = DEFAULT_VIEWER)]
    viewer: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the spreadsheet report and open it (the default).
    Report(ReportArgs),

    /// Print the extracted timelines and per-sub-header stats as JSON.
    Extract {
        #[arg(long)]
        log: Option<PathBuf>,

        /// Header layout JSON; selects the sub headers the stats cover.
        #[arg(long)]
        layout: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Serialize)]
struct ExtractDump<'a> {
    main: &'a MainTimeline,
    sub: &'a SubTimeline,
    stats: Vec<StatsEntry>,
}

#[derive(Serialize)]
struct StatsEntry {
    key: String,
    stats: Option<Stats>,
}

fn picker(log: Option<PathBuf>) -> Box<dyn FilePicker> {
    match log {
        Some(path) => Box::new(ArgPicker::new(Some(path))),
        None => Box::new(PromptPicker),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init(cli.verbose);

    match cli.cmd.unwrap_or(Commands::Report(cli.report)) {
        Commands::Report(ReportArgs {
            log,
            out,
            layout,
            no_open,
            viewer,
        }) => {
            // 1) Resolve and read the log. A read failure ends the run without a report.
            let log_path = choose_log_path(picker(log).as_ref());
            let text = read_log_file(&log_path)?;
            tracing::info!(path = %log_path.display(), bytes = text.len(), "read log");

            let layout = Layout::load(layout.as_deref())?;

            // 2) Extract.
            let extractor = LogExtractor::new()?;
            let main = extractor.extract_main(&text);
            let sub = extractor.extract_sub(&text);
            tracing::info!(
                main_checkpoints = main.len(),
                rules = sub.len(),
                "extracted timelines"
            );

            // 3) Lay out and write.
            let writes = report::build_report(&layout, &main, &sub);
            let mut workbook = Workbook::new();
            report::apply(&writes, &mut workbook);

            match workbook.save(&out) {
                Ok(()) => println!("Wrote {}", out.display()),
                Err(err) => tracing::error!("save failed: {:#}", err),
            }

            // 4) Open.
            if !no_open {
                open_report(&SystemOpener, &out, &viewer);
            }
        }

        Commands::Extract {
            log,
            layout,
            pretty,
        } => {
            let log_path = choose_log_path(picker(log).as_ref());
            let text = read_log_file(&log_path)?;
            let layout = Layout::load(layout.as_deref())?;

            let extractor = LogExtractor::new()?;
            let main = extractor.extract_main(&text);
            let sub = extractor.extract_sub(&text);
            let stats = report::sub_stats(&layout, &sub)
                .into_iter()
                .map(|(key, stats)| StatsEntry { key, stats })
                .collect();

            let dump = ExtractDump {
                main: &main,
                sub: &sub,
                stats,
            };
            let json = if pretty {
                serde_json::to_string_pretty(&dump)?
            } else {
                serde_json::to_string(&dump)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}
