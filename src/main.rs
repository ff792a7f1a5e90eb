use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::debug;

use cinebrief::document::{
    export_file_name, load_project, read_text_input, render_project, write_project, ExportFormat,
};
use cinebrief::error_codes::{find_coded_error, CodedError, ErrorEnvelope};
use cinebrief::snapshot::{encode_project, hydrate_or_default, share_url};
use cinebrief::validate::ValidationReport;
use cinebrief::{apply, Action, Project};

const AGENT_MODE_ENV: &str = "CINEBRIEF_AGENT_MODE";
const LOG_ENV: &str = "CINEBRIEF_LOG";
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CINEBRIEF_GIT_HASH"),
    ")"
);

#[derive(Debug, Parser)]
#[command(name = "cinebrief")]
#[command(about = "Structure cinematic video concepts into a JSON brief")]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Machine-readable output: JSON reports on stdout, JSON error envelopes on stderr.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Emit a fresh project with default settings.
    New {
        #[arg(long)]
        title: Option<String>,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Turn loose notes (file or `-` for stdin) into a structured project.
    Structure {
        input: PathBuf,
        /// Project to extend instead of a fresh one.
        #[arg(long)]
        base: Option<PathBuf>,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Report validation warnings. Warnings never fail the command.
    Check { project: PathBuf },
    /// Apply one edit action, given as JSON (e.g. '{"type":"add_scene"}').
    Apply {
        project: PathBuf,
        #[arg(long)]
        action: String,
        #[arg(short = 'o', long = "output", conflicts_with = "in_place")]
        output: Option<PathBuf>,
        #[arg(long)]
        in_place: bool,
    },
    /// Write the project to a file named after its title.
    Export {
        project: PathBuf,
        #[arg(long, default_value = "json")]
        format: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print a share token, or a full link when a base URL is known.
    Share {
        project: PathBuf,
        #[arg(long, env = "CINEBRIEF_BASE_URL")]
        base_url: Option<String>,
    },
    /// Load a project from a share link or token. Undecodable input yields the default project.
    Open {
        link: String,
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let agent_mode = cli.json || agent_mode_from_env();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report_error(&error, agent_mode),
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"))
        .format_timestamp(None)
        .init();
}

fn agent_mode_from_env() -> bool {
    std::env::var(AGENT_MODE_ENV)
        .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::New { title, output } => run_new(title, output.as_deref()),
        Commands::Structure {
            input,
            base,
            output,
        } => run_structure(&input, base.as_deref(), output.as_deref()),
        Commands::Check { project } => run_check(&project, cli.json),
        Commands::Apply {
            project,
            action,
            output,
            in_place,
        } => {
            let output = if in_place {
                Some(project.clone())
            } else {
                output
            };
            run_apply(&project, &action, output.as_deref())
        }
        Commands::Export {
            project,
            format,
            output,
            out_dir,
        } => run_export(&project, &format, output, &out_dir),
        Commands::Share { project, base_url } => run_share(&project, base_url.as_deref()),
        Commands::Open { link, output } => emit(&hydrate_or_default(&link), output.as_deref()),
    }
}

fn run_new(title: Option<String>, output: Option<&Path>) -> Result<()> {
    let mut project = Project::default();
    if let Some(value) = title {
        project = apply(&project, Action::Title { value });
    }
    emit(&project, output)
}

fn run_structure(input: &Path, base: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let text = read_text_input(input)?;
    let base = match base {
        Some(path) => load_project(path)?,
        None => Project::default(),
    };
    let project = apply(&base, Action::AutoStructure { text });
    debug!(
        "structured {} scene(s), {} character(s), {} location(s)",
        project.scenes.len(),
        project.characters.len(),
        project.locations.len()
    );

    for warning in ValidationReport::for_project(&project).warnings {
        eprintln!("warning: {warning}");
    }
    emit(&project, output)
}

fn run_check(path: &Path, json: bool) -> Result<()> {
    let project = load_project(path)?;
    let report = ValidationReport::for_project(&project);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.ok {
        println!("OK: {} (no warnings)", path.display());
    } else {
        println!("{}: {} warning(s)", path.display(), report.warning_count);
        for warning in &report.warnings {
            println!("warning: {warning}");
        }
    }
    Ok(())
}

fn run_apply(path: &Path, action: &str, output: Option<&Path>) -> Result<()> {
    let project = load_project(path)?;
    let action = serde_json::from_str::<Action>(action).map_err(|error| {
        anyhow!(CodedError::usage(
            "INVALID_ACTION",
            format!("invalid action: {error}")
        ))
    })?;
    emit(&apply(&project, action), output)
}

fn run_export(
    path: &Path,
    format: &str,
    output: Option<PathBuf>,
    out_dir: &Path,
) -> Result<()> {
    let format = ExportFormat::from_keyword(format)?;
    let project = load_project(path)?;
    let target = output.unwrap_or_else(|| out_dir.join(export_file_name(&project, format)));
    write_project(&target, &project, format)?;
    println!("Wrote {}", target.display());
    Ok(())
}

fn run_share(path: &Path, base_url: Option<&str>) -> Result<()> {
    let project = load_project(path)?;
    let shared = match base_url {
        Some(base) => share_url(base, &project)?,
        None => encode_project(&project)?,
    };
    println!("{shared}");
    Ok(())
}

/// Writes to `output` (format from its extension) or pretty JSON on stdout.
fn emit(project: &Project, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_project(path, project, ExportFormat::for_path(path))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", render_project(project, ExportFormat::Json)?),
    }
    Ok(())
}

fn report_error(error: &anyhow::Error, agent_mode: bool) -> ExitCode {
    if agent_mode {
        match serde_json::to_string(&ErrorEnvelope::from_error(error)) {
            Ok(envelope) => eprintln!("{envelope}"),
            Err(_) => eprintln!("error: {error:#}"),
        }
    } else {
        eprintln!("error: {error:#}");
    }

    let code = find_coded_error(error)
        .map(|coded| coded.kind.exit_code())
        .unwrap_or(1);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
