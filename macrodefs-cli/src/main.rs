#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

//! # Macrodefs CLI
//!
//! A command-line interface for the macrodefs library: collect `-D` / `-U`
//! switches and render them for a compiler or build tool.

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser, ValueEnum};
use colored::Colorize;
use macrodefs::{DEFAULT_SEPARATOR, Macro, MacroError, Macros, RenderConfig};
#[cfg(feature = "json")]
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit codes for different error conditions
mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const IO_ERROR: i32 = 2;
    pub const ARGUMENT_ERROR: i32 = 4;
}

/// Command-line interface for rendering macro definitions
#[derive(Parser)]
#[command(
    name = "macrodefs",
    version,
    author,
    about = "Render C preprocessor macro definitions for a compiler invocation",
    long_about = "macrodefs collects -D and -U switches, normalizes them the way build scripts do (a value of 0 undefines, a value of 1 is a bare define) and renders them as a flag string, an argument list, or name/value pairs.",
    after_help = "EXAMPLES:
  # Joined flag string
  $ macrodefs -D NDEBUG -D VERSION=1.2.3 -U DEBUG
  DNDEBUG -DVERSION=1.2.3 -UDEBUG

  # Ready to paste into a compiler command line
  $ macrodefs -D NDEBUG -U DEBUG --format command-line
  -DNDEBUG -UDEBUG

  # One argument per line
  $ macrodefs -D NDEBUG -D LEVEL=2 --format args

  # Name/value pairs as JSON
  $ macrodefs -D NDEBUG -D LEVEL=2 --json"
)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Define a macro
    #[arg(
        short = 'D',
        long = "define",
        value_name = "NAME[=VALUE]",
        help = "Define a macro, optionally with a value"
    )]
    defines: Vec<String>,

    /// Undefine a macro
    #[arg(
        short = 'U',
        long = "undefine",
        value_name = "NAME",
        help = "Mark a macro as explicitly undefined"
    )]
    undefines: Vec<String>,

    /// Output format
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "string",
        help = "Rendering of the macro set"
    )]
    format: OutputFormat,

    /// Separator between macros in joined forms
    #[arg(
        short = 's',
        long,
        default_value = DEFAULT_SEPARATOR,
        allow_hyphen_values = true,
        help = "Separator between macros in the joined forms"
    )]
    separator: String,

    /// Output file (use '-' for stdout, default: stdout)
    #[arg(
        short = 'o',
        long,
        help = "Output file (use '-' for stdout, default: stdout)"
    )]
    output: Option<PathBuf>,

    /// Output in JSON format
    #[arg(
        long,
        conflicts_with = "format",
        help = "Output the macro set in JSON format (every rendering at once)"
    )]
    #[cfg(feature = "json")]
    json: bool,

    /// Enable verbose output
    #[arg(
        short = 'v',
        long,
        help = "Enable verbose output with diagnostic information"
    )]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short = 'q', long, help = "Suppress non-error output (quiet mode)")]
    quiet: bool,

    /// Show what would happen without rendering
    #[arg(
        short = 'n',
        long,
        help = "Show the parsed macros without rendering them"
    )]
    dry_run: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    no_color: bool,
}

/// Output formats for the macro set
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// `DA -DB=1` joined form
    #[value(name = "string")]
    Joined,
    /// `-DA -DB=1`, prefixed by the separator
    CommandLine,
    /// `NAME=VALUE` pairs, one per line
    List,
    /// `-DA`, one argument per line
    Args,
}

/// Which switch a macro operand came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Switch {
    Define,
    Undefine,
}

/// Main application entry point
fn main() {
    std::process::exit(match run() {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            determine_exit_code(&e)
        }
    });
}

/// Determine the appropriate exit code based on the error
fn determine_exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<std::io::Error>().is_some() {
        exit_code::IO_ERROR
    } else if error.downcast_ref::<MacroError>().is_some() {
        exit_code::ARGUMENT_ERROR
    } else {
        exit_code::GENERAL_ERROR
    }
}

/// Run the main application logic
fn run() -> Result<()> {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    init_logging(&cli);
    configure_color(&cli);

    let operands = ordered_operands(&matches);
    let macros = build_macros(&operands)?;
    debug!(count = macros.len(), "collected macros");

    if cli.dry_run {
        show_dry_run_info(&cli, &macros);
        return Ok(());
    }

    let config = RenderConfig::new().with_separator(cli.separator.as_str());
    let rendered = render(&cli, &macros, &config)?;
    write_output(&cli, &rendered)?;

    if cli.verbose && !cli.quiet {
        let output_display = cli
            .output
            .as_ref()
            .map_or("stdout".to_string(), format_output);
        eprintln!(
            "{} Rendered {} macro(s) -> {output_display}",
            "✓".green(),
            macros.len()
        );
    }

    Ok(())
}

/// Set up the tracing subscriber; `RUST_LOG` overrides the verbosity flags
fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("Warning: failed to initialize logging: {e}");
    }
}

/// Disable colors when asked to or when stderr is not a terminal
fn configure_color(cli: &Cli) {
    if cli.no_color || !atty::is(atty::Stream::Stderr) {
        colored::control::set_override(false);
    }
}

/// Collect `-D` and `-U` operands in the order they appeared on the command line
fn ordered_operands(matches: &clap::ArgMatches) -> Vec<(Switch, String)> {
    let mut operands = Vec::new();
    for (id, switch) in [("defines", Switch::Define), ("undefines", Switch::Undefine)] {
        if let (Some(values), Some(indices)) =
            (matches.get_many::<String>(id), matches.indices_of(id))
        {
            operands.extend(indices.zip(values.map(|v| (switch, v.clone()))));
        }
    }
    operands.sort_by_key(|(index, _)| *index);
    operands.into_iter().map(|(_, operand)| operand).collect()
}

/// Apply operands to a fresh macro set; later operands override earlier ones
fn build_macros(operands: &[(Switch, String)]) -> Result<Macros> {
    let mut macros = Macros::new();
    for (switch, spec) in operands {
        let parsed = match switch {
            Switch::Define => spec.parse::<Macro>(),
            Switch::Undefine => Macro::parse_undef(spec),
        };
        let m = parsed.with_context(|| format!("invalid macro operand: {spec:?}"))?;
        debug!(operand = %spec, rendered = %m, "parsed macro");
        macros.add(m);
    }
    Ok(macros)
}

/// Render the macro set in the requested format
fn render(cli: &Cli, macros: &Macros, config: &RenderConfig) -> Result<String> {
    #[cfg(feature = "json")]
    if cli.json {
        return render_json(macros, config);
    }

    info!(format = ?cli.format, "rendering macros");
    Ok(render_format(cli.format, macros, config))
}

/// Render the macro set in a plain-text format
fn render_format(format: OutputFormat, macros: &Macros, config: &RenderConfig) -> String {
    match format {
        OutputFormat::Joined => macros.render(config),
        OutputFormat::CommandLine => macros.to_command_line(config),
        OutputFormat::List => macros
            .to_list()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Args => macros.to_args().join("\n"),
    }
}

/// JSON document holding every rendering of a macro set
#[cfg(feature = "json")]
#[derive(Serialize)]
struct JsonOutput<'a> {
    macros: &'a Macros,
    string: String,
    command_line: String,
    args: Vec<String>,
}

/// Render the macro set as JSON
#[cfg(feature = "json")]
fn render_json(macros: &Macros, config: &RenderConfig) -> Result<String> {
    let output = JsonOutput {
        macros,
        string: macros.render(config),
        command_line: macros.to_command_line(config),
        args: macros.to_args(),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Write output to file or stdout
fn write_output(cli: &Cli, content: &str) -> Result<()> {
    match &cli.output {
        Some(output_path) if output_path != &PathBuf::from("-") => {
            std::fs::write(output_path, format!("{content}\n")).with_context(|| {
                format!("Failed to write to output file: {}", output_path.display())
            })?;
        }
        _ => {
            println!("{content}");
        }
    }
    Ok(())
}

/// Show dry run information
fn show_dry_run_info(cli: &Cli, macros: &Macros) {
    if cli.quiet {
        return;
    }
    let output_display = cli
        .output
        .as_ref()
        .map_or("stdout".to_string(), format_output);

    eprintln!("Dry run: would render {} macro(s) -> {output_display}", macros.len());
    eprintln!("Format: {:?}", cli.format);
    eprintln!("Separator: {:?}", cli.separator);
    for m in macros.macros() {
        let label = if m.is_defined() {
            "define".green()
        } else {
            "undef".yellow()
        };
        eprintln!("  {label:>7} {m}");
    }
}

/// Format output path for display
fn format_output(path: &PathBuf) -> String {
    if path == &PathBuf::from("-") {
        "stdout".to_string()
    } else {
        path.display().to_string()
    }
}
