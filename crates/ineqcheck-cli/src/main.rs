#![forbid(unsafe_code)]

mod input;
mod output;
mod report;

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use ineqcheck_core::{EffectiveConfig, check, parse_str, resolve_config};
use output::{CliError, OutputMode};
use report::Checked;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Exit status for I/O, parse and config errors.
const EXIT_ERROR: u8 = 1;
/// Exit status for inconsistent input under `--deny-violations`.
const EXIT_VIOLATIONS: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "ineqcheck",
    author,
    version,
    about = "ineqcheck: consistency checker for chained inequalities",
    long_about = None
)]
struct Cli {
    /// Input files. Reads stdin when none are given or for `-`.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Output format (defaults to pretty on a TTY, text otherwise).
    #[arg(long, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, hide = true)]
    json: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress the verdict line for consistent input.
    #[arg(short, long)]
    quiet: bool,

    /// Exit with status 2 if any input is inconsistent.
    #[arg(long)]
    deny_violations: bool,

    /// Config file to use instead of ./ineqcheck.toml.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    /// Derive the output mode from flags, env and the config `output` key.
    fn output_mode(&self, config_output: Option<&str>) -> OutputMode {
        output::resolve_output_mode(self.format, self.json, config_output)
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("INEQCHECK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "ineqcheck=debug,info"
        } else {
            "ineqcheck=info,warn"
        })
    });

    let format = env::var("INEQCHECK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        generate(shell, &mut command, "ineqcheck", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => return fail(cli.output_mode(None), &err),
    };
    let mode = cli.output_mode(config.output.as_deref());

    match run(&cli, &config, mode) {
        Ok(code) => code,
        Err(err) => fail(mode, &err),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<EffectiveConfig> {
    let project_root = env::current_dir().context("failed to resolve current directory")?;
    let config = resolve_config(&project_root, cli.config.as_deref())?;
    debug!(sources = ?config.sources, "configuration loaded");
    Ok(config)
}

fn run(cli: &Cli, config: &EffectiveConfig, mode: OutputMode) -> anyhow::Result<ExitCode> {
    let options = config.parse_options();
    let inputs = input::read_inputs(&cli.paths)?;

    let mut checked = Vec::with_capacity(inputs.len());
    for input in inputs {
        let relations = parse_str(&input.text, &options)
            .with_context(|| format!("failed to parse {}", input.source))?;
        let report =
            check(&relations).with_context(|| format!("failed to check {}", input.source))?;
        debug!(
            source = %input.source,
            consistent = report.consistent,
            groups = report.groups.len(),
            violations = report.violated.len(),
            "checked input"
        );
        checked.push(Checked {
            source: input.source,
            report,
        });
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::render_all(mode, &checked, cli.quiet, &mut out)?;
    out.flush()?;

    let inconsistent = checked.iter().any(|c| !c.report.consistent);
    if cli.deny_violations && inconsistent {
        return Ok(ExitCode::from(EXIT_VIOLATIONS));
    }
    Ok(ExitCode::SUCCESS)
}

fn fail(mode: OutputMode, err: &anyhow::Error) -> ExitCode {
    let cli_error = CliError::from(err);
    if output::render_error(mode, &cli_error).is_err() {
        debug!("failed to write error to stderr");
    }
    ExitCode::from(EXIT_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_reads_stdin() {
        let cli = Cli::parse_from(["ineqcheck"]);
        assert!(cli.paths.is_empty());
        assert!(cli.format.is_none());
        assert!(!cli.deny_violations);
    }

    #[test]
    fn paths_are_positional() {
        let cli = Cli::parse_from(["ineqcheck", "a.txt", "-", "b.txt"]);
        assert_eq!(
            cli.paths,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("-"),
                PathBuf::from("b.txt")
            ]
        );
    }

    #[test]
    fn format_flag_sets_output_mode() {
        let cli = Cli::parse_from(["ineqcheck", "--format", "text", "in.txt"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(Some("json")), OutputMode::Text);
    }

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["ineqcheck", "--json"]);
        assert!(cli.json);
        assert!(cli.output_mode(None).is_json());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["ineqcheck", "--format", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn short_flags_parse() {
        let cli = Cli::parse_from(["ineqcheck", "-v", "-q"]);
        assert!(cli.verbose);
        assert!(cli.quiet);
    }

    #[test]
    fn deny_violations_and_config_parse() {
        let cli = Cli::parse_from([
            "ineqcheck",
            "--deny-violations",
            "--config",
            "ci.toml",
            "in.txt",
        ]);
        assert!(cli.deny_violations);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert_eq!(cli.paths, vec![PathBuf::from("in.txt")]);
    }

    #[test]
    fn completions_flag_parses_shell() {
        let cli = Cli::parse_from(["ineqcheck", "--completions", "bash"]);
        assert_eq!(cli.completions, Some(Shell::Bash));
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
