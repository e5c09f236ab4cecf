// crates/module-gate-cli/src/main.rs
// ============================================================================
// Module: Module Gate CLI Entry Point
// Description: Command dispatcher for descriptor checks and config utilities.
// Purpose: Validate module descriptor manifests from the command line.
// Dependencies: clap, module-gate-config, module-gate-core, serde, serde_json, thiserror.
// ============================================================================

//! ## Overview
//! The `module-gate` CLI loads a descriptor manifest, resolves the host
//! platform from flags, configuration, or the build target, and prints every
//! violation found. Exit status is 0 for a clean run, 1 when violations were
//! found, and 2 when the run could not complete. All user-facing strings are
//! routed through the message catalog.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use module_gate_cli::t;
use module_gate_config::ModuleGateConfig;
use module_gate_config::config_toml_example;
use module_gate_core::HostPlatform;
use module_gate_core::JsonManifestSource;
use module_gate_core::ValidationReport;
use module_gate_core::Validator;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Exit Codes
// ============================================================================

/// Exit status when violations were found.
const EXIT_VIOLATIONS: u8 = 1;
/// Exit status when the run could not complete.
const EXIT_FATAL: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "module-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a descriptor manifest against the host platform.
    Check(CheckCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Descriptor manifest (JSON) to validate.
    #[arg(long, value_name = "PATH")]
    descriptors: PathBuf,
    /// Optional config file path (defaults to module-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Host operating system name (overrides config and build target).
    #[arg(long, value_name = "OS")]
    host_os: Option<String>,
    /// Host architecture name (overrides config and build target).
    #[arg(long, value_name = "ARCH")]
    host_arch: Option<String>,
    /// Report output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file.
    Validate(ConfigValidateCommand),
    /// Print an example config file.
    Example,
}

/// Configuration for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to module-gate.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Report output formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One line per violation plus a summary line.
    Text,
    /// The full report as JSON.
    Json,
}

/// JSON output envelope for `check`.
#[derive(Serialize)]
struct CheckOutput<'a> {
    /// Host platform the descriptors were checked against.
    host: &'a HostPlatform,
    /// Base module name.
    base_module: &'a str,
    /// Validation report.
    report: &'a ValidationReport,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog-formatted error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a formatted message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Check(command) => command_check(&command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the descriptor check command.
fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let config = ModuleGateConfig::load_optional(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let host = resolve_host(
        &config,
        command.host_os.as_deref(),
        command.host_arch.as_deref(),
        HostPlatform::from_build_target(),
    )?;
    let sink =
        config.audit_sink().map_err(|err| CliError::new(t!("config.audit_failed", error = err)))?;
    let validator = Validator::new(config.validator_settings(host)).with_audit_sink(sink);

    let source = JsonManifestSource::new(&command.descriptors);
    let report = validator
        .run(&source)
        .map_err(|err| CliError::new(t!("check.source_failed", error = err)))?;

    let settings = validator.settings();
    match command.format {
        OutputFormat::Text => {
            let rendered = render_report_text(&report, &settings.host);
            write_stdout_line(&rendered)
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
        OutputFormat::Json => {
            let output = CheckOutput {
                host: &settings.host,
                base_module: &settings.base_module,
                report: &report,
            };
            let json = serde_json::to_string_pretty(&output)
                .map_err(|err| CliError::new(t!("check.json_failed", error = err)))?;
            write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
        }
    }

    if report.is_success() { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::from(EXIT_VIOLATIONS)) }
}

/// Resolves the host platform: flags first, then config, then `fallback`.
fn resolve_host(
    config: &ModuleGateConfig,
    os_name: Option<&str>,
    os_arch: Option<&str>,
    fallback: HostPlatform,
) -> CliResult<HostPlatform> {
    let mut host = config.host_platform(fallback);
    if let Some(os_name) = os_name {
        host.os_name = non_blank_host_field("os", os_name)?;
    }
    if let Some(os_arch) = os_arch {
        host.os_arch = non_blank_host_field("arch", os_arch)?;
    }
    Ok(host)
}

/// Rejects a blank host override.
fn non_blank_host_field(field: &str, value: &str) -> CliResult<String> {
    if value.trim().is_empty() {
        return Err(CliError::new(t!("check.host.blank", field = field)));
    }
    Ok(value.to_string())
}

/// Renders a report as one line per violation followed by a summary.
fn render_report_text(report: &ValidationReport, host: &HostPlatform) -> String {
    let mut lines: Vec<String> = report
        .violations()
        .iter()
        .map(|violation| t!("check.violation", violation = violation))
        .collect();
    let summary = if report.is_success() {
        t!(
            "check.summary.ok",
            modules = report.modules_checked,
            host = host,
            fields = report.fields_probed
        )
    } else {
        t!(
            "check.summary.failed",
            count = report.violations().len(),
            modules = report.modules_checked,
            host = host
        )
    };
    lines.push(summary);
    lines.join("\n")
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = ModuleGateConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    write_stdout_line(&t!("config.validate.ok"))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the example configuration.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns the fatal exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_FATAL)
}
