use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use chrono::{Local, SecondsFormat};
use clap::Parser;
use eyre::{Context, Result};
use log::{debug, info};

use rooda::config::{ConfigLoader, Environment, LoopConfig, TimestampFormat, resolve_ai_command};
use rooda::prompt::assemble_prompt;

mod cli;

use cli::Cli;
use cli::output::{self, CliError, exit};

/// Configure env_logger from the resolved loop settings.
///
/// `loop.log_level` sets the default filter; `RUST_LOG` still overrides it.
fn setup_logging(loop_config: &LoopConfig) {
    let started = Instant::now();
    let format = loop_config.log_timestamp_format;

    env_logger::Builder::new()
        .filter_level(loop_config.log_level.to_level_filter())
        .parse_default_env()
        .format(move |buf, record| {
            let stamp = match format {
                TimestampFormat::Time | TimestampFormat::TimeMs => {
                    format!("[{}] ", Local::now().format("%H:%M:%S%.3f"))
                }
                TimestampFormat::Relative => format!("[+{:.3}s] ", started.elapsed().as_secs_f64()),
                TimestampFormat::Iso => format!("[{}] ", Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)),
                TimestampFormat::None => String::new(),
            };
            writeln!(buf, "{}{:<5} {}", stamp, record.level(), record.args())
        })
        .init();
}

fn run_application(cli: &Cli, workspace_dir: &Path) -> Result<()> {
    cli.validate()?;
    let flags = cli.to_flags();

    let config = ConfigLoader::new(Environment::from_process(), workspace_dir)
        .load(&flags)
        .context("Failed to load configuration")?;

    setup_logging(&config.loop_config);
    info!("Loaded configuration ({} settings tracked)", config.provenance.len());

    if cli.list_procedures {
        output::print_procedures(&config);
        return Ok(());
    }

    let Some(name) = cli.procedure.as_deref() else {
        return Err(CliError::NoProcedure {
            available: config.procedure_names(),
        }
        .into());
    };

    let procedure = config
        .procedure(name)?
        .clone()
        .with_phase_overrides(&flags, workspace_dir);
    let command = resolve_ai_command(&config, name, &flags)?;
    debug!("Resolved AI command: {}", command);

    let prompt = assemble_prompt(&procedure, &flags.user_context(), workspace_dir)
        .with_context(|| format!("Failed to assemble prompt for '{}'", name))?;
    let settings = config.iteration_settings(&procedure);

    if cli.verbose {
        output::print_provenance(&config.provenance);
    }

    if cli.dry_run {
        output::print_dry_run(name, &command, &settings, &prompt);
        return Ok(());
    }

    Err(CliError::LoopUnavailable.into())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = std::env::current_dir()
        .context("Failed to determine working directory")
        .and_then(|workspace_dir| run_application(&cli, &workspace_dir));

    match result {
        Ok(()) => ExitCode::from(exit::SUCCESS),
        Err(err) => {
            output::print_error(&err);
            ExitCode::from(output::exit_code(&err))
        }
    }
}
