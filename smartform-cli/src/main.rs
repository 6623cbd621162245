use std::{
    fs::File,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::{Arc, Mutex},
};

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use smartform::{
    FormConfig, FormMode, FormSession, FormValues, ObjectTypeRegistry, SessionOutcome,
    SmartFormUI, UiOptions,
    domain::values_to_value,
    io::{
        DocumentFormat, OutputDestination, OutputOptions, config_schema, emit, load_form_config,
        load_values, read_document, render_document,
    },
};

const LOG_ENV: &str = "SMARTFORM_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "smartform",
    version,
    about = "Edit, view and configure typed record forms in the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Document format, overriding what file extensions suggest
    #[arg(long = "format", value_name = "FORMAT", global = true)]
    format: Option<DocumentFormat>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty", global = true)]
    no_pretty: bool,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Edit values in an interactive form; saved values are emitted on exit
    Edit {
        #[command(flatten)]
        form: FormArgs,
        /// Initial values: file path or "-" for stdin
        #[arg(short = 'v', long = "values", value_name = "SPEC")]
        values: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Display values read only
    View {
        #[command(flatten)]
        form: FormArgs,
        /// Values to display: file path or "-" for stdin
        #[arg(short = 'v', long = "values", value_name = "SPEC")]
        values: String,
    },
    /// Add, remove, reorder and configure fields; the saved config is emitted on exit
    Configure {
        #[command(flatten)]
        form: FormArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check values against a config without opening the UI
    Validate {
        #[command(flatten)]
        form: FormArgs,
        /// Values to check: file path or "-" for stdin
        #[arg(short = 'v', long = "values", value_name = "SPEC")]
        values: String,
    },
    /// Print the JSON Schema accepted for config documents
    Schema,
    /// List the registered field types
    Types,
}

#[derive(Debug, Args)]
struct FormArgs {
    /// Form config: file path or "-" for stdin
    #[arg(short = 'c', long = "config", value_name = "SPEC")]
    config: String,

    /// Title shown at the top of the UI
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Output destinations ("-" writes to stdout). Defaults to stdout.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,
}

impl Command {
    fn is_interactive(&self) -> bool {
        matches!(
            self,
            Command::Edit { .. } | Command::View { .. } | Command::Configure { .. }
        )
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.command.is_interactive())?;

    let registry = Arc::new(ObjectTypeRegistry::builtin());
    match &cli.command {
        Command::Edit {
            form,
            values,
            output,
        } => {
            let config = load_config(&form.config, cli.format)?;
            let values = match values {
                Some(spec) => load_value_map(spec, cli.format)?,
                None => FormValues::new(),
            };
            let outcome = ui(form, config, registry, FormMode::Edit)
                .with_values(values)
                .run()
                .map_err(lift)?;
            if let SessionOutcome::Values(values) = outcome {
                write_result(&values_to_value(&values), &cli, output)?;
            }
        }
        Command::View { form, values } => {
            let config = load_config(&form.config, cli.format)?;
            let values = load_value_map(values, cli.format)?;
            ui(form, config, registry, FormMode::View)
                .with_values(values)
                .run()
                .map_err(lift)?;
        }
        Command::Configure { form, output } => {
            let config = load_config(&form.config, cli.format)?;
            let outcome = ui(form, config, registry, FormMode::Configure)
                .run()
                .map_err(lift)?;
            if let SessionOutcome::Config(config) = outcome {
                write_result(&config.to_value(), &cli, output)?;
            }
        }
        Command::Validate { form, values } => {
            let config = load_config(&form.config, cli.format)?;
            let values = load_value_map(values, cli.format)?;
            return Ok(validate(registry, &config, values));
        }
        Command::Schema => {
            let schema = config_schema().map_err(lift)?;
            let format = cli.format.unwrap_or_default();
            println!(
                "{}",
                render_document(&schema, format, !cli.no_pretty).map_err(lift)?
            );
        }
        Command::Types => {
            for name in registry.type_names() {
                println!("{name}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Log lines would tear through the alternate screen.
        None if interactive => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Library errors arrive as `anyhow::Error`; keep their whole context chain.
fn lift(err: impl std::fmt::Display) -> Report {
    eyre!("{err:#}")
}

fn load_config(spec: &str, format: Option<DocumentFormat>) -> Result<FormConfig> {
    let document = read_document(spec, format).map_err(lift)?;
    let config =
        load_form_config(&document).map_err(|err| eyre!("config {spec}: {err:#}"))?;
    tracing::debug!(source = spec, fields = config.len(), "form config loaded");
    Ok(config)
}

fn load_value_map(spec: &str, format: Option<DocumentFormat>) -> Result<FormValues> {
    let document = read_document(spec, format).map_err(lift)?;
    load_values(&document).wrap_err_with(|| format!("values {spec}"))
}

fn ui(
    form: &FormArgs,
    config: FormConfig,
    registry: Arc<ObjectTypeRegistry>,
    mode: FormMode,
) -> SmartFormUI {
    let mut ui = SmartFormUI::from_config(config)
        .with_mode(mode)
        .with_registry(registry)
        .with_options(UiOptions::default());
    if let Some(title) = &form.title {
        ui = ui.with_title(title.clone());
    }
    ui
}

fn validate(registry: Arc<ObjectTypeRegistry>, config: &FormConfig, values: FormValues) -> ExitCode {
    let mut session =
        FormSession::from_config(registry, config, FormMode::Edit).with_initial_values(values);
    if session.validate_all() {
        tracing::info!("all fields valid");
        println!("valid");
        return ExitCode::SUCCESS;
    }
    for (name, field) in session.sorted_fields() {
        if let Some(message) = session.error(name) {
            tracing::debug!(field = name, %message, "validation failed");
            println!("{}: {message}", field.display_label(name));
        }
    }
    ExitCode::FAILURE
}

fn write_result(value: &Value, cli: &Cli, output: &OutputArgs) -> Result<()> {
    let mut destinations = Vec::new();
    for raw in &output.outputs {
        if raw.trim().is_empty() {
            return Err(eyre!("output destination cannot be empty"));
        }
        destinations.push(OutputDestination::parse(raw));
    }
    if destinations.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }
    let format = cli
        .format
        .or_else(|| destinations.iter().find_map(OutputDestination::inferred_format))
        .unwrap_or_default();
    tracing::debug!(%format, destinations = destinations.len(), "writing result");
    let options = OutputOptions::new(format)
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations);
    emit(value, &options).map_err(lift)
}
