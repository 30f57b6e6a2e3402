use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use tracing::{debug, info};

use crate::api::{HttpApi, DEFAULT_BASE_URL};
use crate::cli::args::{CliArgs, Command, RecordArgs};
use crate::cli::validation;
use crate::client::{Field, InvestmentClient};
use crate::config::{self, ConfigFile};
use crate::model::format::DEFAULT_CURRENCY_SYMBOL;
use crate::model::InvestmentId;
use crate::output::{self, OutputFormat, SnapshotView};
use crate::view::TerminalView;
use crate::{logging, shell};

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn parse_id(raw: &str) -> Result<InvestmentId, String> {
    raw.parse::<InvestmentId>()
        .map_err(|e| format!("invalid id '{raw}': {e}"))
}

#[derive(Clone, Debug)]
struct RunConfig {
    base_url: String,
    timeout: Option<Duration>,
    currency_symbol: String,
    no_color: bool,
    assume_yes: bool,
    verbose: u8,
    output: Option<String>,
    output_format: Option<String>,
    command: Command,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };
    let assume_yes = args.assume_yes || cfg.assume_yes.unwrap_or(false);

    let base_url = args
        .base_url
        .or(cfg.base_url)
        .map(|u| u.trim().to_string())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    crate::api::Endpoints::parse(&base_url).map_err(|e| e.to_string())?;

    let timeout = match args.timeout.or(cfg.timeout).unwrap_or(0) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    let currency_symbol = args
        .currency
        .or(cfg.currency_symbol)
        .map(|c| c.trim().to_string())
        .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());
    if currency_symbol.is_empty() {
        return Err("invalid currency_symbol, expected a non-empty marker".to_string());
    }

    let output_format = cfg.output_format;
    if let Some(raw) = output_format.as_deref() {
        if OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid output_format '{raw}', expected text, json or html"
            ));
        }
    }

    Ok(RunConfig {
        base_url,
        timeout,
        currency_symbol,
        no_color,
        assume_yes,
        verbose: args.verbose,
        output: cfg.output.map(|p| config::expand_tilde_string(&p)),
        output_format,
        command: args.command.unwrap_or(Command::Shell),
    })
}

fn apply_record_args<V>(client: &mut InvestmentClient<HttpApi, V>, fields: RecordArgs)
where
    V: crate::view::View + crate::view::Dialogs,
{
    let values = [
        (Field::Name, fields.name),
        (Field::Kind, fields.kind),
        (Field::Value, fields.value),
        (Field::Date, fields.date),
    ];
    for (field, value) in values {
        if let Some(value) = value {
            client.set_field(field, value);
        }
    }
}

/// Picks the export format: explicit flag, then the output file extension,
/// then the config file, then plain text.
fn resolve_export_format(
    flag: Option<&str>,
    output: Option<&str>,
    configured: Option<&str>,
) -> OutputFormat {
    flag.and_then(OutputFormat::parse)
        .or_else(|| output.and_then(output::infer_format_from_path))
        .or_else(|| configured.and_then(OutputFormat::parse))
        .unwrap_or(OutputFormat::Text)
}

async fn export(
    run: &RunConfig,
    api: HttpApi,
    output: Option<String>,
    output_format: Option<String>,
) -> Result<bool, String> {
    let mut client = InvestmentClient::new(api, SnapshotView::default())
        .with_currency_symbol(run.currency_symbol.clone());
    let outcome = client.list().await;
    let view = client.into_view();

    let output = output.or_else(|| run.output.clone());
    let format = resolve_export_format(
        output_format.as_deref(),
        output.as_deref(),
        run.output_format.as_deref(),
    );
    let bytes = output::render(format, &view);

    match output {
        Some(path) => {
            let path = config::expand_tilde_string(&path);
            tokio::fs::write(&path, &bytes)
                .await
                .map_err(|e| format!("failed to write output '{path}': {e}"))?;
            info!(path = %path, ?format, "table exported");
            format_kv_line("Output", &path);
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout
                .write_all(&bytes)
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("failed to write output: {e}"))?;
        }
    }
    Ok(outcome.is_success())
}

async fn run_async(run: RunConfig) -> Result<bool, String> {
    let api = HttpApi::new(&run.base_url, run.timeout).map_err(|e| e.to_string())?;
    debug!(base_url = %run.base_url, timeout = ?run.timeout, "client ready");

    let interactive = matches!(run.command, Command::Shell);
    let view = TerminalView::new(run.assume_yes, interactive);

    match run.command.clone() {
        Command::Export {
            output,
            output_format,
        } => export(&run, api, output, output_format).await,
        command => {
            let mut client =
                InvestmentClient::new(api, view).with_currency_symbol(run.currency_symbol.clone());
            let ok = match command {
                Command::List => client.list().await.is_success(),
                Command::Show { id } => client.begin_edit(&parse_id(&id)?).await.is_success(),
                Command::Add(fields) => {
                    apply_record_args(&mut client, fields);
                    client.save().await.is_success()
                }
                Command::Edit { id, fields } => {
                    let id = parse_id(&id)?;
                    if !client.begin_edit(&id).await.is_success() {
                        return Ok(false);
                    }
                    apply_record_args(&mut client, fields);
                    client.save().await.is_success()
                }
                Command::Delete { id } => client.delete(&parse_id(&id)?).await.is_success(),
                Command::Shell => {
                    format_kv_line("API", &run.base_url);
                    shell::run(&mut client).await?;
                    true
                }
                Command::Export { .. } | Command::InitConfig => true,
            };
            Ok(ok)
        }
    }
}

fn init_config(path: Option<&str>) -> Result<(), String> {
    let path: PathBuf = match path {
        Some(p) => config::expand_tilde(p),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine the home directory".to_string())?,
    };
    if config::ensure_default_config_file(&path)? {
        format_kv_line("Config", &format!("written to {}", path.display()));
    } else {
        format_kv_line("Config", &format!("{} already exists", path.display()));
    }
    Ok(())
}

/// Parses the command line, runs it and reports whether the requested
/// operation succeeded.
pub fn run_cli() -> Result<bool, String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{e}");
                return Ok(true);
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(true);
            }
            _ => return Err(e.to_string()),
        },
    };

    if matches!(args.command, Some(Command::InitConfig)) {
        init_config(args.config.as_deref())?;
        return Ok(true);
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    if run.no_color {
        colored::control::set_override(false);
    }
    logging::init(run.verbose, run.no_color);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    let ok = rt.block_on(run_async(run))?;
    if !ok {
        debug!("operation did not succeed");
        eprintln!("{}", "operation failed".red());
    }
    Ok(ok)
}
