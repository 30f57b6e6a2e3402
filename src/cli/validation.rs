use std::sync::OnceLock;

use regex::Regex;

use crate::api::Endpoints;
use crate::cli::args::{CliArgs, Command, RecordArgs};
use crate::output::OutputFormat;

fn input_date_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").ok())
        .as_ref()
}

/// `YYYY-MM-DD`, the shape a date input produces.
pub fn is_input_date(value: &str) -> bool {
    input_date_pattern().is_some_and(|re| re.is_match(value.trim()))
}

fn validate_record(fields: &RecordArgs) -> Result<(), String> {
    if let Some(raw) = fields.date.as_deref() {
        if !is_input_date(raw) {
            return Err(format!("invalid --date '{raw}', expected YYYY-MM-DD"));
        }
    }
    Ok(())
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.base_url.as_deref() {
        Endpoints::parse(raw).map_err(|e| format!("invalid --url: {e}"))?;
    }
    if let Some(raw) = args.currency.as_deref() {
        if raw.trim().is_empty() {
            return Err("invalid --currency, expected a non-empty marker".to_string());
        }
    }
    match &args.command {
        Some(Command::Add(fields)) => validate_record(fields)?,
        Some(Command::Edit { fields, .. }) => {
            if fields.is_empty() {
                return Err(
                    "edit needs at least one of --name, --kind, --value or --date".to_string(),
                );
            }
            validate_record(fields)?;
        }
        Some(Command::Export {
            output_format: Some(raw),
            ..
        }) => {
            if OutputFormat::parse(raw).is_none() {
                return Err(format!(
                    "invalid --output-format '{raw}', expected text, json or html"
                ));
            }
        }
        _ => {}
    }
    Ok(())
}
