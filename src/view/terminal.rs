use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::warn;

use super::{table, Dialogs, TableRow, View, EMPTY_MESSAGE};
use crate::client::{Field, FormState};

/// Prints the table and form to stdout; spinners go to stderr.
pub struct TerminalView {
    assume_yes: bool,
    interactive: bool,
    spinner: Option<ProgressBar>,
}

impl TerminalView {
    pub fn new(assume_yes: bool, interactive: bool) -> Self {
        Self {
            assume_yes,
            interactive,
            spinner: None,
        }
    }

    fn start_spinner(&mut self, msg: &'static str) {
        self.stop_spinner();
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(120));
        match ProgressStyle::with_template(":: {spinner} {msg}") {
            Ok(style) => pb.set_style(style),
            Err(e) => warn!(error = %e, "failed to build spinner style"),
        }
        pb.set_message(msg);
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn print_table(lines: &[String]) {
        println!();
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                println!("{}", line.bold());
            } else {
                println!("{line}");
            }
        }
        println!();
    }
}

/// The form as the shell's `form` command shows it.
pub fn print_form(form: &FormState) {
    let heading = match form.mode.editing() {
        Some(id) => format!(":: Editing investment {id} ::"),
        None => ":: New investment ::".to_string(),
    };
    println!("{}", heading.bold().white());
    for field in Field::ALL {
        let marker = if field == form.first_field() { ">" } else { " " };
        println!(
            "{marker} {:<6}: {}",
            field.label(),
            form.fields.get(field)
        );
    }
    let mut controls = format!("[{}]", form.submit_label());
    if form.cancel_visible() {
        controls.push_str(" [Cancel]");
    }
    println!("  {}", controls.bold());
}

impl View for TerminalView {
    fn render_loading(&mut self) {
        self.start_spinner("Loading...");
    }

    fn render_list(&mut self, rows: &[TableRow]) {
        self.stop_spinner();
        Self::print_table(&table::render_rows(rows));
    }

    fn render_empty(&mut self) {
        self.stop_spinner();
        Self::print_table(&table::render_message(EMPTY_MESSAGE));
    }

    fn render_error(&mut self, message: &str) {
        self.stop_spinner();
        let mut lines = table::render_message(message);
        if let Some(last) = lines.last_mut() {
            *last = last.red().to_string();
        }
        Self::print_table(&lines);
    }

    fn populate_form(&mut self, form: &FormState) {
        println!();
        print_form(form);
    }

    fn reset_form(&mut self, form: &FormState) {
        if self.interactive {
            println!();
            print_form(form);
        }
    }

    fn set_submitting(&mut self, in_flight: bool) {
        if in_flight {
            self.start_spinner("Saving...");
        } else {
            self.stop_spinner();
        }
    }
}

/// Reads one line from stdin off the async workers. `Ok(None)` on EOF.
pub async fn read_line() -> Result<Option<String>, String> {
    let read = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|n| (n, line))
    })
    .await
    .map_err(|e| format!("failed to read input: {e}"))?;
    match read {
        Ok((0, _)) => Ok(None),
        Ok((_, line)) => Ok(Some(line)),
        Err(e) => Err(format!("failed to read input: {e}")),
    }
}

#[async_trait]
impl Dialogs for TerminalView {
    fn alert(&mut self, message: &str) {
        self.stop_spinner();
        println!(
            "{}{}{} {}",
            "[".bold().white(),
            "!".bold().yellow(),
            "]".bold().white(),
            message.bold().white()
        );
    }

    async fn confirm(&mut self, message: &str) -> bool {
        self.stop_spinner();
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", message.bold().white());
        if io::stdout().flush().is_err() {
            return false;
        }
        match read_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "confirmation not read");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl Drop for TerminalView {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
