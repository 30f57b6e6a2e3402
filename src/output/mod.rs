pub mod report;

use async_trait::async_trait;

use crate::client::FormState;
use crate::view::{table, Dialogs, TableRow, View, EMPTY_MESSAGE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// What the table body currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TableBody {
    #[default]
    Loading,
    Rows(Vec<TableRow>),
    Empty,
    Error(String),
}

/// A `View` that keeps the last rendered state instead of drawing it, used
/// to export the table. Confirmations are always declined.
#[derive(Clone, Debug, Default)]
pub struct SnapshotView {
    pub body: TableBody,
    pub form: FormState,
    pub alerts: Vec<String>,
}

impl View for SnapshotView {
    fn render_loading(&mut self) {
        self.body = TableBody::Loading;
    }

    fn render_list(&mut self, rows: &[TableRow]) {
        self.body = TableBody::Rows(rows.to_vec());
    }

    fn render_empty(&mut self) {
        self.body = TableBody::Empty;
    }

    fn render_error(&mut self, message: &str) {
        self.body = TableBody::Error(message.to_string());
    }

    fn populate_form(&mut self, form: &FormState) {
        self.form = form.clone();
    }

    fn reset_form(&mut self, form: &FormState) {
        self.form = form.clone();
    }

    fn set_submitting(&mut self, in_flight: bool) {
        self.form.in_flight = in_flight;
    }
}

#[async_trait]
impl Dialogs for SnapshotView {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    async fn confirm(&mut self, _message: &str) -> bool {
        false
    }
}

pub fn render_text(body: &TableBody) -> Vec<u8> {
    let lines = match body {
        TableBody::Loading => table::render_message("Loading..."),
        TableBody::Rows(rows) => table::render_rows(rows),
        TableBody::Empty => table::render_message(EMPTY_MESSAGE),
        TableBody::Error(message) => table::render_message(message),
    };
    let mut out = lines.join("\n");
    out.push('\n');
    out.into_bytes()
}

/// Rows as a JSON array; anything but a populated table exports as `[]`.
pub fn render_json(body: &TableBody) -> Vec<u8> {
    let rows: &[TableRow] = match body {
        TableBody::Rows(rows) => rows,
        _ => &[],
    };
    let mut out = serde_json::to_vec_pretty(rows).unwrap_or_else(|_| b"[]".to_vec());
    out.push(b'\n');
    out
}

pub fn render_html(view: &SnapshotView) -> Vec<u8> {
    report::render_html(&view.body, &view.form)
}

pub fn render(format: OutputFormat, view: &SnapshotView) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(&view.body),
        OutputFormat::Json => render_json(&view.body),
        OutputFormat::Html => render_html(view),
    }
}
