pub mod table;
pub mod terminal;

use async_trait::async_trait;
use serde::Serialize;

use crate::client::FormState;
use crate::model::{format_currency, format_date, Investment, InvestmentId};

pub use terminal::TerminalView;

pub const EMPTY_MESSAGE: &str = "No investments registered.";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load investments. Check the logs for details.";

/// One table row with every cell already formatted for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRow {
    pub id: InvestmentId,
    pub name: String,
    pub kind: String,
    pub value: String,
    pub date: String,
}

impl TableRow {
    pub fn new(inv: &Investment, currency_symbol: &str) -> Self {
        Self {
            id: inv.id.clone(),
            name: inv.name.clone(),
            kind: inv.kind.clone(),
            value: format_currency(currency_symbol, inv.value),
            date: format_date(&inv.date).to_string(),
        }
    }
}

/// Everything the controller needs to draw: the table body and the form.
pub trait View {
    /// Placeholder row while the list request is in flight.
    fn render_loading(&mut self);

    /// Replaces the table body with one row per record. Each row carries
    /// Edit and Delete controls addressed by the row's id.
    fn render_list(&mut self, rows: &[TableRow]);

    /// Single informational row, no action controls.
    fn render_empty(&mut self);

    /// Single error row in place of the table body.
    fn render_error(&mut self, message: &str);

    /// Fills the form for editing; the view shows the cancel control,
    /// scrolls to the form and focuses the first field.
    fn populate_form(&mut self, form: &FormState);

    /// Back to the empty add-mode form, focus on the first field.
    fn reset_form(&mut self, form: &FormState);

    /// Disables (or re-enables) the submit control around a save request.
    fn set_submitting(&mut self, in_flight: bool);
}

/// User notifications. `confirm` waits for an answer.
#[async_trait]
pub trait Dialogs {
    fn alert(&mut self, message: &str);

    async fn confirm(&mut self, message: &str) -> bool;
}
