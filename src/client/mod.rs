pub mod form;

use tracing::{error, info, warn};

use crate::api::InvestmentApi;
use crate::model::format::DEFAULT_CURRENCY_SYMBOL;
use crate::model::{Investment, InvestmentId};
use crate::view::{Dialogs, TableRow, View, LOAD_ERROR_MESSAGE};

pub use form::{Field, FormError, FormFields, FormState, Mode};

#[derive(Clone, Debug, PartialEq)]
pub enum ListOutcome {
    Rendered(usize),
    Empty,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditOutcome {
    Loaded,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SaveOutcome {
    Created(Option<Investment>),
    Updated(Option<Investment>),
    /// The form did not produce a payload; nothing was sent.
    Rejected(FormError),
    /// Another save is still waiting for its response.
    Busy,
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    Failed,
}

impl ListOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ListOutcome::Failed)
    }
}

impl EditOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EditOutcome::Loaded)
    }
}

impl SaveOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SaveOutcome::Created(_) | SaveOutcome::Updated(_))
    }
}

impl DeleteOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeleteOutcome::Failed)
    }
}

/// Holds the form in flight; dropping it re-enables submission, also when
/// the save future is cancelled mid-request.
struct Submitting<'a, V: View> {
    form: &'a mut FormState,
    view: &'a mut V,
}

impl<'a, V: View> Submitting<'a, V> {
    fn start(form: &'a mut FormState, view: &'a mut V) -> Self {
        form.in_flight = true;
        view.set_submitting(true);
        Self { form, view }
    }
}

impl<V: View> Drop for Submitting<'_, V> {
    fn drop(&mut self) {
        self.form.in_flight = false;
        self.view.set_submitting(false);
    }
}

/// Binds a form and a table to the investments resource.
///
/// Every operation handles its own failures: it logs them, tells the user
/// through the view and reports an outcome. Nothing is retried, and every
/// successful write is followed by a fresh list request.
pub struct InvestmentClient<A, V> {
    api: A,
    view: V,
    form: FormState,
    currency_symbol: String,
}

impl<A, V> InvestmentClient<A, V>
where
    A: InvestmentApi,
    V: View + Dialogs,
{
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            form: FormState::default(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// What typing into one of the inputs does.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.fields.set(field, value);
    }

    pub async fn list(&mut self) -> ListOutcome {
        self.view.render_loading();
        match self.api.list().await {
            Ok(records) if records.is_empty() => {
                self.view.render_empty();
                ListOutcome::Empty
            }
            Ok(records) => {
                let rows: Vec<TableRow> = records
                    .iter()
                    .map(|inv| TableRow::new(inv, &self.currency_symbol))
                    .collect();
                self.view.render_list(&rows);
                ListOutcome::Rendered(rows.len())
            }
            Err(e) => {
                error!(error = %e, "failed to load investments");
                self.view.render_error(LOAD_ERROR_MESSAGE);
                ListOutcome::Failed
            }
        }
    }

    pub async fn begin_edit(&mut self, id: &InvestmentId) -> EditOutcome {
        info!(%id, "loading investment for editing");
        match self.api.get(id).await {
            Ok(inv) => {
                self.form.load(&inv);
                self.view.populate_form(&self.form);
                EditOutcome::Loaded
            }
            Err(e) => {
                error!(%id, error = %e, "failed to load investment for editing");
                self.view
                    .alert("Could not load the investment data for editing.");
                EditOutcome::Failed
            }
        }
    }

    /// Submits the form: a create in add mode, an update of the edited
    /// record otherwise.
    pub async fn save(&mut self) -> SaveOutcome {
        if self.form.in_flight {
            warn!("save ignored, previous save still in flight");
            return SaveOutcome::Busy;
        }

        let payload = match self.form.fields.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.view.alert(&format!("Could not save. Error: {e}"));
                return SaveOutcome::Rejected(e);
            }
        };

        let mode = self.form.mode.clone();
        let result = {
            let _submitting = Submitting::start(&mut self.form, &mut self.view);
            match &mode {
                Mode::Add => self.api.create(&payload).await,
                Mode::Edit(id) => self.api.update(id, &payload).await,
            }
        };

        match result {
            Ok(echo) => {
                let outcome = match mode {
                    Mode::Add => {
                        info!(name = %payload.name, "investment created");
                        self.view.alert("Investment added successfully!");
                        SaveOutcome::Created(echo)
                    }
                    Mode::Edit(id) => {
                        info!(%id, "investment updated");
                        self.view.alert("Investment updated successfully!");
                        SaveOutcome::Updated(echo)
                    }
                };
                self.cancel_edit();
                self.list().await;
                outcome
            }
            Err(e) => {
                error!(error = %e, "failed to save investment");
                self.view
                    .alert(&format!("Could not save. Error: {}", e.user_message()));
                SaveOutcome::Failed
            }
        }
    }

    pub async fn delete(&mut self, id: &InvestmentId) -> DeleteOutcome {
        let question = format!("Are you sure you want to delete investment ID {id}?");
        if !self.view.confirm(&question).await {
            return DeleteOutcome::Declined;
        }

        match self.api.delete(id).await {
            Ok(()) => {
                info!(%id, "investment deleted");
                self.view.alert("Investment deleted successfully!");
                // the edited record is gone
                if self.form.mode.editing() == Some(id) {
                    self.cancel_edit();
                }
                self.list().await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                error!(%id, error = %e, "failed to delete investment");
                self.view
                    .alert(&format!("Could not delete. Error: {}", e.user_message()));
                DeleteOutcome::Failed
            }
        }
    }

    /// Cancel button and post-save reset.
    pub fn cancel_edit(&mut self) {
        self.form.reset();
        self.view.reset_form(&self.form);
    }
}
