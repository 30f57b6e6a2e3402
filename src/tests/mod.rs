use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, InvestmentApi};
use crate::client::{
    DeleteOutcome, EditOutcome, Field, FormError, FormState, InvestmentClient, ListOutcome, Mode,
    SaveOutcome,
};
use crate::model::{Investment, InvestmentId, InvestmentPayload};
use crate::view::{Dialogs, TableRow, View, EMPTY_MESSAGE, LOAD_ERROR_MESSAGE};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    List,
    Get(InvestmentId),
    Create(InvestmentPayload),
    Update(InvestmentId, InvestmentPayload),
    Delete(InvestmentId),
}

#[derive(Debug, Default)]
struct FakeState {
    records: Vec<Investment>,
    next_id: i64,
    calls: Vec<Call>,
    fail_list: bool,
    fail_get: bool,
    fail_write: Option<(u16, Option<String>)>,
    fail_delete: bool,
    write_delay: Duration,
}

/// In-memory investments API that records every call.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
}

fn status_error(method: &'static str, status: u16, detail: Option<String>) -> ApiError {
    let reason = match status {
        404 => "Not Found",
        422 => "Unprocessable Entity",
        _ => "Internal Server Error",
    };
    ApiError::Status {
        method,
        url: "http://fake/api/v1/investimentos/".to_string(),
        status,
        reason: reason.to_string(),
        detail,
    }
}

pub(crate) fn investment(id: i64, name: &str, value: f64, date: &str) -> Investment {
    Investment {
        id: InvestmentId::from(id),
        name: name.to_string(),
        kind: "Renda Fixa".to_string(),
        value,
        date: date.to_string(),
    }
}

impl FakeApi {
    pub(crate) fn with_records(records: Vec<Investment>) -> Self {
        let next_id = records.len() as i64 + 1;
        Self {
            state: Mutex::new(FakeState {
                records,
                next_id,
                ..FakeState::default()
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.with_state(|s| s.calls.clone())
    }

    pub(crate) fn list_count(&self) -> usize {
        self.with_state(|s| s.calls.iter().filter(|c| **c == Call::List).count())
    }

    fn fail_list(&self, fail: bool) {
        self.with_state(|s| s.fail_list = fail);
    }

    fn fail_get(&self, fail: bool) {
        self.with_state(|s| s.fail_get = fail);
    }

    fn fail_write(&self, status: u16, detail: Option<&str>) {
        self.with_state(|s| s.fail_write = Some((status, detail.map(str::to_string))));
    }

    /// Create and update wait this long before answering.
    pub(crate) fn delay_writes(&self, delay: Duration) {
        self.with_state(|s| s.write_delay = delay);
    }

    async fn write_pause(&self) {
        let delay = self.with_state(|s| s.write_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn fail_delete(&self, fail: bool) {
        self.with_state(|s| s.fail_delete = fail);
    }
}

#[async_trait]
impl InvestmentApi for FakeApi {
    async fn list(&self) -> Result<Vec<Investment>, ApiError> {
        self.with_state(|s| {
            s.calls.push(Call::List);
            if s.fail_list {
                return Err(status_error("GET", 500, None));
            }
            Ok(s.records.clone())
        })
    }

    async fn get(&self, id: &InvestmentId) -> Result<Investment, ApiError> {
        self.with_state(|s| {
            s.calls.push(Call::Get(id.clone()));
            if s.fail_get {
                return Err(status_error("GET", 500, None));
            }
            s.records
                .iter()
                .find(|r| &r.id == id)
                .cloned()
                .ok_or_else(|| status_error("GET", 404, Some("Investimento não encontrado".to_string())))
        })
    }

    async fn create(&self, payload: &InvestmentPayload) -> Result<Option<Investment>, ApiError> {
        self.write_pause().await;
        self.with_state(|s| {
            s.calls.push(Call::Create(payload.clone()));
            if let Some((status, detail)) = s.fail_write.clone() {
                return Err(status_error("POST", status, detail));
            }
            let record = Investment {
                id: InvestmentId::from(s.next_id),
                name: payload.name.clone(),
                kind: payload.kind.clone(),
                value: payload.value,
                date: payload.date.clone(),
            };
            s.next_id += 1;
            s.records.push(record.clone());
            Ok(Some(record))
        })
    }

    async fn update(
        &self,
        id: &InvestmentId,
        payload: &InvestmentPayload,
    ) -> Result<Option<Investment>, ApiError> {
        self.write_pause().await;
        self.with_state(|s| {
            s.calls.push(Call::Update(id.clone(), payload.clone()));
            if let Some((status, detail)) = s.fail_write.clone() {
                return Err(status_error("PUT", status, detail));
            }
            let record = s
                .records
                .iter_mut()
                .find(|r| &r.id == id)
                .ok_or_else(|| status_error("PUT", 404, Some("Investimento não encontrado".to_string())))?;
            record.name = payload.name.clone();
            record.kind = payload.kind.clone();
            record.value = payload.value;
            record.date = payload.date.clone();
            Ok(Some(record.clone()))
        })
    }

    async fn delete(&self, id: &InvestmentId) -> Result<(), ApiError> {
        self.with_state(|s| {
            s.calls.push(Call::Delete(id.clone()));
            if s.fail_delete {
                return Err(status_error("DELETE", 500, None));
            }
            let before = s.records.len();
            s.records.retain(|r| &r.id != id);
            if s.records.len() == before {
                return Err(status_error("DELETE", 404, None));
            }
            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Body {
    Loading,
    Rows(Vec<TableRow>),
    Empty,
    Error(String),
}

/// View double: keeps the latest table body and form plus every dialog.
#[derive(Debug, Default)]
pub(crate) struct RecordingView {
    pub(crate) body: Option<Body>,
    pub(crate) form: Option<FormState>,
    pub(crate) populated: usize,
    pub(crate) resets: usize,
    pub(crate) submitting: Vec<bool>,
    pub(crate) alerts: Vec<String>,
    pub(crate) confirms: Vec<String>,
    pub(crate) confirm_answer: bool,
}

impl RecordingView {
    pub(crate) fn answering(confirm_answer: bool) -> Self {
        Self {
            confirm_answer,
            ..Self::default()
        }
    }
}

impl View for RecordingView {
    fn render_loading(&mut self) {
        self.body = Some(Body::Loading);
    }

    fn render_list(&mut self, rows: &[TableRow]) {
        self.body = Some(Body::Rows(rows.to_vec()));
    }

    fn render_empty(&mut self) {
        self.body = Some(Body::Empty);
    }

    fn render_error(&mut self, message: &str) {
        self.body = Some(Body::Error(message.to_string()));
    }

    fn populate_form(&mut self, form: &FormState) {
        self.populated += 1;
        self.form = Some(form.clone());
    }

    fn reset_form(&mut self, form: &FormState) {
        self.resets += 1;
        self.form = Some(form.clone());
    }

    fn set_submitting(&mut self, in_flight: bool) {
        self.submitting.push(in_flight);
    }
}

#[async_trait]
impl Dialogs for RecordingView {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    async fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm_answer
    }
}

fn sample_records() -> Vec<Investment> {
    vec![
        investment(1, "Tesouro Selic 2029", 1000.5, "2024-05-29"),
        investment(2, "CDB Banco X", 2500.0, "2024-06-01T00:00:00"),
        investment(3, "PETR4", 33.333, "2024-07-15T13:45:00Z"),
    ]
}

fn client_with(
    records: Vec<Investment>,
    confirm_answer: bool,
) -> InvestmentClient<FakeApi, RecordingView> {
    InvestmentClient::new(
        FakeApi::with_records(records),
        RecordingView::answering(confirm_answer),
    )
}

fn fill_form(client: &mut InvestmentClient<FakeApi, RecordingView>) {
    client.set_field(Field::Name, "Fundo Imobiliário");
    client.set_field(Field::Kind, "FII");
    client.set_field(Field::Value, "1500.75");
    client.set_field(Field::Date, "2024-08-01");
}

fn rows_of(view: &RecordingView) -> Vec<TableRow> {
    match &view.body {
        Some(Body::Rows(rows)) => rows.clone(),
        other => panic!("expected rows, got {other:?}"),
    }
}

#[tokio::test]
async fn list_renders_one_formatted_row_per_record() {
    let mut client = client_with(sample_records(), true);
    assert_eq!(client.list().await, ListOutcome::Rendered(3));

    let rows = rows_of(client.view());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].id.as_str(), "1");
    assert_eq!(rows[0].name, "Tesouro Selic 2029");
    assert_eq!(rows[0].kind, "Renda Fixa");
    assert_eq!(rows[0].value, "R$ 1000.50");
    assert_eq!(rows[0].date, "2024-05-29");
    assert_eq!(rows[1].value, "R$ 2500.00");
    assert_eq!(rows[1].date, "2024-06-01");
    assert_eq!(rows[2].value, "R$ 33.33");
    assert_eq!(rows[2].date, "2024-07-15");
    assert!(client.view().alerts.is_empty());
}

#[tokio::test]
async fn list_uses_configured_currency_marker() {
    let mut client = client_with(sample_records(), true).with_currency_symbol("US$");
    client.list().await;
    assert_eq!(rows_of(client.view())[1].value, "US$ 2500.00");
}

#[tokio::test]
async fn empty_list_renders_single_informational_row() {
    let mut client = client_with(Vec::new(), true);
    assert_eq!(client.list().await, ListOutcome::Empty);
    assert_eq!(client.view().body, Some(Body::Empty));
    assert!(client.view().alerts.is_empty());
    assert!(!EMPTY_MESSAGE.is_empty());
}

#[tokio::test]
async fn failed_list_renders_error_row_without_alert() {
    let mut client = client_with(sample_records(), true);
    client.api().fail_list(true);
    assert_eq!(client.list().await, ListOutcome::Failed);
    assert_eq!(
        client.view().body,
        Some(Body::Error(LOAD_ERROR_MESSAGE.to_string()))
    );
    assert!(client.view().alerts.is_empty());
    assert_eq!(client.api().list_count(), 1);
}

#[tokio::test]
async fn begin_edit_populates_every_field() {
    let mut client = client_with(sample_records(), true);
    let id = InvestmentId::new("2");
    assert_eq!(client.begin_edit(&id).await, EditOutcome::Loaded);

    let form = client.form();
    assert_eq!(form.mode, Mode::Edit(id.clone()));
    assert_eq!(form.fields.name, "CDB Banco X");
    assert_eq!(form.fields.kind, "Renda Fixa");
    assert_eq!(form.fields.value, "2500");
    assert_eq!(form.fields.date, "2024-06-01");
    assert!(form.cancel_visible());
    assert_eq!(form.submit_label(), "Update");

    assert_eq!(client.view().populated, 1);
    assert_eq!(client.view().form.as_ref(), Some(client.form()));
    assert_eq!(client.api().calls(), vec![Call::Get(id)]);
}

#[tokio::test]
async fn failed_begin_edit_leaves_form_untouched_and_alerts() {
    let mut client = client_with(sample_records(), true);
    fill_form(&mut client);
    let before = client.form().clone();

    client.api().fail_get(true);
    assert_eq!(
        client.begin_edit(&InvestmentId::new("1")).await,
        EditOutcome::Failed
    );
    assert_eq!(client.form(), &before);
    assert_eq!(client.view().populated, 0);
    assert_eq!(client.view().alerts.len(), 1);
}

#[tokio::test]
async fn save_in_add_mode_creates_and_refetches() {
    let mut client = client_with(sample_records(), true);
    fill_form(&mut client);

    let created = match client.save().await {
        SaveOutcome::Created(Some(created)) => created,
        other => panic!("expected a created record, got {other:?}"),
    };
    assert_eq!(created.id.as_str(), "4");

    let calls = client.api().calls();
    assert_eq!(
        calls[0],
        Call::Create(InvestmentPayload {
            name: "Fundo Imobiliário".to_string(),
            kind: "FII".to_string(),
            value: 1500.75,
            date: "2024-08-01".to_string(),
        })
    );
    assert!(!calls.iter().any(|c| matches!(c, Call::Update(..))));
    assert_eq!(client.api().list_count(), 1);
    assert_eq!(rows_of(client.view()).len(), 4);
    assert_eq!(client.view().alerts, vec!["Investment added successfully!"]);
}

#[tokio::test]
async fn save_in_edit_mode_updates_the_edited_item() {
    let mut client = client_with(sample_records(), true);
    let id = InvestmentId::new("3");
    client.begin_edit(&id).await;
    client.set_field(Field::Value, "40");

    let outcome = client.save().await;
    assert!(matches!(outcome, SaveOutcome::Updated(Some(_))));

    let calls = client.api().calls();
    assert!(calls.contains(&Call::Update(
        id,
        InvestmentPayload {
            name: "PETR4".to_string(),
            kind: "Renda Fixa".to_string(),
            value: 40.0,
            date: "2024-07-15".to_string(),
        }
    )));
    assert!(!calls.iter().any(|c| matches!(c, Call::Create(_))));
    assert_eq!(client.api().list_count(), 1);
    assert_eq!(rows_of(client.view())[2].value, "R$ 40.00");
    assert_eq!(client.view().alerts, vec!["Investment updated successfully!"]);
}

#[tokio::test]
async fn successful_save_resets_form_to_add_mode() {
    let mut client = client_with(sample_records(), true);
    client.begin_edit(&InvestmentId::new("1")).await;
    client.save().await;

    let form = client.form();
    assert_eq!(form.mode, Mode::Add);
    assert!(form.fields.is_empty());
    assert!(!form.cancel_visible());
    assert_eq!(form.submit_label(), "Save");
    assert_eq!(client.view().resets, 1);
}

#[tokio::test]
async fn failed_save_keeps_form_and_surfaces_detail() {
    let mut client = client_with(sample_records(), true);
    client.begin_edit(&InvestmentId::new("1")).await;
    let before = client.form().clone();

    client.api().fail_write(422, Some("valor must be positive"));
    assert_eq!(client.save().await, SaveOutcome::Failed);

    assert_eq!(client.form(), &before);
    assert_eq!(client.api().list_count(), 0);
    let alert = client.view().alerts.last().cloned().unwrap_or_default();
    assert!(alert.contains("valor must be positive"), "{alert}");
    assert!(alert.contains("422"), "{alert}");
}

#[tokio::test]
async fn invalid_form_is_rejected_before_any_request() {
    let mut client = client_with(sample_records(), true);
    fill_form(&mut client);
    client.set_field(Field::Value, "lots");

    assert_eq!(
        client.save().await,
        SaveOutcome::Rejected(FormError::InvalidValue("lots".to_string()))
    );
    assert!(client.api().calls().is_empty());
    assert!(client.view().submitting.is_empty());
    assert_eq!(client.view().alerts.len(), 1);
}

#[tokio::test]
async fn submit_control_is_disabled_while_saving() {
    let mut client = client_with(sample_records(), true);
    fill_form(&mut client);
    client.save().await;
    assert_eq!(client.view().submitting, vec![true, false]);
    assert!(!client.form().in_flight);

    client.api().fail_write(500, None);
    fill_form(&mut client);
    client.save().await;
    assert_eq!(client.view().submitting, vec![true, false, true, false]);
    assert!(!client.form().in_flight);
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let mut client = client_with(sample_records(), false);
    let id = InvestmentId::new("1");
    assert_eq!(client.delete(&id).await, DeleteOutcome::Declined);
    assert!(client.api().calls().is_empty());
    assert_eq!(
        client.view().confirms,
        vec!["Are you sure you want to delete investment ID 1?"]
    );
    assert!(client.view().alerts.is_empty());
}

#[tokio::test]
async fn confirmed_delete_removes_and_refetches() {
    let mut client = client_with(sample_records(), true);
    let id = InvestmentId::new("2");
    assert_eq!(client.delete(&id).await, DeleteOutcome::Deleted);

    assert_eq!(client.api().calls(), vec![Call::Delete(id), Call::List]);
    let rows = rows_of(client.view());
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.id.as_str() != "2"));
    assert_eq!(client.view().alerts, vec!["Investment deleted successfully!"]);
}

#[tokio::test]
async fn failed_delete_alerts_without_refetch() {
    let mut client = client_with(sample_records(), true);
    client.api().fail_delete(true);
    assert_eq!(
        client.delete(&InvestmentId::new("1")).await,
        DeleteOutcome::Failed
    );
    assert_eq!(client.api().list_count(), 0);
    assert_eq!(client.view().alerts.len(), 1);
    assert!(client.view().alerts[0].starts_with("Could not delete."));
}

#[tokio::test]
async fn deleting_the_edited_record_leaves_edit_mode() {
    let mut client = client_with(sample_records(), true);
    let id = InvestmentId::new("3");
    client.begin_edit(&id).await;
    client.delete(&id).await;
    assert_eq!(client.form().mode, Mode::Add);

    client.begin_edit(&InvestmentId::new("1")).await;
    client.delete(&InvestmentId::new("2")).await;
    assert_eq!(client.form().mode, Mode::Edit(InvestmentId::new("1")));
}

#[tokio::test]
async fn cancel_clears_form_and_restores_add_mode() {
    let mut client = client_with(sample_records(), true);
    client.begin_edit(&InvestmentId::new("1")).await;
    client.cancel_edit();

    let form = client.form();
    assert_eq!(form, &FormState::default());
    assert_eq!(form.submit_label(), "Save");
    assert!(!form.cancel_visible());
    assert_eq!(client.view().form.as_ref(), Some(form));
    assert_eq!(client.view().resets, 1);
}

#[tokio::test]
async fn shell_commands_drive_the_client() {
    use crate::shell::{execute, parse_command, Flow};

    let mut client = client_with(Vec::new(), true);
    for line in [
        "set name Tesouro IPCA+",
        "set tipo Renda Fixa",
        "set valor 250,00",
        "set date 2025-01-10",
        "save",
    ] {
        let command = parse_command(line).unwrap().unwrap();
        assert_eq!(execute(&mut client, command).await, Flow::Continue);
    }
    assert!(matches!(client.api().calls()[0], Call::Create(ref p) if p.value == 250.0));
    assert_eq!(rows_of(client.view()).len(), 1);

    let quit = parse_command("quit").unwrap().unwrap();
    assert_eq!(execute(&mut client, quit).await, Flow::Exit);
}

#[tokio::test]
async fn snapshot_export_matches_the_page_table() {
    use crate::output::{render, OutputFormat, SnapshotView, TableBody};

    let mut client = InvestmentClient::new(
        FakeApi::with_records(sample_records()),
        SnapshotView::default(),
    );
    client.list().await;
    let view = client.into_view();
    assert!(matches!(&view.body, TableBody::Rows(rows) if rows.len() == 3));

    let html = String::from_utf8(render(OutputFormat::Html, &view)).unwrap();
    assert_eq!(html.matches("class=\"btn-edit\"").count(), 3);
    assert!(html.contains("<td>R$ 1000.50</td>"));
    assert!(html.contains("<td>2024-07-15</td>"));
}
