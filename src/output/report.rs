use super::TableBody;
use crate::client::FormState;
use crate::view::{TableRow, EMPTY_MESSAGE};

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn message_row(message: &str, error: bool) -> String {
    let style = if error {
        "text-align: center; color: red;"
    } else {
        "text-align: center;"
    };
    format!(
        "      <tr><td colspan=\"6\" style=\"{style}\">{}</td></tr>\n",
        escape_html(message)
    )
}

fn data_row(row: &TableRow) -> String {
    let id = escape_html(row.id.as_str());
    format!(
        r#"      <tr>
        <td>{id}</td>
        <td>{}</td>
        <td>{}</td>
        <td>{}</td>
        <td>{}</td>
        <td>
          <button class="btn-edit" data-id="{id}">Edit</button>
          <button class="btn-delete" data-id="{id}">Delete</button>
        </td>
      </tr>
"#,
        escape_html(&row.name),
        escape_html(&row.kind),
        escape_html(&row.value),
        escape_html(&row.date),
    )
}

/// The `<tbody>` content for the current table state.
pub fn render_table_body(body: &TableBody) -> String {
    match body {
        TableBody::Loading => message_row("Loading...", false),
        TableBody::Empty => message_row(EMPTY_MESSAGE, false),
        TableBody::Error(message) => message_row(message, true),
        TableBody::Rows(rows) => rows.iter().map(data_row).collect(),
    }
}

fn render_form(form: &FormState) -> String {
    let id = form
        .mode
        .editing()
        .map(|id| escape_html(id.as_str()))
        .unwrap_or_default();
    let cancel_style = if form.cancel_visible() {
        "display: inline-block;"
    } else {
        "display: none;"
    };
    let disabled = if form.in_flight { " disabled" } else { "" };
    format!(
        r#"    <form id="investment-form">
      <input type="hidden" id="investment-id" value="{id}"/>
      <label for="nome">Name</label>
      <input type="text" id="nome" value="{}" required/>
      <label for="tipo">Type</label>
      <input type="text" id="tipo" value="{}" required/>
      <label for="valor">Value</label>
      <input type="number" step="0.01" id="valor" value="{}" required/>
      <label for="data">Date</label>
      <input type="date" id="data" value="{}" required/>
      <button type="submit"{disabled}>{}</button>
      <button type="button" id="btn-cancelar" style="{cancel_style}">Cancel</button>
    </form>
"#,
        escape_html(&form.fields.name),
        escape_html(&form.fields.kind),
        escape_html(&form.fields.value),
        escape_html(&form.fields.date),
        form.submit_label(),
    )
}

pub fn render_html(body: &TableBody, form: &FormState) -> Vec<u8> {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Investments</title>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; }}
    table {{ border-collapse: collapse; width: 100%; margin-top: 1.5rem; }}
    th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}
    form {{ display: grid; grid-template-columns: max-content 16rem; gap: 0.4rem 1rem; }}
  </style>
</head>
<body>
  <main>
    <h1>Investments</h1>
{form}    <table id="investments-table">
      <thead>
        <tr><th>ID</th><th>Name</th><th>Type</th><th>Value</th><th>Date</th><th>Actions</th></tr>
      </thead>
      <tbody>
{tbody}      </tbody>
    </table>
  </main>
</body>
</html>
"#,
        form = render_form(form),
        tbody = render_table_body(body),
    );
    html.into_bytes()
}
