use super::TableRow;

pub const HEADERS: [&str; 6] = ["ID", "Name", "Type", "Value", "Date", "Actions"];

const ACTIONS: &str = "[edit] [delete]";

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, to: usize) -> String {
    let mut out = s.to_string();
    for _ in width(s)..to {
        out.push(' ');
    }
    out
}

fn cells(row: &TableRow) -> [&str; 6] {
    [
        row.id.as_str(),
        &row.name,
        &row.kind,
        &row.value,
        &row.date,
        ACTIONS,
    ]
}

/// Column widths large enough for the header and every row.
fn column_widths(rows: &[TableRow]) -> [usize; 6] {
    let mut widths = HEADERS.map(width);
    for row in rows {
        for (i, cell) in cells(row).iter().enumerate() {
            widths[i] = widths[i].max(width(cell));
        }
    }
    widths
}

fn join_line(values: &[&str; 6], widths: &[usize; 6]) -> String {
    let padded: Vec<String> = values
        .iter()
        .zip(widths.iter())
        .map(|(v, w)| pad(v, *w))
        .collect();
    padded.join(" | ").trim_end().to_string()
}

fn separator(widths: &[usize; 6]) -> String {
    widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-")
}

/// Header, separator and one line per row.
pub fn render_rows(rows: &[TableRow]) -> Vec<String> {
    let widths = column_widths(rows);
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(join_line(&HEADERS, &widths));
    lines.push(separator(&widths));
    for row in rows {
        lines.push(join_line(&cells(row), &widths));
    }
    lines
}

/// Header, separator and a single line spanning the table.
pub fn render_message(message: &str) -> Vec<String> {
    let widths = column_widths(&[]);
    let span = separator(&widths);
    let total = width(&span);
    let text = if width(message) < total {
        let left = (total - width(message)) / 2;
        format!("{}{}", " ".repeat(left), message)
    } else {
        message.to_string()
    };
    vec![join_line(&HEADERS, &widths), span, text]
}
