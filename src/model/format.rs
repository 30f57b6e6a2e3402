pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

/// `R$ 1000.50`: always two decimals, marker separated by one space.
pub fn format_currency(symbol: &str, value: f64) -> String {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return format!("{value:.2}");
    }
    format!("{symbol} {value:.2}")
}

/// Keeps only the date part of an ISO-ish timestamp (everything before the
/// first `T`). Values without a `T` pass through unchanged.
pub fn format_date(raw: &str) -> &str {
    match raw.split_once('T') {
        Some((date, _)) => date,
        None => raw,
    }
}
