use anyhow::Error;
use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Render a currency amount the Brazilian way: `R$ 10.800,00`. The grouping
/// runs over the integer digits only; cents are always two digits. Rounding
/// to cents happens here and nowhere earlier, so stored values stay exact.
pub(crate) fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("R$ {sign}{grouped},{frac:02}")
}

/// Render a liter quantity, dropping the decimal when the value is whole so
/// tables read `245 L` but averages read `243.3 L`.
pub(crate) fn format_liters(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0} L")
    } else {
        format!("{value:.1} L")
    }
}

/// Render a calendar date as `dd/mm/yyyy` for tables and summaries.
pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_brazilian_grouping_and_cents() {
        assert_eq!(format_currency(10_800.0), "R$ 10.800,00");
        assert_eq!(format_currency(9_932.5), "R$ 9.932,50");
        assert_eq!(format_currency(1.5), "R$ 1,50");
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(1_234_567.891), "R$ 1.234.567,89");
    }

    #[test]
    fn liters_drop_the_decimal_when_whole() {
        assert_eq!(format_liters(245.0), "245 L");
        assert_eq!(format_liters(243.33), "243.3 L");
        assert_eq!(format_liters(0.0), "0 L");
    }

    #[test]
    fn dates_render_day_first() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        assert_eq!(format_date(date), "30/01/2024");
    }
}
