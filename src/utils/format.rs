use chrono::NaiveDate;

/// "Fri Mar 15 2024", with " (Today)" appended when it is today.
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    let label = date.format("%a %b %d %Y").to_string();
    if date == today {
        format!("{} (Today)", label)
    } else {
        label
    }
}

/// Parse a date typed by the user as YYYY-MM-DD.
pub fn parse_date_input(input: &str) -> Result<NaiveDate, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Enter a date first (e.g. 2024-03-15)".to_string());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not a valid date", trimmed))
}
