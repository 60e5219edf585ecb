use chrono::NaiveDate;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(buf: &str) -> Result<NaiveDate, String> {
    let buf = buf.trim();
    if buf.is_empty() {
        return Err("Empty date".to_string());
    }

    NaiveDate::parse_from_str(buf, DATE_FORMAT)
        .map_err(|e| format!("Unable to parse date {}: {}", buf, e))
}

/// Same as [`parse_date`], but an empty value means "no date".
pub fn parse_optional_date(buf: &str) -> Result<Option<NaiveDate>, String> {
    if buf.trim().is_empty() {
        return Ok(None);
    }
    parse_date(buf).map(Some)
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
