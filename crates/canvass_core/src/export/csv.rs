//! CSV rendering for canvassing record exports.
//!
//! # Responsibility
//! - Render person records as CSV with deterministic escaping.
//! - Derive the attachment filename for download responses.
//!
//! # Invariants
//! - The header line is always present and always ends with `\n`.
//! - Rows are joined by `\n` with no trailing newline after the last row.
//! - Fields containing comma, double quote, or newline are wrapped in double
//!   quotes with inner quotes doubled; absent fields render as empty string.

use crate::model::person::{format_iso_millis, Person};
use chrono::NaiveDate;

const CSV_HEADER: &str = "ID,First Name,Last Name,Email,Notes,Created At,Updated At\n";

/// Renders the given records as CSV text, newest-first order preserved.
///
/// An empty slice yields exactly the header line and nothing else.
pub fn render_csv(people: &[Person]) -> String {
    let rows = people
        .iter()
        .map(render_row)
        .collect::<Vec<_>>()
        .join("\n");

    format!("{CSV_HEADER}{rows}")
}

/// Returns the attachment filename for an export taken on `date`,
/// e.g. `canvassing-data-2023-01-01.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("canvassing-data-{}.csv", date.format("%Y-%m-%d"))
}

fn render_row(person: &Person) -> String {
    [
        person.id.to_string(),
        escape_field(&person.first_name),
        escape_field(&person.last_name),
        escape_field(person.email.as_deref().unwrap_or("")),
        escape_field(&person.notes),
        format_iso_millis(person.created_at),
        format_iso_millis(person.updated_at),
    ]
    .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_field, export_filename};
    use chrono::NaiveDate;

    #[test]
    fn plain_fields_pass_through_unquoted() {
        assert_eq!(escape_field("John"), "John");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn special_characters_trigger_quoting() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line1\nline2"), "\"line1\nline2\"");
    }

    #[test]
    fn filename_embeds_export_date() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert_eq!(export_filename(date), "canvassing-data-2023-01-15.csv");
    }
}
