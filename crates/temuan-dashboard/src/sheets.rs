//! Google Sheets (gviz) data source
//!
//! The gviz JSON export wraps its payload in a JavaScript callback:
//!
//! ```text
//! /*O_o*/
//! google.visualization.Query.setResponse({"version":"0.6",...,"table":{...}});
//! ```
//!
//! We locate the callback by name rather than by byte offset, so a change in
//! the wrapper shows up as [`SourceError::Envelope`] instead of a JSON error.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::constants;
use crate::record::Record;

/// Errors from loading the findings sheet
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request to sheet endpoint failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheet endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("response envelope is missing its {0}")]
    Envelope(EnvelopePart),

    #[error("sheet query failed: {0}")]
    Query(String),

    #[error("malformed sheet payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which side of the gviz envelope could not be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePart {
    Open,
    Close,
}

impl std::fmt::Display for EnvelopePart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopePart::Open => write!(f, "opening '{}'", constants::ENVELOPE_OPEN),
            EnvelopePart::Close => write!(f, "closing '{}'", constants::ENVELOPE_CLOSE),
        }
    }
}

// =============================================================================
// gviz Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    errors: Vec<QueryError>,
    #[serde(default)]
    table: Option<DataTable>,
}

#[derive(Debug, Deserialize)]
struct QueryError {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    detailed_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataTable {
    #[serde(default)]
    rows: Vec<DataRow>,
}

#[derive(Debug, Deserialize)]
struct DataRow {
    #[serde(default)]
    c: Vec<Option<Cell>>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    #[serde(default)]
    v: Option<Value>,
}

// =============================================================================
// API Functions
// =============================================================================

/// Fetch and parse every row of the findings sheet
pub async fn fetch_records(client: &reqwest::Client, url: &str) -> Result<Vec<Record>, SourceError> {
    debug!(url, "fetching findings sheet");

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(SourceError::Status(response.status()));
    }

    let text = response.text().await?;
    debug!(bytes = text.len(), "received sheet payload");

    parse_payload(&text)
}

/// Parse a full gviz response (envelope included) into records
pub fn parse_payload(text: &str) -> Result<Vec<Record>, SourceError> {
    let json = strip_envelope(text)?;
    let response: QueryResponse = serde_json::from_str(json)?;

    if response.status.as_deref() == Some("error") {
        let message = response
            .errors
            .first()
            .map(|e| e.detailed_message.clone().unwrap_or_else(|| e.reason.clone()))
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(SourceError::Query(message));
    }

    let table = response
        .table
        .ok_or_else(|| SourceError::Query("response has no table".to_string()))?;

    Ok(table.rows.iter().map(row_to_record).collect())
}

/// Return the JSON object between `setResponse(` and the closing `)` that
/// ends the payload (optionally followed by `;` and whitespace)
pub fn strip_envelope(text: &str) -> Result<&str, SourceError> {
    let start = text
        .find(constants::ENVELOPE_OPEN)
        .ok_or(SourceError::Envelope(EnvelopePart::Open))?
        + constants::ENVELOPE_OPEN.len();
    let body = text[start..].trim_end();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();
    body.strip_suffix(constants::ENVELOPE_CLOSE)
        .ok_or(SourceError::Envelope(EnvelopePart::Close))
}

/// Map a sheet row to a record by column position
fn row_to_record(row: &DataRow) -> Record {
    let cell = |index: usize| -> Option<&Value> {
        row.c.get(index).and_then(|c| c.as_ref()).and_then(|c| c.v.as_ref())
    };

    Record {
        identifier: cell_text(cell(0)),
        owner: cell_text(cell(1)),
        unit: cell_text(cell(2)),
        segment: cell_text(cell(3)),
        period: cell_text(cell(4)),
        problem_text: cell_text(cell(5)),
        root_cause_text: cell_text(cell(6)),
        action_text: cell_text(cell(7)),
        loss_amount: cell_amount(cell(8)),
        recovery_amount: cell_amount(cell(9)),
        status: cell_text(cell(10)),
    }
}

/// Coerce a cell to text; empty-ish values (null, false, 0) become ""
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                if i == 0 { String::new() } else { i.to_string() }
            } else {
                match n.as_f64() {
                    Some(f) if f != 0.0 => f.to_string(),
                    _ => String::new(),
                }
            }
        }
        Some(other) => other.to_string(),
    }
}

/// Coerce a cell to an amount; anything unparseable becomes 0
fn cell_amount(value: Option<&Value>) -> f64 {
    let amount = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };

    if amount.is_finite() { amount } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wrap(json: &str) -> String {
        format!("/*O_o*/\n{}{});", constants::ENVELOPE_OPEN, json)
    }

    const TWO_ROWS: &str = r#"{"version":"0.6","reqId":"0","status":"ok","table":{"cols":[],"rows":[
        {"c":[{"v":"T-001"},{"v":"Andi"},{"v":"Audit"},{"v":"Retail"},{"v":"Q1 2023"},{"v":"Selisih kas"},{"v":"Kontrol lemah"},{"v":"Rekonsiliasi"},{"v":1000.0,"f":"1.000"},{"v":400},{"v":"Proses"}]},
        {"c":[{"v":2.0},null,{"v":null},{"v":"Korporat"},{"v":"Date(2024,0,15)"},null,null,null,{"v":"500"},{"v":"abc"},{"v":"Selesai"}]}
    ]}}"#;

    #[test]
    fn test_strip_envelope() {
        let text = wrap(r#"{"a":1}"#);
        assert_eq!(strip_envelope(&text).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_strip_envelope_without_semicolon() {
        let text = format!("{}{}", constants::ENVELOPE_OPEN, r#"{"a":1})"#);
        assert_eq!(strip_envelope(&text).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_missing_open_delimiter() {
        let err = strip_envelope(r#"{"table":{"rows":[]}}"#).unwrap_err();
        assert!(matches!(err, SourceError::Envelope(EnvelopePart::Open)));
    }

    #[test]
    fn test_missing_close_delimiter() {
        let text = format!("{}{}", constants::ENVELOPE_OPEN, r#"{"table":{"rows":[]}}"#);
        let err = strip_envelope(&text).unwrap_err();
        assert!(matches!(err, SourceError::Envelope(EnvelopePart::Close)));
    }

    #[test]
    fn test_truncated_payload_with_paren_in_cell() {
        let text = format!(
            "{}{}",
            constants::ENVELOPE_OPEN,
            r#"{"table":{"rows":[{"c":[{"v":"A"},null,null,null,{"v":"Q1 (2023)"}]}]}}"#
        );
        let err = parse_payload(&text).unwrap_err();
        assert!(matches!(err, SourceError::Envelope(EnvelopePart::Close)));
    }

    #[test]
    fn test_strip_envelope_with_trailing_whitespace() {
        let text = format!("{}{}", constants::ENVELOPE_OPEN, "{\"a\":\"(x)\"});\n");
        assert_eq!(strip_envelope(&text).unwrap(), r#"{"a":"(x)"}"#);
    }

    #[test]
    fn test_parse_payload_maps_columns_by_position() {
        let records = parse_payload(&wrap(TWO_ROWS)).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.identifier, "T-001");
        assert_eq!(first.owner, "Andi");
        assert_eq!(first.unit, "Audit");
        assert_eq!(first.segment, "Retail");
        assert_eq!(first.period, "Q1 2023");
        assert_eq!(first.problem_text, "Selisih kas");
        assert_eq!(first.root_cause_text, "Kontrol lemah");
        assert_eq!(first.action_text, "Rekonsiliasi");
        assert_eq!(first.loss_amount, 1000.0);
        assert_eq!(first.recovery_amount, 400.0);
        assert_eq!(first.status, "Proses");
    }

    #[test]
    fn test_parse_payload_coerces_missing_cells() {
        let records = parse_payload(&wrap(TWO_ROWS)).unwrap();
        let second = &records[1];
        assert_eq!(second.identifier, "2");
        assert_eq!(second.owner, "");
        assert_eq!(second.unit, "");
        assert_eq!(second.period, "Date(2024,0,15)");
        assert_eq!(second.problem_text, "");
        assert_eq!(second.loss_amount, 500.0);
        assert_eq!(second.recovery_amount, 0.0);
    }

    #[test]
    fn test_short_row_is_padded_with_defaults() {
        let records = parse_payload(&wrap(r#"{"table":{"rows":[{"c":[{"v":"X"}]},{}]}}"#)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identifier, "X");
        assert_eq!(records[0].status, "");
        assert_eq!(records[1], Record::default());
    }

    #[test]
    fn test_query_error_is_reported() {
        let json = r#"{"version":"0.6","status":"error","errors":[{"reason":"access_denied","message":"Access denied","detailed_message":"Sheet is private"}]}"#;
        let err = parse_payload(&wrap(json)).unwrap_err();
        match err {
            SourceError::Query(message) => assert_eq!(message, "Sheet is private"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = parse_payload(&wrap(r#"{"table": "#)).unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }

    #[test]
    fn test_cell_text_falsy_values() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Value::Null)), "");
        assert_eq!(cell_text(Some(&Value::Bool(false))), "");
        assert_eq!(cell_text(Some(&serde_json::json!(0))), "");
        assert_eq!(cell_text(Some(&serde_json::json!(0.0))), "");
        assert_eq!(cell_text(Some(&serde_json::json!(2023.0))), "2023");
        assert_eq!(cell_text(Some(&serde_json::json!(1.5))), "1.5");
    }

    #[test]
    fn test_cell_amount_coercion() {
        assert_eq!(cell_amount(Some(&serde_json::json!(" 1250 "))), 1250.0);
        assert_eq!(cell_amount(Some(&serde_json::json!("1.000.000"))), 0.0);
        assert_eq!(cell_amount(Some(&serde_json::json!("NaN"))), 0.0);
        assert_eq!(cell_amount(Some(&serde_json::json!(""))), 0.0);
        assert_eq!(cell_amount(Some(&serde_json::json!([1]))), 0.0);
        assert_eq!(cell_amount(None), 0.0);
    }
}
