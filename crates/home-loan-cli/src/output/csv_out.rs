use serde_json::{Map, Value};
use std::io;

use super::display_scalar;

type StdoutCsv<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Results carrying a `schedule` export one row per payment month; other
/// results become two-column field/value records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let result = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            match result.get("schedule") {
                Some(Value::Array(rows)) => write_rows(&mut wtr, rows),
                _ => write_fields(&mut wtr, result),
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        _ => {
            let _ = wtr.write_record([display_scalar("", value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutCsv<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &display_scalar(key, val)]);
    }
}

fn write_rows(wtr: &mut StdoutCsv<'_>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([display_scalar("", item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(|v| display_scalar(h, v)).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
