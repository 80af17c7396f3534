use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::display_scalar;

/// Format output as tables: a field/value summary, then one table per
/// row list (schedule, debts, goals), then warnings.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_envelope(result, map),
            _ => print_summary(map),
        },
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", value),
    }
}

fn print_envelope(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_summary(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_summary(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut row_lists: Vec<(&str, &[Value])> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(rows) if rows.iter().any(Value::is_object) => {
                row_lists.push((key.as_str(), rows.as_slice()));
            }
            Value::Array(items) => {
                let joined: Vec<String> = items.iter().map(|v| display_scalar(key, v)).collect();
                builder.push_record([key.clone(), joined.join(", ")]);
            }
            _ => builder.push_record([key.clone(), display_scalar(key, val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, rows) in row_lists {
        println!("\n{}:", key);
        print_rows(rows);
    }
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        if rows.is_empty() {
            println!("(empty)");
        }
        for item in rows {
            println!("{}", display_scalar("", item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(h).map(|v| display_scalar(h, v)).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}
