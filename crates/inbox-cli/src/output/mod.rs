use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Table => {
            let prefs = ui::prefs();
            let options = table::TableOptions {
                max_width: prefs.term_width,
                color: prefs.table_color,
            };
            Ok(render_table(serde_json::to_value(value)?, options))
        }
    }
}

/// Print `value` to stdout in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Objects whose only array field is the payload (`{"messages": [...]}`)
/// render as that array.
fn render_table(value: Value, options: table::TableOptions) -> String {
    match value {
        Value::Array(items) => rows_table(&items, options),
        Value::Object(map) => {
            let arrays = map.values().filter(|v| v.is_array()).count();
            if map.len() == 1 && arrays == 1 {
                if let Some(Value::Array(items)) = map.into_iter().next().map(|(_, v)| v) {
                    return rows_table(&items, options);
                }
                return String::from("(no rows)");
            }
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let rows = entries
                .into_iter()
                .map(|(key, value)| vec![key, cell(&value)])
                .collect::<Vec<_>>();
            table::render(&["key", "value"], &rows, options)
        }
        scalar => table::render(&["value"], &[vec![cell(&scalar)]], options),
    }
}

fn rows_table(items: &[Value], options: table::TableOptions) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows = items.iter().map(|item| vec![cell(item)]).collect::<Vec<_>>();
        return table::render(&["value"], &rows, options);
    }

    // Column order follows the first row; later rows may add columns.
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|h| map.get(h).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    table::render(&header_refs, &rows, options)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(s) => s.replace('\n', " "),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{render, render_table, table::TableOptions};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        id: &'static str,
        action: &'static str,
    }

    #[derive(Serialize)]
    struct Listing {
        decisions: Vec<Row>,
    }

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn raw_is_single_line_json() {
        let out = render(&Row { id: "dec-1", action: "ignore" }, OutputFormat::Raw).unwrap();
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["action"], "ignore");
    }

    #[test]
    fn wrapped_list_renders_as_rows() {
        let listing = Listing {
            decisions: vec![
                Row { id: "dec-1", action: "reply_now" },
                Row { id: "dec-2", action: "ignore" },
            ],
        };
        let out = render_table(serde_json::to_value(&listing).unwrap(), PLAIN);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id"));
        assert!(lines[3].contains("ignore"));
    }

    #[test]
    fn object_renders_key_value_and_empty_list_says_so() {
        let out = render_table(serde_json::json!({"tier": "heuristic", "count": 0}), PLAIN);
        assert!(out.lines().next().is_some_and(|l| l.contains("key")));
        assert!(out.contains("heuristic"));

        let empty = render_table(serde_json::json!({"messages": []}), PLAIN);
        assert_eq!(empty, "(no rows)");
    }
}
