#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Cells are cut with an ellipsis to fit `max_width`.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();
    if let Some(max) = options.max_width {
        shrink(&mut widths, headers, max);
    }

    let line = |cells: Vec<String>, color: bool| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let text = fit(cell, *width);
                let pad = width.saturating_sub(text.chars().count());
                let shown = if color { paint(&text) } else { text };
                format!("{shown}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header = line(headers.iter().map(|h| (*h).to_string()).collect(), false);
    let rule = "-".repeat(widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 2);
    let mut out = vec![header, rule];
    for row in rows {
        let cells = (0..headers.len())
            .map(|i| row.get(i).cloned().unwrap_or_else(|| "-".to_string()))
            .collect();
        out.push(line(cells, options.color));
    }
    out.join("\n")
}

/// Narrow the widest column one step at a time, never below its header.
fn shrink(widths: &mut [usize], headers: &[&str], max: usize) {
    let gaps = widths.len().saturating_sub(1) * 2;
    while widths.iter().sum::<usize>() + gaps > max {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(i, w)| **w > headers[*i].chars().count().max(6))
            .max_by_key(|(_, w)| **w)
            .map(|(i, _)| i);
        match widest {
            Some(i) => widths[i] -= 1,
            None => break,
        }
    }
}

fn fit(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out = value.chars().take(width.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

/// Color triage values: green to act now, yellow to defer, dim to ignore.
fn paint(value: &str) -> String {
    let code = match value {
        "reply_now" | "critical" | "high" => "32",
        "reply_later" | "medium" => "33",
        "ignore" => "2",
        _ => return value.to_string(),
    };
    format!("\u{1b}[{code}m{value}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::{TableOptions, render};

    #[test]
    fn columns_align_and_rule_spans_them() {
        let rows = vec![
            vec!["msg-1".to_string(), "investor".to_string()],
            vec!["msg-200".to_string(), "support".to_string()],
        ];
        let out = render(
            &["id", "sender_type"],
            &rows,
            TableOptions {
                max_width: None,
                color: false,
            },
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id       sender_type");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "msg-1    investor");
    }

    #[test]
    fn long_cells_are_cut_to_width() {
        let rows = vec![vec!["x".to_string(), "a".repeat(80)]];
        let out = render(
            &["id", "content"],
            &rows,
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        assert!(out.lines().all(|l| l.chars().count() <= 40));
        assert!(out.contains('…'));
    }

    #[test]
    fn actions_are_colored_when_enabled() {
        let out = render(
            &["action"],
            &[vec!["reply_now".to_string()]],
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(out.contains("\u{1b}[32mreply_now"));
    }
}
