//! Parsers for the CLI's table output
//!
//! The CLI prints three shapes: box-drawn tables (`ls` commands), plain
//! fixed-width tables (`admin` listings) and vertical "Key  value" blocks
//! (`get`/`create`/`show`). Every parser locates its data by the column or
//! key names the caller expects, so decorative lines and extra columns are
//! ignored.

use crate::error::{E2eError, Result};
use std::collections::BTreeMap;

pub type Row = BTreeMap<String, String>;

const BOX_SEPARATORS: &[char] = &['│', '┃'];
const PIPE_SEPARATORS: &[char] = &['|'];

/// True for borders and rules: no letters or digits at all.
fn is_rule(line: &str) -> bool {
    !line.trim().is_empty() && !line.chars().any(char::is_alphanumeric)
}

/// Cell separators used by a table, judged from its header line. A
/// box-drawn table may carry a literal `|` inside a cell.
fn separators_of(header_line: &str) -> &'static [char] {
    if header_line.contains(BOX_SEPARATORS) {
        BOX_SEPARATORS
    } else {
        PIPE_SEPARATORS
    }
}

fn split_cells(line: &str, separators: &[char]) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix(separators).unwrap_or(trimmed);
    let inner = inner.strip_suffix(separators).unwrap_or(inner);
    inner
        .split(separators)
        .map(|c| c.trim().to_string())
        .collect()
}

fn header_index(cells: &[String], column: &str) -> Option<usize> {
    cells.iter().position(|c| c.eq_ignore_ascii_case(column))
}

/// Parse a box-drawn or pipe-delimited table.
///
/// The header is the first row whose cells include every name in
/// `columns` (case-insensitive). Each later row becomes one [`Row`] keyed by
/// those names. A row whose first cell is empty continues the row above:
/// its non-empty cells are appended with a space.
pub fn parse_box_table(text: &str, columns: &[&str]) -> Result<Vec<Row>> {
    let mut lines = text
        .lines()
        .filter(|l| !l.trim().is_empty() && !is_rule(l));

    let (header, indexes, separators) = loop {
        let line = lines.next().ok_or_else(|| {
            E2eError::Parse(format!("no table header with columns {:?}", columns))
        })?;
        if !line.contains(BOX_SEPARATORS) && !line.contains(PIPE_SEPARATORS) {
            continue;
        }
        let separators = separators_of(line);
        let cells = split_cells(line, separators);
        let indexes: Option<Vec<usize>> =
            columns.iter().map(|c| header_index(&cells, c)).collect();
        if let Some(indexes) = indexes {
            break (cells, indexes, separators);
        }
    };

    let mut rows: Vec<Vec<String>> = Vec::new();
    for line in lines.filter(|l| l.contains(separators)) {
        let cells = split_cells(line, separators);
        if cells.len() != header.len() {
            log::debug!("Skipping table line with {} cells: {}", cells.len(), line);
            continue;
        }
        match rows.last_mut() {
            Some(previous) if cells[0].is_empty() => {
                for (prev, cell) in previous.iter_mut().zip(cells) {
                    if !cell.is_empty() {
                        if !prev.is_empty() {
                            prev.push(' ');
                        }
                        prev.push_str(&cell);
                    }
                }
            }
            _ => rows.push(cells),
        }
    }

    Ok(rows
        .into_iter()
        .map(|cells| {
            columns
                .iter()
                .zip(&indexes)
                .map(|(name, &i)| (name.to_string(), cells[i].clone()))
                .collect()
        })
        .collect())
}

/// Char offset of `column` in `header`. The name must start the line or
/// follow a gap of at least two spaces, and end at whitespace or the line end.
fn column_offset(header: &str, column: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = header[from..].find(column) {
        let start = from + pos;
        let end = start + column.len();
        let before = &header[..start];
        let before_ok = before.trim().is_empty() || before.ends_with("  ");
        let after_ok = header[end..].chars().next().map_or(true, char::is_whitespace);
        if before_ok && after_ok {
            return Some(before.chars().count());
        }
        from = start + column.len().max(1);
    }
    None
}

/// Char offsets where header cells start: the first non-space character
/// of the line and any character after a gap of two or more spaces.
fn header_starts(header: &str) -> Vec<usize> {
    let chars: Vec<char> = header.chars().collect();
    (0..chars.len())
        .filter(|&i| {
            !chars[i].is_whitespace()
                && (chars[..i].iter().all(|c| c.is_whitespace())
                    || (i >= 2 && chars[i - 1] == ' ' && chars[i - 2] == ' '))
        })
        .collect()
}

fn slice_chars(line: &[char], start: usize, end: Option<usize>) -> String {
    if start >= line.len() {
        return String::new();
    }
    let end = end.unwrap_or(line.len()).min(line.len());
    line[start..end].iter().collect::<String>().trim().to_string()
}

/// Parse a whitespace-aligned table.
///
/// Column boundaries come from where each name starts in the header line;
/// a value runs until the next column's start. Only the requested columns
/// are returned, but every header column found bounds its neighbours.
pub fn parse_fixed_width(text: &str, columns: &[&str]) -> Result<Vec<Row>> {
    let mut lines = text.lines();

    let (offsets, mut bounds) = loop {
        let line = lines.next().ok_or_else(|| {
            E2eError::Parse(format!("no table header with columns {:?}", columns))
        })?;
        let found: Option<Vec<usize>> = columns.iter().map(|c| column_offset(line, c)).collect();
        if let Some(found) = found {
            let mut bounds = header_starts(line);
            bounds.extend(&found);
            break (found, bounds);
        }
    };

    bounds.sort_unstable();
    bounds.dedup();

    let rows = lines
        .filter(|l| !l.trim().is_empty() && !is_rule(l))
        .map(|line| {
            let chars: Vec<char> = line.chars().collect();
            columns
                .iter()
                .zip(&offsets)
                .map(|(name, &start)| {
                    let end = bounds.iter().copied().find(|&b| b > start);
                    (name.to_string(), slice_chars(&chars, start, end))
                })
                .collect()
        })
        .collect();
    Ok(rows)
}

/// Parse a vertical block of `Key   value` lines.
///
/// Each line belongs to the longest known key it starts with; the key must
/// be followed by whitespace, a colon or the end of the line. Unknown lines
/// are skipped and missing keys are simply absent.
pub fn parse_key_value(text: &str, keys: &[&str]) -> Row {
    let mut sorted: Vec<&str> = keys.to_vec();
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));

    let mut row = Row::new();
    for line in text.lines().map(str::trim) {
        let matched = sorted.iter().find(|key| {
            line.strip_prefix(**key).is_some_and(|rest| {
                rest.is_empty() || rest.starts_with(':') || rest.starts_with(char::is_whitespace)
            })
        });
        if let Some(key) = matched {
            let value = line[key.len()..].trim_start_matches(':').trim();
            row.entry(key.to_string()).or_insert_with(|| value.to_string());
        }
    }
    row
}

/// Like [`parse_key_value`] but every key must be present.
pub fn parse_key_value_strict(text: &str, keys: &[&str]) -> Result<Row> {
    let row = parse_key_value(text, keys);
    let missing: Vec<&&str> = keys.iter().filter(|k| !row.contains_key(**k)).collect();
    if missing.is_empty() {
        Ok(row)
    } else {
        Err(E2eError::Parse(format!("missing keys {:?} in:\n{}", missing, text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISK_LS: &str = "\
┏━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━━┳━━━━━━━━━┳━━━━━━━━━┳━━━━━━━━━━━┓
┃ Id                                   ┃ Name          ┃ Storage ┃ Status  ┃ Owner     ┃
┡━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╇━━━━━━━━━━━━━━━╇━━━━━━━━━╇━━━━━━━━━╇━━━━━━━━━━━┩
│ disk-4f1c0e5a-9b7d-4c9e-a0f2-1b2c3d4 │ e2e-disk-ab12 │ 1.0G    │ Ready   │ alice     │
│ disk-0d9e8f7a-6b5c-4d3e-b2a1-0f9e8d7 │ scratch       │ 10.0G   │ Pending │ bob       │
│                                      │ volume        │         │         │           │
└──────────────────────────────────────┴───────────────┴─────────┴─────────┴───────────┘
";

    #[test]
    fn box_table_maps_requested_columns() {
        let rows = parse_box_table(DISK_LS, &["Id", "Name", "Status"]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "e2e-disk-ab12");
        assert_eq!(rows[0]["Status"], "Ready");
        assert!(!rows[0].contains_key("Owner"));
        assert_eq!(rows[1]["Name"], "scratch volume");
    }

    #[test]
    fn rows_with_wrong_cell_count_are_skipped() {
        let text = DISK_LS.replace(
            "│ disk-0d9e8f7a",
            "│ disk-short │ broken │\n│ disk-0d9e8f7a",
        );
        let rows = parse_box_table(&text, &["Id", "Name"]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "e2e-disk-ab12");
        assert_eq!(rows[1]["Name"], "scratch volume");
        assert!(rows.iter().all(|r| r["Id"] != "disk-short"));
    }

    #[test]
    fn pipe_inside_box_cell_is_content() {
        let text = "\
┃ ID    ┃ COMMAND           ┃
┡━━━━━━━╇━━━━━━━━━━━━━━━━━━━┩
│ job-1 │ sh -c 'ls | wc -l' │
│ job-2 │ sleep 10          │
└───────┴───────────────────┘
";
        let rows = parse_box_table(text, &["ID", "COMMAND"]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["COMMAND"], "sh -c 'ls | wc -l'");
        assert_eq!(rows[1]["ID"], "job-2");
    }

    #[test]
    fn box_table_header_is_case_insensitive() {
        let rows = parse_box_table(DISK_LS, &["name", "owner"]).unwrap();
        assert_eq!(rows[1]["owner"], "bob");
    }

    #[test]
    fn missing_header_is_a_parse_error() {
        let err = parse_box_table(DISK_LS, &["Id", "Cluster"]).unwrap_err();
        assert!(matches!(err, E2eError::Parse(_)));
    }

    #[test]
    fn pipe_tables_parse_too() {
        let text = "| Key   | Value |\n|-------|-------|\n| A     | 1     |\n";
        let rows = parse_box_table(text, &["Key"]).unwrap();
        assert_eq!(rows, vec![Row::from([("Key".to_string(), "A".to_string())])]);
    }

    #[test]
    fn empty_table_yields_no_rows() {
        let text = "┃ Id ┃ Name ┃\n┡━━━━╇━━━━━━┩\n└────┴──────┘\n";
        assert!(parse_box_table(text, &["Id", "Name"]).unwrap().is_empty());
    }

    const ORGS: &str = "\
Org                   Display name          Credits
e2e-org-1a2b3c4d      E2E org               100.00
default                                     unlimited
";

    #[test]
    fn fixed_width_slices_by_header_offsets() {
        let rows = parse_fixed_width(ORGS, &["Org", "Credits"]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Org"], "e2e-org-1a2b3c4d");
        assert_eq!(rows[0]["Credits"], "100.00");
        assert_eq!(rows[1]["Credits"], "unlimited");
    }

    #[test]
    fn fixed_width_respects_word_boundaries() {
        // "name" inside "Display name" must not be taken for a "name" column
        let text = "Display name   name\nNice           nice-1\n";
        let rows = parse_fixed_width(text, &["name"]).unwrap();
        assert_eq!(rows[0]["name"], "nice-1");

        let rows = parse_fixed_width(ORGS, &["Display name"]).unwrap();
        assert_eq!(rows[0]["Display name"], "E2E org");
        assert_eq!(rows[1]["Display name"], "");
    }

    #[test]
    fn fixed_width_handles_short_lines_and_unicode() {
        let text = "Name    Note\nbäm     ok\nshort\n";
        let rows = parse_fixed_width(text, &["Name", "Note"]).unwrap();
        assert_eq!(rows[0]["Name"], "bäm");
        assert_eq!(rows[0]["Note"], "ok");
        assert_eq!(rows[1]["Note"], "");
    }

    const DISK_GET: &str = "\
Id               disk-4f1c0e5a
Name             e2e-disk-ab12
Storage          1.0G
Uri              disk://default/org/proj/disk-4f1c0e5a
Status           Ready
Timeout unused   1d
Timeout          none
";

    #[test]
    fn key_value_prefers_longest_key() {
        let row = parse_key_value(DISK_GET, &["Id", "Uri", "Timeout", "Timeout unused"]);
        assert_eq!(row["Id"], "disk-4f1c0e5a");
        assert_eq!(row["Uri"], "disk://default/org/proj/disk-4f1c0e5a");
        assert_eq!(row["Timeout unused"], "1d");
        assert_eq!(row["Timeout"], "none");
    }

    #[test]
    fn key_value_accepts_colons_and_reports_missing() {
        let row = parse_key_value("User: alice\nOrg:   e2e-org\n", &["User", "Org"]);
        assert_eq!(row["User"], "alice");
        assert_eq!(row["Org"], "e2e-org");

        let err = parse_key_value_strict("User: alice\n", &["User", "Project"]).unwrap_err();
        assert!(err.to_string().contains("Project"));
    }
}
