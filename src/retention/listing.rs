// src/retention/listing.rs

use chrono::NaiveDate;

use super::types::{EntryKind, ListingEntry};

/// Outcome of matching a single listing line.
///
/// `Unmatched` covers header/summary lines such as `Found 3 items`; it is an
/// expected variant, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Entry(ListingEntry),
    Unmatched,
}

/// Turn raw recursive-listing lines into regular-file entries, in input order.
///
/// Directories, symlinks and lines that don't match the listing shape are
/// dropped without diagnostics.
pub fn parse<I, S>(lines: I) -> Vec<ListingEntry>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut entries = Vec::new();
    let mut unmatched = 0usize;
    let mut non_files = 0usize;

    for line in lines {
        match parse_line(line.as_ref()) {
            ParsedLine::Entry(entry) if entry.is_file() => entries.push(entry),
            ParsedLine::Entry(_) => non_files += 1,
            ParsedLine::Unmatched => unmatched += 1,
        }
    }

    log::debug!(
        "Parsed listing: {} files, {} non-file entries, {} unmatched lines",
        entries.len(),
        non_files,
        unmatched
    );
    entries
}

/// Match `<permissions> <ignored...> <YYYY-MM-DD> <HH:MM> <path>`.
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields = tokenize(line);

    let Some(&(_, _, permissions)) = fields.first() else {
        return ParsedLine::Unmatched;
    };
    if !is_permission_token(permissions) {
        return ParsedLine::Unmatched;
    }

    // First date immediately followed by a time; the remainder of the line is the path
    // (it may contain spaces).
    for pair in fields[1..].windows(2) {
        let (_, _, date_tok) = pair[0];
        let (_, time_end, time_tok) = pair[1];
        if !is_date_token(date_tok) || !is_time_token(time_tok) {
            continue;
        }
        let Ok(modified) = NaiveDate::parse_from_str(date_tok, "%Y-%m-%d") else {
            return ParsedLine::Unmatched;
        };
        let path = clean_path(&line[time_end..]);
        if path.is_empty() {
            return ParsedLine::Unmatched;
        }
        let marker = permissions.chars().next().unwrap_or('?');
        return ParsedLine::Entry(ListingEntry {
            permissions: permissions.to_string(),
            kind: EntryKind::from_marker(marker),
            modified,
            path,
        });
    }

    ParsedLine::Unmatched
}

/// Whitespace-delimited fields as `(start, end, text)` byte spans.
fn tokenize(line: &str) -> Vec<(usize, usize, &str)> {
    let mut fields = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                fields.push((s, idx, &line[s..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        fields.push((s, line.len(), &line[s..]));
    }
    fields
}

/// Ten characters (`drwxr-xr-x`), optionally followed by the `+` ACL marker.
fn is_permission_token(token: &str) -> bool {
    let token = token.strip_suffix('+').unwrap_or(token);
    if token.len() != 10 {
        return false;
    }
    let mut chars = token.chars();
    let kind_ok = chars
        .next()
        .map(|c| matches!(c, '-' | 'd' | 'l' | 'b' | 'c' | 'p' | 's'))
        .unwrap_or(false);
    kind_ok && chars.all(|c| matches!(c, 'r' | 'w' | 'x' | 's' | 'S' | 't' | 'T' | '-'))
}

fn is_date_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

fn is_time_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit())
}

/// Drop quoting and literal `\n` sequences left behind by the listing transport.
fn clean_path(raw: &str) -> String {
    raw.replace("\\n", "")
        .trim()
        .trim_matches(|c: char| c == '\'' || c == '"')
        .trim()
        .to_string()
}
