//! Plain-text name/count grid.
//!
//! `render` prints one `Name<TAB>count` row per contestant; `parse` reads an
//! edited copy back so it can go through `Ledger::apply_edits`.

use std::fmt::Write;

use crate::contestant::display_name;
use crate::error::{RaffleError, RaffleResult};
use crate::ledger::Ledger;

/// Name given to a freshly inserted blank row.
const PLACEHOLDER: &str = "----";

pub fn render(ledger: &Ledger) -> String {
    let mut out = String::new();
    for (key, record) in ledger.entries() {
        let _ = write!(out, "{}\t{}", display_name(key), record.count);
        if record.excluded {
            out.push_str("\t# excluded");
        }
        out.push('\n');
    }
    out
}

/// Reads rows of `name count`. The count is the last whitespace-separated
/// token; everything before it is the name, which may itself contain `#`.
/// A `# ...` comment after the count is ignored.
pub fn parse(text: &str) -> RaffleResult<Vec<(String, i64)>> {
    let mut rows = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = strip_comment(raw.trim());
        // whole-line comments, but not a row whose name starts with `#`
        if line.is_empty() || (line.starts_with('#') && !ends_with_count(line)) {
            continue;
        }

        let Some((name, count)) = line.rsplit_once(char::is_whitespace) else {
            // a lone token: blank placeholder rows carry no count
            if line == PLACEHOLDER {
                continue;
            }
            return Err(invalid(idx, "expected a name followed by a count"));
        };
        let name = name.trim();
        if name.is_empty() || name == PLACEHOLDER {
            continue;
        }
        let count = count
            .parse::<i64>()
            .map_err(|_| invalid(idx, &format!("{count:?} is not a whole number")))?;
        rows.push((name.to_string(), count));
    }
    Ok(rows)
}

// Only a `#` that follows whitespace and a count opens a comment.
fn strip_comment(line: &str) -> &str {
    if ends_with_count(line) {
        return line;
    }
    line.char_indices()
        .rev()
        .filter(|&(_, c)| c == '#')
        .map(|(i, _)| &line[..i])
        .filter(|before| before.ends_with(char::is_whitespace))
        .map(str::trim_end)
        .find(|before| ends_with_count(before))
        .unwrap_or(line)
}

fn ends_with_count(line: &str) -> bool {
    line.rsplit_once(char::is_whitespace)
        .is_some_and(|(_, last)| last.parse::<i64>().is_ok())
}

fn invalid(idx: usize, reason: &str) -> RaffleError {
    RaffleError::InvalidEdit(format!("line {}: {}", idx + 1, reason))
}
