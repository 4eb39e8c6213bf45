//! Splitting a script into batches on separator lines
//!
//! SQL Server tooling treats a line containing only `GO` as the end of a
//! batch. The separator is matched case-insensitively after trimming the
//! line, and never becomes part of a batch.

use serde::Serialize;

pub const DEFAULT_SEPARATOR: &str = "GO";

/// One executable chunk of a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Batch {
    /// 0-based position among the non-empty batches
    pub index: usize,
    /// 1-based line number of the batch's first line
    pub start_line: usize,
    pub text: String,
}

impl Batch {
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }

    /// First non-blank line, trimmed
    pub fn first_line(&self) -> &str {
        self.text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }
}

fn is_separator(line: &str, separator: &str) -> bool {
    !separator.is_empty() && line.trim().eq_ignore_ascii_case(separator)
}

/// Split `text` into batches. Whitespace-only batches are dropped.
///
/// A blank or whitespace-only `separator` matches no line, so the whole
/// text becomes a single batch.
pub fn split_batches(text: &str, separator: &str) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut current = String::new();
    let mut start_line = 1;
    let separator = separator.trim();

    let mut flush = |current: &mut String, start_line: usize| {
        if !current.trim().is_empty() {
            batches.push(Batch {
                index: 0,
                start_line,
                text: std::mem::take(current),
            });
        } else {
            current.clear();
        }
    };

    // split_inclusive keeps "\n" / "\r\n" on each line
    for (i, line) in text.split_inclusive('\n').enumerate() {
        let line_no = i + 1;
        if is_separator(line, separator) {
            flush(&mut current, start_line);
            start_line = line_no + 1;
        } else {
            current.push_str(line);
        }
    }
    flush(&mut current, start_line);

    for (i, batch) in batches.iter_mut().enumerate() {
        batch.index = i;
    }
    tracing::debug!(count = batches.len(), separator, "Split script into batches");
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_go() {
        let script = "CREATE TABLE t (id INT)\nGO\nINSERT INTO t VALUES (1)\ngo\n";
        let batches = split_batches(script, DEFAULT_SEPARATOR);

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].text, "CREATE TABLE t (id INT)\n");
        assert_eq!(batches[0].start_line, 1);
        assert_eq!(batches[1].index, 1);
        assert_eq!(batches[1].start_line, 3);
        assert_eq!(batches[1].text, "INSERT INTO t VALUES (1)\n");
    }

    #[test]
    fn test_crlf_and_indented_separator() {
        let script = "SELECT 1\r\n   Go  \r\nSELECT 2";
        let batches = split_batches(script, DEFAULT_SEPARATOR);

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].text, "SELECT 1\r\n");
        assert_eq!(batches[1].text, "SELECT 2");
    }

    #[test]
    fn test_go_inside_a_line_is_not_a_separator() {
        let script = "SELECT 'GO' AS word\nGOTO label\n";
        let batches = split_batches(script, DEFAULT_SEPARATOR);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].line_count(), 2);
    }

    #[test]
    fn test_empty_batches_dropped() {
        let script = "GO\n\n  \nGO\nSELECT 1\nGO\nGO\n";
        let batches = split_batches(script, DEFAULT_SEPARATOR);

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].index, 0);
        assert_eq!(batches[0].start_line, 5);
        assert_eq!(batches[0].first_line(), "SELECT 1");
    }

    #[test]
    fn test_custom_separator() {
        let batches = split_batches("a\n;;\nb\n", ";;");
        assert_eq!(batches.len(), 2);
    }

    #[test]
    fn test_blank_separator_never_splits() {
        let script = "SELECT 1\n\nSELECT 2\n";
        for separator in ["", "   "] {
            let batches = split_batches(script, separator);
            assert_eq!(batches.len(), 1, "separator {:?}", separator);
            assert_eq!(batches[0].text, script);
        }
    }

    #[test]
    fn test_empty_text() {
        assert!(split_batches("", DEFAULT_SEPARATOR).is_empty());
    }
}
