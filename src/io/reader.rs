//! Parses the textual instance format used by `original_source/main/solve.c`
//! (`read_instance`): a header line `n_stacks n_tiers n_blocks`, followed by
//! one line per stack: `h p_1 ... p_h` (height, then priorities
//! bottom-to-top). Blank lines and `#`-prefixed comment lines are skipped
//! wherever they appear, matching the original's `strspn`/`#` handling in
//! `read_cvs_instance`.

use crate::domain::instance::Instance;
use crate::error::InstanceError;
use std::io::BufRead;

/// Reads an [`Instance`] from any line-buffered source.
pub fn read_instance<R: BufRead>(input: R) -> Result<Instance, InstanceError> {
    let mut lines = NumberedLines::new(input)?;

    let (header_line, header) = lines.next_content_line()?.ok_or(InstanceError::MissingHeaderLine)?;
    let mut fields = header.split_whitespace();
    let n_stacks: usize = fields
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| InstanceError::MalformedHeader {
            line: header_line,
            text: header.clone(),
        })?;
    let n_tiers: usize = fields
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| InstanceError::MalformedHeader {
            line: header_line,
            text: header.clone(),
        })?;
    // n_blocks is redundant (derivable from the row heights) but present in
    // the header for parity with the original format; we don't re-validate
    // it beyond parsing.
    let _n_blocks: usize = fields
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or(InstanceError::MalformedHeader {
            line: header_line,
            text: header,
        })?;

    let mut h = Vec::with_capacity(n_stacks);
    let mut p = Vec::with_capacity(n_stacks);

    for stack in 0..n_stacks {
        let (row_line, row) = lines
            .next_content_line()?
            .ok_or(InstanceError::MissingRow { stack, n_stacks })?;
        let mut fields = row.split_whitespace();
        let height: usize = fields
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| InstanceError::MalformedRow {
                stack,
                line: row_line,
                text: row.clone(),
            })?;

        let mut priorities = Vec::with_capacity(height);
        for _ in 0..height {
            let pri: i32 = fields
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| InstanceError::MalformedRow {
                    stack,
                    line: row_line,
                    text: row.clone(),
                })?;
            priorities.push(pri);
        }

        h.push(height);
        p.push(priorities);
    }

    Instance::new(n_tiers, h, p)
}

struct NumberedLines<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn new(input: R) -> Result<Self, InstanceError> {
        Ok(NumberedLines {
            lines: input.lines(),
            line_no: 0,
        })
    }

    /// Returns the next non-blank, non-comment line along with its
    /// 1-indexed line number, or `None` at end of input.
    fn next_content_line(&mut self) -> Result<Option<(usize, String)>, InstanceError> {
        for line in &mut self.lines {
            self.line_no += 1;
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Ok(Some((self.line_no, trimmed.to_string())));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_well_formed_instance() {
        let text = "2 2 2\n1 1\n1 2\n";
        let inst = read_instance(Cursor::new(text)).unwrap();
        assert_eq!(inst.n_stacks, 2);
        assert_eq!(inst.n_tiers, 2);
        assert_eq!(inst.n_blocks, 2);
        assert_eq!(inst.priority(0, 1), 1);
        assert_eq!(inst.priority(1, 1), 2);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# a comment\n\n2 2 2\n# row comment\n1 1\n\n1 2\n";
        let inst = read_instance(Cursor::new(text)).unwrap();
        assert_eq!(inst.n_stacks, 2);
    }

    #[test]
    fn reports_missing_header() {
        let text = "";
        let err = read_instance(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, InstanceError::MissingHeaderLine));
    }

    #[test]
    fn reports_missing_row() {
        let text = "2 2 2\n1 1\n";
        let err = read_instance(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, InstanceError::MissingRow { stack: 1, .. }));
    }

    #[test]
    fn reports_malformed_row() {
        let text = "2 2 2\n1 x\n1 2\n";
        let err = read_instance(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, InstanceError::MalformedRow { stack: 0, .. }));
    }
}
