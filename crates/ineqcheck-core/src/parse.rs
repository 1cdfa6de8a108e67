//! Line-oriented parser for relation chains.
//!
//! # Format
//!
//! ```text
//! # comment
//! bounds: x ≤ y ≤ z ≤ x
//! x < a
//! a = b
//! ```
//!
//! Each non-blank line is an optional `label:` prefix (split at the first
//! `:`) followed by a chain of terms separated by `<`, `≤`, `=`, `≥` or `>`.
//! A chain of `n` terms yields `n - 1` relations sharing adjacent terms.
//! Terms and labels are trimmed; an empty label counts as no label.
//!
//! With [`ParseOptions::ascii_operators`] the two-character spellings `<=`,
//! `>=` and `==` are accepted as well.

use tracing::{debug, instrument};

use crate::error::ErrorCode;
use crate::relation::{Operator, Relation};

/// Parser switches, usually taken from [`crate::config::EffectiveConfig::parse_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept `<=`, `>=`, `==`.
    pub ascii_operators: bool,
    /// Skip lines whose first non-blank character is `#`.
    pub comments: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            ascii_operators: true,
            comments: true,
        }
    }
}

/// Malformed input text. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// An operator without a term on one side, e.g. `x < < y`.
    #[error("line {line}: empty term at position {position} of the chain")]
    EmptyTerm { line: usize, position: usize },

    /// A non-blank line containing no relation symbol.
    #[error("line {line}: no relation operator found")]
    MissingOperator { line: usize },

    /// An operator spelling that is not accepted under the current options.
    #[error("line {line}: unsupported operator {token:?}")]
    InvalidOperator { line: usize, token: String },
}

impl ParseError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyTerm { .. } => ErrorCode::EmptyTerm,
            Self::MissingOperator { .. } => ErrorCode::MissingOperator,
            Self::InvalidOperator { .. } => ErrorCode::InvalidOperator,
        }
    }

    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::EmptyTerm { line, .. }
            | Self::MissingOperator { line }
            | Self::InvalidOperator { line, .. } => *line,
        }
    }
}

/// Parse a whole document.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
pub fn parse_str(input: &str, options: &ParseOptions) -> Result<Vec<Relation<String>>, ParseError> {
    parse_lines(input.lines(), options)
}

/// Parse a sequence of lines, numbering them from 1.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered.
#[instrument(skip_all)]
pub fn parse_lines<I, S>(lines: I, options: &ParseOptions) -> Result<Vec<Relation<String>>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut relations = Vec::new();
    let mut line_count = 0_usize;
    for (idx, line) in lines.into_iter().enumerate() {
        relations.extend(parse_line(line.as_ref(), idx + 1, options)?);
        line_count = idx + 1;
    }
    debug!(lines = line_count, relations = relations.len(), "parsed input");
    Ok(relations)
}

/// Parse one line. Blank and comment lines yield no relations.
///
/// # Errors
///
/// Returns a [`ParseError`] tagged with `line_no` if the chain is malformed.
pub fn parse_line(
    line: &str,
    line_no: usize,
    options: &ParseOptions,
) -> Result<Vec<Relation<String>>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || (options.comments && trimmed.starts_with('#')) {
        return Ok(Vec::new());
    }

    let (label, chain) = match trimmed.split_once(':') {
        Some((label, chain)) => {
            let label = label.trim();
            ((!label.is_empty()).then(|| label.to_string()), chain)
        }
        None => (None, trimmed),
    };

    let (terms, ops) = split_chain(chain, line_no, options)?;
    if ops.is_empty() {
        if chain.trim().is_empty() {
            return Ok(Vec::new());
        }
        return Err(ParseError::MissingOperator { line: line_no });
    }
    if let Some(position) = terms.iter().position(|t| t.is_empty()) {
        return Err(ParseError::EmptyTerm {
            line: line_no,
            position,
        });
    }

    Ok(ops
        .iter()
        .enumerate()
        .map(|(i, &op)| Relation {
            left: terms[i].to_string(),
            op,
            right: terms[i + 1].to_string(),
            label: label.clone(),
        })
        .collect())
}

/// Split `chain` into trimmed terms and the operators between them.
/// Always returns `ops.len() + 1` terms.
fn split_chain<'a>(
    chain: &'a str,
    line_no: usize,
    options: &ParseOptions,
) -> Result<(Vec<&'a str>, Vec<Operator>), ParseError> {
    let mut terms = Vec::new();
    let mut ops = Vec::new();
    let mut start = 0;
    let mut chars = chain.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if !matches!(c, '<' | '≤' | '=' | '≥' | '>') {
            continue;
        }
        let mut end = pos + c.len_utf8();
        if matches!(c, '<' | '>' | '=') && chars.peek().is_some_and(|&(_, next)| next == '=') {
            if !options.ascii_operators {
                return Err(ParseError::InvalidOperator {
                    line: line_no,
                    token: chain[pos..=end].to_string(),
                });
            }
            chars.next();
            end += 1;
        }
        let token = &chain[pos..end];
        let op = token
            .parse::<Operator>()
            .map_err(|_| ParseError::InvalidOperator {
                line: line_no,
                token: token.to_string(),
            })?;
        terms.push(chain[start..pos].trim());
        ops.push(op);
        start = end;
    }
    terms.push(chain[start..].trim());

    Ok((terms, ops))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Operator::{Equal, Greater, GreaterEq, Less, LessEq};

    fn rel(left: &str, op: Operator, right: &str) -> Relation<String> {
        Relation::new(left.to_string(), op, right.to_string())
    }

    fn parse(line: &str) -> Vec<Relation<String>> {
        parse_line(line, 1, &ParseOptions::default()).expect("line should parse")
    }

    #[test]
    fn chain_splits_into_adjacent_pairs() {
        assert_eq!(
            parse("x ≤ y ≤ z ≤ x"),
            vec![rel("x", LessEq, "y"), rel("y", LessEq, "z"), rel("z", LessEq, "x")]
        );
    }

    #[test]
    fn all_five_symbols_are_recognised() {
        assert_eq!(
            parse("a<b≤c=d≥e>f"),
            vec![
                rel("a", Less, "b"),
                rel("b", LessEq, "c"),
                rel("c", Equal, "d"),
                rel("d", GreaterEq, "e"),
                rel("e", Greater, "f"),
            ]
        );
    }

    #[test]
    fn label_is_split_at_first_colon_and_trimmed() {
        let rels = parse("  bounds : lo < mid < hi");
        assert_eq!(rels.len(), 2);
        assert!(rels.iter().all(|r| r.label.as_deref() == Some("bounds")));
        assert_eq!(rels[0].left, "lo");
        assert_eq!(rels[1].right, "hi");
    }

    #[test]
    fn empty_label_is_none() {
        let rels = parse(": a < b");
        assert_eq!(rels, vec![rel("a", Less, "b")]);
    }

    #[test]
    fn terms_may_contain_spaces_and_punctuation() {
        let rels = parse("f(x) + 1 ≤ g[y]");
        assert_eq!(rels, vec![rel("f(x) + 1", LessEq, "g[y]")]);
    }

    #[test]
    fn ascii_aliases_map_to_unicode_operators() {
        assert_eq!(
            parse("a <= b == c >= d"),
            vec![rel("a", LessEq, "b"), rel("b", Equal, "c"), rel("c", GreaterEq, "d")]
        );
    }

    #[test]
    fn ascii_aliases_rejected_when_disabled() {
        let options = ParseOptions {
            ascii_operators: false,
            ..ParseOptions::default()
        };
        let err = parse_line("a <= b", 4, &options).expect_err("alias disabled");
        assert_eq!(
            err,
            ParseError::InvalidOperator {
                line: 4,
                token: "<=".to_string()
            }
        );
        assert_eq!(err.error_code(), ErrorCode::InvalidOperator);
    }

    #[test]
    fn blank_and_comment_lines_yield_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("   \t").is_empty());
        assert!(parse("# x < y").is_empty());
        assert!(parse("label:").is_empty());
    }

    #[test]
    fn comment_marker_is_a_term_when_comments_disabled() {
        let options = ParseOptions {
            comments: false,
            ..ParseOptions::default()
        };
        let rels = parse_line("#a < b", 1, &options).expect("parses");
        assert_eq!(rels, vec![rel("#a", Less, "b")]);
    }

    #[test]
    fn missing_operator_is_an_error() {
        let err = parse_line("just_a_term", 7, &ParseOptions::default()).expect_err("no operator");
        assert_eq!(err, ParseError::MissingOperator { line: 7 });
        assert_eq!(err.line(), 7);
    }

    #[test]
    fn empty_terms_are_errors() {
        let err = parse_line("x < < y", 2, &ParseOptions::default()).expect_err("empty middle");
        assert_eq!(err, ParseError::EmptyTerm { line: 2, position: 1 });

        let err = parse_line("< y", 3, &ParseOptions::default()).expect_err("empty first");
        assert_eq!(err, ParseError::EmptyTerm { line: 3, position: 0 });

        let err = parse_line("x ≥", 5, &ParseOptions::default()).expect_err("empty last");
        assert_eq!(err, ParseError::EmptyTerm { line: 5, position: 1 });
    }

    #[test]
    fn parse_str_numbers_lines_from_one() {
        let input = "x ≤ y\n\n# note\nbad line\n";
        let err = parse_str(input, &ParseOptions::default()).expect_err("line 4 is bad");
        assert_eq!(err.line(), 4);
    }

    #[test]
    fn parse_str_concatenates_lines_in_order() {
        let input = "x ≤ y ≤ z ≤ x\nx < a\r\na = b\n";
        let rels = parse_str(input, &ParseOptions::default()).expect("parses");
        assert_eq!(rels.len(), 5);
        assert_eq!(rels[3], rel("x", Less, "a"));
        assert_eq!(rels[4], rel("a", Equal, "b"));
    }
}
