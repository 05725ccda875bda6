//! Line-oriented scanner for multi-line raw string literals.
//!
//! A literal opens on a line whose trimmed content ends with
//! `R"<delimiter>(` and closes on the first later line whose trimmed content
//! ends with `)<delimiter>";`. Everything in between is captured verbatim,
//! one `\n`-terminated line at a time. The opening and closing lines
//! themselves are never part of the body.

use crate::error::{IsolateError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CPP_OPENING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"R"([^(]*)\($"#).expect("Invalid regex"));

/// The pieces of syntax that bound a raw string literal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkerSyntax {
    pub prefix: String,
    pub open_bracket: char,
    pub close_bracket: char,
    pub terminator: String,
}

impl Default for MarkerSyntax {
    fn default() -> Self {
        Self {
            prefix: "R\"".to_string(),
            open_bracket: '(',
            close_bracket: ')',
            terminator: "\";".to_string(),
        }
    }
}

impl MarkerSyntax {
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(IsolateError::Config {
                message: "Raw string prefix must not be empty".to_string(),
            });
        }

        if self.open_bracket.is_whitespace() || self.close_bracket.is_whitespace() {
            return Err(IsolateError::Config {
                message: "Raw string brackets must not be whitespace".to_string(),
            });
        }

        Ok(())
    }

    fn opening_pattern(&self) -> String {
        let open = regex::escape(&self.open_bracket.to_string());
        format!(
            "{}([^{}]*){}$",
            regex::escape(&self.prefix),
            open,
            open
        )
    }

    fn closing_marker(&self, delimiter: &str) -> String {
        format!("{}{}{}", self.close_bracket, delimiter, self.terminator)
    }
}

/// Body of one finalized literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCase {
    /// Delimiter the literal was opened with, possibly empty.
    pub delimiter: String,
    /// 1-based line number of the opening marker.
    pub line: usize,
    body: String,
}

impl ExtractedCase {
    pub fn content(&self) -> &str {
        &self.body
    }

    pub fn into_content(self) -> String {
        self.body
    }

    pub fn line_count(&self) -> usize {
        self.body.lines().count()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A literal still open when the input ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnterminatedLiteral {
    pub line: usize,
    pub delimiter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub cases: Vec<ExtractedCase>,
    pub unterminated: Option<UnterminatedLiteral>,
}

impl ScanOutcome {
    pub fn is_clean(&self) -> bool {
        self.unterminated.is_none()
    }
}

enum ScanState {
    Outside,
    Inside {
        delimiter: String,
        closing_marker: String,
        line: usize,
        body: String,
    },
}

#[derive(Debug, Clone)]
pub struct LiteralScanner {
    syntax: MarkerSyntax,
    opening_re: Regex,
}

impl Default for LiteralScanner {
    fn default() -> Self {
        Self {
            syntax: MarkerSyntax::default(),
            opening_re: (*CPP_OPENING_RE).clone(),
        }
    }
}

impl LiteralScanner {
    pub fn new(syntax: MarkerSyntax) -> Result<Self> {
        syntax.validate()?;

        if syntax == MarkerSyntax::default() {
            return Ok(Self::default());
        }

        let opening_re = Regex::new(&syntax.opening_pattern()).map_err(|e| IsolateError::Config {
            message: format!("Invalid raw string syntax: {}", e),
        })?;

        Ok(Self { syntax, opening_re })
    }

    pub fn syntax(&self) -> &MarkerSyntax {
        &self.syntax
    }

    /// Scans `text` and returns every closed literal in source order.
    ///
    /// A literal still open at the end of the text is not returned as a case;
    /// it is reported through [`ScanOutcome::unterminated`] instead.
    pub fn scan(&self, text: &str) -> ScanOutcome {
        let mut cases = Vec::new();
        let mut state = ScanState::Outside;

        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();

            state = match state {
                ScanState::Outside => match self.opening_delimiter(trimmed) {
                    Some(delimiter) => ScanState::Inside {
                        closing_marker: self.syntax.closing_marker(delimiter),
                        delimiter: delimiter.to_string(),
                        line: index + 1,
                        body: String::new(),
                    },
                    None => ScanState::Outside,
                },
                ScanState::Inside {
                    delimiter,
                    closing_marker,
                    line: opened_at,
                    mut body,
                } => {
                    if trimmed.ends_with(closing_marker.as_str()) {
                        cases.push(ExtractedCase {
                            delimiter,
                            line: opened_at,
                            body,
                        });
                        ScanState::Outside
                    } else {
                        body.push_str(line);
                        body.push('\n');
                        ScanState::Inside {
                            delimiter,
                            closing_marker,
                            line: opened_at,
                            body,
                        }
                    }
                }
            };
        }

        let unterminated = match state {
            ScanState::Outside => None,
            ScanState::Inside {
                delimiter, line, ..
            } => Some(UnterminatedLiteral { line, delimiter }),
        };

        ScanOutcome {
            cases,
            unterminated,
        }
    }

    /// Delimiter of the opening marker ending `trimmed`, if there is one.
    fn opening_delimiter<'t>(&self, trimmed: &'t str) -> Option<&'t str> {
        self.opening_re
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Extracts the bodies of all closed raw string literals in `text` using the
/// default `R"delim( ... )delim";` syntax.
pub fn extract_cases(text: &str) -> Vec<String> {
    LiteralScanner::default()
        .scan(text)
        .cases
        .into_iter()
        .map(ExtractedCase::into_content)
        .collect()
}
