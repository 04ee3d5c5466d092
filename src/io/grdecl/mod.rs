//! Eclipse GRDECL text files.
//!
//! A file is a sequence of keywords, each followed by data tokens and
//! closed by `/`. Data may use `N*value` repeats, `N*` for N undefined
//! values and Fortran `D` exponents. Text after `--` is a comment.
//! Record keywords such as `FAULTS` hold several `/`-terminated records
//! and end with an empty record.

mod faults;
mod reader;
mod writer;

use std::path::Path;

use tracing::debug;

pub use faults::{parse_faults, read_faults};
pub use reader::{known_property_keywords, open_grid_file, read_properties, read_property};
pub use writer::{
    write_binary_result_to_text_file, write_data_to_text_file, write_property_to_text_file,
};

use crate::error::GrdeclError;
use crate::results::UNDEFINED_VALUE;

const RECORD_KEYWORDS: [&str; 1] = ["FAULTS"];

/// A keyword and the tokens of its data.
///
/// `/` terminators are kept as separate tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordBlock {
    pub name: String,
    pub tokens: Vec<String>,
}

impl KeywordBlock {
    fn is_record_keyword(&self) -> bool {
        RECORD_KEYWORDS.contains(&self.name.as_str())
    }

    fn data_tokens(&self) -> impl Iterator<Item = &String> {
        self.tokens.iter().take_while(|t| *t != "/")
    }

    fn push_token_values(&self, token: &str, values: &mut Vec<f64>) -> Result<(), GrdeclError> {
        let bad_value = || GrdeclError::BadValue {
            keyword: self.name.clone(),
            token: token.to_owned(),
        };
        if let Some((count, value)) = token.split_once('*') {
            let count: usize = count.parse().map_err(|_| bad_value())?;
            let value = if value.is_empty() {
                UNDEFINED_VALUE
            } else {
                parse_number(value).ok_or_else(bad_value)?
            };
            values.extend(std::iter::repeat_n(value, count));
        } else {
            values.push(parse_number(token).ok_or_else(bad_value)?);
        }
        Ok(())
    }

    /// Numeric data up to the first `/`, with repeats expanded.
    ///
    /// # Errors
    ///
    /// Returns [`GrdeclError::BadValue`] for a token that is not a number or
    /// a valid repeat.
    pub fn values(&self) -> Result<Vec<f64>, GrdeclError> {
        let mut values = Vec::new();
        for token in self.data_tokens() {
            self.push_token_values(token, &mut values)?;
        }
        Ok(values)
    }

    /// The first `count` numeric values; tokens after them are not parsed.
    ///
    /// Returns fewer values if the data ends early.
    ///
    /// # Errors
    ///
    /// Returns [`GrdeclError::BadValue`] for a malformed token among the
    /// ones read.
    pub fn values_prefix(&self, count: usize) -> Result<Vec<f64>, GrdeclError> {
        let mut values = Vec::with_capacity(count);
        for token in self.data_tokens() {
            if values.len() >= count {
                break;
            }
            self.push_token_values(token, &mut values)?;
        }
        values.truncate(count);
        Ok(values)
    }

    /// The non-empty `/`-terminated records of a record keyword.
    #[must_use]
    pub fn records(&self) -> Vec<&[String]> {
        self.tokens
            .split(|t| t == "/")
            .filter(|record| !record.is_empty())
            .collect()
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.replace(['d', 'D'], "e").parse().ok()
}

fn strip_comment(line: &str) -> &str {
    line.find("--").map_or(line, |pos| &line[..pos])
}

fn tokenize_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '/' {
            chars.next();
            tokens.push("/".to_owned());
        } else if c == '\'' || c == '"' {
            chars.next();
            tokens.push(chars.by_ref().take_while(|&ch| ch != c).collect());
        } else {
            let mut token = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == '/' {
                    break;
                }
                token.push(ch);
                chars.next();
            }
            tokens.push(token);
        }
    }
    tokens
}

#[derive(Default)]
struct KeywordParser {
    blocks: Vec<KeywordBlock>,
    current: Option<KeywordBlock>,
    closed: bool,
    record_has_data: bool,
}

impl KeywordParser {
    fn in_records(&self) -> bool {
        !self.closed
            && self
                .current
                .as_ref()
                .is_some_and(KeywordBlock::is_record_keyword)
    }

    fn begin(&mut self, name: String) {
        self.blocks.extend(self.current.take());
        self.current = Some(KeywordBlock {
            name: name.to_ascii_uppercase(),
            tokens: Vec::new(),
        });
        self.closed = false;
        self.record_has_data = false;
    }

    fn push_tokens(&mut self, tokens: impl IntoIterator<Item = String>) {
        let Some(block) = self.current.as_mut() else {
            return;
        };
        let records = block.is_record_keyword();
        for token in tokens {
            if self.closed {
                break;
            }
            let terminator = token == "/";
            block.tokens.push(token);
            if !terminator {
                self.record_has_data = true;
            } else if records && self.record_has_data {
                self.record_has_data = false;
            } else {
                self.closed = true;
            }
        }
    }

    fn finish(mut self) -> Vec<KeywordBlock> {
        self.blocks.extend(self.current.take());
        self.blocks
    }
}

/// Splits `text` into keyword blocks, in file order.
///
/// Data before the first keyword and after a keyword's terminator is
/// ignored.
#[must_use]
pub fn parse_keywords(text: &str) -> Vec<KeywordBlock> {
    let mut parser = KeywordParser::default();
    for raw in text.lines() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = tokenize_line(line).into_iter();
        if line.starts_with(|c: char| c.is_ascii_alphabetic()) && !parser.in_records() {
            let Some(name) = tokens.next() else {
                continue;
            };
            parser.begin(name);
        }
        parser.push_tokens(tokens);
    }
    parser.finish()
}

/// The first block named `name`, ignoring case.
#[must_use]
pub fn find_keyword<'a>(blocks: &'a [KeywordBlock], name: &str) -> Option<&'a KeywordBlock> {
    blocks.iter().find(|b| b.name.eq_ignore_ascii_case(name))
}

pub(crate) fn read_file(path: &Path) -> Result<String, GrdeclError> {
    std::fs::read_to_string(path).map_err(|source| GrdeclError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Names of all keywords in the file at `path`, in file order.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn find_keywords_on_file(path: impl AsRef<Path>) -> Result<Vec<String>, GrdeclError> {
    let path = path.as_ref();
    let names: Vec<String> = parse_keywords(&read_file(path)?)
        .into_iter()
        .map(|b| b.name)
        .collect();
    debug!(path = %path.display(), count = names.len(), "scanned keywords");
    Ok(names)
}

/// Numeric data of `keyword` in the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the keyword is missing, or
/// its data is not numeric.
pub fn read_keyword_values(path: impl AsRef<Path>, keyword: &str) -> Result<Vec<f64>, GrdeclError> {
    let blocks = parse_keywords(&read_file(path.as_ref())?);
    find_keyword(&blocks, keyword)
        .ok_or_else(|| GrdeclError::MissingKeyword(keyword.to_owned()))?
        .values()
}
