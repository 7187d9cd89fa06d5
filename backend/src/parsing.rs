//! Puzzle-notes reader
//!
//! Turns the text notes describing each agent into `AgentSpec`s. Blocks are
//! separated by blank lines:
//!
//! ```text
//! Monkey 0:
//!   Starting items: 79, 98
//!   Operation: new = old * 19
//!   Test: divisible by 23
//!     If true: throw to monkey 2
//!     If false: throw to monkey 3
//! ```
//!
//! Only structure is checked here. Duplicate ids, dangling routes, zero
//! divisors and bad transforms are reported by `Registry::load`.

use crate::models::{AgentId, AgentSpec, WorryLevel};
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading puzzle notes
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Input contains no agent blocks")]
    EmptyInput,

    #[error("Block {block}: missing '{field}' line")]
    MissingField { block: usize, field: &'static str },

    #[error("Block {block}: invalid number '{value}' in {field}")]
    InvalidNumber {
        block: usize,
        field: &'static str,
        value: String,
    },

    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Compiled extraction patterns
#[derive(Debug, Clone)]
pub struct NotesParser {
    separator: Regex,
    header: Regex,
    items: Regex,
    operation: Regex,
    test: Regex,
    if_true: Regex,
    if_false: Regex,
}

impl NotesParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            separator: Regex::new(r"\r?\n[ \t]*\r?\n")?,
            header: Regex::new(r"(?m)^\s*Monkey (\d+):")?,
            items: Regex::new(r"Starting items:[ \t]*([^\r\n]*)")?,
            operation: Regex::new(r"Operation: new = ([^\r\n]+)")?,
            test: Regex::new(r"Test: divisible by (\d+)")?,
            if_true: Regex::new(r"If true: throw to monkey (\d+)")?,
            if_false: Regex::new(r"If false: throw to monkey (\d+)")?,
        })
    }

    /// Parse every block in `text`
    pub fn parse(&self, text: &str) -> Result<Vec<AgentSpec>, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        self.separator
            .split(text)
            .filter(|block| !block.trim().is_empty())
            .enumerate()
            .map(|(index, block)| self.parse_block(index + 1, block))
            .collect()
    }

    fn parse_block(&self, block: usize, text: &str) -> Result<AgentSpec, ParseError> {
        let capture = |pattern: &Regex, field: &'static str| -> Result<String, ParseError> {
            pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string())
                .ok_or(ParseError::MissingField { block, field })
        };

        let id: AgentId = parse_number(block, "agent id", &capture(&self.header, "Monkey")?)?;
        let items_text = capture(&self.items, "Starting items")?;
        let transform = capture(&self.operation, "Operation")?;
        let divisor: u64 = parse_number(block, "test divisor", &capture(&self.test, "Test")?)?;
        let on_true: AgentId =
            parse_number(block, "true target", &capture(&self.if_true, "If true")?)?;
        let on_false: AgentId =
            parse_number(block, "false target", &capture(&self.if_false, "If false")?)?;

        let items = items_text
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| parse_number::<WorryLevel>(block, "starting items", item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AgentSpec {
            id,
            items,
            transform,
            divisor,
            on_true,
            on_false,
        })
    }
}

fn parse_number<T: FromStr>(block: usize, field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        block,
        field,
        value: value.to_string(),
    })
}

/// Parse puzzle notes into agent specs
///
/// # Example
///
/// ```rust
/// use worry_simulator_core_rs::parsing::parse_notes;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let notes = "Monkey 0:\n  Starting items: 79, 98\n  Operation: new = old * 19\n  Test: divisible by 23\n    If true: throw to monkey 2\n    If false: throw to monkey 3\n";
/// let specs = parse_notes(notes)?;
/// assert_eq!(specs.len(), 1);
/// assert_eq!(specs[0].transform, "old * 19");
/// assert_eq!(specs[0].on_false, 3);
/// # Ok(())
/// # }
/// ```
pub fn parse_notes(text: &str) -> Result<Vec<AgentSpec>, ParseError> {
    NotesParser::new()?.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    const BLOCK: &str = "Monkey 3:
  Starting items: 74
  Operation: new = old + 3
  Test: divisible by 17
    If true: throw to monkey 0
    If false: throw to monkey 1";

    #[test]
    fn test_single_block() {
        let specs = parse_notes(BLOCK).unwrap();
        assert_eq!(
            specs,
            vec![AgentSpec::new(3, "old + 3", 17, 0, 1).with_items([74u32])]
        );
    }

    #[test]
    fn test_empty_starting_items() {
        let text = BLOCK.replace("Starting items: 74", "Starting items:");
        let specs = parse_notes(&text).unwrap();
        assert!(specs[0].items.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = format!("{}\n\n{}", BLOCK, BLOCK.replace("Monkey 3", "Monkey 4")).replace('\n', "\r\n");
        let specs = parse_notes(&text).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].id, 4);
        assert_eq!(specs[1].transform, "old + 3");
    }

    #[test]
    fn test_large_item_is_kept_exact() {
        let text = BLOCK.replace("Starting items: 74", "Starting items: 123456789012345678901234567890");
        let specs = parse_notes(&text).unwrap();
        assert_eq!(
            specs[0].items[0],
            BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap()
        );
    }

    #[test]
    fn test_missing_field() {
        let text = BLOCK.replace("    If false: throw to monkey 1", "");
        assert_eq!(
            parse_notes(&text).unwrap_err(),
            ParseError::MissingField {
                block: 1,
                field: "If false"
            }
        );
    }

    #[test]
    fn test_invalid_item() {
        let text = BLOCK.replace("Starting items: 74", "Starting items: 74, x");
        assert_eq!(
            parse_notes(&text).unwrap_err(),
            ParseError::InvalidNumber {
                block: 1,
                field: "starting items",
                value: "x".to_string()
            }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_notes("  \n\n ").unwrap_err(), ParseError::EmptyInput);
    }
}
