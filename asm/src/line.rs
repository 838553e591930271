//! Source line recognition.
//!
//! Three line shapes are accepted (whitespace is flexible, a trailing
//! `; comment` is stripped, blank and comment-only lines yield nothing):
//!
//! 1. `label: [mnemonic [operands]]`
//! 2. `label EQU expression` (the colon is optional only for EQU)
//! 3. `[mnemonic [operands]]`

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::DiagnosticKind;

/// One source line reduced to its parts. Operands keep their source
/// spelling; the mnemonic is uppercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub line_num: u32,
    pub label: Option<String>,
    pub mnemonic: Option<String>,
    pub operands: Vec<String>,
}

static LABELED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*:\s*(.*)$").unwrap());
static EQU_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([A-Za-z_][A-Za-z0-9_]*)\s+EQU\b\s*(.*)$").unwrap());
static STATEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*(.*)$").unwrap());

/// Strip a trailing comment. A `;` inside a double-quoted string or a
/// char literal does not start a comment. Char literals are recognized as
/// the atomic three-character window `'x'`, never as an open-ended quote:
/// the bare apostrophe in `AF'` has no closing quote two characters on,
/// so a comment after an EX AF,AF' is still stripped.
fn strip_comment(line: &str) -> &str {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut in_string = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i].1 {
            '"' => in_string = !in_string,
            '\'' if !in_string && i + 2 < chars.len() && chars[i + 2].1 == '\'' => {
                i += 3;
                continue;
            }
            ';' if !in_string => return &line[..chars[i].0],
            _ => {}
        }
        i += 1;
    }
    line
}

/// Split an operand list on commas, leaving commas inside quoted strings
/// alone. Each piece is trimmed.
fn split_operands(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in text.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                current.push(ch);
            }
            None => match ch {
                '"' | '\'' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                ',' => {
                    out.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }
    out.push(current.trim().to_string());
    out
}

/// Parse one raw source line. `Ok(None)` for blank or comment-only lines;
/// a line matching none of the accepted shapes is a syntax error.
pub fn parse_line(raw: &str, line_num: u32) -> Result<Option<SourceLine>, DiagnosticKind> {
    let text = strip_comment(raw).trim();
    if text.is_empty() {
        return Ok(None);
    }

    let (label, rest) = if let Some(caps) = LABELED.captures(text) {
        (
            Some(caps[1].to_string()),
            caps.get(2).map_or("", |m| m.as_str()).to_string(),
        )
    } else if let Some(caps) = EQU_FORM.captures(text) {
        // Colon-less label, valid only in front of EQU.
        return Ok(Some(SourceLine {
            line_num,
            label: Some(caps[1].to_string()),
            mnemonic: Some("EQU".to_string()),
            operands: split_operands(caps.get(2).map_or("", |m| m.as_str())),
        }));
    } else {
        (None, text.to_string())
    };

    let rest = rest.trim();
    if rest.is_empty() {
        // Bare label.
        return Ok(Some(SourceLine {
            line_num,
            label,
            mnemonic: None,
            operands: Vec::new(),
        }));
    }

    let caps = STATEMENT.captures(rest).ok_or(DiagnosticKind::Syntax)?;
    Ok(Some(SourceLine {
        line_num,
        label,
        mnemonic: Some(caps[1].to_ascii_uppercase()),
        operands: split_operands(caps.get(2).map_or("", |m| m.as_str())),
    }))
}
