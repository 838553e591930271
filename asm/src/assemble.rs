//! Two-pass assembly.
//!
//! Pass 1 walks the source in order, placing every line at an address and
//! interning labels and `EQU` bindings. Pass 2 re-walks the laid-out
//! lines with the complete symbol table and produces the bytes. Problems
//! never abort a pass; they accumulate so one run reports everything, and
//! any pass-1 problem suppresses pass 2 entirely.

use tracing::debug;

use crate::error::{Diagnostic, DiagnosticKind};
use crate::expr::{SymbolTable, eval};
use crate::line::{SourceLine, parse_line};
use crate::table::{self, InstructionDef, Lookup, Pattern};

/// Machine code for one source line: which line produced it, where its
/// first byte lands, and the bytes themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDetail {
    pub source_line: u32,
    /// None for lines that emit nothing (ORG, EQU, END, bare labels).
    pub start_address: Option<u16>,
    pub opcodes: Vec<u8>,
}

/// Outcome of [`assemble`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// True exactly when `errors` is empty.
    pub success: bool,
    /// The first ORG target, or 0.
    pub load_address: u16,
    pub details: Vec<InstructionDetail>,
    pub errors: Vec<Diagnostic>,
}

enum LineKind {
    Instruction(&'static InstructionDef),
    Data,
    Org(u16),
    Silent,
    End,
}

struct LaidOutLine {
    source: SourceLine,
    /// Address of the first emitted byte; None when nothing is emitted.
    address: Option<u16>,
    size: u16,
    kind: LineKind,
}

struct Pass1 {
    lines: Vec<LaidOutLine>,
    symbols: SymbolTable,
    load_address: u16,
    errors: Vec<Diagnostic>,
}

fn diag(line: u32, address: u16, kind: DiagnosticKind) -> Diagnostic {
    Diagnostic {
        line: line as i32,
        address,
        kind,
    }
}

/// Assemble a complete source text. Line numbers are 1-based.
pub fn assemble(source: &str) -> Assembly {
    let mut first = pass1(source);
    debug!(
        lines = first.lines.len(),
        errors = first.errors.len(),
        load_address = first.load_address,
        "pass 1 complete"
    );

    let details = if first.errors.is_empty() {
        let details = pass2(
            &first.lines,
            &first.symbols,
            first.load_address,
            &mut first.errors,
        );
        debug!(
            bytes = details.iter().map(|d| d.opcodes.len()).sum::<usize>(),
            "pass 2 complete"
        );
        details
    } else {
        Vec::new()
    };

    let errors = first.errors;
    Assembly {
        success: errors.is_empty(),
        load_address: first.load_address,
        details,
        errors,
    }
}

fn pass1(source: &str) -> Pass1 {
    let mut symbols = SymbolTable::default();
    let mut errors = Vec::new();
    let mut lines = Vec::new();
    let mut current: u16 = 0;
    let mut load_address: u16 = 0;

    for (index, raw) in source.lines().enumerate() {
        let line_num = index as u32 + 1;
        let parsed = match parse_line(raw, line_num) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(kind) => {
                errors.push(diag(line_num, current, kind));
                continue;
            }
        };

        let mnemonic_owned = parsed.mnemonic.clone();
        let mnemonic = mnemonic_owned.as_deref();

        // ORG repositions the location counter; it is only valid while
        // nothing has been laid out yet.
        let mut org_target = None;
        if mnemonic == Some("ORG") {
            if parsed.operands.len() != 1 {
                errors.push(diag(
                    line_num,
                    current,
                    DiagnosticKind::OperandMismatch("ORG".into()),
                ));
            } else if current != 0 {
                errors.push(diag(line_num, current, DiagnosticKind::OrgAfterCode));
            } else {
                match eval(&parsed.operands[0], &symbols) {
                    Ok(value) => {
                        load_address = value as u16;
                        current = load_address;
                        org_target = Some(load_address);
                    }
                    Err(kind) => errors.push(diag(line_num, current, kind)),
                }
            }
        }

        // A label binds to the location counter, except in front of EQU.
        if let Some(label) = &parsed.label {
            if mnemonic != Some("EQU") {
                if let Err(kind) = symbols.define(label, current) {
                    errors.push(diag(line_num, current, kind));
                }
            }
        }

        let (kind, size) = match mnemonic {
            None => (LineKind::Silent, 0),
            Some("ORG") => (
                org_target.map_or(LineKind::Silent, LineKind::Org),
                0,
            ),
            Some("EQU") => {
                match &parsed.label {
                    None => {
                        errors.push(diag(line_num, current, DiagnosticKind::EquWithoutLabel));
                    }
                    Some(_) if parsed.operands.len() != 1 => {
                        errors.push(diag(
                            line_num,
                            current,
                            DiagnosticKind::OperandMismatch("EQU".into()),
                        ));
                    }
                    Some(label) => match eval(&parsed.operands[0], &symbols) {
                        Ok(value) => {
                            if let Err(kind) = symbols.define(label, value as u16) {
                                errors.push(diag(line_num, current, kind));
                            }
                        }
                        Err(kind) => errors.push(diag(line_num, current, kind)),
                    },
                }
                (LineKind::Silent, 0)
            }
            Some("DB") | Some("DEFB") => {
                // A labeled single-string DB records its length for len().
                if let (Some(label), [operand]) = (&parsed.label, parsed.operands.as_slice()) {
                    if Pattern::Str.matches(operand) {
                        let len = string_content(operand).chars().count() as u16;
                        symbols.record_string_len(label, len);
                    }
                }
                (LineKind::Data, db_size(&parsed.operands))
            }
            Some("DEFW") => {
                if parsed.operands.is_empty() {
                    errors.push(diag(
                        line_num,
                        current,
                        DiagnosticKind::OperandMismatch("DEFW".into()),
                    ));
                }
                (LineKind::Data, 2 * parsed.operands.len() as u16)
            }
            Some("DEFS") => {
                if parsed.operands.is_empty() || parsed.operands.len() > 2 {
                    errors.push(diag(
                        line_num,
                        current,
                        DiagnosticKind::OperandMismatch("DEFS".into()),
                    ));
                }
                let size = match parsed.operands.first() {
                    Some(operand) => match eval(operand, &symbols) {
                        Ok(value) => value as u16,
                        Err(kind) => {
                            errors.push(diag(line_num, current, kind));
                            0
                        }
                    },
                    None => 0,
                };
                (LineKind::Data, size)
            }
            Some("END") => (LineKind::End, 0),
            Some(other) => match table::resolve(other, &parsed.operands) {
                Lookup::Found(def) => (LineKind::Instruction(def), def.encoded_size()),
                Lookup::UnknownMnemonic => {
                    errors.push(diag(
                        line_num,
                        current,
                        DiagnosticKind::UnknownMnemonic(other.to_string()),
                    ));
                    (LineKind::Silent, 0)
                }
                Lookup::OperandMismatch => {
                    errors.push(diag(
                        line_num,
                        current,
                        DiagnosticKind::OperandMismatch(other.to_string()),
                    ));
                    (LineKind::Silent, 0)
                }
            },
        };

        let address = match kind {
            LineKind::Instruction(_) | LineKind::Data => Some(current),
            _ => None,
        };
        let stop = matches!(kind, LineKind::End);
        current = current.wrapping_add(size);
        lines.push(LaidOutLine {
            source: parsed,
            address,
            size,
            kind,
        });
        if stop {
            break;
        }
    }

    Pass1 {
        lines,
        symbols,
        load_address,
        errors,
    }
}

fn pass2(
    lines: &[LaidOutLine],
    symbols: &SymbolTable,
    load_address: u16,
    errors: &mut Vec<Diagnostic>,
) -> Vec<InstructionDetail> {
    let mut details = Vec::new();
    let mut current = load_address;

    for line in lines {
        let line_num = line.source.line_num;
        let mut opcodes = Vec::new();

        match &line.kind {
            LineKind::Org(value) => current = *value,
            LineKind::Silent | LineKind::End => {}
            LineKind::Instruction(def) => {
                opcodes.extend_from_slice(&def.prefix);
                let next = current.wrapping_add(line.size);
                for (pattern, operand) in def.patterns.iter().zip(&line.source.operands) {
                    let emitted = emit_operand(pattern, operand, next, symbols);
                    match emitted {
                        Ok(bytes) => opcodes.extend_from_slice(&bytes),
                        Err(kind) => errors.push(diag(line_num, current, kind)),
                    }
                }
            }
            LineKind::Data => {
                emit_data(line, symbols, &mut opcodes, errors, current);
            }
        }

        details.push(InstructionDetail {
            source_line: line_num,
            start_address: line.address,
            opcodes,
        });
        current = current.wrapping_add(line.size);
    }

    details
}

/// Bytes for one generic operand. `next` is the address of the following
/// instruction, which anchors relative displacements.
fn emit_operand(
    pattern: &Pattern,
    operand: &str,
    next: u16,
    symbols: &SymbolTable,
) -> Result<Vec<u8>, DiagnosticKind> {
    match pattern {
        Pattern::Lit(_) | Pattern::Str => Ok(Vec::new()),
        Pattern::Imm8 => Ok(vec![eval(operand, symbols)? as u8]),
        Pattern::Imm16 => Ok((eval(operand, symbols)? as u16).to_le_bytes().to_vec()),
        Pattern::Port => Ok(vec![eval(strip_brackets(operand), symbols)? as u8]),
        Pattern::Mem => Ok((eval(strip_brackets(operand), symbols)? as u16)
            .to_le_bytes()
            .to_vec()),
        Pattern::Rel => {
            let target = eval(operand, symbols)?;
            let disp = target - i32::from(next);
            if !(-128..=127).contains(&disp) {
                return Err(DiagnosticKind::RelativeJumpOutOfRange(disp));
            }
            Ok(vec![disp as i8 as u8])
        }
    }
}

fn emit_data(
    line: &LaidOutLine,
    symbols: &SymbolTable,
    opcodes: &mut Vec<u8>,
    errors: &mut Vec<Diagnostic>,
    current: u16,
) {
    let line_num = line.source.line_num;
    match line.source.mnemonic.as_deref() {
        Some("DB") | Some("DEFB") => {
            for operand in &line.source.operands {
                if Pattern::Str.matches(operand) {
                    opcodes.extend(string_content(operand).chars().map(|c| c as u8));
                } else {
                    match eval(operand, symbols) {
                        Ok(value) => opcodes.push(value as u8),
                        Err(kind) => errors.push(diag(line_num, current, kind)),
                    }
                }
            }
        }
        Some("DEFW") => {
            for operand in &line.source.operands {
                match eval(operand, symbols) {
                    Ok(value) => opcodes.extend_from_slice(&(value as u16).to_le_bytes()),
                    Err(kind) => errors.push(diag(line_num, current, kind)),
                }
            }
        }
        Some("DEFS") => {
            let fill = match line.source.operands.get(1) {
                Some(operand) => match eval(operand, symbols) {
                    Ok(value) => value as u8,
                    Err(kind) => {
                        errors.push(diag(line_num, current, kind));
                        0
                    }
                },
                None => 0,
            };
            opcodes.resize(line.size as usize, fill);
        }
        other => unreachable!("data line with mnemonic {other:?}"),
    }
}

fn db_size(operands: &[String]) -> u16 {
    operands
        .iter()
        .map(|operand| {
            if Pattern::Str.matches(operand) {
                string_content(operand).chars().count() as u16
            } else {
                1
            }
        })
        .sum()
}

/// Text between the quotes of a string literal operand.
fn string_content(operand: &str) -> &str {
    &operand[1..operand.len() - 1]
}

/// Text between the outer parentheses of an address operand.
fn strip_brackets(operand: &str) -> &str {
    operand
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(operand)
        .trim()
}
