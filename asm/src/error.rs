use std::fmt;
use thiserror::Error;

/// One problem found while assembling.
///
/// Problems are accumulated, never thrown: pass 1 keeps walking after an
/// error so one run reports everything it can, and a nonempty list
/// suppresses pass 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based source line. -1 is reserved for internal faults.
    pub line: i32,
    /// Value of the location counter when the problem was detected.
    pub address: u16,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {} (addr 0x{:04X}): {}",
            self.line, self.address, self.kind
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("unrecognized line")]
    Syntax,
    #[error("unknown mnemonic {0}")]
    UnknownMnemonic(String),
    #[error("operands do not match any form of {0}")]
    OperandMismatch(String),
    #[error("duplicate label {0}")]
    DuplicateLabel(String),
    #[error("unknown symbol {0}")]
    UnknownSymbol(String),
    #[error("unknown function {0}")]
    UnknownFunction(String),
    #[error("malformed number {0}")]
    MalformedNumber(String),
    #[error("malformed character literal")]
    MalformedCharLiteral,
    #[error("invalid expression {0:?}")]
    BadExpression(String),
    #[error("len() of {0}, which is not a string label")]
    LenOfNonString(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("relative jump out of range ({0})")]
    RelativeJumpOutOfRange(i32),
    #[error("ORG after code or data has been laid out")]
    OrgAfterCode,
    #[error("EQU requires a label")]
    EquWithoutLabel,
}
