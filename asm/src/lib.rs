//! Two-pass assembler for the zed81 Z80 core.
//!
//! The entry point is [`assemble`], which turns a complete source text
//! into an [`Assembly`]: per-line machine code with provenance, plus any
//! accumulated diagnostics. [`load_opcodes_into_memory`] copies a
//! successful result into a 64 KiB memory image for execution.
//!
//! # Source language
//!
//! Each line is `label: [mnemonic [operands]]`, `label EQU expression`
//! (colon optional only for `EQU`), or `[mnemonic [operands]]`. Comments
//! run from `;` to the end of the line. Mnemonics and operand tokens are
//! case-insensitive; labels may end with `:`.
//!
//! Numeric literals:
//!
//!  Form      | Example  | Meaning
//! -----------|----------|---------------------
//!  decimal   | `-42`    | optionally negative
//!  hex       | `$2F`    | `$` prefix
//!  hex       | `0x2F`   | `0x` prefix
//!  hex       | `2FH`    | trailing `H`, must start with a digit
//!  binary    | `%1010`  | `%` prefix
//!  character | `'A'`    | the character's byte value
//!
//! Expressions combine literals and symbols with `+ - * /` and
//! parentheses; `*` and `/` bind tighter, same-precedence operators fold
//! left to right, and division truncates toward zero. `len(name)` gives
//! the byte length of the string defined at a `DB` label.
//!
//! Directives:
//!
//!  Directive        | Effect
//! ------------------|----------------------------------------------
//!  `ORG addr`       | set the load address (once, before any bytes)
//!  `name EQU expr`  | bind a symbol to a value
//!  `DB` / `DEFB`    | emit bytes and/or string contents
//!  `DEFW`           | emit 16-bit words, little-endian
//!  `DEFS n[,fill]`  | emit `n` copies of `fill` (default 0)
//!  `END`            | stop assembling

pub mod assemble;
pub mod error;
pub mod expr;
pub mod line;
pub mod loader;
pub mod table;

pub use assemble::{Assembly, InstructionDetail, assemble};
pub use error::{Diagnostic, DiagnosticKind};
pub use loader::load_opcodes_into_memory;
