//! The instruction catalog.
//!
//! One constant table maps (mnemonic, operand-pattern tuple) to an opcode
//! prefix. The regular opcode families are generated by loops at startup
//! so the table and the sizes it implies have a single source of truth.

use once_cell::sync::Lazy;

/// Operand pattern, matched against an operand's source spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Exact token: register, register pair, condition code, bit number.
    Lit(&'static str),
    /// 8-bit immediate expression (`n`).
    Imm8,
    /// 16-bit immediate expression (`nn`).
    Imm16,
    /// Parenthesized 8-bit port address (`(n)`).
    Port,
    /// Parenthesized 16-bit memory address (`(nn)`).
    Mem,
    /// PC-relative displacement (`d`).
    Rel,
    /// Double-quoted string literal.
    Str,
}

impl Pattern {
    /// Can this pattern stand for the given operand text? Literals match
    /// case-insensitively; the address patterns claim anything bracketed
    /// and the plain value patterns anything not bracketed.
    pub fn matches(&self, operand: &str) -> bool {
        match self {
            Pattern::Lit(token) => operand.eq_ignore_ascii_case(token),
            Pattern::Port | Pattern::Mem => is_bracketed(operand),
            Pattern::Imm8 | Pattern::Imm16 | Pattern::Rel => !is_bracketed(operand),
            Pattern::Str => is_string_literal(operand),
        }
    }

    /// Bytes this pattern contributes beyond the opcode prefix.
    pub fn operand_size(&self) -> u16 {
        match self {
            Pattern::Lit(_) | Pattern::Str => 0,
            Pattern::Imm8 | Pattern::Port | Pattern::Rel => 1,
            Pattern::Imm16 | Pattern::Mem => 2,
        }
    }

    fn is_generic(&self) -> bool {
        !matches!(self, Pattern::Lit(_))
    }
}

pub(crate) fn is_bracketed(operand: &str) -> bool {
    operand.starts_with('(') && operand.ends_with(')')
}

pub(crate) fn is_string_literal(operand: &str) -> bool {
    operand.len() >= 2 && operand.starts_with('"') && operand.ends_with('"')
}

/// One instruction form: the operand tuple it accepts and the opcode
/// bytes emitted ahead of any operand-dependent bytes.
#[derive(Debug, Clone)]
pub struct InstructionDef {
    pub mnemonic: &'static str,
    pub patterns: Vec<Pattern>,
    pub prefix: Vec<u8>,
}

impl InstructionDef {
    /// Total emitted size: prefix plus operand bytes.
    pub fn encoded_size(&self) -> u16 {
        self.prefix.len() as u16 + self.patterns.iter().map(Pattern::operand_size).sum::<u16>()
    }
}

/// Result of an instruction lookup.
pub enum Lookup {
    Found(&'static InstructionDef),
    UnknownMnemonic,
    OperandMismatch,
}

/// Select the definition for a parsed instruction line.
///
/// Arity must match and every pattern must accept its operand. A
/// definition with only literal patterns beats any definition carrying a
/// generic placeholder; among generic candidates the first in the table
/// wins.
pub fn resolve(mnemonic: &str, operands: &[String]) -> Lookup {
    let mut saw_mnemonic = false;
    let mut generic: Option<&'static InstructionDef> = None;

    for def in TABLE.iter() {
        if !def.mnemonic.eq_ignore_ascii_case(mnemonic) {
            continue;
        }
        saw_mnemonic = true;
        if def.patterns.len() != operands.len() {
            continue;
        }
        if !def
            .patterns
            .iter()
            .zip(operands)
            .all(|(pattern, operand)| pattern.matches(operand))
        {
            continue;
        }
        if def.patterns.iter().all(|p| !p.is_generic()) {
            return Lookup::Found(def);
        }
        if generic.is_none() {
            generic = Some(def);
        }
    }

    match generic {
        Some(def) => Lookup::Found(def),
        None if saw_mnemonic => Lookup::OperandMismatch,
        None => Lookup::UnknownMnemonic,
    }
}

// 8-bit registers in opcode encoding order; index 6 is the (HL) operand.
const R8: [(&str, u8); 8] = [
    ("B", 0),
    ("C", 1),
    ("D", 2),
    ("E", 3),
    ("H", 4),
    ("L", 5),
    ("(HL)", 6),
    ("A", 7),
];

const RP: [(&str, u8); 4] = [("BC", 0), ("DE", 1), ("HL", 2), ("SP", 3)];
const RP_STACK: [(&str, u8); 4] = [("BC", 0), ("DE", 1), ("HL", 2), ("AF", 3)];
const CC: [(&str, u8); 4] = [("NZ", 0), ("Z", 1), ("NC", 2), ("C", 3)];
const BITS: [&str; 8] = ["0", "1", "2", "3", "4", "5", "6", "7"];

// CB shift selectors; 6 is the unassembled SLL slot.
const SHIFTS: [(&str, u8); 7] = [
    ("RLC", 0),
    ("RRC", 1),
    ("RL", 2),
    ("RR", 3),
    ("SLA", 4),
    ("SRA", 5),
    ("SRL", 7),
];

pub static TABLE: Lazy<Vec<InstructionDef>> = Lazy::new(build_table);

fn build_table() -> Vec<InstructionDef> {
    use Pattern::*;

    let mut table = Vec::new();
    let mut def = |mnemonic: &'static str, patterns: Vec<Pattern>, prefix: Vec<u8>| {
        table.push(InstructionDef {
            mnemonic,
            patterns,
            prefix,
        });
    };

    // No-operand instructions
    def("NOP", vec![], vec![0x00]);
    def("HALT", vec![], vec![0x76]);
    def("RLCA", vec![], vec![0x07]);
    def("RRCA", vec![], vec![0x0F]);
    def("RLA", vec![], vec![0x17]);
    def("RRA", vec![], vec![0x1F]);
    def("CPL", vec![], vec![0x2F]);
    def("SCF", vec![], vec![0x37]);
    def("CCF", vec![], vec![0x3F]);
    def("NEG", vec![], vec![0xED, 0x44]);
    def("LDIR", vec![], vec![0xED, 0xB0]);
    def("RET", vec![], vec![0xC9]);

    // LD r, n / LD r, r'  (0x76 would be LD (HL),(HL); that slot is HALT)
    for (dst, d) in R8 {
        def("LD", vec![Lit(dst), Imm8], vec![0x06 | d << 3]);
        for (src, s) in R8 {
            if d == 6 && s == 6 {
                continue;
            }
            def("LD", vec![Lit(dst), Lit(src)], vec![0x40 | d << 3 | s]);
        }
    }

    // LD rr, nn
    for (pair, i) in RP {
        def("LD", vec![Lit(pair), Imm16], vec![0x01 | i << 4]);
    }

    // A through register-pair pointers
    def("LD", vec![Lit("(BC)"), Lit("A")], vec![0x02]);
    def("LD", vec![Lit("(DE)"), Lit("A")], vec![0x12]);
    def("LD", vec![Lit("A"), Lit("(BC)")], vec![0x0A]);
    def("LD", vec![Lit("A"), Lit("(DE)")], vec![0x1A]);

    // Absolute loads
    def("LD", vec![Mem, Lit("A")], vec![0x32]);
    def("LD", vec![Lit("A"), Mem], vec![0x3A]);
    def("LD", vec![Mem, Lit("HL")], vec![0x22]);
    def("LD", vec![Lit("HL"), Mem], vec![0x2A]);

    // Exchanges
    def("EX", vec![Lit("DE"), Lit("HL")], vec![0xEB]);
    def("EX", vec![Lit("AF"), Lit("AF'")], vec![0x08]);
    def("EX", vec![Lit("(SP)"), Lit("HL")], vec![0xE3]);

    // INC/DEC
    for (reg, i) in R8 {
        def("INC", vec![Lit(reg)], vec![0x04 | i << 3]);
        def("DEC", vec![Lit(reg)], vec![0x05 | i << 3]);
    }
    for (pair, i) in RP {
        def("INC", vec![Lit(pair)], vec![0x03 | i << 4]);
        def("DEC", vec![Lit(pair)], vec![0x0B | i << 4]);
    }

    // 8-bit ALU over registers and (HL). The ADC row is deliberately
    // thin: only ADC A,H and ADC A,n are assembled.
    for (reg, i) in R8 {
        def("ADD", vec![Lit("A"), Lit(reg)], vec![0x80 | i]);
        def("SUB", vec![Lit(reg)], vec![0x90 | i]);
        def("SBC", vec![Lit("A"), Lit(reg)], vec![0x98 | i]);
        def("AND", vec![Lit(reg)], vec![0xA0 | i]);
        def("XOR", vec![Lit(reg)], vec![0xA8 | i]);
        def("OR", vec![Lit(reg)], vec![0xB0 | i]);
        def("CP", vec![Lit(reg)], vec![0xB8 | i]);
    }
    def("ADC", vec![Lit("A"), Lit("H")], vec![0x8C]);

    // 8-bit ALU over immediates
    def("ADD", vec![Lit("A"), Imm8], vec![0xC6]);
    def("ADC", vec![Lit("A"), Imm8], vec![0xCE]);
    def("SUB", vec![Imm8], vec![0xD6]);
    def("SBC", vec![Lit("A"), Imm8], vec![0xDE]);
    def("AND", vec![Imm8], vec![0xE6]);
    def("XOR", vec![Imm8], vec![0xEE]);
    def("OR", vec![Imm8], vec![0xF6]);
    def("CP", vec![Imm8], vec![0xFE]);

    // 16-bit add
    for (pair, i) in RP {
        def("ADD", vec![Lit("HL"), Lit(pair)], vec![0x09 | i << 4]);
    }

    // Jumps, calls, returns
    def("JP", vec![Imm16], vec![0xC3]);
    def("JP", vec![Lit("(HL)")], vec![0xE9]);
    def("JR", vec![Rel], vec![0x18]);
    def("DJNZ", vec![Rel], vec![0x10]);
    def("CALL", vec![Imm16], vec![0xCD]);
    for (cond, i) in CC {
        def("JP", vec![Lit(cond), Imm16], vec![0xC2 | i << 3]);
        def("JR", vec![Lit(cond), Rel], vec![0x20 | i << 3]);
        def("CALL", vec![Lit(cond), Imm16], vec![0xC4 | i << 3]);
        def("RET", vec![Lit(cond)], vec![0xC0 | i << 3]);
    }

    // Stack
    for (pair, i) in RP_STACK {
        def("PUSH", vec![Lit(pair)], vec![0xC5 | i << 4]);
        def("POP", vec![Lit(pair)], vec![0xC1 | i << 4]);
    }

    // Port I/O
    def("OUT", vec![Port, Lit("A")], vec![0xD3]);
    def("IN", vec![Lit("A"), Port], vec![0xDB]);

    // CB-prefixed rotates/shifts
    for (mnemonic, op) in SHIFTS {
        for (reg, i) in R8 {
            def(mnemonic, vec![Lit(reg)], vec![0xCB, op << 3 | i]);
        }
    }

    // CB-prefixed bit test/clear/set, the full b x r grid
    for (b, bit) in BITS.iter().copied().enumerate() {
        let b = b as u8;
        for (reg, i) in R8 {
            def("BIT", vec![Lit(bit), Lit(reg)], vec![0xCB, 0x40 | b << 3 | i]);
            def("RES", vec![Lit(bit), Lit(reg)], vec![0xCB, 0x80 | b << 3 | i]);
            def("SET", vec![Lit(bit), Lit(reg)], vec![0xCB, 0xC0 | b << 3 | i]);
        }
    }

    table
}
