mod alu;
mod bit;
mod block;
mod branch;
mod load_store;
mod stack;

pub mod state;

use tracing::debug;

use crate::error::StepError;
use crate::mem::{IoPorts, Memory};
use self::state::{Flags, Registers};

/// The Z80 interpreter core.
///
/// The model is deliberately narrow: the eight main registers, PC/SP, the
/// Z and C flag bits, the single `A'`/`F'` shadow pair, and a halted latch.
/// Memory and ports are borrowed per call and never retained.
pub struct Z80 {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub pc: u16,
    pub sp: u16,
    pub flags: Flags,
    // Shadow pair, reachable only through EX AF,AF'
    pub a_shadow: u8,
    pub f_shadow: Flags,
    pub halted: bool,
}

/// Result of one `execute_steps` call.
///
/// `registers` is a deep copy; mutating it cannot reach the CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutcome {
    /// Fully-completed instructions. A decode failure does not count the
    /// offending instruction.
    pub instructions_executed: u32,
    pub halted: bool,
    pub registers: Registers,
    pub error: Option<StepError>,
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new()
    }
}

impl Z80 {
    pub fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            pc: 0,
            sp: 0xFFFF,
            flags: Flags::default(),
            a_shadow: 0,
            f_shadow: Flags::default(),
            halted: false,
        }
    }

    /// Power-on state: registers zeroed, SP at the top of memory.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Assign PC and, if given, SP.
    pub fn set(&mut self, pc: u16, sp: Option<u16>) {
        self.pc = pc;
        if let Some(sp) = sp {
            self.sp = sp;
        }
    }

    pub fn snapshot(&self) -> Registers {
        Registers {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
            e: self.e,
            h: self.h,
            l: self.l,
            pc: self.pc,
            sp: self.sp,
            flags: self.flags,
            a_shadow: self.a_shadow,
            f_shadow: self.f_shadow,
            halted: self.halted,
        }
    }

    pub fn restore(&mut self, regs: &Registers) {
        self.a = regs.a;
        self.b = regs.b;
        self.c = regs.c;
        self.d = regs.d;
        self.e = regs.e;
        self.h = regs.h;
        self.l = regs.l;
        self.pc = regs.pc;
        self.sp = regs.sp;
        self.flags = regs.flags;
        self.a_shadow = regs.a_shadow;
        self.f_shadow = regs.f_shadow;
        self.halted = regs.halted;
    }

    // Helpers for 16-bit register access
    pub fn get_bc(&self) -> u16 { ((self.b as u16) << 8) | self.c as u16 }
    pub fn set_bc(&mut self, val: u16) { self.b = (val >> 8) as u8; self.c = val as u8; }

    pub fn get_de(&self) -> u16 { ((self.d as u16) << 8) | self.e as u16 }
    pub fn set_de(&mut self, val: u16) { self.d = (val >> 8) as u8; self.e = val as u8; }

    pub fn get_hl(&self) -> u16 { ((self.h as u16) << 8) | self.l as u16 }
    pub fn set_hl(&mut self, val: u16) { self.h = (val >> 8) as u8; self.l = val as u8; }

    pub fn get_af(&self) -> u16 { ((self.a as u16) << 8) | self.flags.to_byte() as u16 }
    pub fn set_af(&mut self, val: u16) {
        self.a = (val >> 8) as u8;
        self.flags = Flags::from_byte(val as u8);
    }

    /// Get 16-bit register pair by index (0=BC, 1=DE, 2=HL, 3=SP).
    pub(crate) fn get_rp(&self, index: u8) -> u16 {
        match index {
            0 => self.get_bc(),
            1 => self.get_de(),
            2 => self.get_hl(),
            3 => self.sp,
            _ => unreachable!("get_rp called with index {}", index),
        }
    }

    /// Set 16-bit register pair by index (0=BC, 1=DE, 2=HL, 3=SP).
    pub(crate) fn set_rp(&mut self, index: u8, val: u16) {
        match index {
            0 => self.set_bc(val),
            1 => self.set_de(val),
            2 => self.set_hl(val),
            3 => self.sp = val,
            _ => unreachable!("set_rp called with index {}", index),
        }
    }

    /// Get 16-bit register pair by index for PUSH/POP (0=BC, 1=DE, 2=HL, 3=AF).
    pub(crate) fn get_rp_af(&self, index: u8) -> u16 {
        match index {
            0 => self.get_bc(),
            1 => self.get_de(),
            2 => self.get_hl(),
            3 => self.get_af(),
            _ => unreachable!("get_rp_af called with index {}", index),
        }
    }

    /// Set 16-bit register pair by index for PUSH/POP (0=BC, 1=DE, 2=HL, 3=AF).
    pub(crate) fn set_rp_af(&mut self, index: u8, val: u16) {
        match index {
            0 => self.set_bc(val),
            1 => self.set_de(val),
            2 => self.set_hl(val),
            3 => self.set_af(val),
            _ => unreachable!("set_rp_af called with index {}", index),
        }
    }

    /// Get 8-bit register by opcode index. Index 6 is the memory operand
    /// and is NOT handled here — callers go through (HL) themselves.
    pub fn get_reg8(&self, index: u8) -> u8 {
        match index {
            0 => self.b,
            1 => self.c,
            2 => self.d,
            3 => self.e,
            4 => self.h,
            5 => self.l,
            7 => self.a,
            _ => unreachable!("get_reg8 called with index {}", index),
        }
    }

    pub fn set_reg8(&mut self, index: u8, val: u8) {
        match index {
            0 => self.b = val,
            1 => self.c = val,
            2 => self.d = val,
            3 => self.e = val,
            4 => self.h = val,
            5 => self.l = val,
            7 => self.a = val,
            _ => unreachable!("set_reg8 called with index {}", index),
        }
    }

    // --- Bus helpers ---

    pub(crate) fn fetch8(&mut self, mem: &Memory) -> u8 {
        let val = mem[self.pc as usize];
        self.pc = self.pc.wrapping_add(1);
        val
    }

    pub(crate) fn fetch16(&mut self, mem: &Memory) -> u16 {
        let low = self.fetch8(mem);
        let high = self.fetch8(mem);
        u16::from_le_bytes([low, high])
    }

    pub(crate) fn read16(mem: &Memory, addr: u16) -> u16 {
        let low = mem[addr as usize];
        let high = mem[addr.wrapping_add(1) as usize];
        u16::from_le_bytes([low, high])
    }

    pub(crate) fn write16(mem: &mut Memory, addr: u16, val: u16) {
        mem[addr as usize] = val as u8;
        mem[addr.wrapping_add(1) as usize] = (val >> 8) as u8;
    }

    /// Run up to `steps` instructions against the given memory and ports.
    ///
    /// When `initial` is supplied the whole register file is overwritten
    /// first. The halted latch is then cleared, so a halted snapshot can be
    /// resumed. The loop stops early on HALT (counted; not an error) or on
    /// a decode failure (not counted; reported in `error`).
    pub fn execute_steps(
        &mut self,
        mem: &mut Memory,
        io: &mut IoPorts,
        steps: u32,
        initial: Option<&Registers>,
    ) -> ExecOutcome {
        if let Some(regs) = initial {
            self.restore(regs);
        }
        self.halted = false;

        let mut executed = 0u32;
        let mut error = None;
        while executed < steps {
            match self.step(mem, io) {
                Ok(()) => {
                    executed += 1;
                    if self.halted {
                        debug!(executed, pc = self.pc, "halted");
                        break;
                    }
                }
                Err(e) => {
                    debug!(%e, executed, "decode failure");
                    error = Some(e);
                    break;
                }
            }
        }

        ExecOutcome {
            instructions_executed: executed,
            halted: self.halted,
            registers: self.snapshot(),
            error,
        }
    }

    /// Evaluate a condition code (2 bits from the opcode).
    /// 0=NZ, 1=Z, 2=NC, 3=C.
    pub(crate) fn eval_condition(&self, cc: u8) -> bool {
        match cc {
            0 => !self.flags.z,
            1 => self.flags.z,
            2 => !self.flags.c,
            3 => self.flags.c,
            _ => unreachable!("eval_condition called with cc {}", cc),
        }
    }

    /// Fetch, decode, and execute one instruction.
    fn step(&mut self, mem: &mut Memory, io: &mut IoPorts) -> Result<(), StepError> {
        let start = self.pc;
        let opcode = self.fetch8(mem);

        match opcode {
            // NOP
            0x00 => {}

            // HALT — PC stays past the opcode, the latch stops the loop.
            0x76 => self.halted = true,

            // Prefixes
            0xCB => return self.step_cb(start, mem),
            0xED => return self.step_ed(start, mem),

            // --- Load/Store ---

            // LD (BC), A / LD (DE), A
            0x02 => self.op_ld_bc_a(mem),
            0x12 => self.op_ld_de_a(mem),
            // LD A, (BC) / LD A, (DE)
            0x0A => self.op_ld_a_bc(mem),
            0x1A => self.op_ld_a_de(mem),
            // LD (nn), HL / LD HL, (nn)
            0x22 => self.op_ld_nn_hl(mem),
            0x2A => self.op_ld_hl_nn_ind(mem),
            // LD (nn), A / LD A, (nn)
            0x32 => self.op_ld_nn_a(mem),
            0x3A => self.op_ld_a_nn(mem),

            // EX AF, AF' / EX DE, HL / EX (SP), HL
            0x08 => self.op_ex_af_af(),
            0xEB => self.op_ex_de_hl(),
            0xE3 => self.op_ex_sp_hl(mem),

            // LD rr, nn (0x01/0x11/0x21/0x31)
            op if (op & 0xCF) == 0x01 => self.op_ld_rr_nn(op, mem),
            // LD r, n (0x06, 0x0E, ... 0x3E; 0x36 = LD (HL),n)
            op if (op & 0xC7) == 0x06 => self.op_ld_r_n(op, mem),
            // LD r, r' (0x40-0x7F excluding 0x76)
            op if (op & 0xC0) == 0x40 => self.op_ld_r_r(op, mem),

            // --- Stack ---

            // PUSH rr (0xC5/D5/E5/F5)
            op if (op & 0xCF) == 0xC5 => self.op_push(op, mem),
            // POP rr (0xC1/D1/E1/F1)
            op if (op & 0xCF) == 0xC1 => self.op_pop(op, mem),

            // --- ALU ---

            // ADC A,H — the only register ADC the table carries; the rest
            // of the 0x88-0x8F row decodes as unknown.
            0x8C => self.op_alu_r(0x8C, mem),
            // ALU A, r (0x80 - 0xBF minus the unassembled ADC row)
            op if (op & 0xC0) == 0x80 && (op & 0xF8) != 0x88 => self.op_alu_r(op, mem),
            // ALU A, n (0xC6, 0xCE, ... 0xFE)
            op if (op & 0xC7) == 0xC6 => self.op_alu_n(op, mem),

            // INC r (0x04, 0x0C...) / DEC r (0x05, 0x0D...)
            op if (op & 0xC7) == 0x04 => self.op_inc_dec_r(op, mem),
            op if (op & 0xC7) == 0x05 => self.op_inc_dec_r(op, mem),

            // ADD HL,rr (0x09/0x19/0x29/0x39)
            op if (op & 0xCF) == 0x09 => self.op_add_hl_rr(op),
            // INC rr (0x03/...) / DEC rr (0x0B/...)
            op if (op & 0xCF) == 0x03 => self.op_inc_dec_rr(op),
            op if (op & 0xCF) == 0x0B => self.op_inc_dec_rr(op),

            // Accumulator rotates
            0x07 => self.op_rlca(),
            0x0F => self.op_rrca(),
            0x17 => self.op_rla(),
            0x1F => self.op_rra(),

            // Misc ALU
            0x2F => self.op_cpl(),
            0x37 => self.op_scf(),
            0x3F => self.op_ccf(),

            // --- Branch/Control Flow ---

            0xC3 => self.op_jp_nn(mem),
            0xE9 => self.op_jp_hl(),
            0x18 => self.op_jr_e(mem),
            0x10 => self.op_djnz(mem),
            0xCD => self.op_call_nn(mem),
            0xC9 => self.op_ret(mem),

            // Port I/O
            0xDB => self.op_in_a_n(mem, io),
            0xD3 => self.op_out_n_a(mem, io),

            // Conditional transfers carry only Z/NZ/C/NC; the parity and
            // sign rows (0xE0-0xFA column-mates) fall through to unknown.
            op if (op & 0xE7) == 0xC2 => self.op_jp_cc_nn(op, mem),
            op if (op & 0xE7) == 0x20 => self.op_jr_cc_e(op, mem),
            op if (op & 0xE7) == 0xC4 => self.op_call_cc_nn(op, mem),
            op if (op & 0xE7) == 0xC0 => self.op_ret_cc(op, mem),

            _ => return Err(StepError::UnknownOpcode { opcode, address: start }),
        }
        Ok(())
    }

    /// CB-prefixed dispatch: rotates/shifts, BIT, RES, SET.
    fn step_cb(&mut self, start: u16, mem: &mut Memory) -> Result<(), StepError> {
        let op = self.fetch8(mem);
        let group = (op >> 6) & 0x03; // 0=rot/shift, 1=BIT, 2=RES, 3=SET
        let sel = (op >> 3) & 0x07; // shift operation or bit number
        let reg = op & 0x07;

        // 0x30-0x37 is the undocumented SLL row
        if group == 0 && sel == 6 {
            return Err(StepError::UnknownOpcode { opcode: op, address: start });
        }

        match group {
            0 => self.op_cb_rotate_shift(sel, reg, mem),
            1 => self.op_cb_bit(sel, reg, mem),
            _ => self.op_cb_res_set(group, sel, reg, mem),
        }
        Ok(())
    }

    /// ED-prefixed dispatch. Only NEG and LDIR are assembled; every other
    /// sub-opcode is a decode error.
    fn step_ed(&mut self, start: u16, mem: &mut Memory) -> Result<(), StepError> {
        let op = self.fetch8(mem);
        match op {
            0x44 => self.op_neg(),
            0xB0 => self.op_ldir(mem),
            _ => return Err(StepError::UnknownOpcode { opcode: op, address: start }),
        }
        Ok(())
    }
}
