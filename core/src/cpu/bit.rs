use crate::cpu::Z80;
use crate::mem::Memory;

impl Z80 {
    /// Perform a rotate/shift operation on a value.
    /// op: 0=RLC, 1=RRC, 2=RL, 3=RR, 4=SLA, 5=SRA, 7=SRL (6 is unassigned).
    /// Returns (result, shifted-out bit).
    fn do_rotate_shift(&self, op: u8, val: u8) -> (u8, bool) {
        match op {
            0 => {
                // RLC: rotate left circular
                let c = (val >> 7) & 1;
                ((val << 1) | c, c != 0)
            }
            1 => {
                // RRC: rotate right circular
                let c = val & 1;
                ((val >> 1) | (c << 7), c != 0)
            }
            2 => {
                // RL: rotate left through carry
                let old_c = self.flags.c as u8;
                ((val << 1) | old_c, (val >> 7) != 0)
            }
            3 => {
                // RR: rotate right through carry
                let old_c = (self.flags.c as u8) << 7;
                ((val >> 1) | old_c, (val & 1) != 0)
            }
            4 => {
                // SLA: shift left arithmetic
                (val << 1, (val >> 7) != 0)
            }
            5 => {
                // SRA: shift right arithmetic (preserves sign)
                (((val as i8) >> 1) as u8, (val & 1) != 0)
            }
            7 => {
                // SRL: shift right logical
                (val >> 1, (val & 1) != 0)
            }
            _ => unreachable!("rotate/shift selector {}", op),
        }
    }

    /// CB rotate/shift on a register or (HL).
    /// C receives the shifted-out bit, Z tracks the result.
    pub(crate) fn op_cb_rotate_shift(&mut self, op: u8, reg: u8, mem: &mut Memory) {
        let val = if reg == 6 {
            mem[self.get_hl() as usize]
        } else {
            self.get_reg8(reg)
        };
        let (result, carry) = self.do_rotate_shift(op, val);
        self.flags.c = carry;
        self.flags.z = result == 0;
        if reg == 6 {
            mem[self.get_hl() as usize] = result;
        } else {
            self.set_reg8(reg, result);
        }
    }

    /// BIT b,r — Z set when the tested bit is clear; C untouched; nothing
    /// is written back.
    pub(crate) fn op_cb_bit(&mut self, bit: u8, reg: u8, mem: &Memory) {
        let val = if reg == 6 {
            mem[self.get_hl() as usize]
        } else {
            self.get_reg8(reg)
        };
        self.flags.z = (val >> bit) & 1 == 0;
    }

    /// RES/SET b,r — group 2 clears, group 3 sets; no flag changes.
    pub(crate) fn op_cb_res_set(&mut self, group: u8, bit: u8, reg: u8, mem: &mut Memory) {
        let val = if reg == 6 {
            mem[self.get_hl() as usize]
        } else {
            self.get_reg8(reg)
        };
        let result = if group == 2 {
            val & !(1 << bit)
        } else {
            val | (1 << bit)
        };
        if reg == 6 {
            mem[self.get_hl() as usize] = result;
        } else {
            self.set_reg8(reg, result);
        }
    }

    // --- Accumulator rotates ---
    // The one-byte forms touch only C; Z is left alone.

    pub(crate) fn op_rlca(&mut self) {
        let (result, carry) = self.do_rotate_shift(0, self.a);
        self.a = result;
        self.flags.c = carry;
    }

    pub(crate) fn op_rrca(&mut self) {
        let (result, carry) = self.do_rotate_shift(1, self.a);
        self.a = result;
        self.flags.c = carry;
    }

    pub(crate) fn op_rla(&mut self) {
        let (result, carry) = self.do_rotate_shift(2, self.a);
        self.a = result;
        self.flags.c = carry;
    }

    pub(crate) fn op_rra(&mut self) {
        let (result, carry) = self.do_rotate_shift(3, self.a);
        self.a = result;
        self.flags.c = carry;
    }
}
