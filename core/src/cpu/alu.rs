use crate::cpu::Z80;
use crate::mem::Memory;

impl Z80 {
    // --- Flag Helpers ---

    /// Commit an 8-bit arithmetic result computed in signed space.
    /// Z from the masked byte; C when the unmasked result left 0..=255.
    fn commit_arith(&mut self, result: i32) -> u8 {
        let masked = (result & 0xFF) as u8;
        self.flags.z = masked == 0;
        self.flags.c = result > 0xFF || result < 0;
        masked
    }

    fn do_add(&mut self, val: u8, carry_in: bool) {
        let c = (carry_in && self.flags.c) as i32;
        let result = self.a as i32 + val as i32 + c;
        self.a = self.commit_arith(result);
    }

    fn do_sub(&mut self, val: u8, carry_in: bool) {
        let c = (carry_in && self.flags.c) as i32;
        let result = self.a as i32 - val as i32 - c;
        self.a = self.commit_arith(result);
    }

    /// CP leaves A alone: Z on equality, C on unsigned A < operand.
    fn do_cp(&mut self, val: u8) {
        self.flags.z = self.a == val;
        self.flags.c = self.a < val;
    }

    /// AND/XOR/OR: Z from the result, C cleared.
    fn do_logic(&mut self, result: u8) {
        self.a = result;
        self.flags.z = result == 0;
        self.flags.c = false;
    }

    fn perform_alu_op(&mut self, op: u8, val: u8) {
        match op {
            0 => self.do_add(val, false),     // ADD
            1 => self.do_add(val, true),      // ADC
            2 => self.do_sub(val, false),     // SUB
            3 => self.do_sub(val, true),      // SBC
            4 => self.do_logic(self.a & val), // AND
            5 => self.do_logic(self.a ^ val), // XOR
            6 => self.do_logic(self.a | val), // OR
            7 => self.do_cp(val),             // CP
            _ => unreachable!(),
        }
    }

    // --- Instructions ---

    /// ALU A, r
    /// ADD, ADC, SUB, SBC, AND, XOR, OR, CP
    /// Opcode mask: 10 xxx zzz; z=6 is (HL).
    pub(crate) fn op_alu_r(&mut self, opcode: u8, mem: &Memory) {
        let alu_op = (opcode >> 3) & 0x07;
        let r = opcode & 0x07;
        let val = if r == 6 {
            mem[self.get_hl() as usize]
        } else {
            self.get_reg8(r)
        };
        self.perform_alu_op(alu_op, val);
    }

    /// ALU A, n
    /// Opcode mask: 11 xxx 110
    pub(crate) fn op_alu_n(&mut self, opcode: u8, mem: &Memory) {
        let alu_op = (opcode >> 3) & 0x07;
        let val = self.fetch8(mem);
        self.perform_alu_op(alu_op, val);
    }

    /// INC/DEC r
    /// Opcode mask: 00 rrr 10x; r=6 is a read-modify-write on (HL).
    /// Z only; C is untouched.
    pub(crate) fn op_inc_dec_r(&mut self, opcode: u8, mem: &mut Memory) {
        let r = (opcode >> 3) & 0x07;
        let is_dec = (opcode & 0x01) != 0;
        let val = if r == 6 {
            mem[self.get_hl() as usize]
        } else {
            self.get_reg8(r)
        };
        let result = if is_dec {
            val.wrapping_sub(1)
        } else {
            val.wrapping_add(1)
        };
        self.flags.z = result == 0;
        if r == 6 {
            mem[self.get_hl() as usize] = result;
        } else {
            self.set_reg8(r, result);
        }
    }

    /// ADD HL,rr — C from the 17th bit; Z untouched.
    /// Opcode mask: 00 rr1 001
    pub(crate) fn op_add_hl_rr(&mut self, opcode: u8) {
        let rp = (opcode >> 4) & 0x03;
        let sum = self.get_hl() as u32 + self.get_rp(rp) as u32;
        self.flags.c = sum > 0xFFFF;
        self.set_hl(sum as u16);
    }

    /// INC/DEC rr — no flags.
    /// Opcode mask: 00 rrx 011
    pub(crate) fn op_inc_dec_rr(&mut self, opcode: u8) {
        let rp = (opcode >> 4) & 0x03;
        let is_dec = (opcode & 0x08) != 0;
        let val = self.get_rp(rp);
        let result = if is_dec {
            val.wrapping_sub(1)
        } else {
            val.wrapping_add(1)
        };
        self.set_rp(rp, result);
    }

    /// NEG (ED 44) — A ← 0 - A.
    pub(crate) fn op_neg(&mut self) {
        let result = -(self.a as i32);
        self.a = self.commit_arith(result);
    }

    /// CPL — complement A; no flag changes.
    pub(crate) fn op_cpl(&mut self) {
        self.a = !self.a;
    }

    pub(crate) fn op_scf(&mut self) {
        self.flags.c = true;
    }

    pub(crate) fn op_ccf(&mut self) {
        self.flags.c = !self.flags.c;
    }
}
