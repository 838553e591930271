use crate::cpu::Z80;
use crate::mem::Memory;

impl Z80 {
    /// JP nn
    pub(crate) fn op_jp_nn(&mut self, mem: &Memory) {
        self.pc = self.fetch16(mem);
    }

    /// JP cc,nn — the target is fetched whether or not the branch is taken.
    pub(crate) fn op_jp_cc_nn(&mut self, opcode: u8, mem: &Memory) {
        let cc = (opcode >> 3) & 0x03;
        let addr = self.fetch16(mem);
        if self.eval_condition(cc) {
            self.pc = addr;
        }
    }

    /// JP (HL) — PC ← HL; no memory indirection despite the syntax.
    pub(crate) fn op_jp_hl(&mut self) {
        self.pc = self.get_hl();
    }

    /// JR e — displacement is relative to the next instruction.
    pub(crate) fn op_jr_e(&mut self, mem: &Memory) {
        let disp = self.fetch8(mem) as i8;
        self.pc = self.pc.wrapping_add(disp as i16 as u16);
    }

    /// JR cc,e
    pub(crate) fn op_jr_cc_e(&mut self, opcode: u8, mem: &Memory) {
        let cc = (opcode >> 3) & 0x03;
        let disp = self.fetch8(mem) as i8;
        if self.eval_condition(cc) {
            self.pc = self.pc.wrapping_add(disp as i16 as u16);
        }
    }

    /// DJNZ e — B decrements first (mod 256); jump while B ≠ 0.
    pub(crate) fn op_djnz(&mut self, mem: &Memory) {
        self.b = self.b.wrapping_sub(1);
        let disp = self.fetch8(mem) as i8;
        if self.b != 0 {
            self.pc = self.pc.wrapping_add(disp as i16 as u16);
        }
    }

    /// CALL nn — push the address of the following instruction (low byte at
    /// the lower address), then jump.
    pub(crate) fn op_call_nn(&mut self, mem: &mut Memory) {
        let target = self.fetch16(mem);
        self.push16(mem, self.pc);
        self.pc = target;
    }

    /// CALL cc,nn — the target is fetched unconditionally; push-and-jump
    /// only when the condition holds.
    pub(crate) fn op_call_cc_nn(&mut self, opcode: u8, mem: &mut Memory) {
        let cc = (opcode >> 3) & 0x03;
        let target = self.fetch16(mem);
        if self.eval_condition(cc) {
            self.push16(mem, self.pc);
            self.pc = target;
        }
    }

    /// RET
    pub(crate) fn op_ret(&mut self, mem: &Memory) {
        self.pc = self.pop16(mem);
    }

    /// RET cc
    pub(crate) fn op_ret_cc(&mut self, opcode: u8, mem: &Memory) {
        let cc = (opcode >> 3) & 0x03;
        if self.eval_condition(cc) {
            self.pc = self.pop16(mem);
        }
    }
}
