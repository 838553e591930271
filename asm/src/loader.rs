//! Machine-code loader: assembler output into the embedder's memory.

use zed81_core::mem::Memory;

use crate::assemble::InstructionDetail;

/// Copy each detail's bytes into memory at its start address.
///
/// Addresses wrap mod 2^16. Nothing beyond that is enforced; overlapping
/// regions are the embedder's responsibility.
pub fn load_opcodes_into_memory(memory: &mut Memory, details: &[InstructionDetail]) {
    for detail in details {
        let Some(start) = detail.start_address else {
            continue;
        };
        for (offset, byte) in detail.opcodes.iter().enumerate() {
            let addr = start.wrapping_add(offset as u16);
            memory[addr as usize] = *byte;
        }
    }
}
