use thiserror::Error;

/// Runtime errors surfaced by stepped execution.
///
/// Decode failures are fail-fast: the offending instruction is not counted
/// and the loop returns immediately. `HALT` is not an error.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StepError {
    /// The fetched byte (or the byte following a `CB`/`ED` prefix) is not
    /// part of the implemented instruction set. `address` is where the
    /// instruction started.
    #[error("Unknown opcode: 0x{opcode:02X} at address 0x{address:04X}")]
    UnknownOpcode { opcode: u8, address: u16 },
}
