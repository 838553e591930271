//! Memory and I/O port storage.
//!
//! Both arrays are owned by the embedder and passed to the CPU by mutable
//! reference on every call; the core never copies them and never retains a
//! reference across calls. The CPU only touches an address or port when an
//! instruction demands it.

/// Linear address space: 64 KiB, addressed by a full `u16`.
pub const MEMORY_SIZE: usize = 0x10000;

/// Port address space: one byte per port, addressed by a full `u8`.
pub const IO_PORTS: usize = 0x100;

pub type Memory = [u8; MEMORY_SIZE];

pub type IoPorts = [u8; IO_PORTS];
