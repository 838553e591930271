//! CPU state snapshot types.

use std::fmt;

/// Bit positions used when the flag register crosses the stack as a byte
/// (`PUSH AF` / `POP AF`). Only these two bits are architecturally visible;
/// the rest of the byte is pushed as zero and ignored on pop.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum Flag {
    C = 0x01, // Carry
    Z = 0x40, // Zero
}

/// The flag register. Exactly two bits are modeled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    pub z: bool,
    pub c: bool,
}

impl Flags {
    /// Synthesize the stack byte: bit 6 = Z, bit 0 = C, other bits zero.
    pub fn to_byte(self) -> u8 {
        let mut f = 0;
        if self.z {
            f |= Flag::Z as u8;
        }
        if self.c {
            f |= Flag::C as u8;
        }
        f
    }

    /// Read Z and C back out of a stack byte; other bits are ignored.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            z: (byte & Flag::Z as u8) != 0,
            c: (byte & Flag::C as u8) != 0,
        }
    }
}

/// Z80 register-file snapshot.
///
/// `execute_steps` returns a fresh copy of this on every call, and accepts
/// one to overwrite the live state wholesale before stepping.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Registers {
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
    pub a_shadow: u8,     // Shadow accumulator (EX AF,AF' only)
    pub f_shadow: Flags,  // Shadow flags
    pub halted: bool,
}

impl Default for Registers {
    /// Power-on state: everything zeroed except `sp`.
    fn default() -> Self {
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
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "A={:02X} B={:02X} C={:02X} D={:02X} E={:02X} H={:02X} L={:02X}",
            self.a, self.b, self.c, self.d, self.e, self.h, self.l
        )?;
        write!(
            f,
            "PC={:04X} SP={:04X} Z={} C={}{}",
            self.pc,
            self.sp,
            self.flags.z as u8,
            self.flags.c as u8,
            if self.halted { " (halted)" } else { "" }
        )
    }
}
