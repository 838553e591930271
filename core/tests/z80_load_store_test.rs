use zed81_core::cpu::{ExecOutcome, Z80};
mod common;
use common::TestMem;

/// Helper: run `n` instructions against the test memory.
fn run(cpu: &mut Z80, m: &mut TestMem, n: u32) -> ExecOutcome {
    cpu.execute_steps(&mut m.memory, &mut m.io, n, None)
}

#[test]
fn test_ld_a_n() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    // LD A, 0x42 (0x3E 0x42)
    m.load(0, &[0x3E, 0x42]);
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.pc, 2);
}

#[test]
fn test_ld_r_r() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x99;
    // LD B, A (0x47), LD C, B (0x48)
    m.load(0, &[0x47, 0x48]);
    run(&mut cpu, &mut m, 2);
    assert_eq!(cpu.b, 0x99);
    assert_eq!(cpu.c, 0x99);
    assert_eq!(cpu.pc, 2);
}

#[test]
fn test_ld_rr_nn() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    // LD BC, 0x1234; LD DE, 0x5678; LD HL, 0x9ABC; LD SP, 0xFFF0
    m.load(
        0,
        &[
            0x01, 0x34, 0x12, 0x11, 0x78, 0x56, 0x21, 0xBC, 0x9A, 0x31, 0xF0, 0xFF,
        ],
    );
    run(&mut cpu, &mut m, 4);
    assert_eq!(cpu.get_bc(), 0x1234);
    assert_eq!(cpu.get_de(), 0x5678);
    assert_eq!(cpu.get_hl(), 0x9ABC);
    assert_eq!(cpu.sp, 0xFFF0);
}

#[test]
fn test_ld_hl_indirect() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    // LD HL, 0x8000; LD (HL), 0x77; LD A, (HL)
    m.load(0, &[0x21, 0x00, 0x80, 0x36, 0x77, 0x7E]);
    run(&mut cpu, &mut m, 3);
    assert_eq!(m.memory[0x8000], 0x77);
    assert_eq!(cpu.a, 0x77);
}

#[test]
fn test_ld_hl_r_and_back() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.set_hl(0x4000);
    cpu.b = 0x5A;
    // LD (HL), B (0x70); LD C, (HL) (0x4E)
    m.load(0, &[0x70, 0x4E]);
    run(&mut cpu, &mut m, 2);
    assert_eq!(m.memory[0x4000], 0x5A);
    assert_eq!(cpu.c, 0x5A);
}

#[test]
fn test_ld_through_bc_de() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0xAB;
    cpu.set_bc(0x2000);
    cpu.set_de(0x2001);
    // LD (BC), A; LD (DE), A; LD A, (BC)
    m.load(0, &[0x02, 0x12, 0x0A]);
    run(&mut cpu, &mut m, 3);
    assert_eq!(m.memory[0x2000], 0xAB);
    assert_eq!(m.memory[0x2001], 0xAB);
    assert_eq!(cpu.a, 0xAB);
}

#[test]
fn test_ld_a_absolute() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    m.memory[0x1234] = 0xA5;
    // LD A, (0x1234); LD (0x4321), A
    m.load(0, &[0x3A, 0x34, 0x12, 0x32, 0x21, 0x43]);
    run(&mut cpu, &mut m, 2);
    assert_eq!(cpu.a, 0xA5);
    assert_eq!(m.memory[0x4321], 0xA5);
}

#[test]
fn test_ld_hl_absolute() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    m.memory[0x5000] = 0xCD;
    m.memory[0x5001] = 0xAB;
    // LD HL, (0x5000); LD (0x5002), HL
    m.load(0, &[0x2A, 0x00, 0x50, 0x22, 0x02, 0x50]);
    run(&mut cpu, &mut m, 2);
    assert_eq!(cpu.get_hl(), 0xABCD);
    // Little-endian: L first
    assert_eq!(m.memory[0x5002], 0xCD);
    assert_eq!(m.memory[0x5003], 0xAB);
}

#[test]
fn test_ex_de_hl() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.set_de(0x1111);
    cpu.set_hl(0x2222);
    m.load(0, &[0xEB]);
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.get_de(), 0x2222);
    assert_eq!(cpu.get_hl(), 0x1111);
}

#[test]
fn test_ex_af_af() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x12;
    cpu.flags.z = true;
    cpu.a_shadow = 0x34;
    cpu.f_shadow.c = true;
    m.load(0, &[0x08]);
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x34);
    assert!(!cpu.flags.z);
    assert!(cpu.flags.c);
    assert_eq!(cpu.a_shadow, 0x12);
    assert!(cpu.f_shadow.z);
    assert!(!cpu.f_shadow.c);
}

#[test]
fn test_ex_sp_hl() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.sp = 0x8000;
    cpu.set_hl(0x1234);
    m.memory[0x8000] = 0x78;
    m.memory[0x8001] = 0x56;
    m.load(0, &[0xE3]);
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.get_hl(), 0x5678);
    assert_eq!(m.memory[0x8000], 0x34);
    assert_eq!(m.memory[0x8001], 0x12);
    assert_eq!(cpu.sp, 0x8000);
}

#[test]
fn test_out_and_in() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x5C;
    // OUT (0x42), A; LD A, 0; IN A, (0x42)
    m.load(0, &[0xD3, 0x42, 0x3E, 0x00, 0xDB, 0x42]);
    run(&mut cpu, &mut m, 3);
    assert_eq!(m.io[0x42], 0x5C);
    assert_eq!(cpu.a, 0x5C);
}

#[test]
fn test_in_reads_embedder_port() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    m.io[0xFE] = 0x1F;
    m.load(0, &[0xDB, 0xFE]);
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x1F);
}
