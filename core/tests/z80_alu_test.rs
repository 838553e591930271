use zed81_core::cpu::{ExecOutcome, Z80};
mod common;
use common::TestMem;

fn run(cpu: &mut Z80, m: &mut TestMem, n: u32) -> ExecOutcome {
    cpu.execute_steps(&mut m.memory, &mut m.io, n, None)
}

// =============================================================================
// ADD / ADC
// =============================================================================

#[test]
fn test_add_a_r() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x02;
    cpu.b = 0x03;
    m.load(0, &[0x80]); // ADD A, B
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x05);
    assert!(!cpu.flags.z);
    assert!(!cpu.flags.c);
}

#[test]
fn test_add_carry_out_and_zero() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0xFF;
    m.load(0, &[0xC6, 0x01]); // ADD A, 0x01
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flags.z);
    assert!(cpu.flags.c);
}

#[test]
fn test_add_a_hl() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x10;
    cpu.set_hl(0x3000);
    m.memory[0x3000] = 0x22;
    m.load(0, &[0x86]); // ADD A, (HL)
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x32);
}

#[test]
fn test_adc_a_h_uses_carry() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x02;
    cpu.h = 0x03;
    cpu.flags.c = true;
    m.load(0, &[0x8C]); // ADC A, H
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x06);
    assert!(!cpu.flags.c);
}

#[test]
fn test_adc_a_n_without_carry() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x02;
    m.load(0, &[0xCE, 0x03]); // ADC A, 0x03
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x05);
}

// =============================================================================
// SUB / SBC / CP / NEG
// =============================================================================

#[test]
fn test_sub_borrow_sets_carry() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x01;
    m.load(0, &[0xD6, 0x02]); // SUB 0x02
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0xFF);
    assert!(cpu.flags.c);
    assert!(!cpu.flags.z);
}

#[test]
fn test_sub_to_zero() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x42;
    cpu.e = 0x42;
    m.load(0, &[0x93]); // SUB E
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flags.z);
    assert!(!cpu.flags.c);
}

#[test]
fn test_sbc_a_n_with_borrow_in() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x10;
    cpu.flags.c = true;
    m.load(0, &[0xDE, 0x05]); // SBC A, 0x05
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x0A);
    assert!(!cpu.flags.c);
}

#[test]
fn test_sbc_a_hl() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x05;
    cpu.set_hl(0x3000);
    m.memory[0x3000] = 0x06;
    m.load(0, &[0x9E]); // SBC A, (HL)
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0xFF);
    assert!(cpu.flags.c);
}

#[test]
fn test_cp_sets_flags_only() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x10;
    cpu.b = 0x20;
    m.load(0, &[0xB8]); // CP B
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x10);
    assert_eq!(cpu.b, 0x20);
    assert!(cpu.flags.c); // unsigned A < B
    assert!(!cpu.flags.z);
}

#[test]
fn test_cp_equal() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x33;
    m.load(0, &[0xFE, 0x33]); // CP 0x33
    run(&mut cpu, &mut m, 1);
    assert!(cpu.flags.z);
    assert!(!cpu.flags.c);
}

#[test]
fn test_neg() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x01;
    m.load(0, &[0xED, 0x44]); // NEG
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0xFF);
    assert!(cpu.flags.c);
    assert!(!cpu.flags.z);
}

#[test]
fn test_neg_zero_clears_carry() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x00;
    cpu.flags.c = true;
    m.load(0, &[0xED, 0x44]);
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flags.z);
    assert!(!cpu.flags.c);
}

// =============================================================================
// AND / XOR / OR
// =============================================================================

#[test]
fn test_and_clears_carry() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0xF0;
    cpu.c = 0x0F;
    cpu.flags.c = true;
    m.load(0, &[0xA1]); // AND C
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flags.z);
    assert!(!cpu.flags.c);
}

#[test]
fn test_xor_a_clears_a() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x5A;
    m.load(0, &[0xAF]); // XOR A
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x00);
    assert!(cpu.flags.z);
    assert!(!cpu.flags.c);
}

#[test]
fn test_or_n() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x50;
    m.load(0, &[0xF6, 0x05]); // OR 0x05
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x55);
    assert!(!cpu.flags.z);
}

#[test]
fn test_and_hl() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0xFF;
    cpu.set_hl(0x2000);
    m.memory[0x2000] = 0x3C;
    m.load(0, &[0xA6]); // AND (HL)
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0x3C);
}

// =============================================================================
// INC / DEC
// =============================================================================

#[test]
fn test_inc_r_preserves_carry() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.b = 0xFF;
    cpu.flags.c = true;
    m.load(0, &[0x04]); // INC B
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.b, 0x00);
    assert!(cpu.flags.z);
    assert!(cpu.flags.c); // untouched
}

#[test]
fn test_dec_r_to_zero() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.d = 0x01;
    m.load(0, &[0x15]); // DEC D
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.d, 0x00);
    assert!(cpu.flags.z);
    assert!(!cpu.flags.c);
}

#[test]
fn test_inc_dec_hl_memory() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.set_hl(0x6000);
    m.memory[0x6000] = 0x41;
    m.load(0, &[0x34, 0x35, 0x35]); // INC (HL); DEC (HL); DEC (HL)
    run(&mut cpu, &mut m, 3);
    assert_eq!(m.memory[0x6000], 0x40);
    assert!(!cpu.flags.z);
}

#[test]
fn test_inc_dec_rr_touch_no_flags() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.set_bc(0xFFFF);
    cpu.flags.z = true;
    cpu.flags.c = true;
    m.load(0, &[0x03, 0x1B]); // INC BC; DEC DE
    run(&mut cpu, &mut m, 2);
    assert_eq!(cpu.get_bc(), 0x0000);
    assert_eq!(cpu.get_de(), 0xFFFF);
    assert!(cpu.flags.z);
    assert!(cpu.flags.c);
}

// =============================================================================
// 16-bit add and flag odds and ends
// =============================================================================

#[test]
fn test_add_hl_rr_carry() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.set_hl(0xFFFF);
    cpu.set_bc(0x0001);
    m.load(0, &[0x09]); // ADD HL, BC
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.get_hl(), 0x0000);
    assert!(cpu.flags.c);
    assert!(!cpu.flags.z); // untouched
}

#[test]
fn test_add_hl_sp() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.set_hl(0x1000);
    cpu.sp = 0x0234;
    m.load(0, &[0x39]); // ADD HL, SP
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.get_hl(), 0x1234);
    assert!(!cpu.flags.c);
}

#[test]
fn test_cpl_leaves_flags() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    cpu.a = 0x0F;
    cpu.flags.z = true;
    cpu.flags.c = true;
    m.load(0, &[0x2F]); // CPL
    run(&mut cpu, &mut m, 1);
    assert_eq!(cpu.a, 0xF0);
    assert!(cpu.flags.z);
    assert!(cpu.flags.c);
}

#[test]
fn test_scf_ccf() {
    let mut cpu = Z80::new();
    let mut m = TestMem::new();
    m.load(0, &[0x37, 0x3F, 0x3F]); // SCF; CCF; CCF
    let out = run(&mut cpu, &mut m, 2);
    assert!(!out.registers.flags.c);
    run(&mut cpu, &mut m, 1);
    assert!(cpu.flags.c);
}
