//! CLI embedder: assemble a source file, load it, run it, report.
//!
//! This binary owns the 64 KiB memory and the port map; the core borrows
//! them per call. No ports or addresses carry device semantics here.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use colored::Colorize;
use zed81_asm::{Assembly, assemble, load_opcodes_into_memory};
use zed81_core::cpu::Z80;
use zed81_core::mem::{IO_PORTS, MEMORY_SIZE};

/// Assemble a Z80 source file and run it.
#[derive(Parser)]
#[command(name = "zed81", version, about)]
struct Args {
    /// Assembly source file.
    source: PathBuf,

    /// Maximum number of instructions to execute.
    #[arg(long, default_value_t = 1_000_000)]
    steps: u32,

    /// Print an assembly listing (address, bytes, source).
    #[arg(long)]
    listing: bool,

    /// Assemble and load only; skip execution.
    #[arg(long)]
    no_run: bool,

    /// Dump this many bytes of memory from the load address afterwards.
    #[arg(long, default_value_t = 0)]
    dump: u16,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let source = fs::read_to_string(&args.source)
        .with_context(|| format!("reading {}", args.source.display()))?;

    let assembly = assemble(&source);
    if !assembly.success {
        for error in &assembly.errors {
            eprintln!("{} {}", "error:".red().bold(), error);
        }
        bail!("{} error(s), nothing assembled", assembly.errors.len());
    }

    if args.listing {
        print_listing(&source, &assembly);
    }

    let mut memory = Box::new([0u8; MEMORY_SIZE]);
    let mut io = [0u8; IO_PORTS];
    load_opcodes_into_memory(&mut memory, &assembly.details);

    if args.no_run {
        println!(
            "{} byte(s) loaded at 0x{:04X}",
            assembly
                .details
                .iter()
                .map(|d| d.opcodes.len())
                .sum::<usize>(),
            assembly.load_address
        );
        return Ok(());
    }

    let mut cpu = Z80::new();
    cpu.set(assembly.load_address, None);
    let outcome = cpu.execute_steps(&mut memory, &mut io, args.steps, None);

    if let Some(error) = &outcome.error {
        eprintln!("{} {}", "error:".red().bold(), error);
    }
    let status = if outcome.halted {
        "halted"
    } else if outcome.error.is_some() {
        "stopped"
    } else {
        "step budget exhausted"
    };
    println!("{} instruction(s), {}", outcome.instructions_executed, status);
    println!("{}", outcome.registers);

    if args.dump > 0 {
        hexdump(&memory[..], assembly.load_address, args.dump);
    }
    Ok(())
}

fn print_listing(source: &str, assembly: &Assembly) {
    let lines: Vec<&str> = source.lines().collect();
    for detail in &assembly.details {
        let addr = detail
            .start_address
            .map_or_else(|| "    ".to_string(), |a| format!("{a:04X}"));
        let bytes: String = detail
            .opcodes
            .iter()
            .map(|b| format!("{b:02X} "))
            .collect();
        let text = lines
            .get(detail.source_line as usize - 1)
            .copied()
            .unwrap_or("");
        println!("{addr}  {bytes:<12} {text}");
    }
}

fn hexdump(memory: &[u8], start: u16, len: u16) {
    let mut addr = start;
    let mut remaining = len;
    while remaining > 0 {
        let row = remaining.min(16);
        print!("{addr:04X} ");
        for offset in 0..row {
            print!(" {:02X}", memory[addr.wrapping_add(offset) as usize]);
        }
        println!();
        addr = addr.wrapping_add(row);
        remaining -= row;
    }
}
