use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{ensure, Context};
use clap::Parser;
use log::info;

use chip8_core::memory::{MEM_LENGTH, PROGRAM_ADDR};
use chip8_core::{Builder, Diagnostics, Quirks};

mod clock;
mod screen;

use clock::{Clock, Report, Stop};

const DEFAULT_INSTRUCTIONS_PER_SECOND: u64 = 700;
const DEFAULT_CYCLES: u64 = 7_000;
const MAX_PROGRAM_LEN: usize = MEM_LENGTH - PROGRAM_ADDR as usize;

#[doc(hidden)]
#[derive(Parser, Debug)]
#[command(version, about = "Runs a CHIP-8 program headless and prints its screen", long_about = None)]
struct Args {
    #[arg(help = "Path to the ROM file to run")]
    rom_path: PathBuf,

    #[arg(short, long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND, help = "Instructions per second")]
    ips: u64,

    #[arg(short, long, default_value_t = DEFAULT_CYCLES, help = "Number of instructions to execute")]
    cycles: u64,

    #[arg(short, long, help = "Seed for the random generator, taken from the clock when absent")]
    seed: Option<u64>,

    #[arg(short, long, help = "Pace execution to wall clock time")]
    realtime: bool,

    #[arg(long, default_value_t = 1, help = "Characters per pixel in the printed screen")]
    scale: usize,

    #[arg(long, help = "Leave I unchanged after FX55/FX65")]
    keep_i: bool,
}

fn summary(report: &Report, diag: &Diagnostics) -> String {
    let mut out = format!(
        "cycles: {}, timer ticks: {}, stopped: {}\n",
        report.cycles,
        report.timer_ticks,
        match report.stop {
            Stop::Budget => "cycle budget spent",
            Stop::WaitingForKey => "waiting for key",
        }
    );
    out += &format!(
        "unknown opcodes: {}, stack wraps: {}, sound: {}\n",
        diag.unknown_opcodes,
        diag.stack_wraps,
        if diag.sound { "on" } else { "off" }
    );
    for (addr, raw) in diag.first_unknown.iter() {
        out += &format!("  {:#05X}: {:#06X}\n", addr, raw);
    }
    out
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.ips > 0, "instructions per second must be positive");
    ensure!(args.scale > 0, "scale must be positive");

    let rom = fs::read(&args.rom_path)
        .with_context(|| format!("failed reading ROM {}", args.rom_path.display()))?;
    ensure!(
        rom.len() <= MAX_PROGRAM_LEN,
        "ROM is {} bytes, at most {} fit in memory",
        rom.len(),
        MAX_PROGRAM_LEN
    );

    let seed = match args.seed {
        Some(seed) => seed as u128,
        None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos(),
    };
    info!("random seed {}", seed);

    let mut machine = Builder::new()
        .with_hooks(Diagnostics::new())
        .with_seed(seed)
        .with_program(&rom)
        .with_quirks(Quirks {
            load_store_increments_i: !args.keep_i,
        })
        .build()
        .map_err(anyhow::Error::msg)?;

    let report = Clock::new(args.ips, args.realtime).run(&mut machine, args.cycles);

    print!("{}", screen::render(machine.frame(), args.scale));
    print!("{}", summary(&report, machine.hooks()));
    Ok(())
}
