mod terminal;

use anyhow::Context;
use clap::Parser;
use std::{fs, path::PathBuf};

use chip8vm_core::{Chip8Interpreter, Chip8State, InterpreterConfig, NoKeyboard, NullDisplay};

use crate::terminal::{TerminalDisplay, TerminalKeyboard};

/// Run a CHIP-8 program in the terminal.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Program image, loaded at 0x200
    rom: PathBuf,

    /// Instructions executed per frame
    #[arg(long, default_value_t = 10)]
    cycles_per_frame: u32,

    /// Frames per second; 0 runs unpaced
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for the random instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// No terminal UI; print the final screen instead
    #[arg(long, requires = "frames")]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Warnings would scribble over the terminal screen, so only headless runs
    // show them unless RUST_LOG says otherwise.
    let default_level = if args.headless {
        log::LevelFilter::Warn
    } else {
        log::LevelFilter::Off
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let program = fs::read(&args.rom)
        .with_context(|| format!("could not read ROM {}", args.rom.display()))?;

    let mut state = match args.seed {
        Some(seed) => Chip8State::with_seed(seed),
        None => Chip8State::new(),
    };
    state
        .load_program(&program)
        .with_context(|| format!("could not load ROM {}", args.rom.display()))?;

    let config = InterpreterConfig::with_frame_rate(args.cycles_per_frame, args.fps);

    if args.headless {
        let mut interpreter = Chip8Interpreter::new(config, NullDisplay::default(), NoKeyboard);
        let summary = interpreter.run(&mut state, args.frames)?;
        print!("{}", state.framebuffer);
        println!(
            "{} frames, {} cycles, {} faults",
            summary.frames, summary.cycles, summary.faults
        );
    } else {
        let keyboard = TerminalKeyboard::new()?;
        let display = TerminalDisplay::new()?;
        let mut interpreter = Chip8Interpreter::new(config, display, keyboard);
        interpreter.run(&mut state, args.frames)?;
    }

    Ok(())
}
