use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use vipchip::{HostConfig, KeyScript};
use vipchip_common::render::{self, Palette};
use vipchip_common::Color;
use vipchip_core::timing::CYCLES_PER_FRAME;
use vipchip_core::{AluProfile, Config, Display, Fault, DEFAULT_MEMORY_SIZE};

/// Headless COSMAC VIP CHIP-8 runner.
///
/// Runs a program for a number of 60 Hz frames without a window, then
/// optionally prints the screen or dumps it as raw RGB24.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct CommandLineArguments {
    /// Program image to load at 0x200
    rom: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Shift semantics: original (VIP) or modern
    #[arg(short, long, default_value = "modern")]
    profile: AluProfile,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u16>,

    /// Memory size in bytes
    #[arg(long, default_value_t = DEFAULT_MEMORY_SIZE)]
    memory_size: usize,

    /// Fault on 0NNN machine-code calls instead of ignoring them
    #[arg(long)]
    strict: bool,

    /// Do not sound the tone while a key is held during a key wait
    #[arg(long)]
    no_key_tone: bool,

    /// Clock budget per frame
    #[arg(long, default_value_t = CYCLES_PER_FRAME)]
    cycles_per_frame: u32,

    /// Scripted input, e.g. "10=5,12=,40=AF"
    #[arg(short, long)]
    keys: Option<KeyScript>,

    /// Write the final frame as raw RGB24 to this file
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Print the final frame as text
    #[arg(long)]
    ascii: bool,

    /// Color of lit pixels
    #[arg(long, default_value_t = Color::VIP_GREEN)]
    on_color: Color,

    /// Color of dark pixels
    #[arg(long, default_value_t = Color::VIP_BACKGROUND)]
    off_color: Color,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = CommandLineArguments::parse();

    let rom = std::fs::read(&args.rom)
        .with_context(|| format!("failed to read ROM '{}'", args.rom.display()))?;
    log::info!("loaded '{}' ({} bytes)", args.rom.display(), rom.len());

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("RNG seed {seed} (pass --seed {seed} to replay)");

    let config = Config::builder()
        .alu_profile(args.profile)
        .memory_size(args.memory_size)
        .seed(seed)
        .strict(args.strict)
        .key_wait_tone(!args.no_key_tone)
        .build();
    let host = HostConfig::builder()
        .cycles_per_frame(args.cycles_per_frame)
        .frames(args.frames)
        .palette(Palette::new(args.on_color, args.off_color))
        .keys(args.keys.unwrap_or_default())
        .build();

    let session = match vipchip::run(&rom, config, host) {
        Ok(session) => session,
        Err(err) => match err.downcast_ref::<Fault>() {
            Some(fault) if fault.is_load_fault() => {
                eprintln!("Program '{}' rejected: {fault}", args.rom.display());
                std::process::exit(2);
            }
            _ => return Err(err),
        },
    };
    let display = session.interpreter().display();

    if args.ascii {
        print!("{}", render::to_ascii(display, '#', ' '));
    }

    if let Some(path) = &args.dump {
        std::fs::write(path, session.screen())
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        println!(
            "Wrote {} bytes ({}x{} rgb24) after {} frames to '{}'",
            session.screen().len(),
            display.width(),
            display.height(),
            session.frame(),
            path.display()
        );
    }

    if let Some(fault) = session.interpreter().last_error() {
        eprintln!("Interpreter stopped after {} frames: {fault}", session.frame());
        std::process::exit(1);
    }
    Ok(())
}
