use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::fs::File;
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use coyote_lib::constants::{DEFAULT_MAX_POWER, DEFAULT_POWER_STEP, FRAME_LEN};
use coyote_lib::frame::parse_hex_frame;
use coyote_lib::{
    Characteristic, CoyoteError, DeviceSettings, Playback, Player, PowerConfig, PowerFrame, Transport, WaveformLibrary,
    WaveformStep,
};

/// Encode, decode and inspect DG-LAB Coyote power and waveform frames.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Also write logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a power frame from app-scale levels (0-100).
    Power {
        a: u8,
        b: u8,
        #[arg(long, default_value_t = DEFAULT_POWER_STEP)]
        step: u8,
        #[arg(long, default_value_t = DEFAULT_MAX_POWER)]
        max_power: u16,
    },
    /// Encode a waveform step.
    Wave {
        x: u8,
        y: u16,
        z: u8,
        /// Reject out-of-range parameters instead of saturating them.
        #[arg(long)]
        strict: bool,
    },
    /// Decode a captured frame given as hex.
    Decode {
        kind: FrameKind,
        #[arg(value_name = "HEX")]
        frame: String,
    },
    /// List the built-in waveform presets.
    Presets {
        #[arg(short, long)]
        collection: Option<String>,
    },
    /// Dry-run a playback session, logging every frame instead of sending it.
    Play {
        /// Preset for channel A, as COLLECTION/NAME.
        #[arg(long, default_value = "DGLABS/AudioBase")]
        a: String,
        /// Preset for channel B, as COLLECTION/NAME.
        #[arg(long, default_value = "DGLABS/GrainTouch")]
        b: String,
        #[arg(long, default_value_t = 25)]
        power_a: u8,
        #[arg(long, default_value_t = 25)]
        power_b: u8,
        /// Highest power level allowed for this session.
        #[arg(long, default_value_t = 100)]
        ceiling: u8,
        /// Number of passes; runs until Ctrl+C when omitted.
        #[arg(short, long)]
        cycles: Option<u32>,
        /// Device settings file supplying the power configuration.
        #[arg(short, long)]
        settings: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FrameKind {
    Wave,
    Power,
}

fn setup_logging(log_file_path: Option<PathBuf>, verbosity: &Verbosity<InfoLevel>) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file = File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.clone(), &cli.verbose)?;

    tokio::select! {
        res = run(cli.command) => {
            if let Err(e) = res {
                error!("{:?}", e);
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Ctrl+C received, stopping.");
        }
    }
    Ok(())
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Power { a, b, step, max_power } => {
            let config = PowerConfig::new(step, max_power)?;
            let frame = PowerFrame::encode(a, b, &config);
            println!("{}", hex::encode(frame.to_bytes()));
            info!("{}", frame);
        }
        Command::Wave { x, y, z, strict } => {
            let step = if strict {
                WaveformStep::try_encode(x, y, z)?
            } else {
                WaveformStep::encode(x, y, z)
            };
            println!("{}", hex::encode(step.to_bytes()));
            info!("{}", step);
        }
        Command::Decode { kind, frame } => {
            let bytes = parse_hex_frame(&frame).with_context(|| format!("Could not parse {:?}", frame))?;
            match kind {
                FrameKind::Wave => println!("{}", WaveformStep::decode_from_bytes(&bytes)),
                FrameKind::Power => {
                    let frame = PowerFrame::decode_from_bytes(&bytes);
                    let (a, b) = frame.levels(&PowerConfig::default());
                    println!("{} (levels at default step: A {}, B {})", frame, a, b);
                }
            }
        }
        Command::Presets { collection } => list_presets(collection.as_deref()),
        Command::Play {
            a,
            b,
            power_a,
            power_b,
            ceiling,
            cycles,
            settings,
        } => {
            let config = match settings {
                Some(path) => {
                    let settings = DeviceSettings::load(&path)
                        .with_context(|| format!("Failed to load settings from {:?}", path))?;
                    info!(mac = %settings.mac_address, "Using settings for device");
                    settings.power
                }
                None => PowerConfig::default(),
            };
            let library = WaveformLibrary::builtin();
            let wave_a = library.lookup_path(&a)?;
            let wave_b = library.lookup_path(&b)?;
            let playback = cycles.map_or(Playback::Forever, Playback::Cycles);

            let mut player = Player::new(DryRunTransport::default(), config).with_ceiling(ceiling);
            player.set_power(power_a, power_b).await?;
            let ticks = player.play(Some(wave_a), Some(wave_b), playback).await?;
            info!(
                ticks,
                writes = player.transport().writes,
                "Dry run complete"
            );
        }
    }
    Ok(())
}

fn list_presets(collection: Option<&str>) {
    let library = WaveformLibrary::builtin();
    for preset in library.iter() {
        if collection.is_some_and(|c| c != preset.collection) {
            continue;
        }
        println!("{}", preset);
        for step in &preset.waveform {
            println!("  {}", step);
        }
    }
}

/// Logs frames instead of sending them.
#[derive(Default)]
struct DryRunTransport {
    writes: u64,
}

impl Transport for DryRunTransport {
    async fn write(&mut self, characteristic: Characteristic, frame: [u8; FRAME_LEN]) -> Result<(), CoyoteError> {
        self.writes += 1;
        info!(
            "{:<10} {} <- {}",
            characteristic.to_string(),
            characteristic.uuid(),
            hex::encode(frame)
        );
        Ok(())
    }
}
