use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use myspeaker::catalog::eq_presets::{all_presets, FIRMWARE_PRESETS};
use myspeaker::catalog::{color_by_name, GradientType, LedEffect, SoundType};
use myspeaker::config::AppConfig;
use myspeaker::device::{ControlFlags, FullStatus, LedState, Rgb};
use myspeaker::protocol::message::hex;
use myspeaker::protocol::transfer::{chunk_count, chunk_frames};
use myspeaker::protocol::{decode_frame, Command, TransferKind};
use myspeaker::session::{ChannelTransport, Session, VirtualSpeaker};

#[derive(Parser)]
#[command(name = "myspeaker", about = "Frame tools for MySpeaker BLE speakers")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the bytes of a command frame as hex
    Encode {
        #[command(subcommand)]
        command: EncodeCmd,
    },
    /// Decode a notification given as hex
    Decode {
        hex: String,
        /// Print JSON instead of debug output
        #[arg(long)]
        json: bool,
    },
    /// Print every frame of an upload of FILE
    Chunk {
        #[arg(value_enum)]
        target: Target,
        file: std::path::PathBuf,
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// Upload FILE to a virtual speaker and report progress
    Simulate {
        #[arg(value_enum)]
        target: Target,
        file: std::path::PathBuf,
        #[arg(long)]
        chunk_size: Option<usize>,
    },
    /// List EQ presets
    Presets,
    /// List LED effects
    Effects,
    /// Show or update the config file
    Config {
        #[command(subcommand)]
        command: ConfigCmd,
    },
}

#[derive(Subcommand)]
enum EncodeCmd {
    #[command(allow_negative_numbers = true)]
    Eq { bass: i32, mid: i32, treble: i32 },
    Preset { id: u8 },
    Control {
        #[arg(long)]
        bass_boost: bool,
        #[arg(long)]
        bypass_dsp: bool,
        #[arg(long)]
        channel_flip: bool,
        #[arg(long)]
        tws_master: bool,
        #[arg(long)]
        tws_slave: bool,
        #[arg(long)]
        mute: bool,
    },
    Name { name: String },
    Led {
        effect: u8,
        #[arg(long, default_value_t = 50)]
        brightness: i32,
        #[arg(long, default_value_t = 50)]
        speed: i32,
        /// Color name or RRGGBB
        #[arg(long, default_value = "white")]
        primary: String,
        #[arg(long, default_value = "blue")]
        secondary: String,
        #[arg(long, default_value_t = 0)]
        gradient: u8,
    },
    Effect { id: u8 },
    Brightness { value: i32 },
    Mute {
        #[arg(action = clap::ArgAction::Set)]
        on: bool,
    },
    DeleteSound {
        /// startup, pairing, connected or max-volume
        sound: SoundType,
    },
    Status,
    Ping,
}

#[derive(Subcommand)]
enum ConfigCmd {
    Show,
    Save {
        #[arg(long)]
        device_address: Option<String>,
        #[arg(long)]
        device_name: Option<String>,
        #[arg(long)]
        chunk_size: Option<usize>,
        #[arg(long)]
        json_output: Option<bool>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Firmware,
    Startup,
    Pairing,
    Connected,
    MaxVolume,
}

impl From<Target> for TransferKind {
    fn from(target: Target) -> Self {
        match target {
            Target::Firmware => Self::Ota,
            Target::Startup => Self::Sound(SoundType::Startup),
            Target::Pairing => Self::Sound(SoundType::Pairing),
            Target::Connected => Self::Sound(SoundType::Connected),
            Target::MaxVolume => Self::Sound(SoundType::MaxVolume),
        }
    }
}

fn parse_color(s: &str) -> Result<Rgb> {
    if let Some(rgb) = color_by_name(s) {
        return Ok(rgb);
    }
    match hex::decode(s.trim_start_matches('#')).as_deref() {
        Some(&[r, g, b]) => Ok(Rgb::new(r, g, b)),
        _ => bail!("Invalid color '{}': use a preset name or RRGGBB", s),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for frame output
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("myspeaker=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load();

    match cli.command {
        Cmd::Encode { command } => {
            let command = encode_command(command)?;
            println!("{}", hex::encode(&command.encode()));
        }
        Cmd::Decode { hex: input, json } => {
            let bytes = hex::decode(&input).context("Invalid hex input")?;
            let response = decode_frame(&bytes)?;
            if json || config.json_output {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{:#?}", response);
            }
        }
        Cmd::Chunk {
            target,
            file,
            chunk_size,
        } => {
            let kind = TransferKind::from(target);
            let chunk_size = chunk_size.unwrap_or(config.chunk_size);
            let data = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let size = u32::try_from(data.len())
                .ok()
                .filter(|&s| s <= kind.max_size())
                .with_context(|| format!("{} is too large for a {} upload", file.display(), kind))?;
            info!(
                "{} frames for {} bytes",
                chunk_count(data.len(), chunk_size) + 2,
                size
            );
            println!("{}", hex::encode(&kind.begin(size)));
            for frame in chunk_frames(kind, &data, chunk_size) {
                println!("{}", hex::encode(&frame));
            }
            println!("{}", hex::encode(&kind.end()));
        }
        Cmd::Simulate {
            target,
            file,
            chunk_size,
        } => {
            let data = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let chunk_size = chunk_size.unwrap_or(config.chunk_size);
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(simulate(target.into(), &data, chunk_size))?;
        }
        Cmd::Presets => {
            println!("Firmware presets:");
            for (id, (name, [b, m, t])) in FIRMWARE_PRESETS.iter().enumerate() {
                println!("  {:>2}  {:<14} {:+3} {:+3} {:+3}", id, name, b, m, t);
            }
            println!("App presets:");
            for preset in all_presets() {
                println!(
                    "  {:>2}  {} {:<14} {}",
                    preset.id, preset.icon, preset.name, preset.description
                );
            }
        }
        Cmd::Effects => {
            for effect in LedEffect::user_effects() {
                println!(
                    "  {:>3}  {} {}",
                    effect.id(),
                    effect.emoji(),
                    effect.display_name()
                );
            }
        }
        Cmd::Config { command } => match command {
            ConfigCmd::Show => {
                println!("# {}", AppConfig::path().display());
                print!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCmd::Save {
                device_address,
                device_name,
                chunk_size,
                json_output,
            } => {
                let mut config = config;
                if device_address.is_some() {
                    config.device_address = device_address;
                }
                if device_name.is_some() {
                    config.device_name = device_name;
                }
                if let Some(size) = chunk_size {
                    if size == 0 {
                        bail!("chunk_size must be at least 1");
                    }
                    config.chunk_size = size;
                }
                if let Some(json) = json_output {
                    config.json_output = json;
                }
                config.save()?;
            }
        },
    }

    Ok(())
}

fn encode_command(command: EncodeCmd) -> Result<Command> {
    Ok(match command {
        EncodeCmd::Eq { bass, mid, treble } => {
            Command::SetEq(myspeaker::device::EqSettings::from_ints(bass, mid, treble))
        }
        EncodeCmd::Preset { id } => Command::SetEqPreset(id),
        EncodeCmd::Control {
            bass_boost,
            bypass_dsp,
            channel_flip,
            tws_master,
            tws_slave,
            mute,
        } => Command::SetControl(
            ControlFlags {
                bass_boost,
                bypass_dsp,
                channel_flip,
                tws_master,
                tws_slave,
                mute,
            }
            .build(),
        ),
        EncodeCmd::Name { name } => Command::SetName(name),
        EncodeCmd::Led {
            effect,
            brightness,
            speed,
            primary,
            secondary,
            gradient,
        } => Command::SetLed(LedState::new(
            effect,
            brightness,
            speed,
            parse_color(&primary)?,
            parse_color(&secondary)?,
            GradientType::from_id(gradient).id(),
        )),
        EncodeCmd::Effect { id } => Command::SetLedEffect(id),
        EncodeCmd::Brightness { value } => Command::SetLedBrightness(value),
        EncodeCmd::Mute { on } => Command::SoundMute(on),
        EncodeCmd::DeleteSound { sound } => Command::SoundDelete(sound),
        EncodeCmd::Status => Command::RequestStatus,
        EncodeCmd::Ping => Command::Ping,
    })
}

async fn simulate(kind: TransferKind, data: &[u8], chunk_size: usize) -> Result<()> {
    let (phone, device) = ChannelTransport::pair(32);
    let speaker = VirtualSpeaker::new(FullStatus {
        device_name: "Virtual Speaker".into(),
        firmware_version: env!("CARGO_PKG_VERSION").into(),
        ..Default::default()
    });
    let handle = tokio::spawn(speaker.run(device));

    let mut session = Session::new(phone);
    let status = session.request_status().await?;
    info!(
        "Connected to {} (firmware {})",
        status.device_name, status.firmware_version
    );

    session
        .upload(kind, data, chunk_size, |p| {
            eprint!(
                "\r{}/{} chunks, device at {}%",
                p.chunks_sent,
                p.chunks_total,
                p.device_percent.unwrap_or(0)
            );
        })
        .await?;
    eprintln!();

    drop(session);
    let speaker = handle.await?;
    let received = speaker.uploads.last().map(|u| u.data.len()).unwrap_or(0);
    println!("Speaker received {} of {} bytes", received, data.len());
    Ok(())
}
