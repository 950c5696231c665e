//! Snapdraw CLI — replay a gesture script headlessly and write a PNG.
//!
//! ```text
//! sd-cli render --width 800 --height 600 --background shot.jpg \
//!     --script strokes.json --out annotated.png
//! ```
//!
//! Set `RUST_LOG=debug` to see each composite and gesture.

mod script;

use clap::{Parser, Subcommand};
use sd_core::{EditorConfig, SketchError};
use sd_editor::Session;
use sd_render::codec::{decode_image, encode_png};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error(transparent)]
    Sketch(#[from] SketchError),
}

#[derive(Parser, Debug)]
#[command(name = "sd-cli", about = "Snapdraw headless renderer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a gesture script and export the buffer as PNG.
    Render {
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        /// PNG or JPEG composited before the script runs.
        #[arg(long)]
        background: Option<PathBuf>,
        /// JSON editor configuration.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Render {
            width,
            height,
            background,
            config,
            script,
            out,
        } => {
            let config = match config {
                Some(path) => EditorConfig::from_json(&read_string(&path)?)?,
                None => EditorConfig::default(),
            };
            let mut session = Session::with_config(width, height, config)?;

            if let Some(path) = background {
                let image = decode_image(&read_bytes(&path)?)?;
                session.set_background(image)?;
            }

            let steps = script::parse_script(&read_string(&script)?)?;
            let changed = script::replay(&mut session, &steps)?;
            log::info!("replayed {} steps, {changed} changed the buffer", steps.len());

            let png = encode_png(&session.snapshot_for_export())?;
            fs::write(&out, png).map_err(|source| CliError::Io {
                path: out.clone(),
                source,
            })?;
            log::info!("wrote {}", out.display());
            Ok(())
        }
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_string(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
