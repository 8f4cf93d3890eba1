// src/bin/blackbox.rs
//! blackbox: generate keys, seal and open source envelopes
//!
//! Decoded source is written out, never run.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use blackbox_envelope::config::{config_path, load_from, try_load_from};
use blackbox_envelope::consts::DEFAULT_LOG_LEVEL;
use blackbox_envelope::{
    generate_key, inspect, key_representations, open_file, read_key_file, seal_file,
    write_key_file, KeyEncoding,
};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "blackbox", version, about = "AES-256-CBC envelopes for source code")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a fresh 256-bit key and store it
    Keygen {
        /// Key file to write (defaults to paths.key_file)
        #[arg(long)]
        out: Option<PathBuf>,
        /// raw, hex or base64 (defaults to keys.encoding)
        #[arg(long)]
        encoding: Option<KeyEncoding>,
        /// Also print the hex form of the key to stdout
        #[arg(long)]
        show: bool,
    },
    /// Encrypt a file into an envelope
    Seal {
        #[arg(long)]
        input: PathBuf,
        /// Envelope file to write (defaults to paths.envelope_file)
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        key: Option<PathBuf>,
        #[arg(long)]
        encoding: Option<KeyEncoding>,
    },
    /// Decrypt an envelope; prints to stdout unless --output is given
    Open {
        /// Envelope file to read (defaults to paths.envelope_file)
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        key: Option<PathBuf>,
        #[arg(long)]
        encoding: Option<KeyEncoding>,
    },
    /// Describe an envelope without decrypting it (JSON)
    Inspect { file: PathBuf },
}

fn main() -> Result<()> {
    // Resolved before logging exists; a broken file is reported once it does
    let config_path = config_path();
    let loaded = try_load_from(&config_path);

    let level = loaded
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |config| config.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // warns with the parse error, now that a subscriber is listening
    let config = loaded.unwrap_or_else(|_| load_from(&config_path));

    let cli = Cli::parse();
    let key_path = |arg: Option<PathBuf>| arg.unwrap_or_else(|| config.paths.key_file.clone());
    let key_encoding = |arg: Option<KeyEncoding>| arg.unwrap_or(config.keys.encoding);

    match cli.command {
        Command::Keygen { out, encoding, show } => {
            let path = key_path(out);
            let encoding = key_encoding(encoding);
            let key = generate_key().context("cannot generate key")?;
            write_key_file(&path, &key, encoding)
                .with_context(|| format!("cannot write key file {}", path.display()))?;
            info!("key written to {} ({encoding}); store it securely", path.display());
            if show {
                println!("{}", key_representations(&key).hex);
            }
        }
        Command::Seal {
            input,
            output,
            key,
            encoding,
        } => {
            let key_file = key_path(key);
            let key = read_key_file(&key_file, key_encoding(encoding))
                .with_context(|| format!("cannot load key from {}", key_file.display()))?;
            let output = output.unwrap_or_else(|| config.paths.envelope_file.clone());
            let size = seal_file(&input, &output, &key)
                .with_context(|| format!("cannot seal {}", input.display()))?;
            info!("sealed {size} bytes to {}", output.display());
        }
        Command::Open {
            input,
            output,
            key,
            encoding,
        } => {
            let key_file = key_path(key);
            let key = read_key_file(&key_file, key_encoding(encoding))
                .with_context(|| format!("cannot load key from {}", key_file.display()))?;
            let input = input.unwrap_or_else(|| config.paths.envelope_file.clone());
            match output {
                Some(output) => {
                    let size = open_file(&input, &output, &key)
                        .with_context(|| format!("cannot open {}", input.display()))?;
                    info!("opened {size} bytes to {}", output.display());
                }
                None => {
                    let envelope = std::fs::read(&input)
                        .with_context(|| format!("cannot read {}", input.display()))?;
                    let plaintext = blackbox_envelope::decode(&envelope, key.expose_secret())
                        .with_context(|| format!("cannot open {}", input.display()))?;
                    std::io::stdout().write_all(&plaintext)?;
                }
            }
        }
        Command::Inspect { file } => {
            let bytes =
                std::fs::read(&file).with_context(|| format!("cannot read {}", file.display()))?;
            let info = inspect(&bytes)
                .with_context(|| format!("{} is not an envelope", file.display()))?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}
