//! dwav - command-line .wav disassembler
//!
//! ```bash
//! # Print the chunk layout
//! dwav -i song.wav
//!
//! # Play back at half speed and reversed
//! dwav -i song.wav --hz 22050 -r -o slow_reversed.wav
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use dwav_lib::prelude::*;
use dwav_lib::{Config, DEFAULT_MAX_EXTRA_CHUNKS, Session, Transform, init, report};
use tracing::info;

const DEFAULT_OUTPUT: &str = "output.wav";
const VALID_EXTENSION: &str = ".wav";

#[derive(Parser, Debug)]
#[command(name = "dwav")]
#[command(about = "Disassemble a .wav file, optionally retag or reverse it", long_about = None)]
#[command(version)]
struct Cli {
    /// File to disassemble
    #[arg(short, long, value_name = "FILE", value_parser = wav_path)]
    input: PathBuf,

    /// Where to write the result (implies writing it)
    #[arg(short, long, value_name = "FILE", value_parser = wav_path)]
    output: Option<PathBuf>,

    /// Write the output even when no transform is requested
    #[arg(short, long)]
    copy: bool,

    /// Retag the sample rate; the waveform is not resampled
    #[arg(long = "hz", value_name = "RATE", value_parser = clap::value_parser!(u32).range(1..))]
    hz: Vec<u32>,

    /// Reverse the sample frames
    #[arg(short, long, action = ArgAction::Count)]
    reverse: u8,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Skip the report
    #[arg(short, long)]
    quiet: bool,

    /// Fail on files with more chunks than this between fmt and data
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_EXTRA_CHUNKS)]
    max_extra_chunks: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    /// Retags never touch samples and reversal never touches the format chunk,
    /// so grouping them this way gives the same file as any interleaving.
    fn transforms(&self) -> Vec<Transform> {
        self.hz
            .iter()
            .map(|rate| Transform::SampleRate(*rate))
            .chain((0..self.reverse).map(|_| Transform::Reverse))
            .collect()
    }

    fn output_path(&self) -> Option<PathBuf> {
        let wants_output = self.copy || self.output.is_some() || !self.transforms().is_empty();
        wants_output.then(|| {
            self.output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
        })
    }
}

fn wav_path(value: &str) -> Result<PathBuf, String> {
    if value.len() > VALID_EXTENSION.len() && value.ends_with(VALID_EXTENSION) {
        Ok(PathBuf::from(value))
    } else {
        Err(format!("filenames must end with '{}'", VALID_EXTENSION))
    }
}

fn main() -> R<()> {
    let cli = Cli::parse();

    let config = Config {
        max_extra_chunks: cli.max_extra_chunks,
        verbose: cli.verbose,
        debug: cli.debug,
    };
    init(&config);

    info!("dwav v{}", dwav_lib::VERSION);

    let mut session = Session::open(&cli.input, &config)
        .with_context(|| format!("Failed to read '{}'", cli.input.display()))?;

    if !cli.quiet {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report::render_json(session.sound()))?);
        } else {
            println!("{}", report::TextReport(session.sound()));
        }
    }

    let Some(output) = cli.output_path() else {
        return Ok(());
    };

    session
        .apply(&cli.transforms())
        .with_context(|| format!("Failed to transform '{}'", session.get_filename()))?;
    session
        .export(&output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    println!("Wrote {}", output.display());
    Ok(())
}
