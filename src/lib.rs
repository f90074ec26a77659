//! dwav - WAV chunk disassembler
//!
//! Parses a WAV file into its RIFF, format, extra and data chunks, reports what it
//! found, and optionally retags the sample rate or reverses the waveform before
//! writing the result to a new file.
//!
//! - `wav`: chunk model, reader, transforms and writer
//! - `io`: file sources and sinks
//! - `report`: text and JSON summaries
//! - `error`: error taxonomy

pub mod error;
pub mod io;
pub mod prelude;
pub mod report;
pub mod wav;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::io::{ByteSink, ByteSource, FileSink, FileSource};
use crate::prelude::*;
pub use crate::wav::SoundFile;
use crate::wav::ReaderOptions;
pub use crate::wav::DEFAULT_MAX_EXTRA_CHUNKS;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct Config {
    /// Cap on chunks between `fmt ` and `data`
    pub max_extra_chunks: usize,
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_extra_chunks: DEFAULT_MAX_EXTRA_CHUNKS,
            verbose: false,
            debug: false,
        }
    }
}

impl From<&Config> for ReaderOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_extra_chunks: config.max_extra_chunks,
        }
    }
}

/// Install a log subscriber when verbose or debug output is requested.
pub fn init(config: &Config) {
    if config.verbose || config.debug {
        let level = if config.debug { "debug" } else { "info" };
        // A second call keeps the subscriber that is already installed
        let _ = tracing_subscriber::fmt()
            .with_env_filter(level)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// One edit to apply to a parsed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Retag the sample rate (and byte rate) without touching samples
    SampleRate(u32),
    /// Reverse sample frame order
    Reverse,
}

impl Transform {
    pub fn apply(&self, sound: &mut SoundFile) -> WavResult<()> {
        match *self {
            Transform::SampleRate(rate) => sound.retag_sample_rate(rate),
            Transform::Reverse => sound.reverse_frames(),
        }
    }
}

/// A file loaded from disk, ready to be reported on, transformed and exported.
pub struct Session {
    pub path: PathBuf,
    sound: SoundFile,
}

impl Session {
    /// Read and parse `input_file`. The raw bytes are dropped before this returns.
    pub fn open<P: AsRef<Path>>(input_file: P, config: &Config) -> WavResult<Self> {
        let path = input_file.as_ref().to_path_buf();
        let sound = Self::load(FileSource::new(&path), config)?;
        Ok(Self { path, sound })
    }

    /// Parse whatever `source` yields.
    pub fn load<S: ByteSource>(mut source: S, config: &Config) -> WavResult<SoundFile> {
        let bytes = source.fetch()?;
        let bytes = bytes.as_ref();
        info!("Bytes Read: {}", bytes.len());
        SoundFile::parse_with(bytes, &ReaderOptions::from(config))
    }

    pub fn sound(&self) -> &SoundFile {
        &self.sound
    }

    pub fn get_filename(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
    }

    /// Apply transforms in order. Stops at the first failure.
    pub fn apply(&mut self, transforms: &[Transform]) -> WavResult<()> {
        for transform in transforms {
            info!("Applying {:?}", transform);
            transform.apply(&mut self.sound)?;
        }
        Ok(())
    }

    pub fn export<P: AsRef<Path>>(&self, output_file: P) -> WavResult<()> {
        self.write(FileSink::new(output_file))
    }

    pub fn write<S: ByteSink>(&self, mut sink: S) -> WavResult<()> {
        sink.store(&self.sound.to_bytes()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_extra_chunks, DEFAULT_MAX_EXTRA_CHUNKS);
        assert!(!config.verbose);
        assert!(!config.debug);
        assert_eq!(ReaderOptions::from(&config).max_extra_chunks, 32);
    }

    #[test]
    fn test_init_quiet_installs_nothing() {
        init(&Config::default());
        assert!(!tracing::enabled!(tracing::Level::ERROR));
    }

    #[test]
    fn test_load_applies_configured_cap() {
        let file = SoundFile::from_parts(
            wav::FormatChunk::pcm(1, 8000, 8),
            vec![
                wav::ExtraChunk::new(*b"JUNK", vec![]).unwrap(),
                wav::ExtraChunk::new(*b"JUNK", vec![]).unwrap(),
            ],
            wav::DataChunk::new(vec![1, 2, 3]).unwrap(),
        )
        .unwrap();
        let bytes = file.to_bytes().unwrap();

        let config = Config {
            max_extra_chunks: 1,
            ..Config::default()
        };
        assert!(matches!(
            Session::load(bytes.as_slice(), &config),
            Err(WavError::TooManyExtraChunks { limit: 1, .. })
        ));
        assert_eq!(Session::load(bytes.as_slice(), &Config::default()).unwrap(), file);
    }

    #[test]
    fn test_transforms_apply_in_order() {
        let file = SoundFile::from_parts(
            wav::FormatChunk::pcm(1, 8000, 16),
            vec![],
            wav::DataChunk::new(vec![1, 0, 2, 0, 3, 0]).unwrap(),
        )
        .unwrap();
        let mut session = Session {
            path: PathBuf::from("memory.wav"),
            sound: file,
        };

        session
            .apply(&[
                Transform::SampleRate(11025),
                Transform::Reverse,
                Transform::SampleRate(22050),
            ])
            .unwrap();
        assert_eq!(session.sound().format().sample_rate(), 22050);
        assert_eq!(session.sound().format().byte_rate(), 44100);
        assert_eq!(session.sound().data().payload(), &[3, 0, 2, 0, 1, 0]);

        let mut out = Vec::new();
        session.write(&mut out).unwrap();
        assert_eq!(SoundFile::parse(&out).unwrap(), *session.sound());
        assert_eq!(session.get_filename(), "memory.wav");
    }
}
