//! In-memory model of a WAV file, chunk by chunk.
//!
//! A [`SoundFile`] is built once by [`SoundFile::parse`], edited in place by the
//! transforms ([`SoundFile::retag_sample_rate`], [`SoundFile::reverse_frames`]), and turned
//! back into bytes by [`SoundFile::to_bytes`].
//! Fields are only reachable through accessors so reports can't mutate anything.

use crate::prelude::*;

mod reader;
mod transform;
mod writer;

pub use reader::{DEFAULT_MAX_EXTRA_CHUNKS, ReaderOptions};

/// Four-character chunk tag, compared byte for byte.
pub type FourCC = [u8; 4];

// Chunk Identifiers
pub const RIFF_CHUNK_ID: &FourCC = b"RIFF";
pub const WAVE_FORMAT_ID: &FourCC = b"WAVE";
pub const FMT_CHUNK_ID: &FourCC = b"fmt ";
pub const DATA_CHUNK_ID: &FourCC = b"data";

// Chunk Structures
pub const HEADER_SIZE: usize = 12; // RIFF + size + WAVE
pub const CHUNK_HEADER_SIZE: usize = 8; // tag + size
pub const STANDARD_FMT_CHUNK_SIZE: u32 = 16;

// Format tags
pub const FORMAT_PCM: u16 = 1;
pub const FORMAT_IEEE_FLOAT: u16 = 3;
pub const FORMAT_EXTENSIBLE: u16 = 65534; // 0xFFFE

/// Printable form of a tag. Non-ASCII bytes are escaped rather than dropped.
pub fn fourcc_to_string(id: &FourCC) -> String {
    id.iter()
        .flat_map(|b| std::ascii::escape_default(*b))
        .map(char::from)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiffHeader {
    chunk_id: FourCC,
    chunk_size: u32,
    format: FourCC,
}

impl RiffHeader {
    pub fn chunk_id(&self) -> &FourCC {
        &self.chunk_id
    }

    /// Size field as it was read. The writer recomputes it, see [`SoundFile::riff_size`].
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn format(&self) -> &FourCC {
        &self.format
    }
}

/// The `fmt ` chunk: 16 bytes of fixed fields plus an optional opaque extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatChunk {
    audio_format: u16,
    num_channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
    extension: Vec<u8>,
}

impl FormatChunk {
    /// Plain PCM layout with consistent byte rate and block alignment.
    pub fn pcm(num_channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = num_channels.saturating_mul(bits_per_sample.div_ceil(8));
        Self {
            audio_format: FORMAT_PCM,
            num_channels,
            sample_rate,
            byte_rate: sample_rate.saturating_mul(block_align as u32),
            block_align,
            bits_per_sample,
            extension: Vec::new(),
        }
    }

    /// Attach opaque extension bytes after the 16-byte core.
    pub fn with_extension(mut self, extension: Vec<u8>) -> Self {
        self.extension = extension;
        self
    }

    pub fn chunk_id(&self) -> &FourCC {
        FMT_CHUNK_ID
    }

    pub fn chunk_size(&self) -> u32 {
        STANDARD_FMT_CHUNK_SIZE + self.extension.len() as u32
    }

    pub fn audio_format(&self) -> u16 {
        self.audio_format
    }

    pub fn audio_format_name(&self) -> &'static str {
        match self.audio_format {
            FORMAT_PCM => "PCM",
            FORMAT_IEEE_FLOAT => "IEEE float",
            FORMAT_EXTENSIBLE => "extensible",
            _ => "other",
        }
    }

    pub fn num_channels(&self) -> u16 {
        self.num_channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn byte_rate(&self) -> u32 {
        self.byte_rate
    }

    /// Bytes per sample frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.block_align
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn extension(&self) -> &[u8] {
        &self.extension
    }

    pub fn has_extension(&self) -> bool {
        !self.extension.is_empty()
    }
}

/// A vendor chunk between `fmt ` and `data`, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraChunk {
    id: FourCC,
    payload: Vec<u8>,
}

impl ExtraChunk {
    pub fn new(id: FourCC, payload: Vec<u8>) -> WavResult<Self> {
        if &id == DATA_CHUNK_ID {
            return Err(WavError::invalid_parameter(
                "an extra chunk cannot be tagged \"data\"",
            ));
        }
        if u32::try_from(payload.len()).is_err() {
            return Err(WavError::invalid_parameter(format!(
                "extra chunk {} payload of {} bytes exceeds the 32-bit size field",
                fourcc_to_string(&id),
                payload.len()
            )));
        }
        Ok(Self { id, payload })
    }

    pub fn id(&self) -> &FourCC {
        &self.id
    }

    pub fn size(&self) -> u32 {
        self.payload.len() as u32
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChunk {
    payload: Vec<u8>,
}

impl DataChunk {
    pub fn new(payload: Vec<u8>) -> WavResult<Self> {
        if u32::try_from(payload.len()).is_err() {
            return Err(WavError::invalid_parameter(format!(
                "data payload of {} bytes exceeds the 32-bit size field",
                payload.len()
            )));
        }
        Ok(Self { payload })
    }

    pub fn chunk_id(&self) -> &FourCC {
        DATA_CHUNK_ID
    }

    pub fn size(&self) -> u32 {
        self.payload.len() as u32
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// One parsed WAV file. Owns every chunk; nothing borrows from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundFile {
    riff: RiffHeader,
    format: FormatChunk,
    extras: Vec<ExtraChunk>,
    data: DataChunk,
    trailer: Vec<u8>,
}

impl SoundFile {
    /// Assemble a file from already-built chunks. The RIFF size is derived from them.
    pub fn from_parts(
        format: FormatChunk,
        extras: Vec<ExtraChunk>,
        data: DataChunk,
    ) -> WavResult<Self> {
        let mut file = Self {
            riff: RiffHeader {
                chunk_id: *RIFF_CHUNK_ID,
                chunk_size: 0,
                format: *WAVE_FORMAT_ID,
            },
            format,
            extras,
            data,
            trailer: Vec::new(),
        };
        file.riff.chunk_size = file.riff_size()?;
        Ok(file)
    }

    /// Parse with the default reader options.
    pub fn parse(bytes: &[u8]) -> WavResult<Self> {
        Self::parse_with(bytes, &ReaderOptions::default())
    }

    pub fn parse_with(bytes: &[u8], options: &ReaderOptions) -> WavResult<Self> {
        reader::parse(bytes, options)
    }

    pub fn riff(&self) -> &RiffHeader {
        &self.riff
    }

    pub fn format(&self) -> &FormatChunk {
        &self.format
    }

    pub fn extras(&self) -> &[ExtraChunk] {
        &self.extras
    }

    pub fn data(&self) -> &DataChunk {
        &self.data
    }

    /// Bytes that followed the data payload in the source file.
    pub fn trailer(&self) -> &[u8] {
        &self.trailer
    }

    /// Number of whole sample frames, or `None` when block align is zero.
    pub fn frame_count(&self) -> Option<usize> {
        match self.format.block_align {
            0 => None,
            align => Some(self.data.payload.len() / align as usize),
        }
    }

    /// Playback length at the tagged sample rate.
    pub fn duration_secs(&self) -> Option<f64> {
        let frames = self.frame_count()?;
        match self.format.sample_rate {
            0 => None,
            rate => Some(frames as f64 / rate as f64),
        }
    }

    /// Size of everything after the RIFF size field.
    fn body_len(&self) -> usize {
        WAVE_FORMAT_ID.len()
            + CHUNK_HEADER_SIZE
            + self.format.chunk_size() as usize
            + self
                .extras
                .iter()
                .map(|chunk| CHUNK_HEADER_SIZE + chunk.payload.len())
                .sum::<usize>()
            + CHUNK_HEADER_SIZE
            + self.data.payload.len()
            + self.trailer.len()
    }

    /// RIFF size field the writer will emit for the current contents.
    pub fn riff_size(&self) -> WavResult<u32> {
        riff_size_field(self.body_len())
    }
}

fn riff_size_field(body_len: usize) -> WavResult<u32> {
    u32::try_from(body_len).map_err(|_| {
        WavError::invalid_parameter(format!(
            "{} bytes of chunks exceed the 32-bit RIFF size field",
            body_len
        ))
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_display_escapes_binary() {
        assert_eq!(fourcc_to_string(b"fmt "), "fmt ");
        assert_eq!(fourcc_to_string(&[b'a', 0, b'b', 0xff]), "a\\x00b\\xff");
    }

    #[test]
    fn test_pcm_format_is_consistent() {
        let fmt = FormatChunk::pcm(2, 48000, 24);
        assert_eq!(fmt.block_align(), 6);
        assert_eq!(fmt.byte_rate(), 288000);
        assert_eq!(fmt.chunk_size(), 16);
        assert!(!fmt.has_extension());

        let fmt = fmt.with_extension(vec![0, 0]);
        assert_eq!(fmt.chunk_size(), 18);
    }

    #[test]
    fn test_extra_chunk_rejects_data_tag() {
        assert!(ExtraChunk::new(*b"data", vec![]).is_err());
        assert!(ExtraChunk::new(*b"DATA", vec![1]).is_ok());
    }

    #[test]
    fn test_from_parts_computes_riff_size() {
        let file = SoundFile::from_parts(
            FormatChunk::pcm(1, 8000, 8),
            vec![ExtraChunk::new(*b"LIST", vec![1, 2, 3]).unwrap()],
            DataChunk::new(vec![0; 10]).unwrap(),
        )
        .unwrap();
        // WAVE + fmt(8+16) + LIST(8+3) + data(8+10)
        assert_eq!(file.riff().chunk_size(), 4 + 24 + 11 + 18);
        assert_eq!(file.riff_size().unwrap(), file.riff().chunk_size());
        assert_eq!(file.frame_count(), Some(10));
        assert_eq!(file.duration_secs(), Some(10.0 / 8000.0));
    }

    #[test]
    fn test_riff_size_field_limit() {
        assert_eq!(riff_size_field(0xFFFF_FFFF).unwrap(), u32::MAX);
        assert!(matches!(
            riff_size_field(0x1_0000_0000),
            Err(WavError::InvalidParameter(_))
        ));
        assert!(riff_size_field(usize::MAX).is_err());
    }

    #[test]
    fn test_frame_count_with_zero_block_align() {
        let bytes = fixtures::WavBuilder {
            block_align: 0,
            ..Default::default()
        }
        .build();
        let file = SoundFile::parse(&bytes).unwrap();
        assert_eq!(file.frame_count(), None);
        assert_eq!(file.duration_secs(), None);
    }
}
