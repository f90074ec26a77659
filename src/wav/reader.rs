use super::*;
use tracing::{debug, warn};

/// Upper bound on chunks between `fmt ` and `data` unless configured otherwise.
pub const DEFAULT_MAX_EXTRA_CHUNKS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Parsing fails once more than this many extra chunks have been seen.
    pub max_extra_chunks: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_extra_chunks: DEFAULT_MAX_EXTRA_CHUNKS,
        }
    }
}

/// Bounds-checked little-endian reads over the input buffer.
struct ChunkCursor<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ChunkCursor<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    fn offset(&self) -> usize {
        self.cursor.position() as usize
    }

    fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.offset())
    }

    fn require(&self, needed: usize, chunk: &str) -> WavResult<()> {
        let available = self.remaining();
        if needed > available {
            return Err(WavError::end_of_input(chunk, self.offset(), needed, available));
        }
        Ok(())
    }

    fn peek_tag(&self, chunk: &str) -> WavResult<FourCC> {
        self.require(4, chunk)?;
        let start = self.offset();
        let mut id = [0u8; 4];
        id.copy_from_slice(&self.cursor.get_ref()[start..start + 4]);
        Ok(id)
    }

    fn read_tag(&mut self, chunk: &str) -> WavResult<FourCC> {
        self.require(4, chunk)?;
        let mut id = [0u8; 4];
        self.cursor.read_exact(&mut id)?;
        Ok(id)
    }

    fn read_u16(&mut self, chunk: &str) -> WavResult<u16> {
        self.require(2, chunk)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    fn read_u32(&mut self, chunk: &str) -> WavResult<u32> {
        self.require(4, chunk)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    fn read_bytes(&mut self, len: usize, chunk: &str) -> WavResult<Vec<u8>> {
        self.require(len, chunk)?;
        let mut bytes = vec![0u8; len];
        self.cursor.read_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn rest(&self) -> &'a [u8] {
        let input: &'a [u8] = *self.cursor.get_ref();
        &input[self.offset().min(input.len())..]
    }
}

pub(super) fn parse(input: &[u8], options: &ReaderOptions) -> WavResult<SoundFile> {
    let mut cursor = ChunkCursor::new(input);

    let riff = read_riff_header(&mut cursor)?;
    let format = read_format_chunk(&mut cursor)?;
    let extras = read_extra_chunks(&mut cursor, options.max_extra_chunks)?;
    let data = read_data_chunk(&mut cursor)?;
    let trailer = cursor.rest().to_vec();

    let declared_len = riff.chunk_size as u64 + CHUNK_HEADER_SIZE as u64;
    if declared_len != input.len() as u64 {
        warn!(
            "RIFF size field says {} bytes but the file holds {}",
            declared_len,
            input.len()
        );
    }
    if !trailer.is_empty() {
        debug!("{} trailing bytes after the data chunk", trailer.len());
    }

    Ok(SoundFile {
        riff,
        format,
        extras,
        data,
        trailer,
    })
}

fn read_riff_header(cursor: &mut ChunkCursor) -> WavResult<RiffHeader> {
    cursor.require(HEADER_SIZE, "RIFF header")?;
    let chunk_id = cursor.read_tag("RIFF header")?;
    let chunk_size = cursor.read_u32("RIFF header")?;
    let format = cursor.read_tag("RIFF header")?;

    if &chunk_id != RIFF_CHUNK_ID || &format != WAVE_FORMAT_ID {
        return Err(WavError::MalformedHeader {
            found_id: fourcc_to_string(&chunk_id),
            found_format: fourcc_to_string(&format),
        });
    }

    Ok(RiffHeader {
        chunk_id,
        chunk_size,
        format,
    })
}

fn read_format_chunk(cursor: &mut ChunkCursor) -> WavResult<FormatChunk> {
    let offset = cursor.offset();
    let chunk_id = cursor.read_tag("fmt chunk header")?;
    let chunk_size = cursor.read_u32("fmt chunk header")?;

    if &chunk_id != FMT_CHUNK_ID {
        return Err(WavError::MalformedFormatChunk {
            offset,
            reason: format!(
                "expected tag \"fmt \", found {:?}",
                fourcc_to_string(&chunk_id)
            ),
        });
    }
    if chunk_size < STANDARD_FMT_CHUNK_SIZE {
        return Err(WavError::MalformedFormatChunk {
            offset,
            reason: format!(
                "declared size {} is smaller than the {} byte minimum",
                chunk_size, STANDARD_FMT_CHUNK_SIZE
            ),
        });
    }

    cursor.require(STANDARD_FMT_CHUNK_SIZE as usize, "fmt chunk")?;
    let audio_format = cursor.read_u16("fmt chunk")?;
    let num_channels = cursor.read_u16("fmt chunk")?;
    let sample_rate = cursor.read_u32("fmt chunk")?;
    let byte_rate = cursor.read_u32("fmt chunk")?;
    let block_align = cursor.read_u16("fmt chunk")?;
    let bits_per_sample = cursor.read_u16("fmt chunk")?;

    let extension_len = (chunk_size - STANDARD_FMT_CHUNK_SIZE) as usize;
    let extension = cursor.read_bytes(extension_len, "fmt extension")?;

    debug!(
        "fmt chunk at {}: format {}, {} ch, {} Hz, align {}, {} bits, {} extension bytes",
        offset, audio_format, num_channels, sample_rate, block_align, bits_per_sample, extension_len
    );

    if audio_format != FORMAT_PCM {
        warn!(
            "audio format {} is not plain PCM; sample payload is carried opaquely",
            audio_format
        );
    }
    let expected_align = num_channels as u32 * (bits_per_sample as u32).div_ceil(8);
    if expected_align != block_align as u32 {
        warn!(
            "block align {} disagrees with {} channels x {} bits",
            block_align, num_channels, bits_per_sample
        );
    }

    Ok(FormatChunk {
        audio_format,
        num_channels,
        sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
        extension,
    })
}

fn read_extra_chunks(cursor: &mut ChunkCursor, limit: usize) -> WavResult<Vec<ExtraChunk>> {
    let mut extras = Vec::new();

    while &cursor.peek_tag("chunk tag")? != DATA_CHUNK_ID {
        if extras.len() == limit {
            return Err(WavError::TooManyExtraChunks {
                limit,
                offset: cursor.offset(),
            });
        }

        let offset = cursor.offset();
        let id = cursor.read_tag("chunk tag")?;
        let name = fourcc_to_string(&id);
        let size = cursor.read_u32(&format!("{} chunk header", name))? as usize;
        let payload = cursor.read_bytes(size, &format!("{} chunk", name))?;

        debug!("extra chunk {:?} at {}: {} bytes", name, offset, size);
        extras.push(ExtraChunk { id, payload });
    }

    Ok(extras)
}

fn read_data_chunk(cursor: &mut ChunkCursor) -> WavResult<DataChunk> {
    let offset = cursor.offset();
    cursor.read_tag("data chunk header")?;
    let declared = cursor.read_u32("data chunk header")? as usize;

    let available = cursor.remaining();
    if declared > available {
        return Err(WavError::TruncatedData {
            offset,
            declared,
            available,
        });
    }

    let payload = cursor.read_bytes(declared, "data chunk")?;
    debug!("data chunk at {}: {} bytes", offset, declared);

    Ok(DataChunk { payload })
}
