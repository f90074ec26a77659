use super::*;
use tracing::debug;

impl SoundFile {
    /// Serialize every chunk in stored order.
    ///
    /// The RIFF size field is recomputed from the chunks, everything else is written as
    /// held. With no transform applied the output equals the parsed input byte for byte.
    /// Fails when the chunks no longer fit the 32-bit RIFF size field.
    pub fn to_bytes(&self) -> WavResult<Vec<u8>> {
        let riff_size = self.riff_size()?;
        let mut output = Vec::with_capacity(riff_size as usize + CHUNK_HEADER_SIZE);
        self.write_to(&mut output)?;

        debug!(
            "serialized {} bytes ({} extra chunks, {} trailing)",
            output.len(),
            self.extras.len(),
            self.trailer.len()
        );
        Ok(output)
    }

    /// Stream the serialized file into any writer.
    pub fn write_to<W: Write>(&self, output: &mut W) -> WavResult<()> {
        let riff_size = self.riff_size()?;
        output.write_all(&self.riff.chunk_id)?;
        output.write_u32::<LittleEndian>(riff_size)?;
        output.write_all(&self.riff.format)?;

        write_format_chunk(output, &self.format)?;

        for chunk in &self.extras {
            write_chunk(output, &chunk.id, &chunk.payload)?;
        }

        write_chunk(output, DATA_CHUNK_ID, &self.data.payload)?;
        output.write_all(&self.trailer)?;
        Ok(())
    }
}

fn write_format_chunk<W: Write>(output: &mut W, format: &FormatChunk) -> WavResult<()> {
    output.write_all(FMT_CHUNK_ID)?;
    output.write_u32::<LittleEndian>(format.chunk_size())?;
    output.write_u16::<LittleEndian>(format.audio_format)?;
    output.write_u16::<LittleEndian>(format.num_channels)?;
    output.write_u32::<LittleEndian>(format.sample_rate)?;
    output.write_u32::<LittleEndian>(format.byte_rate)?;
    output.write_u16::<LittleEndian>(format.block_align)?;
    output.write_u16::<LittleEndian>(format.bits_per_sample)?;
    output.write_all(&format.extension)?;
    Ok(())
}

/// Tag, size and payload. No pad byte: chunks sit back to back as they were read.
fn write_chunk<W: Write>(writer: &mut W, id: &FourCC, data: &[u8]) -> WavResult<()> {
    writer.write_all(id)?;
    writer.write_u32::<LittleEndian>(data.len() as u32)?;
    writer.write_all(data)?;
    Ok(())
}
