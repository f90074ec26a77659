use super::*;
use tracing::debug;

impl SoundFile {
    /// Change the tagged sample rate and the byte rate derived from it.
    ///
    /// Only the format chunk changes. The waveform is untouched, so the file simply
    /// plays faster or slower.
    pub fn retag_sample_rate(&mut self, new_rate: u32) -> WavResult<()> {
        if new_rate == 0 {
            return Err(WavError::invalid_parameter(
                "sample rate must be a positive integer, got 0",
            ));
        }
        let byte_rate = new_rate
            .checked_mul(self.format.block_align as u32)
            .ok_or_else(|| {
                WavError::invalid_parameter(format!(
                    "sample rate {} x block align {} overflows the byte rate field",
                    new_rate, self.format.block_align
                ))
            })?;

        debug!(
            "retag {} Hz -> {} Hz, byte rate {} -> {}",
            self.format.sample_rate, new_rate, self.format.byte_rate, byte_rate
        );
        self.format.sample_rate = new_rate;
        self.format.byte_rate = byte_rate;
        Ok(())
    }

    /// Reverse the order of sample frames in the data chunk.
    ///
    /// Each frame of `block_align` bytes moves as a unit, so interleaved channels and
    /// multi-byte samples stay intact. Fails without touching anything when the payload
    /// is not a whole number of frames.
    pub fn reverse_frames(&mut self) -> WavResult<()> {
        let block_align = self.format.block_align;
        let frame_len = block_align as usize;
        let payload = &mut self.data.payload;

        if frame_len == 0 || payload.len() % frame_len != 0 {
            return Err(WavError::UnalignedData {
                size: payload.len(),
                block_align,
            });
        }

        let frame_count = payload.len() / frame_len;
        debug!("reversing {} frames of {} bytes", frame_count, frame_len);

        // The back half keeps the middle frame when the count is odd; zip stops before it.
        let (front, back) = payload.split_at_mut(frame_count / 2 * frame_len);
        front
            .chunks_exact_mut(frame_len)
            .zip(back.rchunks_exact_mut(frame_len))
            .for_each(|(head, tail)| head.swap_with_slice(tail));

        Ok(())
    }
}
