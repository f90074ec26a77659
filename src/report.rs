//! Human-readable and JSON summaries of a parsed file.

use std::fmt::{self, Write};

use serde_json::{Value, json};

use crate::wav::{SoundFile, fourcc_to_string};

/// Text report that formats straight into whatever prints it.
pub struct TextReport<'a>(pub &'a SoundFile);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_text(f, self.0)
    }
}

/// Section layout: RIFF, format, data, then the extra subchunks in file order.
pub fn write_text<W: Write>(out: &mut W, sound: &SoundFile) -> fmt::Result {
    let riff = sound.riff();
    let format = sound.format();
    let data = sound.data();

    writeln!(out, "RIFF ELEMENTS")?;
    writeln!(out, "ChunkID: {}", fourcc_to_string(riff.chunk_id()))?;
    writeln!(out, "ChunkSize: {}", riff.chunk_size())?;
    writeln!(out, "Format: {}", fourcc_to_string(riff.format()))?;

    writeln!(out, "\nFORMAT ELEMENTS")?;
    writeln!(out, "Subchunk1ID: {}", fourcc_to_string(format.chunk_id()))?;
    writeln!(out, "Subchunk1 Size: {}", format.chunk_size())?;
    writeln!(
        out,
        "Audio Form: {} ({})",
        format.audio_format(),
        format.audio_format_name()
    )?;
    writeln!(out, "Number of Channels: {}", format.num_channels())?;
    writeln!(out, "Sample Rate: {}", format.sample_rate())?;
    writeln!(out, "Byte Rate: {}", format.byte_rate())?;
    writeln!(out, "Block Align: {}", format.block_align())?;
    writeln!(out, "Bits Per Sample: {}", format.bits_per_sample())?;
    writeln!(
        out,
        "Extra Parameters: {}",
        if format.has_extension() {
            format!("Yes ({} bytes)", format.extension().len())
        } else {
            "No".to_string()
        }
    )?;

    writeln!(out, "\nDATA ELEMENTS")?;
    writeln!(out, "Subchunk2ID: {}", fourcc_to_string(data.chunk_id()))?;
    writeln!(out, "Subchunk2 Size: {}", data.size())?;
    match (sound.frame_count(), sound.duration_secs()) {
        (Some(frames), Some(secs)) => {
            writeln!(out, "Frames: {} ({:.3} s)", frames, secs)?;
        }
        (Some(frames), None) => {
            writeln!(out, "Frames: {}", frames)?;
        }
        _ => {}
    }

    writeln!(out, "\nExtra Subchunks Found: {}", sound.extras().len())?;
    for chunk in sound.extras() {
        writeln!(
            out,
            "  {} of Size {}",
            fourcc_to_string(chunk.id()),
            chunk.size()
        )?;
    }
    if !sound.trailer().is_empty() {
        writeln!(out, "Trailing Bytes: {}", sound.trailer().len())?;
    }

    Ok(())
}

pub fn render_json(sound: &SoundFile) -> Value {
    let riff = sound.riff();
    let format = sound.format();
    let data = sound.data();

    let extras: Vec<Value> = sound
        .extras()
        .iter()
        .map(|chunk| {
            json!({
                "id": fourcc_to_string(chunk.id()),
                "size": chunk.size(),
            })
        })
        .collect();

    json!({
        "riff": {
            "id": fourcc_to_string(riff.chunk_id()),
            "size": riff.chunk_size(),
            "format": fourcc_to_string(riff.format()),
        },
        "format": {
            "id": fourcc_to_string(format.chunk_id()),
            "size": format.chunk_size(),
            "audio_format": format.audio_format(),
            "channels": format.num_channels(),
            "sample_rate": format.sample_rate(),
            "byte_rate": format.byte_rate(),
            "block_align": format.block_align(),
            "bits_per_sample": format.bits_per_sample(),
            "extension_size": format.extension().len(),
        },
        "data": {
            "id": fourcc_to_string(data.chunk_id()),
            "size": data.size(),
            "frames": sound.frame_count(),
            "duration_secs": sound.duration_secs(),
        },
        "extra_chunks": extras,
        "trailing_bytes": sound.trailer().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::{DataChunk, ExtraChunk, FormatChunk};

    fn sample() -> SoundFile {
        SoundFile::from_parts(
            FormatChunk::pcm(2, 48000, 16).with_extension(vec![0, 0]),
            vec![
                ExtraChunk::new(*b"LIST", vec![0; 10]).unwrap(),
                ExtraChunk::new(*b"bext", vec![0; 602]).unwrap(),
            ],
            DataChunk::new(vec![0; 48000 * 4]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_text_report_sections() {
        let text = TextReport(&sample()).to_string();
        assert!(text.contains("ChunkID: RIFF"));
        assert!(text.contains("Subchunk1ID: fmt "));
        assert!(text.contains("Subchunk1 Size: 18"));
        assert!(text.contains("Sample Rate: 48000"));
        assert!(text.contains("Extra Parameters: Yes (2 bytes)"));
        assert!(text.contains("Frames: 48000 (1.000 s)"));
        assert!(text.contains("Extra Subchunks Found: 2"));

        let list = text.find("LIST of Size 10").unwrap();
        let bext = text.find("bext of Size 602").unwrap();
        assert!(list < bext);
    }

    #[test]
    fn test_text_report_streams_into_writer() {
        let sound = sample();
        let mut out = String::new();
        write_text(&mut out, &sound).unwrap();
        assert_eq!(TextReport(&sound).to_string(), out);
    }

    #[test]
    fn test_json_report_fields() {
        let value = render_json(&sample());
        assert_eq!(value["riff"]["format"], "WAVE");
        assert_eq!(value["format"]["channels"], 2);
        assert_eq!(value["format"]["byte_rate"], 192000);
        assert_eq!(value["data"]["frames"], 48000);
        assert_eq!(value["extra_chunks"][1]["id"], "bext");
        assert_eq!(value["extra_chunks"].as_array().unwrap().len(), 2);
    }
}
