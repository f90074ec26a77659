//! Error types for dwav

use thiserror::Error;

/// Result type alias for parse, transform and serialize operations
pub type WavResult<T> = std::result::Result<T, WavError>;

/// Everything that can go wrong between reading the first byte and writing the last one.
///
/// All variants except [`WavError::Io`] describe a structurally invalid or unsupported
/// input and are never worth retrying.
#[derive(Error, Debug)]
pub enum WavError {
    /// The first 12 bytes are not `RIFF....WAVE`
    #[error("malformed RIFF header: expected \"RIFF\"/\"WAVE\", found {found_id:?}/{found_format:?}")]
    MalformedHeader {
        found_id: String,
        found_format: String,
    },

    /// The chunk after the RIFF header is not a usable `fmt ` chunk
    #[error("malformed format chunk at offset {offset}: {reason}")]
    MalformedFormatChunk { offset: usize, reason: String },

    #[error("more than {limit} extra chunks before the data chunk (next chunk at offset {offset})")]
    TooManyExtraChunks { limit: usize, offset: usize },

    /// The data chunk declares more payload than the buffer holds
    #[error("data chunk at offset {offset} declares {declared} bytes but only {available} remain")]
    TruncatedData {
        offset: usize,
        declared: usize,
        available: usize,
    },

    #[error("unexpected end of input while reading {chunk} at offset {offset}: needed {needed} bytes, {available} remain")]
    UnexpectedEndOfInput {
        chunk: String,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Reversal needs the data size to be a whole number of sample frames
    #[error("data chunk of {size} bytes is not a multiple of block align {block_align}")]
    UnalignedData { size: usize, block_align: u16 },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WavError {
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        WavError::InvalidParameter(msg.into())
    }

    pub(crate) fn end_of_input(chunk: &str, offset: usize, needed: usize, available: usize) -> Self {
        WavError::UnexpectedEndOfInput {
            chunk: chunk.to_string(),
            offset,
            needed,
            available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_values() {
        let err = WavError::TruncatedData {
            offset: 44,
            declared: 1000,
            available: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("44"));
        assert!(msg.contains("1000"));
        assert!(msg.contains("12"));

        let err = WavError::end_of_input("LIST", 36, 8, 3);
        assert!(err.to_string().contains("LIST"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: WavError = io.into();
        assert!(matches!(err, WavError::Io(_)));
    }
}
