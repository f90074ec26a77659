pub use crate::error::{WavError, WavResult};
pub use anyhow::{Result as R, anyhow};
pub use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub use std::io::{Cursor, Read, Write};
