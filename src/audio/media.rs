use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, Source as _};

use crate::library::Source;

use super::types::EngineError;

/// Byte stream behind a decoder: a file on disk or an in-memory blob.
pub enum MediaReader {
    File(BufReader<File>),
    Memory(Cursor<Arc<[u8]>>),
}

impl Read for MediaReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File(r) => r.read(buf),
            Self::Memory(r) => r.read(buf),
        }
    }
}

impl Seek for MediaReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File(r) => r.seek(pos),
            Self::Memory(r) => r.seek(pos),
        }
    }
}

pub fn open_reader(source: &Source) -> Result<MediaReader, EngineError> {
    match source {
        Source::File(path) => Ok(MediaReader::File(BufReader::new(File::open(path)?))),
        Source::Blob(blob) => Ok(MediaReader::Memory(Cursor::new(blob.bytes()))),
    }
}

/// Open and decode `source`; also returns the duration when the decoder knows it.
pub fn open_decoder(
    source: &Source,
) -> Result<(Decoder<MediaReader>, Option<Duration>), EngineError> {
    let reader = open_reader(source)?;
    let decoder = Decoder::new(reader).map_err(|e| EngineError::Decode(e.to_string()))?;
    let duration = decoder.total_duration();
    Ok((decoder, duration))
}
