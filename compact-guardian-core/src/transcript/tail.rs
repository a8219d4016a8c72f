//! Bounded tail reader for JSONL transcripts.
//!
//! Transcripts grow without limit, but only the recent end matters for a
//! snapshot. Files larger than the tail budget are entered at
//! `size - tail_bytes`; the line straddling that offset is dropped because
//! it is almost certainly partial.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// Lazy iterator over the non-empty, trimmed lines of a transcript tail.
///
/// Owns the file handle; it is released when the iterator is dropped.
pub struct TailLines {
    reader: BufReader<File>,
    buf: Vec<u8>,
}

/// Open `path` for tail reading.
pub fn open(path: &Path, tail_bytes: u64) -> io::Result<TailLines> {
    let file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    if file_size > tail_bytes {
        reader.seek(SeekFrom::Start(file_size - tail_bytes))?;
        // Partial line split by the seek
        reader.read_until(b'\n', &mut buf)?;
        buf.clear();
    }

    Ok(TailLines { reader, buf })
}

impl Iterator for TailLines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&self.buf);
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return Some(Ok(trimmed.to_string()));
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
