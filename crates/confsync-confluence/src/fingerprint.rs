//! Content fingerprints for change detection.
//!
//! CRC-32 is deliberate: fingerprints only exist to detect "did this content
//! change since the last publish", never as a security boundary. The textual
//! representations are stable so they can be embedded in published pages and
//! attachment comments and compared byte-for-byte on later builds.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read buffer size for streamed file checksums.
const CHUNK_SIZE: usize = 8192;

/// Fingerprint a page as published: CRC-32 over the UTF-8 bytes of title
/// followed by rendered body, formatted as `0x`-prefixed lowercase hex.
#[must_use]
pub fn page_fingerprint(title: &str, body: &str) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(title.as_bytes());
    hasher.update(body.as_bytes());
    format!("{:#x}", hasher.finalize())
}

/// Streamed CRC-32 over a file's raw bytes, as uppercase hex.
///
/// The file is read incrementally so arbitrarily large attachments never
/// need to fit in memory.
pub fn file_fingerprint(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:X}", hasher.finalize()))
}
