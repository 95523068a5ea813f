//! Input shim: project files are either raw XML or gzip-compressed XML.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decompress a project byte stream, falling back to the raw bytes when the
/// input is not gzip at all.
///
/// A stream that carries the gzip magic but fails mid-decompression is
/// reported as [`Error::GzipDecode`] naming the original cause; only the
/// specific not-gzip case falls through to raw interpretation.
pub fn decode(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => Ok(out),
        Err(_) if !bytes.starts_with(&GZIP_MAGIC) => Ok(bytes.to_vec()),
        Err(source) => Err(Error::GzipDecode { source }),
    }
}
