//! Content fingerprinting.
//!
//! BLAKE3 over fixed-size chunks, so peak memory stays bounded by the chunk
//! size no matter how large the file is.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::SyncError;

/// Default read chunk in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// A content fingerprint: the lowercase hex of a BLAKE3 digest.
///
/// Equal fingerprints are treated as identical content. No secondary size
/// check is made; a 256-bit collision is accepted as a non-risk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Streaming file hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Hasher {
    pub fn new() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE }
    }

    /// Set the read chunk size (bytes). Zero is clamped to the default.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 { DEFAULT_CHUNK_SIZE } else { chunk_size };
        self
    }

    /// Fingerprint a file by streaming it chunk by chunk.
    ///
    /// Fails with `ReadError` if the file cannot be opened or a read fails
    /// mid-stream.
    pub fn hash_file(&self, path: &Path) -> Result<Fingerprint, SyncError> {
        let mut file = File::open(path).map_err(|e| SyncError::read(path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let bytes_read = file.read(&mut buffer).map_err(|e| SyncError::read(path, e))?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Fingerprint(hasher.finalize().to_hex().to_string()))
    }

    /// Fingerprint in-memory bytes.
    pub fn hash_bytes(&self, data: &[u8]) -> Fingerprint {
        Fingerprint(blake3::hash(data).to_hex().to_string())
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}
