//! Checksum of the input file, recorded in the report to identify the data a run used.

use sha2::{Digest, Sha256};

/// Calculate SHA-256 checksum of raw input bytes.
///
/// # Arguments
/// * `content` - File content as read from disk
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}
