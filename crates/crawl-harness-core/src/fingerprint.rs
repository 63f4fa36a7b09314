//! Content fingerprints.
//!
//! A fingerprint is the lowercase hex SHA-256 of the raw content bytes. It
//! detects that content changed, never what changed.

use sha2::{Digest, Sha256};

/// Hex length of every fingerprint.
pub const FINGERPRINT_LEN: usize = 64;

pub fn content_fingerprint(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_content_hashes_identically() {
        let a = content_fingerprint(b"fn main() {}\n");
        let b = content_fingerprint(b"fn main() {}\n");
        assert_eq!(a, b);
        assert_eq!(a.len(), FINGERPRINT_LEN);
    }

    #[test]
    fn test_single_char_change_changes_hash() {
        let a = content_fingerprint(b"status: open");
        let b = content_fingerprint(b"status: opem");
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_content_known_digest() {
        assert_eq!(
            content_fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
