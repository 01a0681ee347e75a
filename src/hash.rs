use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::error;

/// Hex-encoded SHA-256 of the given bytes. Used purely for change detection,
/// never as a security primitive.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Fingerprint of a file's current content. An unreadable file yields the
/// empty sentinel so staleness checks degrade to "treat as changed" instead
/// of failing the caller.
pub fn hash_file(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => hash_bytes(&bytes),
        Err(err) => {
            error!("failed to hash {}: {err}", path.display());
            String::new()
        }
    }
}
