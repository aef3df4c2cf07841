use crate::digest::{digest_bytes, digest_file, digest_text, digest_value, Digest};
use crate::errors::ChecksumError;
use serde_json::Value;
use std::path::Path;

/// Something that can be checked against a stored digest.
#[derive(Debug, Clone, Copy)]
pub enum ChecksumSubject<'a> {
    /// A structured value, digested over its canonical form.
    Value(&'a Value),
    /// Text, digested after normalization.
    Text(&'a str),
    /// Raw bytes.
    Bytes(&'a [u8]),
    /// A file on disk, digested over its raw bytes.
    File(&'a Path),
}

impl ChecksumSubject<'_> {
    /// Computes the digest the subject would be stored under.
    pub fn digest(&self) -> Result<Digest, ChecksumError> {
        match self {
            ChecksumSubject::Value(value) => Ok(digest_value(*value)?),
            ChecksumSubject::Text(text) => Ok(digest_text(text, true)),
            ChecksumSubject::Bytes(bytes) => Ok(digest_bytes(bytes)),
            ChecksumSubject::File(path) => digest_file(path),
        }
    }
}

/// Compares two hex digests, ignoring case.
pub fn digests_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Recomputes the subject's digest and compares it with `expected`.
///
/// A mismatch (including a malformed `expected`) yields `Ok(false)`. Errors are
/// reserved for subjects that cannot be digested at all.
pub fn verify_checksum(subject: ChecksumSubject<'_>, expected: &str) -> Result<bool, ChecksumError> {
    let actual = subject.digest()?;
    let matched = actual.matches(expected);
    if !matched {
        tracing::debug!(expected, actual = %actual, "checksum mismatch");
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute_text_checksum;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_verify_text_case_insensitive() {
        let checksum = compute_text_checksum("Test");
        let subject = ChecksumSubject::Text("Test");
        assert!(verify_checksum(subject, checksum.as_str()).unwrap());
        assert!(verify_checksum(subject, &checksum.as_str().to_uppercase()).unwrap());
        assert!(!verify_checksum(subject, &"0".repeat(64)).unwrap());
    }

    #[test]
    fn test_verify_value_detects_change() {
        let mut state = json!({"id": "test_001", "value": 42});
        let checksum = digest_value(&state).unwrap();
        assert!(verify_checksum(ChecksumSubject::Value(&state), checksum.as_str()).unwrap());

        state["value"] = json!(100);
        assert!(!verify_checksum(ChecksumSubject::Value(&state), checksum.as_str()).unwrap());
    }

    #[test]
    fn test_verify_file_after_modification() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.txt");
        fs::write(&file, "Original content").unwrap();
        let checksum = digest_file(&file).unwrap();
        assert!(verify_checksum(ChecksumSubject::File(&file), checksum.as_str()).unwrap());

        fs::write(&file, "Modified content").unwrap();
        assert!(!verify_checksum(ChecksumSubject::File(&file), checksum.as_str()).unwrap());
    }

    #[test]
    fn test_verify_missing_file_is_error() {
        let result = verify_checksum(
            ChecksumSubject::File(Path::new("/nonexistent/file.txt")),
            &"0".repeat(64),
        );
        assert!(matches!(result, Err(ChecksumError::NotFound(_))));
    }

    #[test]
    fn test_digests_match() {
        assert!(digests_match("ABCdef", "abcDEF"));
        assert!(!digests_match("abc", "abd"));
    }
}
