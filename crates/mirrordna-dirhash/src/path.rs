use std::path::{Component, Path};
use unicode_normalization::UnicodeNormalization;

/// Normalizes a path relative to the hash root for use as a hash key.
///
/// Components are joined with `/` regardless of platform and each name is
/// normalized to Unicode NFC, so the same tree hashes identically on hosts that
/// store names decomposed. Returns `None` if `path` is not under `root`.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().nfc().collect::<String>()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_forward_slash_separator() {
        let root = Path::new("/vault");
        let path: PathBuf = ["/vault", "notes", "day1.md"].iter().collect();
        assert_eq!(relative_key(root, &path).unwrap(), "notes/day1.md");
    }

    #[test]
    fn test_unicode_normalized_to_nfc() {
        let root = Path::new("/vault");
        let composed = relative_key(root, Path::new("/vault/caf\u{e9}.md")).unwrap();
        let decomposed = relative_key(root, Path::new("/vault/cafe\u{301}.md")).unwrap();
        assert_eq!(composed, decomposed);
    }

    #[test]
    fn test_outside_root_and_root_itself() {
        let root = Path::new("/vault");
        assert!(relative_key(root, Path::new("/elsewhere/file")).is_none());
        assert!(relative_key(root, root).is_none());
    }
}
