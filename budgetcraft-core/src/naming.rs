//! Derived output names: sanitization and collision handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Characters Windows rejects in file names
const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strip every illegal path character from a derived name. No escaping, no
/// truncation; everything else passes through unchanged.
pub fn sanitize_name(name: &str) -> String {
    name.chars().filter(|c| !ILLEGAL_CHARS.contains(c)).collect()
}

/// What to do when an output file with the derived name already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Replace the existing file (original workflow behavior)
    #[default]
    Overwrite,
    /// Treat the item as failed
    Fail,
    /// Append " (2)", " (3)", ... until the name is free
    Suffix,
}

/// Resolve the output path for a sanitized name under the collision policy.
/// Returns `None` when the policy is `Fail` and the path is taken.
pub fn resolve_output_path(
    output_dir: &Path,
    name: &str,
    policy: CollisionPolicy,
) -> Option<PathBuf> {
    let candidate = output_dir.join(format!("{}.xlsm", name));
    if !candidate.exists() {
        return Some(candidate);
    }
    match policy {
        CollisionPolicy::Overwrite => Some(candidate),
        CollisionPolicy::Fail => None,
        CollisionPolicy::Suffix => {
            for n in 2u32.. {
                let candidate = output_dir.join(format!("{} ({}).xlsm", name, n));
                if !candidate.exists() {
                    return Some(candidate);
                }
            }
            unreachable!()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_strips_all_illegal_chars() {
        assert_eq!(sanitize_name("Report/Q1:2024*"), "ReportQ12024");
        assert_eq!(sanitize_name(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
    }

    #[test]
    fn test_sanitize_keeps_everything_else() {
        assert_eq!(sanitize_name("Maple Court 2024"), "Maple Court 2024");
        assert_eq!(sanitize_name("Büro №3 (east)"), "Büro №3 (east)");
    }

    #[test]
    fn test_overwrite_reuses_existing_path() {
        let dir = tempdir().unwrap();
        let taken = dir.path().join("Maple.xlsm");
        std::fs::write(&taken, b"x").unwrap();

        let resolved =
            resolve_output_path(dir.path(), "Maple", CollisionPolicy::Overwrite).unwrap();
        assert_eq!(resolved, taken);
    }

    #[test]
    fn test_fail_refuses_existing_path() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Maple.xlsm"), b"x").unwrap();

        assert!(resolve_output_path(dir.path(), "Maple", CollisionPolicy::Fail).is_none());
        // A free name resolves regardless of policy
        assert!(resolve_output_path(dir.path(), "Oak", CollisionPolicy::Fail).is_some());
    }

    #[test]
    fn test_suffix_finds_next_free_name() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Maple.xlsm"), b"x").unwrap();
        std::fs::write(dir.path().join("Maple (2).xlsm"), b"x").unwrap();

        let resolved = resolve_output_path(dir.path(), "Maple", CollisionPolicy::Suffix).unwrap();
        assert_eq!(resolved, dir.path().join("Maple (3).xlsm"));
    }
}
