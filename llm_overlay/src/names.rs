//! Deterministic derivation of child resource names.

use sha2::{Digest, Sha256};

/// Longest name accepted by the platform for a child resource (DNS label).
pub const MAX_NAME_LEN: usize = 63;

/// Number of fingerprint characters spliced in when a name must be shortened.
const FINGERPRINT_LEN: usize = 8;

/// Derive a stable child name from a parent name and a fixed suffix.
///
/// When `parent + suffix` fits within [`MAX_NAME_LEN`] the two are simply
/// concatenated. Otherwise the parent is truncated and a short hex
/// fingerprint of the full parent is spliced in before the suffix, so two
/// long parents that share a prefix still derive distinct child names. The
/// result is deterministic for identical inputs.
#[must_use]
pub fn child_name(parent: &str, suffix: &str) -> String {
    if parent.len() + suffix.len() <= MAX_NAME_LEN {
        return format!("{parent}{suffix}");
    }

    let digest = Sha256::digest(parent.as_bytes());
    let fingerprint: String = hex::encode(digest).chars().take(FINGERPRINT_LEN).collect();

    if suffix.len() + FINGERPRINT_LEN >= MAX_NAME_LEN {
        // Degenerate suffix: keep the fingerprint and as much suffix as fits.
        let mut out = fingerprint;
        out.extend(suffix.chars().take(MAX_NAME_LEN - FINGERPRINT_LEN));
        return out;
    }

    let keep = MAX_NAME_LEN - suffix.len() - FINGERPRINT_LEN;
    let mut out: String = parent.chars().take(keep).collect();
    out.push_str(&fingerprint);
    out.push_str(suffix);
    out
}

#[cfg(test)]
mod tests {
    use super::{MAX_NAME_LEN, child_name};

    #[test]
    fn short_names_concatenate() {
        assert_eq!(child_name("svc", "-epp-sa"), "svc-epp-sa");
    }

    #[test]
    fn long_names_stay_within_budget() {
        let parent = "a".repeat(80);
        let name = child_name(&parent, "-inference-pool");
        assert_eq!(name.len(), MAX_NAME_LEN);
        assert!(name.ends_with("-inference-pool"));
    }

    #[test]
    fn long_names_are_deterministic_and_distinct() {
        let shared_prefix = "b".repeat(70);
        let first = child_name(&format!("{shared_prefix}-one"), "-svc");
        let second = child_name(&format!("{shared_prefix}-two"), "-svc");
        assert_eq!(first, child_name(&format!("{shared_prefix}-one"), "-svc"));
        assert_ne!(first, second);
    }
}
