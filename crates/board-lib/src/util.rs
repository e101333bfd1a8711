//! ID generation, ordering helpers and snapshot fingerprints.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::model::{Issue, Snapshot};

// ============================================================================
// ID Generation
// ============================================================================

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MIN_HASH_LEN: usize = 3;
const MAX_HASH_LEN: usize = 12;
const ATTEMPTS_PER_LEN: u32 = 16;

/// Generate an issue ID `<prefix>-<hash>` that `exists` does not know.
///
/// The hash is base36 over SHA-256 of the title, creator, creation time and
/// an attempt counter. It starts short and grows with the board; collisions
/// retry with the next counter, then with a longer hash.
pub fn generate_id<F>(
    prefix: &str,
    title: &str,
    creator: Option<&str>,
    created_at: DateTime<Utc>,
    issue_count: usize,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let mut attempt = 0u32;
    for len in hash_len_for(issue_count)..=MAX_HASH_LEN {
        for _ in 0..ATTEMPTS_PER_LEN {
            let id = format!(
                "{prefix}-{}",
                id_hash(title, creator, created_at, attempt, len)
            );
            attempt += 1;
            if !exists(&id) {
                return id;
            }
        }
    }

    // Every hash length is taken; a numeric suffix always terminates.
    let base = format!(
        "{prefix}-{}",
        id_hash(title, creator, created_at, attempt, MAX_HASH_LEN)
    );
    (0u64..)
        .map(|n| format!("{base}{n}"))
        .find(|id| !exists(id))
        .unwrap_or(base)
}

/// Shortest hash that keeps collisions rare: `36^len >= 8 * count^2`.
fn hash_len_for(issue_count: usize) -> usize {
    let count = u128::try_from(issue_count).unwrap_or(u128::MAX);
    let needed = count.saturating_mul(count).saturating_mul(8);
    (MIN_HASH_LEN..MAX_HASH_LEN)
        .find(|&len| 36u128.pow(u32::try_from(len).unwrap_or(u32::MAX)) >= needed)
        .unwrap_or(MAX_HASH_LEN)
}

fn id_hash(
    title: &str,
    creator: Option<&str>,
    created_at: DateTime<Utc>,
    attempt: u32,
    len: usize,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update([0u8]);
    hasher.update(creator.unwrap_or_default().as_bytes());
    hasher.update([0u8]);
    hasher.update(created_at.timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    hasher.update(attempt.to_be_bytes());
    let digest = hasher.finalize();

    // Two 64-bit words give 24 base36 digits, enough for any length.
    let mut digits = String::with_capacity(len);
    for chunk in digest.chunks_exact(8).take(2) {
        let mut word = chunk.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        for _ in 0..12 {
            digits.push(char::from(BASE36[usize::try_from(word % 36).unwrap_or_default()]));
            word /= 36;
        }
    }
    digits.truncate(len);
    digits
}

// ============================================================================
// Ordering
// ============================================================================

/// Clamp an insertion index to `[0, len]`; anything past the end appends.
#[must_use]
pub fn clamp_position(position: usize, len: usize) -> usize {
    position.min(len)
}

/// Rewrite `order` of every issue to its zero-based index.
pub fn renumber(issues: &mut [Issue]) {
    for (index, issue) in issues.iter_mut().enumerate() {
        issue.order = index;
    }
}

/// True when orders are exactly `0..len` in list order.
#[must_use]
pub fn is_contiguous(issues: &[Issue]) -> bool {
    issues
        .iter()
        .enumerate()
        .all(|(index, issue)| issue.order == index)
}

// ============================================================================
// Snapshot Fingerprints
// ============================================================================

/// SHA256 over the board layout.
///
/// Fields included (stable order with null separators): per column its id,
/// status and order; per issue its id, status, order and title.
///
/// Fields excluded: timestamps, WIP limits, display colors.
#[must_use]
pub fn snapshot_fingerprint(snapshot: &Snapshot) -> String {
    let mut hasher = Sha256::new();

    let mut hash_field = |value: &str| {
        if value.contains('\0') {
            hasher.update(value.replace('\0', " ").as_bytes());
        } else {
            hasher.update(value.as_bytes());
        }
        hasher.update(b"\x00");
    };

    for column in &snapshot.columns {
        hash_field(&column.id);
        hash_field(&column.status_id);
        hash_field(&column.order.to_string());
        for issue in &column.issues {
            hash_field(&issue.id);
            hash_field(&issue.status_id);
            hash_field(&issue.order.to_string());
            hash_field(&issue.title);
        }
    }

    format!("{:x}", hasher.finalize())
}
