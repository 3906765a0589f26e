//! Transaction identifier generation.

use rand::Rng;

const TXID_MIN: u64 = 10_000_000_000_000;
const TXID_MAX: u64 = 99_999_999_999_999;

/// Generates a random 14-digit decimal transaction identifier.
///
/// Drawn uniformly from `[10^13, 10^14)` using the thread-local CSPRNG.
/// Uniqueness is best-effort: collisions are not checked.
#[must_use]
pub fn transaction_id() -> String {
    rand::rng().random_range(TXID_MIN..=TXID_MAX).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_shape() {
        for _ in 0..64 {
            let id = transaction_id();
            assert_eq!(id.len(), 14);
            assert!(id.bytes().all(|b| b.is_ascii_digit()));
            assert_ne!(id.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn test_transaction_id_in_range() {
        for _ in 0..64 {
            let value: u64 = transaction_id().parse().expect("numeric id");
            assert!((TXID_MIN..=TXID_MAX).contains(&value));
        }
    }
}
