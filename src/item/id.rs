use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Process-wide counter for generated identifiers.
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Random suffix shared by every id generated in this process.
static ID_SEED: OnceLock<String> = OnceLock::new();

/// Identifier of a notification.
///
/// Cheap to clone (`Arc<str>`). Caller-supplied ids are kept verbatim; generated
/// ids look like `toast-1718000000000-7-k3j9x2`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Arc<str>);

impl NotificationId {
    /// Wraps a caller-supplied identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh identifier with the given prefix.
    ///
    /// Format: `{prefix}-{unix_millis}-{counter}-{seed}`.
    pub fn generate(prefix: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let n = ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
        let seed = ID_SEED.get_or_init(random_seed);
        Self(format!("{prefix}-{millis}-{n}-{seed}").into())
    }

    /// Borrows the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn random_seed() -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..6)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl Borrow<str> for NotificationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NotificationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NotificationId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique_and_prefixed() {
        let a = NotificationId::generate("toast");
        let b = NotificationId::generate("toast");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("toast-"));
        assert_eq!(a.as_str().split('-').count(), 4);
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        let mut map = std::collections::HashMap::new();
        map.insert(NotificationId::new("abc"), 1);
        assert_eq!(map.get("abc"), Some(&1));
    }
}
