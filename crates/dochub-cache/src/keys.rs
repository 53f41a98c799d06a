//! Lock key builders.
//!
//! Centralising key construction prevents typos and makes it easy to find
//! every key the application uses.

/// Key for a `(namespace, key)` lock pair.
///
/// The Redis provider prepends its configured instance prefix on top.
pub fn lock_key(namespace: &str, key: &str) -> String {
    format!("lock:{namespace}:{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_key() {
        assert_eq!(
            lock_key("filetree", "00000000-0000-0000-0000-000000000000"),
            "lock:filetree:00000000-0000-0000-0000-000000000000"
        );
    }
}
