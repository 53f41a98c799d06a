//! Name and path safety rules.
//!
//! Downstream sync clients and the content-sync engine key internal maps by
//! path and name. A name containing separators or control characters can
//! escape its directory, and a name colliding with an object-prototype
//! property identifier can corrupt those maps. These checks are the sole
//! safety net; every insert, rename, and move runs through them.

/// Maximum allowed length of a full filesystem path, in characters.
pub const MAX_PATH_LENGTH: usize = 1024;

/// Names that collide with object-prototype property identifiers in
/// downstream consumers. Matched case-sensitively, exact.
pub const BLOCKED_NAMES: &[&str] = &[
    "prototype",
    "constructor",
    "toString",
    "toLocaleString",
    "valueOf",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "__defineGetter__",
    "__lookupGetter__",
    "__defineSetter__",
    "__lookupSetter__",
    "__proto__",
];

fn is_bad_char(c: char) -> bool {
    c == '/' || c == '\\' || c == '*' || c.is_control()
}

/// Whether `name` is exactly one of the blocked reserved names.
pub fn is_blocked_name(name: &str) -> bool {
    BLOCKED_NAMES.contains(&name)
}

/// Whether `name` is safe to use as a single path segment.
pub fn is_clean_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_PATH_LENGTH
        && !name.chars().any(is_bad_char)
        && name != "."
        && name != ".."
        && name.trim() == name
}

/// Best-effort transform of `name` into a clean one.
///
/// Forbidden characters become `_`; a blocked reserved name gets an `@`
/// prefix so it stays recognizable but no longer collides.
pub fn clean(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if is_bad_char(c) { '_' } else { c })
        .collect();
    if is_blocked_name(&cleaned) {
        format!("@{cleaned}")
    } else {
        cleaned
    }
}

/// Whether every segment of the slash-separated `path` is clean.
///
/// A trailing empty segment (path ends in `/`) is rejected, as is a whole
/// path that, once stripped of its leading slash, is itself a blocked name.
pub fn is_clean_path(path: &str) -> bool {
    let stripped = path.strip_prefix('/').unwrap_or(path);
    if stripped.is_empty() || stripped.ends_with('/') {
        return false;
    }
    if !stripped.split('/').all(is_clean_name) {
        return false;
    }
    !is_blocked_name(stripped)
}

/// Whether a full path's length is within bounds.
pub fn is_allowed_length(path: &str) -> bool {
    let len = path.chars().count();
    0 < len && len <= MAX_PATH_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_names() {
        assert!(is_clean_name("main.tex"));
        assert!(is_clean_name("chapter one.tex"));
        assert!(is_clean_name("ümlaut.bib"));
    }

    #[test]
    fn test_rejects_separators_and_control() {
        assert!(!is_clean_name("a/b"));
        assert!(!is_clean_name("a\\b"));
        assert!(!is_clean_name("a*b"));
        assert!(!is_clean_name("a\u{0007}b"));
        assert!(!is_clean_name("a\nb"));
    }

    #[test]
    fn test_rejects_dots_and_whitespace_edges() {
        assert!(!is_clean_name("."));
        assert!(!is_clean_name(".."));
        assert!(!is_clean_name(" padded"));
        assert!(!is_clean_name("padded "));
        assert!(!is_clean_name(""));
        assert!(is_clean_name("..."));
        assert!(is_clean_name(".gitignore"));
    }

    #[test]
    fn test_blocked_names_are_exact_case() {
        assert!(is_blocked_name("constructor"));
        assert!(is_blocked_name("__proto__"));
        assert!(!is_blocked_name("Constructor"));
        assert!(!is_blocked_name("tostring"));
        // Blocked names are still clean names; the block is a separate rule.
        assert!(is_clean_name("constructor"));
    }

    #[test]
    fn test_clean_transform() {
        assert_eq!(clean("a/b*c"), "a_b_c");
        assert_eq!(clean("constructor"), "@constructor");
        assert_eq!(clean("normal.tex"), "normal.tex");
    }

    #[test]
    fn test_clean_paths() {
        assert!(is_clean_path("/foo/bar.tex"));
        assert!(is_clean_path("foo/bar.tex"));
        assert!(!is_clean_path("/foo/"));
        assert!(!is_clean_path("/foo//bar.tex"));
        assert!(!is_clean_path(""));
        assert!(!is_clean_path("/constructor"));
        assert!(is_clean_path("/folder/constructor"));
    }

    #[test]
    fn test_length_bounds() {
        assert!(is_allowed_length("/a.tex"));
        assert!(!is_allowed_length(""));
        assert!(is_allowed_length(&"x".repeat(MAX_PATH_LENGTH)));
        assert!(!is_allowed_length(&"x".repeat(MAX_PATH_LENGTH + 1)));
    }
}
