//! Numeric path parameters.
//!
//! Parameters never produce a 4xx on bad input: an unparseable value takes
//! the endpoint's default and a parsed value is clamped into range.

/// Everything after `prefix` in `path`, or `""` when `path` is shorter.
pub fn tail<'a>(path: &'a str, prefix: &str) -> &'a str {
    path.strip_prefix(prefix).unwrap_or("")
}

/// The `index`-th `/`-separated segment of `path` (`""`-padded).
///
/// `/links/3/1` → segment 2 is `"3"`.
pub fn segment(path: &str, index: usize) -> &str {
    path.split('/').nth(index).unwrap_or("")
}

/// Parse `raw`, using `default` on failure and clamping into `0..=max`.
pub fn clamped(raw: &str, default: u64, max: u64) -> u64 {
    match raw.parse::<i64>() {
        Ok(n) => n.clamp(0, max as i64) as u64,
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail() {
        assert_eq!(tail("/status/404", "/status/"), "404");
        assert_eq!(tail("/status/", "/status/"), "");
        assert_eq!(tail("/st", "/status/"), "");
    }

    #[test]
    fn test_segment() {
        assert_eq!(segment("/links/3/1", 2), "3");
        assert_eq!(segment("/links/3/1", 3), "1");
        assert_eq!(segment("/bytes/", 2), "");
        assert_eq!(segment("/bytes", 2), "");
    }

    #[test]
    fn test_clamped() {
        assert_eq!(clamped("5", 20, 100), 5);
        assert_eq!(clamped("500", 20, 100), 100);
        assert_eq!(clamped("-4", 20, 100), 0);
        assert_eq!(clamped("abc", 20, 100), 20);
        assert_eq!(clamped("", 3, 10), 3);
        assert_eq!(clamped("99999999999999999999", 1024, 102400), 1024);
    }
}
