/// Joins query items with `joiner`, without a trailing separator.
pub fn join<S: AsRef<str>>(items: &[S], joiner: &str) -> String {
    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            joined.push_str(joiner);
        }
        joined.push_str(item.as_ref());
    }
    joined
}

/// Combines the fixed query with extra parameters, skipping empty parts.
pub fn build(fixed: &str, extra: &[String]) -> String {
    let extra = join(extra, "&");
    match (fixed.is_empty(), extra.is_empty()) {
        (true, _) => extra,
        (false, true) => fixed.to_string(),
        (false, false) => format!("{}&{}", fixed, extra),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_empty() {
        let items: [&str; 0] = [];
        assert_eq!(join(&items, "&"), "");
    }

    #[test]
    fn test_join_single() {
        assert_eq!(join(&["level=3"], "&"), "level=3");
    }

    #[test]
    fn test_join_many() {
        assert_eq!(join(&["a=1", "b=2", "c=3"], "&"), "a=1&b=2&c=3");
        assert_eq!(join(&["x", "y"], ", "), "x, y");
    }

    #[test]
    fn test_build_fixed_only() {
        assert_eq!(build("key=abc", &[]), "key=abc");
    }

    #[test]
    fn test_build_fixed_and_extra() {
        let extra = vec!["page=2".to_string(), "limit=10".to_string()];
        assert_eq!(build("key=abc", &extra), "key=abc&page=2&limit=10");
    }

    #[test]
    fn test_build_extra_only() {
        let extra = vec!["page=2".to_string()];
        assert_eq!(build("", &extra), "page=2");
    }

    #[test]
    fn test_build_nothing() {
        assert_eq!(build("", &[]), "");
    }
}
