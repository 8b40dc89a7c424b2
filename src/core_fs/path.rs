/// Takes a client supplied path or filename and generates a safe absolute
/// path within the session sandbox.
///
/// ```
/// use ferroftpd::core_fs::build_path;
///
/// assert_eq!(build_path("/", "/"), "/");
/// assert_eq!(build_path("/", "one.txt"), "/one.txt");
/// assert_eq!(build_path("/", "/files/two.txt"), "/files/two.txt");
/// assert_eq!(build_path("/files", "two.txt"), "/files/two.txt");
/// assert_eq!(build_path("/", "/../../../../etc/passwd"), "/etc/passwd");
/// ```
///
/// The driver decides how to treat the result. It must scope it to its own
/// sandbox and never read the path straight off disk.
pub fn build_path(prefix: &str, raw: &str) -> String {
    if raw.starts_with('/') {
        clean_path(raw)
    } else if !raw.is_empty() {
        clean_path(&format!("{}/{}", prefix, raw))
    } else {
        clean_path(prefix)
    }
}

/// Lexically normalizes a path: resolves `.` and `..`, collapses repeated
/// separators and never climbs above `/`. The filesystem is not consulted.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_path_examples() {
        assert_eq!(build_path("/", "/"), "/");
        assert_eq!(build_path("/", "one.txt"), "/one.txt");
        assert_eq!(build_path("/", "/files/two.txt"), "/files/two.txt");
        assert_eq!(build_path("/", "files/two.txt"), "/files/two.txt");
        assert_eq!(build_path("/", "/../../../../etc/passwd"), "/etc/passwd");
    }

    #[test]
    fn test_build_path_relative_to_prefix() {
        assert_eq!(build_path("/pub", "readme.txt"), "/pub/readme.txt");
        assert_eq!(build_path("/pub/docs", ".."), "/pub");
        assert_eq!(build_path("/pub", "../../.."), "/");
        assert_eq!(build_path("/pub", ""), "/pub");
    }

    #[test]
    fn test_build_path_keeps_spaces() {
        assert_eq!(
            build_path("/", "my holiday photos/day 1.jpg"),
            "/my holiday photos/day 1.jpg"
        );
    }

    #[test]
    fn test_clean_path_collapses_separators() {
        assert_eq!(clean_path("//a///b/./c/"), "/a/b/c");
        assert_eq!(clean_path("/a/b/../../../x"), "/x");
        assert_eq!(clean_path(""), "/");
    }

    #[test]
    fn test_build_path_is_idempotent() {
        let inputs = [
            "/",
            "one.txt",
            "/files/two.txt",
            "/../../etc/passwd",
            "a/./b//c/..",
            "..",
            "/x/y/z/../../w",
            "dir with spaces/file",
        ];
        for prefix in ["/", "/pub", "/a/b"] {
            for input in inputs {
                let once = build_path(prefix, input);
                assert_eq!(build_path(prefix, &once), once, "input {:?}", input);
                assert!(once.starts_with('/'));
                assert!(!once.split('/').any(|s| s == ".."));
            }
        }
    }
}
