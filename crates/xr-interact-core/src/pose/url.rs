//! Template URL resolution

/// Join `base_url` and `path` with a single `/`, collapsing any run of
/// slashes except the one following a scheme's `://`.
pub fn resolve_template_url(base_url: &str, path: &str) -> String {
    let joined = if base_url.is_empty() {
        path.to_string()
    } else {
        format!("{base_url}/{path}")
    };

    let (scheme, rest) = match joined.find("://") {
        Some(idx) if is_scheme(&joined[..idx]) => joined.split_at(idx + 3),
        _ => ("", joined.as_str()),
    };

    let mut out = String::with_capacity(joined.len());
    out.push_str(scheme);
    let mut previous_slash = false;
    for ch in rest.chars() {
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        out.push(ch);
    }
    out
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_with_single_slash() {
        assert_eq!(
            resolve_template_url("https://cdn.example.com/poses/", "/fist.bin"),
            "https://cdn.example.com/poses/fist.bin"
        );
        assert_eq!(
            resolve_template_url("https://cdn.example.com/poses", "fist.bin"),
            "https://cdn.example.com/poses/fist.bin"
        );
    }

    #[test]
    fn test_keeps_scheme_separator() {
        assert_eq!(
            resolve_template_url("file:///srv//poses", "left//point.bin"),
            "file:///srv/poses/left/point.bin"
        );
    }

    #[test]
    fn test_plain_paths() {
        assert_eq!(resolve_template_url("assets//poses", "a.bin"), "assets/poses/a.bin");
        assert_eq!(resolve_template_url("", "a.bin"), "a.bin");
    }

    #[test]
    fn test_separator_inside_path_is_not_a_scheme() {
        assert_eq!(
            resolve_template_url("https://host", "weird/x://y//z"),
            "https://host/weird/x:/y/z"
        );
    }
}
