//! IRI reference resolution (RFC 3986 §5.2).
//!
//! Works on the Unicode string form directly; nothing is percent-encoded or
//! case-normalized, so an IRI that is already absolute comes back unchanged.

/// The placeholder base used when the caller supplies none.
pub const FAKE_BASE: &str = "http://relative-uri.fake/";

/// Returns true if `iri` starts with an RFC 3986 scheme
/// (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`).
#[must_use]
pub fn is_absolute(iri: &str) -> bool {
    scheme_len(iri).is_some()
}

/// Length of the scheme (excluding the colon), if `iri` has one.
fn scheme_len(iri: &str) -> Option<usize> {
    let colon = iri.find(':')?;
    let scheme = &iri[..colon];
    let mut bytes = scheme.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() => {}
        _ => return None,
    }
    if bytes.all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.') {
        Some(colon)
    } else {
        None
    }
}

/// The five components of an IRI reference. Absent components are `None`;
/// the path is always present, possibly empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Components<'a> {
    scheme: Option<&'a str>,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> Components<'a> {
    fn split(reference: &'a str) -> Self {
        let (rest, fragment) = match reference.find('#') {
            Some(pos) => (&reference[..pos], Some(&reference[pos + 1..])),
            None => (reference, None),
        };
        let (rest, query) = match rest.find('?') {
            Some(pos) => (&rest[..pos], Some(&rest[pos + 1..])),
            None => (rest, None),
        };
        let (scheme, rest) = match scheme_len(rest) {
            Some(len) => (Some(&rest[..len]), &rest[len + 1..]),
            None => (None, rest),
        };
        let (authority, path) = match rest.strip_prefix("//") {
            Some(after) => match after.find('/') {
                Some(pos) => (Some(&after[..pos]), &after[pos..]),
                None => (Some(after), ""),
            },
            None => (None, rest),
        };
        Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }
}

/// Resolves `reference` against `base`.
///
/// `base` must be absolute; references that already carry a scheme are
/// returned verbatim.
#[must_use]
pub fn resolve(base: &str, reference: &str) -> String {
    if is_absolute(reference) {
        return reference.to_owned();
    }

    let b = Components::split(base);
    let r = Components::split(reference);

    let (authority, path, query) = if r.authority.is_some() {
        (r.authority, remove_dot_segments(r.path), r.query)
    } else if r.path.is_empty() {
        (b.authority, b.path.to_owned(), r.query.or(b.query))
    } else if r.path.starts_with('/') {
        (b.authority, remove_dot_segments(r.path), r.query)
    } else {
        (b.authority, remove_dot_segments(&merge(&b, r.path)), r.query)
    };

    let mut target = String::with_capacity(base.len() + reference.len());
    if let Some(scheme) = b.scheme {
        target.push_str(scheme);
        target.push(':');
    }
    if let Some(authority) = authority {
        target.push_str("//");
        target.push_str(authority);
    }
    target.push_str(&path);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    if let Some(fragment) = r.fragment {
        target.push('#');
        target.push_str(fragment);
    }
    target
}

/// RFC 3986 §5.2.3.
fn merge(base: &Components<'_>, reference_path: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        format!("/{reference_path}")
    } else {
        match base.path.rfind('/') {
            Some(pos) => format!("{}{}", &base.path[..=pos], reference_path),
            None => reference_path.to_owned(),
        }
    }
}

/// RFC 3986 §5.2.4.
fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") || input == "/.." {
            input = if input == "/.." { "/" } else { &input[3..] };
            match output.rfind('/') {
                Some(pos) => output.truncate(pos),
                None => output.clear(),
            }
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..].find('/').map_or(input.len(), |p| p + start);
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://a/b/c/d;p?q";

    #[test]
    fn rfc3986_normal_examples() {
        let cases = [
            ("g:h", "g:h"),
            ("g", "http://a/b/c/g"),
            ("./g", "http://a/b/c/g"),
            ("g/", "http://a/b/c/g/"),
            ("/g", "http://a/g"),
            ("//g", "http://g"),
            ("?y", "http://a/b/c/d;p?y"),
            ("g?y", "http://a/b/c/g?y"),
            ("#s", "http://a/b/c/d;p?q#s"),
            ("g#s", "http://a/b/c/g#s"),
            ("g?y#s", "http://a/b/c/g?y#s"),
            (";x", "http://a/b/c/;x"),
            ("g;x", "http://a/b/c/g;x"),
            ("", "http://a/b/c/d;p?q"),
            (".", "http://a/b/c/"),
            ("./", "http://a/b/c/"),
            ("..", "http://a/b/"),
            ("../", "http://a/b/"),
            ("../g", "http://a/b/g"),
            ("../..", "http://a/"),
            ("../../", "http://a/"),
            ("../../g", "http://a/g"),
        ];
        for (reference, expected) in cases {
            assert_eq!(resolve(BASE, reference), expected, "reference {reference:?}");
        }
    }

    #[test]
    fn rfc3986_abnormal_examples() {
        let cases = [
            ("../../../g", "http://a/g"),
            ("/./g", "http://a/g"),
            ("/../g", "http://a/g"),
            ("g.", "http://a/b/c/g."),
            (".g", "http://a/b/c/.g"),
            ("g..", "http://a/b/c/g.."),
            ("./../g", "http://a/b/g"),
            ("./g/.", "http://a/b/c/g/"),
            ("g/./h", "http://a/b/c/g/h"),
            ("g/../h", "http://a/b/c/h"),
            ("g;x=1/./y", "http://a/b/c/g;x=1/y"),
            ("g;x=1/../y", "http://a/b/c/y"),
        ];
        for (reference, expected) in cases {
            assert_eq!(resolve(BASE, reference), expected, "reference {reference:?}");
        }
    }

    #[test]
    fn placeholder_base() {
        assert_eq!(resolve(FAKE_BASE, "#me"), "http://relative-uri.fake/#me");
        assert_eq!(resolve(FAKE_BASE, "doc"), "http://relative-uri.fake/doc");
    }

    #[test]
    fn unicode_is_preserved() {
        assert_eq!(
            resolve("http://example.org/dir/", "résumé"),
            "http://example.org/dir/résumé"
        );
    }

    #[test]
    fn absolute_detection() {
        assert!(is_absolute("http://example.org"));
        assert!(is_absolute("urn:isbn:0451450523"));
        assert!(!is_absolute("relative/path"));
        assert!(!is_absolute("/abs/path"));
        assert!(!is_absolute("1abc:foo"));
        assert!(!is_absolute(""));
    }
}
