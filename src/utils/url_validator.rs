//! Syntactic validation of URLs submitted for shortening.

use url::Url;

/// Returns `true` if `raw` is an absolute `http` or `https` URL with a host.
///
/// Purely syntactic: no normalization, DNS lookup or reachability check.
///
/// Input the URL parser would silently rewrite is rejected: control
/// characters anywhere (the parser strips tabs and newlines), surrounding
/// whitespace, and an empty authority (`https:///path`, from which the parser
/// recovers a host out of the path). The stored string must stay usable as a
/// `Location` header verbatim.
pub fn is_valid_url(raw: &str) -> bool {
    if raw.chars().any(char::is_control) || raw.trim() != raw {
        return false;
    }

    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    has_authority(raw) && parsed.host_str().is_some_and(|host| !host.is_empty())
}

fn has_authority(raw: &str) -> bool {
    raw.split_once("://")
        .and_then(|(_, rest)| rest.split(['/', '?', '#']).next())
        .is_some_and(|authority| !authority.is_empty())
}
