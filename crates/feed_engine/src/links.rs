use url::Url;

/// Turns a raw `href` into the canonical listing link.
///
/// Relative values are resolved against `base`. Fragments are always dropped
/// and query strings unless `keep_query` is set, since feeds append tracking
/// parameters that differ between otherwise identical links. Values that do
/// not parse are returned trimmed.
pub fn canonicalize_link(raw: &str, base: Option<&Url>, keep_query: bool) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    let parsed = match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(raw),
            None => return raw.to_string(),
        },
        Err(err) => Err(err),
    };
    match parsed {
        Ok(mut url) => {
            if !keep_query {
                url.set_query(None);
            }
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => raw.to_string(),
    }
}
