// Resolving "the page the user is on" and turning a rewritten URL into a redirect target

use url::Url;

/// Picks the page a form was submitted from.
///
/// `return_to` (hidden form field) wins over the `Referer` header. Anything that
/// fails to resolve, or resolves to another origin, falls back to the site root.
pub fn resolve_current(base: &Url, return_to: Option<&str>, referer: Option<&str>) -> Url {
    for candidate in [return_to, referer].into_iter().flatten() {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            continue;
        }
        match base.join(candidate) {
            Ok(resolved) if resolved.origin() == base.origin() => return resolved,
            Ok(resolved) => {
                tracing::warn!("Ignoring cross-origin navigation target: {}", resolved);
            }
            Err(e) => {
                tracing::debug!("Unparseable navigation target '{}': {}", candidate, e);
            }
        }
    }
    site_root(base)
}

/// Origin-relative form of `url` (path, query, fragment) for a `Location` header.
///
/// Leading slashes collapse to one: `//host/...` would be read by the browser as
/// a protocol-relative URL pointing off-site.
pub fn redirect_target(url: &Url) -> String {
    let mut target = format!("/{}", url.path().trim_start_matches('/'));
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        target.push('#');
        target.push_str(fragment);
    }
    target
}

fn site_root(base: &Url) -> Url {
    let mut root = base.clone();
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    root
}
