//! Host extraction and the first-party rule.

use url::Url;

/// Lowercased host of an absolute URL, without a trailing dot.
///
/// Returns `None` for unparseable URLs and for URLs without a host
/// (`data:`, `blob:`, relative paths).
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    (!host.is_empty()).then_some(host)
}

/// Normalize a bare host as reported by a renderer: lowercase, no trailing
/// dot, no `:port`.
#[must_use]
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    strip_port(&host).trim_end_matches('.').to_string()
}

/// Drop a trailing `:port`. Bare IPv6 addresses carry no port; bracketed
/// ones (`[::1]:8080`) do.
fn strip_port(host: &str) -> &str {
    let Some((name, port)) = host.rsplit_once(':') else {
        return host;
    };
    let bracketed = name.starts_with('[') && name.ends_with(']');
    if (bracketed || !name.contains(':')) && port.chars().all(|c| c.is_ascii_digit()) {
        name
    } else {
        host
    }
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

fn is_subdomain_of(child: &str, parent: &str) -> bool {
    child
        .strip_suffix(parent)
        .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Whether a script served from `script_host` belongs to the page at
/// `page_host`.
///
/// After stripping a leading `www.` from both, the hosts must be equal or
/// one must be a subdomain of the other.
#[must_use]
pub fn is_first_party(script_host: &str, page_host: &str) -> bool {
    let script = strip_www(script_host);
    let page = strip_www(page_host);
    if script.is_empty() || page.is_empty() {
        return false;
    }
    script == page || is_subdomain_of(script, page) || is_subdomain_of(page, script)
}
