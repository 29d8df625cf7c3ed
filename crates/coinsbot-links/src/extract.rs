//! Pattern matching over shared URLs and chat text.
//!
//! Product-id extraction tries the known AliExpress URL shapes first and only
//! then falls back to the long-digit-run heuristic, so a specific match is
//! never shadowed by an unrelated number elsewhere in the URL (tracking ids,
//! timestamps).

use std::sync::LazyLock;

use coinsbot_core::ProductId;
use regex::Regex;

/// Host fragment every accepted share link must contain.
const PLATFORM_DOMAIN: &str = "aliexpress.com";

static ITEM_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/item/(\d+)\.html").expect("valid item path regex"));

static PRODUCT_IDS_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"productIds=(\d+)").expect("valid productIds regex"));

static LONG_DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{13,})").expect("valid digit run regex"));

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid link regex"));

/// Recovers the numeric product id from a (resolved) product URL.
///
/// Matching order, first hit wins:
/// 1. `/item/<digits>.html` path segment.
/// 2. `productIds=<digits>` query parameter.
/// 3. The first run of 13 or more consecutive digits anywhere in the string.
///
/// Returns `None` when no rule matches.
#[must_use]
pub fn extract_product_id(url: &str) -> Option<ProductId> {
    [&*ITEM_PATH_RE, &*PRODUCT_IDS_PARAM_RE, &*LONG_DIGIT_RUN_RE]
        .into_iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .and_then(|m| ProductId::parse(m.as_str()))
}

/// Returns the first `http(s)://` token in a chat message, if any.
#[must_use]
pub fn extract_first_link(text: &str) -> Option<&str> {
    LINK_RE.find(text).map(|m| m.as_str())
}

/// `true` when the URL parses and its host contains `aliexpress.com`.
#[must_use]
pub fn is_platform_link(link: &str) -> bool {
    reqwest::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
        .is_some_and(|host| host.contains(PLATFORM_DOMAIN))
}
