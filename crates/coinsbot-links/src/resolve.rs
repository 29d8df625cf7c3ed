//! Redirect resolution for shared product links.
//!
//! Short links (`s.click.aliexpress.com/e/...`, `a.aliexpress.com/_...`) only
//! reveal the product page after a redirect chain, and some landing pages hide
//! the real destination in a `redirectUrl` query parameter. Resolution fails
//! open: any network error yields the original link, because the extractor
//! can still succeed on it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};

/// Maximum redirect hops followed before giving up on a chain.
const MAX_REDIRECTS: usize = 10;

/// Query parameter some landing pages use to wrap the true destination.
const REDIRECT_PARAM: &str = "redirectUrl";

/// Turns a shared link into the URL it ultimately points at.
#[async_trait]
pub trait ResolveLink: Send + Sync {
    /// Never fails: returns `link` unchanged when resolution is impossible.
    async fn resolve(&self, link: &str) -> String;
}

/// Follows HTTP redirects with a dedicated `reqwest` client.
pub struct LinkResolver {
    client: Client,
}

impl LinkResolver {
    /// Creates a resolver whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` error if the client cannot be constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Issues the GET and returns the URL the redirect chain ended on.
    async fn follow(&self, link: &str) -> Result<Url, reqwest::Error> {
        let response = self.client.get(link).send().await?;
        Ok(response.url().clone())
    }
}

#[async_trait]
impl ResolveLink for LinkResolver {
    async fn resolve(&self, link: &str) -> String {
        match self.follow(link).await {
            Ok(final_url) => {
                let resolved = redirect_target(&final_url).unwrap_or_else(|| final_url.to_string());
                tracing::debug!(link, resolved = %resolved, "resolved share link");
                resolved
            }
            Err(e) => {
                tracing::warn!(link, error = %e, "redirect resolution failed; using original link");
                link.to_owned()
            }
        }
    }
}

/// Returns the percent-decoded `redirectUrl` query value, if present and
/// non-empty.
#[must_use]
pub fn redirect_target(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(k, v)| k == REDIRECT_PARAM && !v.is_empty())
        .map(|(_, v)| v.into_owned())
}
