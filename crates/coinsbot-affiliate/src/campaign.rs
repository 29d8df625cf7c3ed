//! Affiliate-link generation for the four promotional campaigns.
//!
//! Each campaign is a different source URL handed to the link-generate
//! method. A campaign that cannot be converted is simply left out of the
//! reply, so every failure here degrades to `None`.

use std::sync::Arc;
use std::time::Duration;

use coinsbot_core::{CampaignKind, ProductId, PromotionLinks};

use crate::api::AffiliateApi;
use crate::retry::{retry_with_backoff, RetryPolicy};

const COIN_PAGE: &str =
    "https://m.aliexpress.com/p/coin-index/index.html?_immersiveMode=true&from=syicon&productIds=";
const BUNDLE_PAGE: &str =
    "https://star.aliexpress.com/share/share.htm?platform=AE&businessType=ProductDetail&redirectUrl=";

/// Builds the source URL for `kind`.
///
/// The share link is appended verbatim: campaign suffixes are concatenated
/// even when the link already carries a query string, and the bundle page
/// embeds it unencoded.
#[must_use]
pub fn campaign_source_url(kind: CampaignKind, product_id: &ProductId, share_link: &str) -> String {
    match kind {
        CampaignKind::Coin => format!("{COIN_PAGE}{product_id}"),
        CampaignKind::Bundle => format!("{BUNDLE_PAGE}{share_link}?sourceType=560&aff_fcid="),
        CampaignKind::Super => format!("{share_link}?sourceType=562&aff_fcid="),
        CampaignKind::Limited => format!("{share_link}?sourceType=561&aff_fcid="),
    }
}

/// Converts campaign source URLs into tracked promotion links.
pub struct CampaignLinkGenerator {
    api: Option<Arc<dyn AffiliateApi>>,
    retry: RetryPolicy,
    throttle: Duration,
}

impl CampaignLinkGenerator {
    /// `api = None` models a client that failed to initialize; every
    /// generation then yields `None`.
    #[must_use]
    pub fn new(api: Option<Arc<dyn AffiliateApi>>, retry: RetryPolicy, throttle: Duration) -> Self {
        Self {
            api,
            retry,
            throttle,
        }
    }

    /// Generates the promotion link for a single campaign.
    ///
    /// Returns `None` when the API yields no links, keeps failing after
    /// retries, or is not initialized. A successful call is followed by the
    /// throttle delay.
    pub async fn generate(
        &self,
        kind: CampaignKind,
        product_id: &ProductId,
        share_link: &str,
    ) -> Option<String> {
        let Some(api) = self.api.as_ref() else {
            tracing::warn!(campaign = %kind, "affiliate API client not initialized");
            return None;
        };

        let source_url = campaign_source_url(kind, product_id, share_link);
        match retry_with_backoff(self.retry, || api.get_affiliate_links(&source_url)).await {
            Ok(links) => {
                tokio::time::sleep(self.throttle).await;
                let link = links
                    .into_iter()
                    .map(|l| l.promotion_link)
                    .find(|l| !l.is_empty());
                if link.is_none() {
                    tracing::info!(campaign = %kind, %product_id, "no promotion link returned");
                }
                link
            }
            Err(e) => {
                tracing::warn!(campaign = %kind, %product_id, error = %e, "promotion link generation failed");
                None
            }
        }
    }

    /// Generates all four campaigns sequentially: coin, bundle, super, limited.
    pub async fn generate_all(&self, product_id: &ProductId, share_link: &str) -> PromotionLinks {
        let mut links = PromotionLinks::default();
        for kind in CampaignKind::ALL {
            let link = self.generate(kind, product_id, share_link).await;
            links.set(kind, link);
        }
        tracing::debug!(%product_id, generated = links.count(), "campaign links generated");
        links
    }
}
