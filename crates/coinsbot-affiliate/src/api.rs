use async_trait::async_trait;
use coinsbot_core::ProductId;

use crate::error::AffiliateError;
use crate::types::{AffiliateLink, RawProduct};

/// The two affiliate API operations the bot depends on.
///
/// [`crate::AliexpressClient`] is the production implementation; tests
/// substitute in-memory fakes.
#[async_trait]
pub trait AffiliateApi: Send + Sync {
    /// Converts a source URL into zero or more tracked promotion links.
    async fn get_affiliate_links(
        &self,
        source_url: &str,
    ) -> Result<Vec<AffiliateLink>, AffiliateError>;

    /// Fetches raw product records for `product_ids`, limited to `fields`.
    async fn get_product_details(
        &self,
        product_ids: &[ProductId],
        fields: &[&str],
    ) -> Result<Vec<RawProduct>, AffiliateError>;
}
