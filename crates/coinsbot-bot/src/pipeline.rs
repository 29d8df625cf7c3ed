//! Resolve → extract → generate → fetch → compose for one shared link.

use std::sync::Arc;

use coinsbot_affiliate::{AffiliateError, CampaignLinkGenerator, ProductDetailFetcher};
use coinsbot_links::{extract_product_id, ResolveLink};
use thiserror::Error;

use crate::compose::{compose, ComposedMessage};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no product id found in {link}")]
    NoProductId { link: String },

    #[error("product details unavailable: {0}")]
    Details(#[from] AffiliateError),
}

pub struct Pipeline {
    resolver: Arc<dyn ResolveLink>,
    links: CampaignLinkGenerator,
    details: ProductDetailFetcher,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        resolver: Arc<dyn ResolveLink>,
        links: CampaignLinkGenerator,
        details: ProductDetailFetcher,
    ) -> Self {
        Self {
            resolver,
            links,
            details,
        }
    }

    /// Runs the whole chain for `share_link`.
    ///
    /// Campaign links are built from the link exactly as the user shared it;
    /// only id extraction uses the resolved URL.
    ///
    /// # Errors
    ///
    /// [`PipelineError::NoProductId`] when the resolved link carries no id,
    /// [`PipelineError::Details`] when the detail lookup fails.
    pub async fn run(&self, share_link: &str) -> Result<ComposedMessage, PipelineError> {
        let resolved = self.resolver.resolve(share_link).await;
        let product_id =
            extract_product_id(&resolved).ok_or_else(|| PipelineError::NoProductId {
                link: resolved.clone(),
            })?;
        tracing::info!(%product_id, share_link, resolved = %resolved, "processing product link");

        let links = self.links.generate_all(&product_id, share_link).await;
        let details = self.details.fetch(&product_id).await?;
        Ok(compose(&details, &links))
    }
}
