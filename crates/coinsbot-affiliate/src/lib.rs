pub mod api;
pub mod campaign;
pub mod client;
pub mod details;
pub mod error;
pub mod normalize;
pub mod retry;
mod sign;
pub mod types;

pub use api::AffiliateApi;
pub use campaign::{campaign_source_url, CampaignLinkGenerator};
pub use client::{AliexpressClient, Credentials};
pub use details::{ProductDetailFetcher, DETAIL_FIELDS};
pub use error::AffiliateError;
pub use normalize::{normalize_product, parse_price, TITLE_NOT_AVAILABLE};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use types::{AffiliateLink, RawProduct};
