use std::sync::Arc;

use coinsbot_core::{ProductDetails, ProductId};

use crate::api::AffiliateApi;
use crate::error::AffiliateError;
use crate::normalize::normalize_product;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// Fields requested from the product-detail method.
pub const DETAIL_FIELDS: [&str; 6] = [
    "target_sale_price",
    "product_title",
    "product_main_image_url",
    "seller_id",
    "store_name",
    "seller_positive_rate",
];

/// Fetches and normalizes product details for a single product.
pub struct ProductDetailFetcher {
    api: Option<Arc<dyn AffiliateApi>>,
    retry: RetryPolicy,
}

impl ProductDetailFetcher {
    #[must_use]
    pub fn new(api: Option<Arc<dyn AffiliateApi>>, retry: RetryPolicy) -> Self {
        Self { api, retry }
    }

    /// Fetches the first record returned for `product_id`.
    ///
    /// # Errors
    ///
    /// - [`AffiliateError::NotInitialized`] when no API client exists.
    /// - [`AffiliateError::NoProductDetails`] when the API returns no records.
    /// - Any error from the last retry attempt.
    pub async fn fetch(&self, product_id: &ProductId) -> Result<ProductDetails, AffiliateError> {
        let api = self.api.as_ref().ok_or(AffiliateError::NotInitialized)?;
        let ids = std::slice::from_ref(product_id);

        let records =
            retry_with_backoff(self.retry, || api.get_product_details(ids, &DETAIL_FIELDS)).await?;

        let raw = records
            .into_iter()
            .next()
            .ok_or_else(|| AffiliateError::NoProductDetails {
                product_id: product_id.to_string(),
            })?;

        let details = normalize_product(&raw);
        tracing::debug!(%product_id, title = %details.title, price = %details.price, "product details fetched");
        Ok(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AffiliateLink, RawProduct};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct FixedDetails {
        records: Vec<RawProduct>,
        failures_before_success: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl AffiliateApi for FixedDetails {
        async fn get_affiliate_links(
            &self,
            _source_url: &str,
        ) -> Result<Vec<AffiliateLink>, AffiliateError> {
            Ok(Vec::new())
        }

        async fn get_product_details(
            &self,
            product_ids: &[ProductId],
            fields: &[&str],
        ) -> Result<Vec<RawProduct>, AffiliateError> {
            assert_eq!(product_ids.len(), 1);
            assert_eq!(fields, DETAIL_FIELDS);
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures_before_success {
                return Err(AffiliateError::Api {
                    code: "ApiCallLimit".to_owned(),
                    message: "throttled".to_owned(),
                });
            }
            Ok(self.records.clone())
        }
    }

    fn record() -> RawProduct {
        serde_json::json!({ "product_title": "Lamp", "target_sale_price": "4.20" })
            .as_object()
            .cloned()
            .unwrap()
    }

    fn fetcher(api: FixedDetails) -> ProductDetailFetcher {
        ProductDetailFetcher::new(
            Some(Arc::new(api)),
            RetryPolicy::new(2, Duration::from_millis(5)),
        )
    }

    fn id() -> ProductId {
        ProductId::parse("1005006123456").unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn returns_normalized_first_record_after_transient_failure() {
        let details = fetcher(FixedDetails {
            records: vec![record()],
            failures_before_success: 1,
            calls: AtomicU32::new(0),
        })
        .fetch(&id())
        .await
        .unwrap();
        assert_eq!(details.title, "Lamp");
        assert_eq!(details.price, Decimal::new(420, 2));
    }

    #[tokio::test]
    async fn empty_result_is_no_product_details() {
        let err = fetcher(FixedDetails {
            records: Vec::new(),
            failures_before_success: 0,
            calls: AtomicU32::new(0),
        })
        .fetch(&id())
        .await
        .unwrap_err();
        assert!(matches!(err, AffiliateError::NoProductDetails { ref product_id } if product_id == "1005006123456"));
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_failure_propagates_last_error() {
        let err = fetcher(FixedDetails {
            records: vec![record()],
            failures_before_success: 10,
            calls: AtomicU32::new(0),
        })
        .fetch(&id())
        .await
        .unwrap_err();
        assert!(matches!(err, AffiliateError::Api { .. }));
    }

    #[tokio::test]
    async fn uninitialized_client_is_an_error() {
        let err = ProductDetailFetcher::new(None, RetryPolicy::default())
            .fetch(&id())
            .await
            .unwrap_err();
        assert!(matches!(err, AffiliateError::NotInitialized));
    }
}
