//! Serde types for AliExpress affiliate API responses.
//!
//! Only the wrappers needed to reach the payload are typed. Product records
//! are kept as raw JSON objects because field naming drifts between API
//! versions and normalization probes several candidate names.

use serde::Deserialize;

/// A raw product record from `aliexpress.affiliate.productdetail.get`.
pub type RawProduct = serde_json::Map<String, serde_json::Value>;

/// One entry of `promotion_links.promotion_link`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AffiliateLink {
    #[serde(default)]
    pub promotion_link: String,
    #[serde(default)]
    pub source_value: Option<String>,
}

/// The `resp_result` wrapper shared by all affiliate business methods.
#[derive(Debug, Deserialize)]
pub(crate) struct RespResult<T> {
    pub resp_code: Option<serde_json::Value>,
    pub resp_msg: Option<String>,
    pub result: Option<T>,
}

impl<T> RespResult<T> {
    /// The gateway sends `resp_code` as a number but older SDKs saw strings.
    pub(crate) fn code(&self) -> Option<i64> {
        match self.resp_code.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MethodResponse<T> {
    pub resp_result: Option<RespResult<T>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LinkGenerateResult {
    #[serde(default)]
    pub promotion_links: Option<PromotionLinkList>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PromotionLinkList {
    #[serde(default)]
    pub promotion_link: Vec<AffiliateLink>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProductDetailResult {
    #[serde(default)]
    pub products: Option<ProductList>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProductList {
    #[serde(default)]
    pub product: Vec<RawProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resp_code_accepts_number_or_string() {
        let n: RespResult<()> = serde_json::from_str(r#"{"resp_code":200}"#).unwrap();
        let s: RespResult<()> = serde_json::from_str(r#"{"resp_code":"405"}"#).unwrap();
        assert_eq!(n.code(), Some(200));
        assert_eq!(s.code(), Some(405));
    }

    #[test]
    fn missing_promotion_links_is_empty() {
        let r: LinkGenerateResult = serde_json::from_str(r#"{"total_result_count":0}"#).unwrap();
        assert!(r.promotion_links.is_none());
    }

    #[test]
    fn affiliate_link_tolerates_missing_source_value() {
        let link: AffiliateLink =
            serde_json::from_str(r#"{"promotion_link":"https://s.click.aliexpress.com/e/_x"}"#)
                .unwrap();
        assert_eq!(link.promotion_link, "https://s.click.aliexpress.com/e/_x");
        assert_eq!(link.source_value, None);
    }
}
