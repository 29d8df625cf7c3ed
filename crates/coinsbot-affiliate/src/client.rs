//! HTTP client for the AliExpress affiliate open-platform API.
//!
//! Every call is a signed form POST to the `/sync` gateway. Business methods
//! answer inside `<method>_response.resp_result`; gateway failures (bad
//! signature, unknown app key, throttling) come back as `error_response` or
//! as a top-level `code`/`message` pair and surface as
//! [`AffiliateError::Api`].

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use coinsbot_core::ProductId;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::AffiliateApi;
use crate::error::AffiliateError;
use crate::sign::{sign_params, SIGN_METHOD};
use crate::types::{
    AffiliateLink, LinkGenerateResult, MethodResponse, ProductDetailResult, RawProduct,
};

pub const DEFAULT_BASE_URL: &str = "https://api-sg.aliexpress.com/sync";

const LINK_GENERATE_METHOD: &str = "aliexpress.affiliate.link.generate";
const PRODUCT_DETAIL_METHOD: &str = "aliexpress.affiliate.productdetail.get";

/// `promotion_link_type=0` requests ordinary (non hot-product) links.
const PROMOTION_LINK_TYPE: &str = "0";
const API_VERSION: &str = "2.0";
const SUCCESS_CODE: i64 = 200;

/// App credentials issued by the affiliate portal.
#[derive(Clone)]
pub struct Credentials {
    pub app_key: String,
    pub app_secret: String,
    pub tracking_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_key", &self.app_key)
            .field("app_secret", &"[redacted]")
            .field("tracking_id", &self.tracking_id)
            .finish()
    }
}

/// Signed client for the affiliate gateway.
///
/// Use [`AliexpressClient::new`] for production or
/// [`AliexpressClient::with_base_url`] to point at a mock server in tests.
pub struct AliexpressClient {
    client: Client,
    credentials: Credentials,
    endpoint: Url,
    language: String,
    currency: String,
}

impl AliexpressClient {
    /// Creates a client pointed at the production gateway.
    ///
    /// # Errors
    ///
    /// Returns [`AffiliateError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(credentials: Credentials, timeout_secs: u64) -> Result<Self, AffiliateError> {
        Self::with_base_url(credentials, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom gateway URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`AffiliateError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`AffiliateError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        credentials: Credentials,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AffiliateError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("coinsbot/0.1 (affiliate-links)")
            .build()?;

        let endpoint = Url::parse(base_url).map_err(|e| AffiliateError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            credentials,
            endpoint,
            language: "AR".to_owned(),
            currency: "USD".to_owned(),
        })
    }

    /// Overrides the product-detail language and currency (defaults `AR`/`USD`).
    #[must_use]
    pub fn with_locale(mut self, language: &str, currency: &str) -> Self {
        language.clone_into(&mut self.language);
        currency.clone_into(&mut self.currency);
        self
    }

    /// Builds the full signed parameter set for one call.
    fn signed_params(
        &self,
        method: &str,
        extra: &[(&str, &str)],
        timestamp_ms: i64,
    ) -> BTreeMap<String, String> {
        let mut params: BTreeMap<String, String> = [
            ("app_key", self.credentials.app_key.as_str()),
            ("method", method),
            ("sign_method", SIGN_METHOD),
            ("format", "json"),
            ("v", API_VERSION),
        ]
        .into_iter()
        .chain(extra.iter().copied())
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        params.insert("timestamp".to_owned(), timestamp_ms.to_string());

        let sign = sign_params(&self.credentials.app_secret, &params);
        params.insert("sign".to_owned(), sign);
        params
    }

    /// Sends a signed POST and returns the parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`AffiliateError::Http`] on network failure or a non-2xx status.
    /// Returns [`AffiliateError::Deserialize`] if the body is not valid JSON.
    async fn call(&self, method: &str, extra: &[(&str, &str)]) -> Result<Value, AffiliateError> {
        let params = self.signed_params(method, extra, chrono::Utc::now().timestamp_millis());
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&params)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AffiliateError::Deserialize {
            context: method.to_owned(),
            source: e,
        })
    }
}

#[async_trait]
impl AffiliateApi for AliexpressClient {
    async fn get_affiliate_links(
        &self,
        source_url: &str,
    ) -> Result<Vec<AffiliateLink>, AffiliateError> {
        let body = self
            .call(
                LINK_GENERATE_METHOD,
                &[
                    ("promotion_link_type", PROMOTION_LINK_TYPE),
                    ("source_values", source_url),
                    ("tracking_id", &self.credentials.tracking_id),
                ],
            )
            .await?;

        let result: LinkGenerateResult = parse_method_result(LINK_GENERATE_METHOD, body)?;
        Ok(result
            .promotion_links
            .map(|list| list.promotion_link)
            .unwrap_or_default())
    }

    async fn get_product_details(
        &self,
        product_ids: &[ProductId],
        fields: &[&str],
    ) -> Result<Vec<RawProduct>, AffiliateError> {
        let ids = product_ids
            .iter()
            .map(ProductId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let fields = fields.join(",");

        let body = self
            .call(
                PRODUCT_DETAIL_METHOD,
                &[
                    ("product_ids", &ids),
                    ("fields", &fields),
                    ("target_currency", &self.currency),
                    ("target_language", &self.language),
                    ("tracking_id", &self.credentials.tracking_id),
                ],
            )
            .await?;

        let result: ProductDetailResult = parse_method_result(PRODUCT_DETAIL_METHOD, body)?;
        Ok(result
            .products
            .map(|list| list.product)
            .unwrap_or_default())
    }
}

/// `aliexpress.affiliate.link.generate` → `aliexpress_affiliate_link_generate_response`.
fn response_key(method: &str) -> String {
    format!("{}_response", method.replace('.', "_"))
}

/// Surfaces gateway-level errors that precede any business payload.
fn check_api_error(body: &Value) -> Result<(), AffiliateError> {
    if let Some(err) = body.get("error_response") {
        let message = err
            .get("sub_msg")
            .or_else(|| err.get("msg"))
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(AffiliateError::Api {
            code: value_text(err.get("code")).unwrap_or_else(|| "unknown".to_owned()),
            message: message.to_owned(),
        });
    }

    if let Some(code) = value_text(body.get("code")).filter(|c| c != "0") {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(AffiliateError::Api {
            code,
            message: message.to_owned(),
        });
    }
    Ok(())
}

/// Unwraps `<method>_response.resp_result.result`.
///
/// A missing `result` is an empty payload, not an error.
fn parse_method_result<T>(method: &str, body: Value) -> Result<T, AffiliateError>
where
    T: DeserializeOwned + Default,
{
    check_api_error(&body)?;

    let key = response_key(method);
    let Some(inner) = body.get(&key).cloned() else {
        return Err(AffiliateError::Api {
            code: "missing_response".to_owned(),
            message: format!("response has no {key} member"),
        });
    };

    let envelope: MethodResponse<T> =
        serde_json::from_value(inner).map_err(|e| AffiliateError::Deserialize {
            context: key,
            source: e,
        })?;

    let Some(resp) = envelope.resp_result else {
        return Ok(T::default());
    };
    match resp.code() {
        Some(SUCCESS_CODE) | None => Ok(resp.result.unwrap_or_default()),
        Some(code) => Err(AffiliateError::Api {
            code: code.to_string(),
            message: resp.resp_msg.unwrap_or_else(|| "unknown error".to_owned()),
        }),
    }
}

fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
