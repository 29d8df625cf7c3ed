use thiserror::Error;

/// Errors returned by the AliExpress affiliate API layer.
#[derive(Debug, Error)]
pub enum AffiliateError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway or the business method reported an error.
    #[error("AliExpress API error {code}: {message}")]
    Api { code: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// No API client was constructed at startup.
    #[error("AliExpress API client not initialized")]
    NotInitialized,

    /// The detail endpoint answered but returned zero records.
    #[error("no product details returned for product {product_id}")]
    NoProductDetails { product_id: String },

    #[error("invalid API base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
