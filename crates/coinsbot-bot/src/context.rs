use std::sync::Arc;
use std::time::Duration;

use coinsbot_affiliate::{
    AffiliateApi, AliexpressClient, CampaignLinkGenerator, Credentials, ProductDetailFetcher,
    RetryPolicy,
};
use coinsbot_core::AppConfig;
use coinsbot_links::LinkResolver;

use crate::chat::ChatApi;
use crate::dispatch::MessageDispatcher;
use crate::pipeline::Pipeline;
use crate::pool::WorkerPool;

/// Long-lived services shared by every update.
pub struct AppContext {
    pub pipeline: Arc<Pipeline>,
    pub pool: WorkerPool,
}

impl AppContext {
    /// Builds the HTTP collaborators and the worker pool from configuration.
    ///
    /// A failure to construct the affiliate client is logged and tolerated:
    /// the bot keeps running, campaign links come back empty and detail
    /// lookups fail with a user-visible error.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect-resolution client cannot be built.
    pub fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let resolver = LinkResolver::new(
            Duration::from_secs(config.resolve_timeout_secs),
            &config.user_agent,
        )?;

        let api = affiliate_api(config);
        let retry = RetryPolicy::new(config.api_max_retries, config.api_retry_backoff());
        let pipeline = Pipeline::new(
            Arc::new(resolver),
            CampaignLinkGenerator::new(api.clone(), retry, config.affiliate_throttle()),
            ProductDetailFetcher::new(api, retry),
        );

        let pool = WorkerPool::new(config.worker_pool_size);
        tracing::info!(
            workers = pool.size(),
            retries = retry.retries,
            throttle_ms = config.affiliate_throttle_ms,
            "application context ready"
        );

        Ok(Self {
            pipeline: Arc::new(pipeline),
            pool,
        })
    }

    #[must_use]
    pub fn dispatcher(&self, chat: Arc<dyn ChatApi>) -> MessageDispatcher {
        MessageDispatcher::new(chat, Arc::clone(&self.pipeline), self.pool.clone())
    }
}

fn affiliate_api(config: &AppConfig) -> Option<Arc<dyn AffiliateApi>> {
    let credentials = Credentials {
        app_key: config.aliexpress_app_key.clone(),
        app_secret: config.aliexpress_app_secret.clone(),
        tracking_id: config.aliexpress_tracking_id.clone(),
    };
    match AliexpressClient::with_base_url(
        credentials,
        config.api_timeout_secs,
        &config.aliexpress_api_url,
    ) {
        Ok(client) => {
            let api: Arc<dyn AffiliateApi> = Arc::new(
                client.with_locale(&config.aliexpress_language, &config.aliexpress_currency),
            );
            Some(api)
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize AliExpress API client");
            None
        }
    }
}
