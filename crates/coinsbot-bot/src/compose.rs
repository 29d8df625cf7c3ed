//! Renders product details and promotion links into the reply text.

use coinsbot_core::{CampaignKind, ProductDetails, PromotionLinks};
use rust_decimal::RoundingStrategy;

use crate::messages::CHANNEL_URL;

/// Final reply: multi-line text plus the image to attach it to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub text: String,
    pub image_url: Option<String>,
}

/// Section header and link-line prefix per campaign.
fn section(kind: CampaignKind) -> (&'static str, &'static str) {
    match kind {
        CampaignKind::Coin => ("تخفيض النقاط", "💰 رابط النقاط: "),
        CampaignKind::Bundle => ("تخفيض عروض باندلز", "📦 رابط الحزمة: "),
        CampaignKind::Super => ("رابط تخفيض الســوبر", "💎 سوبر: "),
        CampaignKind::Limited => ("رابط التخفيض المحدود", "🔥 محدود: "),
    }
}

/// Builds the reply. Every campaign header is always present; a link line
/// (preceded by a blank line) follows only when that campaign produced one.
#[must_use]
pub fn compose(details: &ProductDetails, links: &PromotionLinks) -> ComposedMessage {
    let price = details
        .price
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);

    let mut lines: Vec<String> = vec![
        format!("📦 {}", details.title),
        format!(
            "⭐️ المتجر: {}  —  تقييم المتجر: {}",
            details.store_name, details.seller_rating
        ),
        format!("💰 السعر: {price:.2}$"),
        String::new(),
        "تخفيضات ✨".to_owned(),
        String::new(),
        "نسبة تخفيض النقاط الجديدة :".to_owned(),
        String::new(),
        "✈️ ثمن الشحن: مجان".to_owned(),
        String::new(),
    ];

    for (i, kind) in CampaignKind::ALL.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let (header, prefix) = section(kind);
        lines.push(header.to_owned());
        if let Some(link) = links.get(kind) {
            lines.push(String::new());
            lines.push(format!("{prefix}{link}"));
        }
    }

    lines.push(String::new());
    lines.push(format!("❤️ اشترك في القناة للمزيد من العروض: {CHANNEL_URL}"));

    ComposedMessage {
        text: lines.join("\n"),
        image_url: details.image_url.clone(),
    }
}
