use rust_decimal::Decimal;

/// Localized placeholder shown when the affiliate API omits a store field.
pub const NOT_AVAILABLE: &str = "غير متوفر";

/// Platform-assigned numeric product identifier, e.g. `"1005006123456"`.
///
/// Kept as a string: ids routinely exceed 13 digits and are only ever
/// echoed back to the API, never used arithmetically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Accepts a non-empty run of ASCII digits.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(raw.to_owned()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Promotional mechanism a generated affiliate link belongs to.
///
/// Declaration order is the order links are generated and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampaignKind {
    /// Coin-discount landing page keyed by product id.
    Coin,
    /// Bundle-deal share page wrapping the original link (`sourceType=560`).
    Bundle,
    /// "Super" deals (`sourceType=562`).
    Super,
    /// Limited-time deals (`sourceType=561`).
    Limited,
}

impl CampaignKind {
    pub const ALL: [CampaignKind; 4] = [
        CampaignKind::Coin,
        CampaignKind::Bundle,
        CampaignKind::Super,
        CampaignKind::Limited,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignKind::Coin => "coin",
            CampaignKind::Bundle => "bundle",
            CampaignKind::Super => "super",
            CampaignKind::Limited => "limited",
        }
    }
}

impl std::fmt::Display for CampaignKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One optional promotion link per [`CampaignKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionLinks {
    pub coin: Option<String>,
    pub bundle: Option<String>,
    pub super_deal: Option<String>,
    pub limited: Option<String>,
}

impl PromotionLinks {
    #[must_use]
    pub fn get(&self, kind: CampaignKind) -> Option<&str> {
        match kind {
            CampaignKind::Coin => self.coin.as_deref(),
            CampaignKind::Bundle => self.bundle.as_deref(),
            CampaignKind::Super => self.super_deal.as_deref(),
            CampaignKind::Limited => self.limited.as_deref(),
        }
    }

    pub fn set(&mut self, kind: CampaignKind, link: Option<String>) {
        let slot = match kind {
            CampaignKind::Coin => &mut self.coin,
            CampaignKind::Bundle => &mut self.bundle,
            CampaignKind::Super => &mut self.super_deal,
            CampaignKind::Limited => &mut self.limited,
        };
        *slot = link;
    }

    /// Number of campaigns that produced a link.
    #[must_use]
    pub fn count(&self) -> usize {
        CampaignKind::ALL
            .iter()
            .filter(|k| self.get(**k).is_some())
            .count()
    }
}

/// Product metadata resolved from the affiliate API, with every source-side
/// naming variant already collapsed into one canonical field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub title: String,
    /// Sale price in the requested currency; `0` when the API value was
    /// missing or unparseable.
    pub price: Decimal,
    pub image_url: Option<String>,
    /// Store name, or [`NOT_AVAILABLE`].
    pub store_name: String,
    /// Seller positive-feedback rate as the API renders it (e.g. `"96.5%"`),
    /// or [`NOT_AVAILABLE`].
    pub seller_rating: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_accepts_digits() {
        let id = ProductId::parse("1005006123456").expect("digits should parse");
        assert_eq!(id.as_str(), "1005006123456");
        assert_eq!(id.to_string(), "1005006123456");
    }

    #[test]
    fn product_id_rejects_empty_and_non_digits() {
        assert!(ProductId::parse("").is_none());
        assert!(ProductId::parse("12ab").is_none());
        assert!(ProductId::parse(" 123").is_none());
    }

    #[test]
    fn campaign_order_is_coin_bundle_super_limited() {
        let names: Vec<&str> = CampaignKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["coin", "bundle", "super", "limited"]);
    }

    #[test]
    fn promotion_links_set_and_get_round_trip_per_kind() {
        let mut links = PromotionLinks::default();
        assert_eq!(links.count(), 0);

        links.set(CampaignKind::Super, Some("https://s.click/super".into()));
        assert_eq!(links.get(CampaignKind::Super), Some("https://s.click/super"));
        assert_eq!(links.get(CampaignKind::Coin), None);
        assert_eq!(links.count(), 1);

        links.set(CampaignKind::Super, None);
        assert_eq!(links.count(), 0);
    }
}
