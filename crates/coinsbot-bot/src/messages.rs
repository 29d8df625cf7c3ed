//! Fixed user-facing texts and inline keyboards.

pub const WELCOME: &str = "👋 أهلاً ومرحباً بك في *بوت النقاط (Coins Bot)*\n\n\
🎯 مهمته زيادة نسبة التخفيض بالنقاط *(العملات)* حتى 55٪!\n\n\
📦 أرسل رابط المنتج من AliExpress وسأجهز لك روابط التخفيض والعروض 👇";

pub const STATUS_PREPARING: &str = "⏳ جاري تجهيز العروض... الرجاء الانتظار قليلاً";

pub const REJECT_NOT_PLATFORM_LINK: &str = "❌ يرجى إرسال رابط منتج من AliExpress.";

pub const NO_PRODUCT_ID: &str =
    "❌ لم أتمكن من استخراج معرّف المنتج (Product ID). تأكد من أن الرابط صحيح.";

pub const GENERIC_ERROR: &str = "❌ حدث خطأ أثناء معالجة الرابط. حاول مرة أخرى لاحقاً.";

pub const CHANNEL_URL: &str = "https://t.me/hmida92";

const DAILY_COINS_URL: &str = "https://s.click.aliexpress.com/e/_DdwUZVd";
const BUNDLE_DEALS_URL: &str = "https://www.aliexpress.com/ssr/300000512/BundleDeals2?spm=a1z65.home.3fornn&businessCode=guide&pha_manifest=ssr&_immersiveMode=true&disableNav=YES&wh_pid=300000512/BundleDeals2&wh_ttid=adc";
const HOW_IT_WORKS_URL: &str = "https://t.me/ShopAliExpressMaroc/9";

/// What pressing a button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Url(&'static str),
    /// Opens the inline-query share picker with an empty query.
    ShareInline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub action: ButtonAction,
}

/// The two inline keyboards the bot attaches, one button per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// Sent with the welcome text.
    Start,
    /// Sent with every product reply.
    Reply,
}

impl Keyboard {
    #[must_use]
    pub fn buttons(self) -> [Button; 4] {
        let last = match self {
            Keyboard::Start => Button {
                label: "🎬 شاهد كيفية عمل البوت 🎬",
                action: ButtonAction::Url(HOW_IT_WORKS_URL),
            },
            Keyboard::Reply => Button {
                label: "🔗 شارك هذا العرض",
                action: ButtonAction::ShareInline,
            },
        };
        [
            Button {
                label: "⭐️ صفحة مراجعة وجمع النقاط يوميا ⭐️",
                action: ButtonAction::Url(DAILY_COINS_URL),
            },
            Button {
                label: "📦 رابط الحزمة",
                action: ButtonAction::Url(BUNDLE_DEALS_URL),
            },
            Button {
                label: "❤️ اشترك في القناة للمزيد من العروض ❤️",
                action: ButtonAction::Url(CHANNEL_URL),
            },
            last,
        ]
    }
}
