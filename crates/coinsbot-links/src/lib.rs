//! Share-link handling: redirect resolution and product-id extraction.

pub mod extract;
pub mod resolve;

pub use extract::{extract_first_link, extract_product_id, is_platform_link};
pub use resolve::{redirect_target, LinkResolver, ResolveLink};
