mod common;
pub use self::common::{Query, QueryCommon};

mod product;
pub use self::product::{ProductQuery, PRODUCT_FIELDS};
