mod page;
pub use self::page::ProductPage;

mod product;
pub use self::product::{Dimensions, Product, ProductID, ProductMeta};
