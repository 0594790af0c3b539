pub mod error;
pub mod filter_where;
pub mod item_filter;
pub mod pagination;
pub mod types;

pub use error::FilterError;
pub use item_filter::ItemFilter;
pub use pagination::Pagination;
pub use types::*;
