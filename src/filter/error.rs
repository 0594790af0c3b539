use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid page: {0} (pages start at 1)")]
    InvalidPage(i64),

    #[error("Invalid page_size: {0} (must be at least 1)")]
    InvalidPageSize(i64),
}
