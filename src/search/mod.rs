//! Name-search module / 姓名搜索模块
//!
//! Only provides search primitives; request validation and response shaping
//! live in the API layer. Call direction: api → search (unidirectional).
//!
//! Pipeline pieces:
//! - `query`: normalized text → AND-conjunction FTS5 expression (pure)
//! - `store`: single ranked, capped query against the registry (the only
//!   I/O point in the pipeline)

pub mod query;
pub mod store;

pub use query::SearchExpression;
pub use store::{HeroStore, RESULT_LIMIT};

use thiserror::Error;

/// Failure taxonomy for the search pipeline / 搜索错误分类
#[derive(Debug, Error)]
pub enum SearchError {
    /// No usable terms remain after normalization and token splitting.
    #[error("search query has no usable terms")]
    EmptyQuery,

    /// The store rejected the expression as malformed. Unreachable as long
    /// as expression escaping is correct; handled rather than crashed on.
    #[error("store rejected search expression: {0}")]
    QueryRejected(String),

    /// The store could not be reached, errored, or timed out.
    #[error("search store unavailable: {0}")]
    StoreUnavailable(String),
}
