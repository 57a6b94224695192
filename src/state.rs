use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::convert::ConversionTable;
use crate::search::HeroStore;

/// Shared application state / 应用共享状态
///
/// Everything here is read-only after startup; requests share it without
/// locking.
pub struct AppState {
    /// 繁简转换表（进程级只读）
    pub conversion: Arc<ConversionTable>,
    pub store: HeroStore,
}

impl AppState {
    pub fn new(db: SqlitePool, conversion: Arc<ConversionTable>, store_timeout: Duration) -> Self {
        Self {
            conversion,
            store: HeroStore::new(db, store_timeout),
        }
    }
}
