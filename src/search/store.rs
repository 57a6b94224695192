//! Ranked retrieval against the registry database / 排序检索
//!
//! The single I/O point of the search pipeline: one FTS5 query, relevance
//! ranked, deterministically ordered, capped.

use std::time::Duration;

use sqlx::SqlitePool;

use super::{SearchError, SearchExpression};
use crate::models::HeroHit;

/// Hard cap on returned rows. The UI is a single-shot lookup, not a browse
/// interface; a larger ceiling belongs to a future API version.
pub const RESULT_LIMIT: i64 = 50;

/// Registry search store / 英烈记录检索
#[derive(Debug, Clone)]
pub struct HeroStore {
    db: SqlitePool,
    timeout: Duration,
}

impl HeroStore {
    pub fn new(db: SqlitePool, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    /// Execute a search expression / 执行搜索
    ///
    /// Ordering invariant: rank descending, then id ascending on ties.
    /// bm25() is smaller-is-better, so ascending bm25 is best-match-first
    /// and `-bm25` is exposed as the non-negative higher-is-better rank.
    pub async fn search(&self, expr: &SearchExpression) -> Result<Vec<HeroHit>, SearchError> {
        self.search_raw(&expr.to_match_string()).await
    }

    async fn search_raw(&self, match_query: &str) -> Result<Vec<HeroHit>, SearchError> {
        let query = sqlx::query_as::<_, HeroHit>(
            r#"
            SELECT
                h.id,
                h.name_traditional,
                h.name_simplified,
                h.martyrdom_date,
                h.enshrinement_date,
                h.location,
                -bm25(hero_fts) AS rank
            FROM hero_fts
            JOIN heroes h ON h.id = hero_fts.rowid
            WHERE hero_fts MATCH ?
            ORDER BY bm25(hero_fts) ASC, h.id ASC
            LIMIT ?
            "#,
        )
        .bind(match_query)
        .bind(RESULT_LIMIT);

        match tokio::time::timeout(self.timeout, query.fetch_all(&self.db)).await {
            Ok(Ok(rows)) => Ok(rows),
            Ok(Err(e)) => Err(classify(e)),
            Err(_) => Err(SearchError::StoreUnavailable(format!(
                "store query timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

/// Map a sqlx error to the search taxonomy / 错误分类
///
/// A syntax complaint from FTS5 means the expression itself was rejected;
/// everything else counts as the store being unavailable.
fn classify(err: sqlx::Error) -> SearchError {
    if let sqlx::Error::Database(ref db_err) = err {
        let msg = db_err.message().to_lowercase();
        if msg.contains("fts5") || msg.contains("malformed match") {
            return SearchError::QueryRejected(db_err.message().to_string());
        }
    }
    SearchError::StoreUnavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    // In-memory SQLite: one connection only, every connection has its own
    // private database / 内存库必须单连接
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn insert_hero(pool: &SqlitePool, id: i64, trad: &str, simp: &str) {
        sqlx::query(
            "INSERT INTO heroes (id, name_traditional, name_simplified, martyrdom_date, enshrinement_date, location)
             VALUES (?, ?, ?, '1940-05-16', '1946-05', '臺北市')",
        )
        .bind(id)
        .bind(trad)
        .bind(simp)
        .execute(pool)
        .await
        .unwrap();
    }

    fn store(pool: SqlitePool) -> HeroStore {
        HeroStore::new(pool, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_search_finds_match() {
        let pool = test_pool().await;
        insert_hero(&pool, 1, "陸皓東", "陆皓东").await;
        insert_hero(&pool, 2, "張自忠", "张自忠").await;
        let store = store(pool);

        let expr = SearchExpression::build("陆皓东").unwrap();
        let hits = store.search(&expr).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits[0].name_traditional, "陸皓東");
        assert_eq!(hits[0].name_simplified, "陆皓东");
        assert!(hits[0].rank >= 0.0);
    }

    #[tokio::test]
    async fn test_search_no_match_returns_empty() {
        let pool = test_pool().await;
        insert_hero(&pool, 1, "陸皓東", "陆皓东").await;
        let store = store(pool);

        let expr = SearchExpression::build("zzzznotaname").unwrap();
        let hits = store.search(&expr).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_and_requires_all_tokens() {
        let pool = test_pool().await;
        insert_hero(&pool, 1, "張三", "张三").await;
        insert_hero(&pool, 2, "張三 李四", "张三 李四").await;
        let store = store(pool);

        let expr = SearchExpression::build("张三 李四").unwrap();
        let hits = store.search(&expr).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[tokio::test]
    async fn test_result_cap_and_tie_break_by_id() {
        let pool = test_pool().await;
        // 60 identical names: every match has the same bm25 score, so the
        // ordering falls through to id ascending and the cap kicks in
        for id in 1..=60 {
            insert_hero(&pool, id, "趙登禹", "赵登禹").await;
        }
        let store = store(pool);

        let expr = SearchExpression::build("赵登禹").unwrap();
        let hits = store.search(&expr).await.unwrap();
        assert_eq!(hits.len(), RESULT_LIMIT as usize);

        for pair in hits.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.rank > b.rank || (a.rank == b.rank && a.id < b.id),
                "ordering violated: ({}, {}) before ({}, {})",
                a.rank,
                a.id,
                b.rank,
                b.id
            );
        }
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits.last().unwrap().id, 50);
    }

    #[tokio::test]
    async fn test_search_is_deterministic() {
        let pool = test_pool().await;
        for id in 1..=10 {
            insert_hero(&pool, id, "戴安瀾", "戴安澜").await;
        }
        let store = store(pool);

        let expr = SearchExpression::build("戴安澜").unwrap();
        let first = store.search(&expr).await.unwrap();
        let second = store.search(&expr).await.unwrap();
        let ids1: Vec<i64> = first.iter().map(|h| h.id).collect();
        let ids2: Vec<i64> = second.iter().map(|h| h.id).collect();
        assert_eq!(ids1, ids2);
    }

    #[tokio::test]
    async fn test_quoted_tokens_do_not_reach_fts_syntax() {
        let pool = test_pool().await;
        insert_hero(&pool, 1, "陸皓東", "陆皓东").await;
        let store = store(pool);

        // Would be operator soup unquoted; must come back as zero matches,
        // not QueryRejected
        let expr = SearchExpression::build("陆\" OR \"皓 NEAR AND NOT").unwrap();
        let hits = store.search(&expr).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_raw_expression_is_rejected() {
        let pool = test_pool().await;
        insert_hero(&pool, 1, "陸皓東", "陆皓东").await;
        let store = store(pool);

        // Bypasses the builder's escaping on purpose
        let err = store.search_raw("AND AND").await.unwrap_err();
        assert!(matches!(err, SearchError::QueryRejected(_)));
    }

    #[tokio::test]
    async fn test_closed_pool_is_store_unavailable() {
        let pool = test_pool().await;
        insert_hero(&pool, 1, "陸皓東", "陆皓东").await;
        let store = store(pool.clone());
        pool.close().await;

        let expr = SearchExpression::build("陆皓东").unwrap();
        let err = store.search(&expr).await.unwrap_err();
        assert!(matches!(err, SearchError::StoreUnavailable(_)));
    }
}
