use anyhow::Result;
use sqlx::SqlitePool;

/// Run database migrations / 运行数据库迁移
///
/// The registry itself is imported offline; this only guarantees the schema
/// and the FTS index exist. Re-running is safe (IF NOT EXISTS everywhere).
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS heroes (
            id INTEGER PRIMARY KEY,
            name_traditional TEXT NOT NULL,
            name_simplified TEXT NOT NULL,
            martyrdom_date TEXT,
            enshrinement_date TEXT,
            location TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // FTS5 external-content index over the simplified name.
    // unicode61 keeps a run of CJK ideographs as a single token, which matches
    // how whole names are queried / 简体姓名的FTS5全文索引
    sqlx::query(
        r#"
        CREATE VIRTUAL TABLE IF NOT EXISTS hero_fts USING fts5(
            name_simplified,
            content='heroes',
            content_rowid='id',
            tokenize='unicode61'
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Keep hero_fts in sync with heroes / 同步触发器
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS heroes_ai AFTER INSERT ON heroes BEGIN
            INSERT INTO hero_fts(rowid, name_simplified)
            VALUES (new.id, new.name_simplified);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS heroes_ad AFTER DELETE ON heroes BEGIN
            INSERT INTO hero_fts(hero_fts, rowid, name_simplified)
            VALUES ('delete', old.id, old.name_simplified);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS heroes_au AFTER UPDATE ON heroes BEGIN
            INSERT INTO hero_fts(hero_fts, rowid, name_simplified)
            VALUES ('delete', old.id, old.name_simplified);
            INSERT INTO hero_fts(rowid, name_simplified)
            VALUES (new.id, new.name_simplified);
        END
        "#,
    )
    .execute(pool)
    .await?;

    // Schema bookkeeping / 记录迁移时间
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query("INSERT OR REPLACE INTO schema_meta (key, value) VALUES ('migrated_at', ?)")
        .bind(&now)
        .execute(pool)
        .await?;

    Ok(())
}
