use serde::Serialize;

/// A registry row matched by a search, with its relevance rank / 查询命中的英烈记录
///
/// `rank` is `-bm25(...)` from the store: non-negative for matches, higher
/// means more relevant.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HeroHit {
    pub id: i64,
    /// 姓名（繁体）
    pub name_traditional: String,
    /// 简体姓名
    pub name_simplified: String,
    /// 殉難日期 - legacy JSON key kept for the existing frontend
    #[serde(rename = "date_field")]
    pub martyrdom_date: Option<String>,
    /// 入祀年月
    pub enshrinement_date: Option<String>,
    /// 奉祀地點
    pub location: Option<String>,
    pub rank: f64,
}
