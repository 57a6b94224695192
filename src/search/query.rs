//! Query builder - normalized text → FTS5 MATCH expression / 查询构造

use super::SearchError;

/// An AND-conjunction over literal name tokens / 全部词项必须命中的与查询
///
/// Tokens are the whitespace-delimited pieces of the normalized query, in
/// original order. AND is commutative, but order is preserved so the
/// rendered expression is reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchExpression {
    tokens: Vec<String>,
}

impl SearchExpression {
    /// Build an expression from normalized query text / 由规范化文本构造
    ///
    /// Splits on runs of whitespace and discards empty pieces. Tokens with
    /// no alphanumeric content are dropped too: unicode61 would tokenize
    /// them to an empty phrase, which can only ever match nothing. Fails
    /// with `EmptyQuery` when no token survives.
    pub fn build(normalized: &str) -> Result<Self, SearchError> {
        let tokens: Vec<String> = normalized
            .split_whitespace()
            .filter(|t| t.chars().any(char::is_alphanumeric))
            .map(str::to_owned)
            .collect();

        if tokens.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Render the FTS5 MATCH string actually sent to the store / 生成MATCH串
    ///
    /// Every token becomes a double-quoted FTS5 string literal with inner
    /// quotes doubled, joined with AND. Inside a quoted literal no FTS5
    /// operator syntax applies, so user input can never inject boolean or
    /// proximity operators.
    pub fn to_match_string(&self) -> String {
        self.tokens
            .iter()
            .map(|t| format!("\"{}\"", t.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}
