use psalo_core::escape_like;
use psalo_types::{SearchMode, SearchPage};

use crate::error::StoreError;
use crate::manager::StoreManager;

const COUNT_SQL: &str = r"SELECT COUNT(*) FROM words WHERE word LIKE ? ESCAPE '\'";

const PAGE_SQL: &str =
    r"SELECT word FROM words WHERE word LIKE ? ESCAPE '\' ORDER BY word LIMIT ? OFFSET ?";

/// `LIKE` pattern for an already case-folded query
pub fn build_pattern(query: &str, mode: SearchMode) -> String {
    let escaped = escape_like(query);
    match mode {
        SearchMode::StartsWith => format!("{escaped}%"),
        SearchMode::Contains => format!("%{escaped}%"),
    }
}

pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of matching words in ascending order. `page` is 1-based.
///
/// The total is an exact `COUNT(*)` over the same pattern, so the page count
/// stays correct at the cost of a second scan.
pub async fn search(
    store: &StoreManager,
    query: &str,
    mode: SearchMode,
    page: u32,
    limit: u32,
) -> Result<SearchPage, StoreError> {
    if page == 0 || limit == 0 {
        return Err(StoreError::InvalidPagination { page, limit });
    }

    let pool = store.connection().await?;
    let pattern = build_pattern(query, mode);
    let offset = i64::from(page - 1) * i64::from(limit);

    let total = sqlx::query_scalar::<_, i64>(COUNT_SQL)
        .bind(pattern.as_str())
        .fetch_one(&pool)
        .await?;

    let data = sqlx::query_scalar::<_, String>(PAGE_SQL)
        .bind(pattern.as_str())
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&pool)
        .await?;

    tracing::debug!(
        "search {:?} {:?}: page {} has {} of {} matches",
        query,
        mode,
        page,
        data.len(),
        total
    );

    Ok(SearchPage {
        data,
        page,
        total_pages: total_pages(total.max(0) as u64, limit),
    })
}

impl StoreManager {
    pub async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        page: u32,
        limit: u32,
    ) -> Result<SearchPage, StoreError> {
        search(self, query, mode, page, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_pattern() {
        assert_eq!(build_pattern("псы", SearchMode::StartsWith), "псы%");
    }

    #[test]
    fn contains_pattern() {
        assert_eq!(build_pattern("сы", SearchMode::Contains), "%сы%");
    }

    #[test]
    fn wildcards_in_query_are_escaped() {
        assert_eq!(build_pattern("100%", SearchMode::StartsWith), "100\\%%");
        assert_eq!(build_pattern("a_b", SearchMode::Contains), "%a\\_b%");
    }

    #[test]
    fn empty_query_matches_everything() {
        assert_eq!(build_pattern("", SearchMode::StartsWith), "%");
        assert_eq!(build_pattern("", SearchMode::Contains), "%%");
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 50), 0);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
        assert_eq!(total_pages(7, 3), 3);
    }
}
