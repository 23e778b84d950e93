//! Title repository for database operations

use common::error::DatabaseResult;
use sqlx::{PgPool, Postgres, Row, Transaction};
use std::collections::HashMap;
use tracing::info;

use crate::{
    models::{
        taxonomy::TermResponse,
        title::{NewTitle, TitleChanges, TitleQuery, TitleRecord, TitleResponse},
    },
    pagination::PageRequest,
    repositories::contains_pattern,
};

const TITLE_SELECT: &str = r#"
    SELECT t.id, t.name, t.year, t.description,
           c.name AS category_name, c.slug AS category_slug,
           (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.id) AS rating
    FROM titles t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

const TITLE_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR t.name ILIKE $1)
      AND ($2::text IS NULL OR c.slug ILIKE $2)
      AND ($3::text IS NULL OR EXISTS (
            SELECT 1 FROM genre_title gt
            JOIN genres g ON g.id = gt.genre_id
            WHERE gt.title_id = t.id AND g.slug ILIKE $3))
      AND ($4::int IS NULL OR t.year = $4)
"#;

/// Title repository
#[derive(Clone)]
pub struct TitleRepository {
    pool: PgPool,
}

impl TitleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List titles ordered by name, applying the query filters
    pub async fn list(
        &self,
        query: &TitleQuery,
        page: PageRequest,
    ) -> DatabaseResult<(Vec<TitleResponse>, i64)> {
        let name = query.name.as_deref().map(contains_pattern);
        let category = query.category.as_deref().map(contains_pattern);
        let genre = query.genre.as_deref().map(contains_pattern);

        let records = sqlx::query_as::<_, TitleRecord>(&format!(
            "{TITLE_SELECT} {TITLE_FILTER} ORDER BY t.name, t.id LIMIT $5 OFFSET $6"
        ))
        .bind(&name)
        .bind(&category)
        .bind(&genre)
        .bind(query.year)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM titles t LEFT JOIN categories c ON c.id = t.category_id {TITLE_FILTER}"
        ))
        .bind(&name)
        .bind(&category)
        .bind(&genre)
        .bind(query.year)
        .fetch_one(&self.pool)
        .await?;

        let titles = self.attach_genres(records).await?;
        Ok((titles, count))
    }

    /// Find a title by ID
    pub async fn find(&self, id: i64) -> DatabaseResult<Option<TitleResponse>> {
        let record = sqlx::query_as::<_, TitleRecord>(&format!("{TITLE_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match record {
            Some(record) => Ok(self.attach_genres(vec![record]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Whether a title exists
    pub async fn exists(&self, id: i64) -> DatabaseResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Create a title with its genre links
    pub async fn create(&self, new_title: &NewTitle) -> DatabaseResult<i64> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new_title.name)
        .bind(new_title.year)
        .bind(&new_title.description)
        .bind(new_title.category_id)
        .fetch_one(&mut *tx)
        .await?;

        link_genres(&mut tx, id, &new_title.genre_ids).await?;
        tx.commit().await?;

        info!("Created title {} ({})", new_title.name, id);
        Ok(id)
    }

    /// Apply a partial update; a present genre list replaces the old one
    pub async fn update(&self, id: i64, changes: &TitleChanges) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(changes.year)
        .bind(&changes.description)
        .bind(changes.category_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(genre_ids) = &changes.genre_ids {
            sqlx::query("DELETE FROM genre_title WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            link_genres(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Delete a title together with its reviews, their comments and its genre links
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM comments WHERE review_id IN (SELECT id FROM reviews WHERE title_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM reviews WHERE title_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM genre_title WHERE title_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted title {}", id);
        }
        Ok(deleted)
    }

    async fn attach_genres(&self, records: Vec<TitleRecord>) -> DatabaseResult<Vec<TitleResponse>> {
        let ids: Vec<i64> = records.iter().map(|record| record.id).collect();

        let rows = sqlx::query(
            r#"
            SELECT gt.title_id, g.name, g.slug
            FROM genre_title gt
            JOIN genres g ON g.id = gt.genre_id
            WHERE gt.title_id = ANY($1)
            ORDER BY g.name, g.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<i64, Vec<TermResponse>> = HashMap::new();
        for row in rows {
            genres
                .entry(row.get("title_id"))
                .or_default()
                .push(TermResponse {
                    name: row.get("name"),
                    slug: row.get("slug"),
                });
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let genre = genres.remove(&record.id).unwrap_or_default();
                TitleResponse::from_record(record, genre)
            })
            .collect())
    }
}

async fn link_genres(
    tx: &mut Transaction<'_, Postgres>,
    title_id: i64,
    genre_ids: &[i64],
) -> DatabaseResult<()> {
    if genre_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO genre_title (genre_id, title_id)
        SELECT genre_id, $2 FROM UNNEST($1::bigint[]) AS genre_id
        ON CONFLICT (genre_id, title_id) DO NOTHING
        "#,
    )
    .bind(genre_ids)
    .bind(title_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
