//! Category and genre repository

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::{
    models::taxonomy::{Taxonomy, Term},
    pagination::PageRequest,
    repositories::contains_pattern,
};

/// Repository for the category and genre vocabularies
#[derive(Clone)]
pub struct TaxonomyRepository {
    pool: PgPool,
}

impl TaxonomyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List terms ordered by name, optionally filtered by a name substring
    pub async fn list(
        &self,
        taxonomy: Taxonomy,
        search: Option<&str>,
        page: PageRequest,
    ) -> DatabaseResult<(Vec<Term>, i64)> {
        let table = taxonomy.table();
        let pattern = search.map(contains_pattern);

        let terms = sqlx::query_as::<_, Term>(&format!(
            r#"
            SELECT id, name, slug
            FROM {table}
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {table} WHERE ($1::text IS NULL OR name ILIKE $1)"
        ))
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((terms, count))
    }

    /// Find a term by slug
    pub async fn find_by_slug(&self, taxonomy: Taxonomy, slug: &str) -> DatabaseResult<Option<Term>> {
        let table = taxonomy.table();
        let term = sqlx::query_as::<_, Term>(&format!(
            "SELECT id, name, slug FROM {table} WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(term)
    }

    /// Find every term whose slug is in `slugs`
    pub async fn find_by_slugs(&self, taxonomy: Taxonomy, slugs: &[String]) -> DatabaseResult<Vec<Term>> {
        let table = taxonomy.table();
        let terms = sqlx::query_as::<_, Term>(&format!(
            "SELECT id, name, slug FROM {table} WHERE slug = ANY($1) ORDER BY name, id"
        ))
        .bind(slugs)
        .fetch_all(&self.pool)
        .await?;

        Ok(terms)
    }

    /// Create a new term
    pub async fn create(&self, taxonomy: Taxonomy, name: &str, slug: &str) -> DatabaseResult<Term> {
        let table = taxonomy.table();
        let term = sqlx::query_as::<_, Term>(&format!(
            "INSERT INTO {table} (name, slug) VALUES ($1, $2) RETURNING id, name, slug"
        ))
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        info!("Created {} {}", taxonomy.label().to_lowercase(), term.slug);
        Ok(term)
    }

    /// Delete a term by slug, detaching it from titles first
    ///
    /// Titles in a deleted category lose their category; titles in a deleted
    /// genre just lose that genre.
    pub async fn delete(&self, taxonomy: Taxonomy, slug: &str) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await?;

        let id: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM {} WHERE slug = $1 FOR UPDATE",
            taxonomy.table()
        ))
        .bind(slug)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            return Ok(false);
        };

        match taxonomy {
            Taxonomy::Category => {
                sqlx::query("UPDATE titles SET category_id = NULL WHERE category_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("DELETE FROM categories WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
            Taxonomy::Genre => {
                sqlx::query("DELETE FROM genre_title WHERE genre_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("DELETE FROM genres WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        info!("Deleted {} {}", taxonomy.label().to_lowercase(), slug);
        Ok(true)
    }
}
