//! Application state shared across handlers

use auth::{jwt::JwtService, mail::Mailer};
use sqlx::PgPool;
use std::sync::Arc;

use crate::repositories::{
    CommentRepository, ReviewRepository, TaxonomyRepository, TitleRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    pub mailer: Arc<dyn Mailer>,
    pub user_repository: UserRepository,
    pub taxonomy_repository: TaxonomyRepository,
    pub title_repository: TitleRepository,
    pub review_repository: ReviewRepository,
    pub comment_repository: CommentRepository,
    /// Page size for list requests that do not ask for one
    pub page_size: u32,
}

impl AppState {
    pub fn new(db_pool: PgPool, jwt_service: JwtService, mailer: Arc<dyn Mailer>, page_size: u32) -> Self {
        Self {
            user_repository: UserRepository::new(db_pool.clone()),
            taxonomy_repository: TaxonomyRepository::new(db_pool.clone()),
            title_repository: TitleRepository::new(db_pool.clone()),
            review_repository: ReviewRepository::new(db_pool.clone()),
            comment_repository: CommentRepository::new(db_pool.clone()),
            db_pool,
            jwt_service: Arc::new(jwt_service),
            mailer,
            page_size,
        }
    }
}
