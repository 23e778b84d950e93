//! API service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::{StatusCode, header::ALLOW},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::json;

use crate::{AppState, error::ApiError, middleware::auth_middleware, models::taxonomy::Taxonomy};

pub mod accounts;
pub mod comments;
pub mod reviews;
pub mod taxonomy;
pub mod titles;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let categories = Router::new()
        .route("/", get(taxonomy::list_terms).post(taxonomy::create_term))
        .route("/:slug", delete(taxonomy::delete_term))
        .layer(Extension(Taxonomy::Category));

    let genres = Router::new()
        .route("/", get(taxonomy::list_terms).post(taxonomy::create_term))
        .route("/:slug", delete(taxonomy::delete_term))
        .layer(Extension(Taxonomy::Genre));

    let titles = Router::new()
        .route("/", get(titles::list_titles).post(titles::create_title))
        .route(
            "/:title_id",
            get(titles::get_title)
                .patch(titles::update_title)
                .delete(titles::delete_title),
        )
        .route(
            "/:title_id/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/:title_id/reviews/:review_id",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route(
            "/:title_id/reviews/:review_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .route(
            "/:title_id/reviews/:review_id/comments/:comment_id",
            get(comments::get_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        );

    let users = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/me", get(users::get_me).patch(users::update_me))
        .route(
            "/:username",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        );

    let v1 = Router::new()
        .route("/auth/signup", post(accounts::signup))
        .route("/auth/token", post(accounts::token))
        .nest("/categories", categories)
        .nest("/genres", genres)
        .nest("/titles", titles)
        .nest("/users", users);

    Router::new()
        .route("/health", get(health_check))
        .nest("/v1", v1)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(middleware::map_response(method_not_allowed))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Give the router's empty 405 answers the API error body, keeping `Allow`
async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(ALLOW).cloned();
    let mut json = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        json.headers_mut().insert(ALLOW, allow);
    }
    json
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool).await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database { "ok" } else { "degraded" },
            "service": "yamdb-api",
            "database": database,
        })),
    )
}
