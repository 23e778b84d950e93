//! Review handlers, nested under a title

use axum::{
    Json,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{ApiError, ApiResult, NON_FIELD_ERRORS, ValidationErrors},
    extract::{ApiPath, ApiQuery, JsonBody},
    middleware::AuthUser,
    models::{
        PageQuery,
        review::{Review, ReviewRequest, ReviewResponse},
    },
    pagination::Page,
    permissions::{Access, CONTENT},
    validation::{validate_score, validate_text},
};

async fn ensure_title(state: &AppState, title_id: i64) -> ApiResult<()> {
    if state.title_repository.exists(title_id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("Title"))
    }
}

/// Load a review, checking that it belongs to the title in the path
pub(crate) async fn load_review(state: &AppState, title_id: i64, review_id: i64) -> ApiResult<Review> {
    ensure_title(state, title_id).await?;
    state
        .review_repository
        .find(title_id, review_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Review"))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    ApiPath(title_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<Page<ReviewResponse>>> {
    ensure_title(&state, title_id).await?;

    let page = query.page_request(state.page_size);
    let (reviews, count) = state.review_repository.list(title_id, page).await?;

    Ok(Json(Page::build(reviews, count, page)?.map(ReviewResponse::from)))
}

pub async fn get_review(
    State(state): State<AppState>,
    ApiPath((title_id, review_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<ReviewResponse>> {
    let review = load_review(&state, title_id, review_id).await?;
    Ok(Json(review.into()))
}

/// Create a review; an author may review each title once
pub async fn create_review(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath(title_id): ApiPath<i64>,
    JsonBody(payload): JsonBody<ReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    let access = Access::new(&method, user.as_ref());
    access.check(&CONTENT)?;
    let author = user.as_ref().ok_or(ApiError::Unauthorized)?;

    ensure_title(&state, title_id).await?;

    let mut errors = ValidationErrors::new();
    let text = errors.required_text("text", payload.text);
    let score = errors.required("score", payload.score);
    if let Some(score) = score {
        errors.check("score", validate_score(score));
    }
    if state
        .review_repository
        .exists_for_author(title_id, author.id)
        .await?
    {
        errors.add(NON_FIELD_ERRORS, "You can leave only one review per title");
    }

    let (Some(text), Some(score), true) = (text, score, errors.is_empty()) else {
        return Err(ApiError::Validation(errors));
    };

    let review = state
        .review_repository
        .create(title_id, author.id, &text, score)
        .await?;

    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

pub async fn update_review(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath((title_id, review_id)): ApiPath<(i64, i64)>,
    JsonBody(payload): JsonBody<ReviewRequest>,
) -> ApiResult<Json<ReviewResponse>> {
    let access = Access::new(&method, user.as_ref());
    access.check(&CONTENT)?;

    let review = load_review(&state, title_id, review_id).await?;
    access.check_object(&CONTENT, review.author_id)?;

    let mut errors = ValidationErrors::new();
    if let Some(text) = &payload.text {
        errors.check("text", validate_text(text));
    }
    if let Some(score) = payload.score {
        errors.check("score", validate_score(score));
    }
    errors.into_result()?;

    let review = state
        .review_repository
        .update(review.id, payload.text.as_deref(), payload.score)
        .await?
        .ok_or_else(|| ApiError::not_found("Review"))?;

    Ok(Json(review.into()))
}

pub async fn delete_review(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath((title_id, review_id)): ApiPath<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let access = Access::new(&method, user.as_ref());
    access.check(&CONTENT)?;

    let review = load_review(&state, title_id, review_id).await?;
    access.check_object(&CONTENT, review.author_id)?;

    if state.review_repository.delete(review.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Review"))
    }
}
