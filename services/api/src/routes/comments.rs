//! Comment handlers, nested under a review

use axum::{
    Json,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{ApiError, ApiResult, ValidationErrors},
    extract::{ApiPath, ApiQuery, JsonBody},
    middleware::AuthUser,
    models::{
        PageQuery,
        comment::{Comment, CommentRequest, CommentResponse},
    },
    pagination::Page,
    permissions::{Access, CONTENT},
    routes::reviews::load_review,
    validation::validate_text,
};

async fn load_comment(
    state: &AppState,
    title_id: i64,
    review_id: i64,
    comment_id: i64,
) -> ApiResult<Comment> {
    load_review(state, title_id, review_id).await?;
    state
        .comment_repository
        .find(review_id, comment_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment"))
}

pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath((title_id, review_id)): ApiPath<(i64, i64)>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<Page<CommentResponse>>> {
    load_review(&state, title_id, review_id).await?;

    let page = query.page_request(state.page_size);
    let (comments, count) = state.comment_repository.list(review_id, page).await?;

    Ok(Json(Page::build(comments, count, page)?.map(CommentResponse::from)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    ApiPath((title_id, review_id, comment_id)): ApiPath<(i64, i64, i64)>,
) -> ApiResult<Json<CommentResponse>> {
    let comment = load_comment(&state, title_id, review_id, comment_id).await?;
    Ok(Json(comment.into()))
}

pub async fn create_comment(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath((title_id, review_id)): ApiPath<(i64, i64)>,
    JsonBody(payload): JsonBody<CommentRequest>,
) -> ApiResult<impl IntoResponse> {
    Access::new(&method, user.as_ref()).check(&CONTENT)?;
    let author = user.as_ref().ok_or(ApiError::Unauthorized)?;

    load_review(&state, title_id, review_id).await?;

    let mut errors = ValidationErrors::new();
    let Some(text) = errors.required_text("text", payload.text) else {
        return Err(ApiError::Validation(errors));
    };

    let comment = state
        .comment_repository
        .create(review_id, author.id, &text)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

pub async fn update_comment(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath((title_id, review_id, comment_id)): ApiPath<(i64, i64, i64)>,
    JsonBody(payload): JsonBody<CommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let access = Access::new(&method, user.as_ref());
    access.check(&CONTENT)?;

    let comment = load_comment(&state, title_id, review_id, comment_id).await?;
    access.check_object(&CONTENT, comment.author_id)?;

    let Some(text) = payload.text else {
        return Ok(Json(comment.into()));
    };
    let mut errors = ValidationErrors::new();
    errors.check("text", validate_text(&text));
    errors.into_result()?;

    let comment = state
        .comment_repository
        .update(comment.id, &text)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment"))?;

    Ok(Json(comment.into()))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath((title_id, review_id, comment_id)): ApiPath<(i64, i64, i64)>,
) -> ApiResult<StatusCode> {
    let access = Access::new(&method, user.as_ref());
    access.check(&CONTENT)?;

    let comment = load_comment(&state, title_id, review_id, comment_id).await?;
    access.check_object(&CONTENT, comment.author_id)?;

    if state.comment_repository.delete(comment.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Comment"))
    }
}
