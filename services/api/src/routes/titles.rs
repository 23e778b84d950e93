//! Title handlers

use axum::{
    Json,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
};
use chrono::{Datelike, Utc};

use crate::{
    AppState,
    error::{ApiError, ApiResult, ValidationErrors},
    extract::{ApiPath, ApiQuery, JsonBody},
    middleware::AuthUser,
    models::{
        taxonomy::Taxonomy,
        title::{NewTitle, TitleChanges, TitleQuery, TitleRequest, TitleResponse},
    },
    pagination::Page,
    permissions::{Access, CATALOG},
    validation::{validate_name, validate_year},
};

/// List titles with filters
pub async fn list_titles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TitleQuery>,
) -> ApiResult<Json<Page<TitleResponse>>> {
    let page = query.page_request(state.page_size);
    let (titles, count) = state.title_repository.list(&query, page).await?;

    Ok(Json(Page::build(titles, count, page)?))
}

/// Get a title by ID
pub async fn get_title(
    State(state): State<AppState>,
    ApiPath(title_id): ApiPath<i64>,
) -> ApiResult<Json<TitleResponse>> {
    let title = state
        .title_repository
        .find(title_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Title"))?;

    Ok(Json(title))
}

/// Create a title
pub async fn create_title(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    JsonBody(payload): JsonBody<TitleRequest>,
) -> ApiResult<impl IntoResponse> {
    Access::new(&method, user.as_ref()).check(&CATALOG)?;

    let mut errors = ValidationErrors::new();
    let name = errors.required_text("name", payload.name);
    let year = errors.required("year", payload.year);
    let genre = errors.required("genre", payload.genre);
    let category = errors.required_text("category", payload.category);

    let changes = resolve_changes(
        &state,
        &mut errors,
        TitleRequest {
            name,
            year,
            description: payload.description,
            genre,
            category,
        },
    )
    .await?;

    let TitleChanges {
        name: Some(name),
        year: Some(year),
        description,
        category_id: Some(category_id),
        genre_ids: Some(genre_ids),
    } = changes
    else {
        return Err(ApiError::Validation(errors));
    };
    errors.into_result()?;

    let id = state
        .title_repository
        .create(&NewTitle {
            name,
            year,
            description: description.unwrap_or_default(),
            category_id,
            genre_ids,
        })
        .await?;

    let title = state
        .title_repository
        .find(id)
        .await?
        .ok_or(ApiError::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(title)))
}

/// Partially update a title
pub async fn update_title(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath(title_id): ApiPath<i64>,
    JsonBody(payload): JsonBody<TitleRequest>,
) -> ApiResult<Json<TitleResponse>> {
    Access::new(&method, user.as_ref()).check(&CATALOG)?;

    if !state.title_repository.exists(title_id).await? {
        return Err(ApiError::not_found("Title"));
    }

    let mut errors = ValidationErrors::new();
    let changes = resolve_changes(&state, &mut errors, payload).await?;
    errors.into_result()?;

    if !state.title_repository.update(title_id, &changes).await? {
        return Err(ApiError::not_found("Title"));
    }

    let title = state
        .title_repository
        .find(title_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Title"))?;

    Ok(Json(title))
}

/// Delete a title
pub async fn delete_title(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath(title_id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    Access::new(&method, user.as_ref()).check(&CATALOG)?;

    if state.title_repository.delete(title_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Title"))
    }
}

/// Validate the present fields and resolve category and genre slugs to IDs
async fn resolve_changes(
    state: &AppState,
    errors: &mut ValidationErrors,
    request: TitleRequest,
) -> ApiResult<TitleChanges> {
    if let Some(name) = &request.name {
        errors.check("name", validate_name(name));
    }
    if let Some(year) = request.year {
        errors.check("year", validate_year(year, Utc::now().year()));
    }

    let category_id = match &request.category {
        Some(slug) => {
            let category = state
                .taxonomy_repository
                .find_by_slug(Taxonomy::Category, slug)
                .await?;
            if category.is_none() {
                errors.add("category", format!("Category '{}' does not exist.", slug));
            }
            category.map(|term| term.id)
        }
        None => None,
    };

    let genre_ids = match &request.genre {
        Some(slugs) => {
            let genres = state
                .taxonomy_repository
                .find_by_slugs(Taxonomy::Genre, slugs)
                .await?;
            for slug in slugs {
                if !genres.iter().any(|genre| &genre.slug == slug) {
                    errors.add("genre", format!("Genre '{}' does not exist.", slug));
                }
            }
            Some(genres.into_iter().map(|genre| genre.id).collect())
        }
        None => None,
    };

    Ok(TitleChanges {
        name: request.name,
        year: request.year,
        description: request.description,
        category_id,
        genre_ids,
    })
}
