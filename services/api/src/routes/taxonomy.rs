//! Category and genre handlers
//!
//! The same handlers serve both vocabularies; the router tags each nested
//! router with its [`Taxonomy`] through an `Extension` layer.

use axum::{
    Extension, Json,
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
        SearchQuery,
        taxonomy::{CreateTermRequest, Taxonomy, TermResponse},
    },
    pagination::Page,
    permissions::{Access, CATALOG},
    validation::{validate_name, validate_slug},
};

/// List terms, optionally searching by name
pub async fn list_terms(
    State(state): State<AppState>,
    Extension(taxonomy): Extension<Taxonomy>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Page<TermResponse>>> {
    let page = query.page_request(state.page_size);
    let (terms, count) = state
        .taxonomy_repository
        .list(taxonomy, query.term(), page)
        .await?;

    Ok(Json(Page::build(terms, count, page)?.map(TermResponse::from)))
}

/// Create a term
pub async fn create_term(
    State(state): State<AppState>,
    Extension(taxonomy): Extension<Taxonomy>,
    method: Method,
    user: Option<AuthUser>,
    JsonBody(payload): JsonBody<CreateTermRequest>,
) -> ApiResult<impl IntoResponse> {
    Access::new(&method, user.as_ref()).check(&CATALOG)?;

    let mut errors = ValidationErrors::new();
    let name = errors.required_text("name", payload.name);
    let slug = errors.required_text("slug", payload.slug);
    if let Some(name) = &name {
        errors.check("name", validate_name(name));
    }
    if let Some(slug) = &slug {
        errors.check("slug", validate_slug(slug));
        if errors.get("slug").is_none()
            && state.taxonomy_repository.find_by_slug(taxonomy, slug).await?.is_some()
        {
            errors.add(
                "slug",
                format!("{} with this slug already exists.", taxonomy.label()),
            );
        }
    }

    let (Some(name), Some(slug), true) = (name, slug, errors.is_empty()) else {
        return Err(ApiError::Validation(errors));
    };

    let term = state.taxonomy_repository.create(taxonomy, &name, &slug).await?;

    Ok((StatusCode::CREATED, Json(TermResponse::from(term))))
}

/// Delete a term by slug
pub async fn delete_term(
    State(state): State<AppState>,
    Extension(taxonomy): Extension<Taxonomy>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<StatusCode> {
    Access::new(&method, user.as_ref()).check(&CATALOG)?;

    if state.taxonomy_repository.delete(taxonomy, &slug).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(taxonomy.label()))
    }
}
