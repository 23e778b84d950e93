//! Account management handlers
//!
//! `/users` and `/users/{username}` are admin-only. `/users/me` lets any
//! authenticated caller read and edit their own profile, except the role.

use auth::{
    Role,
    validation::{validate_email, validate_person_name, validate_username},
};
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
        SearchQuery,
        user::{
            CreateUserRequest, NewUser, UpdateProfileRequest, UpdateUserRequest, User, UserResponse,
        },
    },
    pagination::Page,
    permissions::{Access, IsAdmin, IsAuthenticated},
};

/// Validate the account fields present in a payload
///
/// `except` is the account being edited, so that keeping one's own username
/// or email does not count as a conflict.
async fn check_account_fields(
    state: &AppState,
    errors: &mut ValidationErrors,
    changes: &UpdateUserRequest,
    except: Option<i64>,
) -> ApiResult<()> {
    if let Some(username) = &changes.username {
        errors.check("username", validate_username(username));
        if errors.get("username").is_none()
            && state.user_repository.username_taken(username, except).await?
        {
            errors.add("username", "A user with that username already exists.");
        }
    }

    if let Some(email) = &changes.email {
        errors.check("email", validate_email(email));
        if errors.get("email").is_none() && state.user_repository.email_taken(email, except).await? {
            errors.add("email", "A user with that email already exists.");
        }
    }

    if let Some(first_name) = &changes.first_name {
        errors.check("first_name", validate_person_name(first_name));
    }
    if let Some(last_name) = &changes.last_name {
        errors.check("last_name", validate_person_name(last_name));
    }

    Ok(())
}

async fn find_user(state: &AppState, username: &str) -> ApiResult<User> {
    state
        .user_repository
        .find_by_username(username)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))
}

/// List accounts; `?search=` matches a username exactly
pub async fn list_users(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<Page<UserResponse>>> {
    Access::new(&method, user.as_ref()).check(&IsAdmin)?;

    let page = query.page_request(state.page_size);
    let (users, count) = state.user_repository.list(query.term(), page).await?;

    Ok(Json(Page::build(users, count, page)?.map(UserResponse::from)))
}

/// Create an account on behalf of someone
pub async fn create_user(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    Access::new(&method, user.as_ref()).check(&IsAdmin)?;

    let mut errors = ValidationErrors::new();
    let username = errors.required_text("username", payload.username);
    let email = errors.required_text("email", payload.email);

    let fields = UpdateUserRequest {
        username,
        email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        bio: payload.bio,
        role: payload.role,
    };
    check_account_fields(&state, &mut errors, &fields, None).await?;

    let (Some(username), Some(email), true) = (fields.username, fields.email, errors.is_empty())
    else {
        return Err(ApiError::Validation(errors));
    };

    let created = state
        .user_repository
        .create(&NewUser {
            username,
            email,
            first_name: fields.first_name.unwrap_or_default(),
            last_name: fields.last_name.unwrap_or_default(),
            bio: fields.bio.unwrap_or_default(),
            role: fields.role.unwrap_or(Role::User),
            confirmation_code: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

pub async fn get_user(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<Json<UserResponse>> {
    Access::new(&method, user.as_ref()).check(&IsAdmin)?;

    let found = find_user(&state, &username).await?;
    Ok(Json(found.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath(username): ApiPath<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    Access::new(&method, user.as_ref()).check(&IsAdmin)?;

    let target = find_user(&state, &username).await?;

    let mut errors = ValidationErrors::new();
    check_account_fields(&state, &mut errors, &payload, Some(target.id)).await?;
    errors.into_result()?;

    let updated = state
        .user_repository
        .update(target.id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(updated.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    ApiPath(username): ApiPath<String>,
) -> ApiResult<StatusCode> {
    Access::new(&method, user.as_ref()).check(&IsAdmin)?;

    let target = find_user(&state, &username).await?;
    if state.user_repository.delete(target.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("User"))
    }
}

/// The caller's own profile
pub async fn get_me(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
) -> ApiResult<Json<UserResponse>> {
    Access::new(&method, user.as_ref()).check(&IsAuthenticated)?;
    let caller = user.ok_or(ApiError::Unauthorized)?;

    let me = state
        .user_repository
        .find_by_id(caller.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(me.into()))
}

/// Edit the caller's own profile; the role cannot be changed here
pub async fn update_me(
    State(state): State<AppState>,
    method: Method,
    user: Option<AuthUser>,
    JsonBody(payload): JsonBody<UpdateProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    Access::new(&method, user.as_ref()).check(&IsAuthenticated)?;
    let caller = user.ok_or(ApiError::Unauthorized)?;

    let payload = UpdateUserRequest::from(payload);

    let mut errors = ValidationErrors::new();
    check_account_fields(&state, &mut errors, &payload, Some(caller.id)).await?;
    errors.into_result()?;

    let me = state
        .user_repository
        .update(caller.id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(me.into()))
}
