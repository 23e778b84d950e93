//! Signup and token exchange
//!
//! Signing up mails a confirmation code to the given address. Exchanging the
//! username and that code yields a bearer token; the code is then cleared.

use auth::{
    Role,
    confirmation::{code_matches, generate_code},
    validation::{validate_email, validate_username},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, info};

use crate::{
    AppState,
    error::{ApiError, ApiResult, ValidationErrors},
    extract::JsonBody,
    models::user::{NewUser, SignupRequest, SignupResponse, TokenRequest, TokenResponse},
};

const SIGNUP_SUBJECT: &str = "YaMDb registration";

/// Register, or re-request a code for an existing registration
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> ApiResult<Json<SignupResponse>> {
    let mut errors = ValidationErrors::new();
    let email = errors.required_text("email", payload.email);
    let username = errors.required_text("username", payload.username);
    if let Some(email) = &email {
        errors.check("email", validate_email(email));
    }
    if let Some(username) = &username {
        errors.check("username", validate_username(username));
    }

    let (Some(email), Some(username), true) = (email, username, errors.is_empty()) else {
        return Err(ApiError::Validation(errors));
    };

    let code = generate_code();

    let existing = state.user_repository.find_by_email(&email).await?;
    match existing {
        Some(user) if user.username == username => {
            state
                .user_repository
                .set_confirmation_code(user.id, Some(&code))
                .await?;
            info!("Issued a new confirmation code for {}", username);
        }
        existing => {
            if existing.is_some() {
                errors.add("email", "A user with that email already exists.");
            }
            if state.user_repository.username_taken(&username, None).await? {
                errors.add("username", "A user with that username already exists.");
            }
            errors.into_result()?;

            state
                .user_repository
                .create(&NewUser {
                    username: username.clone(),
                    email: email.clone(),
                    first_name: String::new(),
                    last_name: String::new(),
                    bio: String::new(),
                    role: Role::User,
                    confirmation_code: Some(code.clone()),
                })
                .await?;
        }
    }

    state
        .mailer
        .send(&email, SIGNUP_SUBJECT, &format!("Your confirmation code: {}", code))
        .await
        .map_err(|e| {
            error!("Failed to send confirmation code to {}: {}", email, e);
            ApiError::InternalServerError
        })?;

    Ok(Json(SignupResponse { email, username }))
}

/// Exchange a confirmation code for a bearer token
pub async fn token(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<TokenRequest>,
) -> ApiResult<impl IntoResponse> {
    let mut errors = ValidationErrors::new();
    let username = errors.required_text("username", payload.username);
    let code = errors.required_text("confirmation_code", payload.confirmation_code);

    let (Some(username), Some(code), true) = (username, code, errors.is_empty()) else {
        return Err(ApiError::Validation(errors));
    };

    let user = state
        .user_repository
        .find_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    if !code_matches(user.confirmation_code.as_deref(), &code) {
        return Err(ApiError::BadRequest("Invalid confirmation code".to_string()));
    }

    let token = state
        .jwt_service
        .generate_access_token(user.id, &user.username)
        .map_err(|e| {
            error!("Failed to issue token: {}", e);
            ApiError::InternalServerError
        })?;

    state.user_repository.set_confirmation_code(user.id, None).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
