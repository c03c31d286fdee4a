//! Login, logout and sign-up.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use yatube_core::domain::User;
use yatube_core::ports::TokenService;
use yatube_core::services::SignupInput;
use yatube_shared::ApiResponse;
use yatube_shared::dto::{IdentityResponse, LoginForm, LoginPageResponse, NextQuery, SignupForm};

use super::redirect;
use crate::middleware::auth::{Identity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::urls;

/// Redirect to `location` with a fresh session for `user`.
fn open_session(
    state: &AppState,
    tokens: &dyn TokenService,
    user: &User,
    location: String,
) -> AppResult<HttpResponse> {
    let token = tokens
        .generate_token(user.id, &user.username, state.site.roles_for(&user.username))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut resp = redirect(location);
    resp.add_cookie(&session_cookie(
        token,
        tokens.expiration_seconds(),
        state.site.cookie_secure,
    ))
    .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(resp)
}

/// GET /auth/login/
pub async fn login_page(query: web::Query<NextQuery>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(LoginPageResponse {
        next: query.into_inner().next,
    }))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let user = state
        .accounts
        .authenticate(&form.username, &form.password)
        .await?;

    let location = query
        .into_inner()
        .next
        .filter(|next| urls::is_local(next))
        .unwrap_or_else(urls::index);

    tracing::info!(user_id = user.id, "User logged in");
    open_session(&state, tokens.get_ref().as_ref(), &user, location)
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    form: web::Form<SignupForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let user = state
        .accounts
        .signup(SignupInput {
            username: form.username,
            email: form.email,
            password: form.password,
        })
        .await?;

    open_session(&state, tokens.get_ref().as_ref(), &user, urls::index())
}

/// POST /auth/logout/
pub async fn logout(identity: Identity) -> AppResult<HttpResponse> {
    if let Some(user) = identity.user() {
        tracing::info!(user_id = user.user_id, "User logged out");
    }

    let mut resp = redirect(urls::index());
    resp.add_removal_cookie(&removal_cookie())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(resp)
}

/// GET /auth/me/
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    let user = identity.user().ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(IdentityResponse {
        id: user.user_id,
        username: user.username.clone(),
        roles: user.roles.clone(),
    })))
}
