//! Session handling: the identity extractor and the session cookie.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Future, ready};
use std::pin::Pin;
use std::sync::Arc;

use yatube_core::DomainError;
use yatube_core::ports::{TokenClaims, TokenService};

use super::error::AppError;
use crate::config::SiteSettings;
use crate::state::AppState;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "yatube_session";

/// A logged-in user, as recorded in the session token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i64,
    pub username: String,
    pub roles: Vec<String>,
}

impl CurrentUser {
    /// Check if the user has a specific role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_staff(&self) -> bool {
        self.has_role(SiteSettings::STAFF_ROLE)
    }
}

impl From<TokenClaims> for CurrentUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            roles: claims.roles,
        }
    }
}

/// Who is making the request.
///
/// A missing, expired or forged token makes the caller anonymous, and pages
/// that need a session redirect to the login page. A valid token only counts
/// while the user it names still exists under the same username, so sessions
/// issued before a store was reset fall back to anonymous too.
/// ```ignore
/// async fn page(identity: Identity) -> AppResult<HttpResponse> {
///     let user = identity.require_login(urls::post_create())?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    User(CurrentUser),
}

impl Identity {
    /// The logged-in user, or a redirect to the login page that comes back to `next`.
    pub fn require_login(self, next: String) -> Result<CurrentUser, AppError> {
        match self {
            Identity::User(user) => Ok(user),
            Identity::Anonymous => Err(AppError::LoginRequired { next }),
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            Identity::User(user) => Some(user),
            Identity::Anonymous => None,
        }
    }

    /// Check the claims against the user store.
    async fn resolve(state: &AppState, claims: TokenClaims) -> Result<Self, AppError> {
        match state.accounts.user(claims.user_id).await {
            Ok(user) if user.username == claims.username => Ok(Identity::User(claims.into())),
            Ok(user) => {
                tracing::debug!(
                    user_id = user.id,
                    "Ignoring session token: username no longer matches"
                );
                Ok(Identity::Anonymous)
            }
            Err(DomainError::NotFound { .. }) => {
                tracing::debug!(
                    user_id = claims.user_id,
                    "Ignoring session token: user does not exist"
                );
                Ok(Identity::Anonymous)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(claims) = session_claims(req) else {
            return Box::pin(ready(Ok(Identity::Anonymous)));
        };

        let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
            tracing::error!("AppState not found in app data");
            return Box::pin(ready(Ok(Identity::Anonymous)));
        };

        Box::pin(async move { Ok(Identity::resolve(&state, claims).await?) })
    }
}

/// Claims of a valid session token, if the request carries one.
fn session_claims(req: &HttpRequest) -> Option<TokenClaims> {
    let Some(tokens) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not found in app data");
        return None;
    };

    let token = session_token(req)?;
    match tokens.validate_token(&token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Ignoring session token: {}", e);
            None
        }
    }
}

/// The token from the session cookie, or failing that a Bearer header.
fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

/// Cookie that opens a session.
pub fn session_cookie(token: String, max_age_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Cookie that closes the session.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    use crate::test_support::TestContext;

    fn request(ctx: &TestContext) -> TestRequest {
        TestRequest::default()
            .app_data(web::Data::new(ctx.state.clone()))
            .app_data(web::Data::new(ctx.tokens.clone()))
    }

    async fn extract(req: TestRequest) -> Identity {
        let req = req.to_http_request();
        Identity::from_request(&req, &mut Payload::None).await.unwrap()
    }

    #[actix_rt::test]
    async fn test_no_token_is_anonymous() {
        let ctx = TestContext::new().await;
        let identity = extract(request(&ctx)).await;
        assert!(identity.user().is_none());
    }

    #[actix_rt::test]
    async fn test_cookie_token_is_user() {
        let ctx = TestContext::new().await;

        let identity = extract(request(&ctx).cookie(ctx.session_for(&ctx.staff))).await;

        let user = identity.user().expect("logged in");
        assert_eq!(user.user_id, ctx.staff.id);
        assert_eq!(user.username, "admin");
        assert!(user.is_staff());
    }

    #[actix_rt::test]
    async fn test_bearer_token_is_accepted() {
        let ctx = TestContext::new().await;
        let token = ctx
            .tokens
            .generate_token(ctx.user.id, "user", Vec::new())
            .unwrap();

        let identity = extract(
            request(&ctx).insert_header((header::AUTHORIZATION, format!("Bearer {token}"))),
        )
        .await;

        let user = identity.user().expect("logged in");
        assert_eq!(user.user_id, ctx.user.id);
        assert!(!user.is_staff());
    }

    #[actix_rt::test]
    async fn test_forged_token_is_anonymous() {
        let ctx = TestContext::new().await;
        let identity =
            extract(request(&ctx).cookie(Cookie::new(SESSION_COOKIE, "not-a-jwt"))).await;
        assert!(identity.user().is_none());
    }

    #[actix_rt::test]
    async fn test_token_for_missing_user_is_anonymous() {
        let ctx = TestContext::new().await;
        let token = ctx.tokens.generate_token(999, "ghost", Vec::new()).unwrap();

        let identity = extract(request(&ctx).cookie(Cookie::new(SESSION_COOKIE, token))).await;

        assert!(identity.user().is_none());
    }

    #[actix_rt::test]
    async fn test_token_with_stale_username_is_anonymous() {
        let ctx = TestContext::new().await;
        let token = ctx
            .tokens
            .generate_token(ctx.author.id, "someone-else", Vec::new())
            .unwrap();

        let identity = extract(request(&ctx).cookie(Cookie::new(SESSION_COOKIE, token))).await;

        assert!(identity.user().is_none());
    }

    #[test]
    fn test_require_login_redirects_anonymous() {
        let err = Identity::Anonymous
            .require_login("/create/".to_string())
            .unwrap_err();
        assert!(matches!(err, AppError::LoginRequired { next } if next == "/create/"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), 3600, true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));

        let removal = removal_cookie();
        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(Duration::ZERO));
    }
}
