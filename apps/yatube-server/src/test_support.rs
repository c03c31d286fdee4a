//! Shared fixture for handler tests: an in-memory site seeded with two users,
//! a staff account, one group and one post.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, http::header, web};

use yatube_core::domain::{Group, NewGroup, NewPost, NewUser, Post, User};
use yatube_core::ports::{
    BaseRepository, GroupRepository, PasswordService, PostRepository, TokenService,
    UserRepository,
};
use yatube_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use crate::config::SiteSettings;
use crate::handlers::configure_routes;
use crate::middleware::auth::{SESSION_COOKIE, session_cookie};
use crate::state::{AppState, Repositories};

pub const PASSWORD: &str = "correct-horse";

pub struct TestContext {
    pub state: AppState,
    pub tokens: Arc<dyn TokenService>,
    pub posts: Arc<dyn PostRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub user: User,
    pub author: User,
    pub staff: User,
    pub group: Group,
    pub post: Post,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_site(SiteSettings {
            staff_usernames: vec!["admin".to_string()],
            ..SiteSettings::default()
        })
        .await
    }

    pub async fn with_site(site: SiteSettings) -> Self {
        let repos = Repositories::in_memory();
        let passwords: Arc<dyn PasswordService> =
            Arc::new(Argon2PasswordService::with_params(8, 1, 1).unwrap());
        let hash = passwords.hash(PASSWORD).unwrap();

        let user = repos
            .users
            .create(NewUser::new("user".into(), None, hash.clone()))
            .await
            .unwrap();
        let author = repos
            .users
            .create(NewUser::new("author".into(), None, hash.clone()))
            .await
            .unwrap();
        let staff = repos
            .users
            .create(NewUser::new("admin".into(), None, hash))
            .await
            .unwrap();
        let group = repos
            .groups
            .create(NewGroup::new("Тестовая группа", "test_slug", "Тестовое описание"))
            .await
            .unwrap();
        let post = repos
            .posts
            .create(NewPost::new(author.id, "Тестовый пост".into(), Some(group.id)))
            .await
            .unwrap();

        let posts = repos.posts.clone();
        let groups = repos.groups.clone();
        let state = AppState::from_repositories(repos, passwords, site);

        Self {
            state,
            tokens: Arc::new(JwtTokenService::new(JwtConfig::default())),
            posts,
            groups,
            user,
            author,
            staff,
            group,
            post,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .app_data(web::Data::new(self.tokens.clone()))
            .configure(configure_routes)
    }

    /// A session cookie for `user`, as login would issue it.
    pub fn session_for(&self, user: &User) -> Cookie<'static> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username, self.state.site.roles_for(&user.username))
            .unwrap();
        session_cookie(token, self.tokens.expiration_seconds(), false)
    }

    pub async fn post_count(&self) -> u64 {
        self.posts.count().await.unwrap()
    }

    pub async fn stored_post(&self, id: i64) -> Post {
        self.posts.find_by_id(id).await.unwrap().expect("post exists")
    }
}

/// The `Location` header of a redirect.
pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .expect("a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// The session cookie a response sets, if any.
pub fn set_session<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}
