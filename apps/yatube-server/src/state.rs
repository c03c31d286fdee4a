//! Application state - shared across all handlers.

use std::sync::Arc;

use yatube_core::ports::{GroupRepository, PasswordService, PostRepository, UserRepository};
use yatube_core::services::{AccountService, GroupService, PostService};
use yatube_infra::{
    Argon2PasswordService, InMemoryGroupRepository, InMemoryPostRepository, InMemoryUserRepository,
};

use crate::config::{AppConfig, SiteSettings};

/// The storage backends the services run on.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
        }
    }

    /// Connect to PostgreSQL when configured, otherwise fall back to memory.
    #[cfg(feature = "postgres")]
    pub async fn from_config(config: &AppConfig) -> Self {
        use migration::{Migrator, MigratorTrait};
        use yatube_infra::database::connect;
        use yatube_infra::{
            PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
        };

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        let conn = match connect(db_config).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return Self::in_memory();
            }
        };

        if config.run_migrations {
            if let Err(e) = Migrator::up(&conn, None).await {
                tracing::error!("Migrations failed: {}. Using in-memory fallback.", e);
                return Self::in_memory();
            }
            tracing::info!("Migrations applied");
        }

        Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            groups: Arc::new(PostgresGroupRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn)),
        }
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn from_config(_config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::in_memory()
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub groups: GroupService,
    pub accounts: AccountService,
    pub site: SiteSettings,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Repositories::from_config(config).await;
        let state = Self::from_repositories(
            repos,
            Arc::new(Argon2PasswordService::new()),
            config.site.clone(),
        );

        tracing::info!("Application state initialized");
        state
    }

    pub fn from_repositories(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        site: SiteSettings,
    ) -> Self {
        Self {
            posts: PostService::new(
                repos.posts,
                repos.groups.clone(),
                repos.users.clone(),
                site.posts_per_page,
            ),
            groups: GroupService::new(repos.groups),
            accounts: AccountService::new(repos.users, passwords),
            site,
        }
    }
}
