use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::jwt::JwtKeys;
use crate::auth::password::PasswordHasher;
use crate::auth::repo::{MemoryUserStore, PgUserStore, UserStore};
use crate::config::{AppConfig, StoreKind};
use crate::db;

/// Shared per-process state. Everything in here is read-only after [`AppState::init`].
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub hasher: PasswordHasher,
    pub keys: Arc<JwtKeys>,
}

impl FromRef<AppState> for Arc<JwtKeys> {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let users: Arc<dyn UserStore> = match config.store {
            StoreKind::Postgres => {
                let pool = db::connect(&config.database_url).await?;
                db::migrate(&pool).await?;
                Arc::new(PgUserStore::new(pool))
            }
            StoreKind::Memory => {
                tracing::warn!("using in-memory user store; accounts are lost on restart");
                Arc::new(MemoryUserStore::new())
            }
        };
        Self::from_parts(&config, users)
    }

    pub fn from_parts(config: &AppConfig, users: Arc<dyn UserStore>) -> anyhow::Result<Self> {
        let hasher = PasswordHasher::new(config.hash)?;
        let keys = Arc::new(JwtKeys::from_config(&config.jwt));
        Ok(Self {
            users,
            hasher,
            keys,
        })
    }

    /// In-memory state with cheap hashing, for tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_parts(&Self::fake_config(), Arc::new(MemoryUserStore::new())).expect("fake state")
    }

    #[cfg(test)]
    pub fn fake_config() -> AppConfig {
        use crate::config::{HashConfig, JwtConfig};

        AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            database_url: String::new(),
            store: StoreKind::Memory,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60 * 24,
            },
            hash: HashConfig {
                memory_kib: 8 * 1024,
                iterations: 1,
                parallelism: 1,
            },
        }
    }
}
