//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use warden_auth::{
    Authenticator, PasswordHasher, PermissionGate, PermissionResolver, RequestAuthenticator,
    TokenCodec,
};
use warden_core::config::AppConfig;
use warden_core::result::AppResult;
use warden_store::StoreRoleDirectory;
use warden_store::traits::{DocumentStore, UserDirectory};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Collaborators ────────────────────────────────────────
    /// Document store holding users and roles
    pub store: Arc<dyn DocumentStore>,
    /// Cached user lookups
    pub users: Arc<dyn UserDirectory>,

    // ── Auth ─────────────────────────────────────────────────
    /// Password hasher (Argon2id)
    pub password_hasher: Arc<PasswordHasher>,
    /// Session token codec
    pub token_codec: Arc<TokenCodec>,
    /// Login, renewal, logout, and password reset
    pub authenticator: Arc<Authenticator>,
    /// Per-request token authentication
    pub request_authenticator: Arc<RequestAuthenticator>,
    /// Permission gate over role grants
    pub permission_gate: PermissionGate,
}

impl AppState {
    /// Wires the auth components over the given store and user directory.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        users: Arc<dyn UserDirectory>,
    ) -> AppResult<Self> {
        let password_hasher = Arc::new(PasswordHasher::new(&config.auth)?);
        let token_codec = Arc::new(TokenCodec::new(&config.auth)?);

        let authenticator = Arc::new(Authenticator::new(
            Arc::clone(&token_codec),
            Arc::clone(&password_hasher),
            Arc::clone(&users),
            Arc::clone(&store),
        ));
        let request_authenticator = Arc::new(RequestAuthenticator::new(
            Arc::clone(&token_codec),
            Arc::clone(&users),
            config.auth.reset_path.clone(),
        ));

        let roles = Arc::new(StoreRoleDirectory::new(Arc::clone(&store)));
        let permission_gate = PermissionGate::new(Arc::new(PermissionResolver::new(roles)));

        Ok(Self {
            config: Arc::new(config),
            store,
            users,
            password_hasher,
            token_codec,
            authenticator,
            request_authenticator,
            permission_gate,
        })
    }
}
