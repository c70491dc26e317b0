//! Permission cascades: several handlers registered on one path, each behind
//! its own permission gate.
//!
//! Tiers are tried in registration order. A tier whose gate answers
//! [`GateDecision::Skip`] hands the request to the next tier; a rejection
//! ends the request. If every tier skips, the request fails with an
//! authorization error.

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use futures::future::{BoxFuture, FutureExt};
use tracing::debug;

use warden_auth::{GateDecision, PermissionCheck};
use warden_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::state::AppState;

type TierHandler =
    dyn Fn(AppState, CurrentUser) -> BoxFuture<'static, Result<Response, ApiError>> + Send + Sync;

struct Tier {
    /// `None` admits every authenticated user.
    check: Option<PermissionCheck>,
    handler: Arc<TierHandler>,
}

/// Ordered authorization tiers for one route.
#[derive(Default)]
pub struct Cascade {
    tiers: Vec<Tier>,
}

impl std::fmt::Debug for Cascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<Option<&str>> = self
            .tiers
            .iter()
            .map(|t| t.check.as_ref().map(PermissionCheck::key))
            .collect();
        f.debug_struct("Cascade").field("tiers", &keys).finish()
    }
}

impl Cascade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tier served by `handler` when `check` passes.
    pub fn tier<F, Fut>(self, check: PermissionCheck, handler: F) -> Self
    where
        F: Fn(AppState, CurrentUser) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, ApiError>> + Send + 'static,
    {
        self.push(Some(check), handler)
    }

    /// Adds a tier open to any authenticated user.
    pub fn any_user<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(AppState, CurrentUser) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, ApiError>> + Send + 'static,
    {
        self.push(None, handler)
    }

    fn push<F, Fut>(mut self, check: Option<PermissionCheck>, handler: F) -> Self
    where
        F: Fn(AppState, CurrentUser) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, ApiError>> + Send + 'static,
    {
        self.tiers.push(Tier {
            check,
            handler: Arc::new(move |state, user| handler(state, user).boxed()),
        });
        self
    }

    /// Runs the tiers for one request.
    pub async fn dispatch(&self, state: AppState, user: CurrentUser) -> Result<Response, ApiError> {
        for (index, tier) in self.tiers.iter().enumerate() {
            let decision = match &tier.check {
                Some(check) => check.evaluate(&user.user).await,
                None => GateDecision::Continue,
            };

            match decision {
                GateDecision::Continue => {
                    debug!(username = %user.user.username, tier = index, "Serving cascade tier");
                    return (tier.handler)(state, user).await;
                }
                GateDecision::Skip => continue,
                GateDecision::Reject(err) => return Err(err.into()),
            }
        }

        debug!(username = %user.user.username, "No cascade tier admitted the caller");
        Err(AppError::authorization(format!(
            "{} is not permitted to access this route",
            user.user.username
        ))
        .into())
    }

    /// Converts the cascade into an Axum handler.
    pub fn into_handler(
        self,
    ) -> impl Fn(State<AppState>, CurrentUser) -> BoxFuture<'static, Result<Response, ApiError>>
    + Clone
    + Send
    + Sync
    + 'static {
        let cascade = Arc::new(self);
        move |State(state): State<AppState>, user: CurrentUser| {
            let cascade = Arc::clone(&cascade);
            async move { cascade.dispatch(state, user).await }.boxed()
        }
    }
}
