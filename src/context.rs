//! Ambient request context and best-effort accessors over it.
//!
//! The store itself is owned elsewhere; this module only reads it. Every
//! accessor turns a failed lookup (an `Err`, or a panic inside the store)
//! into `None` so that a log call can never fail because context is
//! missing.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

/// Kind of actor behind the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityType {
    User,
    Tenant,
    Instance,
    App,
}

impl IdentityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityType::User => "user",
            IdentityType::Tenant => "tenant",
            IdentityType::Instance => "instance",
            IdentityType::App => "app",
        }
    }
}

/// The actor the current request runs as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: IdentityType,
}

impl Identity {
    pub fn new(id: impl Into<String>, kind: IdentityType) -> Self {
        Identity { id: id.into(), kind }
    }
}

/// Failure reported by a [`ContextStore`] lookup.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("no active request context")]
    NoActiveContext,

    #[error("request context has no {0}")]
    Missing(&'static str),
}

/// Externally-owned source of ambient request state.
///
/// Lookups are allowed to fail; callers in the logging path go through the
/// accessor functions of this module, which never propagate those failures.
pub trait ContextStore: Send + Sync {
    fn tenant_id(&self) -> Result<String, ContextError>;

    fn app_id(&self) -> Result<String, ContextError>;

    fn identity(&self) -> Result<Identity, ContextError>;

    /// Correlation ID of the current request, if one has been assigned.
    fn correlation_id(&self) -> Option<String> {
        None
    }
}

// Panics are contained but still reach the panic hook (stderr by default),
// and nothing is contained when built with `panic = "abort"`.
fn guarded<T>(lookup: impl FnOnce() -> Result<T, ContextError>) -> Option<T> {
    panic::catch_unwind(AssertUnwindSafe(lookup))
        .ok()
        .and_then(Result::ok)
}

pub fn tenant_id(store: &dyn ContextStore) -> Option<String> {
    guarded(|| store.tenant_id())
}

pub fn app_id(store: &dyn ContextStore) -> Option<String> {
    guarded(|| store.app_id())
}

pub fn identity(store: &dyn ContextStore) -> Option<Identity> {
    guarded(|| store.identity())
}

pub fn correlation_id(store: &dyn ContextStore) -> Option<String> {
    guarded(|| Ok(store.correlation_id())).flatten()
}

/// Context fields read once per log call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextSnapshot {
    pub tenant_id: Option<String>,
    pub app_id: Option<String>,
    pub identity_id: Option<String>,
    pub identity_type: Option<IdentityType>,
    pub correlation_id: Option<String>,
}

impl ContextSnapshot {
    pub fn capture(store: &dyn ContextStore) -> Self {
        let identity = identity(store);
        ContextSnapshot {
            tenant_id: tenant_id(store),
            app_id: app_id(store),
            identity_id: identity.as_ref().map(|i| i.id.clone()),
            identity_type: identity.map(|i| i.kind),
            correlation_id: correlation_id(store),
        }
    }
}

/// Request-scoped values made available through [`TaskContextStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub tenant_id: Option<String>,
    pub app_id: Option<String>,
    pub identity: Option<Identity>,
    pub correlation_id: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn app(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

tokio::task_local! {
    static ACTIVE_CONTEXT: RequestContext;
}

/// Run `fut` with `ctx` as the ambient request context.
pub async fn with_request_context<Fut, T>(ctx: RequestContext, fut: Fut) -> T
where
    Fut: Future<Output = T>,
{
    ACTIVE_CONTEXT.scope(ctx, fut).await
}

/// Synchronous counterpart of [`with_request_context`].
pub fn sync_scope<F, T>(ctx: RequestContext, f: F) -> T
where
    F: FnOnce() -> T,
{
    ACTIVE_CONTEXT.sync_scope(ctx, f)
}

/// Default [`ContextStore`] reading the task-local [`RequestContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskContextStore;

impl TaskContextStore {
    fn read<T>(
        field: &'static str,
        get: impl FnOnce(&RequestContext) -> Option<T>,
    ) -> Result<T, ContextError> {
        ACTIVE_CONTEXT
            .try_with(get)
            .map_err(|_| ContextError::NoActiveContext)?
            .ok_or(ContextError::Missing(field))
    }
}

impl ContextStore for TaskContextStore {
    fn tenant_id(&self) -> Result<String, ContextError> {
        Self::read("tenant id", |ctx| ctx.tenant_id.clone())
    }

    fn app_id(&self) -> Result<String, ContextError> {
        Self::read("app id", |ctx| ctx.app_id.clone())
    }

    fn identity(&self) -> Result<Identity, ContextError> {
        Self::read("identity", |ctx| ctx.identity.clone())
    }

    fn correlation_id(&self) -> Option<String> {
        ACTIVE_CONTEXT
            .try_with(|ctx| ctx.correlation_id.clone())
            .ok()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PanickingStore;

    impl ContextStore for PanickingStore {
        fn tenant_id(&self) -> Result<String, ContextError> {
            panic!("store poisoned")
        }

        fn app_id(&self) -> Result<String, ContextError> {
            Err(ContextError::NoActiveContext)
        }

        fn identity(&self) -> Result<Identity, ContextError> {
            Err(ContextError::Missing("identity"))
        }
    }

    #[test]
    fn store_outside_scope_reports_no_context() {
        assert_eq!(TaskContextStore.tenant_id(), Err(ContextError::NoActiveContext));
        assert_eq!(tenant_id(&TaskContextStore), None);
        assert_eq!(ContextSnapshot::capture(&TaskContextStore), ContextSnapshot::default());
    }

    #[test]
    fn sync_scope_exposes_fields() {
        let ctx = RequestContext::new()
            .tenant("t1")
            .identity(Identity::new("us_1", IdentityType::User))
            .correlation("corr-1");

        let snapshot = sync_scope(ctx, || {
            assert_eq!(TaskContextStore.app_id(), Err(ContextError::Missing("app id")));
            ContextSnapshot::capture(&TaskContextStore)
        });

        assert_eq!(snapshot.tenant_id.as_deref(), Some("t1"));
        assert_eq!(snapshot.app_id, None);
        assert_eq!(snapshot.identity_id.as_deref(), Some("us_1"));
        assert_eq!(snapshot.identity_type, Some(IdentityType::User));
        assert_eq!(snapshot.correlation_id.as_deref(), Some("corr-1"));
    }

    #[test]
    fn accessors_contain_errors_and_panics() {
        let store = PanickingStore;
        assert_eq!(tenant_id(&store), None);
        assert_eq!(app_id(&store), None);
        assert_eq!(identity(&store), None);
        assert_eq!(correlation_id(&store), None);
    }

    #[tokio::test]
    async fn context_follows_the_task() {
        let ctx = RequestContext::new().app("app_1");
        let app = with_request_context(ctx, async {
            tokio::task::yield_now().await;
            app_id(&TaskContextStore)
        })
        .await;
        assert_eq!(app.as_deref(), Some("app_1"));
    }
}
