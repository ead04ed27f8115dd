// ── Admin client ──
//
// The main entry point for consumers: one backend, one session, one local
// store. Collection reads live in `sync`, writes in `mutation`, and the
// public store/catalog calls in `catalog`; they are all inherent methods
// on `AdminClient`.

use std::sync::Arc;

use iiec_api::{ApiClient, TransportConfig};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::model::{Event, Product, Project, User};
use crate::session::{SessionGuard, SessionState, TokenStore};
use crate::store::DataStore;
use crate::stream::EntityStream;

/// Client for the IIEC admin backend.
///
/// Cheaply cloneable via `Arc<AdminClientInner>`.
#[derive(Clone)]
pub struct AdminClient {
    pub(crate) inner: Arc<AdminClientInner>,
}

pub(crate) struct AdminClientInner {
    pub(crate) config: ClientConfig,
    pub(crate) api: ApiClient,
    pub(crate) session: SessionGuard,
    pub(crate) store: Arc<DataStore>,
}

impl AdminClient {
    /// Build a client. Does not touch the network; call
    /// [`restore_session()`](Self::restore_session) or
    /// [`login()`](Self::login) next.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            accept_invalid_certs: config.accept_invalid_certs,
        };
        let api = ApiClient::new(config.api_url.clone(), &transport)?;
        let session = SessionGuard::new(api.clone(), tokens);

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                config,
                api,
                session,
                store: Arc::new(DataStore::new()),
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &SessionGuard {
        &self.inner.session
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Session shortcuts ────────────────────────────────────────

    pub async fn login(
        &self,
        email: &str,
        password: &secrecy::SecretString,
    ) -> Result<User, CoreError> {
        self.inner.session.login(email, password).await
    }

    pub async fn restore_session(&self) -> Result<User, CoreError> {
        self.inner.session.restore().await
    }

    /// End the session and drop everything cached under it.
    pub fn logout(&self) {
        self.inner.session.logout();
        self.inner.store.clear();
    }

    pub fn session_state(&self) -> SessionState {
        self.inner.session.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    // ── Subscriptions ────────────────────────────────────────────

    pub fn projects(&self) -> EntityStream<Project> {
        self.inner.store.subscribe_projects()
    }

    pub fn events(&self) -> EntityStream<Event> {
        self.inner.store.subscribe_events()
    }

    pub fn products(&self) -> EntityStream<Product> {
        self.inner.store.subscribe_products()
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("api_url", &self.inner.config.api_url.as_str())
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}
