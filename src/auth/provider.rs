use super::{
    super::{clock::*, storage::*},
    token::*,
};

use {
    parking_lot::*,
    std::{fmt, sync::Arc},
};

/// Default storage key for the bearer token.
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "api.accessToken";

/// Hook called on [logout](AuthTokenProvider::logout).
pub type LogoutHook = Arc<Box<dyn Fn() + Send + Sync>>;

//
// AuthTokenProvider
//

/// Owner of the current bearer token.
///
/// The token is kept in memory and mirrored to [Storage] so that it survives a restart.
///
/// Clones share the same token.
#[derive(Clone)]
pub struct AuthTokenProvider {
    inner: Arc<AuthTokenProviderInner>,
}

struct AuthTokenProviderInner {
    token: RwLock<Option<String>>,
    storage: StorageRef,
    storage_key: String,
    clock: ClockRef,
    logout_hooks: Mutex<Vec<LogoutHook>>,
}

impl AuthTokenProvider {
    /// Constructor.
    ///
    /// Hydrates the token from storage.
    pub fn new(storage: StorageRef, clock: ClockRef) -> Self {
        Self::with_storage_key(storage, DEFAULT_TOKEN_STORAGE_KEY, clock)
    }

    /// Constructor.
    ///
    /// Hydrates the token from storage.
    pub fn with_storage_key<KeyT>(storage: StorageRef, storage_key: KeyT, clock: ClockRef) -> Self
    where
        KeyT: Into<String>,
    {
        let storage_key = storage_key.into();

        let token = match storage.get_item(&storage_key) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(error) => {
                tracing::warn!("could not read token: {}", error);
                None
            }
        };

        Self {
            inner: Arc::new(AuthTokenProviderInner {
                token: RwLock::new(token),
                storage,
                storage_key,
                clock,
                logout_hooks: Default::default(),
            }),
        }
    }

    /// Current token, if any.
    ///
    /// May be expired.
    pub fn token(&self) -> Option<String> {
        self.inner.token.read().clone()
    }

    /// Set the token and persist it.
    ///
    /// Persistence is best effort: the in-memory token is set regardless.
    pub fn set_token<TokenT>(&self, token: TokenT)
    where
        TokenT: Into<String>,
    {
        let token = token.into();

        if let Err(error) = self.inner.storage.set_item(&self.inner.storage_key, &token) {
            tracing::warn!("could not persist token: {}", error);
        }

        *self.inner.token.write() = Some(token);
    }

    /// Whether we have a token at all.
    pub fn has_token(&self) -> bool {
        self.inner.token.read().is_some()
    }

    /// Whether we have a token and it is not expired.
    pub fn is_authenticated(&self) -> bool {
        self.valid_token().is_some()
    }

    /// Whether the token is expired.
    ///
    /// No token or an undecodable token counts as expired.
    pub fn is_expired(&self) -> bool {
        match &*self.inner.token.read() {
            Some(token) => is_token_expired(token, self.inner.clock.now()),
            None => true,
        }
    }

    /// The token if it is present and not expired.
    pub fn valid_token(&self) -> Option<String> {
        let token = self.token()?;
        if is_token_expired(&token, self.inner.clock.now()) { None } else { Some(token) }
    }

    /// Register a hook to be called on [logout](Self::logout).
    pub fn on_logout(&self, hook: impl Fn() + 'static + Send + Sync) {
        self.inner.logout_hooks.lock().push(Arc::new(Box::new(hook)));
    }

    /// Log out.
    ///
    /// Forgets the token, calls the logout hooks, and clears storage.
    pub fn logout(&self) {
        tracing::info!("logout");

        *self.inner.token.write() = None;

        // Don't hold the lock while calling hooks
        let hooks = self.inner.logout_hooks.lock().clone();
        for hook in hooks {
            hook();
        }

        if let Err(error) = self.inner.storage.clear() {
            tracing::warn!("could not clear storage: {}", error);
        }
    }
}

impl fmt::Debug for AuthTokenProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter
            .debug_struct("AuthTokenProvider")
            .field("storage_key", &self.inner.storage_key)
            .field("has_token", &self.has_token())
            .finish()
    }
}
