//! Credential stores consumed by the API client.
//!
//! Both stores are caller-owned objects injected into the client; there
//! is no process-wide token state. The in-memory implementations cover
//! the CLI and tests; embedders with their own persistence implement the
//! traits instead.

use std::sync::Mutex;

/// Read/write access to the bearer token pair. `store_tokens` with a
/// `None` refresh keeps the existing refresh token, which is what the
/// refresh endpoint's access-only responses need.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn store_tokens(&self, access: String, refresh: Option<String>);
    fn clear(&self);
}

/// Read-only access to the anti-forgery token attached to state-changing
/// requests.
pub trait CsrfTokenSource: Send + Sync {
    fn csrf_token(&self) -> Option<String>;
}

#[derive(Debug, Default)]
struct TokenState {
    access: Option<String>,
    refresh: Option<String>,
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    state: Mutex<TokenState>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: impl Into<String>, refresh: Option<String>) -> Self {
        Self {
            state: Mutex::new(TokenState {
                access: Some(access.into()),
                refresh,
            }),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.state.lock().expect("token store lock").access.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.state.lock().expect("token store lock").refresh.clone()
    }

    fn store_tokens(&self, access: String, refresh: Option<String>) {
        let mut state = self.state.lock().expect("token store lock");
        state.access = Some(access);
        if let Some(refresh) = refresh {
            state.refresh = Some(refresh);
        }
    }

    fn clear(&self) {
        let mut state = self.state.lock().expect("token store lock");
        state.access = None;
        state.refresh = None;
    }
}

/// Anti-forgery token held in memory, updated after `GET /api/csrf/`.
#[derive(Debug, Default)]
pub struct MemoryCsrfToken {
    token: Mutex<Option<String>>,
}

impl MemoryCsrfToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.lock().expect("csrf token lock") = Some(token.into());
    }
}

impl CsrfTokenSource for MemoryCsrfToken {
    fn csrf_token(&self) -> Option<String> {
        self.token.lock().expect("csrf token lock").clone()
    }
}

/// For anonymous read-only clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCsrfToken;

impl CsrfTokenSource for NoCsrfToken {
    fn csrf_token(&self) -> Option<String> {
        None
    }
}
