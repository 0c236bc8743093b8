use crate::error::{PlannerError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api/v1";

/// Explicit session state threaded through every call that needs it.
/// There is deliberately no ambient/global token storage: tests and
/// multi-session callers construct their own.
#[derive(Clone, Debug)]
pub struct Session {
    base_url: String,
    token: Option<String>,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Anonymous session against the default local backend.
    pub fn local() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Session configured from `TRIPCRAFT_BASE_URL` / `TRIPCRAFT_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("TRIPCRAFT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if base_url.trim().is_empty() {
            return Err(PlannerError::Config(
                "TRIPCRAFT_BASE_URL must not be empty".to_string(),
            ));
        }
        let mut session = Self::new(base_url);
        if let Ok(token) = std::env::var("TRIPCRAFT_TOKEN") {
            if !token.is_empty() {
                session.token = Some(token);
            }
        }
        Ok(session)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
