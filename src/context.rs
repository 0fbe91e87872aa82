//! Per-process client context.
//!
//! Holds the loaded configuration and the Koleo client built from it. The
//! pair is created on first use and shared read-only afterwards; [`ClientContext::reset`]
//! drops it so the next tool call re-reads the configuration file.

use std::{path::PathBuf, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    config::{Config, ConfigError},
    koleo::{KoleoApi, KoleoClient, KoleoError},
};

/// Configuration together with the client built from it.
pub struct Session {
    pub config: Config,
    pub api: Arc<dyn KoleoApi>,
}

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] KoleoError),
}

enum Source {
    /// Load from this path, or the default location.
    File(Option<PathBuf>),
    Fixed(Arc<Session>),
}

pub struct ClientContext {
    source: Source,
    session: RwLock<Option<Arc<Session>>>,
}

impl ClientContext {
    pub fn from_config_path(path: Option<PathBuf>) -> Self {
        Self {
            source: Source::File(path),
            session: RwLock::new(None),
        }
    }

    /// A context that always hands out `session`.
    pub fn fixed(session: Session) -> Self {
        Self {
            source: Source::Fixed(Arc::new(session)),
            session: RwLock::new(None),
        }
    }

    /// The current session, building it if needed.
    pub async fn session(&self) -> Result<Arc<Session>, ContextError> {
        if let Some(session) = self.session.read().await.as_ref() {
            return Ok(session.clone());
        }

        let mut slot = self.session.write().await;
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        let session = match &self.source {
            Source::Fixed(session) => session.clone(),
            Source::File(path) => {
                let config = Config::load(path.as_deref())?;
                let api: Arc<dyn KoleoApi> = Arc::new(KoleoClient::new(&config)?);
                tracing::info!(
                    authenticated = config.has_credentials(),
                    "Koleo client ready"
                );
                Arc::new(Session { config, api })
            }
        };
        *slot = Some(session.clone());
        Ok(session)
    }

    /// Forget the current session.
    pub async fn reset(&self) {
        *self.session.write().await = None;
        tracing::info!("Koleo client reset");
    }

    pub async fn is_initialized(&self) -> bool {
        self.session.read().await.is_some()
    }
}
