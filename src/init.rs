use crate::config::LoggerConfig;
use crate::error::ConfigError;
use crate::layer::RecordLayer;
use crate::logger::Logger;
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Error returned by [`init_tracing_from_env`].
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

/// Install a [`RecordLayer`] feeding `logger` as the global `tracing`
/// subscriber.
///
/// **Effects**
///
/// Every `tracing` event in the process is turned into a record and written
/// through `logger`. Fails if a global subscriber is already set.
pub fn init_tracing(logger: Arc<Logger>) -> Result<(), SetGlobalDefaultError> {
    let subscriber = Registry::default().with(RecordLayer::new(logger));
    tracing::subscriber::set_global_default(subscriber)
}

/// Build a logger from `KVLOG_*` environment variables and install it with
/// [`init_tracing`].
///
/// This is the recommended entrypoint for binaries that only want their
/// `tracing` output rendered as console lines or JSON.
pub fn init_tracing_from_env() -> Result<Arc<Logger>, InitError> {
    let logger = Arc::new(LoggerConfig::from_env()?.build()?);
    init_tracing(Arc::clone(&logger))?;
    Ok(logger)
}
