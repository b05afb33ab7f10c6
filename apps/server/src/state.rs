use crate::{config::ServerConfig, error::ApiError};
use lapline_provider_core::SessionProvider;
use model::SessionKind;
use std::{num::NonZeroUsize, sync::Arc};

/// Shared by every request; holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SessionProvider>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(provider: impl SessionProvider + 'static, config: ServerConfig) -> Self {
        Self { provider: Arc::new(provider), config: Arc::new(config) }
    }

    pub fn session_kind(&self, requested: Option<&str>) -> Result<SessionKind, ApiError> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse().map_err(|e: model::ParseSessionKindError| ApiError::BadRequest(e.to_string())),
            None => Ok(self.config.default_session),
        }
    }

    /// Requested stride, or the configured default, bounded by `max_stride`.
    pub fn stride(&self, requested: Option<usize>) -> Result<NonZeroUsize, ApiError> {
        let max = self.config.max_stride;
        let value = requested.unwrap_or(self.config.default_stride);
        NonZeroUsize::new(value)
            .filter(|s| s.get() <= max)
            .ok_or_else(|| ApiError::BadRequest(format!("stride must be between 1 and {max}, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lapline_provider_core::MemoryProvider;

    fn state() -> AppState {
        let config = ServerConfig { default_stride: 2, max_stride: 8, ..ServerConfig::default() };
        AppState::new(MemoryProvider::new(), config)
    }

    #[test]
    fn test_stride_defaults_and_bounds() {
        let s = state();
        assert_eq!(s.stride(None).unwrap().get(), 2);
        assert_eq!(s.stride(Some(8)).unwrap().get(), 8);
        assert!(matches!(s.stride(Some(0)), Err(ApiError::BadRequest(_))));
        assert!(matches!(s.stride(Some(9)), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_session_kind_defaults_and_parses() {
        let s = state();
        assert_eq!(s.session_kind(None).unwrap(), SessionKind::Qualifying);
        assert_eq!(s.session_kind(Some("")).unwrap(), SessionKind::Qualifying);
        assert_eq!(s.session_kind(Some("R")).unwrap(), SessionKind::Race);
        assert!(matches!(s.session_kind(Some("warmup")), Err(ApiError::BadRequest(_))));
    }
}
