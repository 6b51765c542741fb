//! Initialization result shared by every per-frame call.

use crate::core::{ConfigLoader, OcrParams, OcrResult};
use crate::utils::dict::Charset;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Immutable parameters and character table.
///
/// Built once and shared read-only across frames and threads.
#[derive(Debug, Clone)]
pub struct OcrContext {
    pub params: Arc<OcrParams>,
    pub charset: Arc<Charset>,
}

impl OcrContext {
    /// Loads parameters (defaults when `config_path` is absent or missing)
    /// and the configured charset.
    ///
    /// # Errors
    ///
    /// Any failure here is fatal for the caller: malformed or invalid
    /// configuration, or an unreadable charset file.
    pub fn init(config_path: Option<&Path>) -> OcrResult<Self> {
        let params = ConfigLoader::load_or_default(config_path)?;
        let charset = Charset::load(params.charset_path.as_deref())?;
        info!(
            "initialized: det_output={} rec_output={} charset_size={}",
            params.det_output_name,
            params.rec_output_name,
            charset.len()
        );
        Ok(Self::from_parts(params, charset))
    }

    /// Bundles already-loaded parts.
    pub fn from_parts(params: OcrParams, charset: Charset) -> Self {
        Self {
            params: Arc::new(params),
            charset: Arc::new(charset),
        }
    }
}
