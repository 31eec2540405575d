//! Application state management

use crate::config::{AppConfig, MAX_PREVIEW_ROWS};
use crate::dataset::DatasetPreview;
use crate::inference::PredictionService;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub config: AppConfig,
    pub service: PredictionService,
    /// Reference dataset, read once at start and capped at the preview maximum
    pub preview: Option<DatasetPreview>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Load artifacts named by `config`; failures leave prediction disabled
    pub fn new(config: AppConfig) -> Self {
        let service = PredictionService::from_config(&config);
        Self::with_service(config, service)
    }

    pub fn with_service(config: AppConfig, service: PredictionService) -> Self {
        let preview = load_preview(&config);
        Self {
            config,
            service,
            preview,
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        Utc::now().signed_duration_since(self.started_at).num_seconds()
    }
}

fn load_preview(config: &AppConfig) -> Option<DatasetPreview> {
    let path = config.dataset_path.as_ref()?;
    match DatasetPreview::load(path, MAX_PREVIEW_ROWS) {
        Ok(preview) => {
            info!(path = %path.display(), rows = preview.total_rows, "Reference dataset loaded");
            Some(preview)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Reference dataset unavailable");
            None
        }
    }
}
