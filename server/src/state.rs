use inference::PredictionService;
use std::sync::Arc;
use std::time::Instant;

/// Shared handler state. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self {
            service: Arc::new(service),
            start_time: Instant::now(),
        }
    }
}
