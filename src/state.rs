use std::sync::Arc;

use crate::repository::RiskRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn RiskRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn RiskRepository>) -> Self {
        Self { repo }
    }
}
