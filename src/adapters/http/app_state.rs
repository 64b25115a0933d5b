use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::auth::{AuthUseCases, UserRepo},
};

/// Everything here is immutable once built and shared across in-flight
/// requests without coordination.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_use_cases: Arc<AuthUseCases>,
    pub repo: Arc<dyn UserRepo>,
}
