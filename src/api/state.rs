//! Application state for the payroll API.

use std::sync::Arc;

use crate::service::PayrollService;

/// Shared application state.
///
/// Wraps the payroll service so every handler works against the same pool,
/// write gate and document directory.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService>,
}

impl AppState {
    /// Creates a new application state around `service`.
    pub fn new(service: PayrollService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// The payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone_and_send() {
        fn assert_state<T: Clone + Send + Sync + 'static>() {}
        assert_state::<AppState>();
    }
}
