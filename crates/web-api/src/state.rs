use std::sync::Arc;

use application::{CatalogService, SubmissionService, UserService};

use crate::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub catalog_service: Arc<CatalogService>,
    pub submission_service: Arc<SubmissionService>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        catalog_service: Arc<CatalogService>,
        submission_service: Arc<SubmissionService>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_service,
            catalog_service,
            submission_service,
            jwt_service,
        }
    }
}
