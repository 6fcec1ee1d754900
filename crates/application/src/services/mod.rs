mod catalog_service;
mod submission_service;
mod user_service;

#[cfg(test)]
mod submission_service_tests;
#[cfg(test)]
pub(crate) mod test_support;

pub use catalog_service::{
    CatalogService, CatalogServiceDependencies, CreateJobRequest, HomepageContent,
};
pub use submission_service::{
    SubmissionAccepted, SubmissionService, SubmissionServiceDependencies,
};
pub use user_service::{
    AuthenticateUserRequest, RegisterUserRequest, UserService, UserServiceDependencies,
};
