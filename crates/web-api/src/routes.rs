use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;
use validator::Validate;

use application::{
    AuthenticateUserRequest, CreateJobRequest, HomepageContent, RegisterUserRequest,
    SubmissionAccepted,
};
use domain::{Job, User};

use crate::{auth::LoginResponse, error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
struct RegisterPayload {
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
    #[validate(email(message = "invalid email"))]
    email: String,
    #[validate(length(min = 1, message = "password is required"))]
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize, Validate)]
struct CreateJobPayload {
    #[validate(length(min = 1, message = "title is required"))]
    title: String,
    company: String,
    location: String,
    industry: String,
}

#[derive(Debug, Deserialize)]
struct HomepageQuery {
    location: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
        .route("/jobs", get(list_jobs).post(add_job))
        .route("/jobs/{job_id}/apply", post(apply_for_job))
        .route("/homepage/content", get(homepage_content))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let user = state
        .user_service
        .register(RegisterUserRequest {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .user_service
        .authenticate(AuthenticateUserRequest {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let token = state.jwt_service.generate_token(user.id)?;
    Ok(Json(LoginResponse { user, token }))
}

async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = state.catalog_service.list_jobs().await?;
    Ok(Json(jobs))
}

async fn add_job(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let job = state
        .catalog_service
        .add_job(CreateJobRequest {
            title: payload.title,
            company: payload.company,
            location: payload.location,
            industry: payload.industry,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

async fn homepage_content(
    State(state): State<AppState>,
    Query(query): Query<HomepageQuery>,
) -> Result<Json<HomepageContent>, ApiError> {
    let content = state
        .catalog_service
        .homepage_content(query.location.as_deref())
        .await?;
    Ok(Json(content))
}

/// 受理职位申请：写入 Pending 记录并入队后立即返回 202，
/// 不等待 worker 的处理结果。
async fn apply_for_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<SubmissionAccepted>), ApiError> {
    let applicant_id = state.jwt_service.extract_user_from_headers(&headers)?;

    let accepted = state
        .submission_service
        .submit(applicant_id, job_id)
        .await?;

    Ok((StatusCode::ACCEPTED, Json(accepted)))
}
