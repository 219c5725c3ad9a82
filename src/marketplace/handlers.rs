use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::bootstrap::AppState;
use crate::error::{AppError, AppResult};
use crate::marketplace::models::*;

/// E.164-style phone check: optional leading '+', first digit 1-9, 2 to 15
/// digits total.
fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (2..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0')
}

pub async fn health_check() -> &'static str {
    "ok"
}

// ========== USERS ==========

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> AppResult<Json<User>> {
    payload
        .validate()
        .map_err(|e| AppError::InvalidPayload(e.to_string()))?;

    if state.marketplace.email_exists(&payload.email).await {
        return Err(AppError::InvalidPayload("Email already exists".into()));
    }

    if !is_valid_phone(&payload.phone_number) {
        return Err(AppError::InvalidPayload(
            "Invalid phone number format, include your country code".into(),
        ));
    }

    let user = state.marketplace.insert_user(User::new(payload)).await?;
    info!("User created: {}", user.id);
    Ok(Json(user))
}

/// GET /users/:id
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<User>> {
    Ok(Json(state.marketplace.get_user(user_id).await?))
}

/// GET /users/by-account/:account
pub async fn get_user_by_account(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> AppResult<Json<User>> {
    Ok(Json(state.marketplace.get_user_by_owner(&account).await?))
}

/// GET /users
pub async fn get_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.marketplace.list_users().await;
    if users.is_empty() {
        return Err(AppError::NotFound("No users found".into()));
    }
    Ok(Json(users))
}

// ========== WORKER PROFILES ==========

/// POST /worker-profiles
pub async fn create_worker_profile(
    State(state): State<AppState>,
    Json(payload): Json<CreateWorkerProfilePayload>,
) -> AppResult<Json<WorkerProfile>> {
    let user = state.marketplace.get_user(payload.user_id).await?;
    if user.user_type != UserRole::Worker {
        return Err(AppError::InvalidPayload(
            "User must be a Worker to create a worker profile".into(),
        ));
    }

    if payload.professional_summary.trim().is_empty() {
        return Err(AppError::InvalidPayload(
            "Professional summary is required".into(),
        ));
    }

    for experience in &payload.work_experience {
        if experience.job_title.is_empty() || experience.start_date.is_empty() {
            return Err(AppError::InvalidPayload(
                "Each work experience must have a job title and start date".into(),
            ));
        }
    }

    let profile = state
        .marketplace
        .insert_worker_profile(WorkerProfile::new(payload))
        .await?;
    info!("Worker profile created: {}", profile.id);
    Ok(Json(profile))
}

/// GET /worker-profiles/:id
pub async fn get_worker_profile_by_id(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<WorkerProfile>> {
    Ok(Json(state.marketplace.get_worker_profile(profile_id).await?))
}

/// GET /worker-profiles
pub async fn get_all_worker_profiles(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<WorkerProfile>>> {
    let profiles = state.marketplace.list_worker_profiles().await;
    if profiles.is_empty() {
        return Err(AppError::NotFound("No worker profiles found".into()));
    }
    Ok(Json(profiles))
}

// ========== EMPLOYER PROFILES ==========

/// POST /employer-profiles
pub async fn create_employer_profile(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployerProfilePayload>,
) -> AppResult<Json<EmployerProfile>> {
    let user = state.marketplace.get_user(payload.user_id).await?;
    if user.user_type != UserRole::Employer {
        return Err(AppError::InvalidPayload(
            "User must be an Employer to create an employer profile".into(),
        ));
    }

    if payload.company_name.is_empty() || payload.industry.is_empty() {
        return Err(AppError::InvalidPayload(
            "Company name and industry are required".into(),
        ));
    }

    let profile = state
        .marketplace
        .insert_employer_profile(EmployerProfile::new(payload))
        .await?;
    info!("Employer profile created: {}", profile.id);
    Ok(Json(profile))
}

/// GET /employer-profiles/:id
pub async fn get_employer_profile_by_id(
    State(state): State<AppState>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<EmployerProfile>> {
    Ok(Json(
        state.marketplace.get_employer_profile(profile_id).await?,
    ))
}

/// GET /employer-profiles
pub async fn get_all_employer_profiles(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EmployerProfile>>> {
    let profiles = state.marketplace.list_employer_profiles().await;
    if profiles.is_empty() {
        return Err(AppError::NotFound("No employer profiles found".into()));
    }
    Ok(Json(profiles))
}

// ========== JOB POSTINGS ==========

/// POST /job-postings
pub async fn create_job_posting(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobPostingPayload>,
) -> AppResult<Json<JobPosting>> {
    state.marketplace.get_user(payload.employer_id).await?;

    if payload.title.is_empty() || payload.description.is_empty() {
        return Err(AppError::InvalidPayload(
            "Title, description, and job category are required".into(),
        ));
    }

    let posting = state
        .marketplace
        .insert_job_posting(JobPosting::new(payload))
        .await?;
    info!("Job posting created: {}", posting.id);
    Ok(Json(posting))
}

/// GET /job-postings/:id
pub async fn get_job_posting_by_id(
    State(state): State<AppState>,
    Path(posting_id): Path<Uuid>,
) -> AppResult<Json<JobPosting>> {
    Ok(Json(state.marketplace.get_job_posting(posting_id).await?))
}

/// GET /job-postings?offset=&limit=
pub async fn get_all_job_postings(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<JobPosting>>> {
    let postings = state
        .marketplace
        .list_job_postings(query.offset.unwrap_or(0), query.limit.unwrap_or(50))
        .await;
    if postings.is_empty() {
        return Err(AppError::NotFound("No job postings found".into()));
    }
    Ok(Json(postings))
}

// ========== JOB APPLICATIONS ==========

/// POST /job-applications
pub async fn create_job_application(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobApplicationPayload>,
) -> AppResult<Json<JobApplication>> {
    state.marketplace.get_user(payload.worker_id).await?;
    state.marketplace.get_job_posting(payload.job_id).await?;

    if payload.cover_letter.is_empty() {
        return Err(AppError::InvalidPayload("Cover letter is required".into()));
    }

    let application = state
        .marketplace
        .insert_job_application(JobApplication::new(payload))
        .await?;
    info!("Job application created: {}", application.id);
    Ok(Json(application))
}

/// GET /job-applications/:id
pub async fn get_job_application_by_id(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> AppResult<Json<JobApplication>> {
    Ok(Json(
        state.marketplace.get_job_application(application_id).await?,
    ))
}

/// GET /job-applications
pub async fn get_all_job_applications(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<JobApplication>>> {
    let applications = state.marketplace.list_job_applications().await;
    if applications.is_empty() {
        return Err(AppError::NotFound("No job applications found".into()));
    }
    Ok(Json(applications))
}

// ========== PROJECTS ==========

/// POST /projects
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectPayload>,
) -> AppResult<Json<Project>> {
    state.marketplace.get_user(payload.employer_id).await?;
    state.marketplace.get_user(payload.worker_id).await?;

    let project = state
        .marketplace
        .insert_project(Project::new(payload))
        .await?;
    info!("Project created: {}", project.id);
    Ok(Json(project))
}

/// GET /projects/:id
pub async fn get_project_by_id(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<Project>> {
    Ok(Json(state.marketplace.get_project(project_id).await?))
}

/// GET /projects
pub async fn get_all_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = state.marketplace.list_projects().await;
    if projects.is_empty() {
        return Err(AppError::NotFound("No projects found".into()));
    }
    Ok(Json(projects))
}
