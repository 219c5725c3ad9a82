use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    Worker,
    Employer,
}

/// Marketplace account record. `owner` is the external account that pays or
/// receives settlements for this user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub owner: String,
    pub full_name: String,
    pub user_type: UserRole,
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkExperience {
    pub job_title: String,
    pub company: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: String,
    pub is_informal_work: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub proficiency_level: u64,
    pub is_verified: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub proficiency_level: String,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobCategory {
    WebDevelopment,
    MobileDevelopment,
    DataScience,
    ArtificialIntelligence,
    GraphicDesign,
    ContentWriting,
    Other,
}

/// Worker-specific details. `total_earnings` and `completed_jobs` only ever
/// increase, credited by settlement reconciliation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub professional_summary: String,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub preferred_job_categories: Vec<JobCategory>,
    pub portfolio_url: Option<String>,
    pub certifications: Vec<String>,
    pub availability: String,
    pub average_rating: u64,
    pub completed_jobs: u64,
    pub total_earnings: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmployerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub industry: String,
    pub company_website: String,
    pub average_rating: u64,
    pub total_jobs_posted: u64,
    pub total_hires: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentType {
    FixedPrice,
    Hourly,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Budget {
    pub amount: u64,
    pub currency: String,
    pub payment_type: PaymentType,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobPostingStatus {
    Open,
    Closed,
    Filled,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub job_category: JobCategory,
    pub project_duration: String,
    pub budget: Budget,
    pub application_deadline: String,
    pub preferred_worker_location: Option<String>,
    pub screening_questions: Vec<String>,
    pub status: JobPostingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobApplicationStatus {
    Pending,
    Shortlisted,
    Rejected,
    Hired,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub worker_id: Uuid,
    pub cover_letter: String,
    pub portfolio_items: Vec<String>,
    pub screening_answers: Vec<String>,
    pub status: JobApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectStatus {
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MilestoneStatus {
    Pending,
    Completed,
    Approved,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Milestone {
    pub description: String,
    pub due_date: String,
    pub status: MilestoneStatus,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProjectPaymentStatus {
    Pending,
    PartiallyPaid,
    FullyPaid,
}

/// Project between an employer and a worker. `payment_status` is only
/// mutated by settlement reconciliation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub job_id: Uuid,
    pub employer_id: Uuid,
    pub worker_id: Uuid,
    pub status: ProjectStatus,
    pub milestones: Vec<Milestone>,
    pub payment_status: ProjectPaymentStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<String>,
}

// ========== REQUEST PAYLOADS ==========

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    pub user_type: UserRole,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub address: String,
    pub phone_number: String,
    pub owner: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateWorkerProfilePayload {
    pub user_id: Uuid,
    pub professional_summary: String,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub preferred_job_categories: Vec<JobCategory>,
    pub portfolio_url: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub availability: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployerProfilePayload {
    pub user_id: Uuid,
    pub company_name: String,
    pub industry: String,
    #[serde(default)]
    pub company_website: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobPostingPayload {
    pub employer_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub job_category: JobCategory,
    pub project_duration: String,
    pub budget: Budget,
    pub application_deadline: String,
    pub preferred_worker_location: Option<String>,
    #[serde(default)]
    pub screening_questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobApplicationPayload {
    pub job_id: Uuid,
    pub worker_id: Uuid,
    pub cover_letter: String,
    #[serde(default)]
    pub portfolio_items: Vec<String>,
    #[serde(default)]
    pub screening_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectPayload {
    pub job_id: Uuid,
    pub employer_id: Uuid,
    pub worker_id: Uuid,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl User {
    pub fn new(payload: CreateUserPayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner: payload.owner,
            full_name: payload.full_name,
            user_type: payload.user_type,
            email: payload.email,
            address: payload.address,
            phone_number: payload.phone_number,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl WorkerProfile {
    pub fn new(payload: CreateWorkerProfilePayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: payload.user_id,
            professional_summary: payload.professional_summary,
            work_experience: payload.work_experience,
            education: payload.education,
            skills: payload.skills,
            languages: payload.languages,
            preferred_job_categories: payload.preferred_job_categories,
            portfolio_url: payload.portfolio_url,
            certifications: payload.certifications,
            availability: payload.availability,
            average_rating: 0,
            completed_jobs: 0,
            total_earnings: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl EmployerProfile {
    pub fn new(payload: CreateEmployerProfilePayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: payload.user_id,
            company_name: payload.company_name,
            industry: payload.industry,
            company_website: payload.company_website,
            average_rating: 0,
            total_jobs_posted: 0,
            total_hires: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl JobPosting {
    pub fn new(payload: CreateJobPostingPayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employer_id: payload.employer_id,
            title: payload.title,
            description: payload.description,
            required_skills: payload.required_skills,
            job_category: payload.job_category,
            project_duration: payload.project_duration,
            budget: payload.budget,
            application_deadline: payload.application_deadline,
            preferred_worker_location: payload.preferred_worker_location,
            screening_questions: payload.screening_questions,
            status: JobPostingStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }
}

impl JobApplication {
    pub fn new(payload: CreateJobApplicationPayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_id: payload.job_id,
            worker_id: payload.worker_id,
            cover_letter: payload.cover_letter,
            portfolio_items: payload.portfolio_items,
            screening_answers: payload.screening_answers,
            status: JobApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Project {
    pub fn new(payload: CreateProjectPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id: payload.job_id,
            employer_id: payload.employer_id,
            worker_id: payload.worker_id,
            status: ProjectStatus::InProgress,
            milestones: payload.milestones,
            payment_status: ProjectPaymentStatus::Pending,
            start_date: Utc::now(),
            end_date: payload.end_date,
        }
    }
}
