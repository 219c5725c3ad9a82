use std::collections::BTreeMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::marketplace::models::{
    EmployerProfile, JobApplication, JobPosting, Project, User, WorkerProfile,
};

/// Key-ordered in-memory stores for every marketplace entity. Each mutation
/// is a single key's full-record replace; there are no multi-key
/// transactions.
pub struct MarketplaceRepository {
    users: RwLock<BTreeMap<Uuid, User>>,
    worker_profiles: RwLock<BTreeMap<Uuid, WorkerProfile>>,
    employer_profiles: RwLock<BTreeMap<Uuid, EmployerProfile>>,
    job_postings: RwLock<BTreeMap<Uuid, JobPosting>>,
    job_applications: RwLock<BTreeMap<Uuid, JobApplication>>,
    projects: RwLock<BTreeMap<Uuid, Project>>,
}

impl MarketplaceRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            worker_profiles: RwLock::new(BTreeMap::new()),
            employer_profiles: RwLock::new(BTreeMap::new()),
            job_postings: RwLock::new(BTreeMap::new()),
            job_applications: RwLock::new(BTreeMap::new()),
            projects: RwLock::new(BTreeMap::new()),
        }
    }

    // ========== USERS ==========

    pub async fn insert_user(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        let users = self.users.read().await;
        users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found", user_id)))
    }

    pub async fn get_user_by_owner(&self, owner: &str) -> AppResult<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.owner == owner)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with owner {} not found", owner)))
    }

    pub async fn email_exists(&self, email: &str) -> bool {
        let users = self.users.read().await;
        users.values().any(|u| u.email == email)
    }

    pub async fn list_users(&self) -> Vec<User> {
        let users = self.users.read().await;
        users.values().cloned().collect()
    }

    // ========== WORKER PROFILES ==========

    pub async fn insert_worker_profile(&self, profile: WorkerProfile) -> AppResult<WorkerProfile> {
        let mut profiles = self.worker_profiles.write().await;
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    pub async fn get_worker_profile(&self, profile_id: Uuid) -> AppResult<WorkerProfile> {
        let profiles = self.worker_profiles.read().await;
        profiles.get(&profile_id).cloned().ok_or_else(|| {
            AppError::NotFound(format!("Worker profile with ID {} not found", profile_id))
        })
    }

    /// Looks a worker profile up by its owning user.
    pub async fn get_worker_profile_by_user(&self, user_id: Uuid) -> AppResult<WorkerProfile> {
        let profiles = self.worker_profiles.read().await;
        profiles
            .values()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("Worker profile for user {} not found", user_id))
            })
    }

    pub async fn update_worker_profile(&self, profile: WorkerProfile) -> AppResult<WorkerProfile> {
        let mut profiles = self.worker_profiles.write().await;
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    /// Credits a worker's earnings and completed-job counter in one
    /// read-modify-write under the write guard, so concurrent settlements
    /// cannot clobber each other's credit.
    pub async fn credit_worker(&self, user_id: Uuid, amount: u64) -> AppResult<WorkerProfile> {
        let mut profiles = self.worker_profiles.write().await;
        let profile = profiles
            .values_mut()
            .find(|p| p.user_id == user_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("Worker profile for user {} not found", user_id))
            })?;

        profile.total_earnings += amount;
        profile.completed_jobs += 1;
        profile.updated_at = chrono::Utc::now();
        Ok(profile.clone())
    }

    pub async fn list_worker_profiles(&self) -> Vec<WorkerProfile> {
        let profiles = self.worker_profiles.read().await;
        profiles.values().cloned().collect()
    }

    // ========== EMPLOYER PROFILES ==========

    pub async fn insert_employer_profile(
        &self,
        profile: EmployerProfile,
    ) -> AppResult<EmployerProfile> {
        let mut profiles = self.employer_profiles.write().await;
        profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    pub async fn get_employer_profile(&self, profile_id: Uuid) -> AppResult<EmployerProfile> {
        let profiles = self.employer_profiles.read().await;
        profiles.get(&profile_id).cloned().ok_or_else(|| {
            AppError::NotFound(format!("Employer profile with ID {} not found", profile_id))
        })
    }

    pub async fn list_employer_profiles(&self) -> Vec<EmployerProfile> {
        let profiles = self.employer_profiles.read().await;
        profiles.values().cloned().collect()
    }

    // ========== JOB POSTINGS ==========

    pub async fn insert_job_posting(&self, posting: JobPosting) -> AppResult<JobPosting> {
        let mut postings = self.job_postings.write().await;
        postings.insert(posting.id, posting.clone());
        Ok(posting)
    }

    pub async fn get_job_posting(&self, posting_id: Uuid) -> AppResult<JobPosting> {
        let postings = self.job_postings.read().await;
        postings.get(&posting_id).cloned().ok_or_else(|| {
            AppError::NotFound(format!("Job posting with ID {} not found", posting_id))
        })
    }

    pub async fn list_job_postings(&self, offset: usize, limit: usize) -> Vec<JobPosting> {
        let postings = self.job_postings.read().await;
        postings
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    // ========== JOB APPLICATIONS ==========

    pub async fn insert_job_application(
        &self,
        application: JobApplication,
    ) -> AppResult<JobApplication> {
        let mut applications = self.job_applications.write().await;
        applications.insert(application.id, application.clone());
        Ok(application)
    }

    pub async fn get_job_application(&self, application_id: Uuid) -> AppResult<JobApplication> {
        let applications = self.job_applications.read().await;
        applications.get(&application_id).cloned().ok_or_else(|| {
            AppError::NotFound(format!(
                "Job application with ID {} not found",
                application_id
            ))
        })
    }

    pub async fn list_job_applications(&self) -> Vec<JobApplication> {
        let applications = self.job_applications.read().await;
        applications.values().cloned().collect()
    }

    // ========== PROJECTS ==========

    pub async fn insert_project(&self, project: Project) -> AppResult<Project> {
        let mut projects = self.projects.write().await;
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    pub async fn get_project(&self, project_id: Uuid) -> AppResult<Project> {
        let projects = self.projects.read().await;
        projects
            .get(&project_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Project with ID {} not found", project_id)))
    }

    pub async fn update_project(&self, project: Project) -> AppResult<Project> {
        let mut projects = self.projects.write().await;
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    /// Marks a project fully paid in place, under the write guard.
    pub async fn mark_project_fully_paid(&self, project_id: Uuid) -> AppResult<Project> {
        let mut projects = self.projects.write().await;
        let project = projects.get_mut(&project_id).ok_or_else(|| {
            AppError::NotFound(format!("Project with ID {} not found", project_id))
        })?;

        project.payment_status = crate::marketplace::models::ProjectPaymentStatus::FullyPaid;
        Ok(project.clone())
    }

    pub async fn list_projects(&self) -> Vec<Project> {
        let projects = self.projects.read().await;
        projects.values().cloned().collect()
    }
}

impl Default for MarketplaceRepository {
    fn default() -> Self {
        Self::new()
    }
}
