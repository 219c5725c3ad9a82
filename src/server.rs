use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::bootstrap::AppState;
use crate::marketplace::handlers::{
    create_employer_profile, create_job_application, create_job_posting, create_project,
    create_user, create_worker_profile, get_all_employer_profiles, get_all_job_applications,
    get_all_job_postings, get_all_projects, get_all_users, get_all_worker_profiles,
    get_employer_profile_by_id, get_job_application_by_id, get_job_posting_by_id,
    get_project_by_id, get_user_by_account, get_user_by_id, get_worker_profile_by_id,
    health_check,
};
use crate::payment::handlers::{
    complete_payment, get_account_address, get_employer_reservations, get_pending_reservation,
    reserve_payment,
};

pub async fn create_app(state: AppState) -> Router {
    info!("Setting up HTTP routes...");

    let app = Router::new()
        // Public health check endpoint
        .route("/health", get(health_check))
        .nest(
            "/api/v1",
            Router::new()
                // User endpoints
                .route("/users", post(create_user).get(get_all_users))
                .route("/users/:id", get(get_user_by_id))
                .route("/users/by-account/:account", get(get_user_by_account))
                // Worker profile endpoints
                .route(
                    "/worker-profiles",
                    post(create_worker_profile).get(get_all_worker_profiles),
                )
                .route("/worker-profiles/:id", get(get_worker_profile_by_id))
                // Employer profile endpoints
                .route(
                    "/employer-profiles",
                    post(create_employer_profile).get(get_all_employer_profiles),
                )
                .route("/employer-profiles/:id", get(get_employer_profile_by_id))
                // Job posting endpoints
                .route(
                    "/job-postings",
                    post(create_job_posting).get(get_all_job_postings),
                )
                .route("/job-postings/:id", get(get_job_posting_by_id))
                // Job application endpoints
                .route(
                    "/job-applications",
                    post(create_job_application).get(get_all_job_applications),
                )
                .route("/job-applications/:id", get(get_job_application_by_id))
                // Project endpoints
                .route("/projects", post(create_project).get(get_all_projects))
                .route("/projects/:id", get(get_project_by_id))
                // Payment reservation & settlement endpoints
                .route("/payments/reserve", post(reserve_payment))
                .route("/payments/complete", post(complete_payment))
                .route("/payments/pending/:memo", get(get_pending_reservation))
                .route(
                    "/payments/completed/employer/:employer_id",
                    get(get_employer_reservations),
                )
                // Ledger address derivation
                .route("/addresses/:account", get(get_account_address)),
        )
        .layer(CompressionLayer::new())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("HTTP routes configured");
    app
}

pub async fn run_server(app: Router, bind_address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Server listening on: {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
