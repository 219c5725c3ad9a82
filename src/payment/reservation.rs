use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::marketplace::MarketplaceRepository;
use crate::payment::correlation::correlation_id;
use crate::payment::models::{Reservation, ReservePaymentPayload};
use crate::payment::repository::ReservationRepository;

/// Creates pending payment reservations and arms their expiry.
pub struct ReservationManager {
    marketplace: Arc<MarketplaceRepository>,
    reservations: Arc<ReservationRepository>,
    reservation_period: Duration,
}

impl ReservationManager {
    pub fn new(
        marketplace: Arc<MarketplaceRepository>,
        reservations: Arc<ReservationRepository>,
        reservation_period: Duration,
    ) -> Self {
        Self {
            marketplace,
            reservations,
            reservation_period,
        }
    }

    /// Validates the parties and amount, stores a pending reservation keyed
    /// by its correlation memo, and schedules its expiry. No state is
    /// written when any precondition fails.
    pub async fn reserve(&self, payload: ReservePaymentPayload) -> AppResult<Reservation> {
        let employer = self
            .marketplace
            .get_user(payload.employer_id)
            .await
            .map_err(|_| {
                AppError::NotFound(format!(
                    "Cannot create the reserve: Employer with ID {} not found",
                    payload.employer_id
                ))
            })?;

        let worker = self
            .marketplace
            .get_user(payload.worker_id)
            .await
            .map_err(|_| {
                AppError::NotFound(format!(
                    "Cannot create the reserve: Worker with ID {} not found",
                    payload.worker_id
                ))
            })?;

        self.marketplace
            .get_project(payload.project_id)
            .await
            .map_err(|_| {
                AppError::NotFound(format!(
                    "Cannot create the reserve: Project with ID {} not found",
                    payload.project_id
                ))
            })?;

        if payload.amount == 0 {
            return Err(AppError::InvalidPayload(
                "Payment amount must be positive".into(),
            ));
        }

        let memo = correlation_id(payload.employer_id, &employer.owner);
        let reservation = Reservation::new(
            payload.project_id,
            payload.worker_id,
            payload.employer_id,
            employer.owner,
            worker.owner,
            payload.amount,
            memo,
        );

        self.reservations.insert_pending(reservation.clone()).await;
        self.schedule_expiry(memo);

        info!(
            "Payment reservation {} created: memo={}, amount={}",
            reservation.id, memo, reservation.amount
        );
        Ok(reservation)
    }

    /// Arms the one-shot expiry for a pending reservation. Fire-and-forget:
    /// if settlement already removed the memo, the removal is a no-op.
    fn schedule_expiry(&self, memo: u64) {
        let reservations = self.reservations.clone();
        let period = self.reservation_period;

        tokio::spawn(async move {
            tokio::time::sleep(period).await;
            match reservations.remove_pending(memo).await {
                Some(reservation) => {
                    info!(
                        "Reservation {} discarded: unsettled after {:?} (memo={})",
                        reservation.id, period, memo
                    );
                }
                None => debug!("Expiry for memo {} found nothing pending", memo),
            }
        });
    }
}
