use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Completed,
    Failed,
}

/// An employer's intent to pay a worker for a project, awaiting settlement
/// proof from the external ledger. Keyed by `memo` while pending.
///
/// `payer` and `payee` are the owning accounts of the employer and worker,
/// captured at creation and not re-derived later.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub project_id: Uuid,
    pub worker_id: Uuid,
    pub employer_id: Uuid,
    pub payer: String,
    pub payee: String,
    pub amount: u64,
    pub status: ReservationStatus,
    pub paid_at_block: Option<u64>,
    pub memo: u64,
    pub transaction_date: DateTime<Utc>,
}

impl Reservation {
    pub fn new(
        project_id: Uuid,
        worker_id: Uuid,
        employer_id: Uuid,
        payer: String,
        payee: String,
        amount: u64,
        memo: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            worker_id,
            employer_id,
            payer,
            payee,
            amount,
            status: ReservationStatus::Pending,
            paid_at_block: None,
            memo,
            transaction_date: Utc::now(),
        }
    }

    pub fn mark_completed(mut self, block: u64) -> Self {
        self.status = ReservationStatus::Completed;
        self.paid_at_block = Some(block);
        self
    }
}

// ========== REQUEST PAYLOADS ==========

#[derive(Debug, Deserialize)]
pub struct ReservePaymentPayload {
    pub worker_id: Uuid,
    pub employer_id: Uuid,
    pub project_id: Uuid,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct CompletePaymentPayload {
    /// Owning account of the employer, must match the reservation's payer.
    pub employer_account: String,
    pub worker_id: Uuid,
    pub amount: u64,
    pub block: u64,
    pub memo: u64,
}
