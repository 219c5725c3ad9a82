use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::bootstrap::AppState;
use crate::error::{AppError, AppResult};
use crate::ledger::models::binary_address;
use crate::payment::models::{CompletePaymentPayload, Reservation, ReservePaymentPayload};

/// POST /payments/reserve
pub async fn reserve_payment(
    State(state): State<AppState>,
    Json(payload): Json<ReservePaymentPayload>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.reservation_manager.reserve(payload).await?;
    Ok(Json(reservation))
}

/// POST /payments/complete
pub async fn complete_payment(
    State(state): State<AppState>,
    Json(payload): Json<CompletePaymentPayload>,
) -> AppResult<Json<Reservation>> {
    let completed = state.settlement.complete(payload).await?;
    Ok(Json(completed))
}

/// GET /payments/pending/:memo
///
/// Distinguishes a memo that already settled from one that never existed or
/// expired.
pub async fn get_pending_reservation(
    State(state): State<AppState>,
    Path(memo): Path<u64>,
) -> AppResult<Json<Reservation>> {
    if let Some(reservation) = state.reservations.get_pending(memo).await {
        return Ok(Json(reservation));
    }

    if state
        .reservations
        .settled_reservation_for_memo(memo)
        .await
        .is_some()
    {
        return Err(AppError::PaymentCompleted(format!(
            "Reservation with memo {} has already been settled",
            memo
        )));
    }

    Err(AppError::NotFound(format!(
        "No pending reservation with memo {}",
        memo
    )))
}

/// GET /payments/completed/employer/:employer_id
pub async fn get_employer_reservations(
    State(state): State<AppState>,
    Path(employer_id): Path<Uuid>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state.reservations.persisted_for_employer(employer_id).await;
    if reservations.is_empty() {
        return Err(AppError::NotFound(format!(
            "No settled reservations for employer {}",
            employer_id
        )));
    }
    Ok(Json(reservations))
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub account: String,
    pub address: String,
}

/// GET /addresses/:account
///
/// Derives the binary ledger address for an account, the same form the
/// settlement verifier matches transfers against.
pub async fn get_account_address(Path(account): Path<String>) -> Json<AddressResponse> {
    let address = binary_address(&account);
    Json(AddressResponse { account, address })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_account_address_matches_ledger_form() {
        let Json(resp) = get_account_address(Path("acct-employer".into())).await;

        assert_eq!(resp.account, "acct-employer");
        assert_eq!(resp.address, binary_address("acct-employer"));
        // Hex-encoded SHA-256 digest.
        assert_eq!(resp.address.len(), 64);
        assert!(resp.address.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
