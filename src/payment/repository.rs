use std::collections::BTreeMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::payment::models::Reservation;

/// Stores for payment reservations.
///
/// Pending reservations are keyed by their correlation memo, which is the
/// lookup key the settlement flow and the expiry timer race on. Settled
/// reservations live in a separate store keyed by reservation id, with a
/// secondary employer index and a memo index so an already-settled memo can
/// be told apart from one that never existed.
pub struct ReservationRepository {
    pending: RwLock<BTreeMap<u64, Reservation>>,
    persisted: RwLock<BTreeMap<Uuid, Reservation>>,
    by_employer: RwLock<BTreeMap<Uuid, Vec<Uuid>>>,
    settled_memos: RwLock<BTreeMap<u64, Uuid>>,
}

impl ReservationRepository {
    pub fn new() -> Self {
        Self {
            pending: RwLock::new(BTreeMap::new()),
            persisted: RwLock::new(BTreeMap::new()),
            by_employer: RwLock::new(BTreeMap::new()),
            settled_memos: RwLock::new(BTreeMap::new()),
        }
    }

    pub async fn insert_pending(&self, reservation: Reservation) {
        let mut pending = self.pending.write().await;
        pending.insert(reservation.memo, reservation);
    }

    pub async fn get_pending(&self, memo: u64) -> Option<Reservation> {
        let pending = self.pending.read().await;
        pending.get(&memo).cloned()
    }

    /// Removes and returns the pending reservation for `memo`. Removing an
    /// already-removed key is a no-op returning `None`.
    pub async fn remove_pending(&self, memo: u64) -> Option<Reservation> {
        let mut pending = self.pending.write().await;
        pending.remove(&memo)
    }

    pub async fn insert_persisted(&self, reservation: Reservation) {
        let mut persisted = self.persisted.write().await;
        let mut by_employer = self.by_employer.write().await;
        let mut settled_memos = self.settled_memos.write().await;

        by_employer
            .entry(reservation.employer_id)
            .or_default()
            .push(reservation.id);
        settled_memos.insert(reservation.memo, reservation.id);
        persisted.insert(reservation.id, reservation);
    }

    pub async fn get_persisted(&self, reservation_id: Uuid) -> Option<Reservation> {
        let persisted = self.persisted.read().await;
        persisted.get(&reservation_id).cloned()
    }

    pub async fn persisted_for_employer(&self, employer_id: Uuid) -> Vec<Reservation> {
        let by_employer = self.by_employer.read().await;
        let persisted = self.persisted.read().await;
        by_employer
            .get(&employer_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| persisted.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn settled_reservation_for_memo(&self, memo: u64) -> Option<Uuid> {
        let settled_memos = self.settled_memos.read().await;
        settled_memos.get(&memo).copied()
    }

    pub async fn pending_len(&self) -> usize {
        let pending = self.pending.read().await;
        pending.len()
    }
}

impl Default for ReservationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation(memo: u64, employer_id: Uuid) -> Reservation {
        Reservation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            employer_id,
            "payer-acct".into(),
            "payee-acct".into(),
            500,
            memo,
        )
    }

    #[tokio::test]
    async fn test_pending_remove_is_idempotent() {
        let repo = ReservationRepository::new();
        repo.insert_pending(reservation(7, Uuid::new_v4())).await;

        assert!(repo.remove_pending(7).await.is_some());
        assert!(repo.remove_pending(7).await.is_none());
    }

    #[tokio::test]
    async fn test_persisted_indexes() {
        let repo = ReservationRepository::new();
        let employer = Uuid::new_v4();
        let first = reservation(1, employer).mark_completed(10);
        let second = reservation(2, employer).mark_completed(11);
        let first_id = first.id;

        repo.insert_persisted(first).await;
        repo.insert_persisted(second).await;
        repo.insert_persisted(reservation(3, Uuid::new_v4()).mark_completed(12))
            .await;

        let for_employer = repo.persisted_for_employer(employer).await;
        assert_eq!(for_employer.len(), 2);
        assert_eq!(repo.settled_reservation_for_memo(1).await, Some(first_id));
        assert_eq!(repo.settled_reservation_for_memo(9).await, None);
    }
}
