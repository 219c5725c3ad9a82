use std::sync::Arc;

use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::marketplace::MarketplaceRepository;
use crate::payment::models::{CompletePaymentPayload, Reservation};
use crate::payment::repository::ReservationRepository;
use crate::payment::verifier::{SettlementVerifier, Verification};

/// Moves a reservation from pending to settled once the ledger confirms the
/// transfer: project marked fully paid, worker credited, completed record
/// persisted.
pub struct SettlementService {
    marketplace: Arc<MarketplaceRepository>,
    reservations: Arc<ReservationRepository>,
    verifier: SettlementVerifier,
}

impl SettlementService {
    pub fn new(
        marketplace: Arc<MarketplaceRepository>,
        reservations: Arc<ReservationRepository>,
        verifier: SettlementVerifier,
    ) -> Self {
        Self {
            marketplace,
            reservations,
            verifier,
        }
    }

    /// Completes a pending reservation against a claimed ledger block.
    ///
    /// Every entity the reconciliation touches is resolved before any write,
    /// so entity-missing cases fail pre-commit and leave the pending
    /// reservation intact. The commit phase performs four independent
    /// single-key writes with no multi-key transaction; a failure partway
    /// leaves prior writes committed and is logged as an incident.
    pub async fn complete(&self, payload: CompletePaymentPayload) -> AppResult<Reservation> {
        let pending = self
            .reservations
            .get_pending(payload.memo)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Cannot complete the payment reserve: there is no pending reserve with memo={}",
                    payload.memo
                ))
            })?;

        if pending.payer != payload.employer_account {
            return Err(AppError::InvalidPayload(format!(
                "Employer account does not match the payer of reservation memo={}",
                payload.memo
            )));
        }

        // Existence only. The commit phase mutates in place under each
        // store's write guard so a concurrent settlement cannot be clobbered
        // by a copy taken before the verification await.
        self.marketplace.get_project(pending.project_id).await?;
        self.marketplace
            .get_worker_profile_by_user(payload.worker_id)
            .await?;

        match self
            .verifier
            .verify(
                &pending.payer,
                &pending.payee,
                payload.amount,
                payload.block,
                payload.memo,
            )
            .await
        {
            Verification::Verified => {}
            Verification::NotMatched => {
                return Err(AppError::PaymentFailed(format!(
                    "Cannot complete the payment reserve: cannot verify the payment, memo={}",
                    payload.memo
                )));
            }
            Verification::Unavailable => {
                return Err(AppError::VerificationUnavailable(format!(
                    "Ledger could not be queried for memo={}, retry later",
                    payload.memo
                )));
            }
        }

        // Commit phase. The expiry timer races us on the memo key; whoever
        // removes the entry first wins.
        let reservation = self
            .reservations
            .remove_pending(payload.memo)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Cannot complete the payment reserve: there is no pending reserve with memo={}",
                    payload.memo
                ))
            })?;

        if let Err(e) = self
            .marketplace
            .mark_project_fully_paid(pending.project_id)
            .await
        {
            error!(
                "Settlement for memo {} inconsistent: pending removed but project update failed: {}",
                payload.memo, e
            );
            return Err(e);
        }

        let completed = reservation.mark_completed(payload.block);

        if let Err(e) = self
            .marketplace
            .credit_worker(payload.worker_id, payload.amount)
            .await
        {
            error!(
                "Settlement for memo {} inconsistent: project updated but worker credit failed: {}",
                payload.memo, e
            );
            return Err(e);
        }

        self.reservations.insert_persisted(completed.clone()).await;

        info!(
            "Payment reserve {} completed: memo={}, block={}, amount={}",
            completed.id, completed.memo, payload.block, payload.amount
        );
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::client::{LedgerClient, LedgerError, MockLedger};
    use crate::ledger::models::{binary_address, Block, BlockRange, Transaction, Transfer};
    use crate::marketplace::models::{
        CreateProjectPayload, CreateUserPayload, CreateWorkerProfilePayload, Project,
        ProjectPaymentStatus, User, UserRole, WorkerProfile,
    };
    use crate::payment::models::{ReservationStatus, ReservePaymentPayload};
    use crate::payment::reservation::ReservationManager;
    use std::time::Duration;
    use uuid::Uuid;

    struct Fixture {
        marketplace: Arc<MarketplaceRepository>,
        reservations: Arc<ReservationRepository>,
        employer_id: Uuid,
        worker_id: Uuid,
        project_id: Uuid,
        profile_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let marketplace = Arc::new(MarketplaceRepository::new());

        let employer = User::new(CreateUserPayload {
            full_name: "Eve Employer".into(),
            user_type: UserRole::Employer,
            email: "eve@example.com".into(),
            address: "1 Hiring St".into(),
            phone_number: "+15550000001".into(),
            owner: "acct-employer".into(),
        });
        let worker = User::new(CreateUserPayload {
            full_name: "Walt Worker".into(),
            user_type: UserRole::Worker,
            email: "walt@example.com".into(),
            address: "2 Builder Ave".into(),
            phone_number: "+15550000002".into(),
            owner: "acct-worker".into(),
        });
        let project = Project::new(CreateProjectPayload {
            job_id: Uuid::new_v4(),
            employer_id: employer.id,
            worker_id: worker.id,
            milestones: vec![],
            end_date: None,
        });
        let profile = WorkerProfile::new(CreateWorkerProfilePayload {
            user_id: worker.id,
            professional_summary: "Experienced builder".into(),
            work_experience: vec![],
            education: vec![],
            skills: vec![],
            languages: vec![],
            preferred_job_categories: vec![],
            portfolio_url: None,
            certifications: vec![],
            availability: "full-time".into(),
        });

        let fixture = Fixture {
            employer_id: employer.id,
            worker_id: worker.id,
            project_id: project.id,
            profile_id: profile.id,
            marketplace: marketplace.clone(),
            reservations: Arc::new(ReservationRepository::new()),
        };

        marketplace.insert_user(employer).await.unwrap();
        marketplace.insert_user(worker).await.unwrap();
        marketplace.insert_project(project).await.unwrap();
        marketplace.insert_worker_profile(profile).await.unwrap();
        fixture
    }

    async fn reserve(fixture: &Fixture, amount: u64) -> crate::payment::models::Reservation {
        let manager = ReservationManager::new(
            fixture.marketplace.clone(),
            fixture.reservations.clone(),
            Duration::from_secs(120),
        );
        manager
            .reserve(ReservePaymentPayload {
                worker_id: fixture.worker_id,
                employer_id: fixture.employer_id,
                project_id: fixture.project_id,
                amount,
            })
            .await
            .unwrap()
    }

    fn settlement_block(memo: u64, amount: u64) -> Block {
        Block {
            transaction: Transaction {
                memo,
                transfer: Some(Transfer {
                    from: binary_address("acct-employer"),
                    to: binary_address("acct-worker"),
                    amount,
                }),
            },
        }
    }

    fn service(fixture: &Fixture, ledger: MockLedger) -> SettlementService {
        SettlementService::new(
            fixture.marketplace.clone(),
            fixture.reservations.clone(),
            SettlementVerifier::new(Arc::new(ledger)),
        )
    }

    fn complete_payload(fixture: &Fixture, amount: u64, block: u64, memo: u64) -> CompletePaymentPayload {
        CompletePaymentPayload {
            employer_account: "acct-employer".into(),
            worker_id: fixture.worker_id,
            amount,
            block,
            memo,
        }
    }

    #[tokio::test]
    async fn test_complete_settlement_happy_path() {
        let fixture = fixture().await;
        let reservation = reserve(&fixture, 500).await;
        let ledger = MockLedger::new().with_block(42, settlement_block(reservation.memo, 500));
        let service = service(&fixture, ledger);

        let completed = service
            .complete(complete_payload(&fixture, 500, 42, reservation.memo))
            .await
            .unwrap();

        assert_eq!(completed.status, ReservationStatus::Completed);
        assert_eq!(completed.paid_at_block, Some(42));
        assert_eq!(completed.id, reservation.id);

        // Pending entry consumed, persisted record present.
        assert!(fixture.reservations.get_pending(reservation.memo).await.is_none());
        let persisted = fixture.reservations.get_persisted(reservation.id).await.unwrap();
        assert_eq!(persisted.status, ReservationStatus::Completed);
        assert_eq!(
            fixture
                .reservations
                .persisted_for_employer(fixture.employer_id)
                .await
                .len(),
            1
        );

        // Project fully paid, worker credited exactly once.
        let project = fixture.marketplace.get_project(fixture.project_id).await.unwrap();
        assert_eq!(project.payment_status, ProjectPaymentStatus::FullyPaid);
        let profile = fixture
            .marketplace
            .get_worker_profile(fixture.profile_id)
            .await
            .unwrap();
        assert_eq!(profile.total_earnings, 500);
        assert_eq!(profile.completed_jobs, 1);
    }

    #[tokio::test]
    async fn test_no_matching_block_fails_and_keeps_pending() {
        let fixture = fixture().await;
        let reservation = reserve(&fixture, 500).await;
        // Ledger has a block, but with the wrong amount.
        let ledger = MockLedger::new().with_block(42, settlement_block(reservation.memo, 499));
        let service = service(&fixture, ledger);

        let err = service
            .complete(complete_payload(&fixture, 500, 42, reservation.memo))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PaymentFailed(_)));

        assert!(fixture.reservations.get_pending(reservation.memo).await.is_some());
        let profile = fixture
            .marketplace
            .get_worker_profile(fixture.profile_id)
            .await
            .unwrap();
        assert_eq!(profile.total_earnings, 0);
        assert_eq!(profile.completed_jobs, 0);
    }

    #[tokio::test]
    async fn test_ledger_outage_is_distinct_from_payment_failure() {
        let fixture = fixture().await;
        let reservation = reserve(&fixture, 500).await;
        let service = service(&fixture, MockLedger::failing());

        let err = service
            .complete(complete_payload(&fixture, 500, 42, reservation.memo))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::VerificationUnavailable(_)));

        // Retryable: the pending reservation is untouched.
        assert!(fixture.reservations.get_pending(reservation.memo).await.is_some());
    }

    #[tokio::test]
    async fn test_double_completion_is_not_found_and_not_double_credited() {
        let fixture = fixture().await;
        let reservation = reserve(&fixture, 500).await;
        let ledger = MockLedger::new().with_block(42, settlement_block(reservation.memo, 500));
        let service = service(&fixture, ledger);

        service
            .complete(complete_payload(&fixture, 500, 42, reservation.memo))
            .await
            .unwrap();
        let err = service
            .complete(complete_payload(&fixture, 500, 42, reservation.memo))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let profile = fixture
            .marketplace
            .get_worker_profile(fixture.profile_id)
            .await
            .unwrap();
        assert_eq!(profile.total_earnings, 500);
        assert_eq!(profile.completed_jobs, 1);
    }

    /// Ledger whose queries take long enough for two in-flight settlements
    /// to overlap across the verification await.
    struct SlowLedger {
        inner: MockLedger,
    }

    #[async_trait::async_trait]
    impl LedgerClient for SlowLedger {
        async fn query_blocks(&self, start: u64, length: u64) -> Result<BlockRange, LedgerError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.inner.query_blocks(start, length).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_settlements_each_credit_worker() {
        let fixture = fixture().await;
        let first = reserve(&fixture, 500).await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        let second = reserve(&fixture, 500).await;
        assert_ne!(first.memo, second.memo);

        let ledger = SlowLedger {
            inner: MockLedger::new()
                .with_block(42, settlement_block(first.memo, 500))
                .with_block(43, settlement_block(second.memo, 500)),
        };
        let service = SettlementService::new(
            fixture.marketplace.clone(),
            fixture.reservations.clone(),
            SettlementVerifier::new(Arc::new(ledger)),
        );

        let (a, b) = tokio::join!(
            service.complete(complete_payload(&fixture, 500, 42, first.memo)),
            service.complete(complete_payload(&fixture, 500, 43, second.memo)),
        );
        a.unwrap();
        b.unwrap();

        // Neither settlement may overwrite the other's credit.
        let profile = fixture
            .marketplace
            .get_worker_profile(fixture.profile_id)
            .await
            .unwrap();
        assert_eq!(profile.total_earnings, 1000);
        assert_eq!(profile.completed_jobs, 2);
        assert_eq!(
            fixture
                .reservations
                .persisted_for_employer(fixture.employer_id)
                .await
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_unknown_memo_is_not_found() {
        let fixture = fixture().await;
        let service = service(&fixture, MockLedger::new());

        let err = service
            .complete(complete_payload(&fixture, 500, 42, 12345))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mismatched_employer_account_is_rejected() {
        let fixture = fixture().await;
        let reservation = reserve(&fixture, 500).await;
        let ledger = MockLedger::new().with_block(42, settlement_block(reservation.memo, 500));
        let service = service(&fixture, ledger);

        let err = service
            .complete(CompletePaymentPayload {
                employer_account: "acct-impostor".into(),
                worker_id: fixture.worker_id,
                amount: 500,
                block: 42,
                memo: reservation.memo,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload(_)));
        assert!(fixture.reservations.get_pending(reservation.memo).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_worker_profile_fails_before_any_write() {
        let fixture = fixture().await;
        let reservation = reserve(&fixture, 500).await;
        let ledger = MockLedger::new().with_block(42, settlement_block(reservation.memo, 500));
        let service = service(&fixture, ledger);

        // Complete on behalf of a worker id with no profile.
        let err = service
            .complete(CompletePaymentPayload {
                employer_account: "acct-employer".into(),
                worker_id: Uuid::new_v4(),
                amount: 500,
                block: 42,
                memo: reservation.memo,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Pre-commit failure: pending intact, project untouched.
        assert!(fixture.reservations.get_pending(reservation.memo).await.is_some());
        let project = fixture.marketplace.get_project(fixture.project_id).await.unwrap();
        assert_eq!(project.payment_status, ProjectPaymentStatus::Pending);
    }
}
