use std::sync::Arc;

use tracing::warn;

use crate::ledger::client::LedgerClient;
use crate::ledger::models::binary_address;

/// Outcome of checking a claimed settlement against the ledger.
///
/// `Unavailable` means the ledger could not be queried; callers may retry
/// without treating it as a payment failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verification {
    Verified,
    NotMatched,
    Unavailable,
}

/// Checks whether a transfer settling a reservation occurred on the ledger.
pub struct SettlementVerifier {
    ledger: Arc<dyn LedgerClient>,
}

impl SettlementVerifier {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    /// Queries exactly the claimed block and matches any transfer operation
    /// whose memo, sender (the payer's binary address), receiver (the
    /// payee's binary address), and amount all agree. Amount matching is
    /// exact integer equality.
    pub async fn verify(
        &self,
        payer_account: &str,
        payee_account: &str,
        amount: u64,
        block_index: u64,
        memo: u64,
    ) -> Verification {
        let range = match self.ledger.query_blocks(block_index, 1).await {
            Ok(range) => range,
            Err(e) => {
                warn!("Ledger query failed while verifying memo {}: {}", memo, e);
                return Verification::Unavailable;
            }
        };

        let payer_address = binary_address(payer_account);
        let payee_address = binary_address(payee_account);

        let matched = range.blocks.iter().any(|block| {
            let tx = &block.transaction;
            match &tx.transfer {
                Some(transfer) => {
                    tx.memo == memo
                        && transfer.from == payer_address
                        && transfer.to == payee_address
                        && transfer.amount == amount
                }
                None => false,
            }
        });

        if matched {
            Verification::Verified
        } else {
            Verification::NotMatched
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::client::MockLedger;
    use crate::ledger::models::{Block, Transaction, Transfer};

    fn transfer_block(memo: u64, from: &str, to: &str, amount: u64) -> Block {
        Block {
            transaction: Transaction {
                memo,
                transfer: Some(Transfer {
                    from: binary_address(from),
                    to: binary_address(to),
                    amount,
                }),
            },
        }
    }

    #[tokio::test]
    async fn test_matching_transfer_is_verified() {
        let ledger = MockLedger::new().with_block(42, transfer_block(9, "emp", "wrk", 500));
        let verifier = SettlementVerifier::new(Arc::new(ledger));

        assert_eq!(
            verifier.verify("emp", "wrk", 500, 42, 9).await,
            Verification::Verified
        );
    }

    #[tokio::test]
    async fn test_mismatches_are_not_matched() {
        let ledger = MockLedger::new().with_block(42, transfer_block(9, "emp", "wrk", 500));
        let verifier = SettlementVerifier::new(Arc::new(ledger));

        // Wrong amount.
        assert_eq!(
            verifier.verify("emp", "wrk", 499, 42, 9).await,
            Verification::NotMatched
        );
        // Wrong memo.
        assert_eq!(
            verifier.verify("emp", "wrk", 500, 42, 8).await,
            Verification::NotMatched
        );
        // Sender and receiver roles swapped.
        assert_eq!(
            verifier.verify("wrk", "emp", 500, 42, 9).await,
            Verification::NotMatched
        );
        // Wrong block.
        assert_eq!(
            verifier.verify("emp", "wrk", 500, 41, 9).await,
            Verification::NotMatched
        );
    }

    #[tokio::test]
    async fn test_block_without_transfer_is_not_matched() {
        let ledger = MockLedger::new().with_block(
            42,
            Block {
                transaction: Transaction {
                    memo: 9,
                    transfer: None,
                },
            },
        );
        let verifier = SettlementVerifier::new(Arc::new(ledger));

        assert_eq!(
            verifier.verify("emp", "wrk", 500, 42, 9).await,
            Verification::NotMatched
        );
    }

    #[tokio::test]
    async fn test_ledger_failure_is_unavailable_not_false() {
        let verifier = SettlementVerifier::new(Arc::new(MockLedger::failing()));

        assert_eq!(
            verifier.verify("emp", "wrk", 500, 42, 9).await,
            Verification::Unavailable
        );
    }
}
