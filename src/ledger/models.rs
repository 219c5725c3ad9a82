use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One block as returned by the ledger. A block carries at most one
/// transfer-type operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub transaction: Transaction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Correlation memo recorded with the transfer.
    pub memo: u64,
    pub transfer: Option<Transfer>,
}

/// Transfer operation inside a block. Addresses are opaque binary account
/// addresses in hex form.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockRange {
    pub blocks: Vec<Block>,
}

/// Binary account address for a marketplace account, as it appears in
/// ledger transfer operations.
pub fn binary_address(account: &str) -> String {
    hex::encode(Sha256::digest(account.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_address_is_stable_and_distinct() {
        let a = binary_address("employer-account");
        let b = binary_address("worker-account");
        assert_eq!(a, binary_address("employer-account"));
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
