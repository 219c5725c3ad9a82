use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::ledger::models::BlockRange;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger request failed: {0}")]
    Request(String),

    #[error("Ledger returned malformed response: {0}")]
    Malformed(String),
}

/// External ledger abstraction. The settlement verifier only ever asks for a
/// fixed-length window of blocks.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn query_blocks(&self, start: u64, length: u64) -> Result<BlockRange, LedgerError>;
}

/// HTTP client against the ledger gateway.
pub struct HttpLedgerClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLedgerClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn query_blocks(&self, start: u64, length: u64) -> Result<BlockRange, LedgerError> {
        let url = format!(
            "{}/blocks?start={}&length={}",
            self.base_url, start, length
        );
        debug!("Querying ledger blocks: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LedgerError::Request(format!(
                "ledger responded with status {}",
                response.status()
            )));
        }

        response
            .json::<BlockRange>()
            .await
            .map_err(|e| LedgerError::Malformed(e.to_string()))
    }
}

/// In-memory ledger for tests: serves a fixed window of blocks, or a
/// configured error.
#[cfg(test)]
pub struct MockLedger {
    blocks: std::collections::HashMap<u64, Vec<crate::ledger::models::Block>>,
    fail: bool,
}

#[cfg(test)]
impl MockLedger {
    pub fn new() -> Self {
        Self {
            blocks: std::collections::HashMap::new(),
            fail: false,
        }
    }

    pub fn with_block(mut self, index: u64, block: crate::ledger::models::Block) -> Self {
        self.blocks.entry(index).or_default().push(block);
        self
    }

    pub fn failing() -> Self {
        Self {
            blocks: std::collections::HashMap::new(),
            fail: true,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LedgerClient for MockLedger {
    async fn query_blocks(&self, start: u64, length: u64) -> Result<BlockRange, LedgerError> {
        if self.fail {
            return Err(LedgerError::Request("mock ledger unavailable".into()));
        }
        let mut blocks = Vec::new();
        for index in start..start + length {
            if let Some(found) = self.blocks.get(&index) {
                blocks.extend(found.iter().cloned());
            }
        }
        Ok(BlockRange { blocks })
    }
}
