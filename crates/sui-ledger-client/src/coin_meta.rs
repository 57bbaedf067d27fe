//! Coin metadata cache
//!
//! Process-wide, read-through memoization of coin metadata keyed by
//! normalized coin type. The cache is an explicitly constructed handle —
//! clone it to share it — so tests can inject a seeded instance instead of
//! relying on module-level state. Concurrent population is safe because
//! duplicate fetches for the same key are idempotent (last writer wins).

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use clamm_core::{normalize_coin_type, LedgerError, ObjectId, Result};

use crate::LedgerClient;

/// Metadata describing a coin type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinMetadata {
    /// Normalized coin type tag
    pub coin_type: String,
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
    /// Id of the on-chain metadata object, when one exists.
    /// Pool creation needs this to register coin decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_object_id: Option<ObjectId>,
}

/// Shared read-through coin metadata cache
#[derive(Debug, Clone, Default)]
pub struct CoinMetadataCache {
    inner: Arc<RwLock<HashMap<String, CoinMetadata>>>,
}

impl CoinMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache pre-populated from a bundled metadata table.
    ///
    /// Entries with unparseable coin types are skipped rather than failing
    /// the whole seed.
    pub fn seeded(entries: impl IntoIterator<Item = CoinMetadata>) -> Self {
        let mut map = HashMap::new();
        for entry in entries {
            match normalize_coin_type(&entry.coin_type) {
                Ok(coin_type) => {
                    map.insert(coin_type, entry);
                }
                Err(_) => {
                    tracing::warn!(coin_type = %entry.coin_type, "skipping unparseable seed entry");
                }
            }
        }
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Look up metadata for a coin type, fetching and memoizing on miss.
    pub async fn get<L: LedgerClient>(&self, client: &L, coin_type: &str) -> Result<CoinMetadata> {
        let normalized = normalize_coin_type(coin_type)?;

        if let Some(cached) = self.inner.read().await.get(&normalized) {
            return Ok(cached.clone());
        }

        let fetched = client
            .get_coin_metadata(&normalized)
            .await?
            .ok_or_else(|| LedgerError::CoinMetadataNotFound {
                coin_type: normalized.clone(),
            })?;

        let mut guard = self.inner.write().await;
        guard.insert(normalized.clone(), fetched.clone());
        Ok(fetched)
    }

    /// Look up metadata for several coin types, deduplicating first.
    ///
    /// Fails if any coin has no metadata; callers that tolerate gaps should
    /// call [`Self::get`] per coin.
    pub async fn get_many<L: LedgerClient>(
        &self,
        client: &L,
        coin_types: &[String],
    ) -> Result<Vec<CoinMetadata>> {
        let mut unique: Vec<String> = Vec::new();
        for coin_type in coin_types {
            let normalized = normalize_coin_type(coin_type)?;
            if !unique.contains(&normalized) {
                unique.push(normalized);
            }
        }

        let lookups = unique.iter().map(|coin_type| self.get(client, coin_type));
        futures::future::join_all(lookups)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()
    }

    /// Number of memoized entries (test hook).
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
