//! Pool index service client
//!
//! The hosted index serves pool summaries with pagination; filtering by
//! coin types returns an unranked, unpaginated set (no total-page count).
//! The service only exists for mainnet — other networks must enumerate
//! pools straight from the ledger and constructing the HTTP client fails
//! up front for them.

use serde::Deserialize;

use clamm_core::{ClammConfig, LedgerError, Network, Result};

use crate::state::PoolMetadata;

/// Default page size used when draining the index
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One page of pool summaries
#[derive(Debug, Clone)]
pub struct PoolMetadataPage {
    pub pools: Vec<PoolMetadata>,
    /// Absent when the query was filtered by coin types
    pub total_pages: Option<u32>,
}

/// Paginated pool-metadata listing contract
#[allow(async_fn_in_trait)]
pub trait PoolIndex {
    /// Fetch one page of summaries (pages are 1-based).
    async fn pools_page(&self, page: u32, page_size: u32) -> Result<PoolMetadataPage>;

    /// Fetch every pool touching any of the given coin types.
    async fn pools_by_coin_types(&self, coin_types: &[String]) -> Result<Vec<PoolMetadata>>;
}

/// HTTP client for the hosted pool index
#[derive(Debug, Clone)]
pub struct HttpPoolIndex {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPoolIndex {
    pub fn new(config: &ClammConfig) -> Result<Self> {
        if config.network != Network::Mainnet {
            return Err(LedgerError::IndexUnavailable {
                network: config.network.to_string(),
            }
            .into());
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.index_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, query: &[(&str, String)]) -> Result<PoolsResponse> {
        let url = format!("{}/pools", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| LedgerError::Rpc {
                message: e.to_string(),
            })?
            .error_for_status()
            .map_err(|e| LedgerError::Rpc {
                message: e.to_string(),
            })?;

        response
            .json::<PoolsResponse>()
            .await
            .map_err(|e| LedgerError::ParseError(e.to_string()).into())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoolsResponse {
    pools: Vec<PoolMetadata>,
    #[serde(default)]
    total_pages: Option<u32>,
}

impl PoolIndex for HttpPoolIndex {
    async fn pools_page(&self, page: u32, page_size: u32) -> Result<PoolMetadataPage> {
        let body = self
            .fetch(&[
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ])
            .await?;
        Ok(PoolMetadataPage {
            pools: body.pools,
            total_pages: body.total_pages,
        })
    }

    async fn pools_by_coin_types(&self, coin_types: &[String]) -> Result<Vec<PoolMetadata>> {
        let body = self
            .fetch(&[("coinTypes", coin_types.join(","))])
            .await?;
        Ok(body.pools)
    }
}

/// Drain every page of the index into one list.
pub async fn fetch_all_pool_metadata<I: PoolIndex>(
    index: &I,
    page_size: u32,
) -> Result<Vec<PoolMetadata>> {
    let first = index.pools_page(1, page_size).await?;
    let total_pages = first.total_pages.unwrap_or(1);
    let mut pools = first.pools;

    for page in 2..=total_pages {
        pools.extend(index.pools_page(page, page_size).await?.pools);
    }

    Ok(pools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clamm_core::{Error, ObjectId};

    struct PagedIndex {
        pages: Vec<Vec<PoolMetadata>>,
    }

    fn metadata(tail: u32) -> PoolMetadata {
        PoolMetadata {
            pool_object_id: ObjectId::parse(&format!("0x{:x}", tail)).unwrap(),
            lp_coin_type: format!("0x{:x}::lp::LP", tail),
            is_stable: false,
            coin_types: vec![],
            hooks: None,
        }
    }

    impl PoolIndex for PagedIndex {
        async fn pools_page(&self, page: u32, _page_size: u32) -> Result<PoolMetadataPage> {
            let pools = self.pages[(page - 1) as usize].clone();
            Ok(PoolMetadataPage {
                pools,
                total_pages: Some(self.pages.len() as u32),
            })
        }

        async fn pools_by_coin_types(
            &self,
            _coin_types: &[String],
        ) -> Result<Vec<PoolMetadata>> {
            Ok(self.pages.concat())
        }
    }

    #[tokio::test]
    async fn test_fetch_all_drains_every_page() {
        let index = PagedIndex {
            pages: vec![
                vec![metadata(1), metadata(2)],
                vec![metadata(3)],
                vec![metadata(4)],
            ],
        };

        let pools = fetch_all_pool_metadata(&index, 2).await.unwrap();
        assert_eq!(pools.len(), 4);
    }

    #[test]
    fn test_http_index_is_mainnet_only() {
        let mut config = crate::test_util::config();
        config.network = Network::Testnet;

        let err = HttpPoolIndex::new(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::IndexUnavailable { .. })
        ));
    }

    #[test]
    fn test_http_index_trims_trailing_slash() {
        let mut config = crate::test_util::config();
        config.index_url = "https://api.suicoins.com/v1/".to_string();

        let index = HttpPoolIndex::new(&config).unwrap();
        assert!(index.base_url.ends_with("/v1"));
    }
}
