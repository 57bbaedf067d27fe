//! Shared fixtures and an in-memory ledger double for tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use clamm_core::{ClammConfig, LedgerError, Network, ObjectId};
use sui_ledger_client::object::{
    CommandResult, DevInspectResults, DynamicFieldInfo, DynamicFieldPage, ObjectData, ReturnValue,
};
use sui_ledger_client::{CoinMetadata, LedgerClient};
use sui_ptb::TransactionDraft;

use crate::state::{InterestPool, Pool, StablePoolState, VolatilePoolState};

pub const PACKAGE: &str =
    "0x00000000000000000000000000000000000000000000000000000000000000a1";
pub const SUITEARS: &str =
    "0x00000000000000000000000000000000000000000000000000000000000000b2";

pub const USDC: &str =
    "0xb97fc1bf5fb56a3b45dd312dbefbb5c9fb4453205ff67a05c73f3ba9964b5b66::usdc::USDC";
pub const USDT: &str =
    "0xae870af23dda8285a5f11e8136190568796bb76a6e7f3b4061f7ded0c1ebe889::usdt::USDT";
pub const ETH: &str =
    "0xc179ea5266d66726abd4ddbaa2d54cd69acef3de43734a1aeafdbf14470e0592::eth::ETH";

pub const STABLE_POOL_ID: &str =
    "0xc327293beb3dad06ef8d49c825a2aafc0be96ff03dcd61dbdba7c8c3e0b27c5d";
pub const VOLATILE_POOL_ID: &str =
    "0x2710403d3852257df01f1708d92b6317b1535c3b9dbba5258db872f516954ca3";

fn oid(id: &str) -> ObjectId {
    ObjectId::parse(id).unwrap()
}

pub fn config() -> ClammConfig {
    ClammConfig::new(oid(PACKAGE), oid(SUITEARS), Network::Mainnet)
}

pub fn stable_pool() -> InterestPool {
    InterestPool::Stable(Pool {
        pool_object_id: oid(STABLE_POOL_ID),
        state_id: oid("0x51"),
        lp_coin_type: "0x99::ipx_s_usdc_usdt::IPX_S_USDC_USDT".to_string(),
        coin_types: vec![USDC.to_string(), USDT.to_string()],
        pool_admin_address: "0x77".to_string(),
        state: StablePoolState {
            n_coins: 2,
            lp_coin_decimals: 9,
            ..Default::default()
        },
    })
}

pub fn volatile_pool() -> InterestPool {
    InterestPool::Volatile(Pool {
        pool_object_id: oid(VOLATILE_POOL_ID),
        state_id: oid("0x52"),
        lp_coin_type: "0x88::ipx_v_usdt_eth::IPX_V_USDT_ETH".to_string(),
        coin_types: vec![USDT.to_string(), ETH.to_string()],
        pool_admin_address: "0x77".to_string(),
        state: VolatilePoolState {
            n_coins: 2,
            ..Default::default()
        },
    })
}

/// Build dev-inspect results from per-command u64 scalars.
pub fn inspect_with(commands: Vec<Vec<u64>>) -> DevInspectResults {
    DevInspectResults {
        results: commands
            .into_iter()
            .map(|values| CommandResult {
                return_values: values.into_iter().map(ReturnValue::u64).collect(),
            })
            .collect(),
        error: None,
    }
}

/// In-memory ledger double: scripted dev-inspect responses, an object
/// store, and call accounting.
#[derive(Default)]
pub struct MockLedger {
    objects: Mutex<HashMap<ObjectId, ObjectData>>,
    dynamic_fields: Mutex<HashMap<ObjectId, Vec<DynamicFieldInfo>>>,
    coin_metadata: Mutex<HashMap<String, CoinMetadata>>,
    inspects: Mutex<VecDeque<DevInspectResults>>,
    inspect_calls: AtomicUsize,
    last_draft: Mutex<Option<TransactionDraft>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_object(&self, object: ObjectData) {
        self.objects
            .lock()
            .unwrap()
            .insert(object.object_id.clone(), object);
    }

    pub fn insert_dynamic_fields(&self, parent: &str, fields: Vec<DynamicFieldInfo>) {
        self.dynamic_fields.lock().unwrap().insert(oid(parent), fields);
    }

    pub fn insert_coin_metadata(&self, metadata: CoinMetadata) {
        self.coin_metadata
            .lock()
            .unwrap()
            .insert(metadata.coin_type.clone(), metadata);
    }

    pub fn push_inspect(&self, results: DevInspectResults) {
        self.inspects.lock().unwrap().push_back(results);
    }

    pub fn inspect_call_count(&self) -> usize {
        self.inspect_calls.load(Ordering::SeqCst)
    }

    pub fn last_draft(&self) -> Option<TransactionDraft> {
        self.last_draft.lock().unwrap().clone()
    }
}

impl LedgerClient for MockLedger {
    async fn get_object(&self, id: &ObjectId) -> sui_ledger_client::Result<ObjectData> {
        self.objects
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::ObjectNotFound {
                object_id: id.to_string(),
            })
    }

    async fn multi_get_objects(
        &self,
        ids: &[ObjectId],
    ) -> sui_ledger_client::Result<Vec<ObjectData>> {
        let objects = self.objects.lock().unwrap();
        ids.iter()
            .map(|id| {
                objects
                    .get(id)
                    .cloned()
                    .ok_or_else(|| LedgerError::ObjectNotFound {
                        object_id: id.to_string(),
                    })
            })
            .collect()
    }

    async fn get_dynamic_fields(
        &self,
        parent: &ObjectId,
        _cursor: Option<String>,
    ) -> sui_ledger_client::Result<DynamicFieldPage> {
        let data = self
            .dynamic_fields
            .lock()
            .unwrap()
            .get(parent)
            .cloned()
            .unwrap_or_default();
        Ok(DynamicFieldPage {
            data,
            next_cursor: None,
            has_next_page: false,
        })
    }

    async fn dev_inspect(
        &self,
        draft: &TransactionDraft,
        _sender: &str,
    ) -> sui_ledger_client::Result<DevInspectResults> {
        self.inspect_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_draft.lock().unwrap() = Some(draft.clone());
        Ok(self
            .inspects
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn get_coin_metadata(
        &self,
        coin_type: &str,
    ) -> sui_ledger_client::Result<Option<CoinMetadata>> {
        Ok(self.coin_metadata.lock().unwrap().get(coin_type).cloned())
    }
}
