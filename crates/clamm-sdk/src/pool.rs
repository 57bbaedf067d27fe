//! Pool fetching and resolution
//!
//! Pools are fetched on demand given an identifier and never cached across
//! calls — every entry point that accepts a pool-or-id re-fetches when
//! handed a bare id. Identifier format is validated before any I/O, and an
//! object of a different protocol is rejected rather than mis-decoded.

use std::collections::HashMap;

use clamm_core::{normalize_coin_type, ClammConfig, DecodeError, Error, ObjectId, Result};
use sui_ledger_client::record::{array_at, str_at};
use sui_ledger_client::{LedgerClient, ObjectData};

use crate::constants::modules;
use crate::decode::{parse_coin_state, parse_stable_state, parse_volatile_state, CoinStatesSource};
use crate::quote::PoolsMap;
use crate::state::{CoinState, CurveKind, InterestPool, Pool, PoolRef};

/// Fetch and decode a pool by identifier.
pub async fn get_pool<L: LedgerClient>(
    client: &L,
    config: &ClammConfig,
    id: &str,
) -> Result<InterestPool> {
    let pool_id = ObjectId::parse(id)?;
    let object = client.get_object(&pool_id).await?;
    let header = decode_header(config, &object)?;
    let state_object = client.get_object(&header.state_id).await?;
    assemble(client, header, &state_object).await
}

/// Resolve a pool-or-id argument, fetching only when handed a bare id.
pub async fn resolve_pool<L: LedgerClient>(
    client: &L,
    config: &ClammConfig,
    pool: PoolRef,
) -> Result<InterestPool> {
    match pool {
        PoolRef::Object(pool) => Ok(*pool),
        PoolRef::Id(id) => get_pool(client, config, id.as_str()).await,
    }
}

/// Fetch several pools: one multi-get for the pool objects, one for their
/// state objects.
pub async fn get_pools<L: LedgerClient>(
    client: &L,
    config: &ClammConfig,
    ids: &[ObjectId],
) -> Result<Vec<InterestPool>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let objects = client.multi_get_objects(ids).await?;
    let headers = objects
        .iter()
        .map(|object| decode_header(config, object))
        .collect::<Result<Vec<_>>>()?;

    let state_ids: Vec<ObjectId> = headers.iter().map(|h| h.state_id.clone()).collect();
    let state_objects = client.multi_get_objects(&state_ids).await?;

    let mut pools = Vec::with_capacity(headers.len());
    for (header, state_object) in headers.into_iter().zip(&state_objects) {
        pools.push(assemble(client, header, state_object).await?);
    }
    Ok(pools)
}

/// Fetch pools into a map keyed by pool id, ready for quote chaining.
pub async fn get_pools_map<L: LedgerClient>(
    client: &L,
    config: &ClammConfig,
    ids: &[ObjectId],
) -> Result<PoolsMap> {
    let pools = get_pools(client, config, ids).await?;
    Ok(pools
        .into_iter()
        .map(|pool| (pool.pool_object_id().clone(), pool))
        .collect())
}

struct PoolHeader {
    pool_object_id: ObjectId,
    state_id: ObjectId,
    coin_types: Vec<String>,
    pool_admin_address: String,
    kind: CurveKind,
}

/// Identify the pool's curve kind from its type tag, rejecting objects of
/// other packages or non-pool types.
fn curve_kind(config: &ClammConfig, object: &ObjectData) -> Result<CurveKind> {
    let prefix = format!("{}::{}::InterestPool<", config.package, modules::POOL);

    let foreign = || DecodeError::ForeignPool {
        object_id: object.object_id.to_string(),
        type_tag: object.type_tag.clone(),
    };

    let inner = object
        .type_tag
        .strip_prefix(prefix.as_str())
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(foreign)?;

    if inner == config.stable_curve_type() {
        Ok(CurveKind::Stable)
    } else if inner == config.volatile_curve_type() {
        Ok(CurveKind::Volatile)
    } else {
        Err(foreign().into())
    }
}

fn decode_header(config: &ClammConfig, object: &ObjectData) -> Result<PoolHeader> {
    let kind = curve_kind(config, object)?;
    let fields = &object.content;

    let coin_types = array_at(fields, &["coins", "fields", "contents"])?
        .iter()
        .map(|entry| {
            let raw = str_at(entry, &["fields", "name"])?;
            normalize_coin_type(raw)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let pool_admin_address = str_at(fields, &["pool_admin_address"])?.to_string();

    let state_raw = str_at(fields, &["state", "fields", "id", "id"])?;
    let state_id = ObjectId::parse(state_raw).map_err(|_| DecodeError::InvalidId {
        path: "state.fields.id.id".to_string(),
        value: state_raw.to_string(),
    })?;

    Ok(PoolHeader {
        pool_object_id: object.object_id.clone(),
        state_id,
        coin_types,
        pool_admin_address,
        kind,
    })
}

async fn assemble<L: LedgerClient>(
    client: &L,
    header: PoolHeader,
    state_object: &ObjectData,
) -> Result<InterestPool> {
    match header.kind {
        CurveKind::Stable => {
            let (state, lp_coin_type) = parse_stable_state(&state_object.content)?;
            Ok(InterestPool::Stable(Pool {
                pool_object_id: header.pool_object_id,
                state_id: header.state_id,
                lp_coin_type,
                coin_types: header.coin_types,
                pool_admin_address: header.pool_admin_address,
                state,
            }))
        }
        CurveKind::Volatile => {
            let decoded = parse_volatile_state(&state_object.content)?;

            let states = match decoded.coin_states {
                CoinStatesSource::Inline(states) => states,
                CoinStatesSource::Collection(parent) => {
                    fetch_coin_states(client, &parent).await?
                }
            };

            let mut coin_states = HashMap::with_capacity(states.len());
            for state in states {
                coin_states.insert(state.coin_type.clone(), state);
            }
            check_coin_state_cover(&coin_states, &header.coin_types)?;

            let mut state = decoded.state;
            state.coin_states = coin_states;

            Ok(InterestPool::Volatile(Pool {
                pool_object_id: header.pool_object_id,
                state_id: header.state_id,
                lp_coin_type: decoded.lp_coin_type,
                coin_types: header.coin_types,
                pool_admin_address: header.pool_admin_address,
                state,
            }))
        }
    }
}

/// Enumerate and decode a dynamic-field coin-state collection.
async fn fetch_coin_states<L: LedgerClient>(
    client: &L,
    parent: &ObjectId,
) -> Result<Vec<CoinState>> {
    let mut field_ids = Vec::new();
    let mut cursor = None;

    loop {
        let page = client.get_dynamic_fields(parent, cursor).await?;
        field_ids.extend(page.data.into_iter().map(|field| field.object_id));
        if !page.has_next_page || page.next_cursor.is_none() {
            break;
        }
        cursor = page.next_cursor;
    }

    let objects = client.multi_get_objects(&field_ids).await?;
    objects
        .iter()
        .map(|object| parse_coin_state(&object.content).map_err(Error::from))
        .collect()
}

fn check_coin_state_cover(
    coin_states: &HashMap<String, CoinState>,
    coin_types: &[String],
) -> Result<()> {
    for coin_type in coin_types {
        if !coin_states.contains_key(coin_type) {
            return Err(DecodeError::CoinStateMismatch {
                reason: format!("no state for {coin_type}"),
            }
            .into());
        }
    }
    if coin_states.len() != coin_types.len() {
        return Err(DecodeError::CoinStateMismatch {
            reason: format!(
                "{} states for {} coins",
                coin_states.len(),
                coin_types.len()
            ),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{
        config, stable_pool, MockLedger, ETH, PACKAGE, STABLE_POOL_ID, USDC, USDT,
        VOLATILE_POOL_ID,
    };
    use clamm_core::LedgerError;
    use serde_json::json;
    use sui_ledger_client::object::DynamicFieldInfo;

    fn oid(id: &str) -> ObjectId {
        ObjectId::parse(id).unwrap()
    }

    fn type_name_entry(tag: &str) -> serde_json::Value {
        json!({ "fields": { "name": tag } })
    }

    fn stable_pool_object() -> ObjectData {
        ObjectData {
            object_id: oid(STABLE_POOL_ID),
            version: 7,
            type_tag: format!(
                "{}::interest_pool::InterestPool<{}::curves::Stable>",
                PACKAGE, PACKAGE
            ),
            content: json!({
                "id": { "id": STABLE_POOL_ID },
                "coins": {
                    "fields": {
                        "contents": [type_name_entry(USDC), type_name_entry(USDT)]
                    }
                },
                "pool_admin_address": "0x77",
                "state": { "fields": { "id": { "id": "0x0000000000000000000000000000000000000000000000000000000000000051" } } }
            }),
        }
    }

    fn stable_state_object() -> ObjectData {
        ObjectData {
            object_id: oid("0x51"),
            version: 7,
            type_tag: "0x2::dynamic_field::Field".to_string(),
            content: json!({
                "value": {
                    "fields": {
                        "lp_coin_supply": {
                            "type": "0x2::balance::Supply<0x99::ipx_s_usdc_usdt::IPX_S_USDC_USDT>",
                            "fields": { "value": "1000000" }
                        },
                        "balances": ["500", "700"],
                        "initial_a": "360",
                        "future_a": "1500",
                        "initial_a_time": "0",
                        "future_a_time": "0",
                        "fees": { "fields": {
                            "fee_in_percent": "1",
                            "fee_out_percent": "2",
                            "admin_fee_percent": "3"
                        } }
                    }
                }
            }),
        }
    }

    fn volatile_pool_object() -> ObjectData {
        ObjectData {
            object_id: oid(VOLATILE_POOL_ID),
            version: 9,
            type_tag: format!(
                "{}::interest_pool::InterestPool<{}::curves::Volatile>",
                PACKAGE, PACKAGE
            ),
            content: json!({
                "id": { "id": VOLATILE_POOL_ID },
                "coins": {
                    "fields": {
                        "contents": [type_name_entry(USDT), type_name_entry(ETH)]
                    }
                },
                "pool_admin_address": "0x77",
                "state": { "fields": { "id": { "id": "0x0000000000000000000000000000000000000000000000000000000000000052" } } }
            }),
        }
    }

    fn volatile_state_object() -> ObjectData {
        ObjectData {
            object_id: oid("0x52"),
            version: 9,
            type_tag: "0x2::dynamic_field::Field".to_string(),
            content: json!({
                "value": {
                    "fields": {
                        "lp_coin_supply": {
                            "type": "0x2::balance::Supply<0x88::ipx_v_usdt_eth::IPX_V_USDT_ETH>",
                            "fields": { "value": "5000000" }
                        },
                        "balances": ["100", "200"],
                        "a_gamma": { "fields": {
                            "a": "400000",
                            "gamma": "145000000000000",
                            "future_a": "400000",
                            "future_gamma": "145000000000000",
                            "initial_time": "0",
                            "future_time": "0"
                        } },
                        "d": "42",
                        "virtual_price": "1000000000000000000",
                        "xcp_profit": "0",
                        "xcp_profit_a": "0",
                        "coin_states": { "fields": { "id": { "id": "0x00000000000000000000000000000000000000000000000000000000000000cc" } } }
                    }
                }
            }),
        }
    }

    fn coin_state_field(id: &str, tag: &str, index: u64) -> ObjectData {
        ObjectData {
            object_id: oid(id),
            version: 1,
            type_tag: "0x2::dynamic_field::Field".to_string(),
            content: json!({
                "value": {
                    "fields": {
                        "type_name": { "fields": { "name": tag } },
                        "index": index,
                        "last_price": "10",
                        "price": "11",
                        "price_oracle": "12"
                    }
                }
            }),
        }
    }

    fn ledger_with_stable() -> MockLedger {
        let ledger = MockLedger::new();
        ledger.insert_object(stable_pool_object());
        ledger.insert_object(stable_state_object());
        ledger
    }

    #[tokio::test]
    async fn test_get_pool_stable() {
        let ledger = ledger_with_stable();
        let pool = get_pool(&ledger, &config(), STABLE_POOL_ID).await.unwrap();

        assert!(pool.is_stable());
        assert_eq!(pool.coin_types(), &[USDC.to_string(), USDT.to_string()]);
        assert_eq!(pool.lp_coin_type(), "0x99::ipx_s_usdc_usdt::IPX_S_USDC_USDT");
        match pool {
            InterestPool::Stable(pool) => {
                assert_eq!(pool.state.n_coins, 2);
                assert_eq!(pool.pool_admin_address, "0x77");
            }
            other => panic!("expected stable pool, got {:?}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_get_pool_invalid_identifier_fails_before_io() {
        let ledger = MockLedger::new();
        let err = get_pool(&ledger, &config(), "zz-not-hex").await.unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_get_pool_absent_object() {
        let ledger = MockLedger::new();
        let err = get_pool(&ledger, &config(), STABLE_POOL_ID).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Ledger(LedgerError::ObjectNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_pool_foreign_protocol() {
        let ledger = MockLedger::new();
        let mut object = stable_pool_object();
        object.type_tag =
            "0xdead::other_amm::Pool<0xdead::curves::Stable>".to_string();
        ledger.insert_object(object);

        let err = get_pool(&ledger, &config(), STABLE_POOL_ID).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::ForeignPool { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_pool_volatile_with_dynamic_coin_states() {
        let ledger = MockLedger::new();
        ledger.insert_object(volatile_pool_object());
        ledger.insert_object(volatile_state_object());
        ledger.insert_dynamic_fields(
            "0xcc",
            vec![
                DynamicFieldInfo {
                    object_id: oid("0xc1"),
                    type_tag: "0x2::type_name::TypeName".to_string(),
                },
                DynamicFieldInfo {
                    object_id: oid("0xc2"),
                    type_tag: "0x2::type_name::TypeName".to_string(),
                },
            ],
        );
        ledger.insert_object(coin_state_field("0xc1", USDT, 0));
        ledger.insert_object(coin_state_field("0xc2", ETH, 1));

        let pool = get_pool(&ledger, &config(), VOLATILE_POOL_ID).await.unwrap();
        match pool {
            InterestPool::Volatile(pool) => {
                assert_eq!(pool.state.coin_states.len(), 2);
                assert_eq!(pool.state.coin_states[USDT].index, 0);
                assert_eq!(pool.state.coin_states[ETH].index, 1);
            }
            other => panic!("expected volatile pool, got {:?}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_volatile_coin_states_must_cover_coins() {
        let ledger = MockLedger::new();
        ledger.insert_object(volatile_pool_object());
        ledger.insert_object(volatile_state_object());
        // only one of the two coins has a state entry
        ledger.insert_dynamic_fields(
            "0xcc",
            vec![DynamicFieldInfo {
                object_id: oid("0xc1"),
                type_tag: "0x2::type_name::TypeName".to_string(),
            }],
        );
        ledger.insert_object(coin_state_field("0xc1", USDT, 0));

        let err = get_pool(&ledger, &config(), VOLATILE_POOL_ID).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::CoinStateMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_pools_map() {
        let ledger = ledger_with_stable();
        let ids = vec![oid(STABLE_POOL_ID)];
        let pools = get_pools_map(&ledger, &config(), &ids).await.unwrap();

        assert_eq!(pools.len(), 1);
        assert!(pools.contains_key(&oid(STABLE_POOL_ID)));
    }

    #[tokio::test]
    async fn test_resolve_pool_skips_fetch_for_object() {
        let ledger = MockLedger::new();
        let resolved = resolve_pool(&ledger, &config(), stable_pool().into())
            .await
            .unwrap();
        assert!(resolved.is_stable());
    }
}
