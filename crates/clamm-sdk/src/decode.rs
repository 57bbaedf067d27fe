//! On-chain state decoding
//!
//! Pool state arrives as deeply nested "fields" bags with numbers encoded
//! as decimal strings. Decoding is a pure transformation: every field is
//! extracted explicitly and coerced to an arbitrary-precision integer.
//! Optional numeric fields default to zero; required structural fields
//! (the LP supply type tag, the balances array) hard-fail with
//! [`DecodeError::MissingField`].

use num_bigint::BigUint;
use num_traits::Zero;
use serde_json::Value;

use clamm_core::{normalize_coin_type, DecodeError, ObjectId};
use sui_ledger_client::record::{array_at, bool_at, field_path, opt_field_path, str_at};

use crate::constants::LP_COIN_DECIMALS;
use crate::state::{
    CoinState, RebalancingParams, StableFees, StablePoolState, VolatileFees, VolatilePoolState,
};

/// Where a volatile pool keeps its per-coin states
#[derive(Debug, Clone)]
pub enum CoinStatesSource {
    /// Decoded inline from the record (newer contract layout)
    Inline(Vec<CoinState>),
    /// Stored as a dynamic-field collection under this parent id
    Collection(ObjectId),
}

/// Volatile state as decoded from the raw record.
///
/// `state.coin_states` stays empty until the source is resolved; the fetch
/// layer fills it in.
#[derive(Debug, Clone)]
pub struct DecodedVolatileState {
    pub state: VolatilePoolState,
    pub lp_coin_type: String,
    pub coin_states: CoinStatesSource,
}

/// Decode a stable pool's state record.
///
/// The record is the state object's fields bag; the actual pool fields sit
/// under the versioned `value.fields` wrapper. Returns the state and the LP
/// coin type sliced out of the supply field's `Supply<...>` tag.
pub fn parse_stable_state(content: &Value) -> Result<(StablePoolState, String), DecodeError> {
    let fields = field_path(content, &["value", "fields"])?;

    let lp_coin_type = lp_coin_type_at(fields)?;
    let balances = balances_at(fields)?;

    let state = StablePoolState {
        lp_coin_supply: big_at(fields, &["lp_coin_supply", "fields", "value"])?,
        lp_coin_decimals: LP_COIN_DECIMALS,
        n_coins: balances.len(),
        balances,
        initial_a: big_at(fields, &["initial_a"])?,
        future_a: big_at(fields, &["future_a"])?,
        initial_a_time: big_at(fields, &["initial_a_time"])?,
        future_a_time: big_at(fields, &["future_a_time"])?,
        fees: StableFees {
            fee_in_percent: big_at(fields, &["fees", "fields", "fee_in_percent"])?,
            fee_out_percent: big_at(fields, &["fees", "fields", "fee_out_percent"])?,
            admin_fee_percent: big_at(fields, &["fees", "fields", "admin_fee_percent"])?,
        },
    };

    Ok((state, lp_coin_type))
}

/// Decode a volatile pool's state record.
pub fn parse_volatile_state(content: &Value) -> Result<DecodedVolatileState, DecodeError> {
    let fields = field_path(content, &["value", "fields"])?;

    let lp_coin_type = lp_coin_type_at(fields)?;
    let balances = balances_at(fields)?;
    let coin_states = coin_states_source(fields)?;

    let state = VolatilePoolState {
        a: big_at(fields, &["a_gamma", "fields", "a"])?,
        future_a: big_at(fields, &["a_gamma", "fields", "future_a"])?,
        gamma: big_at(fields, &["a_gamma", "fields", "gamma"])?,
        future_gamma: big_at(fields, &["a_gamma", "fields", "future_gamma"])?,
        initial_time: big_at(fields, &["a_gamma", "fields", "initial_time"])?,
        future_time: big_at(fields, &["a_gamma", "fields", "future_time"])?,
        admin_balance: big_at(fields, &["admin_balance"])?,
        d: big_at(fields, &["d"])?,
        last_prices_timestamp: big_at(fields, &["last_prices_timestamp"])?,
        lp_coin_supply: big_at(fields, &["lp_coin_supply", "fields", "value"])?,
        min_a: big_at(fields, &["min_a"])?,
        max_a: big_at(fields, &["max_a"])?,
        n_coins: balances.len(),
        balances,
        not_adjusted: bool_at(fields, &["not_adjusted"]),
        virtual_price: big_at(fields, &["virtual_price"])?,
        xcp_profit: big_at(fields, &["xcp_profit"])?,
        xcp_profit_a: big_at(fields, &["xcp_profit_a"])?,
        rebalancing_params: RebalancingParams {
            adjustment_step: big_at(fields, &["rebalancing_params", "fields", "adjustment_step"])?,
            extra_profit: big_at(fields, &["rebalancing_params", "fields", "extra_profit"])?,
            ma_half_time: big_at(fields, &["rebalancing_params", "fields", "ma_half_time"])?,
        },
        fees: VolatileFees {
            admin_fee: big_at(fields, &["fees", "fields", "admin_fee"])?,
            gamma_fee: big_at(fields, &["fees", "fields", "gamma_fee"])?,
            mid_fee: big_at(fields, &["fees", "fields", "mid_fee"])?,
            out_fee: big_at(fields, &["fees", "fields", "out_fee"])?,
        },
        coin_states: Default::default(),
    };

    Ok(DecodedVolatileState {
        state,
        lp_coin_type,
        coin_states,
    })
}

/// Decode one coin state from a dynamic-field object's fields bag.
pub fn parse_coin_state(content: &Value) -> Result<CoinState, DecodeError> {
    let value = field_path(content, &["value", "fields"])?;
    coin_state_from_value(value)
}

fn coin_state_from_value(value: &Value) -> Result<CoinState, DecodeError> {
    let raw_type = str_at(value, &["type_name", "fields", "name"])?;
    let coin_type = normalize_coin_type(raw_type)?;

    Ok(CoinState {
        coin_type,
        index: u64_at(value, &["index"])?,
        last_price: big_at(value, &["last_price"])?,
        price: big_at(value, &["price"])?,
        price_oracle: big_at(value, &["price_oracle"])?,
    })
}

fn coin_states_source(fields: &Value) -> Result<CoinStatesSource, DecodeError> {
    let container = field_path(fields, &["coin_states", "fields"])?;

    // Newer layouts inline a VecMap; older ones point at a table object.
    if let Some(contents) = opt_field_path(container, &["contents"]).and_then(Value::as_array) {
        let states = contents
            .iter()
            .map(|entry| {
                let value = field_path(entry, &["fields", "value", "fields"])?;
                coin_state_from_value(value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(CoinStatesSource::Inline(states));
    }

    let raw_id = str_at(container, &["id", "id"])?;
    let parent = ObjectId::parse(raw_id).map_err(|_| DecodeError::InvalidId {
        path: "coin_states.fields.id.id".to_string(),
        value: raw_id.to_string(),
    })?;
    Ok(CoinStatesSource::Collection(parent))
}

/// Slice the LP coin type out of the supply field's `Supply<...>` type tag.
fn lp_coin_type_at(fields: &Value) -> Result<String, DecodeError> {
    let tag = str_at(fields, &["lp_coin_supply", "type"])?;
    tag.split_once("Supply<")
        .map(|(_, rest)| rest)
        .and_then(|rest| rest.strip_suffix('>'))
        .map(str::to_string)
        .ok_or_else(|| DecodeError::MissingField {
            path: "lp_coin_supply.type".to_string(),
        })
}

fn balances_at(fields: &Value) -> Result<Vec<BigUint>, DecodeError> {
    array_at(fields, &["balances"])?
        .iter()
        .map(|value| big_value(value, &["balances"]))
        .collect()
}

/// Coerce a numeric field to an integer; absent fields read as zero.
fn big_at(fields: &Value, path: &[&str]) -> Result<BigUint, DecodeError> {
    match opt_field_path(fields, path) {
        Some(value) => big_value(value, path),
        None => Ok(BigUint::zero()),
    }
}

fn big_value(value: &Value, path: &[&str]) -> Result<BigUint, DecodeError> {
    match value {
        Value::String(s) => s.parse::<BigUint>().map_err(|_| DecodeError::InvalidNumber {
            path: path.join("."),
            value: s.clone(),
        }),
        Value::Number(n) => n
            .as_u64()
            .map(BigUint::from)
            .ok_or_else(|| DecodeError::InvalidNumber {
                path: path.join("."),
                value: n.to_string(),
            }),
        other => Err(DecodeError::InvalidNumber {
            path: path.join("."),
            value: other.to_string(),
        }),
    }
}

fn u64_at(fields: &Value, path: &[&str]) -> Result<u64, DecodeError> {
    match opt_field_path(fields, path) {
        None => Ok(0),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| DecodeError::InvalidNumber {
            path: path.join("."),
            value: n.to_string(),
        }),
        Some(Value::String(s)) => s.parse::<u64>().map_err(|_| DecodeError::InvalidNumber {
            path: path.join("."),
            value: s.clone(),
        }),
        Some(other) => Err(DecodeError::InvalidNumber {
            path: path.join("."),
            value: other.to_string(),
        }),
    }
}
