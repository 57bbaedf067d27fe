//! Domain types for pools, routes, and quotes

use std::collections::HashMap;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use clamm_core::ObjectId;

/// Pool pricing formula, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    Stable,
    Volatile,
}

/// Lightweight, index-sourced pool summary.
///
/// `coin_types` order is significant: it is the canonical coin ordering used
/// in all move-call type arguments. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMetadata {
    pub pool_object_id: ObjectId,
    pub lp_coin_type: String,
    pub is_stable: bool,
    pub coin_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<HashMap<String, Vec<String>>>,
}

/// Stable pool fee triple
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StableFees {
    pub fee_in_percent: BigUint,
    pub fee_out_percent: BigUint,
    pub admin_fee_percent: BigUint,
}

/// Volatile pool fee quadruple
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatileFees {
    pub admin_fee: BigUint,
    pub gamma_fee: BigUint,
    pub mid_fee: BigUint,
    pub out_fee: BigUint,
}

/// Volatile pool re-pegging parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancingParams {
    pub adjustment_step: BigUint,
    pub extra_profit: BigUint,
    pub ma_half_time: BigUint,
}

/// Per-coin pricing state of a volatile pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinState {
    /// Normalized coin type tag
    pub coin_type: String,
    pub index: u64,
    pub last_price: BigUint,
    pub price: BigUint,
    pub price_oracle: BigUint,
}

/// Decoded state of a stable pool.
///
/// `n_coins` is always derived from `balances.len()`, never read from the
/// record, and `balances` is aligned with the pool's `coin_types`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StablePoolState {
    pub lp_coin_supply: BigUint,
    pub lp_coin_decimals: u8,
    pub balances: Vec<BigUint>,
    pub initial_a: BigUint,
    pub future_a: BigUint,
    pub initial_a_time: BigUint,
    pub future_a_time: BigUint,
    pub n_coins: usize,
    pub fees: StableFees,
}

/// Decoded state of a volatile pool.
///
/// `coin_states` is keyed by normalized coin type and covers exactly the
/// pool's `coin_types`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilePoolState {
    pub a: BigUint,
    pub future_a: BigUint,
    pub gamma: BigUint,
    pub future_gamma: BigUint,
    pub initial_time: BigUint,
    pub future_time: BigUint,
    pub admin_balance: BigUint,
    pub balances: Vec<BigUint>,
    pub d: BigUint,
    pub fees: VolatileFees,
    pub last_prices_timestamp: BigUint,
    pub lp_coin_supply: BigUint,
    pub min_a: BigUint,
    pub max_a: BigUint,
    pub n_coins: usize,
    pub rebalancing_params: RebalancingParams,
    pub virtual_price: BigUint,
    pub xcp_profit: BigUint,
    pub xcp_profit_a: BigUint,
    pub not_adjusted: bool,
    pub coin_states: HashMap<String, CoinState>,
}

/// Pool identity plus curve-specific state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool<S> {
    pub pool_object_id: ObjectId,
    pub state_id: ObjectId,
    pub lp_coin_type: String,
    pub coin_types: Vec<String>,
    pub pool_admin_address: String,
    pub state: S,
}

/// A fully decoded pool, tagged by curve kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "lowercase")]
pub enum InterestPool {
    Stable(Pool<StablePoolState>),
    Volatile(Pool<VolatilePoolState>),
}

impl InterestPool {
    pub fn pool_object_id(&self) -> &ObjectId {
        match self {
            InterestPool::Stable(pool) => &pool.pool_object_id,
            InterestPool::Volatile(pool) => &pool.pool_object_id,
        }
    }

    pub fn coin_types(&self) -> &[String] {
        match self {
            InterestPool::Stable(pool) => &pool.coin_types,
            InterestPool::Volatile(pool) => &pool.coin_types,
        }
    }

    pub fn lp_coin_type(&self) -> &str {
        match self {
            InterestPool::Stable(pool) => &pool.lp_coin_type,
            InterestPool::Volatile(pool) => &pool.lp_coin_type,
        }
    }

    pub fn kind(&self) -> CurveKind {
        match self {
            InterestPool::Stable(_) => CurveKind::Stable,
            InterestPool::Volatile(_) => CurveKind::Volatile,
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, InterestPool::Stable(_))
    }

    /// Summarize as index-style metadata (hooks unknown here).
    pub fn metadata(&self) -> PoolMetadata {
        PoolMetadata {
            pool_object_id: self.pool_object_id().clone(),
            lp_coin_type: self.lp_coin_type().to_string(),
            is_stable: self.is_stable(),
            coin_types: self.coin_types().to_vec(),
            hooks: None,
        }
    }
}

/// Pool-or-id parameter, resolved once at each entry point
#[derive(Debug, Clone)]
pub enum PoolRef {
    Object(Box<InterestPool>),
    Id(ObjectId),
}

impl From<InterestPool> for PoolRef {
    fn from(pool: InterestPool) -> Self {
        PoolRef::Object(Box::new(pool))
    }
}

impl From<ObjectId> for PoolRef {
    fn from(id: ObjectId) -> Self {
        PoolRef::Id(id)
    }
}

/// An ordered multi-hop path.
///
/// `coin_path` has one more entry than `pool_path`; consecutive coins both
/// belong to the pool between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub coin_path: Vec<String>,
    pub pool_path: Vec<ObjectId>,
}

impl Route {
    pub fn hops(&self) -> usize {
        self.pool_path.len()
    }
}

/// Terminal quote result, shaped by the last hop's curve kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "camelCase")]
pub enum SwapQuote {
    Stable { amount: u64, fee_in: u64, fee_out: u64 },
    Volatile { amount: u64, fee: u64 },
}

impl SwapQuote {
    pub fn amount(&self) -> u64 {
        match self {
            SwapQuote::Stable { amount, .. } => *amount,
            SwapQuote::Volatile { amount, .. } => *amount,
        }
    }
}

/// A route annotated with its end-to-end quote
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuote {
    pub route: Route,
    pub quote: SwapQuote,
}

/// Optional search budget for the route finder.
///
/// Defaults to unbounded, preserving the exhaustive-search behavior; set
/// either field to cap dense graphs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLimits {
    pub max_hops: Option<usize>,
    pub max_routes: Option<usize>,
}
