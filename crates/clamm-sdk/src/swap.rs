//! Swap transaction assembly
//!
//! Builds the real swap calls for a resolved route. The coin produced by
//! hop *i* is passed as the coin argument of hop *i+1*; the minimum-output
//! bound applies only to the terminal hop, either user-supplied or derived
//! from a chained quote minus slippage.

use clamm_core::constants::CLOCK_OBJECT_ID;
use clamm_core::{normalize_coin_type, ClammConfig, ObjectId, Result, TxError};
use sui_ledger_client::LedgerClient;
use sui_ptb::{Argument, MoveCall, TransactionDraft};

use crate::constants::{modules, SWAP_FUNCTION};
use crate::quote::{quote_route, PoolsMap};
use crate::state::{CurveKind, InterestPool, Route};

/// Deduct a tolerance percentage from a quoted output.
pub fn apply_slippage(amount: u64, slippage_percent: f64) -> u64 {
    let factor = 1.0 - (slippage_percent / 100.0);
    (amount as f64 * factor) as u64
}

/// Append a single-pool exact-in swap call; returns the output coin handle.
pub fn build_swap(
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    pool: &InterestPool,
    coin_in: Argument,
    coin_in_type: &str,
    coin_out_type: &str,
    min_amount: u64,
) -> Result<Argument> {
    let coin_in_type = normalize_coin_type(coin_in_type)?;
    let coin_out_type = normalize_coin_type(coin_out_type)?;

    for coin_type in [&coin_in_type, &coin_out_type] {
        if !pool.coin_types().contains(coin_type) {
            return Err(TxError::CoinNotInPool {
                coin_type: coin_type.clone(),
                pool_id: pool.pool_object_id().to_string(),
            }
            .into());
        }
    }

    let module = match pool.kind() {
        CurveKind::Stable => modules::STABLE,
        CurveKind::Volatile => modules::VOLATILE,
    };

    let pool_arg = draft.object(pool.pool_object_id().clone());
    let clock_arg = draft.object(ObjectId::parse(CLOCK_OBJECT_ID)?);
    let min_arg = draft
        .pure(&min_amount)
        .map_err(|e| TxError::Encode(e.to_string()))?;

    let command = draft.move_call(MoveCall {
        package: config.package.clone(),
        module: module.to_string(),
        function: SWAP_FUNCTION.to_string(),
        type_arguments: vec![coin_in_type, coin_out_type],
        arguments: vec![pool_arg, clock_arg, coin_in, min_arg],
    });

    Ok(Argument::Result(command))
}

/// Append the swap calls for a whole route; returns the terminal coin.
///
/// Intermediate hops carry a zero minimum — only the terminal hop enforces
/// `min_amount`.
pub fn build_swap_route(
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    route: &Route,
    pools: &PoolsMap,
    coin_in: Argument,
    min_amount: u64,
) -> Result<Argument> {
    let hops = route.pool_path.len();
    let mut coin = coin_in;

    for (i, pool_id) in route.pool_path.iter().enumerate() {
        let pool = pools
            .get(pool_id)
            .ok_or_else(|| clamm_core::QuoteError::UnknownPool(pool_id.to_string()))?;

        let hop_min = if i == hops - 1 { min_amount } else { 0 };
        coin = build_swap(
            config,
            draft,
            pool,
            coin,
            &route.coin_path[i],
            &route.coin_path[i + 1],
            hop_min,
        )?;
    }

    Ok(coin)
}

/// [`build_swap_route`] with the minimum bound derived from a chained
/// quote: the route is quoted for `amount` and the result reduced by
/// `slippage_percent`.
#[allow(clippy::too_many_arguments)]
pub async fn build_swap_route_with_slippage<L: LedgerClient>(
    client: &L,
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    route: &Route,
    pools: &PoolsMap,
    coin_in: Argument,
    amount: u64,
    slippage_percent: f64,
) -> Result<Argument> {
    let quoted = quote_route(client, config, route, pools, amount).await?;
    let min_amount = apply_slippage(quoted.quote.amount(), slippage_percent);
    build_swap_route(config, draft, route, pools, coin_in, min_amount)
}
