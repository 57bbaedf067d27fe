//! Quote chaining over simulated execution
//!
//! All hops of a route are batched into one dev-inspect draft: each hop's
//! primary returned amount is referenced as the next hop's input argument,
//! so the chain stays strictly left-to-right with no local math. Every
//! amount comes from the chain's own computation — this module never
//! approximates curve output.

use std::collections::HashMap;

use futures::future::join_all;

use clamm_core::constants::CLOCK_OBJECT_ID;
use clamm_core::{ClammConfig, ObjectId, QuoteError, Result, TxError};
use sui_ledger_client::{LedgerClient, ReturnValue};
use sui_ptb::{Argument, MoveCall, TransactionDraft};

use crate::constants::{modules, DEV_INSPECT_SENDER, QUOTE_SWAP_FUNCTION};
use crate::state::{CurveKind, InterestPool, Route, RouteQuote, SwapQuote};

/// Resolved pools keyed by pool id
pub type PoolsMap = HashMap<ObjectId, InterestPool>;

/// Scalars returned by a stable quote: amount, fee-in, fee-out
const STABLE_QUOTE_ARITY: usize = 3;
/// Scalars returned by a volatile quote: amount, fee
const VOLATILE_QUOTE_ARITY: usize = 2;

/// Quote one route end-to-end for an exact input amount.
///
/// A zero input short-circuits to a zero quote without touching the ledger.
pub async fn quote_route<L: LedgerClient>(
    client: &L,
    config: &ClammConfig,
    route: &Route,
    pools: &PoolsMap,
    amount: u64,
) -> Result<RouteQuote> {
    let last_pool_id = route.pool_path.last().ok_or(QuoteError::EmptyRoute)?;
    let last_pool = lookup(pools, last_pool_id)?;

    if amount == 0 {
        return Ok(RouteQuote {
            route: route.clone(),
            quote: zero_quote(last_pool.kind()),
        });
    }

    let draft = build_quote_draft(config, route, pools, amount)?;
    let inspect = client.dev_inspect(&draft, DEV_INSPECT_SENDER).await?;

    if let Some(error) = inspect.error {
        return Err(QuoteError::SimulationFailed(error).into());
    }

    let hops = route.pool_path.len();
    if inspect.results.len() < hops {
        return Err(QuoteError::EmptySimulationResult.into());
    }

    // every hop must come back with the arity its curve kind implies
    for (i, pool_id) in route.pool_path.iter().enumerate() {
        let pool = lookup(pools, pool_id)?;
        let expected = quote_arity(pool.kind());
        let got = inspect.results[i].return_values.len();
        if got != expected {
            return Err(QuoteError::UnexpectedResultArity { expected, got }.into());
        }
    }

    let values = &inspect.results[hops - 1].return_values;
    let quote = match last_pool.kind() {
        CurveKind::Stable => SwapQuote::Stable {
            amount: decode_u64(&values[0])?,
            fee_in: decode_u64(&values[1])?,
            fee_out: decode_u64(&values[2])?,
        },
        CurveKind::Volatile => SwapQuote::Volatile {
            amount: decode_u64(&values[0])?,
            fee: decode_u64(&values[1])?,
        },
    };

    Ok(RouteQuote {
        route: route.clone(),
        quote,
    })
}

/// Quote several routes concurrently, ranked by descending output.
///
/// Routes whose quote fails are omitted entirely (never half-populated);
/// each drop is logged.
pub async fn quote_routes<L: LedgerClient>(
    client: &L,
    config: &ClammConfig,
    routes: &[Route],
    pools: &PoolsMap,
    amount: u64,
) -> Vec<RouteQuote> {
    let lookups = routes
        .iter()
        .map(|route| quote_route(client, config, route, pools, amount));

    let mut quotes: Vec<RouteQuote> = join_all(lookups)
        .await
        .into_iter()
        .zip(routes)
        .filter_map(|(result, route)| match result {
            Ok(quote) => Some(quote),
            Err(error) => {
                tracing::warn!(%error, hops = route.hops(), "dropping route quote");
                None
            }
        })
        .collect();

    quotes.sort_by(|a, b| b.quote.amount().cmp(&a.quote.amount()));
    quotes
}

/// Discover every route between two coins and resolve the touched pools.
///
/// Pool summaries come from the index; the graph and routes are rebuilt per
/// call. An empty route list means no path exists — it is not an error.
pub async fn get_routes<L: LedgerClient, I: crate::index::PoolIndex>(
    client: &L,
    config: &ClammConfig,
    index: &I,
    coin_in: &str,
    coin_out: &str,
) -> Result<(Vec<Route>, PoolsMap)> {
    let metadata =
        crate::index::fetch_all_pool_metadata(index, crate::index::DEFAULT_PAGE_SIZE).await?;
    let graph = crate::router::build_graph(&metadata);
    let routes = crate::router::find_routes(&graph, coin_in, coin_out)?;

    let mut pool_ids: Vec<ObjectId> = Vec::new();
    for route in &routes {
        for pool_id in &route.pool_path {
            if !pool_ids.contains(pool_id) {
                pool_ids.push(pool_id.clone());
            }
        }
    }

    let pools = crate::pool::get_pools_map(client, config, &pool_ids).await?;
    Ok((routes, pools))
}

/// Discover, quote, and rank every route for an exact input amount.
pub async fn get_route_quotes<L: LedgerClient, I: crate::index::PoolIndex>(
    client: &L,
    config: &ClammConfig,
    index: &I,
    coin_in: &str,
    coin_out: &str,
    amount: u64,
) -> Result<Vec<RouteQuote>> {
    let (routes, pools) = get_routes(client, config, index, coin_in, coin_out).await?;
    Ok(quote_routes(client, config, &routes, &pools, amount).await)
}

/// Assemble the dev-inspect draft for a route: one quote call per hop,
/// chained through result references.
fn build_quote_draft(
    config: &ClammConfig,
    route: &Route,
    pools: &PoolsMap,
    amount: u64,
) -> Result<TransactionDraft> {
    let clock = ObjectId::parse(CLOCK_OBJECT_ID)?;
    let mut draft = TransactionDraft::new();
    let mut previous: Option<u16> = None;

    for (i, pool_id) in route.pool_path.iter().enumerate() {
        let pool = lookup(pools, pool_id)?;
        let module = match pool.kind() {
            CurveKind::Stable => modules::STABLE,
            CurveKind::Volatile => modules::VOLATILE,
        };

        let amount_arg = match previous {
            None => draft
                .pure(&amount)
                .map_err(|e| TxError::Encode(e.to_string()))?,
            Some(command) => Argument::NestedResult(command, 0),
        };
        let pool_arg = draft.object(pool_id.clone());
        let clock_arg = draft.object(clock.clone());

        let command = draft.move_call(MoveCall {
            package: config.package.clone(),
            module: module.to_string(),
            function: QUOTE_SWAP_FUNCTION.to_string(),
            type_arguments: vec![route.coin_path[i].clone(), route.coin_path[i + 1].clone()],
            arguments: vec![pool_arg, clock_arg, amount_arg],
        });
        previous = Some(command);
    }

    Ok(draft)
}

fn lookup<'a>(pools: &'a PoolsMap, pool_id: &ObjectId) -> Result<&'a InterestPool> {
    pools
        .get(pool_id)
        .ok_or_else(|| QuoteError::UnknownPool(pool_id.to_string()).into())
}

fn quote_arity(kind: CurveKind) -> usize {
    match kind {
        CurveKind::Stable => STABLE_QUOTE_ARITY,
        CurveKind::Volatile => VOLATILE_QUOTE_ARITY,
    }
}

fn zero_quote(kind: CurveKind) -> SwapQuote {
    match kind {
        CurveKind::Stable => SwapQuote::Stable {
            amount: 0,
            fee_in: 0,
            fee_out: 0,
        },
        CurveKind::Volatile => SwapQuote::Volatile { amount: 0, fee: 0 },
    }
}

fn decode_u64(value: &ReturnValue) -> Result<u64> {
    bcs::from_bytes::<u64>(&value.bytes)
        .map_err(|e| QuoteError::ReturnValue(e.to_string()).into())
}
