//! Pool graph construction and route finding
//!
//! The graph is rebuilt per routing query from index metadata; routes are
//! enumerated exhaustively over simple paths (no coin revisited within one
//! path). Ordering is deterministic: each coin's pool bucket keeps the
//! order pools were supplied in, and neighbor coins are visited in the
//! graph's sorted key order. Downstream consumers treat the first route as
//! the default, so this order is part of the contract.

use std::collections::{BTreeMap, HashSet};

use clamm_core::{normalize_coin_type, ObjectId, Result};

use crate::state::{PoolMetadata, Route, RouteLimits};

/// Coin graph: normalized coin type -> pools touching it.
///
/// A pool with *k* coins contributes an edge between every unordered pair
/// of its coins. Duplicate pool ids within a bucket are permitted.
pub type Dex = BTreeMap<String, Vec<ObjectId>>;

/// Build the coin graph from pool summaries.
///
/// Metadata coin types are used as-is; the index serves them in canonical
/// form, which keeps bucket keys aligned with normalized query coins.
pub fn build_graph(pools: &[PoolMetadata]) -> Dex {
    let mut graph = Dex::new();

    for pool in pools {
        let coins = &pool.coin_types;
        for (i, coin_a) in coins.iter().enumerate() {
            for coin_b in &coins[i + 1..] {
                if coin_a == coin_b {
                    continue;
                }
                graph
                    .entry(coin_a.clone())
                    .or_default()
                    .push(pool.pool_object_id.clone());
                graph
                    .entry(coin_b.clone())
                    .or_default()
                    .push(pool.pool_object_id.clone());
            }
        }
    }

    graph
}

/// Enumerate every simple path between two coins.
///
/// Both inputs are normalized before the search; an unknown start coin or
/// a disconnected pair yields an empty list, not an error. A start coin
/// equal to the end coin never emits the zero-hop route.
pub fn find_routes(graph: &Dex, start_coin: &str, end_coin: &str) -> Result<Vec<Route>> {
    find_routes_with_limits(graph, start_coin, end_coin, RouteLimits::default())
}

/// [`find_routes`] with an optional search budget.
///
/// The default budget is unbounded, preserving exhaustive enumeration;
/// dense graphs can cap hops or route count.
pub fn find_routes_with_limits(
    graph: &Dex,
    start_coin: &str,
    end_coin: &str,
    limits: RouteLimits,
) -> Result<Vec<Route>> {
    let start = normalize_coin_type(start_coin)?;
    let end = normalize_coin_type(end_coin)?;

    if start == end {
        return Ok(Vec::new());
    }

    let search = Search {
        graph,
        end: &end,
        limits,
    };

    let mut routes = Vec::new();
    search.backtrack(
        &start,
        &mut HashSet::new(),
        &mut Vec::new(),
        &mut Vec::new(),
        &mut routes,
    );
    Ok(routes)
}

struct Search<'a> {
    graph: &'a Dex,
    end: &'a str,
    limits: RouteLimits,
}

impl Search<'_> {
    fn backtrack(
        &self,
        current: &str,
        visited: &mut HashSet<String>,
        coin_path: &mut Vec<String>,
        pool_path: &mut Vec<ObjectId>,
        routes: &mut Vec<Route>,
    ) {
        if let Some(max) = self.limits.max_routes {
            if routes.len() >= max {
                return;
            }
        }

        visited.insert(current.to_string());
        coin_path.push(current.to_string());

        if current == self.end {
            routes.push(Route {
                coin_path: coin_path.clone(),
                pool_path: pool_path.clone(),
            });
        } else if self.limits.max_hops.map_or(true, |max| pool_path.len() < max) {
            if let Some(pools) = self.graph.get(current) {
                for pool in pools {
                    for (neighbor, neighbor_pools) in self.graph.iter() {
                        if !visited.contains(neighbor) && neighbor_pools.contains(pool) {
                            pool_path.push(pool.clone());
                            self.backtrack(neighbor, visited, coin_path, pool_path, routes);
                            pool_path.pop();
                        }
                    }
                }
            }
        }

        coin_path.pop();
        visited.remove(current);
    }
}
