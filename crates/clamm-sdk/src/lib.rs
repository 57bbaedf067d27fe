//! CLAMM Protocol Toolkit
//!
//! Client-side integration for stable and volatile curve pools: decodes
//! on-chain state into typed records, discovers multi-hop swap routes over
//! the pool graph, chains per-hop quotes through simulated execution, and
//! assembles transaction drafts with slippage protection. All curve math
//! stays on-chain — this crate never computes swap outputs locally.

pub mod constants;
pub mod decode;
pub mod index;
pub mod liquidity;
pub mod pool;
pub mod quote;
pub mod router;
pub mod state;
pub mod swap;

#[cfg(test)]
pub(crate) mod test_util;

// Re-exports
pub use decode::{
    parse_coin_state, parse_stable_state, parse_volatile_state, CoinStatesSource,
    DecodedVolatileState,
};
pub use index::{
    fetch_all_pool_metadata, HttpPoolIndex, PoolIndex, PoolMetadataPage, DEFAULT_PAGE_SIZE,
};
pub use liquidity::{
    build_add_liquidity, build_remove_liquidity, build_remove_liquidity_one_coin, new_stable,
    new_volatile, share_pool, NewPoolResult, VolatileParams,
};
pub use pool::{get_pool, get_pools, get_pools_map, resolve_pool};
pub use quote::{get_route_quotes, get_routes, quote_route, quote_routes, PoolsMap};
pub use router::{build_graph, find_routes, find_routes_with_limits, Dex};
pub use state::{
    CoinState, CurveKind, InterestPool, Pool, PoolMetadata, PoolRef, RebalancingParams, Route,
    RouteLimits, RouteQuote, StableFees, StablePoolState, SwapQuote, VolatileFees,
    VolatilePoolState,
};
pub use swap::{apply_slippage, build_swap, build_swap_route, build_swap_route_with_slippage};
