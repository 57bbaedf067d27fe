//! Liquidity and pool-creation transaction assembly
//!
//! Deposit/withdraw entry points are arity-keyed (2..=5 coins). Pool
//! creation wires the LP treasury cap into a supply, registers each coin's
//! decimals with the suitears registry (creating and destroying a local one
//! when no shared registry is configured), and hands back result handles
//! for the pool, its admin capability, and the minted LP coin.

use clamm_core::constants::{CLOCK_OBJECT_ID, SUI_FRAMEWORK_PACKAGE};
use clamm_core::{ClammConfig, ObjectId, Result, TxError};
use sui_ledger_client::{CoinMetadataCache, LedgerClient};
use sui_ptb::{Argument, MoveCall, TransactionDraft};

use crate::constants::{
    add_liquidity_function, defaults, modules, new_pool_function, remove_liquidity_function,
    suitears, REMOVE_LIQUIDITY_ONE_COIN_FUNCTION, SHARE_FUNCTION, TREASURY_INTO_SUPPLY_FUNCTION,
    TREASURY_INTO_SUPPLY_MODULE,
};
use crate::state::{CurveKind, InterestPool};

/// Result handles of a pool-creation call
#[derive(Debug, Clone, Copy)]
pub struct NewPoolResult {
    pub pool: Argument,
    pub pool_admin: Argument,
    pub lp_coin: Argument,
}

/// Creation parameters of a volatile pool, defaulting to the protocol's
/// standard configuration.
#[derive(Debug, Clone, Copy)]
pub struct VolatileParams {
    pub a: u64,
    pub gamma: u64,
    pub extra_profit: u64,
    pub adjustment_step: u64,
    pub ma_half_time: u64,
    pub mid_fee: u64,
    pub out_fee: u64,
    pub gamma_fee: u64,
}

impl Default for VolatileParams {
    fn default() -> Self {
        Self {
            a: defaults::VOLATILE_A,
            gamma: defaults::GAMMA,
            extra_profit: defaults::EXTRA_PROFIT,
            adjustment_step: defaults::ADJUSTMENT_STEP,
            ma_half_time: defaults::MA_HALF_TIME,
            mid_fee: defaults::MID_FEE,
            out_fee: defaults::OUT_FEE,
            gamma_fee: defaults::GAMMA_FEE,
        }
    }
}

fn encode<T: serde::Serialize>(draft: &mut TransactionDraft, value: &T) -> Result<Argument> {
    draft
        .pure(value)
        .map_err(|e| TxError::Encode(e.to_string()).into())
}

fn curve_module(kind: CurveKind) -> &'static str {
    match kind {
        CurveKind::Stable => modules::STABLE,
        CurveKind::Volatile => modules::VOLATILE,
    }
}

/// Append a balanced deposit; returns the minted LP coin handle.
pub fn build_add_liquidity(
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    pool: &InterestPool,
    coins_in: Vec<Argument>,
    min_amount: u64,
) -> Result<Argument> {
    let n_coins = pool.coin_types().len();
    let function = add_liquidity_function(n_coins)
        .ok_or(TxError::UnsupportedCoinCount(n_coins))?;
    if coins_in.len() != n_coins {
        return Err(TxError::TypeArgumentMismatch {
            type_args: n_coins + 1,
            coins: coins_in.len(),
        }
        .into());
    }

    let mut type_arguments = pool.coin_types().to_vec();
    type_arguments.push(pool.lp_coin_type().to_string());

    let pool_arg = draft.object(pool.pool_object_id().clone());
    let clock_arg = draft.object(ObjectId::parse(CLOCK_OBJECT_ID)?);
    let min_arg = encode(draft, &min_amount)?;

    let mut arguments = vec![pool_arg, clock_arg];
    arguments.extend(coins_in);
    arguments.push(min_arg);

    let command = draft.move_call(MoveCall {
        package: config.package.clone(),
        module: curve_module(pool.kind()).to_string(),
        function: function.to_string(),
        type_arguments,
        arguments,
    });

    Ok(Argument::Result(command))
}

/// Append a balanced withdraw; returns one coin handle per pool coin, in
/// the pool's canonical coin order.
pub fn build_remove_liquidity(
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    pool: &InterestPool,
    lp_coin: Argument,
    min_amounts: &[u64],
) -> Result<Vec<Argument>> {
    let n_coins = pool.coin_types().len();
    let function = remove_liquidity_function(n_coins)
        .ok_or(TxError::UnsupportedCoinCount(n_coins))?;
    if min_amounts.len() != n_coins {
        return Err(TxError::TypeArgumentMismatch {
            type_args: n_coins + 1,
            coins: min_amounts.len(),
        }
        .into());
    }

    let mut type_arguments = pool.coin_types().to_vec();
    type_arguments.push(pool.lp_coin_type().to_string());

    let pool_arg = draft.object(pool.pool_object_id().clone());
    let clock_arg = draft.object(ObjectId::parse(CLOCK_OBJECT_ID)?);
    let mins_arg = encode(draft, &min_amounts.to_vec())?;

    let command = draft.move_call(MoveCall {
        package: config.package.clone(),
        module: curve_module(pool.kind()).to_string(),
        function: function.to_string(),
        type_arguments,
        arguments: vec![pool_arg, clock_arg, lp_coin, mins_arg],
    });

    Ok((0..n_coins)
        .map(|i| Argument::NestedResult(command, i as u16))
        .collect())
}

/// Append a one-coin withdraw; returns the single output coin handle.
pub fn build_remove_liquidity_one_coin(
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    pool: &InterestPool,
    lp_coin: Argument,
    coin_out_type: &str,
    min_amount: u64,
) -> Result<Argument> {
    let coin_out_type = clamm_core::normalize_coin_type(coin_out_type)?;
    if !pool.coin_types().contains(&coin_out_type) {
        return Err(TxError::CoinNotInPool {
            coin_type: coin_out_type,
            pool_id: pool.pool_object_id().to_string(),
        }
        .into());
    }

    let pool_arg = draft.object(pool.pool_object_id().clone());
    let clock_arg = draft.object(ObjectId::parse(CLOCK_OBJECT_ID)?);
    let min_arg = encode(draft, &min_amount)?;

    let command = draft.move_call(MoveCall {
        package: config.package.clone(),
        module: curve_module(pool.kind()).to_string(),
        function: REMOVE_LIQUIDITY_ONE_COIN_FUNCTION.to_string(),
        type_arguments: vec![coin_out_type, pool.lp_coin_type().to_string()],
        arguments: vec![pool_arg, clock_arg, lp_coin, min_arg],
    });

    Ok(Argument::Result(command))
}

/// Share a freshly created pool.
pub fn share_pool(
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    kind: CurveKind,
    pool: Argument,
) {
    let curve_type = match kind {
        CurveKind::Stable => config.stable_curve_type(),
        CurveKind::Volatile => config.volatile_curve_type(),
    };
    draft.move_call(MoveCall {
        package: config.package.clone(),
        module: modules::POOL.to_string(),
        function: SHARE_FUNCTION.to_string(),
        type_arguments: vec![curve_type],
        arguments: vec![pool],
    });
}

/// Create a stable pool. `type_arguments` lists the pool coins followed by
/// the LP coin; `coins` supplies one seed coin per pool coin.
pub async fn new_stable<L: LedgerClient>(
    client: &L,
    cache: &CoinMetadataCache,
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    type_arguments: &[String],
    coins: Vec<Argument>,
    lp_treasury_cap: Argument,
    a: Option<u64>,
) -> Result<NewPoolResult> {
    check_creation_arity(type_arguments, &coins)?;
    let function = new_pool_function(type_arguments.len())
        .ok_or(TxError::UnsupportedCoinCount(type_arguments.len() - 1))?;

    let supply = treasury_into_supply(draft, type_arguments, lp_treasury_cap)?;
    let registry = register_coin_decimals(client, cache, config, draft, type_arguments).await?;

    let clock_arg = draft.object(ObjectId::parse(CLOCK_OBJECT_ID)?);
    let a_arg = encode(draft, &a.unwrap_or(defaults::STABLE_A))?;

    let mut arguments = vec![clock_arg, registry.registry];
    arguments.extend(coins);
    arguments.push(supply);
    arguments.push(a_arg);

    let command = draft.move_call(MoveCall {
        package: config.package.clone(),
        module: modules::STABLE.to_string(),
        function: function.to_string(),
        type_arguments: type_arguments.to_vec(),
        arguments,
    });

    registry.destroy(config, draft);

    Ok(NewPoolResult {
        pool: Argument::NestedResult(command, 0),
        pool_admin: Argument::NestedResult(command, 1),
        lp_coin: Argument::NestedResult(command, 2),
    })
}

/// Create a volatile pool. `prices` seeds the non-quote coins' prices and
/// must be non-empty; a 2-coin pool takes a single scalar, larger pools a
/// vector.
#[allow(clippy::too_many_arguments)]
pub async fn new_volatile<L: LedgerClient>(
    client: &L,
    cache: &CoinMetadataCache,
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    type_arguments: &[String],
    coins: Vec<Argument>,
    lp_treasury_cap: Argument,
    params: VolatileParams,
    prices: &[u64],
) -> Result<NewPoolResult> {
    check_creation_arity(type_arguments, &coins)?;
    if prices.is_empty() {
        return Err(TxError::MissingPrices.into());
    }
    let function = new_pool_function(type_arguments.len())
        .ok_or(TxError::UnsupportedCoinCount(type_arguments.len() - 1))?;

    let supply = treasury_into_supply(draft, type_arguments, lp_treasury_cap)?;
    let registry = register_coin_decimals(client, cache, config, draft, type_arguments).await?;

    let clock_arg = draft.object(ObjectId::parse(CLOCK_OBJECT_ID)?);
    let a_gamma_arg = encode(draft, &vec![params.a, params.gamma])?;
    let rebalancing_arg = encode(
        draft,
        &vec![params.extra_profit, params.adjustment_step, params.ma_half_time],
    )?;
    let prices_arg = if type_arguments.len() == 3 {
        encode(draft, &prices[0])?
    } else {
        encode(draft, &prices.to_vec())?
    };
    let fees_arg = encode(draft, &vec![params.mid_fee, params.out_fee, params.gamma_fee])?;

    let mut arguments = vec![clock_arg, registry.registry];
    arguments.extend(coins);
    arguments.push(supply);
    arguments.push(a_gamma_arg);
    arguments.push(rebalancing_arg);
    arguments.push(prices_arg);
    arguments.push(fees_arg);

    let command = draft.move_call(MoveCall {
        package: config.package.clone(),
        module: modules::VOLATILE.to_string(),
        function: function.to_string(),
        type_arguments: type_arguments.to_vec(),
        arguments,
    });

    registry.destroy(config, draft);

    Ok(NewPoolResult {
        pool: Argument::NestedResult(command, 0),
        pool_admin: Argument::NestedResult(command, 1),
        lp_coin: Argument::NestedResult(command, 2),
    })
}

fn check_creation_arity(type_arguments: &[String], coins: &[Argument]) -> Result<()> {
    if type_arguments.len() != coins.len() + 1 || type_arguments.len() < 3 {
        return Err(TxError::TypeArgumentMismatch {
            type_args: type_arguments.len(),
            coins: coins.len(),
        }
        .into());
    }
    Ok(())
}

/// Turn the LP treasury cap into a supply for the pool to own.
fn treasury_into_supply(
    draft: &mut TransactionDraft,
    type_arguments: &[String],
    lp_treasury_cap: Argument,
) -> Result<Argument> {
    let lp_coin_type = match type_arguments.last() {
        Some(lp_coin_type) => lp_coin_type.clone(),
        None => {
            return Err(TxError::TypeArgumentMismatch {
                type_args: 0,
                coins: 0,
            }
            .into())
        }
    };
    let command = draft.move_call(MoveCall {
        package: ObjectId::parse(SUI_FRAMEWORK_PACKAGE)?,
        module: TREASURY_INTO_SUPPLY_MODULE.to_string(),
        function: TREASURY_INTO_SUPPLY_FUNCTION.to_string(),
        type_arguments: vec![lp_coin_type],
        arguments: vec![lp_treasury_cap],
    });
    Ok(Argument::Result(command))
}

struct DecimalsRegistry {
    registry: Argument,
    cap: Argument,
    locally_created: bool,
}

impl DecimalsRegistry {
    /// Tear down creation-scoped objects: a locally created registry is
    /// destroyed; the witness cap always is.
    fn destroy(&self, config: &ClammConfig, draft: &mut TransactionDraft) {
        if self.locally_created {
            draft.move_call(MoveCall {
                package: config.suitears.clone(),
                module: suitears::COIN_DECIMALS_MODULE.to_string(),
                function: suitears::DESTROY.to_string(),
                type_arguments: vec![],
                arguments: vec![self.registry, self.cap],
            });
        }
        draft.move_call(MoveCall {
            package: config.suitears.clone(),
            module: suitears::OWNER_MODULE.to_string(),
            function: suitears::DESTROY.to_string(),
            type_arguments: vec![format!("{}::{}", config.suitears, suitears::WITNESS_TYPE)],
            arguments: vec![self.cap],
        });
    }
}

/// Resolve a coin-decimals registry and register every pool coin with it.
///
/// Uses the shared registry from the configuration when present, otherwise
/// creates a throwaway one in this draft. Each coin's metadata object comes
/// from the read-through cache.
async fn register_coin_decimals<L: LedgerClient>(
    client: &L,
    cache: &CoinMetadataCache,
    config: &ClammConfig,
    draft: &mut TransactionDraft,
    type_arguments: &[String],
) -> Result<DecimalsRegistry> {
    let cap_command = draft.move_call(MoveCall {
        package: config.suitears.clone(),
        module: suitears::COIN_DECIMALS_MODULE.to_string(),
        function: suitears::NEW_CAP.to_string(),
        type_arguments: vec![],
        arguments: vec![],
    });
    let cap = Argument::Result(cap_command);

    let (registry, locally_created) = match &config.coin_decimals_registry {
        Some(id) => (draft.object(id.clone()), false),
        None => {
            let command = draft.move_call(MoveCall {
                package: config.suitears.clone(),
                module: suitears::COIN_DECIMALS_MODULE.to_string(),
                function: suitears::NEW.to_string(),
                type_arguments: vec![],
                arguments: vec![cap],
            });
            (Argument::Result(command), true)
        }
    };

    for coin_type in type_arguments {
        let metadata = cache.get(client, coin_type).await?;
        let metadata_id = metadata.metadata_object_id.ok_or_else(|| {
            clamm_core::LedgerError::CoinMetadataNotFound {
                coin_type: coin_type.clone(),
            }
        })?;
        let metadata_arg = draft.object(metadata_id);
        draft.move_call(MoveCall {
            package: config.suitears.clone(),
            module: suitears::COIN_DECIMALS_MODULE.to_string(),
            function: suitears::ADD.to_string(),
            type_arguments: vec![coin_type.clone()],
            arguments: vec![registry, metadata_arg],
        });
    }

    Ok(DecimalsRegistry {
        registry,
        cap,
        locally_created,
    })
}
