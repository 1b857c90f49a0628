//! Delta-neutral hedge calculator.
//!
//! Spot inventory drifts away from the configured baseline as ladder
//! orders fill; the hedge offsets that drift with one futures market
//! order per cycle. Best-effort and single-shot: the next cycle
//! re-reads live balances and recomputes from scratch, so a partial
//! fill or failed hedge self-corrects.

use dnmm_core::{OrderSide, Size};
use dnmm_exchange::{ExchangeClient, ExchangeError};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;

/// Account state read fresh from the exchange each cycle.
#[derive(Debug, Clone, Copy)]
pub struct InventoryState {
    pub spot_balance: Decimal,
    pub futures_position: Decimal,
}

/// What the hedger decided to do this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HedgeDecision {
    /// Residual delta at or below the minimum tradable size.
    None,
    Trade { side: OrderSide, quantity: Size },
}

/// Compute the hedge trade from live balances.
///
/// `must_be_hedged = initial − spot` is the inventory sold (positive)
/// or accumulated (negative) relative to the baseline; subtracting the
/// existing futures position leaves the residual to trade. The
/// threshold boundary is inclusive: a residual exactly equal to
/// `min_trade_size` is no action.
pub fn compute_hedge(
    inventory: InventoryState,
    initial_spot_balance: Decimal,
    min_trade_size: Decimal,
    size_dp: u32,
) -> HedgeDecision {
    let must_be_hedged = initial_spot_balance - inventory.spot_balance;
    let to_hedge = must_be_hedged - inventory.futures_position;

    if to_hedge.abs() <= min_trade_size {
        return HedgeDecision::None;
    }

    let side = if to_hedge > Decimal::ZERO {
        OrderSide::Buy
    } else {
        OrderSide::Sell
    };
    let quantity = Size::new(
        to_hedge
            .abs()
            .round_dp_with_strategy(size_dp, RoundingStrategy::MidpointAwayFromZero),
    );
    HedgeDecision::Trade { side, quantity }
}

/// Outcome of one hedge pass.
#[derive(Debug)]
pub struct HedgeReport {
    pub decision: HedgeDecision,
    pub error: Option<ExchangeError>,
}

/// Read balances, compute, and fire the hedge order.
///
/// Failures never escape: a failed balance read or rejected order is
/// recorded in the report and the cycle continues.
pub async fn run_hedge(client: &dyn ExchangeClient, config: &EngineConfig) -> HedgeReport {
    let (spot, futures) = tokio::join!(
        client.spot_balance(&config.asset),
        client.futures_position(&config.symbol),
    );

    let inventory = match (spot, futures) {
        (Ok(spot_balance), Ok(futures_position)) => InventoryState {
            spot_balance,
            futures_position,
        },
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "balance read failed, skipping hedge this cycle");
            return HedgeReport {
                decision: HedgeDecision::None,
                error: Some(e),
            };
        }
    };

    let decision = compute_hedge(
        inventory,
        config.initial_spot_balance,
        config.min_hedge_size,
        config.size_decimals,
    );

    match decision {
        HedgeDecision::None => {
            debug!(
                spot = %inventory.spot_balance,
                futures = %inventory.futures_position,
                "residual delta below threshold, no hedge"
            );
            HedgeReport {
                decision,
                error: None,
            }
        }
        HedgeDecision::Trade { side, quantity } => {
            match client
                .place_market_order(&config.symbol, side, quantity)
                .await
            {
                Ok(result) => {
                    info!(order_id = result.order_id, %side, %quantity, "hedge order placed");
                    HedgeReport {
                        decision,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!(error = %e, %side, %quantity, "hedge order failed");
                    HedgeReport {
                        decision,
                        error: Some(e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inventory(spot: Decimal, futures: Decimal) -> InventoryState {
        InventoryState {
            spot_balance: spot,
            futures_position: futures,
        }
    }

    #[test]
    fn test_short_spot_hedged_long() {
        // must_be_hedged = 10000 - 9500 = 500, to_hedge = 500 - 400 = 100
        let decision = compute_hedge(inventory(dec!(9500), dec!(400)), dec!(10000), dec!(10), 2);
        assert_eq!(
            decision,
            HedgeDecision::Trade {
                side: OrderSide::Buy,
                quantity: Size::new(dec!(100.00)),
            }
        );
    }

    #[test]
    fn test_residual_below_threshold_is_none() {
        // to_hedge = 500 - 495 = 5, below the 10-unit minimum
        let decision = compute_hedge(inventory(dec!(9500), dec!(495)), dec!(10000), dec!(10), 2);
        assert_eq!(decision, HedgeDecision::None);
    }

    #[test]
    fn test_threshold_boundary_inclusive() {
        // to_hedge = 500 - 490 = 10 exactly -> no action
        let decision = compute_hedge(inventory(dec!(9500), dec!(490)), dec!(10000), dec!(10), 2);
        assert_eq!(decision, HedgeDecision::None);
    }

    #[test]
    fn test_just_above_threshold_trades() {
        // to_hedge = 10.01
        let decision = compute_hedge(
            inventory(dec!(9500), dec!(489.99)),
            dec!(10000),
            dec!(10),
            2,
        );
        assert_eq!(
            decision,
            HedgeDecision::Trade {
                side: OrderSide::Buy,
                quantity: Size::new(dec!(10.01)),
            }
        );
    }

    #[test]
    fn test_long_spot_hedged_short() {
        // spot above baseline: must_be_hedged = -300, to_hedge = -300 - 0 = -300
        let decision = compute_hedge(inventory(dec!(10300), dec!(0)), dec!(10000), dec!(10), 2);
        assert_eq!(
            decision,
            HedgeDecision::Trade {
                side: OrderSide::Sell,
                quantity: Size::new(dec!(300.00)),
            }
        );
    }

    #[test]
    fn test_existing_position_offsets_delta() {
        // fully hedged already: to_hedge = 500 - 500 = 0
        let decision = compute_hedge(inventory(dec!(9500), dec!(500)), dec!(10000), dec!(10), 2);
        assert_eq!(decision, HedgeDecision::None);
    }

    #[test]
    fn test_overhedged_position_unwinds() {
        // to_hedge = 500 - 600 = -100 -> sell to unwind the excess long
        let decision = compute_hedge(inventory(dec!(9500), dec!(600)), dec!(10000), dec!(10), 2);
        assert_eq!(
            decision,
            HedgeDecision::Trade {
                side: OrderSide::Sell,
                quantity: Size::new(dec!(100.00)),
            }
        );
    }

    #[test]
    fn test_quantity_rounded_to_two_places() {
        // to_hedge = 500 - 479.004 = 20.996 -> 21.00
        let decision = compute_hedge(
            inventory(dec!(9500), dec!(479.004)),
            dec!(10000),
            dec!(10),
            2,
        );
        assert_eq!(
            decision,
            HedgeDecision::Trade {
                side: OrderSide::Buy,
                quantity: Size::new(dec!(21.00)),
            }
        );
    }
}
