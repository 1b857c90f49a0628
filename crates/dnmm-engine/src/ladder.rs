//! Quote ladder builder.
//!
//! Transforms a depth snapshot into the target set of resting quotes:
//! each raw bid is skewed down by the margin, each raw ask skewed up,
//! and the result keyed by rounded price. Pure function; rebuilt fresh
//! every cycle with no carry-over.

use dnmm_core::{DepthSnapshot, Price, Size};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Target quotes for one side, keyed by adjusted price.
///
/// Keys are unique per cycle. Two raw levels rounding to the same
/// adjusted price collide last-write-wins; the later level overwrites
/// the earlier. Policy choice, not an error.
pub type Ladder = BTreeMap<Price, Size>;

/// Build both ladders from a snapshot.
///
/// Bid key = round(p × (1 − margin), dp); ask key = round(p × (1 + margin), dp).
/// Levels with non-positive size never reach the ladder, so reconciliation
/// cannot submit them.
pub fn build_ladders(snapshot: &DepthSnapshot, margin: Decimal, price_dp: u32) -> (Ladder, Ladder) {
    let bid_factor = Decimal::ONE - margin;
    let ask_factor = Decimal::ONE + margin;

    let mut bids = Ladder::new();
    for level in &snapshot.bids {
        if !level.size.is_positive() {
            continue;
        }
        let key = (level.price * bid_factor).round_dp(price_dp);
        bids.insert(key, level.size);
    }

    let mut asks = Ladder::new();
    for level in &snapshot.asks {
        if !level.size.is_positive() {
            continue;
        }
        let key = (level.price * ask_factor).round_dp(price_dp);
        asks.insert(key, level.size);
    }

    (bids, asks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnmm_core::RawDepthFrame;
    use rust_decimal_macros::dec;

    fn snapshot(bids: &[(&str, &str)], asks: &[(&str, &str)]) -> DepthSnapshot {
        let frame = RawDepthFrame {
            bids: bids
                .iter()
                .map(|(p, s)| [p.to_string(), s.to_string()])
                .collect(),
            asks: asks
                .iter()
                .map(|(p, s)| [p.to_string(), s.to_string()])
                .collect(),
        };
        DepthSnapshot::from_raw(&frame, 5).unwrap()
    }

    #[test]
    fn test_bid_skewed_below_raw_price() {
        // 10.00 * (1 - 0.005) = 9.95
        let snap = snapshot(&[("10.00", "100")], &[]);
        let (bids, asks) = build_ladders(&snap, dec!(0.005), 2);

        assert!(asks.is_empty());
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[&Price::new(dec!(9.95))], Size::new(dec!(100)));
    }

    #[test]
    fn test_ask_skewed_above_raw_price() {
        // 10.00 * (1 + 0.005) = 10.05
        let snap = snapshot(&[], &[("10.00", "100")]);
        let (bids, asks) = build_ladders(&snap, dec!(0.005), 2);

        assert!(bids.is_empty());
        assert_eq!(asks[&Price::new(dec!(10.05))], Size::new(dec!(100)));
    }

    #[test]
    fn test_margin_moves_quotes_away_from_book() {
        let snap = snapshot(
            &[("10.00", "1"), ("9.99", "2"), ("9.98", "3")],
            &[("10.01", "1"), ("10.02", "2"), ("10.03", "3")],
        );
        let (bids, asks) = build_ladders(&snap, dec!(0.01), 2);

        let worst_raw_bid = dec!(9.98);
        for price in bids.keys() {
            assert!(price.inner() < worst_raw_bid);
        }
        let worst_raw_ask = dec!(10.03);
        for price in asks.keys() {
            assert!(price.inner() > worst_raw_ask);
        }
    }

    #[test]
    fn test_idempotent_pure_function() {
        let snap = snapshot(&[("25.40", "10"), ("25.38", "20")], &[("25.44", "15")]);
        let first = build_ladders(&snap, dec!(0.005), 2);
        let second = build_ladders(&snap, dec!(0.005), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_collision_last_write_wins() {
        // 10.001 and 10.004 both round to key 9.95 at margin 0.005:
        // 10.001 * 0.995 = 9.950995 -> 9.95
        // 10.004 * 0.995 = 9.95398  -> 9.95
        let snap = snapshot(&[("10.001", "100"), ("10.004", "200")], &[]);
        let (bids, _) = build_ladders(&snap, dec!(0.005), 2);

        assert_eq!(bids.len(), 1);
        assert_eq!(bids[&Price::new(dec!(9.95))], Size::new(dec!(200)));
    }

    #[test]
    fn test_non_positive_sizes_dropped() {
        let snap = snapshot(&[("10.00", "0"), ("9.99", "-5"), ("9.98", "7")], &[]);
        let (bids, _) = build_ladders(&snap, dec!(0.005), 2);

        assert_eq!(bids.len(), 1);
        assert_eq!(bids[&Price::new(dec!(9.93))], Size::new(dec!(7)));
    }

    #[test]
    fn test_zero_margin_rounds_only() {
        let snap = snapshot(&[("10.004", "1")], &[("10.006", "1")]);
        let (bids, asks) = build_ladders(&snap, dec!(0), 2);

        assert!(bids.contains_key(&Price::new(dec!(10.00))));
        assert!(asks.contains_key(&Price::new(dec!(10.01))));
    }

    #[test]
    fn test_empty_snapshot_yields_empty_ladders() {
        let snap = snapshot(&[], &[]);
        let (bids, asks) = build_ladders(&snap, dec!(0.005), 2);
        assert!(bids.is_empty());
        assert!(asks.is_empty());
    }
}
