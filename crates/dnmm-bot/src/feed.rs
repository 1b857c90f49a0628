//! Paper-mode depth feed.
//!
//! Random-walk generator that publishes synthetic depth frames into
//! the paper exchange, standing in for the live market-data stream.

use crate::config::SimConfig;
use dnmm_core::RawDepthFrame;
use dnmm_exchange::SimDepthHandle;
use rand::Rng;
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const LEVELS: usize = 5;

/// Run the generator until cancelled or `frame_count` frames are out.
pub async fn run_mock_feed(handle: SimDepthHandle, config: SimConfig, shutdown: CancellationToken) {
    // Work in integer cents so the walk can't drift off-grid.
    let start_cents = (config.start_price * Decimal::ONE_HUNDRED)
        .trunc()
        .try_into()
        .unwrap_or(2_500i64);
    let mut mid_cents: i64 = start_cents.max(100);
    let mut generated = 0u64;

    info!(
        start_cents = mid_cents,
        interval_ms = config.tick_interval_ms,
        frame_count = config.frame_count,
        "mock depth feed starting"
    );

    loop {
        if config.frame_count > 0 && generated >= config.frame_count {
            info!(generated, "mock feed reached frame_count, closing stream");
            handle.close();
            return;
        }

        // Don't hold ThreadRng across an await point.
        let frame = {
            let mut rng = rand::thread_rng();
            let step = rng.gen_range(-3..=3);
            mid_cents = (mid_cents + step).max(100);
            build_frame(mid_cents, &mut rng)
        };

        handle.push_frame(frame);
        generated += 1;
        debug!(mid_cents, generated, "mock depth frame published");

        tokio::select! {
            () = sleep(Duration::from_millis(config.tick_interval_ms)) => {}
            () = shutdown.cancelled() => {
                info!(generated, "mock feed shutting down");
                handle.close();
                return;
            }
        }
    }
}

fn build_frame(mid_cents: i64, rng: &mut impl Rng) -> RawDepthFrame {
    let mut bids = Vec::with_capacity(LEVELS);
    let mut asks = Vec::with_capacity(LEVELS);

    for i in 0..LEVELS as i64 {
        let bid_cents = mid_cents - 1 - i;
        let ask_cents = mid_cents + 1 + i;
        bids.push([cents_to_price(bid_cents), rng.gen_range(1..=200).to_string()]);
        asks.push([cents_to_price(ask_cents), rng.gen_range(1..=200).to_string()]);
    }

    RawDepthFrame { bids, asks }
}

fn cents_to_price(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
