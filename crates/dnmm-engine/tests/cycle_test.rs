//! End-to-end cycle tests against the paper exchange.

use std::sync::Arc;
use std::time::Duration;

use dnmm_core::RawDepthFrame;
use dnmm_engine::{Engine, EngineConfig, EngineError};
use dnmm_exchange::{SimCall, SimExchange};
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

fn frame(bids: &[(&str, &str)], asks: &[(&str, &str)]) -> RawDepthFrame {
    RawDepthFrame {
        bids: bids
            .iter()
            .map(|(p, s)| [p.to_string(), s.to_string()])
            .collect(),
        asks: asks
            .iter()
            .map(|(p, s)| [p.to_string(), s.to_string()])
            .collect(),
    }
}

fn fast_config() -> EngineConfig {
    EngineConfig {
        recv_timeout_ms: 5_000,
        reconnect_base_delay_ms: 10,
        reconnect_max_delay_ms: 50,
        ..EngineConfig::default()
    }
}

/// Poll until `predicate` holds or the deadline passes.
async fn wait_until(mut predicate: impl FnMut() -> bool) {
    let deadline = Duration::from_secs(5);
    let poll = Duration::from_millis(10);
    tokio::time::timeout(deadline, async {
        while !predicate() {
            tokio::time::sleep(poll).await;
        }
    })
    .await
    .expect("condition not reached before deadline");
}

#[tokio::test]
async fn full_cycle_quotes_and_hedges() {
    let sim = SimExchange::new(dec!(9500), dec!(400));
    let handle = sim.depth_handle();
    let token = CancellationToken::new();

    let engine = Engine::new(fast_config(), Arc::new(sim.clone()), token.clone()).unwrap();
    let run = tokio::spawn(async move { engine.run().await });

    wait_until(|| sim.calls().contains(&SimCall::SubscribeDepth)).await;
    handle.push_frame(frame(&[("10.00", "100")], &[("10.01", "50")]));

    // Hedge fires: must_be_hedged = 500, to_hedge = 100 -> buy 100.
    wait_until(|| sim.futures_position_now() == dec!(500)).await;
    wait_until(|| sim.open_order_count() == 2).await;

    token.cancel();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn second_cycle_cancels_before_replacing() {
    let sim = SimExchange::new(dec!(10000), dec!(0));
    let handle = sim.depth_handle();
    let token = CancellationToken::new();

    let engine = Engine::new(fast_config(), Arc::new(sim.clone()), token.clone()).unwrap();
    let run = tokio::spawn(async move { engine.run().await });

    wait_until(|| sim.calls().contains(&SimCall::SubscribeDepth)).await;
    handle.push_frame(frame(&[("10.00", "100")], &[("10.01", "50")]));
    wait_until(|| sim.open_order_count() == 2).await;

    sim.clear_calls();
    handle.push_frame(frame(&[("10.02", "80")], &[("10.03", "40")]));
    wait_until(|| {
        sim.calls()
            .iter()
            .filter(|c| matches!(c, SimCall::Cancel { .. }))
            .count()
            == 2
    })
    .await;
    wait_until(|| sim.open_order_count() == 2).await;

    // Both stale quotes cancelled before any new quote was issued.
    let calls = sim.calls();
    let last_cancel = calls
        .iter()
        .rposition(|c| matches!(c, SimCall::Cancel { .. }))
        .unwrap();
    let first_limit = calls
        .iter()
        .position(|c| matches!(c, SimCall::PlaceLimit { .. }))
        .unwrap();
    assert!(last_cancel < first_limit);

    token.cancel();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn stream_close_triggers_resubscription() {
    let sim = SimExchange::new(dec!(10000), dec!(0));
    let handle = sim.depth_handle();
    let token = CancellationToken::new();

    let engine = Engine::new(fast_config(), Arc::new(sim.clone()), token.clone()).unwrap();
    let run = tokio::spawn(async move { engine.run().await });

    wait_until(|| sim.calls().contains(&SimCall::SubscribeDepth)).await;
    handle.close();

    wait_until(|| {
        sim.calls()
            .iter()
            .filter(|c| matches!(c, SimCall::SubscribeDepth))
            .count()
            >= 2
    })
    .await;

    token.cancel();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn receive_timeout_triggers_resubscription() {
    let sim = SimExchange::new(dec!(10000), dec!(0));
    let token = CancellationToken::new();

    let config = EngineConfig {
        recv_timeout_ms: 50,
        ..fast_config()
    };
    let engine = Engine::new(config, Arc::new(sim.clone()), token.clone()).unwrap();
    let run = tokio::spawn(async move { engine.run().await });

    // No frames arrive; the bounded wait must expire and resubscribe.
    wait_until(|| {
        sim.calls()
            .iter()
            .filter(|c| matches!(c, SimCall::SubscribeDepth))
            .count()
            >= 2
    })
    .await;

    token.cancel();
    run.await.unwrap().unwrap();
}

#[tokio::test]
async fn bounded_retry_gives_up() {
    let sim = SimExchange::new(dec!(10000), dec!(0));
    sim.fail_next_subscribes(10);

    let config = EngineConfig {
        max_reconnect_attempts: 2,
        ..fast_config()
    };
    let engine = Engine::new(config, Arc::new(sim.clone()), CancellationToken::new()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), engine.run())
        .await
        .unwrap();
    assert!(matches!(
        result,
        Err(EngineError::ReconnectExhausted { attempts: 2 })
    ));
}

#[tokio::test]
async fn shutdown_during_backoff_exits_cleanly() {
    let sim = SimExchange::new(dec!(10000), dec!(0));
    sim.fail_next_subscribes(1_000);

    let token = CancellationToken::new();
    let engine = Engine::new(fast_config(), Arc::new(sim.clone()), token.clone()).unwrap();
    let run = tokio::spawn(async move { engine.run().await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}
