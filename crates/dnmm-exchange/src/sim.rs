//! In-process paper exchange.
//!
//! Backs the binary's paper mode and the engine's integration tests.
//! Keeps spot balance, futures position, and the open-order book in
//! memory, records every call for test verification, and supports
//! per-call failure injection.

use std::sync::Arc;

use dnmm_core::{ClientOrderId, OrderSide, Price, RawDepthFrame, Size, TimeInForce};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::{BoxFuture, DepthStream, ExchangeClient};
use crate::error::{ExchangeError, ExchangeResult};
use crate::types::{CancelResult, OrderResult, OrderStatus, OutstandingOrder};

/// One recorded call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCall {
    SubscribeDepth,
    OpenOrders,
    Cancel { order_id: u64 },
    PlaceLimit { side: OrderSide, price: Price, size: Size },
    PlaceMarket { side: OrderSide, size: Size },
    SpotBalance,
    FuturesPosition,
}

enum StreamEvent {
    Frame(RawDepthFrame),
    Error(ExchangeError),
}

struct SimState {
    spot_balance: Decimal,
    futures_position: Decimal,
    open_orders: Vec<OutstandingOrder>,
    next_order_id: u64,
    fail_limits: u32,
    fail_markets: u32,
    fail_cancels: u32,
    fail_queries: u32,
    fail_subscribes: u32,
    calls: Vec<SimCall>,
    stream_tx: Option<mpsc::UnboundedSender<StreamEvent>>,
}

/// Paper exchange. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SimExchange {
    state: Arc<Mutex<SimState>>,
}

impl SimExchange {
    pub fn new(spot_balance: Decimal, futures_position: Decimal) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                spot_balance,
                futures_position,
                open_orders: Vec::new(),
                next_order_id: 1,
                fail_limits: 0,
                fail_markets: 0,
                fail_cancels: 0,
                fail_queries: 0,
                fail_subscribes: 0,
                calls: Vec::new(),
                stream_tx: None,
            })),
        }
    }

    /// Handle for driving the depth stream from outside.
    pub fn depth_handle(&self) -> SimDepthHandle {
        SimDepthHandle {
            state: self.state.clone(),
        }
    }

    pub fn set_spot_balance(&self, balance: Decimal) {
        self.state.lock().spot_balance = balance;
    }

    pub fn spot_balance_now(&self) -> Decimal {
        self.state.lock().spot_balance
    }

    pub fn futures_position_now(&self) -> Decimal {
        self.state.lock().futures_position
    }

    pub fn open_order_count(&self) -> usize {
        self.state.lock().open_orders.len()
    }

    /// Seed the open-order book directly (as if left over from a
    /// previous run or placed by another process).
    pub fn seed_open_order(&self, side: OrderSide, price: Price, size: Size) -> u64 {
        let mut state = self.state.lock();
        let order_id = state.next_order_id;
        state.next_order_id += 1;
        state.open_orders.push(OutstandingOrder {
            order_id,
            side,
            price,
            size,
        });
        order_id
    }

    /// Fail the next `n` limit-order submissions.
    pub fn fail_next_limits(&self, n: u32) {
        self.state.lock().fail_limits = n;
    }

    /// Fail the next `n` market-order submissions.
    pub fn fail_next_markets(&self, n: u32) {
        self.state.lock().fail_markets = n;
    }

    /// Fail the next `n` cancel requests.
    pub fn fail_next_cancels(&self, n: u32) {
        self.state.lock().fail_cancels = n;
    }

    /// Fail the next `n` open-order queries.
    pub fn fail_next_queries(&self, n: u32) {
        self.state.lock().fail_queries = n;
    }

    /// Fail the next `n` depth subscriptions.
    pub fn fail_next_subscribes(&self, n: u32) {
        self.state.lock().fail_subscribes = n;
    }

    /// Recorded calls in issue order.
    pub fn calls(&self) -> Vec<SimCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn take_failure(counter: &mut u32) -> bool {
        if *counter > 0 {
            *counter -= 1;
            true
        } else {
            false
        }
    }
}

impl ExchangeClient for SimExchange {
    fn place_limit_order(
        &self,
        _symbol: &str,
        side: OrderSide,
        price: Price,
        size: Size,
        _tif: TimeInForce,
    ) -> BoxFuture<'_, ExchangeResult<OrderResult>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            state.calls.push(SimCall::PlaceLimit { side, price, size });
            if Self::take_failure(&mut state.fail_limits) {
                return Err(ExchangeError::Request("injected limit failure".to_string()));
            }
            let order_id = state.next_order_id;
            state.next_order_id += 1;
            state.open_orders.push(OutstandingOrder {
                order_id,
                side,
                price,
                size,
            });
            debug!(order_id, %side, %price, %size, "sim limit order accepted");
            Ok(OrderResult {
                order_id,
                client_order_id: ClientOrderId::new(),
                side,
                price: Some(price),
                size,
                status: OrderStatus::Accepted,
            })
        })
    }

    fn place_market_order(
        &self,
        _symbol: &str,
        side: OrderSide,
        size: Size,
    ) -> BoxFuture<'_, ExchangeResult<OrderResult>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            state.calls.push(SimCall::PlaceMarket { side, size });
            if Self::take_failure(&mut state.fail_markets) {
                return Err(ExchangeError::Request(
                    "injected market failure".to_string(),
                ));
            }
            let signed = size.inner() * Decimal::from(side.sign());
            state.futures_position += signed;
            let order_id = state.next_order_id;
            state.next_order_id += 1;
            debug!(order_id, %side, %size, "sim market order filled");
            Ok(OrderResult {
                order_id,
                client_order_id: ClientOrderId::new(),
                side,
                price: None,
                size,
                status: OrderStatus::Filled,
            })
        })
    }

    fn open_orders(&self, _symbol: &str) -> BoxFuture<'_, ExchangeResult<Vec<OutstandingOrder>>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            state.calls.push(SimCall::OpenOrders);
            if Self::take_failure(&mut state.fail_queries) {
                return Err(ExchangeError::Request("injected query failure".to_string()));
            }
            Ok(state.open_orders.clone())
        })
    }

    fn cancel_order(
        &self,
        _symbol: &str,
        order_id: u64,
    ) -> BoxFuture<'_, ExchangeResult<CancelResult>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            state.calls.push(SimCall::Cancel { order_id });
            if Self::take_failure(&mut state.fail_cancels) {
                return Err(ExchangeError::Request(
                    "injected cancel failure".to_string(),
                ));
            }
            let before = state.open_orders.len();
            state.open_orders.retain(|o| o.order_id != order_id);
            if state.open_orders.len() == before {
                return Err(ExchangeError::Request(format!(
                    "unknown order id {order_id}"
                )));
            }
            Ok(CancelResult { order_id })
        })
    }

    fn spot_balance(&self, _asset: &str) -> BoxFuture<'_, ExchangeResult<Decimal>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            state.calls.push(SimCall::SpotBalance);
            Ok(state.spot_balance)
        })
    }

    fn futures_position(&self, _symbol: &str) -> BoxFuture<'_, ExchangeResult<Decimal>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            state.calls.push(SimCall::FuturesPosition);
            Ok(state.futures_position)
        })
    }

    fn subscribe_depth(
        &self,
        _symbol: &str,
        _levels: usize,
    ) -> BoxFuture<'_, ExchangeResult<Box<dyn DepthStream>>> {
        Box::pin(async move {
            let mut state = self.state.lock();
            state.calls.push(SimCall::SubscribeDepth);
            if Self::take_failure(&mut state.fail_subscribes) {
                return Err(ExchangeError::Connectivity(
                    "injected subscribe failure".to_string(),
                ));
            }
            let (tx, rx) = mpsc::unbounded_channel();
            state.stream_tx = Some(tx);
            Ok(Box::new(SimDepthStream { rx }) as Box<dyn DepthStream>)
        })
    }
}

/// Feeds frames into whichever stream is currently subscribed.
///
/// Frames pushed while nothing is subscribed are dropped, matching a
/// live feed that publishes regardless of listeners.
#[derive(Clone)]
pub struct SimDepthHandle {
    state: Arc<Mutex<SimState>>,
}

impl SimDepthHandle {
    pub fn push_frame(&self, frame: RawDepthFrame) {
        if let Some(tx) = &self.state.lock().stream_tx {
            let _ = tx.send(StreamEvent::Frame(frame));
        }
    }

    /// Deliver a transport error to the subscriber.
    pub fn push_error(&self, error: ExchangeError) {
        if let Some(tx) = &self.state.lock().stream_tx {
            let _ = tx.send(StreamEvent::Error(error));
        }
    }

    /// Close the current stream; the subscriber sees a normal end.
    pub fn close(&self) {
        self.state.lock().stream_tx = None;
    }
}

struct SimDepthStream {
    rx: mpsc::UnboundedReceiver<StreamEvent>,
}

impl DepthStream for SimDepthStream {
    fn recv(&mut self) -> BoxFuture<'_, ExchangeResult<Option<RawDepthFrame>>> {
        Box::pin(async move {
            match self.rx.recv().await {
                Some(StreamEvent::Frame(frame)) => Ok(Some(frame)),
                Some(StreamEvent::Error(e)) => Err(e),
                None => Ok(None),
            }
        })
    }
}
