//! Order-book depth types.
//!
//! A depth frame arrives from the exchange as string-encoded
//! (price, size) pairs per level. Each frame fully replaces the
//! previous snapshot; stale levels are never merged.

use crate::decimal::{Price, Size};
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw book entry: price and size at that price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: Price,
    pub size: Size,
}

impl DepthLevel {
    /// Parse a level from the exchange's string-encoded pair.
    ///
    /// Non-numeric or non-positive prices and non-numeric sizes are
    /// validation errors, never silently dropped.
    pub fn parse(px: &str, sz: &str) -> CoreResult<Self> {
        let price: Price = px
            .parse()
            .map_err(|_| CoreError::InvalidPrice(px.to_string()))?;
        if !price.is_positive() {
            return Err(CoreError::InvalidPrice(px.to_string()));
        }
        let size: Size = sz
            .parse()
            .map_err(|_| CoreError::InvalidSize(sz.to_string()))?;
        Ok(Self { price, size })
    }
}

/// Wire shape of a depth update as delivered by the stream boundary.
///
/// Levels are `["price", "size"]` string pairs, bids descending and
/// asks ascending by price.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDepthFrame {
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
}

/// Parsed top-of-book snapshot, capped at N levels per side.
///
/// Bids are descending and asks ascending by price, as delivered.
#[derive(Debug, Clone)]
pub struct DepthSnapshot {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
    pub received_at: DateTime<Utc>,
}

impl DepthSnapshot {
    /// Parse a raw frame, keeping at most `max_levels` per side.
    pub fn from_raw(frame: &RawDepthFrame, max_levels: usize) -> CoreResult<Self> {
        let parse_side = |levels: &[[String; 2]]| -> CoreResult<Vec<DepthLevel>> {
            levels
                .iter()
                .take(max_levels)
                .map(|pair| DepthLevel::parse(&pair[0], &pair[1]))
                .collect()
        };

        Ok(Self {
            bids: parse_side(&frame.bids)?,
            asks: parse_side(&frame.asks)?,
            received_at: Utc::now(),
        })
    }

    pub fn best_bid(&self) -> Option<&DepthLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&DepthLevel> {
        self.asks.first()
    }

    /// Midpoint of the touch, if both sides are present.
    pub fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(bid.price.midpoint(ask.price)),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
