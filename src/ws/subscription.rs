//! Per-connection subscription manager.
//!
//! Tracks which tiles a WebSocket client is subscribed to and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::MetricTile;

/// Manages the set of tile subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed tiles. If `subscribe_all` is true, this set is ignored.
    tiles: HashSet<MetricTile>,
    /// Whether the client subscribes to all tiles (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds tiles to the subscription set. `wildcard` enables all tiles.
    pub fn subscribe(&mut self, tiles: &[MetricTile], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.tiles.extend(tiles.iter().copied());
    }

    /// Removes tiles from the subscription set. `wildcard` clears the
    /// wildcard subscription.
    pub fn unsubscribe(&mut self, tiles: &[MetricTile], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for tile in tiles {
            self.tiles.remove(tile);
        }
    }

    /// Returns `true` if the given tile matches the subscription filter.
    #[must_use]
    pub fn matches(&self, tile: MetricTile) -> bool {
        self.subscribe_all || self.tiles.contains(&tile)
    }

    /// Returns the number of explicitly subscribed tiles.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub const fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
