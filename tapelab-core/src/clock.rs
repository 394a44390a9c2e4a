//! Event clock — merges N data feeds into one time-ordered event stream.
//!
//! Pull-based k-way merge over feed cursors, keyed by
//! `(timestamp, feed registration index)` in a min-heap. All bars sharing
//! the globally minimum timestamp are dispatched together as one event
//! tick, ordered by registration index, so a strategy sees all
//! same-timestamp information atomically before it produces orders.
//!
//! The clock is the only source of time in a run. Nothing in the engine
//! reads the wall clock.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{DateTime, Utc};

use crate::domain::Bar;
use crate::feed::{DataFeed, FeedError};

/// All bars at one simulated timestamp, in feed registration order.
#[derive(Debug, Clone)]
pub struct EventTick {
    pub time: DateTime<Utc>,
    pub bars: Vec<Bar>,
}

struct Cursor {
    feed: Box<dyn DataFeed>,
    last_dispatched: Option<DateTime<Utc>>,
}

/// Chronological scheduler over registered feeds.
pub struct EventClock {
    cursors: Vec<Cursor>,
    // Min-heap of (next bar timestamp, feed index).
    heap: BinaryHeap<Reverse<(DateTime<Utc>, usize)>>,
    current_time: Option<DateTime<Utc>>,
}

impl EventClock {
    /// Register feeds in the order given; that order is the permanent
    /// same-timestamp tie-break.
    pub fn new(feeds: Vec<Box<dyn DataFeed>>) -> Self {
        let mut heap = BinaryHeap::with_capacity(feeds.len());
        for (idx, feed) in feeds.iter().enumerate() {
            if let Some(bar) = feed.peek() {
                heap.push(Reverse((bar.timestamp, idx)));
            }
        }
        let cursors = feeds
            .into_iter()
            .map(|feed| Cursor {
                feed,
                last_dispatched: None,
            })
            .collect();
        Self {
            cursors,
            heap,
            current_time: None,
        }
    }

    /// Current simulated time: the timestamp of the last dispatched tick.
    pub fn current_time(&self) -> Option<DateTime<Utc>> {
        self.current_time
    }

    pub fn feed_count(&self) -> usize {
        self.cursors.len()
    }

    /// Pull the next event tick, or `None` when every feed is exhausted.
    ///
    /// Fails with `FeedError::OutOfOrder` if any feed yields a bar earlier
    /// than one it already produced — the run must halt, the data is bad.
    pub fn next_tick(&mut self) -> Result<Option<EventTick>, FeedError> {
        let Reverse((tick_time, _)) = match self.heap.peek() {
            Some(entry) => *entry,
            None => return Ok(None),
        };

        let mut dispatched: Vec<(usize, Bar)> = Vec::new();

        // Drain every heap entry at the tick timestamp. A feed whose
        // following bar shares the timestamp re-enters the heap and is
        // drained within the same tick.
        while let Some(&Reverse((ts, idx))) = self.heap.peek() {
            if ts != tick_time {
                break;
            }
            self.heap.pop();

            let cursor = &mut self.cursors[idx];
            let bar = cursor
                .feed
                .advance()
                .expect("heap entry implies a peekable bar");
            debug_assert_eq!(bar.timestamp, ts);

            if let Some(prev) = cursor.last_dispatched {
                if bar.timestamp < prev {
                    return Err(FeedError::OutOfOrder {
                        symbol: bar.symbol.clone(),
                        prev,
                        next: bar.timestamp,
                    });
                }
            }
            cursor.last_dispatched = Some(bar.timestamp);

            if let Some(next) = cursor.feed.peek() {
                if next.timestamp < bar.timestamp {
                    return Err(FeedError::OutOfOrder {
                        symbol: bar.symbol.clone(),
                        prev: bar.timestamp,
                        next: next.timestamp,
                    });
                }
                self.heap.push(Reverse((next.timestamp, idx)));
            }

            dispatched.push((idx, bar));
        }

        // Registration order within the tick; stable so a feed producing
        // several equal-timestamp bars keeps its own sequence order.
        dispatched.sort_by_key(|(idx, _)| *idx);

        self.current_time = Some(tick_time);
        Ok(Some(EventTick {
            time: tick_time,
            bars: dispatched.into_iter().map(|(_, bar)| bar).collect(),
        }))
    }
}
