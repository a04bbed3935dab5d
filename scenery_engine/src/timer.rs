// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delayed and repeating callbacks driven by frame deltas.
//!
//! Timers only advance on unpaused ticks. A timer fires at most once per tick,
//! when its remaining delay reaches zero; the overshoot carries into the next
//! period so repeating timers do not drift. A callback can stop its own timer
//! through [`TimerEvent::cancel`].

use alloc::boxed::Box;
use alloc::vec::Vec;

use scenery_graph::{FrameEvent, Scene};
use tracing::trace;

/// Handle of a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Passed to a timer callback each time it fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerEvent {
    /// The firing timer.
    pub id: TimerId,
    /// How many times it has fired, this call included.
    pub count: u32,
    /// The tick that fired it.
    pub frame: FrameEvent,
    cancelled: bool,
}

impl TimerEvent {
    /// Stop the firing timer; it will not fire again.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Returns `true` once [`TimerEvent::cancel`] was called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Timer callback.
pub type TimerCallback = Box<dyn FnMut(&mut Scene, &mut TimerEvent)>;

/// Number of times a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Iterations {
    /// Fire this many more times. `Times(0)` is scheduled as one firing.
    Times(u32),
    /// Fire until cancelled.
    Forever,
}

impl From<i32> for Iterations {
    /// Negative counts repeat forever; zero is treated as one.
    fn from(n: i32) -> Self {
        match u32::try_from(n) {
            Ok(0) => Self::Times(1),
            Ok(n) => Self::Times(n),
            Err(_) => Self::Forever,
        }
    }
}

struct Timer {
    id: TimerId,
    delay: f64,
    remaining: f64,
    iterations: Iterations,
    fired: u32,
    cancelled: bool,
    callback: TimerCallback,
}

/// Scheduled timers, in registration order.
#[derive(Default)]
pub struct Timers {
    timers: Vec<Timer>,
    next_id: u64,
}

impl core::fmt::Debug for Timers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timers")
            .field("scheduled", &self.timers.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl Timers {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `callback` to run after `delay_ms`, `iterations` times.
    pub fn perform_with_delay(
        &mut self,
        delay_ms: f64,
        iterations: impl Into<Iterations>,
        callback: impl FnMut(&mut Scene, &mut TimerEvent) + 'static,
    ) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let iterations = match iterations.into() {
            Iterations::Times(0) => Iterations::Times(1),
            n => n,
        };
        self.timers.push(Timer {
            id,
            delay: delay_ms,
            remaining: delay_ms,
            iterations,
            fired: 0,
            cancelled: false,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a timer. It is swept on the next update.
    ///
    /// Returns `false` for unknown or already cancelled timers.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.iter_mut().find(|t| t.id == id && !t.cancelled) {
            Some(t) => {
                t.cancelled = true;
                true
            }
            None => false,
        }
    }

    /// Returns `true` while the timer is scheduled and not cancelled.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id && !t.cancelled)
    }

    /// Number of scheduled timers, cancelled ones awaiting the sweep included.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Returns `true` when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Advance every timer by `frame.delta` and fire the due ones.
    pub fn update(&mut self, scene: &mut Scene, frame: &FrameEvent) {
        self.timers.retain(|t| !t.cancelled);
        for timer in &mut self.timers {
            timer.remaining -= frame.delta;
            if timer.remaining > 0.0 {
                continue;
            }
            timer.fired += 1;
            timer.remaining += timer.delay;
            if let Iterations::Times(n) = &mut timer.iterations {
                *n = n.saturating_sub(1);
            }
            trace!(id = ?timer.id, count = timer.fired, "timer fired");
            let mut event = TimerEvent {
                id: timer.id,
                count: timer.fired,
                frame: *frame,
                cancelled: false,
            };
            (timer.callback)(scene, &mut event);
            if event.cancelled {
                trace!(id = ?timer.id, "timer cancelled itself");
                timer.cancelled = true;
            }
        }
        self.timers
            .retain(|t| !t.cancelled && t.iterations != Iterations::Times(0));
    }
}
