// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hook for collaborators updated once per unpaused tick.

use scenery_graph::{FrameEvent, Scene};

/// A per-frame collaborator: tweening, physics, particles, audio sync.
///
/// Subsystems run after the traversal and the timers, in registration order,
/// and only while the engine is not paused.
///
/// ```
/// use scenery_engine::{Engine, NullRasterizer, Subsystem};
/// use scenery_graph::{FrameEvent, Scene};
///
/// #[derive(Default)]
/// struct Clock(f64);
///
/// impl Subsystem for Clock {
///     fn update(&mut self, _scene: &mut Scene, frame: &FrameEvent) {
///         self.0 += frame.delta;
///     }
/// }
///
/// let mut engine = Engine::default();
/// engine.add_subsystem(Clock::default());
/// engine.tick(0.0, &mut NullRasterizer);
/// engine.tick(16.0, &mut NullRasterizer);
/// ```
pub trait Subsystem {
    /// Advance by one frame.
    fn update(&mut self, scene: &mut Scene, frame: &FrameEvent);

    /// Short name used in logs.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}
