// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: walk a pointer's listener objects and honor stop outcomes.
//!
//! Pointer events go to the objects that claimed the pointer, in claim order.
//! The first object whose listeners report the event handled stops the walk;
//! if nobody handles it, the engine-level listeners get it instead.
//!
//! ## Minimal example
//!
//! ```
//! use scenery_engine::dispatcher::{Outcome, run};
//!
//! let seq = [1_u32, 2, 3];
//! let mut seen = Vec::new();
//! let stop_at = run(&seq, &mut seen, |n, seen| {
//!     seen.push(*n);
//!     if *n == 2 { Outcome::Stop } else { Outcome::Continue }
//! });
//!
//! assert_eq!(stop_at, Some(&2));
//! assert_eq!(seen, vec![1, 2]);
//! ```

use scenery_graph::{EventType, NodeId, Payload, Scene};

/// Propagation decision returned by a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    Continue,
    /// The event was handled; skip the remaining entries.
    Stop,
}

impl From<bool> for Outcome {
    fn from(handled: bool) -> Self {
        if handled { Self::Stop } else { Self::Continue }
    }
}

/// Run a handler over a sequence and honor stop outcomes.
///
/// Returns the entry that stopped propagation, or `None` if the whole
/// sequence was visited.
pub fn run<'a, K, E>(
    seq: &'a [K],
    event: &mut E,
    mut handler: impl FnMut(&K, &mut E) -> Outcome,
) -> Option<&'a K> {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(d),
        }
    }
    None
}

/// Dispatch `ty` to each of `objects` in order until one handles it.
///
/// Returns the node that handled the event.
pub fn first_handler(
    scene: &mut Scene,
    objects: &[NodeId],
    ty: EventType,
    payload: &Payload,
) -> Option<NodeId> {
    run(objects, scene, |id, scene| {
        scene.dispatch(*id, ty, payload.clone()).into()
    })
    .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::Point;
    use scenery_graph::TapEvent;

    #[test]
    fn continue_through_all() {
        let seq = [1, 2, 3];
        let mut seen: Vec<u32> = Vec::new();
        let stopped = run(&seq, &mut seen, |n, seen| {
            seen.push(*n);
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert_eq!(seen.len(), seq.len());
    }

    #[test]
    fn stop_aborts_propagation() {
        let seq = [1, 2, 3];
        let mut seen: Vec<u32> = Vec::new();
        let stopped = run(&seq, &mut seen, |n, seen| {
            seen.push(*n);
            (*n == 1).into()
        });
        assert_eq!(stopped, Some(&1));
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn first_truthy_object_wins() {
        let mut scene = Scene::new();
        let log = Rc::new(RefCell::new(vec![]));
        let mut objects = vec![];
        for handled in [false, true, true] {
            let n = scene.create_group();
            let log = log.clone();
            scene.add_listener(n, EventType::Tap, move |_, ev| {
                log.borrow_mut().push(ev.target);
                handled
            });
            objects.push(n);
        }
        let payload = Payload::Tap(TapEvent {
            position: Point::ORIGIN,
            duration: 50.0,
        });
        let winner = first_handler(&mut scene, &objects, EventType::Tap, &payload);
        assert_eq!(winner, Some(objects[1]));
        assert_eq!(*log.borrow(), vec![Some(objects[0]), Some(objects[1])]);
    }

    #[test]
    fn objects_without_listeners_are_skipped() {
        let mut scene = Scene::new();
        let silent = scene.create_group();
        let payload = Payload::Tap(TapEvent {
            position: Point::ORIGIN,
            duration: 0.0,
        });
        assert_eq!(
            first_handler(&mut scene, &[silent], EventType::Tap, &payload),
            None
        );
    }
}
