// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite-sheet animation.
//!
//! A sprite is a rect leaf filled with one frame of an image sheet. Its
//! [`Sprite`] behavior plays named sequences of frames, advancing by wall time
//! rather than by tick count, and writes the current frame into the node's
//! [`Fill::Image`] source.
//!
//! ```
//! use kurbo::Rect;
//! use scenery_engine::{Engine, NullRasterizer, Sequence, Sprite, SpriteSheet};
//! use scenery_graph::{Fill, ImageKey};
//!
//! let sheet = SpriteSheet::grid(ImageKey(7), 4, 1, 32.0, 32.0);
//! let mut engine = Engine::default();
//! let walker = engine.new_sprite(100.0, 100.0, sheet, [Sequence::new("walk", 0, 4, 400.0)]);
//! if let Some(sprite) = engine.scene_mut().behavior_mut::<Sprite>(walker) {
//!     sprite.set_sequence("walk");
//!     sprite.play();
//! }
//!
//! engine.tick(1000.0, &mut NullRasterizer);
//! engine.tick(1250.0, &mut NullRasterizer);
//! let source = match &engine.scene().paint(walker).unwrap().fill {
//!     Some(Fill::Image { source, .. }) => *source,
//!     _ => unreachable!(),
//! };
//! assert_eq!(source, Rect::new(64.0, 0.0, 96.0, 32.0));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;
use scenery_graph::{Behavior, Fill, FrameEvent, ImageKey, NodeId, Paint, Scene};
use scenery_shape::Path;
use tracing::{debug, trace};

/// An image and the source rects of its frames, in frame-index order.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSheet {
    /// Image holding every frame.
    pub image: ImageKey,
    /// Source region of each frame, in image pixels.
    pub frames: Vec<Rect>,
}

impl SpriteSheet {
    /// A sheet of `columns * rows` equally sized frames, numbered row by row.
    pub fn grid(image: ImageKey, columns: usize, rows: usize, width: f64, height: f64) -> Self {
        let mut frames = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for col in 0..columns {
                let (x, y) = (col as f64 * width, row as f64 * height);
                frames.push(Rect::new(x, y, x + width, y + height));
            }
        }
        Self { image, frames }
    }
}

/// A named run of consecutive frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    /// Name used by [`Sprite::set_sequence`].
    pub name: String,
    /// Index of the first frame.
    pub start: usize,
    /// Number of frames.
    pub count: usize,
    /// Duration of one loop through the frames, in milliseconds.
    pub time: f64,
}

impl Sequence {
    /// Build a sequence.
    pub fn new(name: impl Into<String>, start: usize, count: usize, time: f64) -> Self {
        Self {
            name: name.into(),
            start,
            count,
            time,
        }
    }

    fn frame_time(&self) -> Option<f64> {
        (self.count > 1 && self.time > 0.0).then(|| self.time / self.count as f64)
    }

    /// Fold `frame` back into `start..start + count`.
    fn wrap(&self, frame: usize) -> usize {
        match self.count {
            0 => self.start,
            n => self.start + frame.saturating_sub(self.start) % n,
        }
    }
}

/// Sprite animation state, installed as the behavior of the sprite leaf.
#[derive(Clone, Debug)]
pub struct Sprite {
    sheet: SpriteSheet,
    sequences: HashMap<String, Sequence>,
    current: Option<String>,
    frame: usize,
    stamp: Option<f64>,
    playing: bool,
    refresh: bool,
}

impl Sprite {
    /// Animation state over `sheet`; nothing plays until a sequence is chosen.
    pub fn new(sheet: SpriteSheet, sequences: impl IntoIterator<Item = Sequence>) -> Self {
        Self {
            sheet,
            sequences: sequences
                .into_iter()
                .map(|s| (s.name.clone(), s))
                .collect(),
            current: None,
            frame: 0,
            stamp: None,
            playing: false,
            refresh: false,
        }
    }

    /// Build a detached `width` x `height` sprite leaf showing frame 0.
    pub fn create(
        scene: &mut Scene,
        sheet: SpriteSheet,
        sequences: impl IntoIterator<Item = Sequence>,
        width: f64,
        height: f64,
    ) -> NodeId {
        let paint = Paint {
            fill: sheet.frames.first().map(|&source| Fill::Image {
                image: sheet.image,
                source,
            }),
            stroke: None,
        };
        let id = scene.create_leaf(Path::rect(width, height), paint);
        scene.set_behavior(id, Some(Box::new(Self::new(sheet, sequences))));
        id
    }

    /// Switch to the sequence called `name` and rewind to its first frame.
    ///
    /// Returns `false` (and keeps the current sequence) for unknown names.
    pub fn set_sequence(&mut self, name: &str) -> bool {
        let Some(seq) = self.sequences.get(name) else {
            debug!(name, "unknown sprite sequence");
            return false;
        };
        self.frame = seq.start;
        self.stamp = None;
        self.current = Some(seq.name.clone());
        self.refresh = true;
        true
    }

    /// Name of the current sequence.
    pub fn sequence(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Start or resume advancing frames.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Hold the current frame.
    pub fn stop(&mut self) {
        self.playing = false;
        self.stamp = None;
    }

    /// Returns `true` while frames advance.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Index of the frame on display.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance `self.frame` to `now`; returns `true` when it changed.
    fn advance(&mut self, now: f64) -> bool {
        let Some(seq) = self.current.as_ref().and_then(|n| self.sequences.get(n)) else {
            return false;
        };
        let Some(frame_time) = seq.frame_time() else {
            return false;
        };
        let stamp = *self.stamp.get_or_insert(now);
        let elapsed = now - stamp;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Whole frames elapsed since the stamp."
        )]
        let steps = if elapsed > 0.0 {
            (elapsed / frame_time) as usize
        } else {
            0
        };
        if steps == 0 {
            return false;
        }
        self.stamp = Some(now - elapsed % frame_time);
        let next = seq.wrap(self.frame.max(seq.start) + steps);
        let changed = next != self.frame;
        self.frame = next;
        changed
    }
}

impl Behavior for Sprite {
    fn update(&mut self, scene: &mut Scene, id: NodeId, frame: &FrameEvent) {
        let refresh = core::mem::take(&mut self.refresh);
        let advanced = self.playing && self.advance(frame.time_stamp);
        if !advanced && !refresh {
            return;
        }
        let Some(&source) = self.sheet.frames.get(self.frame) else {
            return;
        };
        let Some(mut paint) = scene.paint(id).cloned() else {
            return;
        };
        trace!(?id, frame = self.frame, "sprite frame");
        paint.fill = Some(Fill::Image {
            image: self.sheet.image,
            source,
        });
        scene.set_paint(id, paint);
    }
}
