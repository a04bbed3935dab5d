// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration.

use scenery_graph::Color;
use scenery_shape::HitParams;

/// Press-to-release time below which a release counts as a tap, in milliseconds.
pub const DEFAULT_TAP_TIME_MS: f64 = 200.0;

/// Tunables for an [`Engine`](crate::Engine).
///
/// ```
/// use scenery_engine::EngineConfig;
/// use scenery_graph::Color;
///
/// let config = EngineConfig::default()
///     .with_tap_time_ms(150.0)
///     .with_clear_color(Color::BLACK)
///     .with_debug(true);
/// assert_eq!(config.tap_time_ms, 150.0);
/// assert!(config.debug);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Tap qualification threshold in milliseconds.
    pub tap_time_ms: f64,
    /// Emit [`DebugOverlay`](crate::DebugOverlay)s during the traversal.
    pub debug: bool,
    /// Color the surface is cleared with at the start of every tick.
    pub clear_color: Color,
    /// Fill used by the convenience constructors.
    pub fill_color: Color,
    /// Tolerances for pointer and hover hit tests.
    pub hit_params: HitParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tap_time_ms: DEFAULT_TAP_TIME_MS,
            debug: false,
            clear_color: Color::WHITE,
            fill_color: Color::BLACK,
            hit_params: HitParams::default(),
        }
    }
}

impl EngineConfig {
    /// Set the tap threshold.
    pub fn with_tap_time_ms(mut self, ms: f64) -> Self {
        self.tap_time_ms = ms;
        self
    }

    /// Enable or disable debug overlays.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the clear color.
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Set the default fill color.
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    /// Set hit-test tolerances.
    pub fn with_hit_params(mut self, params: HitParams) -> Self {
        self.hit_params = params;
        self
    }
}
