//! Fluent builder for constructing a [`Controller`].

use std::collections::BTreeMap;

use ds_core::{DiskConfig, PlaybackConfig, RequestSource, SimClock, SimRng};

use crate::cache::ResultCache;
use crate::controller::checked_multiplier;
use crate::timer::TimerQueue;
use crate::{Controller, PlaybackState, SimResult};

/// Fluent builder for [`Controller`].
///
/// # Required inputs
///
/// - [`DiskConfig`]: head, queue, direction and track limit.
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                  |
/// |-----------------|------------------------------------------|
/// | `.playback(p)`  | `PlaybackConfig::default()`              |
/// | `.source(s)`    | `SimRng::new(playback.seed)`             |
///
/// # Example
///
/// ```rust,ignore
/// let mut ctl = ControllerBuilder::new(DiskConfig::default())
///     .playback(PlaybackConfig { dynamic_mode: true, ..Default::default() })
///     .build()?;
/// ctl.play();
/// ctl.advance(5_000, &mut NoopObserver);
/// ```
pub struct ControllerBuilder {
    disk:     DiskConfig,
    playback: Option<PlaybackConfig>,
    source:   Option<Box<dyn RequestSource>>,
}

impl ControllerBuilder {
    pub fn new(disk: DiskConfig) -> Self {
        Self {
            disk,
            playback: None,
            source:   None,
        }
    }

    /// Supply timing, dynamic-mode and seed settings.
    ///
    /// Speed multipliers are clamped into their allowed ranges by `build`.
    pub fn playback(mut self, playback: PlaybackConfig) -> Self {
        self.playback = Some(playback);
        self
    }

    /// Supply the source of random tracks for generated queues and dynamic
    /// arrivals.
    ///
    /// If not called, a [`SimRng`] seeded from `playback.seed` is used.
    pub fn source(mut self, source: impl RequestSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Validate inputs, compute every policy, and return an idle
    /// [`Controller`] at step 0.
    pub fn build(self) -> SimResult<Controller> {
        // ── Validate playback settings ────────────────────────────────────
        let mut playback = self.playback.unwrap_or_default();
        let (lo, hi) = PlaybackConfig::EXECUTION_SPEED_RANGE;
        playback.execution_speed = checked_multiplier("execution speed", playback.execution_speed, lo, hi)?;
        let (lo, hi) = PlaybackConfig::ARRIVAL_RATE_RANGE;
        playback.arrival_rate = checked_multiplier("arrival rate", playback.arrival_rate, lo, hi)?;

        let source = self
            .source
            .unwrap_or_else(|| Box::new(SimRng::new(playback.seed)));

        // ── Assemble, then configure (validates the disk and recomputes) ──
        let base = self.disk.workload();
        let mut controller = Controller {
            playback,
            disk:           self.disk.clone(),
            live:           base.clone(),
            base,
            results:        BTreeMap::new(),
            cache:          ResultCache::new(),
            state:          PlaybackState::Idle,
            current_step:   0,
            last_arrived:   None,
            clock:          SimClock::new(),
            timers:         TimerQueue::new(),
            playback_timer: None,
            arrival_timer:  None,
            source,
        };
        controller.configure(self.disk)?;
        Ok(controller)
    }
}
