//! The `Controller` struct: playback state machine, timers, and recomputation.

use std::collections::BTreeMap;

use ds_core::{
    DiskConfig, Direction, PlaybackConfig, RequestSource, SchedulingResult, SimClock, SimTime,
    Track, Workload, parse_queue,
};
use ds_policy::{PolicyKey, replan};
use tracing::{debug, info, trace, warn};

use crate::cache::ResultCache;
use crate::preset::{MAX_QUEUE_LEN, MAX_TRACK_LIMIT, QueuePreset};
use crate::timer::{TimerHandle, TimerKind, TimerQueue};
use crate::{ControllerObserver, PlaybackState, SimError, SimResult, Snapshot};

// ── Controller ────────────────────────────────────────────────────────────────

/// Drives step-indexed playback of all four policies side by side.
///
/// The controller owns one [`SchedulingResult`] per policy and a single
/// `current_step` applied to all of them, so policies can be compared
/// step-for-step even though their sequences differ in length.  Playback
/// finishes when the longest sequence is exhausted; shorter ones simply rest
/// on their last index.
///
/// # Time and mutual exclusion
///
/// Nothing happens on its own.  The host calls [`advance`][Self::advance]
/// with the elapsed wall time; due timers fire in time order, one at a time,
/// each handler running to completion before the next starts.  Because every
/// mutation goes through `&mut self`, a step advance and an arrival
/// recomputation can never overlap.  Hosts that drive the controller from
/// several threads wrap it in a `Mutex`, which preserves that guarantee.
///
/// Create via [`ControllerBuilder`][crate::ControllerBuilder].
pub struct Controller {
    pub(crate) playback: PlaybackConfig,

    /// Raw operator configuration, kept for reconfiguring one field at a time.
    pub(crate) disk: DiskConfig,

    /// Normalized configuration; what `reset` recomputes from.
    pub(crate) base: Workload,

    /// `base` plus dynamic arrivals.
    pub(crate) live: Workload,

    pub(crate) results: BTreeMap<PolicyKey, SchedulingResult>,
    pub(crate) cache:   ResultCache,

    pub(crate) state:        PlaybackState,
    pub(crate) current_step: usize,
    pub(crate) last_arrived: Option<Track>,

    pub(crate) clock:          SimClock,
    pub(crate) timers:         TimerQueue,
    pub(crate) playback_timer: Option<TimerHandle>,
    pub(crate) arrival_timer:  Option<TimerHandle>,

    pub(crate) source: Box<dyn RequestSource>,
}

impl Controller {
    // ── Configuration ─────────────────────────────────────────────────────

    /// Replace the disk configuration and reset playback.
    ///
    /// The track limit must lie in `1..=9999`; head and queue values are
    /// clamped into range rather than rejected.
    pub fn configure(&mut self, disk: DiskConfig) -> SimResult<()> {
        if !(1..=MAX_TRACK_LIMIT).contains(&disk.track_limit) {
            warn!(track_limit = disk.track_limit, "rejected track limit");
            return Err(SimError::OutOfRange {
                what: "track limit",
                got:  disk.track_limit,
                min:  1,
                max:  MAX_TRACK_LIMIT,
            });
        }
        self.base = disk.workload();
        self.disk = disk;
        debug!(
            head = %self.base.head,
            requests = self.base.request_count(),
            direction = %self.base.direction,
            track_limit = %self.base.track_limit,
            "configured"
        );
        self.reset();
        Ok(())
    }

    pub fn set_head(&mut self, head: i64) -> SimResult<()> {
        self.configure(DiskConfig { head, ..self.disk.clone() })
    }

    pub fn set_queue(&mut self, queue: Vec<i64>) -> SimResult<()> {
        self.configure(DiskConfig { queue, ..self.disk.clone() })
    }

    /// Replace the queue from a comma-separated list (see
    /// [`ds_core::parse_queue`]).
    pub fn set_queue_text(&mut self, text: &str) -> SimResult<()> {
        self.set_queue(parse_queue(text))
    }

    pub fn set_direction(&mut self, direction: Direction) -> SimResult<()> {
        self.configure(DiskConfig { direction, ..self.disk.clone() })
    }

    /// Set the direction from text such as `"left"` or `"R"`.
    pub fn set_direction_text(&mut self, text: &str) -> SimResult<()> {
        let direction: Direction = text.parse()?;
        self.set_direction(direction)
    }

    pub fn set_track_limit(&mut self, track_limit: i64) -> SimResult<()> {
        self.configure(DiskConfig { track_limit, ..self.disk.clone() })
    }

    /// Replace the queue with `count` random tracks from the request source.
    pub fn generate_queue(&mut self, count: usize) -> SimResult<()> {
        if !(1..=MAX_QUEUE_LEN).contains(&count) {
            warn!(count, "rejected queue length");
            return Err(SimError::OutOfRange {
                what: "queue length",
                got:  count as i64,
                min:  1,
                max:  MAX_QUEUE_LEN as i64,
            });
        }
        let queue = self
            .source
            .fill(count, self.base.track_limit)
            .into_iter()
            .map(|t| t.0 as i64)
            .collect();
        self.set_queue(queue)
    }

    pub fn apply_preset(&mut self, preset: QueuePreset) -> SimResult<()> {
        self.generate_queue(preset.count())
    }

    /// Set the execution-speed multiplier (clamped to `[0.5, 3.0]`).  Takes
    /// effect immediately if playing.
    pub fn set_execution_speed(&mut self, multiplier: f64) -> SimResult<()> {
        let (lo, hi) = PlaybackConfig::EXECUTION_SPEED_RANGE;
        self.playback.execution_speed = checked_multiplier("execution speed", multiplier, lo, hi)?;
        if self.playback_timer.is_some() {
            self.arm_playback_timer();
        }
        Ok(())
    }

    /// Set the arrival-rate multiplier (clamped to `[0.5, 5.0]`).  Takes
    /// effect immediately if arrivals are running.
    pub fn set_arrival_rate(&mut self, multiplier: f64) -> SimResult<()> {
        let (lo, hi) = PlaybackConfig::ARRIVAL_RATE_RANGE;
        self.playback.arrival_rate = checked_multiplier("arrival rate", multiplier, lo, hi)?;
        if self.arrival_timer.is_some() {
            self.arm_arrival_timer();
        }
        Ok(())
    }

    /// Flip dynamic mode and return the new setting.  Arrivals already added
    /// to the live queue stay until the next reset.
    pub fn toggle_dynamic_mode(&mut self) -> bool {
        self.playback.dynamic_mode = !self.playback.dynamic_mode;
        if self.state == PlaybackState::Playing {
            if self.playback.dynamic_mode {
                self.arm_arrival_timer();
            } else {
                self.cancel_arrival_timer();
            }
        }
        debug!(dynamic = self.playback.dynamic_mode, "dynamic mode toggled");
        self.playback.dynamic_mode
    }

    // ── Playback commands ─────────────────────────────────────────────────

    /// Start or resume playback.  From `finished`, playback restarts from a
    /// fresh reset.
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Playing  => return,
            PlaybackState::Finished => self.reset(),
            PlaybackState::Idle | PlaybackState::Paused => {}
        }
        if self.current_step >= self.max_step() {
            self.finish();
            return;
        }
        self.state = PlaybackState::Playing;
        self.arm_playback_timer();
        if self.playback.dynamic_mode {
            self.arm_arrival_timer();
        }
        debug!(step = self.current_step, "playing");
    }

    /// Pause playback.  Both timers are cancelled before this returns.
    pub fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        self.cancel_timers();
        self.state = PlaybackState::Paused;
        debug!(step = self.current_step, "paused");
    }

    /// Advance one step manually.  Ignored while playing or at the end.
    pub fn step(&mut self) {
        if self.state == PlaybackState::Playing || self.current_step >= self.max_step() {
            return;
        }
        self.current_step += 1;
        self.state = if self.current_step >= self.max_step() {
            PlaybackState::Finished
        } else {
            PlaybackState::Paused
        };
        trace!(step = self.current_step, "manual step");
    }

    /// Go back one step.  Ignored while playing or at step 0.  From
    /// `finished` the state becomes `paused`, since playback is no longer at
    /// the end and `play` should resume rather than restart.
    pub fn step_back(&mut self) {
        if self.state == PlaybackState::Playing || self.current_step == 0 {
            return;
        }
        self.current_step -= 1;
        self.state = PlaybackState::Paused;
        trace!(step = self.current_step, "manual step back");
    }

    /// Stop everything and rewind: timers cancelled, step 0, arrivals
    /// dropped, all policies recomputed from the configured queue.
    pub fn reset(&mut self) {
        self.cancel_timers();
        self.current_step = 0;
        self.last_arrived = None;
        self.live = self.base.clone();
        self.recompute_all();
        self.state = PlaybackState::Idle;
        debug!("reset");
    }

    // ── Time ──────────────────────────────────────────────────────────────

    /// Advance the virtual clock by `elapsed_ms`, firing due timers in order.
    pub fn advance<O: ControllerObserver>(&mut self, elapsed_ms: u64, observer: &mut O) {
        let deadline = self.clock.now() + elapsed_ms;
        while let Some((due, handle)) = self.timers.pop_due(deadline) {
            self.clock.advance_to(due);
            match handle.kind() {
                TimerKind::Playback => self.on_playback_tick(due, &handle, observer),
                TimerKind::Arrival  => self.on_arrival_tick(due, &handle, observer),
            }
        }
        self.clock.advance_to(deadline);
    }

    fn on_playback_tick<O: ControllerObserver>(
        &mut self,
        at:       SimTime,
        handle:   &TimerHandle,
        observer: &mut O,
    ) {
        let max_step = self.max_step();
        if self.current_step < max_step {
            self.current_step += 1;
            trace!(step = self.current_step, %at, "tick");
            observer.on_step(self.current_step, at);
        }
        if self.current_step >= max_step {
            self.finish();
            observer.on_finished(self.current_step, self.winner());
        } else {
            self.timers.rearm(handle, at);
        }
    }

    fn on_arrival_tick<O: ControllerObserver>(
        &mut self,
        at:       SimTime,
        handle:   &TimerHandle,
        observer: &mut O,
    ) {
        let track = self.source.next_track(self.live.track_limit);
        self.add_arrival(track);
        info!(%track, step = self.current_step, %at, "request arrived");
        observer.on_arrival(track, at);
        self.timers.rearm(handle, at);
    }

    /// Append `track` to the live queue and replan every policy from the
    /// current step, keeping the played prefix intact.
    pub(crate) fn add_arrival(&mut self, track: Track) {
        let track = track.min(self.live.track_limit);
        self.live.queue.push(track);
        let played = self.current_step;
        let live = &self.live;
        for (&key, result) in self.results.iter_mut() {
            *result = replan(key, result, played, &[track], live);
        }
        self.last_arrived = Some(track);
    }

    fn finish(&mut self) {
        self.cancel_timers();
        self.state = PlaybackState::Finished;
        info!(step = self.current_step, winner = ?self.winner(), "finished");
    }

    // ── Timers ────────────────────────────────────────────────────────────

    fn arm_playback_timer(&mut self) {
        if let Some(old) = self.playback_timer.take() {
            old.cancel();
            self.timers.purge_cancelled();
        }
        let interval = self.playback.step_interval_ms();
        self.playback_timer = Some(self.timers.arm(TimerKind::Playback, self.clock.now(), interval));
        debug!(interval_ms = interval, "playback timer armed");
    }

    fn arm_arrival_timer(&mut self) {
        self.cancel_arrival_timer();
        let interval = self.playback.arrival_interval_ms();
        self.arrival_timer = Some(self.timers.arm(TimerKind::Arrival, self.clock.now(), interval));
        debug!(interval_ms = interval, "arrival timer armed");
    }

    fn cancel_arrival_timer(&mut self) {
        if let Some(old) = self.arrival_timer.take() {
            old.cancel();
            self.timers.purge_cancelled();
        }
    }

    fn cancel_timers(&mut self) {
        for handle in [self.playback_timer.take(), self.arrival_timer.take()].into_iter().flatten() {
            handle.cancel();
        }
        self.timers.purge_cancelled();
        debug_assert!(self.timers.is_empty(), "timer survived cancellation");
    }

    // ── Recomputation ─────────────────────────────────────────────────────

    fn recompute_all(&mut self) {
        let live = &self.live;
        let mut results = BTreeMap::new();
        let mut missing = Vec::new();
        for key in PolicyKey::ALL {
            match self.cache.get(key, live) {
                Some(hit) => {
                    results.insert(key, hit.clone());
                }
                None => missing.push(key),
            }
        }

        for (key, result) in compute_policies(&missing, live) {
            self.cache.insert(key, live, result.clone());
            results.insert(key, result);
        }

        debug!(computed = missing.len(), "results recomputed");
        self.results = results;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Last index of the longest sequence across all policies.
    pub fn max_step(&self) -> usize {
        self.results.values().map(SchedulingResult::last_index).max().unwrap_or(0)
    }

    pub fn result(&self, policy: PolicyKey) -> Option<&SchedulingResult> {
        self.results.get(&policy)
    }

    pub fn results(&self) -> &BTreeMap<PolicyKey, SchedulingResult> {
        &self.results
    }

    /// The live queue (configured queue plus arrivals).
    pub fn queue(&self) -> &[Track] {
        &self.live.queue
    }

    pub fn last_arrived_track(&self) -> Option<Track> {
        self.last_arrived
    }

    pub fn playback_config(&self) -> &PlaybackConfig {
        &self.playback
    }

    pub fn disk_config(&self) -> &DiskConfig {
        &self.disk
    }

    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Number of armed timer entries.  0 whenever not playing.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Policy with the lowest total seek once finished; ties go to the
    /// earlier policy in [`PolicyKey::ALL`].
    pub fn winner(&self) -> Option<PolicyKey> {
        if self.state != PlaybackState::Finished {
            return None;
        }
        self.results
            .iter()
            .min_by_key(|(_, r)| r.seek_count)
            .map(|(&k, _)| k)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            playback_state:     self.state,
            current_step:       self.current_step,
            max_step:           self.max_step(),
            results_by_policy:  self.results.clone(),
            last_arrived_track: self.last_arrived,
            queue:              self.live.queue.clone(),
            dynamic_mode:       self.playback.dynamic_mode,
            execution_speed:    self.playback.execution_speed,
            arrival_rate:       self.playback.arrival_rate,
            now:                self.clock.now(),
            winner:             self.winner(),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Validate a speed multiplier and clamp it into `[lo, hi]`.
pub(crate) fn checked_multiplier(what: &str, value: f64, lo: f64, hi: f64) -> SimResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        warn!(what, value, "rejected multiplier");
        return Err(SimError::Config(format!("{what} must be a positive number, got {value}")));
    }
    Ok(value.clamp(lo, hi))
}

/// Compute `keys` for `workload`.  With the `parallel` feature the policies
/// run on Rayon's thread pool; output order always follows `keys`.
fn compute_policies(keys: &[PolicyKey], workload: &Workload) -> Vec<(PolicyKey, SchedulingResult)> {
    #[cfg(not(feature = "parallel"))]
    {
        ds_policy::compute_each(keys, workload)
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        keys.par_iter()
            .map(|&k| (k, k.policy().schedule(workload)))
            .collect()
    }
}
