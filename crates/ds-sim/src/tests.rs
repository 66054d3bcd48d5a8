//! Integration tests for ds-sim.

use ds_core::{DiskConfig, Direction, DsError, PlaybackConfig, ScriptedSource, SimTime, Track};
use ds_policy::PolicyKey;

use crate::{
    Controller, ControllerBuilder, ControllerObserver, NoopObserver, PlaybackState, QueuePreset,
    SimError,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Default disk (head 50, seven requests, limit 199).
///
/// Sequence lengths: FCFS 7, SSTF 7, SCAN 8, C-SCAN 9 hops.
/// Seeks: FCFS 642, SSTF 208, SCAN 332, C-SCAN 391.
fn controller() -> Controller {
    ControllerBuilder::new(DiskConfig::default()).build().unwrap()
}

fn dynamic_controller(script: &[u32]) -> Controller {
    ControllerBuilder::new(DiskConfig::default())
        .playback(PlaybackConfig { dynamic_mode: true, ..Default::default() })
        .source(ScriptedSource::new(script.iter().copied()))
        .build()
        .unwrap()
}

#[derive(Default)]
struct Recorder {
    steps:    Vec<(usize, SimTime)>,
    arrivals: Vec<(Track, SimTime)>,
    finished: Vec<(usize, Option<PolicyKey>)>,
}

impl ControllerObserver for Recorder {
    fn on_step(&mut self, step: usize, at: SimTime) {
        self.steps.push((step, at));
    }

    fn on_arrival(&mut self, track: Track, at: SimTime) {
        self.arrivals.push((track, at));
    }

    fn on_finished(&mut self, step: usize, winner: Option<PolicyKey>) {
        self.finished.push((step, winner));
    }
}

// ── ControllerBuilder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_idle_with_all_policies() {
        let ctl = controller();
        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_eq!(ctl.current_step(), 0);
        assert_eq!(ctl.results().len(), 4);
        assert_eq!(ctl.max_step(), 9);
        assert_eq!(ctl.pending_timers(), 0);
        assert_eq!(ctl.queue().len(), 7);
    }

    #[test]
    fn seeks_match_hand_computed_values() {
        let ctl = controller();
        let seek = |k| ctl.result(k).unwrap().seek_count;
        assert_eq!(seek(PolicyKey::Fcfs), 642);
        assert_eq!(seek(PolicyKey::Sstf), 208);
        assert_eq!(seek(PolicyKey::Scan), 332);
        assert_eq!(seek(PolicyKey::CScan), 391);
    }

    #[test]
    fn rejects_track_limit_out_of_range() {
        for limit in [0, -5, 10_000] {
            let disk = DiskConfig { track_limit: limit, ..Default::default() };
            let err = ControllerBuilder::new(disk).build().err().unwrap();
            assert!(matches!(err, SimError::OutOfRange { what: "track limit", .. }), "{err}");
        }
    }

    #[test]
    fn accepts_track_limit_bounds() {
        for limit in [1, 9_999] {
            let disk = DiskConfig { track_limit: limit, ..Default::default() };
            assert!(ControllerBuilder::new(disk).build().is_ok());
        }
    }

    #[test]
    fn clamps_speeds_and_rejects_nan() {
        let ctl = ControllerBuilder::new(DiskConfig::default())
            .playback(PlaybackConfig { execution_speed: 10.0, arrival_rate: 0.1, ..Default::default() })
            .build()
            .unwrap();
        assert_eq!(ctl.playback_config().execution_speed, 3.0);
        assert_eq!(ctl.playback_config().arrival_rate, 0.5);

        let bad = ControllerBuilder::new(DiskConfig::default())
            .playback(PlaybackConfig { execution_speed: f64::NAN, ..Default::default() })
            .build();
        assert!(matches!(bad, Err(SimError::Config(_))));
    }

    #[test]
    fn out_of_range_tracks_are_clamped() {
        let disk = DiskConfig { head: -10, queue: vec![250, 5], ..Default::default() };
        let ctl = ControllerBuilder::new(disk).build().unwrap();
        assert_eq!(ctl.queue(), &[Track(199), Track(5)]);
        assert_eq!(ctl.result(PolicyKey::Fcfs).unwrap().head(), Track(0));
    }
}

// ── Playback state machine ────────────────────────────────────────────────────

#[cfg(test)]
mod playback {
    use super::*;

    #[test]
    fn ticks_once_per_interval() {
        let mut ctl = controller();
        ctl.play();
        assert_eq!(ctl.state(), PlaybackState::Playing);
        assert_eq!(ctl.pending_timers(), 1);

        ctl.advance(999, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 0);
        ctl.advance(1, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 1);
        ctl.advance(2_000, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 3);
        assert_eq!(ctl.now(), SimTime(3_000));
    }

    #[test]
    fn finishes_at_longest_sequence() {
        let mut ctl = controller();
        let mut rec = Recorder::default();
        ctl.play();
        ctl.advance(60_000, &mut rec);

        assert_eq!(ctl.state(), PlaybackState::Finished);
        assert_eq!(ctl.current_step(), 9);
        assert_eq!(ctl.pending_timers(), 0);
        assert_eq!(rec.steps.len(), 9);
        assert_eq!(rec.steps[8], (9, SimTime(9_000)));
        assert_eq!(rec.finished, vec![(9, Some(PolicyKey::Sstf))]);
    }

    #[test]
    fn pause_stops_ticks() {
        let mut ctl = controller();
        ctl.play();
        ctl.advance(1_500, &mut NoopObserver);
        ctl.pause();
        assert_eq!(ctl.state(), PlaybackState::Paused);
        assert_eq!(ctl.pending_timers(), 0);

        ctl.advance(10_000, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 1);

        ctl.play();
        ctl.advance(1_000, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 2);
    }

    #[test]
    fn pause_when_not_playing_is_ignored() {
        let mut ctl = controller();
        ctl.pause();
        assert_eq!(ctl.state(), PlaybackState::Idle);
    }

    #[test]
    fn play_twice_keeps_one_timer() {
        let mut ctl = controller();
        ctl.play();
        ctl.play();
        assert_eq!(ctl.pending_timers(), 1);
        ctl.advance(1_000, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 1);
    }

    #[test]
    fn manual_step_and_step_back() {
        let mut ctl = controller();
        ctl.step_back();
        assert_eq!(ctl.current_step(), 0);
        assert_eq!(ctl.state(), PlaybackState::Idle);

        ctl.step();
        assert_eq!(ctl.current_step(), 1);
        assert_eq!(ctl.state(), PlaybackState::Paused);

        ctl.step_back();
        assert_eq!(ctl.current_step(), 0);
        assert_eq!(ctl.state(), PlaybackState::Paused);

        for _ in 0..20 {
            ctl.step();
        }
        assert_eq!(ctl.current_step(), 9);
        assert_eq!(ctl.state(), PlaybackState::Finished);
    }

    #[test]
    fn step_back_from_finished_pauses_and_resumes() {
        let mut ctl = controller();
        ctl.play();
        ctl.advance(60_000, &mut NoopObserver);
        assert_eq!(ctl.state(), PlaybackState::Finished);

        ctl.step_back();
        assert_eq!(ctl.current_step(), 8);
        assert_eq!(ctl.state(), PlaybackState::Paused);
        assert_eq!(ctl.winner(), None);

        ctl.play();
        assert_eq!(ctl.current_step(), 8);
        ctl.advance(1_000, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 9);
        assert_eq!(ctl.state(), PlaybackState::Finished);
    }

    #[test]
    fn manual_step_ignored_while_playing() {
        let mut ctl = controller();
        ctl.play();
        ctl.step();
        ctl.step_back();
        assert_eq!(ctl.current_step(), 0);
        assert_eq!(ctl.state(), PlaybackState::Playing);
    }

    #[test]
    fn play_from_finished_restarts() {
        let mut ctl = controller();
        ctl.play();
        ctl.advance(60_000, &mut NoopObserver);
        assert_eq!(ctl.state(), PlaybackState::Finished);

        ctl.play();
        assert_eq!(ctl.state(), PlaybackState::Playing);
        assert_eq!(ctl.current_step(), 0);
    }

    #[test]
    fn empty_queue_finishes_immediately() {
        let mut ctl = controller();
        ctl.set_queue(Vec::new()).unwrap();
        assert_eq!(ctl.max_step(), 0);

        ctl.play();
        assert_eq!(ctl.state(), PlaybackState::Finished);
        assert_eq!(ctl.pending_timers(), 0);
        // All seeks are 0; ties go to the first policy.
        assert_eq!(ctl.winner(), Some(PolicyKey::Fcfs));
    }

    #[test]
    fn winner_only_when_finished() {
        let mut ctl = controller();
        assert_eq!(ctl.winner(), None);
        ctl.play();
        ctl.advance(4_000, &mut NoopObserver);
        assert_eq!(ctl.winner(), None);
        ctl.advance(60_000, &mut NoopObserver);
        assert_eq!(ctl.winner(), Some(PolicyKey::Sstf));
    }

    #[test]
    fn reconfigure_while_playing_resets() {
        let mut ctl = controller();
        ctl.play();
        ctl.advance(2_000, &mut NoopObserver);
        ctl.set_direction(Direction::Left).unwrap();

        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_eq!(ctl.current_step(), 0);
        assert_eq!(ctl.pending_timers(), 0);
        assert_eq!(ctl.result(PolicyKey::Scan).unwrap().sequence[1], Track(43));
    }

    #[test]
    fn direction_text_is_parsed() {
        let mut ctl = controller();
        ctl.set_direction_text(" L ").unwrap();
        assert_eq!(ctl.disk_config().direction, Direction::Left);

        let err = ctl.set_direction_text("up").unwrap_err();
        assert!(matches!(err, SimError::Core(DsError::Parse(_))), "{err}");
        assert_eq!(ctl.disk_config().direction, Direction::Left);
    }

    #[test]
    fn invalid_reconfigure_keeps_previous_state() {
        let mut ctl = controller();
        ctl.step();
        assert!(ctl.set_track_limit(0).is_err());
        assert_eq!(ctl.current_step(), 1);
        assert_eq!(ctl.disk_config().track_limit, 199);
    }
}

// ── Speed and rate ────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use super::*;

    #[test]
    fn speed_change_rearms_immediately() {
        let mut ctl = controller();
        ctl.play();
        ctl.set_execution_speed(2.0).unwrap();
        assert_eq!(ctl.pending_timers(), 1);

        ctl.advance(500, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 1);
        ctl.advance(1_000, &mut NoopObserver);
        assert_eq!(ctl.current_step(), 3);
    }

    #[test]
    fn speed_change_while_paused_arms_nothing() {
        let mut ctl = controller();
        ctl.set_execution_speed(3.0).unwrap();
        assert_eq!(ctl.pending_timers(), 0);
        assert_eq!(ctl.playback_config().step_interval_ms(), 333);
    }

    #[test]
    fn rejects_non_positive_multipliers() {
        let mut ctl = controller();
        assert!(ctl.set_execution_speed(0.0).is_err());
        assert!(ctl.set_execution_speed(f64::INFINITY).is_err());
        assert!(ctl.set_arrival_rate(-1.0).is_err());
        assert_eq!(ctl.playback_config().execution_speed, 1.0);
        assert_eq!(ctl.playback_config().arrival_rate, 1.0);
    }

    #[test]
    fn clamps_into_range() {
        let mut ctl = controller();
        ctl.set_execution_speed(0.1).unwrap();
        ctl.set_arrival_rate(50.0).unwrap();
        assert_eq!(ctl.playback_config().execution_speed, 0.5);
        assert_eq!(ctl.playback_config().arrival_rate, 5.0);
        assert_eq!(ctl.playback_config().arrival_interval_ms(), 600);
    }
}

// ── Dynamic arrivals ──────────────────────────────────────────────────────────

#[cfg(test)]
mod dynamic {
    use super::*;

    #[test]
    fn arrival_replans_and_keeps_prefix() {
        let mut ctl = dynamic_controller(&[100]);
        let mut rec = Recorder::default();
        ctl.play();
        assert_eq!(ctl.pending_timers(), 2);

        ctl.advance(2_000, &mut rec);
        assert_eq!(ctl.current_step(), 2);
        let before = ctl.results().clone();

        ctl.advance(1_000, &mut rec);
        assert_eq!(rec.arrivals, vec![(Track(100), SimTime(3_000))]);
        assert_eq!(ctl.last_arrived_track(), Some(Track(100)));
        assert_eq!(ctl.queue().len(), 8);

        for (key, old) in &before {
            let new = ctl.result(*key).unwrap();
            assert_eq!(new.sequence[..=2], old.sequence[..=2], "{key} prefix changed");
            assert_eq!(new.request_count, 8);
            assert!(new.sequence[3..].contains(&Track(100)), "{key} never visits arrival");
        }
    }

    #[test]
    fn exhausted_policy_resumes_after_current_step() {
        // Hop counts: FCFS 1, SCAN 2, C-SCAN 3.  The arrival lands at step 2,
        // after FCFS has already rested on 40 for a frame.
        let disk = DiskConfig { head: 50, queue: vec![40], ..Default::default() };
        let mut ctl = ControllerBuilder::new(disk)
            .playback(PlaybackConfig { dynamic_mode: true, ..Default::default() })
            .source(ScriptedSource::new([150]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        ctl.play();
        ctl.advance(2_000, &mut rec);
        assert_eq!(ctl.current_step(), 2);
        let shown = ctl.snapshot().frame(PolicyKey::Fcfs).unwrap().position;
        assert_eq!(shown, Track(40));

        ctl.advance(1_000, &mut rec);
        assert_eq!(rec.arrivals, vec![(Track(150), SimTime(3_000))]);
        let fcfs = ctl.result(PolicyKey::Fcfs).unwrap();
        assert_eq!(fcfs.sequence, vec![Track(50), Track(40), Track(40), Track(150)]);
        assert_eq!(fcfs.position_at(2), shown);
        assert_eq!(fcfs.seek_count, 10 + 110);

        // The new hop is shown by its own tick.
        assert_eq!(rec.steps.last(), Some(&(3, SimTime(3_000))));
        assert_eq!(ctl.snapshot().frame(PolicyKey::Fcfs).unwrap().position, Track(150));
        assert_eq!(ctl.state(), PlaybackState::Playing);
    }

    #[test]
    fn fcfs_appends_arrival_last() {
        let mut ctl = dynamic_controller(&[100]);
        ctl.play();
        ctl.advance(3_000, &mut NoopObserver);
        let fcfs = ctl.result(PolicyKey::Fcfs).unwrap();
        assert_eq!(fcfs.sequence.last(), Some(&Track(100)));
        assert_eq!(fcfs.last_index(), 8);
    }

    #[test]
    fn arrivals_stop_when_finished() {
        let mut ctl = dynamic_controller(&[7]);
        let mut rec = Recorder::default();
        ctl.play();
        ctl.advance(600_000, &mut rec);

        assert_eq!(ctl.state(), PlaybackState::Finished);
        assert_eq!(ctl.pending_timers(), 0);
        assert_eq!(rec.finished.len(), 1);
        let arrivals = rec.arrivals.len();

        ctl.advance(600_000, &mut rec);
        assert_eq!(rec.arrivals.len(), arrivals);
    }

    #[test]
    fn toggle_arms_and_cancels_arrival_timer() {
        let mut ctl = controller();
        assert!(ctl.toggle_dynamic_mode());
        assert_eq!(ctl.pending_timers(), 0);

        ctl.play();
        assert_eq!(ctl.pending_timers(), 2);
        assert!(!ctl.toggle_dynamic_mode());
        assert_eq!(ctl.pending_timers(), 1);

        ctl.advance(5_000, &mut NoopObserver);
        assert_eq!(ctl.queue().len(), 7);
    }

    #[test]
    fn reset_drops_arrivals_and_reuses_cache() {
        let mut ctl = dynamic_controller(&[100, 120]);
        let fresh = ctl.results().clone();
        ctl.play();
        ctl.advance(7_000, &mut NoopObserver);
        assert_eq!(ctl.queue().len(), 9);

        let (hits, _) = ctl.cache.stats();
        ctl.reset();
        assert_eq!(ctl.state(), PlaybackState::Idle);
        assert_eq!(ctl.current_step(), 0);
        assert_eq!(ctl.queue().len(), 7);
        assert_eq!(ctl.last_arrived_track(), None);
        assert_eq!(ctl.results(), &fresh);
        assert_eq!(ctl.cache.stats().0, hits + 4);
    }
}

// ── Queue generation ──────────────────────────────────────────────────────────

#[cfg(test)]
mod generation {
    use super::*;

    #[test]
    fn generate_queue_draws_from_source() {
        let mut ctl = ControllerBuilder::new(DiskConfig::default())
            .source(ScriptedSource::new([10, 20, 300]))
            .build()
            .unwrap();
        ctl.generate_queue(5).unwrap();
        assert_eq!(
            ctl.queue(),
            &[Track(10), Track(20), Track(199), Track(10), Track(20)]
        );
    }

    #[test]
    fn generate_queue_bounds() {
        let mut ctl = controller();
        assert!(matches!(ctl.generate_queue(0), Err(SimError::OutOfRange { .. })));
        assert!(ctl.generate_queue(1_001).is_err());
        assert!(ctl.generate_queue(1_000).is_ok());
        assert_eq!(ctl.queue().len(), 1_000);
    }

    #[test]
    fn presets_set_queue_length() {
        let mut ctl = controller();
        for preset in QueuePreset::FIXED {
            ctl.apply_preset(preset).unwrap();
            assert_eq!(ctl.queue().len(), preset.count());
            assert!(ctl.queue().iter().all(|&t| t <= Track(199)));
        }
        ctl.apply_preset(QueuePreset::Custom(3)).unwrap();
        assert_eq!(ctl.queue().len(), 3);
    }

    #[test]
    fn same_seed_same_queue() {
        let build = || {
            let mut ctl = ControllerBuilder::new(DiskConfig::default())
                .playback(PlaybackConfig { seed: 7, ..Default::default() })
                .build()
                .unwrap();
            ctl.apply_preset(QueuePreset::Long).unwrap();
            ctl.queue().to_vec()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn queue_text_parses_leniently() {
        let mut ctl = controller();
        ctl.set_queue_text("98, abc, 37,").unwrap();
        assert_eq!(ctl.queue(), &[Track(98), Track(0), Track(37)]);
    }

    #[test]
    fn preset_labels() {
        assert_eq!(QueuePreset::VeryLong.to_string(), "Very Long (50)");
        assert_eq!(QueuePreset::Custom(12).to_string(), "Custom (12)");
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot {
    use super::*;

    #[test]
    fn frames_at_start() {
        let snap = controller().snapshot();
        assert_eq!(snap.playback_state, PlaybackState::Idle);
        assert_eq!(snap.frames().count(), 4);
        for frame in snap.frames() {
            assert_eq!(frame.visited, &[Track(50)]);
            assert_eq!(frame.explanation, None);
            assert_eq!(frame.progress.seek_so_far, 0);
            assert!(!frame.done);
        }
    }

    #[test]
    fn shorter_sequences_rest_on_last_index() {
        let mut ctl = controller();
        for _ in 0..8 {
            ctl.step();
        }
        let snap = ctl.snapshot();

        let fcfs = snap.frame(PolicyKey::Fcfs).unwrap();
        assert!(fcfs.done);
        assert_eq!(fcfs.visited.len(), 8);
        assert_eq!(fcfs.position, Track(190));
        assert_eq!(fcfs.progress.seek_so_far, 642);

        let scan = snap.frame(PolicyKey::Scan).unwrap();
        assert!(scan.done);
        assert_eq!(scan.position, Track(16));

        let cscan = snap.frame(PolicyKey::CScan).unwrap();
        assert!(!cscan.done);
        assert_eq!(cscan.position, Track(24));
        assert_eq!(snap.winner, None);
    }

    #[test]
    fn snapshot_reports_winner_when_finished() {
        let mut ctl = controller();
        ctl.play();
        ctl.advance(60_000, &mut NoopObserver);
        let snap = ctl.snapshot();
        assert_eq!(snap.playback_state, PlaybackState::Finished);
        assert_eq!(snap.current_step, snap.max_step);
        assert_eq!(snap.winner, Some(PolicyKey::Sstf));
    }
}

// ── TimerQueue ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod timers {
    use crate::{TimerKind, TimerQueue};
    use ds_core::SimTime;

    #[test]
    fn fires_in_time_order() {
        let mut q = TimerQueue::new();
        q.arm(TimerKind::Arrival, SimTime::ZERO, 3_000);
        q.arm(TimerKind::Playback, SimTime::ZERO, 1_000);
        assert_eq!(q.next_due(), Some(SimTime(1_000)));

        assert!(q.pop_due(SimTime(999)).is_none());
        let (at, h) = q.pop_due(SimTime(5_000)).unwrap();
        assert_eq!((at, h.kind()), (SimTime(1_000), TimerKind::Playback));
        let (at, h) = q.pop_due(SimTime(5_000)).unwrap();
        assert_eq!((at, h.kind()), (SimTime(3_000), TimerKind::Arrival));
        assert!(q.is_empty());
    }

    #[test]
    fn same_instant_fires_in_push_order() {
        let mut q = TimerQueue::new();
        q.arm(TimerKind::Arrival, SimTime::ZERO, 1_000);
        q.arm(TimerKind::Playback, SimTime::ZERO, 1_000);
        assert_eq!(q.pop_due(SimTime(1_000)).unwrap().1.kind(), TimerKind::Arrival);
        assert_eq!(q.pop_due(SimTime(1_000)).unwrap().1.kind(), TimerKind::Playback);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let h = q.arm(TimerKind::Playback, SimTime::ZERO, 10);
        h.cancel();
        assert!(h.is_cancelled());
        assert!(q.pop_due(SimTime(1_000)).is_none());

        q.rearm(&h, SimTime(10));
        assert!(q.is_empty());
    }

    #[test]
    fn purge_drops_cancelled_entries() {
        let mut q = TimerQueue::new();
        let a = q.arm(TimerKind::Playback, SimTime::ZERO, 10);
        q.arm(TimerKind::Arrival, SimTime::ZERO, 10);
        a.cancel();
        assert_eq!(q.len(), 2);
        q.purge_cancelled();
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn zero_interval_is_one_ms() {
        let mut q = TimerQueue::new();
        let h = q.arm(TimerKind::Playback, SimTime(5), 0);
        assert_eq!(h.interval_ms(), 1);
        assert_eq!(q.next_due(), Some(SimTime(6)));
    }

    #[test]
    fn rearm_schedules_from_fire_time() {
        let mut q = TimerQueue::new();
        q.arm(TimerKind::Playback, SimTime::ZERO, 250);
        let (at, h) = q.pop_due(SimTime(250)).unwrap();
        q.rearm(&h, at);
        assert_eq!(q.next_due(), Some(SimTime(500)));
    }
}

// ── ResultCache ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use ds_core::DiskConfig;
    use ds_policy::PolicyKey;

    use crate::ResultCache;

    #[test]
    fn miss_then_hit() {
        let mut cache = ResultCache::new();
        let w = DiskConfig::default().workload();
        assert!(cache.get(PolicyKey::Scan, &w).is_none());

        let r = PolicyKey::Scan.policy().schedule(&w);
        cache.insert(PolicyKey::Scan, &w, r.clone());
        assert_eq!(cache.get(PolicyKey::Scan, &w), Some(&r));
        assert!(cache.get(PolicyKey::CScan, &w).is_none());
        assert_eq!(cache.stats(), (1, 2));
        assert_eq!(cache.len(), 1);
    }
}
