/// Timeline clock over a fixed month horizon.
///
/// The clock never reads wall time itself; every method takes `now` in
/// seconds from the host frame loop, so the whole state machine is
/// deterministic under test. The continuous month value is derived as
/// `(now - epoch) * speed + offset_months`, and every way of setting the
/// month (drag release, external sync, reset) rebases `epoch`/`offset`
/// together so playback resumes without a jump.
#[derive(Clone, Debug)]
pub struct TimelineClock {
    horizon_months: u32,
    speed_months_per_sec: f64,
    dwell_secs: f64,
    epoch: f64,
    offset_months: f64,
    mode: ClockMode,
    dwell_started: Option<f64>,
    last_published: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ClockMode {
    Running,
    ManualDrag { value: f64 },
    Paused { value: f64, since: f64 },
}

impl TimelineClock {
    pub fn new(horizon_months: u32, speed_months_per_sec: f64, dwell_secs: f64, now: f64) -> Self {
        Self {
            horizon_months: horizon_months.max(1),
            speed_months_per_sec: speed_months_per_sec.max(0.0),
            dwell_secs: dwell_secs.max(0.0),
            epoch: now,
            offset_months: 0.0,
            mode: ClockMode::Running,
            dwell_started: None,
            last_published: None,
        }
    }

    pub fn horizon_months(&self) -> u32 {
        self.horizon_months
    }

    pub fn last_month(&self) -> u32 {
        self.horizon_months - 1
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, ClockMode::ManualDrag { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.mode, ClockMode::Paused { .. })
    }

    /// Continuous month value, clamped to `[0, horizon - 1]`.
    pub fn value(&self, now: f64) -> f64 {
        let raw = match self.mode {
            ClockMode::Running => (now - self.epoch) * self.speed_months_per_sec + self.offset_months,
            ClockMode::ManualDrag { value } | ClockMode::Paused { value, .. } => value,
        };
        raw.clamp(0.0, self.last_month() as f64)
    }

    /// Integer display month in `[0, horizon - 1]`.
    pub fn display_month(&self, now: f64) -> u32 {
        (self.value(now).floor() as u32).min(self.last_month())
    }

    pub fn fraction(&self, now: f64) -> f32 {
        if self.horizon_months <= 1 {
            return 0.0;
        }
        (self.value(now) / self.last_month() as f64) as f32
    }

    /// Per-frame advance. Handles the end-of-horizon dwell; returns true on
    /// the frame where the dwell expires and the global reset fires, at which
    /// point the caller must revert all point lifecycle state.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.mode != ClockMode::Running {
            return false;
        }

        let raw = (now - self.epoch) * self.speed_months_per_sec + self.offset_months;
        if raw < self.last_month() as f64 {
            self.dwell_started = None;
            return false;
        }

        let dwell_started = *self.dwell_started.get_or_insert(now);
        if now - dwell_started < self.dwell_secs {
            return false;
        }

        self.offset_months = 0.0;
        self.epoch = now;
        self.dwell_started = None;
        true
    }

    pub fn begin_drag(&mut self, now: f64) {
        let value = self.value(now);
        self.mode = ClockMode::ManualDrag { value };
        self.dwell_started = None;
    }

    /// Maps a normalized track position to a month while a drag is active.
    /// Out-of-range input clamps silently.
    pub fn drag_to_fraction(&mut self, fraction: f32) {
        if let ClockMode::ManualDrag { value } = &mut self.mode {
            let fraction = if fraction.is_finite() {
                fraction.clamp(0.0, 1.0) as f64
            } else {
                0.0
            };
            *value = (fraction * (self.horizon_months - 1) as f64).round();
        }
    }

    pub fn end_drag(&mut self, now: f64) {
        if let ClockMode::ManualDrag { value } = self.mode {
            self.rebase(value, now);
            self.mode = ClockMode::Running;
        }
    }

    pub fn pause(&mut self, now: f64) {
        if self.mode == ClockMode::Running {
            self.mode = ClockMode::Paused {
                value: self.value(now),
                since: now,
            };
        }
    }

    /// Shifts the epoch forward by the paused wall-clock span, so elapsed
    /// time accounting excludes the pause like a stopped stopwatch.
    pub fn resume(&mut self, now: f64) {
        if let ClockMode::Paused { since, .. } = self.mode {
            let paused_for = now - since;
            self.epoch += paused_for;
            if let Some(dwell_started) = &mut self.dwell_started {
                *dwell_started += paused_for;
            }
            self.mode = ClockMode::Running;
        }
    }

    pub fn toggle_pause(&mut self, now: f64) {
        if self.is_paused() {
            self.resume(now);
        } else {
            self.pause(now);
        }
    }

    /// Applies a month received from another process, exactly like a drag
    /// release. Ignored while local manual control (drag or pause) is active,
    /// and for non-finite or out-of-range values. Returns whether the value
    /// was applied.
    pub fn apply_external(&mut self, month: f64, now: f64) -> bool {
        if self.mode != ClockMode::Running {
            return false;
        }
        if !month.is_finite() || month < 0.0 || month >= self.horizon_months as f64 {
            return false;
        }

        self.rebase(month, now);
        true
    }

    /// Month to broadcast this frame, if any: publishes only on integer month
    /// changes, never twice in a row for the same value, and never mid-drag.
    pub fn take_publication(&mut self, now: f64) -> Option<u32> {
        if self.is_dragging() {
            return None;
        }

        let month = self.display_month(now);
        if self.last_published == Some(month) {
            return None;
        }
        self.last_published = Some(month);
        Some(month)
    }

    fn rebase(&mut self, month: f64, now: f64) {
        self.offset_months = month;
        self.epoch = now;
        self.dwell_started = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HORIZON: u32 = 348;
    const SPEED: f64 = 2.0;
    const DWELL: f64 = 70.0;

    fn clock() -> TimelineClock {
        TimelineClock::new(HORIZON, SPEED, DWELL, 0.0)
    }

    #[test]
    fn month_is_monotonic_while_running() {
        let mut clock = clock();
        let mut previous = 0;
        for frame in 0..2000 {
            let now = frame as f64 / 60.0;
            clock.tick(now);
            let month = clock.display_month(now);
            assert!(month >= previous);
            previous = month;
        }
    }

    #[test]
    fn scrub_round_trips_within_one_month() {
        for fraction in [0.0_f32, 0.1, 0.37, 0.5, 0.73, 0.99, 1.0] {
            let mut clock = clock();
            clock.begin_drag(3.0);
            clock.drag_to_fraction(fraction);
            clock.end_drag(3.0);

            let recovered = clock.fraction(3.0);
            assert!((recovered - fraction).abs() <= 1.0 / (HORIZON - 1) as f32);
        }
    }

    #[test]
    fn out_of_range_scrub_clamps() {
        let mut clock = clock();
        clock.begin_drag(0.0);
        clock.drag_to_fraction(4.2);
        assert_eq!(clock.display_month(0.0), HORIZON - 1);
        clock.drag_to_fraction(-1.0);
        assert_eq!(clock.display_month(0.0), 0);
        clock.drag_to_fraction(f32::NAN);
        assert_eq!(clock.display_month(0.0), 0);
    }

    #[test]
    fn drag_release_resumes_without_a_jump() {
        let mut clock = clock();
        clock.begin_drag(10.0);
        clock.drag_to_fraction(0.5);
        let dropped = clock.value(10.0);
        clock.end_drag(10.0);

        assert!((clock.value(10.0) - dropped).abs() < 1e-9);
        assert!((clock.value(11.0) - (dropped + SPEED)).abs() < 1e-9);
    }

    #[test]
    fn horizon_end_dwells_then_resets() {
        let mut clock = clock();
        clock.begin_drag(100.0);
        clock.drag_to_fraction(1.0);
        clock.end_drag(100.0);

        assert!(!clock.tick(100.0));
        assert_eq!(clock.display_month(100.0), HORIZON - 1);

        // Held at the last month for the whole dwell.
        assert!(!clock.tick(100.0 + DWELL - 1.0));
        assert_eq!(clock.display_month(100.0 + DWELL - 1.0), HORIZON - 1);

        let reset_at = 100.0 + DWELL + 0.1;
        assert!(clock.tick(reset_at));
        assert_eq!(clock.display_month(reset_at), 0);
        assert_eq!(clock.display_month(reset_at + 1.0), 2);
    }

    #[test]
    fn external_month_is_ignored_mid_drag() {
        let mut clock = clock();
        clock.begin_drag(5.0);
        clock.drag_to_fraction(0.25);
        let before = clock.display_month(5.0);

        assert!(!clock.apply_external(300.0, 5.0));
        assert_eq!(clock.display_month(5.0), before);
    }

    #[test]
    fn external_month_is_ignored_while_paused() {
        let mut clock = clock();
        clock.pause(4.0);
        assert!(!clock.apply_external(120.0, 4.0));
        assert_eq!(clock.display_month(9.0), 8);
    }

    #[test]
    fn invalid_external_months_are_discarded() {
        let mut clock = clock();
        assert!(!clock.apply_external(f64::NAN, 1.0));
        assert!(!clock.apply_external(f64::INFINITY, 1.0));
        assert!(!clock.apply_external(-1.0, 1.0));
        assert!(!clock.apply_external(HORIZON as f64, 1.0));
        assert!(clock.apply_external(120.0, 1.0));
        assert_eq!(clock.display_month(1.0), 120);
    }

    #[test]
    fn pause_excludes_the_paused_span() {
        let mut clock = clock();
        assert_eq!(clock.display_month(10.0), 20);

        clock.pause(10.0);
        assert_eq!(clock.display_month(25.0), 20);

        clock.resume(25.0);
        assert_eq!(clock.display_month(25.0), 20);
        assert_eq!(clock.display_month(26.0), 22);
    }

    #[test]
    fn publication_is_deduplicated_and_suppressed_mid_drag() {
        let mut clock = clock();
        assert_eq!(clock.take_publication(0.1), Some(0));
        assert_eq!(clock.take_publication(0.2), None);
        assert_eq!(clock.take_publication(0.6), Some(1));

        clock.begin_drag(0.7);
        clock.drag_to_fraction(0.5);
        assert_eq!(clock.take_publication(0.7), None);

        clock.end_drag(0.8);
        assert_eq!(clock.take_publication(0.8), Some(174));
    }
}
