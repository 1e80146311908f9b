use super::points::SitePoint;

const FADE_FLOOR: f32 = 0.35;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifecycleState {
    Orbiting,
    Falling,
    Settled,
}

impl SitePoint {
    pub fn lifecycle_state(&self) -> LifecycleState {
        if !self.has_fallen {
            LifecycleState::Orbiting
        } else if self.fall_ease < 1.0 {
            LifecycleState::Falling
        } else {
            LifecycleState::Settled
        }
    }
}

pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Fade applied while falling; settled points hold the floor value so they
/// stay dimmer than live ones but never vanish.
pub fn fade_factor(t_norm: f32) -> f32 {
    if t_norm >= 1.0 {
        FADE_FLOOR
    } else {
        (1.0 - 0.65 * t_norm.clamp(0.0, 1.0)).max(FADE_FLOOR)
    }
}

/// Per-tick lifecycle pass. `clock_value` is the continuous month value;
/// `skip` is the index of a click-frozen point that is exempt from
/// lifecycle-driven movement while selected.
pub fn update_lifecycle(
    points: &mut [SitePoint],
    clock_value: f64,
    horizon_months: u32,
    fall_duration_months: f64,
    skip: Option<usize>,
) {
    let fall_duration_months = fall_duration_months.max(f64::EPSILON);

    for (index, point) in points.iter_mut().enumerate() {
        if skip == Some(index) {
            continue;
        }

        if !point.has_fallen
            && point.pile_slot.is_some()
            && let Some(month) = point.last_seen_month
            && month < horizon_months
            && clock_value >= month as f64
        {
            point.has_fallen = true;
            point.fall_start = Some(clock_value);
        }

        if point.has_fallen {
            let start = point.fall_start.unwrap_or(clock_value);
            let elapsed = (clock_value - start).max(0.0);
            let t_norm = (elapsed / fall_duration_months).min(1.0) as f32;
            point.fall_ease = ease_out_cubic(t_norm);
            point.fall_fade = fade_factor(t_norm);
        } else {
            point.fall_ease = 0.0;
            point.fall_fade = 1.0;
        }
    }
}

/// Global reset at the end of a horizon cycle: every point returns to
/// orbiting. This is the only place `has_fallen` goes back to false.
pub fn reset_lifecycle(points: &mut [SitePoint]) {
    for point in points {
        point.has_fallen = false;
        point.fall_start = None;
        point.fall_ease = 0.0;
        point.fall_fade = 1.0;
    }
}
