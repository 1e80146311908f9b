use rand::Rng;

use crate::data::SiteEntry;

use super::pile::PileSlot;

/// World-space orbit sphere radius. The scene maps world units to screen
/// pixels at draw time, so this stays fixed regardless of window size.
pub const ORBIT_RADIUS: f32 = 310.0;

/// Points are sampled on a shell between 0.6R and 1.0R rather than a filled
/// ball, which keeps the sphere visually hollow.
pub const SHELL_INNER: f32 = 0.6;
pub const SHELL_BAND: f32 = 0.4;

const DEPTH_OPACITY_RANGE: (f32, f32) = (0.15, 0.8);
const DEPTH_SIZE_RANGE: (f32, f32) = (1.5, 5.0);
const FLICKER_CHANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Flicker {
    pub phase: f32,
    pub period_secs: f32,
}

#[derive(Clone, Debug)]
pub struct SitePoint {
    pub id: String,
    pub title: String,
    pub category: String,
    pub sub_type: String,
    pub first_seen_month: Option<u32>,
    pub last_seen_month: Option<u32>,

    /// Orbit anchor, fixed for the point's lifetime.
    pub seed: Vec3,
    pub depth_opacity: f32,
    pub depth_size: f32,
    pub flicker: Option<Flicker>,
    pub pile_slot: Option<PileSlot>,

    // Mutable lifecycle state, written by the lifecycle pass each tick.
    pub has_fallen: bool,
    pub fall_start: Option<f64>,
    pub fall_ease: f32,
    pub fall_fade: f32,

    /// Transient draw position, recomputed every frame.
    pub draw: Vec3,
}

fn lerp_depth(z: f32, radius: f32, range: (f32, f32)) -> f32 {
    let t = ((z + radius) / (2.0 * radius)).clamp(0.0, 1.0);
    range.0 + (range.1 - range.0) * t
}

/// One-time construction of the point store: every site gets a spherically
/// uniform seed on the shell band plus depth-derived visual baselines.
pub fn create_points<R: Rng>(sites: &[SiteEntry], rng: &mut R) -> Vec<SitePoint> {
    sites
        .iter()
        .map(|site| {
            let phi = (1.0 - 2.0 * rng.r#gen::<f32>()).acos();
            let theta = std::f32::consts::TAU * rng.r#gen::<f32>();
            let r = ORBIT_RADIUS * (SHELL_INNER + SHELL_BAND * rng.r#gen::<f32>());
            let seed = Vec3::new(
                r * phi.sin() * theta.cos(),
                r * phi.sin() * theta.sin(),
                r * phi.cos(),
            );

            let flicker = if rng.gen_bool(FLICKER_CHANCE) {
                Some(Flicker {
                    phase: rng.r#gen::<f32>() * 100.0,
                    period_secs: 0.1 + rng.r#gen::<f32>() * 0.2,
                })
            } else {
                None
            };

            SitePoint {
                id: site.id.clone(),
                title: site.title.clone(),
                category: site.category.clone(),
                sub_type: site.sub_type.clone(),
                first_seen_month: site.first_seen_month,
                last_seen_month: site.last_seen_month,
                depth_opacity: lerp_depth(seed.z, ORBIT_RADIUS, DEPTH_OPACITY_RANGE),
                depth_size: lerp_depth(seed.z, ORBIT_RADIUS, DEPTH_SIZE_RANGE),
                seed,
                flicker,
                pile_slot: None,
                has_fallen: false,
                fall_start: None,
                fall_ease: 0.0,
                fall_fade: 1.0,
                draw: seed,
            }
        })
        .collect()
}

#[cfg(test)]
pub(super) fn test_point(last_seen_month: Option<u32>) -> SitePoint {
    SitePoint {
        id: String::new(),
        title: String::new(),
        category: "Music".to_owned(),
        sub_type: "Label".to_owned(),
        first_seen_month: Some(0),
        last_seen_month,
        seed: Vec3::new(100.0, -40.0, 55.0),
        depth_opacity: 0.5,
        depth_size: 3.0,
        flicker: None,
        pile_slot: None,
        has_fallen: false,
        fall_start: None,
        fall_ease: 0.0,
        fall_fade: 1.0,
        draw: Vec3::default(),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::data::SiteEntry;

    use super::*;

    fn sites(count: usize) -> Vec<SiteEntry> {
        (0..count)
            .map(|index| SiteEntry {
                id: format!("site-{index}"),
                title: format!("Site {index}"),
                category: "Music".to_owned(),
                sub_type: "Label".to_owned(),
                first_seen_month: Some(0),
                last_seen_month: Some(index as u32),
            })
            .collect()
    }

    #[test]
    fn seeds_stay_on_the_shell_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let points = create_points(&sites(500), &mut rng);

        for point in &points {
            let radius = point.seed.length();
            assert!(radius >= ORBIT_RADIUS * SHELL_INNER - 1e-3);
            assert!(radius <= ORBIT_RADIUS + 1e-3);
        }
    }

    #[test]
    fn depth_baselines_are_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let points = create_points(&sites(300), &mut rng);

        for point in &points {
            assert!(point.depth_opacity >= 0.15 && point.depth_opacity <= 0.8);
            assert!(point.depth_size >= 1.5 && point.depth_size <= 5.0);
            assert!(!point.has_fallen);
            assert!(point.pile_slot.is_none());
        }
    }

    #[test]
    fn construction_is_deterministic_for_a_seeded_rng() {
        let first = create_points(&sites(50), &mut StdRng::seed_from_u64(42));
        let second = create_points(&sites(50), &mut StdRng::seed_from_u64(42));

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.seed, b.seed);
        }
    }
}
