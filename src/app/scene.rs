use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, vec2};
use rand::Rng;

use crate::util::month_label;

use super::pile::pile_target;
use super::points::{SitePoint, Vec3};
use super::render_utils::{blend_color, point_color};
use super::{SelectedPoint, ViewModel};

/// Fixed base canvas all world coordinates are expressed against; the scene
/// is scaled and centered to fit whatever rect the host window provides.
const CANVAS_WIDTH: f32 = 1920.0;
const CANVAS_HEIGHT: f32 = 2000.0;
const SPHERE_CENTER_X: f32 = CANVAS_WIDTH / 2.0;
const SPHERE_CENTER_Y: f32 = 395.0;

const MAX_LINKS: usize = 1500;
const MAX_STRINGS: usize = 300;
const LINK_CHANCE: f64 = 0.05;
const STRING_CHANCE: f64 = 0.01;

/// Orbiting points within this many months of their last-seen month pulse as
/// a warning before they fall.
const WARNING_WINDOW_MONTHS: f64 = 3.0;

const PICK_RADIUS_PX: f32 = 8.0;
const PILE_DOT_RADIUS: f32 = 3.5;

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub radius: f32,
    pub ground_y: f32,
    pub pile_spacing_x: f32,
    pub pile_spacing_y: f32,
    pub wobble_amplitude: f32,
    pub wobble_period_y_secs: f64,
    pub wobble_period_x_secs: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            radius: super::points::ORBIT_RADIUS,
            ground_y: 1500.0,
            pile_spacing_x: 7.0,
            pile_spacing_y: 7.0,
            wobble_amplitude: 0.5,
            wobble_period_y_secs: 4.0,
            wobble_period_x_secs: 3.0,
        }
    }
}

/// World-to-screen mapping for one frame: fits the base canvas into the
/// available rect, preserving aspect.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame {
    origin: Pos2,
    scale: f32,
}

impl SceneFrame {
    pub fn fit(rect: Rect) -> Self {
        let scale = (rect.width() / CANVAS_WIDTH).min(rect.height() / CANVAS_HEIGHT);
        let left = rect.center().x - CANVAS_WIDTH * scale / 2.0;
        let top = rect.center().y - CANVAS_HEIGHT * scale / 2.0;
        Self {
            origin: Pos2::new(left + SPHERE_CENTER_X * scale, top + SPHERE_CENTER_Y * scale),
            scale,
        }
    }

    pub fn to_screen(&self, x: f32, y: f32) -> Pos2 {
        self.origin + vec2(x, y) * self.scale
    }

    pub fn length_to_screen(&self, length: f32) -> f32 {
        length * self.scale
    }
}

/// Decorative pair of points joined by a line or floating string.
#[derive(Clone, Copy, Debug)]
pub struct Connector {
    pub a: usize,
    pub b: usize,
    pub phase: f32,
}

/// Random sparse connector sets, sampled once at load the way the point
/// seeds are: three candidate partners per point, thinned by chance and
/// capped.
pub fn build_connectors<R: Rng>(point_count: usize, rng: &mut R) -> (Vec<Connector>, Vec<Connector>) {
    let mut links = Vec::new();
    let mut strings = Vec::new();
    if point_count < 2 {
        return (links, strings);
    }

    for a in 0..point_count {
        for _attempt in 0..3 {
            let b = rng.gen_range(0..point_count);
            if a == b {
                continue;
            }
            if links.len() < MAX_LINKS && rng.gen_bool(LINK_CHANCE) {
                links.push(Connector {
                    a,
                    b,
                    phase: rng.r#gen::<f32>() * 100.0,
                });
            }
            if strings.len() < MAX_STRINGS && rng.gen_bool(STRING_CHANCE) {
                strings.push(Connector {
                    a,
                    b,
                    phase: rng.r#gen::<f32>() * 100.0,
                });
            }
        }
    }

    (links, strings)
}

/// Active category/sub-type highlight filter. The core only reads this;
/// the capsule UI owns its lifecycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionFilter {
    pub category: Option<String>,
    pub sub_type: Option<String>,
}

impl SelectionFilter {
    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.sub_type.is_some()
    }

    pub fn matches(&self, point: &SitePoint) -> bool {
        if let Some(category) = &self.category
            && point.category != *category
        {
            return false;
        }
        if let Some(sub_type) = &self.sub_type
            && point.sub_type != *sub_type
        {
            return false;
        }
        true
    }
}

/// Per-tick projection pass: writes every point's transient draw position.
/// Orbiting points get the two-axis wobble rotation of their seed; fallen
/// points interpolate from seed toward their pile slot by the eased fall
/// progress. A click-frozen point keeps the position captured at selection.
pub fn advance_draw_positions(
    points: &mut [SitePoint],
    now: f64,
    config: &SceneConfig,
    frozen: Option<&SelectedPoint>,
) {
    let rot_y = ((now / config.wobble_period_y_secs).sin() * config.wobble_amplitude as f64) as f32;
    let rot_x = ((now / config.wobble_period_x_secs).cos() * config.wobble_amplitude as f64) as f32;
    let (sin_y, cos_y) = (rot_y.sin(), rot_y.cos());
    let (sin_x, cos_x) = (rot_x.sin(), rot_x.cos());

    for (index, point) in points.iter_mut().enumerate() {
        if let Some(selected) = frozen
            && selected.index == index
        {
            point.draw = selected.frozen;
            continue;
        }

        if point.has_fallen
            && let Some(slot) = point.pile_slot
        {
            let (pile_x, pile_y) = pile_target(
                slot,
                config.pile_spacing_x,
                config.pile_spacing_y,
                config.ground_y,
            );
            let ease = point.fall_ease;
            point.draw = Vec3::new(
                point.seed.x + (pile_x - point.seed.x) * ease,
                point.seed.y + (pile_y - point.seed.y) * ease,
                point.seed.z,
            );
        } else {
            let seed = point.seed;
            let rx = seed.x * cos_y - seed.z * sin_y;
            let rz = seed.x * sin_y + seed.z * cos_y;
            let ry = seed.y * cos_x - rz * sin_x;
            let fz = seed.y * sin_x + rz * cos_x;
            point.draw = Vec3::new(rx, ry, fz);
        }
    }
}

/// Final visual intensity for one point: depth baseline, flicker, fall fade,
/// selection-filter highlight, and the pre-fall warning pulse, clamped to
/// `[0, 1]`.
pub fn point_intensity(
    point: &SitePoint,
    filter: &SelectionFilter,
    clock_value: f64,
    now: f64,
) -> f32 {
    let mut intensity = point.depth_opacity;

    if !point.has_fallen
        && let Some(flicker) = point.flicker
    {
        let wave = ((now / flicker.period_secs as f64) as f32 + flicker.phase).sin();
        intensity *= 0.4 + 0.4 * wave.abs();
    }

    if point.has_fallen {
        intensity *= point.fall_fade;
    } else if let Some(month) = point.last_seen_month
        && point.pile_slot.is_some()
    {
        let months_left = month as f64 - clock_value;
        if months_left > 0.0 && months_left <= WARNING_WINDOW_MONTHS {
            let pulse = 0.5 + 0.5 * ((now * 7.0) as f32 + point.depth_size).sin();
            intensity += (1.0 - intensity) * pulse * 0.6;
        }
    }

    if filter.is_active() && !filter.matches(point) {
        intensity *= 0.1;
    }

    intensity.clamp(0.0, 1.0)
}

/// 2-D endpoint for a connector. A fallen endpoint that has left the orbit
/// sphere is clamped to the sphere surface along the ray from the origin, so
/// strings stay anchored to the sphere instead of crossing the pile.
pub fn connector_endpoint(point: &SitePoint, radius: f32) -> (f32, f32) {
    let draw = point.draw;
    if !point.has_fallen {
        return (draw.x, draw.y);
    }

    let length = draw.length();
    if length < radius || length == 0.0 {
        return (draw.x, draw.y);
    }

    let clamp = radius * 1.1 / length;
    (draw.x * clamp, draw.y * clamp)
}

/// Nearest point within the hit-test radius of a screen position.
pub fn pick_point(
    points: &[SitePoint],
    frame: &SceneFrame,
    pointer: Pos2,
    pick_radius: f32,
) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let position = frame.to_screen(point.draw.x, point.draw.y);
            let distance = position.distance(pointer);
            if distance <= pick_radius {
                Some((index, distance))
            } else {
                None
            }
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

impl ViewModel {
    pub(in crate::app) fn draw_scene(&mut self, ui: &mut Ui, now: f64, clock_value: f64) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(10, 10, 10));

        let frame = SceneFrame::fit(rect);
        let radius = self.scene_config.radius;
        let search_matches = self.cached_search_matches();

        // Ground line under the pile.
        let ground_left = frame.to_screen(-radius * 1.2, self.scene_config.ground_y);
        let ground_right = frame.to_screen(radius * 1.2, self.scene_config.ground_y);
        painter.line_segment(
            [ground_left, ground_right],
            Stroke::new(2.0, Color32::from_rgba_unmultiplied(238, 238, 238, 50)),
        );

        if self.show_connectors {
            self.draw_connectors(&painter, &frame, now, radius);
        }

        let pointer = response.hover_pos();
        let hovered = pointer.and_then(|pointer| {
            pick_point(
                &self.points,
                &frame,
                pointer,
                PICK_RADIUS_PX.max(frame.length_to_screen(PILE_DOT_RADIUS) + 3.0),
            )
        });
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let selected_index = self.selected_point.as_ref().map(|selected| selected.index);
        for (index, point) in self.points.iter().enumerate() {
            let position = frame.to_screen(point.draw.x, point.draw.y);
            let is_selected = selected_index == Some(index);
            let is_hovered = hovered == Some(index);

            let world_radius = if point.has_fallen {
                PILE_DOT_RADIUS
            } else {
                point.depth_size
            };
            let mut screen_radius = frame.length_to_screen(world_radius).max(1.0);
            if is_selected {
                screen_radius += 1.0;
            }

            let mut intensity = if is_selected {
                1.0
            } else {
                point_intensity(point, &self.filter, clock_value, now)
            };
            if let Some(matches) = &search_matches
                && !is_selected
            {
                if matches.contains(&index) {
                    intensity = intensity.max(0.9);
                } else {
                    intensity *= 0.08;
                }
            }

            let mut color = point_color(intensity);
            if is_hovered && !is_selected {
                color = blend_color(color, Color32::WHITE, 0.35);
            }

            painter.circle_filled(position, screen_radius, color);
            if is_selected {
                painter.circle_stroke(position, screen_radius, Stroke::new(1.5, Color32::WHITE));
            }
        }

        // Bottom-left running month label.
        painter.text(
            rect.left_bottom() + vec2(20.0, -16.0),
            Align2::LEFT_BOTTOM,
            month_label(
                self.catalog.horizon.start_year,
                (clock_value as u32).min(self.clock.last_month()),
            ),
            FontId::monospace(14.0),
            Color32::from_gray(204),
        );

        if response.clicked() {
            match hovered {
                Some(index) => {
                    let frozen = self.points[index].draw;
                    self.selected_point = Some(SelectedPoint { index, frozen });
                }
                None => self.selected_point = None,
            }
        }
    }

    fn draw_connectors(&self, painter: &egui::Painter, frame: &SceneFrame, now: f64, radius: f32) {
        for link in &self.links {
            let (Some(a), Some(b)) = (self.points.get(link.a), self.points.get(link.b)) else {
                continue;
            };
            let start = frame.to_screen(a.draw.x, a.draw.y);
            let end = frame.to_screen(b.draw.x, b.draw.y);
            let alpha = 5.0 + 8.0 * (0.5 + 0.5 * ((now as f32) + link.phase).sin());
            painter.line_segment(
                [start, end],
                Stroke::new(
                    0.4,
                    Color32::from_rgba_unmultiplied(119, 204, 255, alpha as u8),
                ),
            );
        }

        for string in &self.strings {
            let (Some(a), Some(b)) = (self.points.get(string.a), self.points.get(string.b)) else {
                continue;
            };
            if a.lifecycle_state() == super::lifecycle::LifecycleState::Settled
                && b.lifecycle_state() == super::lifecycle::LifecycleState::Settled
            {
                continue;
            }

            let (ax, ay) = connector_endpoint(a, radius);
            let (bx, by) = connector_endpoint(b, radius);
            let mid_x = (ax + bx) / 2.0 + ((now / 0.8) as f32 + string.phase).sin() * 10.0;
            let mid_y = (ay + by) / 2.0 + ((now / 0.8) as f32 + string.phase).cos() * 10.0;

            let alpha = 15.0 + 15.0 * ((now / 1.2) as f32 + string.phase).sin().abs();
            let stroke = Stroke::new(
                1.0,
                Color32::from_rgba_unmultiplied(170, 204, 255, alpha as u8),
            );
            painter.add(egui::epaint::QuadraticBezierShape::from_points_stroke(
                [
                    frame.to_screen(ax, ay),
                    frame.to_screen(mid_x, mid_y),
                    frame.to_screen(bx, by),
                ],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::super::lifecycle::update_lifecycle;
    use super::super::pile::assign_pile_slots;
    use super::super::points::test_point;
    use super::*;

    const HORIZON: u32 = 348;

    #[test]
    fn wobble_preserves_distance_from_the_origin() {
        let mut points = vec![test_point(None)];
        let config = SceneConfig::default();
        let seed_length = points[0].seed.length();

        for step in 0..100 {
            advance_draw_positions(&mut points, step as f64 * 0.16, &config, None);
            assert!((points[0].draw.length() - seed_length).abs() < 1e-3);
        }
    }

    #[test]
    fn settled_point_rests_on_its_pile_slot() {
        let mut points = vec![test_point(Some(4))];
        assign_pile_slots(&mut points, HORIZON);
        let config = SceneConfig::default();

        update_lifecycle(&mut points, 50.0, HORIZON, 2.4, None);
        advance_draw_positions(&mut points, 25.0, &config, None);

        let slot = points[0].pile_slot.unwrap();
        let (pile_x, pile_y) = pile_target(
            slot,
            config.pile_spacing_x,
            config.pile_spacing_y,
            config.ground_y,
        );
        assert!((points[0].draw.x - pile_x).abs() < 1e-4);
        assert!((points[0].draw.y - pile_y).abs() < 1e-4);
        assert_eq!(points[0].draw.z, points[0].seed.z);
    }

    #[test]
    fn frozen_point_keeps_its_captured_position() {
        let mut points = vec![test_point(Some(4))];
        assign_pile_slots(&mut points, HORIZON);
        let config = SceneConfig::default();

        let frozen = SelectedPoint {
            index: 0,
            frozen: Vec3::new(12.0, -8.0, 3.0),
        };
        update_lifecycle(&mut points, 50.0, HORIZON, 2.4, Some(0));
        advance_draw_positions(&mut points, 99.0, &config, Some(&frozen));
        assert_eq!(points[0].draw, Vec3::new(12.0, -8.0, 3.0));
    }

    #[test]
    fn fallen_endpoint_outside_the_sphere_is_clamped() {
        let mut point = test_point(Some(0));
        point.has_fallen = true;
        point.draw = Vec3::new(0.0, 1500.0, 0.0);

        let (x, y) = connector_endpoint(&point, 310.0);
        assert!(x.abs() < 1e-6);
        assert!((y - 310.0 * 1.1).abs() < 1e-3);

        // Orbiting endpoints are untouched, even far from the origin.
        point.has_fallen = false;
        let (x, y) = connector_endpoint(&point, 310.0);
        assert_eq!((x, y), (0.0, 1500.0));
    }

    #[test]
    fn connector_sets_respect_caps_and_avoid_self_pairs() {
        let mut rng = StdRng::seed_from_u64(5);
        let (links, strings) = build_connectors(4000, &mut rng);

        assert!(links.len() <= 1500);
        assert!(strings.len() <= 300);
        assert!(!links.is_empty());
        for connector in links.iter().chain(&strings) {
            assert_ne!(connector.a, connector.b);
            assert!(connector.a < 4000 && connector.b < 4000);
        }
    }

    #[test]
    fn intensity_is_bounded_and_dims_non_matches() {
        let mut points = vec![test_point(Some(10))];
        assign_pile_slots(&mut points, HORIZON);
        let point = &points[0];

        let no_filter = SelectionFilter::default();
        let other = SelectionFilter {
            category: Some("News".to_owned()),
            sub_type: None,
        };

        for frame in 0..200 {
            let now = frame as f64 / 60.0;
            let bright = point_intensity(point, &no_filter, 8.0, now);
            let dim = point_intensity(point, &other, 8.0, now);
            assert!((0.0..=1.0).contains(&bright));
            assert!((0.0..=1.0).contains(&dim));
            assert!(dim < bright);
        }
    }

    #[test]
    fn matching_sub_type_requires_matching_category() {
        let point = test_point(None);
        let matching = SelectionFilter {
            category: Some("Music".to_owned()),
            sub_type: Some("Label".to_owned()),
        };
        let wrong_sub_type = SelectionFilter {
            category: Some("Music".to_owned()),
            sub_type: Some("Fan page".to_owned()),
        };

        assert!(matching.matches(&point));
        assert!(!wrong_sub_type.matches(&point));
    }
}
