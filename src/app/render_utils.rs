use eframe::egui::Color32;

/// Base glow tint for site points.
const POINT_TINT: (u8, u8, u8) = (170, 255, 255);

pub(super) fn point_color(intensity: f32) -> Color32 {
    let alpha = (intensity.clamp(0.0, 1.0) * 255.0) as u8;
    Color32::from_rgba_unmultiplied(POINT_TINT.0, POINT_TINT.1, POINT_TINT.2, alpha)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}
