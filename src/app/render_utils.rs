use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::util::lerp;

/// Per-channel mix from `from` to `to`, alpha included; `amount` is clamped to 0..=1.
pub(super) fn mix_color(from: Color32, to: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| lerp(f32::from(a), f32::from(b), amount).round() as u8;

    Color32::from_rgba_unmultiplied(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
        channel(from.a(), to.a()),
    )
}

/// Dark backdrop with faint rings around the field centre, out to its capture radius.
pub(super) fn draw_background(
    painter: &Painter,
    rect: Rect,
    field_center: Pos2,
    capture_radius: f32,
) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    if capture_radius <= 0.0 {
        return;
    }

    let rings = 4;
    for ring in 1..=rings {
        let radius = capture_radius * ring as f32 / rings as f32;
        let alpha = 70 - (ring as u8 * 12);
        painter.circle_stroke(
            field_center,
            radius,
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, alpha)),
        );
    }
}

pub(super) fn circle_visible(rect: Rect, center: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(center)
}
