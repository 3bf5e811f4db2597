use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};
use track_scatter::plot::Rgba;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
pub(super) const GRID: Color32 = Color32::from_rgba_premultiplied(42, 49, 56, 70);
pub(super) const AXIS_TEXT: Color32 = Color32::from_gray(200);

pub(super) fn rgba_color(rgba: &[f32]) -> Color32 {
    let channel = |index: usize| {
        let value = rgba.get(index).copied().unwrap_or(1.0);
        (value.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    Color32::from_rgba_unmultiplied(channel(0), channel(1), channel(2), channel(3))
}

pub(super) fn style_color(rgba: Rgba) -> Color32 {
    rgba_color(&rgba)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
}

pub(super) fn draw_box(painter: &Painter, corners: [Pos2; 2], stroke: Stroke) {
    let rect = Rect::from_two_pos(corners[0], corners[1]);
    painter.rect_filled(rect, 0.0, stroke.color.gamma_multiply(0.12));
    painter.line_segment([rect.left_top(), rect.right_top()], stroke);
    painter.line_segment([rect.right_top(), rect.right_bottom()], stroke);
    painter.line_segment([rect.right_bottom(), rect.left_bottom()], stroke);
    painter.line_segment([rect.left_bottom(), rect.left_top()], stroke);
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

// Plot Y grows upwards, screen Y downwards.
pub(super) fn world_to_screen(rect: Rect, pan: Vec2, scale: Vec2, world: Vec2) -> Pos2 {
    rect.center() + pan + vec2(world.x * scale.x, -world.y * scale.y)
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, scale: Vec2, screen: Pos2) -> Vec2 {
    let offset = screen - rect.center() - pan;
    vec2(offset.x / scale.x, -offset.y / scale.y)
}

pub(super) fn fit_view(rect: Rect, min: Vec2, max: Vec2, margin: f32) -> (Vec2, Vec2) {
    let span = (max - min).max(vec2(1e-6, 1e-6));
    let usable = (rect.size() - vec2(2.0 * margin, 2.0 * margin)).max(vec2(10.0, 10.0));
    let scale = vec2(usable.x / span.x, usable.y / span.y);
    let center = (min + max) * 0.5;
    let pan = vec2(-center.x * scale.x, center.y * scale.y);
    (pan, scale)
}
