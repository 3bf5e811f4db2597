use eframe::egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, vec2};
use track_scatter::plot::PlotSnapshot;
use track_scatter::util::{format_value, nice_tick_step};

use super::super::ViewModel;
use super::super::render_utils::{AXIS_TEXT, GRID, screen_to_world, world_to_screen};

const TARGET_TICKS: usize = 8;
const MAX_TICKS: i64 = 200;

/// Multiples of `step` inside `[min, max]`.
fn ticks(min: f64, max: f64) -> (f64, impl Iterator<Item = f64>) {
    let step = nice_tick_step(max - min, TARGET_TICKS);
    let first = (min / step).ceil() as i64;
    let last = ((max / step).floor() as i64).min(first.saturating_add(MAX_TICKS));
    (step, (first..=last).map(move |i| i as f64 * step))
}

impl ViewModel {
    pub(in crate::app) fn draw_axes(&self, painter: &Painter, rect: Rect, snapshot: &PlotSnapshot) {
        let stroke = Stroke::new(1.0, GRID);
        let font = FontId::proportional(11.0);
        let low = screen_to_world(rect, self.pan, self.scale, rect.left_bottom());
        let high = screen_to_world(rect, self.pan, self.scale, rect.right_top());

        if low.x.is_finite() && high.x.is_finite() {
            let (step, values) = ticks(f64::from(low.x), f64::from(high.x));
            for value in values {
                let x = world_to_screen(rect, self.pan, self.scale, vec2(value as f32, 0.0)).x;
                painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
                painter.text(
                    Pos2::new(x + 3.0, rect.bottom() - 4.0),
                    Align2::LEFT_BOTTOM,
                    format_value(value, step),
                    font.clone(),
                    AXIS_TEXT,
                );
            }
        }

        if low.y.is_finite() && high.y.is_finite() {
            let (step, values) = ticks(f64::from(low.y), f64::from(high.y));
            for value in values {
                let y = world_to_screen(rect, self.pan, self.scale, vec2(0.0, value as f32)).y;
                painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
                painter.text(
                    Pos2::new(rect.left() + 4.0, y - 2.0),
                    Align2::LEFT_BOTTOM,
                    format_value(value, step),
                    font.clone(),
                    AXIS_TEXT,
                );
            }
        }

        let label_font = FontId::proportional(13.0);
        painter.text(
            rect.center_bottom() - vec2(0.0, 20.0),
            Align2::CENTER_BOTTOM,
            &snapshot.x_label,
            label_font.clone(),
            AXIS_TEXT,
        );
        painter.text(
            rect.left_center() + vec2(8.0, -20.0),
            Align2::LEFT_BOTTOM,
            &snapshot.y_label,
            label_font,
            AXIS_TEXT,
        );
    }
}
