use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

/// Space between the panel edge and the chart's top row of bubbles.
pub(super) const CHART_MARGIN_TOP: f32 = 5.0;

const BUBBLE_LIGHT: Color32 = Color32::from_rgb(222, 222, 240);
const BUBBLE_PEACH: Color32 = Color32::from_rgb(255, 173, 135);
const BUBBLE_CORAL: Color32 = Color32::from_rgb(250, 135, 127);

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

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

/// Light lavender for the smallest bubbles through peach to coral for the
/// largest. `radius_share` is the bubble radius over the largest radius.
pub(super) fn bubble_color(radius_share: f32) -> Color32 {
    let t = radius_share.clamp(0.0, 1.0);
    if t < 0.5 {
        blend_color(BUBBLE_LIGHT, BUBBLE_PEACH, t * 2.0)
    } else {
        blend_color(BUBBLE_PEACH, BUBBLE_CORAL, (t - 0.5) * 2.0)
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, chart: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(252, 250, 247));
    painter.rect_stroke(
        chart,
        4.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(120, 110, 130, 40)),
        eframe::egui::StrokeKind::Inside,
    );
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Maps chart coordinates (origin top-left) into the panel. `scale` already
/// includes the user zoom.
#[derive(Clone, Copy, Debug)]
pub(super) struct ChartTransform {
    pub(super) rect: Rect,
    pub(super) pan: Vec2,
    pub(super) scale: f32,
    pub(super) chart_size: Vec2,
}

impl ChartTransform {
    pub(super) fn fit(rect: Rect, pan: Vec2, zoom: f32, chart_size: Vec2) -> Self {
        let available = rect.size();
        let fit = (available.x / chart_size.x)
            .min(available.y / (chart_size.y + CHART_MARGIN_TOP))
            .max(0.05);
        Self {
            rect,
            pan,
            scale: fit * zoom,
            chart_size,
        }
    }

    fn origin(self) -> Pos2 {
        self.rect.center() + self.pan - (self.chart_size * 0.5 * self.scale)
            + Vec2::new(0.0, CHART_MARGIN_TOP * self.scale)
    }

    pub(super) fn world_to_screen(self, world: Vec2) -> Pos2 {
        self.origin() + world * self.scale
    }

    pub(super) fn screen_to_world(self, screen: Pos2) -> Vec2 {
        (screen - self.origin()) / self.scale
    }

    pub(super) fn chart_rect(self) -> Rect {
        Rect::from_min_max(
            self.world_to_screen(Vec2::ZERO),
            self.world_to_screen(self.chart_size),
        )
    }
}

/// Label font size in chart pixels, growing with the bubble but never below 8.
pub(super) fn label_font_size(half_value_radius: f32) -> f32 {
    half_value_radius.max(8.0)
}

/// Labels are at least as wide as 2.5 bubble radii, wider if the text needs it.
pub(super) fn label_width(radius: f32, text_width: f32) -> f32 {
    (2.5 * radius).max(text_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn transform_round_trips_points() {
        let transform = ChartTransform::fit(
            Rect::from_min_size(pos2(0.0, 0.0), vec2(1200.0, 700.0)),
            vec2(15.0, -8.0),
            1.4,
            vec2(980.0, 510.0),
        );
        let world = vec2(321.0, 87.5);
        let back = transform.screen_to_world(transform.world_to_screen(world));
        assert!((back - world).length() < 1.0e-3);
    }

    #[test]
    fn chart_fits_inside_the_panel_at_unit_zoom() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(800.0, 600.0));
        let transform = ChartTransform::fit(rect, Vec2::ZERO, 1.0, vec2(980.0, 510.0));
        let chart = transform.chart_rect();
        assert!(chart.left() >= rect.left() - 1.0e-3);
        assert!(chart.right() <= rect.right() + 1.0e-3);
        assert!(chart.top() >= rect.top() - 1.0e-3);
    }

    #[test]
    fn label_sizing_rules() {
        assert_eq!(label_font_size(3.0), 8.0);
        assert_eq!(label_font_size(22.0), 22.0);
        assert_eq!(label_width(10.0, 12.0), 25.0);
        assert_eq!(label_width(10.0, 40.0), 40.0);
    }

    #[test]
    fn bubble_palette_runs_from_light_to_coral() {
        assert_eq!(bubble_color(0.0), BUBBLE_LIGHT);
        assert_eq!(bubble_color(1.0), BUBBLE_CORAL);
        assert_eq!(bubble_color(0.5), BUBBLE_PEACH);
    }
}
