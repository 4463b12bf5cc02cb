use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Painter, PointerButton, Rect, Response, Sense,
    Stroke, Ui,
};

use super::BubbleApp;
use super::render_utils::{mix_color, circle_visible, draw_background};

const BUBBLE_FILL: Color32 = Color32::from_rgb(196, 200, 208);
const BUBBLE_OUTLINE: Color32 = Color32::from_rgb(120, 128, 140);
const BUBBLE_SELECTED: Color32 = Color32::from_rgb(142, 84, 214);
const LABEL_COLOR: Color32 = Color32::from_rgb(28, 32, 40);
const SELECTED_GROWTH: f32 = 0.1;

impl BubbleApp {
    pub(super) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        if self.viewport.sync(rect, &mut self.scene) && !self.populated {
            self.populated = true;
            self.populate();
        }

        self.forward_pointer(ui, &response);

        let dt = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        self.scene.step(dt);
        ui.ctx().request_repaint();

        let painter = ui.painter_at(rect);
        let field = self.scene.field();
        draw_background(
            &painter,
            rect,
            self.viewport.to_surface(field.position),
            field.capture_region_radius,
        );
        self.draw_bubbles(ui, &painter, rect);

        if let Some(hover) = response.hover_pos()
            && self.scene.node_at(self.viewport.to_scene(hover)).is_some()
        {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }
    }

    fn forward_pointer(&mut self, ui: &Ui, response: &Response) {
        let pointer = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|input| input.pointer.interact_pos()));
        let Some(location) = pointer.map(|surface| self.viewport.to_scene(surface)) else {
            if self.scene.is_dragging() {
                self.scene.pointer_cancelled();
            }
            return;
        };

        if response.dragged_by(PointerButton::Primary) {
            self.scene.pointer_moved(location, location - response.drag_delta());
        }

        if response.clicked_by(PointerButton::Primary)
            || response.drag_stopped_by(PointerButton::Primary)
        {
            let events = self.scene.pointer_released(location, &mut self.provider);
            self.record_events(events);
        } else if self.scene.is_dragging() && !response.dragged() {
            self.scene.pointer_cancelled();
        }
    }

    fn draw_bubbles(&self, ui: &Ui, painter: &Painter, rect: Rect) {
        for node in self.scene.nodes() {
            let selection = ui.ctx().animate_bool(
                egui::Id::new(("bubble-selected", node.id().as_str())),
                node.is_selected(),
            );
            let center = self.viewport.to_surface(node.position);
            let radius = node.scaled_radius() * (1.0 + SELECTED_GROWTH * selection);
            if radius < 0.5 || !circle_visible(rect, center, radius) {
                continue;
            }

            let fill = mix_color(BUBBLE_FILL, BUBBLE_SELECTED, selection);
            painter.circle_filled(center, radius, fill);
            painter.circle_stroke(
                center,
                radius,
                Stroke::new(1.5, mix_color(BUBBLE_OUTLINE, Color32::WHITE, selection)),
            );

            if radius > 14.0 {
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    &node.label,
                    FontId::proportional((radius * 0.26).clamp(9.0, 18.0)),
                    mix_color(LABEL_COLOR, Color32::WHITE, selection),
                );
            }
        }
    }
}
