use eframe::egui::Context;

use super::BubbleApp;

const FPS_SAMPLE_WINDOW: usize = 180;

impl BubbleApp {
    pub(super) fn update_fps_counter(&mut self, ctx: &Context) {
        let dt = ctx.input(|input| input.stable_dt);
        self.push_frame_time(dt);
    }

    fn push_frame_time(&mut self, dt: f32) {
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(super) fn fps_display_text(&self) -> Option<String> {
        if self.fps_samples.is_empty() {
            return None;
        }

        let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        let low = self.fps_samples.iter().copied().reduce(f32::min).unwrap_or(avg);
        Some(format!(
            "FPS {:.0} | avg {:.1} | low {:.0} | {:.1} ms",
            self.fps_current,
            avg,
            low,
            1000.0 / self.fps_current.max(f32::EPSILON)
        ))
    }
}
