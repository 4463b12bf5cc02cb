use std::collections::VecDeque;

use eframe::egui::{self, Context, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{Catalog, CatalogProvider};
use crate::magnetic::{EngineConfig, Node, NodeId, Scene, SelectionEvent, Viewport};

mod canvas;
mod controls;
mod fps;
mod render_utils;

const RECENT_EVENT_LIMIT: usize = 8;

const STRAY_LABELS: &[&str] = &[
    "Ambient", "Baroque", "Blues", "Bossa Nova", "Disco", "Dub", "Folk", "Funk", "Gospel", "Jazz",
    "Motown", "Opera", "Punk", "Reggae", "Soul", "Swing",
];

pub struct BubbleApp {
    scene: Scene,
    provider: CatalogProvider,
    viewport: Viewport,
    populated: bool,
    search: String,
    recent_events: VecDeque<SelectionEvent>,
    stray_count: usize,
    rng: StdRng,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl BubbleApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, catalog: Catalog, config: EngineConfig) -> Self {
        // The real size arrives with the first laid-out frame.
        let scene = Scene::new(vec2(1.0, 1.0), config);
        Self::with_scene(scene, catalog, config, StdRng::from_os_rng())
    }

    fn with_scene(scene: Scene, catalog: Catalog, config: EngineConfig, rng: StdRng) -> Self {
        Self {
            scene,
            provider: CatalogProvider::new(catalog, &config),
            viewport: Viewport::default(),
            populated: false,
            search: String::new(),
            recent_events: VecDeque::with_capacity(RECENT_EVENT_LIMIT),
            stray_count: 0,
            rng,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    fn populate(&mut self) {
        let added = self.provider.populate(&mut self.scene);
        log::info!("populated {added} bubbles");
    }

    fn reset(&mut self) {
        log::info!("resetting {} bubbles", self.scene.node_count());
        self.provider.reset(&mut self.scene);
        self.recent_events.clear();
    }

    /// Floats in a bubble with no dataset entity behind it; tapping it only toggles selection.
    fn add_stray_bubble(&mut self) -> bool {
        let label = STRAY_LABELS[self.rng.random_range(0..STRAY_LABELS.len())];
        self.stray_count += 1;
        let id = NodeId::new(format!("stray-{}", self.stray_count));
        let node = Node::new(id, label, self.scene.config().node_radius);
        self.scene.add_child(node)
    }

    fn record_events(&mut self, events: Vec<SelectionEvent>) {
        for event in events {
            log::debug!("selection event: {event:?}");
            self.recent_events.push_front(event);
        }
        self.recent_events.truncate(RECENT_EVENT_LIMIT);
    }
}

impl eframe::App for BubbleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.update_fps_counter(ctx);

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));
    }
}
