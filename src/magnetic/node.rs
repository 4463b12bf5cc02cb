use std::fmt;

use eframe::egui::{Pos2, Rect, Vec2};

use crate::util::{circle_bounds, circle_contains};

/// Opaque node identity, kept apart from the display label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    id: NodeId,
    pub label: String,
    pub position: Pos2,
    pub velocity: Vec2,
    pub radius: f32,
    pub scale: f32,
    applied_force: Vec2,
    is_selected: bool,
    simulation_enabled: bool,
    is_removing: bool,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>, radius: f32) -> Self {
        Self {
            id,
            label: label.into(),
            position: Pos2::ZERO,
            velocity: Vec2::ZERO,
            radius,
            scale: 1.0,
            applied_force: Vec2::ZERO,
            is_selected: false,
            simulation_enabled: true,
            is_removing: false,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    pub(super) fn set_selected(&mut self, selected: bool) {
        self.is_selected = selected;
    }

    pub fn simulation_enabled(&self) -> bool {
        self.simulation_enabled
    }

    pub fn is_removing(&self) -> bool {
        self.is_removing
    }

    /// Freezes the body: no field, collision or drag response from here on.
    pub(super) fn disable_simulation(&mut self) {
        self.simulation_enabled = false;
        self.velocity = Vec2::ZERO;
        self.applied_force = Vec2::ZERO;
    }

    pub(super) fn mark_removing(&mut self) {
        self.is_removing = true;
        self.disable_simulation();
    }

    pub fn scaled_radius(&self) -> f32 {
        self.radius * self.scale.max(0.0)
    }

    pub fn frame(&self) -> Rect {
        circle_bounds(self.position, self.scaled_radius())
    }

    pub fn contains(&self, point: Pos2) -> bool {
        circle_contains(self.position, self.scaled_radius(), point)
    }

    pub fn applied_force(&self) -> Vec2 {
        self.applied_force
    }

    pub fn apply_force(&mut self, force: Vec2) {
        if self.simulation_enabled {
            self.applied_force += force;
        }
    }

    pub(super) fn take_applied_force(&mut self) -> Vec2 {
        std::mem::take(&mut self.applied_force)
    }
}
