use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::util::{distance, random_range};

use super::config::EngineConfig;
use super::field::Field;
use super::node::{Node, NodeId};
use super::physics::{PhysicsScratch, step_physics};
use super::timeline::{Completion, Easing, Motion, ThrowTarget, Timeline, TimelineEffect};

const EJECT_STAGGER_SECS: f64 = 0.002;
const EJECT_DROP_BELOW: f32 = 40.0;
const THROW_X_SECS: f64 = 0.2;
const THROW_Y_SECS: f64 = 0.4;
const THROW_SCALE: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    Left,
    Top,
    Right,
    Bottom,
}

impl Quadrant {
    /// Anchor on the origin's bounding box. Scene space is y-down, so `Top` is the
    /// smaller y.
    pub fn anchor(self, frame: Rect) -> Pos2 {
        let center = frame.center();
        match self {
            Self::Left => pos2(frame.left(), center.y),
            Self::Top => pos2(center.x, frame.top()),
            Self::Right => pos2(frame.right(), center.y),
            Self::Bottom => pos2(center.x, frame.bottom()),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Left => Self::Top,
            Self::Top => Self::Right,
            Self::Right => Self::Bottom,
            Self::Bottom => Self::Left,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct SpeedRestore {
    at: f64,
    speed: f32,
}

/// Owns the live nodes, the field and the animation timeline.
pub struct Scene {
    size: Vec2,
    field: Field,
    boundary: Rect,
    pub(super) nodes: Vec<Node>,
    pub allows_multiple_selection: bool,
    pub(super) is_dragging: bool,
    speed: f32,
    now: f64,
    timeline: Timeline,
    pending_restore: Option<SpeedRestore>,
    config: EngineConfig,
    scratch: PhysicsScratch,
    rng: StdRng,
}

impl Scene {
    pub fn new(size: Vec2, config: EngineConfig) -> Self {
        Self::with_rng(size, config, StdRng::from_os_rng())
    }

    pub fn with_rng(size: Vec2, config: EngineConfig, rng: StdRng) -> Self {
        let field = Field::for_size(size, config.physics.minimum_radius);
        Self {
            size,
            boundary: field.boundary(size),
            field,
            nodes: Vec::new(),
            allows_multiple_selection: config.allows_multiple_selection,
            is_dragging: false,
            speed: 1.0,
            now: 0.0,
            timeline: Timeline::default(),
            pending_restore: None,
            config,
            scratch: PhysicsScratch::default(),
            rng,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn is_resetting(&self) -> bool {
        self.pending_restore.is_some()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Recomputes the field and boundary for a new surface size.
    pub fn set_size(&mut self, size: Vec2) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.field = Field::for_size(size, self.config.physics.minimum_radius);
        self.boundary = self.field.boundary(size);
        log::debug!(
            "scene resized to {:.0}x{:.0}, field strength {:.0}, capture radius {:.0}",
            size.x,
            size.y,
            self.field.strength,
            self.field.capture_region_radius
        );
    }

    pub fn node_by_id(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn node_by_id_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Topmost node whose circle contains `point`.
    pub fn node_at(&self, point: Pos2) -> Option<&Node> {
        self.nodes.iter().rev().find(|node| node.contains(point))
    }

    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.is_selected())
            .map(|node| node.id().clone())
            .collect()
    }

    fn admit(&mut self, node: Node) -> Option<Node> {
        match self.nodes.iter().position(|live| live.id() == node.id()) {
            None => Some(node),
            Some(index) if self.nodes[index].is_removing() => {
                let stale = self.nodes[index].id().clone();
                self.destroy(&stale);
                Some(node)
            }
            Some(_) => {
                log::warn!("rejected node {}: id is already live", node.id());
                None
            }
        }
    }

    /// Adds a node off-screen, alternating right and left by the current node count.
    pub fn add_child(&mut self, node: Node) -> bool {
        let Some(mut node) = self.admit(node) else {
            return false;
        };

        let extent = node.scaled_radius() * 2.0;
        let x = if self.nodes.len() % 2 == 0 {
            self.size.x + extent
        } else {
            -extent
        };
        let y = random_range(&mut self.rng, extent, self.size.y - extent);
        node.position = pos2(x, y);
        self.nodes.push(node);
        true
    }

    /// Pops `nodes` out of the quadrant anchors of `from`, one `delay` apart.
    /// Returns the ids the scene accepted; nodes whose id is already live are dropped.
    pub fn add_children(
        &mut self,
        nodes: Vec<Node>,
        from: &NodeId,
        delay: f64,
        duration: f64,
    ) -> Vec<NodeId> {
        let Some(origin) = self.node_by_id(from).map(Node::frame) else {
            log::warn!(
                "origin node {from} is not live, inserting {} nodes individually",
                nodes.len()
            );
            return nodes
                .into_iter()
                .filter_map(|node| {
                    let id = node.id().clone();
                    self.add_child(node).then_some(id)
                })
                .collect();
        };

        let mut quadrant = Quadrant::Left;
        let mut accepted = Vec::new();
        for (index, node) in nodes.into_iter().enumerate() {
            let Some(mut node) = self.admit(node) else {
                continue;
            };

            node.position = quadrant.anchor(origin);
            node.scale = 0.0;
            quadrant = quadrant.next();

            self.timeline.schedule(
                node.id().clone(),
                self.now + index as f64 * delay,
                Motion::Scale {
                    to: 1.0,
                    duration,
                    easing: Easing::EaseOut,
                },
                Completion::Keep,
            );
            accepted.push(node.id().clone());
            self.nodes.push(node);
        }

        log::debug!("inserted {} nodes around {from}", accepted.len());
        accepted
    }

    /// Shrinks the given nodes away one `delay` apart, destroying each when done.
    pub fn remove_children(&mut self, ids: &[NodeId], delay: f64, duration: f64) -> usize {
        let mut scheduled = 0;
        for (index, id) in ids.iter().enumerate() {
            let Some(node) = self.node_by_id_mut(id) else {
                continue;
            };
            if node.is_removing() {
                continue;
            }

            node.mark_removing();
            self.timeline.cancel_for(id);
            self.timeline.schedule(
                id.clone(),
                self.now + index as f64 * delay,
                Motion::Scale {
                    to: 0.0,
                    duration,
                    easing: Easing::EaseIn,
                },
                Completion::Destroy,
            );
            scheduled += 1;
        }

        log::debug!("scheduled removal of {scheduled} nodes");
        scheduled
    }

    /// Detaches a node right away and cancels anything still scheduled for it.
    pub fn destroy(&mut self, id: &NodeId) -> bool {
        self.timeline.cancel_for(id);
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id() != id);
        before != self.nodes.len()
    }

    /// Flings the whole cluster along the pointer delta; farther nodes get more force.
    pub fn move_nodes(&mut self, location: Pos2, previous: Pos2) {
        let delta = location - previous;
        for node in &mut self.nodes {
            let acceleration = 3.0 * distance(node.position, location).sqrt();
            node.apply_force(vec2(delta.x * acceleration, delta.y * acceleration));
        }
    }

    /// Freezes the world and ejects every node: selected ones are thrown below
    /// the visible area, the rest vanish. Speed comes back once the last node fired.
    pub fn reset(&mut self) {
        let saved_speed = self
            .pending_restore
            .map(|restore| restore.speed)
            .unwrap_or(self.speed);
        self.speed = 0.0;

        let center = self.field.position;
        let mut order = self
            .nodes
            .iter()
            .map(|node| (node.is_selected(), distance(node.position, center), node.id().clone()))
            .collect::<Vec<_>>();
        order.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.total_cmp(&b.1)));

        let throw = ThrowTarget {
            to: pos2(self.size.x / 2.0, self.size.y + EJECT_DROP_BELOW),
        };
        for (index, (_selected, _distance, id)) in order.iter().enumerate() {
            if let Some(node) = self.node_by_id_mut(id) {
                node.mark_removing();
            }
            self.timeline.cancel_for(id);
            self.timeline.schedule(
                id.clone(),
                self.now + index as f64 * EJECT_STAGGER_SECS,
                Motion::Eject { throw },
                Completion::Destroy,
            );
        }

        let last_fire = order.len().saturating_sub(1) as f64 * EJECT_STAGGER_SECS;
        let at = self
            .pending_restore
            .map(|restore| restore.at.max(self.now + last_fire))
            .unwrap_or(self.now + last_fire);
        log::info!("reset: ejecting {} nodes", order.len());

        if order.is_empty() && self.pending_restore.is_none() {
            self.speed = saved_speed;
            return;
        }
        self.pending_restore = Some(SpeedRestore {
            at,
            speed: saved_speed,
        });
    }

    fn apply_effects(&mut self, effects: Vec<TimelineEffect>) {
        for effect in effects {
            match effect {
                TimelineEffect::Destroy(id) => {
                    self.destroy(&id);
                }
                TimelineEffect::Throw(id, throw) => {
                    self.timeline.schedule(
                        id,
                        self.now,
                        Motion::Throw {
                            to: throw.to,
                            x_duration: THROW_X_SECS,
                            y_duration: THROW_Y_SECS,
                            scale_to: THROW_SCALE,
                            scale_duration: THROW_Y_SECS,
                        },
                        Completion::Destroy,
                    );
                }
            }
        }
    }

    /// Advances the clock, scheduled actions and physics by `delta_seconds`.
    pub fn step(&mut self, delta_seconds: f32) -> bool {
        let delta_seconds = delta_seconds.max(0.0);
        self.now += f64::from(delta_seconds);

        let effects = self.timeline.advance(self.now, &mut self.nodes);
        self.apply_effects(effects);

        if let Some(restore) = self.pending_restore
            && self.now >= restore.at
        {
            self.speed = restore.speed;
            self.pending_restore = None;
            log::info!("reset finished, speed restored to {}", self.speed);
        }

        let moving = step_physics(
            &mut self.nodes,
            &mut self.scratch,
            &self.field,
            self.boundary,
            self.config.physics,
            delta_seconds * self.speed,
        );
        moving || !self.timeline.is_empty() || self.pending_restore.is_some()
    }
}
