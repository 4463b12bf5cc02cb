use eframe::egui::Pos2;

use crate::util::{ease_in_quad, ease_out_quad, lerp};

use super::node::{Node, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => ease_in_quad(t),
            Self::EaseOut => ease_out_quad(t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    Scale {
        to: f32,
        duration: f64,
        easing: Easing,
    },
    /// Reset ejection: x and y reach `to` on separate clocks while shrinking.
    Throw {
        to: Pos2,
        x_duration: f64,
        y_duration: f64,
        scale_to: f32,
        scale_duration: f64,
    },
    /// Destroys the node if it is unselected when fired, otherwise throws it.
    Eject { throw: ThrowTarget },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowTarget {
    pub to: Pos2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Keep,
    Destroy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct StartState {
    position: Pos2,
    scale: f32,
}

#[derive(Clone, Debug)]
pub struct ScheduledAction {
    node: NodeId,
    start_at: f64,
    motion: Motion,
    completion: Completion,
    started: Option<StartState>,
}

impl ScheduledAction {
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    pub fn start_at(&self) -> f64 {
        self.start_at
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    fn duration(&self) -> f64 {
        match self.motion {
            Motion::Scale { duration, .. } => duration,
            Motion::Throw {
                x_duration,
                y_duration,
                scale_duration,
                ..
            } => x_duration.max(y_duration).max(scale_duration),
            Motion::Eject { .. } => 0.0,
        }
    }

    fn progress(elapsed: f64, duration: f64) -> f32 {
        if duration <= 0.0 {
            1.0
        } else {
            (elapsed / duration).clamp(0.0, 1.0) as f32
        }
    }

    /// Applies the action at `now`. Returns true once it has run to completion.
    fn apply(&mut self, node: &mut Node, now: f64) -> bool {
        let start = *self.started.get_or_insert(StartState {
            position: node.position,
            scale: node.scale,
        });
        let elapsed = now - self.start_at;

        match self.motion {
            Motion::Scale { to, duration, easing } => {
                let t = easing.apply(Self::progress(elapsed, duration));
                node.scale = lerp(start.scale, to, t);
            }
            Motion::Throw {
                to,
                x_duration,
                y_duration,
                scale_to,
                scale_duration,
            } => {
                let tx = Self::progress(elapsed, x_duration);
                let ty = Self::progress(elapsed, y_duration);
                node.position.x = lerp(start.position.x, to.x, tx);
                node.position.y = lerp(start.position.y, to.y, ty);
                node.scale = lerp(start.scale, scale_to, Self::progress(elapsed, scale_duration));
            }
            Motion::Eject { .. } => {}
        }

        elapsed >= self.duration()
    }
}

/// What the scene must do after the timeline advanced.
#[derive(Clone, Debug, PartialEq)]
pub enum TimelineEffect {
    Destroy(NodeId),
    /// An `Eject` fired for a selected node; the scene schedules the throw.
    Throw(NodeId, ThrowTarget),
}

/// Per-node scheduled animations, advanced by the scene clock.
#[derive(Default)]
pub struct Timeline {
    actions: Vec<ScheduledAction>,
}

impl Timeline {
    pub fn schedule(
        &mut self,
        node: NodeId,
        start_at: f64,
        motion: Motion,
        completion: Completion,
    ) {
        self.actions.push(ScheduledAction {
            node,
            start_at,
            motion,
            completion,
            started: None,
        });
    }

    pub fn cancel_for(&mut self, node: &NodeId) -> usize {
        let before = self.actions.len();
        self.actions.retain(|action| &action.node != node);
        before - self.actions.len()
    }

    pub fn actions_for<'a, 'n>(
        &'a self,
        node: &'n NodeId,
    ) -> impl Iterator<Item = &'a ScheduledAction> + use<'a, 'n> {
        self.actions.iter().filter(move |action| &action.node == node)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Runs every action whose start time has been reached. Actions for nodes that
    /// no longer exist are dropped.
    pub fn advance(&mut self, now: f64, nodes: &mut [Node]) -> Vec<TimelineEffect> {
        let mut effects = Vec::new();

        self.actions.retain_mut(|action| {
            if now < action.start_at {
                return true;
            }

            let Some(node) = nodes.iter_mut().find(|node| node.id() == &action.node) else {
                return false;
            };

            if let Motion::Eject { throw } = action.motion {
                if node.is_selected() {
                    effects.push(TimelineEffect::Throw(action.node.clone(), throw));
                } else {
                    effects.push(TimelineEffect::Destroy(action.node.clone()));
                }
                return false;
            }

            let finished = action.apply(node, now);
            if finished && action.completion == Completion::Destroy {
                effects.push(TimelineEffect::Destroy(action.node.clone()));
            }
            !finished
        });

        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    fn node(id: &str) -> Node {
        Node::new(NodeId::new(id), id, 10.0)
    }

    #[test]
    fn test_scale_waits_for_start_time() {
        let mut nodes = vec![node("a")];
        nodes[0].scale = 0.0;
        let mut timeline = Timeline::default();
        timeline.schedule(
            NodeId::new("a"),
            0.2,
            Motion::Scale {
                to: 1.0,
                duration: 0.4,
                easing: Easing::EaseOut,
            },
            Completion::Keep,
        );

        timeline.advance(0.1, &mut nodes);
        assert_eq!(nodes[0].scale, 0.0);

        timeline.advance(0.4, &mut nodes);
        assert!(nodes[0].scale > 0.5 && nodes[0].scale < 1.0);

        let effects = timeline.advance(0.7, &mut nodes);
        assert!(effects.is_empty());
        assert_eq!(nodes[0].scale, 1.0);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_destroy_completion_reports_node() {
        let mut nodes = vec![node("a")];
        let mut timeline = Timeline::default();
        timeline.schedule(
            NodeId::new("a"),
            0.0,
            Motion::Scale {
                to: 0.0,
                duration: 0.4,
                easing: Easing::EaseIn,
            },
            Completion::Destroy,
        );

        assert!(timeline.advance(0.2, &mut nodes).is_empty());
        assert_eq!(
            timeline.advance(0.4, &mut nodes),
            vec![TimelineEffect::Destroy(NodeId::new("a"))]
        );
    }

    #[test]
    fn test_cancel_drops_pending_actions() {
        let mut timeline = Timeline::default();
        let id = NodeId::new("a");
        let motion = Motion::Scale {
            to: 1.0,
            duration: 0.4,
            easing: Easing::Linear,
        };
        timeline.schedule(id.clone(), 0.0, motion, Completion::Keep);
        timeline.schedule(id.clone(), 1.0, motion, Completion::Destroy);
        timeline.schedule(NodeId::new("b"), 0.0, motion, Completion::Keep);

        assert_eq!(timeline.cancel_for(&id), 2);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.actions_for(&id).count(), 0);
    }

    #[test]
    fn test_throw_moves_on_independent_clocks() {
        let mut nodes = vec![node("a")];
        nodes[0].position = pos2(0.0, 0.0);
        let mut timeline = Timeline::default();
        timeline.schedule(
            NodeId::new("a"),
            0.0,
            Motion::Throw {
                to: pos2(100.0, 200.0),
                x_duration: 0.2,
                y_duration: 0.4,
                scale_to: 0.3,
                scale_duration: 0.4,
            },
            Completion::Destroy,
        );

        timeline.advance(0.0, &mut nodes);
        timeline.advance(0.2, &mut nodes);
        assert_eq!(nodes[0].position.x, 100.0);
        assert_eq!(nodes[0].position.y, 100.0);

        let effects = timeline.advance(0.4, &mut nodes);
        assert_eq!(nodes[0].position, pos2(100.0, 200.0));
        assert!((nodes[0].scale - 0.3).abs() < 1e-6);
        assert_eq!(effects, vec![TimelineEffect::Destroy(NodeId::new("a"))]);
    }

    #[test]
    fn test_action_lookup_outlives_temporary_id() {
        let mut timeline = Timeline::default();
        timeline.schedule(
            NodeId::new("a"),
            1.5,
            Motion::Scale {
                to: 1.0,
                duration: 0.4,
                easing: Easing::EaseOut,
            },
            Completion::Keep,
        );

        let action = timeline.actions_for(&NodeId::new("a")).next().unwrap();
        assert_eq!(action.start_at(), 1.5);
        assert_eq!(action.node(), &NodeId::new("a"));
    }
}
