use eframe::egui::Pos2;

use super::node::NodeId;
use super::scene::Scene;

/// Receives selection transitions as they happen. Callbacks run synchronously
/// inside the gesture handler and may mutate the scene.
pub trait SelectionDelegate {
    fn on_select(&mut self, scene: &mut Scene, node: &NodeId);
    fn on_deselect(&mut self, scene: &mut Scene, node: &NodeId);
}

impl SelectionDelegate for () {
    fn on_select(&mut self, _scene: &mut Scene, _node: &NodeId) {}
    fn on_deselect(&mut self, _scene: &mut Scene, _node: &NodeId) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected(NodeId),
    Deselected(NodeId),
}

/// Records transitions without reacting to them.
impl SelectionDelegate for Vec<SelectionEvent> {
    fn on_select(&mut self, _scene: &mut Scene, node: &NodeId) {
        self.push(SelectionEvent::Selected(node.clone()));
    }

    fn on_deselect(&mut self, _scene: &mut Scene, node: &NodeId) {
        self.push(SelectionEvent::Deselected(node.clone()));
    }
}

impl Scene {
    pub fn pointer_moved(&mut self, location: Pos2, previous: Pos2) {
        if location.distance(previous) == 0.0 {
            return;
        }
        self.is_dragging = true;
        self.move_nodes(location, previous);
    }

    /// A release after a drag only ends the drag; otherwise it is a tap.
    pub fn pointer_released(
        &mut self,
        location: Pos2,
        delegate: &mut dyn SelectionDelegate,
    ) -> Vec<SelectionEvent> {
        let was_dragging = std::mem::replace(&mut self.is_dragging, false);
        if was_dragging {
            return Vec::new();
        }

        let Some(target) = self.node_at(location).map(|node| node.id().clone()) else {
            return Vec::new();
        };
        self.toggle_selection(&target, delegate)
    }

    pub fn pointer_cancelled(&mut self) {
        self.is_dragging = false;
    }

    pub fn toggle_selection(
        &mut self,
        target: &NodeId,
        delegate: &mut dyn SelectionDelegate,
    ) -> Vec<SelectionEvent> {
        let Some(target_selected) = self.node_by_id(target).map(|node| node.is_selected()) else {
            return Vec::new();
        };

        let mut events = Vec::new();
        if target_selected {
            self.deselect(target, delegate, &mut events);
            return events;
        }

        if !self.allows_multiple_selection {
            // Several can be selected if the mode was switched mid-session.
            let previous = self
                .nodes
                .iter()
                .filter(|node| node.is_selected() && node.id() != target)
                .map(|node| node.id().clone())
                .collect::<Vec<_>>();
            for id in previous {
                let still_selected = self.node_by_id(&id).is_some_and(|node| node.is_selected());
                if still_selected {
                    self.deselect(&id, delegate, &mut events);
                }
            }
        }

        // The deselect callback may have removed the target or started shrinking it.
        let Some(node) = self.node_by_id_mut(target).filter(|node| !node.is_removing()) else {
            return events;
        };
        node.set_selected(true);
        events.push(SelectionEvent::Selected(target.clone()));
        delegate.on_select(self, target);
        events
    }

    fn deselect(
        &mut self,
        id: &NodeId,
        delegate: &mut dyn SelectionDelegate,
        events: &mut Vec<SelectionEvent>,
    ) {
        if let Some(node) = self.node_by_id_mut(id) {
            node.set_selected(false);
            events.push(SelectionEvent::Deselected(id.clone()));
            delegate.on_deselect(self, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnetic::config::EngineConfig;
    use crate::magnetic::node::Node;
    use eframe::egui::{pos2, vec2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scene_with(ids: &[&str]) -> Scene {
        let mut scene =
            Scene::with_rng(vec2(800.0, 600.0), EngineConfig::default(), StdRng::seed_from_u64(3));
        for (index, id) in ids.iter().enumerate() {
            scene.add_child(Node::new(NodeId::new(*id), *id, 20.0));
            scene.node_by_id_mut(&NodeId::new(*id)).unwrap().position =
                pos2(100.0 + index as f32 * 100.0, 300.0);
        }
        scene
    }

    fn selected(scene: &Scene) -> Vec<NodeId> {
        scene.selected_nodes()
    }

    #[test]
    fn test_tap_toggles_selection() {
        let mut scene = scene_with(&["a"]);
        let mut log: Vec<SelectionEvent> = Vec::new();

        scene.pointer_released(pos2(100.0, 300.0), &mut log);
        assert_eq!(selected(&scene), vec![NodeId::new("a")]);

        scene.pointer_released(pos2(100.0, 300.0), &mut log);
        assert!(selected(&scene).is_empty());
        assert_eq!(
            log,
            vec![
                SelectionEvent::Selected(NodeId::new("a")),
                SelectionEvent::Deselected(NodeId::new("a")),
            ]
        );
    }

    #[test]
    fn test_single_selection_deselects_previous_first() {
        let mut scene = scene_with(&["a", "b"]);
        scene.allows_multiple_selection = false;
        let mut log: Vec<SelectionEvent> = Vec::new();

        scene.pointer_released(pos2(100.0, 300.0), &mut log);
        let events = scene.pointer_released(pos2(200.0, 300.0), &mut log);

        assert_eq!(
            events,
            vec![
                SelectionEvent::Deselected(NodeId::new("a")),
                SelectionEvent::Selected(NodeId::new("b")),
            ]
        );
        assert_eq!(log.len(), 3);
        assert_eq!(selected(&scene), vec![NodeId::new("b")]);
    }

    #[test]
    fn test_switch_to_single_selection_collapses_on_next_tap() {
        let mut scene = scene_with(&["a", "b", "c"]);
        scene.pointer_released(pos2(100.0, 300.0), &mut ());
        scene.pointer_released(pos2(200.0, 300.0), &mut ());
        scene.allows_multiple_selection = false;
        let mut log: Vec<SelectionEvent> = Vec::new();

        let events = scene.pointer_released(pos2(300.0, 300.0), &mut log);

        assert_eq!(
            events,
            vec![
                SelectionEvent::Deselected(NodeId::new("a")),
                SelectionEvent::Deselected(NodeId::new("b")),
                SelectionEvent::Selected(NodeId::new("c")),
            ]
        );
        assert_eq!(log, events);
        assert_eq!(selected(&scene), vec![NodeId::new("c")]);
    }

    #[test]
    fn test_multiple_selection_keeps_both() {
        let mut scene = scene_with(&["a", "b"]);
        scene.pointer_released(pos2(100.0, 300.0), &mut ());
        scene.pointer_released(pos2(200.0, 300.0), &mut ());
        assert_eq!(selected(&scene), vec![NodeId::new("a"), NodeId::new("b")]);
    }

    #[test]
    fn test_release_after_drag_is_not_a_tap() {
        let mut scene = scene_with(&["a"]);
        let mut log: Vec<SelectionEvent> = Vec::new();

        scene.pointer_moved(pos2(110.0, 300.0), pos2(100.0, 300.0));
        assert!(scene.is_dragging());
        scene.pointer_released(pos2(110.0, 300.0), &mut log);

        assert!(!scene.is_dragging());
        assert!(log.is_empty());
        assert!(selected(&scene).is_empty());
    }

    #[test]
    fn test_zero_delta_move_does_not_start_drag() {
        let mut scene = scene_with(&["a"]);
        scene.pointer_moved(pos2(100.0, 300.0), pos2(100.0, 300.0));
        assert!(!scene.is_dragging());
        assert_eq!(scene.nodes()[0].applied_force(), vec2(0.0, 0.0));
    }

    #[test]
    fn test_cancel_clears_drag_only() {
        let mut scene = scene_with(&["a"]);
        scene.pointer_released(pos2(100.0, 300.0), &mut ());
        scene.pointer_moved(pos2(140.0, 300.0), pos2(100.0, 300.0));
        scene.pointer_cancelled();

        assert!(!scene.is_dragging());
        assert_eq!(selected(&scene), vec![NodeId::new("a")]);
    }

    #[test]
    fn test_tap_on_empty_space_is_ignored() {
        let mut scene = scene_with(&["a"]);
        let events = scene.pointer_released(pos2(700.0, 50.0), &mut ());
        assert!(events.is_empty());
    }
}
