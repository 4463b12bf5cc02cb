use eframe::egui::{Rect, Vec2, vec2};

use super::config::PhysicsConfig;
use super::field::Field;
use super::node::Node;

#[derive(Default)]
pub(super) struct PhysicsScratch {
    forces: Vec<Vec2>,
}

fn separation_direction(delta: Vec2, distance: f32, from: usize, to: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    }
}

fn accumulate_collisions(nodes: &[Node], stiffness: f32, forces: &mut [Vec2]) {
    let node_count = nodes.len();
    for i in 0..node_count {
        if !nodes[i].simulation_enabled() {
            continue;
        }
        for j in (i + 1)..node_count {
            if !nodes[j].simulation_enabled() {
                continue;
            }

            let min_distance = nodes[i].scaled_radius() + nodes[j].scaled_radius();
            if min_distance <= 0.0 {
                continue;
            }

            let delta = nodes[i].position - nodes[j].position;
            let distance_sq = delta.length_sq();
            if distance_sq >= min_distance * min_distance {
                continue;
            }

            let distance = distance_sq.sqrt();
            let direction = separation_direction(delta, distance, i, j);
            let overlap_push = (min_distance - distance) * stiffness;
            forces[i] += direction * overlap_push;
            forces[j] -= direction * overlap_push;
        }
    }
}

fn contain(node: &mut Node, boundary: Rect, restitution: f32) {
    let radius = node.scaled_radius();
    let min_x = boundary.left() + radius;
    let max_x = (boundary.right() - radius).max(min_x);
    let min_y = boundary.top() + radius;
    let max_y = (boundary.bottom() - radius).max(min_y);

    if node.position.x < min_x {
        node.position.x = min_x;
        node.velocity.x = node.velocity.x.abs() * restitution;
    } else if node.position.x > max_x {
        node.position.x = max_x;
        node.velocity.x = -node.velocity.x.abs() * restitution;
    }

    if node.position.y < min_y {
        node.position.y = min_y;
        node.velocity.y = node.velocity.y.abs() * restitution;
    } else if node.position.y > max_y {
        node.position.y = max_y;
        node.velocity.y = -node.velocity.y.abs() * restitution;
    }
}

/// Advances every simulated node by `delta_seconds` (already scaled by the world speed).
/// Returns whether anything is still moving.
pub(super) fn step_physics(
    nodes: &mut [Node],
    scratch: &mut PhysicsScratch,
    field: &Field,
    boundary: Rect,
    config: PhysicsConfig,
    delta_seconds: f32,
) -> bool {
    if nodes.is_empty() || delta_seconds <= 0.0 {
        return false;
    }

    let node_count = nodes.len();
    scratch.forces.clear();
    scratch.forces.resize(node_count, Vec2::ZERO);
    let forces = &mut scratch.forces;

    accumulate_collisions(nodes, config.collision_stiffness, forces);

    let damping_factor = (1.0 - config.linear_damping * delta_seconds).clamp(0.0, 1.0);
    let max_speed_sq = config.max_speed * config.max_speed;
    let mut any_motion = false;

    for (node, collision) in nodes.iter_mut().zip(forces.iter()) {
        if !node.simulation_enabled() {
            continue;
        }

        let field_acceleration = field.acceleration_at(node.position, config.field_gain);
        let drag_impulse = node.take_applied_force() * config.drag_response;

        let mut velocity = node.velocity
            + (field_acceleration + *collision) * delta_seconds
            + drag_impulse;
        velocity *= damping_factor;

        let speed_sq = velocity.length_sq();
        if speed_sq > max_speed_sq {
            velocity *= config.max_speed / speed_sq.sqrt();
        }

        node.velocity = velocity;
        node.position += velocity * delta_seconds;
        contain(node, boundary, config.restitution);

        if node.velocity.length_sq() > 0.000_1 {
            any_motion = true;
        }
    }

    any_motion
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnetic::node::NodeId;
    use eframe::egui::pos2;

    fn node_at(id: &str, x: f32, y: f32) -> Node {
        let mut node = Node::new(NodeId::new(id), id, 10.0);
        node.position = pos2(x, y);
        node
    }

    fn scene_field() -> (Field, Rect) {
        let size = vec2(400.0, 400.0);
        let field = Field::for_size(size, 1.0);
        (field, field.boundary(size))
    }

    #[test]
    fn test_nodes_drift_toward_field() {
        let (field, boundary) = scene_field();
        let mut nodes = vec![node_at("a", 350.0, 200.0)];
        let mut scratch = PhysicsScratch::default();
        for _ in 0..10 {
            step_physics(
                &mut nodes,
                &mut scratch,
                &field,
                boundary,
                PhysicsConfig::default(),
                1.0 / 60.0,
            );
        }
        assert!(nodes[0].position.x < 350.0);
    }

    #[test]
    fn test_overlapping_nodes_separate() {
        let (field, boundary) = scene_field();
        let mut nodes = vec![node_at("a", 195.0, 100.0), node_at("b", 205.0, 100.0)];
        let mut scratch = PhysicsScratch::default();
        let config = PhysicsConfig {
            field_gain: 0.0,
            ..PhysicsConfig::default()
        };
        for _ in 0..30 {
            step_physics(&mut nodes, &mut scratch, &field, boundary, config, 1.0 / 60.0);
        }
        let gap = nodes[0].position.distance(nodes[1].position);
        assert!(gap > 10.0);
        assert!(nodes[0].position.x < nodes[1].position.x);
    }

    #[test]
    fn test_frozen_nodes_do_not_move() {
        let (field, boundary) = scene_field();
        let mut nodes = vec![node_at("a", 350.0, 200.0)];
        nodes[0].mark_removing();
        let mut scratch = PhysicsScratch::default();
        step_physics(
            &mut nodes,
            &mut scratch,
            &field,
            boundary,
            PhysicsConfig::default(),
            1.0 / 60.0,
        );
        assert_eq!(nodes[0].position, pos2(350.0, 200.0));
    }

    #[test]
    fn test_boundary_keeps_nodes_inside() {
        let (field, boundary) = scene_field();
        let mut nodes = vec![node_at("a", 200.0, 395.0)];
        nodes[0].velocity = vec2(0.0, 900.0);
        let mut scratch = PhysicsScratch::default();
        step_physics(
            &mut nodes,
            &mut scratch,
            &field,
            boundary,
            PhysicsConfig::default(),
            1.0 / 60.0,
        );
        assert!(nodes[0].position.y <= 390.0);
        assert!(nodes[0].velocity.y <= 0.0);
    }
}
