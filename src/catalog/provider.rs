use std::collections::HashSet;

use crate::magnetic::{EngineConfig, Node, NodeId, Scene, SelectionDelegate};

use super::entity::{Catalog, EntityKey};

/// Owns the on-screen and selected bookkeeping and turns selection changes into
/// scene insertions and removals.
pub struct CatalogProvider {
    catalog: Catalog,
    on_screen: HashSet<EntityKey>,
    selected: HashSet<EntityKey>,
    config: EngineConfig,
}

impl CatalogProvider {
    pub fn new(catalog: Catalog, config: &EngineConfig) -> Self {
        Self {
            catalog,
            on_screen: HashSet::new(),
            selected: HashSet::new(),
            config: *config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn on_screen(&self) -> &HashSet<EntityKey> {
        &self.on_screen
    }

    pub fn selected(&self) -> &HashSet<EntityKey> {
        &self.selected
    }

    pub fn is_on_screen(&self, key: &EntityKey) -> bool {
        self.on_screen.contains(key)
    }

    fn node_for(&self, key: &EntityKey) -> Node {
        let label = self
            .catalog
            .get(key)
            .map(|entity| entity.label.clone())
            .unwrap_or_else(|| key.to_string());
        Node::new(key.node_id(), label, self.config.node_radius)
    }

    /// Floats every top-level entity that is not already on screen into the scene.
    pub fn populate(&mut self, scene: &mut Scene) -> usize {
        let roots = self.catalog.roots().to_vec();
        roots
            .iter()
            .filter(|key| self.add_entity(scene, key))
            .count()
    }

    pub fn add_entity(&mut self, scene: &mut Scene, key: &EntityKey) -> bool {
        if self.on_screen.contains(key) || self.catalog.get(key).is_none() {
            return false;
        }
        if !scene.add_child(self.node_for(key)) {
            return false;
        }
        self.on_screen.insert(key.clone());
        true
    }

    /// Ejects everything and forgets the bookkeeping.
    pub fn reset(&mut self, scene: &mut Scene) {
        scene.reset();
        self.on_screen.clear();
        self.selected.clear();
    }

    fn correlate(&self, node: &NodeId) -> Option<EntityKey> {
        let key = EntityKey::from_node(node);
        if self.on_screen.contains(&key) && self.catalog.get(&key).is_some() {
            Some(key)
        } else {
            log::debug!("no on-screen entity for node {node}, skipping expansion bookkeeping");
            None
        }
    }

    fn expand(&mut self, scene: &mut Scene, key: &EntityKey, origin: &NodeId) {
        let fresh = self
            .catalog
            .related(key)
            .iter()
            .filter(|candidate| !self.on_screen.contains(*candidate))
            .cloned()
            .collect::<Vec<_>>();
        if fresh.is_empty() {
            return;
        }

        let nodes = fresh.iter().map(|candidate| self.node_for(candidate)).collect();
        let accepted = scene.add_children(
            nodes,
            origin,
            self.config.insert_delay,
            self.config.insert_duration,
        );
        if accepted.len() < fresh.len() {
            log::warn!(
                "expanded {key}: scene rejected {} of {} related entities",
                fresh.len() - accepted.len(),
                fresh.len()
            );
        }
        self.on_screen.extend(accepted.iter().map(EntityKey::from_node));
        log::info!("expanded {key}: {} related entities", accepted.len());
    }

    fn contract(&mut self, scene: &mut Scene, key: &EntityKey) {
        let still_required = self
            .selected
            .iter()
            .flat_map(|other| self.catalog.related(other).iter().chain(std::iter::once(other)))
            .cloned()
            .collect::<HashSet<_>>();

        let leaving = self
            .catalog
            .related(key)
            .iter()
            .filter(|candidate| self.on_screen.contains(*candidate))
            .filter(|candidate| !still_required.contains(*candidate))
            .cloned()
            .collect::<Vec<_>>();
        if leaving.is_empty() {
            return;
        }

        for candidate in &leaving {
            self.on_screen.remove(candidate);
        }
        let ids = leaving.iter().map(EntityKey::node_id).collect::<Vec<_>>();
        scene.remove_children(&ids, self.config.remove_delay, self.config.remove_duration);
        log::info!("contracted {key}: {} related entities", leaving.len());
    }
}

impl SelectionDelegate for CatalogProvider {
    fn on_select(&mut self, scene: &mut Scene, node: &NodeId) {
        let Some(key) = self.correlate(node) else {
            return;
        };
        self.selected.insert(key.clone());
        self.expand(scene, &key, node);
    }

    fn on_deselect(&mut self, scene: &mut Scene, node: &NodeId) {
        let Some(key) = self.correlate(node) else {
            return;
        };
        self.selected.remove(&key);
        self.contract(scene, &key);
    }
}
