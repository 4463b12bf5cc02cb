use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::magnetic::NodeId;

const BUNDLED_DATASET: &str = include_str!("../../data/composers.json");

/// Stable dataset identity; the node id of an entity's bubble carries the same text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn node_id(&self) -> NodeId {
        NodeId::new(self.0.as_str())
    }

    pub fn from_node(node: &NodeId) -> Self {
        Self(node.as_str().to_owned())
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub key: EntityKey,
    pub label: String,
    pub related: Vec<EntityKey>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawEntity {
    #[serde(rename = "shortName")]
    short_name: String,
    #[serde(default)]
    next: Option<Vec<RawEntity>>,
}

/// Flattened dataset: every entity reachable from the top-level list, indexed by key.
#[derive(Clone, Debug)]
pub struct Catalog {
    entities: Vec<Entity>,
    index: HashMap<EntityKey, usize>,
    roots: Vec<EntityKey>,
}

impl Catalog {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DATASET).context("bundled dataset is invalid")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid dataset {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: Vec<RawEntity> =
            serde_json::from_str(raw).context("dataset must be a JSON array of entities")?;
        if parsed.is_empty() {
            bail!("dataset contains no entities");
        }

        let mut catalog = Self {
            entities: Vec::new(),
            index: HashMap::new(),
            roots: Vec::new(),
        };
        for (position, raw_entity) in parsed.iter().enumerate() {
            let key = catalog
                .insert(raw_entity)
                .with_context(|| format!("top-level entity #{position}"))?;
            if !catalog.roots.contains(&key) {
                catalog.roots.push(key);
            }
        }

        log::info!(
            "dataset loaded: {} entities, {} top-level",
            catalog.entities.len(),
            catalog.roots.len()
        );
        Ok(catalog)
    }

    /// Registers `raw` and its related entities. A key seen twice keeps one entry
    /// whose related list is the union of both definitions.
    fn insert(&mut self, raw: &RawEntity) -> Result<EntityKey> {
        let name = raw.short_name.trim();
        if name.is_empty() {
            return Err(anyhow!("entity has a blank shortName"));
        }
        let key = EntityKey::new(name);

        let mut related = Vec::new();
        for child in raw.next.iter().flatten() {
            let child_key = self
                .insert(child)
                .with_context(|| format!("related entity of {name}"))?;
            if child_key != key && !related.contains(&child_key) {
                related.push(child_key);
            }
        }

        match self.index.get(&key) {
            Some(&slot) => {
                let existing = &mut self.entities[slot].related;
                for child_key in related {
                    if !existing.contains(&child_key) {
                        existing.push(child_key);
                    }
                }
            }
            None => {
                self.index.insert(key.clone(), self.entities.len());
                self.entities.push(Entity {
                    key: key.clone(),
                    label: name.to_owned(),
                    related,
                });
            }
        }

        Ok(key)
    }

    pub fn roots(&self) -> &[EntityKey] {
        &self.roots
    }

    pub fn get(&self, key: &EntityKey) -> Option<&Entity> {
        self.index.get(key).map(|&slot| &self.entities[slot])
    }

    pub fn related(&self, key: &EntityKey) -> &[EntityKey] {
        self.get(key).map(|entity| entity.related.as_slice()).unwrap_or(&[])
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
