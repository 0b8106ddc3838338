use crate::api::types::{EntityId, SceneId};
use crate::components::entity::Entity;

/// Simple entity storage using a flat Vec.
/// Designed for small entity counts (a level holds tens of drawn shapes).
pub struct Scene {
    id: SceneId,
    entities: Vec<Entity>,
    next_id: u32,
}

impl Scene {
    pub fn new(id: SceneId) -> Self {
        Self {
            id,
            entities: Vec::with_capacity(64),
            next_id: 1,
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity to the scene.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity by ID. Returns the removed entity if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    /// Remove every entity with the given label, returning them.
    pub fn despawn_labelled(&mut self, label: &str) -> Vec<Entity> {
        let (removed, kept) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.label == label);
        self.entities = kept;
        removed
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Find all entities with the given label.
    pub fn find_all_by_label(&self, label: &str) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.label == label).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
