//! Central entity table shared by every tool.

use super::entity::Entity;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Stable handle to a committed entity (or to a draft that will become one).
///
/// Ids are never reused, so a handle to a deleted entity stays dead forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns every committed entity, addressed by [`EntityId`].
///
/// Each tool's collection is an ordered list of ids keyed by the tool's name. Order
/// within a collection is insertion order, which is also draw and export order.
/// Move and delete operate on entities through this table instead of reaching into
/// another tool's state.
#[derive(Debug, Default)]
pub struct EntityStore {
    next_id: u64,
    entities: HashMap<EntityId, Entity>,
    collections: HashMap<String, Vec<EntityId>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a fresh id without storing anything (used for drafts).
    pub fn allocate_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }

    /// Appends an entity under a previously allocated id to `owner`'s collection.
    pub fn commit(&mut self, owner: &str, id: EntityId, entity: Entity) {
        debug!("Committing {:?} {} to '{}'", entity.kind(), id, owner);
        self.entities.insert(id, entity);
        self.collections
            .entry(owner.to_string())
            .or_default()
            .push(id);
    }

    /// Allocates an id and commits the entity in one step.
    pub fn push(&mut self, owner: &str, entity: Entity) -> EntityId {
        let id = self.allocate_id();
        self.commit(owner, id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Ordered ids committed by `owner` (empty if the owner never committed anything).
    pub fn collection(&self, owner: &str) -> &[EntityId] {
        self.collections
            .get(owner)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates `owner`'s entities in collection order.
    pub fn entities_of<'a>(
        &'a self,
        owner: &str,
    ) -> impl Iterator<Item = (EntityId, &'a Entity)> + use<'a> {
        self.collection(owner)
            .iter()
            .filter_map(move |id| self.entities.get(id).map(|entity| (*id, entity)))
    }

    /// Removes the entity at `index` in `owner`'s collection, keeping the order of the rest.
    pub fn remove_at(&mut self, owner: &str, index: usize) -> Option<(EntityId, Entity)> {
        let ids = self.collections.get_mut(owner)?;
        if index >= ids.len() {
            return None;
        }
        let id = ids.remove(index);
        let entity = self.entities.remove(&id)?;
        debug!("Removed {:?} {} from '{}'", entity.kind(), id, owner);
        Some((id, entity))
    }

    /// Number of entities in `owner`'s collection.
    pub fn len_of(&self, owner: &str) -> usize {
        self.collection(owner).len()
    }

    /// Total number of committed entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Empties every collection. Id allocation continues where it left off.
    pub fn clear(&mut self) {
        self.entities.clear();
        for ids in self.collections.values_mut() {
            ids.clear();
        }
    }

    /// Drops `owner`'s collection along with its entities.
    pub fn drop_collection(&mut self, owner: &str) {
        if let Some(ids) = self.collections.remove(owner) {
            for id in ids {
                self.entities.remove(&id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::entity::TextEntity;
    use crate::draw::style::StyleDefaults;
    use crate::geodesy::LatLng;

    fn label(text: &str) -> Entity {
        Entity::Text(TextEntity {
            position: LatLng::new(0.0, 0.0),
            text: text.to_string(),
            style: StyleDefaults::default().text,
        })
    }

    fn texts(store: &EntityStore, owner: &str) -> Vec<String> {
        store
            .entities_of(owner)
            .filter_map(|(_, e)| match e {
                Entity::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn remove_at_preserves_relative_order() {
        let mut store = EntityStore::new();
        for name in ["a", "b", "c", "d"] {
            store.push("text", label(name));
        }
        let (_, removed) = store.remove_at("text", 1).expect("index exists");
        assert_eq!(removed, label("b"));
        assert_eq!(texts(&store, "text"), ["a", "c", "d"]);
        assert!(store.remove_at("text", 10).is_none());
        assert!(store.remove_at("missing", 0).is_none());
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut store = EntityStore::new();
        let first = store.push("text", label("a"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len_of("text"), 0);
        let second = store.push("text", label("b"));
        assert_ne!(first, second);
        assert!(!store.contains(first));
    }

    #[test]
    fn collections_are_isolated_per_owner() {
        let mut store = EntityStore::new();
        store.push("left", label("l"));
        store.push("right", label("r"));
        assert_eq!(texts(&store, "left"), ["l"]);
        store.drop_collection("left");
        assert_eq!(store.len(), 1);
        assert_eq!(texts(&store, "right"), ["r"]);
    }
}
