//! Entity-component scene store
//!
//! A data-oriented registry: entities are generational keys into a slot map,
//! components live in secondary maps keyed by entity. The render backend and
//! application code consume it only through create/destroy/query operations.

pub mod components;

pub use components::{Id, Name, Transform};

use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Opaque entity handle
    pub struct Entity;
}

/// The scene: all live entities and their components.
#[derive(Default)]
pub struct Scene {
    entities: SlotMap<Entity, ()>,
    ids: SecondaryMap<Entity, Id>,
    names: SecondaryMap<Entity, Name>,
    transforms: SecondaryMap<Entity, Transform>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with identity, name and default transform attached.
    pub fn create(&mut self, name: &str) -> Entity {
        let entity = self.entities.insert(());
        self.ids.insert(entity, Id::new());
        self.names.insert(entity, Name::new(name));
        self.transforms.insert(entity, Transform::default());
        entity
    }

    /// Destroy an entity and all of its components.
    ///
    /// Destroying an already-destroyed entity is a no-op.
    pub fn destroy(&mut self, entity: Entity) {
        if self.entities.remove(entity).is_some() {
            self.ids.remove(entity);
            self.names.remove(entity);
            self.transforms.remove(entity);
        }
    }

    /// Whether the entity is still alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the scene holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The stable identity of an entity.
    pub fn id(&self, entity: Entity) -> Option<Id> {
        self.ids.get(entity).copied()
    }

    /// The name of an entity.
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.names.get(entity).map(|n| n.0.as_str())
    }

    /// The transform of an entity.
    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.transforms.get(entity)
    }

    /// Mutable access to the transform of an entity.
    pub fn transform_mut(&mut self, entity: Entity) -> Option<&mut Transform> {
        self.transforms.get_mut(entity)
    }

    /// An entity with the given name, when one exists.
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.names
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    /// Entity with the given identity.
    pub fn find_by_id(&self, id: Id) -> Option<Entity> {
        self.ids
            .iter()
            .find(|(_, i)| **i == id)
            .map(|(entity, _)| entity)
    }

    /// Iterator over all live entities.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Iterator over all entities with their transforms.
    pub fn iter_transforms(&self) -> impl Iterator<Item = (Entity, &Transform)> {
        self.transforms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_attaches_default_components() {
        let mut scene = Scene::new();
        let entity = scene.create("Camera");

        assert!(scene.is_alive(entity));
        assert_eq!(scene.name(entity), Some("Camera"));
        assert!(scene.id(entity).is_some());
        assert_eq!(scene.transform(entity), Some(&Transform::default()));
    }

    #[test]
    fn destroy_removes_entity_and_components() {
        let mut scene = Scene::new();
        let entity = scene.create("Doomed");
        scene.destroy(entity);

        assert!(!scene.is_alive(entity));
        assert_eq!(scene.name(entity), None);
        assert_eq!(scene.transform(entity), None);
        assert!(scene.is_empty());

        // Double destroy must not fault.
        scene.destroy(entity);
    }

    #[test]
    fn stale_handles_do_not_resolve_to_new_entities() {
        let mut scene = Scene::new();
        let first = scene.create("First");
        scene.destroy(first);
        let _second = scene.create("Second");

        assert!(!scene.is_alive(first));
        assert_eq!(scene.name(first), None);
    }

    #[test]
    fn find_by_name_and_id() {
        let mut scene = Scene::new();
        let a = scene.create("A");
        let b = scene.create("B");
        let id_b = scene.id(b).expect("entity has id");

        assert_eq!(scene.find_by_name("A"), Some(a));
        assert_eq!(scene.find_by_name("C"), None);
        assert_eq!(scene.find_by_id(id_b), Some(b));
    }

    #[test]
    fn transform_mutation_is_visible_through_queries() {
        let mut scene = Scene::new();
        let entity = scene.create("Mover");
        scene
            .transform_mut(entity)
            .expect("live entity has transform")
            .translation
            .x = 5.0;

        let transforms: Vec<_> = scene.iter_transforms().collect();
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[0].1.translation.x, 5.0);
    }
}
