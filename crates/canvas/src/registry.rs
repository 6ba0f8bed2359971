use crate::Entity;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::rc::Rc;
use surface::SurfaceId;

slotmap::new_key_type! {
    /// Key of a live entity in the canvas registry.
    pub struct EntityId;
}

/// Live entities, keyed both by registry key and by surface, in
/// registration order.
#[derive(Default)]
pub(crate) struct Registry {
    entities: SlotMap<EntityId, Rc<Entity>>,
    by_surface: HashMap<SurfaceId, EntityId>,
    order: Vec<EntityId>,
}

impl Registry {
    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.by_surface.contains_key(&surface)
    }

    pub fn insert(&mut self, entity: Rc<Entity>) -> EntityId {
        let surface = entity.id();
        let key = self.entities.insert(entity);
        self.by_surface.insert(surface, key);
        self.order.push(key);
        key
    }

    pub fn remove(&mut self, surface: SurfaceId) -> Option<Rc<Entity>> {
        let key = self.by_surface.remove(&surface)?;
        self.order.retain(|k| *k != key);
        self.entities.remove(key)
    }

    pub fn get(&self, surface: SurfaceId) -> Option<Rc<Entity>> {
        self.by_surface
            .get(&surface)
            .and_then(|key| self.entities.get(*key))
            .cloned()
    }

    pub fn key_of(&self, surface: SurfaceId) -> Option<EntityId> {
        self.by_surface.get(&surface).copied()
    }

    pub fn by_key(&self, key: EntityId) -> Option<Rc<Entity>> {
        self.entities.get(key).cloned()
    }

    /// Entities in registration order.
    pub fn entities(&self) -> Vec<Rc<Entity>> {
        self.order
            .iter()
            .filter_map(|key| self.entities.get(*key))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CanvasOptions, NoopHooks};
    use surface::MemorySurface;

    fn entity(name: &str) -> Rc<Entity> {
        Rc::new(Entity::new(
            Rc::new(MemorySurface::element("div")),
            name.into(),
            &CanvasOptions::default(),
            Rc::new(NoopHooks),
        ))
    }

    #[test]
    fn keeps_registration_order_across_removal() {
        let mut registry = Registry::default();
        let (a, b, c) = (entity("a"), entity("b"), entity("c"));
        registry.insert(a.clone());
        let key_b = registry.insert(b.clone());
        registry.insert(c.clone());

        assert_eq!(registry.key_of(b.id()), Some(key_b));
        assert!(registry.remove(b.id()).is_some());
        assert!(registry.remove(b.id()).is_none());
        assert!(registry.by_key(key_b).is_none());

        let names: Vec<String> = registry
            .entities()
            .iter()
            .map(|e| e.reference_id().to_string())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(c.id()));
        assert!(Rc::ptr_eq(&registry.get(a.id()).unwrap(), &a));
    }
}
