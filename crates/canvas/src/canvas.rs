use crate::registry::{EntityId, Registry};
use crate::{
    CanvasOptions, DeviceId, ElasticElement, Entity, EntityHooks, Error, IdGenerator, NoopHooks,
    RandomIds, Result,
};
use reactive::{Observable, Subject};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use surface::{ChildSetListener, MutationRecord, Rect, SurfaceId, SurfaceRef, ViewportPoint};

/// Keyboard modifiers held during a pointer-down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

/// Whether the host should keep bubbling an event after the canvas handled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// What the host should do with an event after the canvas handled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub propagation: Propagation,
}

/// Configures and builds a [`Canvas`].
pub struct CanvasBuilder {
    container: SurfaceRef,
    options: CanvasOptions,
    ids: Option<Rc<dyn IdGenerator>>,
    hooks: Rc<dyn EntityHooks>,
}

impl CanvasBuilder {
    pub fn options(mut self, options: CanvasOptions) -> Self {
        self.options = options;
        self
    }

    pub fn ids(mut self, ids: Rc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn hooks(mut self, hooks: Rc<dyn EntityHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Build the canvas and register the container's current children.
    ///
    /// Fails if the container is not an element.
    pub fn build(self) -> Result<Canvas> {
        if !self.container.is_element() {
            return Err(Error::NotAnElement(self.container.id()));
        }
        log::debug!("Canvas creating on {}", self.container.node_name());

        let ids: Rc<dyn IdGenerator> = match self.ids {
            Some(ids) => ids,
            None => Rc::new(RandomIds::new(DeviceId::generate())),
        };
        let inner = Rc::new(CanvasInner {
            element: ElasticElement::new(self.container),
            options: self.options,
            ids,
            hooks: self.hooks,
            registry: RefCell::new(Registry::default()),
            selected: Subject::new(Vec::new()),
            marked: RefCell::new(Vec::new()),
            generation: Cell::new(0),
            children: Subject::new(Vec::new()),
        });

        let weak = Rc::downgrade(&inner);
        inner
            .children
            .as_observable()
            .subscribe(move |records: &Vec<MutationRecord>| {
                if let Some(inner) = weak.upgrade() {
                    for record in records {
                        record.dispatch(&*inner);
                    }
                }
            });

        log::debug!("registering children");
        for child in inner.element.surface().children() {
            inner.on_child_added(&child);
        }

        Ok(Canvas { inner })
    }
}

/// The container that turns its direct element children into entities and
/// owns the selection.
///
/// Every direct element child of the container corresponds to exactly one
/// live [`Entity`] once the host has delivered the child-list changes that
/// produced it, and the selected marker class is present exactly on the
/// entities in [`Canvas::selected_entities`].
pub struct Canvas {
    inner: Rc<CanvasInner>,
}

struct CanvasInner {
    element: ElasticElement,
    options: CanvasOptions,
    ids: Rc<dyn IdGenerator>,
    hooks: Rc<dyn EntityHooks>,
    registry: RefCell<Registry>,
    selected: Subject<Vec<Rc<Entity>>>,
    /// Entities carrying the selected class and a select notification.
    marked: RefCell<Vec<Rc<Entity>>>,
    /// Bumped by every selection transition.
    generation: Cell<u64>,
    children: Subject<Vec<MutationRecord>>,
}

impl Canvas {
    pub fn builder(container: SurfaceRef) -> CanvasBuilder {
        CanvasBuilder {
            container,
            options: CanvasOptions::default(),
            ids: None,
            hooks: Rc::new(NoopHooks),
        }
    }

    /// A canvas with default options, random ids and no-op hooks.
    pub fn new(container: SurfaceRef) -> Result<Self> {
        Self::builder(container).build()
    }

    /// The container, wrapped as an elastic element.
    pub fn element(&self) -> &ElasticElement {
        &self.inner.element
    }

    pub fn container(&self) -> &SurfaceRef {
        self.inner.element.surface()
    }

    pub fn options(&self) -> &CanvasOptions {
        &self.inner.options
    }

    /// The current selection, replaced wholesale on every change.
    pub fn selected_entities(&self) -> Observable<Vec<Rc<Entity>>> {
        self.inner.selected.as_observable()
    }

    /// Live entities in registration order.
    pub fn entities(&self) -> Vec<Rc<Entity>> {
        self.inner.registry.borrow().entities()
    }

    pub fn entity(&self, surface: SurfaceId) -> Option<Rc<Entity>> {
        self.inner.registry.borrow().get(surface)
    }

    pub fn entity_key(&self, surface: SurfaceId) -> Option<EntityId> {
        self.inner.registry.borrow().key_of(surface)
    }

    pub fn entity_by_key(&self, key: EntityId) -> Option<Rc<Entity>> {
        self.inner.registry.borrow().by_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver a batch of child-list changes, in the order observed.
    pub fn handle_mutations(&self, records: Vec<MutationRecord>) {
        self.inner.children.next(records);
    }

    // === Selection ===

    /// Replace the selection with `entities`.
    pub fn select(&self, entities: Vec<Rc<Entity>>) {
        self.inner.select(entities);
    }

    /// Append `entity` to the selection. Selecting twice lists it twice.
    pub fn add_select(&self, entity: &Rc<Entity>) {
        self.inner.add_select(entity);
    }

    /// Drop `entity` from the selection. Not-selected entities are ignored.
    pub fn deselect(&self, entity: &Rc<Entity>) {
        self.inner.deselect(entity);
    }

    pub fn deselect_all(&self) {
        self.inner.select(Vec::new());
    }

    // === Host events ===

    /// Pointer-down with its bubbling path, innermost surface first.
    ///
    /// The first registered entity on the path handles the event and stops
    /// propagation: shift adds it to the selection, ctrl removes it, no
    /// modifier selects only it. Reaching the container instead clears the
    /// selection.
    pub fn on_pointer_down(&self, path: &[SurfaceId], modifiers: Modifiers) -> Propagation {
        let container = self.container().id();
        for id in path {
            let entity = self.entity(*id);
            if let Some(entity) = entity {
                log::debug!("mousedown on {}", entity.reference_id());
                if modifiers.shift {
                    self.add_select(&entity);
                } else if modifiers.ctrl {
                    self.deselect(&entity);
                } else {
                    self.select(vec![entity]);
                }
                return Propagation::Stop;
            }
            if *id == container {
                log::debug!("canvas mousedown");
                self.deselect_all();
                break;
            }
        }
        Propagation::Continue
    }

    /// Returns false when `target` is not a live entity.
    pub fn on_drag_start(&self, target: SurfaceId, pointer: ViewportPoint) -> bool {
        self.with_entity(target, |entity| entity.begin_drag(pointer))
    }

    pub fn on_drag(&self, target: SurfaceId, pointer: ViewportPoint) -> bool {
        self.with_entity(target, |entity| entity.drag_to(pointer))
    }

    pub fn on_drag_end(&self, target: SurfaceId) -> bool {
        self.with_entity(target, |entity| entity.end_drag())
    }

    /// Drag-over on the container: the host must prevent the default and
    /// stop propagation so the canvas stays a valid drop target.
    pub fn on_drag_over(&self) -> EventResponse {
        log::trace!("Canvas: drag over");
        EventResponse {
            prevent_default: true,
            propagation: Propagation::Stop,
        }
    }

    /// A rendered-box change reported by the host for the container or an entity.
    pub fn on_resize(&self, target: SurfaceId, bounds: Rect) -> bool {
        if target == self.container().id() {
            self.inner.element.observe_resize(bounds);
            return true;
        }
        self.with_entity(target, |entity| entity.observe_resize(bounds))
    }

    fn with_entity(&self, target: SurfaceId, f: impl FnOnce(&Entity)) -> bool {
        match self.entity(target) {
            Some(entity) => {
                f(&entity);
                true
            }
            None => {
                log::trace!("no entity for {}, event dropped", target);
                false
            }
        }
    }
}

impl ChildSetListener for Canvas {
    fn on_child_added(&self, node: &SurfaceRef) {
        self.inner.on_child_added(node);
    }

    fn on_child_removed(&self, node: &SurfaceRef) {
        self.inner.on_child_removed(node);
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("container", &self.container().id())
            .field("entities", &self.len())
            .field("selected", &self.inner.selected.get_value().len())
            .finish()
    }
}

impl CanvasInner {
    fn select(&self, entities: Vec<Rc<Entity>>) {
        log::debug!("selecting {} entities", entities.len());
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let previous = std::mem::take(&mut *self.marked.borrow_mut());
        for entity in previous {
            entity.surface().remove_class(&self.options.selected_class);
            entity.deselect();
        }

        self.selected.next(entities.clone());

        // A subscriber selected again during delivery; its transition owns the markers.
        if self.generation.get() != generation {
            log::debug!("selection replaced during delivery");
            return;
        }

        for entity in &entities {
            entity.surface().add_class(&self.options.selected_class);
        }
        *self.marked.borrow_mut() = entities.clone();
        for entity in &entities {
            entity.select();
        }
    }

    fn add_select(&self, entity: &Rc<Entity>) {
        let mut entities = self.selected.get_value();
        entities.push(Rc::clone(entity));
        self.select(entities);
    }

    fn deselect(&self, entity: &Rc<Entity>) {
        let entities = self
            .selected
            .get_value()
            .into_iter()
            .filter(|e| !Rc::ptr_eq(e, entity))
            .collect();
        self.select(entities);
    }
}

impl ChildSetListener for CanvasInner {
    fn on_child_added(&self, node: &SurfaceRef) {
        log::debug!("Canvas: registering child {}", node.node_name());
        if !node.is_element() {
            return;
        }
        if self.registry.borrow().contains(node.id()) {
            log::debug!("Canvas: {} is already registered", node.id());
            return;
        }

        let entity = Entity::new(
            Rc::clone(node),
            self.ids.generate(),
            &self.options,
            Rc::clone(&self.hooks),
        );
        self.registry.borrow_mut().insert(Rc::new(entity));
    }

    fn on_child_removed(&self, node: &SurfaceRef) {
        log::debug!("Canvas: unregistering child {}", node.node_name());
        if !node.is_element() {
            return;
        }
        node.remove_class(&self.options.entity_class);

        let Some(entity) = self.registry.borrow_mut().remove(node.id()) else {
            return;
        };
        if entity.is_dragging() {
            entity.end_drag();
        }
        if self
            .selected
            .get_value()
            .iter()
            .any(|e| Rc::ptr_eq(e, &entity))
        {
            self.deselect(&entity);
        }
    }
}
