//! In-process surfaces.
//!
//! `MemorySurface` keeps its classes, data attributes, inline styles and
//! children in memory. Child-list changes made through
//! [`MemorySurface::append_child`] and [`MemorySurface::remove_child`] are
//! queued as [`MutationRecord`]s until [`MemorySurface::take_records`]
//! flushes them, which is how a mutation observer batches changes before
//! delivering them.

use crate::{Document, MutationRecord, NodeKind, Rect, Surface, SurfaceId, SurfaceRef};
use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

pub struct MemorySurface {
    id: SurfaceId,
    kind: NodeKind,
    name: String,
    classes: RefCell<SmallVec<[String; 4]>>,
    data: RefCell<BTreeMap<String, String>>,
    style: RefCell<BTreeMap<String, String>>,
    draggable: Cell<bool>,
    bounds: Cell<Rect>,
    children: RefCell<Vec<SurfaceRef>>,
    pending: RefCell<Vec<MutationRecord>>,
}

impl MemorySurface {
    fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            id: SurfaceId::new(),
            kind,
            name: name.into(),
            classes: RefCell::new(SmallVec::new()),
            data: RefCell::new(BTreeMap::new()),
            style: RefCell::new(BTreeMap::new()),
            draggable: Cell::new(false),
            bounds: Cell::new(Rect::default()),
            children: RefCell::new(Vec::new()),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// An element node with the given tag name.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::new(NodeKind::Element, tag.into().to_uppercase())
    }

    /// A text node.
    pub fn text(content: impl Into<String>) -> Self {
        let surface = Self::new(NodeKind::Text, "#text");
        surface.data.borrow_mut().insert("text".into(), content.into());
        surface
    }

    pub fn with_data(self, key: &str, value: &str) -> Self {
        self.set_data(key, value);
        self
    }

    pub fn with_style(self, property: &str, value: &str) -> Self {
        self.set_style(property, value);
        self
    }

    pub fn with_bounds(self, bounds: Rect) -> Self {
        self.bounds.set(bounds);
        self
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable.get()
    }

    pub fn classes(&self) -> Vec<String> {
        self.classes.borrow().to_vec()
    }

    /// Append `child` and queue a child-list record for it.
    pub fn append_child(&self, child: SurfaceRef) {
        self.children.borrow_mut().push(Rc::clone(&child));
        self.pending.borrow_mut().push(MutationRecord::added(child));
    }

    /// Remove the child with `id`, queueing a record if it was present.
    pub fn remove_child(&self, id: SurfaceId) -> Option<SurfaceRef> {
        let removed = {
            let mut children = self.children.borrow_mut();
            let index = children.iter().position(|child| child.id() == id)?;
            children.remove(index)
        };
        self.pending
            .borrow_mut()
            .push(MutationRecord::removed(Rc::clone(&removed)));
        Some(removed)
    }

    /// Remove every child in one record.
    pub fn clear_children(&self) {
        let removed: Vec<SurfaceRef> = self.children.borrow_mut().drain(..).collect();
        if !removed.is_empty() {
            self.pending
                .borrow_mut()
                .push(MutationRecord::child_list(Vec::new(), removed));
        }
    }

    /// Flush the queued child-list records, oldest first.
    pub fn take_records(&self) -> Vec<MutationRecord> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

impl Surface for MemorySurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn node_name(&self) -> String {
        self.name.clone()
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().iter().any(|c| c == class)
    }

    fn data(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn set_data(&self, key: &str, value: &str) {
        self.data.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn style(&self, property: &str) -> Option<String> {
        self.style
            .borrow()
            .get(property)
            .filter(|value| !value.is_empty())
            .cloned()
    }

    fn set_style(&self, property: &str, value: &str) {
        self.style
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }

    fn remove_style(&self, property: &str) {
        self.style.borrow_mut().remove(property);
    }

    fn set_draggable(&self, draggable: bool) {
        self.draggable.set(draggable);
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get()
    }

    fn children(&self) -> Vec<SurfaceRef> {
        self.children.borrow().clone()
    }
}

/// Id lookup over in-memory surfaces.
#[derive(Default)]
pub struct MemoryDocument {
    elements: RefCell<HashMap<String, SurfaceRef>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, surface: SurfaceRef) {
        self.elements.borrow_mut().insert(id.into(), surface);
    }
}

impl Document for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<SurfaceRef> {
        self.elements.borrow().get(id).cloned()
    }
}
