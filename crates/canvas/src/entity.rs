use crate::persist::{decode_position, parse_pixels, POSITION_KEY};
use crate::{CanvasOptions, ElasticElement};
use reactive::Observable;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use surface::{Coordinate, Rect, SurfaceId, SurfaceRef, ViewportPoint};

/// Reactions to an entity entering or leaving the selection.
///
/// The canvas has already updated the selected marker class when these run.
pub trait EntityHooks {
    fn on_select(&self, entity: &Entity) {
        log::trace!("entity {} selected", entity.reference_id());
    }

    fn on_deselect(&self, entity: &Entity) {
        log::trace!("entity {} deselected", entity.reference_id());
    }
}

/// Hooks that do nothing beyond tracing.
pub struct NoopHooks;

impl EntityHooks for NoopHooks {}

/// Reference pair captured when a drag starts.
#[derive(Clone, Copy, Debug)]
struct DragOrigin {
    pointer: ViewportPoint,
    position: Coordinate,
}

/// A draggable, selectable child of the canvas.
pub struct Entity {
    reference_id: String,
    element: ElasticElement,
    hooks: Rc<dyn EntityHooks>,
    dragging_class: String,
    drag: Cell<Option<DragOrigin>>,
}

impl Entity {
    /// Wrap `surface`, restoring any persisted or legacy position.
    ///
    /// The restore never fails: unreadable values are logged and the entity
    /// stays at the origin.
    pub fn new(
        surface: SurfaceRef,
        reference_id: String,
        options: &CanvasOptions,
        hooks: Rc<dyn EntityHooks>,
    ) -> Self {
        let element = ElasticElement::new(surface);
        let surface = element.surface();
        surface.add_class(&options.entity_class);

        if let Some(position) = restored_position(surface) {
            element.move_to(position.x(), position.y());
        }
        surface.remove_style("top");
        surface.remove_style("left");
        surface.set_draggable(true);

        Self {
            reference_id,
            element,
            hooks,
            dragging_class: options.dragging_class.clone(),
            drag: Cell::new(None),
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.element.surface().id()
    }

    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    pub fn surface(&self) -> &SurfaceRef {
        self.element.surface()
    }

    pub fn position(&self) -> Observable<Coordinate> {
        self.element.position()
    }

    pub fn resize(&self) -> Observable<Rect> {
        self.element.resize()
    }

    pub fn move_to(&self, x: f64, y: f64) {
        self.element.move_to(x, y);
    }

    pub fn move_by(&self, dx: f64, dy: f64) {
        self.element.move_by(dx, dy);
    }

    pub fn observe_resize(&self, bounds: Rect) {
        self.element.observe_resize(bounds);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.get().is_some()
    }

    /// Capture the pointer and the current position as the drag reference.
    pub fn begin_drag(&self, pointer: ViewportPoint) {
        self.surface().add_class(&self.dragging_class);
        self.drag.set(Some(DragOrigin {
            pointer,
            position: self.position().get_value(),
        }));
    }

    /// Move to the drag-start position offset by how far the pointer has
    /// travelled since drag start. Ignored outside a drag.
    pub fn drag_to(&self, pointer: ViewportPoint) {
        let Some(origin) = self.drag.get() else {
            log::trace!("entity {}: drag without drag start", self.reference_id);
            return;
        };
        let target = origin.position + (pointer - origin.pointer);
        self.move_to(target.x(), target.y());
    }

    pub fn end_drag(&self) {
        self.surface().remove_class(&self.dragging_class);
        self.drag.set(None);
    }

    pub fn select(&self) {
        self.hooks.on_select(self);
    }

    pub fn deselect(&self) {
        self.hooks.on_deselect(self);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id())
            .field("reference_id", &self.reference_id)
            .field("position", &self.position().get_value())
            .finish()
    }
}

/// Position to restore on construction: the persisted attribute if present,
/// otherwise legacy `left`/`top` pixel offsets when both are set.
fn restored_position(surface: &SurfaceRef) -> Option<Coordinate> {
    if let Some(text) = surface.data(POSITION_KEY) {
        return match decode_position(&text) {
            Ok(position) => Some(position),
            Err(err) => {
                log::warn!("{}: ignoring persisted position: {}", surface.node_name(), err);
                None
            }
        };
    }

    let left = surface.style("left")?;
    let top = surface.style("top")?;
    match (parse_pixels(&left), parse_pixels(&top)) {
        (Some(x), Some(y)) => Some(Coordinate::new(x, y)),
        _ => {
            log::warn!(
                "{}: ignoring legacy offsets left={:?} top={:?}",
                surface.node_name(),
                left,
                top
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use surface::{MemorySurface, Surface};

    fn entity_over(surface: MemorySurface) -> (Rc<MemorySurface>, Entity) {
        let surface = Rc::new(surface);
        let entity = Entity::new(
            surface.clone(),
            "ref".into(),
            &CanvasOptions::default(),
            Rc::new(NoopHooks),
        );
        (surface, entity)
    }

    #[test]
    fn construction_tags_and_enables_dragging() {
        let (surface, entity) = entity_over(MemorySurface::element("div"));
        assert!(surface.has_class("elastibox-entity"));
        assert!(surface.is_draggable());
        assert_eq!(entity.position().get_value(), Coordinate::ORIGIN);
        assert_eq!(entity.id(), surface.id());
    }

    #[test]
    fn restores_persisted_position_and_writes_it_back_identically() {
        let (surface, entity) =
            entity_over(MemorySurface::element("div").with_data(POSITION_KEY, "[7, 9]"));
        assert_eq!(entity.position().get_value(), Coordinate::new(7.0, 9.0));

        entity.move_to(7.0, 9.0);
        assert_eq!(surface.data(POSITION_KEY).as_deref(), Some("[7, 9]"));
    }

    #[test]
    fn full_precision_positions_survive_restore_and_move() {
        let text = "[523.3333333333334, 16777217]";
        let (surface, entity) =
            entity_over(MemorySurface::element("div").with_data(POSITION_KEY, text));
        let restored = entity.position().get_value();
        assert_eq!(restored, Coordinate::new(1570.0 / 3.0, 16777217.0));

        entity.move_to(restored.x(), restored.y());
        assert_eq!(surface.data(POSITION_KEY).as_deref(), Some(text));
    }

    #[test]
    fn falls_back_to_legacy_offsets_and_strips_them() {
        let (surface, entity) = entity_over(
            MemorySurface::element("div")
                .with_style("left", "30px")
                .with_style("top", "12px"),
        );
        assert_eq!(entity.position().get_value(), Coordinate::new(30.0, 12.0));
        assert_eq!(surface.style("left"), None);
        assert_eq!(surface.style("top"), None);
        assert_eq!(
            surface.style("transform").as_deref(),
            Some("translate(30px, 12px)")
        );
    }

    #[test]
    fn persisted_position_wins_over_legacy_offsets() {
        let (surface, entity) = entity_over(
            MemorySurface::element("div")
                .with_data(POSITION_KEY, "[1, 2]")
                .with_style("left", "30px")
                .with_style("top", "12px"),
        );
        assert_eq!(entity.position().get_value(), Coordinate::new(1.0, 2.0));
        assert_eq!(surface.style("top"), None);
    }

    #[test]
    fn malformed_position_degrades_to_origin() {
        let (surface, entity) = entity_over(
            MemorySurface::element("div")
                .with_data(POSITION_KEY, "[7,")
                .with_style("top", "12px"),
        );
        assert_eq!(entity.position().get_value(), Coordinate::ORIGIN);
        assert!(surface.has_class("elastibox-entity"));
        assert_eq!(surface.style("top"), None);
    }

    #[test]
    fn one_legacy_offset_is_not_enough() {
        let (_surface, entity) =
            entity_over(MemorySurface::element("div").with_style("top", "12px"));
        assert_eq!(entity.position().get_value(), Coordinate::ORIGIN);
    }

    #[test]
    fn drag_is_delta_from_drag_start() {
        let (surface, entity) = entity_over(MemorySurface::element("div"));
        entity.move_to(10.0, 20.0);

        entity.begin_drag(ViewportPoint::new(100.0, 100.0));
        assert!(surface.has_class("elastibox-entity-dragging"));

        entity.drag_to(ViewportPoint::new(140.0, 130.0));
        assert_eq!(entity.position().get_value(), Coordinate::new(50.0, 50.0));

        entity.drag_to(ViewportPoint::new(100.0, 100.0));
        assert_eq!(entity.position().get_value(), Coordinate::new(10.0, 20.0));

        entity.end_drag();
        assert!(!surface.has_class("elastibox-entity-dragging"));
        assert!(!entity.is_dragging());
        assert_eq!(entity.position().get_value(), Coordinate::new(10.0, 20.0));
    }

    #[test]
    fn drag_without_start_is_ignored() {
        let (_surface, entity) = entity_over(MemorySurface::element("div"));
        entity.drag_to(ViewportPoint::new(40.0, 40.0));
        assert_eq!(entity.position().get_value(), Coordinate::ORIGIN);
    }

    #[test]
    fn hooks_receive_the_entity() {
        struct Recorder(RefCell<Vec<String>>);
        impl EntityHooks for Recorder {
            fn on_select(&self, entity: &Entity) {
                self.0.borrow_mut().push(format!("select {}", entity.reference_id()));
            }
            fn on_deselect(&self, entity: &Entity) {
                self.0.borrow_mut().push(format!("deselect {}", entity.reference_id()));
            }
        }

        let hooks = Rc::new(Recorder(RefCell::new(Vec::new())));
        let entity = Entity::new(
            Rc::new(MemorySurface::element("div")),
            "a".into(),
            &CanvasOptions::default(),
            hooks.clone(),
        );
        entity.select();
        entity.deselect();
        assert_eq!(*hooks.0.borrow(), vec!["select a", "deselect a"]);
    }
}
