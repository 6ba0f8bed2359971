use crate::{Rect, SurfaceId};
use std::rc::Rc;

/// Shared handle to a host surface.
pub type SurfaceRef = Rc<dyn Surface>;

/// What kind of node a surface is.
///
/// Only elements take part in the canvas; text and comment nodes show up in
/// child-list changes but are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

/// One node of the host's render tree.
///
/// All methods take `&self`: surfaces are shared handles into the host, the
/// way DOM nodes are, so implementations use interior mutability.
pub trait Surface {
    fn id(&self) -> SurfaceId;

    fn kind(&self) -> NodeKind;

    /// Tag name or node name, for logging.
    fn node_name(&self) -> String;

    fn add_class(&self, class: &str);

    fn remove_class(&self, class: &str);

    fn has_class(&self, class: &str) -> bool;

    /// Read a data attribute by its dataset key (e.g. `elastibox_position`).
    fn data(&self, key: &str) -> Option<String>;

    fn set_data(&self, key: &str, value: &str);

    /// Read an inline style property. Empty values read as `None`.
    fn style(&self, property: &str) -> Option<String>;

    fn set_style(&self, property: &str, value: &str);

    fn remove_style(&self, property: &str);

    fn set_draggable(&self, draggable: bool);

    /// The current rendered box.
    fn bounding_box(&self) -> Rect;

    /// Direct children, in document order.
    fn children(&self) -> Vec<SurfaceRef>;

    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }
}

/// Element lookup, the host-side counterpart of `getElementById`.
pub trait Document {
    fn element_by_id(&self, id: &str) -> Option<SurfaceRef>;
}
