//! Host surfaces for Elastibox.
//!
//! A surface is one node of whatever tree the host renders into (a DOM
//! element, a retained widget, ...). The canvas core only talks to the
//! [`Surface`] trait; [`MemorySurface`] is an in-process implementation used
//! by tests and headless tools.

pub mod coords;
mod memory;
mod mutation;
mod surface;
mod surface_id;

pub use coords::{Coordinate, Delta, Rect, ViewportPoint};
pub use memory::{MemoryDocument, MemorySurface};
pub use mutation::{ChildSetListener, MutationKind, MutationRecord};
pub use surface::{Document, NodeKind, Surface, SurfaceRef};
pub use surface_id::SurfaceId;
