//! Reactive canvas core for Elastibox.
//!
//! A [`Canvas`] wraps a container surface and turns each of its direct
//! element children into an [`Entity`]. Entity membership follows the
//! container's child-list changes; positions and the selection are published
//! through [`reactive::Observable`]s.

mod canvas;
mod elastibox;
mod element;
mod entity;
mod error;
mod ids;
mod options;
mod persist;
mod registry;


pub use canvas::{Canvas, CanvasBuilder, EventResponse, Modifiers, Propagation};
pub use elastibox::{ContainerRef, Elastibox};
pub use element::ElasticElement;
pub use entity::{Entity, EntityHooks, NoopHooks};
pub use error::{Error, Result};
pub use ids::{DeviceId, IdGenerator, RandomIds};
pub use options::CanvasOptions;
pub use persist::{decode_position, encode_position, POSITION_KEY};
pub use registry::EntityId;
// Re-export the types callers need to drive a canvas
pub use reactive::{Observable, SubscriptionId};
pub use surface::{Coordinate, Delta, MutationRecord, Rect, SurfaceId, SurfaceRef, ViewportPoint};
