//! Single-slot reactive values for Elastibox.
//!
//! An [`Observable`] is the read side of a value that changes over time:
//! consumers can read it and subscribe to it. A [`Subject`] is the write
//! side of the same value and is kept by whoever produces it.

mod observable;

pub use observable::{Observable, Subject, SubscriptionId};
