//! Coordinate types for the canvas.
//!
//! Distinct types keep the two spaces apart at compile time:
//!
//! - **Canvas space**: where entities live. A [`Coordinate`] is the offset of
//!   an entity from its untransformed origin.
//! - **Viewport space**: where the pointer is. A [`ViewportPoint`] is what
//!   the host reports for pointer and drag events.
//!
//! Subtracting two points of the same space gives a [`Delta`], which can be
//! added to a point of either space.
//!
//! Components are `f64`, the host's number type.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position of an entity in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate(pub DVec2);

/// Pointer position in viewport space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportPoint(pub DVec2);

/// Movement/offset, not a position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta(pub DVec2);

/// A rendered box: origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: DVec2,
    pub size: DVec2,
}

// === Coordinate ===

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate(DVec2::ZERO);

    pub fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }
}

impl From<DVec2> for Coordinate {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl From<Coordinate> for DVec2 {
    fn from(c: Coordinate) -> Self {
        c.0
    }
}

impl Add<Delta> for Coordinate {
    type Output = Coordinate;

    fn add(self, delta: Delta) -> Self::Output {
        Coordinate(self.0 + delta.0)
    }
}

impl Sub for Coordinate {
    type Output = Delta;

    fn sub(self, other: Coordinate) -> Self::Output {
        Delta(self.0 - other.0)
    }
}

// === ViewportPoint ===

impl ViewportPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }
}

impl From<DVec2> for ViewportPoint {
    fn from(v: DVec2) -> Self {
        Self(v)
    }
}

impl Sub for ViewportPoint {
    type Output = Delta;

    fn sub(self, other: ViewportPoint) -> Self::Output {
        Delta(self.0 - other.0)
    }
}

// === Delta ===

impl Delta {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self(DVec2::new(dx, dy))
    }

    pub fn dx(&self) -> f64 {
        self.0.x
    }

    pub fn dy(&self) -> f64 {
        self.0.y
    }
}

// === Rect ===

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            size: DVec2::new(width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }
}
