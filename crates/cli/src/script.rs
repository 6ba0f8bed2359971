//! Replay scripts: host events recorded as JSON and played back against an
//! in-memory container.
//!
//! A script is a JSON array of steps. Surfaces are referred to by the name
//! given in `append_child`; the name `canvas` always refers to the
//! container itself.

use anyhow::{anyhow, bail, Context, Result};
use canvas::{
    CanvasOptions, Coordinate, DeviceId, Elastibox, Modifiers, Rect, SurfaceId, ViewportPoint,
    POSITION_KEY,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use surface::{MemoryDocument, MemorySurface, Surface};

/// Name that always refers to the container.
pub const CONTAINER: &str = "canvas";

/// One recorded host event.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Append an element to the container.
    AppendChild {
        name: String,
        /// Persisted position text, e.g. `"[120, 45]"`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        top: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<[f64; 2]>,
    },

    /// Append a text node to the container.
    AppendText { text: String },

    /// Remove a named element from the container.
    RemoveChild { name: String },

    /// Deliver the pending child-list changes to the canvas.
    Flush,

    PointerDown {
        target: String,
        #[serde(default)]
        shift: bool,
        #[serde(default)]
        ctrl: bool,
    },

    DragStart { target: String, x: f64, y: f64 },

    Drag { target: String, x: f64, y: f64 },

    DragEnd { target: String },

    Resize {
        target: String,
        width: f64,
        height: f64,
    },

    /// Print the current state.
    Snapshot,
}

/// State of the canvas at one point of a replay.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub entities: Vec<EntitySnapshot>,
    pub selected: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub name: String,
    pub reference_id: String,
    pub position: Coordinate,
    pub persisted: Option<String>,
    pub size: Rect,
    pub classes: Vec<String>,
}

/// An in-memory container with a canvas over it.
pub struct Session {
    container: Rc<MemorySurface>,
    elastibox: Elastibox,
    surfaces: HashMap<String, Rc<MemorySurface>>,
    names: HashMap<SurfaceId, String>,
}

impl Session {
    pub fn new(device_id: DeviceId, options: CanvasOptions) -> Result<Self> {
        let container = Rc::new(MemorySurface::element("div"));
        let document = MemoryDocument::new();
        document.insert(CONTAINER, container.clone());

        let elastibox = Elastibox::new(&document, CONTAINER, device_id, options)
            .context("Failed to create canvas")?;

        let mut names = HashMap::new();
        names.insert(container.id(), CONTAINER.to_string());
        Ok(Self {
            container,
            elastibox,
            surfaces: HashMap::new(),
            names,
        })
    }

    /// Run every step, collecting a snapshot for each `snapshot` step.
    pub fn run(&mut self, steps: &[Step]) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        for (index, step) in steps.iter().enumerate() {
            log::debug!("step {}: {:?}", index, step);
            if let Some(snapshot) = self
                .apply(step)
                .with_context(|| format!("Step {} failed", index))?
            {
                snapshots.push(snapshot);
            }
        }
        Ok(snapshots)
    }

    pub fn apply(&mut self, step: &Step) -> Result<Option<Snapshot>> {
        match step {
            Step::AppendChild {
                name,
                position,
                left,
                top,
                size,
            } => {
                if name == CONTAINER || self.surfaces.contains_key(name) {
                    bail!("Surface name {:?} is already taken", name);
                }
                let mut surface = MemorySurface::element("div");
                if let Some(position) = position {
                    surface = surface.with_data(POSITION_KEY, position);
                }
                if let Some(left) = left {
                    surface = surface.with_style("left", left);
                }
                if let Some(top) = top {
                    surface = surface.with_style("top", top);
                }
                if let Some([width, height]) = size {
                    surface = surface.with_bounds(Rect::new(0.0, 0.0, *width, *height));
                }
                let surface = Rc::new(surface);
                self.names.insert(surface.id(), name.clone());
                self.surfaces.insert(name.clone(), surface.clone());
                self.container.append_child(surface);
            }
            Step::AppendText { text } => {
                self.container
                    .append_child(Rc::new(MemorySurface::text(text.as_str())));
            }
            Step::RemoveChild { name } => {
                let id = self.surface(name)?.id();
                self.container
                    .remove_child(id)
                    .ok_or_else(|| anyhow!("{:?} is not attached to the canvas", name))?;
            }
            Step::Flush => {
                self.elastibox
                    .canvas()
                    .handle_mutations(self.container.take_records());
            }
            Step::PointerDown {
                target,
                shift,
                ctrl,
            } => {
                let id = self.target_id(target)?;
                let modifiers = Modifiers {
                    shift: *shift,
                    ctrl: *ctrl,
                };
                self.elastibox
                    .canvas()
                    .on_pointer_down(&[id, self.container.id()], modifiers);
            }
            Step::DragStart { target, x, y } => {
                let id = self.surface(target)?.id();
                self.elastibox
                    .canvas()
                    .on_drag_start(id, ViewportPoint::new(*x, *y));
            }
            Step::Drag { target, x, y } => {
                let id = self.surface(target)?.id();
                self.elastibox.canvas().on_drag(id, ViewportPoint::new(*x, *y));
            }
            Step::DragEnd { target } => {
                let id = self.surface(target)?.id();
                self.elastibox.canvas().on_drag_end(id);
            }
            Step::Resize {
                target,
                width,
                height,
            } => {
                let bounds = Rect::new(0.0, 0.0, *width, *height);
                let id = if target == CONTAINER {
                    self.container.set_bounds(bounds);
                    self.container.id()
                } else {
                    let surface = self.surface(target)?;
                    surface.set_bounds(bounds);
                    surface.id()
                };
                self.elastibox.canvas().on_resize(id, bounds);
            }
            Step::Snapshot => return Ok(Some(self.snapshot())),
        }
        Ok(None)
    }

    pub fn snapshot(&self) -> Snapshot {
        let canvas = self.elastibox.canvas();
        let entities = canvas
            .entities()
            .iter()
            .map(|entity| {
                let name = self.name_of(entity.id());
                let classes = self
                    .surfaces
                    .get(&name)
                    .map(|surface| surface.classes())
                    .unwrap_or_default();
                EntitySnapshot {
                    name,
                    reference_id: entity.reference_id().to_string(),
                    position: entity.position().get_value(),
                    persisted: entity.surface().data(POSITION_KEY),
                    size: entity.resize().get_value(),
                    classes,
                }
            })
            .collect();
        let selected = canvas
            .selected_entities()
            .get_value()
            .iter()
            .map(|entity| self.name_of(entity.id()))
            .collect();
        Snapshot { entities, selected }
    }

    fn surface(&self, name: &str) -> Result<&Rc<MemorySurface>> {
        self.surfaces
            .get(name)
            .ok_or_else(|| anyhow!("Unknown surface {:?}", name))
    }

    fn target_id(&self, name: &str) -> Result<SurfaceId> {
        if name == CONTAINER {
            return Ok(self.container.id());
        }
        Ok(self.surface(name)?.id())
    }

    fn name_of(&self, id: SurfaceId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

/// A short script exercising registration, selection and dragging.
pub fn example_script() -> Vec<Step> {
    vec![
        Step::AppendChild {
            name: "a".into(),
            position: Some("[120, 45]".into()),
            left: None,
            top: None,
            size: Some([80.0, 40.0]),
        },
        Step::AppendChild {
            name: "b".into(),
            position: None,
            left: Some("30px".into()),
            top: Some("12px".into()),
            size: None,
        },
        Step::Flush,
        Step::PointerDown {
            target: "a".into(),
            shift: false,
            ctrl: false,
        },
        Step::PointerDown {
            target: "b".into(),
            shift: true,
            ctrl: false,
        },
        Step::DragStart {
            target: "a".into(),
            x: 100.0,
            y: 100.0,
        },
        Step::Drag {
            target: "a".into(),
            x: 140.0,
            y: 130.0,
        },
        Step::DragEnd { target: "a".into() },
        Step::Snapshot,
        Step::PointerDown {
            target: CONTAINER.into(),
            shift: false,
            ctrl: false,
        },
        Step::RemoveChild { name: "b".into() },
        Step::Flush,
        Step::Snapshot,
    ]
}

/// Parse a script from JSON text.
pub fn parse_script(json: &str) -> Result<Vec<Step>> {
    serde_json::from_str(json).context("Invalid replay script")
}
