use crate::{Canvas, CanvasOptions, DeviceId, Error, RandomIds, Result};
use std::rc::Rc;
use surface::{Document, SurfaceRef};

/// How the caller names the canvas container.
pub enum ContainerRef<'a> {
    Surface(SurfaceRef),
    Id(&'a str),
}

impl From<SurfaceRef> for ContainerRef<'_> {
    fn from(surface: SurfaceRef) -> Self {
        Self::Surface(surface)
    }
}

impl<'a> From<&'a str> for ContainerRef<'a> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

/// Entry point for a host application: resolves the container and owns the
/// canvas together with the id service its entities draw from.
pub struct Elastibox {
    canvas: Canvas,
    ids: Rc<RandomIds>,
}

impl Elastibox {
    pub fn new<'a>(
        document: &dyn Document,
        container: impl Into<ContainerRef<'a>>,
        device_id: DeviceId,
        options: CanvasOptions,
    ) -> Result<Self> {
        let container = fetch_surface(document, container.into())?;
        let ids = Rc::new(RandomIds::new(device_id));
        log::debug!(
            "Elastibox on device {} instance {}",
            ids.device_id(),
            ids.instance_id()
        );

        let canvas = Canvas::builder(container)
            .options(options)
            .ids(ids.clone())
            .build()?;
        Ok(Self { canvas, ids })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn device_id(&self) -> &DeviceId {
        self.ids.device_id()
    }

    pub fn instance_id(&self) -> &str {
        self.ids.instance_id()
    }
}

fn fetch_surface(document: &dyn Document, container: ContainerRef<'_>) -> Result<SurfaceRef> {
    match container {
        ContainerRef::Surface(surface) => Ok(surface),
        ContainerRef::Id(id) => document
            .element_by_id(id)
            .ok_or_else(|| Error::ContainerNotFound(id.to_string())),
    }
}
