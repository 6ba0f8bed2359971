use crate::persist::{encode_position, format_number, POSITION_KEY};
use reactive::{Observable, Subject};
use surface::{Coordinate, Delta, Rect, SurfaceRef};

/// A surface positioned by translation, with observable position and size.
///
/// Moving never touches layout offsets: the surface's `transform` is set to
/// a translation and the coordinate is persisted on the surface, then
/// published on [`ElasticElement::position`].
pub struct ElasticElement {
    surface: SurfaceRef,
    position: Subject<Coordinate>,
    resize: Subject<Rect>,
}

impl ElasticElement {
    pub fn new(surface: SurfaceRef) -> Self {
        surface.set_style("position", "absolute");
        let resize = Subject::new(surface.bounding_box());
        Self {
            surface,
            position: Subject::new(Coordinate::ORIGIN),
            resize,
        }
    }

    pub fn surface(&self) -> &SurfaceRef {
        &self.surface
    }

    /// The coordinate stream. Starts at the origin.
    pub fn position(&self) -> Observable<Coordinate> {
        self.position.as_observable()
    }

    /// The rendered-box stream. Starts at the bounding box seen at construction.
    pub fn resize(&self) -> Observable<Rect> {
        self.resize.as_observable()
    }

    pub fn move_to(&self, x: f64, y: f64) {
        let position = Coordinate::new(x, y);
        self.surface.set_style(
            "transform",
            &format!("translate({}px, {}px)", format_number(x), format_number(y)),
        );
        self.surface.set_data(POSITION_KEY, &encode_position(position));
        self.position.next(position);
    }

    pub fn move_by(&self, dx: f64, dy: f64) {
        let target = self.position.get_value() + Delta::new(dx, dy);
        self.move_to(target.x(), target.y());
    }

    /// Record a new rendered box reported by the host's size observer.
    pub fn observe_resize(&self, bounds: Rect) {
        self.resize.next(bounds);
    }
}
