// Geographic primitives, coordinate reordering and ring validation
pub mod geometry;
// Bounding box folds over rings and geometries
pub mod bbox;
// The rotating farm color palette
pub mod palette;
// Farm feature records and path styles
pub mod models;
// Persistence gateway and the in-memory store
pub mod store;
// Draw toolbar capture flow
pub mod draw_control;
// Styled overlay and legend construction
pub mod renderer;
// Viewport state and click selection
pub mod map_view;
// Shared session state
pub mod context;

#[cfg(test)]
mod pipeline_test;

pub use context::MapContext;
pub use draw_control::{
    CaptureError, CaptureSurface, DrawControl, DrawEvent, DrawFinish, DrawGesture, DrawKind,
    DrawToolOptions, SaveOutcome,
};
pub use geometry::{ring_from_latlngs, GeometryError, LatLng, PolygonGeometry, Position, Ring};
pub use map_view::{MapView, Viewport, DEFAULT_CENTER, DEFAULT_ZOOM};
pub use models::{FarmFeature, FeatureId, FeatureStyle, DEFAULT_COLOR};
pub use palette::{color_for, PALETTE};
pub use renderer::{FarmLayer, LegendEntry, StyledOverlay};
pub use store::{FarmStore, MemoryStore, StoreError};
