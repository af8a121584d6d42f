use std::fmt;
use std::sync::Arc;

use geo_types::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::bbox;
use crate::geometry::{ring_from_latlngs, GeometryError, LatLng, PolygonGeometry};
use crate::models::FarmFeature;
use crate::store::{FarmStore, StoreError};

// The shape tools a draw toolbar can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawKind {
    Polyline,
    Polygon,
    Rectangle,
    Circle,
    Marker,
    CircleMarker,
}

impl fmt::Display for DrawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DrawKind::Polyline => "polyline",
            DrawKind::Polygon => "polygon",
            DrawKind::Rectangle => "rectangle",
            DrawKind::Circle => "circle",
            DrawKind::Marker => "marker",
            DrawKind::CircleMarker => "circlemarker",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawGesture {
    Created,
    Edited,
}

// Which tools the toolbar enables, mirroring the draw plugin option object.
// Only closed shapes are on by default, a boundary must enclose an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawToolOptions {
    pub polyline: bool,
    pub polygon: bool,
    pub rectangle: bool,
    pub circle: bool,
    pub marker: bool,
    pub circlemarker: bool,
}

impl Default for DrawToolOptions {
    fn default() -> Self {
        DrawToolOptions {
            polyline: false,
            polygon: true,
            rectangle: true,
            circle: false,
            marker: false,
            circlemarker: false,
        }
    }
}

impl DrawToolOptions {
    pub fn allows(&self, kind: DrawKind) -> bool {
        match kind {
            DrawKind::Polyline => self.polyline,
            DrawKind::Polygon => self.polygon,
            DrawKind::Rectangle => self.rectangle,
            DrawKind::Circle => self.circle,
            DrawKind::Marker => self.marker,
            DrawKind::CircleMarker => self.circlemarker,
        }
    }
}

// A finished drawing gesture as delivered by the map widget, vertices still
// in widget (lat, lng) order
#[derive(Debug, Clone)]
pub struct DrawEvent {
    pub kind: DrawKind,
    pub gesture: DrawGesture,
    pub vertices: Vec<LatLng>,
}

// What the caller gets back synchronously once a gesture is accepted
#[derive(Debug, Clone)]
pub struct DrawFinish {
    pub gesture: DrawGesture,
    pub bounds: Rect<f64>,
    pub feature: FarmFeature,
}

// Result of one background save, delivered on the outcome channel
#[derive(Debug)]
pub struct SaveOutcome {
    pub farm_name: String,
    pub result: Result<FarmFeature, StoreError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("{0} drawing is disabled on this toolbar")]
    ShapeDisabled(DrawKind),
    #[error("no draw control is attached")]
    NoActiveControl,
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

// One mounted draw toolbar, bound to a farmer and the name the next farm
// will be saved under
pub struct DrawControl {
    id: Uuid,
    options: DrawToolOptions,
    farmer_id: String,
    farm_name: String,
    store: Arc<dyn FarmStore>,
    outcomes: UnboundedSender<SaveOutcome>,
    // Save tasks land on the runtime that was current at construction
    runtime: Handle,
}

impl DrawControl {
    // Must be called inside a tokio runtime. Gestures may later be handled
    // from any thread, typically the widget's event thread.
    pub fn new(
        options: DrawToolOptions,
        farmer_id: &str,
        farm_name: &str,
        store: Arc<dyn FarmStore>,
    ) -> (Self, UnboundedReceiver<SaveOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        let control = DrawControl {
            id: Uuid::new_v4(),
            options,
            farmer_id: farmer_id.to_string(),
            farm_name: farm_name.to_string(),
            store,
            outcomes,
            runtime: Handle::current(),
        };
        (control, receiver)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn options(&self) -> &DrawToolOptions {
        &self.options
    }

    pub fn farm_name(&self) -> &str {
        &self.farm_name
    }

    // Turn a finished gesture into a validated feature. Created gestures
    // also kick off the background save.
    pub fn handle_draw(&self, event: &DrawEvent) -> Result<DrawFinish, CaptureError> {
        if !self.options.allows(event.kind) {
            return Err(CaptureError::ShapeDisabled(event.kind));
        }

        let ring = ring_from_latlngs(&event.vertices);
        let geometry = PolygonGeometry::from_exterior(ring);
        geometry.validate()?;

        let bounds = bbox::geometry_bounds(&geometry).ok_or(GeometryError::EmptyPolygon)?;

        let mut feature = FarmFeature::draft(geometry);
        feature.name = Some(self.farm_name.clone());
        feature.farmer_id = Some(self.farmer_id.clone());

        if event.gesture == DrawGesture::Created {
            self.spawn_save(feature.geometry.clone());
        }

        Ok(DrawFinish {
            gesture: event.gesture,
            bounds,
            feature,
        })
    }

    // Fire-and-forget persistence, observable through the outcome channel
    fn spawn_save(&self, geometry: PolygonGeometry) {
        let store = Arc::clone(&self.store);
        let farmer_id = self.farmer_id.clone();
        let farm_name = self.farm_name.clone();
        let outcomes = self.outcomes.clone();

        self.runtime.spawn(async move {
            let result = store.save_farm(&geometry, &farmer_id, &farm_name).await;
            if let Err(err) = &result {
                warn!(farm_name = %farm_name, error = %err, "failed to save farm boundary");
            }
            let _ = outcomes.send(SaveOutcome { farm_name, result });
        });
    }
}

// Host surface for the drawing UI. Keeps at most one live control, a second
// attach tears the first one down.
pub struct CaptureSurface {
    center: LatLng,
    control: Option<DrawControl>,
}

impl CaptureSurface {
    pub fn new(center: LatLng) -> Self {
        CaptureSurface {
            center,
            control: None,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn control(&self) -> Option<&DrawControl> {
        self.control.as_ref()
    }

    pub fn attach(&mut self, control: DrawControl) {
        if let Some(previous) = self.control.take() {
            debug!(control_id = %previous.id, "detached stale draw control");
        }
        self.control = Some(control);
    }

    pub fn detach(&mut self) -> Option<DrawControl> {
        self.control.take()
    }

    pub fn handle_draw(&self, event: &DrawEvent) -> Result<DrawFinish, CaptureError> {
        match &self.control {
            Some(control) => control.handle_draw(event),
            None => Err(CaptureError::NoActiveControl),
        }
    }
}
