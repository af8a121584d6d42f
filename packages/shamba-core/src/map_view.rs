use geo_types::Rect;

use crate::geometry::{LatLng, PolygonGeometry};
use crate::models::FarmFeature;
use crate::renderer::FarmLayer;

// Default view over Nairobi, used until a real position is known
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: -1.286389,
    lng: 36.817223,
};

pub const DEFAULT_ZOOM: f64 = 13.0;

// Camera state a widget adapter mirrors onto the real map
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    fitted: Option<Rect<f64>>,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64) -> Self {
        Viewport {
            center,
            zoom,
            fitted: None,
        }
    }

    // Re-center without touching the zoom level
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
        self.fitted = None;
    }

    // Frame a bounding box. Deriving the actual zoom level needs pixel
    // dimensions, which only the widget adapter has, so the box itself is
    // recorded for it to apply.
    pub fn fit_bounds(&mut self, bounds: Rect<f64>) {
        let center = bounds.center();
        self.center = LatLng {
            lat: center.y,
            lng: center.x,
        };
        self.fitted = Some(bounds);
    }

    pub fn fitted(&self) -> Option<&Rect<f64>> {
        self.fitted.as_ref()
    }
}

type SelectHandler = Box<dyn Fn(&FarmFeature) + Send + Sync>;

// The farm map surface: a styled layer, a viewport and a selection callback
pub struct MapView {
    viewport: Viewport,
    layer: FarmLayer,
    focused: Option<PolygonGeometry>,
    on_select: Option<SelectHandler>,
}

impl Default for MapView {
    fn default() -> Self {
        MapView::new()
    }
}

impl MapView {
    pub fn new() -> Self {
        MapView {
            viewport: Viewport::default(),
            layer: FarmLayer::default(),
            focused: None,
            on_select: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layer(&self) -> &FarmLayer {
        &self.layer
    }

    pub fn on_select(&mut self, handler: impl Fn(&FarmFeature) + Send + Sync + 'static) {
        self.on_select = Some(Box::new(handler));
    }

    // Swap in a new farm list without moving the camera
    pub fn set_features(&mut self, features: &[FarmFeature]) {
        self.layer = FarmLayer::build(features);
        self.focused = None;
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.viewport.set_center(center);
    }

    // Restyle one farm in the highlight style and frame it. The viewport
    // only refits when the focused geometry actually changed, refocusing
    // the same farm leaves the camera alone.
    pub fn focus_farm(&mut self, farm: &FarmFeature) -> bool {
        let already_focused = self.focused.as_ref() == Some(&farm.geometry);
        self.layer = FarmLayer::focused(farm);
        if already_focused {
            return false;
        }
        self.focused = Some(farm.geometry.clone());
        if let Some(bounds) = self.layer.bounds() {
            self.viewport.fit_bounds(bounds);
        }
        true
    }

    // Frame the whole layer, e.g. right after the first fetch
    pub fn fit_all(&mut self) -> bool {
        match self.layer.bounds() {
            Some(bounds) => {
                self.viewport.fit_bounds(bounds);
                true
            }
            None => false,
        }
    }

    // Resolve a click into a farm selection and notify the handler. The
    // position arrives in widget (lat, lng) order like every other input.
    pub fn click(&self, at: LatLng) -> Option<&FarmFeature> {
        let farm = self.layer.feature_at(at.to_position())?;
        if let Some(handler) = &self.on_select {
            handler(farm);
        }
        Some(farm)
    }
}
