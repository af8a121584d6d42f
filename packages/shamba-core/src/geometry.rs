use serde::{Deserialize, Serialize};
use thiserror::Error;

// A GeoJSON position, [lng, lat]
pub type Position = [f64; 2];

// A linear ring of positions, closed when first == last
pub type Ring = Vec<Position>;

// A geographic point the way map widgets hand it over, latitude first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    // The only place where (lat, lng) turns into a GeoJSON [lng, lat] position
    pub fn to_position(&self) -> Position {
        [self.lng, self.lat]
    }
}

// Build a closed exterior ring from widget vertices, appending the first
// position again when the gesture left the ring open
pub fn ring_from_latlngs(vertices: &[LatLng]) -> Ring {
    let mut ring: Ring = vertices.iter().map(|v| v.to_position()).collect();
    if let Some(first) = ring.first().copied() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
    }
    ring
}

// The two geometry shapes farm boundaries come in. The serde representation
// matches GeoJSON geometry objects exactly: {"type": ..., "coordinates": ...}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum PolygonGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl PolygonGeometry {
    // A single polygon with no holes
    pub fn from_exterior(ring: Ring) -> Self {
        PolygonGeometry::Polygon(vec![ring])
    }

    // Every ring in the geometry, exterior and holes alike
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            PolygonGeometry::Polygon(rings) => Box::new(rings.iter()),
            PolygonGeometry::MultiPolygon(polygons) => Box::new(polygons.iter().flatten()),
        }
    }

    // Check the GeoJSON ring invariants before the geometry goes anywhere
    // near persistence or rendering
    pub fn validate(&self) -> Result<(), GeometryError> {
        let mut ring_count = 0usize;
        for (index, ring) in self.rings().enumerate() {
            ring_count += 1;
            if ring.len() < 4 {
                return Err(GeometryError::RingTooShort {
                    index,
                    len: ring.len(),
                });
            }
            if ring.first() != ring.last() {
                return Err(GeometryError::UnclosedRing { index });
            }
            if ring.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
                return Err(GeometryError::NonFiniteCoordinate { index });
            }
        }
        if ring_count == 0 {
            return Err(GeometryError::EmptyPolygon);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("polygon has no rings")]
    EmptyPolygon,
    #[error("ring {index} has {len} positions, a closed ring needs at least 4")]
    RingTooShort { index: usize, len: usize },
    #[error("ring {index} is not closed, first and last position must match")]
    UnclosedRing { index: usize },
    #[error("ring {index} contains a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}
