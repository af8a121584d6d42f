use geo_types::{Coord, Rect};

use crate::geometry::{PolygonGeometry, Position};

// Calculate the bounding box of a single ring, None when the ring is empty
pub fn ring_bounds(ring: &[Position]) -> Option<Rect<f64>> {
    if ring.is_empty() {
        return None;
    }

    let mut min_lng = f64::INFINITY;
    let mut min_lat = f64::INFINITY;
    let mut max_lng = f64::NEG_INFINITY;
    let mut max_lat = f64::NEG_INFINITY;

    for position in ring {
        min_lng = min_lng.min(position[0]);
        min_lat = min_lat.min(position[1]);
        max_lng = max_lng.max(position[0]);
        max_lat = max_lat.max(position[1]);
    }

    Some(Rect::new(
        Coord {
            x: min_lng,
            y: min_lat,
        },
        Coord {
            x: max_lng,
            y: max_lat,
        },
    ))
}

// Bounding box over every ring of a geometry
pub fn geometry_bounds(geometry: &PolygonGeometry) -> Option<Rect<f64>> {
    let mut bounds: Option<Rect<f64>> = None;
    for ring in geometry.rings() {
        if let Some(ring_rect) = ring_bounds(ring) {
            bounds = Some(match bounds {
                Some(current) => union(current, ring_rect),
                None => ring_rect,
            });
        }
    }
    bounds
}

// Combined bounding box over a set of geometries, e.g. every farm on a layer
pub fn geometries_bounds<'a, I>(geometries: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = &'a PolygonGeometry>,
{
    let mut bounds: Option<Rect<f64>> = None;
    for geometry in geometries {
        if let Some(rect) = geometry_bounds(geometry) {
            bounds = Some(match bounds {
                Some(current) => union(current, rect),
                None => rect,
            });
        }
    }
    bounds
}

// The smallest box covering both inputs
pub fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

// Flatten a box into the [minLng, minLat, maxLng, maxLat] array shape used
// on the wire
pub fn to_array(rect: &Rect<f64>) -> [f64; 4] {
    [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
}

// Inclusive containment check for a position against a box
pub fn contains(rect: &Rect<f64>, position: Position) -> bool {
    let lng = position[0];
    let lat = position[1];

    lng >= rect.min().x && lng <= rect.max().x && lat >= rect.min().y && lat <= rect.max().y
}
