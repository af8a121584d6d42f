// End-to-end flow: draw a boundary, persist it, render the layer, select a
// farm by clicking it

use std::sync::Arc;

use crate::context::MapContext;
use crate::draw_control::{
    CaptureSurface, DrawControl, DrawEvent, DrawGesture, DrawKind, DrawToolOptions,
};
use crate::geometry::{LatLng, PolygonGeometry};
use crate::map_view::{MapView, DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::palette;
use crate::store::{FarmStore, MemoryStore};

fn square(lat0: f64, lng0: f64, size: f64) -> Vec<LatLng> {
    vec![
        LatLng::new(lat0, lng0),
        LatLng::new(lat0, lng0 + size),
        LatLng::new(lat0 + size, lng0 + size),
        LatLng::new(lat0 + size, lng0),
    ]
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn draw_save_render_select_roundtrip() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let mut surface = CaptureSurface::new(DEFAULT_CENTER);

    let (control, mut outcomes) = DrawControl::new(
        DrawToolOptions::default(),
        "farmer-7",
        "Maize plot",
        store.clone(),
    );
    surface.attach(control);

    let finish = surface
        .handle_draw(&DrawEvent {
            kind: DrawKind::Polygon,
            gesture: DrawGesture::Created,
            vertices: square(-1.5, 36.5, 0.25),
        })
        .unwrap();
    assert_eq!(finish.feature.name.as_deref(), Some("Maize plot"));

    let saved = outcomes.recv().await.unwrap().result.unwrap();
    let saved_id = saved.id.clone().unwrap();

    // The persisted ring went through the (lat, lng) -> [lng, lat] reorder
    match &saved.geometry {
        PolygonGeometry::Polygon(rings) => assert_eq!(rings[0][0], [36.5, -1.5]),
        _ => panic!("expected a polygon"),
    }

    let ctx = MapContext::new();
    let count = ctx.refresh(store.as_ref(), Some("farmer-7")).await.unwrap();
    assert_eq!(count, 1);

    let mut view = MapView::new();
    view.set_features(&ctx.farms());

    // Loading farms leaves the default camera alone until an explicit fit
    assert_eq!(view.viewport().center, DEFAULT_CENTER);
    assert_eq!(view.viewport().zoom, DEFAULT_ZOOM);
    assert!(view.fit_all());
    assert_eq!(view.viewport().center, LatLng::new(-1.375, 36.625));

    // The single farm wears the first palette color
    assert_eq!(view.layer().overlays()[0].style.color, palette::color_for(0));

    // Click inside the square selects the saved farm
    let picked = view.click(LatLng::new(-1.4, 36.6)).cloned().unwrap();
    assert_eq!(picked.id, Some(saved_id.clone()));

    assert!(ctx.select(&saved_id));
    assert_eq!(ctx.geo_data().len(), 1);
    assert_eq!(ctx.geo_data()[0].name.as_deref(), Some("Maize plot"));
}

#[tokio::test]
async fn two_capture_sessions_save_two_farms() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let mut surface = CaptureSurface::new(DEFAULT_CENTER);

    let sessions = [
        ("farmer-1", "North field", -1.5),
        ("farmer-2", "South field", -2.5),
    ];
    for (farmer_id, farm_name, lat0) in sessions {
        let (control, mut outcomes) =
            DrawControl::new(DrawToolOptions::default(), farmer_id, farm_name, store.clone());
        surface.attach(control);

        surface
            .handle_draw(&DrawEvent {
                kind: DrawKind::Rectangle,
                gesture: DrawGesture::Created,
                vertices: square(lat0, 36.5, 0.25),
            })
            .unwrap();
        outcomes.recv().await.unwrap().result.unwrap();
    }

    let all = store.fetch_farms(None).await.unwrap();
    assert_eq!(all.len(), 2);

    // Each boundary kept its own owner and name
    let first = store.fetch_farms(Some("farmer-1")).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name.as_deref(), Some("North field"));

    let second = store.fetch_farms(Some("farmer-2")).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].name.as_deref(), Some("South field"));
}
