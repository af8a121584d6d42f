use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::geometry::LatLng;
use crate::map_view::DEFAULT_CENTER;
use crate::models::{FarmFeature, FeatureId};
use crate::store::{FarmStore, StoreError};

// Session state the map components share. Handed around explicitly, cloning
// is cheap and every clone sees the same state.
#[derive(Clone)]
pub struct MapContext {
    inner: Arc<RwLock<ContextState>>,
}

#[derive(Debug)]
struct ContextState {
    center: LatLng,
    farms: Vec<FarmFeature>,
    selected: Option<FarmFeature>,
}

impl Default for MapContext {
    fn default() -> Self {
        MapContext::new()
    }
}

impl MapContext {
    pub fn new() -> Self {
        MapContext::with_center(DEFAULT_CENTER)
    }

    pub fn with_center(center: LatLng) -> Self {
        MapContext {
            inner: Arc::new(RwLock::new(ContextState {
                center,
                farms: Vec::new(),
                selected: None,
            })),
        }
    }

    pub fn center(&self) -> LatLng {
        self.inner.read().center
    }

    pub fn set_center(&self, center: LatLng) {
        self.inner.write().center = center;
    }

    pub fn farms(&self) -> Vec<FarmFeature> {
        self.inner.read().farms.clone()
    }

    pub fn set_farms(&self, farms: Vec<FarmFeature>) {
        self.inner.write().farms = farms;
    }

    pub fn selected(&self) -> Option<FarmFeature> {
        self.inner.read().selected.clone()
    }

    // Select a farm out of the current list by id. A missing id clears the
    // selection, the selection always tracks the list.
    pub fn select(&self, id: &FeatureId) -> bool {
        let mut state = self.inner.write();
        let found = state
            .farms
            .iter()
            .find(|farm| farm.id.as_ref() == Some(id))
            .cloned();
        let hit = found.is_some();
        state.selected = found;
        hit
    }

    pub fn set_selected(&self, farm: Option<FarmFeature>) {
        self.inner.write().selected = farm;
    }

    pub fn clear_selection(&self) {
        self.inner.write().selected = None;
    }

    // The focused farm as a one-element feature list, empty when nothing
    // is selected. This is the shape the focus layer consumes.
    pub fn geo_data(&self) -> Vec<FarmFeature> {
        match self.inner.read().selected.clone() {
            Some(farm) => vec![farm],
            None => Vec::new(),
        }
    }

    // Reload the farm list from the store. The fetch completes before the
    // lock is taken, readers never wait on the backend.
    pub async fn refresh(
        &self,
        store: &dyn FarmStore,
        farmer_id: Option<&str>,
    ) -> Result<usize, StoreError> {
        let farms = store.fetch_farms(farmer_id).await?;
        let count = farms.len();
        self.inner.write().farms = farms;
        info!(count, "refreshed farm list");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PolygonGeometry;
    use crate::store::MemoryStore;

    fn farm(id: i64) -> FarmFeature {
        let mut farm = FarmFeature::draft(PolygonGeometry::from_exterior(vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
        ]));
        farm.id = Some(FeatureId::Int(id));
        farm
    }

    #[test]
    fn starts_over_the_default_center() {
        let ctx = MapContext::new();
        assert_eq!(ctx.center(), DEFAULT_CENTER);
        assert!(ctx.farms().is_empty());
        assert!(ctx.selected().is_none());
    }

    #[test]
    fn clones_share_state() {
        let ctx = MapContext::new();
        let other = ctx.clone();

        ctx.set_farms(vec![farm(1)]);
        assert_eq!(other.farms().len(), 1);

        other.set_center(LatLng::new(-0.5, 35.0));
        assert_eq!(ctx.center(), LatLng::new(-0.5, 35.0));
    }

    #[test]
    fn select_tracks_the_farm_list() {
        let ctx = MapContext::new();
        ctx.set_farms(vec![farm(1), farm(2)]);

        assert!(ctx.select(&FeatureId::Int(2)));
        assert_eq!(ctx.selected().unwrap().id, Some(FeatureId::Int(2)));
        assert_eq!(ctx.geo_data().len(), 1);

        // Unknown ids clear the selection
        assert!(!ctx.select(&FeatureId::Int(9)));
        assert!(ctx.selected().is_none());
        assert!(ctx.geo_data().is_empty());
    }

    #[test]
    fn clearing_selection_empties_geo_data() {
        let ctx = MapContext::new();
        ctx.set_farms(vec![farm(1)]);
        ctx.select(&FeatureId::Int(1));
        ctx.clear_selection();
        assert!(ctx.geo_data().is_empty());
    }

    #[tokio::test]
    async fn refresh_pulls_from_the_store() {
        let store = MemoryStore::new();
        let geometry = PolygonGeometry::from_exterior(vec![
            [36.5, -1.5],
            [36.75, -1.5],
            [36.75, -1.25],
            [36.5, -1.5],
        ]);
        store
            .save_farm(&geometry, "farmer-1", "North field")
            .await
            .unwrap();
        store
            .save_farm(&geometry, "farmer-2", "South field")
            .await
            .unwrap();

        let ctx = MapContext::new();
        let count = ctx.refresh(&store, Some("farmer-1")).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(ctx.farms()[0].name.as_deref(), Some("North field"));

        let count = ctx.refresh(&store, None).await.unwrap();
        assert_eq!(count, 2);
    }
}
