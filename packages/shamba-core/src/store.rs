use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::geometry::PolygonGeometry;
use crate::models::{FarmFeature, FeatureId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("farm {0} not found")]
    NotFound(FeatureId),
    #[error("backend error: {0}")]
    Backend(String),
}

// Persistence gateway for farm boundaries. Implementations wrap whatever
// backend the deployment uses, the core only sees this trait.
#[async_trait]
pub trait FarmStore: Send + Sync {
    // Persist a validated boundary and return the stored record with its
    // assigned id and timestamp
    async fn save_farm(
        &self,
        geometry: &PolygonGeometry,
        farmer_id: &str,
        name: &str,
    ) -> Result<FarmFeature, StoreError>;

    // All farms, or only the ones belonging to a single farmer
    async fn fetch_farms(&self, farmer_id: Option<&str>) -> Result<Vec<FarmFeature>, StoreError>;

    async fn delete_farm(&self, id: &FeatureId) -> Result<(), StoreError>;
}

// In-memory store backing tests and offline sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    farms: Mutex<Vec<FarmFeature>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.farms.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.farms.lock().is_empty()
    }
}

#[async_trait]
impl FarmStore for MemoryStore {
    async fn save_farm(
        &self,
        geometry: &PolygonGeometry,
        farmer_id: &str,
        name: &str,
    ) -> Result<FarmFeature, StoreError> {
        let mut feature = FarmFeature::draft(geometry.clone());
        feature.id = Some(FeatureId::Text(Uuid::new_v4().to_string()));
        feature.name = Some(name.to_string());
        feature.farmer_id = Some(farmer_id.to_string());
        feature.created_at = Some(Utc::now());

        let mut farms = self.farms.lock();
        farms.push(feature.clone());
        info!(total = farms.len(), farm_name = name, "saved farm boundary");
        Ok(feature)
    }

    async fn fetch_farms(&self, farmer_id: Option<&str>) -> Result<Vec<FarmFeature>, StoreError> {
        let farms = self.farms.lock();
        let matched: Vec<FarmFeature> = match farmer_id {
            Some(owner) => farms
                .iter()
                .filter(|farm| farm.farmer_id.as_deref() == Some(owner))
                .cloned()
                .collect(),
            None => farms.clone(),
        };
        Ok(matched)
    }

    async fn delete_farm(&self, id: &FeatureId) -> Result<(), StoreError> {
        let mut farms = self.farms.lock();
        let before = farms.len();
        farms.retain(|farm| farm.id.as_ref() != Some(id));
        if farms.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}
