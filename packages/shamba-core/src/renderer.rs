use geo_types::Rect;
use serde::Serialize;

use crate::bbox;
use crate::geometry::{PolygonGeometry, Position};
use crate::hit_test;
use crate::models::{FarmFeature, FeatureId, FeatureStyle};
use crate::palette;

// One styled polygon ready to hand to a map widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledOverlay {
    pub feature_id: Option<FeatureId>,
    pub label: String,
    pub geometry: PolygonGeometry,
    pub style: FeatureStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

// Styled view over a list of farms. Colors depend only on list position,
// so rebuilding from the same list always styles farms the same way.
#[derive(Debug, Clone, Default)]
pub struct FarmLayer {
    features: Vec<FarmFeature>,
    overlays: Vec<StyledOverlay>,
}

impl FarmLayer {
    pub fn build(features: &[FarmFeature]) -> Self {
        let overlays = features
            .iter()
            .enumerate()
            .map(|(index, farm)| StyledOverlay {
                feature_id: farm.id.clone(),
                label: farm_label(farm, index),
                geometry: farm.geometry.clone(),
                style: FeatureStyle::for_color(palette::color_for(index)),
            })
            .collect();

        FarmLayer {
            features: features.to_vec(),
            overlays,
        }
    }

    // Single-farm layer drawn in the highlight style
    pub fn focused(farm: &FarmFeature) -> Self {
        let overlay = StyledOverlay {
            feature_id: farm.id.clone(),
            label: farm_label(farm, 0),
            geometry: farm.geometry.clone(),
            style: FeatureStyle::highlight(),
        };

        FarmLayer {
            features: vec![farm.clone()],
            overlays: vec![overlay],
        }
    }

    pub fn overlays(&self) -> &[StyledOverlay] {
        &self.overlays
    }

    pub fn features(&self) -> &[FarmFeature] {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        bbox::geometries_bounds(self.features.iter().map(|farm| &farm.geometry))
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.overlays
            .iter()
            .map(|overlay| LegendEntry {
                label: overlay.label.clone(),
                color: overlay.style.color.clone(),
            })
            .collect()
    }

    // The farm under a clicked position. Later overlays sit on top of
    // earlier ones, so the scan runs back to front. Selection resolves
    // through the feature id, an id-less overlay cannot be selected.
    pub fn feature_at(&self, position: Position) -> Option<&FarmFeature> {
        let overlay = self
            .overlays
            .iter()
            .rev()
            .find(|overlay| hit_test::geometry_contains(&overlay.geometry, position))?;
        let id = overlay.feature_id.as_ref()?;
        self.features
            .iter()
            .find(|farm| farm.id.as_ref() == Some(id))
    }
}

// Farms without a name fall back to a positional label
fn farm_label(farm: &FarmFeature, index: usize) -> String {
    match &farm.name {
        Some(name) => name.clone(),
        None => format!("Farm {}", index + 1),
    }
}
