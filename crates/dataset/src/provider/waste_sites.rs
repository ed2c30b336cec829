//! Waste sites from a GeoJSON FeatureCollection.

use std::sync::Arc;

use geo::Point;
use geojson::{GeoJson, JsonObject, Value};
use tracing::{error, info};

use crate::models::types::{DatasetError, Result, WasteSite};
use crate::network::DataFetcher;
use crate::provider::static_provider::StaticDataset;

const ID_KEYS: [&str; 3] = ["id", "ID", "site_id"];
const NAME_KEYS: [&str; 2] = ["name", "ad"];
pub const UNNAMED_SITE: &str = "Unnamed waste site";

/// First non-empty string (or number, rendered as a string) under any of `keys`.
fn text_property(props: &JsonObject, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match props.get(*key)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Parse waste sites from GeoJSON text.
///
/// Only `Point` features with an identifier are kept; everything else is skipped.
pub fn parse_waste_sites(text: &str) -> Result<Vec<WasteSite>> {
    let collection = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(DatasetError::InvalidData(
                "GeoJSON has no features array".to_string(),
            ))
        }
    };

    let sites = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let coords = match feature.geometry.map(|g| g.value) {
                Some(Value::Point(coords)) if coords.len() >= 2 => coords,
                _ => return None,
            };
            let props = feature.properties.unwrap_or_default();
            let id = text_property(&props, &ID_KEYS)?;
            let name = text_property(&props, &NAME_KEYS).unwrap_or_else(|| UNNAMED_SITE.to_string());

            Some(WasteSite {
                id: id.into(),
                name: Arc::from(name),
                location: Point::new(coords[0], coords[1]),
                properties: props,
            })
        })
        .collect();

    Ok(sites)
}

/// Fetch, parse and install the waste sites.
///
/// On failure the previously loaded sites stay in place.
pub async fn load_waste_sites(
    fetcher: &dyn DataFetcher,
    url: &str,
    dataset: &StaticDataset,
) -> Result<usize> {
    info!("Loading waste sites from {url}");

    let result = async {
        let bytes = fetcher.fetch(url).await?;
        let text = String::from_utf8(bytes)
            .map_err(|e| DatasetError::InvalidData(format!("waste sites are not UTF-8: {e}")))?;
        parse_waste_sites(&text)
    }
    .await;

    match result {
        Ok(sites) => {
            let count = sites.len();
            dataset.replace_waste_sites(sites);
            info!("Loaded {count} waste sites");
            Ok(count)
        }
        Err(err) => {
            error!("Failed to load waste sites from {url}: {err}");
            Err(err)
        }
    }
}
