use wasm_bindgen::prelude::*;
use geojson::{GeoJson, Geometry, Value};
use geo::Geometry as GeoGeometry;
use std::convert::TryInto;
use std::str::FromStr;

use crate::error::{NodingError, Result};
use crate::noding::extract::{extract_segment_strings, to_multi_line_string};
use crate::noding::{Noder, ScaledNoder, SnapRoundingNoder};

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Snap-rounds every linear component of a GeoJSON document to a grid of
/// spacing `1 / scale` and returns the noded edges as a GeoJSON
/// MultiLineString.
#[wasm_bindgen]
pub fn node_geojson(geojson_str: &str, scale: f64) -> std::result::Result<String, JsValue> {
    node_geojson_str(geojson_str, scale).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn node_geojson_str(geojson_str: &str, scale: f64) -> Result<String> {
    let mut noder: ScaledNoder<SnapRoundingNoder<usize>> = ScaledNoder::snap_rounding(scale)?;
    let geojson = GeoJson::from_str(geojson_str)
        .map_err(|e| NodingError::InvalidGeometry(format!("Failed to parse GeoJSON: {}", e)))?;

    let mut geoms: Vec<GeoGeometry<f64>> = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in fc.features {
                if let Some(geom) = feature.geometry {
                    geoms.push(to_geo(geom)?);
                }
            }
        },
        GeoJson::Feature(feature) => {
            if let Some(geom) = feature.geometry {
                geoms.push(to_geo(geom)?);
            }
        },
        GeoJson::Geometry(geometry) => geoms.push(to_geo(geometry)?),
    }

    let collection = GeoGeometry::GeometryCollection(geoms.into_iter().collect());
    let strings = extract_segment_strings(&collection)?;
    let noded = noder.node(strings)?;

    let mls = to_multi_line_string(&noded);
    Ok(Geometry::new(Value::from(&mls)).to_string())
}

fn to_geo(geometry: Geometry) -> Result<GeoGeometry<f64>> {
    geometry
        .try_into()
        .map_err(|e: geojson::Error| NodingError::InvalidGeometry(format!("Failed to convert geometry: {}", e)))
}
