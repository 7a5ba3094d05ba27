use crate::config::MapConfig;
use crate::encoding::{radius, ColorScale};
use crate::processing::max_school_count;
use crate::templates::{self, MARKER_POPUP};
use crate::types::{Coordinate, LgaAggregate};
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use minijinja::context;
use serde::Serialize;

/// Everything the page needs to draw the base map and its markers.
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
    pub markers: FeatureCollection,
}

/// One filled circle marker per LGA, sized and coloured against the
/// current dataset maximum.
pub fn render(
    aggregates: &[LgaAggregate],
    map: &MapConfig,
    scale: &ColorScale,
) -> Result<MapView, minijinja::Error> {
    let max = max_school_count(aggregates);
    let popup_template = templates::environment().get_template(MARKER_POPUP)?;

    let mut features = Vec::with_capacity(aggregates.len());
    for (idx, agg) in aggregates.iter().enumerate() {
        let label = popup_template.render(context! {
            lga_name => &agg.lga_name,
            state => &agg.state,
            school_count => agg.school_count,
        })?;

        let mut properties = JsonObject::new();
        properties.insert("lga_name".into(), agg.lga_name.clone().into());
        properties.insert("state".into(), agg.state.clone().into());
        properties.insert("school_count".into(), agg.school_count.into());
        properties.insert("radius".into(), radius(agg.school_count, max).into());
        properties.insert("color".into(), scale.color(agg.school_count, max).css_name().into());
        properties.insert("fill".into(), true.into());
        properties.insert("popup".into(), label.clone().into());
        properties.insert("tooltip".into(), label.into());

        features.push(Feature {
            bbox: None,
            // GeoJSON positions are [lng, lat]
            geometry: Some(Geometry::new(Value::Point(vec![agg.mean_longitude, agg.mean_latitude]))),
            id: Some(Id::String(format!("marker_{}", idx))),
            properties: Some(properties),
            foreign_members: None,
        });
    }

    tracing::debug!("Rendered {} markers (max count {})", features.len(), max);

    Ok(MapView {
        center: Coordinate {
            lat: map.center_lat,
            lng: map.center_lon,
        },
        zoom: map.zoom,
        width: map.width,
        height: map.height,
        markers: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{aggregate, tests::sample_schools};

    fn property(feature: &Feature, key: &str) -> serde_json::Value {
        feature.properties.as_ref().unwrap()[key].clone()
    }

    #[test]
    fn one_marker_per_lga() {
        let view = render(&aggregate(&sample_schools()), &MapConfig::default(), &ColorScale::default()).unwrap();

        assert_eq!(view.markers.features.len(), 2);
        let first = &view.markers.features[0];
        assert_eq!(first.id, Some(Id::String("marker_0".to_string())));
        assert_eq!(property(first, "lga_name"), "LGA1");
        assert_eq!(property(first, "school_count"), 2);
        assert_eq!(property(first, "radius"), 20);
        assert_eq!(property(first, "color"), "darkgreen");
        assert_eq!(property(first, "fill"), true);
        assert_eq!(property(&view.markers.features[1], "radius"), 13);
    }

    #[test]
    fn marker_sits_on_the_exact_centroid() {
        let aggregates = vec![LgaAggregate {
            state: "TAS".to_string(),
            lga_name: "Hobart".to_string(),
            mean_latitude: -42.882_137_999_999_99,
            mean_longitude: 147.327_194_000_000_01,
            school_count: 7,
        }];
        let view = render(&aggregates, &MapConfig::default(), &ColorScale::default()).unwrap();

        let json = serde_json::to_value(&view.markers.features[0]).unwrap();
        let coords = &json["geometry"]["coordinates"];
        assert_eq!(coords[0].as_f64().unwrap().to_bits(), aggregates[0].mean_longitude.to_bits());
        assert_eq!(coords[1].as_f64().unwrap().to_bits(), aggregates[0].mean_latitude.to_bits());
    }

    #[test]
    fn popup_and_tooltip_list_labelled_fields() {
        let view = render(&aggregate(&sample_schools()), &MapConfig::default(), &ColorScale::default()).unwrap();
        let feature = &view.markers.features[1];

        let popup = property(feature, "popup");
        assert_eq!(
            popup,
            "<b>Local Government Area:</b><br>LGA2<br><b>State:</b><br>NSW<br><b>School Count:</b><br>1"
        );
        assert_eq!(property(feature, "tooltip"), popup);
    }

    #[test]
    fn empty_dataset_renders_base_map_only() {
        let map = MapConfig::default();
        let view = render(&[], &map, &ColorScale::default()).unwrap();

        assert!(view.markers.features.is_empty());
        assert_eq!(view.center.lat, -25.2744);
        assert_eq!(view.center.lng, 133.7751);
        assert_eq!(view.zoom, 4);
        assert_eq!((view.width, view.height), (1500, 700));
    }
}
