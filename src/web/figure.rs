//! Plotly figure JSON for the typed chart specs.

use crate::core::view::{BoxPlot, ChoroplethMap, DistributionSpec, MapSpec};
use crate::domain::model::Geometry;
use serde_json::{json, Value};

pub fn map_figure(spec: &MapSpec) -> Value {
    match spec {
        MapSpec::Choropleth(map) => choropleth_figure(map),
        MapSpec::Placeholder { message } => placeholder_figure(message),
    }
}

pub fn distribution_figure(spec: &DistributionSpec) -> Value {
    match spec {
        DistributionSpec::Box(plot) => box_figure(plot),
        DistributionSpec::Placeholder { message } => placeholder_figure(message),
    }
}

/// Empty axes with a centred message.
pub fn placeholder_figure(message: &str) -> Value {
    json!({
        "data": [],
        "layout": {
            "annotations": [{
                "text": message,
                "showarrow": false,
                "xref": "paper",
                "yref": "paper",
                "x": 0.5,
                "y": 0.5
            }],
            "xaxis": {"visible": false},
            "yaxis": {"visible": false}
        }
    })
}

fn geometry_json(geometry: &Geometry) -> Value {
    json!({
        "type": "MultiPolygon",
        "coordinates": geometry.polygons
    })
}

fn choropleth_figure(map: &ChoroplethMap) -> Value {
    let features: Vec<Value> = map
        .features
        .iter()
        .map(|feature| {
            json!({
                "type": "Feature",
                "id": feature.location,
                "properties": {
                    "code": feature.department_code,
                    "name": feature.department_name
                },
                "geometry": geometry_json(&feature.geometry)
            })
        })
        .collect();

    let locations: Vec<&str> = map.features.iter().map(|f| f.location.as_str()).collect();
    let values: Vec<u64> = map.features.iter().map(|f| f.value).collect();
    let names: Vec<&str> = map
        .features
        .iter()
        .map(|f| f.department_name.as_str())
        .collect();

    json!({
        "data": [{
            "type": "choroplethmapbox",
            "geojson": {"type": "FeatureCollection", "features": features},
            "locations": locations,
            "z": values,
            "text": names,
            "colorscale": map.color_scale,
            "marker": {"opacity": map.opacity, "line": {"width": 0.5}},
            "colorbar": {"title": {"text": map.color_label}},
            "hovertemplate": format!(
                "<b>%{{text}}</b><br>{}: %{{z:,}}<extra></extra>",
                map.color_label
            )
        }],
        "layout": {
            "mapbox": {
                "style": map.style,
                "zoom": map.zoom,
                "center": {"lat": map.center.lat, "lon": map.center.lon}
            },
            "margin": {"r": 0, "t": 0, "l": 0, "b": 0},
            "height": map.height
        }
    })
}

fn box_figure(plot: &BoxPlot) -> Value {
    let points = if plot.show_points {
        json!("all")
    } else {
        json!(false)
    };

    json!({
        "data": [{
            "type": "box",
            "y": plot.values,
            "name": plot.regime.as_str(),
            "boxpoints": points
        }],
        "layout": {
            "title": {"text": plot.title},
            "yaxis": {"title": {"text": plot.regime.as_str()}},
            "showlegend": false,
            "height": plot.height,
            "margin": {"t": 50}
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::view::{build_distribution, build_map};
    use crate::domain::model::{EnrollmentRecord, MergedDepartment, Regime, RegimeCounts};

    fn department() -> MergedDepartment {
        MergedDepartment {
            department_code: "05".to_string(),
            department_name: "ANTIOQUIA".to_string(),
            counts: RegimeCounts {
                contributivo: 0,
                subsidiado: 42,
                especial: 0,
            },
            geometry: Geometry {
                polygons: vec![vec![vec![[-76.0, 6.0], [-75.0, 6.0], [-75.0, 7.0], [-76.0, 6.0]]]],
            },
        }
    }

    #[test]
    fn test_choropleth_figure() {
        let spec = build_map(&[department()], Regime::Subsidiado).unwrap();
        let figure = map_figure(&spec);

        let trace = &figure["data"][0];
        assert_eq!(trace["type"], "choroplethmapbox");
        assert_eq!(trace["locations"], json!(["0"]));
        assert_eq!(trace["z"], json!([42]));
        assert_eq!(trace["colorscale"], "Viridis");
        assert_eq!(trace["geojson"]["features"][0]["id"], "0");
        assert_eq!(
            trace["geojson"]["features"][0]["geometry"]["coordinates"][0][0][1],
            json!([-75.0, 6.0])
        );

        let layout = &figure["layout"];
        assert_eq!(layout["mapbox"]["zoom"], 4);
        assert_eq!(layout["mapbox"]["center"]["lat"], 4.6);
        assert_eq!(layout["mapbox"]["center"]["lon"], -74.0);
        assert_eq!(layout["mapbox"]["style"], "carto-positron");
    }

    #[test]
    fn test_box_figure_hides_points() {
        let raw = vec![EnrollmentRecord {
            department_code: "05".to_string(),
            department_name: "ANTIOQUIA".to_string(),
            counts: RegimeCounts::default(),
        }];
        let spec = build_distribution(&raw, Regime::Especial).unwrap();
        let figure = distribution_figure(&spec);

        assert_eq!(figure["data"][0]["type"], "box");
        assert_eq!(figure["data"][0]["boxpoints"], false);
        assert_eq!(figure["data"][0]["name"], "Especial");
        assert_eq!(
            figure["layout"]["title"]["text"],
            "Distribución - Régimen Especial"
        );
        assert_eq!(figure["layout"]["showlegend"], false);
    }

    #[test]
    fn test_placeholder_figure() {
        let figure = map_figure(&MapSpec::Placeholder {
            message: "Error creando mapa: x".to_string(),
        });
        assert_eq!(figure["data"], json!([]));
        assert_eq!(
            figure["layout"]["annotations"][0]["text"],
            "Error creando mapa: x"
        );
        assert_eq!(figure["layout"]["annotations"][0]["showarrow"], false);
    }
}
