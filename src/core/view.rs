//! Turns the loaded snapshot and a regime selection into the four dashboard
//! outputs: map, distribution, KPI panel and narrative.
//!
//! Every output is built independently. A failure in one of them becomes a
//! visible placeholder for that output only; the others still render.

use crate::domain::model::{
    EnrollmentRecord, Geometry, MergedDepartment, Regime, SummaryStats,
};
use crate::utils::error::{DashboardError, Result};
use crate::utils::format::{ellipsize, thousands, thousands_f64};
use serde::Serialize;

pub const MAP_CENTER: MapCenter = MapCenter {
    lat: 4.6,
    lon: -74.0,
};
pub const MAP_ZOOM: u8 = 4;
pub const MAP_STYLE: &str = "carto-positron";
pub const MAP_OPACITY: f64 = 0.7;
pub const COLOR_SCALE: &str = "Viridis";
pub const FIGURE_HEIGHT: u32 = 500;

const MAX_LABEL_CHARS: usize = 15;

pub const LOADING_FIGURE_TEXT: &str = "🔄 Los datos aún se están cargando...";
pub const LOADING_KPI_ICON: &str = "⏳";
pub const LOADING_KPI_TEXT: &str = "Cargando datos...";
pub const LOADING_NARRATIVE: &str = "Los datos se están cargando. Por favor espera unos segundos.";
pub const NARRATIVE_FALLBACK: &str =
    "No se pudo generar la narrativa para el régimen seleccionado.";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFeature {
    /// Row position in the merged dataset; used as the feature id.
    pub location: String,
    pub department_code: String,
    pub department_name: String,
    pub value: u64,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethMap {
    pub regime: Regime,
    pub features: Vec<MapFeature>,
    pub color_label: String,
    pub color_scale: &'static str,
    pub style: &'static str,
    pub center: MapCenter,
    pub zoom: u8,
    pub opacity: f64,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapSpec {
    Choropleth(ChoroplethMap),
    Placeholder { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub regime: Regime,
    pub values: Vec<u64>,
    pub title: String,
    pub show_points: bool,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionSpec {
    Box(BoxPlot),
    Placeholder { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KpiSummary {
    Cards { cards: Vec<KpiCard> },
    Loading { icon: String, message: String },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub map: MapSpec,
    pub distribution: DistributionSpec,
    pub kpis: KpiSummary,
    pub narrative: String,
}

pub fn build_map(merged: &[MergedDepartment], regime: Regime) -> Result<MapSpec> {
    let features = merged
        .iter()
        .enumerate()
        .map(|(index, department)| {
            let has_bad_point = department
                .geometry
                .polygons
                .iter()
                .flatten()
                .flatten()
                .any(|[lon, lat]| !lon.is_finite() || !lat.is_finite());
            if has_bad_point {
                return Err(DashboardError::ProcessingError {
                    message: format!(
                        "coordenadas no válidas para {}",
                        department.department_name
                    ),
                });
            }

            Ok(MapFeature {
                location: index.to_string(),
                department_code: department.department_code.clone(),
                department_name: department.department_name.clone(),
                value: department.counts.get(regime),
                geometry: department.geometry.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MapSpec::Choropleth(ChoroplethMap {
        regime,
        features,
        color_label: format!("Afiliados {}", regime),
        color_scale: COLOR_SCALE,
        style: MAP_STYLE,
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        opacity: MAP_OPACITY,
        height: FIGURE_HEIGHT,
    }))
}

pub fn build_distribution(raw: &[EnrollmentRecord], regime: Regime) -> Result<DistributionSpec> {
    if raw.is_empty() {
        return Err(DashboardError::EmptyTable);
    }

    Ok(DistributionSpec::Box(BoxPlot {
        regime,
        values: raw.iter().map(|record| record.counts.get(regime)).collect(),
        title: format!("Distribución - Régimen {}", regime),
        show_points: false,
        height: FIGURE_HEIGHT,
    }))
}

pub fn build_kpis(stats: &SummaryStats) -> KpiSummary {
    let card = |value: String, label: String| KpiCard { value, label };

    KpiSummary::Cards {
        cards: vec![
            card(thousands(stats.total), "Total Afiliados".to_string()),
            card(thousands_f64(stats.mean), "Promedio por Depto".to_string()),
            card(
                stats.non_zero_count.to_string(),
                "Deptos con Afiliados".to_string(),
            ),
            card(
                thousands(stats.max),
                ellipsize(
                    &format!("Máx: {}", stats.argmax_department_name),
                    MAX_LABEL_CHARS,
                ),
            ),
        ],
    }
}

pub fn narrative(regime: Regime, stats: &SummaryStats) -> String {
    let total = thousands(stats.total);
    let departments = stats.non_zero_count;
    let mean = thousands_f64(stats.mean);
    let top = &stats.argmax_department_name;
    let max = thousands(stats.max);

    match regime {
        Regime::Contributivo => format!(
            "El régimen Contributivo presenta un total de {total} afiliados, distribuidos en {departments} departamentos. \
             El promedio de afiliados por departamento es de {mean} personas. \
             Este régimen, financiado por aportes de trabajadores y empleadores, muestra su mayor concentración en {top} con {max} afiliados."
        ),
        Regime::Subsidiado => format!(
            "El régimen Subsidiado cuenta con {total} afiliados en total, cubriendo {departments} departamentos. \
             El promedio por departamento es de {mean} personas. \
             Este régimen, dirigido a población vulnerable con subsidio estatal, tiene su mayor presencia en {top} con {max} afiliados."
        ),
        Regime::Especial => format!(
            "El régimen Especial registra {total} afiliados en total, presentes en {departments} departamentos. \
             El promedio por departamento es de {mean} personas. \
             Este régimen, diseñado para grupos específicos como fuerzas armadas y docentes, concentra su mayor número en {top} con {max} afiliados."
        ),
    }
}

/// Builds all four outputs. `stats` is passed in already computed so the KPI
/// panel and the narrative agree on the same numbers.
pub fn build(
    merged: &[MergedDepartment],
    raw: &[EnrollmentRecord],
    regime: Regime,
    stats: &Result<SummaryStats>,
) -> DashboardView {
    let map = build_map(merged, regime).unwrap_or_else(|e| {
        tracing::warn!("Map for {} failed: {}", regime, e);
        MapSpec::Placeholder {
            message: format!("Error creando mapa: {}", e),
        }
    });

    let distribution = build_distribution(raw, regime).unwrap_or_else(|e| {
        tracing::warn!("Boxplot for {} failed: {}", regime, e);
        DistributionSpec::Placeholder {
            message: format!("Error creando boxplot: {}", e),
        }
    });

    let (kpis, narrative) = match stats {
        Ok(stats) => (build_kpis(stats), narrative(regime, stats)),
        Err(e) => {
            tracing::warn!("Summary for {} failed: {}", regime, e);
            (
                KpiSummary::Error {
                    message: format!("Error calculando KPIs: {}", e),
                },
                NARRATIVE_FALLBACK.to_string(),
            )
        }
    };

    DashboardView {
        map,
        distribution,
        kpis,
        narrative,
    }
}

/// What every output shows before the data is ready.
pub fn loading() -> DashboardView {
    DashboardView {
        map: MapSpec::Placeholder {
            message: LOADING_FIGURE_TEXT.to_string(),
        },
        distribution: DistributionSpec::Placeholder {
            message: LOADING_FIGURE_TEXT.to_string(),
        },
        kpis: KpiSummary::Loading {
            icon: LOADING_KPI_ICON.to_string(),
            message: LOADING_KPI_TEXT.to_string(),
        },
        narrative: LOADING_NARRATIVE.to_string(),
    }
}
