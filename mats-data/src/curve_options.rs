use crate::collaborators::CurveOptionsBuilder;
use mats_types::app_params::{AppParams, PlotType};
use mats_types::dataset::{AxisEntry, AxisMap, CurveBundle};
use mats_types::plot_params::CurveSpec;
use mats_types::series::{Extents, SeriesData};

/// Curve colours, assigned by curve index.
pub const PALETTE: [&str; 10] = [
    "rgb(255,102,102)",
    "rgb(0,0,255)",
    "rgb(255,153,0)",
    "rgb(128,128,128)",
    "rgb(0,230,0)",
    "rgb(204,0,204)",
    "rgb(0,179,179)",
    "rgb(153,102,51)",
    "rgb(0,0,0)",
    "rgb(255,204,0)",
];

/// Assigns each axis key an axis in order of first use and widens that
/// axis to cover the curve's data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesCurveOptions;

fn axis_label(curve: &CurveSpec, app_params: &AppParams) -> String {
    match app_params.plot_type {
        PlotType::Reliability => "Observed Relative Frequency".to_string(),
        _ => curve.variable.clone(),
    }
}

impl CurveOptionsBuilder for SeriesCurveOptions {
    fn build(
        &self,
        curve: &CurveSpec,
        index: usize,
        axis_map: &mut AxisMap,
        data: &SeriesData,
        app_params: &AppParams,
    ) -> CurveBundle {
        let axis_key = curve
            .axis_key
            .clone()
            .unwrap_or_else(|| curve.variable.clone());
        let next_index = axis_map.len();
        let axis = axis_map
            .entry(axis_key.clone())
            .or_insert_with(|| AxisEntry {
                index: next_index,
                label: axis_label(curve, app_params),
                extents: Extents::seeded(),
            });
        axis.extents.fold(&data.extents());

        CurveBundle {
            label: curve.label.clone(),
            annotation: curve.annotation.clone().unwrap_or_default(),
            axis_key,
            axis_index: axis.index,
            color: PALETTE[index % PALETTE.len()].to_string(),
            diff_from: curve.diff_from.clone(),
            data: data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mats_types::plot_params::PlotParams;

    #[test]
    fn curves_share_an_axis_per_key() {
        let app = AppParams::reliability(&PlotParams::new("", vec![]));
        let mut axis_map = AxisMap::new();
        let mut first = CurveSpec::new("A", "mv_gsl", "HRRR", "APCP_06");
        first.axis_key = Some("reliability".to_string());
        let mut second = first.clone();
        second.label = "B".to_string();

        let a = SeriesCurveOptions.build(
            &first,
            0,
            &mut axis_map,
            &SeriesData::from_points(vec![0.1], vec![0.2]),
            &app,
        );
        let b = SeriesCurveOptions.build(
            &second,
            11,
            &mut axis_map,
            &SeriesData::from_points(vec![0.9], vec![0.8]),
            &app,
        );

        assert_eq!(axis_map.len(), 1);
        assert_eq!((a.axis_index, b.axis_index), (0, 0));
        assert_eq!(b.color, PALETTE[1]);
        let axis = &axis_map["reliability"];
        assert_eq!(axis.label, "Observed Relative Frequency");
        assert_eq!(
            axis.extents,
            Extents { xmin: 0.1, xmax: 0.9, ymin: 0.2, ymax: 0.8 }
        );
    }
}
