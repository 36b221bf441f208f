use crate::collaborators::DiffCalculator;
use mats_types::app_params::AppParams;
use mats_types::dataset::CurveBundle;
use mats_types::series::SeriesData;

/// Subtracts the referenced curve from the most recent database curve in the
/// dataset other than the referenced one.
///
/// Only x values present in both curves are kept; y is the difference.
/// Plot-type specific arrays are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtractSeries;

impl DiffCalculator for SubtractSeries {
    fn diff_curve(
        &self,
        dataset: &[CurveBundle],
        diff_from: &str,
        _app_params: &AppParams,
    ) -> anyhow::Result<SeriesData> {
        let minuend = dataset
            .iter()
            .rev()
            .find(|c| c.diff_from.is_none() && c.label != diff_from)
            .ok_or_else(|| anyhow::anyhow!("no curve to subtract '{}' from", diff_from))?;
        let subtrahend = dataset
            .iter()
            .find(|c| c.label == diff_from)
            .ok_or_else(|| anyhow::anyhow!("no curve labelled '{}'", diff_from))?;

        let mut x = Vec::new();
        let mut y = Vec::new();
        for (mx, my) in minuend.data.x.iter().zip(&minuend.data.y) {
            let matched = subtrahend
                .data
                .x
                .iter()
                .zip(&subtrahend.data.y)
                .find(|(sx, _)| *sx == mx);
            if let Some((_, sy)) = matched {
                x.push(*mx);
                y.push(my - sy);
            }
        }
        Ok(SeriesData::from_points(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mats_types::plot_params::PlotParams;

    fn bundle(label: &str, x: Vec<f64>, y: Vec<f64>) -> CurveBundle {
        CurveBundle {
            label: label.to_string(),
            annotation: String::new(),
            axis_key: "reliability".to_string(),
            axis_index: 0,
            color: String::new(),
            diff_from: None,
            data: SeriesData::from_points(x, y),
        }
    }

    #[test]
    fn subtracts_matching_x_values() {
        let dataset = vec![
            bundle("A", vec![0.1, 0.2, 0.3], vec![0.5, 0.5, 0.5]),
            bundle("B", vec![0.1, 0.3, 0.4], vec![0.75, 0.25, 1.0]),
        ];
        let app = AppParams::reliability(&PlotParams::new("", vec![]));
        let diff = SubtractSeries.diff_curve(&dataset, "A", &app).unwrap();
        assert_eq!(diff.x, vec![0.1, 0.3]);
        assert_eq!(diff.y, vec![0.25, -0.25]);
        assert_eq!(diff.ymin, Some(-0.25));
    }

    #[test]
    fn skips_diff_curves_and_the_reference() {
        let mut b_minus_a = bundle("B-A", vec![0.1, 0.2], vec![0.25, -0.25]);
        b_minus_a.diff_from = Some("A".to_string());
        let dataset = vec![
            bundle("A", vec![0.1, 0.2], vec![0.5, 0.5]),
            bundle("B", vec![0.1, 0.2], vec![0.75, 0.25]),
            b_minus_a,
        ];
        let app = AppParams::reliability(&PlotParams::new("", vec![]));
        let diff = SubtractSeries.diff_curve(&dataset, "B", &app).unwrap();
        assert_eq!(diff.y, vec![-0.25, 0.25]);
    }

    #[test]
    fn reference_alone_has_nothing_to_subtract_from() {
        let dataset = vec![bundle("A", vec![0.1], vec![0.5])];
        let app = AppParams::reliability(&PlotParams::new("", vec![]));
        assert!(SubtractSeries.diff_curve(&dataset, "A", &app).is_err());
    }

    #[test]
    fn unknown_reference_fails() {
        let dataset = vec![bundle("A", vec![0.1], vec![0.5])];
        let app = AppParams::reliability(&PlotParams::new("", vec![]));
        assert!(SubtractSeries.diff_curve(&dataset, "Z", &app).is_err());
        assert!(SubtractSeries.diff_curve(&[], "A", &app).is_err());
    }
}
