use chrono::NaiveDateTime;

use super::analysis::{AnalysisSummary, ProteinProphetDetails};
use super::quant::StPeterSummary;

/// A row of the sensitivity and error table ProteinProphet writes for a range of
/// probability thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorPoint {
    pub min_probability: f64,
    pub sensitivity: f64,
    pub false_positive_error_rate: f64,
    pub predicted_num_correct: f64,
    pub predicted_num_incorrect: f64,
}

/// Report-level metadata, read from the header section of the document
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentSummary {
    /// The `analysis` of `program_details`, e.g. `proteinprophet`
    pub algorithm_name: String,
    pub version: String,
    /// When the analysis was run, if the report says so in a readable format
    pub time: Option<NaiveDateTime>,

    /// The space-delimited `source_files` attribute, split on every single space.
    /// Like ProteinProphet's own readers this always holds the final token, so a
    /// header without source files lists one empty name.
    pub source_files: Vec<String>,
    pub reference_database: String,
    pub sample_enzyme: String,

    pub min_peptide_probability: f64,
    pub min_peptide_weight: f64,
    pub num_predicted_correct_prots: f64,
    pub total_no_spectrum_ids: f64,

    pub proteinprophet_details: Option<ProteinProphetDetails>,
    /// The error table, in the order it was written. Older reports write
    /// `error_point` rows instead, which carry no sensitivity.
    pub error_points: Vec<ErrorPoint>,

    pub analysis_summaries: Vec<AnalysisSummary>,
    /// The `generation_no` of `dataset_derivation`
    pub dataset_generation: Option<String>,

    pub stpeter: Option<StPeterSummary>,
}

impl DocumentSummary {
    pub fn source_file_count(&self) -> usize {
        self.source_files.len()
    }

    pub fn source_file(&self, index: usize) -> Option<&str> {
        self.source_files.get(index).map(|s| s.as_str())
    }

    /// The first recorded summary of the named post-processing step
    pub fn analysis_summary(&self, analysis: &str) -> Option<&AnalysisSummary> {
        self.analysis_summaries
            .iter()
            .find(|a| a.analysis == analysis)
    }

    pub fn has_stpeter(&self) -> bool {
        self.stpeter.is_some()
    }

    /**
    Estimate the minimum protein probability that yields the requested false positive
    error rate by linear interpolation over [`DocumentSummary::error_points`].

    Older and newer ProteinProphet versions write the table in opposite orders, so the
    points are ordered by decreasing error rate before searching. Returns `None` when
    the table is empty or `error_rate` lies outside of it.
    */
    pub fn probability_at_error_rate(&self, error_rate: f64) -> Option<f64> {
        let mut points: Vec<&ErrorPoint> = self.error_points.iter().collect();
        points.sort_by(|a, b| {
            b.false_positive_error_rate
                .total_cmp(&a.false_positive_error_rate)
        });

        if let Some(exact) = points
            .iter()
            .find(|p| p.false_positive_error_rate == error_rate)
        {
            return Some(exact.min_probability);
        }

        points.windows(2).find_map(|pair| {
            let (high, low) = (pair[0], pair[1]);
            if high.false_positive_error_rate > error_rate
                && error_rate > low.false_positive_error_rate
            {
                let span = high.false_positive_error_rate - low.false_positive_error_rate;
                let fraction = (error_rate - low.false_positive_error_rate) / span;
                Some(low.min_probability + fraction * (high.min_probability - low.min_probability))
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn point(min_probability: f64, false_positive_error_rate: f64) -> ErrorPoint {
        ErrorPoint {
            min_probability,
            false_positive_error_rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_error_rate_interpolation() {
        let mut summary = DocumentSummary {
            error_points: vec![point(1.0, 0.0), point(0.9, 0.01), point(0.5, 0.05)],
            ..Default::default()
        };
        assert_eq!(summary.probability_at_error_rate(0.01), Some(0.9));
        let p = summary.probability_at_error_rate(0.03).unwrap();
        assert!((p - 0.7).abs() < 1e-9, "{p}");
        assert_eq!(summary.probability_at_error_rate(0.2), None);

        summary.error_points.reverse();
        let p = summary.probability_at_error_rate(0.005).unwrap();
        assert!((p - 0.95).abs() < 1e-9, "{p}");

        summary.error_points.clear();
        assert_eq!(summary.probability_at_error_rate(0.01), None);
    }

    #[test]
    fn test_source_files() {
        let summary = DocumentSummary {
            source_files: vec!["a.pep.xml".into(), "b.pep.xml".into()],
            ..Default::default()
        };
        assert_eq!(summary.source_file_count(), 2);
        assert_eq!(summary.source_file(1), Some("b.pep.xml"));
        assert_eq!(summary.source_file(2), None);
        assert!(!summary.has_stpeter());
    }
}
