use chrono::NaiveDateTime;

use super::quant::LibraQuant;

/// One bin of the sibling peptide (NSP) model ProteinProphet fits
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NspDistribution {
    pub bin_no: i32,
    pub nsp_lower_bound_incl: f64,
    pub nsp_lower_bound_excl: f64,
    /// Kept as written, the last bin's upper bound is `inf`
    pub nsp_upper_bound_incl: String,
    pub nsp_upper_bound_excl: String,
    pub pos_freq: f64,
    pub neg_freq: f64,
    pub pos_to_neg_ratio: f64,
    pub alt_pos_to_neg_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NspInformation {
    pub neighboring_bin_smoothing: bool,
    pub distribution: Vec<NspDistribution>,
}

/// The run options of ProteinProphet, from `proteinprophet_details`
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinProphetDetails {
    pub occam_flag: bool,
    pub groups_flag: bool,
    pub degen_flag: bool,
    pub nsp_flag: bool,
    pub fpkm_flag: bool,
    pub initial_peptide_wt_iters: i32,
    pub nsp_distribution_iters: i32,
    pub final_peptide_wt_iters: i32,
    pub run_options: String,
    pub nsp_information: Option<NspInformation>,
}

/// A Libra reporter ion mass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FragmentMass {
    pub channel: i32,
    pub mz: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffectedChannel {
    pub channel: i32,
    pub correction: f64,
}

/// The isotopic impurity of one reporter channel spilling into others
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContributingChannel {
    pub channel: i32,
    pub affected_channels: Vec<AffectedChannel>,
}

/**
The settings of a Libra isobaric quantitation run.

`isotopic_contributions` holds the `contributing_channel` entries of every
`isotopic_contributions` block, in document order.
*/
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraSummary {
    pub version: String,
    pub channel_code: String,
    pub mass_tolerance: f64,
    pub centroiding_preference: i32,
    pub normalization: i32,
    pub output_type: i32,
    pub min_pep_prob: f64,
    pub min_pep_wt: f64,
    pub min_prot_prob: f64,
    pub fragment_masses: Vec<FragmentMass>,
    pub isotopic_contributions: Vec<ContributingChannel>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoyAnalysisSummary {
    pub decoy_ratio: f64,
    pub decoy_string: String,
    pub exclude_string: String,
    pub use_confidence: String,
}

/// A post-processing step recorded in the report header, e.g. `libra` or `stpeter`
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisSummary {
    pub analysis: String,
    pub id: i32,
    pub time: Option<NaiveDateTime>,
    pub libra: Vec<LibraSummary>,
    pub decoy_analysis: Vec<DecoyAnalysisSummary>,
}

/// The output of one post-processing step for a single protein
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisResult {
    pub analysis: String,
    pub id: i32,
    pub libra: Vec<LibraQuant>,
}
