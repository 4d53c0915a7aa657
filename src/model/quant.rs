/// One peptide's contribution to a protein's StPeter quantitation
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StPeterQuantPeptide {
    pub sequence: String,
    pub charge: i32,
    /// Spectral index, the `SI` attribute
    pub intensity: f64,
    /// Spectral count, the `SC` attribute
    pub count: i32,
    pub d_intensity: f64,
    pub d_count: f64,
}

/**
StPeter spectral quantitation for one protein.

Only attributes that are present and non-empty in the report are written, every
other field keeps its default of zero.
*/
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StPeterQuant {
    /// Spectral index
    pub si: f64,
    /// Length normalized spectral index
    pub sin: f64,
    /// Normalized spectral abundance factor
    pub nsaf: f64,
    /// Estimated protein amount from the spectral index, in nanograms
    pub ng: f64,
    /// Estimated protein amount from spectral counts, in nanograms
    pub ng_counts: f64,
    pub counts: i32,

    pub d_si: f64,
    pub d_sin: f64,
    pub d_nsaf: f64,
    pub d_counts: f64,

    pub peptides: Vec<StPeterQuantPeptide>,
}

/// The run settings of StPeter, present only when the report was quantified
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StPeterSummary {
    pub version: String,
    pub probability: f64,
    pub fdr: f64,
    pub sample_load: f64,
    pub tolerance: f64,
    pub degenerate_peptides: bool,
}

/// The reporter ion reading of one Libra channel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraIntensity {
    pub channel: i32,
    pub mz: f64,
    pub ratio: f64,
    pub error: f64,
}

/// Libra isobaric quantitation for one protein, a `libra_result` element
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraQuant {
    pub number: i32,
    pub intensities: Vec<LibraIntensity>,
}

impl LibraQuant {
    pub fn channel(&self, channel: i32) -> Option<&LibraIntensity> {
        self.intensities.iter().find(|i| i.channel == channel)
    }
}
