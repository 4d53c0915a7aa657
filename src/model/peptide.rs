use super::modification::ModificationInfo;
use super::protein::Parameter;

/// An alternative sequence assignment that the evidence cannot tell apart from
/// the [`Peptide`] it is listed under.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndistinguishablePeptide {
    pub sequence: String,
    pub charge: i32,
    pub calc_neutral_mass: f64,
    pub modification_info: ModificationInfo,
}

impl IndistinguishablePeptide {
    /// The annotated sequence if one was reported, otherwise the bare sequence
    pub fn modified_sequence(&self) -> &str {
        if self.modification_info.modified_peptide.is_empty() {
            &self.sequence
        } else {
            &self.modification_info.modified_peptide
        }
    }
}

/// A peptide-level piece of evidence contributing to a [`Protein`](super::Protein)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Peptide {
    pub sequence: String,
    pub charge: i32,

    pub initial_probability: f64,
    pub nsp_adjusted_probability: f64,
    pub ni_adjusted_probability: f64,
    pub fpkm_adjusted_probability: f64,

    pub weight: f64,
    pub n_sibling_peptides: f64,
    pub exp_tot_instances: f64,
    pub calc_neutral_mass: f64,

    pub n_enzymatic_termini: i32,
    pub n_sibling_peptides_bin: i32,
    pub n_instances: i32,

    pub is_nondegenerate_evidence: bool,
    pub is_contributing_evidence: bool,

    pub peptide_group_designator: String,

    pub modification_info: ModificationInfo,
    pub indistinguishable_peptides: Vec<IndistinguishablePeptide>,
    /// Other proteins this peptide also maps to
    pub parent_proteins: Vec<String>,
    pub parameters: Vec<Parameter>,
}

impl Peptide {
    /// The annotated sequence if one was reported, otherwise the bare sequence
    pub fn modified_sequence(&self) -> &str {
        if self.modification_info.modified_peptide.is_empty() {
            &self.sequence
        } else {
            &self.modification_info.modified_peptide
        }
    }

    /// Iterate over this peptide's sequence and every indistinguishable alternative
    pub fn sequences(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.sequence.as_str())
            .chain(self.indistinguishable_peptides.iter().map(|p| p.sequence.as_str()))
    }
}
