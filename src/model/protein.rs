use super::analysis::AnalysisResult;
use super::peptide::Peptide;
use super::quant::{LibraQuant, StPeterQuant};

/// A free-form name-value pair attached to a protein or peptide
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub name: String,
    pub value: String,
    pub type_: String,
}

impl Parameter {
    pub fn new(name: String, value: String, type_: String) -> Self {
        Self { name, value, type_ }
    }
}

/// The database cross references and description from a protein's `annotation`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    pub protein_description: String,
    pub ipi_name: String,
    pub refseq_name: String,
    pub swissprot_name: String,
    pub trembl_name: String,
    pub ensembl_name: String,
    pub locus_link_name: String,
    pub flybase: String,
}

/// Another protein entry that explains the same peptide evidence as the [`Protein`]
/// it is listed under
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndistinguishableProtein {
    pub name: String,
    pub annotation: Annotation,
    pub parameters: Vec<Parameter>,
}

impl IndistinguishableProtein {
    pub fn description(&self) -> &str {
        &self.annotation.protein_description
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Protein {
    pub name: String,
    pub annotation: Annotation,

    pub probability: f64,
    pub percent_coverage: f64,
    pub pct_spectrum_ids: f64,
    pub confidence: f64,

    pub n_indistinguishable_proteins: i32,
    pub total_number_peptides: i32,
    pub total_number_distinct_peptides: i32,

    pub group_sibling_id: String,
    pub subsuming_protein_entry: String,
    /// The `+`-delimited `unique_stripped_peptides` attribute, split
    pub unique_stripped_peptides: Vec<String>,

    pub peptides: Vec<Peptide>,
    pub indistinguishable_proteins: Vec<IndistinguishableProtein>,
    pub parameters: Vec<Parameter>,

    /// StPeter spectral quantitation, when the report has been through it
    pub quant: Option<StPeterQuant>,
    /// Every `analysis_result`, Libra quantitation included
    pub analysis_results: Vec<AnalysisResult>,
}

impl Protein {
    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The protein's residue count, when the `prot_length` parameter is present
    pub fn length(&self) -> Option<usize> {
        self.parameter("prot_length")
            .and_then(|p| p.value.trim().parse().ok())
    }

    /// The primary name followed by the name of every indistinguishable protein
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.indistinguishable_proteins.iter().map(|p| p.name.as_str()))
    }

    pub fn has_quant(&self) -> bool {
        self.quant.is_some()
    }

    /// The `protein_description` of the protein's `annotation`, empty if there is none
    pub fn description(&self) -> &str {
        &self.annotation.protein_description
    }

    /// The first Libra quantitation reported for this protein
    pub fn libra_quant(&self) -> Option<&LibraQuant> {
        self.analysis_results
            .iter()
            .flat_map(|r| r.libra.iter())
            .next()
    }
}

/// A cluster of one or more proteins sharing a probability score
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinGroup {
    pub group_number: i32,
    pub probability: f64,
    pub pseudo_name: String,
    pub proteins: Vec<Protein>,
}

impl ProteinGroup {
    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Protein> {
        self.proteins.iter()
    }
}

impl std::ops::Index<usize> for ProteinGroup {
    type Output = Protein;

    fn index(&self, index: usize) -> &Self::Output {
        &self.proteins[index]
    }
}

impl<'a> IntoIterator for &'a ProteinGroup {
    type Item = &'a Protein;
    type IntoIter = std::slice::Iter<'a, Protein>;

    fn into_iter(self) -> Self::IntoIter {
        self.proteins.iter()
    }
}
