//! The in-memory representation of a protXML protein identification report.
//!
//! A [`ProteinSummary`] owns every entity read from the document. Entities are stored
//! in document order and are never reordered, so the `n`th `protein_group` element is
//! always at index `n - 1`, and likewise for the proteins, peptides and
//! indistinguishable peptides nested inside it.

mod analysis;
mod index;
mod modification;
mod peptide;
mod protein;
mod quant;
mod summary;

pub use analysis::{
    AffectedChannel, AnalysisResult, AnalysisSummary, ContributingChannel, DecoyAnalysisSummary,
    FragmentMass, LibraSummary, NspDistribution, NspInformation, ProteinProphetDetails,
};
pub use index::{
    GroupHandle, IndistinguishablePeptideHandle, IndistinguishableProteinHandle, PeptideHandle,
    ProteinHandle, ProteinIndex,
};
pub use modification::{ModificationInfo, ResidueModification};
pub use peptide::{IndistinguishablePeptide, Peptide};
pub use protein::{Annotation, IndistinguishableProtein, Parameter, Protein, ProteinGroup};
pub use quant::{
    LibraIntensity, LibraQuant, StPeterQuant, StPeterQuantPeptide, StPeterSummary,
};
pub use summary::{DocumentSummary, ErrorPoint};

/// A complete protXML document: the header metadata and every protein group
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinSummary {
    pub summary: DocumentSummary,
    pub groups: Vec<ProteinGroup>,
}

impl ProteinSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of protein groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProteinGroup> {
        self.groups.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProteinGroup> {
        self.groups.iter()
    }

    /// Iterate over every protein of every group, in document order
    pub fn proteins(&self) -> impl Iterator<Item = &Protein> {
        self.groups.iter().flat_map(|g| g.proteins.iter())
    }

    /// Iterate over every peptide of every protein, in document order
    pub fn peptides(&self) -> impl Iterator<Item = &Peptide> {
        self.proteins().flat_map(|p| p.peptides.iter())
    }

    pub fn algorithm_name(&self) -> &str {
        &self.summary.algorithm_name
    }

    pub fn version(&self) -> &str {
        &self.summary.version
    }

    pub fn source_file_count(&self) -> usize {
        self.summary.source_file_count()
    }

    pub fn source_file(&self, index: usize) -> Option<&str> {
        self.summary.source_file(index)
    }

    pub fn has_stpeter(&self) -> bool {
        self.summary.has_stpeter()
    }

    pub fn stpeter_summary(&self) -> Option<&StPeterSummary> {
        self.summary.stpeter.as_ref()
    }

    /// Build the name and sequence lookup index for this document
    pub fn build_index(&self) -> ProteinIndex {
        ProteinIndex::build(self)
    }

    pub fn clear(&mut self) {
        self.summary = DocumentSummary::default();
        self.groups.clear();
    }

    pub fn group(&self, handle: GroupHandle) -> Option<&ProteinGroup> {
        self.groups.get(handle.0)
    }

    pub fn protein(&self, handle: ProteinHandle) -> Option<&Protein> {
        self.groups
            .get(handle.group)
            .and_then(|g| g.proteins.get(handle.protein))
    }

    pub fn peptide(&self, handle: PeptideHandle) -> Option<&Peptide> {
        self.protein(handle.protein())
            .and_then(|p| p.peptides.get(handle.peptide))
    }

    pub fn indistinguishable_peptide(
        &self,
        handle: IndistinguishablePeptideHandle,
    ) -> Option<&IndistinguishablePeptide> {
        self.peptide(handle.peptide)
            .and_then(|p| p.indistinguishable_peptides.get(handle.index))
    }

    pub(crate) fn group_mut(&mut self, handle: GroupHandle) -> Option<&mut ProteinGroup> {
        self.groups.get_mut(handle.0)
    }

    pub(crate) fn protein_mut(&mut self, handle: ProteinHandle) -> Option<&mut Protein> {
        self.groups
            .get_mut(handle.group)
            .and_then(|g| g.proteins.get_mut(handle.protein))
    }

    pub(crate) fn peptide_mut(&mut self, handle: PeptideHandle) -> Option<&mut Peptide> {
        self.protein_mut(handle.protein())
            .and_then(|p| p.peptides.get_mut(handle.peptide))
    }

    pub(crate) fn indistinguishable_peptide_mut(
        &mut self,
        handle: IndistinguishablePeptideHandle,
    ) -> Option<&mut IndistinguishablePeptide> {
        self.peptide_mut(handle.peptide)
            .and_then(|p| p.indistinguishable_peptides.get_mut(handle.index))
    }

    pub(crate) fn indistinguishable_protein_mut(
        &mut self,
        handle: IndistinguishableProteinHandle,
    ) -> Option<&mut IndistinguishableProtein> {
        self.protein_mut(handle.protein)
            .and_then(|p| p.indistinguishable_proteins.get_mut(handle.index))
    }

    pub(crate) fn push_group(&mut self, group: ProteinGroup) -> GroupHandle {
        self.groups.push(group);
        GroupHandle(self.groups.len() - 1)
    }

    pub(crate) fn push_protein(
        &mut self,
        parent: GroupHandle,
        protein: Protein,
    ) -> Option<ProteinHandle> {
        let group = self.group_mut(parent)?;
        group.proteins.push(protein);
        Some(parent.protein(group.proteins.len() - 1))
    }

    pub(crate) fn push_peptide(
        &mut self,
        parent: ProteinHandle,
        peptide: Peptide,
    ) -> Option<PeptideHandle> {
        let protein = self.protein_mut(parent)?;
        protein.peptides.push(peptide);
        Some(parent.peptide(protein.peptides.len() - 1))
    }

    pub(crate) fn push_indistinguishable_peptide(
        &mut self,
        parent: PeptideHandle,
        peptide: IndistinguishablePeptide,
    ) -> Option<IndistinguishablePeptideHandle> {
        let parent_peptide = self.peptide_mut(parent)?;
        parent_peptide.indistinguishable_peptides.push(peptide);
        Some(parent.indistinguishable_peptide(parent_peptide.indistinguishable_peptides.len() - 1))
    }

    pub(crate) fn push_indistinguishable_protein(
        &mut self,
        parent: ProteinHandle,
        protein: IndistinguishableProtein,
    ) -> Option<IndistinguishableProteinHandle> {
        let parent_protein = self.protein_mut(parent)?;
        parent_protein.indistinguishable_proteins.push(protein);
        Some(parent.indistinguishable_protein(parent_protein.indistinguishable_proteins.len() - 1))
    }

    #[cfg(feature = "serde")]
    /// Write the document out in JSON format to `writer`
    pub fn to_writer<W: std::io::Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, self)
    }

    #[cfg(feature = "serde")]
    /// Read a document previously written with [`ProteinSummary::to_writer`]
    pub fn from_reader<R: std::io::Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }
}

impl std::ops::Index<usize> for ProteinSummary {
    type Output = ProteinGroup;

    fn index(&self, index: usize) -> &Self::Output {
        &self.groups[index]
    }
}

impl<'a> IntoIterator for &'a ProteinSummary {
    type Item = &'a ProteinGroup;
    type IntoIter = std::slice::Iter<'a, ProteinGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
