use indexmap::IndexMap;

use super::ProteinSummary;

/// The position of a [`ProteinGroup`](super::ProteinGroup) in a [`ProteinSummary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupHandle(pub usize);

/// The position of a [`Protein`](super::Protein) in a [`ProteinSummary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinHandle {
    pub group: usize,
    pub protein: usize,
}

/// The position of a [`Peptide`](super::Peptide) in a [`ProteinSummary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeptideHandle {
    pub group: usize,
    pub protein: usize,
    pub peptide: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndistinguishablePeptideHandle {
    pub peptide: PeptideHandle,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndistinguishableProteinHandle {
    pub protein: ProteinHandle,
    pub index: usize,
}

impl GroupHandle {
    pub fn protein(self, protein: usize) -> ProteinHandle {
        ProteinHandle {
            group: self.0,
            protein,
        }
    }
}

impl ProteinHandle {
    pub fn group(self) -> GroupHandle {
        GroupHandle(self.group)
    }

    pub fn peptide(self, peptide: usize) -> PeptideHandle {
        PeptideHandle {
            group: self.group,
            protein: self.protein,
            peptide,
        }
    }

    pub fn indistinguishable_protein(self, index: usize) -> IndistinguishableProteinHandle {
        IndistinguishableProteinHandle {
            protein: self,
            index,
        }
    }
}

impl PeptideHandle {
    pub fn protein(self) -> ProteinHandle {
        ProteinHandle {
            group: self.group,
            protein: self.protein,
        }
    }

    pub fn indistinguishable_peptide(self, index: usize) -> IndistinguishablePeptideHandle {
        IndistinguishablePeptideHandle {
            peptide: self,
            index,
        }
    }
}

/**
Upward navigation over a finished [`ProteinSummary`].

Entries are ordered by first occurrence in the document. Built once with
[`ProteinIndex::build`] or [`ProteinSummary::build_index`]; it does not follow later
changes to the summary.
*/
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinIndex {
    /// Every protein name, including indistinguishable protein names, to the
    /// protein entry that lists it
    pub proteins: IndexMap<String, ProteinHandle>,
    /// Every bare peptide sequence to the peptide entries that report it
    pub peptides: IndexMap<String, Vec<PeptideHandle>>,
}

impl ProteinIndex {
    pub fn build(summary: &ProteinSummary) -> Self {
        let mut index = Self::default();
        for (group_i, group) in summary.iter().enumerate() {
            for (protein_i, protein) in group.iter().enumerate() {
                let protein_handle = GroupHandle(group_i).protein(protein_i);
                for name in protein.all_names() {
                    index
                        .proteins
                        .entry(name.to_string())
                        .or_insert(protein_handle);
                }
                for (peptide_i, peptide) in protein.peptides.iter().enumerate() {
                    index
                        .peptides
                        .entry(peptide.sequence.clone())
                        .or_default()
                        .push(protein_handle.peptide(peptide_i));
                }
            }
        }
        index
    }

    pub fn protein(&self, name: &str) -> Option<ProteinHandle> {
        self.proteins.get(name).copied()
    }

    /// The peptide entries for a bare sequence, across all proteins
    pub fn peptide(&self, sequence: &str) -> &[PeptideHandle] {
        self.peptides
            .get(sequence)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// The distinct proteins a bare sequence was reported under
    pub fn proteins_for_peptide(&self, sequence: &str) -> Vec<ProteinHandle> {
        let mut proteins: Vec<ProteinHandle> =
            self.peptide(sequence).iter().map(|p| p.protein()).collect();
        proteins.dedup();
        proteins
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }
}
