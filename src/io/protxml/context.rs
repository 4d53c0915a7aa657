use std::fmt::Display;

use crate::model::{IndistinguishablePeptideHandle, IndistinguishableProteinHandle, PeptideHandle};

/// The kinds of element that can enclose an identically named child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Peptide,
    IndistinguishablePeptide,
    IndistinguishableProtein,
}

impl Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Peptide => "peptide",
            Self::IndistinguishablePeptide => "indistinguishable_peptide",
            Self::IndistinguishableProtein => "indistinguishable_protein",
        };
        f.write_str(name)
    }
}

/**
An open container on the [`ContextStack`].

The handle is `None` when the container could not be attached to the document,
in which case its children are dropped too.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextEntry {
    Peptide(Option<PeptideHandle>),
    IndistinguishablePeptide(Option<IndistinguishablePeptideHandle>),
    IndistinguishableProtein(Option<IndistinguishableProteinHandle>),
}

impl ContextEntry {
    pub fn kind(&self) -> ContextKind {
        match self {
            Self::Peptide(_) => ContextKind::Peptide,
            Self::IndistinguishablePeptide(_) => ContextKind::IndistinguishablePeptide,
            Self::IndistinguishableProtein(_) => ContextKind::IndistinguishableProtein,
        }
    }
}

/// Which record a `modification_info` or `mod_aminoacid_mass` belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationTarget {
    Peptide(PeptideHandle),
    IndistinguishablePeptide(IndistinguishablePeptideHandle),
}

/// The closing tag did not match the innermost open container. The stack has been
/// popped anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextMismatch {
    pub expected: ContextKind,
    pub found: Option<ContextKind>,
}

impl Display for ContextMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.found {
            Some(found) => write!(f, "closing {} while {} is open", self.expected, found),
            None => write!(f, "closing {} while nothing is open", self.expected),
        }
    }
}

/// The containers that are currently open, innermost last
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    entries: Vec<ContextEntry>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ContextEntry) {
        self.entries.push(entry);
    }

    /// Remove the innermost container, reporting when it is not of the `expected` kind
    pub fn pop(&mut self, expected: ContextKind) -> Result<ContextEntry, ContextMismatch> {
        match self.entries.pop() {
            Some(entry) if entry.kind() == expected => Ok(entry),
            Some(entry) => Err(ContextMismatch {
                expected,
                found: Some(entry.kind()),
            }),
            None => Err(ContextMismatch {
                expected,
                found: None,
            }),
        }
    }

    pub fn top(&self) -> Option<&ContextEntry> {
        self.entries.last()
    }

    /// Where a modification element read now should be attached
    pub fn modification_target(&self) -> Option<ModificationTarget> {
        match self.top()? {
            ContextEntry::Peptide(Some(handle)) => Some(ModificationTarget::Peptide(*handle)),
            ContextEntry::IndistinguishablePeptide(Some(handle)) => {
                Some(ModificationTarget::IndistinguishablePeptide(*handle))
            }
            _ => None,
        }
    }

    /// The innermost open peptide, looking through any open indistinguishable peptide
    pub fn current_peptide(&self) -> Option<PeptideHandle> {
        self.entries.iter().rev().find_map(|entry| match entry {
            ContextEntry::Peptide(handle) => *handle,
            ContextEntry::IndistinguishablePeptide(handle) => handle.map(|h| h.peptide),
            ContextEntry::IndistinguishableProtein(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
