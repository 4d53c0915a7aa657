use std::fmt::Write as _;

/// A mass recorded against a single residue of a peptide sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidueModification {
    /// The 1-based residue position the mass applies to
    pub position: i32,
    /// The total mass of the modified residue, not the mass shift
    pub mass: f64,
}

impl ResidueModification {
    pub fn new(position: i32, mass: f64) -> Self {
        Self { position, mass }
    }
}

/**
The modifications reported for a peptide or an indistinguishable peptide.

The terminal masses use zero to mean "not modified", as the report format does.
*/
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModificationInfo {
    /// The annotated sequence. This is the `modified_peptide` attribute as written
    /// until the block contains residue masses, after which it is rebuilt with
    /// [`ModificationInfo::synthesize_modified_peptide`].
    pub modified_peptide: String,
    /// Residue masses in the order they were read
    pub residue_modifications: Vec<ResidueModification>,
    pub n_terminal_mass: f64,
    pub c_terminal_mass: f64,
}

impl ModificationInfo {
    pub fn has_n_terminal_modification(&self) -> bool {
        self.n_terminal_mass != 0.0
    }

    pub fn has_c_terminal_modification(&self) -> bool {
        self.c_terminal_mass != 0.0
    }

    /// Whether there is anything at all recorded in this block
    pub fn is_empty(&self) -> bool {
        self.residue_modifications.is_empty()
            && !self.has_n_terminal_modification()
            && !self.has_c_terminal_modification()
    }

    /// The first residue modification recorded at the 1-based `position`
    pub fn modification_at(&self, position: i32) -> Option<&ResidueModification> {
        self.residue_modifications
            .iter()
            .find(|m| m.position == position)
    }

    /**
    Render `sequence` with this block's masses interleaved, e.g. `n[43]PE[80]PTIDEc[17]`.

    Masses are rounded to the nearest integer. When more than one mass targets the
    same position only the first one recorded is written.
    */
    pub fn synthesize_modified_peptide(&self, sequence: &str) -> String {
        let mut buffer = String::with_capacity(sequence.len() + 8 * (self.residue_modifications.len() + 2));
        if self.has_n_terminal_modification() {
            write_mass_tag(&mut buffer, Some('n'), self.n_terminal_mass);
        }
        for (i, residue) in sequence.chars().enumerate() {
            buffer.push(residue);
            if let Some(modification) = self.modification_at(i as i32 + 1) {
                write_mass_tag(&mut buffer, None, modification.mass);
            }
        }
        if self.has_c_terminal_modification() {
            write_mass_tag(&mut buffer, Some('c'), self.c_terminal_mass);
        }
        buffer
    }
}

fn write_mass_tag(buffer: &mut String, prefix: Option<char>, mass: f64) {
    if let Some(prefix) = prefix {
        buffer.push(prefix);
    }
    // Writing into a `String` cannot fail
    let _ = write!(buffer, "[{mass:.0}]");
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_single_residue() {
        let info = ModificationInfo {
            residue_modifications: vec![ResidueModification::new(2, 79.9)],
            ..Default::default()
        };
        assert_eq!(info.synthesize_modified_peptide("PEPTIDE"), "PE[80]PTIDE");

        // Positions are 1-based
        let info = ModificationInfo {
            residue_modifications: vec![ResidueModification::new(3, 79.9)],
            ..Default::default()
        };
        assert_eq!(info.synthesize_modified_peptide("PEPTIDE"), "PEP[80]TIDE");
    }

    #[test]
    fn test_terminal_modifications() {
        let mut info = ModificationInfo {
            n_terminal_mass: 42.0106,
            ..Default::default()
        };
        assert_eq!(info.synthesize_modified_peptide("AG"), "n[42]AG");

        info.c_terminal_mass = 17.03;
        assert_eq!(info.synthesize_modified_peptide("AG"), "n[42]AGc[17]");

        info.n_terminal_mass = 0.0;
        assert_eq!(info.synthesize_modified_peptide("AG"), "AGc[17]");
    }

    #[test]
    fn test_first_match_wins() {
        let info = ModificationInfo {
            residue_modifications: vec![
                ResidueModification::new(1, 147.0354),
                ResidueModification::new(2, 160.0306),
                ResidueModification::new(1, 200.0),
            ],
            ..Default::default()
        };
        assert_eq!(info.synthesize_modified_peptide("MCK"), "M[147]C[160]K");
        assert_eq!(info.modification_at(1).unwrap().mass, 147.0354);
    }

    #[test]
    fn test_out_of_range_and_empty() {
        let info = ModificationInfo {
            residue_modifications: vec![ResidueModification::new(12, 160.03)],
            ..Default::default()
        };
        assert_eq!(info.synthesize_modified_peptide("PEPTIDE"), "PEPTIDE");
        assert_eq!(info.synthesize_modified_peptide(""), "");
        assert!(!info.is_empty());
        assert!(ModificationInfo::default().is_empty());
    }
}
