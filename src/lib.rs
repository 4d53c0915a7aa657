pub mod io;
pub mod model;

pub use crate::io::protxml::ProtXMLReader;
pub use crate::model::{Peptide, Protein, ProteinGroup, ProteinSummary};
