//! Implements a streaming parser for the protXML protein identification reports
//! written by ProteinProphet and annotated by StPeter.
//!
//! The reader is a single forward pass over the document. Every element is appended
//! to a [`ProteinSummary`](crate::model::ProteinSummary) in document order, and
//! `modification_info` blocks are rendered into annotated sequences like
//! `n[43]PE[80]PTIDE` as they close.

mod builder;
mod context;
mod reader;
mod reading_shared;

pub use builder::ProteinSummaryBuilder;
pub use context::{ContextEntry, ContextKind, ContextMismatch, ContextStack, ModificationTarget};
pub use reader::{is_protxml, read_path, ProtXMLReader, DEFAULT_CHUNK_SIZE};
pub use reading_shared::{
    parse_float_lenient, parse_int_lenient, Attributes, ErrorCategory, ParseOutcome,
    ParserResult, ProtXMLParserError, ProtXMLParserState, ProtXMLSAX, TextPosition,
};
