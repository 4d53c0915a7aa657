pub mod protxml;

pub(crate) mod compression;

pub use crate::io::protxml::{
    is_protxml, read_path, ErrorCategory, ParseOutcome, ProtXMLParserError, ProtXMLParserState,
    ProtXMLReader,
};
