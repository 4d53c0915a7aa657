use std::fmt::Display;
use std::io;

use quick_xml::events::BytesStart;
use quick_xml::Error as XMLError;

use thiserror::Error;

/**
The different states the [`ProtXMLReader`](super::ProtXMLReader) can enter while parsing
different phases of the document. This information is really only needed by the
module consumer to determine where in the document an error occurred.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum ProtXMLParserState {
    Start = 0,

    // Top-level metadata
    ProteinSummary,
    ProteinSummaryHeader,
    ProgramDetails,
    ProteinProphetDetails,
    AnalysisSummary,

    ProteinGroup,
    Protein,
    IndistinguishableProtein,
    Annotation,
    Parameter,

    Peptide,
    PeptideParentProtein,
    IndistinguishablePeptide,
    ModificationInfo,
    ModAminoAcidMass,

    StPeterQuant,
    StPeterQuantPeptide,

    AnalysisResult,
    LibraResult,
    LibraSummary,

    Done,
    ParserError,
}

/// Where in the source stream something happened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextPosition {
    /// 1-based line number
    pub line: u64,
    /// Byte offset into the (decompressed) document
    pub offset: u64,
}

impl Display for TextPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} (byte {})", self.line, self.offset)
    }
}

/// The coarse classification of how a parse ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Ok,
    Cancelled,
    Io,
    Syntax,
    TagMismatch,
    DuplicateAttribute,
}

impl ErrorCategory {
    /// Whether a command line front end should exit with a failure status
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Ok | Self::Cancelled)
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Cancelled => "cancelled",
            Self::Io => "io",
            Self::Syntax => "syntax",
            Self::TagMismatch => "tag-mismatch",
            Self::DuplicateAttribute => "duplicate-attribute",
        };
        f.write_str(label)
    }
}

/// How a parse that did not fail ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The whole document was read
    Complete,
    /// The cancellation flag was observed between chunks. The document holds
    /// whatever was read before that point.
    Cancelled,
}

impl ParseOutcome {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Complete => ErrorCategory::Ok,
            Self::Cancelled => ErrorCategory::Cancelled,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/**
All the ways that protXML parsing can fail. Every variant is fatal for the parse
that produced it.
*/
#[derive(Debug, Error)]
pub enum ProtXMLParserError {
    #[error("An IO error {1} was encountered in {0:?}")]
    IOError(ProtXMLParserState, #[source] io::Error),
    #[error("Malformed XML at {position} in {state:?}: {message}")]
    SyntaxError {
        state: ProtXMLParserState,
        position: TextPosition,
        message: String,
    },
    #[error("XML tag mismatch at {position} in {state:?}: expected </{expected}> but found </{found}>")]
    TagMismatch {
        state: ProtXMLParserState,
        position: TextPosition,
        expected: String,
        found: String,
    },
    #[error("Duplicate attribute on <{element}> at {position} in {state:?}")]
    DuplicateAttribute {
        state: ProtXMLParserState,
        position: TextPosition,
        element: String,
    },
}

impl ProtXMLParserError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IOError(_, _) => ErrorCategory::Io,
            Self::SyntaxError { .. } => ErrorCategory::Syntax,
            Self::TagMismatch { .. } => ErrorCategory::TagMismatch,
            Self::DuplicateAttribute { .. } => ErrorCategory::DuplicateAttribute,
        }
    }

    pub fn position(&self) -> Option<TextPosition> {
        match self {
            Self::IOError(_, _) => None,
            Self::SyntaxError { position, .. }
            | Self::TagMismatch { position, .. }
            | Self::DuplicateAttribute { position, .. } => Some(*position),
        }
    }

    /// The line the failure was detected on, when known
    pub fn line(&self) -> Option<u64> {
        self.position().map(|p| p.line)
    }

    pub fn state(&self) -> ProtXMLParserState {
        match self {
            Self::IOError(state, _) => *state,
            Self::SyntaxError { state, .. }
            | Self::TagMismatch { state, .. }
            | Self::DuplicateAttribute { state, .. } => *state,
        }
    }

    /// Classify an error raised by the tokenizer
    pub(crate) fn from_xml(
        error: XMLError,
        state: ProtXMLParserState,
        position: TextPosition,
        element: Option<&str>,
    ) -> Self {
        match error {
            XMLError::Io(e) => Self::IOError(state, io::Error::new(e.kind(), e.to_string())),
            XMLError::EndEventMismatch { expected, found } => Self::TagMismatch {
                state,
                position,
                expected,
                found,
            },
            XMLError::InvalidAttr(quick_xml::events::attributes::AttrError::Duplicated(_, _)) => {
                Self::DuplicateAttribute {
                    state,
                    position,
                    element: element.unwrap_or_default().to_string(),
                }
            }
            e => Self::SyntaxError {
                state,
                position,
                message: e.to_string(),
            },
        }
    }

    pub(crate) fn syntax(
        state: ProtXMLParserState,
        position: TextPosition,
        message: impl Into<String>,
    ) -> Self {
        Self::SyntaxError {
            state,
            position,
            message: message.into(),
        }
    }
}

impl From<ProtXMLParserError> for io::Error {
    fn from(value: ProtXMLParserError) -> Self {
        match value {
            ProtXMLParserError::IOError(_, ref e) => io::Error::new(e.kind(), value),
            _ => io::Error::new(io::ErrorKind::InvalidData, value),
        }
    }
}

pub type ParserResult = Result<ProtXMLParserState, ProtXMLParserError>;

/**
The ordered attributes of one start tag, unescaped.

Lookup is case-sensitive and exact. A missing attribute reads as the empty string.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the attributes of `event`. Duplicated and malformed attributes are
    /// reported as [`XMLError::InvalidAttr`].
    pub fn from_start(event: &BytesStart) -> Result<Self, XMLError> {
        let mut entries = Vec::new();
        for attr_parsed in event.attributes() {
            let attr = attr_parsed?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            entries.push((key, value));
        }
        Ok(Self { entries })
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// The value of `name` only if it is present and non-empty
    pub fn get_nonempty(&self, name: &str) -> Option<&str> {
        let value = self.get(name);
        (!value.is_empty()).then_some(value)
    }

    pub fn float(&self, name: &str) -> f64 {
        parse_float_lenient(self.get(name))
    }

    pub fn int(&self, name: &str) -> i32 {
        parse_int_lenient(self.get(name))
    }

    /// `true` when the value begins with `Y`, as the report's `Y`/`N` flags do
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).starts_with('Y')
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/**
The SAX-style callbacks the document builder receives from the driver loop.

Self-closing elements are delivered as a [`ProtXMLSAX::start_element`] immediately
followed by a [`ProtXMLSAX::end_element`].
*/
pub trait ProtXMLSAX {
    fn start_element(
        &mut self,
        name: &str,
        attributes: &Attributes,
        state: ProtXMLParserState,
    ) -> ParserResult;

    fn end_element(&mut self, name: &str, state: ProtXMLParserState) -> ParserResult;

    fn characters(&mut self, text: &[u8], state: ProtXMLParserState) -> ParserResult;
}

/// The leading run of `s` that a C `strtod` would consume, without the `nan` and
/// `inf` spellings
fn numeric_prefix(s: &str, allow_fraction: bool) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut n_digits = end - digits_start;
    if !allow_fraction {
        return if n_digits > 0 { &s[..end] } else { "" };
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        let fraction_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        n_digits += end - fraction_start;
    }
    if n_digits == 0 {
        return "";
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    &s[..end]
}

/**
Read a floating point number the way the report's producers expect it to be read:
leading whitespace is skipped, the longest numeric prefix is used, and anything
that does not start with a number is `0.0`.
*/
pub fn parse_float_lenient(s: &str) -> f64 {
    numeric_prefix(s.trim_start(), true)
        .parse()
        .unwrap_or(0.0)
}

/// Read an integer from the longest numeric prefix of `s`, saturating on overflow
/// and `0` when there is no number.
pub fn parse_int_lenient(s: &str) -> i32 {
    let prefix = numeric_prefix(s.trim_start(), false);
    if prefix.is_empty() {
        return 0;
    }
    match prefix.parse::<i64>() {
        Ok(v) => v.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
        Err(_) if prefix.starts_with('-') => i32::MIN,
        Err(_) => i32::MAX,
    }
}
