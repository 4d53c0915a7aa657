use std::fs;
use std::io::{self, prelude::*, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use flate2::bufread::MultiGzDecoder;
use log::{debug, warn};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::io::compression::is_gzipped;
use crate::model::{ProteinGroup, ProteinSummary};

use super::builder::ProteinSummaryBuilder;
use super::reading_shared::{
    Attributes, ParseOutcome, ProtXMLParserError, ProtXMLParserState, ProtXMLSAX, TextPosition,
};

/// The number of bytes requested from the source at a time
pub const DEFAULT_CHUNK_SIZE: usize = 16384;

/// Plain or gzip-compressed bytes, decided by sniffing the first chunk
enum DecodedStream<R: BufRead> {
    Plain(R),
    Gzip(MultiGzDecoder<R>),
}

impl<R: BufRead> Read for DecodedStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(inner) => inner.read(buf),
            Self::Gzip(inner) => inner.read(buf),
        }
    }
}

/**
A [`BufRead`] over the decoded document that pulls at most `chunk_size` bytes at a
time, checks the cancellation flag before every pull and keeps track of how many
lines and bytes the tokenizer has consumed.
*/
struct ChunkedSource<R: Read> {
    inner: R,
    chunk: Vec<u8>,
    pos: usize,
    filled: usize,
    chunks_read: u64,
    newlines: u64,
    consumed: u64,
    cancel_flag: Arc<AtomicBool>,
    cancelled: bool,
}

impl<R: Read> ChunkedSource<R> {
    fn new(inner: R, chunk_size: usize, cancel_flag: Arc<AtomicBool>) -> Self {
        Self {
            inner,
            chunk: vec![0; chunk_size.max(1)],
            pos: 0,
            filled: 0,
            chunks_read: 0,
            newlines: 0,
            consumed: 0,
            cancel_flag,
            cancelled: false,
        }
    }

    /// The 1-based line of the next unconsumed byte
    fn line(&self) -> u64 {
        self.newlines + 1
    }

    fn was_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl<R: Read> BufRead for ChunkedSource<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.filled {
            if self.cancel_flag.load(Ordering::Relaxed) {
                self.cancelled = true;
                return Err(io::Error::new(io::ErrorKind::Other, "parse cancelled"));
            }
            self.filled = self.inner.read(&mut self.chunk)?;
            self.pos = 0;
            if self.filled > 0 {
                self.chunks_read += 1;
            }
        }
        Ok(&self.chunk[self.pos..self.filled])
    }

    fn consume(&mut self, amt: usize) {
        let end = (self.pos + amt).min(self.filled);
        self.newlines += self.chunk[self.pos..end]
            .iter()
            .filter(|b| **b == b'\n')
            .count() as u64;
        self.consumed += (end - self.pos) as u64;
        self.pos = end;
    }
}

impl<R: Read> Read for ChunkedSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

/**
A reusable protXML parsing session.

Each call to [`ProtXMLReader::parse_path`] or [`ProtXMLReader::parse_reader`]
replaces the previously parsed [`ProteinSummary`]. A failed parse leaves an empty
document behind, a cancelled one keeps whatever was read before the cancellation
was observed.

```no_run
use protxml::io::ProtXMLReader;

let mut reader = ProtXMLReader::new();
reader.parse_path("interact.prot.xml")?;
for group in reader.document() {
    println!("{} {}", group.group_number, group.probability);
}
# Ok::<(), protxml::io::ProtXMLParserError>(())
```
*/
#[derive(Debug)]
pub struct ProtXMLReader {
    pub state: ProtXMLParserState,
    builder: ProteinSummaryBuilder,
    chunk_size: usize,
    cancelled: Arc<AtomicBool>,
    buffer: Vec<u8>,
}

impl Default for ProtXMLReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtXMLReader {
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Create a session that requests `chunk_size` bytes from its sources at a time.
    /// Cancellation is only observed between chunks.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            state: ProtXMLParserState::Start,
            builder: ProteinSummaryBuilder::new(),
            chunk_size: chunk_size.max(1),
            cancelled: Arc::new(AtomicBool::new(false)),
            buffer: Vec::new(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// A handle that can be set from another thread to stop the current or next parse
    pub fn cancellation_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Parsing does not clear a pending cancellation, callers must do so explicitly
    pub fn clear_cancellation(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Discard the parsed document and return to the initial state
    pub fn reset(&mut self) {
        self.state = ProtXMLParserState::Start;
        self.builder.reset();
        self.buffer.clear();
    }

    pub fn document(&self) -> &ProteinSummary {
        &self.builder.document
    }

    /// Move the parsed document out, leaving an empty one in its place
    pub fn take_document(&mut self) -> ProteinSummary {
        std::mem::take(&mut self.builder.document)
    }

    pub fn into_document(self) -> ProteinSummary {
        self.builder.into_document()
    }

    /// The number of protein groups read
    pub fn len(&self) -> usize {
        self.document().len()
    }

    pub fn is_empty(&self) -> bool {
        self.document().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProteinGroup> {
        self.document().get(index)
    }

    /// The number of structural-consistency warnings raised by the last parse
    pub fn warnings(&self) -> usize {
        self.builder.warnings()
    }

    /// Open and parse the file at `path`, which may be gzip-compressed
    pub fn parse_path<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<ParseOutcome, ProtXMLParserError> {
        self.reset();
        let path = path.as_ref();
        debug!("Opening {}", path.display());
        let handle = fs::File::open(path)
            .map_err(|e| ProtXMLParserError::IOError(ProtXMLParserState::Start, e))?;
        self.parse_reader(handle)
    }

    /// Parse a complete protXML document from `reader`, which may be gzip-compressed
    pub fn parse_reader<R: Read>(&mut self, reader: R) -> Result<ParseOutcome, ProtXMLParserError> {
        self.reset();
        if self.is_cancelled() {
            debug!("Parse cancelled before reading");
            return Ok(ParseOutcome::Cancelled);
        }

        // Room for the two byte gzip magic number
        let mut raw = BufReader::with_capacity(self.chunk_size.max(2), reader);
        let header = raw
            .fill_buf()
            .map_err(|e| ProtXMLParserError::IOError(self.state, e))?;
        let stream = if is_gzipped(header) {
            debug!("Decompressing gzipped input");
            DecodedStream::Gzip(MultiGzDecoder::new(raw))
        } else {
            DecodedStream::Plain(raw)
        };

        let source = ChunkedSource::new(stream, self.chunk_size, self.cancelled.clone());
        let mut reader = Reader::from_reader(source);
        reader.trim_text(false);
        reader.check_end_names(true);
        reader.expand_empty_elements(false);

        let result = self.drive(&mut reader);
        self.buffer.clear();
        let source = reader.get_ref();
        match result {
            Ok(ParseOutcome::Complete) => {
                if !self.builder.context().is_empty() {
                    warn!(
                        "{} peptide containers were still open at the end of the document",
                        self.builder.context().len()
                    );
                }
                debug!(
                    "Read {} protein groups from {} bytes in {} chunks with {} warnings",
                    self.len(),
                    source.consumed,
                    source.chunks_read,
                    self.warnings()
                );
                Ok(ParseOutcome::Complete)
            }
            Ok(ParseOutcome::Cancelled) => {
                debug!(
                    "Parse cancelled after {} chunks with {} protein groups read",
                    source.chunks_read,
                    self.len()
                );
                Ok(ParseOutcome::Cancelled)
            }
            Err(err) => {
                debug!("Parse failed: {err}");
                self.builder.reset();
                self.state = ProtXMLParserState::ParserError;
                Err(err)
            }
        }
    }

    fn drive<R: Read>(
        &mut self,
        reader: &mut Reader<ChunkedSource<R>>,
    ) -> Result<ParseOutcome, ProtXMLParserError> {
        let mut open_elements: Vec<String> = Vec::new();
        let mut root_closed = false;
        loop {
            let line_before = reader.get_ref().line();
            let offset_before = reader.buffer_position() as u64;
            let event = reader.read_event_into(&mut self.buffer);
            let position = TextPosition {
                line: reader.get_ref().line(),
                offset: reader.buffer_position() as u64,
            };
            match event {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if root_closed {
                        return Err(ProtXMLParserError::syntax(
                            self.state,
                            position,
                            format!("<{name}> found after the document element"),
                        ));
                    }
                    let attributes = Attributes::from_start(e).map_err(|err| {
                        ProtXMLParserError::from_xml(err, self.state, position, Some(&name))
                    })?;
                    self.state = self
                        .builder
                        .start_element(&name, &attributes, self.state)?;
                    if matches!(event, Ok(Event::Empty(_))) {
                        self.state = self.builder.end_element(&name, self.state)?;
                        root_closed = open_elements.is_empty();
                    } else {
                        open_elements.push(name);
                    }
                }
                Ok(Event::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    self.state = self.builder.end_element(&name, self.state)?;
                    open_elements.pop();
                    root_closed = open_elements.is_empty();
                }
                Ok(Event::Text(ref e)) => {
                    // Whitespace between elements is not content
                    if let Some(start) = e.iter().position(|b| !b.is_ascii_whitespace()) {
                        if open_elements.is_empty() {
                            let leading_newlines =
                                e[..start].iter().filter(|b| **b == b'\n').count() as u64;
                            let position = TextPosition {
                                line: line_before + leading_newlines,
                                offset: offset_before + start as u64,
                            };
                            return Err(ProtXMLParserError::syntax(
                                self.state,
                                position,
                                "text found outside of the document element",
                            ));
                        }
                        let end = e
                            .iter()
                            .rposition(|b| !b.is_ascii_whitespace())
                            .map_or(start, |i| i + 1);
                        self.state = self.builder.characters(&e[start..end], self.state)?;
                    }
                }
                Ok(Event::CData(ref e)) => {
                    self.state = self.builder.characters(e, self.state)?;
                }
                Ok(Event::Eof) => {
                    if let Some(name) = open_elements.last() {
                        return Err(ProtXMLParserError::syntax(
                            self.state,
                            position,
                            format!("<{name}> is never closed"),
                        ));
                    }
                    if !root_closed {
                        return Err(ProtXMLParserError::syntax(
                            self.state,
                            position,
                            "no document element found",
                        ));
                    }
                    return Ok(ParseOutcome::Complete);
                }
                Ok(_) => {}
                Err(err) => {
                    if reader.get_ref().was_cancelled() {
                        return Ok(ParseOutcome::Cancelled);
                    }
                    return Err(ProtXMLParserError::from_xml(err, self.state, position, None));
                }
            }
            self.buffer.clear();
        }
    }
}

impl std::ops::Index<usize> for ProtXMLReader {
    type Output = ProteinGroup;

    fn index(&self, index: usize) -> &Self::Output {
        &self.document()[index]
    }
}

/// Read the protXML document at `path` in one call
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<ProteinSummary, ProtXMLParserError> {
    let mut reader = ProtXMLReader::new();
    reader.parse_path(path)?;
    Ok(reader.into_document())
}

/// Check whether `buf` begins a protXML document, inflating it first if it is gzipped.
/// A truncated gzip prefix is fine as long as it reaches the document element.
pub fn is_protxml(buf: &[u8]) -> bool {
    if is_gzipped(buf) {
        starts_protein_summary(BufReader::new(MultiGzDecoder::new(buf)))
    } else {
        starts_protein_summary(buf)
    }
}

fn starts_protein_summary<R: BufRead>(source: R) -> bool {
    let mut reader = Reader::from_reader(source);
    let mut buffer = Vec::new();
    loop {
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                return e.name().as_ref() == b"protein_summary"
            }
            Ok(Event::Eof) => return false,
            Ok(_) => {}
            Err(_) => return false,
        }
        buffer.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::io::protxml::ErrorCategory;
    use std::io::Cursor;

    const SMALL: &str = "./test/data/small.prot.xml";
    const SMALL_GZ: &str = "./test/data/small.prot.xml.gz";

    /// Counts the reads made against the wrapped bytes
    struct CountingReader {
        inner: Cursor<Vec<u8>>,
        reads: Arc<std::sync::atomic::AtomicUsize>,
    }

    impl Read for CountingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(buf)
        }
    }

    fn parse_str(text: &str) -> (ProtXMLReader, Result<ParseOutcome, ProtXMLParserError>) {
        let mut reader = ProtXMLReader::new();
        let result = reader.parse_reader(text.as_bytes());
        (reader, result)
    }

    #[test_log::test]
    fn test_read_small() -> io::Result<()> {
        let mut reader = ProtXMLReader::new();
        let outcome = reader.parse_path(SMALL)?;
        assert_eq!(outcome, ParseOutcome::Complete);
        assert_eq!(reader.warnings(), 0);

        let doc = reader.document();
        assert_eq!(doc.algorithm_name(), "protein_prophet");
        assert_eq!(doc.version(), "TPP v5.2.0 Flammagenitus");
        assert_eq!(doc.source_file_count(), 2);
        assert_eq!(doc.source_file(0), Some("/data/run1.pep.xml"));
        assert_eq!(doc.source_file(1), Some("/data/run2.pep.xml"));
        assert_eq!(doc.source_file(2), None);
        assert_eq!(doc.summary.reference_database, "/data/uniprot.fasta");
        assert_eq!(doc.summary.error_points.len(), 3);
        assert_eq!(doc.summary.probability_at_error_rate(0.01), Some(0.9));
        assert!(doc.summary.time.is_some());

        assert_eq!(reader.len(), 3);
        let groups: Vec<i32> = doc.iter().map(|g| g.group_number).collect();
        assert_eq!(groups, vec![1, 2, 3]);

        let first = &reader[0][0];
        assert_eq!(first.name, "sp|P02769|ALBU_BOVIN");
        assert_eq!(first.description(), "Serum albumin");
        assert_eq!(first.annotation.ipi_name, "IPI00708398");
        assert_eq!(first.annotation.swissprot_name, "ALBU_BOVIN");
        assert_eq!(first.annotation.refseq_name, "");
        assert_eq!(first.length(), Some(607));
        assert_eq!(first.unique_stripped_peptides, vec!["LVNELTEFAK", "PEPTIDE"]);
        assert_eq!(first.indistinguishable_proteins.len(), 1);
        assert_eq!(
            first.indistinguishable_proteins[0].description(),
            "Albumin variant"
        );

        let sequences: Vec<&str> = first.peptides.iter().map(|p| p.sequence.as_str()).collect();
        assert_eq!(sequences, vec!["LVNELTEFAK", "PEPTIDE"]);
        let peptide = &first.peptides[1];
        assert_eq!(peptide.charge, 2);
        assert!(peptide.is_nondegenerate_evidence);
        assert!(!peptide.is_contributing_evidence);
        assert_eq!(peptide.modified_sequence(), "PE[80]PTIDE");
        assert_eq!(peptide.parent_proteins, vec!["sp|P99999|OTHER"]);

        let alternative = &peptide.indistinguishable_peptides[0];
        assert_eq!(alternative.sequence, "PEPTLDE");
        assert_eq!(alternative.modified_sequence(), "PEPTLDE[147]");
        assert_eq!(
            peptide.modification_info.residue_modifications.len(),
            1,
            "residue masses of an indistinguishable peptide belong to it"
        );

        let terminal = &reader[1][0].peptides[0];
        assert_eq!(terminal.modified_sequence(), "n[42]AG");
        assert_eq!(reader[1][0].probability, 0.0);
        Ok(())
    }

    #[test_log::test]
    fn test_read_analysis_blocks() -> io::Result<()> {
        let doc = read_path(SMALL)?;
        let summary = &doc.summary;
        assert_eq!(summary.dataset_generation.as_deref(), Some("0"));

        let details = summary.proteinprophet_details.as_ref().unwrap();
        assert!(details.occam_flag);
        assert!(!details.fpkm_flag);
        assert_eq!(details.nsp_distribution_iters, 2);
        assert_eq!(details.run_options, "IPROPHET");
        let nsp = details.nsp_information.as_ref().unwrap();
        assert!(nsp.neighboring_bin_smoothing);
        assert_eq!(nsp.distribution.len(), 2);
        assert_eq!(nsp.distribution[0].neg_freq, 0.48);
        assert_eq!(nsp.distribution[0].nsp_upper_bound_excl, "0.00");
        assert_eq!(nsp.distribution[1].nsp_upper_bound_incl, "inf");
        assert_eq!(nsp.distribution[1].alt_pos_to_neg_ratio, 1.85);

        let names: Vec<&str> = summary
            .analysis_summaries
            .iter()
            .map(|a| a.analysis.as_str())
            .collect();
        assert_eq!(names, vec!["libra", "decoy", "stpeter"]);

        let libra = &summary.analysis_summary("libra").unwrap().libra[0];
        assert_eq!(libra.version, "2");
        assert_eq!(libra.channel_code, "114,115");
        assert_eq!(libra.centroiding_preference, 2);
        assert_eq!(libra.normalization, -2);
        assert_eq!(libra.min_prot_prob, 0.5);
        assert_eq!(libra.fragment_masses.len(), 2);
        assert_eq!(libra.fragment_masses[1].mz, 115.1083);
        let contributing = &libra.isotopic_contributions[0];
        assert_eq!(contributing.channel, 114);
        assert_eq!(contributing.affected_channels[0].channel, 115);
        assert_eq!(contributing.affected_channels[0].correction, 0.059);

        let decoy = &summary.analysis_summary("decoy").unwrap().decoy_analysis[0];
        assert_eq!(decoy.decoy_ratio, 1.0);
        assert_eq!(decoy.decoy_string, "DECOY_");
        assert_eq!(decoy.use_confidence, "Y");

        let quant = doc[1][0].libra_quant().unwrap();
        assert_eq!(quant.number, 1);
        assert_eq!(quant.channel(114).unwrap().ratio, 0.4);
        assert_eq!(quant.channel(115).unwrap().error, 0.03);
        assert!(doc[0][0].libra_quant().is_none());
        assert_eq!(doc[0][0].analysis_results[0].analysis, "stpeter");
        Ok(())
    }

    #[test_log::test]
    fn test_read_stpeter() -> io::Result<()> {
        let doc = read_path(SMALL)?;
        assert!(doc.has_stpeter());
        let summary = doc.stpeter_summary().unwrap();
        assert_eq!(summary.version, "2.0");
        assert!(summary.degenerate_peptides);
        assert_eq!(summary.tolerance, 0.4);

        let quant = doc[0][0].quant.as_ref().unwrap();
        assert_eq!(quant.si, 1.25);
        assert_eq!(quant.counts, 12);
        assert_eq!(quant.peptides.len(), 2);
        assert_eq!(quant.peptides[1].sequence, "PEPTIDE");
        assert!(!doc[1][0].has_quant());
        Ok(())
    }

    #[test_log::test]
    fn test_read_gzip() -> io::Result<()> {
        let plain = read_path(SMALL)?;
        let mut reader = ProtXMLReader::with_chunk_size(64);
        let outcome = reader.parse_path(SMALL_GZ)?;
        assert!(outcome.is_complete());
        assert_eq!(reader.document(), &plain);
        Ok(())
    }

    #[test_log::test]
    fn test_small_chunks() -> io::Result<()> {
        let plain = read_path(SMALL)?;
        let mut reader = ProtXMLReader::with_chunk_size(7);
        reader.parse_path(SMALL)?;
        assert_eq!(reader.document(), &plain);
        Ok(())
    }

    #[test_log::test]
    fn test_reparse_is_idempotent() -> io::Result<()> {
        let mut reader = ProtXMLReader::new();
        reader.parse_path(SMALL)?;
        let first = reader.document().clone();
        reader.parse_path(SMALL)?;
        assert_eq!(reader.document(), &first);
        assert_eq!(reader.len(), 3);
        Ok(())
    }

    #[test_log::test]
    fn test_nan_probability() {
        let (reader, result) = parse_str(
            r#"<protein_summary>
<protein_group group_number="1" probability="NaNtext">
<protein protein_name="A" probability="0.5"/>
</protein_group>
</protein_summary>"#,
        );
        assert_eq!(result.unwrap(), ParseOutcome::Complete);
        assert_eq!(reader[0].probability, 0.0);
        assert_eq!(reader[0][0].probability, 0.5);
    }

    #[test_log::test]
    fn test_cancel_before_first_chunk() {
        let reads = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let source = CountingReader {
            inner: Cursor::new(b"<protein_summary/>".to_vec()),
            reads: reads.clone(),
        };
        let mut reader = ProtXMLReader::new();
        reader.cancellation_handle().store(true, Ordering::SeqCst);
        let outcome = reader.parse_reader(source).unwrap();
        assert_eq!(outcome, ParseOutcome::Cancelled);
        assert_eq!(outcome.category(), ErrorCategory::Cancelled);
        assert!(reader.is_empty());
        assert_eq!(reads.load(Ordering::SeqCst), 0);

        // The flag stays set until cleared
        assert!(reader.is_cancelled());
        reader.clear_cancellation();
        let outcome = reader.parse_reader(&b"<protein_summary/>"[..]).unwrap();
        assert!(outcome.is_complete());
    }

    #[test_log::test]
    fn test_cancel_between_chunks() -> io::Result<()> {
        let reads = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut reader = ProtXMLReader::with_chunk_size(64);
        let flag = reader.cancellation_handle();

        struct CancellingReader {
            inner: CountingReader,
            flag: Arc<AtomicBool>,
        }

        impl Read for CancellingReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let n = self.inner.read(buf)?;
                self.flag.store(true, Ordering::SeqCst);
                Ok(n)
            }
        }

        let source = CancellingReader {
            inner: CountingReader {
                inner: Cursor::new(fs::read(SMALL)?),
                reads: reads.clone(),
            },
            flag,
        };
        let outcome = reader.parse_reader(source)?;
        assert_eq!(outcome, ParseOutcome::Cancelled);
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_ne!(reader.state, ProtXMLParserState::ParserError);
        Ok(())
    }

    #[test_log::test]
    fn test_unopened_close_tag() {
        let (reader, result) = parse_str(
            "<protein_summary>\n<protein_group group_number=\"1\">\n</protein_group>\n</protein_group>\n</protein_summary>\n",
        );
        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::TagMismatch);
        assert_eq!(err.line(), Some(4));
        assert!(reader.is_empty());
        assert_eq!(reader.state, ProtXMLParserState::ParserError);
    }

    #[test_log::test]
    fn test_duplicate_attribute() {
        let (reader, result) = parse_str(
            "<protein_summary>\n<protein_group group_number=\"1\" group_number=\"2\">\n</protein_group>\n</protein_summary>",
        );
        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::DuplicateAttribute);
        assert_eq!(err.line(), Some(2));
        assert!(reader.is_empty());
    }

    #[test_log::test]
    fn test_document_level_errors() {
        let (_, result) = parse_str("<protein_summary>\n<protein_group>");
        assert_eq!(result.unwrap_err().category(), ErrorCategory::Syntax);

        let (_, result) = parse_str("<protein_summary/>\n<protein_summary/>");
        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Syntax);
        assert_eq!(err.line(), Some(2));

        let (_, result) = parse_str("");
        assert_eq!(result.unwrap_err().category(), ErrorCategory::Syntax);

        let (_, result) = parse_str("<protein_summary>\n</protein_summary>\ntrailing junk\n");
        let err = result.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Syntax);
        assert_eq!(err.line(), Some(3));

        let (_, result) = parse_str("<protein_summary/>\n\n  \n");
        assert!(result.unwrap().is_complete());
    }

    #[test_log::test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut reader = ProtXMLReader::new();
        let err = reader
            .parse_path(dir.path().join("missing.prot.xml"))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.line(), None);
        assert!(reader.is_empty());
    }

    #[test_log::test]
    fn test_truncated_file() -> io::Result<()> {
        let text = fs::read_to_string(SMALL)?;
        let mut handle = tempfile::NamedTempFile::new()?;
        handle.write_all(text[..text.len() / 2].as_bytes())?;
        handle.flush()?;

        let mut reader = ProtXMLReader::new();
        let err = reader.parse_path(handle.path()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Syntax);
        assert!(reader.is_empty());
        Ok(())
    }

    #[test_log::test]
    fn test_structural_warnings_are_not_fatal() {
        let (reader, result) = parse_str(
            r#"<protein_summary>
<protein protein_name="orphan"/>
<protein_group group_number="1" probability="1">
<protein protein_name="A">
<peptide peptide_sequence="PEPTIDE" charge="2">
<indistinguishable_peptide peptide_sequence="PEPTLDE">
</indistinguishable_peptide>
</peptide>
</protein>
</protein_group>
</protein_summary>"#,
        );
        assert!(result.unwrap().is_complete());
        assert_eq!(reader.warnings(), 1);
        assert_eq!(reader.len(), 1);
        assert_eq!(reader[0][0].peptides[0].indistinguishable_peptides.len(), 1);
    }

    #[test]
    fn test_is_protxml() -> io::Result<()> {
        let text = fs::read(SMALL)?;
        assert!(is_protxml(&text));
        assert!(!is_protxml(b"<?xml version=\"1.0\"?><mzML></mzML>"));
        assert!(!is_protxml(b"not xml at all"));
        Ok(())
    }

    #[test]
    fn test_is_protxml_gzip() -> io::Result<()> {
        let compressed = fs::read(SMALL_GZ)?;
        assert!(is_gzipped(&compressed));
        assert!(is_protxml(&compressed));

        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"<?xml version=\"1.0\"?><mzML></mzML>")?;
        let other = encoder.finish()?;
        assert!(!is_protxml(&other));
        assert!(!is_protxml(&other[..4]));
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test_log::test]
    fn test_json_round_trip() -> io::Result<()> {
        let doc = read_path(SMALL)?;
        let mut buffer = Vec::new();
        doc.to_writer(&mut buffer)?;
        let restored = ProteinSummary::from_reader(Cursor::new(buffer))?;
        assert_eq!(doc.len(), restored.len());
        assert_eq!(doc.summary.source_files, restored.summary.source_files);
        assert_eq!(doc.summary.time, restored.summary.time);
        for (a, b) in doc.peptides().zip(restored.peptides()) {
            assert_eq!(a.modified_sequence(), b.modified_sequence());
            assert_eq!(a.charge, b.charge);
        }
        Ok(())
    }
}
