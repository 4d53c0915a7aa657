use criterion::{Criterion, black_box, criterion_group, criterion_main};

use protxml::io::ProtXMLReader;

fn serial(file_path: &str, chunk_size: usize) {
    let mut reader = ProtXMLReader::with_chunk_size(chunk_size);
    reader.parse_path(file_path).unwrap();
    let total: usize = reader.document().peptides().count();
    assert_eq!(total, 4);
}

fn with_index(file_path: &str) {
    let doc = protxml::io::read_path(file_path).unwrap();
    let index = doc.build_index();
    assert_eq!(index.proteins_for_peptide("PEPTIDE").len(), 1);
}

fn protxml_totaling(c: &mut Criterion) {
    c.bench_function("serial_execution", |b| {
        b.iter(|| serial(black_box("./test/data/small.prot.xml"), 16384))
    });
    c.bench_function("serial_execution_small_chunks", |b| {
        b.iter(|| serial(black_box("./test/data/small.prot.xml"), 256))
    });
    c.bench_function("serial_execution_gzip", |b| {
        b.iter(|| serial(black_box("./test/data/small.prot.xml.gz"), 16384))
    });
    c.bench_function("build_index", |b| {
        b.iter(|| with_index(black_box("./test/data/small.prot.xml")))
    });
}

criterion_group!(benches, protxml_totaling);
criterion_main!(benches);
