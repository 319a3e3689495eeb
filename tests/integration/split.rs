//! Integration tests for splitting by page selection.

use std::sync::Arc;

use pdfknife::config::{CompressionLevel, Config};
use pdfknife::document::SourceDocument;
use pdfknife::engine::Splitter;
use pdfknife::io::{OutputWriter, UploadReader};
use pdfknife::ops::{self, SplitOutput, SplitReport};
use pdfknife::selection::parse_selections;
use tempfile::TempDir;

use crate::common::{archive_entries, labelled_pdf, page_texts, pdf_upload, write_fixture};

#[tokio::test]
async fn test_split_repeated_page_packs_archive() {
    let output = ops::split(pdf_upload("doc.pdf", "Doc", 6), "1,3-5,1", &Config::default())
        .await
        .unwrap();

    let SplitOutput::Archive(archive) = output else {
        panic!("several groups must be packaged");
    };
    assert_eq!(archive.name, "split_pdfs.zip");

    let entries = archive_entries(&archive.bytes);
    let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["page_1.pdf", "pages_3-5.pdf", "page_1_2.pdf"]);

    assert_eq!(page_texts(&entries[0].1), vec!["Doc 1"]);
    assert_eq!(page_texts(&entries[1].1), vec!["Doc 3", "Doc 4", "Doc 5"]);
    assert_eq!(page_texts(&entries[2].1), vec!["Doc 1"]);
}

#[tokio::test]
async fn test_split_out_of_range_group_yields_single_document() {
    let output = ops::split(pdf_upload("doc.pdf", "Doc", 10), "1,50", &Config::default())
        .await
        .unwrap();

    let SplitOutput::Document(pdf) = output else {
        panic!("a single surviving group is returned as a PDF");
    };
    assert_eq!(pdf.name, "page_1.pdf");
    assert_eq!(page_texts(&pdf.bytes), vec!["Doc 1"]);
}

#[tokio::test]
async fn test_split_reversed_range() {
    let output = ops::split(pdf_upload("doc.pdf", "Doc", 10), "5-2", &Config::default())
        .await
        .unwrap();

    let pdf = output.into_blob();
    assert_eq!(pdf.name, "pages_2-5.pdf");
    assert_eq!(page_texts(&pdf.bytes), vec!["Doc 2", "Doc 3", "Doc 4", "Doc 5"]);
}

#[tokio::test]
async fn test_split_range_clamped_to_document() {
    let output = ops::split(pdf_upload("doc.pdf", "Doc", 4), "3-9", &Config::default())
        .await
        .unwrap();

    let pdf = output.into_blob();
    assert_eq!(pdf.name, "pages_3-4.pdf");
    assert_eq!(page_texts(&pdf.bytes), vec!["Doc 3", "Doc 4"]);
}

#[tokio::test]
async fn test_split_is_deterministic() {
    let config = Config::default();
    let first = ops::split(pdf_upload("doc.pdf", "Doc", 8), "1-2,4,2-1,8", &config)
        .await
        .unwrap();
    let second = ops::split(pdf_upload("doc.pdf", "Doc", 8), "1-2,4,2-1,8", &config)
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_split_every_compression_level_readable() {
    for compression in [
        CompressionLevel::None,
        CompressionLevel::Standard,
        CompressionLevel::Maximum,
    ] {
        let config = Config {
            compression,
            ..Config::default()
        };
        let output = ops::split(pdf_upload("doc.pdf", "Doc", 3), "2-3", &config)
            .await
            .unwrap();
        assert_eq!(
            page_texts(&output.blob().bytes),
            vec!["Doc 2", "Doc 3"],
            "compression {compression:?}"
        );
    }
}

#[tokio::test]
async fn test_splitter_shares_one_source() {
    let source = Arc::new(SourceDocument::open(labelled_pdf("S", 5)).unwrap());
    let splitter = Splitter::new(CompressionLevel::Standard, 3);

    let first = splitter
        .split(Arc::clone(&source), &parse_selections("1,2").unwrap())
        .await
        .unwrap();
    let second = splitter
        .split(source, &parse_selections("5,4").unwrap())
        .await
        .unwrap();

    assert_eq!(page_texts(&first.outputs[1].bytes), vec!["S 2"]);
    assert_eq!(page_texts(&second.outputs[0].bytes), vec!["S 5"]);
}

#[tokio::test]
async fn test_split_from_disk_to_directory() {
    let dir = TempDir::new().unwrap();
    let input = write_fixture(&dir, "book.pdf", &labelled_pdf("Book", 6));
    let out_dir = dir.path().join("parts");
    std::fs::create_dir(&out_dir).unwrap();

    let upload = UploadReader::new().load(&input).await.unwrap();
    let result = ops::split_documents(upload, "1-3,4-6", &Config::default())
        .await
        .unwrap();
    let report = SplitReport::new("book.pdf", &result);

    let written = OutputWriter::new()
        .write_all(result.outputs, &out_dir)
        .await
        .unwrap();

    assert_eq!(written.len(), 2);
    assert_eq!(report.outputs.len(), 2);
    assert_eq!(
        page_texts(&std::fs::read(out_dir.join("pages_1-3.pdf")).unwrap()),
        vec!["Book 1", "Book 2", "Book 3"]
    );
    assert_eq!(
        page_texts(&std::fs::read(out_dir.join("pages_4-6.pdf")).unwrap()),
        vec!["Book 4", "Book 5", "Book 6"]
    );
}
