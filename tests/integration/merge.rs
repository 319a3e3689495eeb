//! Integration tests for merging documents.

use pdfknife::PdfKnifeError;
use pdfknife::config::{CompressionLevel, Config};
use pdfknife::document::SourceDocument;
use pdfknife::engine::Merger;
use pdfknife::io::{OutputWriter, UploadReader};
use pdfknife::ops::{self, MergeReport};
use pdfknife::utils::collect_paths_for_patterns;
use tempfile::TempDir;

use crate::common::{labelled_pdf, page_texts, pdf_upload, write_fixture};

#[tokio::test]
async fn test_merge_concatenates_in_order() {
    let uploads = vec![pdf_upload("a.pdf", "A", 3), pdf_upload("b.pdf", "B", 2)];
    let merged = ops::merge(uploads, &Config::default()).await.unwrap();

    assert_eq!(merged.name, "merged.pdf");
    assert_eq!(
        page_texts(&merged.bytes),
        vec!["A 1", "A 2", "A 3", "B 1", "B 2"]
    );
}

#[tokio::test]
async fn test_merge_order_is_caller_order() {
    let uploads = vec![pdf_upload("b.pdf", "B", 1), pdf_upload("a.pdf", "A", 1)];
    let merged = ops::merge(uploads, &Config::default()).await.unwrap();
    assert_eq!(page_texts(&merged.bytes), vec!["B 1", "A 1"]);
}

#[tokio::test]
async fn test_merge_same_document_twice() {
    let uploads = vec![pdf_upload("a.pdf", "A", 2), pdf_upload("a.pdf", "A", 2)];
    let merged = ops::merge(uploads, &Config::default()).await.unwrap();
    assert_eq!(page_texts(&merged.bytes), vec!["A 1", "A 2", "A 1", "A 2"]);
}

#[tokio::test]
async fn test_merge_empty_source_contributes_nothing() {
    let uploads = vec![
        pdf_upload("a.pdf", "A", 1),
        pdf_upload("empty.pdf", "E", 0),
        pdf_upload("b.pdf", "B", 1),
    ];
    let result = ops::merge_documents(uploads, &Config::default())
        .await
        .unwrap();

    assert_eq!(result.statistics.pages_per_file, vec![1, 0, 1]);
    assert_eq!(result.statistics.total_pages, 2);
    assert_eq!(page_texts(&result.bytes), vec!["A 1", "B 1"]);
}

#[tokio::test]
async fn test_merge_single_document_is_insufficient() {
    let err = ops::merge(vec![pdf_upload("a.pdf", "A", 3)], &Config::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PdfKnifeError::InsufficientInputs { provided: 1 }));
    assert!(err.is_user_error());
}

#[tokio::test]
async fn test_merger_statistics() {
    let sources = vec![
        SourceDocument::open_named("a.pdf", labelled_pdf("A", 2)).unwrap(),
        SourceDocument::open_named("b.pdf", labelled_pdf("B", 5)).unwrap(),
    ];
    let input_size: u64 = sources.iter().map(|s| s.bytes().len() as u64).sum();

    let result = Merger::new(CompressionLevel::Maximum)
        .merge(sources)
        .await
        .unwrap();

    assert_eq!(result.statistics.files_merged, 2);
    assert_eq!(result.statistics.total_pages, 7);
    assert_eq!(result.statistics.input_size, input_size);
    assert!(result.statistics.compressed);

    let report = MergeReport::new("book.pdf", &result);
    assert_eq!(report.output_size, result.bytes.len() as u64);
}

#[tokio::test]
async fn test_merge_glob_from_disk() {
    let dir = TempDir::new().unwrap();
    write_fixture(&dir, "ch2.pdf", &labelled_pdf("Two", 1));
    write_fixture(&dir, "ch1.pdf", &labelled_pdf("One", 2));
    write_fixture(&dir, "ch3.pdf", &labelled_pdf("Three", 1));

    let pattern = format!("{}/ch*.pdf", dir.path().display());
    let paths = collect_paths_for_patterns([pattern]).unwrap();
    let uploads = UploadReader::new().load_all(&paths, 4).await.unwrap();

    let merged = ops::merge(uploads, &Config::default()).await.unwrap();
    let target = dir.path().join(&merged.name);
    let stats = OutputWriter::new()
        .write(merged.bytes, &target)
        .await
        .unwrap();

    assert_eq!(stats.output_path, target);
    assert_eq!(
        page_texts(&std::fs::read(&target).unwrap()),
        vec!["One 1", "One 2", "Two 1", "Three 1"]
    );
}
