//! Integration tests for error handling and edge cases.

use std::path::Path;

use pdfknife::config::{Config, Limits};
use pdfknife::io::UploadReader;
use pdfknife::ops::{self, SplitOutput};
use pdfknife::validation::Upload;
use pdfknife::{PdfKnifeError, ValidationFailure};
use tempfile::TempDir;

use crate::common::{archive_entries, labelled_pdf, pdf_upload, write_fixture};

fn tight_limits(limits: Limits) -> Config {
    Config {
        limits,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_error_nonexistent_input() {
    let err = UploadReader::new()
        .load(Path::new("/nonexistent/file.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, PdfKnifeError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_error_directory_input() {
    let dir = TempDir::new().unwrap();
    let err = UploadReader::new().load(dir.path()).await.unwrap_err();
    assert!(matches!(err, PdfKnifeError::NotAFile { .. }));
}

#[tokio::test]
async fn test_error_oversized_file_refused_unread() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "big.pdf", &labelled_pdf("Big", 3));

    let err = UploadReader::with_size_limit(16)
        .load(&path)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PdfKnifeError::Validation {
            reason: ValidationFailure::FileTooLarge { limit: 16, .. }
        }
    ));
}

#[tokio::test]
async fn test_error_text_file_is_not_pdf() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "notes.txt", b"just some notes");
    let upload = UploadReader::new().load(&path).await.unwrap();

    let err = ops::split(upload, "1", &Config::default()).await.unwrap_err();
    assert!(matches!(
        err,
        PdfKnifeError::Validation {
            reason: ValidationFailure::NotPdf { .. }
        }
    ));
}

#[tokio::test]
async fn test_error_declared_type_mismatch() {
    let upload = Upload::new("doc.pdf", labelled_pdf("Doc", 1)).with_content_type("image/png");
    let err = ops::split(upload, "1", &Config::default()).await.unwrap_err();
    assert!(matches!(
        err,
        PdfKnifeError::Validation {
            reason: ValidationFailure::NotPdf { .. }
        }
    ));
}

#[tokio::test]
async fn test_error_empty_upload() {
    let upload = Upload::new("empty.pdf", Vec::new());
    let err = ops::split(upload, "1", &Config::default()).await.unwrap_err();
    assert!(matches!(
        err,
        PdfKnifeError::Validation {
            reason: ValidationFailure::EmptyFile { .. }
        }
    ));
}

#[tokio::test]
async fn test_error_corrupted_pdf() {
    let upload = Upload::new("broken.pdf", b"%PDF-1.7\nthis is not a document".to_vec());
    let err = ops::split(upload, "1", &Config::default()).await.unwrap_err();
    assert!(matches!(err, PdfKnifeError::Decode { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_error_selection_without_numbers() {
    let err = ops::split(pdf_upload("doc.pdf", "Doc", 3), "first-last", &Config::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PdfKnifeError::EmptySelection { .. }));
    assert!(err.is_user_error());
}

#[tokio::test]
async fn test_error_every_group_out_of_range() {
    let err = ops::split(pdf_upload("doc.pdf", "Doc", 3), "4,10-12", &Config::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PdfKnifeError::NoValidPages { total_pages: 3 }));
    assert!(err.is_user_error());
}

#[tokio::test]
async fn test_error_too_many_selections() {
    let config = tight_limits(Limits {
        max_selections: Some(2),
        ..Limits::default()
    });
    let err = ops::split(pdf_upload("doc.pdf", "Doc", 3), "1,2,3", &config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PdfKnifeError::Validation {
            reason: ValidationFailure::TooManySelections { count: 3, limit: 2 }
        }
    ));
}

#[tokio::test]
async fn test_long_selection_list_accepted_by_default() {
    let spec = vec!["1"; 501].join(",");
    let output = ops::split(pdf_upload("doc.pdf", "Doc", 3), &spec, &Config::default())
        .await
        .unwrap();

    let SplitOutput::Archive(archive) = output else {
        panic!("501 groups must be packaged");
    };
    let entries = archive_entries(&archive.bytes);
    assert_eq!(entries.len(), 501);
    assert_eq!(entries[500].0, "page_1_501.pdf");
}

#[tokio::test]
async fn test_error_split_file_too_large() {
    let config = tight_limits(Limits {
        max_file_size: 64,
        ..Limits::default()
    });
    let err = ops::split(pdf_upload("doc.pdf", "Doc", 2), "1", &config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PdfKnifeError::Validation {
            reason: ValidationFailure::FileTooLarge { .. }
        }
    ));
}

#[tokio::test]
async fn test_error_merge_total_too_large() {
    let first = pdf_upload("a.pdf", "A", 1);
    let limit = first.size() + 1;
    let config = tight_limits(Limits {
        max_total_size: limit,
        ..Limits::default()
    });

    let err = ops::merge(vec![first, pdf_upload("b.pdf", "B", 1)], &config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PdfKnifeError::Validation {
            reason: ValidationFailure::TotalTooLarge { .. }
        }
    ));
}

#[tokio::test]
async fn test_error_merge_too_many_files() {
    let uploads: Vec<Upload> = (0..11).map(|i| pdf_upload(&format!("{i}.pdf"), "P", 1)).collect();
    let err = ops::merge(uploads, &Config::default()).await.unwrap_err();
    assert!(matches!(
        err,
        PdfKnifeError::Validation {
            reason: ValidationFailure::FileCount {
                provided: 11,
                min: 2,
                max: 10
            }
        }
    ));
}

#[tokio::test]
async fn test_error_merge_no_inputs() {
    let err = ops::merge(Vec::new(), &Config::default()).await.unwrap_err();
    assert!(matches!(err, PdfKnifeError::InsufficientInputs { provided: 0 }));
}

#[tokio::test]
async fn test_error_merge_one_bad_input_fails_whole_merge() {
    let uploads = vec![
        pdf_upload("a.pdf", "A", 1),
        Upload::new("bad.pdf", b"%PDF-1.4\nbroken".to_vec()),
    ];
    let err = ops::merge(uploads, &Config::default()).await.unwrap_err();
    match err {
        PdfKnifeError::Decode { name, .. } => assert_eq!(name, "bad.pdf"),
        other => panic!("expected decode error, got {other:?}"),
    }
}
