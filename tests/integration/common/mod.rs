//! Shared fixtures for the integration tests.
//!
//! Documents are generated with lopdf. Page `n` of a fixture draws the text
//! `{label} n`, so any page of any output can be traced back to its source.

use std::io::{Cursor, Read};
use std::path::PathBuf;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat, dictionary};
use pdfknife::validation::Upload;
use tempfile::TempDir;
use zip::ZipArchive;

/// Build a PDF of `num_pages` pages labelled `{label} 1`, `{label} 2`, ...
pub fn labelled_pdf(label: &str, num_pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = (1..=num_pages)
        .map(|i| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            format!("{label} {i}").into_bytes(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                Dictionary::new(),
                content.encode().expect("encode page content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            page_id.into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => num_pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save fixture");
    buffer
}

/// An upload declared as `application/pdf`.
pub fn pdf_upload(name: &str, label: &str, num_pages: u32) -> Upload {
    Upload::new(name, labelled_pdf(label, num_pages)).with_content_type("application/pdf")
}

/// Write `bytes` into `dir` as `name`.
pub fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

/// Text drawn on each page of a PDF, in page order.
pub fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("output parses as PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).expect("page content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').map_or(0, |i| i + 1);
            let end = text[start..].find(')').map_or(start, |i| start + i);
            text[start..end].to_string()
        })
        .collect()
}

/// Name and contents of every archive entry, in archive order.
pub fn archive_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).expect("archive entry");
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).expect("read entry");
            (entry.name().to_string(), contents)
        })
        .collect()
}
