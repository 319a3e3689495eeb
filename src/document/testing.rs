//! In-memory PDF fixtures for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream,
    StringFormat, dictionary,
};

/// Build a PDF whose page `n` draws the text `Page n`.
///
/// Resources live on the page tree root so pages inherit them.
pub(crate) fn sample_pdf(num_pages: u32) -> Vec<u8> {
    labelled_pdf("Page", num_pages)
}

/// Build a PDF whose page `n` draws the text `{label} n`.
pub(crate) fn labelled_pdf(label: &str, num_pages: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::new();
    for i in 1..=num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
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
            content.encode().unwrap_or_default(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => num_pages as i64,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Build a `num_pages` PDF encrypted with RC4 under `user_password`.
pub(crate) fn encrypted_pdf(num_pages: u32, user_password: &str) -> Vec<u8> {
    let mut doc = Document::load_mem(&sample_pdf(num_pages)).unwrap();
    // The key derivation reads the first file identifier.
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(b"pdfknife-id".to_vec()),
            Object::string_literal(b"pdfknife-id".to_vec()),
        ],
    );

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password,
        key_length: 40,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).unwrap();
    doc.encrypt(&state).unwrap();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Build a `num_pages` PDF whose first page carries a Link annotation
/// pointing at page `target` (1-based).
pub(crate) fn linked_pdf(num_pages: u32, target: u32) -> Vec<u8> {
    let mut doc = Document::load_mem(&sample_pdf(num_pages)).unwrap();
    let pages = doc.get_pages();
    let first = pages[&1];
    let destination = pages[&target];

    let link_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![100.into(), 700.into(), 200.into(), 720.into()],
        "Dest" => vec![destination.into(), "Fit".into()],
    });
    doc.get_dictionary_mut(first)
        .unwrap()
        .set("Annots", vec![link_id.into()]);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Text drawn on every page of `bytes`, in page order.
pub(crate) fn page_texts(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').map(|i| i + 1).unwrap_or(0);
            let end = text[start..].find(')').map(|i| start + i).unwrap_or(start);
            text[start..end].to_string()
        })
        .collect()
}
