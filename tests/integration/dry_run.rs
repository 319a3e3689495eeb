//! Integration tests for planning without building documents.

use pdfknife::config::Config;
use pdfknife::ops;

use crate::common::pdf_upload;

#[test]
fn test_plan_split_names_every_output() {
    let plan = ops::plan_split(pdf_upload("doc.pdf", "Doc", 6), "1,3-5,1,40", &Config::default())
        .unwrap();

    assert_eq!(plan.source, "doc.pdf");
    assert_eq!(plan.source_pages, 6);
    assert_eq!(plan.selections_requested, 4);

    let planned: Vec<(&str, &[u32])> = plan
        .outputs
        .iter()
        .map(|o| (o.name.as_str(), o.pages.as_slice()))
        .collect();
    assert_eq!(
        planned,
        vec![
            ("page_1.pdf", &[1][..]),
            ("pages_3-5.pdf", &[3, 4, 5][..]),
            ("page_1_2.pdf", &[1][..]),
        ]
    );
    assert_eq!(plan.archive.as_deref(), Some("split_pdfs.zip"));
}

#[test]
fn test_plan_split_matches_split_names() {
    let plan = ops::plan_split(pdf_upload("doc.pdf", "Doc", 3), "2", &Config::default()).unwrap();
    assert_eq!(plan.archive, None);
    assert_eq!(plan.outputs[0].name, "page_2.pdf");
}

#[test]
fn test_plan_split_serializes_camel_case() {
    let plan = ops::plan_split(pdf_upload("doc.pdf", "Doc", 3), "1-2", &Config::default())
        .unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["sourcePages"], 3);
    assert_eq!(json["outputs"][0]["name"], "pages_1-2.pdf");
    assert_eq!(json["outputs"][0]["pages"], serde_json::json!([1, 2]));
}

#[tokio::test]
async fn test_plan_merge_counts_pages() {
    let uploads = vec![
        pdf_upload("a.pdf", "A", 4),
        pdf_upload("b.pdf", "B", 0),
        pdf_upload("c.pdf", "C", 2),
    ];
    let plan = ops::plan_merge(uploads, &Config::default()).await.unwrap();

    let names: Vec<&str> = plan.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
    assert_eq!(plan.total_pages, 6);
    assert_eq!(plan.output, "merged.pdf");
}
