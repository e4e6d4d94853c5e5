//! File references in prose are recognized, classified and made clickable

use crate::common::session_for;
use orgview_render::dom::{get_attribute, text_content};
use orgview_render::view::{ClickOutcome, FileKind, ViewRequest};

#[test]
fn test_code_paths_are_inert() {
    let (mut session, generation) = session_for("Entry point is src/main.ts.\n");
    let refs = session.file_refs();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].path, "src/main.ts");
    assert_eq!(refs[0].kind, FileKind::Code);

    let element = refs[0].element.clone();
    assert_eq!(get_attribute(&element, "class").as_deref(), Some("file-ref code"));
    assert_eq!(get_attribute(&element, "role"), None);

    assert_eq!(session.click(generation, &element).unwrap(), ClickOutcome::Ignored);
    assert!(session.channel().is_empty());
}

#[test]
fn test_doc_link_click_posts_open_file() {
    let (mut session, generation) = session_for("Start with README.org for details.\n");
    let element = session.file_refs()[0].element.clone();
    assert_eq!(get_attribute(&element, "role").as_deref(), Some("link"));

    let text = element.children.borrow()[0].clone();
    let outcome = session.click(generation, &text).unwrap();
    assert_eq!(
        outcome,
        ClickOutcome::OpenFile {
            path: "README.org".to_string()
        }
    );
    assert_eq!(
        session.channel(),
        &vec![ViewRequest::OpenFile {
            path: "README.org".to_string()
        }]
    );
}

#[test]
fn test_line_suffix_is_kept_apart() {
    let (mut session, generation) = session_for("See docs/guide.md:42 first.\n");
    let file_ref = &session.file_refs()[0];
    assert_eq!(file_ref.text, "docs/guide.md:42");
    assert_eq!(file_ref.path, "docs/guide.md");
    assert_eq!(file_ref.line, Some(42));
    assert_eq!(get_attribute(&file_ref.element, "data-line").as_deref(), Some("42"));

    let element = file_ref.element.clone();
    session.click(generation, &element).unwrap();
    assert_eq!(
        session.channel(),
        &vec![ViewRequest::OpenFile {
            path: "docs/guide.md".to_string()
        }]
    );
}

#[test]
fn test_classification_by_extension() {
    let (session, _) = session_for("Cargo.toml, notes.txt, data.csv and lib.rs\n");
    let kinds: Vec<_> = session
        .file_refs()
        .iter()
        .map(|r| (r.path.as_str(), r.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("Cargo.toml", FileKind::Config),
            ("notes.txt", FileKind::DocOther),
            ("data.csv", FileKind::Generic),
            ("lib.rs", FileKind::Code),
        ]
    );
}

#[test]
fn test_code_and_links_are_not_scanned() {
    let (session, _) =
        session_for("Run ~cargo build --manifest-path a/Cargo.toml~ or see [[https://x.org/README.md][docs]].\n");
    assert!(session.file_refs().is_empty());
}

#[test]
fn test_unknown_extensions_and_versions_are_left_alone() {
    let (session, _) = session_for("Version 1.2 of e.g. the thing.\n");
    assert!(session.file_refs().is_empty());
}

#[test]
fn test_text_around_references_is_preserved() {
    let (session, _) = session_for("Edit config.yaml, then main.rs.\n");
    let document = session.document().expect("document loaded");
    assert_eq!(
        text_content(&document.content),
        "Edit config.yaml, then main.rs."
    );
    assert_eq!(session.file_refs().len(), 2);
}

#[test]
fn test_file_references_inside_headings_open_instead_of_toggling() {
    let (mut session, generation) = session_for("* Read NOTES.md\n");
    let element = session.file_refs()[0].element.clone();
    let outcome = session.click(generation, &element).unwrap();
    assert_eq!(
        outcome,
        ClickOutcome::OpenFile {
            path: "NOTES.md".to_string()
        }
    );
    assert!(!session.sections()[0].collapsed);
}

#[test]
fn test_email_addresses_are_not_file_references() {
    let (session, _) = session_for("#+EMAIL: sam@example.org

Ask user@host.md before editing.
");
    assert!(session.file_refs().is_empty());
    assert!(session.channel().is_empty());
}
