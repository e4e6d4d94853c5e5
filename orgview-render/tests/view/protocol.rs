//! Host round trips: doc map, template panel and clipboard feedback

use crate::common::session_for;
use orgview_render::view::{CopyFeedback, JsonLines, ViewOptions, ViewRequest, ViewSession};
use orgview_render::ViewError;

const DOC_MAP: &str = r#"{"command":"docFileMap","files":[
    {"name":"README.org","path":"/w/README.org","layer":"root","dir":"/w","tokens":812},
    {"name":"design.md","path":"/w/docs/design.md","layer":"docs","dir":"/w/docs","tokens":2048},
    {"name":"api.md","path":"/w/docs/api.md","layer":"docs","dir":"/w/docs"}
]}"#;

#[test]
fn test_doc_map_round_trip() {
    let (mut session, _) = session_for("* A\n");
    session.request_doc_map().unwrap();
    assert_eq!(session.channel(), &vec![ViewRequest::ScanDocFiles]);

    session.handle_message(DOC_MAP).unwrap();
    let map = session.doc_map();
    assert_eq!(map.len(), 3);
    assert_eq!(map.layers["docs"][0].name, "api.md");
    assert_eq!(map.layers["docs"][0].tokens, 0);
    assert!(map.to_html().contains("<h3>docs</h3>"));

    assert!(session.open_doc_file("/w/docs/design.md").unwrap());
    assert!(!session.open_doc_file("/w/missing.md").unwrap());
    assert_eq!(
        session.channel().last(),
        Some(&ViewRequest::OpenFile {
            path: "/w/docs/design.md".to_string()
        })
    );
}

#[test]
fn test_template_copy_feedback() {
    let (mut session, _) = session_for("");
    assert!(!session.copy_template().unwrap());

    session.request_template().unwrap();
    session
        .handle_message(r##"{"command":"templateData","raw":"#+TITLE: x","html":"<p>x</p>"}"##)
        .unwrap();
    assert_eq!(session.template().unwrap().raw, "#+TITLE: x");

    assert!(session.copy_template().unwrap());
    assert_eq!(
        session.channel(),
        &vec![
            ViewRequest::GetTemplate,
            ViewRequest::CopyToClipboard {
                text: "#+TITLE: x".to_string()
            }
        ]
    );
    assert_eq!(session.copy_feedback(), CopyFeedback::Idle);

    session.handle_message(r#"{"command":"clipboardCopied"}"#).unwrap();
    assert_eq!(session.copy_feedback(), CopyFeedback::Copied);
    session.reset_copy_feedback();
    assert_eq!(session.copy_feedback(), CopyFeedback::Idle);
}

#[test]
fn test_malformed_messages_are_errors() {
    let (mut session, _) = session_for("");
    assert!(matches!(
        session.handle_message("not json"),
        Err(ViewError::Protocol(_))
    ));
    assert!(matches!(
        session.handle_message(r#"{"command":"docFileMap"}"#),
        Err(ViewError::Protocol(_))
    ));
}

#[test]
fn test_json_lines_transport() {
    let mut session = ViewSession::new(JsonLines(Vec::new()), ViewOptions::default());
    let generation = session.load(&orgview_render::render_fragment("See NOTES.org\n"));
    let element = session.file_refs()[0].element.clone();
    session.click(generation, &element).unwrap();

    let written = String::from_utf8(session.channel().0.clone()).unwrap();
    assert_eq!(written, "{\"command\":\"openFile\",\"path\":\"NOTES.org\"}\n");
}
