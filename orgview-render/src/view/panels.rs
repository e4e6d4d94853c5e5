//! Side panels fed by host responses: the doc map and the template panel.

use crate::dom::{append_child, create_element, create_text, outer_html};
use super::protocol::DocFile;
use std::collections::BTreeMap;

/// Workspace documentation inventory, grouped by layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocMap {
    pub layers: BTreeMap<String, Vec<DocFile>>,
}

impl DocMap {
    pub fn from_files(files: Vec<DocFile>) -> Self {
        let mut layers: BTreeMap<String, Vec<DocFile>> = BTreeMap::new();
        for file in files {
            layers.entry(file.layer.clone()).or_default().push(file);
        }
        for files in layers.values_mut() {
            files.sort_by(|a, b| a.path.cmp(&b.path));
        }
        Self { layers }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.layers.values().flatten().any(|f| f.path == path)
    }

    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_html(&self) -> String {
        let panel = create_element("div", &[("class", "doc-map")]);
        for (layer, files) in &self.layers {
            let group = create_element("section", &[("class", "doc-layer")]);
            let title = create_element("h3", &[]);
            append_child(&title, create_text(layer));
            append_child(&group, title);

            let list = create_element("ul", &[]);
            for file in files {
                let item = create_element(
                    "li",
                    &[
                        ("class", "doc-file"),
                        ("data-path", file.path.as_str()),
                        ("role", "link"),
                    ],
                );
                let name = create_element("span", &[("class", "doc-name")]);
                append_child(&name, create_text(&file.name));
                let dir = create_element("span", &[("class", "doc-dir")]);
                append_child(&dir, create_text(&file.dir));
                let tokens = create_element("span", &[("class", "doc-tokens")]);
                append_child(&tokens, create_text(&format!("{} tokens", file.tokens)));
                append_child(&item, name);
                append_child(&item, dir);
                append_child(&item, tokens);
                append_child(&list, item);
            }
            append_child(&group, list);
            append_child(&panel, group);
        }
        outer_html(&panel)
    }
}

/// Template shown in the template panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplatePanel {
    pub raw: String,
    pub html: String,
}

/// State of the template panel's copy button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyFeedback {
    #[default]
    Idle,
    Copied,
}
