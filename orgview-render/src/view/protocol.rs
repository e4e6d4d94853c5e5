//! Host ⇄ view message protocol
//!
//! Both directions are JSON objects discriminated by a `command` field:
//!
//! | Direction   | Command           | Payload                                        |
//! |-------------|-------------------|------------------------------------------------|
//! | view → host | `openFile`        | `{ path }`                                     |
//! | view → host | `scanDocFiles`    | none                                           |
//! | view → host | `getTemplate`     | none                                           |
//! | view → host | `copyToClipboard` | `{ text }`                                     |
//! | host → view | `docFileMap`      | `{ files: [{ name, path, layer, dir, tokens }] }` |
//! | host → view | `templateData`    | `{ raw, html }`                                |
//! | host → view | `clipboardCopied` | none                                           |
//!
//! [`HostChannel`] is the outbound half and can sit on any transport.

use crate::error::ViewError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::mpsc::Sender;

/// Requests the view sends to its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum ViewRequest {
    OpenFile { path: String },
    ScanDocFiles,
    GetTemplate,
    CopyToClipboard { text: String },
}

/// Messages the host sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostMessage {
    DocFileMap { files: Vec<DocFile> },
    TemplateData { raw: String, html: String },
    ClipboardCopied,
}

/// One documentation file in the workspace inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocFile {
    pub name: String,
    pub path: String,
    pub layer: String,
    pub dir: String,
    #[serde(default)]
    pub tokens: u64,
}

impl HostMessage {
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ViewRequest {
    pub fn to_json(&self) -> Result<String, ViewError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Outbound transport from the view to its host.
pub trait HostChannel {
    fn post(&mut self, request: &ViewRequest) -> Result<(), ViewError>;
}

impl HostChannel for Vec<ViewRequest> {
    fn post(&mut self, request: &ViewRequest) -> Result<(), ViewError> {
        self.push(request.clone());
        Ok(())
    }
}

impl HostChannel for Sender<ViewRequest> {
    fn post(&mut self, request: &ViewRequest) -> Result<(), ViewError> {
        self.send(request.clone())
            .map_err(|e| ViewError::Channel(e.to_string()))
    }
}

/// Writes each request as one JSON object per line.
#[derive(Debug)]
pub struct JsonLines<W: Write>(pub W);

impl<W: Write> HostChannel for JsonLines<W> {
    fn post(&mut self, request: &ViewRequest) -> Result<(), ViewError> {
        let line = request.to_json()?;
        writeln!(self.0, "{line}").map_err(|e| ViewError::Channel(e.to_string()))?;
        self.0.flush().map_err(|e| ViewError::Channel(e.to_string()))
    }
}
