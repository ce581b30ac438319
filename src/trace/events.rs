//! Trace event records as written by the browser recorder.
//!
//! Every record in a trace stream is a JSON object tagged by its `"type"`
//! field. Tags this crate does not know about decode to
//! [`TraceEvent::Unknown`] so that newer recordings still load.

use serde::{Deserialize, Serialize};

/// One record of a recorded trace stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TraceEvent {
    ContextOptions(ContextOptionsTraceEvent),
    ScreencastFrame(ScreencastFrameTraceEvent),
    Action(ActionTraceEvent),
    Event(ActionTraceEvent),
    ResourceSnapshot(ResourceSnapshotTraceEvent),
    FrameSnapshot(FrameSnapshotTraceEvent),
    /// Any tag not listed above.
    #[serde(other)]
    Unknown,
}

impl TraceEvent {
    /// Wire tag of this record. [`TraceEvent::Unknown`] does not keep the tag
    /// it was decoded from and reports the placeholder `"unknown"`.
    pub fn kind(&self) -> &'static str {
        match self {
            TraceEvent::ContextOptions(_) => "context-options",
            TraceEvent::ScreencastFrame(_) => "screencast-frame",
            TraceEvent::Action(_) => "action",
            TraceEvent::Event(_) => "event",
            TraceEvent::ResourceSnapshot(_) => "resource-snapshot",
            TraceEvent::FrameSnapshot(_) => "frame-snapshot",
            TraceEvent::Unknown => "unknown",
        }
    }

    /// Call metadata for `action` and `event` records.
    pub fn metadata(&self) -> Option<&CallMetadata> {
        match self {
            TraceEvent::Action(e) | TraceEvent::Event(e) => Some(&e.metadata),
            _ => None,
        }
    }
}

/// Browser context the trace was recorded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptionsTraceEvent {
    pub browser_name: String,
    #[serde(default)]
    pub options: BrowserContextOptions,
}

/// Options the browser context was created with.
///
/// Only `sdkLanguage` is named; everything else is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserContextOptions {
    #[serde(default)]
    pub sdk_language: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreencastFrameTraceEvent {
    pub page_id: String,
    pub sha1: String,
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
}

/// A captured screencast image, addressed by the hash of its bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreencastFrame {
    pub sha1: String,
    pub timestamp: f64,
    pub width: u32,
    pub height: u32,
}

impl From<ScreencastFrameTraceEvent> for ScreencastFrame {
    fn from(event: ScreencastFrameTraceEvent) -> Self {
        Self {
            sha1: event.sha1,
            timestamp: event.timestamp,
            width: event.width,
            height: event.height,
        }
    }
}

/// Payload shared by `action` and `event` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTraceEvent {
    pub metadata: CallMetadata,
}

/// Describes one API call or page event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMetadata {
    #[serde(default)]
    pub id: String,
    /// Receiver type, e.g. "Page" or "Frame".
    #[serde(rename = "type", default)]
    pub call_type: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: f64,
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotRef>,
}

/// Named DOM snapshot taken around a call ("before", "action", "after").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRef {
    pub title: String,
    pub snapshot_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshotTraceEvent {
    pub snapshot: ResourceSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshotTraceEvent {
    pub snapshot: FrameSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// A network response observed during recording. Bodies are stored out of
/// band and referenced by content hash.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSnapshot {
    #[serde(default)]
    pub page_id: String,
    #[serde(default)]
    pub frame_id: String,
    pub url: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub response_headers: Vec<Header>,
    #[serde(default)]
    pub request_headers: Vec<Header>,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_sha1: Option<String>,
    #[serde(default)]
    pub response_sha1: String,
    #[serde(default)]
    pub timestamp: f64,
}

/// DOM of one frame at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_name: Option<String>,
    #[serde(default)]
    pub page_id: String,
    pub frame_id: String,
    #[serde(default)]
    pub frame_url: String,
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub collection_time: f64,
    /// Serialized node tree; interpreted by the snapshot renderer, not here.
    #[serde(default)]
    pub html: serde_json::Value,
    #[serde(default)]
    pub resource_overrides: Vec<ResourceOverride>,
    #[serde(default)]
    pub viewport: Viewport,
}

/// Replaces the body of `url` inside a frame snapshot, either with stored
/// content (`sha1`) or with the body seen by an earlier snapshot (`ref`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceOverride {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}
