//! Trace model: folds an ordered stream of trace events into a per-context,
//! per-page structure that viewers and exporters can query directly.

use crate::snapshot::sink::{MemorySnapshotStorage, SnapshotSink};
use crate::trace::events::{
    ActionTraceEvent, BrowserContextOptions, ResourceSnapshot, ScreencastFrame, TraceEvent,
};
use indexmap::IndexMap;

/// Everything recorded for one browser context.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextEntry {
    /// Earliest action/event start time, `f64::MAX` until one is seen.
    pub start_time: f64,
    /// Latest action/event end time, `f64::MIN` until one is seen.
    pub end_time: f64,
    pub browser_name: String,
    pub options: BrowserContextOptions,
    /// Pages keyed by page id, in the order each id was first seen.
    pub pages: IndexMap<String, PageEntry>,
    /// Resources reported by the snapshot sink at the last `append_events`.
    pub resources: Vec<ResourceSnapshot>,
}

impl Default for ContextEntry {
    fn default() -> Self {
        Self {
            start_time: f64::MAX,
            end_time: f64::MIN,
            browser_name: String::new(),
            options: BrowserContextOptions::default(),
            pages: IndexMap::new(),
            resources: Vec::new(),
        }
    }
}

impl ContextEntry {
    /// Whether any action or event has contributed to the time range.
    pub fn has_time_range(&self) -> bool {
        self.start_time != f64::MAX || self.end_time != f64::MIN
    }

    /// Length of the recorded time range, if there is one. Never negative,
    /// even when a call was recorded with `end_time` before `start_time`.
    pub fn duration(&self) -> Option<f64> {
        self.has_time_range().then(|| (self.end_time - self.start_time).max(0.0))
    }

    /// Actions from every page, ordered by start time.
    pub fn actions(&self) -> Vec<&ActionTraceEvent> {
        let mut actions: Vec<_> = self
            .pages
            .values()
            .flat_map(|page| page.actions.iter())
            .collect();
        actions.sort_by(|a, b| a.metadata.start_time.total_cmp(&b.metadata.start_time));
        actions
    }

    fn include_time_range(&mut self, start_time: f64, end_time: f64) {
        self.start_time = self.start_time.min(start_time);
        self.end_time = self.end_time.max(end_time);
    }
}

/// Everything recorded for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageEntry {
    pub actions: Vec<ActionTraceEvent>,
    pub events: Vec<ActionTraceEvent>,
    pub screencast_frames: Vec<ScreencastFrame>,
}

/// Incremental builder of a [`ContextEntry`].
///
/// Ingestion never fails: unknown record types are ignored and actions or
/// events without a page id are dropped. Resource and frame snapshots are
/// handed to the snapshot sink `S` unchanged.
#[derive(Debug)]
pub struct TraceModel<S = MemorySnapshotStorage> {
    context_entry: ContextEntry,
    snapshot_storage: S,
}

impl Default for TraceModel {
    fn default() -> Self {
        Self::new(MemorySnapshotStorage::new())
    }
}

impl<S: SnapshotSink> TraceModel<S> {
    pub fn new(snapshot_storage: S) -> Self {
        Self {
            context_entry: ContextEntry::default(),
            snapshot_storage,
        }
    }

    pub fn context_entry(&self) -> &ContextEntry {
        &self.context_entry
    }

    pub fn snapshot_storage(&self) -> &S {
        &self.snapshot_storage
    }

    pub fn page(&self, page_id: &str) -> Option<&PageEntry> {
        self.context_entry.pages.get(page_id)
    }

    /// Pages in first-seen order.
    pub fn pages(&self) -> impl Iterator<Item = (&str, &PageEntry)> {
        self.context_entry
            .pages
            .iter()
            .map(|(id, page)| (id.as_str(), page))
    }

    pub fn into_parts(self) -> (ContextEntry, S) {
        (self.context_entry, self.snapshot_storage)
    }

    /// Append every event in order, then replace the context's resource list
    /// with `sink.resources()`.
    ///
    /// The resource list is overwritten, not merged: it reflects `sink` as of
    /// this call.
    pub fn append_events<I, K>(&mut self, events: I, sink: &K)
    where
        I: IntoIterator<Item = TraceEvent>,
        K: SnapshotSink + ?Sized,
    {
        for event in events {
            self.append_event(event);
        }
        self.context_entry.resources = sink.resources();
    }

    /// Like [`append_events`](Self::append_events), taking resources from the
    /// model's own snapshot storage.
    pub fn ingest<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = TraceEvent>,
    {
        for event in events {
            self.append_event(event);
        }
        self.context_entry.resources = self.snapshot_storage.resources();
    }

    pub fn append_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::ContextOptions(e) => {
                self.context_entry.browser_name = e.browser_name;
                self.context_entry.options = e.options;
            }
            TraceEvent::ScreencastFrame(e) => {
                let page_entry = self.page_entry(&e.page_id);
                page_entry.screencast_frames.push(e.into());
            }
            TraceEvent::Action(e) => self.append_call(e, |page| &mut page.actions),
            TraceEvent::Event(e) => self.append_call(e, |page| &mut page.events),
            TraceEvent::ResourceSnapshot(e) => {
                tracing::trace!("Forwarding resource snapshot {}", e.snapshot.url);
                self.snapshot_storage.add_resource(e.snapshot);
            }
            TraceEvent::FrameSnapshot(e) => {
                tracing::trace!("Forwarding frame snapshot for {}", e.snapshot.frame_id);
                self.snapshot_storage.add_frame_snapshot(e.snapshot);
            }
            TraceEvent::Unknown => {
                tracing::trace!("Ignoring trace event with unknown type");
            }
        }
    }

    /// Attach an action or event to its page and widen the time range.
    fn append_call(
        &mut self,
        event: ActionTraceEvent,
        list: impl FnOnce(&mut PageEntry) -> &mut Vec<ActionTraceEvent>,
    ) {
        // An empty page id attaches to no page.
        let page_id = event.metadata.page_id.clone().filter(|id| !id.is_empty());
        let Some(page_id) = page_id else {
            tracing::debug!(
                "Dropping {}.{} without page id",
                event.metadata.call_type,
                event.metadata.method
            );
            return;
        };

        let (start_time, end_time) = (event.metadata.start_time, event.metadata.end_time);
        list(self.page_entry(&page_id)).push(event);
        self.context_entry.include_time_range(start_time, end_time);
    }

    fn page_entry(&mut self, page_id: &str) -> &mut PageEntry {
        if !self.context_entry.pages.contains_key(page_id) {
            tracing::debug!("New page {}", page_id);
        }
        self.context_entry
            .pages
            .entry(page_id.to_string())
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::events::{
        CallMetadata, ContextOptionsTraceEvent, FrameSnapshot, FrameSnapshotTraceEvent,
        ResourceSnapshotTraceEvent, ScreencastFrameTraceEvent,
    };

    fn new_model() -> TraceModel {
        TraceModel::default()
    }

    fn call(page_id: Option<&str>, start_time: f64, end_time: f64) -> ActionTraceEvent {
        ActionTraceEvent {
            metadata: CallMetadata {
                page_id: page_id.map(str::to_string),
                start_time,
                end_time,
                ..Default::default()
            },
        }
    }

    fn action(page_id: &str, start_time: f64, end_time: f64) -> TraceEvent {
        TraceEvent::Action(call(Some(page_id), start_time, end_time))
    }

    fn event(page_id: &str, start_time: f64, end_time: f64) -> TraceEvent {
        TraceEvent::Event(call(Some(page_id), start_time, end_time))
    }

    fn context_options(browser_name: &str) -> TraceEvent {
        TraceEvent::ContextOptions(ContextOptionsTraceEvent {
            browser_name: browser_name.to_string(),
            options: BrowserContextOptions::default(),
        })
    }

    fn resource(url: &str) -> TraceEvent {
        TraceEvent::ResourceSnapshot(ResourceSnapshotTraceEvent {
            snapshot: ResourceSnapshot {
                url: url.to_string(),
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_new_model_is_empty() {
        let model = new_model();
        let entry = model.context_entry();
        assert_eq!(entry.start_time, f64::MAX);
        assert_eq!(entry.end_time, f64::MIN);
        assert!(!entry.has_time_range());
        assert!(entry.duration().is_none());
        assert!(entry.pages.is_empty());
    }

    #[test]
    fn test_basic_scenario() {
        let mut model = new_model();
        let sink = MemorySnapshotStorage::new();
        model.append_events(
            vec![
                context_options("chromium"),
                action("p1", 10.0, 20.0),
                action("p2", 5.0, 15.0),
                event("p1", 12.0, 18.0),
            ],
            &sink,
        );

        let entry = model.context_entry();
        assert_eq!(entry.browser_name, "chromium");
        assert_eq!(entry.start_time, 5.0);
        assert_eq!(entry.end_time, 20.0);
        assert_eq!(entry.duration(), Some(15.0));

        let ids: Vec<_> = model.pages().map(|(id, _)| id).collect();
        assert_eq!(ids, ["p1", "p2"]);

        let p1 = model.page("p1").unwrap();
        assert_eq!(p1.actions.len(), 1);
        assert_eq!(p1.events.len(), 1);
        assert_eq!(model.page("p2").unwrap().actions.len(), 1);
    }

    #[test]
    fn test_same_page_id_resolves_to_same_entry() {
        let mut model = new_model();
        model.append_event(action("p2", 1.0, 2.0));
        model.append_event(action("p1", 1.0, 2.0));
        model.append_event(event("p2", 3.0, 4.0));
        model.append_event(action("p2", 5.0, 6.0));

        assert_eq!(model.context_entry().pages.len(), 2);
        let (index, id, p2) = model.context_entry().pages.get_full("p2").unwrap();
        assert_eq!((index, id.as_str()), (0, "p2"));
        assert_eq!(p2.actions.len(), 2);
        assert_eq!(p2.events.len(), 1);
    }

    #[test]
    fn test_page_less_calls_are_dropped() {
        let mut model = new_model();
        model.append_event(TraceEvent::Action(call(None, 1.0, 100.0)));
        model.append_event(TraceEvent::Event(call(None, 0.0, 200.0)));

        assert!(model.context_entry().pages.is_empty());
        assert!(!model.context_entry().has_time_range());

        model.append_event(action("p1", 10.0, 20.0));
        model.append_event(TraceEvent::Action(call(None, 1.0, 100.0)));
        let entry = model.context_entry();
        assert_eq!((entry.start_time, entry.end_time), (10.0, 20.0));
        assert_eq!(entry.pages["p1"].actions.len(), 1);
    }

    #[test]
    fn test_empty_page_id_is_dropped() {
        let mut model = new_model();
        let decoded: TraceEvent = serde_json::from_value(serde_json::json!({
            "type": "action",
            "metadata": { "pageId": "", "startTime": 1, "endTime": 100 }
        }))
        .unwrap();
        model.append_event(decoded);
        model.append_event(TraceEvent::Event(call(Some(""), 0.0, 200.0)));

        let entry = model.context_entry();
        assert!(entry.pages.is_empty());
        assert!(!entry.has_time_range());
        assert_eq!((entry.start_time, entry.end_time), (f64::MAX, f64::MIN));
    }

    #[test]
    fn test_time_range_with_unfinished_call() {
        let mut model = new_model();
        model.append_event(action("p1", 10.0, 0.0));

        let entry = model.context_entry();
        assert!(entry.has_time_range());
        assert_eq!((entry.start_time, entry.end_time), (10.0, 0.0));
        assert_eq!(entry.duration(), Some(0.0));
    }

    #[test]
    fn test_screencast_frames_do_not_affect_time_range() {
        let mut model = new_model();
        model.append_event(TraceEvent::ScreencastFrame(ScreencastFrameTraceEvent {
            page_id: "p1".to_string(),
            sha1: "frame-1".to_string(),
            timestamp: 42.0,
            width: 1280,
            height: 720,
        }));

        let page = model.page("p1").unwrap();
        assert_eq!(page.screencast_frames.len(), 1);
        assert_eq!(page.screencast_frames[0].sha1, "frame-1");
        assert!(!model.context_entry().has_time_range());
    }

    #[test]
    fn test_context_options_last_write_wins() {
        let mut model = new_model();
        model.append_event(context_options("firefox"));
        model.append_event(context_options("webkit"));
        assert_eq!(model.context_entry().browser_name, "webkit");
    }

    #[test]
    fn test_unknown_events_ignored() {
        let mut model = new_model();
        model.append_event(TraceEvent::Unknown);
        assert_eq!(model.context_entry(), &ContextEntry::default());
    }

    #[test]
    fn test_snapshots_forwarded_to_storage() {
        let mut model = new_model();
        model.append_event(resource("https://example.com/a.css"));
        model.append_event(TraceEvent::FrameSnapshot(FrameSnapshotTraceEvent {
            snapshot: FrameSnapshot {
                frame_id: "frame@1".to_string(),
                ..Default::default()
            },
        }));

        assert_eq!(model.snapshot_storage().resources().len(), 1);
        assert_eq!(model.snapshot_storage().snapshot_count(), 1);
        // Not copied until append_events/ingest.
        assert!(model.context_entry().resources.is_empty());
        assert!(model.context_entry().pages.is_empty());
    }

    #[test]
    fn test_append_events_overwrites_resources() {
        let mut model = new_model();
        let mut sink = MemorySnapshotStorage::new();
        sink.add_resource(ResourceSnapshot {
            url: "a".to_string(),
            ..Default::default()
        });
        model.append_events(Vec::new(), &sink);
        assert_eq!(model.context_entry().resources.len(), 1);

        let other = MemorySnapshotStorage::new();
        model.append_events(Vec::new(), &other);
        assert!(model.context_entry().resources.is_empty());
    }

    #[test]
    fn test_ingest_uses_own_storage() {
        let mut model = new_model();
        model.ingest(vec![resource("a"), resource("b"), action("p1", 1.0, 2.0)]);
        model.ingest(vec![resource("c")]);

        let urls: Vec<_> = model
            .context_entry()
            .resources
            .iter()
            .map(|r| r.url.as_str())
            .collect();
        assert_eq!(urls, ["a", "b", "c"]);
    }

    #[test]
    fn test_actions_sorted_across_pages() {
        let mut model = new_model();
        model.append_event(action("p1", 30.0, 31.0));
        model.append_event(action("p2", 10.0, 11.0));
        model.append_event(event("p1", 0.0, 1.0));
        model.append_event(action("p1", 20.0, 21.0));

        let starts: Vec<_> = model
            .context_entry()
            .actions()
            .iter()
            .map(|a| a.metadata.start_time)
            .collect();
        assert_eq!(starts, [10.0, 20.0, 30.0]);
    }
}
