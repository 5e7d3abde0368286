// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checks the `tracing` events the watcher emits with the `tracing` feature.

#![cfg(feature = "tracing")]

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Registry;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use understory_reveal::{
    HandleSlots, RevealConfig, VisibilityEntry, VisibilityHost, VisibilityWatcher,
};

#[derive(Clone, Debug, PartialEq)]
struct Record {
    level: Level,
    target: String,
    message: String,
    index: Option<u64>,
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    index: Option<u64>,
}

impl Visit for RecordVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "index" {
            self.index = Some(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<Record>>>);

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        self.0.lock().unwrap().push(Record {
            level: *meta.level(),
            target: meta.target().to_owned(),
            message: visitor.message,
            index: visitor.index,
        });
    }
}

fn capture(f: impl FnOnce()) -> Vec<Record> {
    let layer = Capture::default();
    let subscriber = Registry::default().with(layer.clone());
    tracing::subscriber::with_default(subscriber, f);
    layer.0.lock().unwrap().clone()
}

#[derive(Default)]
struct Host {
    supported: bool,
}

impl VisibilityHost<u32> for Host {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn observe(&mut self, _handle: &u32) {}

    fn unobserve(&mut self, _handle: &u32) {}
}

fn messages(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.message.as_str()).collect()
}

#[test]
fn attach_reveal_detach_emit_events() {
    let mut slots = HandleSlots::with_len(3);
    slots.set(0, Some(10_u32));
    slots.set(2, Some(12));

    let records = capture(|| {
        let mut host = Host { supported: true };
        let mut watcher = VisibilityWatcher::new(RevealConfig::new(3, 0.3).unwrap());
        let attach = watcher.attach(&mut host, &slots);
        watcher.handle_batch(&[VisibilityEntry::new(12, 0.8)]);
        watcher.detach(&mut host, attach.subscription);
        watcher.handle_batch(&[VisibilityEntry::new(10, 1.0)]);
    });

    assert!(records.iter().all(|r| r.target == "understory_reveal"));
    assert_eq!(
        messages(&records),
        [
            "observe",
            "no handle mounted; skipping",
            "observe",
            "attached",
            "revealed",
            "unobserve",
            "unobserve",
            "detached",
            "dropped batch after detach",
        ]
    );

    let revealed = records.iter().find(|r| r.message == "revealed").unwrap();
    assert_eq!(revealed.level, Level::TRACE);
    assert_eq!(revealed.index, Some(2));

    let skipped = &records[1];
    assert_eq!(skipped.level, Level::DEBUG);
    assert_eq!(skipped.index, Some(1));

    let attached = records.iter().find(|r| r.message == "attached").unwrap();
    assert_eq!(attached.level, Level::DEBUG);
}

#[test]
fn fallback_is_reported_per_section() {
    let mut slots = HandleSlots::with_len(2);
    slots.set(0, Some(1_u32));
    slots.set(1, Some(2));

    let records = capture(|| {
        let mut host = Host::default();
        let mut watcher = VisibilityWatcher::new(RevealConfig::new(2, 0.3).unwrap());
        watcher.attach(&mut host, &slots);
    });

    let fallbacks: Vec<_> = records
        .iter()
        .filter(|r| r.message == "visibility host unsupported; revealing immediately")
        .map(|r| r.index)
        .collect();
    assert_eq!(fallbacks, [Some(0), Some(1)]);
}
