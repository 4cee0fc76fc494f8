//! Reconcile a freshly computed schedule against what is already queued.
//!
//! The engine is recomputed on every plan; this is where we decide what is
//! new (schedule it) and what no longer appears (cancel it).

use std::collections::HashSet;

use nudge_core::NotificationPayload;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub to_schedule: Vec<NotificationPayload>,
    pub to_cancel: Vec<NotificationPayload>,
    /// Queued payloads still present in the fresh schedule.
    pub kept: Vec<NotificationPayload>,
}

impl Reconciliation {
    /// The queue after applying this reconciliation, ordered by fire time.
    pub fn next_queue(&self) -> Vec<NotificationPayload> {
        let mut q: Vec<NotificationPayload> = self
            .kept
            .iter()
            .chain(self.to_schedule.iter())
            .cloned()
            .collect();
        q.sort_by(|a, b| a.fire_at.cmp(&b.fire_at).then_with(|| a.identity.cmp(&b.identity)));
        q
    }
}

pub fn reconcile(
    fresh: Vec<NotificationPayload>,
    queued: Vec<NotificationPayload>,
    delivered: &HashSet<String>,
) -> Reconciliation {
    let fresh_ids: HashSet<&str> = fresh.iter().map(|p| p.identity.as_str()).collect();
    let queued_ids: HashSet<String> = queued.iter().map(|p| p.identity.clone()).collect();

    let mut out = Reconciliation::default();
    for p in queued {
        if fresh_ids.contains(p.identity.as_str()) {
            out.kept.push(p);
        } else {
            out.to_cancel.push(p);
        }
    }

    let mut seen = HashSet::new();
    for p in fresh {
        if queued_ids.contains(&p.identity) || delivered.contains(&p.identity) {
            continue;
        }
        if seen.insert(p.identity.clone()) {
            out.to_schedule.push(p);
        }
    }

    out
}
