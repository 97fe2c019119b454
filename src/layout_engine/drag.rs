use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{BankCollection, Collection, DashboardCollection, SourceRef, WidgetId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub dragged: WidgetId,
    pub source: Collection,
    /// What the pointer is over right now. Advisory, for overlay rendering.
    pub hover: Option<SourceRef>,
}

/// Collection mutation decided at the end of a drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Move a dashboard widget from one index to another.
    Reorder { widget: WidgetId, from: usize, to: usize },
    /// Take a widget out of the bank and put it on the dashboard, before the
    /// widget at `insert_at` or at the end when `None`.
    Transfer { widget: WidgetId, insert_at: Option<usize> },
    NoOp,
}

/// Turns a drag-start/drag-end pair into a reorder or a bank transfer.
#[derive(Debug, Clone, Default)]
pub struct DragReconciler {
    session: Option<DragSession>,
}

impl DragReconciler {
    pub fn session(&self) -> Option<&DragSession> { self.session.as_ref() }

    pub fn is_active(&self) -> bool { self.session.is_some() }

    pub fn start(&mut self, source: SourceRef) -> bool {
        if let Some(active) = &self.session {
            warn!(active = %active.dragged, requested = %source.id, "Drag already in progress");
            return false;
        }
        debug!(widget = %source.id, source = %source.collection, "Drag started");
        self.session = Some(DragSession {
            dragged: source.id,
            source: source.collection,
            hover: None,
        });
        true
    }

    pub fn hover(&mut self, over: Option<SourceRef>) {
        if let Some(session) = &mut self.session {
            session.hover = over;
        }
    }

    pub fn cancel(&mut self) -> Option<DragSession> { self.session.take() }

    /// Decides what the drop means against the current collections and ends
    /// the session. The caller applies the outcome.
    pub fn end(
        &mut self,
        over: Option<&SourceRef>,
        dashboard: &DashboardCollection,
        bank: &BankCollection,
    ) -> DragOutcome {
        let Some(session) = self.session.take() else {
            warn!("Drag ended without an active session");
            return DragOutcome::NoOp;
        };

        let outcome = match session.source {
            Collection::Bank => reconcile_from_bank(&session.dragged, over, dashboard, bank),
            Collection::Dashboard => reconcile_from_dashboard(&session.dragged, over, dashboard),
        };
        debug!(widget = %session.dragged, ?over, ?outcome, "Drag ended");
        outcome
    }
}

fn reconcile_from_bank(
    dragged: &WidgetId,
    over: Option<&SourceRef>,
    dashboard: &DashboardCollection,
    bank: &BankCollection,
) -> DragOutcome {
    if !bank.contains(dragged.as_str()) {
        warn!(widget = %dragged, "Bank drag for a widget that is not in the bank");
        return DragOutcome::NoOp;
    }
    let insert_at = over
        .filter(|target| !target.is_bank())
        .and_then(|target| dashboard.position(target.id.as_str()));
    DragOutcome::Transfer { widget: dragged.clone(), insert_at }
}

fn reconcile_from_dashboard(
    dragged: &WidgetId,
    over: Option<&SourceRef>,
    dashboard: &DashboardCollection,
) -> DragOutcome {
    let Some(target) = over else { return DragOutcome::NoOp };
    if target.is_bank() || target.id == *dragged {
        return DragOutcome::NoOp;
    }
    match (dashboard.position(dragged.as_str()), dashboard.position(target.id.as_str())) {
        (Some(from), Some(to)) => DragOutcome::Reorder { widget: dragged.clone(), from, to },
        _ => DragOutcome::NoOp,
    }
}

/// Keeps a pointer press from turning into a drag until it has travelled far
/// enough.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivationGate {
    origin: (f64, f64),
    distance: f64,
    activated: bool,
}

impl ActivationGate {
    pub fn new(origin: (f64, f64), distance: f64) -> Self {
        Self { origin, distance, activated: false }
    }

    /// Feeds a pointer position. Returns true exactly once, on the move that
    /// crosses the threshold.
    pub fn update(&mut self, point: (f64, f64)) -> bool {
        if self.activated {
            return false;
        }
        let travelled = f64::hypot(point.0 - self.origin.0, point.1 - self.origin.1);
        if travelled >= self.distance {
            self.activated = true;
            return true;
        }
        false
    }

    pub fn is_activated(&self) -> bool { self.activated }
}
