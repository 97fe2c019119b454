use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::geometry::GridGeometry;
use crate::model::{GridSpan, Widget, WidgetId};

/// State of an in-progress resize gesture. Never written into the widget
/// until the gesture stops.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub widget: WidgetId,
    /// Span the widget had when the gesture began.
    pub committed: GridSpan,
    /// Span the pointer currently maps to.
    pub preview: GridSpan,
}

/// Final span produced when a resize gesture stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeCommit {
    pub widget: WidgetId,
    pub span: GridSpan,
}

/// Turns pointer-driven pixel sizes into a discrete span, one gesture at a
/// time.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn session(&self) -> Option<&ResizeSession> { self.session.as_ref() }

    pub fn is_active(&self) -> bool { self.session.is_some() }

    /// Begins a gesture on `widget`. Returns false, leaving the running
    /// session untouched, if one is already active.
    pub fn start(&mut self, widget: &Widget) -> bool {
        if let Some(active) = &self.session {
            warn!(active = %active.widget, requested = %widget.id, "Resize already in progress");
            return false;
        }
        let committed = widget.span();
        debug!(widget = %widget.id, %committed, "Resize started");
        self.session = Some(ResizeSession {
            widget: widget.id.clone(),
            committed,
            preview: committed,
        });
        true
    }

    /// Recomputes the preview from the live pixel size. `geometry` must be
    /// built from the current container width, not the one at `start`.
    pub fn update(
        &mut self,
        geometry: &GridGeometry,
        widget: &str,
        width: f64,
        height: f64,
    ) -> Option<GridSpan> {
        let session = self.session_for(widget)?;
        session.preview = geometry.nearest_span(width, height);
        trace!(widget, width, height, preview = %session.preview, "Resize preview");
        Some(session.preview)
    }

    /// Final recompute, then ends the session and hands back the span to
    /// commit.
    pub fn stop(
        &mut self,
        geometry: &GridGeometry,
        widget: &str,
        width: f64,
        height: f64,
    ) -> Option<ResizeCommit> {
        self.update(geometry, widget, width, height)?;
        let session = self.session.take()?;
        debug!(widget = %session.widget, from = %session.committed, to = %session.preview, "Resize stopped");
        Some(ResizeCommit { widget: session.widget, span: session.preview })
    }

    /// Drops the session without committing anything.
    pub fn cancel(&mut self) -> Option<ResizeSession> { self.session.take() }

    fn session_for(&mut self, widget: &str) -> Option<&mut ResizeSession> {
        match &self.session {
            Some(session) if session.widget != widget => {
                warn!(active = %session.widget, widget, "Resize event for a different widget");
                return None;
            }
            None => {
                warn!(widget, "Resize event without an active session");
                return None;
            }
            Some(_) => {}
        }
        self.session.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WidgetKind;

    fn geometry(width: f64) -> GridGeometry { GridGeometry::new(width, 80.0, 16.0) }

    fn widget() -> Widget { Widget::new("image-builder", "Image Builder", WidgetKind::Product, 1, 3) }

    #[test]
    fn start_captures_committed_span() {
        let mut rc = ResizeController::default();
        assert!(rc.start(&widget()));
        let session = rc.session().unwrap();
        assert_eq!(session.committed, GridSpan::new(1, 3));
        assert_eq!(session.preview, session.committed);
    }

    #[test]
    fn moves_update_preview_only() {
        let mut rc = ResizeController::default();
        let w = widget();
        rc.start(&w);
        let preview = rc.update(&geometry(1200.0), "image-builder", 592.0, 176.0);
        assert_eq!(preview, Some(GridSpan::new(2, 2)));
        assert_eq!(rc.session().unwrap().committed, GridSpan::new(1, 3));
        assert_eq!(w.span(), GridSpan::new(1, 3));
    }

    #[test]
    fn stop_commits_final_preview_and_ends_session() {
        let mut rc = ResizeController::default();
        rc.start(&widget());
        rc.update(&geometry(1200.0), "image-builder", 300.0, 80.0);
        let commit = rc.stop(&geometry(1200.0), "image-builder", 896.0, 272.0).unwrap();
        assert_eq!(commit.widget, "image-builder");
        assert_eq!(commit.span, GridSpan::new(3, 3));
        assert!(!rc.is_active());
    }

    #[test]
    fn preview_follows_container_width_changes() {
        let mut rc = ResizeController::default();
        rc.start(&widget());
        assert_eq!(
            rc.update(&geometry(1200.0), "image-builder", 600.0, 80.0),
            Some(GridSpan::new(2, 1))
        );
        // Same pointer size against a narrower container jumps to a wider span.
        assert_eq!(
            rc.update(&geometry(816.0), "image-builder", 600.0, 80.0),
            Some(GridSpan::new(3, 1))
        );
    }

    #[test]
    fn second_start_is_ignored() {
        let mut rc = ResizeController::default();
        rc.start(&widget());
        let other = Widget::new("acs", "ACS", WidgetKind::Product, 1, 2);
        assert!(!rc.start(&other));
        assert_eq!(rc.session().unwrap().widget, "image-builder");
    }

    #[test]
    fn events_for_other_widgets_are_ignored() {
        let mut rc = ResizeController::default();
        rc.start(&widget());
        assert_eq!(rc.update(&geometry(1200.0), "acs", 1200.0, 560.0), None);
        assert_eq!(rc.stop(&geometry(1200.0), "acs", 1200.0, 560.0), None);
        assert!(rc.is_active());
    }

    #[test]
    fn mismatched_event_leaves_preview_alone() {
        let mut rc = ResizeController::default();
        rc.start(&widget());
        rc.update(&geometry(1200.0), "image-builder", 592.0, 176.0);
        assert_eq!(rc.update(&geometry(1200.0), "acs", 1200.0, 560.0), None);
        assert_eq!(rc.session().unwrap().preview, GridSpan::new(2, 2));
        assert_eq!(
            rc.update(&geometry(1200.0), "image-builder", 1200.0, 560.0),
            Some(GridSpan::new(4, 6))
        );
    }

    #[test]
    fn stop_without_session_is_none() {
        let mut rc = ResizeController::default();
        assert_eq!(rc.stop(&geometry(1200.0), "image-builder", 896.0, 272.0), None);
    }

    #[test]
    fn cancel_discards_preview() {
        let mut rc = ResizeController::default();
        rc.start(&widget());
        rc.update(&geometry(1200.0), "image-builder", 1200.0, 560.0);
        let dropped = rc.cancel().unwrap();
        assert_eq!(dropped.preview, GridSpan::new(4, 6));
        assert!(!rc.is_active());
    }
}
