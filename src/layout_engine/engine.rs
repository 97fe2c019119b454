use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::drag::{ActivationGate, DragOutcome, DragReconciler, DragSession};
use super::geometry::{ContainerWidth, GridGeometry, Size};
use super::resize::{ResizeCommit, ResizeController, ResizeSession};
use crate::common::config::{Config, DragSettings, GridSettings, Settings};
use crate::model::{
    BankCollection, COLUMNS, Catalog, Collection, DashboardCollection, GridSpan, SourceRef,
    Widget, WidgetId, WidgetKind,
};

/// Gesture events reported by the host. Drag ids arrive in the host's flat
/// namespace and are split into collection + id with the configured prefix.
#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEvent {
    ContainerResized(f64),
    ResizeStarted { widget: WidgetId },
    ResizeMoved { widget: WidgetId, width: f64, height: f64 },
    ResizeStopped { widget: WidgetId, width: f64, height: f64 },
    DragStarted { active: String },
    DragHovered { over: Option<String> },
    DragEnded { over: Option<String> },
}

#[non_exhaustive]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    RemoveWidget(WidgetId),
    ResizeWidget { widget: WidgetId, column_span: i64, row_span: i64 },
    ResetToDefault,
}

#[must_use]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventResponse {
    pub dashboard_changed: bool,
    pub bank_changed: bool,
    /// Live span while a resize gesture is running.
    pub preview: Option<GridSpan>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ActiveSession {
    Resize(ResizeSession),
    Drag(DragSession),
}

/// What the host needs to draw the floating drag preview.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DragOverlay {
    pub widget: Widget,
    pub source: Collection,
    pub width: f64,
    /// None for the compact bank preview, which sizes to its content.
    pub height: Option<f64>,
}

/// Plain layout record handed to the renderer, in dashboard order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WidgetDescriptor {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub title: String,
    pub column_span: u8,
    pub row_span: u8,
    pub size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigate_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SpanEntry {
    pub id: WidgetId,
    pub column_span: u8,
    pub row_span: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LayoutSnapshot {
    pub dashboard: Vec<SpanEntry>,
    pub bank: Vec<WidgetId>,
}

/// Owns the dashboard and bank collections and is the only thing that
/// mutates them.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    dashboard: DashboardCollection,
    bank: BankCollection,
    catalog: Catalog,
    grid: GridSettings,
    drag_settings: DragSettings,
    container_width: ContainerWidth,
    resize: ResizeController,
    drag: DragReconciler,
}

impl LayoutEngine {
    pub fn new(config: &Config) -> Self { Self::with_catalog(config.catalog(), &config.settings) }

    pub fn with_catalog(catalog: Catalog, settings: &Settings) -> Self {
        Self {
            dashboard: DashboardCollection::new(catalog.widgets().to_vec()),
            bank: BankCollection::default(),
            catalog,
            grid: settings.grid,
            drag_settings: settings.drag.clone(),
            container_width: ContainerWidth::new(settings.grid.initial_container_width),
            resize: ResizeController::default(),
            drag: DragReconciler::default(),
        }
    }

    pub fn dashboard(&self) -> &[Widget] { self.dashboard.as_slice() }

    pub fn bank(&self) -> &[Widget] { self.bank.as_slice() }

    pub fn catalog(&self) -> &Catalog { &self.catalog }

    /// Handle for the host's container observer. Writes through it are seen
    /// by the next resize computation.
    pub fn container_width(&self) -> ContainerWidth { self.container_width.clone() }

    /// Geometry for the container width as of right now.
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::from_settings(&self.grid, self.container_width.get())
    }

    pub fn resize_session(&self) -> Option<&ResizeSession> { self.resize.session() }

    pub fn drag_session(&self) -> Option<&DragSession> { self.drag.session() }

    pub fn active_session(&self) -> Option<ActiveSession> {
        if let Some(session) = self.resize.session() {
            return Some(ActiveSession::Resize(session.clone()));
        }
        self.drag.session().cloned().map(ActiveSession::Drag)
    }

    /// Gate for a pointer press at `origin`. The host sends `DragStarted` once
    /// it opens.
    pub fn activation_gate(&self, origin: (f64, f64)) -> ActivationGate {
        ActivationGate::new(origin, self.drag_settings.activation_distance)
    }

    pub fn handle_event(&mut self, event: LayoutEvent) -> EventResponse {
        debug!(?event);
        match event {
            LayoutEvent::ContainerResized(width) => {
                self.container_width.set(width);
                EventResponse::default()
            }
            LayoutEvent::ResizeStarted { widget } => {
                let Some(target) = self.dashboard.get(widget.as_str()) else {
                    warn!(%widget, "Resize started on a widget that is not on the dashboard");
                    return EventResponse::default();
                };
                if !self.resize.start(target) {
                    return EventResponse::default();
                }
                EventResponse {
                    preview: self.resize.session().map(|s| s.preview),
                    ..Default::default()
                }
            }
            LayoutEvent::ResizeMoved { widget, width, height } => {
                let geometry = self.geometry();
                EventResponse {
                    preview: self.resize.update(&geometry, widget.as_str(), width, height),
                    ..Default::default()
                }
            }
            LayoutEvent::ResizeStopped { widget, width, height } => {
                let geometry = self.geometry();
                match self.resize.stop(&geometry, widget.as_str(), width, height) {
                    Some(ResizeCommit { widget, span }) => EventResponse {
                        dashboard_changed: self.resize_widget(
                            widget.as_str(),
                            span.column_span() as i64,
                            span.row_span() as i64,
                        ),
                        ..Default::default()
                    },
                    None => EventResponse::default(),
                }
            }
            LayoutEvent::DragStarted { active } => {
                let source = SourceRef::parse(&active, &self.drag_settings.bank_prefix);
                let _ = self.drag.start(source);
                EventResponse::default()
            }
            LayoutEvent::DragHovered { over } => {
                let over = over.map(|raw| SourceRef::parse(&raw, &self.drag_settings.bank_prefix));
                self.drag.hover(over);
                EventResponse::default()
            }
            LayoutEvent::DragEnded { over } => {
                let over = over.map(|raw| SourceRef::parse(&raw, &self.drag_settings.bank_prefix));
                let outcome = self.drag.end(over.as_ref(), &self.dashboard, &self.bank);
                self.apply_drag_outcome(outcome)
            }
        }
    }

    pub fn handle_command(&mut self, command: LayoutCommand) -> EventResponse {
        debug!(?command);
        match command {
            LayoutCommand::RemoveWidget(widget) => {
                let changed = self.remove_widget(widget.as_str());
                EventResponse {
                    dashboard_changed: changed,
                    bank_changed: changed,
                    ..Default::default()
                }
            }
            LayoutCommand::ResizeWidget { widget, column_span, row_span } => EventResponse {
                dashboard_changed: self.resize_widget(widget.as_str(), column_span, row_span),
                ..Default::default()
            },
            LayoutCommand::ResetToDefault => {
                self.reset();
                EventResponse {
                    dashboard_changed: true,
                    bank_changed: true,
                    ..Default::default()
                }
            }
        }
    }

    /// Restores the seed dashboard and empties the bank. Any gesture in
    /// flight is dropped.
    pub fn reset(&mut self) {
        if let Some(session) = self.resize.cancel() {
            debug!(widget = %session.widget, "Reset dropped an active resize");
        }
        if let Some(session) = self.drag.cancel() {
            debug!(widget = %session.dragged, "Reset dropped an active drag");
        }
        self.dashboard.replace_all(self.catalog.widgets().to_vec());
        self.bank.clear();
        info!(widgets = self.dashboard.len(), "Dashboard reset to default");
    }

    /// Moves a dashboard widget into the bank. Returns false if `id` is not on
    /// the dashboard.
    pub fn remove_widget(&mut self, id: &str) -> bool {
        let Some(widget) = self.dashboard.remove(id) else {
            debug!(id, "Remove ignored: not on the dashboard");
            return false;
        };
        debug!(id, "Widget moved to bank");
        self.bank.push(widget);
        true
    }

    /// Sets a dashboard widget's spans, clamped to the grid. Returns false if
    /// `id` is not on the dashboard.
    pub fn resize_widget(&mut self, id: &str, column_span: i64, row_span: i64) -> bool {
        let Some(widget) = self.dashboard.get_mut(id) else {
            debug!(id, "Resize ignored: not on the dashboard");
            return false;
        };
        let span = GridSpan::new(column_span, row_span);
        debug!(id, from = %widget.span(), to = %span, "Widget resized");
        widget.set_span(span);
        true
    }

    fn apply_drag_outcome(&mut self, outcome: DragOutcome) -> EventResponse {
        match outcome {
            DragOutcome::Reorder { widget, from, to } => {
                let moved = self.dashboard.move_item(from, to);
                if !moved {
                    warn!(%widget, from, to, "Reorder indices out of range");
                }
                EventResponse { dashboard_changed: moved, ..Default::default() }
            }
            DragOutcome::Transfer { widget, insert_at } => {
                let Some(taken) = self.bank.take(widget.as_str()) else {
                    return EventResponse::default();
                };
                match insert_at {
                    Some(index) => self.dashboard.insert(index, taken),
                    None => self.dashboard.push(taken),
                }
                EventResponse {
                    dashboard_changed: true,
                    bank_changed: true,
                    ..Default::default()
                }
            }
            DragOutcome::NoOp => EventResponse::default(),
        }
    }

    pub fn overlay(&self) -> Option<DragOverlay> {
        let session = self.drag.session()?;
        match session.source {
            Collection::Bank => {
                let widget = self.bank.get(session.dragged.as_str())?;
                Some(DragOverlay {
                    widget: widget.clone(),
                    source: Collection::Bank,
                    width: self.drag_settings.bank_overlay_width,
                    height: None,
                })
            }
            Collection::Dashboard => {
                let widget = self.dashboard.get(session.dragged.as_str())?;
                let geometry = self.geometry();
                let share = widget.column_span as f64 / COLUMNS as f64;
                let width = (geometry.container_width() * share - geometry.gap())
                    .max(self.drag_settings.overlay_min_width);
                Some(DragOverlay {
                    widget: widget.clone(),
                    source: Collection::Dashboard,
                    width,
                    height: Some(geometry.span_height(widget.row_span)),
                })
            }
        }
    }

    pub fn descriptors(&self) -> Vec<WidgetDescriptor> {
        let geometry = self.geometry();
        self.dashboard
            .iter()
            .map(|widget| WidgetDescriptor {
                id: widget.id.clone(),
                kind: widget.kind,
                title: widget.title.clone(),
                column_span: widget.column_span,
                row_span: widget.row_span,
                size: geometry.span_size(widget.span()),
                navigate_to: widget.navigate_to.clone(),
                footer_text: widget.footer_text.clone(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            dashboard: self
                .dashboard
                .iter()
                .map(|w| SpanEntry {
                    id: w.id.clone(),
                    column_span: w.column_span,
                    row_span: w.row_span,
                })
                .collect(),
            bank: self.bank.ids(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    fn engine() -> LayoutEngine { LayoutEngine::new(&Config::default()) }

    fn ids(widgets: &[Widget]) -> Vec<&str> { widgets.iter().map(|w| w.id.as_str()).collect() }

    #[test]
    fn starts_from_seed() {
        let engine = engine();
        assert_eq!(engine.dashboard().len(), 16);
        assert!(engine.bank().is_empty());
        assert!(engine.active_session().is_none());
        assert_eq!(engine.geometry().container_width(), 1200.0);
    }

    #[test]
    fn remove_moves_widget_to_bank() {
        let mut engine = engine();
        let response = engine.handle_command(LayoutCommand::RemoveWidget("acs".into()));
        assert!(response.dashboard_changed && response.bank_changed);
        assert_eq!(engine.dashboard().len(), 15);
        assert!(!ids(engine.dashboard()).contains(&"acs"));
        assert_eq!(ids(engine.bank()), vec!["acs"]);
    }

    #[test]
    fn remove_unknown_is_noop() {
        let mut engine = engine();
        assert!(!engine.remove_widget("nope"));
        engine.remove_widget("acs");
        // Second remove: already in the bank.
        assert!(!engine.remove_widget("acs"));
        assert_eq!(ids(engine.bank()), vec!["acs"]);
    }

    #[test]
    fn resize_command_clamps() {
        let mut engine = engine();
        let response = engine.handle_command(LayoutCommand::ResizeWidget {
            widget: "rhel".into(),
            column_span: 9,
            row_span: 0,
        });
        assert!(response.dashboard_changed);
        assert_eq!(engine.dashboard()[0].span(), GridSpan::new(4, 1));
    }

    #[test]
    fn resize_of_banked_widget_is_noop() {
        let mut engine = engine();
        engine.remove_widget("acs");
        assert!(!engine.resize_widget("acs", 2, 2));
        assert_eq!(engine.bank()[0].span(), GridSpan::new(1, 2));
    }

    #[test]
    fn resize_gesture_commits_on_stop() {
        let mut engine = engine();
        let start = engine.handle_event(LayoutEvent::ResizeStarted { widget: "image-builder".into() });
        assert_eq!(start.preview, Some(GridSpan::new(1, 3)));

        let moved = engine.handle_event(LayoutEvent::ResizeMoved {
            widget: "image-builder".into(),
            width: 600.0,
            height: 180.0,
        });
        assert_eq!(moved.preview, Some(GridSpan::new(2, 2)));
        assert!(!moved.dashboard_changed);
        assert_eq!(engine.dashboard()[5].span(), GridSpan::new(1, 3));
        assert!(matches!(engine.active_session(), Some(ActiveSession::Resize(_))));

        let stopped = engine.handle_event(LayoutEvent::ResizeStopped {
            widget: "image-builder".into(),
            width: 896.0,
            height: 272.0,
        });
        assert!(stopped.dashboard_changed);
        assert_eq!(engine.dashboard()[5].span(), GridSpan::new(3, 3));
        assert!(engine.active_session().is_none());
    }

    #[test]
    fn resize_start_on_banked_widget_is_ignored() {
        let mut engine = engine();
        engine.remove_widget("acs");
        let response = engine.handle_event(LayoutEvent::ResizeStarted { widget: "acs".into() });
        assert_eq!(response, EventResponse::default());
        assert!(engine.resize_session().is_none());
    }

    #[test]
    fn resize_reads_latest_container_width() {
        let mut engine = engine();
        let observer = engine.container_width();
        let _ = engine.handle_event(LayoutEvent::ResizeStarted { widget: "rhel".into() });
        let before = engine.handle_event(LayoutEvent::ResizeMoved {
            widget: "rhel".into(),
            width: 600.0,
            height: 80.0,
        });
        observer.set(816.0);
        let after = engine.handle_event(LayoutEvent::ResizeMoved {
            widget: "rhel".into(),
            width: 600.0,
            height: 80.0,
        });
        assert_eq!(before.preview, Some(GridSpan::new(2, 1)));
        assert_eq!(after.preview, Some(GridSpan::new(3, 1)));
    }

    #[test]
    fn container_resized_event_updates_geometry() {
        let mut engine = engine();
        let _ = engine.handle_event(LayoutEvent::ContainerResized(848.0));
        assert_eq!(engine.geometry().column_width(), 200.0);
    }

    #[test]
    fn bank_drag_onto_dashboard_inserts_before_target() {
        let mut engine = engine();
        engine.remove_widget("events");
        let target = engine.dashboard()[2].id.clone();

        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "bank-events".into() });
        let response =
            engine.handle_event(LayoutEvent::DragEnded { over: Some(target.to_string()) });

        assert!(response.dashboard_changed && response.bank_changed);
        assert_eq!(engine.dashboard().len(), 16);
        assert_eq!(engine.dashboard()[2].id, "events");
        assert_eq!(engine.dashboard()[3].id, target);
        assert!(engine.bank().is_empty());
    }

    #[test]
    fn bank_drag_onto_nothing_appends() {
        let mut engine = engine();
        engine.remove_widget("rhel");
        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "bank-rhel".into() });
        let _ = engine.handle_event(LayoutEvent::DragEnded { over: None });
        assert_eq!(engine.dashboard().last().map(|w| w.id.as_str()), Some("rhel"));
        assert!(engine.bank().is_empty());
    }

    #[test]
    fn dashboard_drag_reorders() {
        let mut engine = engine();
        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "rhel".into() });
        let response = engine.handle_event(LayoutEvent::DragEnded { over: Some("settings".into()) });
        assert!(response.dashboard_changed);
        assert!(!response.bank_changed);
        assert_eq!(
            ids(&engine.dashboard()[..5]),
            vec!["openshift", "ansible", "recently-visited", "settings", "rhel"]
        );
    }

    #[test]
    fn dashboard_drag_onto_bank_never_removes() {
        let mut engine = engine();
        engine.remove_widget("acs");
        let before = engine.snapshot();
        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "rhel".into() });
        let response = engine.handle_event(LayoutEvent::DragEnded { over: Some("bank-acs".into()) });
        assert_eq!(response, EventResponse::default());
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn overlay_for_dashboard_drag_uses_widget_footprint() {
        let mut engine = engine();
        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "explore-capabilities".into() });
        let overlay = engine.overlay().unwrap();
        assert_eq!(overlay.source, Collection::Dashboard);
        assert_eq!(overlay.width, 1200.0 * 0.75 - 16.0);
        assert_eq!(overlay.height, Some(464.0));
    }

    #[test]
    fn overlay_for_narrow_widget_respects_min_width() {
        let mut engine = engine();
        let _ = engine.handle_event(LayoutEvent::ContainerResized(800.0));
        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "rhel".into() });
        assert_eq!(engine.overlay().unwrap().width, 280.0);
    }

    #[test]
    fn overlay_for_bank_drag_is_compact() {
        let mut engine = engine();
        engine.remove_widget("acs");
        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "bank-acs".into() });
        let _ = engine.handle_event(LayoutEvent::DragHovered { over: Some("rhel".into()) });
        let overlay = engine.overlay().unwrap();
        assert_eq!(overlay.widget.id, "acs");
        assert_eq!(overlay.width, 250.0);
        assert_eq!(overlay.height, None);
        let Some(ActiveSession::Drag(session)) = engine.active_session() else {
            panic!("expected drag session");
        };
        assert_eq!(session.hover, Some(SourceRef::dashboard("rhel")));
    }

    #[test]
    fn activation_gate_uses_configured_distance() {
        let mut config = Config::default();
        config.settings.drag.activation_distance = 20.0;
        let engine = LayoutEngine::new(&config);
        let mut gate = engine.activation_gate((0.0, 0.0));
        assert!(!gate.update((12.0, 12.0)));
        assert!(gate.update((12.0, 16.0)));
    }

    #[test]
    fn reset_restores_seed_and_drops_sessions() {
        let mut engine = engine();
        engine.remove_widget("acs");
        engine.resize_widget("rhel", 4, 6);
        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "openshift".into() });

        let _ = engine.handle_command(LayoutCommand::ResetToDefault);
        assert_eq!(engine.dashboard(), engine.catalog().widgets());
        assert!(engine.bank().is_empty());
        assert!(engine.active_session().is_none());
    }

    #[test]
    fn descriptors_carry_pixel_size_and_payload() {
        let engine = engine();
        let descriptors = engine.descriptors();
        assert_eq!(descriptors.len(), 16);
        let explore = &descriptors[6];
        assert_eq!(explore.id, "explore-capabilities");
        assert_eq!(explore.size, Size { width: 896.0, height: 464.0 });
        let events = descriptors.iter().find(|d| d.id == "events").unwrap();
        assert_eq!(events.navigate_to.as_deref(), Some("/event-log"));
        assert_eq!(events.footer_text.as_deref(), Some("View events"));
    }

    #[test]
    fn custom_bank_prefix_is_honoured() {
        let mut config = Config::default();
        config.settings.drag.bank_prefix = "drawer:".to_string();
        let mut engine = LayoutEngine::new(&config);
        engine.remove_widget("acs");
        let _ = engine.handle_event(LayoutEvent::DragStarted { active: "drawer:acs".into() });
        let _ = engine.handle_event(LayoutEvent::DragEnded { over: Some("rhel".into()) });
        assert_eq!(engine.dashboard()[0].id, "acs");
        assert!(engine.bank().is_empty());
    }
}
