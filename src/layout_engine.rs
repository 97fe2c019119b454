pub mod drag;
pub mod engine;
pub mod geometry;
pub mod resize;

pub use drag::{ActivationGate, DragOutcome, DragReconciler, DragSession};
pub use engine::{
    ActiveSession, DragOverlay, EventResponse, LayoutCommand, LayoutEngine, LayoutEvent,
    LayoutSnapshot, SpanEntry, WidgetDescriptor,
};
pub use geometry::{ContainerWidth, GridGeometry, ResizeBounds, Size, SnapPoints};
pub use resize::{ResizeCommit, ResizeController, ResizeSession};
