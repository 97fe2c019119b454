pub mod catalog;
pub mod collections;
pub mod source;
pub mod widget;

pub use catalog::Catalog;
pub use collections::{BankCollection, DashboardCollection};
pub use source::{Collection, SourceRef};
pub use widget::{COLUMNS, GridSpan, MAX_ROW_SPAN, Widget, WidgetId, WidgetKind};
