use tracing::warn;

use super::widget::{Widget, WidgetKind};
use crate::common::collections::HashSet;

/// The seed list a dashboard starts from and returns to on reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    widgets: Vec<Widget>,
}

impl Default for Catalog {
    fn default() -> Self { Self::builtin() }
}

impl Catalog {
    /// Builds a catalog from arbitrary entries. Spans are clamped and repeated
    /// ids dropped (first one wins) so a seed can never break membership
    /// uniqueness.
    pub fn new(widgets: impl IntoIterator<Item = Widget>) -> Self {
        let mut seen = HashSet::default();
        let mut out = Vec::new();
        for widget in widgets {
            if !seen.insert(widget.id.clone()) {
                warn!(id = %widget.id, "Dropping duplicate catalog entry");
                continue;
            }
            out.push(widget.normalized());
        }
        Self { widgets: out }
    }

    pub fn widgets(&self) -> &[Widget] { &self.widgets }

    pub fn len(&self) -> usize { self.widgets.len() }

    pub fn is_empty(&self) -> bool { self.widgets.is_empty() }

    pub fn builtin() -> Self {
        use WidgetKind::*;
        Self::new([
            Widget::new("rhel", "Red Hat Enterprise Linux", Product, 1, 3),
            Widget::new("openshift", "Red Hat OpenShift", Product, 1, 3),
            Widget::new("ansible", "Ansible Automation Platform", Product, 1, 3),
            Widget::new("recently-visited", "Recently Visited", RecentlyVisited, 1, 4),
            Widget::new("settings", "Settings", Settings, 1, 2),
            Widget::new("image-builder", "Image Builder", Product, 1, 3),
            Widget::new("explore-capabilities", "Explore capabilities", ExploreCapabilities, 3, 5),
            Widget::new("acs", "Advanced Cluster Security", Product, 1, 2),
            Widget::new("openshift-ai", "Red Hat OpenShift AI", Product, 1, 2),
            Widget::new("data-integrations", "Data Integrations", Placeholder, 1, 2)
                .with_navigation("/data-integration")
                .with_footer("View integrations"),
            Widget::new("alert-manager", "Alert Manager", Placeholder, 1, 2)
                .with_navigation("/alert-manager")
                .with_footer("Manage alerts"),
            Widget::new("bookmarked-resources", "Bookmarked Resources", Placeholder, 1, 2)
                .with_navigation("/bookmarks")
                .with_footer("View bookmarks"),
            Widget::new("events", "Events", Placeholder, 1, 2)
                .with_navigation("/event-log")
                .with_footer("View events"),
            Widget::new("support-cases", "My Support Cases", Placeholder, 1, 2)
                .with_navigation("/support")
                .with_footer("View support cases"),
            Widget::new("ask-red-hat", "Ask Red Hat", Placeholder, 1, 2)
                .with_footer("Ask a question"),
            Widget::new("subscriptions", "Subscriptions", Subscriptions, 4, 2),
        ])
    }
}
