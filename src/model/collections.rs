use serde::{Deserialize, Serialize};

use super::widget::{Widget, WidgetId};

/// Widgets currently on the dashboard. Order is display order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct DashboardCollection {
    widgets: Vec<Widget>,
}

impl DashboardCollection {
    pub fn new(widgets: Vec<Widget>) -> Self { Self { widgets } }

    pub fn as_slice(&self) -> &[Widget] { &self.widgets }

    pub fn iter(&self) -> impl Iterator<Item = &Widget> { self.widgets.iter() }

    pub fn len(&self) -> usize { self.widgets.len() }

    pub fn is_empty(&self) -> bool { self.widgets.is_empty() }

    pub fn ids(&self) -> Vec<WidgetId> { self.widgets.iter().map(|w| w.id.clone()).collect() }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.widgets.iter().position(|w| w.id == id)
    }

    pub fn contains(&self, id: &str) -> bool { self.position(id).is_some() }

    pub fn get(&self, id: &str) -> Option<&Widget> { self.widgets.iter().find(|w| w.id == id) }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    /// Inserts before the widget currently at `index`; past-the-end appends.
    pub(crate) fn insert(&mut self, index: usize, widget: Widget) {
        let index = index.min(self.widgets.len());
        self.widgets.insert(index, widget);
    }

    pub(crate) fn push(&mut self, widget: Widget) { self.widgets.push(widget); }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Widget> {
        let index = self.position(id)?;
        Some(self.widgets.remove(index))
    }

    /// Array-move: takes the widget out of `from` and reinserts it at `to`.
    /// Everything between shifts by one; nothing else changes order.
    pub(crate) fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.widgets.len() || to >= self.widgets.len() {
            return false;
        }
        if from == to {
            return true;
        }
        let widget = self.widgets.remove(from);
        self.widgets.insert(to, widget);
        true
    }

    pub(crate) fn replace_all(&mut self, widgets: Vec<Widget>) { self.widgets = widgets; }
}

/// Widgets removed from the dashboard. Kept in insertion order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct BankCollection {
    widgets: Vec<Widget>,
}

impl BankCollection {
    pub fn as_slice(&self) -> &[Widget] { &self.widgets }

    pub fn iter(&self) -> impl Iterator<Item = &Widget> { self.widgets.iter() }

    pub fn len(&self) -> usize { self.widgets.len() }

    pub fn is_empty(&self) -> bool { self.widgets.is_empty() }

    pub fn ids(&self) -> Vec<WidgetId> { self.widgets.iter().map(|w| w.id.clone()).collect() }

    pub fn contains(&self, id: &str) -> bool { self.widgets.iter().any(|w| w.id == id) }

    pub fn get(&self, id: &str) -> Option<&Widget> { self.widgets.iter().find(|w| w.id == id) }

    pub(crate) fn push(&mut self, widget: Widget) { self.widgets.push(widget); }

    pub(crate) fn take(&mut self, id: &str) -> Option<Widget> {
        let index = self.widgets.iter().position(|w| w.id == id)?;
        Some(self.widgets.remove(index))
    }

    pub(crate) fn clear(&mut self) { self.widgets.clear(); }
}
