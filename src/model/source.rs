use serde::{Deserialize, Serialize};
use strum::Display;

use super::widget::WidgetId;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Collection {
    Dashboard,
    Bank,
}

/// A widget id tagged with the collection it was picked up from.
///
/// Hosts see a single flat id space; bank entries carry a prefix
/// (`"bank-events"`) so the two collections cannot collide.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef {
    pub collection: Collection,
    pub id: WidgetId,
}

impl SourceRef {
    pub fn dashboard(id: impl Into<WidgetId>) -> Self {
        Self { collection: Collection::Dashboard, id: id.into() }
    }

    pub fn bank(id: impl Into<WidgetId>) -> Self {
        Self { collection: Collection::Bank, id: id.into() }
    }

    pub fn parse(raw: &str, bank_prefix: &str) -> Self {
        if !bank_prefix.is_empty() {
            if let Some(id) = raw.strip_prefix(bank_prefix) {
                return Self::bank(id);
            }
        }
        Self::dashboard(raw)
    }

    pub fn encode(&self, bank_prefix: &str) -> String {
        match self.collection {
            Collection::Dashboard => self.id.to_string(),
            Collection::Bank => format!("{bank_prefix}{}", self.id),
        }
    }

    pub fn is_bank(&self) -> bool { self.collection == Collection::Bank }
}
