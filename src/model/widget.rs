use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantNames};

/// Number of columns in the dashboard grid. Fixed; hosts cannot change it.
pub const COLUMNS: u8 = 4;
/// Tallest footprint a widget may take, in rows.
pub const MAX_ROW_SPAN: u8 = 6;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self { Self(value.to_string()) }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self { Self(value) }
}

impl Borrow<str> for WidgetId {
    fn borrow(&self) -> &str { &self.0 }
}

impl PartialEq<str> for WidgetId {
    fn eq(&self, other: &str) -> bool { self.0 == other }
}

impl PartialEq<&str> for WidgetId {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Classification the renderer uses to pick content. The layout core carries
/// it around but never branches on it.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WidgetKind {
    Product,
    Settings,
    RecentlyVisited,
    ExploreCapabilities,
    Subscriptions,
    Placeholder,
}

/// Discrete footprint of a widget: columns x rows.
///
/// Always within `[1, COLUMNS]` x `[1, MAX_ROW_SPAN]`; every constructor clamps.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpan {
    column_span: u8,
    row_span: u8,
}

impl GridSpan {
    pub fn new(column_span: i64, row_span: i64) -> Self {
        Self {
            column_span: clamp_span(column_span, COLUMNS),
            row_span: clamp_span(row_span, MAX_ROW_SPAN),
        }
    }

    pub fn column_span(&self) -> u8 { self.column_span }

    pub fn row_span(&self) -> u8 { self.row_span }
}

impl fmt::Display for GridSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.column_span, self.row_span)
    }
}

pub fn clamp_span(value: i64, max: u8) -> u8 { value.clamp(1, max as i64) as u8 }

/// A dashboard widget: identity and layout metadata.
///
/// `title`, `kind`, `navigate_to` and `footer_text` are pass-through payload for
/// the renderer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Widget {
    pub id: WidgetId,
    #[serde(default)]
    pub title: String,
    pub kind: WidgetKind,
    pub column_span: u8,
    pub row_span: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

impl Widget {
    pub fn new(
        id: impl Into<WidgetId>,
        title: impl Into<String>,
        kind: WidgetKind,
        column_span: i64,
        row_span: i64,
    ) -> Self {
        let span = GridSpan::new(column_span, row_span);
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            column_span: span.column_span(),
            row_span: span.row_span(),
            navigate_to: None,
            footer_text: None,
        }
    }

    pub fn with_navigation(mut self, target: impl Into<String>) -> Self {
        self.navigate_to = Some(target.into());
        self
    }

    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer_text = Some(text.into());
        self
    }

    pub fn span(&self) -> GridSpan { GridSpan::new(self.column_span as i64, self.row_span as i64) }

    pub(crate) fn set_span(&mut self, span: GridSpan) {
        self.column_span = span.column_span();
        self.row_span = span.row_span();
    }

    /// Pulls spans read from an untrusted source back into range.
    pub(crate) fn normalized(mut self) -> Self {
        let span = self.span();
        self.set_span(span);
        self
    }
}
