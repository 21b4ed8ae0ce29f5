//! Field-level merge of remote payloads onto the working document.
//!
//! Both the initial remote fetch and every change-feed notification go
//! through [`DocumentPatch`]: each top-level field present in the payload
//! replaces the working value wholesale, absent fields keep the previous
//! value, and a field that does not decode is ignored (logged, never
//! surfaced). Application is idempotent, so duplicate or out-of-order
//! notifications are harmless.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::model::{
    self, FooterData, HeaderData, NewsletterDocument, SectionInstance, WidgetCard, WidgetConfig,
};

/// A partial document decoded from an arbitrary remote payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub sections: Option<Vec<SectionInstance>>,
    pub footer: Option<FooterData>,
    pub header: Option<HeaderData>,
    pub widget_enabled: Option<bool>,
    pub widget_config: Option<WidgetConfig>,
    pub widget_cards: Option<Vec<WidgetCard>>,
}

impl DocumentPatch {
    /// Decode a payload field-by-field. A field that is absent, `null`, or
    /// mis-shaped stays `None`; `sections` is additionally guarded so it can
    /// never replace the working sequence with a non-sequence.
    pub fn from_value(payload: &Value) -> Self {
        let Some(obj) = payload.as_object() else {
            tracing::warn!(
                "remote payload is not an object (found {}), ignoring",
                model::json_kind(payload)
            );
            return DocumentPatch::default();
        };

        DocumentPatch {
            sections: sequence_field(obj, "sections").map(model::sections_from_value),
            footer: field_as(obj, "footer"),
            header: field_as(obj, "header"),
            widget_enabled: field_as(obj, "widgetEnabled"),
            widget_config: field_as(obj, "widgetConfig"),
            widget_cards: sequence_field(obj, "widgetCards").map(model::cards_from_value),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == DocumentPatch::default()
    }

    pub fn has_sections(&self) -> bool {
        self.sections.is_some()
    }

    /// Replace each present field wholesale; leave the rest untouched.
    pub fn apply(self, doc: &mut NewsletterDocument) {
        if let Some(sections) = self.sections {
            doc.sections = sections;
        }
        if let Some(footer) = self.footer {
            doc.footer = footer;
        }
        if let Some(header) = self.header {
            doc.header = Some(header);
        }
        if let Some(enabled) = self.widget_enabled {
            doc.widget_enabled = enabled;
        }
        if let Some(config) = self.widget_config {
            doc.widget_config = Some(config);
        }
        if let Some(cards) = self.widget_cards {
            doc.widget_cards = cards;
        }
    }
}

fn field_as<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(field = key, %err, "ignoring mis-shaped field in remote payload");
                None
            }
        },
    }
}

/// Like [`field_as`] but only accepts a JSON sequence, returning the raw
/// value for lenient element decoding.
fn sequence_field(obj: &Map<String, Value>, key: &str) -> Option<Value> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(value @ Value::Array(_)) => Some(value.clone()),
        Some(other) => {
            tracing::warn!(
                field = key,
                "ignoring non-sequence value (found {}) in remote payload",
                model::json_kind(other)
            );
            None
        }
    }
}
