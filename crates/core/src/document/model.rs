use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::defaults;

/// The single root document holding all newsletter content and widget
/// configuration. Serializes to the exact wire JSON stored in the remote
/// row and mirrored in the local cache (camelCase keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterDocument {
    /// Ordered content blocks; order is display order. A document whose
    /// `sections` is missing or not a sequence is repaired with the default
    /// section sequence rather than discarded.
    #[serde(
        default = "defaults::default_sections",
        deserialize_with = "sections_or_default"
    )]
    pub sections: Vec<SectionInstance>,
    #[serde(default)]
    pub footer: FooterData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderData>,
    /// Gates whether the promotional widget ever appears.
    #[serde(default)]
    pub widget_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_config: Option<WidgetConfig>,
    #[serde(default, deserialize_with = "cards_or_empty")]
    pub widget_cards: Vec<WidgetCard>,
}

impl NewsletterDocument {
    pub fn section(&self, id: &str) -> Option<&SectionInstance> {
        self.sections.iter().find(|sec| sec.id == id)
    }

    /// Header to render: the stored one, or the built-in default.
    pub fn header_or_default(&self) -> HeaderData {
        self.header.clone().unwrap_or_default()
    }

    /// Widget chrome to render: the stored config, or the built-in default.
    pub fn widget_config_or_default(&self) -> WidgetConfig {
        self.widget_config.clone().unwrap_or_default()
    }
}

/// One positioned content block.
///
/// On the wire this is `{ "id": ..., "type": ..., "content": ... }`; the
/// `type` tag selects the shape of `content`. Unknown tags and payloads
/// that do not decode for their tag are carried as [`SectionContent::Opaque`]
/// so they render as nothing but survive a round trip untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionInstance {
    /// Opaque unique id, stable once created.
    pub id: String,
    pub content: SectionContent,
}

/// The closed set of section types an editor can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    Hero,
    Welcome,
    QuickLinks,
    FeatureCards,
    EntertainmentKit,
    SportsSchedule,
    Charity,
}

impl SectionType {
    pub const ALL: [SectionType; 7] = [
        SectionType::Hero,
        SectionType::Welcome,
        SectionType::QuickLinks,
        SectionType::FeatureCards,
        SectionType::EntertainmentKit,
        SectionType::SportsSchedule,
        SectionType::Charity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::Welcome => "welcome",
            SectionType::QuickLinks => "quickLinks",
            SectionType::FeatureCards => "featureCards",
            SectionType::EntertainmentKit => "entertainmentKit",
            SectionType::SportsSchedule => "sportsSchedule",
            SectionType::Charity => "charity",
        }
    }
}

/// Section payload, one variant per section type.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    Hero(HeroContent),
    Welcome(WelcomeContent),
    QuickLinks(Vec<QuickLink>),
    FeatureCards(Vec<FeatureCard>),
    EntertainmentKit(EntertainmentKit),
    SportsSchedule(Vec<SportMatch>),
    Charity(CharityContent),
    /// Unrecognized type tag, or content that does not decode for its tag.
    /// Preserved verbatim; renders and edits as nothing.
    Opaque { section_type: String, content: Value },
}

impl SectionContent {
    /// Decode a wire payload for the given type tag. Never fails: anything
    /// unrecognized or mis-shaped becomes [`SectionContent::Opaque`].
    pub fn decode(section_type: &str, content: Value) -> Self {
        match section_type {
            "hero" => decode_as(section_type, content, SectionContent::Hero),
            "welcome" => decode_as(section_type, content, SectionContent::Welcome),
            "quickLinks" => decode_as(section_type, content, SectionContent::QuickLinks),
            "featureCards" => decode_as(section_type, content, SectionContent::FeatureCards),
            "entertainmentKit" => decode_kit(content),
            "sportsSchedule" => decode_as(section_type, content, SectionContent::SportsSchedule),
            "charity" => decode_as(section_type, content, SectionContent::Charity),
            other => SectionContent::Opaque {
                section_type: other.to_string(),
                content,
            },
        }
    }

    /// The wire `type` tag.
    pub fn type_tag(&self) -> &str {
        match self {
            SectionContent::Hero(_) => "hero",
            SectionContent::Welcome(_) => "welcome",
            SectionContent::QuickLinks(_) => "quickLinks",
            SectionContent::FeatureCards(_) => "featureCards",
            SectionContent::EntertainmentKit(_) => "entertainmentKit",
            SectionContent::SportsSchedule(_) => "sportsSchedule",
            SectionContent::Charity(_) => "charity",
            SectionContent::Opaque { section_type, .. } => section_type,
        }
    }

    /// The section type, when the payload decoded as a known variant.
    pub fn section_type(&self) -> Option<SectionType> {
        match self {
            SectionContent::Hero(_) => Some(SectionType::Hero),
            SectionContent::Welcome(_) => Some(SectionType::Welcome),
            SectionContent::QuickLinks(_) => Some(SectionType::QuickLinks),
            SectionContent::FeatureCards(_) => Some(SectionType::FeatureCards),
            SectionContent::EntertainmentKit(_) => Some(SectionType::EntertainmentKit),
            SectionContent::SportsSchedule(_) => Some(SectionType::SportsSchedule),
            SectionContent::Charity(_) => Some(SectionType::Charity),
            SectionContent::Opaque { .. } => None,
        }
    }
}

fn decode_as<T, F>(section_type: &str, content: Value, wrap: F) -> SectionContent
where
    T: DeserializeOwned,
    F: FnOnce(T) -> SectionContent,
{
    match serde_json::from_value::<T>(content.clone()) {
        Ok(payload) => wrap(payload),
        Err(err) => {
            tracing::warn!(section_type, %err, "section content does not decode for its tag");
            SectionContent::Opaque {
                section_type: section_type.to_string(),
                content,
            }
        }
    }
}

/// `entertainmentKit` content arrives in two wire shapes: the current
/// `{ bannerImageUrl?, items }` object, or a legacy bare item sequence.
/// Both normalize to [`EntertainmentKit`] here, so nothing downstream ever
/// branches on shape again.
fn decode_kit(content: Value) -> SectionContent {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KitWire {
        Object(EntertainmentKit),
        Legacy(Vec<EntertainmentKitItem>),
    }

    match serde_json::from_value::<KitWire>(content.clone()) {
        Ok(KitWire::Object(kit)) => SectionContent::EntertainmentKit(kit),
        Ok(KitWire::Legacy(items)) => SectionContent::EntertainmentKit(EntertainmentKit {
            banner_image_url: None,
            items,
        }),
        Err(err) => {
            tracing::warn!(%err, "entertainmentKit content does not decode in either shape");
            SectionContent::Opaque {
                section_type: "entertainmentKit".to_string(),
                content,
            }
        }
    }
}

impl Serialize for SectionInstance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SectionInstance", 3)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("type", self.content.type_tag())?;
        match &self.content {
            SectionContent::Hero(c) => state.serialize_field("content", c)?,
            SectionContent::Welcome(c) => state.serialize_field("content", c)?,
            SectionContent::QuickLinks(c) => state.serialize_field("content", c)?,
            SectionContent::FeatureCards(c) => state.serialize_field("content", c)?,
            SectionContent::EntertainmentKit(c) => state.serialize_field("content", c)?,
            SectionContent::SportsSchedule(c) => state.serialize_field("content", c)?,
            SectionContent::Charity(c) => state.serialize_field("content", c)?,
            SectionContent::Opaque { content, .. } => state.serialize_field("content", content)?,
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for SectionInstance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SectionWire {
            #[serde(default)]
            id: String,
            #[serde(rename = "type", default)]
            section_type: String,
            #[serde(default)]
            content: Value,
        }

        let wire = SectionWire::deserialize(deserializer)?;
        Ok(SectionInstance {
            id: wire.id,
            content: SectionContent::decode(&wire.section_type, wire.content),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub bg_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeContent {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLink {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub cta_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
}

/// Normalized `entertainmentKit` payload. Serialization always emits this
/// object shape, never the legacy bare sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntertainmentKit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image_url: Option<String>,
    #[serde(default)]
    pub items: Vec<EntertainmentKitItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntertainmentKitItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub sublabel: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportMatch {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub team_a: String,
    #[serde(default)]
    pub team_b: String,
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub logo_a: String,
    #[serde(default)]
    pub logo_b: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharityContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_logo_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterData {
    #[serde(default)]
    pub connect_label: String,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub copyright_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderData {
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub link_url: String,
}

/// Chrome for the floating widget button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default)]
    pub button_label: String,
    #[serde(default)]
    pub button_icon_url: String,
    #[serde(default)]
    pub enable_bounce: bool,
}

/// A time-boxed promotional entry shown in the floating overlay.
///
/// Expired cards are never deleted automatically; they stay in the document
/// and are merely excluded from the active set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetCard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Manual override, independent of the time window.
    #[serde(default)]
    pub is_active: bool,
}

fn sections_or_default<'de, D>(deserializer: D) -> Result<Vec<SectionInstance>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(sections_from_value(Value::deserialize(deserializer)?))
}

/// Lenient `sections` decode: a non-sequence value is repaired with the
/// default section sequence; non-object elements are skipped.
pub(crate) fn sections_from_value(value: Value) -> Vec<SectionInstance> {
    match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<SectionInstance>(entry) {
                Ok(section) => Some(section),
                Err(err) => {
                    tracing::warn!(%err, "skipping malformed section entry");
                    None
                }
            })
            .collect(),
        other => {
            tracing::warn!(
                "`sections` is not a sequence (found {}), substituting defaults",
                json_kind(&other)
            );
            defaults::default_sections()
        }
    }
}

fn cards_or_empty<'de, D>(deserializer: D) -> Result<Vec<WidgetCard>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(cards_from_value(Value::deserialize(deserializer)?))
}

/// Lenient `widgetCards` decode: malformed entries are dropped rather than
/// poisoning the whole document.
pub(crate) fn cards_from_value(value: Value) -> Vec<WidgetCard> {
    match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<WidgetCard>(entry) {
                Ok(card) => Some(card),
                Err(err) => {
                    tracing::warn!(%err, "skipping malformed widget card");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(
                "`widgetCards` is not a sequence (found {}), treating as empty",
                json_kind(&other)
            );
            Vec::new()
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_round_trips_with_type_tag() {
        let wire = json!({
            "id": "sec_hero_1",
            "type": "hero",
            "content": { "title": "WEEKLY", "subtitle": "highlights", "bgImage": "x.jpg" }
        });
        let section: SectionInstance = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(section.content.section_type(), Some(SectionType::Hero));
        assert_eq!(serde_json::to_value(&section).unwrap(), wire);
    }

    #[test]
    fn unknown_type_is_preserved_opaque() {
        let wire = json!({
            "id": "sec_x_1",
            "type": "videoWall",
            "content": { "anything": [1, 2, 3] }
        });
        let section: SectionInstance = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(section.content.section_type(), None);
        assert_eq!(section.content.type_tag(), "videoWall");
        assert_eq!(serde_json::to_value(&section).unwrap(), wire);
    }

    #[test]
    fn malformed_content_for_known_type_degrades_to_opaque() {
        let wire = json!({ "id": "sec_hero_2", "type": "hero", "content": 42 });
        let section: SectionInstance = serde_json::from_value(wire.clone()).unwrap();
        assert!(matches!(section.content, SectionContent::Opaque { .. }));
        assert_eq!(serde_json::to_value(&section).unwrap(), wire);
    }

    #[test]
    fn legacy_kit_sequence_normalizes_to_object() {
        let wire = json!({
            "id": "sec_ek_1",
            "type": "entertainmentKit",
            "content": [
                { "id": "ek1", "label": "KIDS CLUB", "sublabel": "Weekly program", "iconUrl": "", "url": "#" }
            ]
        });
        let section: SectionInstance = serde_json::from_value(wire).unwrap();
        let SectionContent::EntertainmentKit(kit) = &section.content else {
            panic!("expected kit content");
        };
        assert_eq!(kit.banner_image_url, None);
        assert_eq!(kit.items.len(), 1);

        let out = serde_json::to_value(&section).unwrap();
        assert!(out["content"].is_object());
        assert_eq!(out["content"]["items"][0]["label"], "KIDS CLUB");
        assert!(out["content"].get("bannerImageUrl").is_none());
    }

    #[test]
    fn document_without_sections_is_repaired_with_defaults() {
        let doc: NewsletterDocument = serde_json::from_value(json!({ "footer": {} })).unwrap();
        assert!(!doc.sections.is_empty());
        assert_eq!(doc.sections, defaults::default_sections());
    }

    #[test]
    fn non_sequence_sections_is_repaired_not_discarded() {
        let doc: NewsletterDocument =
            serde_json::from_value(json!({ "sections": "oops", "widgetEnabled": true })).unwrap();
        assert_eq!(doc.sections, defaults::default_sections());
        assert!(doc.widget_enabled);
    }

    #[test]
    fn malformed_widget_card_is_skipped() {
        let doc: NewsletterDocument = serde_json::from_value(json!({
            "sections": [],
            "widgetCards": [
                { "id": "w1", "title": "Spa", "subtitle": "", "description": "",
                  "imageUrl": "", "startTime": "2026-01-01T00:00:00Z",
                  "endTime": "2026-02-01T00:00:00Z", "isActive": true },
                { "id": "w2", "startTime": "not a date" }
            ]
        }))
        .unwrap();
        assert_eq!(doc.widget_cards.len(), 1);
        assert_eq!(doc.widget_cards[0].id, "w1");
    }
}
