//! The admin editor's working copy.
//!
//! A draft wraps its own document; nothing here touches the committed copy
//! the sync engine holds. Saving is the caller's concern: hand
//! [`EditorDraft::into_document`] to the engine's `commit`.
//!
//! Operations are silent no-ops when their target does not exist (unknown
//! section id, out-of-range index, boundary move), matching the guest-safe
//! posture of the rest of the document pipeline.

use chrono::{DateTime, Utc};

use super::templates;
use crate::document::model::{
    EntertainmentKitItem, FeatureCard, FooterData, HeaderData, NewsletterDocument, QuickLink,
    SectionContent, SectionInstance, SectionType, SportMatch, WidgetCard, WidgetConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct EditorDraft {
    doc: NewsletterDocument,
}

impl EditorDraft {
    /// Start a draft from the committed document.
    pub fn new(doc: NewsletterDocument) -> Self {
        EditorDraft { doc }
    }

    pub fn document(&self) -> &NewsletterDocument {
        &self.doc
    }

    /// Consume the draft for handoff to the sync engine's commit.
    pub fn into_document(self) -> NewsletterDocument {
        self.doc
    }

    /// Replace one section's content wholesale. No-op on unknown id.
    pub fn update_section_content(&mut self, id: &str, content: SectionContent) {
        if let Some(section) = self.doc.sections.iter_mut().find(|sec| sec.id == id) {
            section.content = content;
        }
    }

    /// Swap a section with its neighbor. No-op at either boundary or for an
    /// out-of-range index.
    pub fn move_section(&mut self, index: usize, direction: MoveDirection) {
        let len = self.doc.sections.len();
        if index >= len {
            return;
        }
        match direction {
            MoveDirection::Up if index > 0 => self.doc.sections.swap(index, index - 1),
            MoveDirection::Down if index + 1 < len => self.doc.sections.swap(index, index + 1),
            _ => {}
        }
    }

    pub fn remove_section(&mut self, id: &str) {
        self.doc.sections.retain(|sec| sec.id != id);
    }

    /// Append a new section with template content; returns the fresh id.
    pub fn add_section(&mut self, kind: SectionType) -> String {
        let id = templates::new_section_id(kind);
        self.doc.sections.push(SectionInstance {
            id: id.clone(),
            content: templates::section_template(kind),
        });
        id
    }

    /// Append a template item to a list-valued section. Returns the new
    /// item's id, or `None` when the section is missing or not list-valued.
    pub fn add_item(&mut self, section_id: &str) -> Option<String> {
        match self.section_content_mut(section_id)? {
            SectionContent::QuickLinks(list) => {
                let item = templates::quick_link_template();
                let id = item.id.clone();
                list.push(item);
                Some(id)
            }
            SectionContent::FeatureCards(list) => {
                let item = templates::feature_card_template();
                let id = item.id.clone();
                list.push(item);
                Some(id)
            }
            SectionContent::SportsSchedule(list) => {
                let item = templates::sport_match_template();
                let id = item.id.clone();
                list.push(item);
                Some(id)
            }
            SectionContent::EntertainmentKit(kit) => {
                let item = templates::kit_item_template();
                let id = item.id.clone();
                kit.items.push(item);
                Some(id)
            }
            _ => None,
        }
    }

    /// Remove a list item by its id. No-op when the section is missing, not
    /// list-valued, or does not contain the item.
    pub fn remove_item(&mut self, section_id: &str, item_id: &str) {
        let Some(content) = self.section_content_mut(section_id) else {
            return;
        };
        match content {
            SectionContent::QuickLinks(list) => list.retain(|item| item.id != item_id),
            SectionContent::FeatureCards(list) => list.retain(|item| item.id != item_id),
            SectionContent::SportsSchedule(list) => list.retain(|item| item.id != item_id),
            SectionContent::EntertainmentKit(kit) => kit.items.retain(|item| item.id != item_id),
            _ => {}
        }
    }

    /// Field-level access to a quick link by its current position.
    pub fn quick_link_mut(&mut self, section_id: &str, index: usize) -> Option<&mut QuickLink> {
        match self.section_content_mut(section_id)? {
            SectionContent::QuickLinks(list) => list.get_mut(index),
            _ => None,
        }
    }

    pub fn feature_card_mut(&mut self, section_id: &str, index: usize) -> Option<&mut FeatureCard> {
        match self.section_content_mut(section_id)? {
            SectionContent::FeatureCards(list) => list.get_mut(index),
            _ => None,
        }
    }

    pub fn sport_match_mut(&mut self, section_id: &str, index: usize) -> Option<&mut SportMatch> {
        match self.section_content_mut(section_id)? {
            SectionContent::SportsSchedule(list) => list.get_mut(index),
            _ => None,
        }
    }

    pub fn kit_item_mut(
        &mut self,
        section_id: &str,
        index: usize,
    ) -> Option<&mut EntertainmentKitItem> {
        match self.section_content_mut(section_id)? {
            SectionContent::EntertainmentKit(kit) => kit.items.get_mut(index),
            _ => None,
        }
    }

    /// Set or clear the entertainment kit banner image.
    pub fn set_kit_banner(&mut self, section_id: &str, banner_image_url: Option<String>) {
        if let Some(SectionContent::EntertainmentKit(kit)) = self.section_content_mut(section_id) {
            kit.banner_image_url = banner_image_url;
        }
    }

    /// Append a new promotional card windowed from `now` to `now + 30 days`.
    pub fn add_widget_card(&mut self, now: DateTime<Utc>) -> String {
        let card = templates::widget_card_template(now);
        let id = card.id.clone();
        self.doc.widget_cards.push(card);
        id
    }

    /// Field-level access to a widget card by its current position.
    pub fn widget_card_mut(&mut self, index: usize) -> Option<&mut WidgetCard> {
        self.doc.widget_cards.get_mut(index)
    }

    pub fn remove_widget_card(&mut self, id: &str) {
        self.doc.widget_cards.retain(|card| card.id != id);
    }

    pub fn set_widget_enabled(&mut self, enabled: bool) {
        self.doc.widget_enabled = enabled;
    }

    pub fn set_widget_config(&mut self, config: WidgetConfig) {
        self.doc.widget_config = Some(config);
    }

    pub fn set_footer(&mut self, footer: FooterData) {
        self.doc.footer = footer;
    }

    pub fn set_header(&mut self, header: Option<HeaderData>) {
        self.doc.header = header;
    }

    fn section_content_mut(&mut self, id: &str) -> Option<&mut SectionContent> {
        self.doc
            .sections
            .iter_mut()
            .find(|sec| sec.id == id)
            .map(|sec| &mut sec.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> EditorDraft {
        EditorDraft::new(NewsletterDocument::default())
    }

    #[test]
    fn add_then_remove_round_trips_for_every_type() {
        for kind in SectionType::ALL {
            let mut draft = draft();
            let before = draft.document().sections.clone();
            let id = draft.add_section(kind);
            assert_eq!(draft.document().sections.len(), before.len() + 1);
            draft.remove_section(&id);
            assert_eq!(draft.document().sections, before);
        }
    }

    #[test]
    fn move_up_then_down_is_an_inverse_pair() {
        let mut draft = draft();
        let before = draft.document().sections.clone();
        draft.move_section(1, MoveDirection::Up);
        assert_ne!(draft.document().sections, before);
        draft.move_section(0, MoveDirection::Down);
        assert_eq!(draft.document().sections, before);
    }

    #[test]
    fn moves_at_boundaries_are_no_ops() {
        let mut draft = draft();
        let before = draft.document().sections.clone();
        let last = before.len() - 1;
        draft.move_section(0, MoveDirection::Up);
        draft.move_section(last, MoveDirection::Down);
        draft.move_section(before.len() + 5, MoveDirection::Up);
        assert_eq!(draft.document().sections, before);
    }

    #[test]
    fn update_unknown_section_is_a_no_op() {
        let mut draft = draft();
        let before = draft.document().clone();
        draft.update_section_content(
            "sec_missing",
            SectionContent::Welcome(crate::document::model::WelcomeContent {
                text: "x".to_string(),
            }),
        );
        assert_eq!(draft.document(), &before);
    }

    #[test]
    fn list_item_add_edit_remove() {
        let mut draft = draft();
        let item_id = draft.add_item("sec_ql_1").expect("quick links accept items");
        let count = match &draft.document().section("sec_ql_1").unwrap().content {
            SectionContent::QuickLinks(list) => list.len(),
            other => panic!("unexpected content: {other:?}"),
        };

        let link = draft.quick_link_mut("sec_ql_1", count - 1).unwrap();
        assert_eq!(link.id, item_id);
        link.label = "LATE CHECKOUT".to_string();

        draft.remove_item("sec_ql_1", &item_id);
        let after = match &draft.document().section("sec_ql_1").unwrap().content {
            SectionContent::QuickLinks(list) => list.len(),
            other => panic!("unexpected content: {other:?}"),
        };
        assert_eq!(after, count - 1);
    }

    #[test]
    fn add_item_on_scalar_section_is_refused() {
        let mut draft = draft();
        assert_eq!(draft.add_item("sec_hero_1"), None);
        assert_eq!(draft.add_item("sec_missing"), None);
    }

    #[test]
    fn legacy_kit_reads_back_as_object_after_an_item_edit() {
        let doc: NewsletterDocument = serde_json::from_value(json!({
            "sections": [{
                "id": "sec_ek_9",
                "type": "entertainmentKit",
                "content": [
                    { "id": "ek1", "label": "OLD LABEL", "sublabel": "s", "iconUrl": "", "url": "#" }
                ]
            }]
        }))
        .unwrap();

        let mut draft = EditorDraft::new(doc);
        draft.kit_item_mut("sec_ek_9", 0).unwrap().label = "NEW LABEL".to_string();

        let out = serde_json::to_value(draft.document()).unwrap();
        let content = &out["sections"][0]["content"];
        assert!(content.is_object());
        assert_eq!(content["items"][0]["label"], "NEW LABEL");
        assert!(content.get("bannerImageUrl").is_none());
    }

    #[test]
    fn edits_by_position_follow_the_current_order() {
        let mut draft = draft();
        let fc_id = draft.add_section(SectionType::FeatureCards);
        draft.add_item(&fc_id);
        draft.feature_card_mut(&fc_id, 1).unwrap().heading = "second".to_string();
        assert_eq!(draft.feature_card_mut(&fc_id, 1).unwrap().heading, "second");
        assert_ne!(draft.feature_card_mut(&fc_id, 0).unwrap().heading, "second");

        let ss_id = draft.add_section(SectionType::SportsSchedule);
        draft.sport_match_mut(&ss_id, 0).unwrap().team_a = "Harbor FC".to_string();
        assert!(draft.sport_match_mut(&ss_id, 9).is_none());
    }

    #[test]
    fn kit_banner_can_be_set_and_cleared() {
        let mut draft = draft();
        draft.set_kit_banner("sec_ek_1", Some("banner.jpg".to_string()));
        let SectionContent::EntertainmentKit(kit) =
            &draft.document().section("sec_ek_1").unwrap().content
        else {
            panic!("expected kit content");
        };
        assert_eq!(kit.banner_image_url.as_deref(), Some("banner.jpg"));

        draft.set_kit_banner("sec_ek_1", None);
        let SectionContent::EntertainmentKit(kit) =
            &draft.document().section("sec_ek_1").unwrap().content
        else {
            panic!("expected kit content");
        };
        assert_eq!(kit.banner_image_url, None);
    }

    #[test]
    fn document_level_setters() {
        let mut draft = draft();
        draft.set_widget_enabled(true);
        draft.set_widget_config(WidgetConfig {
            button_label: "TONIGHT".to_string(),
            button_icon_url: String::new(),
            enable_bounce: false,
        });
        draft.set_header(Some(HeaderData {
            logo_url: "logo.svg".to_string(),
            link_url: "/home".to_string(),
        }));
        let mut footer = FooterData::default();
        footer.connect_label = "FOLLOW US".to_string();
        draft.set_footer(footer);

        let doc = draft.into_document();
        assert!(doc.widget_enabled);
        assert_eq!(doc.widget_config.unwrap().button_label, "TONIGHT");
        assert_eq!(doc.header.unwrap().logo_url, "logo.svg");
        assert_eq!(doc.footer.connect_label, "FOLLOW US");
    }

    #[test]
    fn widget_card_lifecycle() {
        let mut draft = draft();
        let now = Utc::now();
        let id = draft.add_widget_card(now);

        let card = draft.widget_card_mut(0).unwrap();
        assert_eq!(card.id, id);
        assert_eq!(card.start_time, now);
        assert_eq!(card.end_time, now + chrono::Duration::days(30));
        assert!(card.is_active);
        card.title = "SPA WEEK".to_string();

        draft.remove_widget_card(&id);
        assert!(draft.document().widget_cards.is_empty());
    }
}
