//! Template content for freshly added sections, list items, and widget
//! cards. Every template carries a freshly generated id.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::document::model::{
    CharityContent, EntertainmentKit, EntertainmentKitItem, FeatureCard, HeroContent, QuickLink,
    SectionContent, SectionType, SportMatch, WelcomeContent, WidgetCard,
};

pub fn new_section_id(kind: SectionType) -> String {
    format!("sec_{}_{}", kind.as_str(), Uuid::new_v4().simple())
}

pub fn new_item_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Default content for a newly added section of the given type.
pub fn section_template(kind: SectionType) -> SectionContent {
    match kind {
        SectionType::Hero => SectionContent::Hero(HeroContent {
            title: "NEW".to_string(),
            subtitle: "highlights".to_string(),
            bg_image: "https://picsum.photos/1200/600".to_string(),
        }),
        SectionType::Welcome => SectionContent::Welcome(WelcomeContent {
            text: "WELCOME TO THE RESORT".to_string(),
        }),
        SectionType::QuickLinks => SectionContent::QuickLinks(vec![quick_link_template()]),
        SectionType::FeatureCards => SectionContent::FeatureCards(vec![feature_card_template()]),
        SectionType::EntertainmentKit => SectionContent::EntertainmentKit(EntertainmentKit {
            banner_image_url: None,
            items: vec![kit_item_template()],
        }),
        SectionType::SportsSchedule => SectionContent::SportsSchedule(vec![sport_match_template()]),
        SectionType::Charity => SectionContent::Charity(CharityContent {
            title: "CHARITY".to_string(),
            heading: "Org".to_string(),
            heading_logo_url: None,
            description: "Desc".to_string(),
            subtext: Some("Sub".to_string()),
            image_url: "https://picsum.photos/800/600".to_string(),
            cta_label: Some("Action".to_string()),
            cta_url: Some("#".to_string()),
            footer_text: Some("Info".to_string()),
        }),
    }
}

pub fn quick_link_template() -> QuickLink {
    QuickLink {
        id: new_item_id(),
        label: "NEW LINK".to_string(),
        url: "#".to_string(),
        image_url: "https://picsum.photos/400/300".to_string(),
    }
}

pub fn feature_card_template() -> FeatureCard {
    FeatureCard {
        id: new_item_id(),
        title: "TITLE".to_string(),
        heading: "Heading".to_string(),
        description: "Desc".to_string(),
        image_url: "https://picsum.photos/800/600".to_string(),
        cta_url: "#".to_string(),
        cta_label: None,
    }
}

pub fn kit_item_template() -> EntertainmentKitItem {
    EntertainmentKitItem {
        id: new_item_id(),
        label: "NEW KIT".to_string(),
        sublabel: "Subtext".to_string(),
        icon_url: String::new(),
        url: "#".to_string(),
    }
}

pub fn sport_match_template() -> SportMatch {
    SportMatch {
        id: new_item_id(),
        date: "07".to_string(),
        month: "JAN".to_string(),
        team_a: "Team A".to_string(),
        team_b: "Team B".to_string(),
        league: "Premier League".to_string(),
        time: "20:00".to_string(),
        location: "Sports Bar".to_string(),
        logo_a: String::new(),
        logo_b: String::new(),
    }
}

/// A new promotional card: window opens now and closes 30 days out.
pub fn widget_card_template(now: DateTime<Utc>) -> WidgetCard {
    WidgetCard {
        id: format!("card_{}", Uuid::new_v4().simple()),
        title: "NEW OFFER".to_string(),
        subtitle: String::new(),
        description: String::new(),
        image_url: "https://picsum.photos/600/400".to_string(),
        cta_url: None,
        cta_label: None,
        start_time: now,
        end_time: now + Duration::days(30),
        is_active: true,
    }
}
