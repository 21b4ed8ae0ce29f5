//! Built-in default values used when no remote or cached document exists,
//! and as the repair material for documents missing their `sections`.

use super::model::{
    CharityContent, EntertainmentKit, EntertainmentKitItem, FeatureCard, FooterData, HeaderData,
    HeroContent, NewsletterDocument, QuickLink, SectionContent, SectionInstance, SocialLink,
    SportMatch, WelcomeContent, WidgetConfig,
};

impl Default for NewsletterDocument {
    fn default() -> Self {
        NewsletterDocument {
            sections: default_sections(),
            footer: FooterData::default(),
            header: None,
            widget_enabled: false,
            widget_config: None,
            widget_cards: Vec::new(),
        }
    }
}

impl Default for FooterData {
    fn default() -> Self {
        FooterData {
            connect_label: "CONNECT".to_string(),
            social_links: vec![
                SocialLink {
                    id: "social_instagram".to_string(),
                    icon_url: String::new(),
                    url: "https://instagram.com".to_string(),
                },
                SocialLink {
                    id: "social_facebook".to_string(),
                    icon_url: String::new(),
                    url: "https://facebook.com".to_string(),
                },
            ],
            copyright_text: "© 2026 Gazette Resorts".to_string(),
        }
    }
}

impl Default for HeaderData {
    fn default() -> Self {
        HeaderData {
            logo_url: String::new(),
            link_url: "/".to_string(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            button_label: "EXCLUSIVE OFFERS".to_string(),
            button_icon_url: String::new(),
            enable_bounce: true,
        }
    }
}

/// The default section sequence: one of every block type, in the order the
/// guest view presents them.
pub fn default_sections() -> Vec<SectionInstance> {
    vec![
        SectionInstance {
            id: "sec_hero_1".to_string(),
            content: SectionContent::Hero(HeroContent {
                title: "WEEKLY".to_string(),
                subtitle: "highlights".to_string(),
                bg_image: "https://images.unsplash.com/photo-1542314831-068cd1dbfeeb?auto=format&fit=crop&q=80&w=1200".to_string(),
            }),
        },
        SectionInstance {
            id: "sec_welcome_1".to_string(),
            content: SectionContent::Welcome(WelcomeContent {
                text: "WELCOME TO THE RESORT".to_string(),
            }),
        },
        SectionInstance {
            id: "sec_ql_1".to_string(),
            content: SectionContent::QuickLinks(vec![
                QuickLink {
                    id: "ql1".to_string(),
                    label: "INTERACTIVE RESORT MAP".to_string(),
                    url: "#".to_string(),
                    image_url: "https://picsum.photos/id/10/400/300".to_string(),
                },
                QuickLink {
                    id: "ql2".to_string(),
                    label: "WELCOME LETTER".to_string(),
                    url: "#".to_string(),
                    image_url: "https://picsum.photos/id/20/400/300".to_string(),
                },
                QuickLink {
                    id: "ql3".to_string(),
                    label: "SPA MENU".to_string(),
                    url: "#".to_string(),
                    image_url: "https://picsum.photos/id/30/400/300".to_string(),
                },
            ]),
        },
        SectionInstance {
            id: "sec_fc_1".to_string(),
            content: SectionContent::FeatureCards(vec![FeatureCard {
                id: "fc1".to_string(),
                title: "101 THINGS TO DO".to_string(),
                heading: "experience the city".to_string(),
                description: "Get ready for the holiday of a lifetime with our hot list of things to do, whether you are here to soak up the sun, dive into adventure, or relax with your family.".to_string(),
                image_url: "https://images.unsplash.com/photo-1512453979798-5ea266f8880c?auto=format&fit=crop&q=80&w=800".to_string(),
                cta_url: "#".to_string(),
                cta_label: None,
            }]),
        },
        SectionInstance {
            id: "sec_ek_1".to_string(),
            content: SectionContent::EntertainmentKit(EntertainmentKit {
                banner_image_url: None,
                items: vec![
                    EntertainmentKitItem {
                        id: "ek1".to_string(),
                        label: "SPORTS CLUB".to_string(),
                        sublabel: "View and download schedule".to_string(),
                        icon_url: String::new(),
                        url: "#".to_string(),
                    },
                    EntertainmentKitItem {
                        id: "ek2".to_string(),
                        label: "KIDS CLUB".to_string(),
                        sublabel: "View and download weekly program".to_string(),
                        icon_url: String::new(),
                        url: "#".to_string(),
                    },
                    EntertainmentKitItem {
                        id: "ek3".to_string(),
                        label: "SPORTS MATCHES".to_string(),
                        sublabel: "View and download program".to_string(),
                        icon_url: String::new(),
                        url: "#".to_string(),
                    },
                    EntertainmentKitItem {
                        id: "ek4".to_string(),
                        label: "LIVE ENTERTAINMENT".to_string(),
                        sublabel: "View and download program".to_string(),
                        icon_url: String::new(),
                        url: "#".to_string(),
                    },
                ],
            }),
        },
        SectionInstance {
            id: "sec_ss_1".to_string(),
            content: SectionContent::SportsSchedule(vec![SportMatch {
                id: "s1".to_string(),
                date: "07".to_string(),
                month: "JAN".to_string(),
                team_a: "Home United".to_string(),
                team_b: "City Rovers".to_string(),
                league: "Premier League".to_string(),
                time: "20:00".to_string(),
                location: "Sports Bar".to_string(),
                logo_a: String::new(),
                logo_b: String::new(),
            }]),
        },
        SectionInstance {
            id: "sec_ch_1".to_string(),
            content: SectionContent::Charity(CharityContent {
                title: "HELP US BUILD A SCHOOL".to_string(),
                heading: "Giving Back".to_string(),
                heading_logo_url: None,
                description: "Donate at checkout or scan the QR code to support our partner charity.".to_string(),
                subtext: Some("Together, we're laying the first brick for brighter futures.".to_string()),
                image_url: "https://images.unsplash.com/photo-1488521787991-ed7bbaae773c?auto=format&fit=crop&q=80&w=800".to_string(),
                cta_label: Some("Click • Give • Change a Life".to_string()),
                cta_url: Some("#".to_string()),
                footer_text: None,
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::SectionType;

    #[test]
    fn default_document_is_structurally_complete() {
        let doc = NewsletterDocument::default();
        assert!(!doc.sections.is_empty());
        assert!(!doc.footer.copyright_text.is_empty());
        assert!(!doc.widget_enabled);
        assert!(doc.widget_cards.is_empty());
        // Resolving accessors fill the optional chrome.
        assert!(!doc.widget_config_or_default().button_label.is_empty());
        assert_eq!(doc.header_or_default().link_url, "/");
    }

    #[test]
    fn default_sections_cover_every_type_once() {
        let sections = default_sections();
        for kind in SectionType::ALL {
            assert_eq!(
                sections
                    .iter()
                    .filter(|sec| sec.content.section_type() == Some(kind))
                    .count(),
                1,
                "expected exactly one default {} section",
                kind.as_str()
            );
        }
    }
}
