//! Presentation state machine for one open widget overlay.
//!
//! A session is constructed per opening and discarded on close; nothing
//! survives between openings. Indexes `0..card_count` address real cards;
//! index `card_count` is the synthetic "all caught up" position appended
//! after the last active card.

/// Which face of the current position is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardView {
    Browsing(usize),
    Flipped(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSession {
    card_count: usize,
    view: CardView,
}

impl WidgetSession {
    /// Open the widget over `card_count` active cards, starting at the
    /// first card face-up.
    pub fn open(card_count: usize) -> Self {
        WidgetSession {
            card_count,
            view: CardView::Browsing(0),
        }
    }

    pub fn view(&self) -> CardView {
        self.view
    }

    pub fn index(&self) -> usize {
        match self.view {
            CardView::Browsing(index) | CardView::Flipped(index) => index,
        }
    }

    pub fn is_flipped(&self) -> bool {
        matches!(self.view, CardView::Flipped(_))
    }

    /// Whether the synthetic "all caught up" position is showing.
    pub fn is_caught_up(&self) -> bool {
        self.index() == self.card_count
    }

    /// Advance one position, clamped at the synthetic card. Navigation
    /// always lands face-up.
    pub fn next(&mut self) {
        let index = self.index();
        let target = if index < self.card_count { index + 1 } else { index };
        self.view = CardView::Browsing(target);
    }

    /// Step back one position, clamped at the first card. Navigation always
    /// lands face-up.
    pub fn prev(&mut self) {
        self.view = CardView::Browsing(self.index().saturating_sub(1));
    }

    /// Toggle the current card's face. The synthetic card has no back, so
    /// flipping there is a no-op.
    pub fn flip(&mut self) {
        match self.view {
            CardView::Browsing(index) if index < self.card_count => {
                self.view = CardView::Flipped(index);
            }
            CardView::Flipped(index) => {
                self.view = CardView::Browsing(index);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_browsing_first_card() {
        let session = WidgetSession::open(3);
        assert_eq!(session.view(), CardView::Browsing(0));
        assert!(!session.is_caught_up());
    }

    #[test]
    fn advancing_past_last_card_lands_on_caught_up_and_sticks() {
        let mut session = WidgetSession::open(2);
        session.next();
        session.next();
        assert!(session.is_caught_up());
        assert_eq!(session.index(), 2);
        session.next();
        assert_eq!(session.index(), 2);
    }

    #[test]
    fn prev_clamps_at_first_card() {
        let mut session = WidgetSession::open(2);
        session.prev();
        assert_eq!(session.view(), CardView::Browsing(0));
    }

    #[test]
    fn flip_toggles_only_on_real_cards() {
        let mut session = WidgetSession::open(1);
        session.flip();
        assert_eq!(session.view(), CardView::Flipped(0));
        session.flip();
        assert_eq!(session.view(), CardView::Browsing(0));

        session.next();
        assert!(session.is_caught_up());
        session.flip();
        assert_eq!(session.view(), CardView::Browsing(1));
    }

    #[test]
    fn navigation_unflips() {
        let mut session = WidgetSession::open(3);
        session.flip();
        session.next();
        assert_eq!(session.view(), CardView::Browsing(1));
        session.flip();
        session.prev();
        assert_eq!(session.view(), CardView::Browsing(0));
    }

    #[test]
    fn empty_roster_opens_caught_up() {
        let session = WidgetSession::open(0);
        assert!(session.is_caught_up());
        let mut session = session;
        session.next();
        assert_eq!(session.index(), 0);
        session.flip();
        assert!(!session.is_flipped());
    }
}
