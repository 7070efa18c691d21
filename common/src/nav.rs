use crate::listing::Listing;

/// Dashboard content sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Chat,
    Marketplace,
}

/// Which auth form is visible while signed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

/// At most one overlay is open at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Overlay {
    #[default]
    None,
    AddListing,
    Detail(Listing),
}

/// Cosmetic dashboard state: active section, open overlay, mobile menu.
/// Every transition is synchronous and idempotent; none of them touch
/// the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardNav {
    pub section: Section,
    pub overlay: Overlay,
    pub menu_open: bool,
}

impl DashboardNav {
    /// Switch the visible section; always closes the mobile menu.
    pub fn show_section(&mut self, section: Section) {
        self.section = section;
        self.menu_open = false;
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn open_add_listing(&mut self) {
        self.overlay = Overlay::AddListing;
    }

    pub fn open_detail(&mut self, listing: Listing) {
        self.overlay = Overlay::Detail(listing);
    }

    /// Close whatever overlay is open. Safe when none is.
    pub fn close_overlay(&mut self) {
        self.overlay = Overlay::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{RecordId, UserId};
    use crate::listing::{ListingCategory, ListingStatus};

    fn sample_listing() -> Listing {
        Listing {
            id: RecordId("a".into()),
            title: "desk lamp".into(),
            price: 150.0,
            category: ListingCategory::Furniture,
            description: "warm light".into(),
            contact: "room 3".into(),
            seller_id: UserId("u2".into()),
            seller_email: "sam@campus.edu".into(),
            seller_name: None,
            timestamp: None,
            status: ListingStatus::Active,
        }
    }

    #[test]
    fn section_switch_closes_mobile_menu() {
        let mut nav = DashboardNav::default();
        nav.toggle_menu();
        assert!(nav.menu_open);

        nav.show_section(Section::Marketplace);
        assert_eq!(nav.section, Section::Marketplace);
        assert!(!nav.menu_open);
    }

    #[test]
    fn section_switch_is_idempotent() {
        let mut nav = DashboardNav::default();
        nav.show_section(Section::Marketplace);
        let snapshot = nav.clone();
        nav.show_section(Section::Marketplace);
        assert_eq!(nav, snapshot);
    }

    #[test]
    fn one_overlay_at_a_time() {
        let mut nav = DashboardNav::default();
        nav.open_add_listing();
        assert_eq!(nav.overlay, Overlay::AddListing);

        nav.open_detail(sample_listing());
        assert!(matches!(nav.overlay, Overlay::Detail(_)));

        nav.close_overlay();
        assert_eq!(nav.overlay, Overlay::None);
        nav.close_overlay();
        assert_eq!(nav.overlay, Overlay::None);
    }
}
