use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{RecordId, UserId};

/// Marketplace category. Unknown wire values land in `Other` so a stale
/// client never drops a listing it cannot classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingCategory {
    Books,
    Electronics,
    Clothing,
    Furniture,
    Sports,
    #[serde(other)]
    Other,
}

impl ListingCategory {
    pub fn all() -> &'static [ListingCategory] {
        &[
            ListingCategory::Books,
            ListingCategory::Electronics,
            ListingCategory::Clothing,
            ListingCategory::Furniture,
            ListingCategory::Sports,
            ListingCategory::Other,
        ]
    }

    /// Emoji shown as the card image.
    pub fn emoji(self) -> &'static str {
        match self {
            ListingCategory::Books => "📚",
            ListingCategory::Electronics => "💻",
            ListingCategory::Clothing => "👕",
            ListingCategory::Furniture => "🪑",
            ListingCategory::Sports => "⚽",
            ListingCategory::Other => "📦",
        }
    }

    /// Wire token; also the category badge text on cards.
    pub fn token(self) -> &'static str {
        match self {
            ListingCategory::Books => "books",
            ListingCategory::Electronics => "electronics",
            ListingCategory::Clothing => "clothing",
            ListingCategory::Furniture => "furniture",
            ListingCategory::Sports => "sports",
            ListingCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingCategory::Books => "Books",
            ListingCategory::Electronics => "Electronics",
            ListingCategory::Clothing => "Clothing",
            ListingCategory::Furniture => "Furniture",
            ListingCategory::Sports => "Sports",
            ListingCategory::Other => "Other",
        }
    }
}

/// Listing lifecycle. Only `Active` listings are rendered; anything else
/// stays cached but hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    #[serde(other)]
    Other,
}

/// A marketplace listing as stored on the shared board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(default)]
    pub id: RecordId,
    pub title: String,
    /// Non-negative; the add-item form additionally requires it positive.
    pub price: f64,
    pub category: ListingCategory,
    pub description: String,
    pub contact: String,
    pub seller_id: UserId,
    pub seller_email: String,
    #[serde(default)]
    pub seller_name: Option<String>,
    /// Assigned by the store; `None` until the write round-trips.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ListingStatus,
}

impl Listing {
    pub fn is_own(&self, session: &UserId) -> bool {
        &self.seller_id == session
    }

    /// Seller label on cards: chosen name, else the email local part.
    pub fn seller_display(&self) -> &str {
        match self.seller_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self
                .seller_email
                .split('@')
                .next()
                .unwrap_or(&self.seller_email),
        }
    }
}

/// Client-composed listing; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingDraft {
    pub title: String,
    pub price: f64,
    pub category: ListingCategory,
    pub description: String,
    pub contact: String,
    pub seller_id: UserId,
    pub seller_email: String,
    pub seller_name: Option<String>,
    pub status: ListingStatus,
}

/// Marketplace filter selection. Filtering is a client-side recompute
/// over the cached snapshot and never touches the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingFilter {
    #[default]
    All,
    Category(ListingCategory),
}

impl ListingFilter {
    /// Whether a listing belongs to the visible set under this filter.
    pub fn admits(self, listing: &Listing) -> bool {
        listing.status == ListingStatus::Active
            && match self {
                ListingFilter::All => true,
                ListingFilter::Category(c) => listing.category == c,
            }
    }

    pub fn label(self) -> &'static str {
        match self {
            ListingFilter::All => "All Categories",
            ListingFilter::Category(c) => c.label(),
        }
    }

    /// Every filter choice in dropdown order.
    pub fn options() -> Vec<ListingFilter> {
        let mut options = vec![ListingFilter::All];
        options.extend(
            ListingCategory::all()
                .iter()
                .map(|c| ListingFilter::Category(*c)),
        );
        options
    }
}

/// Placeholder for an empty card grid. The wording distinguishes an
/// empty board from an empty category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyBoard {
    pub heading: &'static str,
    pub body: &'static str,
}

/// Client-local cache of the last board snapshot plus the active filter.
///
/// Snapshots replace the cache wholesale; a filter change only recomputes
/// the visible set.
#[derive(Debug, Clone, Default)]
pub struct ListingBoard {
    listings: Vec<Listing>,
    filter: ListingFilter,
}

impl ListingBoard {
    /// Replace the cached snapshot, keeping store order.
    pub fn replace(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
    }

    pub fn set_filter(&mut self, filter: ListingFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> ListingFilter {
        self.filter
    }

    /// The full cached snapshot, unfiltered.
    pub fn cached(&self) -> &[Listing] {
        &self.listings
    }

    /// Exactly the active listings admitted by the filter, in snapshot
    /// order.
    pub fn visible(&self) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| self.filter.admits(l))
            .collect()
    }

    pub fn empty_state(&self) -> EmptyBoard {
        match self.filter {
            ListingFilter::All => EmptyBoard {
                heading: "No items yet!",
                body: "Be the first to list an item for sale in your campus community.",
            },
            ListingFilter::Category(_) => EmptyBoard {
                heading: "No items in this category!",
                body: "Try browsing other categories or be the first to add an item here.",
            },
        }
    }
}

/// Rupee price with en-IN digit grouping (last group of three, then
/// pairs). Two decimals appear only for fractional amounts.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 2);
    for (i, d) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
        grouped.push(d);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}₹{grouped}")
    } else {
        format!("{sign}₹{grouped}.{frac:02}")
    }
}

/// Everything a marketplace card (and the detail overlay) needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: RecordId,
    pub emoji: &'static str,
    pub category_badge: &'static str,
    pub title: String,
    pub price_label: String,
    pub description: String,
    pub seller_label: String,
    pub date_label: String,
    pub contact: String,
    pub own: bool,
}

impl CardView {
    /// Project a listing for display. `session` is absent only on a
    /// signed-out render, where nothing counts as own.
    pub fn project(listing: &Listing, session: Option<&UserId>) -> CardView {
        let own = session.is_some_and(|uid| listing.is_own(uid));
        CardView {
            id: listing.id.clone(),
            emoji: listing.category.emoji(),
            category_badge: listing.category.token(),
            title: listing.title.clone(),
            price_label: format_price(listing.price),
            description: listing.description.clone(),
            seller_label: if own {
                "By You".to_owned()
            } else {
                format!("By {}", listing.seller_display())
            },
            date_label: match listing.timestamp {
                Some(ts) => ts.format("%-d %b %Y").to_string(),
                None => "Recently".to_owned(),
            },
            contact: listing.contact.clone(),
            own,
        }
    }

    /// Card footer hint next to the price.
    pub fn contact_hint(&self) -> &'static str {
        if self.own {
            "Your listing"
        } else {
            "Click to contact"
        }
    }
}
