use thiserror::Error;

use crate::identity::Identity;
use crate::listing::{ListingCategory, ListingDraft, ListingStatus};

/// Local validation failures, reported before any collaborator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingFields,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

/// Raw login form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    /// Both fields present. Credential checks belong to the provider.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(())
    }
}

/// Raw signup form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl SignupInput {
    /// All fields present and passwords matching. A mismatch must never
    /// reach the provider.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm.is_empty()
        {
            return Err(FormError::MissingFields);
        }
        if self.password != self.confirm {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Raw add-item form fields (price still text).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingInput {
    pub title: String,
    pub price: String,
    pub category: Option<ListingCategory>,
    pub description: String,
    pub contact: String,
}

impl ListingInput {
    /// All five fields present and the price a finite positive number.
    pub fn validate(&self, seller: &Identity) -> Result<ListingDraft, FormError> {
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or(FormError::MissingFields)?;
        let category = self.category.ok_or(FormError::MissingFields)?;
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.contact.trim().is_empty()
        {
            return Err(FormError::MissingFields);
        }
        Ok(ListingDraft {
            title: self.title.trim().to_owned(),
            price,
            category,
            description: self.description.trim().to_owned(),
            contact: self.contact.trim().to_owned(),
            seller_id: seller.uid.clone(),
            seller_email: seller.email.clone(),
            seller_name: Some(seller.display_label().to_owned()),
            status: ListingStatus::Active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserId;

    fn seller() -> Identity {
        Identity {
            uid: UserId("u1".into()),
            email: "pat@campus.edu".into(),
            display_name: Some("Pat".into()),
        }
    }

    fn filled_listing() -> ListingInput {
        ListingInput {
            title: "Physics textbook".into(),
            price: "450".into(),
            category: Some(ListingCategory::Books),
            description: "Barely used".into(),
            contact: "room 12".into(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let missing = LoginInput {
            email: "pat@campus.edu".into(),
            password: String::new(),
        };
        assert_eq!(missing.validate(), Err(FormError::MissingFields));

        let ok = LoginInput {
            email: "pat@campus.edu".into(),
            password: "secret".into(),
        };
        assert_eq!(ok.validate(), Ok(()));
    }

    #[test]
    fn signup_rejects_password_mismatch() {
        let input = SignupInput {
            name: "Pat".into(),
            email: "pat@campus.edu".into(),
            password: "secret1".into(),
            confirm: "secret2".into(),
        };
        assert_eq!(input.validate(), Err(FormError::PasswordMismatch));
    }

    #[test]
    fn signup_missing_fields_win_over_mismatch() {
        let input = SignupInput {
            name: String::new(),
            email: "pat@campus.edu".into(),
            password: "a".into(),
            confirm: "b".into(),
        };
        assert_eq!(input.validate(), Err(FormError::MissingFields));
    }

    #[test]
    fn listing_rejects_non_positive_or_unparseable_price() {
        for bad in ["", "abc", "0", "-5", "NaN"] {
            let mut input = filled_listing();
            input.price = bad.into();
            assert_eq!(
                input.validate(&seller()).unwrap_err(),
                FormError::MissingFields,
                "price {bad:?} must be rejected"
            );
        }
    }

    #[test]
    fn listing_requires_a_category() {
        let mut input = filled_listing();
        input.category = None;
        assert_eq!(input.validate(&seller()), Err(FormError::MissingFields));
    }

    #[test]
    fn valid_listing_builds_an_active_draft() {
        let draft = filled_listing().validate(&seller()).unwrap();
        assert_eq!(draft.title, "Physics textbook");
        assert_eq!(draft.price, 450.0);
        assert_eq!(draft.status, ListingStatus::Active);
        assert_eq!(draft.seller_id, UserId("u1".into()));
        assert_eq!(draft.seller_email, "pat@campus.edu");
        assert_eq!(draft.seller_name.as_deref(), Some("Pat"));
    }

    #[test]
    fn listing_trims_text_fields() {
        let mut input = filled_listing();
        input.title = "  Physics textbook  ".into();
        input.contact = " room 12 ".into();
        let draft = input.validate(&seller()).unwrap();
        assert_eq!(draft.title, "Physics textbook");
        assert_eq!(draft.contact, "room 12");
    }
}
