use serde::{Deserialize, Serialize};

/// Stable user identifier issued by the auth provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier the store assigns to a stored document.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

/// The authenticated user's session identity.
///
/// Created and destroyed by the auth provider; the display name is the only
/// field the client ever writes (via a profile update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: UserId,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Identity {
    /// Name shown in the header: the chosen display name, or the email
    /// local part when none is set.
    pub fn display_label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }

    /// Header badge initials: first letter of up to two words, uppercased.
    pub fn initials(&self) -> String {
        self.display_label()
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: &str, name: Option<&str>) -> Identity {
        Identity {
            uid: UserId("u1".into()),
            email: email.into(),
            display_name: name.map(String::from),
        }
    }

    #[test]
    fn label_prefers_display_name() {
        assert_eq!(
            identity("pat@campus.edu", Some("Pat Kumar")).display_label(),
            "Pat Kumar"
        );
    }

    #[test]
    fn label_falls_back_to_email_local_part() {
        assert_eq!(identity("pat@campus.edu", None).display_label(), "pat");
        assert_eq!(identity("pat@campus.edu", Some("")).display_label(), "pat");
    }

    #[test]
    fn initials_take_at_most_two_words() {
        assert_eq!(identity("x@y.z", Some("Pat Kumar Rao")).initials(), "PK");
        assert_eq!(identity("x@y.z", Some("pat")).initials(), "P");
        assert_eq!(identity("pat@campus.edu", None).initials(), "P");
    }

    #[test]
    fn wire_fields_are_camel_case() {
        let json = serde_json::to_value(identity("pat@campus.edu", Some("Pat"))).unwrap();
        assert_eq!(json["uid"], "u1");
        assert_eq!(json["displayName"], "Pat");
    }
}
