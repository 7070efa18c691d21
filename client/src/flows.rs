//! Form-to-backend submit paths.
//!
//! Each flow validates locally first, so no request leaves the client
//! for input the form can reject itself, then maps the collaborator
//! outcome into a [`SubmitError`] the views can render.

use serde_json::Value;
use thiserror::Error;

use quad_common::chat::MessageDraft;
use quad_common::forms::{FormError, ListingInput, LoginInput, SignupInput};
use quad_common::identity::{Identity, RecordId};

use crate::backend::{AuthProvider, LiveStore};
use crate::error::{AuthError, StoreError};
use crate::protocol::Collection;

/// Anything a submit path can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubmitError {
    /// The plain human message. Form and auth failures are complete
    /// sentences; store failures read as a bare remedy and usually want
    /// [`action_message`](Self::action_message) instead.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Form(e) => e.to_string(),
            SubmitError::Auth(e) => e.user_message().to_owned(),
            SubmitError::Store(e) => e.user_message().to_owned(),
        }
    }

    /// Message with the failed action named, e.g.
    /// `action_message("Failed to add item.")`. Only store failures take
    /// the prefix; form and auth messages already say what went wrong.
    pub fn action_message(&self, failed_action: &str) -> String {
        match self {
            SubmitError::Store(e) => format!("{failed_action} {}", e.user_message()),
            _ => self.user_message(),
        }
    }
}

fn encode<T: serde::Serialize>(record: &T) -> Result<Value, SubmitError> {
    serde_json::to_value(record).map_err(|error| {
        tracing::error!(%error, "record failed to encode");
        SubmitError::Store(StoreError::Other)
    })
}

/// Sign an existing account in.
pub async fn submit_login<A: AuthProvider>(
    auth: &A,
    input: &LoginInput,
) -> Result<Identity, SubmitError> {
    input.validate()?;
    let identity = auth.sign_in(input.email.trim(), &input.password).await?;
    Ok(identity)
}

/// Create an account, then attach the display name to the new profile.
pub async fn submit_signup<A: AuthProvider>(
    auth: &A,
    input: &SignupInput,
) -> Result<Identity, SubmitError> {
    input.validate()?;
    let mut identity = auth.sign_up(input.email.trim(), &input.password).await?;
    auth.update_profile(input.name.trim()).await?;
    identity.display_name = Some(input.name.trim().to_owned());
    Ok(identity)
}

/// Publish a marketplace listing for the signed-in seller.
pub async fn submit_listing<S: LiveStore>(
    store: &S,
    input: &ListingInput,
    seller: &Identity,
) -> Result<RecordId, SubmitError> {
    let draft = input.validate(seller)?;
    let id = store.write(Collection::Marketplace, encode(&draft)?).await?;
    Ok(id)
}

/// Send one chat message. Blank input is a quiet no-op and reports
/// `Ok(None)` so the composer clears without complaint.
pub async fn send_message<S: LiveStore>(
    store: &S,
    input: &str,
    author: &Identity,
) -> Result<Option<RecordId>, SubmitError> {
    let Some(draft) = MessageDraft::compose(input, author) else {
        return Ok(None);
    };
    let id = store.write(Collection::Messages, encode(&draft)?).await?;
    Ok(Some(id))
}
