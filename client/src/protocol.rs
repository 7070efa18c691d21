use serde::{Deserialize, Serialize};
use serde_json::Value;

use quad_common::chat::ChatMessage;
use quad_common::identity::{Identity, RecordId};
use quad_common::listing::Listing;

use crate::error::{AuthError, StoreError};

/// The two live collections this client consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Messages,
    Marketplace,
}

/// Snapshot ordering by server-assigned creation timestamp. Records
/// whose timestamp is still pending sort as newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotOrder {
    TimestampAsc,
    TimestampDesc,
}

/// One stored document: store-assigned id plus raw fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: RecordId,
    pub data: Value,
}

/// A full ordered replacement of one collection, delivered to
/// subscription callbacks on every change. Never a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub collection: Collection,
    pub documents: Vec<Document>,
}

impl Snapshot {
    /// Decode the documents as chat messages, keeping delivered order.
    /// Undecodable documents are logged and skipped.
    pub fn decode_messages(&self) -> Vec<ChatMessage> {
        self.documents
            .iter()
            .filter_map(|doc| {
                match serde_json::from_value::<ChatMessage>(doc.data.clone()) {
                    Ok(mut message) => {
                        message.id = doc.id.clone();
                        Some(message)
                    }
                    Err(err) => {
                        tracing::warn!("skipping undecodable message {}: {err}", doc.id.0);
                        None
                    }
                }
            })
            .collect()
    }

    /// Decode the documents as listings, keeping delivered order.
    pub fn decode_listings(&self) -> Vec<Listing> {
        self.documents
            .iter()
            .filter_map(|doc| match serde_json::from_value::<Listing>(doc.data.clone()) {
                Ok(mut listing) => {
                    listing.id = doc.id.clone();
                    Some(listing)
                }
                Err(err) => {
                    tracing::warn!("skipping undecodable listing {}: {err}", doc.id.0);
                    None
                }
            })
            .collect()
    }
}

/// Requests the live client sends to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientRequest {
    SignUp {
        request_id: u64,
        email: String,
        password: String,
    },
    SignIn {
        request_id: u64,
        email: String,
        password: String,
    },
    SignOut {
        request_id: u64,
    },
    UpdateProfile {
        request_id: u64,
        display_name: String,
    },
    Write {
        request_id: u64,
        collection: Collection,
        record: Value,
    },
    Subscribe {
        subscription_id: u64,
        collection: Collection,
        order: SnapshotOrder,
    },
    Unsubscribe {
        subscription_id: u64,
    },
}

/// Call results and pushed events coming back from the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    AuthOk {
        request_id: u64,
        identity: Option<Identity>,
    },
    AuthFailed {
        request_id: u64,
        code: AuthError,
    },
    WriteOk {
        request_id: u64,
        id: RecordId,
    },
    WriteFailed {
        request_id: u64,
        code: StoreError,
    },
    /// Pushed on registration and on every auth change.
    IdentityChanged {
        identity: Option<Identity>,
    },
    Snapshot {
        subscription_id: u64,
        snapshot: Snapshot,
    },
    Connection {
        connected: bool,
    },
}
