//! Domain DTOs for the chat API.
//!
//! # Design
//! Read-only projections of the backend's JSON shapes, `camelCase` on the
//! wire. The client never mutates or validates their internals beyond the
//! optional-field guards screens need for display. The mock-server crate
//! defines its own copies independently; integration tests catch any schema
//! drift between the two.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user, as returned by `register`, friend listings, and
/// embedded in pending friend requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// One incoming friend request; the backend embeds the sender's identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    pub sender: User,
}

/// A direct message between two users. Timestamps stay opaque strings —
/// the client displays whatever order the backend returns and never
/// re-sorts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_email: String,
    pub receiver_email: String,
    pub content: String,
    pub timestamp: String,
}

/// A group chat the caller belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub creator_email: String,
    pub member_emails: Vec<String>,
}

/// A message posted to a group. Sender names are optional: the backend
/// omits them for accounts created before names were recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMessage {
    pub id: Uuid,
    pub group_id: Uuid,
    pub sender_email: String,
    pub sender_first_name: Option<String>,
    pub sender_last_name: Option<String>,
    pub content: String,
    pub timestamp: String,
}

/// Request payload for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Request payload for obtaining a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// Success payload of `login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Request payload for sending a direct message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
    pub to_email: String,
    pub content: String,
}

/// Request payload for creating a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroup {
    pub name: String,
    pub member_emails: Vec<String>,
}
