//! Stateless HTTP request builder and response parser for the chat API.
//!
//! # Design
//! `ChatClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The host executes the actual HTTP round-trip, keeping the core
//! deterministic and free of I/O dependencies.
//!
//! Authenticated operations take the bearer token as a parameter and attach
//! `Authorization: Bearer <token>`. Calling one without a valid token is a
//! caller precondition — the client forwards whatever it is given and the
//! server answers 401.
//!
//! On a non-2xx response every `parse_*` extracts the server's `message`
//! field when the body carries one, and otherwise falls back to an
//! operation-specific string. No operation retries, caches, or re-sorts
//! what the server returns.

use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateGroup, Group, GroupMessage, Login, LoginResponse, Message, PendingRequest, RegisterUser,
    SendMessage, User,
};

/// Stateless client for the chat API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The host is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`. The base URL includes the
/// backend's `/api` prefix, e.g. `http://10.0.2.2:8080/api`.
#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // -----------------------------------------------------------------
    // Account
    // -----------------------------------------------------------------

    pub fn build_register(&self, input: &RegisterUser) -> Result<HttpRequest, ApiError> {
        require("First name", &input.first_name)?;
        require("Last name", &input.last_name)?;
        require("Email", &input.email)?;
        require("Password", &input.password)?;
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/register", self.base_url),
            headers: vec![json_content()],
            body: Some(body),
        })
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, "An error occurred")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn build_login(&self, input: &Login) -> Result<HttpRequest, ApiError> {
        require("Email", &input.email)?;
        require("Password", &input.password)?;
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/login", self.base_url),
            headers: vec![json_content()],
            body: Some(body),
        })
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        check_status(&response, "An error occurred")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    // -----------------------------------------------------------------
    // Friends
    // -----------------------------------------------------------------

    pub fn build_send_friend_request(
        &self,
        token: &str,
        to_email: &str,
    ) -> Result<HttpRequest, ApiError> {
        require("Email", to_email)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!(
                "{}/friends/add?{}",
                self.base_url,
                query(&[("toEmail", to_email)])
            ),
            headers: vec![bearer(token)],
            body: None,
        })
    }

    pub fn parse_send_friend_request(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, "Error sending friend request")?;
        Ok(response.body)
    }

    pub fn build_accept_friend_request(
        &self,
        token: &str,
        from_email: &str,
    ) -> Result<HttpRequest, ApiError> {
        require("Email", from_email)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!(
                "{}/friends/accept?{}",
                self.base_url,
                query(&[("fromEmail", from_email)])
            ),
            headers: vec![bearer(token)],
            body: None,
        })
    }

    pub fn parse_accept_friend_request(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, "Error accepting friend request")?;
        Ok(response.body)
    }

    pub fn build_reject_friend_request(
        &self,
        token: &str,
        from_email: &str,
    ) -> Result<HttpRequest, ApiError> {
        require("Email", from_email)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!(
                "{}/friends/reject?{}",
                self.base_url,
                query(&[("fromEmail", from_email)])
            ),
            headers: vec![bearer(token)],
            body: None,
        })
    }

    pub fn parse_reject_friend_request(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, "Error rejecting friend request")?;
        Ok(response.body)
    }

    pub fn build_pending_requests(&self, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/friends/requests", self.base_url),
            headers: vec![bearer(token)],
            body: None,
        }
    }

    pub fn parse_pending_requests(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<PendingRequest>, ApiError> {
        check_status(&response, "Error fetching pending requests")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn build_friends(&self, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/friends", self.base_url),
            headers: vec![bearer(token)],
            body: None,
        }
    }

    pub fn parse_friends(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response, "Error fetching friends")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    // -----------------------------------------------------------------
    // Direct messages
    // -----------------------------------------------------------------

    pub fn build_send_message(
        &self,
        token: &str,
        input: &SendMessage,
    ) -> Result<HttpRequest, ApiError> {
        require("Email", &input.to_email)?;
        require("Message content", &input.content)?;
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/messages/send", self.base_url),
            headers: vec![json_content(), bearer(token)],
            body: Some(body),
        })
    }

    pub fn parse_send_message(&self, response: HttpResponse) -> Result<Message, ApiError> {
        check_status(&response, "Error sending message")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn build_messages(
        &self,
        token: &str,
        other_user_email: &str,
    ) -> Result<HttpRequest, ApiError> {
        require("Email", other_user_email)?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}/messages?{}",
                self.base_url,
                query(&[("otherUserEmail", other_user_email)])
            ),
            headers: vec![bearer(token)],
            body: None,
        })
    }

    pub fn parse_messages(&self, response: HttpResponse) -> Result<Vec<Message>, ApiError> {
        check_status(&response, "Error fetching messages")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    // -----------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------

    pub fn build_groups(&self, token: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/groups", self.base_url),
            headers: vec![bearer(token)],
            body: None,
        }
    }

    pub fn parse_groups(&self, response: HttpResponse) -> Result<Vec<Group>, ApiError> {
        check_status(&response, "Error fetching groups")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn build_create_group(
        &self,
        token: &str,
        input: &CreateGroup,
    ) -> Result<HttpRequest, ApiError> {
        require("Group name", &input.name)?;
        if input.member_emails.is_empty() {
            return Err(ApiError::Validation(
                "At least one member is required".to_string(),
            ));
        }
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/groups/create", self.base_url),
            headers: vec![json_content(), bearer(token)],
            body: Some(body),
        })
    }

    pub fn parse_create_group(&self, response: HttpResponse) -> Result<Group, ApiError> {
        check_status(&response, "Error creating group")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn build_group_messages(&self, token: &str, group_id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/groups/{group_id}/messages", self.base_url),
            headers: vec![bearer(token)],
            body: None,
        }
    }

    pub fn parse_group_messages(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<GroupMessage>, ApiError> {
        check_status(&response, "Error fetching group messages")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn build_send_group_message(
        &self,
        token: &str,
        group_id: Uuid,
        content: &str,
    ) -> Result<HttpRequest, ApiError> {
        require("Message content", content)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!(
                "{}/groups/{group_id}/send?{}",
                self.base_url,
                query(&[("content", content)])
            ),
            headers: vec![bearer(token)],
            body: None,
        })
    }

    pub fn parse_send_group_message(&self, response: HttpResponse) -> Result<GroupMessage, ApiError> {
        check_status(&response, "Error sending group message")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn build_group_members(&self, token: &str, group_id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/groups/{group_id}/members", self.base_url),
            headers: vec![bearer(token)],
            body: None,
        }
    }

    pub fn parse_group_members(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        check_status(&response, "Failed to fetch group members")?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn build_add_group_member(
        &self,
        token: &str,
        group_id: Uuid,
        new_member_email: &str,
    ) -> Result<HttpRequest, ApiError> {
        require("Email", new_member_email)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!(
                "{}/groups/{group_id}/add-member?{}",
                self.base_url,
                query(&[("newMemberEmail", new_member_email)])
            ),
            headers: vec![bearer(token)],
            body: None,
        })
    }

    pub fn parse_add_group_member(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, "Error adding member to group")?;
        Ok(response.body)
    }
}

fn bearer(token: &str) -> (String, String) {
    ("authorization".to_string(), format!("Bearer {token}"))
}

fn json_content() -> (String, String) {
    ("content-type".to_string(), "application/json".to_string())
}

/// Percent-encode query parameters. Emails and message content travel in
/// query strings, so raw interpolation would corrupt the URL.
fn query(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Accept any 2xx; otherwise fail with the server's `message` field when the
/// body carries one, else the operation's fallback string.
fn check_status(response: &HttpResponse, fallback: &str) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::Request {
        status: Some(response.status),
        message: error_message(&response.body, fallback),
    })
}

fn error_message(body: &str, fallback: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) => fallback.to_string(),
    }
}
