use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendingRequest {
    pub sender: User,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_email: String,
    pub receiver_email: String,
    pub content: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub creator_email: String,
    pub member_emails: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub to_email: String,
    pub content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    pub name: String,
    pub member_emails: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Clone, Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
pub struct ChatState {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    pending: Vec<(String, String)>,
    friendships: Vec<(String, String)>,
    messages: Vec<Message>,
    groups: HashMap<Uuid, Group>,
    group_messages: Vec<GroupMessage>,
}

pub type Db = Arc<RwLock<ChatState>>;

type ApiErr = (StatusCode, Json<ErrorMessage>);

fn fail(status: StatusCode, message: &str) -> ApiErr {
    (
        status,
        Json(ErrorMessage {
            message: message.to_string(),
        }),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(ChatState::default()));
    Router::new().nest("/api", api_routes()).with_state(db)
}

fn api_routes() -> Router<Db> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/friends/add", post(send_friend_request))
        .route("/friends/accept", post(accept_friend_request))
        .route("/friends/reject", post(reject_friend_request))
        .route("/friends/requests", get(pending_requests))
        .route("/friends", get(friends))
        .route("/messages/send", post(send_message))
        .route("/messages", get(messages))
        .route("/groups", get(groups))
        .route("/groups/create", post(create_group))
        .route("/groups/{id}/messages", get(group_messages))
        .route("/groups/{id}/send", post(send_group_message))
        .route("/groups/{id}/members", get(group_members))
        .route("/groups/{id}/add-member", post(add_group_member))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Mint an unsigned compact JWT whose payload carries `{"sub": email}`, so
/// clients deriving identity from the subject claim work end-to-end.
fn mint_token(email: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload =
        URL_SAFE_NO_PAD.encode(serde_json::json!({ "sub": email }).to_string().as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(Uuid::new_v4().as_bytes());
    format!("{header}.{payload}.{signature}")
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn caller_email(state: &ChatState, headers: &HeaderMap) -> Result<String, ApiErr> {
    let token =
        bearer(headers).ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Missing bearer token"))?;
    state
        .tokens
        .get(token)
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid token"))
}

fn are_friends(state: &ChatState, a: &str, b: &str) -> bool {
    state
        .friendships
        .iter()
        .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// --- account ---

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<User>), ApiErr> {
    let mut state = db.write().await;
    if state.accounts.contains_key(&input.email) {
        return Err(fail(StatusCode::CONFLICT, "Email already registered"));
    }
    let user = User {
        id: Uuid::new_v4(),
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email.clone(),
    };
    state.accounts.insert(
        input.email,
        Account {
            user: user.clone(),
            password: input.password,
        },
    );
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginResponse>, ApiErr> {
    let mut state = db.write().await;
    let valid = state
        .accounts
        .get(&input.email)
        .is_some_and(|account| account.password == input.password);
    if !valid {
        return Err(fail(StatusCode::UNAUTHORIZED, "Invalid email or password"));
    }
    let token = mint_token(&input.email);
    state.tokens.insert(token.clone(), input.email);
    Ok(Json(LoginResponse { token }))
}

// --- friends ---

#[derive(Deserialize)]
struct ToEmail {
    #[serde(rename = "toEmail")]
    to_email: String,
}

async fn send_friend_request(
    State(db): State<Db>,
    Query(query): Query<ToEmail>,
    headers: HeaderMap,
) -> Result<String, ApiErr> {
    let mut state = db.write().await;
    let me = caller_email(&state, &headers)?;
    if !state.accounts.contains_key(&query.to_email) {
        return Err(fail(StatusCode::NOT_FOUND, "User not found"));
    }
    if query.to_email == me {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Cannot send a friend request to yourself",
        ));
    }
    if are_friends(&state, &me, &query.to_email) {
        return Err(fail(StatusCode::CONFLICT, "Already friends"));
    }
    let duplicate = state
        .pending
        .iter()
        .any(|(from, to)| from == &me && to == &query.to_email);
    if duplicate {
        return Err(fail(StatusCode::CONFLICT, "Friend request already sent"));
    }
    state.pending.push((me, query.to_email));
    Ok("Friend request sent".to_string())
}

#[derive(Deserialize)]
struct FromEmail {
    #[serde(rename = "fromEmail")]
    from_email: String,
}

async fn accept_friend_request(
    State(db): State<Db>,
    Query(query): Query<FromEmail>,
    headers: HeaderMap,
) -> Result<String, ApiErr> {
    let mut state = db.write().await;
    let me = caller_email(&state, &headers)?;
    let position = state
        .pending
        .iter()
        .position(|(from, to)| from == &query.from_email && to == &me)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "No pending request from this user"))?;
    state.pending.remove(position);
    state.friendships.push((query.from_email, me));
    Ok("Friend request accepted".to_string())
}

async fn reject_friend_request(
    State(db): State<Db>,
    Query(query): Query<FromEmail>,
    headers: HeaderMap,
) -> Result<String, ApiErr> {
    let mut state = db.write().await;
    let me = caller_email(&state, &headers)?;
    let position = state
        .pending
        .iter()
        .position(|(from, to)| from == &query.from_email && to == &me)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "No pending request from this user"))?;
    state.pending.remove(position);
    Ok("Friend request rejected".to_string())
}

async fn pending_requests(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<PendingRequest>>, ApiErr> {
    let state = db.read().await;
    let me = caller_email(&state, &headers)?;
    let requests = state
        .pending
        .iter()
        .filter(|(_, to)| to == &me)
        .filter_map(|(from, _)| state.accounts.get(from))
        .map(|account| PendingRequest {
            sender: account.user.clone(),
        })
        .collect();
    Ok(Json(requests))
}

async fn friends(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<User>>, ApiErr> {
    let state = db.read().await;
    let me = caller_email(&state, &headers)?;
    let friends = state
        .friendships
        .iter()
        .filter_map(|(a, b)| {
            if a == &me {
                Some(b)
            } else if b == &me {
                Some(a)
            } else {
                None
            }
        })
        .filter_map(|email| state.accounts.get(email))
        .map(|account| account.user.clone())
        .collect();
    Ok(Json(friends))
}

// --- direct messages ---

async fn send_message(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<SendMessageInput>,
) -> Result<(StatusCode, Json<Message>), ApiErr> {
    let mut state = db.write().await;
    let me = caller_email(&state, &headers)?;
    if !state.accounts.contains_key(&input.to_email) {
        return Err(fail(StatusCode::NOT_FOUND, "User not found"));
    }
    let message = Message {
        id: Uuid::new_v4(),
        sender_email: me,
        receiver_email: input.to_email,
        content: input.content,
        timestamp: now(),
    };
    state.messages.push(message.clone());
    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Deserialize)]
struct OtherUserEmail {
    #[serde(rename = "otherUserEmail")]
    other_user_email: String,
}

async fn messages(
    State(db): State<Db>,
    Query(query): Query<OtherUserEmail>,
    headers: HeaderMap,
) -> Result<Json<Vec<Message>>, ApiErr> {
    let state = db.read().await;
    let me = caller_email(&state, &headers)?;
    let other = &query.other_user_email;
    // insertion order is chronological
    let conversation = state
        .messages
        .iter()
        .filter(|m| {
            (m.sender_email == me && &m.receiver_email == other)
                || (&m.sender_email == other && m.receiver_email == me)
        })
        .cloned()
        .collect();
    Ok(Json(conversation))
}

// --- groups ---

async fn groups(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Vec<Group>>, ApiErr> {
    let state = db.read().await;
    let me = caller_email(&state, &headers)?;
    let mine = state
        .groups
        .values()
        .filter(|group| group.member_emails.contains(&me))
        .cloned()
        .collect();
    Ok(Json(mine))
}

async fn create_group(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateGroupInput>,
) -> Result<(StatusCode, Json<Group>), ApiErr> {
    let mut state = db.write().await;
    let me = caller_email(&state, &headers)?;
    for email in &input.member_emails {
        if !state.accounts.contains_key(email) {
            return Err(fail(StatusCode::NOT_FOUND, "User not found"));
        }
    }
    let mut member_emails = input.member_emails;
    if !member_emails.contains(&me) {
        member_emails.push(me.clone());
    }
    let group = Group {
        id: Uuid::new_v4(),
        name: input.name,
        creator_email: me,
        member_emails,
    };
    state.groups.insert(group.id, group.clone());
    Ok((StatusCode::CREATED, Json(group)))
}

fn member_group<'a>(
    state: &'a ChatState,
    id: Uuid,
    me: &str,
) -> Result<&'a Group, ApiErr> {
    let group = state
        .groups
        .get(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Group not found"))?;
    if !group.member_emails.iter().any(|email| email == me) {
        return Err(fail(StatusCode::FORBIDDEN, "Not a member of this group"));
    }
    Ok(group)
}

async fn group_messages(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Vec<GroupMessage>>, ApiErr> {
    let state = db.read().await;
    let me = caller_email(&state, &headers)?;
    member_group(&state, id, &me)?;
    let history = state
        .group_messages
        .iter()
        .filter(|m| m.group_id == id)
        .cloned()
        .collect();
    Ok(Json(history))
}

#[derive(Deserialize)]
struct Content {
    content: String,
}

async fn send_group_message(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(query): Query<Content>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<GroupMessage>), ApiErr> {
    let mut state = db.write().await;
    let me = caller_email(&state, &headers)?;
    member_group(&state, id, &me)?;
    let sender = state.accounts.get(&me).map(|account| account.user.clone());
    let message = GroupMessage {
        id: Uuid::new_v4(),
        group_id: id,
        sender_email: me,
        sender_first_name: sender.as_ref().map(|user| user.first_name.clone()),
        sender_last_name: sender.as_ref().map(|user| user.last_name.clone()),
        content: query.content,
        timestamp: now(),
    };
    state.group_messages.push(message.clone());
    Ok((StatusCode::CREATED, Json(message)))
}

async fn group_members(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Vec<String>>, ApiErr> {
    let state = db.read().await;
    let me = caller_email(&state, &headers)?;
    let group = member_group(&state, id, &me)?;
    Ok(Json(group.member_emails.clone()))
}

#[derive(Deserialize)]
struct NewMemberEmail {
    #[serde(rename = "newMemberEmail")]
    new_member_email: String,
}

async fn add_group_member(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(query): Query<NewMemberEmail>,
    headers: HeaderMap,
) -> Result<String, ApiErr> {
    let mut state = db.write().await;
    let me = caller_email(&state, &headers)?;
    member_group(&state, id, &me)?;
    if !state.accounts.contains_key(&query.new_member_email) {
        return Err(fail(StatusCode::NOT_FOUND, "User not found"));
    }
    let group = state
        .groups
        .get_mut(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Group not found"))?;
    if group.member_emails.contains(&query.new_member_email) {
        return Err(fail(StatusCode::CONFLICT, "Already a member"));
    }
    group.member_emails.push(query.new_member_email);
    Ok("Member added".to_string())
}
