use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, Group, GroupMessage, LoginResponse, Message, PendingRequest, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn auth_request(method: &str, uri: &str, token: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(String::new())
        .unwrap()
}

fn auth_json_request(method: &str, uri: &str, token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

/// Register an account and log it in, returning the bearer token.
async fn signed_up(app: &Router, first: &str, last: &str, email: &str) -> String {
    let body = format!(
        r#"{{"firstName":"{first}","lastName":"{last}","email":"{email}","password":"pw"}}"#
    );
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/register", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = format!(r#"{{"email":"{email}","password":"pw"}}"#);
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/login", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let login: LoginResponse = body_json(resp).await;
    login.token
}

// --- register / login ---

#[tokio::test]
async fn register_returns_created_user() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/register",
            r#"{"firstName":"Ada","lastName":"Lovelace","email":"ada@x.com","password":"pw"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert_eq!(user.first_name, "Ada");
    assert_eq!(user.email, "ada@x.com");
}

#[tokio::test]
async fn register_duplicate_email_returns_409_with_message() {
    let app = app();
    signed_up(&app, "Ada", "Lovelace", "ada@x.com").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/register",
            r#"{"firstName":"Ada","lastName":"Again","email":"ada@x.com","password":"pw"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let err: serde_json::Value = body_json(resp).await;
    assert_eq!(err["message"], "Email already registered");
}

#[tokio::test]
async fn login_wrong_password_returns_401_with_message() {
    let app = app();
    signed_up(&app, "Ada", "Lovelace", "ada@x.com").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            r#"{"email":"ada@x.com","password":"wrong"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: serde_json::Value = body_json(resp).await;
    assert_eq!(err["message"], "Invalid email or password");
}

// --- auth enforcement ---

#[tokio::test]
async fn authenticated_route_without_bearer_returns_401() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/friends")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_token_returns_401() {
    let app = app();
    let resp = app
        .oneshot(auth_request("GET", "/api/friends", "made.up.token"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- friend flow ---

#[tokio::test]
async fn friend_request_flow_accept() {
    let app = app();
    let ada = signed_up(&app, "Ada", "Lovelace", "ada@x.com").await;
    let bob = signed_up(&app, "Bob", "Jones", "bob@x.com").await;

    let resp = app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/friends/add?toEmail=bob%40x.com",
            &ada,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "Friend request sent");

    // bob sees the pending request with ada's identity embedded
    let resp = app
        .clone()
        .oneshot(auth_request("GET", "/api/friends/requests", &bob))
        .await
        .unwrap();
    let requests: Vec<PendingRequest> = body_json(resp).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].sender.email, "ada@x.com");

    let resp = app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/friends/accept?fromEmail=ada%40x.com",
            &bob,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // both sides now list each other
    let resp = app
        .clone()
        .oneshot(auth_request("GET", "/api/friends", &ada))
        .await
        .unwrap();
    let friends: Vec<User> = body_json(resp).await;
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].email, "bob@x.com");

    // and the pending list is drained
    let resp = app
        .clone()
        .oneshot(auth_request("GET", "/api/friends/requests", &bob))
        .await
        .unwrap();
    let requests: Vec<PendingRequest> = body_json(resp).await;
    assert!(requests.is_empty());
}

#[tokio::test]
async fn rejected_request_leaves_no_friendship() {
    let app = app();
    let ada = signed_up(&app, "Ada", "Lovelace", "ada@x.com").await;
    let bob = signed_up(&app, "Bob", "Jones", "bob@x.com").await;

    app.clone()
        .oneshot(auth_request(
            "POST",
            "/api/friends/add?toEmail=bob%40x.com",
            &ada,
        ))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(auth_request(
            "POST",
            "/api/friends/reject?fromEmail=ada%40x.com",
            &bob,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(auth_request("GET", "/api/friends", &bob))
        .await
        .unwrap();
    let friends: Vec<User> = body_json(resp).await;
    assert!(friends.is_empty());
}

#[tokio::test]
async fn friend_request_to_unknown_user_returns_404() {
    let app = app();
    let ada = signed_up(&app, "Ada", "Lovelace", "ada@x.com").await;

    let resp = app
        .oneshot(auth_request(
            "POST",
            "/api/friends/add?toEmail=nobody%40x.com",
            &ada,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: serde_json::Value = body_json(resp).await;
    assert_eq!(err["message"], "User not found");
}

// --- direct messages ---

#[tokio::test]
async fn conversation_is_returned_in_send_order() {
    let app = app();
    let ada = signed_up(&app, "Ada", "Lovelace", "ada@x.com").await;
    let bob = signed_up(&app, "Bob", "Jones", "bob@x.com").await;

    let resp = app
        .clone()
        .oneshot(auth_json_request(
            "POST",
            "/api/messages/send",
            &ada,
            r#"{"toEmail":"bob@x.com","content":"hello"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let sent: Message = body_json(resp).await;
    assert_eq!(sent.sender_email, "ada@x.com");
    assert_eq!(sent.receiver_email, "bob@x.com");

    app.clone()
        .oneshot(auth_json_request(
            "POST",
            "/api/messages/send",
            &bob,
            r#"{"toEmail":"ada@x.com","content":"hi back"}"#,
        ))
        .await
        .unwrap();

    let resp = app
        .clone()
        .oneshot(auth_request(
            "GET",
            "/api/messages?otherUserEmail=bob%40x.com",
            &ada,
        ))
        .await
        .unwrap();
    let conversation: Vec<Message> = body_json(resp).await;
    assert_eq!(conversation.len(), 2);
    assert_eq!(conversation[0].content, "hello");
    assert_eq!(conversation[1].content, "hi back");
}

// --- groups ---

#[tokio::test]
async fn group_flow() {
    let app = app();
    let ada = signed_up(&app, "Ada", "Lovelace", "ada@x.com").await;
    let bob = signed_up(&app, "Bob", "Jones", "bob@x.com").await;
    signed_up(&app, "Cem", "Kaya", "cem@x.com").await;

    let resp = app
        .clone()
        .oneshot(auth_json_request(
            "POST",
            "/api/groups/create",
            &ada,
            r#"{"name":"Team","memberEmails":["bob@x.com"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let group: Group = body_json(resp).await;
    assert_eq!(group.name, "Team");
    assert_eq!(group.creator_email, "ada@x.com");
    // the creator is always a member
    assert!(group.member_emails.contains(&"ada@x.com".to_string()));

    // members see the group listed
    let resp = app
        .clone()
        .oneshot(auth_request("GET", "/api/groups", &bob))
        .await
        .unwrap();
    let groups: Vec<Group> = body_json(resp).await;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, group.id);

    // post into the group and read it back
    let resp = app
        .clone()
        .oneshot(auth_request(
            "POST",
            &format!("/api/groups/{}/send?content=hello+team", group.id),
            &bob,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let posted: GroupMessage = body_json(resp).await;
    assert_eq!(posted.sender_first_name.as_deref(), Some("Bob"));

    let resp = app
        .clone()
        .oneshot(auth_request(
            "GET",
            &format!("/api/groups/{}/messages", group.id),
            &ada,
        ))
        .await
        .unwrap();
    let history: Vec<GroupMessage> = body_json(resp).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "hello team");

    // grow the membership
    let resp = app
        .clone()
        .oneshot(auth_request(
            "POST",
            &format!("/api/groups/{}/add-member?newMemberEmail=cem%40x.com", group.id),
            &ada,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(auth_request(
            "GET",
            &format!("/api/groups/{}/members", group.id),
            &ada,
        ))
        .await
        .unwrap();
    let members: Vec<String> = body_json(resp).await;
    assert_eq!(members.len(), 3);
    assert!(members.contains(&"cem@x.com".to_string()));
}

#[tokio::test]
async fn non_member_cannot_read_group_messages() {
    let app = app();
    let ada = signed_up(&app, "Ada", "Lovelace", "ada@x.com").await;
    let eve = signed_up(&app, "Eve", "Snoop", "eve@x.com").await;

    let resp = app
        .clone()
        .oneshot(auth_json_request(
            "POST",
            "/api/groups/create",
            &ada,
            r#"{"name":"Private","memberEmails":[]}"#,
        ))
        .await
        .unwrap();
    let group: Group = body_json(resp).await;

    let resp = app
        .oneshot(auth_request(
            "GET",
            &format!("/api/groups/{}/messages", group.id),
            &eve,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
