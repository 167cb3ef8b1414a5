//! Integration tests for the messages service

use super::*;
use mailosaur_keywords::{MailosaurError, SearchCriteria, SearchOptions};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, query_param};

#[tokio::test]
async fn test_get_searches_then_fetches_by_id() {
    let mock_server = MockServer::start().await;

    mock_with_auth("POST", "/api/messages/search")
        .and(query_param("server", SERVER_ID))
        .and(query_param("page", "0"))
        .and(query_param("itemsPerPage", "1"))
        .and(body_json(json!({ "sentTo": SERVER_DOMAIN, "match": "ALL" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_hit()))
        .expect(1)
        .mount(&mock_server)
        .await;

    mock_with_auth("GET", "/api/messages/msg-1")
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body("Welcome")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let criteria = SearchCriteria::new().sent_to(SERVER_DOMAIN);

    let message = client.messages().get(SERVER_ID, &criteria).await.unwrap();

    assert_eq!(message.id, "msg-1");
    assert_eq!(message.subject, "Welcome");
    assert_eq!(message.sender_email(), Some("support@example.com"));
    assert_eq!(message.html.links.len(), 3);
    assert_eq!(message.text.codes[0].value, "123456");
    assert_eq!(message.attachments[0].file_name.as_deref(), Some("invoice.pdf"));
    assert_eq!(message.metadata.headers[0].field, "X-Mailer");
}

#[tokio::test]
async fn test_get_sends_received_after() {
    let mock_server = MockServer::start().await;
    mount_message(&mock_server, message_body("Welcome")).await;

    let client = client_for(&mock_server);
    client
        .messages()
        .get(SERVER_ID, &SearchCriteria::new())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let search = &requests[0];
    let received_after = search
        .url
        .query_pairs()
        .find(|(k, _)| k == "receivedAfter")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    let parsed = chrono::DateTime::parse_from_rfc3339(&received_after).unwrap();
    let age = chrono::Utc::now().signed_duration_since(parsed);
    assert!(age >= chrono::Duration::minutes(59));
    assert!(age <= chrono::Duration::minutes(61));
}

#[tokio::test]
async fn test_get_rejects_invalid_server_id_without_request() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    let err = client
        .messages()
        .get("short", &SearchCriteria::new())
        .await
        .unwrap_err();

    assert!(matches!(err, MailosaurError::InvalidRequest { .. }));
    assert_eq!(err.to_string(), "Invalid request: Must provide a valid Server ID.");
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_polls_until_message_arrives() {
    let mock_server = MockServer::start().await;

    mock_with_auth("POST", "/api/messages/search")
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .insert_header("x-ms-delay", "50,100"),
        )
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    mock_with_auth("POST", "/api/messages/search")
        .respond_with(ResponseTemplate::new(200).set_body_json(search_hit()))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = SearchOptions::new().timeout(Duration::from_secs(5));

    let result = client
        .messages()
        .search(SERVER_ID, &SearchCriteria::new(), options)
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_times_out() {
    let mock_server = MockServer::start().await;

    mock_with_auth("POST", "/api/messages/search")
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .insert_header("x-ms-delay", "100"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = SearchOptions::new().timeout(Duration::from_millis(250));

    let err = client
        .messages()
        .search(SERVER_ID, &SearchCriteria::new(), options)
        .await
        .unwrap_err();

    assert!(matches!(err, MailosaurError::SearchTimeout { .. }));
    assert!(err.to_string().contains("No matching messages found in time."));
}

#[tokio::test]
async fn test_search_without_error_on_timeout_returns_empty() {
    let mock_server = MockServer::start().await;

    mock_with_auth("POST", "/api/messages/search")
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .insert_header("x-ms-delay", "1000"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = SearchOptions::new()
        .timeout(Duration::from_millis(500))
        .error_on_timeout(false);

    let result = client
        .messages()
        .search(SERVER_ID, &SearchCriteria::new(), options)
        .await
        .unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn test_delete_all() {
    let mock_server = MockServer::start().await;

    mock_with_auth("DELETE", "/api/messages")
        .and(query_param("server", SERVER_ID))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.messages().delete_all(SERVER_ID).await.unwrap();
}

#[tokio::test]
async fn test_delete_by_id() {
    let mock_server = MockServer::start().await;

    mock_with_auth("DELETE", "/api/messages/msg-1")
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.messages().delete("msg-1").await.unwrap();
}

#[tokio::test]
async fn test_authentication_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/messages"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.messages().delete_all(SERVER_ID).await.unwrap_err();

    assert!(matches!(err, MailosaurError::Authentication { .. }));
    assert_eq!(err.status_code(), Some(401));
    assert!(err.to_string().contains("Authentication failed, check your API key."));
}

#[tokio::test]
async fn test_validation_error_lists_fields() {
    let mock_server = MockServer::start().await;

    let error_body = json!({
        "type": "ValidationError",
        "errors": [
            { "field": "server", "detail": [{ "description": "Server not found" }] }
        ]
    });

    mock_with_auth("POST", "/api/messages/search")
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .messages()
        .search(SERVER_ID, &SearchCriteria::new(), SearchOptions::new())
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Invalid request: Request had one or more invalid parameters.\n(server) Server not found"
    );
}

#[tokio::test]
async fn test_server_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    mock_with_auth("GET", "/api/messages/missing")
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mock_with_auth("GET", "/api/messages/broken")
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let not_found = client.messages().get_by_id("missing").await.unwrap_err();
    assert!(matches!(not_found, MailosaurError::NotFound { .. }));

    let api = client.messages().get_by_id("broken").await.unwrap_err();
    assert_eq!(api.status_code(), Some(503));
    assert_eq!(api.error_type(), "api_error");
}
