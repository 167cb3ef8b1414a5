//! Integration tests for the assertion keywords

use super::*;
use mailosaur_keywords::{KeywordError, MailosaurError};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_partial_json, query_param};

fn assertion_message(err: KeywordError) -> String {
    match err {
        KeywordError::Assertion(message) => message,
        other => panic!("Expected assertion failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_subject_should_match_targets_server_domain() {
    let mock_server = MockServer::start().await;

    mock_with_auth("POST", "/api/messages/search")
        .and(query_param("server", SERVER_ID))
        .and(body_partial_json(json!({ "sentTo": SERVER_DOMAIN })))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_hit()))
        .expect(1)
        .mount(&mock_server)
        .await;
    mock_with_auth("GET", "/api/messages/msg-1")
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body("Welcome")))
        .mount(&mock_server)
        .await;

    let mut keywords = keywords_for(&mock_server);
    keywords.email_subject_should_match("Welcome").await.unwrap();
}

#[tokio::test]
async fn test_subject_mismatch_reports_both_values() {
    let mock_server = MockServer::start().await;
    mount_message(&mock_server, message_body("Welcome")).await;

    let mut keywords = keywords_for(&mock_server);
    let err = keywords
        .email_subject_should_match("Goodbye")
        .await
        .unwrap_err();

    assert_eq!(
        assertion_message(err),
        "AssertionError: 'Welcome' does not equal 'Goodbye'"
    );
}

#[tokio::test]
async fn test_link_and_attachment_counts() {
    let mock_server = MockServer::start().await;
    mount_message(&mock_server, message_body("Invoice")).await;

    let mut keywords = keywords_for(&mock_server);

    keywords.email_should_have_links(3).await.unwrap();
    keywords.email_should_have_attachments(1).await.unwrap();

    let err = keywords.email_should_have_links(2).await.unwrap_err();
    assert_eq!(assertion_message(err), "AssertionError: 3 does not equal 2");
}

#[tokio::test]
async fn test_missing_html_counts_zero_links() {
    let mock_server = MockServer::start().await;
    let mut body = message_body("Plain");
    body["html"] = Value::Null;
    mount_message(&mock_server, body).await;

    let mut keywords = keywords_for(&mock_server);

    keywords.email_should_have_links(0).await.unwrap();
}

#[tokio::test]
async fn test_body_contains_with_case_folding() {
    let mock_server = MockServer::start().await;
    mount_message(&mock_server, message_body("Code")).await;

    let mut keywords = keywords_for(&mock_server);

    keywords.email_body_should_contain("hello", true).await.unwrap();
    let err = keywords
        .email_body_should_contain("hello", false)
        .await
        .unwrap_err();

    assert_eq!(
        assertion_message(err),
        "AssertionError: hello is not contained Hello World\nYour code is 123456"
    );
}

#[tokio::test]
async fn test_links_and_sender() {
    let mock_server = MockServer::start().await;
    mount_message(&mock_server, message_body("Activate")).await;

    let mut keywords = keywords_for(&mock_server);

    keywords
        .email_links_should_contain_text("activate")
        .await
        .unwrap();
    keywords
        .email_sender_should_be("support@example.com")
        .await
        .unwrap();

    let err = keywords
        .email_links_should_contain_text("Help")
        .await
        .unwrap_err();
    assert!(matches!(err, KeywordError::AssertionFailed));
}

#[tokio::test]
async fn test_run_keyword_by_name() {
    let mock_server = MockServer::start().await;
    mount_message(&mock_server, message_body("Welcome to Acme")).await;

    let mut keywords = keywords_for(&mock_server);

    keywords
        .run_keyword("Email Subject Should Contain", &["Acme".to_string()])
        .await
        .unwrap();
    keywords
        .run_keyword("email should have attachments", &["1".to_string()])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_all_emails() {
    let mock_server = MockServer::start().await;

    mock_with_auth("DELETE", "/api/messages")
        .and(query_param("server", SERVER_ID))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut keywords = keywords_for(&mock_server);
    keywords.delete_all_emails().await.unwrap();

    assert_eq!(keywords.criteria().sent_to.as_deref(), Some(SERVER_DOMAIN));
}

#[tokio::test]
async fn test_delete_all_propagates_api_error() {
    let mock_server = MockServer::start().await;

    mock_with_auth("DELETE", "/api/messages")
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let mut keywords = keywords_for(&mock_server);
    let err = keywords.delete_all_emails().await.unwrap_err();

    assert!(!err.is_assertion());
    assert!(matches!(
        err.client_error(),
        Some(MailosaurError::Permission { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Permission denied: Insufficient permission to perform that task."
    );
}

#[tokio::test]
async fn test_no_message_in_time_is_client_error() {
    let mock_server = MockServer::start().await;

    mock_with_auth("POST", "/api/messages/search")
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .insert_header("x-ms-delay", "5000"),
        )
        .mount(&mock_server)
        .await;

    let mut keywords = keywords_for(&mock_server);
    let err = keywords
        .email_subject_should_match("Welcome")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        KeywordError::Client(MailosaurError::SearchTimeout { .. })
    ));
}
