//! Email verification code lifecycle against in-memory stores.

mod common;

use std::sync::atomic::Ordering;

use assert_matches::assert_matches;
use common::TestHarness;
use passage_api::services::verification::INVALID_CODE_MESSAGE;
use passage_core::error::{CoreError, ErrorKind};

const EMAIL: &str = "alice@x.com";

#[tokio::test]
async fn issued_code_verifies() {
    let h = TestHarness::new();
    let code = h.issue_code(EMAIL).await;

    assert_eq!(h.mailer.code_for(EMAIL), Some(code));
    assert!(h.verification.verify_code(EMAIL, code).await.unwrap());
}

#[tokio::test]
async fn issued_code_is_in_configured_range() {
    let h = TestHarness::new();
    let code = h.issue_code(EMAIL).await;

    let range = &h.config.auth.code;
    assert!((range.min..=range.max).contains(&code));
}

#[tokio::test]
async fn wrong_code_is_rejected() {
    let h = TestHarness::new();
    let code = h.issue_code(EMAIL).await;

    let err = h.verification.verify_code(EMAIL, code + 1).await.unwrap_err();
    assert_eq!(err, CoreError::InvalidArgument(INVALID_CODE_MESSAGE.into()));
}

#[tokio::test]
async fn missing_code_fails_like_wrong_code() {
    let h = TestHarness::new();
    let code = h.issue_code(EMAIL).await;

    let absent = h
        .verification
        .verify_code("never@x.com", code)
        .await
        .unwrap_err();
    let mismatch = h.verification.verify_code(EMAIL, code + 1).await.unwrap_err();
    assert_eq!(absent.kind(), ErrorKind::InvalidArgument);
    assert_eq!(absent, mismatch);
}

#[tokio::test]
async fn code_expires_after_ttl() {
    let h = TestHarness::new();
    let code = h.issue_code(EMAIL).await;
    let ttl = h.config.auth.code.ttl_secs as i64;

    h.clock.advance(chrono::Duration::seconds(ttl - 1));
    assert!(h.verification.verify_code(EMAIL, code).await.unwrap());

    h.clock.advance(chrono::Duration::seconds(1));
    assert_matches!(
        h.verification.verify_code(EMAIL, code).await,
        Err(CoreError::InvalidArgument(_))
    );
}

#[tokio::test]
async fn successful_check_does_not_consume_code() {
    let h = TestHarness::new();
    let code = h.issue_code(EMAIL).await;

    assert!(h.verification.verify_code(EMAIL, code).await.unwrap());
    assert!(h.verification.verify_code(EMAIL, code).await.unwrap());
}

#[tokio::test]
async fn reissue_replaces_previous_code() {
    let h = TestHarness::new();
    let first = h.issue_code(EMAIL).await;
    let second = h.issue_code(EMAIL).await;

    assert!(h.verification.verify_code(EMAIL, second).await.unwrap());
    if first != second {
        assert_matches!(
            h.verification.verify_code(EMAIL, first).await,
            Err(CoreError::InvalidArgument(_))
        );
    }
}

#[tokio::test]
async fn malformed_email_is_rejected_before_mailing() {
    let h = TestHarness::new();

    let err = h
        .verification
        .create_verification_code("not-an-email")
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvalidArgument(msg) if msg.starts_with("email"));
    assert_eq!(h.mailer.code_for("not-an-email"), None);
}

#[tokio::test]
async fn mail_failure_fails_issue() {
    let h = TestHarness::new();
    h.mailer.fail_codes.store(true, Ordering::SeqCst);

    assert_matches!(
        h.verification.create_verification_code(EMAIL).await,
        Err(CoreError::Internal(_))
    );
}

#[tokio::test]
async fn code_store_outage_is_internal() {
    let h = TestHarness::new();
    let code = h.issue_code(EMAIL).await;
    h.codes.unavailable.store(true, Ordering::SeqCst);

    assert_matches!(
        h.verification.create_verification_code(EMAIL).await,
        Err(CoreError::Internal(_))
    );
    assert_matches!(
        h.verification.verify_code(EMAIL, code).await,
        Err(CoreError::Internal(_))
    );
}
