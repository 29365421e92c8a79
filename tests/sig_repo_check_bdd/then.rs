//! Then steps for SIG repository check behavioural tests.

use rstest_bdd_macros::then;
use sigcheck::SigCheckError;

use crate::sig_repo_check_bdd_state::CheckState;

fn recorded_error(check_state: &CheckState) -> SigCheckError {
    check_state.error.get().unwrap_or_else(|| {
        let summary = check_state.summary.get();
        panic!("expected the check to fail; summary: {summary:?}")
    })
}

#[then("the check succeeds having scanned {count:usize} repositories")]
fn assert_success(check_state: &CheckState, count: usize) {
    let Some(summary) = check_state.summary.get() else {
        let error = check_state.error.get();
        panic!("expected the check to succeed; error: {error:?}");
    };
    assert_eq!(summary.scanned, count, "unexpected scanned count");
}

#[then("the check fails with message {expected}")]
fn assert_error_message(check_state: &CheckState, expected: String) {
    let expected_message = expected.trim_matches('"');
    assert_eq!(recorded_error(check_state).to_string(), expected_message);
}

#[then("the check fails with a message containing {expected}")]
fn assert_error_contains(check_state: &CheckState, expected: String) {
    let expected_fragment = expected.trim_matches('"');
    let message = recorded_error(check_state).to_string();
    assert!(
        message.contains(expected_fragment),
        "expected `{expected_fragment}` in `{message}`"
    );
}

#[then("the check fails because the SIG file does not exist")]
fn assert_sig_file_missing(check_state: &CheckState) {
    let error = recorded_error(check_state);
    assert!(
        matches!(error, SigCheckError::SigFileNotFound { .. }),
        "expected SigFileNotFound, got {error:?}"
    );
}

#[then("the mock Gitee API received {count:usize} requests")]
fn assert_request_count(check_state: &CheckState, count: usize) {
    let runtime = check_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    let requests = check_state
        .server
        .with_ref(|server| runtime.block_on(server.received_requests()))
        .flatten()
        .unwrap_or_default();
    assert_eq!(requests.len(), count, "unexpected request count");
}

#[then("the Gitee API mocks are satisfied")]
fn verify_mocks(check_state: &CheckState) {
    let runtime = check_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    check_state
        .server
        .with_ref(|server| runtime.block_on(server.verify()))
        .unwrap_or_else(|| panic!("mock server not initialised"));
}
