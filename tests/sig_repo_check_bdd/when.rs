//! When steps for SIG repository check behavioural tests.

use std::sync::Arc;
use std::time::Duration;

use rstest_bdd_macros::when;
use sigcheck::{
    AccessToken, CheckOptions, CheckSummary, OctocrabRepositoryGateway, OrganizationName,
    RetryPolicy, SigCheckError, check_sig_repositories,
};
use tokio_util::sync::CancellationToken;

use crate::sig_repo_check_bdd_state::{CheckState, ORGANIZATION, mock_gitee};

#[when("the SIG file is checked")]
fn check_sig_file(check_state: &CheckState) {
    let gitee = mock_gitee(check_state);
    let sig_path = check_state
        .sig_path
        .get()
        .unwrap_or_else(|| panic!("SIG file path missing"));

    let result: Result<CheckSummary, SigCheckError> = gitee.runtime.block_on(async {
        let token = AccessToken::new("test-token")?;
        let gateway =
            OctocrabRepositoryGateway::for_token(&token, &gitee.api_base, Duration::from_secs(5))?;

        let options = CheckOptions {
            retry: RetryPolicy {
                attempts: 2,
                delay: Duration::from_millis(10),
            },
            workers: 3,
            ..CheckOptions::new(OrganizationName::new(ORGANIZATION)?)
        };

        check_sig_repositories(&sig_path, Arc::new(gateway), &options, CancellationToken::new())
            .await
    });

    match result {
        Ok(summary) => check_state.summary.set(summary),
        Err(error) => check_state.error.set(error),
    }
}
