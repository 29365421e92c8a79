//! Given steps for SIG repository check behavioural tests.

use camino::Utf8PathBuf;
use rstest_bdd_macros::given;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

use crate::sig_repo_check_bdd_state::{
    CheckState, ORGANIZATION, any_repository_path_pattern, mock_gitee, repository_request_path,
};
use crate::support::create_temp_dir;

fn sig_file_content(repositories: &[&str]) -> String {
    let entries: String = repositories
        .iter()
        .map(|repository| format!("  - {repository}\n"))
        .collect();
    format!("sigs:\n- name: Infrastructure\n  repositories:\n{entries}")
}

fn store_sig_path(check_state: &CheckState, content: Option<&str>) {
    let temp_dir = create_temp_dir();
    let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temp dir path should be UTF-8: {}", path.display()));
    let sig_path = root.join("sigs.yaml");

    if let Some(body) = content {
        std::fs::write(&sig_path, body)
            .unwrap_or_else(|error| panic!("SIG file should be written: {error}"));
    }

    check_state.temp_dir.set(temp_dir);
    check_state.sig_path.set(sig_path);
}

fn mount(check_state: &CheckState, mock: Mock) {
    let gitee = mock_gitee(check_state);
    check_state
        .server
        .with_ref(|server| gitee.runtime.block_on(mock.mount(server)))
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

fn exists_body(repository: &str) -> serde_json::Value {
    json!({"full_name": format!("{ORGANIZATION}/{repository}"), "name": repository})
}

#[given("a SIG file listing {repositories}")]
fn sig_file_listing(check_state: &CheckState, repositories: String) {
    let names: Vec<&str> = repositories.split(',').map(str::trim).collect();
    store_sig_path(check_state, Some(&sig_file_content(&names)));
}

#[given("no SIG file on disk")]
fn no_sig_file(check_state: &CheckState) {
    store_sig_path(check_state, None);
}

#[given("a mock Gitee API where every repository exists")]
fn every_repository_exists(check_state: &CheckState) {
    mount(
        check_state,
        Mock::given(method("GET"))
            .and(path_regex(any_repository_path_pattern(ORGANIZATION)))
            .respond_with(ResponseTemplate::new(200).set_body_json(exists_body("any")))
            .named("repository exists"),
    );
}

#[given("a mock Gitee API where {repository} does not exist")]
fn repository_missing(check_state: &CheckState, repository: String) {
    mount(
        check_state,
        Mock::given(method("GET"))
            .and(path(repository_request_path(ORGANIZATION, &repository)))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found Project"})),
            )
            .expect(1)
            .named("missing repository"),
    );
    every_repository_exists(check_state);
}

#[given("a mock Gitee API where {repository} fails once with status {status:u16}")]
fn repository_fails_once(check_state: &CheckState, repository: String, status: u16) {
    mount(
        check_state,
        Mock::given(method("GET"))
            .and(path(repository_request_path(ORGANIZATION, &repository)))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(1)
            .expect(1)
            .named("transient failure"),
    );
    mount(
        check_state,
        Mock::given(method("GET"))
            .and(path(repository_request_path(ORGANIZATION, &repository)))
            .respond_with(ResponseTemplate::new(200).set_body_json(exists_body(&repository)))
            .expect(1)
            .named("repository exists after retry"),
    );
}

#[given("a mock Gitee API that rejects the token")]
fn token_rejected(check_state: &CheckState) {
    mount(
        check_state,
        Mock::given(method("GET"))
            .and(path_regex(any_repository_path_pattern(ORGANIZATION)))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "401 Unauthorized"})),
            )
            .named("token rejected"),
    );
}
