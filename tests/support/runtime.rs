//! Tokio runtime and mock Gitee API shared by behavioural scenarios.

use std::io;
use std::rc::Rc;

use rstest_bdd::Slot;
use sigcheck::ApiBase;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Path prefix of Gitee's v5 REST API.
pub const API_PREFIX: &str = "/api/v5";

/// Runtime handle that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<Runtime>);

impl SharedRuntime {
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// Handles a scenario needs to drive the gateway against the mock server.
pub struct MockGitee {
    pub runtime: SharedRuntime,
    /// `{server}/api/v5`, the base the gateway is configured with.
    pub api_base: ApiBase,
}

/// Starts the runtime and mock server on first use and returns the API base
/// pointing at the server.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created, a slot is empty
/// after being set, or the server URI does not form a valid API base.
pub fn ensure_mock_gitee(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<MockGitee, io::Error> {
    if runtime.with_ref(|_| ()).is_none() {
        runtime.set(SharedRuntime(Rc::new(Runtime::new()?)));
    }
    let shared_runtime = runtime
        .get()
        .ok_or_else(|| io::Error::other("runtime not initialised after set"))?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared_runtime.block_on(MockServer::start()));
    }
    let server_uri = server
        .with_ref(MockServer::uri)
        .ok_or_else(|| io::Error::other("mock server not initialised after set"))?;

    let api_base = ApiBase::parse(&format!("{server_uri}{API_PREFIX}")).map_err(io::Error::other)?;
    Ok(MockGitee {
        runtime: shared_runtime,
        api_base,
    })
}

/// Request path the gateway uses to look up `organization/repository`.
pub fn repository_request_path(organization: &str, repository: &str) -> String {
    format!("{API_PREFIX}/repos/{organization}/{repository}")
}

/// Regex matching a lookup of any repository under `organization`.
pub fn any_repository_path_pattern(organization: &str) -> String {
    format!("^{API_PREFIX}/repos/{organization}/[^/]+$")
}
