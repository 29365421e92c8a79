//! `sig checkrepo` operation.

use std::ffi::OsString;
use std::iter;
use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use sigcheck::{
    AccessToken, ApiBase, CheckSummary, OctocrabRepositoryGateway, RepositoryGateway,
    SigCheckConfig, SigCheckError, check_sig_repositories,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Program name handed to the configuration loader ahead of forwarded flags.
const COMMAND_NAME: &str = "sigcheck sig checkrepo";

const TOKEN_FLAG: &str = "--gitee-token";
/// Spelling of [`TOKEN_FLAG`] used by earlier SIG tooling.
const LEGACY_TOKEN_FLAG: &str = "--giteetoken";

/// Checks every repository referenced by the configured SIG file.
///
/// # Errors
///
/// Returns [`SigCheckError::Configuration`] if the options cannot be loaded,
/// and otherwise whatever the check pipeline reports.
pub async fn run(
    args: Vec<OsString>,
    cancel: CancellationToken,
) -> Result<CheckSummary, SigCheckError> {
    let config = load_config(args)?;
    run_with_gateway_builder(&config, cancel, |token, api_base, request_timeout| {
        OctocrabRepositoryGateway::for_token(token, api_base, request_timeout).map(Arc::new)
    })
    .await
}

/// Loads configuration from forwarded flags, environment, and files.
///
/// # Errors
///
/// Returns [`SigCheckError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config(args: Vec<OsString>) -> Result<SigCheckConfig, SigCheckError> {
    let argv = iter::once(OsString::from(COMMAND_NAME))
        .chain(args.into_iter().map(rename_legacy_flag));
    SigCheckConfig::load_from_iter(argv).map_err(|error| SigCheckError::Configuration {
        message: error.to_string(),
    })
}

/// Rewrites `--giteetoken` (and `--giteetoken=VALUE`) to `--gitee-token`.
fn rename_legacy_flag(arg: OsString) -> OsString {
    let Some(text) = arg.to_str() else {
        return arg;
    };
    if text == LEGACY_TOKEN_FLAG {
        return OsString::from(TOKEN_FLAG);
    }
    let renamed = text
        .strip_prefix(LEGACY_TOKEN_FLAG)
        .and_then(|rest| rest.strip_prefix('='))
        .map(|value| format!("{TOKEN_FLAG}={value}"));
    renamed.map_or(arg, OsString::from)
}

/// Resolves configuration into explicit values, builds the gateway, and runs
/// the check.
///
/// Every configuration error surfaces before the gateway is built.
pub async fn run_with_gateway_builder<G, F>(
    config: &SigCheckConfig,
    cancel: CancellationToken,
    build_gateway: F,
) -> Result<CheckSummary, SigCheckError>
where
    G: RepositoryGateway + 'static,
    F: FnOnce(&AccessToken, &ApiBase, Duration) -> Result<Arc<G>, SigCheckError>,
{
    let filename = config.require_filename()?;
    let token = AccessToken::new(config.resolve_token()?)?;
    let api_base = config.api_base()?;
    let options = config.check_options()?;

    debug!(api_base = %api_base.as_str(), "building repository gateway");
    let gateway = build_gateway(&token, &api_base, config.request_timeout())?;
    check_sig_repositories(&filename, gateway, &options, cancel).await
}
