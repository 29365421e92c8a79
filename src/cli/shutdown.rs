//! Ctrl-C handling for an in-progress check.
//!
//! The first interrupt cancels the run so validators finish their in-flight
//! calls and the partial failure list is still reported. A second interrupt
//! exits the process immediately.

use std::future::Future;
use std::io;
use std::process;

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Exit status used when a second interrupt forces the process down.
const FORCED_EXIT_CODE: i32 = 130;

/// Spawns a task that turns Ctrl-C into cancellation of `cancel`.
pub fn install_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(forward_interrupts(
        tokio::signal::ctrl_c,
        cancel,
        || process::exit(FORCED_EXIT_CODE),
    ));
}

/// Cancels `cancel` on the first interrupt and calls `force_exit` on the
/// second.
///
/// Stops listening if the signal source fails.
pub async fn forward_interrupts<S, Fut, E>(
    mut next_interrupt: S,
    cancel: CancellationToken,
    force_exit: E,
) where
    S: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
    E: FnOnce(),
{
    if let Err(error) = next_interrupt().await {
        warn!(error = %error, "unable to listen for interrupts");
        return;
    }
    warn!("interrupt received; finishing in-flight checks (interrupt again to exit)");
    cancel.cancel();

    match next_interrupt().await {
        Ok(()) => {
            warn!("second interrupt received; exiting");
            force_exit();
        }
        Err(error) => warn!(error = %error, "unable to listen for interrupts"),
    }
}
