//! # What ends [`Bootstrap::run_until_shutdown`](crate::Bootstrap::run_until_shutdown).
//!
//! Once the bootstrap is ready its timers keep firing until either a termination signal
//! arrives (`SIGINT`, `SIGTERM`, `SIGQUIT` on unix; Ctrl-C elsewhere) or the runtime token is
//! cancelled through [`Bootstrap::cancel`](crate::Bootstrap::cancel).

use std::io;

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Cause of a shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    Signal(&'static str),
    Cancelled,
}

impl Trigger {
    pub(crate) fn as_label(&self) -> &'static str {
        match self {
            Trigger::Signal(name) => *name,
            Trigger::Cancelled => "cancelled",
        }
    }
}

/// Waits for a termination signal or for `token` to be cancelled.
///
/// If the signal handlers cannot be installed, only the token ends the wait.
pub(crate) async fn wait_for_trigger(token: &CancellationToken) -> Trigger {
    tokio::select! {
        biased;
        _ = token.cancelled() => Trigger::Cancelled,
        res = termination_signal() => match res {
            Ok(name) => Trigger::Signal(name),
            Err(err) => {
                warn!(target: "bootvisor", error = %err, "signal handlers unavailable, waiting for cancel");
                token.cancelled().await;
                Trigger::Cancelled
            }
        },
    }
}

#[cfg(unix)]
async fn termination_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
        _ = sigquit.recv() => "SIGQUIT",
    };
    Ok(name)
}

#[cfg(not(unix))]
async fn termination_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn cancelled_token_ends_the_wait() {
        let token = CancellationToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { wait_for_trigger(&token).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();

        let trigger = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trigger, Trigger::Cancelled);
        assert_eq!(trigger.as_label(), "cancelled");
    }
}
