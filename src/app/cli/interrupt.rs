//! Ctrl+C handling for the validate command.
//!
//! The first interrupt cancels in-flight probes so the report still prints with
//! them skipped. A second interrupt exits immediately.

use std::io;
use std::thread;

use tokio::runtime::Builder;

use crate::domain::CancelToken;

/// Conventional exit status for a process ended by SIGINT.
const EXIT_INTERRUPTED: i32 = 130;

/// Cancel `token` on the first Ctrl+C. The listener runs on a detached thread.
pub fn cancel_on_interrupt(token: CancelToken) -> io::Result<()> {
    let runtime = Builder::new_current_thread().enable_io().build()?;
    let mut interrupts = {
        let _guard = runtime.enter();
        Interrupts::install()?
    };

    thread::Builder::new().name("preflight-interrupt".to_string()).spawn(move || {
        runtime.block_on(async move {
            if !interrupts.next().await {
                return;
            }
            tracing::info!("Received Ctrl+C, cancelling in-flight probes");
            token.cancel();

            if interrupts.next().await {
                std::process::exit(EXIT_INTERRUPTED);
            }
        });
    })?;
    Ok(())
}

#[cfg(unix)]
struct Interrupts(tokio::signal::unix::Signal);

#[cfg(unix)]
impl Interrupts {
    // Registers the handler immediately, so no interrupt is lost before the first poll.
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};
        Ok(Self(signal(SignalKind::interrupt())?))
    }

    async fn next(&mut self) -> bool {
        self.0.recv().await.is_some()
    }
}

#[cfg(not(unix))]
struct Interrupts;

#[cfg(not(unix))]
impl Interrupts {
    fn install() -> io::Result<Self> {
        Ok(Self)
    }

    async fn next(&mut self) -> bool {
        tokio::signal::ctrl_c().await.is_ok()
    }
}
