//! Generic readiness polling
//!
//! The single convergence primitive. Every readiness gate is a check
//! function plugged into [`Waiter::wait`], optionally paired with a
//! fail-fast function that can abort the wait on a terminal condition
//! independent of the check's own result.
//!
//! There is no timeout: convergence can take an operator-dependent amount
//! of time, and a run interrupted at any point can simply be started again.

use std::future::{ready, Future};
use std::io::Write;
use std::time::Duration;

use tracing::info;

use crate::{Error, Result};

/// Poll timing shared by every wait in a run.
#[derive(Debug, Clone, Copy)]
pub struct WaitSpec {
    pub poll_interval: Duration,
}

/// Result of one check evaluation. Never retained across iterations; the
/// external system's own state is the only durable state.
#[derive(Debug, Clone)]
pub struct StageStatus {
    pub done: bool,
    pub message: String,
}

impl StageStatus {
    pub fn ready(message: impl Into<String>) -> Self {
        Self {
            done: true,
            message: message.into(),
        }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            done: false,
            message: message.into(),
        }
    }
}

/// Polls a check function until it reports done.
pub struct Waiter {
    spec: WaitSpec,
}

impl Waiter {
    pub fn new(spec: WaitSpec) -> Self {
        Self { spec }
    }

    /// Wait until `check` reports done.
    ///
    /// Each iteration has three possible outcomes: the check errors (the
    /// wait fails), the check is done (the wait returns), or the wait
    /// sleeps one poll interval and re-evaluates. Not-ready states must be
    /// reported as `done: false`, never as errors.
    pub async fn wait<C, Fut>(&self, title: &str, check: C) -> Result<()>
    where
        C: FnMut() -> Fut,
        Fut: Future<Output = Result<StageStatus>>,
    {
        self.wait_with_fail_fast(title, check, || ready(None)).await
    }

    /// Like [`Waiter::wait`], with a fail-fast function evaluated before the
    /// check on every iteration. A non-empty diagnostic aborts the wait
    /// immediately, preempting even a simultaneous done signal.
    pub async fn wait_with_fail_fast<C, CFut, F, FFut>(
        &self,
        title: &str,
        mut check: C,
        mut fail_fast: F,
    ) -> Result<()>
    where
        C: FnMut() -> CFut,
        CFut: Future<Output = Result<StageStatus>>,
        F: FnMut() -> FFut,
        FFut: Future<Output = Option<String>>,
    {
        info!("waiting for {}", title);

        loop {
            if let Some(diagnostic) = fail_fast().await {
                return Err(Error::PodFailure(diagnostic));
            }

            let status = check().await?;

            // Overwrite the previous progress line so output stays compact.
            print!("\r  {}", status.message);
            let _ = std::io::stdout().flush();

            if status.done {
                println!("\r  {} (OK)        ", status.message);
                return Ok(());
            }

            tokio::time::sleep(self.spec.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn waiter() -> Waiter {
        Waiter::new(WaitSpec {
            poll_interval: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn returns_once_check_is_done() {
        let calls = AtomicUsize::new(0);

        waiter()
            .wait("test", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n >= 2 {
                        Ok(StageStatus::ready(format!("{}/3", n + 1)))
                    } else {
                        Ok(StageStatus::pending(format!("{}/3", n + 1)))
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fail_fast_preempts_a_simultaneous_done() {
        let checks = AtomicUsize::new(0);

        let err = waiter()
            .wait_with_fail_fast(
                "test",
                || {
                    checks.fetch_add(1, Ordering::SeqCst);
                    async { Ok(StageStatus::ready("done")) }
                },
                || async { Some("image pull failing".to_string()) },
            )
            .await
            .unwrap_err();

        match err {
            Error::PodFailure(diagnostic) => assert_eq!(diagnostic, "image pull failing"),
            other => panic!("unexpected error: {other:?}"),
        }
        // The check never ran: the fail-fast verdict came first.
        assert_eq!(checks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fail_fast_fires_after_initial_quiet_iterations() {
        let polls = AtomicUsize::new(0);

        let err = waiter()
            .wait_with_fail_fast(
                "test",
                || async { Ok(StageStatus::pending("waiting")) },
                || {
                    let n = polls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if n >= 2 {
                            Some("crash loop".to_string())
                        } else {
                            None
                        }
                    }
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PodFailure(_)));
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn check_error_is_terminal() {
        let err = waiter()
            .wait("test", || async {
                Err(Error::configuration("topology gone"))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn wait_without_fail_fast_completes() {
        waiter()
            .wait("test", || async { Ok(StageStatus::ready("ok")) })
            .await
            .unwrap();
    }
}
