//! Endpoint reachability using reqwest.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

use reqwest::blocking::Client;
use url::Url;

use crate::adapters::process_runner::POLL_INTERVAL;
use crate::domain::probe::format_duration;
use crate::domain::{AppError, ProbeLimits, ProbeOutcome};
use crate::ports::EndpointPort;

/// Any HTTP answer below 500, including auth rejections, proves the endpoint is reachable.
#[derive(Debug, Clone, Default)]
pub struct HttpEndpointAdapter;

impl HttpEndpointAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl EndpointPort for HttpEndpointAdapter {
    fn check(
        &self,
        name: &str,
        url: &Url,
        limits: &ProbeLimits,
    ) -> Result<ProbeOutcome, AppError> {
        if limits.cancel.is_cancelled() {
            return Ok(ProbeOutcome::unavailable(name, "cancelled"));
        }

        let client = Client::builder()
            .timeout(limits.timeout)
            .build()
            .map_err(|e| AppError::config_error(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(probe = name, host = url.host_str().unwrap_or_default(), "checking endpoint");
        let request = client.get(url.clone());
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(request.send().map(|response| response.status()));
        });

        let result = loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(result) => break result,
                Err(RecvTimeoutError::Timeout) if limits.cancel.is_cancelled() => {
                    return Ok(ProbeOutcome::unavailable(name, "cancelled"));
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Ok(ProbeOutcome::failed(name, "request ended without a response"));
                }
            }
        };

        let outcome = match result {
            Ok(status) if status.is_server_error() => {
                ProbeOutcome::failed(name, format!("HTTP {}", status.as_u16()))
            }
            Ok(status) => ProbeOutcome::ok(name, format!("HTTP {}", status.as_u16())),
            Err(_) if limits.cancel.is_cancelled() => ProbeOutcome::unavailable(name, "cancelled"),
            Err(err) if err.is_timeout() => ProbeOutcome::failed(
                name,
                format!("timed out after {}", format_duration(limits.timeout)),
            ),
            Err(err) if err.is_connect() => {
                ProbeOutcome::failed(name, "connection refused or host unreachable")
            }
            Err(err) => ProbeOutcome::failed(name, err.without_url().to_string()),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CancelToken, ProbeStatus};
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    fn limits() -> ProbeLimits {
        ProbeLimits::new(Duration::from_secs(5), CancelToken::new())
    }

    #[test]
    fn auth_rejection_counts_as_reachable() {
        let mut server = mockito::Server::new();
        let mock = server.mock("GET", "/rest/v1/").with_status(401).create();
        let url = Url::parse(&format!("{}/rest/v1/", server.url())).unwrap();

        let outcome = HttpEndpointAdapter::new().check("endpoint:SUPABASE_URL", &url, &limits()).unwrap();

        mock.assert();
        assert_eq!(outcome.status, ProbeStatus::Ok);
        assert_eq!(outcome.detail, "HTTP 401");
    }

    #[test]
    fn server_errors_fail_the_probe() {
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/").with_status(503).create();
        let url = Url::parse(&server.url()).unwrap();

        let outcome = HttpEndpointAdapter::new().check("endpoint:API_URL", &url, &limits()).unwrap();
        assert_eq!(outcome.status, ProbeStatus::Failed);
        assert_eq!(outcome.detail, "HTTP 503");
    }

    #[test]
    fn cancelled_run_skips_request() {
        let limits = limits();
        limits.cancel.cancel();
        let url = Url::parse("http://127.0.0.1:9/").unwrap();

        let outcome = HttpEndpointAdapter::new().check("endpoint:API_URL", &url, &limits).unwrap();
        assert_eq!(outcome.status, ProbeStatus::Unavailable);
    }

    #[test]
    fn cancellation_interrupts_request_in_flight() {
        // The kernel completes the handshake, but nothing ever answers.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
        let limits = ProbeLimits::new(Duration::from_secs(3), CancelToken::new());
        let token = limits.cancel.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            token.cancel();
        });

        let started = Instant::now();
        let outcome = HttpEndpointAdapter::new().check("endpoint:API_URL", &url, &limits).unwrap();
        canceller.join().unwrap();

        assert_eq!(outcome.status, ProbeStatus::Unavailable);
        assert_eq!(outcome.detail, "cancelled");
        assert!(started.elapsed() < Duration::from_secs(1));
        drop(listener);
    }
}
