//! Test runner implementation
//!
//! Sends each case's request over the connection, decodes the reply and
//! checks it against the case's expectations. The first failing case
//! stops the run; the cases after it are reported as skipped.

use colored::Colorize;

use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::connection::Connection;
use crate::janus::{decode_response, encode_request, Request, Response, SessionId};
use crate::transport::{Endpoint, Transport, ZmqTransport};

use super::cases::{default_cases, TestCase};

/// Verdict for a single case
#[derive(Debug)]
pub enum Verdict {
    Passed,
    Failed(Error),
    /// Not run because an earlier case failed
    Skipped,
}

impl Verdict {
    /// Short label: `passed`, `skipped`, or the failure class
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Passed => "passed",
            Verdict::Failed(e) => e.name(),
            Verdict::Skipped => "skipped",
        }
    }
}

/// Outcome of one case
#[derive(Debug)]
pub struct CaseOutcome {
    pub name: String,
    pub transaction: String,
    pub verdict: Verdict,
}

/// Result of a whole run
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<CaseOutcome>,
    /// Session created during the run, if any
    pub session: Option<SessionId>,
}

impl RunReport {
    /// True iff every case ran and passed
    pub fn passed(&self) -> bool {
        self.outcomes
            .iter()
            .all(|o| matches!(o.verdict, Verdict::Passed))
    }

    /// The first failing case and its error
    pub fn failure(&self) -> Option<(&CaseOutcome, &Error)> {
        self.outcomes.iter().find_map(|o| match &o.verdict {
            Verdict::Failed(e) => Some((o, e)),
            _ => None,
        })
    }

    /// Verdict labels in case order
    pub fn labels(&self) -> Vec<&'static str> {
        self.outcomes.iter().map(|o| o.verdict.label()).collect()
    }
}

/// Connect to the configured endpoint and run the standard cases
///
/// The socket is released before returning, whatever the outcome.
pub async fn run_probe(config: &Config, verbose: bool) -> Result<RunReport> {
    let endpoint: Endpoint = config.connection.endpoint.parse()?;

    println!("{}", "Testing Janus ZeroMQ Transport...".blue().bold());

    let mut connection: Connection<ZmqTransport> = Connection::new();
    connection.configure_timeout(config.receive_timeout());
    connection.open(&endpoint).await?;

    println!("  {} Connected to {}", "✓".green(), endpoint);

    let report = run_cases(&mut connection, &default_cases(), verbose).await;
    connection.close().await;

    Ok(report)
}

/// Run `cases` in order over an open connection
pub async fn run_cases<T: Transport>(
    connection: &mut Connection<T>,
    cases: &[TestCase],
    verbose: bool,
) -> RunReport {
    let mut report = RunReport::default();
    let mut failed = false;

    for (i, case) in cases.iter().enumerate() {
        let case_num = i + 1;

        if failed {
            println!(
                "\n  {} Test {}: {} (skipped)",
                "-".dimmed(),
                case_num,
                case.name.dimmed()
            );
            report.outcomes.push(outcome(case, Verdict::Skipped));
            continue;
        }

        println!(
            "\n{} {}",
            format!("Test {}:", case_num).cyan(),
            case.name.white().bold()
        );

        let verdict = match execute_case(connection, case, report.session.as_ref(), verbose).await
        {
            Ok(Some(session)) => {
                println!("  {} Session created: {}", "✓".green(), session);
                report.session = Some(session);
                Verdict::Passed
            }
            Ok(None) => {
                println!(
                    "  {} Received '{}' reply",
                    "✓".green(),
                    case.expect.dimmed()
                );
                Verdict::Passed
            }
            Err(e) => {
                println!("  {} {}: {}", "✗".red(), e.name().red(), e);
                failed = true;
                Verdict::Failed(e)
            }
        };
        report.outcomes.push(outcome(case, verdict));
    }

    if report.passed() {
        println!("\n{} {}\n", "✓".green().bold(), "All tests passed!".green().bold());
    } else if let Some((case, _)) = report.failure() {
        println!(
            "\n{} {} {}\n",
            "✗".red().bold(),
            "Failed at:".red().bold(),
            case.name
        );
    }

    report
}

fn outcome(case: &TestCase, verdict: Verdict) -> CaseOutcome {
    CaseOutcome {
        name: case.name.clone(),
        transaction: case.transaction.clone(),
        verdict,
    }
}

/// Execute a single case, returning the session it created, if any
async fn execute_case<T: Transport>(
    connection: &mut Connection<T>,
    case: &TestCase,
    session: Option<&SessionId>,
    verbose: bool,
) -> Result<Option<SessionId>> {
    let request = if case.session_scoped {
        let session = session.cloned().ok_or_else(|| {
            Error::MissingField("session id (no session was created earlier in the run)".into())
        })?;
        Request::scoped(case.kind, case.transaction.as_str(), session)
    } else {
        Request::new(case.kind, case.transaction.as_str())
    };

    let bytes = encode_request(&request)?;
    if verbose {
        println!("  Sending: {}", serde_json::to_string_pretty(&request)?);
    }

    tracing::debug!(kind = %case.kind, transaction = %case.transaction, "Sending request");
    let reply = connection.exchange(&bytes).await?;

    if verbose {
        println!("  Response: {}", pretty_reply(&reply));
    }
    let response = decode_response(&reply)?;

    validate_response(case, &response)
}

/// Pretty JSON when the reply parses, the raw text otherwise
fn pretty_reply(reply: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(reply)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(reply).into_owned())
}

/// Check a decoded reply against the case's expectations
pub fn validate_response(case: &TestCase, response: &Response) -> Result<Option<SessionId>> {
    if response.transaction.as_deref() != Some(case.transaction.as_str()) {
        tracing::warn!(
            expected = %case.transaction,
            actual = ?response.transaction,
            "Reply does not belong to the outstanding request"
        );
        return Err(Error::correlation(
            &case.transaction,
            response.transaction.as_deref(),
        ));
    }

    if response.kind != case.expect {
        let detail = response.server_error().map(|e| e.to_string());
        return Err(Error::unexpected_response(&case.expect, &response.kind, detail));
    }

    if case.captures_session {
        return response
            .session_id()
            .map(Some)
            .ok_or_else(|| Error::MissingField("data.id".to_string()));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::janus::RequestKind;
    use crate::transport::mock::MockTransport;
    use std::time::Duration;

    fn reply_with(body: &'static str) -> MockTransport {
        MockTransport::new(move |_| Some(body.to_string()))
    }

    /// Peer that answers `info` normally and `create` with `create_reply`
    fn create_replies(create_reply: &'static str) -> MockTransport {
        MockTransport::new(move |request| {
            let tx = request["transaction"].as_str().unwrap_or_default();
            match request["janus"].as_str() {
                Some("info") => Some(format!(
                    r#"{{"janus":"server_info","transaction":"{tx}"}}"#
                )),
                _ => Some(create_reply.to_string()),
            }
        })
    }

    async fn run_default(transport: MockTransport) -> RunReport {
        let mut connection = Connection::from_transport(transport);
        run_cases(&mut connection, &default_cases(), false).await
    }

    #[tokio::test]
    async fn test_healthy_peer_passes_and_captures_session() {
        let transport = MockTransport::janus();
        let sent = transport.sent();

        let report = run_default(transport).await;

        assert!(report.passed());
        assert_eq!(report.labels(), ["passed", "passed"]);
        assert_eq!(report.session, Some(SessionId::Text("abc123".into())));

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0], serde_json::json!({"janus": "info", "transaction": "test-info"}));
        assert_eq!(
            sent[1],
            serde_json::json!({"janus": "create", "transaction": "test-create"})
        );
    }

    #[tokio::test]
    async fn test_server_info_case_passes() {
        let mut connection = Connection::from_transport(reply_with(
            r#"{"janus":"server_info","transaction":"t1","version":1300}"#,
        ));
        let cases = [TestCase::new("info", RequestKind::Info, "t1", "server_info")];

        let report = run_cases(&mut connection, &cases, false).await;
        assert!(report.passed());
        assert_eq!(report.session, None);
    }

    #[tokio::test]
    async fn test_create_session_case_captures_id() {
        let mut connection = Connection::from_transport(reply_with(
            r#"{"janus":"success","transaction":"t2","data":{"id":"abc123"}}"#,
        ));
        let cases =
            [TestCase::new("create", RequestKind::Create, "t2", "success").capturing_session()];

        let report = run_cases(&mut connection, &cases, false).await;
        assert!(report.passed());
        assert_eq!(report.session.unwrap().to_string(), "abc123");
    }

    #[tokio::test]
    async fn test_error_reply_is_unexpected_response() {
        let report =
            run_default(create_replies(r#"{"janus":"error","transaction":"test-create"}"#)).await;

        assert!(!report.passed());
        let (case, err) = report.failure().unwrap();
        assert_eq!(case.name, "Create session");
        match err {
            Error::UnexpectedResponse { expected, actual, .. } => {
                assert_eq!(expected, "success");
                assert_eq!(actual, "error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(report.session, None);
    }

    #[tokio::test]
    async fn test_error_reply_details_reach_diagnostics() {
        let report = run_default(create_replies(
            r#"{"janus":"error","transaction":"test-create","error":{"code":403,"reason":"Unauthorized request"}}"#,
        ))
        .await;
        let (_, err) = report.failure().unwrap();
        assert!(err.to_string().contains("403: Unauthorized request"), "{err}");
    }

    #[tokio::test]
    async fn test_wrong_transaction_is_correlation_error_even_on_success_kind() {
        let transport = reply_with(r#"{"janus":"server_info","transaction":"wrong"}"#);
        let sent = transport.sent();

        let report = run_default(transport).await;

        assert_eq!(report.labels(), ["CorrelationError", "skipped"]);
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reply_without_transaction_is_correlation_error() {
        let report = run_default(reply_with(
            r#"{"janus":"error","error":{"code":498,"reason":"Invalid JSON"}}"#,
        ))
        .await;
        assert_eq!(report.labels(), ["CorrelationError", "skipped"]);
    }

    #[tokio::test]
    async fn test_missing_kind_is_decode_error() {
        let report = run_default(reply_with(r#"{"transaction":"test-info"}"#)).await;
        assert_eq!(report.labels(), ["DecodeError", "skipped"]);

        let report = run_default(reply_with(r#"{"janus":1,"transaction":"test-info"}"#)).await;
        assert_eq!(report.labels(), ["DecodeError", "skipped"]);
    }

    #[tokio::test]
    async fn test_garbage_reply_is_decode_error() {
        let report = run_default(reply_with("this is not json")).await;
        assert_eq!(report.labels(), ["DecodeError", "skipped"]);
    }

    #[tokio::test]
    async fn test_missing_session_id_is_missing_field() {
        let report = run_default(create_replies(
            r#"{"janus":"success","transaction":"test-create","data":{}}"#,
        ))
        .await;
        assert_eq!(report.labels(), ["passed", "MissingFieldError"]);
    }

    #[tokio::test]
    async fn test_timeout_fails_case_and_skips_rest() {
        let transport = MockTransport::new(|_| None);
        let sent = transport.sent();
        let mut connection = Connection::from_transport(transport);
        connection.configure_timeout(Duration::from_millis(100));

        let report = run_cases(&mut connection, &default_cases(), false).await;

        assert_eq!(report.labels(), ["TimeoutError", "skipped"]);
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scoped_case_carries_captured_session() {
        let transport = MockTransport::janus();
        let sent = transport.sent();
        let mut connection = Connection::from_transport(transport);

        let mut cases = default_cases();
        cases.push(
            TestCase::new("Session info", RequestKind::Info, "test-scoped", "server_info")
                .scoped_to_session(),
        );

        let report = run_cases(&mut connection, &cases, false).await;
        assert!(report.passed());
        assert_eq!(sent.lock().unwrap()[2]["session_id"], "abc123");
    }

    #[tokio::test]
    async fn test_scoped_case_without_session_never_hits_the_wire() {
        let transport = MockTransport::janus();
        let sent = transport.sent();
        let mut connection = Connection::from_transport(transport);

        let cases = [
            TestCase::new("Session info", RequestKind::Info, "test-scoped", "server_info")
                .scoped_to_session(),
        ];

        let report = run_cases(&mut connection, &cases, false).await;
        assert_eq!(report.labels(), ["MissingFieldError"]);
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reruns_against_fresh_peers_agree() {
        let first = run_default(MockTransport::janus()).await;
        let second = run_default(MockTransport::janus()).await;
        assert_eq!(first.labels(), second.labels());
        assert_eq!(first.session, second.session);

        let first = run_default(reply_with(r#"{"janus":"ack","transaction":"test-info"}"#)).await;
        let second = run_default(reply_with(r#"{"janus":"ack","transaction":"test-info"}"#)).await;
        assert_eq!(first.labels(), ["UnexpectedResponseError", "skipped"]);
        assert_eq!(first.labels(), second.labels());
    }

    #[test]
    fn test_empty_report_passes() {
        assert!(RunReport::default().passed());
    }
}
