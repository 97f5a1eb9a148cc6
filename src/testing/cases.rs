//! Test case definitions

use crate::janus::RequestKind;

/// A single request/reply test case
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Human-readable name shown in the report
    pub name: String,
    /// Request kind to send
    pub kind: RequestKind,
    /// Transaction token, unique within the run
    pub transaction: String,
    /// Reply kind that counts as success
    pub expect: String,
    /// Extract `data.id` from the reply and keep it as the run's session
    pub captures_session: bool,
    /// Send the captured session as the request target
    pub session_scoped: bool,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        kind: RequestKind,
        transaction: impl Into<String>,
        expect: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            transaction: transaction.into(),
            expect: expect.into(),
            captures_session: false,
            session_scoped: false,
        }
    }

    /// Mark this case as the one that creates the run's session
    pub fn capturing_session(mut self) -> Self {
        self.captures_session = true;
        self
    }

    /// Mark this case as needing the session created earlier in the run
    pub fn scoped_to_session(mut self) -> Self {
        self.session_scoped = true;
        self
    }
}

/// The standard probe: server info, then session creation
pub fn default_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("Get server info", RequestKind::Info, "test-info", "server_info"),
        TestCase::new("Create session", RequestKind::Create, "test-create", "success")
            .capturing_session(),
    ]
}
