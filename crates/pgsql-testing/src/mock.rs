//! Scripted driver and connection mocks.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use pgsql_client::{ConnStatus, Driver, Error, NoticeHandler, RawConnection};

/// Session metadata derived from the target's key=value pairs.
///
/// Only the keys a real session would report back are kept; anything else
/// (passwords included) is dropped, which makes credential stripping
/// observable in tests.
#[derive(Debug, Clone)]
struct TargetParams {
    host: String,
    port: String,
    user: String,
    db: String,
    options: String,
}

impl TargetParams {
    fn parse(target: &str) -> Self {
        let mut params = Self {
            host: "localhost".to_owned(),
            port: "5432".to_owned(),
            user: "postgres".to_owned(),
            db: "postgres".to_owned(),
            options: String::new(),
        };
        for pair in target.split_whitespace() {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "host" => params.host = value.to_owned(),
                "port" => params.port = value.to_owned(),
                "user" => params.user = value.to_owned(),
                "dbname" => params.db = value.to_owned(),
                "options" => params.options = value.to_owned(),
                _ => {}
            }
        }
        params
    }
}

struct ConnState {
    status: ConnStatus,
    error_message: String,
    closed: bool,
    nonblocking: bool,
    busy: bool,
    cancel_requests: u64,
    resets: u64,
    notice_handler: Option<NoticeHandler>,
    parameters: HashMap<String, String>,
}

impl ConnState {
    fn new(status: ConnStatus, error_message: String) -> Self {
        let mut parameters = HashMap::new();
        parameters.insert("server_version".to_owned(), "16.3".to_owned());
        parameters.insert("client_encoding".to_owned(), "UTF8".to_owned());
        Self {
            status,
            error_message,
            closed: false,
            nonblocking: false,
            busy: false,
            cancel_requests: 0,
            resets: 0,
            notice_handler: None,
            parameters,
        }
    }
}

/// Remote control over one mock session.
///
/// Stays valid after the session has been handed to a pool or closed, so
/// tests can script failures mid-lifecycle and assert on the aftermath.
#[derive(Clone)]
pub struct ConnControl {
    id: u64,
    state: Arc<Mutex<ConnState>>,
}

impl ConnControl {
    /// Identifier of the session, in the order the driver opened them.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Script the health the session reports from now on.
    pub fn set_status(&self, status: ConnStatus) {
        self.state.lock().status = status;
    }

    /// Whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Whether the session is currently in non-blocking mode.
    #[must_use]
    pub fn is_nonblocking(&self) -> bool {
        self.state.lock().nonblocking
    }

    /// Script whether the session reports itself busy.
    pub fn set_busy(&self, busy: bool) {
        self.state.lock().busy = busy;
    }

    /// Number of cancel requests the session has received.
    #[must_use]
    pub fn cancel_requests(&self) -> u64 {
        self.state.lock().cancel_requests
    }

    /// Number of resets the session has been through.
    #[must_use]
    pub fn resets(&self) -> u64 {
        self.state.lock().resets
    }

    /// Set a server parameter visible through `parameter_status`.
    pub fn set_parameter(&self, name: &str, value: &str) {
        self.state
            .lock()
            .parameters
            .insert(name.to_owned(), value.to_owned());
    }

    /// Deliver a server notice to whatever handler is installed.
    pub fn emit_notice(&self, message: &str) {
        let mut state = self.state.lock();
        if let Some(handler) = state.notice_handler.as_mut() {
            handler(message);
        }
    }
}

/// One scripted session handed out by [`MockDriver`].
pub struct MockConnection {
    id: u64,
    params: TargetParams,
    state: Arc<Mutex<ConnState>>,
}

impl MockConnection {
    /// Identifier of the session, in the order the driver opened them.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl RawConnection for MockConnection {
    fn status(&self) -> ConnStatus {
        let state = self.state.lock();
        if state.closed { ConnStatus::Bad } else { state.status }
    }

    fn error_message(&self) -> String {
        self.state.lock().error_message.clone()
    }

    fn close(&mut self) {
        self.state.lock().closed = true;
    }

    fn db(&self) -> String {
        self.params.db.clone()
    }

    fn user(&self) -> String {
        self.params.user.clone()
    }

    fn host(&self) -> String {
        self.params.host.clone()
    }

    fn port(&self) -> String {
        self.params.port.clone()
    }

    fn options(&self) -> String {
        self.params.options.clone()
    }

    fn parameter_status(&self, name: &str) -> Option<String> {
        self.state.lock().parameters.get(name).cloned()
    }

    fn set_notice_handler(&mut self, handler: NoticeHandler) {
        self.state.lock().notice_handler = Some(handler);
    }

    fn is_nonblocking(&self) -> bool {
        self.state.lock().nonblocking
    }

    fn set_nonblocking(&mut self, nonblocking: bool) {
        self.state.lock().nonblocking = nonblocking;
    }

    fn consume_input(&mut self) -> bool {
        !self.state.lock().closed
    }

    fn is_busy(&self) -> bool {
        self.state.lock().busy
    }

    fn cancel_request(&mut self) -> bool {
        let mut state = self.state.lock();
        state.cancel_requests += 1;
        !state.closed
    }

    fn reset(&mut self) {
        let mut state = self.state.lock();
        state.resets += 1;
        state.closed = false;
        state.status = ConnStatus::Ok;
    }
}

#[derive(Default)]
struct DriverState {
    connects: u64,
    fail_next: Option<String>,
    bad_next: Option<String>,
    conns: Vec<ConnControl>,
}

/// Scripted stand-in for the external client library.
///
/// Clones share state, so the clone given to a pool and the clone kept by
/// the test observe the same sessions.
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<DriverState>>,
}

impl MockDriver {
    /// Create a driver with no scripted failures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next connect attempt fail outright with `message`.
    pub fn fail_next(&self, message: &str) {
        self.state.lock().fail_next = Some(message.to_owned());
    }

    /// Make the next connect attempt yield a half-open session that
    /// reports [`ConnStatus::Bad`] and `message` as its error text.
    pub fn bad_next(&self, message: &str) {
        self.state.lock().bad_next = Some(message.to_owned());
    }

    /// Number of connect attempts, including failed ones.
    #[must_use]
    pub fn connects(&self) -> u64 {
        self.state.lock().connects
    }

    /// Controls for every session opened so far, in open order.
    #[must_use]
    pub fn connections(&self) -> Vec<ConnControl> {
        self.state.lock().conns.clone()
    }

    /// Control for the `index`-th session opened, if it exists.
    #[must_use]
    pub fn connection(&self, index: usize) -> Option<ConnControl> {
        self.state.lock().conns.get(index).cloned()
    }
}

impl Driver for MockDriver {
    type Conn = MockConnection;

    fn connect(&self, target: &str) -> Result<MockConnection, Error> {
        let mut state = self.state.lock();
        state.connects += 1;

        if let Some(message) = state.fail_next.take() {
            return Err(Error::Connection(message));
        }

        let (status, error_message) = match state.bad_next.take() {
            Some(message) => (ConnStatus::Bad, message),
            None => (ConnStatus::Ok, String::new()),
        };

        let id = state.conns.len() as u64;
        let conn_state = Arc::new(Mutex::new(ConnState::new(status, error_message)));
        state.conns.push(ConnControl {
            id,
            state: Arc::clone(&conn_state),
        });

        Ok(MockConnection {
            id,
            params: TargetParams::parse(target),
            state: conn_state,
        })
    }
}
