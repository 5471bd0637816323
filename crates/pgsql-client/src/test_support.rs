//! In-crate fake connection for unit tests.

use crate::connection::{ConnStatus, NoticeHandler, RawConnection};

/// Minimal scripted session used by the unit tests in this crate.
///
/// The full-featured mock lives in `pgsql-testing`; this crate keeps its own
/// fake to avoid a dev-dependency cycle with its dependents.
pub(crate) struct FakeConn {
    pub status: ConnStatus,
    pub nonblocking: bool,
    pub closed: bool,
    pub busy: bool,
}

impl Default for FakeConn {
    fn default() -> Self {
        Self {
            status: ConnStatus::Ok,
            nonblocking: false,
            closed: false,
            busy: false,
        }
    }
}

impl RawConnection for FakeConn {
    fn status(&self) -> ConnStatus {
        if self.closed { ConnStatus::Bad } else { self.status }
    }

    fn error_message(&self) -> String {
        String::new()
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn db(&self) -> String {
        "appdb".to_owned()
    }

    fn user(&self) -> String {
        "tester".to_owned()
    }

    fn host(&self) -> String {
        "localhost".to_owned()
    }

    fn port(&self) -> String {
        "5432".to_owned()
    }

    fn options(&self) -> String {
        String::new()
    }

    fn parameter_status(&self, name: &str) -> Option<String> {
        (name == "server_version").then(|| "16.3".to_owned())
    }

    fn set_notice_handler(&mut self, handler: NoticeHandler) {
        drop(handler);
    }

    fn is_nonblocking(&self) -> bool {
        self.nonblocking
    }

    fn set_nonblocking(&mut self, nonblocking: bool) {
        self.nonblocking = nonblocking;
    }

    fn consume_input(&mut self) -> bool {
        !self.closed
    }

    fn is_busy(&self) -> bool {
        self.busy
    }

    fn cancel_request(&mut self) -> bool {
        !self.closed
    }

    fn reset(&mut self) {
        self.closed = false;
        self.status = ConnStatus::Ok;
    }
}
