//! Checks that the mock driver behaves like the contract it stands in for.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pgsql_client::{ConnStatus, Driver, RawConnection};
use pgsql_testing::MockDriver;

#[test]
fn connect_parses_target_parameters() {
    let driver = MockDriver::new();
    let conn = driver
        .connect("host=db9 port=6000 user=svc password=hunter2 dbname=ledger")
        .unwrap();

    assert_eq!(conn.host(), "db9");
    assert_eq!(conn.port(), "6000");
    assert_eq!(conn.user(), "svc");
    assert_eq!(conn.db(), "ledger");
    // Passwords never come back out of a session.
    assert_eq!(conn.options(), "");
}

#[test]
fn connect_falls_back_to_defaults() {
    let driver = MockDriver::new();
    let conn = driver.connect("").unwrap();

    assert_eq!(conn.host(), "localhost");
    assert_eq!(conn.port(), "5432");
    assert_eq!(conn.user(), "postgres");
    assert_eq!(conn.db(), "postgres");
}

#[test]
fn fail_next_affects_exactly_one_connect() {
    let driver = MockDriver::new();
    driver.fail_next("boom");

    assert!(driver.connect("host=a").is_err());
    assert!(driver.connect("host=a").is_ok());
    assert_eq!(driver.connects(), 2);
}

#[test]
fn bad_next_yields_a_half_open_session() {
    let driver = MockDriver::new();
    driver.bad_next("no pg_hba.conf entry");

    let conn = driver.connect("host=a").unwrap();
    assert_eq!(conn.status(), ConnStatus::Bad);
    assert_eq!(conn.error_message(), "no pg_hba.conf entry");
}

#[test]
fn close_makes_the_session_report_bad() {
    let driver = MockDriver::new();
    let mut conn = driver.connect("host=a").unwrap();

    assert_eq!(conn.status(), ConnStatus::Ok);
    conn.close();
    assert_eq!(conn.status(), ConnStatus::Bad);
    assert!(driver.connection(0).unwrap().is_closed());
}

#[test]
fn control_scripts_health_of_a_live_session() {
    let driver = MockDriver::new();
    let conn = driver.connect("host=a").unwrap();

    driver.connection(0).unwrap().set_status(ConnStatus::InProgress);
    assert_eq!(conn.status(), ConnStatus::InProgress);
    assert!(conn.status().is_usable());
}

#[test]
fn notice_handler_receives_emitted_notices() {
    let driver = MockDriver::new();
    let mut conn = driver.connect("host=a").unwrap();

    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&seen);
    conn.set_notice_handler(Box::new(move |message| {
        sink.lock().push(message.to_owned());
    }));

    let control = driver.connection(0).unwrap();
    control.emit_notice("NOTICE: one");
    control.emit_notice("NOTICE: two");

    assert_eq!(seen.lock().join(","), "NOTICE: one,NOTICE: two");
}

#[test]
fn reset_revives_a_closed_session() {
    let driver = MockDriver::new();
    let mut conn = driver.connect("host=a").unwrap();

    conn.close();
    conn.reset();
    assert_eq!(conn.status(), ConnStatus::Ok);
    assert_eq!(driver.connection(0).unwrap().resets(), 1);
}

#[test]
fn nonblocking_busy_and_cancel_accounting() {
    let driver = MockDriver::new();
    let mut conn = driver.connect("host=a").unwrap();
    let control = driver.connection(0).unwrap();

    assert!(!conn.is_nonblocking());
    conn.set_nonblocking(true);
    assert!(control.is_nonblocking());

    control.set_busy(true);
    assert!(conn.is_busy());

    assert!(conn.cancel_request());
    assert_eq!(control.cancel_requests(), 1);
    assert!(conn.consume_input());
}
