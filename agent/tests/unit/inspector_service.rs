//! Unit tests for `ConnectionInspector`.

use wakehost_agent::application::ConnectionInspector;

use crate::mocks::{ScriptedRunner, failed, ok};

const TWO_SESSIONS: &str = "0      0      192.168.1.1:22      10.0.0.5:51000\n\
                            0      0      192.168.1.1:22      10.0.0.6:51010\n";

#[tokio::test]
async fn lists_established_connections_on_port() {
    let runner = ScriptedRunner::new(vec![ok(TWO_SESSIONS)]);
    let inspector = ConnectionInspector::new(runner.clone(), 22);

    let conns = inspector.list_established().await;

    assert_eq!(conns.len(), 2);
    assert_eq!(conns[0].remote_address, "10.0.0.5");
    assert_eq!(conns[0].remote_port, 51000);
    assert_eq!(conns[1].remote_address, "10.0.0.6");
    assert_eq!(conns[1].remote_port, 51010);
    assert_eq!(
        runner.calls(),
        vec![vec![
            "ss",
            "-H",
            "-t",
            "-n",
            "state",
            "established",
            "( sport = :22 )"
        ]]
    );
}

#[tokio::test]
async fn uses_configured_port_in_filter() {
    let runner = ScriptedRunner::new(vec![ok("")]);
    let inspector = ConnectionInspector::new(runner.clone(), 2222);

    assert!(inspector.list_established().await.is_empty());
    assert_eq!(runner.calls()[0].last().unwrap(), "( sport = :2222 )");
}

#[tokio::test]
async fn failing_command_yields_empty_list() {
    let runner = ScriptedRunner::new(vec![failed("ss: permission denied")]);
    let inspector = ConnectionInspector::new(runner.clone(), 22);

    assert!(inspector.list_established().await.is_empty());
    assert_eq!(runner.calls().len(), 1);
}
