mod common;

use common::{ctx, ok, probe, running, traced_blackboard, World};
use sim_bt::{BtStatus, Node, NodeState, Sequence};
use sim_tools::TRACE_LOG;

#[test]
fn initialize_runs_once_per_activation_and_terminate_once_per_exit() {
    let mut world = World::default();
    let mut bb = traced_blackboard();
    let mut node = probe(
        "p",
        vec![BtStatus::Running, BtStatus::Success, BtStatus::Failure],
    );

    assert_eq!(node.tick(&ctx(0), 1, &mut world, &mut bb), BtStatus::Running);
    assert_eq!(node.state(), NodeState::Running);
    assert_eq!(node.tick(&ctx(1), 1, &mut world, &mut bb), BtStatus::Success);
    assert_eq!(node.state(), NodeState::Waiting);
    assert_eq!(node.tick(&ctx(2), 1, &mut world, &mut bb), BtStatus::Failure);

    assert_eq!(
        world.calls,
        vec![
            "init:p",
            "update:p",
            "update:p",
            "term:p:Success",
            "init:p",
            "update:p",
            "term:p:Failure",
        ]
    );

    let log = bb.get(TRACE_LOG).expect("trace log installed");
    assert_eq!(log.count("bt.node.init", "p"), 2);
    assert_eq!(log.count("bt.node.exit", "p"), 2);
}

#[test]
fn request_terminate_is_idempotent() {
    let mut world = World::default();
    let mut bb = traced_blackboard();
    let mut node = running("p");

    node.tick(&ctx(0), 1, &mut world, &mut bb);
    node.request_terminate(&ctx(0), 1, &mut world, &mut bb);
    node.request_terminate(&ctx(0), 1, &mut world, &mut bb);

    assert_eq!(world.count("term:p:Aborted"), 1);
    assert!(!node.is_running());

    let log = bb.get(TRACE_LOG).expect("trace log installed");
    let exits: Vec<_> = log.matching("bt.node.exit", "p").map(|e| e.a).collect();
    assert_eq!(exits, vec![2]);
}

#[test]
fn request_terminate_on_idle_node_is_a_no_op() {
    let mut world = World::default();
    let mut bb = traced_blackboard();
    let mut node = ok("p");

    node.request_terminate(&ctx(0), 1, &mut world, &mut bb);
    assert!(world.calls.is_empty());
}

#[test]
fn aborting_a_container_terminates_active_children_first() {
    let mut world = World::default();
    let mut bb = traced_blackboard();
    let mut root = Node::new("root", Sequence::new(vec![ok("a"), running("b"), ok("c")]));

    for tick in 0..3 {
        root.tick(&ctx(tick), 1, &mut world, &mut bb);
    }
    root.request_terminate(&ctx(3), 1, &mut world, &mut bb);

    let log = bb.get(TRACE_LOG).expect("trace log installed");
    let exits: Vec<_> = log
        .events
        .iter()
        .filter(|e| e.tag == "bt.node.exit")
        .map(|e| (e.label.as_ref(), e.a))
        .collect();
    // `a` finished normally, `b` aborted before its parent, `c` never started.
    assert_eq!(exits, vec![("a", 0), ("b", 2), ("root", 2)]);
    assert_eq!(world.count("init:c"), 0);
}

#[test]
fn restart_after_terminal_status_reinitializes() {
    let mut world = World::default();
    let mut bb = traced_blackboard();
    let mut root = Node::new("root", Sequence::new(vec![ok("a"), ok("b")]));

    assert_eq!(root.tick(&ctx(0), 1, &mut world, &mut bb), BtStatus::Running);
    assert_eq!(root.tick(&ctx(1), 1, &mut world, &mut bb), BtStatus::Success);
    assert_eq!(root.tick(&ctx(2), 1, &mut world, &mut bb), BtStatus::Running);

    let log = bb.get(TRACE_LOG).expect("trace log installed");
    assert_eq!(log.count("bt.node.init", "root"), 2);
    assert_eq!(log.count("bt.node.init", "a"), 2);
    assert_eq!(log.count("bt.node.init", "b"), 1);
}
