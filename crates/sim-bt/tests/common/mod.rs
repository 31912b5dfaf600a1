#![allow(dead_code)]

use sim_bt::{BtNode, BtStatus, Exit, Node};
use sim_core::{Blackboard, TickContext, WorldMut, WorldView};
use sim_tools::{TraceLog, TRACE_LOG};

/// Records every lifecycle call made on probe nodes.
#[derive(Debug, Default)]
pub struct World {
    pub calls: Vec<String>,
}

impl WorldView for World {
    type Agent = u64;
}

impl WorldMut for World {}

impl World {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == call).count()
    }
}

/// Leaf that replays a status script, holding on the last entry once exhausted.
pub struct Probe {
    name: &'static str,
    script: Vec<BtStatus>,
    step: usize,
}

impl Probe {
    pub fn new(name: &'static str, script: Vec<BtStatus>) -> Self {
        assert!(!script.is_empty());
        Self {
            name,
            script,
            step: 0,
        }
    }
}

impl BtNode<World> for Probe {
    fn initialize(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut World,
        _bb: &mut Blackboard,
    ) {
        world.calls.push(format!("init:{}", self.name));
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut World,
        _bb: &mut Blackboard,
    ) -> BtStatus {
        world.calls.push(format!("update:{}", self.name));
        let status = self.script[self.step.min(self.script.len() - 1)];
        self.step += 1;
        status
    }

    fn terminate(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut World,
        _bb: &mut Blackboard,
        exit: Exit,
    ) {
        world.calls.push(format!("term:{}:{exit:?}", self.name));
    }
}

pub fn probe(name: &'static str, script: Vec<BtStatus>) -> Node<World> {
    Node::new(name, Probe::new(name, script))
}

pub fn ok(name: &'static str) -> Node<World> {
    probe(name, vec![BtStatus::Success])
}

pub fn fail(name: &'static str) -> Node<World> {
    probe(name, vec![BtStatus::Failure])
}

pub fn running(name: &'static str) -> Node<World> {
    probe(name, vec![BtStatus::Running])
}

pub fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.1, 7)
}

pub fn traced_blackboard() -> Blackboard {
    let mut bb = Blackboard::new();
    bb.set(TRACE_LOG, TraceLog::default());
    bb
}

/// Tick `node` until it leaves the running state or `limit` ticks pass.
pub fn run(
    node: &mut Node<World>,
    world: &mut World,
    bb: &mut Blackboard,
    limit: u64,
) -> (BtStatus, u64) {
    for tick in 0..limit {
        let status = node.tick(&ctx(tick), 1, world, bb);
        if status != BtStatus::Running {
            return (status, tick + 1);
        }
    }
    (BtStatus::Running, limit)
}
