use std::borrow::Cow;
use std::rc::Rc;

use sim_core::{Action, Blackboard, TickContext, WorldMut};

use crate::bt::{BtNode, BtStatus};
use crate::composite::{All, IfThenElse, Parallel, ParallelPolicy, Selector, Sequence};
use crate::decorator::{Inverter, Repeat, Retry, SubTree};
use crate::error::BuildError;
use crate::leaf::{Condition, RunAction, Task};
use crate::node::Node;

pub type LeafFactory<W> = Rc<dyn Fn() -> Box<dyn BtNode<W>>>;

/// Declarative description of a tree.
///
/// A spec is immutable once registered; every instantiation produces an independent node graph
/// with its own per-node state.
pub enum NodeSpec<W>
where
    W: WorldMut + 'static,
{
    Leaf {
        label: Cow<'static, str>,
        make: LeafFactory<W>,
    },
    Sequence(Vec<NodeSpec<W>>),
    Selector(Vec<NodeSpec<W>>),
    All(Vec<NodeSpec<W>>),
    Parallel {
        success: ParallelPolicy,
        failure: ParallelPolicy,
        children: Vec<NodeSpec<W>>,
    },
    /// Condition, then-branch and optional else-branch.
    IfThenElse(Vec<NodeSpec<W>>),
    Inverter(Box<NodeSpec<W>>),
    Repeat(u32, Box<NodeSpec<W>>),
    Retry(u32, Box<NodeSpec<W>>),
    SubTree {
        label: Cow<'static, str>,
        spec: Rc<NodeSpec<W>>,
    },
    /// Reference to another registered script; replaced by `SubTree` at registration.
    Script(Cow<'static, str>),
}

impl<W> NodeSpec<W>
where
    W: WorldMut + 'static,
{
    pub fn leaf(
        label: impl Into<Cow<'static, str>>,
        make: impl Fn() -> Box<dyn BtNode<W>> + 'static,
    ) -> Self {
        NodeSpec::Leaf {
            label: label.into(),
            make: Rc::new(make),
        }
    }

    pub fn condition<F>(label: impl Into<Cow<'static, str>>, cond: F) -> Self
    where
        F: Fn(&TickContext, W::Agent, &W, &Blackboard) -> bool + Clone + 'static,
    {
        Self::leaf(label, move || {
            Box::new(Condition::new(cond.clone())) as Box<dyn BtNode<W>>
        })
    }

    pub fn task<F>(label: impl Into<Cow<'static, str>>, run: F) -> Self
    where
        F: FnMut(&TickContext, W::Agent, &mut W, &mut Blackboard) -> BtStatus + Clone + 'static,
    {
        Self::leaf(label, move || Box::new(Task::new(run.clone())) as Box<dyn BtNode<W>>)
    }

    pub fn action<F>(label: impl Into<Cow<'static, str>>, make: F) -> Self
    where
        F: Fn(&TickContext, W::Agent, &W, &Blackboard) -> Box<dyn Action<W>> + Clone + 'static,
    {
        Self::leaf(label, move || {
            Box::new(RunAction::new(make.clone())) as Box<dyn BtNode<W>>
        })
    }

    pub fn sequence(children: Vec<NodeSpec<W>>) -> Self {
        NodeSpec::Sequence(children)
    }

    pub fn selector(children: Vec<NodeSpec<W>>) -> Self {
        NodeSpec::Selector(children)
    }

    pub fn all(children: Vec<NodeSpec<W>>) -> Self {
        NodeSpec::All(children)
    }

    pub fn parallel(
        success: ParallelPolicy,
        failure: ParallelPolicy,
        children: Vec<NodeSpec<W>>,
    ) -> Self {
        NodeSpec::Parallel {
            success,
            failure,
            children,
        }
    }

    pub fn if_then(condition: NodeSpec<W>, then: NodeSpec<W>) -> Self {
        NodeSpec::IfThenElse(vec![condition, then])
    }

    pub fn if_then_else(condition: NodeSpec<W>, then: NodeSpec<W>, otherwise: NodeSpec<W>) -> Self {
        NodeSpec::IfThenElse(vec![condition, then, otherwise])
    }

    pub fn inverter(child: NodeSpec<W>) -> Self {
        NodeSpec::Inverter(Box::new(child))
    }

    pub fn repeat(count: u32, child: NodeSpec<W>) -> Self {
        NodeSpec::Repeat(count, Box::new(child))
    }

    pub fn retry(attempts: u32, child: NodeSpec<W>) -> Self {
        NodeSpec::Retry(attempts, Box::new(child))
    }

    pub fn script(name: impl Into<Cow<'static, str>>) -> Self {
        NodeSpec::Script(name.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            NodeSpec::Leaf { .. } => "leaf",
            NodeSpec::Sequence(_) => "sequence",
            NodeSpec::Selector(_) => "selector",
            NodeSpec::All(_) => "all",
            NodeSpec::Parallel { .. } => "parallel",
            NodeSpec::IfThenElse(_) => "if_then_else",
            NodeSpec::Inverter(_) => "inverter",
            NodeSpec::Repeat(..) => "repeat",
            NodeSpec::Retry(..) => "retry",
            NodeSpec::SubTree { .. } => "subtree",
            NodeSpec::Script(_) => "script",
        }
    }

    /// Check child counts and decorator parameters over the whole graph.
    pub fn validate(&self) -> Result<(), BuildError> {
        match self {
            NodeSpec::Leaf { .. } => Ok(()),
            NodeSpec::Sequence(children)
            | NodeSpec::Selector(children)
            | NodeSpec::All(children)
            | NodeSpec::Parallel { children, .. } => {
                if children.is_empty() {
                    return Err(BuildError::InvalidChildCount {
                        kind: self.kind(),
                        expected: "at least 1",
                        got: 0,
                    });
                }
                children.iter().try_for_each(NodeSpec::validate)
            }
            NodeSpec::IfThenElse(children) => {
                if !(2..=3).contains(&children.len()) {
                    return Err(BuildError::InvalidChildCount {
                        kind: self.kind(),
                        expected: "2 or 3",
                        got: children.len(),
                    });
                }
                children.iter().try_for_each(NodeSpec::validate)
            }
            NodeSpec::Inverter(child) => child.validate(),
            NodeSpec::Repeat(count, child) | NodeSpec::Retry(count, child) => {
                if *count == 0 {
                    return Err(BuildError::ZeroCount { kind: self.kind() });
                }
                child.validate()
            }
            NodeSpec::SubTree { spec, .. } => spec.validate(),
            NodeSpec::Script(name) => Err(BuildError::UnknownScript(name.to_string())),
        }
    }

    /// Replace every `Script` reference with the sub-tree `lookup` returns for it.
    pub fn resolve<L>(self, lookup: &L) -> Result<Self, BuildError>
    where
        L: Fn(&str) -> Option<Rc<NodeSpec<W>>>,
    {
        let resolve_all = |children: Vec<NodeSpec<W>>| {
            children
                .into_iter()
                .map(|c| c.resolve(lookup))
                .collect::<Result<Vec<_>, _>>()
        };

        Ok(match self {
            NodeSpec::Script(name) => {
                let spec = lookup(name.as_ref())
                    .ok_or_else(|| BuildError::UnknownScript(name.to_string()))?;
                NodeSpec::SubTree { label: name, spec }
            }
            NodeSpec::Sequence(children) => NodeSpec::Sequence(resolve_all(children)?),
            NodeSpec::Selector(children) => NodeSpec::Selector(resolve_all(children)?),
            NodeSpec::All(children) => NodeSpec::All(resolve_all(children)?),
            NodeSpec::Parallel {
                success,
                failure,
                children,
            } => NodeSpec::Parallel {
                success,
                failure,
                children: resolve_all(children)?,
            },
            NodeSpec::IfThenElse(children) => NodeSpec::IfThenElse(resolve_all(children)?),
            NodeSpec::Inverter(child) => NodeSpec::Inverter(Box::new(child.resolve(lookup)?)),
            NodeSpec::Repeat(n, child) => NodeSpec::Repeat(n, Box::new(child.resolve(lookup)?)),
            NodeSpec::Retry(n, child) => NodeSpec::Retry(n, Box::new(child.resolve(lookup)?)),
            leaf @ (NodeSpec::Leaf { .. } | NodeSpec::SubTree { .. }) => leaf,
        })
    }

    /// Validate, then instantiate.
    pub fn build(&self) -> Result<Node<W>, BuildError> {
        self.validate()?;
        Ok(self.instantiate())
    }

    /// Build a fresh node graph. The spec must already be validated.
    pub fn instantiate(&self) -> Node<W> {
        let build_all = |children: &[NodeSpec<W>]| {
            children.iter().map(NodeSpec::instantiate).collect::<Vec<_>>()
        };

        match self {
            NodeSpec::Leaf { label, make } => Node::boxed(label.clone(), make()),
            NodeSpec::Sequence(children) => Node::new(self.kind(), Sequence::new(build_all(children))),
            NodeSpec::Selector(children) => Node::new(self.kind(), Selector::new(build_all(children))),
            NodeSpec::All(children) => Node::new(self.kind(), All::new(build_all(children))),
            NodeSpec::Parallel {
                success,
                failure,
                children,
            } => Node::new(
                self.kind(),
                Parallel::new(build_all(children), *success, *failure),
            ),
            NodeSpec::IfThenElse(children) => {
                let mut nodes = build_all(children).into_iter();
                let (Some(condition), Some(then)) = (nodes.next(), nodes.next()) else {
                    panic!(
                        "if_then_else instantiated with {} children; validate the spec first",
                        children.len()
                    );
                };
                Node::new(self.kind(), IfThenElse::new(condition, then, nodes.next()))
            }
            NodeSpec::Inverter(child) => Node::new(self.kind(), Inverter::new(child.instantiate())),
            NodeSpec::Repeat(n, child) => Node::new(self.kind(), Repeat::new(*n, child.instantiate())),
            NodeSpec::Retry(n, child) => Node::new(self.kind(), Retry::new(*n, child.instantiate())),
            NodeSpec::SubTree { label, spec } => {
                let spec = Rc::clone(spec);
                Node::new(label.clone(), SubTree::new(move || spec.instantiate()))
            }
            NodeSpec::Script(name) => {
                panic!("script reference `{name}` instantiated before registration resolved it")
            }
        }
    }
}
