// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal: running update callbacks over the tree.
//!
//! A traversal is a synchronous pre-order walk from a start node. For each
//! node reached:
//!
//! 1. A detached node is skipped together with its subtree. The start node
//!    is exempt, so a detached view can still be checked locally.
//! 2. Under [`CheckStrategy::OnPush`], a node that is neither dirty nor
//!    pending is skipped together with its subtree.
//! 3. Otherwise the node's callback runs, its dirty flag is cleared, and its
//!    children are visited in insertion order.
//! 4. After the children, the node's pending flag is recomputed from them,
//!    so a dirty node left behind under a detached child keeps the path to it
//!    marked.
//!
//! Nothing is snapshotted up front. Callbacks may mutate the tree through
//! [`UpdateCx::tree`]; the walk reads links and flags as it goes, so changes
//! to nodes not yet reached are seen. The one exception is
//! [`reattach`](Tree::reattach), which takes effect from the next traversal.
//!
//! A callback that moves a node within the child list being walked does not
//! cause siblings to be lost. Each traversal stamps the nodes it has updated
//! with its epoch, and a node is updated at most once per traversal.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;

use super::id::{INVALID, NodeId};
use super::store::Tree;
use super::update::{BoundValue, CheckMode, UpdateCx};
use crate::config::CheckStrategy;
use crate::error::{ReentrantMutationError, UNBOUND};
#[cfg(feature = "trace-rich")]
use crate::trace::{NodeSkipEvent, NodeVisitEvent, SkipReason};
use crate::trace::{CheckBeginEvent, CheckEndEvent, Tracer, ViolationEvent};

/// Counts gathered during one traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CheckSummary {
    /// Nodes whose update step ran (callback invoked, if any, and dirty
    /// cleared).
    pub updated: u32,
    /// Detached subtrees that were skipped.
    pub skipped_detached: u32,
    /// Clean subtrees that were skipped.
    pub skipped_clean: u32,
}

impl Tree {
    /// Runs a traversal from `id`, invoking the callback of every attached
    /// node that needs it.
    ///
    /// `id` itself is checked even if it is detached, which allows a local
    /// check of a detached view. Detached nodes below it are skipped with
    /// their subtrees.
    ///
    /// Never fails.
    pub fn check(&mut self, id: NodeId) -> CheckSummary {
        self.check_traced(id, &mut Tracer::none())
    }

    /// Alias of [`check`](Self::check), under the name views usually call it.
    pub fn detect_changes(&mut self, id: NodeId) -> CheckSummary {
        self.check(id)
    }

    /// Like [`check`](Self::check), reporting events to `tracer`.
    pub fn check_traced(&mut self, id: NodeId, tracer: &mut Tracer<'_>) -> CheckSummary {
        match self.run(id, CheckMode::Check, tracer) {
            Ok(summary) => summary,
            Err(err) => unreachable!("check mode never compares bindings: {err}"),
        }
    }

    /// Runs the same traversal as [`check`](Self::check), but invokes each
    /// callback twice in a row and compares what the two invocations bound.
    ///
    /// Used to catch non-idempotent update logic during development.
    ///
    /// # Errors
    ///
    /// Returns [`ReentrantMutationError`] for the first node whose
    /// invocations disagree. The rest of the traversal is abandoned.
    pub fn check_no_changes(&mut self, id: NodeId) -> Result<CheckSummary, ReentrantMutationError> {
        self.check_no_changes_traced(id, &mut Tracer::none())
    }

    /// Like [`check_no_changes`](Self::check_no_changes), reporting events to
    /// `tracer`.
    ///
    /// # Errors
    ///
    /// See [`check_no_changes`](Self::check_no_changes).
    pub fn check_no_changes_traced(
        &mut self,
        id: NodeId,
        tracer: &mut Tracer<'_>,
    ) -> Result<CheckSummary, ReentrantMutationError> {
        self.run(id, CheckMode::Verify, tracer)
    }

    fn run(
        &mut self,
        id: NodeId,
        mode: CheckMode,
        tracer: &mut Tracer<'_>,
    ) -> Result<CheckSummary, ReentrantMutationError> {
        self.validate(id);
        tracer.check_begin(&CheckBeginEvent {
            root: id,
            mode,
            strategy: self.config.strategy,
        });

        self.active_checks += 1;
        self.epoch = match self.epoch.checked_add(1) {
            Some(epoch) => epoch,
            None => {
                self.visited.fill(0);
                1
            }
        };
        let walk = Walk {
            mode,
            epoch: self.epoch,
        };
        let mut summary = CheckSummary::default();
        let result = self.visit(id.0, 0, walk, &mut summary, tracer);
        self.active_checks -= 1;

        if self.active_checks == 0 {
            for idx in self.deferred_list.drain(..) {
                self.deferred[idx as usize] = false;
            }
        }
        // The walk only settles pending flags below the start node.
        self.settle_pending(self.parent[id.0 as usize]);

        if let Err(err) = &result {
            tracer.violation(&ViolationEvent {
                node: err.node,
                binding: err.binding,
            });
        }
        tracer.check_end(&CheckEndEvent {
            root: id,
            mode,
            summary,
        });
        result.map(|()| summary)
    }

    fn visit(
        &mut self,
        idx: u32,
        depth: u32,
        walk: Walk,
        summary: &mut CheckSummary,
        tracer: &mut Tracer<'_>,
    ) -> Result<(), ReentrantMutationError> {
        let i = idx as usize;
        let mode = walk.mode;
        if self.visited[i] == walk.epoch {
            return Ok(());
        }
        if depth > 0 && (!self.attached[i] || self.deferred[i]) {
            summary.skipped_detached += 1;
            #[cfg(feature = "trace-rich")]
            tracer.node_skip(&NodeSkipEvent {
                node: NodeId(idx),
                reason: SkipReason::Detached,
            });
            return Ok(());
        }
        if self.config.strategy == CheckStrategy::OnPush && !self.needs_check(idx) {
            summary.skipped_clean += 1;
            #[cfg(feature = "trace-rich")]
            tracer.node_skip(&NodeSkipEvent {
                node: NodeId(idx),
                reason: SkipReason::Clean,
            });
            return Ok(());
        }

        #[cfg(feature = "trace-rich")]
        tracer.node_visit(&NodeVisitEvent {
            node: NodeId(idx),
            depth,
            mode,
        });
        self.visited[i] = walk.epoch;
        self.run_update(idx, mode)?;
        self.dirty[i] = false;
        summary.updated += 1;

        let mut child = self.first_child[i];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.visit(child, depth + 1, walk, summary, tracer)?;
            child = self.next_child_after(idx, child, next);
        }

        self.pending[i] = self.any_child_needs_check(idx);
        Ok(())
    }

    /// Picks the sibling to visit after `child`, given the `next` link it had
    /// before its subtree ran.
    fn next_child_after(&self, parent: u32, child: u32, next: u32) -> u32 {
        let c = child as usize;
        if self.parent[c] == parent && self.next_sibling[c] == next {
            return next;
        }
        // The child list changed under us. Resume from the old successor if
        // it is still here, otherwise rescan; updated nodes are skipped by
        // their epoch stamp.
        if next != INVALID && self.parent[next as usize] == parent {
            next
        } else {
            self.first_child[parent as usize]
        }
    }

    /// Invokes the node's callback once, or twice when verifying.
    fn run_update(&mut self, idx: u32, mode: CheckMode) -> Result<(), ReentrantMutationError> {
        let i = idx as usize;
        let Some(mut update) = self.update[i].take() else {
            return Ok(());
        };
        self.update_replaced[i] = false;

        let result = match mode {
            CheckMode::Check => {
                let mut cx = UpdateCx::new(self, NodeId(idx), mode);
                update.update(&mut cx);
                Ok(())
            }
            CheckMode::Verify => {
                let mut first = UpdateCx::new(self, NodeId(idx), mode);
                update.update(&mut first);
                let first = first.into_bindings();

                let mut second = UpdateCx::new(self, NodeId(idx), mode);
                update.update(&mut second);
                let second = second.into_bindings();

                compare_bindings(NodeId(idx), &first, &second)
            }
        };

        // The callback may have replaced or cleared itself.
        if !self.update_replaced[i] {
            self.update[i] = Some(update);
        }
        self.update_replaced[i] = false;
        result
    }
}

/// Per-traversal parameters threaded through [`Tree::visit`].
#[derive(Clone, Copy)]
struct Walk {
    mode: CheckMode,
    epoch: u32,
}

/// Returns an error describing the first position where the two binding
/// sequences differ.
fn compare_bindings(
    node: NodeId,
    previous: &[Box<dyn BoundValue>],
    current: &[Box<dyn BoundValue>],
) -> Result<(), ReentrantMutationError> {
    let len = previous.len().max(current.len());
    for binding in 0..len {
        match (previous.get(binding), current.get(binding)) {
            (Some(prev), Some(cur)) if (**prev).same_as(&**cur) => {}
            (prev, cur) => {
                return Err(ReentrantMutationError {
                    node,
                    binding,
                    previous: render(prev.map(|v| &**v)),
                    current: render(cur.map(|v| &**v)),
                });
            }
        }
    }
    Ok(())
}

fn render(value: Option<&dyn BoundValue>) -> String {
    value.map_or_else(|| UNBOUND.into(), |v| format!("{v:?}"))
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::config::TreeConfig;
    use crate::tree::update_fn;

    /// Installs a callback on `node` that appends the node to `log`.
    fn log_updates(tree: &mut Tree, node: NodeId, log: &Rc<RefCell<Vec<NodeId>>>) {
        let log = Rc::clone(log);
        tree.set_update(node, update_fn(move |cx| log.borrow_mut().push(cx.node())));
    }

    struct Fixture {
        tree: Tree,
        r: NodeId,
        a: NodeId,
        b: NodeId,
        c: NodeId,
        log: Rc<RefCell<Vec<NodeId>>>,
    }

    /// R has children A and B; A has child C. Every node logs its updates.
    fn fixture(config: TreeConfig) -> Fixture {
        let mut tree = Tree::with_config(config);
        let r = tree.root();
        let a = tree.create_node(r);
        let b = tree.create_node(r);
        let c = tree.create_node(a);
        let log = Rc::new(RefCell::new(Vec::new()));
        for node in [r, a, b, c] {
            log_updates(&mut tree, node, &log);
        }
        Fixture {
            tree,
            r,
            a,
            b,
            c,
            log,
        }
    }

    #[test]
    fn clean_tree_updates_nothing() {
        let mut f = fixture(TreeConfig::default());
        let summary = f.tree.check(f.r);
        assert_eq!(summary.updated, 0);
        assert!(f.log.borrow().is_empty());
    }

    #[test]
    fn dirty_leaf_is_reached_through_clean_ancestors() {
        let mut f = fixture(TreeConfig::default());
        f.tree.mark_dirty(f.c);
        f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r, f.a, f.c]);
        assert!(!f.tree.is_dirty(f.c));
        assert!(!f.tree.has_pending(f.r));
    }

    #[test]
    fn second_check_updates_nothing() {
        let mut f = fixture(TreeConfig::default());
        f.tree.mark_dirty(f.b);
        f.tree.mark_dirty(f.c);
        f.tree.check(f.r);
        f.log.borrow_mut().clear();

        let summary = f.tree.check(f.r);
        assert_eq!(summary.updated, 0);
        assert!(f.log.borrow().is_empty());
    }

    #[test]
    fn detached_subtree_is_skipped_and_stays_dirty() {
        let mut f = fixture(TreeConfig::default());
        f.tree.mark_dirty(f.c);
        f.tree.detach(f.a);

        let summary = f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r]);
        assert_eq!(summary.skipped_detached, 1);
        assert!(f.tree.is_dirty(f.c), "skipped node keeps its dirty flag");
    }

    #[test]
    fn reattached_subtree_is_checked_in_pre_order() {
        let mut f = fixture(TreeConfig::default());
        f.tree.mark_dirty(f.c);
        f.tree.detach(f.a);
        f.tree.check(f.r);
        f.log.borrow_mut().clear();

        f.tree.reattach(f.a);
        f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r, f.a, f.c]);
        assert!(!f.tree.is_dirty(f.c));
    }

    #[test]
    fn detached_dirty_node_is_never_updated_from_an_ancestor() {
        let mut f = fixture(TreeConfig::default());
        f.tree.mark_dirty(f.c);
        f.tree.detach(f.c);
        f.tree.check(f.r);
        f.tree.check(f.a);
        assert!(!f.log.borrow().contains(&f.c));
    }

    #[test]
    fn mark_then_reattach_updates_exactly_once() {
        let mut f = fixture(TreeConfig::default());
        f.tree.detach(f.b);
        f.tree.mark_dirty(f.b);
        f.tree.reattach(f.b);
        f.tree.check(f.r);
        f.tree.check(f.r);
        let hits = f.log.borrow().iter().filter(|&&n| n == f.b).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn local_check_of_detached_node() {
        let mut f = fixture(TreeConfig::default());
        f.tree.detach(f.a);
        f.tree.mark_dirty(f.c);

        f.tree.check(f.a);
        assert_eq!(*f.log.borrow(), vec![f.a, f.c]);
        assert!(
            !f.tree.has_pending(f.r),
            "ancestors above the start node are settled"
        );
    }

    #[test]
    fn always_strategy_updates_every_attached_node() {
        let mut f = fixture(TreeConfig::with_strategy(CheckStrategy::Always));
        f.tree.detach(f.b);
        f.tree.check(f.r);
        f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r, f.a, f.c, f.r, f.a, f.c]);
    }

    #[test]
    fn callback_marking_later_sibling_is_seen() {
        let mut f = fixture(TreeConfig::default());
        let b = f.b;
        let log = Rc::clone(&f.log);
        f.tree.set_update(
            f.a,
            update_fn(move |cx| {
                log.borrow_mut().push(cx.node());
                cx.tree().mark_dirty(b);
            }),
        );
        f.tree.mark_dirty(f.a);
        f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r, f.a, f.b]);
    }

    #[test]
    fn callback_marking_visited_node_waits_for_next_check() {
        let mut f = fixture(TreeConfig::default());
        let a = f.a;
        let log = Rc::clone(&f.log);
        f.tree.set_update(
            f.b,
            update_fn(move |cx| {
                log.borrow_mut().push(cx.node());
                cx.tree().mark_dirty(a);
            }),
        );
        f.tree.mark_dirty(f.b);
        f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r, f.b]);
        assert!(f.tree.is_dirty(f.a));
        assert!(f.tree.has_pending(f.r));
    }

    #[test]
    fn reattach_during_check_applies_next_time() {
        let mut f = fixture(TreeConfig::default());
        f.tree.mark_dirty(f.b);
        f.tree.detach(f.b);
        let b = f.b;
        let log = Rc::clone(&f.log);
        f.tree.set_update(
            f.r,
            update_fn(move |cx| {
                log.borrow_mut().push(cx.node());
                cx.tree().reattach(b);
            }),
        );

        f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r]);
        assert!(f.tree.is_attached(f.b));

        f.log.borrow_mut().clear();
        f.tree.check(f.r);
        assert!(f.log.borrow().contains(&f.b));
    }

    #[test]
    fn check_no_changes_accepts_idempotent_callbacks() {
        let mut tree = Tree::new();
        let root = tree.root();
        let node = tree.create_node_with(root, update_fn(|cx| cx.bind("constant")));
        tree.mark_dirty(node);
        assert_eq!(tree.check_no_changes(root).map(|s| s.updated), Ok(2));
    }

    #[test]
    fn check_no_changes_accepts_callbacks_without_bindings() {
        let mut tree = Tree::new();
        let root = tree.root();
        let node = tree.create_node_with(root, update_fn(|_cx| {}));
        tree.mark_dirty(node);
        assert!(tree.check_no_changes(root).is_ok());
    }

    #[test]
    fn check_no_changes_rejects_alternating_callback() {
        let mut tree = Tree::new();
        let root = tree.root();
        let flip = Cell::new(false);
        let node = tree.create_node_with(
            root,
            update_fn(move |cx| {
                flip.set(!flip.get());
                cx.bind(flip.get());
            }),
        );
        tree.mark_dirty(node);

        let err = tree.check_no_changes(root).unwrap_err();
        assert_eq!(err.node, node);
        assert_eq!(err.binding, 0);
        assert_eq!(err.previous, "true");
        assert_eq!(err.current, "false");
    }

    #[test]
    fn check_no_changes_reports_missing_binding() {
        let mut tree = Tree::new();
        let root = tree.root();
        let calls = Cell::new(0_u32);
        let node = tree.create_node_with(
            root,
            update_fn(move |cx| {
                calls.set(calls.get() + 1);
                cx.bind(1_u8);
                if calls.get() % 2 == 1 {
                    cx.bind(2_u8);
                }
            }),
        );
        tree.mark_dirty(node);

        let err = tree.check_no_changes(root).unwrap_err();
        assert_eq!(err.binding, 1);
        assert_eq!(err.previous, "2");
        assert_eq!(err.current, UNBOUND);
    }

    #[test]
    fn check_no_changes_stops_at_first_violation() {
        let mut f = fixture(TreeConfig::default());
        let flip = Cell::new(0_i32);
        f.tree.set_update(
            f.a,
            update_fn(move |cx| {
                flip.set(flip.get() + 1);
                cx.bind(flip.get());
            }),
        );
        f.tree.mark_dirty(f.a);
        f.tree.mark_dirty(f.b);

        let err = f.tree.check_no_changes(f.r).unwrap_err();
        assert_eq!(err.node, f.a);
        assert!(!f.log.borrow().contains(&f.b), "traversal aborted before B");
        assert!(f.tree.is_dirty(f.b));
    }

    #[test]
    fn check_no_changes_after_check_with_always_strategy() {
        let mut tree = Tree::with_config(TreeConfig::with_strategy(CheckStrategy::Always));
        let root = tree.root();
        let counter = Rc::new(Cell::new(0_u32));
        let seen = Rc::clone(&counter);
        tree.create_node_with(
            root,
            update_fn(move |cx| {
                seen.set(seen.get() + 1);
                cx.bind(seen.get());
            }),
        );

        tree.check(root);
        assert!(tree.check_no_changes(root).is_err());
        assert_eq!(counter.get(), 3, "one check call plus two verification calls");
    }

    #[test]
    fn callbacks_see_their_mode() {
        let mut tree = Tree::new();
        let root = tree.root();
        let modes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&modes);
        let node = tree.create_node_with(root, update_fn(move |cx| sink.borrow_mut().push(cx.mode())));

        tree.mark_dirty(node);
        tree.check(root);
        tree.mark_dirty(node);
        tree.check_no_changes(root).unwrap();
        assert_eq!(
            *modes.borrow(),
            vec![CheckMode::Check, CheckMode::Verify, CheckMode::Verify]
        );
    }

    /// Moves `node` to the end of its parent's child list every time it
    /// updates.
    fn move_to_end_on_update(f: &mut Fixture, node: NodeId) {
        let log = Rc::clone(&f.log);
        let r = f.r;
        f.tree.set_update(
            node,
            update_fn(move |cx| {
                log.borrow_mut().push(cx.node());
                let me = cx.node();
                cx.tree().attach_child(r, me).unwrap();
            }),
        );
    }

    #[test]
    fn callback_moving_its_own_node_keeps_later_siblings() {
        let mut f = fixture(TreeConfig::default());
        let a = f.a;
        move_to_end_on_update(&mut f, a);
        f.tree.mark_dirty(f.a);
        f.tree.mark_dirty(f.b);

        f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r, f.a, f.b]);
        assert_eq!(f.tree.children(f.r).collect::<Vec<_>>(), vec![f.b, f.a]);
        assert!(!f.tree.is_dirty(f.b));
        assert!(!f.tree.has_pending(f.r));
    }

    #[test]
    fn moved_node_is_updated_once_per_check() {
        let mut f = fixture(TreeConfig::with_strategy(CheckStrategy::Always));
        let a = f.a;
        move_to_end_on_update(&mut f, a);

        let summary = f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r, f.a, f.c, f.b]);
        assert_eq!(summary.updated, 4);
    }

    #[test]
    fn callback_moving_later_sibling_under_child_still_reaches_it() {
        let mut f = fixture(TreeConfig::default());
        let (b, c) = (f.b, f.c);
        let log = Rc::clone(&f.log);
        f.tree.set_update(
            f.a,
            update_fn(move |cx| {
                log.borrow_mut().push(cx.node());
                cx.tree().attach_child(c, b).unwrap();
            }),
        );
        f.tree.mark_dirty(f.a);
        f.tree.mark_dirty(f.b);

        f.tree.check(f.r);
        assert_eq!(*f.log.borrow(), vec![f.r, f.a, f.c, f.b]);
        assert!(!f.tree.has_pending(f.r));
    }

    #[test]
    fn callback_clearing_itself_is_not_invoked_again() {
        let mut tree = Tree::new();
        let root = tree.root();
        let calls = Rc::new(Cell::new(0_u32));
        let seen = Rc::clone(&calls);
        let node = tree.create_node_with(
            root,
            update_fn(move |cx| {
                seen.set(seen.get() + 1);
                let me = cx.node();
                cx.tree().clear_update(me);
            }),
        );

        tree.mark_dirty(node);
        tree.check(root);
        tree.mark_dirty(node);
        let summary = tree.check(root);
        assert_eq!(calls.get(), 1);
        assert_eq!(summary.updated, 2, "the node is still visited");
    }

    #[test]
    fn callback_replacing_itself_takes_effect_next_check() {
        let mut tree = Tree::new();
        let root = tree.root();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&log);
        let node = tree.create_node_with(
            root,
            update_fn(move |cx| {
                first.borrow_mut().push("first");
                let second = Rc::clone(&first);
                let me = cx.node();
                cx.tree()
                    .set_update(me, update_fn(move |_| second.borrow_mut().push("second")));
            }),
        );

        tree.mark_dirty(node);
        tree.check(root);
        tree.mark_dirty(node);
        tree.check(root);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }
}
