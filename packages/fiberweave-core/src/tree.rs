use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::fiber::{Fiber, FiberKind};
use crate::ids::{ElementType, FiberId, PriorityLevel};
use crate::spec::Props;
use crate::traits::FiberStore;

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    fiber: Option<Fiber>,
}

/// Arena holding the fibers of both generations.
///
/// Fibers are addressed by [`FiberId`]. Released slots go on a free list and
/// have their generation bumped, so handles into them stop resolving.
#[derive(Clone, Debug, Default)]
pub struct FiberTree {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    live: usize,
}

impl FiberTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Allocate a parentless element fiber to host a child chain.
    pub fn create_root(
        &mut self,
        element_type: impl Into<ElementType>,
        props: Props,
        priority: PriorityLevel,
    ) -> FiberId {
        self.insert(Fiber {
            kind: FiberKind::Element,
            element_type: element_type.into(),
            key: None,
            pending_props: props,
            child: None,
            sibling: None,
            return_fiber: None,
            alternate: None,
            output: None,
            priority,
        })
    }

    pub fn insert(&mut self, fiber: Fiber) -> FiberId {
        self.live += 1;
        if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.fiber = Some(fiber);
            return FiberId::new(idx, slot.generation);
        }
        let idx = slot_index(self.slots.len());
        self.slots.push(Slot {
            generation: 0,
            fiber: Some(fiber),
        });
        FiberId::new(idx, 0)
    }

    pub fn get(&self, id: FiberId) -> Result<&Fiber> {
        let idx = self.resolve(id)?;
        self.slots[idx].fiber.as_ref().ok_or(Error::StaleFiber(id))
    }

    pub fn get_mut(&mut self, id: FiberId) -> Result<&mut Fiber> {
        let idx = self.resolve(id)?;
        self.slots[idx].fiber.as_mut().ok_or(Error::StaleFiber(id))
    }

    pub fn contains(&self, id: FiberId) -> bool {
        self.resolve(id).is_ok()
    }

    /// Free a fiber's slot. Links held by other fibers are not touched.
    pub fn release(&mut self, id: FiberId) -> Result<Fiber> {
        let idx = self.resolve(id)?;
        let slot = &mut self.slots[idx];
        let fiber = slot.fiber.take().ok_or(Error::StaleFiber(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.idx);
        self.live -= 1;
        Ok(fiber)
    }

    /// Install `children` as the ordered child chain of `parent`, rewriting
    /// their `sibling` and `return_fiber` links. An empty slice clears
    /// `parent.child`.
    pub fn link_children(&mut self, parent: FiberId, children: &[FiberId]) -> Result<()> {
        self.resolve(parent)?;
        let mut seen = HashSet::with_capacity(children.len());
        for &child in children {
            self.resolve(child)?;
            if child == parent || !seen.insert(child) {
                return Err(Error::InvalidChain(format!(
                    "{child:?} appears twice under {parent:?}"
                )));
            }
        }

        for (i, &child) in children.iter().enumerate() {
            let fiber = self.get_mut(child)?;
            fiber.sibling = children.get(i + 1).copied();
            fiber.return_fiber = Some(parent);
        }
        self.get_mut(parent)?.child = children.first().copied();
        Ok(())
    }

    /// Walk a sibling chain starting at `head`.
    ///
    /// Stops at the end of the chain, at a handle that no longer resolves, or
    /// after visiting as many fibers as the arena has slots.
    pub fn siblings(&self, head: Option<FiberId>) -> Siblings<'_> {
        Siblings {
            tree: self,
            next: head,
            budget: self.slots.len(),
        }
    }

    pub fn child_ids(&self, parent: FiberId) -> Result<Vec<FiberId>> {
        let head = self.get(parent)?.child;
        Ok(self.siblings(head).collect())
    }

    /// Release every fiber of an abandoned chain.
    ///
    /// Only the chain itself is released; `child` subtrees are left alone
    /// because a cloned fiber shares its subtree with the prior generation.
    /// Returns the number of fibers released.
    pub fn discard_chain(&mut self, head: Option<FiberId>) -> usize {
        let chain: Vec<FiberId> = self.siblings(head).collect();
        chain
            .into_iter()
            .filter(|&id| self.release(id).is_ok())
            .count()
    }

    /// Check that the chain starting at `head` is finite, acyclic, made of
    /// live fibers, and points back at `parent`. Intended for tests and
    /// debugging.
    pub fn validate_chain(&self, parent: FiberId, head: Option<FiberId>) -> Result<()> {
        self.resolve(parent)?;
        let mut seen = HashSet::new();
        let mut current = head;
        while let Some(id) = current {
            if !seen.insert(id) {
                return Err(Error::InvalidChain(format!("cycle through {id:?}")));
            }
            let fiber = self.get(id)?;
            if fiber.return_fiber != Some(parent) {
                return Err(Error::InvalidChain(format!(
                    "{id:?} returns to {:?}, expected {parent:?}",
                    fiber.return_fiber
                )));
            }
            current = fiber.sibling;
        }
        Ok(())
    }

    /// Number of live fibers.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn resolve(&self, id: FiberId) -> Result<usize> {
        let idx = id.idx as usize;
        let slot = self.slots.get(idx).ok_or(Error::UnknownFiber(id))?;
        if slot.generation != id.generation || slot.fiber.is_none() {
            return Err(Error::StaleFiber(id));
        }
        Ok(idx)
    }
}

/// Index for a slot appended at position `len`.
///
/// Handles are `u32`; an arena that outgrows them is a host bug.
fn slot_index(len: usize) -> u32 {
    debug_assert!(
        u32::try_from(len).is_ok(),
        "fiber arena outgrew u32 handles at {len} slots"
    );
    len as u32
}

impl FiberStore for FiberTree {
    fn insert(&mut self, fiber: Fiber) -> FiberId {
        FiberTree::insert(self, fiber)
    }

    fn remove(&mut self, id: FiberId) -> Option<Fiber> {
        self.release(id).ok()
    }

    fn fiber(&self, id: FiberId) -> Option<&Fiber> {
        self.get(id).ok()
    }

    fn fiber_mut(&mut self, id: FiberId) -> Option<&mut Fiber> {
        self.get_mut(id).ok()
    }
}

/// Iterator over a sibling chain. See [`FiberTree::siblings`].
#[derive(Debug)]
pub struct Siblings<'a> {
    tree: &'a FiberTree,
    next: Option<FiberId>,
    budget: usize,
}

impl Iterator for Siblings<'_> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.next?;
        if self.budget == 0 {
            self.next = None;
            return None;
        }
        self.budget -= 1;
        match self.tree.get(id) {
            Ok(fiber) => {
                self.next = fiber.sibling;
                Some(id)
            }
            Err(_) => {
                self.next = None;
                None
            }
        }
    }
}
