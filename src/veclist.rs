//! Freelist-backed container with generation-tagged stable handles.
//!
//! Slots live in one contiguous `Vec`. Removing an element marks its slot
//! dead and pushes it onto an intrusive freelist; the next insertion reuses
//! it with a bumped generation, so a handle to the removed element can never
//! alias the new one.

use crate::error::{PhysicsError, Result};
use alloc::vec::Vec as AllocVec;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// Stable reference to an element of a [`VecList<T>`].
///
/// Stays valid across insertions and removals of other elements.
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: u32, generation: u32) -> Self {
        Handle { index, generation, _marker: PhantomData }
    }

    /// Slot index inside the owning list.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    fn invalid(&self) -> PhysicsError {
        PhysicsError::InvalidHandle { index: self.index(), generation: self.generation }
    }
}

// Manual impls: derives would demand the same traits from `T`.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

/// One slot of a [`VecList`].
#[derive(Clone, Debug)]
pub struct VecNode<T> {
    value: Option<T>,
    next_free: Option<u32>,
    generation: u32,
}

impl<T> VecNode<T> {
    /// Whether the slot currently holds a live element.
    pub fn is_alive(&self) -> bool {
        self.value.is_some()
    }
}

/// Index-stable container with O(1) insert and remove.
#[derive(Clone, Debug)]
pub struct VecList<T> {
    nodes: AllocVec<VecNode<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> VecList<T> {
    pub fn new() -> Self {
        VecList { nodes: AllocVec::new(), free_head: None, len: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        VecList { nodes: AllocVec::with_capacity(capacity), free_head: None, len: 0 }
    }

    /// Insert a value, reusing a freed slot if one is available.
    ///
    /// # Panics
    ///
    /// Panics if a new slot would be needed past `u32::MAX` slots, since
    /// handles store a 32-bit index.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        self.len += 1;
        match self.free_head {
            Some(index) => {
                let node = &mut self.nodes[index as usize];
                self.free_head = node.next_free.take();
                node.value = Some(value);
                Handle::new(index, node.generation)
            }
            None => {
                let index = slot_index(self.nodes.len());
                self.nodes.push(VecNode { value: Some(value), next_free: None, generation: 0 });
                Handle::new(index, 0)
            }
        }
    }

    /// Remove the element behind `handle` and return it.
    ///
    /// Fails with [`PhysicsError::InvalidHandle`] if the handle is stale or
    /// out of range.
    pub fn remove(&mut self, handle: Handle<T>) -> Result<T> {
        let node = self
            .nodes
            .get_mut(handle.index())
            .filter(|n| n.generation == handle.generation && n.is_alive())
            .ok_or_else(|| handle.invalid())?;
        let value = node.value.take().ok_or_else(|| handle.invalid())?;
        node.generation = node.generation.wrapping_add(1);
        node.next_free = self.free_head;
        self.free_head = Some(handle.index);
        self.len -= 1;
        Ok(value)
    }

    pub fn get(&self, handle: Handle<T>) -> Result<&T> {
        self.nodes
            .get(handle.index())
            .filter(|n| n.generation == handle.generation)
            .and_then(|n| n.value.as_ref())
            .ok_or_else(|| handle.invalid())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T> {
        self.nodes
            .get_mut(handle.index())
            .filter(|n| n.generation == handle.generation)
            .and_then(|n| n.value.as_mut())
            .ok_or_else(|| handle.invalid())
    }

    /// Mutable access to two distinct live elements at once.
    pub fn pair_mut(&mut self, a: Handle<T>, b: Handle<T>) -> Result<(&mut T, &mut T)> {
        self.get(a)?;
        self.get(b)?;
        if a.index == b.index {
            return Err(b.invalid());
        }
        let (lo, hi, swapped) = if a.index < b.index {
            (a.index(), b.index(), false)
        } else {
            (b.index(), a.index(), true)
        };
        let (head, tail) = self.nodes.split_at_mut(hi);
        let first = head[lo].value.as_mut().ok_or_else(|| a.invalid())?;
        let second = tail[0].value.as_mut().ok_or_else(|| b.invalid())?;
        Ok(if swapped { (second, first) } else { (first, second) })
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_ok()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every element. Outstanding handles become invalid, even after
    /// their slots are reused.
    pub fn clear(&mut self) {
        self.free_head = None;
        for (i, node) in self.nodes.iter_mut().enumerate().rev() {
            if node.value.take().is_some() {
                node.generation = node.generation.wrapping_add(1);
            }
            node.next_free = self.free_head;
            self.free_head = Some(i as u32);
        }
        self.len = 0;
    }

    /// Live elements in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, n)| {
            n.value.as_ref().map(|v| (Handle::new(i as u32, n.generation), v))
        })
    }

    /// Live elements in slot order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> + '_ {
        self.nodes.iter_mut().enumerate().filter_map(|(i, n)| {
            let generation = n.generation;
            n.value.as_mut().map(|v| (Handle::new(i as u32, generation), v))
        })
    }

    /// Live values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes.iter().filter_map(|n| n.value.as_ref())
    }

    /// Live values in slot order, mutably.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.nodes.iter_mut().filter_map(|n| n.value.as_mut())
    }
}

fn slot_index(len: usize) -> u32 {
    match u32::try_from(len) {
        Ok(index) => index,
        Err(_) => panic!("VecList slot count exceeds u32::MAX"),
    }
}

impl<T> Default for VecList<T> {
    fn default() -> Self {
        Self::new()
    }
}
