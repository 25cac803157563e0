//! Contains the [`IdVec`] implementation and its iterators.

use alloc::vec::{self, Vec};
use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Index, IndexMut};
use core::{fmt, slice};

use crate::slot::Slot;
use crate::util::{debug_fmt_entries, next_owner_tag};
use crate::{Error, Handle, Id};

/// Dense vector with stable ids.
///
/// See [crate documentation](crate) for more details.
pub struct IdVec<T> {
    // Backing store, always densely packed.
    values: Vec<T>,

    // Indexed by storage position, same length as `index`.
    slots: Vec<Slot>,

    // Indexed by id, the storage position of that id. Not live if >= len.
    index: Vec<u32>,

    owner: usize,
}

impl<T> IdVec<T> {
    /// Constructs a new, empty `IdVec`.
    ///
    /// The vector will not allocate until values are inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let v: IdVec<i32> = IdVec::new();
    /// assert!(v.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty `IdVec` with the given capacity.
    ///
    /// The vector will not reallocate until it holds at least `capacity`
    /// values. If `capacity` is 0, it will not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let v: IdVec<i32> = IdVec::with_capacity(10);
    /// assert!(v.capacity() >= 10);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        IdVec {
            values: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            index: Vec::with_capacity(capacity),
            owner: next_owner_tag(),
        }
    }

    /// Returns the number of values in the vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::with_capacity(10);
    /// v.insert("len() counts actual values, not capacity");
    /// let id = v.insert("removed values don't count either");
    /// v.remove(id);
    /// assert_eq!(v.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns if the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of values the `IdVec` can hold without
    /// reallocating its value storage.
    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Reserves capacity for at least `additional` more values to be
    /// inserted. The id tables are grown as far as new ids would have to be
    /// minted.
    ///
    /// # Panics
    ///
    /// Panics if the new allocation size overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// v.insert("foo");
    /// v.reserve(32);
    /// assert!(v.capacity() >= 33);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.values.reserve(additional);
        let needed = (self.len() + additional).saturating_sub(self.slots.len());
        self.slots.reserve(needed);
        self.index.reserve(needed);
    }

    /// Shrinks the value storage as much as possible.
    ///
    /// The id tables are left alone, they remember every id ever minted so
    /// it can be recycled.
    pub fn shrink_to_fit(&mut self) {
        self.values.shrink_to_fit();
    }

    /// Returns `true` if `id` refers to a value currently in the vector.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert(42);
    /// assert_eq!(v.contains(id), true);
    /// v.remove(id);
    /// assert_eq!(v.contains(id), false);
    /// ```
    pub fn contains(&self, id: Id) -> bool {
        self.index
            .get(id.idx())
            .map_or(false, |&pos| (pos as usize) < self.values.len())
    }

    /// Returns the id the next insertion will return, without inserting.
    ///
    /// This is the most recently removed id if there is one, otherwise a
    /// fresh id equal to [`len`](Self::len).
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let a = v.insert('a');
    /// v.insert('b');
    /// assert_eq!(v.next_id(), Id::new(2));
    /// v.remove(a);
    /// assert_eq!(v.next_id(), a);
    /// assert_eq!(v.insert('c'), a);
    /// ```
    pub fn next_id(&self) -> Id {
        let len = self.values.len();
        match self.slots.get(len) {
            Some(slot) => slot.owner,
            None => Id::new(len as u32),
        }
    }

    /// Returns the storage position of the value with the given id.
    ///
    /// Positions change when other values are removed, see
    /// [`remove`](Self::remove).
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live.
    pub fn position_of(&self, id: Id) -> usize {
        match self.try_position_of(id) {
            Ok(pos) => pos,
            Err(_) => panic!("invalid IdVec id used"),
        }
    }

    /// Returns the storage position of the value with the given id, or
    /// [`Error::NotLive`] if there is no such value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let a = v.insert(1);
    /// let b = v.insert(2);
    /// assert_eq!(v.try_position_of(b), Ok(1));
    /// v.remove(a);
    /// assert_eq!(v.try_position_of(b), Ok(0));
    /// assert_eq!(v.try_position_of(a), Err(Error::NotLive(a)));
    /// ```
    pub fn try_position_of(&self, id: Id) -> Result<usize, Error> {
        match self.index.get(id.idx()) {
            Some(&pos) if (pos as usize) < self.values.len() => Ok(pos as usize),
            _ => Err(Error::NotLive(id)),
        }
    }

    /// Returns the id of the value stored at position `pos`.
    pub fn id_at(&self, pos: usize) -> Option<Id> {
        if pos < self.values.len() {
            Some(self.slots[pos].owner)
        } else {
            None
        }
    }

    /// Returns the current generation of a live id.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let a = v.insert(0);
    /// assert_eq!(v.generation(a), Some(0));
    /// v.remove(a);
    /// assert_eq!(v.generation(a), None);
    /// let a = v.insert(1);
    /// assert_eq!(v.generation(a), Some(2));
    /// ```
    pub fn generation(&self, id: Id) -> Option<u64> {
        self.try_position_of(id)
            .ok()
            .map(|pos| self.slots[pos].generation)
    }

    /// Returns `true` if `id` is live and its current occupancy has the given
    /// generation.
    pub fn is_valid(&self, id: Id, generation: u64) -> bool {
        self.generation(id) == Some(generation)
    }

    /// Inserts a value and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the number of ids would exceed 2<sup>32</sup> - 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert(42);
    /// assert_eq!(v[id], 42);
    /// ```
    pub fn insert(&mut self, value: T) -> Id {
        self.insert_with_id(|_| value)
    }

    /// Inserts a value given by `f`. The id the value will be stored under is
    /// passed into `f`, which is useful for values that contain their own id.
    ///
    /// If `f` panics the vector is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the number of ids would exceed 2<sup>32</sup> - 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert_with_id(|id| (id, 20));
    /// assert_eq!(v[id], (id, 20));
    /// ```
    pub fn insert_with_id<F>(&mut self, f: F) -> Id
    where
        F: FnOnce(Id) -> T,
    {
        self.check_overflow();
        self.values.reserve(1);
        if self.slots.len() == self.values.len() {
            self.slots.reserve(1);
            self.index.reserve(1);
        }

        let id = self.next_id();
        let value = f(id);
        self.commit(id, value);
        id
    }

    /// Inserts a value, returning [`Error::AllocationFailed`] instead of
    /// aborting if memory for the internal tables cannot be allocated.
    ///
    /// On failure the vector is unchanged and the value is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.try_insert("x").unwrap();
    /// assert_eq!(v[id], "x");
    /// ```
    pub fn try_insert(&mut self, value: T) -> Result<Id, Error> {
        self.check_overflow();
        self.values.try_reserve(1)?;
        if self.slots.len() == self.values.len() {
            self.slots.try_reserve(1)?;
            self.index.try_reserve(1)?;
        }

        let id = self.next_id();
        self.commit(id, value);
        Ok(id)
    }

    fn check_overflow(&self) {
        if self.values.len() >= u32::MAX as usize {
            panic!("IdVec number of elements overflow");
        }
    }

    // Records `id` at the end of the live region and pushes its value. All
    // three tables must have room for one more entry already, so nothing
    // below can fail half way.
    fn commit(&mut self, id: Id, value: T) {
        let pos = self.values.len();
        if let Some(slot) = self.slots.get_mut(pos) {
            slot.revive();
            self.index[id.idx()] = pos as u32;
        } else {
            self.slots.push(Slot::new(id));
            self.index.push(pos as u32);
        }
        self.values.push(value);
    }

    // Removes the value at a live position by swapping it with the last one.
    // The removed id's slot lands right past the live region, on top of the
    // retirement stack.
    fn swap_out(&mut self, pos: usize) -> T {
        let last = self.values.len() - 1;
        let id = self.slots[pos].owner;
        let last_id = self.slots[last].owner;

        self.slots[pos].retire();
        self.slots.swap(pos, last);
        self.index.swap(id.idx(), last_id.idx());
        self.values.swap_remove(pos)
    }

    /// Removes the value with the given id and returns it.
    ///
    /// The last value in storage order is moved into the freed position, so
    /// exactly one other id changes position. All ids other than `id` stay
    /// valid.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live. Use [`try_remove`](Self::try_remove) or
    /// check with [`contains`](Self::contains) first.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert(42);
    /// assert_eq!(v.remove(id), 42);
    /// assert!(!v.contains(id));
    /// ```
    pub fn remove(&mut self, id: Id) -> T {
        match self.try_remove(id) {
            Ok(value) => value,
            Err(_) => panic!("invalid IdVec id used"),
        }
    }

    /// Removes the value with the given id, or returns
    /// [`Error::NotLive`] if there is no such value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert(42);
    /// assert_eq!(v.try_remove(id), Ok(42));
    /// assert_eq!(v.try_remove(id), Err(Error::NotLive(id)));
    /// ```
    pub fn try_remove(&mut self, id: Id) -> Result<T, Error> {
        let pos = self.try_position_of(id)?;
        Ok(self.swap_out(pos))
    }

    /// Removes the value a handle refers to.
    ///
    /// # Panics
    ///
    /// Panics if the handle came from another `IdVec` or is stale.
    pub fn remove_handle(&mut self, handle: &Handle<T>) -> T {
        match self.try_remove_handle(handle) {
            Ok(value) => value,
            Err(_) => panic!("invalid IdVec handle used"),
        }
    }

    /// Removes the value a handle refers to, or returns
    /// [`Error::ForeignHandle`] or [`Error::StaleHandle`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert("x");
    /// let h = v.handle(id);
    /// assert_eq!(v.try_remove_handle(&h), Ok("x"));
    /// assert_eq!(v.try_remove_handle(&h), Err(Error::StaleHandle(id)));
    /// ```
    pub fn try_remove_handle(&mut self, handle: &Handle<T>) -> Result<T, Error> {
        let pos = self.check_handle(handle)?;
        Ok(self.swap_out(pos))
    }

    /// Removes the value stored at position `pos` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len`.
    pub fn remove_at(&mut self, pos: usize) -> T {
        assert!(pos < self.values.len(), "IdVec position out of bounds");
        self.swap_out(pos)
    }

    /// Removes the last value in storage order, returning it with its id.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// v.insert(1);
    /// let b = v.insert(2);
    /// assert_eq!(v.pop(), Some((b, 2)));
    /// assert_eq!(v.len(), 1);
    /// ```
    pub fn pop(&mut self) -> Option<(Id, T)> {
        let last = self.values.len().checked_sub(1)?;
        let id = self.slots[last].owner;
        Some((id, self.swap_out(last)))
    }

    /// Retains only the values specified by the predicate.
    ///
    /// In other words, remove all pairs `(id, v)` such that `f(id, &mut v)`
    /// returns false. Removed ids become free for reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    ///
    /// let i3 = v.insert(2);
    /// let i1 = v.insert(0);
    /// let i2 = v.insert(1);
    ///
    /// v.retain(|id, val| id == i1 || *val == 1);
    ///
    /// assert!(v.contains(i1));
    /// assert!(v.contains(i2));
    /// assert!(!v.contains(i3));
    /// assert_eq!(2, v.len());
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(Id, &mut T) -> bool,
    {
        let mut i = 0;
        while i < self.values.len() {
            let id = self.slots[i].owner;
            if f(id, &mut self.values[i]) {
                i += 1;
            } else {
                // Do not advance, the former last value now sits at i.
                self.swap_out(i);
            }
        }
    }

    /// Removes all values matching the predicate and returns how many were
    /// removed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v: IdVec<i32> = (0..10).collect();
    /// assert_eq!(v.remove_if(|x| *x % 3 == 0), 4);
    /// assert_eq!(v.len(), 6);
    /// ```
    pub fn remove_if<F>(&mut self, mut f: F) -> usize
    where
        F: FnMut(&mut T) -> bool,
    {
        let before = self.values.len();
        self.retain(|_, value| !f(value));
        before - self.values.len()
    }

    /// Removes all values and invalidates every outstanding handle. Keeps the
    /// allocated memory, and the ids, for reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert(0);
    /// let h = v.handle(id);
    /// v.clear();
    /// assert_eq!(v.len(), 0);
    /// assert!(!h.is_valid(&v));
    /// ```
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.retire();
        }
        self.values.clear();
    }

    /// Clears the vector, returning all id-value pairs as an iterator. Keeps
    /// the allocated memory for reuse.
    ///
    /// Dropping the iterator removes the remaining values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert(0);
    /// let drained: Vec<_> = v.drain().collect();
    /// assert_eq!(v.len(), 0);
    /// assert_eq!(drained, vec![(id, 0)]);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain { vec: self }
    }

    /// Returns a reference to the value with the given id.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert("bar");
    /// assert_eq!(v.get(id), Some(&"bar"));
    /// v.remove(id);
    /// assert_eq!(v.get(id), None);
    /// ```
    pub fn get(&self, id: Id) -> Option<&T> {
        let pos = self.try_position_of(id).ok()?;
        Some(&self.values[pos])
    }

    /// Returns a mutable reference to the value with the given id.
    pub fn get_mut(&mut self, id: Id) -> Option<&mut T> {
        let pos = self.try_position_of(id).ok()?;
        Some(&mut self.values[pos])
    }

    /// Returns a reference to the value with the given id, or
    /// [`Error::NotLive`].
    pub fn at(&self, id: Id) -> Result<&T, Error> {
        let pos = self.try_position_of(id)?;
        Ok(&self.values[pos])
    }

    /// Returns a mutable reference to the value with the given id, or
    /// [`Error::NotLive`].
    pub fn at_mut(&mut self, id: Id) -> Result<&mut T, Error> {
        let pos = self.try_position_of(id)?;
        Ok(&mut self.values[pos])
    }

    /// Returns a reference to the value with the given id without liveness
    /// or bounds checking.
    ///
    /// # Safety
    ///
    /// This should only be used if `contains(id)` is true. Otherwise it is
    /// undefined behavior. Debug builds assert liveness.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert("bar");
    /// assert_eq!(unsafe { v.get_unchecked(id) }, &"bar");
    /// v.remove(id);
    /// // v.get_unchecked(id) is now dangerous!
    /// ```
    pub unsafe fn get_unchecked(&self, id: Id) -> &T {
        debug_assert!(self.contains(id), "IdVec::get_unchecked on dead id");
        let pos = *self.index.get_unchecked(id.idx()) as usize;
        self.values.get_unchecked(pos)
    }

    /// Returns a mutable reference to the value with the given id without
    /// liveness or bounds checking.
    ///
    /// # Safety
    ///
    /// This should only be used if `contains(id)` is true. Otherwise it is
    /// undefined behavior. Debug builds assert liveness.
    pub unsafe fn get_unchecked_mut(&mut self, id: Id) -> &mut T {
        debug_assert!(self.contains(id), "IdVec::get_unchecked_mut on dead id");
        let pos = *self.index.get_unchecked(id.idx()) as usize;
        self.values.get_unchecked_mut(pos)
    }

    /// Creates a handle to the value with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live.
    pub fn handle(&self, id: Id) -> Handle<T> {
        match self.try_handle(id) {
            Ok(handle) => handle,
            Err(_) => panic!("invalid IdVec id used"),
        }
    }

    /// Creates a handle to the value with the given id, or returns
    /// [`Error::NotLive`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert(7);
    /// let h = v.try_handle(id).unwrap();
    /// assert_eq!(*h.get(&v), 7);
    /// v.remove(id);
    /// assert_eq!(v.try_handle(id), Err(Error::NotLive(id)));
    /// ```
    pub fn try_handle(&self, id: Id) -> Result<Handle<T>, Error> {
        let pos = self.try_position_of(id)?;
        Ok(Handle::new(id, self.slots[pos].generation, self.owner))
    }

    /// Creates a handle to the value stored at position `pos`.
    pub fn handle_at(&self, pos: usize) -> Option<Handle<T>> {
        if pos < self.values.len() {
            let slot = &self.slots[pos];
            Some(Handle::new(slot.owner, slot.generation, self.owner))
        } else {
            None
        }
    }

    // Returns the position a handle resolves to, if any.
    pub(crate) fn check_handle(&self, handle: &Handle<T>) -> Result<usize, Error> {
        if handle.owner() != self.owner {
            return Err(Error::ForeignHandle);
        }
        match self.try_position_of(handle.id()) {
            Ok(pos) if self.slots[pos].generation == handle.generation() => Ok(pos),
            _ => Err(Error::StaleHandle(handle.id())),
        }
    }

    /// Returns a reference to the value a handle refers to, or `None` if the
    /// handle is stale or belongs to another `IdVec`.
    pub fn resolve(&self, handle: &Handle<T>) -> Option<&T> {
        let pos = self.check_handle(handle).ok()?;
        Some(&self.values[pos])
    }

    /// Returns a mutable reference to the value a handle refers to, or `None`
    /// if the handle is stale or belongs to another `IdVec`.
    pub fn resolve_mut(&mut self, handle: &Handle<T>) -> Option<&mut T> {
        let pos = self.check_handle(handle).ok()?;
        Some(&mut self.values[pos])
    }

    /// Returns the values as a slice, in storage order.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Returns the values as a mutable slice, in storage order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Returns the first value in storage order.
    pub fn first(&self) -> Option<&T> {
        self.values.first()
    }

    /// Returns the last value in storage order. This is the value that will
    /// be moved by the next removal of a different value.
    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    /// An iterator visiting all id-value pairs in storage order. The iterator
    /// element type is `(Id, &'a T)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let i0 = v.insert(0);
    /// let i1 = v.insert(1);
    /// let i2 = v.insert(2);
    ///
    /// let mut it = v.iter();
    /// assert_eq!(it.next(), Some((i0, &0)));
    /// assert_eq!(it.len(), 2);
    /// assert_eq!(it.next(), Some((i1, &1)));
    /// assert_eq!(it.next(), Some((i2, &2)));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: self.slots[..self.values.len()].iter(),
            values: self.values.iter(),
        }
    }

    /// An iterator visiting all id-value pairs in storage order, with mutable
    /// references to the values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let i0 = v.insert(10);
    /// let i1 = v.insert(20);
    /// let i2 = v.insert(30);
    ///
    /// for (id, n) in v.iter_mut() {
    ///     if id != i1 {
    ///         *n *= -1;
    ///     }
    /// }
    ///
    /// assert_eq!(v.as_slice(), &[-10, 20, -30]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            slots: self.slots[..self.values.len()].iter(),
            values: self.values.iter_mut(),
        }
    }

    /// An iterator visiting all live ids in storage order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let i0 = v.insert(10);
    /// let i1 = v.insert(20);
    /// let i2 = v.insert(30);
    /// v.remove(i0);
    /// let ids: Vec<_> = v.ids().collect();
    /// assert_eq!(ids, vec![i2, i1]);
    /// ```
    pub fn ids(&self) -> Ids<'_> {
        Ids {
            slots: self.slots[..self.values.len()].iter(),
        }
    }

    /// An iterator visiting all values in storage order.
    pub fn values(&self) -> slice::Iter<'_, T> {
        self.values.iter()
    }

    /// An iterator visiting all values mutably in storage order.
    pub fn values_mut(&mut self) -> slice::IterMut<'_, T> {
        self.values.iter_mut()
    }

    #[cfg(test)]
    fn check_invariants(&self) -> bool {
        // Every slot owner, retired ones included, maps back to its own
        // position, so the slot table holds a permutation of all minted ids.
        self.slots.len() >= self.values.len()
            && self.slots.len() == self.index.len()
            && self
                .slots
                .iter()
                .enumerate()
                .all(|(pos, slot)| self.index.get(slot.owner.idx()) == Some(&(pos as u32)))
    }
}

impl<T> Default for IdVec<T> {
    fn default() -> Self {
        IdVec::new()
    }
}

// A clone is a separate container, handles from the original don't resolve
// against it.
impl<T: Clone> Clone for IdVec<T> {
    fn clone(&self) -> Self {
        IdVec {
            values: self.values.clone(),
            slots: self.slots.clone(),
            index: self.index.clone(),
            owner: next_owner_tag(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IdVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_fmt_entries(self.iter(), f)
    }
}

// Comparisons look at the values in storage order only.
impl<T: PartialEq> PartialEq for IdVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<T: Eq> Eq for IdVec<T> {}

impl<T: PartialOrd> PartialOrd for IdVec<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.values.partial_cmp(&other.values)
    }
}

impl<T: Ord> Ord for IdVec<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.values.cmp(&other.values)
    }
}

impl<T: Hash> Hash for IdVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.hash(state);
    }
}

impl<T> Index<Id> for IdVec<T> {
    type Output = T;

    fn index(&self, id: Id) -> &T {
        match self.get(id) {
            Some(r) => r,
            None => panic!("invalid IdVec id used"),
        }
    }
}

impl<T> IndexMut<Id> for IdVec<T> {
    fn index_mut(&mut self, id: Id) -> &mut T {
        match self.get_mut(id) {
            Some(r) => r,
            None => panic!("invalid IdVec id used"),
        }
    }
}

impl<T> Extend<T> for IdVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for IdVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = IdVec::new();
        vec.extend(iter);
        vec
    }
}

// Iterators.
/// A draining iterator for `IdVec`.
#[derive(Debug)]
pub struct Drain<'a, T: 'a> {
    vec: &'a mut IdVec<T>,
}

/// An iterator that moves id-value pairs out of an `IdVec`.
#[derive(Debug)]
pub struct IntoIter<T> {
    slots: vec::IntoIter<Slot>,
    values: vec::IntoIter<T>,
}

/// An iterator over the id-value pairs in an `IdVec`.
#[derive(Debug, Clone)]
pub struct Iter<'a, T: 'a> {
    slots: slice::Iter<'a, Slot>,
    values: slice::Iter<'a, T>,
}

/// A mutable iterator over the id-value pairs in an `IdVec`.
#[derive(Debug)]
pub struct IterMut<'a, T: 'a> {
    slots: slice::Iter<'a, Slot>,
    values: slice::IterMut<'a, T>,
}

/// An iterator over the ids in an `IdVec`.
#[derive(Debug, Clone)]
pub struct Ids<'a> {
    slots: slice::Iter<'a, Slot>,
}

impl<'a, T> Iterator for Drain<'a, T> {
    type Item = (Id, T);

    fn next(&mut self) -> Option<(Id, T)> {
        // Popping from the back never moves another value.
        self.vec.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.vec.len();
        (len, Some(len))
    }
}

impl<'a, T> Drop for Drain<'a, T> {
    fn drop(&mut self) {
        self.for_each(|_drop| {});
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = (Id, T);

    fn next(&mut self) -> Option<(Id, T)> {
        let slot = self.slots.next()?;
        let value = self.values.next()?;
        Some((slot.owner, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Id, &'a T);

    fn next(&mut self) -> Option<(Id, &'a T)> {
        let slot = self.slots.next()?;
        let value = self.values.next()?;
        Some((slot.owner, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = (Id, &'a mut T);

    fn next(&mut self) -> Option<(Id, &'a mut T)> {
        let slot = self.slots.next()?;
        let value = self.values.next()?;
        Some((slot.owner, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<'a> Iterator for Ids<'a> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        self.slots.next().map(|slot| slot.owner)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<'a, T> IntoIterator for &'a IdVec<T> {
    type Item = (Id, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut IdVec<T> {
    type Item = (Id, &'a mut T);
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for IdVec<T> {
    type Item = (Id, T);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let mut slots = self.slots;
        slots.truncate(self.values.len());
        IntoIter {
            slots: slots.into_iter(),
            values: self.values.into_iter(),
        }
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for IterMut<'a, T> {}
impl<'a> FusedIterator for Ids<'a> {}
impl<'a, T> FusedIterator for Drain<'a, T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}
impl<'a> ExactSizeIterator for Ids<'a> {}
impl<'a, T> ExactSizeIterator for Drain<'a, T> {}
impl<T> ExactSizeIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::RefCell;
    use fxhash::FxHashMap;

    #[test]
    fn check_drops() {
        let drops = RefCell::new(0usize);
        #[derive(Clone)]
        struct CountDrop<'a>(&'a RefCell<usize>);
        impl<'a> Drop for CountDrop<'a> {
            fn drop(&mut self) {
                *self.0.borrow_mut() += 1;
            }
        }

        {
            let mut clone = {
                // Insert 1000 items.
                let mut v = IdVec::new();
                let mut ids = Vec::new();
                for _ in 0..1000 {
                    ids.push(v.insert(CountDrop(&drops)));
                }

                // Remove even ids.
                for i in (0..1000).filter(|i| i % 2 == 0) {
                    v.remove(ids[i]);
                }

                // Should only have dropped 500 so far.
                assert_eq!(*drops.borrow(), 500);

                // Let's clone ourselves and then die.
                v.clone()
            };

            // Now all original items should have been dropped exactly once.
            assert_eq!(*drops.borrow(), 1000);

            // Re-use some empty slots.
            for _ in 0..250 {
                clone.insert(CountDrop(&drops));
            }
        }

        // 1000 + 750 drops in total should have happened.
        assert_eq!(*drops.borrow(), 1750);
    }

    #[test]
    fn removal_moves_only_the_last_value() {
        let mut v = IdVec::new();
        let ids: Vec<_> = (0..6).map(|i| v.insert(i)).collect();
        let before: Vec<_> = ids.iter().map(|&id| v.position_of(id)).collect();

        v.remove(ids[1]);

        for (i, &id) in ids.iter().enumerate() {
            match i {
                1 => assert!(!v.contains(id)),
                5 => assert_eq!(v.position_of(id), 1),
                _ => assert_eq!(v.position_of(id), before[i]),
            }
        }
        assert!(v.check_invariants());
    }

    #[test]
    fn remove_last_value() {
        let mut v = IdVec::new();
        let a = v.insert("a");
        let b = v.insert("b");
        assert_eq!(v.remove(b), "b");
        assert_eq!(v.position_of(a), 0);
        assert_eq!(v.next_id(), b);
        assert_eq!(v.generation(a), Some(0));
        assert!(v.check_invariants());
    }

    #[test]
    fn retirement_stack_is_lifo() {
        let mut v = IdVec::new();
        let ids: Vec<_> = (0..4).map(|i| v.insert(i)).collect();
        v.remove(ids[0]);
        v.remove(ids[2]);
        assert_eq!(v.insert(10), ids[2]);
        assert_eq!(v.insert(11), ids[0]);
        assert_eq!(v.insert(12), Id::new(4));
        assert_eq!(v[ids[0]], 11);
        assert_eq!(v[ids[2]], 10);
        assert!(v.check_invariants());
    }

    #[test]
    fn round_trip_non_contiguous_removal() {
        let mut v = IdVec::new();
        let ids: Vec<_> = (0..100u32).map(|i| v.insert(i * 7)).collect();
        let removed: Vec<usize> = (0..100).filter(|i| i % 3 == 1 || i % 10 == 0).collect();
        for &i in &removed {
            assert_eq!(v.remove(ids[i]), i as u32 * 7);
        }

        assert_eq!(v.len(), 100 - removed.len());
        for (i, &id) in ids.iter().enumerate() {
            if removed.contains(&i) {
                assert!(!v.contains(id));
            } else {
                assert_eq!(v[id], i as u32 * 7);
            }
        }
        assert!(v.check_invariants());
    }

    #[test]
    fn clear_keeps_ids_recyclable() {
        let mut v = IdVec::new();
        let a = v.insert(1);
        let b = v.insert(2);
        v.clear();
        assert!(!v.contains(a) && !v.contains(b));
        assert!(v.check_invariants());

        let c = v.insert(3);
        assert!(c == a || c == b);
        assert_eq!(v.generation(c), Some(2));
        assert_eq!(v.insert(4), if c == a { b } else { a });
        assert_eq!(v.next_id(), Id::new(2));
    }

    #[test]
    fn drain_invalidates_ids() {
        let mut v: IdVec<_> = (0..5).collect();
        {
            let mut drain = v.drain();
            assert_eq!(drain.len(), 5);
            assert_eq!(drain.next(), Some((Id::new(4), 4)));
        }
        assert!(v.is_empty());
        assert!(v.check_invariants());
    }

    #[test]
    fn insert_with_id_panic_leaves_vec_unchanged() {
        let mut v = IdVec::new();
        let a = v.insert(1);
        v.remove(a);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            v.insert_with_id(|_| -> i32 { panic!("boom") });
        }));
        assert!(result.is_err());
        assert_eq!(v.len(), 0);
        assert_eq!(v.next_id(), a);
        let b = v.insert(2);
        assert_eq!(b, a);
        assert_eq!(v.generation(b), Some(2));
        assert!(v.check_invariants());
    }

    #[test]
    fn checked_and_unchecked_access() {
        let mut v = IdVec::new();
        let a = v.insert(5);
        assert_eq!(v.at(a), Ok(&5));
        *v.at_mut(a).unwrap() += 1;
        assert_eq!(unsafe { *v.get_unchecked(a) }, 6);
        v.remove(a);
        assert_eq!(v.at(a), Err(Error::NotLive(a)));
        assert_eq!(v.at(Id::new(99)), Err(Error::NotLive(Id::new(99))));
        assert_eq!(v.get_mut(a), None);
    }

    #[test]
    #[should_panic(expected = "invalid IdVec id used")]
    fn remove_dead_id_panics() {
        let mut v = IdVec::new();
        let a = v.insert(());
        v.remove(a);
        v.remove(a);
    }

    #[test]
    #[should_panic(expected = "invalid IdVec id used")]
    fn index_dead_id_panics() {
        let v: IdVec<u8> = IdVec::new();
        let _ = v[Id::new(0)];
    }

    #[test]
    fn positions_and_pop() {
        let mut v = IdVec::new();
        let a = v.insert('a');
        let b = v.insert('b');
        assert_eq!(v.id_at(0), Some(a));
        assert_eq!(v.id_at(2), None);
        assert_eq!(v.remove_at(0), 'a');
        assert_eq!(v.id_at(0), Some(b));
        assert_eq!(v.pop(), Some((b, 'b')));
        assert_eq!(v.pop(), None);
        assert!(v.check_invariants());
    }

    #[test]
    fn comparisons_and_debug() {
        let mut x = IdVec::new();
        let mut y = IdVec::new();
        x.insert(1);
        y.insert(1);
        assert_eq!(x, y);
        let k = y.insert(2);
        assert!(x < y);
        y.remove(k);
        assert_eq!(x, y);
        assert_eq!(alloc::format!("{:?}", x), "{0: 1}");
    }

    #[test]
    fn owned_iteration() {
        let mut v = IdVec::new();
        let a = v.insert("a");
        let b = v.insert("b");
        let c = v.insert("c");
        v.remove(a);
        let pairs: Vec<_> = v.into_iter().collect();
        assert_eq!(pairs, vec![(c, "c"), (b, "b")]);
    }

    quickcheck! {
        fn qc_idvec_equiv_hashmap(operations: Vec<(u8, u32)>) -> bool {
            let mut hm = FxHashMap::default();
            let mut hm_keys = Vec::new();
            let mut unique_key = 0u32;
            let mut v = IdVec::new();
            let mut handles = Vec::new();

            for (op, val) in operations {
                match op % 4 {
                    // Insert.
                    0 => {
                        hm.insert(unique_key, val);
                        hm_keys.push(unique_key);
                        unique_key += 1;

                        let id = v.insert(val);
                        handles.push(v.handle(id));
                    }

                    // Delete.
                    1 => {
                        if hm_keys.is_empty() { continue; }

                        let idx = val as usize % hm_keys.len();
                        let removed = v.try_remove_handle(&handles[idx]).ok();
                        if hm.remove(&hm_keys[idx]) != removed {
                            return false;
                        }
                    }

                    // Access.
                    2 => {
                        if hm_keys.is_empty() { continue; }
                        let idx = val as usize % hm_keys.len();
                        let (hm_key, handle) = (&hm_keys[idx], &handles[idx]);

                        if hm.contains_key(hm_key) != handle.is_valid(&v) ||
                           hm.get(hm_key) != v.resolve(handle) {
                            return false;
                        }
                    }

                    // Retain.
                    3 => {
                        let modulus = val % 7 + 2;
                        v.retain(|_, x| *x % modulus != 0);
                        hm.retain(|_, x| *x % modulus != 0);
                    }

                    _ => unreachable!(),
                }

                if !v.check_invariants() || v.len() != hm.len() {
                    return false;
                }
            }

            let mut vv: Vec<_> = v.values().collect();
            let mut hmv: Vec<_> = hm.values().collect();
            vv.sort();
            hmv.sort();
            vv == hmv
        }

        fn qc_next_id_predicts_insert(operations: Vec<(bool, u8)>) -> bool {
            let mut v = IdVec::new();
            for (insert, pick) in operations {
                if insert || v.is_empty() {
                    let expected = v.next_id();
                    if v.insert(pick) != expected {
                        return false;
                    }
                } else {
                    let pos = pick as usize % v.len();
                    v.remove_at(pos);
                }
            }
            v.check_invariants()
        }
    }
}
