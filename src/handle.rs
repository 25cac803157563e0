use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

use crate::{Id, IdVec};

/// A generation-checked reference to a value in an [`IdVec`].
///
/// A handle stores the id of a value, the generation of that id's current
/// occupancy and a tag identifying the `IdVec` it was created from. It does
/// not borrow the container: the value may be removed at any time, after
/// which the handle reports itself as stale, even when the id has been
/// recycled for a newer value in the meantime.
///
/// Handles are cheap to copy and any number of them may refer to the same
/// value.
///
/// # Examples
///
/// ```
/// # use idvec::*;
/// let mut v = IdVec::new();
/// let id = v.insert(String::from("hello"));
/// let h = v.handle(id);
///
/// h.get_mut(&mut v).push_str(", world");
/// assert_eq!(h.get(&v), "hello, world");
///
/// v.remove(id);
/// v.insert(String::from("someone else"));
/// assert!(!h.is_valid(&v));
/// ```
pub struct Handle<T> {
    id: Id,
    generation: u64,
    owner: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(id: Id, generation: u64, owner: usize) -> Self {
        Self {
            id,
            generation,
            owner,
            _marker: PhantomData,
        }
    }

    /// Creates a handle that is not attached to any `IdVec` and is never
    /// valid. This is also what `Handle::default()` returns.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let v: IdVec<i32> = IdVec::new();
    /// let h = Handle::null();
    /// assert!(h.is_null());
    /// assert!(!h.is_valid(&v));
    /// assert_eq!(h, Handle::default());
    /// ```
    pub fn null() -> Self {
        Self::new(Id::new(u32::MAX), 0, 0)
    }

    /// Checks if this is the null handle.
    pub fn is_null(&self) -> bool {
        self.owner == 0
    }

    /// Returns the id this handle refers to.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the generation captured when this handle was created.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn owner(&self) -> usize {
        self.owner
    }

    /// Returns `true` if `vec` is the container this handle was created from
    /// and the value it referred to has not been removed since.
    pub fn is_valid(&self, vec: &IdVec<T>) -> bool {
        vec.check_handle(self).is_ok()
    }

    /// Returns the value this handle refers to.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not valid for `vec`. Use
    /// [`IdVec::resolve`] for a checked lookup.
    pub fn get<'a>(&self, vec: &'a IdVec<T>) -> &'a T {
        match vec.resolve(self) {
            Some(value) => value,
            None => panic!("invalid IdVec handle used"),
        }
    }

    /// Returns the value this handle refers to, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle is not valid for `vec`. Use
    /// [`IdVec::resolve_mut`] for a checked lookup.
    pub fn get_mut<'a>(&self, vec: &'a mut IdVec<T>) -> &'a mut T {
        match vec.resolve_mut(self) {
            Some(value) => value,
            None => panic!("invalid IdVec handle used"),
        }
    }
}

// The trait impls are written by hand so they don't require anything of T.
impl<T> Copy for Handle<T> {}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.generation == other.generation && self.owner == other.owner
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.generation.hash(state);
        self.owner.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Handle(null)")
        } else {
            write!(f, "Handle({}#{})", self.id, self.generation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use alloc::format;
    use alloc::vec::Vec;

    #[test]
    fn handle_survives_unrelated_churn() {
        let mut v = IdVec::new();
        let keep = v.insert(-1);
        let h = v.handle(keep);
        for round in 0..10 {
            let ids: Vec<_> = (0..20).map(|i| v.insert(round * 100 + i)).collect();
            for id in ids.into_iter().rev().step_by(2) {
                v.remove(id);
            }
            assert!(h.is_valid(&v));
            assert_eq!(*h.get(&v), -1);
        }
    }

    #[test]
    fn stale_after_recycle() {
        let mut v = IdVec::new();
        let a = v.insert("old");
        let copies = [v.handle(a), v.handle(a)];
        v.remove(a);
        let b = v.insert("new");
        assert_eq!(a, b);

        let fresh = v.handle(b);
        assert_ne!(fresh, copies[0]);
        for h in &copies {
            assert!(!h.is_valid(&v));
            assert_eq!(v.resolve(h), None);
        }
        assert_eq!(*fresh.get(&v), "new");
    }

    #[test]
    fn foreign_handles_never_resolve() {
        let mut x = IdVec::new();
        let id = x.insert(1);
        let h = x.handle(id);

        let mut y = IdVec::new();
        y.insert(2);
        assert!(!h.is_valid(&y));
        assert_eq!(y.try_remove_handle(&h), Err(Error::ForeignHandle));

        let clone = x.clone();
        assert!(!h.is_valid(&clone));

        // Moving the container keeps its identity.
        let moved = x;
        assert!(h.is_valid(&moved));
    }

    #[test]
    fn handle_at_position() {
        let mut v = IdVec::new();
        let a = v.insert('a');
        let b = v.insert('b');
        v.remove(a);
        let h = v.handle_at(0).unwrap();
        assert_eq!(h.id(), b);
        assert_eq!(v.handle_at(1), None);
        assert_eq!(v.remove_handle(&h), 'b');
        assert!(v.is_empty());
    }

    #[test]
    fn try_handle_reports_dead_ids() {
        let v: IdVec<()> = IdVec::new();
        assert_eq!(v.try_handle(Id::new(3)), Err(Error::NotLive(Id::new(3))));
    }

    #[test]
    fn debug_format() {
        let mut v = IdVec::new();
        let id = v.insert(0u8);
        v.remove(id);
        let id = v.insert(1u8);
        assert_eq!(format!("{:?}", v.handle(id)), "Handle(0#2)");
        assert_eq!(format!("{:?}", Handle::<u8>::null()), "Handle(null)");
    }

    #[test]
    #[should_panic(expected = "invalid IdVec handle used")]
    fn get_stale_panics() {
        let mut v = IdVec::new();
        let id = v.insert(5);
        let h = v.handle(id);
        v.remove(id);
        h.get(&v);
    }

    quickcheck! {
        fn qc_no_aliasing_after_recycle(operations: Vec<(bool, u8)>) -> bool {
            let mut v = IdVec::new();
            let mut live = Vec::new();
            let mut dead = Vec::new();

            for (insert, pick) in operations {
                if insert || live.is_empty() {
                    let id = v.insert(pick);
                    live.push((v.handle(id), pick));
                } else {
                    let (h, value) = live.swap_remove(pick as usize % live.len());
                    if v.remove_handle(&h) != value {
                        return false;
                    }
                    dead.push(h);
                }

                if dead.iter().any(|h| h.is_valid(&v)) {
                    return false;
                }
                if live.iter().any(|(h, value)| v.resolve(h) != Some(value)) {
                    return false;
                }
            }
            true
        }
    }
}
