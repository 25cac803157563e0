#![deny(missing_docs, missing_debug_implementations)]
#![no_std]
#![cfg_attr(all(nightly, doc), feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/idvec/0.1.0")]
#![crate_name = "idvec"]

//! # idvec
//!
//! This library provides [`IdVec`], a vector that hands out a stable [`Id`]
//! for every inserted value. The values themselves are stored contiguously in
//! a single [`Vec`](alloc::vec::Vec), so iteration is as fast as iterating a
//! slice, while an id keeps referring to the same value no matter how many
//! other values are inserted or removed in the meantime. Insertion is
//! amortized O(1), lookup and removal are O(1).
//!
//! Unlike the keys of a slot map an [`Id`] carries no version: once a value is
//! removed its id is recycled by a later insertion. To detect use of a value
//! after it has been removed, create a [`Handle`]. A handle remembers the
//! generation of the slot at the moment it was created and refuses to resolve
//! once that value has been removed, even if the id has since been handed to
//! a different value.
//!
//! # Examples
//!
//! ```
//! # use idvec::*;
//! let mut v = IdVec::new();
//! let a = v.insert("a");
//! let b = v.insert("b");
//! let c = v.insert("c");
//! let ha = v.handle(a);
//!
//! assert_eq!(v.remove(a), "a");
//! assert_eq!(v[b], "b");
//! assert_eq!(v[c], "c");  // c was moved into a's old position.
//! assert_eq!(v.position_of(c), 0);
//!
//! let d = v.insert("d");  // Id of a is recycled.
//! assert_eq!(d, a);
//! assert!(!ha.is_valid(&v));  // But the handle knows it is stale.
//! assert_eq!(v.resolve(&ha), None);
//! ```
//!
//! # Implementation
//!
//! Three parallel tables are kept. The values live in a `Vec<T>`. Next to it
//! a slot table records, per storage position, which id owns that position
//! and the generation of that occupancy. Finally an index table maps every id
//! ever minted to its storage position.
//!
//! A removal swaps the removed value with the last one, swaps their slot table
//! entries and their index table entries, and pops. The removed id's slot
//! entry thereby ends up right past the live region, where the next insertion
//! picks it up again. The slot table beyond the live region is therefore an
//! implicit stack of retired ids, and no separate free list is needed.
//!
//! Generations are bumped on removal and once more on reuse. They are `u64`
//! and wrap around after 2<sup>64</sup> reuses of one slot, at which point a
//! stale handle could in theory resolve again. An `IdVec` can hold up to
//! 2<sup>32</sup> - 1 values at a time.
//!
//! A handle does not borrow the `IdVec` it came from. Instead every `IdVec`
//! gets a unique owner tag on construction (a clone gets a new one), and a
//! handle only resolves against the container carrying the same tag. This
//! makes it safe to move the container around while handles exist.
//!
//! # Cargo features
//!
//! - `std` (enabled by default): implements `std::error::Error` for
//!   [`Error`]. Without it the crate is `no_std` and only needs `alloc`.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;

use core::fmt;

mod error;
mod handle;
mod slot;
mod util;

pub mod vec;

pub use error::Error;
pub use handle::Handle;
pub use vec::IdVec;

/// Identifier of a value stored in an [`IdVec`].
///
/// An id is a plain index that stays attached to its value until the value
/// is removed. After that the id may be handed out again for a new value, so
/// hold on to a [`Handle`] when you need to tell the two apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Creates an id from its raw index.
    ///
    /// Ids are normally obtained from [`IdVec::insert`], but an id built by
    /// hand is safe to use with any checked method.
    ///
    /// # Examples
    ///
    /// ```
    /// # use idvec::*;
    /// let mut v = IdVec::new();
    /// let id = v.insert(1.5);
    /// assert_eq!(Id::new(0), id);
    /// assert_eq!(v.get(Id::new(7)), None);
    /// ```
    pub const fn new(idx: u32) -> Self {
        Id(idx)
    }

    /// Returns the raw index of this id.
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub(crate) fn idx(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    fn from(idx: u32) -> Self {
        Id(idx)
    }
}

impl From<Id> for u32 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl From<Id> for u64 {
    fn from(id: Id) -> Self {
        u64::from(id.0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
