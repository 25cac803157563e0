use crate::Id;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

// Zero is never handed out, null handles use it.
static NEXT_OWNER_TAG: AtomicUsize = AtomicUsize::new(1);

/// Returns a fresh tag identifying one `IdVec` instance.
///
/// Tags are unique until the counter wraps, which takes `usize::MAX`
/// constructions.
pub fn next_owner_tag() -> usize {
    loop {
        let tag = NEXT_OWNER_TAG.fetch_add(1, Ordering::Relaxed);
        if tag != 0 {
            return tag;
        }
    }
}

/// Debug format an id vector as a map.
/// Ids are formatted as bare numbers (`3` instead of `Id(3)`).
pub fn debug_fmt_entries<I, V>(entries: I, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    I: IntoIterator<Item = (Id, V)>,
    V: fmt::Debug,
{
    let entries = entries.into_iter().map(|(id, v)| (id.to_u32(), v));
    f.debug_map().entries(entries).finish()
}
