use crate::Id;

// One entry of the slot table, indexed by storage position.
//
// Below the live count the entry describes the value stored at that position.
// At or above it the entry is a retired id waiting to be recycled, the one at
// exactly the live count being next in line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub owner: Id,
    pub generation: u64,
}

impl Slot {
    // Entry for a freshly minted id.
    pub fn new(owner: Id) -> Self {
        Self {
            owner,
            generation: 0,
        }
    }

    // Called when the owner is removed. Invalidates every handle taken
    // during the occupancy that just ended.
    #[inline(always)]
    pub fn retire(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    // Called when a retired id is handed out again. Bumping once more keeps
    // the new occupancy distinct from both the old one and the retired state.
    #[inline(always)]
    pub fn revive(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}
