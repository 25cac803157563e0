use libfuzzer_sys::arbitrary::{self, Arbitrary};

#[derive(Arbitrary, Debug)]
pub struct Target {
    pub ctor: Constructor,
    pub ops: Vec<Op>,
}

#[derive(Arbitrary, Debug)]
pub enum Constructor {
    New,
    WithCapacity(u8),
}

#[derive(Arbitrary, Debug)]
pub enum Op {
    Reserve(u8),
    Insert(u32),
    InsertWithId,
    TryInsert(u32),
    Remove(usize),
    RemoveAt(usize),
    RemoveStale(usize),
    Pop,
    Retain(Vec<bool>),
    Clear,
    Drain,
    ShrinkToFit,
}
