#![no_main]
use libfuzzer_sys::fuzz_target;

use idvec::{Handle, IdVec};

mod target;
use target::{Constructor, Op, Target};

fuzz_target!(|data: Target| {
    let mut vec = match data.ctor {
        Constructor::New => IdVec::new(),
        Constructor::WithCapacity(n) => IdVec::with_capacity(n as usize),
    };

    // Every handle ever created, with the value it was created for.
    let mut handles: Vec<(Handle<u32>, u32)> = Vec::new();
    let mut counter = 0u32;

    for op in data.ops {
        match op {
            Op::Reserve(n) => vec.reserve(n as usize),
            Op::Insert(x) => {
                let id = vec.insert(x);
                handles.push((vec.handle(id), x));
            }
            Op::InsertWithId => {
                counter += 1;
                let id = vec.insert_with_id(|id| id.to_u32() ^ counter);
                assert_eq!(vec[id], id.to_u32() ^ counter);
                handles.push((vec.handle(id), vec[id]));
            }
            Op::TryInsert(x) => {
                let id = vec.try_insert(x).unwrap();
                handles.push((vec.handle(id), x));
            }
            Op::Remove(i) => {
                if let Some((h, x)) = handles.get(i) {
                    if h.is_valid(&vec) {
                        assert_eq!(vec.remove(h.id()), *x);
                    }
                } else {
                    return;
                }
            }
            Op::RemoveAt(pos) => {
                if vec.is_empty() {
                    return;
                }
                vec.remove_at(pos % vec.len());
            }
            Op::RemoveStale(i) => {
                if let Some((h, _)) = handles.get(i) {
                    let was_valid = h.is_valid(&vec);
                    assert_eq!(vec.try_remove_handle(h).is_ok(), was_valid);
                } else {
                    return;
                }
            }
            Op::Pop => {
                vec.pop();
            }
            Op::Retain(s) => {
                let mut i = s.into_iter();
                vec.retain(|_id, _v| i.next().unwrap_or(false));
            }
            Op::Clear => vec.clear(),
            Op::Drain => {
                vec.drain();
            }
            Op::ShrinkToFit => vec.shrink_to_fit(),
        }

        // A live handle always resolves to the value it was created for.
        for (h, x) in &handles {
            if let Some(v) = vec.resolve(h) {
                assert_eq!(v, x);
            }
        }
        assert_eq!(vec.ids().filter(|&id| vec.contains(id)).count(), vec.len());
    }
});
