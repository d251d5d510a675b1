//! Behavior shared by every storage policy, and the quirks of each

use std::cell::Cell;
use std::mem;
use std::rc::Rc;
use vecx::{
    erase_if, Error, HeaderStorage, HeapStorage, InlineStorage, InlineVec, MappedStorage,
    SmallStorage, SmallVec, StableVec, Storage, ThinVec, Vector,
};

/// Counts drops into a shared cell
struct Tracked(u32, Rc<Cell<usize>>);

impl Drop for Tracked {
    fn drop(&mut self) {
        self.1.set(self.1.get() + 1);
    }
}

fn every_element_dropped_once<S: Storage<Tracked>>() {
    let drops = Rc::new(Cell::new(0));
    {
        let mut v = Vector::<Tracked, S>::new();
        for i in 0..10 {
            v.push(Tracked(i, drops.clone()));
        }
        v.remove(3);
        assert_eq!(drops.get(), 1);
        v.erase(0..2);
        assert_eq!(drops.get(), 3);
        v.truncate(5);
        assert_eq!(drops.get(), 5);
        v.insert(1, Tracked(99, drops.clone()));
        assert_eq!(v.len(), 6);
        assert_eq!(v[1].0, 99);
    }
    assert_eq!(drops.get(), 11);
}

#[test]
fn drops_balance_for_each_policy() {
    every_element_dropped_once::<HeapStorage<Tracked>>();
    every_element_dropped_once::<SmallStorage<Tracked, 4>>();
    every_element_dropped_once::<InlineStorage<Tracked, 16>>();
    every_element_dropped_once::<MappedStorage<Tracked, 64>>();
    every_element_dropped_once::<HeaderStorage<Tracked>>();
}

#[test]
fn small_vector_spills_once() {
    let mut v = SmallVec::<i32, 3>::new();
    let inside = |v: &SmallVec<i32, 3>| {
        let start = v as *const _ as usize;
        let data = v.as_ptr() as usize;
        data >= start && data < start + mem::size_of_val(v)
    };
    for x in [10, 20, 30] {
        v.push(x);
    }
    assert!(v.is_inline());
    assert!(inside(&v));
    v.push(40);
    assert!(!v.is_inline());
    assert!(!inside(&v));
    assert_eq!(v, [10, 20, 30, 40]);

    v.clear();
    assert!(!v.is_inline());
    v.push(1);
    assert!(!v.is_inline());
    assert_eq!(v, [1]);
}

#[test]
fn inline_vector_reports_overflow() {
    let mut v = InlineVec::<u8, 2>::new();
    v.push(1);
    v.push(2);
    assert_eq!(
        v.try_push(3),
        Err(Error::CapacityExceeded {
            requested: 3,
            max: 2
        })
    );
    assert_eq!(v, [1, 2]);
    assert!(v.try_reserve(2).is_ok());
    assert!(v.try_reserve(3).is_err());
}

#[test]
#[should_panic(expected = "exceeds the maximum of 2")]
fn inline_vector_push_panics() {
    let mut v = InlineVec::<u8, 2>::from([1, 2]);
    v.push(3);
}

#[test]
fn stable_vector_never_moves() {
    let mut v = StableVec::<u64, 100_000>::new();
    v.reserve(1);
    let first = v.as_ptr();
    for i in 0..50_000 {
        v.push(i);
    }
    assert_eq!(v.as_ptr(), first);
    assert_eq!(v.capacity(), 100_000);
    assert_eq!(v[49_999], 49_999);
}

#[test]
fn thin_vector_is_one_word() {
    assert_eq!(mem::size_of::<ThinVec<String>>(), mem::size_of::<usize>());
    let mut v = ThinVec::<String>::new();
    assert_eq!(v.capacity(), 0);
    v.push("x".to_string());
    v.push("y".to_string());
    assert_eq!(v, ["x", "y"]);
}

#[test]
fn assign_reuses_or_replaces() {
    let mut v = Vector::<u32>::with_capacity(8);
    v.extend_from_slice(&[1, 2, 3, 4, 5]);

    v.assign_slice(&[7, 8]);
    assert_eq!(v, [7, 8]);
    assert_eq!(v.capacity(), 8);

    v.assign_slice(&[1, 2, 3, 4, 5, 6]);
    assert_eq!(v, [1, 2, 3, 4, 5, 6]);
    assert_eq!(v.capacity(), 8);

    v.assign_slice(&[0; 11]);
    assert_eq!(v.len(), 11);
    assert_eq!(v.capacity(), 11);

    v.assign_elem(3, &9);
    assert_eq!(v, [9, 9, 9]);
    v.assign_iter(5..8);
    assert_eq!(v, [5, 6, 7]);
}

#[test]
fn editing() {
    let mut v = Vector::<char>::from(['a', 'b', 'c', 'd', 'e']);
    v.insert(5, 'f');
    v.insert_slice(0, &['x', 'y']);
    assert_eq!(v, ['x', 'y', 'a', 'b', 'c', 'd', 'e', 'f']);
    v.erase(..2);
    assert_eq!(v.remove(0), 'a');
    assert_eq!(v.swap_remove(0), 'b');
    assert_eq!(v, ['f', 'c', 'd', 'e']);
    assert_eq!(v.try_remove(4), Err(Error::IndexOutOfRange { index: 4, len: 4 }));
    assert!(v.try_insert(5, 'z').is_err());
    assert!(v.try_erase(2..9).is_err());
    v.insert_iter(2, "mn".chars());
    assert_eq!(v, ['f', 'c', 'm', 'n', 'd', 'e']);
    assert_eq!(v.at(1), Ok(&'c'));
    assert!(v.at(6).is_err());
}

#[test]
fn retain_and_dedup_count() {
    let mut v = SmallVec::<u32, 2>::from([1, 1, 2, 3, 3, 3, 4]);
    assert_eq!(v.dedup(), 3);
    assert_eq!(v, [1, 2, 3, 4]);
    assert_eq!(v.retain(|x| x % 2 == 0), 2);
    assert_eq!(v, [2, 4]);
    assert_eq!(erase_if(&mut v, |_| true), 2);
    assert!(v.is_empty());
}

#[test]
fn comparisons_span_policies() {
    let a = Vector::<u8>::from([1, 2, 3]);
    let b = SmallVec::<u8, 8>::from([1, 2, 3]);
    let c = ThinVec::<u8>::from([1, 2, 4]);
    assert_eq!(a, b);
    assert_ne!(b, c);
    assert!(a < c);
    assert_eq!(a, vec![1, 2, 3]);
    assert_eq!(Vector::<u8>::new(), InlineVec::<u8, 4>::new());
    assert!(Vector::<u8>::new() < a);
}

#[test]
fn clone_and_clear() {
    let v = SmallVec::<String, 1>::from(["p".to_string(), "q".to_string()]);
    let mut w = v.clone();
    assert_eq!(v, w);
    w.clear();
    w.clear();
    assert!(w.is_empty());
    w.clone_from(&v);
    assert_eq!(w, v);
}

#[test]
fn partial_iteration_drops_the_rest() {
    let drops = Rc::new(Cell::new(0));
    let v: ThinVec<Tracked> = (0..6).map(|i| Tracked(i, drops.clone())).collect();
    let mut it = v.into_iter();
    let first = it.next().map(|t| t.0);
    assert_eq!(first, Some(0));
    assert_eq!(drops.get(), 1);
    drop(it);
    assert_eq!(drops.get(), 6);
}

#[test]
fn resize_fills() {
    let mut v = Vector::<u16>::with_len(2);
    v.resize(4, &7);
    assert_eq!(v, [0, 0, 7, 7]);
    v.resize_with(1, || unreachable!());
    assert_eq!(v, [0]);
    let w = InlineVec::<u16, 3>::from_elem(&5, 3);
    assert_eq!(w, [5, 5, 5]);
    assert!(InlineVec::<u16, 3>::try_from_elem(&5, 4).is_err());
}
