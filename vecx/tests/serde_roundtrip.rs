#![cfg(feature = "serde")]

use vecx::{InlineVec, SmallVec, Vector};

#[test]
fn json() {
    let v = SmallVec::<u32, 2>::from([3, 1, 4]);
    let text = serde_json::to_string(&v).unwrap();
    assert_eq!(text, "[3,1,4]");
    let back: Vector<u32> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, v);
}

#[test]
fn overflow_is_a_decode_error() {
    let err = serde_json::from_str::<InlineVec<u8, 2>>("[1,2,3]").unwrap_err();
    assert!(err.to_string().contains("exceeds the maximum of 2"));
}
