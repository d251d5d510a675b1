//! Serde support, as a plain sequence

use crate::{Storage, Vector};
use serde::de::{Error as _, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

impl<T: Serialize, S: Storage<T>> Serialize for Vector<T, S> {
    fn serialize<Z: Serializer>(&self, serializer: Z) -> Result<Z::Ok, Z::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Pushes each sequence element in turn
struct SeqVisitor<T, S>(PhantomData<(T, S)>);

impl<'de, T: Deserialize<'de>, S: Storage<T>> Visitor<'de> for SeqVisitor<T, S> {
    type Value = Vector<T, S>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut v = Vector::new();
        while let Some(item) = seq.next_element()? {
            v.try_push(item).map_err(A::Error::custom)?;
        }
        Ok(v)
    }
}

impl<'de, T: Deserialize<'de>, S: Storage<T>> Deserialize<'de> for Vector<T, S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SeqVisitor(PhantomData))
    }
}
