//! Ordered keyframe storage and copy-on-write sharing.
//!
//! A [`KeyframeList`] is a plain sorted vector of keys plus a mutation
//! counter. [`SharedKeyframes`] wraps it in a non-atomic reference count so
//! that cloned animators can share one list until one of them writes; the
//! writer then privatizes a deep copy (see [`SharedKeyframes::make_mut`]).

use std::ops::Deref;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::keyframe::{KeyFunction, Keyframe};

/// Keys sorted ascending by frame, at most one key per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeList<T> {
    keys: Vec<Keyframe<T>>,
    version: u64,
}

impl<T> Default for KeyframeList<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            version: 0,
        }
    }
}

impl<T> KeyframeList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key. Callers normally add keys in increasing frame order; a
    /// frame at or before the last key is routed through ordered insertion
    /// so the list stays sorted.
    pub fn add(&mut self, frame: i32, value: T, function: KeyFunction) {
        self.push_key(Keyframe::new(frame, value, function));
    }

    pub fn push_key(&mut self, key: Keyframe<T>) {
        match self.keys.last() {
            Some(last) if last.frame >= key.frame => self.add_ordered_key(key),
            _ => {
                self.keys.push(key);
                self.version += 1;
            }
        }
    }

    /// Insert preserving frame order. A key already at `frame` is replaced.
    pub fn add_ordered(&mut self, frame: i32, value: T, function: KeyFunction) {
        self.add_ordered_key(Keyframe::new(frame, value, function));
    }

    pub fn add_ordered_key(&mut self, key: Keyframe<T>) {
        let pos = self.keys.partition_point(|k| k.frame < key.frame);
        match self.keys.get_mut(pos) {
            Some(existing) if existing.frame == key.frame => *existing = key,
            _ => self.keys.insert(pos, key),
        }
        self.version += 1;
    }

    /// Exact-frame lookup.
    pub fn get_by_frame(&self, frame: i32) -> Option<&Keyframe<T>> {
        self.keys
            .binary_search_by_key(&frame, |k| k.frame)
            .ok()
            .map(|i| &self.keys[i])
    }

    pub fn get(&self, index: usize) -> Option<&Keyframe<T>> {
        self.keys.get(index)
    }

    /// Replace the value and function of the key at `index`, keeping its frame.
    pub fn set_at(&mut self, index: usize, value: T, function: KeyFunction) -> bool {
        match self.keys.get_mut(index) {
            Some(k) => {
                k.value = value;
                k.function = function;
                self.version += 1;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Keyframe<T>> {
        if index >= self.keys.len() {
            return None;
        }
        self.version += 1;
        Some(self.keys.remove(index))
    }

    pub fn remove_at_frame(&mut self, frame: i32) -> Option<Keyframe<T>> {
        let i = self.keys.binary_search_by_key(&frame, |k| k.frame).ok()?;
        self.remove(i)
    }

    pub fn clear(&mut self) {
        if !self.keys.is_empty() {
            self.keys.clear();
            self.version += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyframe<T>> {
        self.keys.iter()
    }

    pub fn as_slice(&self) -> &[Keyframe<T>] {
        &self.keys
    }

    /// Frame of the last key, 0 for an empty list.
    pub fn last_frame(&self) -> i32 {
        self.keys.last().map_or(0, |k| k.frame)
    }

    /// Mutation counter; bumps on every insert, replace, remove and clear.
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl<T> std::ops::Index<usize> for KeyframeList<T> {
    type Output = Keyframe<T>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.keys[index]
    }
}

impl<'a, T> IntoIterator for &'a KeyframeList<T> {
    type Item = &'a Keyframe<T>;
    type IntoIter = std::slice::Iter<'a, Keyframe<T>>;
    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl<T> FromIterator<Keyframe<T>> for KeyframeList<T> {
    fn from_iter<I: IntoIterator<Item = Keyframe<T>>>(iter: I) -> Self {
        let mut list = KeyframeList::new();
        for key in iter {
            list.push_key(key);
        }
        list
    }
}

// Serialized as a bare sequence of keys; the version counter is runtime-only.
impl<T: Serialize> Serialize for KeyframeList<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.keys)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for KeyframeList<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let keys = Vec::<Keyframe<T>>::deserialize(deserializer)?;
        Ok(keys.into_iter().collect())
    }
}

/// Reference-counted handle to a keyframe list.
///
/// Cloning the handle (or calling [`share`](Self::share)) adds a reference;
/// dropping it releases one. Reads go through `Deref`; writes must go
/// through [`make_mut`](Self::make_mut), which deep-copies the list first if
/// anyone else still holds it.
#[derive(Debug)]
pub struct SharedKeyframes<T> {
    inner: Rc<KeyframeList<T>>,
}

impl<T> SharedKeyframes<T> {
    pub fn new(list: KeyframeList<T>) -> Self {
        Self {
            inner: Rc::new(list),
        }
    }

    /// Add a reference to the same list.
    pub fn share(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Number of live handles to this list.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// True when both handles point at the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> SharedKeyframes<T> {
    /// Writable access; privatizes a deep copy when the list is shared.
    pub fn make_mut(&mut self) -> &mut KeyframeList<T> {
        Rc::make_mut(&mut self.inner)
    }
}

impl<T> Clone for SharedKeyframes<T> {
    fn clone(&self) -> Self {
        self.share()
    }
}

impl<T> Default for SharedKeyframes<T> {
    fn default() -> Self {
        Self::new(KeyframeList::new())
    }
}

impl<T> Deref for SharedKeyframes<T> {
    type Target = KeyframeList<T>;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use KeyFunction::*;

    fn frames<T>(list: &KeyframeList<T>) -> Vec<i32> {
        list.iter().map(|k| k.frame).collect()
    }

    #[test]
    fn add_ordered_keeps_sorted_and_replaces_duplicates() {
        let mut list = KeyframeList::new();
        list.add_ordered(10, 1.0f32, Linear);
        list.add_ordered(0, 0.0, Linear);
        list.add_ordered(5, 0.5, Steep);
        list.add_ordered(5, 0.7, Spline);
        assert_eq!(frames(&list), vec![0, 5, 10]);
        let k = list.get_by_frame(5).unwrap();
        assert_eq!(k.value, 0.7);
        assert_eq!(k.function, Spline);
        assert!(list.get_by_frame(6).is_none());
    }

    #[test]
    fn add_out_of_order_falls_back_to_ordered_insert() {
        let mut list = KeyframeList::new();
        list.add(0, 0, Linear);
        list.add(20, 2, Linear);
        list.add(10, 1, Linear);
        list.add(20, 3, Linear);
        assert_eq!(frames(&list), vec![0, 10, 20]);
        assert_eq!(list.get_by_frame(20).unwrap().value, 3);
    }

    #[test]
    fn version_bumps_on_mutation() {
        let mut list = KeyframeList::new();
        let v0 = list.version();
        list.add(0, 1.0f32, Linear);
        let v1 = list.version();
        assert!(v1 > v0);
        list.remove_at_frame(0);
        assert!(list.version() > v1);
        let v2 = list.version();
        list.clear();
        assert_eq!(list.version(), v2, "clearing an empty list is not a mutation");
        assert!(list.remove(3).is_none());
        assert_eq!(list.version(), v2);
    }

    #[test]
    fn shared_copy_on_write_isolation() {
        let mut list = KeyframeList::new();
        list.add(0, 0.0f32, Linear);
        list.add(10, 10.0, Linear);
        let original = SharedKeyframes::new(list);
        let mut copy = original.share();
        assert_eq!(original.ref_count(), 2);
        assert!(copy.ptr_eq(&original));

        let version_before = original.version();
        copy.make_mut().add(20, 20.0, Linear);

        assert!(!copy.ptr_eq(&original));
        assert_eq!(original.ref_count(), 1);
        assert_eq!(copy.ref_count(), 1);
        assert_eq!(frames(&original), vec![0, 10]);
        assert_eq!(original.version(), version_before);
        assert_eq!(frames(&copy), vec![0, 10, 20]);
    }

    #[test]
    fn make_mut_on_unshared_list_does_not_copy() {
        let mut shared = SharedKeyframes::new(KeyframeList::<i32>::new());
        let before = &*shared as *const KeyframeList<i32>;
        shared.make_mut().add(1, 1, Steep);
        let after = &*shared as *const KeyframeList<i32>;
        assert_eq!(before, after);
    }

    #[test]
    fn dropping_a_handle_releases() {
        let a = SharedKeyframes::new(KeyframeList::<f32>::new());
        {
            let _b = a.share();
            let _c = a.clone();
            assert_eq!(a.ref_count(), 3);
        }
        assert_eq!(a.ref_count(), 1);
    }

    #[test]
    fn serializes_as_bare_sequence() {
        let mut list = KeyframeList::new();
        list.add(0, 1.5f32, Steep);
        list.add(4, 2.0, Linear);
        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "frame": 0, "value": 1.5, "function": "steep" },
                { "frame": 4, "value": 2.0, "function": "linear" }
            ])
        );
        let back: KeyframeList<f32> = serde_json::from_value(json).unwrap();
        assert_eq!(frames(&back), vec![0, 4]);
    }
}
