//! PropertyBag: a small dynamic object model.
//!
//! Properties live in a flat slot arena keyed by their canonical path
//! ("Position", "Items[2].Color", "Points"). A slot is either a single value
//! or a list of values of one kind; list elements are addressed by the final
//! index of a path ("Points[3]"). Slot indices are stable for the lifetime of
//! the bag and double as opaque handles for property targets.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{PropertyPath, Value, ValueKind};

/// Access flags of a declared property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFlags {
    pub writable: bool,
    /// Whether writes to this property are a signal for the owner
    /// (animation trigger) rather than plain state.
    pub triggerable: bool,
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self {
            writable: true,
            triggerable: false,
        }
    }
}

impl PropertyFlags {
    pub const READ_ONLY: PropertyFlags = PropertyFlags {
        writable: false,
        triggerable: false,
    };
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SlotData {
    Single(Value),
    List(Vec<Value>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub kind: ValueKind,
    pub flags: PropertyFlags,
    pub data: SlotData,
}

impl Slot {
    /// Number of elements for list slots.
    pub fn len(&self) -> Option<usize> {
        match &self.data {
            SlotData::List(items) => Some(items.len()),
            SlotData::Single(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PropertyBag {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
    writes: u64,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a writable single-value property.
    pub fn define(&mut self, name: &str, value: Value) -> usize {
        self.define_with(name, value, PropertyFlags::default())
    }

    /// Declare a single-value property with explicit flags.
    pub fn define_with(&mut self, name: &str, value: Value, flags: PropertyFlags) -> usize {
        let kind = value.kind();
        self.insert(Slot {
            name: name.to_string(),
            kind,
            flags,
            data: SlotData::Single(value),
        })
    }

    /// Declare a writable list property whose elements are all of `kind`.
    pub fn define_list(&mut self, name: &str, kind: ValueKind, items: Vec<Value>) -> usize {
        self.insert(Slot {
            name: name.to_string(),
            kind,
            flags: PropertyFlags::default(),
            data: SlotData::List(items),
        })
    }

    fn insert(&mut self, slot: Slot) -> usize {
        if let Some(&i) = self.index.get(&slot.name) {
            self.slots[i] = slot;
            return i;
        }
        let i = self.slots.len();
        self.index.insert(slot.name.clone(), i);
        self.slots.push(slot);
        i
    }

    /// Drop a property. Its slot keeps its index but is no longer reachable by name.
    pub fn remove(&mut self, name: &str) -> bool {
        self.index.remove(name).is_some()
    }

    /// Look up the slot addressed by a parsed path (final index stripped).
    pub fn slot_for(&self, path: &PropertyPath) -> Option<(usize, &Slot)> {
        let i = *self.index.get(&path.lookup_key())?;
        Some((i, &self.slots[i]))
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Read a value by path string; list elements via "Name[i]".
    pub fn get(&self, path: &str) -> Option<&Value> {
        let path = PropertyPath::parse(path).ok()?;
        let (_, slot) = self.slot_for(&path)?;
        match (&slot.data, path.last_index()) {
            (SlotData::Single(v), None) => Some(v),
            (SlotData::List(items), Some(i)) => items.get(i),
            _ => None,
        }
    }

    /// Write a value by path string, ignoring access flags. Returns false when
    /// the path does not address an existing value of the same kind.
    pub fn set(&mut self, path: &str, value: Value) -> bool {
        let Ok(parsed) = PropertyPath::parse(path) else {
            return false;
        };
        let Some((slot, _)) = self.slot_for(&parsed) else {
            return false;
        };
        if self.slots[slot].kind != value.kind() {
            return false;
        }
        self.write_slot(slot, parsed.last_index(), value)
    }

    /// Write into a slot by index. Counts toward [`PropertyBag::writes`].
    pub fn write_slot(&mut self, slot: usize, index: Option<usize>, value: Value) -> bool {
        let Some(target) = self.slots.get_mut(slot) else {
            return false;
        };
        let written = match (&mut target.data, index) {
            (SlotData::Single(v), None) => {
                *v = value;
                true
            }
            (SlotData::List(items), Some(i)) => match items.get_mut(i) {
                Some(v) => {
                    *v = value;
                    true
                }
                None => false,
            },
            _ => false,
        };
        if written {
            self.writes += 1;
        }
        written
    }

    /// Total number of successful slot writes since creation.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
