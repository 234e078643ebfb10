//! Object values and prototype-chain lookup.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::runtime::Runtime;
use crate::value::Value;

/// Maximum depth walked when following `__proto__` chains. Chosen to comfortably
/// exceed any legitimate inheritance depth while still guaranteeing termination on
/// a cyclic chain.
pub const MAX_PROTOTYPE_DEPTH: usize = 32;

/// The backing storage for an object value: an order-preserving, last-writer-wins
/// map from property name to value.
///
/// Properties are held behind a `RefCell` so that the (out-of-scope) standard
/// library can offer a property-assignment word without requiring a second object
/// representation; the core engine itself never mutates an object after
/// construction.
pub struct ObjectData {
    properties: RefCell<IndexMap<Rc<str>, Value>>,
}

impl ObjectData {
    pub fn new() -> Self {
        ObjectData {
            properties: RefCell::new(IndexMap::new()),
        }
    }

    pub fn from_pairs(pairs: Vec<(Rc<str>, Value)>) -> Self {
        let mut map = IndexMap::with_capacity(pairs.len());
        for (key, value) in pairs {
            // Last-writer-wins while preserving the position of first insertion,
            // exactly as `IndexMap::insert` already behaves.
            map.insert(key, value);
        }
        ObjectData {
            properties: RefCell::new(map),
        }
    }

    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.properties.borrow().get(key).cloned()
    }

    pub fn set(&self, key: Rc<str>, value: Value) {
        self.properties.borrow_mut().insert(key, value);
    }

    pub fn keys(&self) -> Vec<Rc<str>> {
        self.properties.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.properties.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.borrow().is_empty()
    }

    /// Objects compare equal when they share the same set of own keys and every
    /// pair of same-keyed values is itself equal — order does not
    /// matter for equality, only for `to_source`/iteration.
    pub fn equals(&self, other: &ObjectData) -> bool {
        let a = self.properties.borrow();
        let b = other.properties.borrow();
        if a.len() != b.len() {
            return false;
        }
        a.iter().all(|(key, value)| match b.get(key) {
            Some(other_value) => value.equals(other_value),
            None => false,
        })
    }

    pub fn to_source(&self) -> String {
        let props = self.properties.borrow();
        if props.is_empty() {
            return "{ }".to_string();
        }
        let rendered: Vec<String> = props
            .iter()
            .map(|(key, value)| {
                let key_value = Value::String(Rc::clone(key));
                format!("{}: {}", key_value.to_source(), value.to_source())
            })
            .collect();
        format!("{{ {} }}", rendered.join(", "))
    }
}

impl Default for ObjectData {
    fn default() -> Self {
        ObjectData::new()
    }
}

/// Outcome of walking a `__proto__` chain looking for `key`.
pub enum PrototypeLookup {
    Found(Value),
    NotFound,
    /// The chain exceeded `MAX_PROTOTYPE_DEPTH` without resolving; the caller
    /// should treat this the same as `NotFound` for implicit dispatch, or raise
    /// a `range` error for an explicit property-access primitive.
    CycleOverflow,
}

/// Walk `start`'s own properties, then its prototype, then its prototype's
/// prototype, and so on, bounded to `MAX_PROTOTYPE_DEPTH` steps.
pub fn lookup_chain(start: &Value, key: &str, runtime: &Runtime) -> PrototypeLookup {
    let mut current = start.clone();
    for _ in 0..MAX_PROTOTYPE_DEPTH {
        if let Value::Object(data) = &current {
            if let Some(value) = data.get_own(key) {
                return PrototypeLookup::Found(value);
            }
        }
        let proto = current.prototype(runtime);
        // The root object prototype has no `__proto__` own property, so its own
        // `prototype()` call returns itself; stop there rather than walking a
        // user-defined self-cycle (`o.__proto__ = o`) straight to `NotFound`.
        if let (Value::Object(c), Value::Object(root)) = (&current, &runtime.prototypes.root_object)
        {
            if Rc::ptr_eq(c, root) {
                return PrototypeLookup::NotFound;
            }
        }
        current = proto;
    }
    PrototypeLookup::CycleOverflow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Runtime;

    #[test]
    fn duplicate_keys_are_last_writer_wins_at_original_position() {
        let data = ObjectData::from_pairs(vec![
            (Rc::from("a"), Value::Number(crate::value::Number::Int(1))),
            (Rc::from("b"), Value::Number(crate::value::Number::Int(2))),
            (Rc::from("a"), Value::Number(crate::value::Number::Int(3))),
        ]);
        assert_eq!(data.keys(), vec![Rc::from("a"), Rc::from("b")]);
        assert!(
            data.get_own("a")
                .unwrap()
                .equals(&Value::Number(crate::value::Number::Int(3)))
        );
    }

    #[test]
    fn cyclic_proto_terminates() {
        let runtime = Runtime::new(false);
        let cyclic = Rc::new(ObjectData::new());
        let cyclic_value = Value::Object(Rc::clone(&cyclic));
        cyclic.set(Rc::from("__proto__"), cyclic_value.clone());
        match lookup_chain(&cyclic_value, "missing", &runtime) {
            PrototypeLookup::CycleOverflow => {}
            _ => panic!("expected the lookup to bottom out on the cycle"),
        }
    }

    #[test]
    fn lookup_finds_inherited_property() {
        let runtime = Runtime::new(false);
        let parent = Rc::new(ObjectData::new());
        parent.set(Rc::from("greeting"), Value::String(Rc::from("hi")));
        let child = Rc::new(ObjectData::new());
        child.set(Rc::from("__proto__"), Value::Object(Rc::clone(&parent)));
        match lookup_chain(&Value::Object(child), "greeting", &runtime) {
            PrototypeLookup::Found(Value::String(s)) => assert_eq!(&*s, "hi"),
            _ => panic!("expected to find the inherited property"),
        }
    }
}
