use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

/// Holds the app state shared by every route handler and middleware, a single value per type.
#[derive(Default)]
pub(crate) struct SharedDataMap {
    inner: HashMap<TypeId, Box<dyn Any + Send + Sync + 'static>>,
}

impl SharedDataMap {
    pub(crate) fn new() -> SharedDataMap {
        SharedDataMap { inner: HashMap::new() }
    }

    pub(crate) fn insert<T: Send + Sync + 'static>(&mut self, val: T) {
        self.inner.insert(TypeId::of::<T>(), Box::new(val));
    }

    pub(crate) fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.inner.get(&TypeId::of::<T>()).and_then(|boxed| boxed.downcast_ref())
    }
}

impl Debug for SharedDataMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SharedDataMap {{ len: {} }}", self.inner.len())
    }
}

/// The per-request key/value bag, owned by a single request `Context`.
#[derive(Default)]
pub(crate) struct ValueMap {
    inner: HashMap<String, Box<dyn Any + Send + Sync + 'static>>,
}

impl ValueMap {
    pub(crate) fn new() -> ValueMap {
        ValueMap { inner: HashMap::new() }
    }

    pub(crate) fn insert<T: Send + Sync + 'static>(&mut self, key: String, val: T) {
        self.inner.insert(key, Box::new(val));
    }

    pub(crate) fn get<T: 'static>(&self, key: &str) -> Option<&T> {
        self.inner.get(key).and_then(|boxed| boxed.downcast_ref())
    }

    pub(crate) fn get_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.inner.get_mut(key).and_then(|boxed| boxed.downcast_mut())
    }

    pub(crate) fn remove<T: 'static>(&mut self, key: &str) -> Option<T> {
        let boxed = self.inner.remove(key)?;
        match boxed.downcast::<T>() {
            Ok(val) => Some(*val),
            Err(boxed) => {
                // Wrong type requested, keep the value where it was.
                self.inner.insert(key.to_owned(), boxed);
                None
            }
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }
}

impl Debug for ValueMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inner.keys()).finish()
    }
}
