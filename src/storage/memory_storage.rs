use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use crate::storage::KeyValueStorage;

/// In-memory slots. Clones share the same slots, the same way every handle
/// to a browser's local storage sees the same data.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Default::default()
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots.lock().map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_slots() -> io::Result<()> {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.set("key", "value")?;
        assert_eq!(other.get("key")?, Some("value".to_string()));

        other.remove("key")?;
        assert_eq!(storage.get("key")?, None);
        Ok(())
    }
}
