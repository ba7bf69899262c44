use std::io;
use std::io::ErrorKind;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod file_storage;
pub mod memory_storage;

pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// A named-slot string store. Every slot holds one opaque value and is
/// always overwritten as a whole.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

pub fn read_json<T, S>(storage: &S, key: &str) -> io::Result<Option<T>>
    where
        T: DeserializeOwned,
        S: KeyValueStorage + ?Sized,
{
    match storage.get(key)? {
        None => Ok(None),
        Some(blob) => serde_json::from_str(&blob)
            .map(Some)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Error parsing slot {}: {}", key, e))),
    }
}

pub fn write_json<T, S>(storage: &S, key: &str, value: &T) -> io::Result<()>
    where
        T: Serialize + ?Sized,
        S: KeyValueStorage + ?Sized,
{
    let blob = serde_json::to_string(value)?;
    storage.set(key, &blob)
}
