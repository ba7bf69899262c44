#![cfg(test)]

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::model::{Author, Content, Draft, Post};
use crate::storage::{KeyValueStorage, MemoryStorage};

pub const POSTS_KEY: &str = "blog_posts";
pub const DRAFT_KEY: &str = "blog_draft";

pub const POSTS_JSON: &str = r#"[
  {
    "id": "a1",
    "metadata": {
      "author": { "name": "Thiago", "email": "thiago@example.com" },
      "date": "2024-04-22T10:54:25"
    },
    "content": { "title": "First", "description": "The first post" },
    "views": 0
  },
  {
    "id": "b2",
    "metadata": {
      "author": { "name": "Ana", "email": "ana@example.com" },
      "date": "2024-04-23T08:00:00"
    },
    "content": { "title": "Second", "description": "Another one" },
    "views": 5
  }
]"#;

pub fn new_post(title: &str) -> Post {
    let mut draft = Draft {
        metadata: Default::default(),
        content: Content {
            title: title.to_string(),
            description: format!("About {}", title),
        },
    };
    draft.metadata.author = Author {
        name: "Thiago".to_string(),
        email: "thiago@example.com".to_string(),
    };
    draft.to_post()
}

/// Memory storage whose writes can be switched off, for every slot or one.
#[derive(Clone, Default)]
pub struct FailingStorage {
    inner: MemoryStorage,
    fail: Arc<AtomicBool>,
    fail_key: Arc<Mutex<Option<String>>>,
}

impl FailingStorage {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes_to(&self, key: &str) {
        *self.fail_key.lock().unwrap() = Some(key.to_string());
    }
}

impl KeyValueStorage for FailingStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let key_fails = self.fail_key.lock().unwrap().as_deref() == Some(key);
        if key_fails || self.fail.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "quota exceeded"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.inner.remove(key)
    }
}
