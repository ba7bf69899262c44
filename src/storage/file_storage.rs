use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::storage::KeyValueStorage;

/// One file per slot inside `root_dir`, named `<key>.json`.
#[derive(Clone, Debug)]
pub struct FileStorage {
    root_dir: PathBuf,
}

impl FileStorage {
    pub fn open(root_dir: &Path) -> io::Result<FileStorage> {
        fs::create_dir_all(root_dir)
            .map_err(|e| io::Error::new(e.kind(), format!("Error creating data dir {}: {}", root_dir.display(), e)))?;

        Ok(FileStorage {
            root_dir: root_dir.to_path_buf(),
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        let file_name: String = key.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' { c } else { '_' })
            .collect();
        self.root_dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        // Write aside and rename, so a slot is either the old or the new blob
        let path = self.slot_path(key);
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.slot_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
