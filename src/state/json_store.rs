// DANS : src/state/json_store.rs

use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

/// Magasin clé → valeur JSON, chargé en mémoire à l'ouverture et réécrit
/// entièrement à chaque écriture (fichier temporaire puis `rename` atomique).
pub struct JsonStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, Value>>,
}

impl JsonStore {
    /// Un fichier absent ou vide donne un magasin vide.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(data) if data.trim().is_empty() => BTreeMap::new(),
            Ok(data) => serde_json::from_str(&data)
                .map_err(|e| Error::Persistence(format!("{} illisible : {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(Error::Persistence(format!("ouverture de {} : {e}", path.display()))),
        };
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Value>>> {
        self.entries
            .lock()
            .map_err(|_| Error::Persistence("verrou du journal empoisonné".to_string()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| Error::Persistence(format!("entrée {key} illisible : {e}"))),
        }
    }

    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(key))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Écrit la valeur et persiste tout le magasin. En cas d'échec de
    /// l'écriture disque, l'état en mémoire est restauré.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| Error::Persistence(format!("sérialisation de {key} : {e}")))?;
        let mut entries = self.lock()?;
        let previous = entries.insert(key.to_string(), value);
        if let Err(e) = self.persist(&entries) {
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Comme `set`, mais n'écrit rien si la clé existe déjà. Retourne `false` dans ce cas.
    pub fn insert_new<T: Serialize>(&self, key: &str, value: &T) -> Result<bool> {
        let value = serde_json::to_value(value)
            .map_err(|e| Error::Persistence(format!("sérialisation de {key} : {e}")))?;
        let mut entries = self.lock()?;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value);
        if let Err(e) = self.persist(&entries) {
            entries.remove(key);
            return Err(e);
        }
        Ok(true)
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        let io_err = |e: std::io::Error| Error::Persistence(format!("écriture de {} : {e}", self.path.display()));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut tmp_name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        let written = File::create(&tmp_path).map_err(io_err).and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, entries)
                .map_err(|e| Error::Persistence(format!("sérialisation du journal : {e}")))?;
            writer.write_all(b"\n").map_err(io_err)?;
            let file = writer.into_inner().map_err(|e| io_err(e.into_error()))?;
            file.sync_all().map_err(io_err)?;
            fs::rename(&tmp_path, &self.path).map_err(io_err)
        });
        if written.is_err() {
            // Pas de fichier temporaire orphelin à côté du journal.
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }
}
