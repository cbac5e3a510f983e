//! Position-aligned document store.

use docdex_core::IndexError;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::warn;

/// Texts and owning-file names for every indexed unit.
///
/// `names[i]` and `texts[i]` describe the unit whose vector sits at
/// ordinal `i` in the flat index. The two arrays always have equal
/// length; the vector count must match too, which [`super::IndexState`]
/// enforces as the only writer.
#[derive(Debug, Default)]
pub struct DocumentStore {
    names: Vec<String>,
    texts: Vec<String>,
    /// Distinct file names seen, for ingestion dedup
    registered: HashSet<String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored units.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether a file with this display name was already ingested.
    pub fn contains_document(&self, name: &str) -> bool {
        self.registered.contains(name)
    }

    /// Append one unit. Returns its position.
    pub fn append(&mut self, name: String, text: String) -> usize {
        self.registered.insert(name.clone());
        self.names.push(name);
        self.texts.push(text);
        self.names.len() - 1
    }

    /// Look up a unit by position.
    pub fn get(&self, position: usize) -> Option<(&str, &str)> {
        let name = self.names.get(position)?;
        let text = self.texts.get(position)?;
        Some((name.as_str(), text.as_str()))
    }

    /// Iterate `(position, name, text)` over all units.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &str)> {
        self.names
            .iter()
            .zip(self.texts.iter())
            .enumerate()
            .map(|(i, (n, t))| (i, n.as_str(), t.as_str()))
    }

    /// Distinct file names, in no particular order.
    pub fn document_names(&self) -> impl Iterator<Item = &str> {
        self.registered.iter().map(String::as_str)
    }

    /// Number of distinct ingested files.
    pub fn document_count(&self) -> usize {
        self.registered.len()
    }

    /// Persist both arrays under `dir` as `doc_names.json` and
    /// `texts.json`, each via temp file and rename.
    pub fn save(&self, dir: &Path) -> Result<(), IndexError> {
        save_json(&dir.join("doc_names.json"), &self.names)?;
        save_json(&dir.join("texts.json"), &self.texts)?;
        Ok(())
    }

    /// Drop every unit past `len`, rewinding the store to an earlier
    /// snapshot. Appends only ever extend the arrays, so the prefix is
    /// always a state the store actually held.
    pub fn truncate(&mut self, len: usize) {
        self.names.truncate(len);
        self.texts.truncate(len);
        self.registered = self.names.iter().cloned().collect();
    }

    /// Load a store from `dir`, or an empty one if the artifacts are
    /// absent. Arrays of unequal length mean a persist was interrupted
    /// between renames; the longer array is then trimmed to the common
    /// prefix, which is the last state both artifacts agreed on.
    pub fn load(dir: &Path) -> Result<Self, IndexError> {
        let mut names: Vec<String> = load_json(&dir.join("doc_names.json"))?.unwrap_or_default();
        let mut texts: Vec<String> = load_json(&dir.join("texts.json"))?.unwrap_or_default();

        if names.len() != texts.len() {
            let keep = names.len().min(texts.len());
            warn!(
                names = names.len(),
                texts = texts.len(),
                keep,
                "store artifacts disagree, keeping common prefix"
            );
            names.truncate(keep);
            texts.truncate(keep);
        }

        let registered = names.iter().cloned().collect();
        Ok(Self {
            names,
            texts,
            registered,
        })
    }
}

fn save_json(path: &Path, value: &Vec<String>) -> Result<(), IndexError> {
    let tmp = path.with_extension("json.tmp");
    let file =
        File::create(&tmp).map_err(|e| IndexError::Persist(format!("create {tmp:?}: {e}")))?;
    serde_json::to_writer(BufWriter::new(file), value)
        .map_err(|e| IndexError::Persist(format!("encode {tmp:?}: {e}")))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| IndexError::Persist(format!("rename {tmp:?} -> {path:?}: {e}")))?;
    Ok(())
}

fn load_json(path: &Path) -> Result<Option<Vec<String>>, IndexError> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path).map_err(|e| IndexError::Load(format!("open {path:?}: {e}")))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| IndexError::Load(format!("decode {path:?}: {e}")))?;
    Ok(Some(value))
}
