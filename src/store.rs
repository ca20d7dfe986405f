//! Persisted collection store.
//!
//! Writes one YAML document per compiled sheet to the destination
//! directory, named after the sheet. Saving is an idempotent overwrite by
//! name. Documents are assembled through `serde_yaml::Value` so field order
//! follows the schema, not an alphabetical re-sort.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value as Yaml};

use crate::error::{SheetError, SheetResult};
use crate::types::RecordCollection;

pub struct CollectionStore {
    dest_dir: PathBuf,
}

impl CollectionStore {
    pub fn new<P: AsRef<Path>>(dest_dir: P) -> Self {
        Self {
            dest_dir: dest_dir.as_ref().to_path_buf(),
        }
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    /// Write `<dest_dir>/<sheet_name>.yaml` and return the written path.
    pub fn save(&self, collection: &RecordCollection) -> SheetResult<PathBuf> {
        fs::create_dir_all(&self.dest_dir)?;

        let doc = collection_to_yaml(collection);
        let text = serde_yaml::to_string(&doc)
            .map_err(|e| SheetError::Store(format!("failed to serialize collection: {e}")))?;

        let path = self.dest_dir.join(format!("{}.yaml", collection.sheet_name));
        fs::write(&path, text)?;
        tracing::info!(path = %path.display(), records = collection.len(), "saved collection");
        Ok(path)
    }
}

fn collection_to_yaml(collection: &RecordCollection) -> Yaml {
    let records: Vec<Yaml> = collection
        .records
        .iter()
        .map(|record| {
            let mut fields = Mapping::new();
            for (name, value) in record.fields() {
                let yaml = value.map(|v| v.to_yaml()).unwrap_or(Yaml::Null);
                fields.insert(Yaml::String(name.to_string()), yaml);
            }
            Yaml::Mapping(fields)
        })
        .collect();

    let mut doc = Mapping::new();
    doc.insert(
        Yaml::String("record_type".to_string()),
        Yaml::String(collection.record_type.clone()),
    );
    doc.insert(
        Yaml::String("sheet".to_string()),
        Yaml::String(collection.sheet_name.clone()),
    );
    doc.insert(
        Yaml::String("records".to_string()),
        Yaml::Sequence(records),
    );
    Yaml::Mapping(doc)
}
