// Content manifest - several named collections declared in one YAML file

use crate::collection::{load_collection, Collection, CollectionConfig, Format};
use crate::document::{read_text, resolve_path};
use crate::error::{ContentError, ErrorKind, Result};
use crate::schema::RecordSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parsed form of a `content.yaml` manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestDefinition {
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionEntry>,
}

/// One named collection in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    /// Source path, relative to the manifest's directory.
    pub path: String,
    #[serde(default)]
    pub format: Option<Format>,
    #[serde(default)]
    pub schema: Option<RecordSchema>,
}

/// A manifest bound to the directory its relative paths resolve against.
#[derive(Debug, Clone)]
pub struct Manifest {
    root: PathBuf,
    definition: ManifestDefinition,
}

impl Manifest {
    /// Read a manifest file. Collection paths resolve against its directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = resolve_path(path.as_ref())?;
        let content = read_text(&path, "Manifest")?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        Self::parse_str(&content, root).map_err(|e| e.with_path(&path))
    }

    /// Parse manifest YAML with an explicit root directory.
    pub fn parse_str(content: &str, root: impl Into<PathBuf>) -> Result<Self> {
        let definition: ManifestDefinition = serde_yaml::from_str(content).map_err(|e| {
            ContentError::new(ErrorKind::Manifest, format!("Invalid manifest: {e}")).with_source(e)
        })?;
        log::debug!(
            "Manifest declares {} collections",
            definition.collections.len()
        );
        Ok(Manifest {
            root: root.into(),
            definition,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn definition(&self) -> &ManifestDefinition {
        &self.definition
    }

    /// Collection names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definition.collections.keys().map(String::as_str)
    }

    pub fn entry(&self, name: &str) -> Result<&CollectionEntry> {
        self.definition.collections.get(name).ok_or_else(|| {
            ContentError::new(
                ErrorKind::Manifest,
                format!("Collection '{name}' not found in manifest"),
            )
        })
    }

    /// Absolute source path of a named collection.
    pub fn source_path(&self, name: &str) -> Result<PathBuf> {
        let entry = self.entry(name)?;
        resolve_path(&self.root.join(&entry.path))
    }

    /// Build a config for a named collection, ready for a transform to be added.
    pub fn config(&self, name: &str) -> Result<CollectionConfig<'_>> {
        let entry = self.entry(name)?;
        let mut config = CollectionConfig::new(self.source_path(name)?);
        if let Some(format) = entry.format {
            config = config.format(format);
        }
        if let Some(schema) = &entry.schema {
            config = config.schema(schema);
        }
        Ok(config)
    }

    /// Load a named collection from disk.
    pub fn load(&self, name: &str) -> Result<Collection> {
        load_collection(self.config(name)?)
    }

    /// Load every collection, failing on the first one that fails.
    pub fn load_all(&self) -> Result<BTreeMap<String, Collection>> {
        let mut collections = BTreeMap::new();
        for name in self.names() {
            collections.insert(name.to_string(), self.load(name)?);
        }
        Ok(collections)
    }
}
