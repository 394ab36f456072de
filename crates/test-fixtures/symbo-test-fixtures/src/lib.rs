use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    linkages: HashMap<String, LinkageEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LinkageEntry {
    Path(String),
    Detailed {
        spec: String,
        /// Polyline a joint of this linkage is meant to trace, as `[[x, y], ...]`.
        #[serde(default)]
        target_path: Option<String>,
    },
}

impl LinkageEntry {
    fn spec(&self) -> &str {
        match self {
            LinkageEntry::Path(path) => path,
            LinkageEntry::Detailed { spec, .. } => spec,
        }
    }

    fn target_path(&self) -> Option<&str> {
        match self {
            LinkageEntry::Path(_) => None,
            LinkageEntry::Detailed { target_path, .. } => target_path.as_deref(),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod linkages {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.linkages.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.linkages, "linkage", name)?;
        read_to_string(entry.spec())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.linkages, "linkage", name)?;
        super::load_json(entry.spec())
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.linkages, "linkage", name)?;
        Ok(resolve_path(entry.spec()))
    }

    /// Target polyline as `[x, y]` pairs, when the fixture declares one.
    pub fn target_path(name: &str) -> Result<Option<Vec<[f64; 2]>>> {
        let entry = lookup(&MANIFEST.linkages, "linkage", name)?;
        match entry.target_path() {
            Some(rel) => super::load_json(rel).map(Some),
            None => Ok(None),
        }
    }
}
