use crate::model::{Dataset, Roster};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// État persisté : le jeu de données et le dernier planning généré.
///
/// Le planning est remplacé en entier à chaque génération, jamais fusionné.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub dataset: Dataset,
    #[serde(default)]
    pub roster: Roster,
}

pub trait Storage {
    /// Charge l'état depuis un support.
    fn load(&self) -> anyhow::Result<StateFile>;
    /// Sauvegarde de manière atomique.
    fn save(&self, state: &StateFile) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<StateFile> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let state: StateFile =
            serde_json::from_slice(&data).with_context(|| "parsing state file")?;
        Ok(state)
    }

    fn save(&self, state: &StateFile) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(state)?;
        let mut tmp =
            NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
                .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
