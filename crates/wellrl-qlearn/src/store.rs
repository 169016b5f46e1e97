//! Persistenz des Agenten als JSON-Datei.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::agent::Agent;
use crate::error::Result;
use crate::params::Hyperparameters;
use crate::snapshot::Snapshot;

/// Liest und schreibt Snapshots unter einem festen Pfad.
///
/// Jeder Schreibvorgang geht in eine eigene temporäre Datei im selben
/// Verzeichnis, die anschließend umbenannt wird; ein Leser sieht nie eine
/// halb geschriebene Datei. Prozesse, die laden, trainieren und speichern,
/// serialisieren sich über [`ModelStore::lock`].
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

/// Exklusive advisorische Sperre auf `<modell>.lock`.
///
/// Wird beim Drop freigegeben.
#[derive(Debug)]
pub struct ModelLock {
    file: File,
}

impl Drop for ModelLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl ModelStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    /// Blockiert, bis kein anderer Halter die Sperre besitzt.
    ///
    /// Wer laden, trainieren und speichern will, hält die Sperre über die
    /// ganze Sequenz; sonst überschreibt der letzte Speichernde die Updates
    /// der anderen.
    ///
    /// # Errors
    ///
    /// I/O-Fehler beim Anlegen oder Sperren der Sperrdatei.
    pub fn lock(&self) -> Result<ModelLock> {
        fs::create_dir_all(self.dir())?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?;
        FileExt::lock_exclusive(&file)?;
        Ok(ModelLock { file })
    }

    /// # Errors
    ///
    /// I/O- oder Serialisierungsfehler.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(&mut tmp);
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;

        info_event!(
            path = %self.path.display(),
            states = snapshot.entries.len(),
            episodes = snapshot.history.episodes,
            "model saved"
        );
        Ok(())
    }

    /// `Ok(None)`, wenn noch kein Modell existiert.
    ///
    /// # Errors
    ///
    /// I/O- oder Parse-Fehler einer vorhandenen Datei.
    pub fn try_load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let snapshot = serde_json::from_reader(reader)?;
        Ok(Some(snapshot))
    }

    /// Lädt das Modell; fehlende oder unbrauchbare Dateien ergeben einen
    /// frischen Agenten mit `hyperparameters`.
    #[must_use]
    pub fn load_or_fresh(&self, hyperparameters: Hyperparameters) -> Agent {
        match self.try_load().and_then(|s| s.map(Agent::from_snapshot).transpose()) {
            Ok(Some(agent)) => {
                info_event!(
                    path = %self.path.display(),
                    states = agent.table().len(),
                    "model loaded"
                );
                agent
            }
            Ok(None) => Agent::new(hyperparameters),
            Err(err) => {
                warn_event!(
                    "could not load model from {}, starting fresh: {}",
                    self.path.display(),
                    err
                );
                Agent::new(hyperparameters)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_store(name: &str) -> ModelStore {
        let dir = env::temp_dir().join(format!("wellrl-store-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        ModelStore::new(dir.join("nested").join("agent.json"))
    }

    #[test]
    fn missing_file_is_none() {
        let store = temp_store("missing");
        assert!(store.try_load().expect("no io error").is_none());
        let agent = store.load_or_fresh(Hyperparameters::default());
        assert!(agent.table().is_empty());
    }

    #[test]
    fn save_creates_parent_dirs_and_leaves_no_temp_files() {
        let store = temp_store("save");
        store.save(&Agent::default().snapshot()).expect("save");
        store.save(&Agent::default().snapshot()).expect("save again");
        assert!(store.try_load().expect("load").is_some());

        let names: Vec<_> = fs::read_dir(store.dir())
            .expect("read dir")
            .map(|e| e.expect("entry").file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("agent.json")]);
    }

    #[test]
    fn concurrent_saves_all_succeed() {
        let store = temp_store("concurrent-save");
        let snapshot = Agent::default().snapshot();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..10 {
                        store.save(&snapshot).expect("save must not race");
                    }
                });
            }
        });
        assert!(store.try_load().expect("load").is_some());
    }

    #[test]
    fn lock_creates_lock_file_next_to_model() {
        let store = temp_store("lock");
        let guard = store.lock().expect("lock");
        assert!(store.lock_path().exists());
        assert!(!store.path().exists());
        drop(guard);
        let _again = store.lock().expect("lock after release");
    }
}
