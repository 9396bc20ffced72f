//! Persistência do registro em um único arquivo JSON.
//!
//! A escrita é atômica: o conteúdo vai para um arquivo temporário ao lado do
//! destino e só então substitui o original.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::Registry;

impl Registry {
    /// Lê o arquivo de dados. Um arquivo inexistente resulta em registro vazio.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "arquivo de dados ausente, iniciando vazio");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let registry: Registry = serde_json::from_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            documents = registry.documents.len(),
            "arquivo de dados carregado"
        );
        Ok(registry)
    }

    /// Grava o registro inteiro, substituindo o arquivo de forma atômica.
    pub fn persist(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        let tmp = temp_path(path);

        if let Err(err) = write_synced(&tmp, &json).and_then(|()| fs::rename(&tmp, path)) {
            // o arquivo original continua intacto
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        if let Some(parent) = path.parent() {
            sync_dir(parent);
        }
        tracing::debug!(path = %path.display(), "arquivo de dados gravado");
        Ok(())
    }
}

/// Grava e força o conteúdo para o disco antes da troca.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

// Torna a troca de nome durável. Nem toda plataforma abre diretórios.
fn sync_dir(dir: &Path) {
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    if let Ok(handle) = File::open(dir) {
        let _ = handle.sync_all();
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "protocolo.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Actor, Received, RoutingEntry};
    use crate::store::tests::{date, process, seeded};
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let registry = Registry::load(&tmp.path().join("nada.json")).unwrap();
        assert!(registry.documents().is_empty());
        assert!(registry.users().is_empty());
    }

    #[test]
    fn persist_then_load_keeps_everything() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("dados").join("protocolo.json");

        let (mut registry, sector, staff) = seeded();
        let ana = Actor::user("ana");
        let doc = registry
            .save_document(None, process(sector, staff, "10/2024", date(2024, 1, 10)), &ana)
            .unwrap();
        let entry = registry
            .save_routing(None, RoutingEntry::new(doc, "bruno"), &ana)
            .unwrap();
        registry.persist(&path).unwrap();
        assert!(!temp_path(&path).exists());

        let loaded = Registry::load(&path).unwrap();
        let row = loaded.document(doc).unwrap();
        assert_eq!(row.data.label(), "10/2024");
        assert_eq!(row.audit.created_by.as_deref(), Some("ana"));
        assert_eq!(loaded.routing_entry(entry).unwrap().data.received, Received::No);
        assert_eq!(loaded.staff_member(staff).unwrap().data.name, "Maria Lima");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("protocolo.json");
        fs::write(&path, "{ isto não é json").unwrap();
        assert!(Registry::load(&path).is_err());
    }

    #[test]
    fn stale_temp_file_is_replaced() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("protocolo.json");
        fs::write(temp_path(&path), "lixo de uma gravação interrompida").unwrap();

        let (registry, _, _) = seeded();
        registry.persist(&path).unwrap();
        assert!(!temp_path(&path).exists());
        assert_eq!(Registry::load(&path).unwrap().users().len(), 2);
    }

    #[test]
    fn failed_rename_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        // um diretório não vazio não pode ser trocado por um arquivo
        let path = tmp.path().join("protocolo.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("dentro"), "x").unwrap();

        let (registry, _, _) = seeded();
        assert!(registry.persist(&path).is_err());
        assert!(!temp_path(&path).exists());
        assert!(path.join("dentro").exists());
    }

    #[test]
    fn temp_path_sits_next_to_target() {
        let path = Path::new("/srv/dados/protocolo.json");
        assert_eq!(temp_path(path), Path::new("/srv/dados/protocolo.json.tmp"));
    }
}
