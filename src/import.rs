//! Carga em lote de registros a partir de um arquivo JSON ou TOML.
//!
//! As referências entre registros usam chaves naturais (sigla do setor, nome do
//! servidor, número do documento, nome de usuário), já que os identificadores só
//! existem depois da gravação. Os registros passam pelo mesmo caminho de
//! validação da CLI, em ordem de dependência. A carga é tudo-ou-nada: ela roda
//! sobre uma cópia do registro, que só substitui o original se nada falhar.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ProtocoloError, Result};
use crate::model::{
    Actor, Document, DocumentBase, DocumentKind, DocumentStatus, Received, RoutingEntry, Sector,
    Staff, User,
};
use crate::store::{Entity, Registry};

/// Servidor com o setor indicado pela sigla.
#[derive(Debug, Clone, Deserialize)]
pub struct StaffRow {
    pub name: String,
    pub sector: String,
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Documento com setor por sigla e responsável por nome. A espécie vem no
/// campo `type` junto com os campos próprios dela.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRow {
    pub opening_date: NaiveDate,
    pub sector: String,
    pub responsible: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub conclusion_date: Option<NaiveDate>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(flatten)]
    pub kind: DocumentKind,
}

/// Tramitação com o documento indicado por número ou id.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingRow {
    pub document: String,
    pub to: String,
    #[serde(default)]
    pub received: Received,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportBatch {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub sectors: Vec<Sector>,
    #[serde(default)]
    pub staff: Vec<StaffRow>,
    #[serde(default)]
    pub documents: Vec<DocumentRow>,
    #[serde(default)]
    pub routing: Vec<RoutingRow>,
}

/// Quantidade de registros gravados por entidade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub users: usize,
    pub sectors: usize,
    pub staff: usize,
    pub documents: usize,
    pub routing: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.users + self.sectors + self.staff + self.documents + self.routing
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} usuário(s), {} setor(es), {} servidor(es), {} documento(s), {} tramitação(ões)",
            self.users, self.sectors, self.staff, self.documents, self.routing
        )
    }
}

impl ImportBatch {
    /// Lê o lote, escolhendo o formato pela extensão do arquivo.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let contents = std::fs::read_to_string(path)?;
        match extension.as_str() {
            "json" => Self::from_json(&contents),
            "toml" => Self::from_toml(&contents),
            _ => Err(ProtocoloError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn len(&self) -> usize {
        self.users.len()
            + self.sectors.len()
            + self.staff.len()
            + self.documents.len()
            + self.routing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grava o lote inteiro ou nada.
    ///
    /// `on_record` é chamado após cada registro gravado, com uma descrição curta,
    /// para alimentar a barra de progresso.
    pub fn apply(
        self,
        registry: &mut Registry,
        actor: &Actor,
        mut on_record: impl FnMut(&str),
    ) -> Result<ImportSummary> {
        let mut working = registry.clone();
        let mut summary = ImportSummary::default();

        for (position, user) in self.users.into_iter().enumerate() {
            let label = user.username.clone();
            working
                .save_user(None, user, actor)
                .map_err(|e| failed::<User>(position, e))?;
            summary.users += 1;
            on_record(&label);
        }

        for (position, sector) in self.sectors.into_iter().enumerate() {
            let label = sector.code.clone();
            working
                .save_sector(None, sector, actor)
                .map_err(|e| failed::<Sector>(position, e))?;
            summary.sectors += 1;
            on_record(&label);
        }

        for (position, row) in self.staff.into_iter().enumerate() {
            let label = row.name.clone();
            let staff = resolve_staff(&working, row).map_err(|e| failed::<Staff>(position, e))?;
            working
                .save_staff(None, staff, actor)
                .map_err(|e| failed::<Staff>(position, e))?;
            summary.staff += 1;
            on_record(&label);
        }

        for (position, row) in self.documents.into_iter().enumerate() {
            let document =
                resolve_document(&working, row).map_err(|e| failed::<Document>(position, e))?;
            let label = document.to_string();
            working
                .save_document(None, document, actor)
                .map_err(|e| failed::<Document>(position, e))?;
            summary.documents += 1;
            on_record(&label);
        }

        for (position, row) in self.routing.into_iter().enumerate() {
            let label = format!("{} → {}", row.document, row.to);
            let document = working
                .resolve_document(&row.document)
                .map_err(|e| failed::<RoutingEntry>(position, e))?
                .id;
            let mut entry = RoutingEntry::new(document, row.to);
            entry.received = row.received;
            working
                .save_routing(None, entry, actor)
                .map_err(|e| failed::<RoutingEntry>(position, e))?;
            summary.routing += 1;
            on_record(&label);
        }

        *registry = working;
        tracing::info!(records = summary.total(), %summary, %actor, "importação concluída");
        Ok(summary)
    }
}

// Posições começam em 1 nas mensagens.
fn failed<T: Entity>(position: usize, source: ProtocoloError) -> ProtocoloError {
    ProtocoloError::Import {
        entity: T::NAME,
        position: position + 1,
        source: Box::new(source),
    }
}

fn resolve_staff(registry: &Registry, row: StaffRow) -> Result<Staff> {
    let sector = registry.sector_by_code(&row.sector)?.id;
    let mut staff = Staff::new(row.name, sector, row.entry_date);
    staff.exit_date = row.exit_date;
    staff.active = row.active;
    Ok(staff)
}

fn resolve_document(registry: &Registry, row: DocumentRow) -> Result<Document> {
    let sector = registry.sector_by_code(&row.sector)?.id;
    let responsible = registry.staff_by_name(&row.responsible)?.id;
    let mut base = DocumentBase::new(row.opening_date, sector, responsible);
    base.status = row.status;
    base.conclusion_date = row.conclusion_date;
    base.note = row.note;
    base.attachment = row.attachment;
    Ok(Document::new(base, row.kind))
}
