//! Registro em memória de todas as entidades, com as regras de integridade
//! que um banco relacional aplicaria: identidade, unicidade, chaves
//! estrangeiras e proteção contra exclusão de registros referenciados.
//!
//! Cada operação é validar-e-gravar de um único registro: ou passa inteira,
//! ou nada muda. A gravação em disco fica em [`file`].

mod file;
mod query;
mod table;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ProtocoloError, Result};
use crate::model::{
    Actor, Audit, Document, DocumentStatus, Received, Record, RecordId, RoutingEntry, Sector,
    Staff, User,
};

pub use query::RoutingFilter;
pub use table::{Entity, Table};

/// Coluna "Cadastrado por" quando o criador é desconhecido ou foi excluído.
pub const UNKNOWN_USER: &str = "Usuário não definido";

/// Tamanho mínimo de um prefixo de id aceito como referência.
const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    users: Table<User>,
    #[serde(default)]
    sectors: Table<Sector>,
    #[serde(default)]
    staff: Table<Staff>,
    #[serde(default)]
    documents: Table<Document>,
    #[serde(default)]
    routing: Table<RoutingEntry>,
}

impl Registry {
    // --- usuários ---

    pub fn save_user(&mut self, id: Option<RecordId>, user: User, actor: &Actor) -> Result<RecordId> {
        self.check_actor(actor)?;
        let id = self.users.save(id, user, actor)?;
        tracing::info!(%id, %actor, "usuário gravado");
        Ok(id)
    }

    pub fn user(&self, username: &str) -> Result<&Record<User>> {
        self.users
            .iter()
            .find(|row| row.data.username == username)
            .ok_or_else(|| ProtocoloError::not_found(User::NAME, username))
    }

    /// Exclui um usuário. Tramitações o protegem; as marcas de criação que
    /// apontam para ele são apagadas.
    pub fn delete_user(&mut self, username: &str, actor: &Actor) -> Result<()> {
        self.check_actor(actor)?;
        let id = self.user(username)?.id;

        let routed = self
            .routing
            .iter()
            .filter(|row| row.data.to == username || row.data.from.as_deref() == Some(username))
            .count();
        if routed > 0 {
            return Err(ProtocoloError::Protected {
                entity: User::NAME,
                key: username.to_string(),
                referenced_by: format!("{routed} tramitação(ões)"),
            });
        }

        self.users.remove(id);
        let cleared = clear_creator(self.users.iter_mut().map(|row| &mut row.audit), username)
            + clear_creator(self.sectors.iter_mut().map(|row| &mut row.audit), username)
            + clear_creator(self.staff.iter_mut().map(|row| &mut row.audit), username)
            + clear_creator(self.documents.iter_mut().map(|row| &mut row.audit), username)
            + clear_creator(self.routing.iter_mut().map(|row| &mut row.audit), username);
        tracing::info!(username = %username, cleared, %actor, "usuário excluído");
        Ok(())
    }

    /// Resolve a identidade informada na linha de comando ou na configuração.
    ///
    /// Usuário desconhecido é erro; usuário inativo opera como anônimo.
    pub fn actor_for(&self, username: Option<&str>) -> Result<Actor> {
        let Some(username) = username else {
            return Ok(Actor::Anonymous);
        };
        let user = self.user(username)?;
        if !user.data.active {
            tracing::warn!(username = %username, "usuário inativo, operando como anônimo");
            return Ok(Actor::Anonymous);
        }
        Ok(Actor::user(username))
    }

    /// "Cadastrado por": nome de exibição do criador, ou [`UNKNOWN_USER`].
    pub fn creator_display(&self, audit: &Audit) -> String {
        audit
            .created_by
            .as_deref()
            .and_then(|name| self.user(name).ok())
            .map(|row| row.data.display_name())
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }

    // --- setores ---

    pub fn save_sector(
        &mut self,
        id: Option<RecordId>,
        sector: Sector,
        actor: &Actor,
    ) -> Result<RecordId> {
        self.check_actor(actor)?;
        let id = self.sectors.save(id, sector, actor)?;
        tracing::info!(%id, %actor, "setor gravado");
        Ok(id)
    }

    pub fn sector(&self, id: RecordId) -> Result<&Record<Sector>> {
        self.sectors
            .get(id)
            .ok_or_else(|| ProtocoloError::not_found(Sector::NAME, id))
    }

    pub fn sector_by_code(&self, code: &str) -> Result<&Record<Sector>> {
        self.sectors
            .iter()
            .find(|row| row.data.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| ProtocoloError::not_found(Sector::NAME, code))
    }

    pub fn delete_sector(&mut self, id: RecordId, actor: &Actor) -> Result<()> {
        self.check_actor(actor)?;
        let code = self.sector(id)?.data.code.clone();
        let staff = self.staff.iter().filter(|row| row.data.sector == id).count();
        let documents = self
            .documents
            .iter()
            .filter(|row| row.data.base.sector == id)
            .count();
        if staff + documents > 0 {
            return Err(ProtocoloError::Protected {
                entity: Sector::NAME,
                key: code,
                referenced_by: format!("{staff} servidor(es) e {documents} documento(s)"),
            });
        }
        self.sectors.remove(id);
        tracing::info!(%id, code = %code, %actor, "setor excluído");
        Ok(())
    }

    // --- servidores ---

    pub fn save_staff(&mut self, id: Option<RecordId>, staff: Staff, actor: &Actor) -> Result<RecordId> {
        self.check_actor(actor)?;
        self.sector(staff.sector)?;
        let id = self.staff.save(id, staff, actor)?;
        tracing::info!(%id, %actor, "servidor gravado");
        Ok(id)
    }

    pub fn staff_member(&self, id: RecordId) -> Result<&Record<Staff>> {
        self.staff
            .get(id)
            .ok_or_else(|| ProtocoloError::not_found(Staff::NAME, id))
    }

    pub fn staff_by_name(&self, name: &str) -> Result<&Record<Staff>> {
        self.staff
            .iter()
            .find(|row| row.data.name == name)
            .ok_or_else(|| ProtocoloError::not_found(Staff::NAME, name))
    }

    pub fn delete_staff(&mut self, id: RecordId, actor: &Actor) -> Result<()> {
        self.check_actor(actor)?;
        let name = self.staff_member(id)?.data.name.clone();
        let documents = self
            .documents
            .iter()
            .filter(|row| row.data.base.responsible == id)
            .count();
        if documents > 0 {
            return Err(ProtocoloError::Protected {
                entity: Staff::NAME,
                key: name,
                referenced_by: format!("{documents} documento(s)"),
            });
        }
        self.staff.remove(id);
        tracing::info!(%id, name = %name, %actor, "servidor excluído");
        Ok(())
    }

    // --- documentos ---

    pub fn save_document(
        &mut self,
        id: Option<RecordId>,
        document: Document,
        actor: &Actor,
    ) -> Result<RecordId> {
        self.check_actor(actor)?;
        self.sector(document.base.sector)?;
        self.staff_member(document.base.responsible)?;
        let label = document.to_string();
        let id = self.documents.save(id, document, actor)?;
        tracing::info!(%id, document = %label, %actor, "documento gravado");
        Ok(id)
    }

    pub fn document(&self, id: RecordId) -> Result<&Record<Document>> {
        self.documents
            .get(id)
            .ok_or_else(|| ProtocoloError::not_found(Document::NAME, id))
    }

    /// Aceita o id completo, um prefixo do id ou o número do processo, ofício
    /// ou ordem de serviço. Um número exato tem precedência sobre prefixos.
    pub fn resolve_document(&self, reference: &str) -> Result<&Record<Document>> {
        if let Some(id) = RecordId::parse(reference) {
            return self.document(id);
        }
        // número exato antes de prefixo
        let mut matches: Vec<&Record<Document>> = self
            .documents
            .iter()
            .filter(|row| row.data.number() == Some(reference))
            .collect();
        if matches.is_empty() && reference.len() >= MIN_ID_PREFIX {
            matches = self
                .documents
                .iter()
                .filter(|row| row.id.matches_prefix(reference))
                .collect();
        }

        match matches.as_slice() {
            [] => Err(ProtocoloError::not_found(Document::NAME, reference)),
            [row] => Ok(*row),
            rows => Err(ProtocoloError::Ambiguous {
                reference: reference.to_string(),
                matches: rows
                    .iter()
                    .map(|row| format!("{} ({})", row.data, row.id.short()))
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Altera a situação e a data de conclusão pelo caminho normal de gravação.
    ///
    /// `conclusion_date: None` mantém a data atual.
    pub fn set_status(
        &mut self,
        id: RecordId,
        status: DocumentStatus,
        conclusion_date: Option<NaiveDate>,
        actor: &Actor,
    ) -> Result<()> {
        let mut document = self.document(id)?.data.clone();
        document.base.status = status;
        if conclusion_date.is_some() {
            document.base.conclusion_date = conclusion_date;
        }
        self.save_document(Some(id), document, actor)?;
        Ok(())
    }

    pub fn delete_document(&mut self, id: RecordId, actor: &Actor) -> Result<()> {
        self.check_actor(actor)?;
        let label = self.document(id)?.data.to_string();
        let routed = self
            .routing
            .iter()
            .filter(|row| row.data.document == id)
            .count();
        if routed > 0 {
            return Err(ProtocoloError::Protected {
                entity: Document::NAME,
                key: label,
                referenced_by: format!("{routed} tramitação(ões)"),
            });
        }
        self.documents.remove(id);
        tracing::info!(%id, document = %label, %actor, "documento excluído");
        Ok(())
    }

    // --- tramitações ---

    /// Registra ou altera uma tramitação.
    ///
    /// Na criação o remetente é sempre o usuário atuante, que precisa estar
    /// identificado. O destinatário precisa estar ativo sempre que for
    /// definido ou trocado.
    pub fn save_routing(
        &mut self,
        id: Option<RecordId>,
        entry: RoutingEntry,
        actor: &Actor,
    ) -> Result<RecordId> {
        self.check_actor(actor)?;
        self.document(entry.document)?;

        let recipient_changed = match id {
            None => {
                if actor.username().is_none() {
                    return Err(ProtocoloError::Unauthenticated);
                }
                true
            }
            Some(id) => self.routing_entry(id)?.data.to != entry.to,
        };
        let recipient = self.user(&entry.to)?;
        if recipient_changed && !recipient.data.active {
            return Err(ProtocoloError::InactiveRecipient(entry.to));
        }

        let id = self.routing.save(id, entry, actor)?;
        tracing::info!(%id, %actor, "tramitação gravada");
        Ok(id)
    }

    pub fn routing_entry(&self, id: RecordId) -> Result<&Record<RoutingEntry>> {
        self.routing
            .get(id)
            .ok_or_else(|| ProtocoloError::not_found(RoutingEntry::NAME, id))
    }

    /// Aceita o id completo ou um prefixo único.
    pub fn resolve_routing(&self, reference: &str) -> Result<&Record<RoutingEntry>> {
        if let Some(id) = RecordId::parse(reference) {
            return self.routing_entry(id);
        }
        if reference.len() < MIN_ID_PREFIX {
            return Err(ProtocoloError::not_found(RoutingEntry::NAME, reference));
        }
        let matches: Vec<&Record<RoutingEntry>> = self
            .routing
            .iter()
            .filter(|row| row.id.matches_prefix(reference))
            .collect();
        match matches.as_slice() {
            [] => Err(ProtocoloError::not_found(RoutingEntry::NAME, reference)),
            [row] => Ok(*row),
            rows => Err(ProtocoloError::Ambiguous {
                reference: reference.to_string(),
                matches: rows
                    .iter()
                    .map(|row| row.id.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    /// Confirma o recebimento de uma tramitação.
    pub fn mark_received(&mut self, id: RecordId, actor: &Actor) -> Result<()> {
        let mut entry = self.routing_entry(id)?.data.clone();
        entry.received = Received::Yes;
        self.save_routing(Some(id), entry, actor)?;
        Ok(())
    }

    pub fn delete_routing(&mut self, id: RecordId, actor: &Actor) -> Result<()> {
        self.check_actor(actor)?;
        self.routing_entry(id)?;
        self.routing.remove(id);
        tracing::info!(%id, %actor, "tramitação excluída");
        Ok(())
    }

    fn check_actor(&self, actor: &Actor) -> Result<()> {
        match actor.username() {
            Some(name) => self.user(name).map(|_| ()),
            None => Ok(()),
        }
    }
}

fn clear_creator<'a>(audits: impl Iterator<Item = &'a mut Audit>, username: &str) -> usize {
    let mut cleared = 0;
    for audit in audits {
        if audit.created_by.as_deref() == Some(username) {
            audit.created_by = None;
            cleared += 1;
        }
    }
    cleared
}
