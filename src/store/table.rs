use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ProtocoloError, Result};
use crate::model::{
    Actor, Audit, Document, Record, RecordId, RoutingEntry, Sector, Staff, User, Validate,
};

/// Ganchos que o registro executa em toda gravação de uma linha.
pub trait Entity: Validate + Clone {
    /// Nome exibido em mensagens de erro e logs.
    const NAME: &'static str;

    /// Campo e valor em conflito quando `self` quebraria uma regra de
    /// unicidade já ocupada por `other`.
    fn conflicts_with(&self, _other: &Self) -> Option<(&'static str, String)> {
        None
    }

    /// Executado uma vez, antes da primeira gravação.
    fn on_create(&mut self, _actor: &Actor) {}

    /// Executado nas alterações: copia os campos imutáveis após a criação.
    fn preserve(&mut self, _previous: &Self) {}

    /// Executado antes da validação em toda gravação.
    fn before_save(&mut self) {}
}

/// Uma tabela de registros de um mesmo tipo, na ordem de inserção.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<T> {
    rows: Vec<Record<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T> Table<T> {
    pub fn get(&self, id: RecordId) -> Option<&Record<T>> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record<T>> {
        self.rows.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Record<T>> {
        self.rows.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn remove(&mut self, id: RecordId) -> Option<Record<T>> {
        let index = self.rows.iter().position(|row| row.id == id)?;
        Some(self.rows.remove(index))
    }
}

impl<T: Entity> Table<T> {
    /// Valida e grava uma linha.
    ///
    /// `id: None` cria a linha com identidade nova, marca de criação do
    /// usuário atuante e [`Entity::on_create`]. `Some(id)` altera uma linha
    /// existente e mantém a marca de criação. Nada é gravado se alguma
    /// checagem falhar.
    pub fn save(&mut self, id: Option<RecordId>, mut data: T, actor: &Actor) -> Result<RecordId> {
        let now = Utc::now();

        let previous_audit = match id {
            None => {
                data.on_create(actor);
                None
            }
            Some(id) => {
                let previous = self
                    .get(id)
                    .ok_or_else(|| ProtocoloError::not_found(T::NAME, id))?;
                data.preserve(&previous.data);
                Some(previous.audit.clone())
            }
        };

        data.before_save();
        data.validate()?;

        if let Some((field, value)) = self
            .rows
            .iter()
            .filter(|row| Some(row.id) != id)
            .find_map(|row| data.conflicts_with(&row.data))
        {
            return Err(ProtocoloError::Duplicate {
                entity: T::NAME,
                field,
                value,
            });
        }

        match (id, previous_audit) {
            (Some(id), Some(previous)) => {
                if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
                    row.audit = Audit::updated(&previous, now);
                    row.data = data;
                }
                tracing::debug!(entity = T::NAME, %id, %actor, "registro atualizado");
                Ok(id)
            }
            _ => {
                let id = RecordId::new();
                self.rows.push(Record {
                    id,
                    audit: Audit::created(actor, now),
                    data,
                });
                tracing::debug!(entity = T::NAME, %id, %actor, "registro criado");
                Ok(id)
            }
        }
    }
}

impl Entity for User {
    const NAME: &'static str = "Usuário";

    fn conflicts_with(&self, other: &Self) -> Option<(&'static str, String)> {
        (self.username == other.username).then(|| ("nome de usuário", self.username.clone()))
    }

    fn preserve(&mut self, previous: &Self) {
        // referenciado por tramitações e marcas de criação
        self.username = previous.username.clone();
    }
}

impl Entity for Sector {
    const NAME: &'static str = "Setor";

    fn conflicts_with(&self, other: &Self) -> Option<(&'static str, String)> {
        self.code
            .eq_ignore_ascii_case(&other.code)
            .then(|| ("sigla", self.code.clone()))
    }
}

impl Entity for Staff {
    const NAME: &'static str = "Servidor";

    fn conflicts_with(&self, other: &Self) -> Option<(&'static str, String)> {
        (self.name == other.name).then(|| ("nome", self.name.clone()))
    }
}

impl Entity for Document {
    const NAME: &'static str = "Documento";

    fn conflicts_with(&self, other: &Self) -> Option<(&'static str, String)> {
        if self.doc_type() != other.doc_type() {
            return None;
        }
        match (self.number(), other.number()) {
            (Some(mine), Some(theirs)) if mine == theirs => {
                Some(("número", format!("{} {mine}", self.doc_type())))
            }
            _ => None,
        }
    }

    fn before_save(&mut self) {
        self.recompute();
    }
}

impl Entity for RoutingEntry {
    const NAME: &'static str = "Tramitação";

    fn on_create(&mut self, actor: &Actor) {
        self.stamp_sender(actor);
    }

    fn preserve(&mut self, previous: &Self) {
        self.from = previous.from.clone();
    }
}
