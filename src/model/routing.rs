//! Tramitação: registro do despacho de um documento entre usuários.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{Actor, RecordId};
use super::validation::{self, Validate, ValidationError};

/// Confirmação de recebimento pelo destinatário.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Received {
    #[serde(rename = "Sim")]
    Yes,
    #[default]
    #[serde(rename = "Nao")]
    No,
}

impl fmt::Display for Received {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Received::Yes => write!(f, "Sim"),
            Received::No => write!(f, "Não"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingEntry {
    pub document: RecordId,
    /// Remetente. Definido pelo registro na criação a partir do usuário atuante;
    /// qualquer valor informado pelo chamador é descartado.
    #[serde(default)]
    pub from: Option<String>,
    pub to: String,
    #[serde(default)]
    pub received: Received,
}

impl RoutingEntry {
    pub fn new(document: RecordId, to: impl Into<String>) -> Self {
        Self {
            document,
            from: None,
            to: to.into(),
            received: Received::No,
        }
    }

    /// Define o remetente a partir do usuário atuante. Só na criação.
    pub fn stamp_sender(&mut self, actor: &Actor) {
        self.from = actor.username().map(str::to_string);
    }
}

impl Validate for RoutingEntry {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::required_text("Para", &self.to, 150)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_is_not_received() {
        let entry = RoutingEntry::new(RecordId::new(), "carla");
        assert_eq!(entry.received, Received::No);
        assert_eq!(entry.from, None);
    }

    #[test]
    fn stamp_sender_replaces_supplied_value() {
        let mut entry = RoutingEntry::new(RecordId::new(), "carla");
        entry.from = Some("impostor".into());
        entry.stamp_sender(&Actor::user("bruno"));
        assert_eq!(entry.from.as_deref(), Some("bruno"));
    }

    #[test]
    fn received_uses_original_codes() {
        assert_eq!(serde_json::to_string(&Received::Yes).unwrap(), "\"Sim\"");
        assert_eq!(serde_json::to_string(&Received::No).unwrap(), "\"Nao\"");
        assert_eq!(Received::No.to_string(), "Não");
    }

    #[test]
    fn recipient_is_required() {
        let entry = RoutingEntry::new(RecordId::new(), " ");
        assert!(entry.validate().is_err());
    }
}
