use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self, Validate, ValidationError};

/// Identidade de uma linha, gerada pelo registro na primeira gravação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Lê a forma completa, com hífens.
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Oito primeiros dígitos hexadecimais, usados nas listagens.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    /// Se `prefix` coincide com o início da forma sem hífens.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let prefix = prefix.replace('-', "").to_lowercase();
        !prefix.is_empty() && self.0.simple().to_string().starts_with(&prefix)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quem executa uma criação, alteração ou exclusão.
///
/// Passado explicitamente a toda mutação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// Sem usuário, ou usuário não identificado.
    Anonymous,
    Authenticated(String),
}

impl Actor {
    pub fn user(username: impl Into<String>) -> Self {
        Actor::Authenticated(username.into())
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated(name) => Some(name),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Anonymous => write!(f, "anônimo"),
            Actor::Authenticated(name) => write!(f, "{name}"),
        }
    }
}

/// Marcas de criação e alteração de toda linha gravada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Usuário que cadastrou o registro; `None` quando desconhecido ou removido.
    #[serde(default)]
    pub created_by: Option<String>,
}

impl Audit {
    /// Marca uma linha gravada pela primeira vez.
    pub fn created(actor: &Actor, now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            modified_at: now,
            created_by: actor.username().map(str::to_string),
        }
    }

    /// Mantém a criação de `previous` e atualiza o horário de alteração.
    pub fn updated(previous: &Audit, now: DateTime<Utc>) -> Self {
        Self {
            created_at: previous.created_at,
            modified_at: now,
            created_by: previous.created_by.clone(),
        }
    }
}

/// Linha gravada: identidade e marcas em torno dos campos da entidade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: RecordId,
    pub audit: Audit,
    #[serde(flatten)]
    pub data: T,
}

/// Usuário do sistema: remetente e destinatário de tramitações e autor de cadastros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            first_name: None,
            last_name: None,
            active: true,
        }
    }

    /// "Nome Sobrenome" quando ambos existem, senão o nome de usuário.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                format!("{first} {last}")
            }
            _ => self.username.clone(),
        }
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationError> {
        validation::required_text("Usuário", &self.username, 150)?;
        if self.username.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidUsername(self.username.clone()));
        }
        if let Some(first) = &self.first_name {
            validation::max_len("Nome", first, 150)?;
        }
        if let Some(last) = &self.last_name {
            validation::max_len("Sobrenome", last, 150)?;
        }
        Ok(())
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}
