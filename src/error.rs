use thiserror::Error;

use crate::model::ValidationError;

pub type Result<T> = std::result::Result<T, ProtocoloError>;

#[derive(Debug, Error)]
pub enum ProtocoloError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} não encontrado: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Já existe {entity} com {field} \"{value}\"")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Não é possível excluir {entity} \"{key}\": ainda referenciado por {referenced_by}")]
    Protected {
        entity: &'static str,
        key: String,
        referenced_by: String,
    },

    #[error("Usuário \"{0}\" está inativo e não pode receber tramitações")]
    InactiveRecipient(String),

    #[error("A tramitação exige um usuário autenticado (use --user)")]
    Unauthenticated,

    #[error("Referência ambígua \"{reference}\": corresponde a {matches}")]
    Ambiguous { reference: String, matches: String },

    #[error("Importação interrompida em {entity} #{position}: {source}")]
    Import {
        entity: &'static str,
        position: usize,
        #[source]
        source: Box<ProtocoloError>,
    },

    #[error("Formato de arquivo não suportado: \"{0}\" (use .json ou .toml)")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ProtocoloError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ProtocoloError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn validation_message_is_passed_through() {
        let err: ProtocoloError = ValidationError::EntryAfterExit {
            entry: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            exit: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "A data de entrada não pode ser posterior à data de saída."
        );
    }

    #[test]
    fn protected_display() {
        let err = ProtocoloError::Protected {
            entity: "Setor",
            key: "SUFGI".into(),
            referenced_by: "2 servidor(es)".into(),
        };
        assert_eq!(
            err.to_string(),
            "Não é possível excluir Setor \"SUFGI\": ainda referenciado por 2 servidor(es)"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProtocoloError>();
    }
}
