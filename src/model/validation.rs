//! Regras de validação aplicadas antes de qualquer gravação.
//!
//! Todas as violações são representadas por [`ValidationError`]. As checagens
//! são puras: recebem o registro candidato e não alteram nada.

use chrono::NaiveDate;
use thiserror::Error;

/// Violação de uma regra de campo ou de ordenação de datas.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A data de cadastro não pode ser posterior à data de conclusão.")]
    OpeningAfterConclusion {
        opening: NaiveDate,
        conclusion: NaiveDate,
    },

    #[error("A data de entrada não pode ser posterior à data de saída.")]
    EntryAfterExit { entry: NaiveDate, exit: NaiveDate },

    #[error("O campo \"{field}\" é obrigatório.")]
    Required { field: &'static str },

    #[error("O campo \"{field}\" aceita no máximo {max} caracteres ({len} informados).")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("Nome de usuário inválido: \"{0}\"")]
    InvalidUsername(String),

    #[error("E-mail inválido: {0}")]
    InvalidEmail(String),

    #[error("Anexo inválido (deve ficar em \"anexos/\"): {0}")]
    InvalidAttachment(String),
}

/// Diretório relativo onde os anexos são guardados pelo armazenamento externo.
pub const ATTACHMENT_DIR: &str = "anexos";

/// Implementado por todo registro que passa pela validação antes de ser gravado.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Devolve o par `(início, fim)` quando o início é posterior ao fim.
/// Sem data final não há violação.
pub fn out_of_order(start: NaiveDate, end: Option<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    end.filter(|end| start > *end).map(|end| (start, end))
}

/// Campo de texto obrigatório com limite de caracteres.
pub fn required_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    max_len(field, value, max)
}

/// Limite de caracteres (não de bytes) para campos livres.
pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, max, len });
    }
    Ok(())
}

/// Checagem sintática mínima de endereço de e-mail.
pub fn email_address(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(value.to_string());

    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// O anexo precisa ser um caminho relativo dentro de [`ATTACHMENT_DIR`].
pub fn attachment_path(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidAttachment(value.to_string());

    let rest = value
        .strip_prefix(ATTACHMENT_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(invalid)?;
    if rest.is_empty() || rest.split('/').any(|part| part.is_empty() || part == "..") {
        return Err(invalid());
    }
    Ok(())
}

/// Coloca um nome de arquivo informado pelo usuário dentro de [`ATTACHMENT_DIR`].
///
/// Caminhos já prefixados são mantidos; demais caminhos perdem os diretórios.
pub fn attachment_for(name: &str) -> String {
    if name.starts_with(&format!("{ATTACHMENT_DIR}/")) {
        return name.to_string();
    }
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    format!("{ATTACHMENT_DIR}/{file_name}")
}
