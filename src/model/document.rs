//! Documentos rastreados: processo, ofício, cadastro de e-mail e ordem de serviço.
//!
//! Os campos comuns ficam em [`DocumentBase`]; o que é próprio de cada espécie
//! fica em [`DocumentKind`], cuja variante é gravada explicitamente no arquivo
//! de dados (campo `type`).

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::record::RecordId;
use super::sector::NAME_MAX;
use super::subject::ProcessSubject;
use super::validation::{self, Validate, ValidationError};

pub const NUMBER_MAX: usize = 20;
pub const NOTE_MAX: usize = 400;
pub const SUBJECT_MAX: usize = 120;
pub const LETTER_SUBJECT_MAX: usize = 100;
pub const EMAIL_MAX: usize = 100;

/// Situação do documento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[default]
    #[serde(rename = "Aberto")]
    Open,
    #[serde(rename = "Arquivado")]
    Archived,
    #[serde(rename = "Concluido")]
    Concluded,
}

impl DocumentStatus {
    pub fn label(self) -> &'static str {
        match self {
            DocumentStatus::Open => "Aberto",
            DocumentStatus::Archived => "Arquivado",
            DocumentStatus::Concluded => "Concluído",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Campos comuns a todas as espécies de documento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBase {
    pub opening_date: NaiveDate,
    pub sector: RecordId,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub conclusion_date: Option<NaiveDate>,
    /// Servidor responsável pela carga do documento.
    pub responsible: RecordId,
    #[serde(default)]
    pub note: String,
    /// Caminho relativo dentro de `anexos/`.
    #[serde(default)]
    pub attachment: Option<String>,
}

impl DocumentBase {
    pub fn new(opening_date: NaiveDate, sector: RecordId, responsible: RecordId) -> Self {
        Self {
            opening_date,
            sector,
            status: DocumentStatus::Open,
            conclusion_date: None,
            responsible,
            note: String::new(),
            attachment: None,
        }
    }
}

impl Validate for DocumentBase {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some((opening, conclusion)) =
            validation::out_of_order(self.opening_date, self.conclusion_date)
        {
            return Err(ValidationError::OpeningAfterConclusion {
                opening,
                conclusion,
            });
        }
        validation::max_len("Observações", &self.note, NOTE_MAX)?;
        if let Some(attachment) = &self.attachment {
            validation::attachment_path(attachment)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub number: String,
    pub requester: String,
    pub subject: ProcessSubject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialLetter {
    pub number: String,
    pub subject: String,
    /// Prazo em dias corridos a partir da abertura.
    pub deadline_days: u16,
    /// Derivado: abertura + prazo. Recalculado a cada gravação.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRegistration {
    pub sender: String,
    pub email: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub number: String,
    pub subject: String,
}

/// Campos próprios de cada espécie de documento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentKind {
    Process(Process),
    OfficialLetter(OfficialLetter),
    EmailRegistration(EmailRegistration),
    ServiceOrder(ServiceOrder),
}

/// Espécie de um [`DocumentKind`], usada em listagens e buscas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentType {
    Process,
    OfficialLetter,
    EmailRegistration,
    ServiceOrder,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Process,
        DocumentType::OfficialLetter,
        DocumentType::EmailRegistration,
        DocumentType::ServiceOrder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Process => "Processo",
            DocumentType::OfficialLetter => "Ofício",
            DocumentType::EmailRegistration => "E-mail",
            DocumentType::ServiceOrder => "Ordem de serviço",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Documento completo: base comum mais a espécie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub base: DocumentBase,
    pub kind: DocumentKind,
}

impl Document {
    pub fn new(base: DocumentBase, kind: DocumentKind) -> Self {
        let mut document = Self { base, kind };
        document.recompute();
        document
    }

    pub fn doc_type(&self) -> DocumentType {
        match self.kind {
            DocumentKind::Process(_) => DocumentType::Process,
            DocumentKind::OfficialLetter(_) => DocumentType::OfficialLetter,
            DocumentKind::EmailRegistration(_) => DocumentType::EmailRegistration,
            DocumentKind::ServiceOrder(_) => DocumentType::ServiceOrder,
        }
    }

    /// Identificador natural da espécie: número do processo, do ofício ou da
    /// ordem de serviço; para e-mails, o assunto.
    pub fn label(&self) -> &str {
        match &self.kind {
            DocumentKind::Process(p) => &p.number,
            DocumentKind::OfficialLetter(l) => &l.number,
            DocumentKind::ServiceOrder(o) => &o.number,
            DocumentKind::EmailRegistration(e) => &e.subject,
        }
    }

    /// Número único dentro da espécie. E-mails não têm número.
    pub fn number(&self) -> Option<&str> {
        match &self.kind {
            DocumentKind::Process(p) => Some(&p.number),
            DocumentKind::OfficialLetter(l) => Some(&l.number),
            DocumentKind::ServiceOrder(o) => Some(&o.number),
            DocumentKind::EmailRegistration(_) => None,
        }
    }

    pub fn subject(&self) -> String {
        match &self.kind {
            DocumentKind::Process(p) => p.subject.label().to_string(),
            DocumentKind::OfficialLetter(l) => l.subject.clone(),
            DocumentKind::EmailRegistration(e) => e.subject.clone(),
            DocumentKind::ServiceOrder(o) => o.subject.clone(),
        }
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        match &self.kind {
            DocumentKind::OfficialLetter(l) => l.due_date,
            _ => None,
        }
    }

    /// Recalcula os campos derivados. Executado em toda gravação.
    pub fn recompute(&mut self) {
        if let DocumentKind::OfficialLetter(letter) = &mut self.kind {
            letter.due_date = due_date(Some(self.base.opening_date), Some(letter.deadline_days));
        }
    }
}

/// Vencimento de um ofício: abertura + prazo em dias.
///
/// Sem uma das duas entradas não há vencimento. Prazo zero vence no próprio dia.
pub fn due_date(opening: Option<NaiveDate>, deadline_days: Option<u16>) -> Option<NaiveDate> {
    let (opening, days) = opening.zip(deadline_days)?;
    opening.checked_add_days(Days::new(u64::from(days)))
}

impl Validate for Document {
    fn validate(&self) -> Result<(), ValidationError> {
        self.base.validate()?;
        match &self.kind {
            DocumentKind::Process(p) => {
                validation::required_text("Número do Processo", &p.number, NUMBER_MAX)?;
                validation::required_text("Requerente", &p.requester, NAME_MAX)?;
            }
            DocumentKind::OfficialLetter(l) => {
                validation::required_text("Número do Ofício", &l.number, NUMBER_MAX)?;
                validation::required_text("Assunto", &l.subject, LETTER_SUBJECT_MAX)?;
            }
            DocumentKind::EmailRegistration(e) => {
                validation::required_text("Remetente", &e.sender, NAME_MAX)?;
                validation::required_text("E-mail", &e.email, EMAIL_MAX)?;
                validation::email_address(&e.email)?;
                validation::required_text("Assunto", &e.subject, SUBJECT_MAX)?;
            }
            DocumentKind::ServiceOrder(o) => {
                validation::required_text("Número", &o.number, NUMBER_MAX)?;
                validation::required_text("Assunto", &o.subject, SUBJECT_MAX)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DocumentKind::Process(p) => write!(f, "Processo: {}", p.number),
            DocumentKind::OfficialLetter(l) => write!(f, "Ofício: {}", l.number),
            DocumentKind::EmailRegistration(e) => write!(f, "E-mail: {}", e.email),
            DocumentKind::ServiceOrder(o) => write!(f, "Ordem de serviço: {}", o.number),
        }
    }
}
