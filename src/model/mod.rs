mod document;
mod record;
mod routing;
mod sector;
mod subject;
pub mod validation;

pub use document::{
    Document, DocumentBase, DocumentKind, DocumentStatus, DocumentType, EmailRegistration,
    OfficialLetter, Process, ServiceOrder,
};
pub use record::{Actor, Audit, Record, RecordId, User};
pub use routing::{Received, RoutingEntry};
pub use sector::{Sector, Staff};
pub use subject::ProcessSubject;
pub use validation::{Validate, ValidationError};
