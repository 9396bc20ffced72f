//! Listagens com busca e ordenação padrão por entidade.
//!
//! A busca é por trecho, sem diferenciar maiúsculas, nos mesmos campos que a
//! administração original oferecia.

use std::cmp::Reverse;

use crate::model::{
    Document, DocumentKind, DocumentType, Received, Record, RecordId, RoutingEntry, Sector, Staff,
    User,
};

use super::Registry;
#[cfg(test)]
use super::Table;

/// Filtros para a listagem de tramitações. Campos vazios não filtram.
#[derive(Debug, Clone, Default)]
pub struct RoutingFilter {
    pub document: Option<RecordId>,
    pub to: Option<String>,
    pub received: Option<Received>,
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Busca ausente ou vazia aceita tudo.
fn matches_any(search: Option<&str>, fields: &[&str]) -> bool {
    match search.map(str::trim) {
        None | Some("") => true,
        Some(needle) => fields.iter().any(|field| contains(field, needle)),
    }
}

impl Registry {
    #[cfg(test)]
    pub fn users(&self) -> &Table<User> {
        &self.users
    }

    #[cfg(test)]
    pub fn sectors(&self) -> &Table<Sector> {
        &self.sectors
    }

    #[cfg(test)]
    pub fn staff(&self) -> &Table<Staff> {
        &self.staff
    }

    #[cfg(test)]
    pub fn documents(&self) -> &Table<Document> {
        &self.documents
    }

    #[cfg(test)]
    pub fn routing(&self) -> &Table<RoutingEntry> {
        &self.routing
    }

    pub fn list_users(&self, search: Option<&str>) -> Vec<&Record<User>> {
        let mut rows: Vec<_> = self
            .users
            .iter()
            .filter(|row| {
                let user = &row.data;
                matches_any(
                    search,
                    &[
                        &user.username,
                        user.first_name.as_deref().unwrap_or_default(),
                        user.last_name.as_deref().unwrap_or_default(),
                    ],
                )
            })
            .collect();
        rows.sort_by(|a, b| a.data.username.cmp(&b.data.username));
        rows
    }

    /// Ordenados pela sigla.
    pub fn list_sectors(&self, search: Option<&str>) -> Vec<&Record<Sector>> {
        let mut rows: Vec<_> = self
            .sectors
            .iter()
            .filter(|row| matches_any(search, &[&row.data.code]))
            .collect();
        rows.sort_by(|a, b| a.data.code.cmp(&b.data.code));
        rows
    }

    /// Ordenados pelo nome e depois pela situação.
    pub fn list_staff(&self, search: Option<&str>) -> Vec<&Record<Staff>> {
        let mut rows: Vec<_> = self
            .staff
            .iter()
            .filter(|row| matches_any(search, &[&row.data.name]))
            .collect();
        rows.sort_by(|a, b| {
            (&a.data.name, a.data.active).cmp(&(&b.data.name, b.data.active))
        });
        rows
    }

    /// Documentos de uma espécie. Ofícios saem por vencimento; as demais
    /// espécies pela abertura, mais recentes primeiro.
    pub fn list_documents(&self, doc_type: DocumentType, search: Option<&str>) -> Vec<&Record<Document>> {
        let mut rows: Vec<_> = self
            .documents
            .iter()
            .filter(|row| row.data.doc_type() == doc_type)
            .filter(|row| document_matches(&row.data, search))
            .collect();

        match doc_type {
            // ofícios sem vencimento vão para o fim
            DocumentType::OfficialLetter => {
                rows.sort_by_key(|row| (row.data.due_date().is_none(), row.data.due_date()))
            }
            _ => rows.sort_by_key(|row| Reverse(row.data.base.opening_date)),
        }
        rows
    }

    /// Despachos mais recentes primeiro.
    pub fn list_routing(&self, filter: &RoutingFilter) -> Vec<&Record<RoutingEntry>> {
        let mut rows: Vec<_> = self
            .routing
            .iter()
            .filter(|row| filter.document.is_none_or(|id| row.data.document == id))
            .filter(|row| filter.to.as_deref().is_none_or(|to| row.data.to == to))
            .filter(|row| filter.received.is_none_or(|r| row.data.received == r))
            .collect();
        rows.sort_by_key(|row| Reverse(row.audit.created_at));
        rows
    }
}

fn document_matches(document: &Document, search: Option<&str>) -> bool {
    match &document.kind {
        DocumentKind::Process(p) => matches_any(
            search,
            &[&p.number, &p.requester, p.subject.code(), p.subject.label()],
        ),
        DocumentKind::OfficialLetter(l) => {
            let due = l.due_date.map(|d| d.to_string()).unwrap_or_default();
            matches_any(search, &[&l.number, &l.subject, &due])
        }
        DocumentKind::EmailRegistration(e) => {
            matches_any(search, &[&e.sender, &e.email, &e.subject])
        }
        DocumentKind::ServiceOrder(o) => matches_any(search, &[&o.number, &o.subject]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Actor, DocumentBase, OfficialLetter};
    use crate::store::tests::{date, process, seeded};

    #[test]
    fn processes_newest_first_with_search() {
        let (mut registry, sector, staff) = seeded();
        let actor = Actor::user("ana");
        for (number, day) in [("A-1", 5), ("A-2", 20), ("B-3", 12)] {
            registry
                .save_document(None, process(sector, staff, number, date(2024, 1, day)), &actor)
                .unwrap();
        }

        let all: Vec<_> = registry
            .list_documents(DocumentType::Process, None)
            .iter()
            .map(|row| row.data.label().to_string())
            .collect();
        assert_eq!(all, ["A-2", "B-3", "A-1"]);

        let found = registry.list_documents(DocumentType::Process, Some("a-"));
        assert_eq!(found.len(), 2);

        // busca pelo rótulo do assunto
        assert_eq!(registry.list_documents(DocumentType::Process, Some("certid")).len(), 3);
        assert!(registry.list_documents(DocumentType::OfficialLetter, None).is_empty());
    }

    #[test]
    fn letters_by_due_date() {
        let (mut registry, sector, staff) = seeded();
        for (number, days) in [("OF-1", 30u16), ("OF-2", 2), ("OF-3", 10)] {
            let doc = Document::new(
                DocumentBase::new(date(2024, 1, 1), sector, staff),
                DocumentKind::OfficialLetter(OfficialLetter {
                    number: number.into(),
                    subject: "Prazo".into(),
                    deadline_days: days,
                    due_date: None,
                }),
            );
            registry.save_document(None, doc, &Actor::Anonymous).unwrap();
        }

        let order: Vec<_> = registry
            .list_documents(DocumentType::OfficialLetter, None)
            .iter()
            .map(|row| row.data.label().to_string())
            .collect();
        assert_eq!(order, ["OF-2", "OF-3", "OF-1"]);

        // o vencimento também entra na busca
        let hit = registry.list_documents(DocumentType::OfficialLetter, Some("2024-01-11"));
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].data.label(), "OF-3");
    }

    #[test]
    fn sectors_and_staff_are_sorted() {
        let (mut registry, sector, _) = seeded();
        registry.save_sector(None, Sector::new("ADM"), &Actor::Anonymous).unwrap();
        registry
            .save_staff(None, Staff::new("Antônio", sector, date(2021, 5, 1)), &Actor::Anonymous)
            .unwrap();

        let codes: Vec<_> = registry.list_sectors(None).iter().map(|r| r.data.code.clone()).collect();
        assert_eq!(codes, ["ADM", "SUFGI"]);

        let names: Vec<_> = registry.list_staff(None).iter().map(|r| r.data.name.clone()).collect();
        assert_eq!(names, ["Antônio", "Maria Lima"]);
        assert_eq!(registry.list_staff(Some("lima")).len(), 1);
    }

    #[test]
    fn routing_filters() {
        let (mut registry, sector, staff) = seeded();
        let ana = Actor::user("ana");
        let doc = registry
            .save_document(None, process(sector, staff, "1", date(2024, 1, 1)), &ana)
            .unwrap();
        let first = registry
            .save_routing(None, RoutingEntry::new(doc, "bruno"), &ana)
            .unwrap();
        registry
            .save_routing(None, RoutingEntry::new(doc, "ana"), &Actor::user("bruno"))
            .unwrap();
        registry.mark_received(first, &Actor::user("bruno")).unwrap();

        assert_eq!(registry.list_routing(&RoutingFilter::default()).len(), 2);

        let to_bruno = RoutingFilter {
            to: Some("bruno".into()),
            ..Default::default()
        };
        assert_eq!(registry.list_routing(&to_bruno)[0].id, first);

        let pending = RoutingFilter {
            received: Some(Received::No),
            ..Default::default()
        };
        let pending = registry.list_routing(&pending);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].data.to, "ana");
    }
}
