//! Execução dos subcomandos sobre o registro carregado.
//!
//! Cada comando devolve um [`Outcome`] dizendo se o registro mudou; só então
//! o arquivo de dados é regravado.

use crate::cli::{
    BaseArgs, Command, DocumentCommand, EmailCommand, LetterCommand, OrderCommand,
    ProcessCommand, RouteCommand, SearchArgs, SectorCommand, StaffCommand, UserCommand,
};
use crate::error::{ProtocoloError, Result};
use crate::import::ImportBatch;
use crate::model::{
    Actor, Document, DocumentBase, DocumentKind, DocumentType, EmailRegistration,
    OfficialLetter, Process, RoutingEntry, Sector, ServiceOrder, Staff, User, validation,
};
use crate::store::{Registry, RoutingFilter};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Changed,
}

/// Usuário atuante do comando.
///
/// Consultas não resolvem usuário. O cadastro do próprio usuário atuante, ou
/// de qualquer usuário num registro ainda vazio, roda como anônimo.
pub fn resolve_actor(command: &Command, registry: &Registry, username: Option<&str>) -> Result<Actor> {
    if command.is_read_only() {
        return Ok(Actor::Anonymous);
    }
    if let Command::User {
        action: UserCommand::Add { username: new, .. },
    } = command
        && registry.user(new).is_err()
        && (username == Some(new.as_str()) || registry.list_users(None).is_empty())
    {
        tracing::debug!(username = %new, "cadastro inicial, operando como anônimo");
        return Ok(Actor::Anonymous);
    }
    registry.actor_for(username)
}

pub fn execute(command: Command, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    tracing::debug!(?command, %actor, "executando comando");
    match command {
        Command::User { action } => user(action, registry, actor),
        Command::Sector { action } => sector(action, registry, actor),
        Command::Staff { action } => staff(action, registry, actor),
        Command::Process { action } => process(action, registry, actor),
        Command::Letter { action } => letter(action, registry, actor),
        Command::Email { action } => email(action, registry, actor),
        Command::Order { action } => order(action, registry, actor),
        Command::Document { action } => document(action, registry, actor),
        Command::Route { action } => route(action, registry, actor),
        Command::Import { file } => {
            let batch = ImportBatch::from_path(&file)?;
            if batch.is_empty() {
                ui::success("Nada a importar");
                return Ok(Outcome::Unchanged);
            }
            let progress = ui::ImportProgress::start(batch.len());
            match batch.apply(registry, actor, |label| progress.record(label)) {
                Ok(summary) => {
                    progress.finish(&summary);
                    Ok(Outcome::Changed)
                }
                Err(err) => {
                    progress.abandon();
                    Err(err)
                }
            }
        }
    }
}

fn user(action: UserCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        UserCommand::Add {
            username,
            first_name,
            last_name,
        } => {
            let mut user = User::new(&username);
            user.first_name = first_name;
            user.last_name = last_name;
            registry.save_user(None, user, actor)?;
            ui::success(&format!("Usuário {username} cadastrado"));
        }
        UserCommand::Update {
            username,
            first_name,
            last_name,
            active,
        } => {
            let row = registry.user(&username)?;
            let id = row.id;
            let mut user = row.data.clone();
            if first_name.is_some() {
                user.first_name = first_name;
            }
            if last_name.is_some() {
                user.last_name = last_name;
            }
            if let Some(active) = active {
                user.active = active;
            }
            registry.save_user(Some(id), user, actor)?;
            ui::success(&format!("Usuário {username} atualizado"));
        }
        UserCommand::Delete { username } => {
            registry.delete_user(&username, actor)?;
            ui::success(&format!("Usuário {username} excluído"));
        }
        UserCommand::List(SearchArgs { search }) => {
            ui::print_users(&registry.list_users(search.as_deref()));
            return Ok(Outcome::Unchanged);
        }
    }
    Ok(Outcome::Changed)
}

fn sector(action: SectorCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        SectorCommand::Add { code } => {
            registry.save_sector(None, Sector::new(&code), actor)?;
            ui::success(&format!("Setor {code} cadastrado"));
        }
        SectorCommand::Rename { code, new_code } => {
            let id = registry.sector_by_code(&code)?.id;
            registry.save_sector(Some(id), Sector::new(&new_code), actor)?;
            ui::success(&format!("Setor {code} renomeado para {new_code}"));
        }
        SectorCommand::Delete { code } => {
            let id = registry.sector_by_code(&code)?.id;
            registry.delete_sector(id, actor)?;
            ui::success(&format!("Setor {code} excluído"));
        }
        SectorCommand::List(SearchArgs { search }) => {
            ui::print_sectors(registry, &registry.list_sectors(search.as_deref()));
            return Ok(Outcome::Unchanged);
        }
    }
    Ok(Outcome::Changed)
}

fn staff(action: StaffCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        StaffCommand::Add {
            name,
            sector,
            entry,
            exit,
        } => {
            let sector = registry.sector_by_code(&sector)?.id;
            let mut staff = Staff::new(&name, sector, entry);
            staff.exit_date = exit;
            registry.save_staff(None, staff, actor)?;
            ui::success(&format!("Servidor {name} cadastrado"));
        }
        StaffCommand::Update {
            name,
            sector,
            entry,
            exit,
            active,
        } => {
            let row = registry.staff_by_name(&name)?;
            let id = row.id;
            let mut staff = row.data.clone();
            if let Some(code) = sector {
                staff.sector = registry.sector_by_code(&code)?.id;
            }
            if let Some(entry) = entry {
                staff.entry_date = entry;
            }
            if exit.is_some() {
                staff.exit_date = exit;
            }
            if let Some(active) = active {
                staff.active = active;
            }
            registry.save_staff(Some(id), staff, actor)?;
            ui::success(&format!("Servidor {name} atualizado"));
        }
        StaffCommand::Delete { name } => {
            let id = registry.staff_by_name(&name)?.id;
            registry.delete_staff(id, actor)?;
            ui::success(&format!("Servidor {name} excluído"));
        }
        StaffCommand::List(SearchArgs { search }) => {
            ui::print_staff(registry, &registry.list_staff(search.as_deref()));
            return Ok(Outcome::Unchanged);
        }
    }
    Ok(Outcome::Changed)
}

/// Resolve a sigla do setor e o nome do responsável de um documento novo.
fn document_base(registry: &Registry, args: BaseArgs) -> Result<DocumentBase> {
    let sector = registry.sector_by_code(&args.sector)?.id;
    let responsible = registry.staff_by_name(&args.responsible)?.id;
    let opened = args
        .opened
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut base = DocumentBase::new(opened, sector, responsible);
    base.note = args.note;
    base.attachment = args.attachment.as_deref().map(validation::attachment_for);
    Ok(base)
}

fn add_document(
    registry: &mut Registry,
    base: BaseArgs,
    kind: DocumentKind,
    actor: &Actor,
) -> Result<Outcome> {
    let document = Document::new(document_base(registry, base)?, kind);
    let label = document.to_string();
    let id = registry.save_document(None, document, actor)?;
    ui::success(&format!("{label} cadastrado ({})", id.short()));
    Ok(Outcome::Changed)
}

/// Altera os campos próprios de um documento da espécie `doc_type`.
fn update_document(
    registry: &mut Registry,
    reference: &str,
    doc_type: DocumentType,
    actor: &Actor,
    edit: impl FnOnce(&mut DocumentKind),
) -> Result<Outcome> {
    let row = registry.resolve_document(reference)?;
    if row.data.doc_type() != doc_type {
        return Err(ProtocoloError::not_found(doc_type.label(), reference));
    }
    let id = row.id;
    let mut document = row.data.clone();
    edit(&mut document.kind);
    registry.save_document(Some(id), document, actor)?;
    ui::success(&format!("{doc_type} {reference} atualizado"));
    Ok(Outcome::Changed)
}

fn list_documents(registry: &Registry, doc_type: DocumentType, search: SearchArgs) -> Result<Outcome> {
    ui::print_documents(registry, &registry.list_documents(doc_type, search.search.as_deref()));
    Ok(Outcome::Unchanged)
}

fn process(action: ProcessCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        ProcessCommand::Add {
            number,
            requester,
            subject,
            base,
        } => add_document(
            registry,
            base,
            DocumentKind::Process(Process {
                number,
                requester,
                subject,
            }),
            actor,
        ),
        ProcessCommand::Update {
            reference,
            number,
            requester,
            subject,
        } => update_document(registry, &reference, DocumentType::Process, actor, |kind| {
            if let DocumentKind::Process(process) = kind {
                if let Some(number) = number {
                    process.number = number;
                }
                if let Some(requester) = requester {
                    process.requester = requester;
                }
                if let Some(subject) = subject {
                    process.subject = subject;
                }
            }
        }),
        ProcessCommand::List(search) => list_documents(registry, DocumentType::Process, search),
        ProcessCommand::Subjects => {
            ui::print_subjects();
            Ok(Outcome::Unchanged)
        }
    }
}

fn letter(action: LetterCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        LetterCommand::Add {
            number,
            subject,
            deadline,
            base,
        } => add_document(
            registry,
            base,
            DocumentKind::OfficialLetter(OfficialLetter {
                number,
                subject,
                deadline_days: deadline,
                due_date: None,
            }),
            actor,
        ),
        LetterCommand::Update {
            reference,
            number,
            subject,
            deadline,
        } => update_document(registry, &reference, DocumentType::OfficialLetter, actor, |kind| {
            if let DocumentKind::OfficialLetter(letter) = kind {
                if let Some(number) = number {
                    letter.number = number;
                }
                if let Some(subject) = subject {
                    letter.subject = subject;
                }
                if let Some(days) = deadline {
                    letter.deadline_days = days;
                }
            }
        }),
        LetterCommand::List(search) => {
            list_documents(registry, DocumentType::OfficialLetter, search)
        }
    }
}

fn email(action: EmailCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        EmailCommand::Add {
            sender,
            email,
            subject,
            base,
        } => add_document(
            registry,
            base,
            DocumentKind::EmailRegistration(EmailRegistration {
                sender,
                email,
                subject,
            }),
            actor,
        ),
        EmailCommand::Update {
            reference,
            sender,
            email,
            subject,
        } => update_document(registry, &reference, DocumentType::EmailRegistration, actor, |kind| {
            if let DocumentKind::EmailRegistration(registration) = kind {
                if let Some(sender) = sender {
                    registration.sender = sender;
                }
                if let Some(email) = email {
                    registration.email = email;
                }
                if let Some(subject) = subject {
                    registration.subject = subject;
                }
            }
        }),
        EmailCommand::List(search) => {
            list_documents(registry, DocumentType::EmailRegistration, search)
        }
    }
}

fn order(action: OrderCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        OrderCommand::Add {
            number,
            subject,
            base,
        } => add_document(
            registry,
            base,
            DocumentKind::ServiceOrder(ServiceOrder { number, subject }),
            actor,
        ),
        OrderCommand::Update {
            reference,
            number,
            subject,
        } => update_document(registry, &reference, DocumentType::ServiceOrder, actor, |kind| {
            if let DocumentKind::ServiceOrder(order) = kind {
                if let Some(number) = number {
                    order.number = number;
                }
                if let Some(subject) = subject {
                    order.subject = subject;
                }
            }
        }),
        OrderCommand::List(search) => list_documents(registry, DocumentType::ServiceOrder, search),
    }
}

fn document(action: DocumentCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        DocumentCommand::Show { reference } => {
            let row = registry.resolve_document(&reference)?;
            let routing = registry.list_routing(&RoutingFilter {
                document: Some(row.id),
                ..Default::default()
            });
            ui::print_document(registry, row, &routing);
            Ok(Outcome::Unchanged)
        }
        DocumentCommand::Status {
            reference,
            status,
            conclusion,
        } => {
            let id = registry.resolve_document(&reference)?.id;
            let status = status.into();
            registry.set_status(id, status, conclusion, actor)?;
            ui::success(&format!("Situação de {reference} alterada para {status}"));
            Ok(Outcome::Changed)
        }
        DocumentCommand::Update {
            reference,
            opened,
            sector,
            responsible,
            note,
            attachment,
            clear_conclusion,
        } => {
            let row = registry.resolve_document(&reference)?;
            let id = row.id;
            let mut document = row.data.clone();
            if let Some(opened) = opened {
                document.base.opening_date = opened;
            }
            if let Some(code) = sector {
                document.base.sector = registry.sector_by_code(&code)?.id;
            }
            if let Some(name) = responsible {
                document.base.responsible = registry.staff_by_name(&name)?.id;
            }
            if let Some(note) = note {
                document.base.note = note;
            }
            if let Some(name) = attachment {
                document.base.attachment = Some(validation::attachment_for(&name));
            }
            if clear_conclusion {
                document.base.conclusion_date = None;
            }
            registry.save_document(Some(id), document, actor)?;
            ui::success(&format!("Documento {reference} atualizado"));
            Ok(Outcome::Changed)
        }
        DocumentCommand::Delete { reference } => {
            let id = registry.resolve_document(&reference)?.id;
            registry.delete_document(id, actor)?;
            ui::success(&format!("Documento {reference} excluído"));
            Ok(Outcome::Changed)
        }
        DocumentCommand::List { kind, search } => {
            let types = match kind {
                Some(kind) => vec![DocumentType::from(kind)],
                None => DocumentType::ALL.to_vec(),
            };
            let rows: Vec<_> = types
                .into_iter()
                .flat_map(|doc_type| registry.list_documents(doc_type, search.search.as_deref()))
                .collect();
            ui::print_documents(registry, &rows);
            Ok(Outcome::Unchanged)
        }
    }
}

fn route(action: RouteCommand, registry: &mut Registry, actor: &Actor) -> Result<Outcome> {
    match action {
        RouteCommand::Send { document, to } => {
            let doc = registry.resolve_document(&document)?.id;
            let id = registry.save_routing(None, RoutingEntry::new(doc, &to), actor)?;
            ui::success(&format!("{document} despachado para {to} ({})", id.short()));
            Ok(Outcome::Changed)
        }
        RouteCommand::Receive { entry } => {
            let id = registry.resolve_routing(&entry)?.id;
            registry.mark_received(id, actor)?;
            ui::success(&format!("Recebimento da tramitação {entry} confirmado"));
            Ok(Outcome::Changed)
        }
        RouteCommand::Delete { entry } => {
            let id = registry.resolve_routing(&entry)?.id;
            registry.delete_routing(id, actor)?;
            ui::success(&format!("Tramitação {entry} excluída"));
            Ok(Outcome::Changed)
        }
        RouteCommand::List {
            document,
            to,
            pending,
        } => {
            let document = match document {
                Some(reference) => Some(registry.resolve_document(&reference)?.id),
                None => None,
            };
            let filter = RoutingFilter {
                document,
                to,
                received: RouteCommand::received_filter(pending),
            };
            ui::print_routing(registry, &registry.list_routing(&filter));
            Ok(Outcome::Unchanged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, StatusArg};
    use crate::model::{DocumentStatus, Received};
    use clap::Parser;

    fn run(registry: &mut Registry, user: Option<&str>, args: &[&str]) -> Result<Outcome> {
        let cli = Cli::parse_from(std::iter::once("protocolo").chain(args.iter().copied()));
        let actor = resolve_actor(&cli.command, registry, user)?;
        execute(cli.command, registry, &actor)
    }

    fn setup() -> Registry {
        let mut registry = Registry::default();
        for args in [
            &["user", "add", "ana", "--first-name", "Ana", "--last-name", "Souza"][..],
            &["user", "add", "bruno"],
        ] {
            run(&mut registry, None, args).unwrap();
        }
        run(&mut registry, Some("ana"), &["sector", "add", "SUFGI"]).unwrap();
        run(
            &mut registry,
            Some("ana"),
            &["staff", "add", "Maria Lima", "--sector", "sufgi", "--entry", "2020-01-01"],
        )
        .unwrap();
        registry
    }

    #[test]
    fn full_document_lifecycle() {
        let mut registry = setup();
        let outcome = run(
            &mut registry,
            Some("ana"),
            &[
                "process", "add", "100/2024", "--requester", "Fulano", "--subject", "CERTIDAO",
                "--sector", "SUFGI", "--responsible", "Maria Lima", "--opened", "2024-01-10",
                "--attachment", "planta.pdf",
            ],
        )
        .unwrap();
        assert_eq!(outcome, Outcome::Changed);

        let doc = registry.resolve_document("100/2024").unwrap();
        assert_eq!(doc.audit.created_by.as_deref(), Some("ana"));
        assert_eq!(doc.data.base.attachment.as_deref(), Some("anexos/planta.pdf"));

        run(&mut registry, Some("ana"), &["route", "send", "100/2024", "--to", "bruno"]).unwrap();
        let entry = registry.routing().iter().next().unwrap().id.short();
        run(&mut registry, Some("bruno"), &["route", "receive", entry.as_str()]).unwrap();
        assert_eq!(
            registry.routing().iter().next().unwrap().data.received,
            Received::Yes
        );

        let outcome = run(&mut registry, None, &["document", "show", "100/2024"]).unwrap();
        assert_eq!(outcome, Outcome::Unchanged);

        run(
            &mut registry,
            Some("bruno"),
            &["document", "status", "100/2024", "concluded", "--conclusion", "2024-02-01"],
        )
        .unwrap();
        let doc = registry.resolve_document("100/2024").unwrap();
        assert_eq!(doc.data.base.status, DocumentStatus::Concluded);
        assert_eq!(doc.audit.created_by.as_deref(), Some("ana"));
    }

    #[test]
    fn letter_gets_due_date_from_deadline() {
        let mut registry = setup();
        run(
            &mut registry,
            None,
            &[
                "letter", "add", "OF-1", "--subject", "Pedido", "--deadline", "15", "--sector",
                "SUFGI", "--responsible", "Maria Lima", "--opened", "2024-01-10",
            ],
        )
        .unwrap();
        let doc = registry.resolve_document("OF-1").unwrap();
        assert_eq!(doc.data.due_date(), chrono::NaiveDate::from_ymd_opt(2024, 1, 25));
        assert_eq!(doc.audit.created_by, None);
    }

    fn date(y: i32, m: u32, d: u32) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::from_ymd_opt(y, m, d)
    }

    fn add_letter(registry: &mut Registry) {
        run(
            registry,
            Some("ana"),
            &[
                "letter", "add", "OF-1", "--subject", "Pedido", "--deadline", "15", "--sector",
                "SUFGI", "--responsible", "Maria Lima", "--opened", "2024-01-10",
            ],
        )
        .unwrap();
    }

    #[test]
    fn letter_update_recomputes_due_date() {
        let mut registry = setup();
        add_letter(&mut registry);

        let outcome = run(&mut registry, Some("bruno"), &["letter", "update", "OF-1", "--deadline", "5"])
            .unwrap();
        assert_eq!(outcome, Outcome::Changed);
        let doc = registry.resolve_document("OF-1").unwrap();
        assert_eq!(doc.data.due_date(), date(2024, 1, 15));
        assert_eq!(doc.audit.created_by.as_deref(), Some("ana"));

        run(&mut registry, None, &["document", "update", "OF-1", "--opened", "2024-02-01"]).unwrap();
        assert_eq!(registry.resolve_document("OF-1").unwrap().data.due_date(), date(2024, 2, 6));

        run(
            &mut registry,
            None,
            &["letter", "update", "OF-1", "--number", "OF-2", "--subject", "Resposta"],
        )
        .unwrap();
        let doc = registry.resolve_document("OF-2").unwrap();
        assert_eq!(doc.data.subject(), "Resposta");
        assert_eq!(doc.data.due_date(), date(2024, 2, 6));
    }

    #[test]
    fn kind_update_rejects_other_kinds() {
        let mut registry = setup();
        add_letter(&mut registry);
        let err = run(&mut registry, None, &["process", "update", "OF-1", "--requester", "X"])
            .unwrap_err();
        assert!(matches!(err, ProtocoloError::NotFound { entity: "Processo", .. }));

        let err = run(&mut registry, None, &["order", "update", "OF-1", "--subject", "X"])
            .unwrap_err();
        assert!(matches!(err, ProtocoloError::NotFound { entity: "Ordem de serviço", .. }));
    }

    #[test]
    fn email_and_process_updates() {
        let mut registry = setup();
        run(
            &mut registry,
            None,
            &[
                "email", "add", "--sender", "Fulano", "--email", "f@x.gov.br", "--subject", "Oi",
                "--sector", "SUFGI", "--responsible", "Maria Lima",
            ],
        )
        .unwrap();
        let id = registry.documents().iter().next().unwrap().id.short();
        run(&mut registry, None, &["email", "update", id.as_str(), "--email", "g@x.gov.br"]).unwrap();
        let doc = registry.resolve_document(&id).unwrap();
        assert!(matches!(
            &doc.data.kind,
            DocumentKind::EmailRegistration(e) if e.email == "g@x.gov.br" && e.sender == "Fulano"
        ));

        let err = run(&mut registry, None, &["email", "update", id.as_str(), "--email", "ruim"])
            .unwrap_err();
        assert!(matches!(err, ProtocoloError::Validation(_)));

        run(
            &mut registry,
            None,
            &[
                "process", "add", "1/2024", "--requester", "R", "--subject", "CERTIDAO",
                "--sector", "SUFGI", "--responsible", "Maria Lima",
            ],
        )
        .unwrap();
        run(&mut registry, None, &["process", "update", "1/2024", "--subject", "averbação"]).unwrap();
        assert_eq!(
            registry.resolve_document("1/2024").unwrap().data.subject(),
            crate::model::ProcessSubject::Averbacao.label()
        );
    }

    #[test]
    fn document_update_moves_sector_and_clears_conclusion() {
        let mut registry = setup();
        run(&mut registry, Some("ana"), &["sector", "add", "GAB"]).unwrap();
        add_letter(&mut registry);
        run(
            &mut registry,
            None,
            &["document", "status", "OF-1", "concluded", "--conclusion", "2024-01-20"],
        )
        .unwrap();

        run(
            &mut registry,
            None,
            &["document", "update", "OF-1", "--sector", "gab", "--clear-conclusion"],
        )
        .unwrap();
        let base = &registry.resolve_document("OF-1").unwrap().data.base;
        assert_eq!(base.sector, registry.sector_by_code("GAB").unwrap().id);
        assert_eq!(base.conclusion_date, None);
        assert_eq!(base.status, DocumentStatus::Concluded);
    }

    #[test]
    fn unknown_default_user_only_blocks_mutations() {
        let mut registry = setup();
        let ghost = Some("fantasma");
        assert_eq!(run(&mut registry, ghost, &["user", "list"]).unwrap(), Outcome::Unchanged);
        assert_eq!(run(&mut registry, ghost, &["document", "list"]).unwrap(), Outcome::Unchanged);

        let err = run(&mut registry, ghost, &["sector", "add", "GAB"]).unwrap_err();
        assert!(matches!(err, ProtocoloError::NotFound { entity: "Usuário", .. }));
        let err = run(&mut registry, ghost, &["user", "add", "carla"]).unwrap_err();
        assert!(matches!(err, ProtocoloError::NotFound { .. }));

        // o próprio usuário configurado pode ser cadastrado
        run(&mut registry, ghost, &["user", "add", "fantasma"]).unwrap();
        run(&mut registry, ghost, &["sector", "add", "GAB"]).unwrap();
        let gab = registry.sector_by_code("GAB").unwrap();
        assert_eq!(gab.audit.created_by.as_deref(), Some("fantasma"));
    }

    #[test]
    fn first_user_needs_no_actor() {
        let mut registry = Registry::default();
        run(&mut registry, Some("ana"), &["user", "add", "bruno"]).unwrap();
        assert!(registry.user("bruno").unwrap().audit.created_by.is_none());
        assert!(run(&mut registry, Some("ana"), &["user", "add", "carla"]).is_err());
    }

    #[test]
    fn empty_import_is_unchanged() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("vazio.json");
        std::fs::write(&path, "{}").unwrap();
        let mut registry = setup();
        let outcome = run(&mut registry, Some("ana"), &["import", path.to_str().unwrap()]).unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn anonymous_routing_is_rejected() {
        let mut registry = setup();
        run(
            &mut registry,
            None,
            &[
                "order", "add", "OS-1", "--subject", "Reparo", "--sector", "SUFGI",
                "--responsible", "Maria Lima",
            ],
        )
        .unwrap();
        let err = run(&mut registry, None, &["route", "send", "OS-1", "--to", "bruno"]).unwrap_err();
        assert!(matches!(err, ProtocoloError::Unauthenticated));
        assert!(registry.routing().is_empty());
    }

    #[test]
    fn invalid_email_changes_nothing() {
        let mut registry = setup();
        let err = run(
            &mut registry,
            None,
            &[
                "email", "add", "--sender", "Fulano", "--email", "sem-arroba", "--subject", "Oi",
                "--sector", "SUFGI", "--responsible", "Maria Lima",
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ProtocoloError::Validation(_)));
        assert!(registry.documents().is_empty());
    }

    #[test]
    fn listings_do_not_change_the_registry() {
        let mut registry = setup();
        for args in [
            &["user", "list"][..],
            &["sector", "list", "--search", "suf"],
            &["staff", "list"],
            &["process", "list"],
            &["process", "subjects"],
            &["document", "list", "--kind", "letter"],
            &["document", "list"],
            &["route", "list", "--pending"],
        ] {
            assert_eq!(run(&mut registry, None, args).unwrap(), Outcome::Unchanged);
        }
    }

    #[test]
    fn deactivated_user_acts_anonymously() {
        let mut registry = setup();
        run(&mut registry, None, &["user", "update", "bruno", "--active", "false"]).unwrap();
        assert!(!registry.user("bruno").unwrap().data.active);
        assert_eq!(registry.actor_for(Some("bruno")).unwrap(), Actor::Anonymous);
    }

    #[test]
    fn sector_rename_and_protected_delete() {
        let mut registry = setup();
        run(&mut registry, None, &["sector", "rename", "SUFGI", "SUF"]).unwrap();
        assert!(registry.sector_by_code("SUF").is_ok());

        let err = run(&mut registry, None, &["sector", "delete", "SUF"]).unwrap_err();
        assert!(matches!(err, ProtocoloError::Protected { .. }));
    }

    #[test]
    fn status_arg_maps_to_domain() {
        assert_eq!(DocumentStatus::from(StatusArg::Archived), DocumentStatus::Archived);
    }
}
