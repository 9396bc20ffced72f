//! Interface de linha de comando do protocolo baseada em clap.
//!
//! Define a struct [`Cli`] com um subcomando por entidade ([`Command`]) e as
//! flags globais (`--user`, `--data`, `--verbose`).

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::{DocumentStatus, DocumentType, ProcessSubject, Received};

/// Protocolo: cadastro e tramitação de processos, ofícios, e-mails e ordens de serviço.
#[derive(Debug, Parser)]
#[command(name = "protocolo", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Usuário que executa a operação (sobrepõe `default_user` e `PROTOCOLO_USER`).
    #[arg(long, short, global = true)]
    pub user: Option<String>,

    /// Arquivo de dados (sobrepõe `data_file` e `PROTOCOLO_DATA`).
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Usuários do sistema.
    User {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Setores (siglas).
    Sector {
        #[command(subcommand)]
        action: SectorCommand,
    },

    /// Servidores lotados nos setores.
    Staff {
        #[command(subcommand)]
        action: StaffCommand,
    },

    /// Processos administrativos.
    Process {
        #[command(subcommand)]
        action: ProcessCommand,
    },

    /// Ofícios com prazo de resposta.
    Letter {
        #[command(subcommand)]
        action: LetterCommand,
    },

    /// Cadastro de e-mails recebidos.
    Email {
        #[command(subcommand)]
        action: EmailCommand,
    },

    /// Ordens de serviço.
    Order {
        #[command(subcommand)]
        action: OrderCommand,
    },

    /// Operações comuns a qualquer documento, por número ou id.
    Document {
        #[command(subcommand)]
        action: DocumentCommand,
    },

    /// Tramitação de documentos entre usuários.
    Route {
        #[command(subcommand)]
        action: RouteCommand,
    },

    /// Importa registros de um arquivo JSON ou TOML (tudo ou nada).
    Import {
        /// Caminho do arquivo; o formato vem da extensão.
        file: PathBuf,
    },
}

/// Busca opcional por trecho, sem diferenciar maiúsculas.
#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long, short)]
    pub search: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    Add {
        username: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Altera nome ou situação. O nome de usuário não muda.
    Update {
        username: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        username: String,
    },
    List(SearchArgs),
}

#[derive(Debug, Subcommand)]
pub enum SectorCommand {
    Add {
        code: String,
    },
    Rename {
        code: String,
        new_code: String,
    },
    Delete {
        code: String,
    },
    List(SearchArgs),
}

#[derive(Debug, Subcommand)]
pub enum StaffCommand {
    Add {
        name: String,
        /// Sigla do setor.
        #[arg(long)]
        sector: String,
        /// Data de entrada (AAAA-MM-DD).
        #[arg(long)]
        entry: NaiveDate,
        /// Data de saída (AAAA-MM-DD).
        #[arg(long)]
        exit: Option<NaiveDate>,
    },
    Update {
        name: String,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        entry: Option<NaiveDate>,
        #[arg(long)]
        exit: Option<NaiveDate>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        name: String,
    },
    List(SearchArgs),
}

/// Campos comuns a todo documento novo.
#[derive(Debug, Args)]
pub struct BaseArgs {
    /// Sigla do setor.
    #[arg(long)]
    pub sector: String,

    /// Nome do servidor responsável.
    #[arg(long)]
    pub responsible: String,

    /// Data de cadastro (AAAA-MM-DD); hoje, se omitida.
    #[arg(long)]
    pub opened: Option<NaiveDate>,

    #[arg(long, default_value = "")]
    pub note: String,

    /// Arquivo anexo, guardado em `anexos/`.
    #[arg(long)]
    pub attachment: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum ProcessCommand {
    Add {
        number: String,
        #[arg(long)]
        requester: String,
        /// Código ou descrição do assunto (ver `process subjects`).
        #[arg(long)]
        subject: ProcessSubject,
        #[command(flatten)]
        base: BaseArgs,
    },
    /// Altera número, requerente ou assunto.
    Update {
        reference: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        requester: Option<String>,
        #[arg(long)]
        subject: Option<ProcessSubject>,
    },
    List(SearchArgs),
    /// Lista os assuntos de processo aceitos.
    Subjects,
}

#[derive(Debug, Subcommand)]
pub enum LetterCommand {
    Add {
        number: String,
        #[arg(long)]
        subject: String,
        /// Prazo em dias a partir do cadastro.
        #[arg(long)]
        deadline: u16,
        #[command(flatten)]
        base: BaseArgs,
    },
    /// Altera número, assunto ou prazo. O vencimento é recalculado.
    Update {
        reference: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        deadline: Option<u16>,
    },
    List(SearchArgs),
}

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    Add {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[command(flatten)]
        base: BaseArgs,
    },
    /// Altera remetente, endereço ou assunto. Referência por id ou prefixo.
    Update {
        reference: String,
        #[arg(long)]
        sender: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },
    List(SearchArgs),
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    Add {
        number: String,
        #[arg(long)]
        subject: String,
        #[command(flatten)]
        base: BaseArgs,
    },
    Update {
        reference: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },
    List(SearchArgs),
}

#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// Mostra um documento com suas tramitações.
    Show {
        reference: String,
    },
    /// Altera a situação e, opcionalmente, a data de conclusão.
    Status {
        reference: String,
        status: StatusArg,
        /// Data de conclusão (AAAA-MM-DD).
        #[arg(long)]
        conclusion: Option<NaiveDate>,
    },
    /// Altera campos comuns de um documento existente.
    Update {
        reference: String,
        #[arg(long)]
        opened: Option<NaiveDate>,
        /// Sigla do novo setor.
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        responsible: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        attachment: Option<String>,
        /// Remove a data de conclusão.
        #[arg(long, default_value_t = false)]
        clear_conclusion: bool,
    },
    Delete {
        reference: String,
    },
    /// Lista documentos de uma espécie, ou de todas.
    List {
        #[arg(long, short)]
        kind: Option<KindArg>,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Despacha um documento para outro usuário.
    Send {
        document: String,
        #[arg(long)]
        to: String,
    },
    /// Confirma o recebimento de uma tramitação.
    Receive {
        entry: String,
    },
    Delete {
        entry: String,
    },
    List {
        /// Apenas as tramitações deste documento.
        #[arg(long)]
        document: Option<String>,
        /// Apenas as destinadas a este usuário.
        #[arg(long)]
        to: Option<String>,
        /// Apenas as ainda não recebidas.
        #[arg(long, default_value_t = false)]
        pending: bool,
    },
}

/// Situação aceita pela CLI, mapeada para [`DocumentStatus`] internamente.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Open,
    Archived,
    Concluded,
}

impl From<StatusArg> for DocumentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => DocumentStatus::Open,
            StatusArg::Archived => DocumentStatus::Archived,
            StatusArg::Concluded => DocumentStatus::Concluded,
        }
    }
}

/// Espécie de documento aceita pela CLI, mapeada para [`DocumentType`].
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Process,
    Letter,
    Email,
    Order,
}

impl From<KindArg> for DocumentType {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Process => DocumentType::Process,
            KindArg::Letter => DocumentType::OfficialLetter,
            KindArg::Email => DocumentType::EmailRegistration,
            KindArg::Order => DocumentType::ServiceOrder,
        }
    }
}

impl Command {
    /// Comandos que só consultam o registro dispensam a resolução do usuário.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Command::User { action: UserCommand::List(_) }
                | Command::Sector { action: SectorCommand::List(_) }
                | Command::Staff { action: StaffCommand::List(_) }
                | Command::Process {
                    action: ProcessCommand::List(_) | ProcessCommand::Subjects
                }
                | Command::Letter { action: LetterCommand::List(_) }
                | Command::Email { action: EmailCommand::List(_) }
                | Command::Order { action: OrderCommand::List(_) }
                | Command::Document {
                    action: DocumentCommand::Show { .. } | DocumentCommand::List { .. }
                }
                | Command::Route { action: RouteCommand::List { .. } }
        )
    }
}

impl RouteCommand {
    /// `--pending` filtra as tramitações ainda não recebidas.
    pub fn received_filter(pending: bool) -> Option<Received> {
        pending.then_some(Received::No)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "protocolo",
            "--user",
            "ana",
            "--data",
            "/tmp/p.json",
            "--verbose",
            "sector",
            "list",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.user.as_deref(), Some("ana"));
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/p.json")));
        assert!(matches!(
            cli.command,
            Command::Sector {
                action: SectorCommand::List(SearchArgs { search: None })
            }
        ));
    }

    #[test]
    fn cli_parses_process_add() {
        let cli = Cli::parse_from([
            "protocolo",
            "process",
            "add",
            "100/2024",
            "--requester",
            "Fulano",
            "--subject",
            "averbação",
            "--sector",
            "SUFGI",
            "--responsible",
            "Maria Lima",
            "--opened",
            "2024-01-10",
        ]);
        match cli.command {
            Command::Process {
                action: ProcessCommand::Add { number, subject, base, .. },
            } => {
                assert_eq!(number, "100/2024");
                assert_eq!(subject, ProcessSubject::Averbacao);
                assert_eq!(base.opened, NaiveDate::from_ymd_opt(2024, 1, 10));
                assert_eq!(base.note, "");
            }
            _ => panic!("expected process add"),
        }
    }

    #[test]
    fn cli_rejects_bad_dates_and_subjects() {
        assert!(
            Cli::try_parse_from(["protocolo", "staff", "add", "X", "--sector", "A", "--entry", "10/01/2024"])
                .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "protocolo", "process", "add", "1", "--requester", "R", "--subject", "NADA",
                "--sector", "A", "--responsible", "B",
            ])
            .is_err()
        );
    }

    #[test]
    fn cli_parses_document_status() {
        let cli = Cli::parse_from([
            "protocolo",
            "document",
            "status",
            "100/2024",
            "concluded",
            "--conclusion",
            "2024-02-01",
        ]);
        match cli.command {
            Command::Document {
                action: DocumentCommand::Status { reference, status, conclusion },
            } => {
                assert_eq!(reference, "100/2024");
                assert_eq!(DocumentStatus::from(status), DocumentStatus::Concluded);
                assert_eq!(conclusion, NaiveDate::from_ymd_opt(2024, 2, 1));
            }
            _ => panic!("expected document status"),
        }
    }

    #[test]
    fn cli_parses_kind_and_common_updates() {
        let cli = Cli::parse_from(["protocolo", "letter", "update", "OF-1", "--deadline", "5"]);
        match cli.command {
            Command::Letter {
                action: LetterCommand::Update { reference, number, deadline, .. },
            } => {
                assert_eq!(reference, "OF-1");
                assert_eq!(number, None);
                assert_eq!(deadline, Some(5));
            }
            _ => panic!("expected letter update"),
        }

        let cli = Cli::parse_from([
            "protocolo", "document", "update", "OF-1", "--sector", "GAB", "--clear-conclusion",
        ]);
        match cli.command {
            Command::Document {
                action: DocumentCommand::Update { sector, clear_conclusion, opened, .. },
            } => {
                assert_eq!(sector.as_deref(), Some("GAB"));
                assert!(clear_conclusion);
                assert_eq!(opened, None);
            }
            _ => panic!("expected document update"),
        }
    }

    #[test]
    fn only_queries_are_read_only() {
        let read_only = |args: &[&str]| {
            Cli::parse_from(std::iter::once("protocolo").chain(args.iter().copied()))
                .command
                .is_read_only()
        };
        assert!(read_only(&["user", "list"]));
        assert!(read_only(&["process", "subjects"]));
        assert!(read_only(&["document", "show", "1"]));
        assert!(read_only(&["route", "list", "--pending"]));
        assert!(!read_only(&["user", "add", "ana"]));
        assert!(!read_only(&["letter", "update", "OF-1", "--deadline", "3"]));
        assert!(!read_only(&["route", "receive", "abcd"]));
    }

    #[test]
    fn kind_maps_to_document_type() {
        assert_eq!(DocumentType::from(KindArg::Letter), DocumentType::OfficialLetter);
        assert_eq!(RouteCommand::received_filter(true), Some(Received::No));
        assert_eq!(RouteCommand::received_filter(false), None);
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
