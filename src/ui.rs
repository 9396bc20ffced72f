//! Interface de terminal do protocolo: tabelas, detalhes e progresso.
//!
//! Usa `console` para estilos e alinhamento por largura visível e `indicatif`
//! para a barra de progresso da importação. Tudo que é resultado vai para
//! stdout; erros vão para stderr.

use chrono::{DateTime, Local, NaiveDate, Utc};
use console::{Alignment, Style, measure_text_width, pad_str};
use indicatif::{ProgressBar, ProgressStyle};

use crate::import::ImportSummary;
use crate::model::{
    Document, DocumentKind, ProcessSubject, Record, RecordId, RoutingEntry, Sector, Staff, User,
};
use crate::store::Registry;

const EMPTY: &str = "-";

fn header_style() -> Style {
    Style::new().cyan().bold()
}

fn date(value: NaiveDate) -> String {
    value.format("%d/%m/%Y").to_string()
}

fn optional_date(value: Option<NaiveDate>) -> String {
    value.map(date).unwrap_or_else(|| EMPTY.to_string())
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}

fn yes_no(value: bool) -> &'static str {
    if value { "Sim" } else { "Não" }
}

fn sector_code(registry: &Registry, id: RecordId) -> String {
    registry
        .sector(id)
        .map(|row| row.data.code.clone())
        .unwrap_or_else(|_| EMPTY.to_string())
}

fn staff_name(registry: &Registry, id: RecordId) -> String {
    registry
        .staff_member(id)
        .map(|row| row.data.name.clone())
        .unwrap_or_else(|_| EMPTY.to_string())
}

fn document_label(registry: &Registry, id: RecordId) -> String {
    registry
        .document(id)
        .map(|row| row.data.to_string())
        .unwrap_or_else(|_| EMPTY.to_string())
}

/// Imprime uma tabela alinhada pela largura visível de cada célula.
fn table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("{}", Style::new().dim().apply_to("Nenhum registro encontrado."));
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let line = |cells: Vec<String>| cells.join("  ").trim_end().to_string();

    let style = header_style();
    println!(
        "{}",
        line(
            headers
                .iter()
                .zip(&widths)
                .map(|(h, w)| style.apply_to(pad_str(h, *w, Alignment::Left, None)).to_string())
                .collect()
        )
    );
    for row in rows {
        println!(
            "{}",
            line(
                row.iter()
                    .zip(&widths)
                    .map(|(cell, w)| pad_str(cell, *w, Alignment::Left, None).into_owned())
                    .collect()
            )
        );
    }
    println!(
        "{}",
        Style::new().dim().apply_to(format!("{} registro(s)", rows.len()))
    );
}

pub fn print_users(rows: &[&Record<User>]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.data.username.clone(),
                row.data.display_name(),
                yes_no(row.data.active).to_string(),
            ]
        })
        .collect();
    table(&["Usuário", "Nome", "Ativo"], &rows);
}

pub fn print_sectors(registry: &Registry, rows: &[&Record<Sector>]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.data.code.clone(),
                registry.creator_display(&row.audit),
                timestamp(row.audit.created_at),
            ]
        })
        .collect();
    table(&["Sigla", "Cadastrado por", "Cadastrado em"], &rows);
}

pub fn print_staff(registry: &Registry, rows: &[&Record<Staff>]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.data.name.clone(),
                sector_code(registry, row.data.sector),
                date(row.data.entry_date),
                optional_date(row.data.exit_date),
                yes_no(row.data.active).to_string(),
                registry.creator_display(&row.audit),
            ]
        })
        .collect();
    table(
        &["Nome", "Setor", "Entrada", "Saída", "Ativo", "Cadastrado por"],
        &rows,
    );
}

pub fn print_documents(registry: &Registry, rows: &[&Record<Document>]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let doc = &row.data;
            vec![
                row.id.short(),
                doc.doc_type().to_string(),
                doc.label().to_string(),
                doc.subject(),
                date(doc.base.opening_date),
                optional_date(doc.due_date()),
                doc.base.status.to_string(),
                sector_code(registry, doc.base.sector),
                staff_name(registry, doc.base.responsible),
                registry.creator_display(&row.audit),
            ]
        })
        .collect();
    table(
        &[
            "Id",
            "Espécie",
            "Identificação",
            "Assunto",
            "Cadastro",
            "Vencimento",
            "Situação",
            "Setor",
            "Responsável",
            "Cadastrado por",
        ],
        &rows,
    );
}

pub fn print_routing(registry: &Registry, rows: &[&Record<RoutingEntry>]) {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.id.short(),
                document_label(registry, row.data.document),
                row.data.from.clone().unwrap_or_else(|| EMPTY.to_string()),
                row.data.to.clone(),
                row.data.received.to_string(),
                timestamp(row.audit.created_at),
            ]
        })
        .collect();
    table(
        &["Id", "Documento", "De", "Para", "Recebido", "Data"],
        &rows,
    );
}

pub fn print_subjects() {
    let rows: Vec<Vec<String>> = ProcessSubject::ALL
        .iter()
        .map(|subject| vec![subject.code().to_string(), subject.label().to_string()])
        .collect();
    table(&["Código", "Assunto"], &rows);
}

/// Detalhe de um documento, seguido de suas tramitações.
pub fn print_document(registry: &Registry, row: &Record<Document>, routing: &[&Record<RoutingEntry>]) {
    let key = Style::new().bold();
    let field = |name: &str, value: String| {
        println!("{} {value}", key.apply_to(format!("{name}:")));
    };

    let doc = &row.data;
    println!("{}", header_style().apply_to(doc.to_string()));
    field("Id", row.id.to_string());

    match &doc.kind {
        DocumentKind::Process(p) => {
            field("Requerente", p.requester.clone());
            field("Tipo de assunto", p.subject.label().to_string());
        }
        DocumentKind::OfficialLetter(l) => {
            field("Assunto", l.subject.clone());
            field("Prazo", format!("{} dia(s)", l.deadline_days));
            field("Vencimento", optional_date(l.due_date));
        }
        DocumentKind::EmailRegistration(e) => {
            field("Remetente", e.sender.clone());
            field("E-mail", e.email.clone());
            field("Assunto", e.subject.clone());
        }
        DocumentKind::ServiceOrder(o) => {
            field("Assunto", o.subject.clone());
        }
    }

    field("Data de cadastro", date(doc.base.opening_date));
    field("Situação", doc.base.status.to_string());
    field("Data de conclusão", optional_date(doc.base.conclusion_date));
    field("Setor", sector_code(registry, doc.base.sector));
    field("Responsável", staff_name(registry, doc.base.responsible));
    if !doc.base.note.is_empty() {
        field("Observações", doc.base.note.clone());
    }
    if let Some(attachment) = &doc.base.attachment {
        field("Anexo", attachment.clone());
    }
    field("Cadastrado por", registry.creator_display(&row.audit));
    field("Cadastrado em", timestamp(row.audit.created_at));
    field("Modificado em", timestamp(row.audit.modified_at));

    println!();
    println!("{}", key.apply_to("Tramitações"));
    print_routing(registry, routing);
}

/// Mensagem de sucesso de uma operação de escrita.
pub fn success(message: &str) {
    println!("  {} {message}", Style::new().green().bold().apply_to("✓"));
}

pub fn error(message: &str) {
    eprintln!("  {} {message}", Style::new().red().bold().apply_to("✗"));
}

/// Barra de progresso da importação em lote.
pub struct ImportProgress {
    pb: ProgressBar,
}

impl ImportProgress {
    pub fn start(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { pb }
    }

    /// Avança um registro, mostrando o que acabou de ser gravado.
    pub fn record(&self, label: &str) {
        self.pb.set_message(label.to_string());
        self.pb.inc(1);
    }

    pub fn finish(&self, summary: &ImportSummary) {
        self.pb.finish_and_clear();
        success(&format!("Importados {summary}"));
    }

    /// Encerra a barra após uma falha; nada foi gravado.
    pub fn abandon(&self) {
        self.pb.abandon();
    }
}
