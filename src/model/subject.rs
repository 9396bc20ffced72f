//! Tipos de assunto aceitos em processos administrativos.
//!
//! A lista é fechada: cada variante tem um código (gravado no arquivo de dados)
//! e um rótulo legível para exibição.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tipo de assunto desconhecido: \"{0}\" (use `protocolo process subjects` para ver a lista)")]
pub struct UnknownSubject(pub String);

macro_rules! process_subjects {
    ($($variant:ident => $code:literal, $label:literal;)+) => {
        /// Tipo de assunto de um processo.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ProcessSubject {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl ProcessSubject {
            /// Todos os assuntos, na ordem apresentada ao usuário.
            pub const ALL: &'static [ProcessSubject] = &[$(ProcessSubject::$variant,)+];

            pub fn code(self) -> &'static str {
                match self {
                    $(ProcessSubject::$variant => $code,)+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(ProcessSubject::$variant => $label,)+
                }
            }
        }
    };
}

process_subjects! {
    AberturaDeInscricaoImobiliariaAreaRural => "ABERTURA DE INSCRICAO IMOBILIARIA AREA RURAL", "Abertura de inscrição imobiliária área rural";
    AberturaDeMatricula => "ABERTURA DE MATRICULA", "Abertura de matrícula";
    AberturaInscricaoImobiliaria => "ABERTURA INSCRICAO IMOBILIARIA", "Abertura inscrição imobiliária";
    AquisicaoDeMaterialPermanente => "AQUISICAO DE MATERIAL PERMANENTE", "Aquisição de material permanente";
    AprovacaoDeProjetosArquitetonico => "APROVACAO DE PROJETOS ARQUITETONICO", "Aprovação de projetos arquitetônico";
    AutoDeInfracao => "AUTO DE INFRACAO", "Auto de infração";
    Averbacao => "AVERBACAO", "Averbação";
    AverbacaoExOficio => "AVERBACAO EX. OFICIO", "Averbação ex. ofício";
    BeneficioDoProdes => "BENEFICIO DO PRODES", "Benefício do Prodes";
    CancelamentoDeDebito => "CANCELAMENTO DE DEBITO", "Cancelamento de débito";
    Certidao => "CERTIDAO", "Certidão";
    CertidaoDeDemolicao => "CERTIDAO DE DEMOLICAO", "Certidão de demolição";
    CertidaoDeEdificacao => "CERTIDAO DE EDIFICACAO", "Certidão de edificação";
    CertidaoDeValorVenal => "CERTIDAO DE VALOR VENAL", "Certidão de valor venal";
    CertidaoEdificacaoLei13865 => "CERTIDAO EDIFICACAO – LEI 13.865/2019", "Certidão edificação – Lei 13.865/2019";
    ContratacaoDeServico => "CONTRATACAO DE SERVICO", "Contratação de serviço";
    DemandaDeSoftwaresDoSetor => "DEMANDA DE SOFTWARES DO SETOR", "Demanda de softwares do setor";
    Desafetacao => "DESAFETACAO", "Desafetação";
    Desapropriacao => "DESAPROPRIACAO", "Desapropriação";
    DesmRememDesdobroEAverbacao => "DESM/REMEM/DESDOBRO E AVERBACAO", "Desm/remem/desdobro e averbação";
    DoacaoDeArea => "DOACAO DE AREA", "Doação de área";
    DoacaoEmPagamento => "DOACAO EM PAGAMENTO", "Doação em pagamento";
    IsencaoDeIptu => "ISENCAO DE IPTU", "Isenção de IPTU";
    IsencaoDeItbiRural => "ISENCAO DE ITBI RURAL", "Isenção de ITBI rural";
    IsencaoDeItbiUrbano => "ISENCAO DE ITBI URBANO", "Isenção de ITBI urbano";
    Indenizacao => "INDENIZACAO", "Indenização";
    LevantamentoTopografico => "LEVANTAMENTO TOPOGRAFICO", "Levantamento topográfico";
    Loteamento => "LOTEAMENTO", "Loteamento";
    NotificacaoDeAutoDeInfracao => "NOTIFICACAO DE AUTO DE INFRACAO", "Notificação de auto de infração";
    OutroAssunto => "OUTRO ASSUNTO", "Outro assunto";
    Pareceres => "PARECERES", "Pareceres";
    ParecerImobiliario => "PARECER IMOBILIARIO", "Parecer imobiliário";
    Parcelamento => "PARCELAMENTO", "Parcelamento";
    Permuta => "PERMUTA", "Permuta";
    PermissaoDeUsoDeAreaPublica => "PERMISSAO DE USO DE AREA PUBLICA", "Permissão de uso de área pública";
    PrestacaoDeServicosDiversos => "PRESTACAO DE SERVICOS DIVERSOS", "Prestação de serviços diversos";
    ProcessoDeAposentadoriaEPensionista => "PROCESSO DE APOSENTADORIA E PENSIONISTA", "Processo de aposentadoria e pensionista";
    ProcessoDeDebito => "PROCESSO DE DEBITO", "Processo de débito";
    Regularizacao => "REGULARIZACAO", "Regularização";
    RegularizacaoFundiaria => "REGULARIZACAO FUNDIARIA", "Regularização fundiária";
    RemembramentoDesdobro => "REMEMBRAMENTO/DESDOBRO", "Remembramento/desdobro";
    RevisaoDeDadosCadastrais => "REVISAO DE DADOS CADASTRAIS", "Revisão de dados cadastrais";
    ReavaliacaoDeItbiRural => "REAVALIACAO DE ITBI RURAL", "Reavaliação de ITBI rural";
    ReavaliacaoDeItbiUrbano => "REAVALIACAO DE ITBI URBANO", "Reavaliação de ITBI urbano";
    SubstituicaoDeResponsTributario => "SUBSTITUICAO DE RESPONS TRIBUTARIO", "Substituição de respons tributário";
    SubstituicaoDeProjeto => "SUBSTITUICAO DE PROJETO", "Substituição de projeto";
    Verificacao => "VERIFICACAO", "Verificação";
    VerificacaoDeIptu => "VERIFICACAO DE IPTU", "Verificação de IPTU";
    VerificacaoDeIptuAbreviado => "VERIFICACAO DE I.P.T.U.", "Verificação de I.P.T.U.";
    Requerimento => "REQUERIMENTO", "Requerimento";
}

impl FromStr for ProcessSubject {
    type Err = UnknownSubject;

    /// Aceita o código (sem diferenciar maiúsculas, com `_` no lugar de espaços)
    /// ou o rótulo exato, também sem diferenciar maiúsculas.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let as_code = wanted.to_uppercase().replace('_', " ");
        let as_label = wanted.to_lowercase();

        Self::ALL
            .iter()
            .copied()
            .find(|subject| subject.code() == as_code || subject.label().to_lowercase() == as_label)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

impl fmt::Display for ProcessSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
