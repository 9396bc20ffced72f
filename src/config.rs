//! Configuração do protocolo carregada a partir de `protocolo.toml`.
//!
//! A struct [`ProtocoloConfig`] contém os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis `PROTOCOLO_DATA` e `PROTOCOLO_USER` têm precedência sobre o arquivo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Nome do arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "protocolo.toml";

/// Configuração de nível superior carregada de `protocolo.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocoloConfig {
    /// Arquivo JSON com todos os registros.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Usuário assumido quando `--user` não é informado.
    #[serde(default)]
    pub default_user: Option<String>,

    /// Nível de log padrão (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("protocolo.json")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ProtocoloConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            default_user: None,
            log_level: default_log_level(),
        }
    }
}

impl ProtocoloConfig {
    /// Carrega `protocolo.toml` do diretório atual e aplica as variáveis de ambiente.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;
        config.apply_env(
            std::env::var("PROTOCOLO_DATA").ok(),
            std::env::var("PROTOCOLO_USER").ok(),
        );
        Ok(config)
    }

    /// Lê um arquivo específico. Usa valores padrão se ele não existir.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("falha ao ler {}", path.display()))?;
        toml::from_str::<ProtocoloConfig>(&contents)
            .with_context(|| format!("configuração inválida em {}", path.display()))
    }

    // Valores vazios são ignorados.
    fn apply_env(&mut self, data: Option<String>, user: Option<String>) {
        if let Some(data) = data
            && !data.is_empty()
        {
            self.data_file = PathBuf::from(data);
        }
        if let Some(user) = user
            && !user.is_empty()
        {
            self.default_user = Some(user);
        }
    }
}
