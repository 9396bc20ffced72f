//! Inicialização do `tracing` para a CLI.
//!
//! Os logs vão para stderr, deixando stdout livre para tabelas e detalhes.
//! `RUST_LOG` continua valendo por cima do nível configurado.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Nível efetivo: `--verbose` força `debug`, senão vale o do arquivo de configuração.
pub fn level(verbose: bool, configured: &str) -> Result<LevelFilter> {
    if verbose {
        return Ok(LevelFilter::DEBUG);
    }
    configured
        .parse::<LevelFilter>()
        .with_context(|| format!("nível de log inválido: \"{configured}\""))
}

/// Instala o subscriber global. Falha se outro já estiver instalado.
pub fn init(verbose: bool, configured: &str) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level(verbose, configured)?.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("falha ao iniciar o log: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_wins_over_config() {
        assert_eq!(level(true, "warn").unwrap(), LevelFilter::DEBUG);
        assert_eq!(level(false, "warn").unwrap(), LevelFilter::WARN);
        assert_eq!(level(false, "INFO").unwrap(), LevelFilter::INFO);
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(level(false, "barulhento").is_err());
    }
}
