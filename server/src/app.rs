//! Core application

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands, split_pair};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::filters::{Conjunction, translate_all};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Translate { pairs, json, or }) => {
                let conjunction = if or { Conjunction::Or } else { Conjunction::And };
                let config = AppConfig::load(&cli_config)?;
                let output = Self::translate_pairs(&config, &pairs, json, conjunction)?;
                println!("{}", output);
                Ok(())
            }
            Some(Commands::Serve) | None => {
                let app = Self::init(&cli_config)?;
                Self::start_server(app).await
            }
        }
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Ok(Self {
            config,
            shutdown: ShutdownService::new(),
        })
    }

    /// Translate `KEY=VALUE` arguments under the configured policy
    fn translate_pairs(
        config: &AppConfig,
        args: &[String],
        json: bool,
        conjunction: Conjunction,
    ) -> Result<String> {
        let pairs = args
            .iter()
            .map(|arg| split_pair(arg).map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()?;

        let set = translate_all(pairs, &config.filters.policy())?;
        for rejection in &set.rejected {
            tracing::warn!(
                key = %rejection.key,
                value = %rejection.value,
                "Skipped filter: {}",
                rejection.error
            );
        }

        if json {
            let bytes = set
                .predicates
                .to_json_bytes()
                .context("Failed to serialize predicates")?;
            String::from_utf8(bytes).context("Predicates are not valid UTF-8")
        } else {
            Ok(set.predicates.join(conjunction))
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries command output
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        app.shutdown.install_signal_handlers();
        banner::print_banner(&app.config);

        let server = ApiServer::new(app);
        server.start().await
    }
}
