use anyhow::Context;
use regulations_agent::{
    api::routes::create_router,
    cli::{
        init::{self, InitConfig, InitResult},
        output::Output,
        AgentCommands, Cli, Commands,
    },
    utils::{
        logging::init_tracing,
        toml_config::{AgentConfig, ConfigError, RegulationsConfig},
    },
    AgentRegistry, AppState, ProviderRegistry, ToolRegistry,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    let result = match cli.command {
        Some(Commands::Init {
            path,
            force,
            provider,
            host,
            port,
        }) => {
            let config = InitConfig {
                path,
                force,
                provider,
                host,
                port,
            };
            match init::run(config, &output) {
                InitResult::Success => Ok(()),
                InitResult::AlreadyExists => return ExitCode::from(1),
                InitResult::Error(e) => Err(anyhow::anyhow!(e)),
            }
        }
        Some(Commands::Config { full, validate }) => show_config(&cli.config, full, validate, &output),
        Some(Commands::Agent(cmd)) => show_agents(&cli.config, cmd, &output),
        Some(Commands::Serve) | None => serve(&cli.config, cli.verbose, &output).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path, output: &Output) -> anyhow::Result<RegulationsConfig> {
    let mut config = match RegulationsConfig::load(path) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(p)) => {
            output.hint("Run `regulations-agent init` to create a default configuration");
            anyhow::bail!("Configuration file not found: {}", p.display());
        }
        Err(e) => return Err(e).context(format!("Failed to load {}", path.display())),
    };
    config.apply_env_overrides()?;
    Ok(config)
}

async fn serve(config_path: &Path, verbose: bool, output: &Output) -> anyhow::Result<()> {
    let config = load_config(config_path, output)?;
    init_tracing(&config.server, verbose)?;

    for warning in config.validate_with_warnings()? {
        tracing::warn!("{}", warning);
    }

    let provider_registry = Arc::new(ProviderRegistry::from_config(&config));
    let tool_registry = Arc::new(ToolRegistry::with_config(&config));
    let agents = AgentRegistry::from_config(&config, provider_registry, tool_registry)
        .build()
        .await
        .context("Failed to build agents")?;

    let state = AppState::new(agents, config.server.expose_error_details);
    let app = create_router(state, &config.cors)?;

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    output.banner();
    tracing::info!(
        addr = %addr,
        origins = ?config.cors.allowed_origins,
        expose_error_details = config.server.expose_error_details,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}

fn show_config(path: &Path, full: bool, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = load_config(path, output)?;

    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv("listen", &config.server.bind_addr());
    output.kv("log_level", &config.server.log_level);
    output.kv(
        "expose_error_details",
        &config.server.expose_error_details.to_string(),
    );

    output.subheader("CORS origins");
    for origin in &config.cors.allowed_origins {
        output.list_item(origin);
    }

    if full {
        output.subheader("Providers");
        for name in sorted(config.providers.keys()) {
            output.list_item(name);
        }
        output.subheader("Models");
        for name in sorted(config.models.keys()) {
            let model = &config.models[name];
            output.kv(name, &format!("{} ({})", model.model, model.provider));
        }
        output.subheader("Tools");
        for name in sorted(config.tools.keys()) {
            let state = if config.tools[name].enabled { "enabled" } else { "disabled" };
            output.kv(name, state);
        }
    }

    if validate {
        // load() already rejected invalid files
        let warnings = config.validate_with_warnings()?;
        output.newline();
        output.success("Configuration is valid");
        for warning in warnings {
            output.warning(&warning.to_string());
        }
    }

    Ok(())
}

fn show_agents(path: &Path, cmd: AgentCommands, output: &Output) -> anyhow::Result<()> {
    let config = load_config(path, output)?;

    match cmd {
        AgentCommands::List => {
            output.header("Agents");
            output.table_header(&["Agent", "Backend", "Model"]);
            for name in sorted(config.agents.keys()) {
                let agent = &config.agents[name];
                output.table_row(&[name.as_str(), agent.backend(), agent.model().unwrap_or("-")]);
            }
        }
        AgentCommands::Show { name } => {
            let agent = config
                .get_agent(&name)
                .with_context(|| format!("Agent '{}' is not configured", name))?;

            output.header(&format!("Agent: {}", name));
            output.kv("backend", agent.backend());
            match agent {
                AgentConfig::Llm {
                    model,
                    system_prompt,
                    max_tool_iterations,
                    ..
                } => {
                    output.kv("model", model);
                    output.kv("max_tool_iterations", &max_tool_iterations.to_string());
                    output.kv("tools", &config.agent_tools(&name).join(", "));
                    if let Some(prompt) = system_prompt {
                        output.kv("system_prompt", prompt.trim());
                    }
                }
                AgentConfig::Remote {
                    url,
                    api_key_env,
                    timeout_secs,
                } => {
                    output.kv("url", url);
                    output.kv("api_key_env", api_key_env.as_deref().unwrap_or("-"));
                    output.kv(
                        "timeout_secs",
                        &timeout_secs.map_or("none".to_string(), |t| t.to_string()),
                    );
                }
                AgentConfig::Manager {
                    model,
                    system_prompt,
                } => {
                    output.kv("model", model);
                    output.kv("coordinates", "web, db");
                    if let Some(prompt) = system_prompt {
                        output.kv("system_prompt", prompt.trim());
                    }
                }
            }
        }
    }

    Ok(())
}

fn sorted<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a String> {
    let mut keys: Vec<_> = keys.collect();
    keys.sort();
    keys
}
