//! `gitteach agent` — Interactive or single-message mode.
//!
//! Builds the pipeline from config: the completion client, the tool catalog,
//! the GitHub toolbox executor, and the orchestrator. Chat turns are
//! upgraded here with a live conversational completion; the orchestrator
//! itself stays tool-only and returns its canned reply, which we keep as
//! the fallback if the live call fails.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use gitteach_agent::{IntentRouter, Orchestrator, ParameterConstructor, Responder};
use gitteach_config::AppConfig;
use gitteach_core::completion::{CompletionClient, CompletionRequest};
use gitteach_core::turn::{AgentTurn, RouteDecision};
use gitteach_providers::OpenAiCompatClient;
use gitteach_tools::GithubToolbox;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if config.tools.is_empty() {
        eprintln!();
        eprintln!("  WARNING: No tools configured — every request will route to chat.");
        eprintln!("  Run `gitteach onboard` to write a starter catalog.");
        eprintln!();
    }

    let pipeline = Pipeline::from_config(&config);

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = pipeline.turn(&msg).await;
        eprint!("\r             \r");
        println!("{reply}");
    } else {
        // Interactive mode
        println!();
        println!("  ╔══════════════════════════════════════════╗");
        println!("  ║       GitTeach — Interactive Mode        ║");
        println!("  ╚══════════════════════════════════════════╝");
        println!();
        println!("  Backend:  {}", config.backend.api_url);
        println!("  Model:    {}", config.backend.model);
        println!("  Tools:    {}", pipeline.catalog_ids().join(", "));
        println!();
        println!("  Type your message and press Enter.");
        println!("  Type 'exit' or Ctrl+C to quit.");
        println!();

        let stdin = std::io::stdin();
        print!("  You > ");
        std::io::stdout().flush()?;

        for line in stdin.lock().lines() {
            let line = line?;
            let input = line.trim();
            if input.is_empty() {
                print!("  You > ");
                std::io::stdout().flush()?;
                continue;
            }
            if input == "exit" {
                break;
            }

            eprint!("  ...");
            let reply = pipeline.turn(input).await;
            eprint!("\r     \r");

            println!();
            for line in reply.lines() {
                println!("  GitTeach > {line}");
            }
            println!();

            print!("  You > ");
            std::io::stdout().flush()?;
        }

        println!();
        println!("  Goodbye! 👋");
        println!();
    }

    Ok(())
}

/// The assembled pipeline plus what the chat path needs.
struct Pipeline {
    orchestrator: Orchestrator,
    client: Arc<dyn CompletionClient>,
    catalog: Arc<gitteach_core::catalog::ToolCatalog>,
    chat_temperature: f32,
    timeout: Duration,
}

impl Pipeline {
    fn from_config(config: &AppConfig) -> Self {
        let mut client =
            OpenAiCompatClient::new("openai_compat", &config.backend.api_url, &config.backend.model);
        if let Some(key) = &config.backend.api_key {
            client = client.with_api_key(key);
        }
        let client: Arc<dyn CompletionClient> = Arc::new(client);

        let catalog = Arc::new(config.tool_catalog());
        let executor = Arc::new(GithubToolbox::new(config.github.user.clone()));
        let timeout = Duration::from_secs(config.backend.request_timeout_secs);

        let orchestrator = Orchestrator::new(
            IntentRouter::new(client.clone(), catalog.clone(), timeout),
            ParameterConstructor::new(client.clone(), catalog.clone(), timeout),
            Responder::new(
                client.clone(),
                config.agent.responder_temperature,
                config.agent.max_reply_chars,
                timeout,
            ),
            executor,
        )
        .with_chat_reply(config.agent.chat_reply.clone());

        Self {
            orchestrator,
            client,
            catalog,
            chat_temperature: config.agent.responder_temperature,
            timeout,
        }
    }

    fn catalog_ids(&self) -> Vec<String> {
        self.catalog.ids().iter().map(|s| s.to_string()).collect()
    }

    /// Run one turn and render the outcome as a reply string.
    async fn turn(&self, input: &str) -> String {
        match self.orchestrator.run(input).await {
            Ok(turn) => self.render(turn, input).await,
            Err(failure) => format!("[{}] {}", failure.stage, failure.source),
        }
    }

    /// Upgrade chat turns with a live conversational reply; keep the
    /// orchestrator's canned message as the fallback.
    async fn render(&self, turn: AgentTurn, input: &str) -> String {
        let canned = turn
            .final_message
            .unwrap_or_else(|| "Done.".to_string());

        if turn.route != RouteDecision::Chat {
            return canned;
        }

        let request = CompletionRequest::new(
            "You are GitTeach, a friendly assistant for GitHub profile READMEs. \
             Reply conversationally and briefly. Do not mention internal tools.",
            input,
            self.chat_temperature,
            self.timeout,
        );
        match self.client.complete(request).await {
            Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
            _ => canned,
        }
    }
}
