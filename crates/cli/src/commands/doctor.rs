//! `gitteach doctor` — Diagnose config and backend connectivity.

use std::time::{Duration, Instant};

use gitteach_config::AppConfig;
use gitteach_core::completion::{CompletionClient, CompletionRequest};
use gitteach_providers::OpenAiCompatClient;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 GitTeach Doctor — System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                if config.tools.is_empty() {
                    println!("  ⚠️  No tools configured — everything will route to chat");
                    issues += 1;
                } else {
                    println!("  ✅ Catalog has {} tool(s)", config.tools.len());
                }
                if config.github.user.is_empty() {
                    println!("  ⚠️  github.user not set — repo tools need it");
                    issues += 1;
                }
                config
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                println!();
                println!("  ⚠️  1 issue found. Fix the config before continuing.");
                return Ok(());
            }
        }
    } else {
        println!("  ⚠️  No config file — run `gitteach onboard` (using defaults)");
        issues += 1;
        AppConfig::default()
    };

    // Live backend check: one short completion, timed.
    println!();
    println!(
        "  Contacting backend at {} (model {})...",
        config.backend.api_url, config.backend.model
    );

    let mut client =
        OpenAiCompatClient::new("doctor", &config.backend.api_url, &config.backend.model);
    if let Some(key) = &config.backend.api_key {
        client = client.with_api_key(key);
    }

    let request = CompletionRequest::new(
        "You are a connectivity probe. Reply with one short sentence.",
        "Hola, ¿quién eres?",
        0.7,
        Duration::from_secs(config.backend.request_timeout_secs),
    );

    let start = Instant::now();
    match client.complete(request).await {
        Ok(reply) => {
            let elapsed = start.elapsed();
            println!("  ✅ Backend reachable ({:.2}s)", elapsed.as_secs_f64());
            let preview: String = reply.chars().take(60).collect();
            println!("  ✅ Model replied: {preview}");
        }
        Err(e) => {
            println!("  ❌ Backend check failed: {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
