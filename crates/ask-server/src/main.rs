//! Ask Anything server binary
//!
//! Starts the HTTP server for question answering.

use ask_server::{config::ServerConfig, start_server, ServerError};
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Credentials may come from a local .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using defaults");
        eprintln!("Usage: ask-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Ask Anything Server - Question answering over a knowledge base");
    println!();
    println!("USAGE:");
    println!("    ask-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    bind_address, bind_port    Listen address (default 127.0.0.1:8080)");
    println!("    [store]                    backend = \"sqlite\" | \"supabase\", path, url");
    println!("    [generator]                backend = \"hugging_face\" | \"chat_completion\" | \"ollama\" | \"local\"");
    println!("    [prompt]                   preamble, answer_cue, fallback_answer, [prompt.params]");
    println!("    [cors]                     allowed_origins (empty allows any origin)");
    println!();
    println!("ENVIRONMENT:");
    println!("    HUGGING_FACE_API_KEY, CHAT_COMPLETION_API_KEY");
    println!("    SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY");
    println!("    RUST_LOG (default: info)");
    println!();
}
