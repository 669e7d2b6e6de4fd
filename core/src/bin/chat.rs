/// One-shot CLI for the chat backend - list peers, send a message
use colored::*;
use sidechat_core::dispatch::OutboundMessage;
use sidechat_core::ApiClient;
use std::env;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "http://localhost:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let bin = args
        .first()
        .map(|s| s.as_str())
        .unwrap_or("chat")
        .to_string();

    if args.len() < 2 {
        print_usage(&bin);
        return Ok(());
    }

    let api_url = env::var("SIDECHAT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let client = ApiClient::new(api_url, Duration::from_secs(10))?;

    match args[1].as_str() {
        "peers" => {
            list_peers(&client).await?;
        }
        "send" => {
            if args.len() < 5 {
                eprintln!(
                    "{}",
                    format!("Usage: {} send <user_id> <recipient_id> <message>", bin).yellow()
                );
                return Ok(());
            }
            let sender_id = args[2].clone();
            let recipient_id = args[3].clone();
            let body = args[4..].join(" ");
            send_message(&client, sender_id, recipient_id, body).await?;
        }
        other => {
            eprintln!("{} Unknown command: {}", "✗".red().bold(), other.red());
            print_usage(&bin);
        }
    }

    Ok(())
}

fn print_usage(bin: &str) {
    println!("{}", "💬 Sidechat CLI".bright_cyan().bold());
    println!();
    println!("{}", "Usage:".bright_white().bold());
    println!("  {} <command> [args]", bin.cyan());
    println!();
    println!("{}", "Commands:".bright_white().bold());
    println!(
        "  {}                                List chat peers",
        "peers".cyan()
    );
    println!(
        "  {} <user_id> <recipient_id> <message>  Send one message",
        "send".cyan()
    );
    println!();
    println!(
        "  Backend URL comes from {} (default {})",
        "SIDECHAT_API_URL".yellow(),
        DEFAULT_API_URL
    );
}

async fn list_peers(client: &ApiClient) -> anyhow::Result<()> {
    let peers = client
        .list_users()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list peers: {}", e))?;

    if peers.is_empty() {
        println!("{}", "No users available".dimmed());
        return Ok(());
    }

    println!("{}", format!("{} peer(s):", peers.len()).bright_white().bold());
    for peer in peers {
        println!(
            "  {} {}  {}",
            format!("({})", peer.avatar_initial()).cyan(),
            peer.username.bright_white(),
            peer.id.dimmed()
        );
    }
    Ok(())
}

async fn send_message(
    client: &ApiClient,
    sender_id: String,
    recipient_id: String,
    body: String,
) -> anyhow::Result<()> {
    let msg = OutboundMessage {
        sender_id,
        recipient_id,
        body,
    };
    client
        .send_message(&msg)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

    println!("{} Message sent to {}", "✓".green(), msg.recipient_id.cyan());
    Ok(())
}
