use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use mortgage_assist::config::BotConfig;
use mortgage_assist::dialog::DialogEngine;
use mortgage_assist::directory::{CustomerDirectory, InMemoryDirectory};
use mortgage_assist::flows;
use mortgage_assist::messages::{InboundEvent, OutboundMessage};
use mortgage_assist::offers::OfferEngine;
use mortgage_assist::session::InMemorySessionStore;
use mortgage_assist::turn::TurnHandler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Arc::new(BotConfig::default());
    let directory: Arc<dyn CustomerDirectory> = Arc::new(InMemoryDirectory::with_seed_data());
    let offers = Arc::new(OfferEngine::new(config.tiers.clone()));

    // Registry validation fails fast on any menu entry pointing at an
    // unregistered dialog.
    let registry = flows::build_registry(directory, offers, Arc::clone(&config))?;
    let handler = TurnHandler::new(
        DialogEngine::new(registry),
        Arc::new(InMemorySessionStore::new()),
    );

    let session_id = uuid::Uuid::new_v4().to_string();

    eprintln!("🏠 Mortgage Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Session: {session_id}");
    eprintln!("   Type a message and press Enter. /quit to exit.\n");

    // The local user joining opens the conversation.
    let opening = handler
        .handle_turn(
            &session_id,
            InboundEvent::MembersJoined {
                member_ids: vec!["local-user".into()],
                recipient_id: "mortgage-assist".into(),
            },
        )
        .await?;
    render(&opening);

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }
        if line == "/quit" {
            break;
        }

        match handler
            .handle_turn(&session_id, InboundEvent::Message { text: line })
            .await
        {
            Ok(replies) => render(&replies),
            Err(e) => {
                tracing::error!("turn failed: {e}");
                eprintln!("error: {e}");
            }
        }
    }

    Ok(())
}

fn render(messages: &[OutboundMessage]) {
    for message in messages {
        match message {
            OutboundMessage::Text { text } => println!("{text}\n"),
            OutboundMessage::Typing => eprintln!("⏳ ..."),
            OutboundMessage::ChoicePrompt {
                prompt, options, ..
            } => {
                println!("{prompt}");
                for (i, option) in options.iter().enumerate() {
                    println!("  {}. {option}", i + 1);
                }
            }
        }
    }
    eprint!("> ");
}
