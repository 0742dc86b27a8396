//! Ask a question and print the streamed answer.
//!
//! Reads `API_KEY` (and the other settings of `ClientConfig::from_env`)
//! from the environment or a `.env` file.
//!
//! ```bash
//! cargo run --example ask -- "What is the capital of France?"
//! cargo run --example ask -- --chat
//! ```

use chatstream::{ChatClient, ChatCompletion, Conversation, Error, RequestTemplate};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let client = ChatClient::from_env()?;
    let template = RequestTemplate::default();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("--chat") {
        return chat(&client, &template).await;
    }

    let question = args.join(" ");
    if question.trim().is_empty() {
        eprintln!("usage: ask <question> | ask --chat");
        std::process::exit(2);
    }

    let request = Conversation::new().request_for(question, &template)?;
    match client.complete(&request).await {
        Ok(answer) => println!("Response:\n{answer}"),
        Err(e) => report(&e),
    }
    Ok(())
}

/// Read questions from stdin, keeping the exchange history between them.
async fn chat(
    client: &ChatClient,
    template: &RequestTemplate,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut conversation = Conversation::new();
    let stdin = io::stdin();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let request = conversation.request_for(question, template)?;
        match client.complete(&request).await {
            Ok(answer) => {
                println!("{answer}");
                conversation.save(question, answer);
            }
            Err(e) => report(&e),
        }
    }
    Ok(())
}

fn report(error: &Error) {
    eprintln!("Error during API call: {error}");
}
