//! Interactive chat client for retrieval-augmented chat services.
//!
//! This binary provides a REPL for chatting with a service that answers
//! questions from a document collection, optionally showing the documents
//! each answer was based on.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a service on localhost:8080
//! ragchat
//!
//! # Point at another endpoint
//! ragchat --url http://10.0.0.2:8080/api/v2/chat
//!
//! # Start in diagnostic mode with custom retrieval parameters
//! ragchat --diagnostic --top-k 5 --threshold 0.3
//!
//! # Read settings from a YAML file
//! ragchat --config ragchat.yaml
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Reset the conversation
//! - `/diagnostic on|off` - Toggle diagnostic mode
//! - `/docs` - Show retrieved documents
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use ragchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, FOOTER_NOTICE, PlainTextRenderer, Renderer,
    describe_mode, help_text, parse_command,
};
use ragchat::{HttpChatClient, StderrLogger};

/// Main entry point for the ragchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("ragchat [OPTIONS]");
    let config = ChatConfig::try_from(args)?;
    let use_color = config.use_color;

    let mut client = HttpChatClient::with_options(&config.url, config.timeout)?;
    if config.verbose {
        client = client.with_logger(Arc::new(StderrLogger));
    }
    let mut session = ChatSession::with_config(client, &config);
    session.subscribe(Box::new(PlainTextRenderer::with_color(use_color)));
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Requests cannot be cancelled; Ctrl+C while waiting only gets noted.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("USV Chatbot ({})", config.url);
    println!("{}", describe_mode(session.diagnostics(), use_color));
    println!("Type /help for commands, /quit to exit");
    println!("{FOOTER_NOTICE}\n");
    renderer.print_message(session.log().last());

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line.as_str());

                if let Some(cmd) = parse_command(&line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Diagnostic(enabled) => {
                            session.set_diagnostic_mode(enabled);
                            renderer.print_info(&describe_mode(session.diagnostics(), use_color));
                        }
                        ChatCommand::TopK(value) => match session.set_result_count(value) {
                            Ok(()) => renderer.print_info(&format!("topK set to {value}")),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Threshold(value) => {
                            match session.set_relevance_threshold(value) {
                                Ok(()) => {
                                    renderer.print_info(&format!("threshold set to {value:.2}"))
                                }
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Expand(id) => {
                            if session.evidence().iter().any(|doc| doc.id == id) {
                                session.toggle_expansion(&id);
                                renderer.print_evidence(session.diagnostics());
                            } else {
                                renderer
                                    .print_error(&format!("No retrieved document with id {id}"));
                            }
                        }
                        ChatCommand::Documents => {
                            if !session.diagnostic_mode() {
                                renderer.print_info("Diagnostic mode is off.");
                            } else if session.evidence().is_empty() {
                                renderer.print_info("No documents retrieved.");
                            } else {
                                renderer.print_evidence(session.diagnostics());
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&config, &session);
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the service
                interrupted.store(false, Ordering::Relaxed);
                session.set_input(line);
                if session.submit() {
                    renderer.print_pending();
                    session.settle().await;
                    renderer.print_evidence(session.diagnostics());
                    if interrupted.load(Ordering::Relaxed) {
                        renderer.print_info("(requests cannot be cancelled; waited for the reply)");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession<HttpChatClient>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Requests: {} ({} failed)",
        stats.total_requests, stats.failed_requests
    );
    println!(
        "      Diagnostic mode: {}",
        if stats.diagnostic_mode { "on" } else { "off" }
    );
    println!("      Retrieved documents: {}", stats.evidence_count);
    match stats.expanded_document_id {
        Some(ref id) => println!("      Expanded document: {id}"),
        None => println!("      Expanded document: (none)"),
    }
}

fn print_config(config: &ChatConfig, session: &ChatSession<HttpChatClient>) {
    let tuning = session.tuning_parameters();
    println!("    Current Configuration:");
    println!("      Endpoint: {}", config.url);
    println!(
        "      Diagnostic mode: {}",
        if session.diagnostic_mode() { "on" } else { "off" }
    );
    println!("      topK: {}", tuning.result_count());
    println!("      Threshold: {:.2}", tuning.relevance_threshold());
    match config.timeout {
        Some(timeout) => println!("      Timeout: {}s", timeout.as_secs()),
        None => println!("      Timeout: (none)"),
    }
}
