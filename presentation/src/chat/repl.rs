//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::chat::session::{ChatSession, ReplCommand};
use crate::config::ReplConfig;
use crate::{ProgressReporter, SimpleProgress};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use scholia_application::{LlmGateway, NoProgress, ProgressNotifier, ResearchAgent};
use std::sync::Arc;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// Interactive chat REPL
pub struct ChatRepl<G: LlmGateway + 'static> {
    agent: Arc<ResearchAgent<G>>,
    config: ReplConfig,
    plain_progress: bool,
}

impl<G: LlmGateway + 'static> ChatRepl<G> {
    pub fn new(agent: Arc<ResearchAgent<G>>, config: ReplConfig) -> Self {
        Self {
            agent,
            config,
            plain_progress: false,
        }
    }

    /// Print progress as plain lines instead of spinners
    pub fn with_plain_progress(mut self, plain: bool) -> Self {
        self.plain_progress = plain;
        self
    }

    fn line_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = self.config.history_path() else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Chat history unavailable: {}", e);
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> std::io::Result<()> {
        let mut editor = self.line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("scholia".to_string()),
            DefaultPromptSegment::Empty,
        );
        let mut session = ChatSession::new();

        self.print_welcome();

        loop {
            let line = match editor.read_line(&prompt)? {
                Signal::Success(line) => line,
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                _ => continue,
            };

            match ReplCommand::parse(&line) {
                ReplCommand::Empty => continue,
                ReplCommand::Quit => {
                    println!("Bye!");
                    break;
                }
                ReplCommand::Help => Self::print_help(),
                ReplCommand::Clear => {
                    session.clear();
                    println!("Conversation cleared.");
                }
                ReplCommand::Unknown(cmd) => {
                    println!("Unknown command: {}", cmd);
                    println!("Type /help for available commands");
                }
                ReplCommand::Ask(question) => self.process_question(&mut session, &question).await,
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              Scholia - Chat Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        let params = self.agent.params();
        println!(
            "Up to {} queries over {} iterations per question.",
            params.max_queries, params.max_iterations
        );
        Self::print_help();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?        - Show this help");
        println!("  /clear               - Start a new conversation");
        println!("  exit, quit, /quit    - Exit chat");
        println!();
    }

    async fn process_question(&self, session: &mut ChatSession, question: &str) {
        println!();
        session.push_user(question);

        let progress: Box<dyn ProgressNotifier> = match (self.config.show_progress, self.plain_progress) {
            (false, _) => Box::new(NoProgress),
            (true, true) => Box::new(SimpleProgress),
            (true, false) => Box::new(ProgressReporter::new()),
        };

        match self
            .agent
            .run_with_progress(session.messages(), progress.as_ref())
            .await
        {
            Ok(answer) => {
                println!("{} {}", "AI:".green().bold(), answer);
                session.push_assistant(&answer);
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                session.discard_pending_user();
            }
        }
        println!();
    }
}
