//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction that allows
//! for different output styles. The default implementation uses ANSI
//! escape codes to set user and bot turns apart and to highlight
//! evidence that meets the relevance threshold.

use std::io::{self, Stdout, Write};

use crate::chat::diagnostics::Diagnostics;
use crate::chat::log::LogObserver;
use crate::types::{Message, RetrievedDocument};

/// ANSI escape code for dim text (used for metadata and low scores).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for headings).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for bot turns).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for diagnostic mode).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for scores above threshold).
const ANSI_GREEN: &str = "\x1b[32m";

/// Disclaimer printed under the conversation.
pub const FOOTER_NOTICE: &str = "AI poate face greseli. Verifica informatiile importante.";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
pub trait Renderer: Send {
    /// Print one conversation entry.
    fn print_message(&mut self, message: &Message);

    /// Show that a reply is on its way.
    fn print_pending(&mut self);

    /// Print the evidence panel for the latest answer.
    fn print_evidence(&mut self, diagnostics: &Diagnostics);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
///
/// Writes to stdout unless constructed with [`PlainTextRenderer::to_writer`].
/// User turns are not echoed by default because the line editor already
/// shows what the user typed.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    echo_user: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::to_writer(io::stdout(), use_color)
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn to_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            echo_user: false,
        }
    }

    /// Also print the user's own messages.
    pub fn echo_user(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    /// Consumes the renderer and returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn style(&self, code: &'static str) -> &'static str {
        if self.use_color { code } else { "" }
    }

    fn reset(&self) -> &'static str {
        self.style(ANSI_RESET)
    }

    fn write_document(&mut self, document: &RetrievedDocument, diagnostics: &Diagnostics) {
        let expanded = diagnostics.expanded_document_id() == Some(document.id.as_str());
        let marker = if expanded { "-" } else { "+" };
        let score_style = if diagnostics.is_above_threshold(document) {
            self.style(ANSI_GREEN)
        } else {
            self.style(ANSI_DIM)
        };
        let reset = self.reset();
        let ellipsis = if document.preview().len() < document.text.len() {
            "..."
        } else {
            ""
        };
        let _ = writeln!(
            self.out,
            "  {marker} [{}] {}{ellipsis}  {score_style}Score: {:.2}{reset}",
            document.id,
            document.preview(),
            document.score,
        );
        if expanded {
            let dim = self.style(ANSI_DIM);
            let _ = writeln!(self.out, "      Full Content:");
            for line in document.text.lines() {
                let _ = writeln!(self.out, "        {line}");
            }
            let _ = writeln!(self.out, "      Metadata:");
            let _ = writeln!(
                self.out,
                "        {dim}Source:{reset} {}",
                document.metadata.source
            );
            let _ = writeln!(
                self.out,
                "        {dim}Distance:{reset} {:.4}",
                document.metadata.distance
            );
            let _ = writeln!(self.out, "        {dim}ID:{reset} {}", document.id);
        }
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_message(&mut self, message: &Message) {
        let reset = self.reset();
        if message.is_user {
            let _ = writeln!(self.out, "You: {}", message.text);
        } else {
            let cyan = self.style(ANSI_CYAN);
            let _ = writeln!(self.out, "{cyan}Bot:{reset} {}", message.text);
        }
        let _ = self.out.flush();
    }

    fn print_pending(&mut self) {
        let dim = self.style(ANSI_DIM);
        let reset = self.reset();
        let _ = writeln!(self.out, "{dim}Bot: ...{reset}");
        let _ = self.out.flush();
    }

    fn print_evidence(&mut self, diagnostics: &Diagnostics) {
        let Some(documents) = diagnostics.visible_evidence() else {
            return;
        };
        let bold = self.style(ANSI_BOLD);
        let reset = self.reset();
        let _ = writeln!(self.out, "{bold}Retrieved Documents{reset}");
        for document in documents {
            self.write_document(document, diagnostics);
        }
        let _ = self.out.flush();
    }

    fn print_error(&mut self, error: &str) {
        let _ = self.out.flush();
        eprintln!("Error: {error}");
    }

    fn print_info(&mut self, info: &str) {
        let _ = writeln!(self.out, "{info}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> LogObserver for PlainTextRenderer<W> {
    fn on_append(&mut self, _: usize, message: &Message) {
        if message.is_user && !self.echo_user {
            return;
        }
        self.print_message(message);
    }

    fn on_reset(&mut self, greeting: &Message) {
        self.print_info("Conversation cleared.");
        self.print_message(greeting);
    }
}

/// Describes the diagnostic mode state for a status line.
pub fn describe_mode(diagnostics: &Diagnostics, use_color: bool) -> String {
    if diagnostics.is_enabled() {
        let tuning = diagnostics.tuning();
        let (on, off) = if use_color {
            (ANSI_YELLOW, ANSI_RESET)
        } else {
            ("", "")
        };
        format!(
            "{on}Diagnostic Mode: ON{off} (topK {}, threshold {:.2})",
            tuning.result_count(),
            tuning.relevance_threshold()
        )
    } else {
        "Diagnostic Mode: OFF".to_string()
    }
}
