//! REPL mode for interactive translation.

use colored::*;
use serde::Serialize;
use std::path::Path;

use crate::translator::Translator;

/// One translated line of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub input: String,
    pub output: String,
}

/// What a REPL line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Exit,
    Help,
    Clear,
    History,
    Schema,
    Translate(&'a str),
}

impl<'a> ReplCommand<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            ".exit" | ".quit" | "exit" | "quit" => ReplCommand::Exit,
            ".help" | "help" => ReplCommand::Help,
            ".clear" | "clear" => ReplCommand::Clear,
            ".history" => ReplCommand::History,
            ".schema" => ReplCommand::Schema,
            other => ReplCommand::Translate(other),
        }
    }
}

/// Translations made during one REPL session, oldest first.
#[derive(Debug)]
pub struct Session<'a> {
    translator: &'a Translator,
    history: Vec<HistoryEntry>,
}

impl<'a> Session<'a> {
    pub fn new(translator: &'a Translator) -> Self {
        Self {
            translator,
            history: Vec::new(),
        }
    }

    /// Translate `input` and remember the pair.
    pub fn translate(&mut self, input: &str) -> &str {
        let output = self.translator.translate(input);
        self.history.push(HistoryEntry {
            input: input.to_string(),
            output,
        });
        &self.history[self.history.len() - 1].output
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

/// Run the interactive REPL mode.
pub fn run_repl(translator: &Translator, history_path: Option<&Path>) {
    use rustyline::DefaultEditor;
    use rustyline::error::ReadlineError;

    println!("{}", "textsql REPL - Interactive Mode".cyan().bold());
    println!("{}", "Type a sentence to see the generated SQL. Commands:".dimmed());
    println!("  {}    - Exit the REPL", ".exit".yellow());
    println!("  {}    - Show help", ".help".yellow());
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{} {}", "Failed to initialize REPL:".red(), e);
            return;
        }
    };

    if let Some(path) = history_path {
        let _ = rl.load_history(path);
    }

    let mut session = Session::new(translator);

    loop {
        let prompt = "textsql> ".cyan().bold().to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match ReplCommand::parse(line) {
                    ReplCommand::Exit => {
                        println!("{}", "Goodbye!".green());
                        break;
                    }
                    ReplCommand::Help => show_repl_help(),
                    ReplCommand::Clear => print!("\x1B[2J\x1B[1;1H"),
                    ReplCommand::History => show_history(session.history()),
                    ReplCommand::Schema => show_schema(translator),
                    ReplCommand::Translate(text) => {
                        let output = session.translate(text);
                        if output.ends_with(';') {
                            println!("{} {}", "→".green(), output.white().bold());
                        } else {
                            println!("{} {}", "✗".red(), output.yellow());
                        }
                        println!();
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{} {:?}", "Error:".red(), err);
                break;
            }
        }
    }

    if let Some(path) = history_path {
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Could not save REPL history to {}: {}", path.display(), e);
        }
    }
}

/// Show REPL help information.
pub fn show_repl_help() {
    println!("{}", "textsql REPL Commands:".cyan().bold());
    println!("  {}     - Exit the REPL", ".exit".yellow());
    println!("  {}     - Show this help", ".help".yellow());
    println!("  {}    - Clear screen", ".clear".yellow());
    println!("  {}  - List this session's translations", ".history".yellow());
    println!("  {}   - Show tables and foreign keys", ".schema".yellow());
    println!();
    println!("{}", "Examples:".cyan().bold());
    println!("  show all students");
    println!("  get name and age of students");
    println!("  orders where amount > 2000 and status = pending");
    println!("  list products where price between 100 and 500");
    println!();
}

/// Print the session's (input, output) pairs.
pub fn show_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("{}", "(no translations yet)".dimmed());
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        println!("{:>3}. {}", i + 1, entry.input.yellow());
        println!("     {}", entry.output.white());
    }
}

/// Print the translator's tables and foreign keys.
pub fn show_schema(translator: &Translator) {
    let schema = translator.schema();
    println!("{}", "Tables:".cyan().bold());
    for table in schema.tables() {
        println!("  {} ({})", table.name.white().bold(), table.columns.join(", ").dimmed());
    }
    if !schema.foreign_keys().is_empty() {
        println!("{}", "Foreign keys:".cyan().bold());
        for fk in schema.foreign_keys() {
            println!(
                "  {}.{} → {}.{}",
                fk.table, fk.column, fk.references_table, fk.references_column
            );
        }
    }
    println!(
        "{} {}",
        "Date column:".dimmed(),
        translator.date_column().yellow()
    );
}
