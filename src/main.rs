//! Pill demo binary
//!
//! Tokenizes the given text, replays key actions against it and prints the
//! resulting buffer and token table.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use pill::cli::CliArgs;
use pill::pill::{PillController, TOKEN_PLACEHOLDER};
use pill::PillConfig;

/// One row of the token table
#[derive(Debug, Serialize)]
struct TokenRow {
    offset: usize,
    id: u64,
    content: String,
    selected: bool,
    /// Current fill as `#RRGGBB[AA]`
    fill: String,
}

/// Final state after replaying actions
#[derive(Debug, Serialize)]
struct Report {
    rendered: String,
    plain_text: String,
    selected_range: [usize; 2],
    selected_token: Option<u64>,
    tokens: Vec<TokenRow>,
}

impl Report {
    fn from_controller(controller: &PillController) -> Self {
        let buffer = controller.buffer();
        let range = controller.selected_range();
        Self {
            rendered: render_line(controller),
            plain_text: buffer.plain_text(0..buffer.len()),
            selected_range: [range.start, range.end],
            selected_token: controller.selected_token().map(|id| id.get()),
            tokens: buffer
                .iter_tokens()
                .map(|(offset, token)| TokenRow {
                    offset,
                    id: token.id().get(),
                    content: token.content_text().to_string(),
                    selected: token.is_selected(),
                    fill: token.fill_color().to_hex(),
                })
                .collect(),
        }
    }
}

/// Buffer text with tokens shown as `[content]`, or `[*content*]` when
/// selected.
fn render_line(controller: &PillController) -> String {
    let buffer = controller.buffer();
    let mut out = String::new();
    for (offset, ch) in buffer.text().chars().enumerate() {
        match buffer.token_at(offset) {
            Some(token) if token.is_selected() => {
                out.push_str(&format!("[*{}*]", token.content_text()));
            }
            Some(token) => out.push_str(&format!("[{}]", token.content_text())),
            None if ch == TOKEN_PLACEHOLDER => out.push('?'),
            None => out.push(ch),
        }
    }
    out
}

fn print_report(report: &Report) {
    println!("{}", report.rendered);
    println!(
        "selection: {}..{}",
        report.selected_range[0], report.selected_range[1]
    );
    if report.tokens.is_empty() {
        println!("no tokens");
        return;
    }
    println!(
        "{:>6}  {:>6}  {:<8}  {:<9}  content",
        "offset", "id", "selected", "fill"
    );
    for row in &report.tokens {
        println!(
            "{:>6}  {:>6}  {:<8}  {:<9}  {}",
            row.offset,
            row.id,
            if row.selected { "yes" } else { "" },
            row.fill,
            row.content
        );
    }
}

fn main() -> Result<()> {
    pill::tracing::init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => PillConfig::load_from(path),
        None => PillConfig::load(),
    };
    if let Some(pattern) = &args.pattern {
        config.pattern = pattern.clone();
    }
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }

    let mut controller = config
        .controller()
        .with_context(|| format!("Invalid delimiter pattern `{}`", config.pattern))?;
    controller.set_tokenized_text(&args.text);
    controller.set_selected_range(0..0);

    for action in args.pill_actions() {
        let editing = action.is_editing();
        let movement = action.is_movement();
        let result = controller.handle(action.clone());
        tracing::debug!(
            ?action,
            editing,
            movement,
            ?result,
            range = ?controller.selected_range(),
            "replayed action"
        );
    }

    let report = Report::from_controller(&controller);
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    Ok(())
}
