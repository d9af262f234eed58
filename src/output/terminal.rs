// Colored terminal output for sentiment cards and link lists.
//
// main.rs delegates all formatting here so the commands stay focused on
// wiring.

use colored::Colorize;

use crate::model::traits::Label;

/// Print a sentiment "card": the label as a colored banner, then the text.
pub fn display_card(text: &str, label: Label) {
    let banner = format!(" {label} Sentiment ");
    let banner = match label {
        Label::Positive => banner.white().on_green().bold(),
        Label::Negative => banner.white().on_red().bold(),
    };

    println!();
    println!("  {banner}");
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        println!("  {}", line.trim());
    }
    println!();
}

/// Print the link count and, optionally, the numbered list.
pub fn display_hyperlinks(links: &[String], show_all: bool) {
    println!(
        "{}",
        format!("Total hyperlinks found: {}", links.len()).green().bold()
    );

    if !show_all || links.is_empty() {
        return;
    }

    println!("\n{}", "Hyperlinks:".bold());
    let width = links.len().to_string().len();
    for (i, link) in links.iter().enumerate() {
        println!("  {:>width$}. {}", i + 1, link.cyan());
    }
}

/// Print a short failure diagnostic.
pub fn display_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
