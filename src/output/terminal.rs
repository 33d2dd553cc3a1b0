// Colored terminal output for match statistics and the mention table.

use colored::Colorize;

use crate::matching::fuzzy::Partition;
use crate::matching::models::Strength;
use crate::mentions::dedup::CanonicalMention;
use crate::mentions::stats::{Level, MatchStats};

/// Display the raw vs. deduplicated counts and per-document bookkeeping.
pub fn display_stats(stats: &MatchStats) {
    println!("\n{}", "=== Match Counts ===".bold());
    println!();
    println!(
        "  {:<8} {:>8} {:>13} {:>8}",
        "Level".dimmed(),
        "Raw".dimmed(),
        "Deduplicated".dimmed(),
        "Lost".dimmed(),
    );
    println!("  {}", "-".repeat(40).dimmed());

    for row in &stats.levels {
        let lost = match row.percentage_lost {
            Some(p) => format!("{p:.1}%"),
            None => "n/a".to_string(),
        };
        let level = row.level.to_string();
        let level = match row.level {
            Level::All => level.bold(),
            Level::Tier(strength) => colorize_strength(&level, strength),
        };
        println!(
            "  {:<8} {:>8} {:>13} {:>8}",
            level, row.raw, row.deduplicated, lost
        );
    }

    let docs = &stats.documents;
    println!();
    println!(
        "  Documents: {} processed, {} with matches, {} without, {} empty",
        docs.processed, docs.with_matches, docs.without_matches, docs.empty
    );
    if docs.failed > 0 {
        println!("  {} {} documents failed", "!".red().bold(), docs.failed);
    }
    if docs.needing_broader_review > 0 || docs.flagged_candidates > 0 {
        println!(
            "  {} {} candidates flagged for secondary review, {} documents need broader review",
            "~".yellow(),
            docs.flagged_candidates,
            docs.needing_broader_review
        );
    }
}

/// Display the first `limit` rows of the canonical mention table.
pub fn display_mentions(mentions: &[CanonicalMention], limit: usize) {
    if mentions.is_empty() {
        println!("\nNo mentions found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Mentions ({} total) ===", mentions.len()).bold()
    );
    println!();

    for row in mentions.iter().take(limit) {
        let m = &row.mention;
        let review = if m.flag_for_secondary_review {
            " [review]".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:<16} #{:<4} {:<8} {}{}",
            m.work_id,
            m.section_id,
            colorize_strength(m.strength.as_str(), m.strength),
            m.tag.bold(),
            review,
        );
        println!("        {}", super::truncate_chars(&m.snippet, 120).dimmed());
    }

    if mentions.len() > limit {
        println!("\n  {}", format!("... and {} more", mentions.len() - limit).dimmed());
    }
}

/// Display a single similarity score and where it falls.
pub fn display_score(sentence: &str, surface_form: &str, score: Option<f64>, partition: Partition) {
    println!("\n{}", "=== Partial Ratio ===".bold());
    println!("  Sentence:     {}", super::truncate_chars(sentence, 120).dimmed());
    println!("  Surface form: {}", surface_form.bold());
    match score {
        Some(score) => println!("  Score:        {score:.2}"),
        None => println!("  Score:        {} (empty text, treated as 0)", "n/a".dimmed()),
    }
    let band = match partition {
        Partition::Band(strength) => colorize_strength(strength.as_str(), strength),
        Partition::Outside => "no band".dimmed(),
    };
    println!("  Band:         {band}");
}

fn colorize_strength(text: &str, strength: Strength) -> colored::ColoredString {
    match strength {
        Strength::Exact => text.green().bold(),
        Strength::Strong => text.bright_green(),
        Strength::Weak => text.yellow(),
        Strength::Mixed => text.dimmed(),
    }
}
