use console::{measure_text_width, Style};

use crate::analytics::{AnalyticsSummary, LeaderboardEntry, LocationStats};
use crate::seed::SeedReport;
use chrono::DateTime;

pub const TREE_BRANCH: char = '\u{251C}';
pub const TREE_END: char = '\u{2514}';
pub const TREE_HORIZ: char = '\u{2500}';
pub const TREE_VERT: char = '\u{2502}';

const TREE_PREFIX_WIDTH: usize = 4;
const VALUE_COLUMN: usize = 25;

fn tree_branch() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_BRANCH, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_end() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_END, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_indent() -> String {
    dim().apply_to(format!("{}   ", TREE_VERT)).to_string()
}

pub fn dim() -> Style {
    Style::new().dim()
}

fn blue() -> Style {
    Style::new().blue()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn bold() -> Style {
    Style::new().bold()
}

fn init_prefix() -> String {
    blue().apply_to("[INIT]").to_string()
}

fn seed_prefix() -> String {
    magenta().apply_to("[SEED]").to_string()
}

pub fn pad_label(label: &str, depth: usize) -> String {
    let prefix_width = depth * TREE_PREFIX_WIDTH;
    let target_width = VALUE_COLUMN.saturating_sub(prefix_width);
    let current_width = measure_text_width(label);
    if current_width < target_width {
        format!("{}{}", label, " ".repeat(target_width - current_width))
    } else {
        format!("{} ", label)
    }
}

fn format_ts(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn log_init(database_url: &str) {
    println!(
        "{} opening record store at {}...",
        init_prefix(),
        cyan().apply_to(database_url),
    );
}

pub fn log_db_ready() {
    println!("{} record store ready.", init_prefix());
}

pub fn log_db_error(error: &str) {
    println!("{} {}", red().apply_to("[DB]"), dim().apply_to(error));
}

pub fn log_seed_start() {
    println!("{} loading demo fixtures...", seed_prefix());
}

pub fn log_seed_done(report: &SeedReport) {
    println!(
        "{} seeded {} locations, {} posts, {} comments, {} reactions, {} reposts",
        seed_prefix(),
        bold().apply_to(report.locations),
        bold().apply_to(report.posts),
        bold().apply_to(report.comments),
        bold().apply_to(report.reactions),
        bold().apply_to(report.reposts),
    );
}

fn truncate_body(body: &str) -> String {
    let flat = body.replace('\n', " ");
    if flat.chars().count() > 48 {
        format!("{}...", flat.chars().take(45).collect::<String>())
    } else {
        flat
    }
}

fn print_location_section(title: &str, stats: &[LocationStats]) {
    println!("{}", bold().apply_to(title));
    if stats.is_empty() {
        println!("{}{}", tree_end(), dim().apply_to("none"));
        println!();
        return;
    }
    let count = stats.len();
    for (i, node) in stats.iter().enumerate() {
        let branch = if i == count - 1 {
            tree_end()
        } else {
            tree_branch()
        };
        let categories = node
            .top_categories
            .iter()
            .map(|c| c.category.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}{} score {} {}",
            branch,
            pad_label(&node.name, 1),
            bold().apply_to(format!("{:.2}", node.engagement_score)),
            dim().apply_to(format!(
                "({} posts, {} engagement{})",
                node.total_posts,
                node.total_engagement,
                if categories.is_empty() {
                    String::new()
                } else {
                    format!("; {categories}")
                }
            )),
        );
    }
    println!();
}

pub fn print_summary(summary: &AnalyticsSummary) {
    println!(
        "{} {} {} {}",
        magenta().apply_to(bold().apply_to("[ANALYTICS]")),
        cyan().apply_to(format_ts(summary.period.start_date)),
        dim().apply_to("to"),
        cyan().apply_to(format_ts(summary.period.end_date)),
    );
    println!();

    println!("{}", bold().apply_to("NATIONAL"));
    let n = &summary.national;
    for (label, value, last) in [
        ("posts", n.total_posts, false),
        ("comments", n.total_comments, false),
        ("reactions", n.total_reactions, false),
        ("reposts", n.total_reposts, false),
        ("engagement", n.total_engagement, true),
    ] {
        let branch = if last { tree_end() } else { tree_branch() };
        println!("{}{} {}", branch, pad_label(label, 1), bold().apply_to(value));
    }
    println!();

    println!("{}", bold().apply_to("CATEGORIES"));
    if summary.top_categories.is_empty() {
        println!("{}{}", tree_end(), dim().apply_to("none"));
    } else {
        let count = summary.top_categories.len();
        for (i, share) in summary.top_categories.iter().enumerate() {
            let branch = if i == count - 1 {
                tree_end()
            } else {
                tree_branch()
            };
            println!(
                "{}{} {} {}",
                branch,
                pad_label(&share.category, 1),
                bold().apply_to(share.count),
                dim().apply_to(format!("({}%)", share.percentage)),
            );
        }
    }
    println!();

    println!("{}", bold().apply_to("HASHTAGS"));
    if summary.top_hashtags.is_empty() {
        println!("{}{}", tree_end(), dim().apply_to("none"));
    } else {
        let count = summary.top_hashtags.len();
        for (i, share) in summary.top_hashtags.iter().enumerate() {
            let branch = if i == count - 1 {
                tree_end()
            } else {
                tree_branch()
            };
            println!(
                "{}{} {} {}",
                branch,
                pad_label(&share.hashtag, 1),
                bold().apply_to(share.count),
                dim().apply_to(format!("({}%)", share.percentage)),
            );
        }
    }
    println!();

    print_location_section("CELLS", &summary.cell_stats);
    print_location_section("SECTORS", &summary.sector_stats);
    print_location_section("DISTRICTS", &summary.district_stats);

    println!(
        "{} {}",
        dim().apply_to("last updated"),
        cyan().apply_to(format_ts(summary.last_updated)),
    );
}

pub fn print_leaderboard(entries: &[LeaderboardEntry]) {
    println!();
    println!("{}", bold().apply_to("TRENDING"));
    if entries.is_empty() {
        println!("{}{}", tree_end(), dim().apply_to("none"));
        return;
    }
    let count = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        let branch = if i == count - 1 {
            tree_end()
        } else {
            tree_branch()
        };
        println!(
            "{}{} \"{}\"",
            branch,
            pad_label(&format!("{:.1}", entry.engagement), 1),
            dim().apply_to(truncate_body(&entry.body)),
        );
        let detail = format!(
            "{} comments, {} reactions, {} reposts",
            entry.total_comments, entry.total_reactions, entry.total_reposts
        );
        let indent = if i == count - 1 {
            "    ".to_string()
        } else {
            tree_indent()
        };
        println!(
            "{}{}{}",
            indent,
            green().apply_to(format!("{} ", entry.category)),
            dim().apply_to(detail),
        );
    }
}
