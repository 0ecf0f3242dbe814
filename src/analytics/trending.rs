use super::breakdown::round2;
use super::summary::LeaderboardEntry;
use crate::db;
use crate::settings::settings;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

/// In-window posts ranked by weighted nested engagement (comments ×2,
/// reactions ×1, reposts ×3). The post's own weight is a constant shift at
/// this granularity and is left out.
pub fn post_leaderboard(
    conn: &mut SqliteConnection,
    start: i64,
    end: i64,
    limit: usize,
) -> QueryResult<Vec<LeaderboardEntry>> {
    let w = &settings().analytics.weights;
    let headers = db::load_window_post_headers(conn, start, end)?;

    let post_ids: Vec<String> = headers.iter().map(|(id, ..)| id.clone()).collect();
    let comment_counts = db::comment_counts_by_post(conn, &post_ids)?;
    let reaction_counts = db::reaction_counts_by_post(conn, &post_ids)?;
    let repost_counts = db::repost_counts_by_post(conn, &post_ids)?;

    let mut entries: Vec<LeaderboardEntry> = headers
        .into_iter()
        .map(|(id, author, body, category)| {
            let total_comments = comment_counts.get(&id).copied().unwrap_or(0);
            let total_reactions = reaction_counts.get(&id).copied().unwrap_or(0);
            let total_reposts = repost_counts.get(&id).copied().unwrap_or(0);
            let engagement = round2(
                total_comments as f64 * w.comment
                    + total_reactions as f64 * w.reaction
                    + total_reposts as f64 * w.repost,
            );
            LeaderboardEntry {
                id,
                author,
                body,
                category,
                total_comments,
                total_reactions,
                total_reposts,
                engagement,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.engagement
            .partial_cmp(&a.engagement)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(limit);

    Ok(entries)
}
