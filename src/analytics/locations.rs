use super::breakdown::{category_breakdown, round2};
use super::summary::LocationStats;
use crate::db::{self, LocationLevel, WindowPost};
use crate::settings::settings;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;

/// Weighted engagement per post. Zero-post nodes score 0 through the
/// floored denominator rather than being filtered out.
pub fn engagement_score(posts: i64, comments: i64, reactions: i64, reposts: i64) -> f64 {
    let w = &settings().analytics.weights;
    let weighted = posts as f64 * w.post
        + comments as f64 * w.comment
        + reactions as f64 * w.reaction
        + reposts as f64 * w.repost;
    round2(weighted / posts.max(1) as f64)
}

fn level_key(level: LocationLevel, post: &WindowPost) -> &str {
    match level {
        LocationLevel::Cell => &post.cell_id,
        LocationLevel::Sector => &post.sector_id,
        LocationLevel::District => &post.district_id,
    }
}

/// Rollups for every node at one hierarchy level, ranked by engagement
/// score. Posts are restricted to the window; the comments, reactions and
/// reposts hanging off those posts are counted whenever they were created.
pub fn location_stats(
    conn: &mut SqliteConnection,
    level: LocationLevel,
    start: i64,
    end: i64,
) -> QueryResult<Vec<LocationStats>> {
    let s = settings();
    let nodes = db::load_locations(conn, level)?;
    let window = db::load_window_posts(conn, start, end)?;

    let post_ids: Vec<String> = window.iter().map(|p| p.id.clone()).collect();
    let comment_counts = db::comment_counts_by_post(conn, &post_ids)?;
    let reaction_counts = db::reaction_counts_by_post(conn, &post_ids)?;
    let repost_counts = db::repost_counts_by_post(conn, &post_ids)?;

    let mut posts_by_node: HashMap<&str, Vec<&WindowPost>> = HashMap::new();
    for post in &window {
        posts_by_node
            .entry(level_key(level, post))
            .or_default()
            .push(post);
    }

    let mut stats: Vec<LocationStats> = nodes
        .into_iter()
        .map(|(id, name)| {
            let node_posts = posts_by_node.get(id.as_str()).map_or(&[][..], Vec::as_slice);

            let total_posts = node_posts.len() as i64;
            let total_comments: i64 = node_posts
                .iter()
                .map(|p| comment_counts.get(&p.id).copied().unwrap_or(0))
                .sum();
            let total_reactions: i64 = node_posts
                .iter()
                .map(|p| reaction_counts.get(&p.id).copied().unwrap_or(0))
                .sum();
            let total_reposts: i64 = node_posts
                .iter()
                .map(|p| repost_counts.get(&p.id).copied().unwrap_or(0))
                .sum();

            let mut top_categories =
                category_breakdown(node_posts.iter().map(|p| p.category.as_str()));
            top_categories.truncate(s.analytics.location_top_categories);

            LocationStats {
                id,
                name,
                total_posts,
                total_comments,
                total_reactions,
                total_reposts,
                total_engagement: total_posts + total_comments + total_reactions + total_reposts,
                engagement_score: engagement_score(
                    total_posts,
                    total_comments,
                    total_reactions,
                    total_reposts,
                ),
                top_categories,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.engagement_score
            .partial_cmp(&a.engagement_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_single_bare_post_is_one() {
        assert_eq!(engagement_score(1, 0, 0, 0), 1.0);
    }

    #[test]
    fn test_score_weighted_average() {
        // 2*1 + 2*2 + 1*1 + 1*3 = 10 over 2 posts
        assert_eq!(engagement_score(2, 2, 1, 1), 5.0);
    }

    #[test]
    fn test_score_zero_posts_is_zero() {
        assert_eq!(engagement_score(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_score_engagement_without_posts_still_divides_by_one() {
        // Degenerate but reachable if nested rows outlive their window.
        assert_eq!(engagement_score(0, 1, 0, 0), 2.0);
    }

    #[test]
    fn test_score_rounds_to_two_decimals() {
        // 3*1 + 1*2 + 0 + 0 = 5 over 3 posts = 1.666...
        assert_eq!(engagement_score(3, 1, 0, 0), 1.67);
    }
}
