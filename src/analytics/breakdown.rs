use super::summary::{CategoryShare, HashtagShare};
use std::collections::HashMap;

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole-number percentage with a floored denominator, so an empty scope
/// reports 0 instead of dividing by zero.
pub fn percentage(count: i64, denominator: i64) -> u32 {
    (count as f64 / denominator.max(1) as f64 * 100.0).round() as u32
}

/// Counts occurrences preserving first-encounter order, so the stable sort
/// below keeps equal counts in the order they were first seen.
fn tally<'a>(items: impl IntoIterator<Item = &'a str>) -> (Vec<(String, i64)>, i64) {
    let mut counts: Vec<(String, i64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0i64;

    for item in items {
        total += 1;
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.to_string(), counts.len());
                counts.push((item.to_string(), 1));
            }
        }
    }

    (counts, total)
}

/// Ranked category shares over one category string per post. The percentage
/// denominator is the number of posts in scope. No truncation; every
/// category with at least one post appears.
pub fn category_breakdown<'a>(categories: impl IntoIterator<Item = &'a str>) -> Vec<CategoryShare> {
    let (mut counts, total) = tally(categories);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(category, count)| CategoryShare {
            percentage: percentage(count, total),
            category,
            count,
        })
        .collect()
}

/// Ranked hashtag shares over every tag occurrence in scope. Unlike
/// categories, the denominator is the total number of occurrences, not the
/// post count, and the list is cut to `limit`.
pub fn hashtag_breakdown<'a>(
    tags: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<HashtagShare> {
    let (mut counts, total) = tally(tags);
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
        .into_iter()
        .map(|(hashtag, count)| HashtagShare {
            percentage: percentage(count, total),
            hashtag,
            count,
        })
        .collect()
}
