use serde::Serialize;

/// The aggregation window, inclusive on both ends, unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start_date: i64,
    pub end_date: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NationalTotals {
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_reactions: i64,
    pub total_reposts: i64,
    pub total_engagement: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub count: i64,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashtagShare {
    pub hashtag: String,
    pub count: i64,
    pub percentage: u32,
}

/// Rollup for one cell, sector or district. Nodes with no posts in the
/// window still appear, with a zero score and no categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    pub id: String,
    pub name: String,
    pub total_posts: i64,
    pub total_comments: i64,
    pub total_reactions: i64,
    pub total_reposts: i64,
    pub total_engagement: i64,
    pub engagement_score: f64,
    pub top_categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub period: Period,
    pub national: NationalTotals,
    pub top_categories: Vec<CategoryShare>,
    pub top_hashtags: Vec<HashtagShare>,
    pub cell_stats: Vec<LocationStats>,
    pub sector_stats: Vec<LocationStats>,
    pub district_stats: Vec<LocationStats>,
    pub last_updated: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub author: String,
    pub body: String,
    pub category: String,
    pub total_comments: i64,
    pub total_reactions: i64,
    pub total_reposts: i64,
    pub engagement: f64,
}
