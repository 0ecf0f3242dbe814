pub mod breakdown;
pub mod engine;
pub mod locations;
pub mod summary;
pub mod trending;

pub use breakdown::{category_breakdown, hashtag_breakdown, percentage, round2};
pub use engine::AnalyticsEngine;
pub use locations::{engagement_score, location_stats};
pub use summary::{
    AnalyticsSummary, CategoryShare, HashtagShare, LeaderboardEntry, LocationStats,
    NationalTotals, Period,
};
pub use trending::post_leaderboard;
