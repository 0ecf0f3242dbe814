pub mod logs;

pub use logs::{
    log_db_error, log_db_ready, log_init, log_seed_done, log_seed_start, print_leaderboard,
    print_summary,
};
