use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use std::env;
use std::process;
use umuganda::analytics::AnalyticsEngine;
use umuganda::db::{configure_connection, establish_pool, run_migrations};
use umuganda::settings::settings;
use umuganda::utils::{
    log_db_ready, log_init, log_seed_done, log_seed_start, print_leaderboard, print_summary,
};
use umuganda::seed;

const DAY: i64 = 86_400;

fn print_usage() {
    eprintln!("Usage: umuganda [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --seed               load deterministic demo fixtures");
    eprintln!("  --days <N>           aggregate the last N days (default 7)");
    eprintln!("  --from <YYYY-MM-DD>  window start, midnight UTC");
    eprintln!("  --to <YYYY-MM-DD>    window end, end of day UTC");
    eprintln!("  --json               print the summary as JSON instead of the report");
}

#[derive(Debug, Default)]
struct Options {
    seed: bool,
    json: bool,
    days: Option<i64>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl Options {
    fn parse() -> Result<Options> {
        let mut opts = Options::default();
        let mut args = env::args().skip(1);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => opts.seed = true,
                "--json" => opts.json = true,
                "--days" => {
                    let value = args.next().context("--days needs a value")?;
                    opts.days = Some(value.parse().context("--days expects a number")?);
                }
                "--from" => {
                    let value = args.next().context("--from needs a value")?;
                    opts.from = Some(parse_date(&value)?);
                }
                "--to" => {
                    let value = args.next().context("--to needs a value")?;
                    opts.to = Some(parse_date(&value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    process::exit(0);
                }
                other => {
                    eprintln!("Unknown option: {other}");
                    print_usage();
                    process::exit(1);
                }
            }
        }

        Ok(opts)
    }

    /// `[start, end]` in unix seconds. Explicit dates win over `--days`;
    /// the default is the trailing week.
    fn window(&self, now: i64) -> (i64, i64) {
        match (self.from, self.to) {
            (Some(from), to) => {
                let start = day_start(from);
                let end = to.map(|d| day_start(d) + DAY - 1).unwrap_or(now);
                (start, end)
            }
            (None, Some(to)) => {
                let end = day_start(to) + DAY - 1;
                (end - self.days.unwrap_or(7) * DAY + 1, end)
            }
            (None, None) => {
                let days = self.days.unwrap_or(7);
                (now - days * DAY, now)
            }
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let opts = Options::parse()?;
    let s = settings();

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| s.database.url.clone());

    log_init(&database_url);
    let pool = establish_pool(&database_url, s.database.pool_size);
    {
        let mut conn = pool.get().context("Failed to get initial connection")?;
        configure_connection(&mut conn)?;
        run_migrations(&mut conn)?;
    }
    log_db_ready();

    let now = Utc::now().timestamp();

    if opts.seed {
        log_seed_start();
        let mut conn = pool.get().context("Failed to get connection for seeding")?;
        let report = seed::run_seed(&mut conn, now)?;
        log_seed_done(&report);
    }

    let (start, end) = opts.window(now);

    let engine = AnalyticsEngine::new(pool);
    let summary = engine.generate_summary(start, end).await?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
        let board = engine.post_leaderboard(start, end).await?;
        print_leaderboard(&board);
    }

    Ok(())
}
