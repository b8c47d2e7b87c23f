//! Book a morning of meetings and print the resulting timeline
//!
//! Run with `RUST_LOG=timeline_rs=debug cargo run --example booking` to see
//! growth and splits as they happen.

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use timeline_rs::{Range, TimelineBuilder, TimelineConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = TimelineConfig::from_toml_str("spare_secs = 600")?;
    let mut timeline = TimelineBuilder::new().config(&config)?.build()?;

    let nine = Utc.with_ymd_and_hms(2014, 2, 11, 9, 0, 0).unwrap();
    let morning = Range::new(nine, nine + Duration::hours(3))?;

    let standup = timeline.alloc(morning, Duration::minutes(15))?;
    println!("standup     {}", standup.range());

    let review = timeline.alloc(morning, Duration::minutes(50))?;
    println!("review      {}", review.range());

    for (i, part) in timeline
        .alloc_fragments(morning, Duration::minutes(45))?
        .iter()
        .enumerate()
    {
        println!("focus #{}    {}", i + 1, part.range());
    }

    match timeline.alloc(morning, Duration::hours(2)) {
        Ok(block) => println!("offsite     {}", block.range()),
        Err(e) if e.is_busy() => println!("offsite     {}", e),
        Err(e) => return Err(e.into()),
    }

    // An afternoon window grows the timeline forward
    let afternoon = Range::new(nine + Duration::hours(4), nine + Duration::hours(8))?;
    let offsite = timeline.alloc(afternoon, Duration::hours(2))?;
    println!("offsite     {}", offsite.range());

    println!();
    for block in timeline.blocks() {
        let state = if block.is_retained() { "retained" } else { "free" };
        println!("{:<9} {}", state, block.range());
    }

    let stats = timeline.stats();
    println!();
    println!(
        "{} blocks, {} free, fragmentation {:.2}",
        stats.block_count,
        stats.free,
        timeline.fragmentation_score()
    );

    Ok(())
}
