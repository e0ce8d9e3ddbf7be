//! Offline field-coverage validator for the OEB feeds
//!
//! Fetches both live feeds, diffs the first row's tag set against the
//! compiled field tables, and exits non-zero when either side has tags the
//! other lacks. Run out-of-band (CI), not part of the live polling path.

use gridtariff::feed::{FeedClient, parse_first_row_tags};
use gridtariff::fields::coverage_gaps;
use gridtariff::sector::ALL_SECTORS;
use std::process::ExitCode;
use std::time::Duration;

#[tokio::main]
async fn main() -> ExitCode {
    let client = match FeedClient::new(Duration::from_secs(10)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut clean = true;
    for sector in ALL_SECTORS {
        let coverage = match client.fetch_feed_body(sector).await {
            Ok(body) => match parse_first_row_tags(sector, &body) {
                Ok(tags) => coverage_gaps(sector, &tags),
                Err(e) => {
                    eprintln!("{}: {}", sector, e);
                    clean = false;
                    continue;
                }
            },
            Err(e) => {
                eprintln!("{}: {}", sector, e);
                clean = false;
                continue;
            }
        };

        if coverage.is_complete() {
            println!("{}: field table matches the feed", sector);
            continue;
        }
        clean = false;
        if !coverage.missing_locally.is_empty() {
            println!(
                "{}: feed tags missing from the local table (new data points): {:?}",
                sector, coverage.missing_locally
            );
        }
        if !coverage.stale_locally.is_empty() {
            println!(
                "{}: local tags absent from the feed (removed data points): {:?}",
                sector, coverage.stale_locally
            );
        }
    }

    if clean {
        println!("No differences!");
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
