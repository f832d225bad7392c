//! Batch processing with a progress bar and a final summary.

use std::time::{Duration, Instant};

use blackout_core::{BatchDriver, BatchSummary, DiscoveredFile, Outcome};
use indicatif::{ProgressBar, ProgressStyle};

/// Run the batch, driving a progress bar from the outcome stream.
pub async fn process_batch(
    driver: &BatchDriver,
    files: Vec<DiscoveredFile>,
    json: bool,
) -> anyhow::Result<BatchSummary> {
    let progress = create_progress_bar(files.len() as u64);
    let start_time = Instant::now();

    let summary = {
        let progress = progress.clone();
        driver
            .process(files, move |outcome| {
                progress.suspend(|| log_outcome(outcome));
                progress.inc(1);
                let elapsed = start_time.elapsed().as_secs_f64();
                if elapsed > 0.0 {
                    let rate = progress.position() as f64 / elapsed;
                    progress.set_message(format!("{:.1} img/sec", rate));
                }
            })
            .await?
    };

    progress.finish_and_clear();
    let elapsed = start_time.elapsed();
    tracing::debug!(
        "Processed {} file(s) in {:.1}s ({:.1} img/sec)",
        summary.total(),
        elapsed.as_secs_f64(),
        rate(summary.total(), elapsed)
    );

    eprintln!("\n{}", summary_line(&summary));
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(summary)
}

/// One log line per finished file, at a level matching its outcome.
fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Success { .. } => tracing::debug!("{outcome}"),
        Outcome::Skipped { .. } => tracing::warn!("{outcome}"),
        Outcome::Error { .. } => tracing::error!("{outcome}"),
    }
}

/// The human-readable end-of-run tally.
pub fn summary_line(summary: &BatchSummary) -> String {
    format!("Summary: {summary}.")
}

fn rate(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} Processing [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} img ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackout_core::Config;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_summary_line() {
        let summary = BatchSummary {
            succeeded: 10,
            failed: 2,
            skipped: 1,
        };
        assert_eq!(summary_line(&summary), "Summary: 10 OK, 2 errors, 1 skipped.");
    }

    #[test]
    fn test_rate_handles_zero_elapsed() {
        assert_eq!(rate(5, Duration::ZERO), 0.0);
        assert_eq!(rate(10, Duration::from_secs(2)), 5.0);
    }

    #[tokio::test]
    async fn test_process_batch_counts_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        std::fs::create_dir(&input).unwrap();
        RgbImage::from_pixel(6, 6, Rgb([255, 255, 255]))
            .save(input.join("white.png"))
            .unwrap();
        RgbImage::new(6, 6).save(input.join("black.jpg")).unwrap();
        std::fs::write(input.join("junk.bmp"), b"junk").unwrap();

        let driver = BatchDriver::new(Config::default(), &input, &output);
        let files = driver.discover().unwrap();
        let summary = process_batch(&driver, files, false).await.unwrap();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);

        let white = image::open(output.join("white.png")).unwrap().into_rgba8();
        assert!(white.pixels().all(|p| p[3] == 255));
        let black = image::open(output.join("black.png")).unwrap().into_rgba8();
        assert!(black.pixels().all(|p| p[3] == 0));
    }
}
