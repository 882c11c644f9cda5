//! Progress line printing for page retrieval.

use flipdl_core::retriever::RetrievalProgress;
use std::io::Write;
use std::time::Instant;

const PROGRESS_INTERVAL_MS: u64 = 250;

/// Spawns a task printing progress snapshots until the sender side is dropped.
pub(super) fn spawn_progress_printer(
    mut progress_rx: tokio::sync::mpsc::Receiver<RetrievalProgress>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        let mut printed = false;
        while let Some(stats) = progress_rx.recv().await {
            let now = Instant::now();
            let due = last_print
                .map(|t| now.duration_since(t).as_millis() as u64 >= PROGRESS_INTERVAL_MS)
                .unwrap_or(true);
            if due || stats.is_complete() {
                print!("\r  {}  ", format_progress(&stats));
                let _ = std::io::stdout().flush();
                last_print = Some(now);
                printed = true;
            }
        }
        if printed {
            println!();
        }
    })
}

pub(super) fn format_progress(stats: &RetrievalProgress) -> String {
    let mib = stats.bytes_done as f64 / 1_048_576.0;
    let eta = stats
        .eta_secs()
        .map(|s| format!("{:.0}s", s))
        .unwrap_or_else(|| "?".to_string());
    format!(
        "{} / {} pages ({:.1}%)  {:.1} MiB  {:.1} pages/s  ETA {}",
        stats.pages_done,
        stats.page_count,
        stats.fraction() * 100.0,
        mib,
        stats.pages_per_sec(),
        eta
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_progress_line() {
        let stats = RetrievalProgress {
            pages_done: 5,
            page_count: 20,
            bytes_done: 2 * 1_048_576,
            elapsed_secs: 5.0,
        };
        assert_eq!(
            format_progress(&stats),
            "5 / 20 pages (25.0%)  2.0 MiB  1.0 pages/s  ETA 15s"
        );
    }

    #[test]
    fn unknown_eta_before_first_page() {
        let stats = RetrievalProgress {
            pages_done: 0,
            page_count: 3,
            bytes_done: 0,
            elapsed_secs: 0.0,
        };
        assert!(format_progress(&stats).ends_with("ETA ?"));
    }
}
