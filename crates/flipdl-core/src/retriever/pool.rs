//! Bounded worker pool over the ordered page list.
//!
//! Workers pull pages from a shared queue; after the first failure no new
//! pages are dispatched. Results are slotted back by position, so the output
//! order never depends on completion order.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};

use crate::error::FlipbookError;
use crate::fetch::Fetcher;
use crate::locator::PageResource;
use crate::retry::{FetchError, RetryPolicy};

use super::page::{retrieve_page, StagedPage};
use super::progress::ProgressTracker;

pub(super) fn retrieve_pool(
    fetcher: &dyn Fetcher,
    work: Vec<(&PageResource, String)>,
    dir: &Path,
    workers: usize,
    retry: Option<&RetryPolicy>,
    tracker: &mut ProgressTracker<'_>,
) -> Result<Vec<StagedPage>, FlipbookError> {
    let count = work.len();
    let queue: Mutex<VecDeque<(usize, &PageResource, String)>> = Mutex::new(
        work.into_iter()
            .enumerate()
            .map(|(pos, (page, name))| (pos, page, name))
            .collect(),
    );
    let abort = AtomicBool::new(false);
    let num_workers = workers.clamp(1, count.max(1));

    let mut slots: Vec<Option<StagedPage>> = vec![None; count];
    let mut failures: Vec<(usize, &PageResource, FetchError)> = Vec::new();

    std::thread::scope(|scope| {
        let (tx, rx) = mpsc::channel();
        for _ in 0..num_workers {
            let tx = tx.clone();
            let queue = &queue;
            let abort = &abort;
            scope.spawn(move || loop {
                if abort.load(Ordering::Acquire) {
                    break;
                }
                let next = queue
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .pop_front();
                let Some((pos, page, name)) = next else {
                    break;
                };
                let res = retrieve_page(fetcher, page, &name, dir, retry);
                if res.is_err() {
                    abort.store(true, Ordering::Release);
                }
                if tx.send((pos, page, res)).is_err() {
                    break;
                }
            });
        }
        drop(tx);

        for (pos, page, res) in rx {
            match res {
                Ok(staged) => {
                    tracker.record(staged.bytes);
                    slots[pos] = Some(staged);
                }
                Err(e) => failures.push((pos, page, e)),
            }
        }
    });

    // Report the earliest page that failed, as the sequential path would.
    if let Some(i) = (0..failures.len()).min_by_key(|&i| failures[i].0) {
        let (_, page, source) = failures.swap_remove(i);
        return Err(FlipbookError::RetrievalFailed {
            index: page.index,
            url: page.location.clone(),
            source,
        });
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(pos, slot)| {
            slot.ok_or_else(|| FlipbookError::RetrievalFailed {
                index: pos,
                url: String::new(),
                source: FetchError::Storage(std::io::Error::other("page was not retrieved")),
            })
        })
        .collect()
}
