use std::sync::Arc;

use ia_core::error::ConvertError;
use ia_core::pixel::{AsciiArt, PixelBuffer};
use ia_core::settings::ConvertSettings;

/// One conversion request. Settings travel by value; the image is shared
/// read-only.
pub struct ConvertJob {
    /// Monotonic counter stamped by the UI; outcomes carrying an old
    /// generation are discarded.
    pub generation: u64,
    /// Decoded source image.
    pub image: Arc<PixelBuffer>,
    /// Settings snapshot at dispatch time.
    pub settings: ConvertSettings,
}

/// Result of one conversion attempt, tagged with its job generation.
pub struct ConvertOutcome {
    /// Generation of the job that produced this outcome.
    pub generation: u64,
    /// Complete artifact or the error to surface.
    pub result: Result<AsciiArt, ConvertError>,
}

/// Spawn the background conversion worker.
///
/// The worker coalesces queued jobs to the most recent one before running,
/// so at most one conversion is ever in flight and rapid settings changes
/// collapse into a single conversion of the latest snapshot. The pipeline
/// itself always runs to completion; staleness is handled by the receiver.
///
/// The thread exits when the job sender is dropped.
#[must_use]
pub fn spawn_convert_worker() -> (flume::Sender<ConvertJob>, flume::Receiver<ConvertOutcome>) {
    let (job_tx, job_rx) = flume::unbounded::<ConvertJob>();
    let (outcome_tx, outcome_rx) = flume::unbounded::<ConvertOutcome>();

    std::thread::spawn(move || {
        while let Ok(mut job) = job_rx.recv() {
            // Only the most recent queued snapshot matters.
            while let Ok(next) = job_rx.try_recv() {
                job = next;
            }
            let result = ia_ascii::convert(&job.image, &job.settings);
            if let Err(ref e) = result {
                log::warn!("conversion failed: {e}");
            }
            if outcome_tx
                .send(ConvertOutcome {
                    generation: job.generation,
                    result,
                })
                .is_err()
            {
                break;
            }
        }
        log::debug!("convert worker shut down");
    });

    (job_tx, outcome_rx)
}
