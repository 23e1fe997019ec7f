use ifres::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const BAR_TEMPLATE: &str = "{msg:<26} [{bar:40.cyan/blue}] {pos}/{len} residues";
const DOWNLOAD_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})";

/// Renders detection [`Progress`] events: a spinner per phase and a bar while residues are
/// scanned.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    /// Creates a handler drawing to stderr, or drawing nothing when `hidden` is set.
    pub fn new(hidden: bool) -> Self {
        let pb = ProgressBar::new(0).with_style(spinner_style());
        pb.set_draw_target(if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        });
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb.reset();
                    pb.set_length(0);
                    pb.set_style(spinner_style());
                    pb.set_message(name);
                    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::PhaseFinish => {
                    pb.disable_steady_tick();
                    pb.finish_with_message(format!("✓ {}", pb.message()));
                }
                Progress::TaskStart { total_steps } => {
                    pb.disable_steady_tick();
                    pb.set_style(bar_style());
                    pb.set_length(total_steps);
                    pb.set_position(0);
                }
                Progress::TaskIncrement => pb.inc(1),
                Progress::TaskFinish => {
                    if let Some(length) = pb.length() {
                        pb.set_position(length);
                    }
                }
                Progress::Message(msg) => pb.println(format!("  {}", msg)),
            }
        })
    }
}

/// A byte-count bar for downloads of known or unknown size.
pub fn download_bar(total_size: Option<u64>, hidden: bool) -> ProgressBar {
    let pb = match total_size {
        Some(size) => ProgressBar::new(size),
        None => ProgressBar::no_length(),
    };
    pb.set_style(
        ProgressStyle::with_template(DOWNLOAD_TEMPLATE)
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_draw_target(if hidden {
        ProgressDrawTarget::hidden()
    } else {
        ProgressDrawTarget::stderr_with_hz(4)
    });
    pb
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template(SPINNER_TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handler_initializes_in_a_finished_state() {
        let handler = CliProgressHandler::new(true);
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn detection_events_drive_the_bar() {
        let handler = CliProgressHandler::new(true);
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Scanning Target Residues",
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Scanning Target Residues");
            assert!(!pb.is_finished());
        }

        callback(Progress::TaskStart { total_steps: 40 });
        callback(Progress::TaskIncrement);
        callback(Progress::TaskIncrement);
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(40));
            assert_eq!(pb.position(), 2);
        }

        callback(Progress::TaskFinish);
        assert_eq!(handler.pb.lock().unwrap().position(), 40);

        callback(Progress::PhaseFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.message(), "✓ Scanning Target Residues");
        }
    }

    #[test]
    fn messages_leave_the_current_phase_untouched() {
        let handler = CliProgressHandler::new(true);
        let callback = handler.get_callback();
        callback(Progress::PhaseStart {
            name: "Indexing Partner Atoms",
        });
        callback(Progress::PhaseFinish);
        callback(Progress::Message("No partner atoms passed the atom filter.".to_string()));

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "✓ Indexing Partner Atoms");
    }

    #[test]
    fn callback_can_be_invoked_from_worker_threads() {
        let handler = CliProgressHandler::new(true);
        let callback = Arc::new(handler.get_callback());
        callback(Progress::TaskStart { total_steps: 8 });

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let callback = Arc::clone(&callback);
                thread::spawn(move || {
                    callback(Progress::TaskIncrement);
                    callback(Progress::TaskIncrement);
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(handler.pb.lock().unwrap().position(), 8);
    }

    #[test]
    fn download_bar_tracks_known_sizes() {
        let pb = download_bar(Some(1024), true);
        pb.inc(512);
        assert_eq!(pb.length(), Some(1024));
        assert_eq!(pb.position(), 512);
        assert_eq!(download_bar(None, true).length(), None);
    }
}
