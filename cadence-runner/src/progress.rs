//! Progress reporting.
//!
//! The sink is purely observational: it is notified before and after each
//! benchmark, subject, and iteration boundary and must never alter control
//! flow or ordering.

use cadence_core::{BenchmarkMetadata, SubjectMetadata};
use indicatif::{ProgressBar, ProgressStyle};

use crate::result::{BenchmarkResult, Iteration, SubjectResult};

/// Observer of run progress.
pub trait ProgressSink {
    /// A benchmark is about to run.
    fn benchmark_start(&self, _benchmark: &BenchmarkMetadata) {}
    /// A benchmark finished.
    fn benchmark_end(&self, _result: &BenchmarkResult) {}
    /// A subject is about to run.
    fn subject_start(&self, _subject: &SubjectMetadata) {}
    /// A subject finished.
    fn subject_end(&self, _result: &SubjectResult) {}
    /// An iteration is about to run.
    fn iteration_start(&self, _subject: &SubjectMetadata, _index: u32) {}
    /// An iteration finished.
    fn iteration_end(&self, _iteration: &Iteration) {}
}

/// Sink that ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {}

/// Terminal progress bar advancing one tick per completed subject.
pub struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    /// Create a bar sized to the total subject count of the run.
    pub fn new(total_subjects: u64) -> Self {
        let bar = ProgressBar::new(total_subjects);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    /// Finish the bar with a closing message.
    pub fn finish(&self) {
        self.bar.finish_with_message("Complete");
    }
}

impl ProgressSink for ProgressBarSink {
    fn subject_start(&self, subject: &SubjectMetadata) {
        self.bar.set_message(subject.method.clone());
    }

    fn subject_end(&self, _result: &SubjectResult) {
        self.bar.inc(1);
    }
}
