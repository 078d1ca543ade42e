//! ctime timing brackets around the whole run
//!
//! Every run is wrapped in `ctime -begin` / `ctime -end` calls so build
//! durations accumulate in a project-local timing file. Both calls are
//! fire-and-forget: a missing or failing `ctime` must never change the
//! outcome of a build.

use std::process::Command;

/// Timing file the brackets accumulate into
pub const TIMING_FILE: &str = "bricks.time";

/// Timing collaborator interface
pub trait TimingRecorder {
    fn begin(&self, label: &str);
    fn end(&self, label: &str);
}

/// Real recorder driving the external `ctime` utility
pub struct CtimeRecorder;

impl TimingRecorder for CtimeRecorder {
    fn begin(&self, label: &str) {
        let _ = Command::new("ctime").args(["-begin", label]).status();
    }

    fn end(&self, label: &str) {
        let _ = Command::new("ctime").args(["-end", label]).status();
    }
}

/// Scope guard pairing the begin call with a guaranteed end call.
///
/// The end bracket fires on drop, so early returns and error paths close
/// the bracket just like a clean run does.
pub struct TimingGuard<'a> {
    recorder: &'a dyn TimingRecorder,
    label: &'a str,
}

impl<'a> TimingGuard<'a> {
    /// Fire the begin bracket and arm the end bracket
    pub fn begin(recorder: &'a dyn TimingRecorder, label: &'a str) -> Self {
        recorder.begin(label);
        TimingGuard { recorder, label }
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        self.recorder.end(self.label);
    }
}
