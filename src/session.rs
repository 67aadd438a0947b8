//! Capture-session boundary. The core never talks to an audio backend;
//! it accepts a plain transcript string from whatever produced it.

/// Whether a speech backend is available. Probed once at startup;
/// `Unsupported` callers offer manual entry instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSupport {
    Supported,
    Unsupported,
}

/// A time-bounded capture. Implementations accumulate finalized partial
/// results in arrival order and deliver exactly one terminal transcript
/// per session from `stop`. An empty transcript means the extraction
/// pipeline is not invoked and the UI returns to idle.
pub trait CaptureSession {
    fn start(&mut self);
    /// End the session and yield the accumulated transcript.
    fn stop(&mut self) -> String;
}

/// Manual-entry stand-in used when no speech backend exists: the
/// "transcript" is whatever text was pushed in between start and stop.
#[derive(Debug, Default)]
pub struct ManualSession {
    buffer: String,
    active: bool,
}

impl ManualSession {
    /// Append a finalized chunk. Ignored while no session is active.
    pub fn push(&mut self, text: &str) {
        if self.active {
            self.buffer.push_str(text);
        }
    }
}

impl CaptureSession for ManualSession {
    fn start(&mut self) {
        self.active = true;
        self.buffer.clear();
    }

    fn stop(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_terminal_transcript_per_session() {
        let mut session = ManualSession::default();
        session.start();
        session.push("牛乳を買う。");
        session.push("部屋を掃除する。");
        assert_eq!(session.stop(), "牛乳を買う。部屋を掃除する。");
        // a second stop yields nothing new
        assert_eq!(session.stop(), "");
    }

    #[test]
    fn pushes_outside_a_session_are_dropped() {
        let mut session = ManualSession::default();
        session.push("ignored");
        session.start();
        assert_eq!(session.stop(), "");
    }

    #[test]
    fn restarting_clears_the_previous_buffer() {
        let mut session = ManualSession::default();
        session.start();
        session.push("old");
        session.start();
        session.push("new");
        assert_eq!(session.stop(), "new");
    }
}
