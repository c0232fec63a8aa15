//! Score accumulation.
//!
//! The tracker is the single authority for the session score. Collaborators
//! accrue points internally and the director drains them once per tick.

/// Receives the score whenever it changes.
pub trait ScoreSink {
    fn show_score(&mut self, score: u32);
}

/// Closures work as sinks.
impl<F: FnMut(u32)> ScoreSink for F {
    fn show_score(&mut self, score: u32) {
        self(score)
    }
}

/// Discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn show_score(&mut self, _score: u32) {}
}

/// Remembers every value it was shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    pub shown: Vec<u32>,
}

impl ScoreSink for RecordingSink {
    fn show_score(&mut self, score: u32) {
        self.shown.push(score);
    }
}

#[derive(Debug, Clone)]
pub struct ScoreTracker<S> {
    score: u32,
    sink: S,
}

impl<S: ScoreSink> ScoreTracker<S> {
    /// Wrap `sink`. Nothing is shown until the first [`set_score`](Self::set_score).
    pub fn new(sink: S) -> Self {
        Self { score: 0, sink }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Replace the score and push it to the sink.
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
        self.sink.show_score(score);
    }

    /// Add `delta` if it is positive. Zero leaves both score and sink untouched.
    pub fn add_score(&mut self, delta: u32) {
        if delta > 0 {
            self.set_score(self.score.saturating_add(delta));
        }
    }
}
