use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Lifecycle of a [`DiagramParser`](super::DiagramParser).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParserState {
    Undetected,
    Tracing,
    Traced,
    Parsing,
    /// Some regions wait for a manual recognition.
    PartialRecognized,
    Parsed,
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Overall outcome reported with every finish event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DetectionResult {
    Unsuccessful,
    Successful,
    /// Some contours could not be closed, or some regions needed help.
    PartialSuccessful,
}

/// Most recent states, newest last, capped at `capacity`.
#[derive(Clone, Debug)]
pub struct StateHistory {
    capacity: usize,
    states: VecDeque<ParserState>,
}

impl StateHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            states: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, state: ParserState) {
        if self.states.len() == self.capacity {
            self.states.pop_front();
        }
        self.states.push_back(state);
    }

    pub fn current(&self) -> Option<ParserState> {
        self.states.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ParserState> + '_ {
        self.states.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_drops_oldest() {
        let mut h = StateHistory::new(3);
        for s in [
            ParserState::Undetected,
            ParserState::Tracing,
            ParserState::Traced,
            ParserState::Parsing,
        ] {
            h.push(s);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.current(), Some(ParserState::Parsing));
        assert_eq!(h.iter().next(), Some(ParserState::Tracing));
    }
}
