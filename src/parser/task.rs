//! Background parsing.
//!
//! [`ParserTask::spawn`] moves a parser onto a worker thread and runs it.
//! Finish events arrive on a channel while the caller's thread stays free;
//! [`ParserTask::join`] hands the parser back so pending regions can be
//! resolved on the caller's side. The events receiver keeps working after
//! the join and also sees the event sent by the final manual recognition.
use super::pipeline::{DiagramParser, FinishEvent};
use crate::error::{DetectorError, Result};
use crate::tracer::CancellationToken;
use crossbeam_channel::Receiver;
use log::debug;
use std::any::Any;
use std::thread::{self, JoinHandle};

pub struct ParserTask {
    events: Receiver<FinishEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<Result<DiagramParser>>,
}

impl ParserTask {
    pub fn spawn(mut parser: DiagramParser) -> Self {
        let events = parser.subscribe();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = thread::spawn(move || {
            let result = parser.run(&token)?;
            debug!("ParserTask: finished with {:?}", result);
            Ok(parser)
        });
        Self {
            events,
            cancel,
            handle,
        }
    }

    pub fn events(&self) -> &Receiver<FinishEvent> {
        &self.events
    }

    /// Stops tracing at the next step; `join` then reports `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the worker and returns the parser along with the events
    /// receiver.
    pub fn join(self) -> Result<(DiagramParser, Receiver<FinishEvent>)> {
        let parser = self
            .handle
            .join()
            .map_err(|payload| DetectorError::TaskFailed(panic_message(payload)))??;
        Ok((parser, self.events))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "parser thread panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::EdgeMap;
    use crate::parser::{DetectionResult, ParserParams, ParserState};
    use crate::statistics::StatisticsTable;
    use std::sync::Arc;

    #[test]
    fn blank_map_finishes_in_background() {
        let parser = DiagramParser::new(
            EdgeMap::new(16, 16),
            Arc::new(StatisticsTable::default()),
            ParserParams::default(),
        )
        .unwrap();
        let task = ParserTask::spawn(parser);
        let event = task.events().recv().unwrap();
        assert_eq!(event.result, DetectionResult::Unsuccessful);
        let (parser, _events) = task.join().unwrap();
        assert_eq!(parser.state(), ParserState::Parsed);
    }

    #[test]
    fn panic_payloads_become_messages() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(3u8)), "parser thread panicked");
    }
}
