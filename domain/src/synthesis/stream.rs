//! Streaming events for synthesis generation.
//!
//! [`StreamEvent`] represents individual events of a streamed generation,
//! enabling real-time display of model output as it's produced.

/// An event in a streaming generation response.
///
/// Bridges infrastructure-level streaming (newline-delimited JSON records)
/// to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A non-empty text fragment from the model.
    Delta(String),
    /// The service flagged the generation as done.
    Completed,
    /// The stream broke before completion.
    Error(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed | StreamEvent::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_text_returns_content() {
        let event = StreamEvent::Delta("hello".to_string());
        assert_eq!(event.text(), Some("hello"));
        assert!(!event.is_terminal());
    }

    #[test]
    fn completed_is_terminal() {
        assert!(StreamEvent::Completed.is_terminal());
        assert_eq!(StreamEvent::Completed.text(), None);
    }

    #[test]
    fn error_is_terminal() {
        let event = StreamEvent::Error("reset".to_string());
        assert!(event.is_terminal());
        assert_eq!(event.text(), None);
    }
}
