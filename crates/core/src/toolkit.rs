//! Access to the wrapped toolkit's error state.
//!
//! The toolkit signals failures through a global flag plus a message buffer
//! that must be reset before the next call. Generated bindings check the
//! flag after every toolkit call and turn a set flag into an exception.

use crate::error::ToolkitError;

/// Length of string output buffers handed to the toolkit.
pub const STRING_LEN: usize = 255;

/// Buffer length for the long diagnostic message, terminator included.
pub const SPICE_DETAIL_LEN: usize = 1840;

/// Buffer length for the short diagnostic message, terminator included.
pub const SPICE_MESSAGE_LEN: usize = 25;

/// Which diagnostic message to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Short,
    Long,
    Explain,
}

impl MessageKind {
    /// The option string the toolkit expects.
    #[must_use]
    pub fn option(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
            Self::Explain => "explain",
        }
    }
}

/// The toolkit's error state.
pub trait ErrorState {
    /// Whether an error has been signalled since the last reset.
    fn failed(&self) -> bool;

    /// Fetch a diagnostic message, truncated to at most `max_len` bytes on a
    /// character boundary.
    fn message(&self, kind: MessageKind, max_len: usize) -> String;

    /// Clear the failure flag and messages.
    fn reset(&mut self);
}

/// Turn a set failure flag into an error, resetting the toolkit.
///
/// Leaves the state untouched when no failure is pending.
pub fn check_failed<S: ErrorState + ?Sized>(state: &mut S) -> Result<(), ToolkitError> {
    if !state.failed() {
        return Ok(());
    }

    // one byte of the caller's buffer is reserved for the terminator
    let message = state.message(MessageKind::Long, SPICE_DETAIL_LEN - 1);
    state.reset();

    tracing::warn!(message = %message, "toolkit call failed");
    Err(ToolkitError::Failed { message })
}

/// Longest prefix of `text` that fits in `max_len` bytes without splitting a character.
fn truncate_bytes(text: &str, max_len: usize) -> &str {
    if text.len() <= max_len {
        return text;
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// In-memory error state, for tests and builds without a linked toolkit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedErrors {
    failed: bool,
    short: String,
    long: String,
    explain: String,
}

impl RecordedErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal an error. Like the toolkit, the first error wins until reset.
    pub fn signal(&mut self, short: &str, long: &str) {
        if self.failed {
            return;
        }
        self.failed = true;
        self.short = short.to_string();
        self.long = long.to_string();
        self.explain = short.trim_start_matches("SPICE(").trim_end_matches(')').to_string();
    }
}

impl ErrorState for RecordedErrors {
    fn failed(&self) -> bool {
        self.failed
    }

    fn message(&self, kind: MessageKind, max_len: usize) -> String {
        let text = match kind {
            MessageKind::Short => &self.short,
            MessageKind::Long => &self.long,
            MessageKind::Explain => &self.explain,
        };
        truncate_bytes(text, max_len).to_string()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
