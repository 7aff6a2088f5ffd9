//! Reader command abstraction.

use uuid::Uuid;

/// Trait implemented by every input the reader acts on (a choice tap, a
/// settled scroll, an orientation switch).
pub trait ReaderCommand: Send + Sync + std::fmt::Debug {
    /// Stable name used in log lines, e.g. `"reader.choose_option"`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID recorded on every log line the command produces.
    fn correlation_id(&self) -> Uuid;
}
