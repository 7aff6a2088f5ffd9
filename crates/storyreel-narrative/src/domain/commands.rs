//! Commands accepted by the reader.

use storyreel_core::command::ReaderCommand;
use storyreel_core::ids::Orientation;
use uuid::Uuid;

/// Pick one of the choices on the current page.
#[derive(Debug, Clone)]
pub struct ChooseOption {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Index into the current page's choice list.
    pub choice_index: usize,
}

impl ReaderCommand for ChooseOption {
    fn command_type(&self) -> &'static str {
        "reader.choose_option"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// A user drag came to rest.
#[derive(Debug, Clone)]
pub struct SettleScroll {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Resting offset along the scroll axis.
    pub offset: f64,
}

impl ReaderCommand for SettleScroll {
    fn command_type(&self) -> &'static str {
        "reader.settle_scroll"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Switch between vertical and horizontal reading.
#[derive(Debug, Clone)]
pub struct ChangeOrientation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub orientation: Orientation,
}

impl ReaderCommand for ChangeOrientation {
    fn command_type(&self) -> &'static str {
        "reader.change_orientation"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Start the story over.
#[derive(Debug, Clone)]
pub struct ResetProgress {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl ReaderCommand for ResetProgress {
    fn command_type(&self) -> &'static str {
        "reader.reset_progress"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
