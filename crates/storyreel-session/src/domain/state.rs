//! The narrative state record and its startup defaults.

use serde::{Deserialize, Serialize};
use storyreel_core::ids::{Orientation, PageId};
use storyreel_graph::domain::graph::PageGraph;

/// Neutral starting value for morale and bond counters.
pub const DEFAULT_COUNTER: i64 = 50;

/// Default music volume.
pub const DEFAULT_MUSIC_VOLUME: f32 = 1.0;

/// One of the two relationship counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bond {
    Keruka,
    Kehinde,
}

/// Startup parameters for a fresh or reset reader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDefaults {
    /// Starting value of morale and both bonds.
    pub counter: i64,
    /// Page a fresh reader starts on.
    pub first_page: PageId,
    pub orientation: Orientation,
    pub music_volume: f32,
}

impl StateDefaults {
    /// Defaults starting on the graph's first page.
    #[must_use]
    pub fn for_graph(graph: &PageGraph) -> Self {
        Self {
            counter: DEFAULT_COUNTER,
            first_page: graph.first_page().id,
            orientation: Orientation::default(),
            music_volume: DEFAULT_MUSIC_VOLUME,
        }
    }

    #[must_use]
    pub fn with_counter(mut self, counter: i64) -> Self {
        self.counter = counter;
        self
    }
}

/// Mutable reader state. Counters are unbounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeState {
    pub current_page: PageId,
    /// Last stable page. Transient branch pages never land here.
    pub last_read_page: PageId,
    pub orientation: Orientation,
    pub morale: i64,
    pub keruka_bond: i64,
    pub kehinde_bond: i64,
    pub music_volume: f32,
}

impl NarrativeState {
    #[must_use]
    pub fn initial(defaults: &StateDefaults) -> Self {
        Self {
            current_page: defaults.first_page,
            last_read_page: defaults.first_page,
            orientation: defaults.orientation,
            morale: defaults.counter,
            keruka_bond: defaults.counter,
            kehinde_bond: defaults.counter,
            music_volume: defaults.music_volume,
        }
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.orientation.is_vertical()
    }

    #[must_use]
    pub fn bond(&self, which: Bond) -> i64 {
        match which {
            Bond::Keruka => self.keruka_bond,
            Bond::Kehinde => self.kehinde_bond,
        }
    }
}
