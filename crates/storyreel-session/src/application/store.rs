//! The Narrative State Store.
//!
//! One instance per reader. Every setter mutates memory first, then queues a
//! write-through; reads always come from memory.

use std::str::FromStr;
use std::sync::Arc;

use storyreel_core::error::DomainError;
use storyreel_core::ids::{Orientation, PageId};
use storyreel_core::store::KeyValueStore;
use storyreel_graph::domain::graph::PageGraph;
use tracing::{debug, info, warn};

use super::writer::PersistenceWriter;
use crate::domain::keys;
use crate::domain::state::{Bond, NarrativeState, StateDefaults};

/// Owns the reader's `NarrativeState` and persists every change.
#[derive(Debug)]
pub struct NarrativeStore {
    graph: Arc<PageGraph>,
    defaults: StateDefaults,
    state: NarrativeState,
    writer: PersistenceWriter,
}

impl NarrativeStore {
    /// Restores state from `kv`, falling back to `defaults` key by key on
    /// missing, corrupt or out-of-graph values and on read failures.
    ///
    /// Must be called inside a Tokio runtime; it spawns the writer task.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `defaults.first_page` is not in
    /// the graph.
    pub async fn load(
        kv: Arc<dyn KeyValueStore>,
        graph: Arc<PageGraph>,
        defaults: StateDefaults,
    ) -> Result<Self, DomainError> {
        if !graph.contains(defaults.first_page) {
            return Err(DomainError::Validation(format!(
                "default first page {} is not in the page graph",
                defaults.first_page
            )));
        }

        let mut state = NarrativeState::initial(&defaults);

        let saved_current = read_page(kv.as_ref(), &graph, keys::CURRENT_PAGE).await;
        let saved_last_read = read_page(kv.as_ref(), &graph, keys::LAST_READ_PAGE).await;
        if let Some(page) = saved_current.or(saved_last_read) {
            state.current_page = page;
        }
        state.last_read_page = saved_last_read.unwrap_or(state.current_page);

        if let Some(orientation) = read_value::<Orientation>(kv.as_ref(), keys::READING_MODE).await
        {
            state.orientation = orientation;
        }
        if let Some(volume) = read_value::<f32>(kv.as_ref(), keys::MUSIC_VOLUME).await {
            if volume.is_finite() && (0.0..=1.0).contains(&volume) {
                state.music_volume = volume;
            } else {
                warn!(key = keys::MUSIC_VOLUME, volume, "stored volume out of range; using default");
            }
        }
        if let Some(morale) = read_value(kv.as_ref(), keys::MORALE).await {
            state.morale = morale;
        }
        if let Some(bond) = read_value(kv.as_ref(), keys::KERUKA_BOND).await {
            state.keruka_bond = bond;
        }
        if let Some(bond) = read_value(kv.as_ref(), keys::KEHINDE_BOND).await {
            state.kehinde_bond = bond;
        }

        info!(
            current_page = %state.current_page,
            last_read_page = %state.last_read_page,
            orientation = state.orientation.as_str(),
            "narrative state loaded"
        );

        Ok(Self {
            graph,
            defaults,
            state,
            writer: PersistenceWriter::spawn(kv),
        })
    }

    #[must_use]
    pub fn state(&self) -> &NarrativeState {
        &self.state
    }

    #[must_use]
    pub fn defaults(&self) -> &StateDefaults {
        &self.defaults
    }

    #[must_use]
    pub fn graph(&self) -> &Arc<PageGraph> {
        &self.graph
    }

    /// Moves the logical position.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if `page` is not in the graph;
    /// state is left unchanged.
    pub fn set_current_page(&mut self, page: PageId) -> Result<(), DomainError> {
        self.ensure_page(page)?;
        if self.state.current_page != page {
            debug!(from = %self.state.current_page, to = %page, "current page changed");
            self.state.current_page = page;
            self.writer.set(keys::CURRENT_PAGE, page.to_string());
        }
        Ok(())
    }

    /// Records `page` as the resume point.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if `page` is not in the graph.
    pub fn set_last_read_page(&mut self, page: PageId) -> Result<(), DomainError> {
        self.ensure_page(page)?;
        if self.state.last_read_page != page {
            self.state.last_read_page = page;
            self.writer.set(keys::LAST_READ_PAGE, page.to_string());
        }
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.state.orientation = orientation;
        self.writer.set(keys::READING_MODE, orientation.as_str());
    }

    /// Adds `delta` to morale.
    pub fn adjust_morale(&mut self, delta: i64) {
        self.state.morale = self.state.morale.saturating_add(delta);
        self.writer.set(keys::MORALE, self.state.morale.to_string());
    }

    /// Adds `delta` to one bond counter.
    pub fn adjust_bond(&mut self, which: Bond, delta: i64) {
        let (counter, key) = match which {
            Bond::Keruka => (&mut self.state.keruka_bond, keys::KERUKA_BOND),
            Bond::Kehinde => (&mut self.state.kehinde_bond, keys::KEHINDE_BOND),
        };
        *counter = counter.saturating_add(delta);
        self.writer.set(key, counter.to_string());
    }

    /// Stores the music volume, clamped to `[0, 1]`. Returns the value kept.
    pub fn set_music_volume(&mut self, volume: f32) -> f32 {
        let volume = if volume.is_nan() {
            self.defaults.music_volume
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.state.music_volume = volume;
        self.writer.set(keys::MUSIC_VOLUME, volume.to_string());
        volume
    }

    /// Restores counters and position to their defaults and clears the
    /// persisted position. Orientation and volume are preferences and are
    /// kept.
    pub fn reset(&mut self) {
        let counter = self.defaults.counter;
        self.state.current_page = self.defaults.first_page;
        self.state.last_read_page = self.defaults.first_page;
        self.state.morale = counter;
        self.state.keruka_bond = counter;
        self.state.kehinde_bond = counter;

        self.writer.remove(keys::CURRENT_PAGE);
        self.writer.remove(keys::LAST_READ_PAGE);
        for key in [keys::MORALE, keys::KERUKA_BOND, keys::KEHINDE_BOND] {
            self.writer.set(key, counter.to_string());
        }
        info!(first_page = %self.defaults.first_page, "narrative state reset");
    }

    /// Waits for every queued write to be attempted.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    fn ensure_page(&self, page: PageId) -> Result<(), DomainError> {
        if self.graph.contains(page) {
            Ok(())
        } else {
            Err(DomainError::PageNotFound(page))
        }
    }
}

async fn read_value<T: FromStr>(kv: &dyn KeyValueStore, key: &'static str) -> Option<T> {
    match kv.get(key).await {
        Ok(Some(raw)) => {
            let parsed = raw.trim().parse().ok();
            if parsed.is_none() {
                warn!(key, value = %raw, "corrupt persisted value; using default");
            }
            parsed
        }
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "reading persisted value failed; using default");
            None
        }
    }
}

async fn read_page(kv: &dyn KeyValueStore, graph: &PageGraph, key: &'static str) -> Option<PageId> {
    let page: PageId = read_value(kv, key).await?;
    if graph.contains(page) {
        Some(page)
    } else {
        warn!(key, page = %page, "persisted page is not in the graph; ignoring");
        None
    }
}
