//! The reader controller.
//!
//! Ties the state store, the navigator and branch playback together so the
//! logical page, the physical offset and the persisted position always move
//! as one. All methods are synchronous except the ones touching audio or
//! waiting on persistence; playback is advanced by calling `tick` once
//! `next_due_at` has passed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use storyreel_core::audio::AudioPlayer;
use storyreel_core::clock::Clock;
use storyreel_core::command::ReaderCommand;
use storyreel_core::error::DomainError;
use storyreel_core::ids::PageId;
use storyreel_core::store::KeyValueStore;
use storyreel_graph::domain::graph::PageGraph;
use storyreel_graph::domain::page::Page;
use storyreel_navigation::domain::navigator::{Navigator, ScrollCommand, SettleOutcome};
use storyreel_navigation::domain::viewport::Viewport;
use storyreel_session::application::store::NarrativeStore;
use storyreel_session::domain::state::{Bond, NarrativeState, StateDefaults};
use tracing::{debug, info, instrument, warn};

use super::view::ReaderView;
use crate::domain::commands::{ChangeOrientation, ChooseOption, ResetProgress, SettleScroll};
use crate::domain::playback::PlaybackScheduler;
use crate::domain::resolver::{resolve_choice, PlaybackTiming, Resolution, StepKind, TraversalStep};

/// One reader session over one page graph.
pub struct Reader {
    graph: Arc<PageGraph>,
    store: NarrativeStore,
    navigator: Navigator,
    playback: PlaybackScheduler,
    timing: PlaybackTiming,
    clock: Arc<dyn Clock>,
    mounted: bool,
}

impl std::fmt::Debug for Reader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("current_page", &self.navigator.current_page())
            .field("phase", &self.navigator.phase())
            .field("playing", &self.playback.is_playing())
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl Reader {
    /// Wraps an already loaded store.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if the store's current page is not
    /// in its graph.
    pub fn new(
        store: NarrativeStore,
        viewport: Viewport,
        timing: PlaybackTiming,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let graph = Arc::clone(store.graph());
        let state = store.state();
        let navigator = Navigator::new(
            Arc::clone(&graph),
            state.current_page,
            state.orientation,
            viewport,
        )?;
        Ok(Self {
            graph,
            store,
            navigator,
            playback: PlaybackScheduler::new(),
            timing,
            clock,
            mounted: false,
        })
    }

    /// Loads persisted state from `kv` and builds a reader on top of it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `defaults.first_page` is not in
    /// the graph.
    pub async fn open(
        kv: Arc<dyn KeyValueStore>,
        graph: Arc<PageGraph>,
        defaults: StateDefaults,
        viewport: Viewport,
        timing: PlaybackTiming,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let store = NarrativeStore::load(kv, graph, defaults).await?;
        Self::new(store, viewport, timing, clock)
    }

    #[must_use]
    pub fn state(&self) -> &NarrativeState {
        self.store.state()
    }

    #[must_use]
    pub fn current_page(&self) -> PageId {
        self.navigator.current_page()
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn graph(&self) -> &Arc<PageGraph> {
        &self.graph
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// When `tick` next has work to do.
    #[must_use]
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.playback.next_due_at()
    }

    /// Starts ambient audio on first mount and returns the jump that puts the
    /// view on the restored page without animation.
    pub async fn mount(&mut self, audio: &dyn AudioPlayer) -> ScrollCommand {
        if !self.mounted {
            self.mounted = true;
            if let Err(e) = audio.play().await {
                warn!(error = %e, "ambient audio failed to start");
            }
            if let Err(e) = audio.set_volume(self.store.state().music_volume).await {
                warn!(error = %e, "applying music volume failed");
            }
            info!(page = %self.current_page(), "reader mounted");
        }
        self.navigator.current_command(false)
    }

    /// Resolves a choice on the current page, applies its counter deltas and
    /// starts its page sequence. Any sequence already playing is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a choice made on this page has
    /// not delivered its first step yet. Otherwise returns the resolution
    /// error unchanged. Nothing is applied or scheduled on error.
    #[instrument(skip(self), fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
    pub fn choose(&mut self, command: &ChooseOption) -> Result<Resolution, DomainError> {
        let host = self.current_page();
        if self.playback.awaiting_first_step() {
            warn!(page = %host, "choice rejected; previous choice still pending");
            return Err(DomainError::Validation(format!(
                "a choice on page {host} is already being resolved"
            )));
        }
        let resolution = resolve_choice(&self.graph, host, command.choice_index, &self.timing)
            .inspect_err(|e| warn!(page = %host, error = %e, "choice rejected"))?;

        let deltas = resolution.deltas;
        if deltas.morale != 0 {
            self.store.adjust_morale(deltas.morale);
        }
        if deltas.keruka_bond != 0 {
            self.store.adjust_bond(Bond::Keruka, deltas.keruka_bond);
        }
        if deltas.kehinde_bond != 0 {
            self.store.adjust_bond(Bond::Kehinde, deltas.kehinde_bond);
        }

        let generation = self.playback.start(&resolution.steps, self.clock.now());
        info!(
            page = %host,
            choice = %resolution.label,
            steps = resolution.steps.len(),
            generation,
            "choice resolved"
        );
        Ok(resolution)
    }

    /// Applies every playback step that has come due. Returns the scroll
    /// instructions to animate, in order.
    pub fn tick(&mut self) -> Vec<ScrollCommand> {
        let due = self.playback.take_due(self.clock.now());
        let mut commands = Vec::with_capacity(due.len());
        for step in due {
            match self.apply_step(step) {
                Ok(Some(command)) => commands.push(command),
                Ok(None) => {}
                Err(e) => {
                    warn!(page = %step.page, error = %e, "playback step failed; cancelling sequence");
                    self.playback.cancel();
                    break;
                }
            }
        }
        commands
    }

    fn apply_step(&mut self, step: TraversalStep) -> Result<Option<ScrollCommand>, DomainError> {
        self.store.set_current_page(step.page)?;
        if step.kind == StepKind::Terminal {
            self.store.set_last_read_page(step.page)?;
            debug!(page = %step.page, "branch playback finished");
        }
        self.navigator.scroll_to(step.page, true)
    }

    /// A user drag has started.
    pub fn begin_drag(&mut self) {
        self.navigator.begin_drag();
    }

    /// Live drag position. Returns a revert instruction when the drag pushes
    /// forward off a choice page.
    pub fn drag_to(&mut self, offset: f64) -> Option<ScrollCommand> {
        self.navigator.drag_to(offset)
    }

    /// A drag came to rest. Moving to another page cancels branch playback
    /// and makes the new page the resume point. A forward drag never gets
    /// past the next choice page.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if the settled page cannot be
    /// stored; the navigator never reports such a page.
    #[instrument(skip(self), fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
    pub fn settle(&mut self, command: &SettleScroll) -> Result<SettleOutcome, DomainError> {
        let outcome = self.navigator.settle(command.offset);
        if let SettleOutcome::Moved { to, .. } | SettleOutcome::HeldAtChoice { to, .. } = outcome {
            if self.playback.is_playing() {
                let dropped = self.playback.cancel();
                info!(dropped, "manual scroll cancelled branch playback");
            }
            self.store.set_current_page(to)?;
            self.store.set_last_read_page(to)?;
        }
        Ok(outcome)
    }

    /// Switches reading orientation, keeping the logical page.
    #[instrument(skip(self), fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
    pub fn change_orientation(&mut self, command: &ChangeOrientation) -> ScrollCommand {
        self.store.set_orientation(command.orientation);
        info!(orientation = command.orientation.as_str(), "reading mode changed");
        self.navigator.set_orientation(command.orientation)
    }

    /// Applies a new screen size, keeping the logical page.
    pub fn resize(&mut self, viewport: Viewport) -> ScrollCommand {
        self.navigator.set_viewport(viewport)
    }

    /// Stores and applies the music volume. Returns the clamped value.
    pub async fn set_music_volume(&mut self, volume: f32, audio: &dyn AudioPlayer) -> f32 {
        let kept = self.store.set_music_volume(volume);
        if let Err(e) = audio.set_volume(kept).await {
            warn!(error = %e, "applying music volume failed");
        }
        kept
    }

    /// Cancels playback, restores the default state and scrolls back to the
    /// first page.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if the default first page is not
    /// in the graph; `NarrativeStore::load` rules that out.
    #[instrument(skip(self), fields(command_type = command.command_type(), correlation_id = %command.correlation_id()))]
    pub fn reset(&mut self, command: &ResetProgress) -> Result<ScrollCommand, DomainError> {
        let dropped = self.playback.cancel();
        if dropped > 0 {
            debug!(dropped, "reset cancelled branch playback");
        }
        self.store.reset();
        let first = self.store.state().current_page;
        let command = self.navigator.scroll_to(first, true)?;
        Ok(command.unwrap_or_else(|| self.navigator.current_command(true)))
    }

    /// The page the reader is on.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PageNotFound` if the current page left the
    /// graph, which the store never allows.
    pub fn page(&self) -> Result<&Page, DomainError> {
        self.graph.get_page(self.current_page())
    }

    /// Snapshot for rendering.
    ///
    /// # Errors
    ///
    /// See [`Reader::page`].
    pub fn view(&self) -> Result<ReaderView, DomainError> {
        Ok(ReaderView::build(
            self.page()?,
            self.navigator.phase(),
            self.navigator.current_command(false),
            self.navigator.viewport(),
            self.playback.is_playing(),
            self.store.state().clone(),
        ))
    }

    /// Waits until every state change so far has reached storage.
    pub async fn flush(&self) {
        self.store.flush().await;
    }
}
