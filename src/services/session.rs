//! Edit session: the current parameters with bounded undo/redo history.
//!
//! `dstretch watch` records every parameter-file reload here, so only real
//! changes trigger a render. Interactive front ends embedding this crate use
//! the undo/redo side.

use crate::error::AppError;
use crate::models::{load_params_file, AppConfig};
use dstretch_core::ParameterSet;
use std::path::Path;

/// Parameter history of one editing session.
///
/// History is linear: applying a change after an undo discards the redo
/// branch. When the history grows past its limit the oldest entry is
/// dropped. Every stored record is clamped.
#[derive(Debug, Clone)]
pub struct EditSession {
    history: Vec<ParameterSet>,
    index: usize,
    limit: usize,
}

impl EditSession {
    /// Start a session at `initial`, keeping at most `limit` states (minimum 1).
    pub fn new(initial: ParameterSet, limit: usize) -> Self {
        Self {
            history: vec![initial.clamped()],
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Start a session from configuration: default preset and history limit.
    pub fn from_config(config: &AppConfig, preset: Option<&str>) -> Result<Self, AppError> {
        let initial = config.resolve_params(preset)?;
        Ok(Self::new(initial, config.history_limit))
    }

    /// The active parameters
    pub fn current(&self) -> &ParameterSet {
        &self.history[self.index]
    }

    /// Record a new state. Returns false if it equals the current one.
    pub fn apply(&mut self, params: ParameterSet) -> bool {
        let params = params.clamped();
        if params == *self.current() {
            return false;
        }

        self.history.truncate(self.index + 1);
        self.history.push(params);
        if self.history.len() > self.limit {
            let excess = self.history.len() - self.limit;
            self.history.drain(..excess);
        }
        self.index = self.history.len() - 1;
        tracing::trace!(index = self.index, len = self.history.len(), "History entry added");
        true
    }

    /// Apply a change built from the current parameters.
    pub fn update(&mut self, f: impl FnOnce(ParameterSet) -> ParameterSet) -> bool {
        let next = f(self.current().clone());
        self.apply(next)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.history.len()
    }

    /// Step back one state; `None` at the start of history.
    pub fn undo(&mut self) -> Option<&ParameterSet> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step forward one state; `None` at the end of history.
    pub fn redo(&mut self) -> Option<&ParameterSet> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    /// Reset the tonal group to neutral as one undoable step.
    pub fn reset_adjustments(&mut self) -> bool {
        self.update(|p| p.reset_adjustments())
    }

    /// Reset the relief group and decorrelation as one undoable step.
    pub fn reset_advanced(&mut self) -> bool {
        self.update(|p| p.reset_advanced())
    }

    /// Replace the current parameters with a named preset.
    pub fn load_preset(&mut self, config: &AppConfig, name: &str) -> Result<bool, AppError> {
        let params = config.resolve_params(Some(name))?;
        tracing::debug!(preset = name, "Preset loaded");
        Ok(self.apply(params))
    }

    /// Re-read a parameter file and record it. Returns false if the file
    /// parses to the current state.
    pub fn reload_from_file(&mut self, path: &Path) -> Result<bool, AppError> {
        let params = load_params_file(path)?;
        Ok(self.apply(params))
    }

    /// Number of stored states
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(ParameterSet::default(), 20)
    }
}
