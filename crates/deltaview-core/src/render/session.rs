//! Per-view render session.
//!
//! A session owns the computed delta, the annotated tree and the "show
//! unchanged" toggle for a single page view. Toggling re-filters the tree it
//! already holds; the delta is never recomputed.

use crate::core_types::RequestContext;
use crate::delta::model::Delta;
use crate::delta::summary::render_summary;
use crate::render::html::render_html;
use crate::render::text::{layout, to_text, RenderedView};
use crate::render::tree::DeltaNode;
use serde::{Deserialize, Serialize};

/// "Show unchanged" toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    /// Unchanged nodes are shown
    #[default]
    On,
    /// Unchanged nodes are folded away
    Off,
}

impl ToggleState {
    pub fn flipped(self) -> Self {
        match self {
            ToggleState::On => ToggleState::Off,
            ToggleState::Off => ToggleState::On,
        }
    }

    pub fn shows_unchanged(self) -> bool {
        self == ToggleState::On
    }

    pub fn from_bool(show_unchanged: bool) -> Self {
        if show_unchanged {
            ToggleState::On
        } else {
            ToggleState::Off
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderSession {
    context: RequestContext,
    delta: Delta,
    tree: DeltaNode,
    toggle: ToggleState,
    max_value_width: usize,
    view: RenderedView,
    redraws: usize,
}

impl RenderSession {
    /// Create the session and perform the initial render.
    pub fn new(
        context: RequestContext,
        delta: Delta,
        tree: DeltaNode,
        toggle: ToggleState,
        max_value_width: usize,
    ) -> Self {
        let view = layout(&tree, toggle.shows_unchanged(), max_value_width);
        Self {
            context,
            delta,
            tree,
            toggle,
            max_value_width,
            view,
            redraws: 1,
        }
    }

    /// Flip the toggle and redraw once. Returns the new state.
    pub fn toggle(&mut self) -> ToggleState {
        self.toggle = self.toggle.flipped();
        self.redraw();
        self.toggle
    }

    /// Set the toggle explicitly; redraws only when the state changes.
    pub fn set_show_unchanged(&mut self, show_unchanged: bool) {
        let next = ToggleState::from_bool(show_unchanged);
        if next != self.toggle {
            self.toggle = next;
            self.redraw();
        }
    }

    fn redraw(&mut self) {
        self.view = layout(
            &self.tree,
            self.toggle.shows_unchanged(),
            self.max_value_width,
        );
        self.redraws += 1;
        tracing::debug!(
            request_id = %self.context.request_id,
            toggle = ?self.toggle,
            visible_count = self.view.visible_count(),
            "redraw"
        );
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn delta(&self) -> &Delta {
        &self.delta
    }

    pub fn tree(&self) -> &DeltaNode {
        &self.tree
    }

    pub fn toggle_state(&self) -> ToggleState {
        self.toggle
    }

    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    /// Number of renders performed, the initial one included
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    pub fn render_text(&self) -> String {
        to_text(&self.view)
    }

    pub fn render_html(&self, container_id: &str) -> String {
        render_html(
            &self.tree,
            self.toggle.shows_unchanged(),
            container_id,
            self.max_value_width,
        )
    }

    pub fn render_summary(&self) -> String {
        render_summary(&self.delta)
    }
}
