use std::time::Duration;

use crate::{
    config::PanelConfig,
    panel::{AlertPanel, PanelId, PanelState, TransitionHandle},
};

/// Parameters of a [`PanelCoordinator::toggle`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOptions {
    /// Move the spacing boundary shared with the sibling view along with the panel.
    pub adjust_sibling_spacing: bool,
    /// Collapse the panel again after this delay if it ends up expanded.
    pub auto_collapse_after: Option<Duration>,
}

impl ToggleOptions {
    /// Options of the address copy call site.
    pub fn copy_confirmation(delay: Duration) -> Self {
        Self {
            adjust_sibling_spacing: false,
            auto_collapse_after: Some(delay),
        }
    }

    /// Options of the share button call site.
    pub fn share() -> Self {
        Self {
            adjust_sibling_spacing: true,
            auto_collapse_after: None,
        }
    }
}

/// The spacing boundary between the share button and its panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    large: f32,
    small: f32,
    current: f32,
}

impl Spacing {
    pub fn new(large: f32, small: f32) -> Self {
        Self {
            large,
            small,
            current: large,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    fn delta(&self) -> f32 {
        self.large - self.small
    }

    /// Narrow the boundary for an expansion, widen it back for a collapse.
    fn shift(&mut self, expanding: bool) -> SpacingChange {
        let from = self.current;
        self.current = if expanding {
            (from - self.delta()).max(self.small)
        } else {
            (from + self.delta()).min(self.large)
        };
        SpacingChange {
            from,
            to: self.current,
        }
    }
}

/// Spacing animated concurrently with a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingChange {
    pub from: f32,
    pub to: f32,
}

impl SpacingChange {
    /// Interpolated value, `progress` in `[0, 1]`.
    pub fn at(&self, progress: f32) -> f32 {
        self.from + (self.to - self.from) * progress.clamp(0.0, 1.0)
    }
}

/// A deferred collapse, to be handed back to [`PanelCoordinator::on_auto_collapse`] once `delay`
/// elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoCollapse {
    pub panel: PanelId,
    /// Expansion the timer was armed for.
    pub expansion: u64,
    pub adjust_sibling_spacing: bool,
    pub delay: Duration,
}

/// Work for the host event loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Animate the panel for `duration`, together with `spacing` if any, then report
    /// completion with [`PanelCoordinator::on_transition_finished`].
    Animate {
        handle: TransitionHandle,
        duration: Duration,
        spacing: Option<SpacingChange>,
    },
    /// Wait, then report with [`PanelCoordinator::on_auto_collapse`].
    ScheduleCollapse(AutoCollapse),
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    handle: TransitionHandle,
    options: ToggleOptions,
}

/// Owns the panels and serializes their transitions.
///
/// At most one panel is open at a time and only one animation runs at a time. The interaction
/// lock is held from a toggle until the last animation it started has finished; toggles
/// requested meanwhile are dropped.
#[derive(Debug, Clone)]
pub struct PanelCoordinator {
    copy_confirmation: AlertPanel,
    share: AlertPanel,
    locked: bool,
    in_flight: Option<InFlight>,
    // Toggle waiting for the peer panel to collapse.
    pending: Option<(PanelId, ToggleOptions)>,
    spacing: Spacing,
    animation_duration: Duration,
}

impl PanelCoordinator {
    pub fn new(config: &PanelConfig) -> Self {
        Self {
            copy_confirmation: AlertPanel::new(PanelId::CopyConfirmation),
            share: AlertPanel::new(PanelId::Share),
            locked: false,
            in_flight: None,
            pending: None,
            spacing: Spacing::new(config.large_share_padding, config.small_share_padding),
            animation_duration: config.animation_duration(),
        }
    }

    pub fn panel(&self, id: PanelId) -> &AlertPanel {
        match id {
            PanelId::CopyConfirmation => &self.copy_confirmation,
            PanelId::Share => &self.share,
        }
    }

    fn panel_mut(&mut self, id: PanelId) -> &mut AlertPanel {
        match id {
            PanelId::CopyConfirmation => &mut self.copy_confirmation,
            PanelId::Share => &mut self.share,
        }
    }

    /// The interaction lock. Copy and share triggers are disabled while it is held.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn spacing(&self) -> &Spacing {
        &self.spacing
    }

    /// The transition currently animating, if any.
    pub fn in_flight(&self) -> Option<TransitionHandle> {
        self.in_flight.map(|f| f.handle)
    }

    pub fn toggle(&mut self, panel: PanelId, options: ToggleOptions) -> Vec<Action> {
        if self.locked {
            log::debug!("Toggle of {:?} dropped: interaction locked", panel);
            return Vec::new();
        }
        self.locked = true;

        let peer = self.panel(panel.other());
        if peer.is_expanded() {
            let peer_options = ToggleOptions {
                adjust_sibling_spacing: peer.adjusts_spacing(),
                auto_collapse_after: None,
            };
            let peer_id = peer.id();
            self.pending = Some((panel, options));
            return self.start(peer_id, peer_options);
        }

        self.start(panel, options)
    }

    fn start(&mut self, id: PanelId, options: ToggleOptions) -> Vec<Action> {
        let panel = self.panel_mut(id);
        let expanding = panel.state() == PanelState::Collapsed;
        if expanding {
            panel.set_adjusts_spacing(options.adjust_sibling_spacing);
        }
        let handle = panel.request_toggle();
        let spacing = if options.adjust_sibling_spacing {
            Some(self.spacing.shift(expanding))
        } else {
            None
        };
        self.in_flight = Some(InFlight { handle, options });
        log::debug!(
            "Panel {:?} {}",
            id,
            if expanding { "expanding" } else { "collapsing" }
        );
        vec![Action::Animate {
            handle,
            duration: self.animation_duration,
            spacing,
        }]
    }

    /// Completion callback of an [`Action::Animate`].
    pub fn on_transition_finished(&mut self, handle: TransitionHandle) -> Vec<Action> {
        let options = match self.in_flight.take() {
            Some(in_flight) if in_flight.handle == handle => in_flight.options,
            other => {
                self.in_flight = other;
                log::debug!("Ignoring completion of stale transition {:?}", handle);
                return Vec::new();
            }
        };
        self.panel_mut(handle.panel()).complete(handle);

        // The peer is collapsed now, the requested toggle goes on under the same lock.
        if let Some((next, next_options)) = self.pending.take() {
            return self.start(next, next_options);
        }

        self.locked = false;
        let panel = self.panel(handle.panel());
        match options.auto_collapse_after {
            Some(delay) if panel.is_expanded() => {
                vec![Action::ScheduleCollapse(AutoCollapse {
                    panel: panel.id(),
                    expansion: panel.expansion(),
                    adjust_sibling_spacing: options.adjust_sibling_spacing,
                    delay,
                })]
            }
            _ => Vec::new(),
        }
    }

    /// Fire a deferred collapse, unless the panel was collapsed, or collapsed and re-opened,
    /// since the timer was armed.
    pub fn on_auto_collapse(&mut self, auto: AutoCollapse) -> Vec<Action> {
        let panel = self.panel(auto.panel);
        if !panel.is_expanded() {
            log::debug!("Auto-collapse of {:?} skipped: not expanded", auto.panel);
            return Vec::new();
        }
        if panel.expansion() != auto.expansion {
            log::debug!("Auto-collapse of {:?} skipped: armed for a previous expansion", auto.panel);
            return Vec::new();
        }
        self.toggle(
            auto.panel,
            ToggleOptions {
                adjust_sibling_spacing: auto.adjust_sibling_spacing,
                auto_collapse_after: None,
            },
        )
    }
}
