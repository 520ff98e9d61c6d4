/// The two coordinated panels of the receive screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    /// "Copied to clipboard" message shown under the address.
    CopyConfirmation,
    /// Email / text share options shown under the share button.
    Share,
}

impl PanelId {
    pub const ALL: [PanelId; 2] = [PanelId::CopyConfirmation, PanelId::Share];

    /// The panel this one is mutually exclusive with.
    pub fn other(self) -> Self {
        match self {
            Self::CopyConfirmation => Self::Share,
            Self::Share => Self::CopyConfirmation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

impl PanelState {
    pub fn is_transitioning(self) -> bool {
        matches!(self, Self::Expanding | Self::Collapsing)
    }

    /// Expanded or on its way in or out.
    pub fn is_open(self) -> bool {
        self != Self::Collapsed
    }
}

/// Identifies one call to [`AlertPanel::request_toggle`]. It resolves the transition when handed
/// back to [`AlertPanel::complete`], at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionHandle {
    panel: PanelId,
    generation: u64,
    expanding: bool,
}

impl TransitionHandle {
    pub fn panel(&self) -> PanelId {
        self.panel
    }

    pub fn is_expanding(&self) -> bool {
        self.expanding
    }
}

/// An expandable region with a content slot.
///
/// The panel does not protect itself against toggles requested mid-animation; the
/// [`crate::PanelCoordinator`] owning it does.
#[derive(Debug, Clone)]
pub struct AlertPanel {
    id: PanelId,
    state: PanelState,
    content_visible: bool,
    generation: u64,
    expansions: u64,
    adjusts_spacing: bool,
}

impl AlertPanel {
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            state: PanelState::Collapsed,
            content_visible: true,
            generation: 0,
            expansions: 0,
            adjusts_spacing: false,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == PanelState::Expanded
    }

    /// Whether the content slot is shown. Hidden for the whole collapse animation.
    pub fn content_visible(&self) -> bool {
        self.content_visible
    }

    /// Counts the expansions started so far, identifies the current one.
    pub fn expansion(&self) -> u64 {
        self.expansions
    }

    /// Whether the panel moved the shared spacing boundary when it was last opened.
    pub fn adjusts_spacing(&self) -> bool {
        self.adjusts_spacing
    }

    pub(crate) fn set_adjusts_spacing(&mut self, adjusts: bool) {
        self.adjusts_spacing = adjusts;
    }

    /// Start the animation toward the opposite steady state.
    ///
    /// Must only be called while `Collapsed` or `Expanded`.
    pub fn request_toggle(&mut self) -> TransitionHandle {
        debug_assert!(!self.state.is_transitioning());
        let expanding = self.state == PanelState::Collapsed;
        if expanding {
            self.state = PanelState::Expanding;
            self.expansions += 1;
        } else {
            self.state = PanelState::Collapsing;
            self.content_visible = false;
        }
        self.generation += 1;
        TransitionHandle {
            panel: self.id,
            generation: self.generation,
            expanding,
        }
    }

    /// Animation completion. Flips to the steady state the handle was heading to.
    /// Returns false, without touching the panel, for a handle that is not the one in flight.
    pub fn complete(&mut self, handle: TransitionHandle) -> bool {
        if handle.panel != self.id
            || handle.generation != self.generation
            || !self.state.is_transitioning()
        {
            return false;
        }
        self.state = if handle.expanding {
            PanelState::Expanded
        } else {
            PanelState::Collapsed
        };
        self.content_visible = true;
        true
    }
}
