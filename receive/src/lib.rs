pub mod address;
pub mod balance;
pub mod config;
pub mod coordinator;
pub mod panel;
pub mod session;

#[cfg(test)]
mod testutils;

pub use address::{Address, AddressSource, EncodedImage};
pub use balance::{Balance, BalanceChange, BalanceSource, BalanceStore, BalanceSubscription};
pub use coordinator::{Action, AutoCollapse, PanelCoordinator, Spacing, SpacingChange, ToggleOptions};
pub use panel::{AlertPanel, PanelId, PanelState, TransitionHandle};
pub use session::{Clipboard, Event, ReceiveSession, ShareChannel, ShareSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

pub const VERSION: Version = Version {
    major: 1,
    minor: 0,
    patch: 0,
};
