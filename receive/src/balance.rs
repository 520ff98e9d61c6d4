use std::sync::Mutex;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Wallet balance in the smallest unit. It may go down as well as up.
pub type Balance = u64;

/// A balance notification. Only emitted when `old != new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceChange {
    pub old: Option<Balance>,
    pub new: Balance,
}

/// Publishes the wallet balance whenever it changes.
pub trait BalanceSource {
    fn subscribe(&self) -> BalanceSubscription;
}

/// Registration with a [`BalanceSource`].
///
/// This is the unsubscribe handle: dropping it tears the subscription down, and the source
/// stops delivering to it.
#[derive(Debug)]
pub struct BalanceSubscription {
    initial: Option<Balance>,
    receiver: UnboundedReceiver<BalanceChange>,
}

impl BalanceSubscription {
    pub fn new(initial: Option<Balance>, receiver: UnboundedReceiver<BalanceChange>) -> Self {
        Self { initial, receiver }
    }

    /// The balance known to the source at the time of subscription, if any.
    pub fn initial(&self) -> Option<Balance> {
        self.initial
    }

    /// Pop the next pending notification without waiting.
    pub fn try_next(&mut self) -> Option<BalanceChange> {
        match self.receiver.try_recv() {
            Ok(change) => Some(change),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::debug!("Balance source is gone");
                None
            }
        }
    }

    /// Wait for the next notification. Returns `None` once the source is dropped.
    pub async fn next(&mut self) -> Option<BalanceChange> {
        self.receiver.recv().await
    }
}

impl Drop for BalanceSubscription {
    fn drop(&mut self) {
        self.receiver.close();
        log::debug!("Balance subscription torn down");
    }
}

#[derive(Debug, Default)]
struct StoreState {
    balance: Option<Balance>,
    observers: Vec<UnboundedSender<BalanceChange>>,
}

/// In-process [`BalanceSource`] holding the latest known balance.
#[derive(Debug, Default)]
pub struct BalanceStore {
    state: Mutex<StoreState>,
}

impl BalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: Balance) -> Self {
        Self {
            state: Mutex::new(StoreState {
                balance: Some(balance),
                observers: Vec::new(),
            }),
        }
    }

    pub fn balance(&self) -> Option<Balance> {
        self.state.lock().expect("poisoned").balance
    }

    /// Record a new balance. Observers are notified only if the value changed.
    /// Returns whether a notification was published.
    pub fn set_balance(&self, new: Balance) -> bool {
        let mut state = self.state.lock().expect("poisoned");
        if state.balance == Some(new) {
            return false;
        }
        let change = BalanceChange {
            old: state.balance,
            new,
        };
        state.balance = Some(new);
        state
            .observers
            .retain(|observer| observer.send(change).is_ok());
        log::debug!(
            "Balance changed from {:?} to {}, {} observer(s) notified",
            change.old,
            change.new,
            state.observers.len()
        );
        true
    }

    /// Number of observers still registered.
    pub fn observers(&self) -> usize {
        let mut state = self.state.lock().expect("poisoned");
        state.observers.retain(|observer| !observer.is_closed());
        state.observers.len()
    }
}

impl BalanceSource for BalanceStore {
    fn subscribe(&self) -> BalanceSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.state.lock().expect("poisoned");
        state.observers.push(sender);
        BalanceSubscription::new(state.balance, receiver)
    }
}
