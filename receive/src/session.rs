use std::sync::Arc;
use std::time::Duration;

use crate::{
    address::{Address, AddressSource, EncodedImage},
    balance::{Balance, BalanceChange, BalanceSource, BalanceSubscription},
    config::PanelConfig,
    coordinator::{Action, AutoCollapse, PanelCoordinator, ToggleOptions},
    panel::{PanelId, TransitionHandle},
};

pub const TITLE: &str = "Receive";
pub const HELP_ARTICLE_ID: &str = "receive-bitcoin";

/// Receives the address when the user copies it. Failures are the sink's business.
pub trait Clipboard {
    fn set_text(&self, text: &str);
}

/// Alternate channels to hand the address over to.
pub trait ShareSink {
    fn send_email(&self, address: &str, image: &EncodedImage);
    fn send_text(&self, address: &str, image: &EncodedImage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareChannel {
    Email,
    Text,
}

/// Everything the host event loop reports back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    BalanceChanged(Balance),
    TransitionFinished(TransitionHandle),
    AutoCollapseDue(AutoCollapse),
}

/// State behind the receive screen: the address on display, its encoding and the panels.
///
/// Address refresh and panel transitions are independent: a refresh may happen in the middle
/// of an animation.
pub struct ReceiveSession {
    source: Arc<dyn AddressSource>,
    address: Address,
    encoding: EncodedImage,
    last_seen: Option<Balance>,
    subscription: Option<BalanceSubscription>,
    panels: PanelCoordinator,
    copied_message_delay: Duration,
}

impl ReceiveSession {
    pub fn new(source: Arc<dyn AddressSource>, config: &PanelConfig) -> Self {
        let address = source.current_address();
        let encoding = source.encode(&address);
        Self {
            source,
            address,
            encoding,
            last_seen: None,
            subscription: None,
            panels: PanelCoordinator::new(config),
            copied_message_delay: config.copied_message_delay(),
        }
    }

    /// Subscribe to the balance. The balance known at this point is the baseline: it does not
    /// trigger a refresh.
    pub fn attach(&mut self, balances: &dyn BalanceSource) {
        if self.subscription.is_some() {
            log::warn!("Receive session is already subscribed to the balance");
            return;
        }
        let subscription = balances.subscribe();
        self.last_seen = subscription.initial();
        self.subscription = Some(subscription);
    }

    /// Drop the balance subscription.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn title(&self) -> &'static str {
        TITLE
    }

    pub fn help_article_id(&self) -> &'static str {
        HELP_ARTICLE_ID
    }

    pub fn current_address(&self) -> &Address {
        &self.address
    }

    pub fn current_encoding(&self) -> &EncodedImage {
        &self.encoding
    }

    pub fn panels(&self) -> &PanelCoordinator {
        &self.panels
    }

    /// Refresh the address if the balance went up since the last notification.
    /// Returns whether the address was refreshed.
    pub fn on_balance_changed(&mut self, new: Balance) -> bool {
        let refresh = matches!(self.last_seen, Some(last) if new > last);
        self.last_seen = Some(new);
        if refresh {
            self.refresh();
        }
        refresh
    }

    fn refresh(&mut self) {
        let address = self.source.current_address();
        self.encoding = self.source.encode(&address);
        log::debug!("Receive address refreshed to {}", address);
        self.address = address;
    }

    /// Process the notifications queued since the last call. Returns how many there were.
    pub fn poll_balance(&mut self) -> usize {
        let mut processed = 0;
        while let Some(change) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            self.on_balance_changed(change.new);
            processed += 1;
        }
        processed
    }

    /// Wait for the next balance notification, to be fed back as [`Event::BalanceChanged`].
    /// Returns `None` right away when not attached.
    pub async fn next_balance_change(&mut self) -> Option<BalanceChange> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => None,
        }
    }

    /// Put the address on the clipboard and show the confirmation. Disabled while a panel is
    /// animating.
    pub fn copy_address(&mut self, clipboard: &dyn Clipboard) -> Vec<Action> {
        if self.panels.is_locked() {
            log::debug!("Address copy ignored: interaction locked");
            return Vec::new();
        }
        clipboard.set_text(self.address.as_str());
        log::info!(target: "receive.copiedAddress", "Receive address copied to clipboard");
        self.panels.toggle(
            PanelId::CopyConfirmation,
            ToggleOptions::copy_confirmation(self.copied_message_delay),
        )
    }

    /// Open or close the share options.
    pub fn toggle_share(&mut self) -> Vec<Action> {
        self.panels.toggle(PanelId::Share, ToggleOptions::share())
    }

    /// Hand the current address and its encoding to `sink`.
    pub fn share_via(&self, channel: ShareChannel, sink: &dyn ShareSink) {
        log::debug!("Sharing receive address via {:?}", channel);
        match channel {
            ShareChannel::Email => sink.send_email(self.address.as_str(), &self.encoding),
            ShareChannel::Text => sink.send_text(self.address.as_str(), &self.encoding),
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::BalanceChanged(balance) => {
                self.on_balance_changed(balance);
                Vec::new()
            }
            Event::TransitionFinished(handle) => self.panels.on_transition_finished(handle),
            Event::AutoCollapseDue(auto) => self.panels.on_auto_collapse(auto),
        }
    }
}

impl std::fmt::Debug for ReceiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ReceiveSession")
            .field("address", &self.address)
            .field("last_seen", &self.last_seen)
            .field("attached", &self.subscription.is_some())
            .field("panels", &self.panels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        balance::BalanceStore,
        panel::PanelState,
        testutils::{MockAddressSource, RecordingClipboard, RecordingShareSink, Sandbox},
    };
    use tokio::time::Instant;

    fn session(source: &Arc<MockAddressSource>) -> ReceiveSession {
        ReceiveSession::new(source.clone(), &PanelConfig::default())
    }

    fn assert_elapsed(start: Instant, millis: u64) {
        let elapsed = start.elapsed();
        let expected = Duration::from_millis(millis);
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(5),
            "elapsed {:?}, expected {:?}",
            elapsed,
            expected
        );
    }

    #[test]
    fn metadata() {
        let source = Arc::new(MockAddressSource::default());
        let session = session(&source);
        assert_eq!(session.title(), "Receive");
        assert_eq!(session.help_article_id(), "receive-bitcoin");
    }

    #[test]
    fn initial_address() {
        let source = Arc::new(MockAddressSource::default());
        let session = session(&source);
        assert_eq!(session.current_address().as_str(), "addr-0");
        assert_eq!(
            session.current_encoding(),
            &source.encode(&Address::new("addr-0"))
        );
        assert_eq!(source.fetches(), 1);
    }

    #[test]
    fn refresh_from_unchanged_then_increase() {
        let source = Arc::new(MockAddressSource::default());
        let mut session = session(&source);
        for balance in [0, 0, 100] {
            session.on_balance_changed(balance);
        }
        assert_eq!(source.fetches(), 2);
        assert_eq!(session.current_address().as_str(), "addr-1");
        assert_eq!(
            session.current_encoding(),
            &source.encode(&Address::new("addr-1"))
        );
    }

    #[test]
    fn refresh_past_new_baseline_after_decrease() {
        let source = Arc::new(MockAddressSource::default());
        let mut session = session(&source);
        assert!(!session.on_balance_changed(100));
        assert!(!session.on_balance_changed(50));
        assert!(session.on_balance_changed(150));
        assert_eq!(source.fetches(), 2);

        // 120 is below the previous value, even though above the first baseline.
        assert!(!session.on_balance_changed(120));
        assert!(session.on_balance_changed(121));
        assert_eq!(source.fetches(), 3);
    }

    #[test]
    fn refresh_iff_increase_over_previous_value() {
        let sequences: &[&[Balance]] = &[
            &[],
            &[5],
            &[0, 1, 2, 3],
            &[10, 9, 8, 7],
            &[3, 1, 4, 1, 5, 9, 2, 6],
            &[u64::MAX, 0, u64::MAX],
        ];
        for sequence in sequences {
            let source = Arc::new(MockAddressSource::default());
            let mut session = session(&source);
            let expected = sequence.windows(2).filter(|w| w[1] > w[0]).count();
            for balance in sequence.iter() {
                session.on_balance_changed(*balance);
            }
            assert_eq!(source.fetches(), 1 + expected, "sequence {:?}", sequence);
        }
    }

    #[test]
    fn subscription_baseline_does_not_refresh() {
        let source = Arc::new(MockAddressSource::default());
        let store = BalanceStore::with_balance(1_000);
        let mut session = session(&source);
        session.attach(&store);
        assert!(session.is_attached());
        assert_eq!(session.poll_balance(), 0);
        assert_eq!(source.fetches(), 1);

        store.set_balance(500);
        store.set_balance(2_000);
        assert_eq!(session.poll_balance(), 2);
        assert_eq!(source.fetches(), 2);
        assert_eq!(session.current_address().as_str(), "addr-1");
    }

    #[test]
    fn first_notification_of_unknown_balance_is_baseline() {
        let source = Arc::new(MockAddressSource::default());
        let store = BalanceStore::new();
        let mut session = session(&source);
        session.attach(&store);
        store.set_balance(10);
        store.set_balance(20);
        session.poll_balance();
        assert_eq!(source.fetches(), 2);
    }

    #[test]
    fn detach_unsubscribes() {
        let source = Arc::new(MockAddressSource::default());
        let store = BalanceStore::with_balance(0);
        let mut session = session(&source);
        session.attach(&store);
        session.attach(&store);
        assert_eq!(store.observers(), 1);

        session.detach();
        assert_eq!(store.observers(), 0);
        store.set_balance(10);
        assert_eq!(session.poll_balance(), 0);

        session.attach(&store);
        assert_eq!(store.observers(), 1);
        drop(session);
        assert_eq!(store.observers(), 0);
    }

    #[tokio::test]
    async fn waits_for_balance_change() {
        let source = Arc::new(MockAddressSource::default());
        let store = Arc::new(BalanceStore::with_balance(0));
        let mut session = session(&source);
        assert_eq!(session.next_balance_change().await, None);

        session.attach(store.as_ref());
        let publisher = store.clone();
        tokio::spawn(async move {
            publisher.set_balance(42);
        });
        let change = session.next_balance_change().await.unwrap();
        assert_eq!(change.new, 42);
        session.handle(Event::BalanceChanged(change.new));
        assert_eq!(source.fetches(), 2);
    }

    #[test]
    fn share_forwards_current_values() {
        let source = Arc::new(MockAddressSource::default());
        let mut session = session(&source);
        let sink = RecordingShareSink::default();

        session.share_via(ShareChannel::Email, &sink);
        session.on_balance_changed(0);
        session.on_balance_changed(1);
        session.share_via(ShareChannel::Text, &sink);

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, ShareChannel::Email);
        assert_eq!(sent[0].1, "addr-0");
        assert_eq!(sent[0].2, source.encode(&Address::new("addr-0")));
        assert_eq!(sent[1].0, ShareChannel::Text);
        assert_eq!(sent[1].1, "addr-1");
        assert_eq!(sent[1].2, source.encode(&Address::new("addr-1")));
        // Sharing does not touch the panels.
        assert!(!session.panels().is_locked());
    }

    #[test]
    fn copy_is_disabled_while_locked() {
        let source = Arc::new(MockAddressSource::default());
        let mut session = session(&source);
        let clipboard = RecordingClipboard::default();

        assert_eq!(session.copy_address(&clipboard).len(), 1);
        assert!(session.panels().is_locked());
        assert!(session.copy_address(&clipboard).is_empty());
        assert!(session.toggle_share().is_empty());
        assert_eq!(clipboard.texts(), vec!["addr-0".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn copy_confirmation_collapses_by_itself() {
        let source = Arc::new(MockAddressSource::default());
        let clipboard = RecordingClipboard::default();
        let mut sandbox = Sandbox::new(session(&source));
        let start = Instant::now();

        let actions = sandbox.session_mut().copy_address(&clipboard);
        sandbox.run(actions);
        assert_eq!(
            sandbox.session().panels().panel(PanelId::CopyConfirmation).state(),
            PanelState::Expanding
        );

        assert!(matches!(
            sandbox.step().await,
            Some(Event::TransitionFinished(_))
        ));
        assert_elapsed(start, 300);
        assert!(sandbox
            .session()
            .panels()
            .panel(PanelId::CopyConfirmation)
            .is_expanded());

        assert!(matches!(sandbox.step().await, Some(Event::AutoCollapseDue(_))));
        assert_elapsed(start, 2_300);
        assert_eq!(
            sandbox.session().panels().panel(PanelId::CopyConfirmation).state(),
            PanelState::Collapsing
        );

        assert!(matches!(
            sandbox.step().await,
            Some(Event::TransitionFinished(_))
        ));
        assert_elapsed(start, 2_600);
        assert_eq!(
            sandbox.session().panels().panel(PanelId::CopyConfirmation).state(),
            PanelState::Collapsed
        );
        assert_eq!(sandbox.step().await, None);
        assert_eq!(clipboard.texts(), vec!["addr-0".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_collapse_beats_auto_collapse() {
        let source = Arc::new(MockAddressSource::default());
        let clipboard = RecordingClipboard::default();
        let mut sandbox = Sandbox::new(session(&source));

        let actions = sandbox.session_mut().copy_address(&clipboard);
        sandbox.run(actions);
        sandbox.step().await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        let actions = sandbox.session_mut().copy_address(&clipboard);
        assert_eq!(actions.len(), 1);
        sandbox.run(actions);
        sandbox.settle().await;

        let copy = sandbox.session().panels().panel(PanelId::CopyConfirmation);
        assert_eq!(copy.state(), PanelState::Collapsed);
        assert_eq!(copy.expansion(), 1);
        assert_eq!(clipboard.texts().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn copy_while_share_is_open() {
        let source = Arc::new(MockAddressSource::default());
        let clipboard = RecordingClipboard::default();
        let mut sandbox = Sandbox::new(session(&source));
        let start = Instant::now();

        let actions = sandbox.session_mut().toggle_share();
        sandbox.run(actions);
        sandbox.settle().await;
        assert!(sandbox.session().panels().panel(PanelId::Share).is_expanded());
        assert_eq!(sandbox.session().panels().spacing().current(), 12.0);

        let actions = sandbox.session_mut().copy_address(&clipboard);
        sandbox.run(actions);
        assert_eq!(
            sandbox.session().panels().panel(PanelId::Share).state(),
            PanelState::Collapsing
        );
        assert_eq!(sandbox.session().panels().spacing().current(), 20.0);
        assert_eq!(
            sandbox.session().panels().panel(PanelId::CopyConfirmation).state(),
            PanelState::Collapsed
        );

        sandbox.step().await;
        assert_elapsed(start, 600);
        assert_eq!(
            sandbox.session().panels().panel(PanelId::Share).state(),
            PanelState::Collapsed
        );
        assert_eq!(
            sandbox.session().panels().panel(PanelId::CopyConfirmation).state(),
            PanelState::Expanding
        );

        sandbox.settle().await;
        assert_elapsed(start, 3_200);
        for id in PanelId::ALL {
            assert_eq!(
                sandbox.session().panels().panel(id).state(),
                PanelState::Collapsed
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_during_animation() {
        let source = Arc::new(MockAddressSource::default());
        let store = BalanceStore::with_balance(0);
        let mut sandbox = Sandbox::new(session(&source));
        sandbox.session_mut().attach(&store);

        let actions = sandbox.session_mut().toggle_share();
        sandbox.run(actions);
        store.set_balance(10);
        assert_eq!(sandbox.session_mut().poll_balance(), 1);
        assert_eq!(
            sandbox.session().current_address().as_str(),
            "addr-1"
        );
        assert_eq!(
            sandbox.session().panels().panel(PanelId::Share).state(),
            PanelState::Expanding
        );

        sandbox.settle().await;
        assert!(sandbox.session().panels().panel(PanelId::Share).is_expanded());
    }
}
