//! Checkout coordinator: payment gating and the payment round-trip.

use std::fmt;
use std::time::Duration;

use shop_cart::{CartStore, LineItem, Money, Notice, PendingRemoval, PriceCatalog};
use shop_storage::{keys, Store};
use tokio_util::sync::CancellationToken;

use crate::error::{CheckoutError, GatewayError};
use crate::gateway::{PaymentGateway, PaymentRequest, PaymentResponse};
use crate::panel::PaymentPanel;

/// Method auto-initiated on the dedicated checkout page.
pub const DEFAULT_AUTO_METHOD: &str = "QRIS";

/// Follow-up contact given after an accepted payment.
pub const DEFAULT_CONTACT: &str = "+62 812-3456-7890";

const GENERIC_REJECTION: &str = "An error occurred.";

/// Checkout behaviour settings.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Method auto-initiated by [`CheckoutCoordinator::auto_trigger`].
    pub auto_method: String,
    /// Contact the customer is sent to after paying.
    pub contact: String,
    /// Upper bound on one gateway call.
    pub timeout: Duration,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            auto_method: DEFAULT_AUTO_METHOD.to_string(),
            contact: DEFAULT_CONTACT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Whether a payment attempt is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentPhase {
    #[default]
    Idle,
    InFlight,
}

/// How a payment attempt that reached the gateway ended.
#[derive(Debug)]
pub enum PaymentOutcome {
    /// The gateway accepted the payment; the cart was cleared.
    Confirmed { method: String, total: Money },
    /// The gateway rejected the payment; the cart is unchanged.
    Rejected { method: String, message: String },
    /// The request failed in transport; the cart is unchanged.
    Failed { method: String, error: GatewayError },
}

impl PaymentOutcome {
    /// Check if the payment went through.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, PaymentOutcome::Confirmed { .. })
    }
}

/// Read the total persisted for pages that do not hold the live cart.
///
/// Missing or unreadable values read as zero.
pub fn stored_total(storage: &Store) -> Money {
    Money::new(storage.get_or_default(keys::TOTAL_PRICE))
}

/// Drives the payment flow from cart state.
///
/// All cart mutations go through the coordinator so the payment gate and
/// the amount due are recomputed after each one.
pub struct CheckoutCoordinator<G: PaymentGateway> {
    store: CartStore,
    gateway: G,
    panel: PaymentPanel,
    settings: CheckoutSettings,
    phase: PaymentPhase,
    cancel: CancellationToken,
    auto_triggered: bool,
}

impl<G: PaymentGateway> CheckoutCoordinator<G> {
    /// Create a coordinator over a (usually restored) cart store and gate
    /// the panel for the current cart.
    pub fn new<I, S>(store: CartStore, gateway: G, methods: I, settings: CheckoutSettings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut coordinator = Self {
            store,
            gateway,
            panel: PaymentPanel::new(methods),
            settings,
            phase: PaymentPhase::Idle,
            cancel: CancellationToken::new(),
            auto_triggered: false,
        };
        coordinator.refresh();
        coordinator
    }

    /// The cart store.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// The payment surfaces.
    pub fn panel(&self) -> &PaymentPanel {
        &self.panel
    }

    /// The gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Current payment phase.
    pub fn phase(&self) -> PaymentPhase {
        self.phase
    }

    /// Token that aborts the current (or next) payment attempt when
    /// cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Add one unit of a service at `unit_price`.
    pub fn add_item(
        &mut self,
        service: &str,
        spec: &str,
        unit_price: Money,
    ) -> Result<LineItem, CheckoutError> {
        let item = self.store.add(service, spec, unit_price)?.clone();
        self.refresh();
        Ok(item)
    }

    /// Add one unit of a service priced from `catalog`.
    pub fn add_from_catalog<C>(
        &mut self,
        catalog: &C,
        service: &str,
        spec: &str,
    ) -> Result<LineItem, CheckoutError>
    where
        C: PriceCatalog + ?Sized,
    {
        let item = self.store.add_from_catalog(catalog, service, spec)?.clone();
        self.refresh();
        Ok(item)
    }

    /// Ask to remove the line item at `index`.
    pub fn request_removal(&self, index: usize) -> Result<PendingRemoval, CheckoutError> {
        Ok(self.store.request_removal(index)?)
    }

    /// Carry out a confirmed removal and recompute derived state.
    pub fn confirm_removal(&mut self, pending: PendingRemoval) -> Result<LineItem, CheckoutError> {
        let removed = self.store.confirm_removal(pending)?;
        self.refresh();
        Ok(removed)
    }

    /// Drop a declined removal.
    pub fn cancel_removal(&self, pending: PendingRemoval) {
        self.store.cancel_removal(pending);
    }

    /// Reload the cart from storage and recompute derived state.
    pub fn hydrate(&mut self) {
        self.store.restore();
        self.refresh();
    }

    /// Re-run the payment gate and the amount-due projection.
    pub fn refresh(&mut self) {
        self.payment_gate();
        self.payment_amount();
    }

    /// Enable payment methods for a non-empty cart; disable them and hide
    /// any earlier confirmation for an empty one.
    pub fn payment_gate(&mut self) {
        if self.store.is_empty() {
            self.panel.set_all_enabled(false);
            self.panel.hide_success();
        } else {
            self.panel.set_all_enabled(true);
        }
    }

    /// Project the cart total into the amount-due displays and storage.
    pub fn payment_amount(&mut self) {
        let total = self.store.total();
        if let Err(e) = self.store.storage().set(keys::TOTAL_PRICE, &total.amount()) {
            tracing::warn!(error = %e, "failed to persist total price");
        }
        self.panel.set_amount_due(total);
    }

    /// Hand the cart over to the payment page.
    pub fn proceed_to_payment(&self) -> Result<(), CheckoutError> {
        if self.store.is_empty() {
            self.store.notifier().notify(&Notice::alert(
                "Your cart is empty. Please add a service before proceeding to payment.",
            ));
            return Err(CheckoutError::EmptyCart);
        }
        self.store.persist()?;
        Ok(())
    }

    /// Pay for the cart with `method`.
    ///
    /// Precondition failures (empty cart, attempt already in flight,
    /// unknown method) return an error without touching any state or the
    /// network. Once the request is sent every ending is reported as a
    /// [`PaymentOutcome`], and the panel is back to its gated state.
    pub async fn initiate_payment(&mut self, method: &str) -> Result<PaymentOutcome, CheckoutError> {
        if self.store.is_empty() {
            self.store
                .notifier()
                .notify(&Notice::alert(CheckoutError::EmptyCart.to_string()));
            return Err(CheckoutError::EmptyCart);
        }
        if self.phase == PaymentPhase::InFlight {
            return Err(CheckoutError::PaymentInProgress);
        }
        if !self.panel.has_method(method) {
            return Err(CheckoutError::UnknownMethod(method.to_string()));
        }
        if !self.panel.is_interactive(method) {
            return Err(CheckoutError::MethodUnavailable(method.to_string()));
        }

        self.phase = PaymentPhase::InFlight;
        self.panel.set_all_enabled(false);
        self.panel.hide_success();
        self.panel.set_processing(true);

        let request = PaymentRequest::new(self.store.items().to_vec(), method);
        let total = self.store.total();
        tracing::info!(method, items = request.cart.len(), total = total.amount(), "payment initiated");

        let result = self.authorize(&request).await;
        self.panel.set_processing(false);

        let outcome = match result {
            Ok(resp) if resp.success => {
                self.store.clear();
                self.refresh();
                self.panel.reveal_success(method);
                self.store.notifier().notify(&Notice::success(format!(
                    "Payment processed successfully. Please contact {} and bring your proof of purchase.",
                    self.settings.contact
                )));
                tracing::info!(method, total = total.amount(), "payment confirmed");
                PaymentOutcome::Confirmed {
                    method: method.to_string(),
                    total,
                }
            }
            Ok(resp) => {
                let message = resp
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_REJECTION.to_string());
                self.payment_gate();
                self.store
                    .notifier()
                    .notify(&Notice::error(format!("Payment failed: {}", message)));
                tracing::warn!(method, reason = %message, "payment rejected");
                PaymentOutcome::Rejected {
                    method: method.to_string(),
                    message,
                }
            }
            Err(error) => {
                self.payment_gate();
                self.store
                    .notifier()
                    .notify(&Notice::error(format!("Failed to process payment: {}", error)));
                tracing::warn!(method, error = %error, "payment request failed");
                PaymentOutcome::Failed {
                    method: method.to_string(),
                    error,
                }
            }
        };

        self.phase = PaymentPhase::Idle;
        Ok(outcome)
    }

    /// Recover after an `initiate_payment` future was dropped before it
    /// finished, which leaves the phase `InFlight`. Prefer
    /// [`cancel_token`](Self::cancel_token) for aborting an attempt.
    ///
    /// Returns `false` if no attempt was outstanding.
    pub fn abandon_payment(&mut self) -> bool {
        if self.phase != PaymentPhase::InFlight {
            return false;
        }
        self.panel.set_processing(false);
        self.payment_gate();
        self.phase = PaymentPhase::Idle;
        self.store.notifier().notify(&Notice::error(format!(
            "Failed to process payment: {}",
            GatewayError::Cancelled
        )));
        tracing::warn!("abandoned payment attempt reset");
        true
    }

    /// Checkout-page behaviour: if the auto method is offered, hide every
    /// other method and pay with it. Runs at most once per coordinator.
    pub async fn auto_trigger(&mut self) -> Option<Result<PaymentOutcome, CheckoutError>> {
        if self.auto_triggered {
            return None;
        }
        let method = self.settings.auto_method.clone();
        if !self.panel.has_method(&method) {
            return None;
        }

        self.auto_triggered = true;
        self.panel.show_only(&method);
        tracing::debug!(method = %method, "auto-initiating payment");
        Some(self.initiate_payment(&method).await)
    }

    async fn authorize(
        &mut self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, GatewayError> {
        let timeout = self.settings.timeout;
        let cancel = self.cancel.clone();

        let result = tokio::select! {
            res = tokio::time::timeout(timeout, self.gateway.authorize(request)) => {
                res.unwrap_or(Err(GatewayError::Timeout(timeout)))
            }
            _ = cancel.cancelled() => Err(GatewayError::Cancelled),
        };

        if cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
        result
    }
}

impl<G: PaymentGateway> fmt::Debug for CheckoutCoordinator<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutCoordinator")
            .field("store", &self.store)
            .field("panel", &self.panel)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use shop_cart::{MemoryNotifier, Severity};
    use shop_storage::MemoryBackend;

    #[derive(Default)]
    struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<PaymentResponse, GatewayError>>>,
        requests: Mutex<Vec<PaymentRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedGateway {
        fn replying(response: Result<PaymentResponse, GatewayError>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from([response])),
                ..Self::default()
            }
        }

        fn hanging() -> Self {
            Self {
                delay: Some(Duration::from_secs(10)),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PaymentGateway for ScriptedGateway {
        async fn authorize(&self, request: &PaymentRequest) -> Result<PaymentResponse, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let next = self.responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(PaymentResponse::accepted()))
        }
    }

    struct Harness {
        checkout: CheckoutCoordinator<ScriptedGateway>,
        storage: Store,
        notifier: Arc<MemoryNotifier>,
    }

    fn harness(gateway: ScriptedGateway) -> Harness {
        harness_with(gateway, CheckoutSettings::default())
    }

    fn harness_with(gateway: ScriptedGateway, settings: CheckoutSettings) -> Harness {
        let storage = Store::new(MemoryBackend::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let store = CartStore::open(storage.clone(), notifier.clone());
        let checkout = CheckoutCoordinator::new(store, gateway, ["QRIS", "BCA", "OVO"], settings);
        Harness {
            checkout,
            storage,
            notifier,
        }
    }

    fn fill(checkout: &mut CheckoutCoordinator<ScriptedGateway>) {
        checkout
            .add_item("Hosting", "Standard", Money::new(600_000))
            .unwrap();
        checkout.add_item("Domain", "", Money::new(150_000)).unwrap();
    }

    #[test]
    fn test_empty_cart_gates_everything() {
        let h = harness(ScriptedGateway::default());
        assert!(h.checkout.panel().all_disabled());
        assert!(h.checkout.panel().amount_due().is_none());
        assert_eq!(stored_total(&h.storage), Money::zero());
    }

    #[test]
    fn test_add_opens_gate_and_sets_amount() {
        let mut h = harness(ScriptedGateway::default());
        fill(&mut h.checkout);

        assert!(h.checkout.panel().is_interactive("QRIS"));
        assert_eq!(h.checkout.panel().amount_due(), Some(Money::new(750_000)));
        assert_eq!(stored_total(&h.storage), Money::new(750_000));
        assert_eq!(
            h.storage.get_raw(keys::TOTAL_PRICE).unwrap().as_deref(),
            Some("750000")
        );
    }

    #[test]
    fn test_removing_last_item_closes_gate() {
        let mut h = harness(ScriptedGateway::default());
        h.checkout.add_item("Domain", "", Money::new(150_000)).unwrap();

        let pending = h.checkout.request_removal(0).unwrap();
        h.checkout.confirm_removal(pending).unwrap();

        assert!(h.checkout.store().is_empty());
        assert!(h.checkout.store().total().is_zero());
        assert!(h.checkout.panel().all_disabled());
        assert!(h.checkout.panel().amount_due_label().is_none());
        assert!(h.checkout.panel().total_to_pay_label().is_none());
    }

    #[test]
    fn test_removal_recomputes_total() {
        let mut h = harness(ScriptedGateway::default());
        fill(&mut h.checkout);

        let pending = h.checkout.request_removal(1).unwrap();
        h.checkout.confirm_removal(pending).unwrap();
        assert_eq!(h.checkout.panel().amount_due(), Some(Money::new(600_000)));
        assert_eq!(stored_total(&h.storage), Money::new(600_000));
    }

    #[test]
    fn test_hydrate_picks_up_stored_cart() {
        let mut h = harness(ScriptedGateway::default());
        assert!(h.checkout.panel().all_disabled());

        // Another session wrote to the same storage
        let mut other = CartStore::open(h.storage.clone(), h.notifier.clone());
        other.add("Domain", "", Money::new(150_000)).unwrap();

        h.checkout.hydrate();
        assert_eq!(h.checkout.store().len(), 1);
        assert!(h.checkout.panel().is_interactive("BCA"));
        assert_eq!(h.checkout.panel().amount_due(), Some(Money::new(150_000)));
    }

    #[test]
    fn test_proceed_to_payment() {
        let mut h = harness(ScriptedGateway::default());
        assert!(matches!(
            h.checkout.proceed_to_payment(),
            Err(CheckoutError::EmptyCart)
        ));
        assert!(h.notifier.last().unwrap().blocking);

        fill(&mut h.checkout);
        h.checkout.proceed_to_payment().unwrap();
    }

    #[tokio::test]
    async fn test_empty_cart_payment_is_refused() {
        let mut h = harness(ScriptedGateway::default());
        let panel_before = h.checkout.panel().clone();

        let err = h.checkout.initiate_payment("QRIS").await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(h.checkout.gateway().calls(), 0);
        assert_eq!(h.checkout.panel(), &panel_before);
        assert_eq!(h.checkout.phase(), PaymentPhase::Idle);

        let notice = h.notifier.last().unwrap();
        assert!(notice.blocking);
    }

    #[tokio::test]
    async fn test_unknown_method_is_refused() {
        let mut h = harness(ScriptedGateway::default());
        fill(&mut h.checkout);

        let err = h.checkout.initiate_payment("Bitcoin").await.unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownMethod(ref m) if m == "Bitcoin"));
        assert_eq!(h.checkout.gateway().calls(), 0);
    }

    #[tokio::test]
    async fn test_confirmed_payment_clears_cart() {
        let mut h = harness(ScriptedGateway::replying(Ok(PaymentResponse::accepted())));
        fill(&mut h.checkout);

        let outcome = h.checkout.initiate_payment("BCA").await.unwrap();
        match outcome {
            PaymentOutcome::Confirmed { method, total } => {
                assert_eq!(method, "BCA");
                assert_eq!(total, Money::new(750_000));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let sent = h.checkout.gateway().requests.lock().unwrap()[0].clone();
        assert_eq!(sent.payment_method, "BCA");
        assert_eq!(sent.cart.len(), 2);

        assert!(h.checkout.store().is_empty());
        assert!(h.checkout.panel().amount_due().is_none());
        assert!(!h.checkout.panel().is_processing());
        assert_eq!(h.checkout.panel().success().unwrap().method, "BCA");
        assert_eq!(stored_total(&h.storage), Money::zero());

        let notice = h.notifier.last().unwrap();
        assert_eq!(notice.severity, Severity::Success);
        assert!(notice.message.contains(DEFAULT_CONTACT));
    }

    #[tokio::test]
    async fn test_rejected_payment_keeps_cart() {
        let mut h = harness(ScriptedGateway::replying(Ok(PaymentResponse::rejected(
            "insufficient quota",
        ))));
        fill(&mut h.checkout);
        let before = h.checkout.store().cart().clone();

        let outcome = h.checkout.initiate_payment("QRIS").await.unwrap();
        assert!(matches!(outcome, PaymentOutcome::Rejected { ref message, .. } if message == "insufficient quota"));

        assert_eq!(h.checkout.store().cart(), &before);
        assert!(h.checkout.panel().is_interactive("QRIS"));
        assert!(h.checkout.panel().success().is_none());

        let notice = h.notifier.last().unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert!(notice.message.contains("insufficient quota"));
    }

    #[tokio::test]
    async fn test_rejection_without_message_is_generic() {
        let mut h = harness(ScriptedGateway::replying(Ok(PaymentResponse::default())));
        fill(&mut h.checkout);

        h.checkout.initiate_payment("QRIS").await.unwrap();
        assert_eq!(
            h.notifier.last().unwrap().message,
            format!("Payment failed: {}", GENERIC_REJECTION)
        );
    }

    #[tokio::test]
    async fn test_transport_failure_restores_controls() {
        let mut h = harness(ScriptedGateway::replying(Err(GatewayError::Http {
            status: 502,
            url: "http://gateway".to_string(),
        })));
        fill(&mut h.checkout);

        let outcome = h.checkout.initiate_payment("OVO").await.unwrap();
        assert!(matches!(
            outcome,
            PaymentOutcome::Failed { error: GatewayError::Http { status: 502, .. }, .. }
        ));
        assert_eq!(h.checkout.store().len(), 2);
        assert!(h.checkout.panel().is_interactive("OVO"));
        assert!(!h.checkout.panel().is_processing());
        assert!(h.notifier.last().unwrap().message.contains("502"));
    }

    #[tokio::test]
    async fn test_timeout_is_a_transport_failure() {
        let settings = CheckoutSettings {
            timeout: Duration::from_millis(50),
            ..CheckoutSettings::default()
        };
        let mut h = harness_with(ScriptedGateway::hanging(), settings);
        fill(&mut h.checkout);

        let outcome = h.checkout.initiate_payment("QRIS").await.unwrap();
        assert!(matches!(
            outcome,
            PaymentOutcome::Failed { error: GatewayError::Timeout(_), .. }
        ));
        assert_eq!(h.checkout.phase(), PaymentPhase::Idle);
        assert_eq!(h.checkout.store().len(), 2);
        assert!(h.checkout.panel().is_interactive("QRIS"));
    }

    #[tokio::test]
    async fn test_cancellation() {
        let mut h = harness(ScriptedGateway::hanging());
        fill(&mut h.checkout);

        let token = h.checkout.cancel_token();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });

        let outcome = h.checkout.initiate_payment("QRIS").await.unwrap();
        canceller.await.unwrap();

        assert!(matches!(
            outcome,
            PaymentOutcome::Failed { error: GatewayError::Cancelled, .. }
        ));
        assert_eq!(h.checkout.store().len(), 2);
        // A fresh token guards the next attempt
        assert!(!h.checkout.cancel_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_in_flight_guard() {
        let mut h = harness(ScriptedGateway::hanging());
        fill(&mut h.checkout);

        // Drop the attempt while it is waiting on the gateway
        let abandoned = tokio::time::timeout(
            Duration::from_millis(20),
            h.checkout.initiate_payment("QRIS"),
        )
        .await;
        assert!(abandoned.is_err());
        assert_eq!(h.checkout.phase(), PaymentPhase::InFlight);
        assert!(h.checkout.panel().is_processing());
        assert!(h.checkout.panel().all_disabled());

        let err = h.checkout.initiate_payment("QRIS").await.unwrap_err();
        assert!(matches!(err, CheckoutError::PaymentInProgress));
        assert_eq!(h.checkout.gateway().calls(), 1);

        assert!(h.checkout.abandon_payment());
        assert_eq!(h.checkout.phase(), PaymentPhase::Idle);
        assert!(!h.checkout.panel().is_processing());
        assert!(h.checkout.panel().is_interactive("QRIS"));
        assert!(!h.checkout.abandon_payment());
    }

    #[tokio::test]
    async fn test_auto_trigger_runs_once() {
        let mut h = harness(ScriptedGateway::replying(Ok(PaymentResponse::rejected("later"))));
        fill(&mut h.checkout);

        let first = h.checkout.auto_trigger().await;
        assert!(matches!(first, Some(Ok(PaymentOutcome::Rejected { ref method, .. })) if method == "QRIS"));

        let panel = h.checkout.panel();
        assert!(panel.method("QRIS").unwrap().visible);
        assert!(!panel.method("BCA").unwrap().visible);
        assert!(!panel.method("OVO").unwrap().visible);

        assert!(h.checkout.auto_trigger().await.is_none());
        assert_eq!(h.checkout.gateway().calls(), 1);
    }

    #[tokio::test]
    async fn test_hidden_method_cannot_pay() {
        let mut h = harness(ScriptedGateway::replying(Ok(PaymentResponse::rejected("later"))));
        fill(&mut h.checkout);
        h.checkout.auto_trigger().await;
        assert!(!h.checkout.panel().is_interactive("BCA"));

        let err = h.checkout.initiate_payment("BCA").await.unwrap_err();
        assert!(matches!(err, CheckoutError::MethodUnavailable(ref m) if m == "BCA"));
        assert_eq!(h.checkout.gateway().calls(), 1);
        assert_eq!(h.checkout.phase(), PaymentPhase::Idle);
        assert_eq!(h.checkout.store().len(), 2);
        assert!(h.checkout.panel().is_interactive("QRIS"));
    }

    #[tokio::test]
    async fn test_auto_trigger_needs_method() {
        let settings = CheckoutSettings {
            auto_method: "GoPay".to_string(),
            ..CheckoutSettings::default()
        };
        let mut h = harness_with(ScriptedGateway::default(), settings);
        fill(&mut h.checkout);

        assert!(h.checkout.auto_trigger().await.is_none());
        assert!(h.checkout.panel().method("BCA").unwrap().visible);
        assert_eq!(h.checkout.gateway().calls(), 0);
    }

    #[tokio::test]
    async fn test_new_payment_hides_old_confirmation() {
        let mut h = harness(ScriptedGateway::default());
        h.checkout.add_item("Domain", "", Money::new(150_000)).unwrap();
        h.checkout.initiate_payment("QRIS").await.unwrap();
        assert!(h.checkout.panel().success().is_some());

        // The confirmation outlives the next add
        h.checkout.add_item("Domain", "", Money::new(150_000)).unwrap();
        assert!(h.checkout.panel().success().is_some());

        // Next attempt hides it; a transport failure keeps it hidden
        h.checkout
            .gateway()
            .responses
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::Connection("reset".to_string())));
        h.checkout.initiate_payment("QRIS").await.unwrap();
        assert!(h.checkout.panel().success().is_none());
    }
}
