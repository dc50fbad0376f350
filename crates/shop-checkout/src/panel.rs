//! Display state of the payment surfaces.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shop_cart::Money;

/// A payment-method affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodControl {
    /// Method name, sent to the gateway.
    pub name: String,
    /// Enabled controls accept clicks; disabled ones are dimmed.
    pub enabled: bool,
    /// Hidden controls are not shown at all.
    pub visible: bool,
}

impl MethodControl {
    /// Check if the control can currently be used.
    pub fn is_interactive(&self) -> bool {
        self.enabled && self.visible
    }
}

/// The persistent confirmation shown after an accepted payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessBanner {
    /// Method the payment was made with.
    pub method: String,
    /// When the gateway accepted the payment.
    pub confirmed_at: DateTime<Utc>,
}

/// Payment surfaces: method controls, processing indicator, success
/// confirmation and the amount-due displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentPanel {
    methods: Vec<MethodControl>,
    processing: bool,
    success: Option<SuccessBanner>,
    amount_due: Option<Money>,
}

impl PaymentPanel {
    /// Create a panel offering `methods`, all disabled until gated.
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let methods = methods
            .into_iter()
            .map(|name| MethodControl {
                name: name.into(),
                enabled: false,
                visible: true,
            })
            .collect();

        Self {
            methods,
            processing: false,
            success: None,
            amount_due: None,
        }
    }

    /// All method controls.
    pub fn methods(&self) -> &[MethodControl] {
        &self.methods
    }

    /// Find a method control.
    pub fn method(&self, name: &str) -> Option<&MethodControl> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Check if a method is offered.
    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Check if a method can currently be used.
    pub fn is_interactive(&self, name: &str) -> bool {
        self.method(name).map(MethodControl::is_interactive).unwrap_or(false)
    }

    /// Check if every control is disabled.
    pub fn all_disabled(&self) -> bool {
        self.methods.iter().all(|m| !m.enabled)
    }

    /// Enable or disable every control.
    pub fn set_all_enabled(&mut self, enabled: bool) {
        for method in &mut self.methods {
            method.enabled = enabled;
        }
    }

    /// Hide every control except `name`.
    pub fn show_only(&mut self, name: &str) {
        for method in &mut self.methods {
            method.visible = method.name == name;
        }
    }

    /// Check if the processing indicator is shown.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub(crate) fn set_processing(&mut self, processing: bool) {
        self.processing = processing;
    }

    /// The success confirmation, if shown.
    pub fn success(&self) -> Option<&SuccessBanner> {
        self.success.as_ref()
    }

    pub(crate) fn reveal_success(&mut self, method: impl Into<String>) {
        self.success = Some(SuccessBanner {
            method: method.into(),
            confirmed_at: Utc::now(),
        });
    }

    pub(crate) fn hide_success(&mut self) {
        self.success = None;
    }

    /// Amount due, or `None` when the amount-due displays are hidden.
    pub fn amount_due(&self) -> Option<Money> {
        self.amount_due
    }

    /// Show `total` as the amount due; zero hides the displays.
    pub(crate) fn set_amount_due(&mut self, total: Money) {
        self.amount_due = (!total.is_zero()).then_some(total);
    }

    /// Text of the amount-due display.
    pub fn amount_due_label(&self) -> Option<String> {
        self.amount_due
            .map(|total| format!("Amount due: {}", total.display()))
    }

    /// Text of the total-to-pay display.
    pub fn total_to_pay_label(&self) -> Option<String> {
        self.amount_due
            .map(|total| format!("Total to pay: {}", total.display()))
    }
}
