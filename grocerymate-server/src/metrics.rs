//! Prometheus metrics for feasibility checks and AI usage.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use std::sync::Arc;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct AiRequestLabel {
    pub endpoint: &'static str,
    pub outcome: &'static str,
}

impl prometheus_client::encoding::EncodeLabelSet for AiRequestLabel {
    fn encode(
        &self,
        mut encoder: prometheus_client::encoding::LabelSetEncoder,
    ) -> Result<(), std::fmt::Error> {
        use prometheus_client::encoding::EncodeLabel;
        ("endpoint", self.endpoint).encode(encoder.encode_label())?;
        ("outcome", self.outcome).encode(encoder.encode_label())?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppMetrics {
    pub recipes_checked: Counter,
    pub recipes_feasible: Counter,
    pub ai_requests: Family<AiRequestLabel, Counter>,
    pub registry: Arc<Registry>,
}

impl AppMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let recipes_checked = Counter::default();
        registry.register(
            "grocerymate_recipes_checked",
            "Recipes evaluated against an inventory",
            recipes_checked.clone(),
        );

        let recipes_feasible = Counter::default();
        registry.register(
            "grocerymate_recipes_feasible",
            "Evaluated recipes that could be made from inventory",
            recipes_feasible.clone(),
        );

        let ai_requests = Family::<AiRequestLabel, Counter>::default();
        registry.register(
            "grocerymate_ai_requests",
            "AI requests by endpoint and outcome",
            ai_requests.clone(),
        );

        Self {
            recipes_checked,
            recipes_feasible,
            ai_requests,
            registry: Arc::new(registry),
        }
    }

    pub fn record_checks<'a>(&self, reports: impl IntoIterator<Item = &'a grocerymate_core::FeasibilityReport>) {
        for report in reports {
            self.recipes_checked.inc();
            if report.can_make {
                self.recipes_feasible.inc();
            }
        }
    }

    pub fn record_ai<T, E>(&self, endpoint: &'static str, result: &Result<T, E>) {
        let outcome = if result.is_ok() { "success" } else { "error" };
        self.ai_requests
            .get_or_create(&AiRequestLabel { endpoint, outcome })
            .inc();
    }

    /// Encode all metrics as Prometheus text format.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buf = String::new();
        encode(&mut buf, &self.registry)?;
        Ok(buf)
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}
