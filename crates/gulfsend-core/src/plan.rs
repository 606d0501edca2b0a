use serde::Serialize;

use crate::registry::ApiKeyRegistry;

pub const DEFAULT_PLAN_NAME: &str = "Researcher";
pub const DEFAULT_PLAN_LIMIT: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub name: String,
    /// API requests allowed per month.
    pub monthly_limit: u64,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAN_NAME.into(),
            monthly_limit: DEFAULT_PLAN_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanUsage {
    pub used: u64,
    pub limit: u64,
}

impl PlanUsage {
    pub fn from_registry(plan: &Plan, registry: &ApiKeyRegistry) -> Self {
        Self {
            used: registry.total_usage(),
            limit: plan.monthly_limit,
        }
    }

    /// Fraction of the limit consumed, clamped to `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.limit == 0 {
            return 1.0;
        }
        (self.used as f64 / self.limit as f64).clamp(0.0, 1.0)
    }

    /// `24 / 1,000 Requests`
    pub fn label(&self) -> String {
        format!(
            "{} / {} Requests",
            group_thousands(self.used),
            group_thousands(self.limit)
        )
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
