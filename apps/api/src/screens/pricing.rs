use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Annual,
}

#[derive(Debug, Clone, Serialize)]
pub struct PricingPlan {
    pub plan: &'static str,
    pub price: &'static str,
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub featured: bool,
    pub call_to_action: &'static str,
}

const FREE_FEATURES: &[&str] = &[
    "5 Text-based mock interviews per month",
    "Basic resume critique",
    "1 Skill assessment per month",
    "Limited question bank",
];

const PRO_FEATURES: &[&str] = &[
    "Unlimited text & voice interviews",
    "Advanced voice analysis (pace, filler words)",
    "Unlimited resume reviews & tailoring",
    "Unlimited skill assessments",
    "Personalized learning paths",
    "Full question bank access",
];

const ENTERPRISE_FEATURES: &[&str] = &[
    "All Pro features",
    "Bulk candidate assessments",
    "Analytics and reporting dashboard",
    "Custom branding",
    "Dedicated support",
];

/// Free, Pro and Enterprise. Only Pro's price depends on the billing cycle.
pub fn plans(cycle: BillingCycle) -> Vec<PricingPlan> {
    let pro_price = match cycle {
        BillingCycle::Monthly => "$29",
        BillingCycle::Annual => "$23",
    };
    vec![
        PricingPlan {
            plan: "Free",
            price: "$0",
            period: "/ month",
            description: "For casual practice and getting started.",
            features: FREE_FEATURES,
            featured: false,
            call_to_action: "Current Plan",
        },
        PricingPlan {
            plan: "Pro",
            price: pro_price,
            period: "/ month",
            description: "Unlock your full potential and land your dream job faster.",
            features: PRO_FEATURES,
            featured: true,
            call_to_action: "Get Started",
        },
        PricingPlan {
            plan: "Enterprise",
            price: "Custom",
            period: "",
            description: "For teams, bootcamps, and recruiters.",
            features: ENTERPRISE_FEATURES,
            featured: false,
            call_to_action: "Get Started",
        },
    ]
}
