//! Keyword-based ministry routing for inbound citizen reports.
//!
//! The rule table is priority-ordered: the first rule whose keyword set
//! intersects the input wins, so declaration order is a load-bearing
//! invariant. Matching is case-insensitive substring containment.

/// A single routing rule: a ministry label and the keywords that select it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoutingRule {
    pub ministry: &'static str,
    pub keywords: &'static [&'static str],
}

/// Category reported when no rule matches.
pub const DEFAULT_MINISTRY: &str = "General";

/// Ordered rule table. Earlier rules shadow later ones when an input
/// mentions keywords from both.
pub const MINISTRY_RULES: &[RoutingRule] = &[
    RoutingRule {
        ministry: "Ministry of Finance",
        keywords: &["budget", "taxation", "tax refund", "fiscal", "revenue", "customs duty"],
    },
    RoutingRule {
        ministry: "Ministry of Health",
        keywords: &["hospital", "clinic", "vaccine", "disease", "medicine", "health"],
    },
    RoutingRule {
        ministry: "Ministry of Education",
        keywords: &["school", "university", "curriculum", "teacher", "student", "education"],
    },
    RoutingRule {
        ministry: "Ministry of Defense",
        keywords: &["military", "armed forces", "defense", "soldier", "barracks"],
    },
    RoutingRule {
        ministry: "Ministry of Foreign Affairs",
        keywords: &["embassy", "diplomat", "treaty", "consulate", "foreign affairs"],
    },
    RoutingRule {
        ministry: "Ministry of Interior",
        keywords: &["police", "crime", "theft", "law enforcement", "civil defense"],
    },
    RoutingRule {
        ministry: "Ministry of Justice",
        keywords: &["court", "judge", "prison", "lawsuit", "legal aid"],
    },
    RoutingRule {
        ministry: "Ministry of Agriculture",
        keywords: &["farm", "crop", "harvest", "livestock", "agriculture", "food security"],
    },
    RoutingRule {
        ministry: "Ministry of Environment",
        keywords: &["pollution", "climate", "wildlife", "deforestation", "waste dump", "environment"],
    },
    RoutingRule {
        ministry: "Ministry of Transport",
        keywords: &["road", "highway", "pothole", "traffic", "railway", "airport", "transport", "transit"],
    },
    RoutingRule {
        ministry: "Ministry of Labor",
        keywords: &["employment", "workplace", "labor rights", "unemployment", "minimum wage"],
    },
    RoutingRule {
        ministry: "Ministry of Energy",
        keywords: &["electricity", "power outage", "blackout", "renewable", "energy", "fuel"],
    },
    RoutingRule {
        ministry: "Ministry of Industry and Trade",
        keywords: &["export", "import", "trade license", "factory", "industry"],
    },
    RoutingRule {
        ministry: "Ministry of Housing",
        keywords: &["housing", "urban planning", "apartment", "eviction", "rent"],
    },
    RoutingRule {
        ministry: "Ministry of Culture",
        keywords: &["museum", "heritage", "festival", "culture", "monument"],
    },
    RoutingRule {
        ministry: "Ministry of Tourism",
        keywords: &["tourism", "tourist", "travel destination", "resort"],
    },
    RoutingRule {
        ministry: "Ministry of Social Welfare",
        keywords: &["welfare", "pension", "poverty", "disability benefit", "social services"],
    },
    RoutingRule {
        ministry: "Ministry of Science and Technology",
        keywords: &["research grant", "laboratory", "innovation", "science", "technology park"],
    },
    RoutingRule {
        ministry: "Ministry of Telecommunications",
        keywords: &["internet", "broadband", "telecom", "mobile network", "sim card"],
    },
    RoutingRule {
        ministry: "Ministry of Youth and Sports",
        keywords: &["sports", "stadium", "youth program", "athlete"],
    },
    RoutingRule {
        ministry: "Ministry of Public Works",
        keywords: &["bridge", "drainage", "sewer", "public works", "streetlight"],
    },
    RoutingRule {
        ministry: "Ministry of Immigration",
        keywords: &["visa", "passport", "citizenship", "residency", "immigration"],
    },
    RoutingRule {
        ministry: "Ministry of Water Resources",
        keywords: &["water supply", "irrigation", "borehole", "dam", "water shortage"],
    },
];

/// Classifies free text against the static rule table.
pub fn classify(text: &str) -> &'static str {
    MinistryRouter::default().classify(text)
}

/// Router over a caller-owned rule slice. Stateless and side-effect free;
/// the same input and table always yield the same category.
#[derive(Clone, Copy, Debug)]
pub struct MinistryRouter {
    rules: &'static [RoutingRule],
}

impl Default for MinistryRouter {
    fn default() -> Self {
        Self { rules: MINISTRY_RULES }
    }
}

impl MinistryRouter {
    pub fn with_rules(rules: &'static [RoutingRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [RoutingRule] {
        self.rules
    }

    pub fn classify(&self, text: &str) -> &'static str {
        let normalized = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| normalized.contains(keyword)))
            .map(|rule| rule.ministry)
            .unwrap_or(DEFAULT_MINISTRY)
    }
}
