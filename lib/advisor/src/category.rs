//! Issue categorization
//!
//! A small decision table: rules are tried in priority order and the first
//! one whose keyword occurs in the lowercased query wins.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    Door,
    Noise,
    Movement,
    ErrorCode,
    General,
}

impl IssueCategory {
    /// Human-readable label used in advice text
    pub fn label(&self) -> &'static str {
        match self {
            IssueCategory::Door => "door issue",
            IssueCategory::Noise => "noise issue",
            IssueCategory::Movement => "movement issue",
            IssueCategory::ErrorCode => "error code",
            IssueCategory::General => "general issue",
        }
    }

    /// Fixed remediation steps, in order
    pub fn steps(&self) -> &'static [&'static str] {
        match self {
            IssueCategory::Door => &[
                "1. Check door sensors for obstructions",
                "2. Inspect door tracks for debris",
                "3. Verify door closing force settings",
                "4. Test safety edges",
            ],
            IssueCategory::Noise => &[
                "1. Identify noise location (motor, cables, guides)",
                "2. Check lubrication levels",
                "3. Inspect roller guides",
                "4. Tighten loose components",
            ],
            IssueCategory::Movement => &[
                "1. Check power supply",
                "2. Verify control system signals",
                "3. Inspect safety circuits",
                "4. Check brake operation",
            ],
            IssueCategory::ErrorCode => &[
                "1. Note the exact error code",
                "2. Check manual error code list",
                "3. Reset system if safe",
                "4. Document before/after status",
            ],
            IssueCategory::General => &[
                "1. Review the manual section above",
                "2. Perform visual inspection",
                "3. Check all safety devices",
                "4. Contact supervisor if unsure",
            ],
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the decision table
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: IssueCategory,
    pub keywords: &'static [&'static str],
}

impl CategoryRule {
    #[inline]
    pub fn matches(&self, folded_query: &str) -> bool {
        self.keywords.iter().any(|k| folded_query.contains(k))
    }
}

/// Priority order is part of the contract: door > noise > movement > error code
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: IssueCategory::Door,
        keywords: &["door", "gate", "entrance"],
    },
    CategoryRule {
        category: IssueCategory::Noise,
        keywords: &["noise", "sound", "loud", "grinding"],
    },
    CategoryRule {
        category: IssueCategory::Movement,
        keywords: &["stop", "stuck", "not moving", "stationary"],
    },
    CategoryRule {
        category: IssueCategory::ErrorCode,
        keywords: &["error", "code", "fault", "e5", "e6"],
    },
];

/// First matching category, or [`IssueCategory::General`]
pub fn categorize(query: &str) -> IssueCategory {
    let folded = query.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.matches(&folded))
        .map_or(IssueCategory::General, |rule| rule.category)
}
