use serde::{Deserialize, Serialize};

/// A business activity code and the bracket table it maps to.
///
/// Codes flagged with `requires_ratio_routing` ignore `bracket_table_id`
/// when computing; their table is chosen from the payroll/revenue ratio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityClassification {
    pub code: String,
    pub bracket_table_id: String,
    pub requires_ratio_routing: bool,
    #[serde(default)]
    pub description: String,
}

impl ActivityClassification {
    pub fn new(
        code: impl Into<String>,
        bracket_table_id: impl Into<String>,
        requires_ratio_routing: bool,
    ) -> Self {
        Self {
            code: code.into(),
            bracket_table_id: bracket_table_id.into(),
            requires_ratio_routing,
            description: String::new(),
        }
    }

    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self
    }
}
