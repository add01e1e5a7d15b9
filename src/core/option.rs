//! Option side definitions

use serde::{Deserialize, Serialize};

/// Option side (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionSide {
    #[serde(alias = "CE", alias = "call", alias = "ce")]
    Call,
    #[serde(alias = "PE", alias = "put", alias = "pe")]
    Put,
}
