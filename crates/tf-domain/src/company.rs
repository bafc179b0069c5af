//! Companies, as far as the board's display lookup needs them

use serde::{Deserialize, Serialize};

use crate::ids::CompanyId;

/// A company owning pipeline projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Opaque id
    pub id: CompanyId,
    /// Display name shown on board cards
    pub name: String,
}
