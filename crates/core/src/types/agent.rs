use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Agent Identifiers
// =============================================================================

/// A specialized conversational agent the router can hand a turn to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentId {
    /// General shopping assistant; also the fallback when routing finds nothing.
    Cora,
    /// Interior-design advisor.
    InteriorDesigner,
    /// Inventory lookup agent.
    InventoryAgent,
    /// Loyalty and discount agent.
    CustomerLoyalty,
    /// Cart agent. Never selected by the router, only invoked for cart turns.
    Cart,
}

/// Agents the router may select, in the order their names are tested
/// against the router reply. First match wins.
pub const ROUTING_PRIORITY: [AgentId; 4] = [
    AgentId::Cora,
    AgentId::InteriorDesigner,
    AgentId::InventoryAgent,
    AgentId::CustomerLoyalty,
];

impl AgentId {
    /// Every known agent.
    pub const ALL: [AgentId; 5] = [
        AgentId::Cora,
        AgentId::InteriorDesigner,
        AgentId::InventoryAgent,
        AgentId::CustomerLoyalty,
        AgentId::Cart,
    ];

    /// Wire identifier, also the key in the endpoint table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cora => "cora",
            Self::InteriorDesigner => "interior_designer",
            Self::InventoryAgent => "inventory_agent",
            Self::CustomerLoyalty => "customer_loyalty",
            Self::Cart => "cart",
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| crate::Error::routing(format!("unknown agent id '{}'", s)))
    }
}
