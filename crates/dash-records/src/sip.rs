//! SIP trunks and dispatch rules

use serde::{Deserialize, Serialize};

/// Call direction a trunk carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrunkDirection {
    Inbound,
    Outbound,
}

/// Digest credentials for a trunk
///
/// Write-only: the password is accepted when decoding but never serialized,
/// and `Debug` masks it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipAuth {
    pub username: String,
    #[serde(default, skip_serializing)]
    password: String,
}

impl SipAuth {
    /// Create credentials
    #[inline]
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Whether a password was configured
    #[inline]
    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

impl std::fmt::Debug for SipAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SipAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// A telephony carrier connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SipTrunk {
    pub trunk_id: String,
    #[serde(default)]
    pub name: String,
    pub direction: TrunkDirection,
    /// Phone numbers served by the trunk
    #[serde(default)]
    pub numbers: Vec<String>,
    /// Inbound: allowed source addresses. Outbound: the carrier address.
    #[serde(default)]
    pub allowed_addresses: Vec<String>,
    #[serde(default)]
    pub auth: Option<SipAuth>,
}

impl SipTrunk {
    /// Create an inbound trunk
    #[inline]
    #[must_use]
    pub fn inbound(trunk_id: impl Into<String>) -> Self {
        Self::new(trunk_id, TrunkDirection::Inbound)
    }

    /// Create an outbound trunk
    #[inline]
    #[must_use]
    pub fn outbound(trunk_id: impl Into<String>) -> Self {
        Self::new(trunk_id, TrunkDirection::Outbound)
    }

    fn new(trunk_id: impl Into<String>, direction: TrunkDirection) -> Self {
        Self {
            trunk_id: trunk_id.into(),
            name: String::new(),
            direction,
            numbers: Vec::new(),
            allowed_addresses: Vec::new(),
            auth: None,
        }
    }

    /// With phone numbers
    #[inline]
    #[must_use]
    pub fn with_numbers<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numbers = numbers.into_iter().map(Into::into).collect();
        self
    }

    /// With credentials
    #[inline]
    #[must_use]
    pub fn with_auth(mut self, auth: SipAuth) -> Self {
        self.auth = Some(auth);
        self
    }
}

/// How a dispatch rule picks the destination room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchRuleKind {
    /// Every call goes to one named room
    Direct,
    /// One new room per caller, named from a prefix
    Individual,
    /// Room named after the called number, from a prefix
    Callee,
    #[serde(other)]
    Other,
}

impl DispatchRuleKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Individual => "individual",
            Self::Callee => "callee",
            Self::Other => "other",
        }
    }

    pub const ALL: [DispatchRuleKind; 4] =
        [Self::Direct, Self::Individual, Self::Callee, Self::Other];
}

/// Agent automatically dispatched into rooms created by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDispatch {
    pub agent_name: String,
    #[serde(default)]
    pub metadata: String,
}

/// Routing rule mapping inbound calls to rooms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRule {
    pub rule_id: String,
    #[serde(default)]
    pub name: String,
    pub kind: DispatchRuleKind,
    /// Target room name (direct) or room prefix (individual, callee)
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub pin: Option<String>,
    #[serde(default)]
    pub agent: Option<AgentDispatch>,
    /// Trunks the rule is bound to; empty means every inbound trunk
    #[serde(default)]
    pub trunk_ids: Vec<String>,
}

impl DispatchRule {
    /// Create a rule routing to `room`
    #[inline]
    #[must_use]
    pub fn new(rule_id: impl Into<String>, kind: DispatchRuleKind, room: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            name: String::new(),
            kind,
            room: room.into(),
            pin: None,
            agent: None,
            trunk_ids: Vec::new(),
        }
    }

    /// Bind to specific trunks
    #[inline]
    #[must_use]
    pub fn for_trunks<I, S>(mut self, trunk_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trunk_ids = trunk_ids.into_iter().map(Into::into).collect();
        self
    }

    /// With PIN gate
    #[inline]
    #[must_use]
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }

    /// With agent dispatch
    #[inline]
    #[must_use]
    pub fn with_agent(mut self, agent_name: impl Into<String>, metadata: impl Into<String>) -> Self {
        self.agent = Some(AgentDispatch {
            agent_name: agent_name.into(),
            metadata: metadata.into(),
        });
        self
    }

    /// Whether this rule routes calls arriving on `trunk`
    ///
    /// Dispatch rules only route inbound calls, so outbound trunks never match.
    #[must_use]
    pub fn applies_to(&self, trunk: &SipTrunk) -> bool {
        if trunk.direction != TrunkDirection::Inbound {
            return false;
        }
        self.trunk_ids.is_empty() || self.trunk_ids.iter().any(|id| *id == trunk.trunk_id)
    }
}
