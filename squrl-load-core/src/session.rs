//! Per-virtual-user session state
//!
//! One [`SessionContext`] lives for one simulated user's scenario. Values are
//! only ever written or overwritten; an unset field means "not generated yet".

use crate::error::{ProbeError, Result};
use crate::identifier::Identifier;
use std::collections::BTreeMap;

/// Number of `seedShortCode{N}` slots the engine may pre-populate
pub const SEED_POOL_SIZE: usize = 50;

/// Short codes assumed to already exist in the service, keyed by slot 1..=50.
/// Any subset of slots may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedPool {
    slots: BTreeMap<usize, String>,
}

impl SeedPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill slots 1, 2, ... in order
    pub fn from_codes<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        if codes.len() > SEED_POOL_SIZE {
            return Err(ProbeError::SeedPoolOverflow(codes.len()));
        }

        Ok(Self {
            slots: codes
                .into_iter()
                .enumerate()
                .map(|(index, code)| (index + 1, code))
                .collect(),
        })
    }

    /// Set one slot, returning the previous occupant
    pub fn insert(&mut self, slot: usize, code: impl Into<String>) -> Result<Option<String>> {
        if !(1..=SEED_POOL_SIZE).contains(&slot) {
            return Err(ProbeError::SeedIndexOutOfRange(slot));
        }
        Ok(self.slots.insert(slot, code.into()))
    }

    pub fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    custom_code: Option<Identifier>,
    random_short_code: Option<Identifier>,
    selected_short_code: Option<String>,
    test_url: Option<String>,
    user_agent: Option<String>,
    last_created_code: Option<String>,
    first_short_code: Option<String>,
    second_short_code: Option<String>,
    seeds: SeedPool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with the engine's pre-seeded pool
    pub fn with_seeds(seeds: SeedPool) -> Self {
        Self {
            seeds,
            ..Default::default()
        }
    }

    pub fn seeds(&self) -> &SeedPool {
        &self.seeds
    }

    pub fn seed_short_code(&self, slot: usize) -> Option<&str> {
        self.seeds.get(slot)
    }

    pub fn custom_code(&self) -> Option<&Identifier> {
        self.custom_code.as_ref()
    }

    pub fn set_custom_code(&mut self, code: Identifier) {
        self.custom_code = Some(code);
    }

    pub fn random_short_code(&self) -> Option<&Identifier> {
        self.random_short_code.as_ref()
    }

    pub fn set_random_short_code(&mut self, code: Identifier) {
        self.random_short_code = Some(code);
    }

    /// Code picked by the seed selector, either a seed or a generated fallback
    pub fn selected_short_code(&self) -> Option<&str> {
        self.selected_short_code.as_deref()
    }

    pub fn set_selected_short_code(&mut self, code: impl Into<String>) {
        self.selected_short_code = Some(code.into());
    }

    pub fn test_url(&self) -> Option<&str> {
        self.test_url.as_deref()
    }

    pub fn set_test_url(&mut self, url: impl Into<String>) {
        self.test_url = Some(url.into());
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = Some(user_agent.into());
    }

    /// Short code from the most recent complete create response
    pub fn last_created_code(&self) -> Option<&str> {
        self.last_created_code.as_deref()
    }

    pub fn set_last_created_code(&mut self, code: impl Into<String>) {
        self.last_created_code = Some(code.into());
    }

    pub fn first_short_code(&self) -> Option<&str> {
        self.first_short_code.as_deref()
    }

    pub fn set_first_short_code(&mut self, code: impl Into<String>) {
        self.first_short_code = Some(code.into());
    }

    pub fn second_short_code(&self) -> Option<&str> {
        self.second_short_code.as_deref()
    }

    pub fn set_second_short_code(&mut self, code: impl Into<String>) {
        self.second_short_code = Some(code.into());
    }
}
