//! Seed selection: look up an "already exists" short code for a session

use crate::identifier::{Identifier, SHORT_CODE_LEN};
use crate::session::{SessionContext, SEED_POOL_SIZE};
use rand::Rng;

/// Where the selected code came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSelection {
    /// Slot `slot` of the pre-seeded pool was occupied
    Seeded { slot: usize, code: String },
    /// Slot was empty, a 6-character code was generated instead
    Generated { slot: usize, code: Identifier },
}

impl SeedSelection {
    pub fn code(&self) -> &str {
        match self {
            SeedSelection::Seeded { code, .. } => code,
            SeedSelection::Generated { code, .. } => code.as_str(),
        }
    }

    pub fn slot(&self) -> usize {
        match self {
            SeedSelection::Seeded { slot, .. } | SeedSelection::Generated { slot, .. } => *slot,
        }
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, SeedSelection::Seeded { .. })
    }
}

pub fn select_seed(session: &mut SessionContext) -> SeedSelection {
    select_seed_with(&mut rand::rng(), session)
}

/// Pick a slot uniformly from 1..=50 and resolve it
pub fn select_seed_with<R: Rng + ?Sized>(
    rng: &mut R,
    session: &mut SessionContext,
) -> SeedSelection {
    let slot = rng.random_range(1..=SEED_POOL_SIZE);
    select_seed_at(rng, session, slot)
}

/// Resolve a specific slot. An occupied slot becomes `selectedShortCode`;
/// an empty one falls back to a generated code stored as both
/// `randomShortCode` and `selectedShortCode`.
pub fn select_seed_at<R: Rng + ?Sized>(
    rng: &mut R,
    session: &mut SessionContext,
    slot: usize,
) -> SeedSelection {
    if let Some(code) = session.seed_short_code(slot).map(str::to_string) {
        session.set_selected_short_code(code.clone());
        return SeedSelection::Seeded { slot, code };
    }

    let code = Identifier::generate_with(rng, SHORT_CODE_LEN);
    tracing::debug!(slot, code = %code, "Seed slot empty, using generated short code");
    session.set_random_short_code(code.clone());
    session.set_selected_short_code(code.as_str());
    SeedSelection::Generated { slot, code }
}
