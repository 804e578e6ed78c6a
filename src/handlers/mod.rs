// handlers/mod.rs - two security tiers
//
// Public (no auth) -> Protected (bearer JWT + identity lookup)

pub mod protected;
pub mod public;
