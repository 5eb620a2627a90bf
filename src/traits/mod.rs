//! Trait seams for pluggable collaborators
//!
//! The handler composes three external capabilities behind traits: record
//! rendering ([`render::Render`]), mail transport ([`mailer::Mailer`]) and
//! fully custom delivery ([`deliver::Deliver`]).

pub mod deliver;
pub mod mailer;
pub mod render;
