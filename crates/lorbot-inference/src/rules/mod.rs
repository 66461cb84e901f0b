//! Phase rule implementations.

pub mod blocking;
pub mod busy;
pub mod hold;
pub mod menus;
pub mod mulligan;
pub mod turn;

pub use blocking::BlockingRule;
pub use busy::BusyRule;
pub use hold::HoldRule;
pub use menus::MenusRule;
pub use mulligan::MulliganRule;
pub use turn::{AttackTokenRule, OpponentTurnRule};
