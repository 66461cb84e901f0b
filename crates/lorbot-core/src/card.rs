//! Card types: static catalog attributes and tracked in-match records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::geometry::{Point, Rect, Size};
use crate::telemetry::RawRectangle;
use crate::zone::Zone;
use crate::{Error, Result};

/// Per-match card instance id assigned by the game client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub i64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Card type as listed in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    /// Spell played onto the stack
    Spell,
    /// Unit played onto the board
    Unit,
    /// Ability created by another card
    Ability,
    /// Trap attached to a deck
    Trap,
    /// Landmark occupying a board slot
    Landmark,
    /// Equipment attached to a unit
    Equipment,
    /// Anything newer than this build knows about
    #[serde(other)]
    Other,
}

/// Card keyword.
///
/// Only keywords the bot reasons about get their own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Burst speed spell
    Burst,
    /// Fast speed spell
    Fast,
    /// Slow speed spell
    Slow,
    /// Supports the unit to its right when attacking
    Support,
    /// Can only be blocked by elusive units
    Elusive,
    /// Can only be blocked by units with 3+ power
    Fearsome,
    /// Cannot block
    CantBlock,
    /// Must be blocked or challenges a blocker
    Challenger,
    /// Excess damage hits the nexus
    Overwhelm,
    /// Ignores the next damage instance
    Barrier,
    /// Strikes before the blocker
    QuickStrike,
    /// Heals the nexus on damage
    Lifesteal,
    /// Dies at round end
    Ephemeral,
    /// Takes one less damage
    Tough,
    /// Landmark or unit that cannot attack or block
    Immobile,
    /// Any other keyword
    #[serde(other)]
    Unknown,
}

/// Static card attributes loaded from the card catalog.
///
/// Field names follow the catalog's camelCase set files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticCardAttrs {
    /// Catalog code
    pub card_code: String,
    /// Display name
    pub name: String,
    /// Mana cost
    pub cost: i32,
    /// Printed attack
    #[serde(default)]
    pub attack: i32,
    /// Printed health
    #[serde(default)]
    pub health: i32,
    /// Card type
    #[serde(rename = "type")]
    pub card_type: CardType,
    /// Keywords
    #[serde(default, rename = "keywordRefs")]
    pub keywords: Vec<Keyword>,
    /// Plain text description
    #[serde(default, rename = "descriptionRaw")]
    pub description: String,
}

impl StaticCardAttrs {
    /// Whether the card carries `keyword`.
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    /// Whether the card is a spell.
    pub fn is_spell(&self) -> bool {
        self.card_type == CardType::Spell
    }
}

/// Attack and health read from the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStats {
    /// Current attack
    pub attack: i32,
    /// Current health
    pub health: i32,
}

/// A card tracked across polls.
///
/// The id and owner are fixed at creation; zone, position and recognized
/// stats are updated in place by the card tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    id: CardId,
    attrs: Arc<StaticCardAttrs>,
    zone: Zone,
    rect: Rect,
    is_local: bool,
    stats: Option<CardStats>,
}

impl CardRecord {
    /// Create a record on first sighting of a card id.
    ///
    /// `window_height` converts the bottom-up telemetry y to window space.
    pub fn new(
        attrs: Arc<StaticCardAttrs>,
        raw: &RawRectangle,
        window_height: u32,
        zone: Zone,
    ) -> Self {
        Self {
            id: CardId(raw.card_id),
            attrs,
            zone,
            rect: window_rect(raw, window_height),
            is_local: raw.local_player,
            stats: None,
        }
    }

    /// Refresh position, size and zone from a new sighting.
    ///
    /// The owner flag of the sighting is ignored; ownership never changes.
    pub fn update_position(
        &mut self,
        raw: &RawRectangle,
        window_height: u32,
        zone: Zone,
    ) -> Result<()> {
        if raw.card_id != self.id.0 {
            return Err(Error::InvalidInput(format!(
                "rectangle for card {} applied to card {}",
                CardId(raw.card_id),
                self.id
            )));
        }
        self.zone = zone;
        self.rect = window_rect(raw, window_height);
        Ok(())
    }

    /// Store attack/health read from the screen.
    pub fn update_stats(&mut self, attack: i32, health: i32) {
        self.stats = Some(CardStats { attack, health });
    }

    /// Card instance id.
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Static catalog attributes.
    pub fn attrs(&self) -> &StaticCardAttrs {
        &self.attrs
    }

    /// Catalog code.
    pub fn code(&self) -> &str {
        &self.attrs.card_code
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.attrs.name
    }

    /// Mana cost.
    pub fn cost(&self) -> i32 {
        self.attrs.cost
    }

    /// Current zone.
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Window-space rectangle (top-down).
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Top-left corner in window space.
    pub fn position(&self) -> Point {
        Point::new(self.rect.x, self.rect.y)
    }

    /// Card size.
    pub fn size(&self) -> Size {
        Size::new(self.rect.width, self.rect.height)
    }

    /// Middle of the top edge.
    pub fn top_center(&self) -> Point {
        Point::new(self.rect.x + self.rect.width as i32 / 2, self.rect.y)
    }

    /// Middle of the bottom edge.
    pub fn bottom_center(&self) -> Point {
        Point::new(self.rect.x + self.rect.width as i32 / 2, self.rect.bottom())
    }

    /// Whether the card belongs to the local player.
    pub fn is_local(&self) -> bool {
        self.is_local
    }

    /// Recognized stats, if any were ever read.
    pub fn stats(&self) -> Option<CardStats> {
        self.stats
    }

    /// Current attack, falling back to the printed value.
    pub fn attack(&self) -> i32 {
        self.stats.map_or(self.attrs.attack, |s| s.attack)
    }

    /// Current health, falling back to the printed value.
    pub fn health(&self) -> i32 {
        self.stats.map_or(self.attrs.health, |s| s.health)
    }

    /// Whether the card carries `keyword`.
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.attrs.has_keyword(keyword)
    }

    /// Whether the card is a spell.
    pub fn is_spell(&self) -> bool {
        self.attrs.is_spell()
    }
}

impl fmt::Display for CardRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) A:{} H:{} in {}",
            self.id,
            self.attrs.name,
            self.attrs.cost,
            self.attack(),
            self.health(),
            self.zone
        )
    }
}

fn window_rect(raw: &RawRectangle, window_height: u32) -> Rect {
    Rect::new(
        raw.top_left_x,
        window_height as i32 - raw.top_left_y,
        raw.width,
        raw.height,
    )
}
