//! Board snapshot: tracked card records bucketed by zone.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::card::{CardId, CardRecord, CardType};
use crate::zone::Zone;

/// Canonical view of the board for one poll.
///
/// Owns every tracked [`CardRecord`] keyed by id. Zone buckets and the
/// aggregate list hold ids only, so consumers resolve cards by id each tick.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    records: HashMap<CardId, CardRecord>,
    zones: [Vec<CardId>; 8],
    order: Vec<CardId>,
    captured_at: DateTime<Utc>,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            zones: Default::default(),
            order: Vec::new(),
            captured_at: Utc::now(),
        }
    }
}

impl BoardSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every record out, leaving the snapshot empty.
    ///
    /// The card tracker uses this to reuse records by id while rebuilding.
    pub fn take_records(&mut self) -> HashMap<CardId, CardRecord> {
        for bucket in &mut self.zones {
            bucket.clear();
        }
        self.order.clear();
        std::mem::take(&mut self.records)
    }

    /// Add a record to its zone bucket and the aggregate list.
    ///
    /// Returns `false` and drops the record if its id is already present.
    pub fn insert(&mut self, record: CardRecord) -> bool {
        let id = record.id();
        if self.records.contains_key(&id) {
            return false;
        }
        self.zones[record.zone().index()].push(id);
        self.order.push(id);
        self.records.insert(id, record);
        true
    }

    /// Stable-sort every zone bucket by ascending x.
    ///
    /// Cards with equal x keep their telemetry order.
    pub fn sort_zones(&mut self) {
        let records = &self.records;
        for bucket in &mut self.zones {
            bucket.sort_by_key(|id| records.get(id).map_or(i32::MAX, |r| r.rect().x));
        }
    }

    /// Mark the snapshot as captured now.
    pub fn touch(&mut self) {
        self.captured_at = Utc::now();
    }

    /// When the snapshot was last rebuilt.
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Resolve a card by id.
    pub fn get(&self, id: CardId) -> Option<&CardRecord> {
        self.records.get(&id)
    }

    /// Mutable access to a card, for the tracker's stat updates.
    pub fn get_mut(&mut self, id: CardId) -> Option<&mut CardRecord> {
        self.records.get_mut(&id)
    }

    /// Ids in a zone, sorted by ascending x.
    pub fn zone_ids(&self, zone: Zone) -> &[CardId] {
        &self.zones[zone.index()]
    }

    /// Cards in a zone, sorted by ascending x.
    pub fn zone(&self, zone: Zone) -> impl Iterator<Item = &CardRecord> + '_ {
        self.zones[zone.index()]
            .iter()
            .filter_map(move |id| self.records.get(id))
    }

    /// Number of cards in a zone.
    pub fn zone_len(&self, zone: Zone) -> usize {
        self.zones[zone.index()].len()
    }

    /// Every card in telemetry order.
    pub fn all(&self) -> impl Iterator<Item = &CardRecord> + '_ {
        self.order.iter().filter_map(move |id| self.records.get(id))
    }

    /// Number of tracked cards.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no cards are tracked.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the spell stack is non-empty and holds only spells and abilities.
    pub fn spell_stack_is_spell_only(&self) -> bool {
        let stack = self.zone_ids(Zone::SpellStack);
        !stack.is_empty()
            && self.zone(Zone::SpellStack).all(|card| {
                matches!(card.attrs().card_type, CardType::Spell | CardType::Ability)
            })
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.take_records();
        self.touch();
    }
}
