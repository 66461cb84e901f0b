//! Screen regions resolved for the current window size.

use lorbot_core::{CardRecord, Point, Rect, RegionCalibration, Size};

/// Resolves calibrated ratio regions against a window size.
#[derive(Debug, Clone)]
pub struct ComponentLocator {
    size: Size,
    regions: RegionCalibration,
}

impl ComponentLocator {
    /// Create a locator for a window of `size`.
    pub fn new(size: Size, regions: RegionCalibration) -> Self {
        Self { size, regions }
    }

    /// Window size regions are resolved against.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Follow a window resize.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Mana counter region.
    pub fn mana_rect(&self) -> Rect {
        self.regions.mana.resolve(self.size)
    }

    /// Spell mana indicator regions, left to right.
    pub fn spell_mana_rects(&self) -> Vec<Rect> {
        self.regions
            .spell_mana
            .iter()
            .map(|r| r.resolve(self.size))
            .collect()
    }

    /// End turn / commit button region.
    pub fn turn_button_rect(&self) -> Rect {
        self.regions.turn_button.resolve(self.size)
    }

    /// Attack token region.
    pub fn attack_token_rect(&self) -> Rect {
        self.regions.attack_token.resolve(self.size)
    }

    /// Rounds log region.
    pub fn rounds_log_rect(&self) -> Rect {
        self.regions.rounds_log.resolve(self.size)
    }

    /// Deck builder edit button region.
    pub fn deck_edit_rect(&self) -> Rect {
        self.regions.deck_edit.resolve(self.size)
    }

    /// Nexus click points (local, opponent) in window space.
    pub fn nexus_points(&self) -> (Point, Point) {
        (
            self.regions.local_nexus.resolve(self.size),
            self.regions.opponent_nexus.resolve(self.size),
        )
    }

    /// Attack and health digit regions of a card.
    ///
    /// Local cards show their stats just below the top edge, opposing cards
    /// just above the bottom edge.
    pub fn stat_rects(&self, card: &CardRecord) -> (Rect, Rect) {
        let crop = self.regions.stat_crop.resolve(self.size);
        let anchor = if card.is_local() {
            let top = card.top_center();
            Point::new(top.x, top.y + self.regions.local_anchor_offset_px)
        } else {
            let bottom = card.bottom_center();
            Point::new(bottom.x, bottom.y - crop.height as i32)
        };

        let attack = Rect::new(
            anchor.x - self.regions.attack_gap_px - crop.width as i32,
            anchor.y,
            crop.width,
            crop.height,
        );
        let health = Rect::new(
            anchor.x + self.regions.health_offset_px,
            anchor.y,
            crop.width,
            crop.height,
        );
        (attack, health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorbot_core::{CardType, RawRectangle, StaticCardAttrs, Zone};
    use std::sync::Arc;

    fn locator() -> ComponentLocator {
        ComponentLocator::new(Size::new(1920, 1080), RegionCalibration::default())
    }

    fn card(local: bool) -> CardRecord {
        let attrs = Arc::new(StaticCardAttrs {
            card_code: "01NX020".into(),
            name: "Legion Rearguard".into(),
            cost: 1,
            attack: 3,
            health: 2,
            card_type: CardType::Unit,
            keywords: vec![],
            description: String::new(),
        });
        let raw = RawRectangle {
            card_id: 11,
            card_code: "01NX020".into(),
            top_left_x: 900,
            top_left_y: 300,
            width: 120,
            height: 180,
            local_player: local,
        };
        CardRecord::new(attrs, &raw, 1080, Zone::Board)
    }

    #[test]
    fn test_fixed_regions() {
        let locator = locator();
        assert_eq!(locator.mana_rect(), Rect::new(1585, 638, 50, 37));
        assert_eq!(locator.deck_edit_rect(), Rect::new(1814, 596, 68, 64));
        assert_eq!(locator.spell_mana_rects().len(), 3);
    }

    #[test]
    fn test_local_stat_rects_anchor_top() {
        let (attack, health) = locator().stat_rects(&card(true));
        // top center (960, 780), crop 43x40
        assert_eq!(attack, Rect::new(960 - 4 - 43, 782, 43, 40));
        assert_eq!(health, Rect::new(968, 782, 43, 40));
    }

    #[test]
    fn test_opponent_stat_rects_anchor_bottom() {
        let (attack, health) = locator().stat_rects(&card(false));
        // bottom center (960, 960)
        assert_eq!(attack.y, 920);
        assert_eq!(health.y, 920);
        assert_eq!(attack.right(), 956);
    }

    #[test]
    fn test_nexus_points() {
        let (local, opponent) = locator().nexus_points();
        assert_eq!(local, Point::new(250, 650));
        assert_eq!(opponent, Point::new(250, 420));
    }
}
