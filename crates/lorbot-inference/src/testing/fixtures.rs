//! Card and telemetry fixtures.

use lorbot_core::{
    CardPositions, CardType, RawRectangle, ScreenSize, Size, StaticCardAttrs, Zone,
};

/// Width of fixture rectangles.
pub const CARD_WIDTH: u32 = 120;
/// Height of fixture rectangles.
pub const CARD_HEIGHT: u32 = 180;

/// A unit with no keywords.
pub fn card(code: &str, cost: i32, attack: i32, health: i32) -> StaticCardAttrs {
    StaticCardAttrs {
        card_code: code.to_string(),
        name: format!("Unit {code}"),
        cost,
        attack,
        health,
        card_type: CardType::Unit,
        keywords: Vec::new(),
        description: String::new(),
    }
}

/// A spell with no keywords.
pub fn spell(code: &str, cost: i32) -> StaticCardAttrs {
    StaticCardAttrs {
        card_code: code.to_string(),
        name: format!("Spell {code}"),
        cost,
        attack: 0,
        health: 0,
        card_type: CardType::Spell,
        keywords: Vec::new(),
        description: String::new(),
    }
}

/// A telemetry rectangle of fixture size.
pub fn raw(id: i64, code: &str, x: i32, y: i32, local: bool) -> RawRectangle {
    RawRectangle {
        card_id: id,
        card_code: code.to_string(),
        top_left_x: x,
        top_left_y: y,
        width: CARD_WIDTH,
        height: CARD_HEIGHT,
        local_player: local,
    }
}

/// A bottom-up telemetry y that classifies into `zone` with default
/// calibration.
pub fn telemetry_y(zone: Zone, window_height: u32) -> i32 {
    let h = window_height as f64;
    let ratio = match zone {
        Zone::Mulligan => return (h * 0.6759).round() as i32,
        Zone::Hand => 0.95,
        Zone::Board => 0.80,
        Zone::AttackOrBlock => 0.65,
        Zone::SpellStack => 0.50,
        Zone::OpponentAttackOrBlock => 0.35,
        Zone::OpponentBoard => 0.20,
        Zone::OpponentHand => 0.05,
    };
    (h * (1.0 - ratio)).round() as i32
}

/// In-match positions document for a window of `size`.
pub fn positions(size: Size, rectangles: Vec<RawRectangle>) -> CardPositions {
    CardPositions {
        player_name: Some("lorbot".into()),
        opponent_name: Some("opponent".into()),
        game_state: "InProgress".into(),
        screen: ScreenSize {
            screen_width: size.width,
            screen_height: size.height,
        },
        rectangles,
    }
}
