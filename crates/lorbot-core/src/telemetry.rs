//! Telemetry wire models.
//!
//! The game client serves three JSON documents on a loopback port. Field
//! names follow the client's PascalCase wire format.

use serde::{Deserialize, Serialize};

/// Coarse match-state string reported while the player is outside a match.
pub const MENUS_GAME_STATE: &str = "Menus";

/// Card code of the nexus pseudo-card that telemetry reports alongside cards.
pub const NEXUS_CARD_CODE: &str = "face";

/// Window size as reported by telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScreenSize {
    /// Client width in pixels
    pub screen_width: u32,
    /// Client height in pixels
    pub screen_height: u32,
}

/// Raw card rectangle as reported by telemetry.
///
/// `top_left_y` is measured from the bottom of the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRectangle {
    /// Per-match card instance id
    #[serde(rename = "CardID")]
    pub card_id: i64,
    /// Catalog code, or `face` for the nexus
    pub card_code: String,
    /// Left edge in pixels
    pub top_left_x: i32,
    /// Top edge in pixels, bottom-up
    pub top_left_y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Whether the card belongs to the local player
    pub local_player: bool,
}

impl RawRectangle {
    /// Whether this rectangle is the nexus pseudo-card.
    pub fn is_nexus(&self) -> bool {
        self.card_code == NEXUS_CARD_CODE
    }
}

/// Response of the `positional-rectangles` endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CardPositions {
    /// Local player's name, if in a match
    pub player_name: Option<String>,
    /// Opponent's name, if in a match
    pub opponent_name: Option<String>,
    /// Coarse match state (`Menus` or `InProgress`)
    pub game_state: String,
    /// Client window size
    pub screen: ScreenSize,
    /// Card rectangles in telemetry order
    pub rectangles: Vec<RawRectangle>,
}

impl CardPositions {
    /// Whether the client reports the menu context.
    pub fn in_menus(&self) -> bool {
        self.game_state == MENUS_GAME_STATE
    }
}

/// Response of the `static-decklist` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ActiveDeck {
    /// Deck code of the active deck
    pub deck_code: Option<String>,
    /// Card code to copy count; null outside a match
    pub cards_in_deck: Option<std::collections::BTreeMap<String, u32>>,
}

/// Response of the `game-result` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatchResult {
    /// Monotonic id of the last finished match (-1 before the first one)
    #[serde(rename = "GameID")]
    pub game_id: i64,
    /// Whether the local player won it
    pub local_player_won: bool,
}

impl Default for MatchResult {
    fn default() -> Self {
        Self {
            game_id: -1,
            local_player_won: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card_positions() {
        let json = r#"{
            "PlayerName": "alice",
            "OpponentName": "decks_are_hard",
            "GameState": "InProgress",
            "Screen": { "ScreenWidth": 1920, "ScreenHeight": 1080 },
            "Rectangles": [
                { "CardID": 1753616542, "CardCode": "face", "TopLeftX": 146, "TopLeftY": 572,
                  "Width": 156, "Height": 156, "LocalPlayer": true },
                { "CardID": 94735648, "CardCode": "01IO012", "TopLeftX": 820, "TopLeftY": 210,
                  "Width": 152, "Height": 227, "LocalPlayer": true }
            ]
        }"#;

        let positions: CardPositions = serde_json::from_str(json).unwrap();
        assert!(!positions.in_menus());
        assert_eq!(positions.screen.screen_height, 1080);
        assert_eq!(positions.rectangles.len(), 2);
        assert!(positions.rectangles[0].is_nexus());
        assert_eq!(positions.rectangles[1].card_id, 94735648);
        assert_eq!(positions.rectangles[1].card_code, "01IO012");
    }

    #[test]
    fn test_parse_menus_without_players() {
        let json = r#"{
            "PlayerName": null,
            "OpponentName": null,
            "GameState": "Menus",
            "Screen": { "ScreenWidth": 1920, "ScreenHeight": 1080 },
            "Rectangles": []
        }"#;

        let positions: CardPositions = serde_json::from_str(json).unwrap();
        assert!(positions.in_menus());
        assert!(positions.player_name.is_none());
    }

    #[test]
    fn test_parse_deck_with_null_cards() {
        let deck: ActiveDeck =
            serde_json::from_str(r#"{ "DeckCode": null, "CardsInDeck": null }"#).unwrap();
        assert!(deck.deck_code.is_none());
        assert!(deck.cards_in_deck.is_none());

        let deck: ActiveDeck = serde_json::from_str(
            r#"{ "DeckCode": "CEBAIAIFB4WDANQIAEAQGDAUDAQSIJZUAIAQCBIFAEAQCBAA", "CardsInDeck": { "01IO012": 3 } }"#,
        )
        .unwrap();
        assert_eq!(deck.cards_in_deck.unwrap()["01IO012"], 3);
    }

    #[test]
    fn test_parse_match_result() {
        let result: MatchResult =
            serde_json::from_str(r#"{ "GameID": 4, "LocalPlayerWon": true }"#).unwrap();
        assert_eq!(result.game_id, 4);
        assert!(result.local_player_won);
        assert_eq!(MatchResult::default().game_id, -1);
    }
}
