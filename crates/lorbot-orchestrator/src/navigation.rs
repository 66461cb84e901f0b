//! Menu click routes.

use lorbot_core::{BotSettings, NavigationSettings, RatioPoint, Rotation};

/// Ordered clicks that queue a match from the main menus.
///
/// The route is safe to replay while the client stays in the menus.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSelectionRoute {
    steps: Vec<(&'static str, RatioPoint)>,
}

impl DeckSelectionRoute {
    /// Build the route for the configured mode and rotation.
    ///
    /// The rotation toggle only exists in the PvP lobby.
    pub fn new(navigation: &NavigationSettings, bot: &BotSettings) -> Self {
        let mut steps = vec![("play", navigation.play_button)];

        if bot.pvp {
            steps.push(("pvp", navigation.pvp_button));
            let rotation = match bot.rotation {
                Rotation::Standard => ("standard_rotation", navigation.standard_rotation),
                Rotation::Eternal => ("eternal_rotation", navigation.eternal_rotation),
            };
            steps.push(rotation);
        } else {
            steps.push(("vs_ai", navigation.vs_ai_button));
        }

        steps.push(("deck_slot", navigation.deck_slot));
        steps.push(("start_match", navigation.start_match));
        Self { steps }
    }

    /// Named steps in click order.
    pub fn steps(&self) -> &[(&'static str, RatioPoint)] {
        &self.steps
    }

    /// Number of clicks.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the route has no clicks.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
