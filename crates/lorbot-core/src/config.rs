//! Configuration types for lorbot.
//!
//! Every pixel threshold and window fraction the inference engine uses lives
//! under `calibration`. The defaults are calibrated for a 16:9 client window;
//! other aspect ratios need their own calibration file.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::geometry::{AnchoredRect, RatioPoint, RatioRect, RatioSize};
use crate::zone::Zone;
use crate::{Error, Result};

/// Bot configuration loaded from a YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BotConfig {
    /// Game client connection settings
    pub client: ClientSettings,
    /// Play settings
    pub bot: BotSettings,
    /// Screen calibration data
    pub calibration: Calibration,
    /// Orchestrator waits and retry bounds
    pub timing: TimingSettings,
    /// Menu and end-screen click targets
    pub navigation: NavigationSettings,
}

impl BotConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: BotConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.client.frames_per_poll == 0 {
            return Err(Error::Config("client.frames_per_poll must be > 0".into()));
        }

        if self.client.request_timeout_ms == 0 {
            return Err(Error::Config("client.request_timeout_ms must be > 0".into()));
        }

        self.calibration.zones.validate()?;

        if self.calibration.regions.spell_mana.len() > crate::resources::MAX_SPELL_MANA as usize {
            return Err(Error::Config(format!(
                "calibration.regions.spell_mana has more than {} indicators",
                crate::resources::MAX_SPELL_MANA
            )));
        }

        if self.calibration.phase.attack_token_ranges.is_empty() {
            return Err(Error::Config(
                "calibration.phase.attack_token_ranges must not be empty".into(),
            ));
        }

        let ratio = self.calibration.resources.mana_accept_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::Config(format!(
                "calibration.resources.mana_accept_ratio must be within 0..=1, got {ratio}"
            )));
        }

        if self.calibration.stats.hypotheses.is_empty() {
            return Err(Error::Config(
                "calibration.stats.hypotheses must not be empty".into(),
            ));
        }

        self.timing.validate()?;

        Ok(())
    }
}

/// Game client connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClientSettings {
    /// Telemetry host
    pub telemetry_host: String,
    /// Telemetry port
    pub telemetry_port: u16,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Frames captured per poll
    pub frames_per_poll: usize,
    /// Delay between captured frames in milliseconds
    pub frame_delay_ms: u64,
    /// Directory holding the card set JSON files
    pub catalog_dir: PathBuf,
    /// JSON file with the mana digit templates
    pub mana_templates: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            telemetry_host: "127.0.0.1".to_string(),
            telemetry_port: 21337,
            request_timeout_ms: 1000,
            frames_per_poll: 4,
            frame_delay_ms: 8,
            catalog_dir: PathBuf::from("card_sets"),
            mana_templates: None,
        }
    }
}

/// Deck rotation selected in the PvP lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Standard rotation
    #[default]
    Standard,
    /// Eternal rotation
    Eternal,
}

/// Play settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BotSettings {
    /// Rotation picked in PvP
    pub rotation: Rotation,
    /// Queue against players instead of the AI
    pub pvp: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            rotation: Rotation::Standard,
            pvp: false,
            log_level: "info".to_string(),
        }
    }
}

/// Screen calibration data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Calibration {
    /// Zone classifier cutoffs
    pub zones: ZoneCalibration,
    /// Probe regions
    pub regions: RegionCalibration,
    /// Phase probe colors and thresholds
    pub phase: PhaseCalibration,
    /// Mana reader settings
    pub resources: ResourceCalibration,
    /// Attack/health reader settings
    pub stats: StatsCalibration,
}

/// One band of the zone cascade: ratios strictly above `above` map to `zone`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ZoneBand {
    /// Exclusive lower bound of the height ratio
    pub above: f32,
    /// Zone assigned inside the band
    pub zone: Zone,
}

/// Zone classifier cutoffs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ZoneCalibration {
    /// Mulligan shelf position as a fraction of window height (bottom-up y)
    pub mulligan_shelf: f32,
    /// Allowed distance from the shelf in pixels. A 0.05px tolerance amounts
    /// to exact equality on integer telemetry and breaks on float rounding.
    pub mulligan_tolerance_px: f32,
    /// Minimum height ratio for a mulligan card
    pub mulligan_min_ratio: f32,
    /// Bands in descending order
    pub bands: Vec<ZoneBand>,
    /// Zone for ratios below every band
    pub fallback: Zone,
}

impl Default for ZoneCalibration {
    fn default() -> Self {
        Self {
            mulligan_shelf: 0.6759,
            mulligan_tolerance_px: 1.0,
            mulligan_min_ratio: 0.275,
            bands: vec![
                ZoneBand { above: 0.92, zone: Zone::Hand },
                ZoneBand { above: 0.75, zone: Zone::Board },
                ZoneBand { above: 0.58, zone: Zone::AttackOrBlock },
                ZoneBand { above: 0.44, zone: Zone::SpellStack },
                ZoneBand { above: 0.265, zone: Zone::OpponentAttackOrBlock },
                ZoneBand { above: 0.09, zone: Zone::OpponentBoard },
            ],
            fallback: Zone::OpponentHand,
        }
    }
}

impl ZoneCalibration {
    /// Validate band ordering.
    pub fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(Error::Config(
                "calibration.zones.bands must not be empty".into(),
            ));
        }

        if self.bands.windows(2).any(|w| w[0].above <= w[1].above) {
            return Err(Error::Config(
                "calibration.zones.bands must be strictly descending".into(),
            ));
        }

        if self.mulligan_tolerance_px < 0.0 {
            return Err(Error::Config(
                "calibration.zones.mulligan_tolerance_px must be >= 0".into(),
            ));
        }

        Ok(())
    }
}

/// Probe regions as window fractions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RegionCalibration {
    /// Mana counter (fixed pixel size matching the templates)
    pub mana: AnchoredRect,
    /// Spell mana indicators, read left to right
    pub spell_mana: Vec<RatioRect>,
    /// End turn / commit button
    pub turn_button: RatioRect,
    /// Attack token next to the turn button
    pub attack_token: RatioRect,
    /// Rounds log on the left edge
    pub rounds_log: RatioRect,
    /// Deck builder edit button
    pub deck_edit: RatioRect,
    /// Local nexus
    pub local_nexus: RatioPoint,
    /// Opponent nexus
    pub opponent_nexus: RatioPoint,
    /// Attack/health digit crop size
    pub stat_crop: RatioSize,
    /// Horizontal gap between the attack crop and the card anchor in pixels
    pub attack_gap_px: i32,
    /// Horizontal offset of the health crop from the card anchor in pixels
    pub health_offset_px: i32,
    /// Vertical offset applied to local card anchors in pixels
    pub local_anchor_offset_px: i32,
}

impl Default for RegionCalibration {
    fn default() -> Self {
        const INDICATOR_W: f32 = 0.00625;
        const INDICATOR_H: f32 = 0.0111;
        Self {
            mana: AnchoredRect {
                x: 0.8255,
                y: 0.5907,
                width_px: 50,
                height_px: 37,
            },
            spell_mana: vec![
                RatioRect::new(0.8739, 0.6314, INDICATOR_W, INDICATOR_H),
                RatioRect::new(0.8854, 0.6259, INDICATOR_W, INDICATOR_H),
                RatioRect::new(0.8958, 0.6149, INDICATOR_W, INDICATOR_H),
            ],
            turn_button: RatioRect::new(0.82, 0.42, 0.10416, 0.1574),
            attack_token: RatioRect::new(0.80, 0.6, 0.1, 0.1814),
            rounds_log: RatioRect::new(0.0156, 0.4752, 0.0333, 0.0555),
            deck_edit: RatioRect::new(0.9447, 0.5518, 0.0353, 0.0585),
            local_nexus: RatioPoint::new(0.1302, 0.6018),
            opponent_nexus: RatioPoint::new(0.1302, 0.3888),
            stat_crop: RatioSize::new(0.0223, 0.0370),
            attack_gap_px: 4,
            health_offset_px: 8,
            local_anchor_offset_px: 2,
        }
    }
}

/// A color in the HSV space used by the probes.
///
/// Hue is on the 0-180 scale, saturation and value on 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Hsv {
    /// Hue (0-180, wider bounds are allowed and simply never reached)
    pub h: u16,
    /// Saturation
    pub s: u8,
    /// Value
    pub v: u8,
}

impl Hsv {
    /// Create a new HSV color.
    pub const fn new(h: u16, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Inclusive HSV range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HsvRange {
    /// Lower bound
    pub low: Hsv,
    /// Upper bound
    pub high: Hsv,
}

impl HsvRange {
    /// Create a new range.
    pub const fn new(low: Hsv, high: Hsv) -> Self {
        Self { low, high }
    }

    /// Whether `color` lies inside the range on every channel.
    pub fn contains(&self, color: Hsv) -> bool {
        (self.low.h..=self.high.h).contains(&color.h)
            && (self.low.s..=self.high.s).contains(&color.s)
            && (self.low.v..=self.high.v).contains(&color.v)
    }
}

/// HSV range with a label, for ordered hypotheses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NamedHsvRange {
    /// Label used in logs
    pub name: String,
    /// Color range
    #[serde(flatten)]
    pub range: HsvRange,
}

impl NamedHsvRange {
    fn new(name: &str, low: Hsv, high: Hsv) -> Self {
        Self {
            name: name.to_string(),
            range: HsvRange::new(low, high),
        }
    }
}

/// Open pixel-count interval `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PixelWindow {
    /// Exclusive lower bound
    pub min: u32,
    /// Exclusive upper bound
    pub max: u32,
}

impl PixelWindow {
    /// Whether `count` lies strictly between the bounds.
    pub fn contains(&self, count: u32) -> bool {
        count > self.min && count < self.max
    }
}

/// Phase probe colors and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PhaseCalibration {
    /// Deck-edit button color
    pub deck_edit_range: HsvRange,
    /// Deck-edit pixels needed for a selected deck
    pub deck_edit_threshold: u32,
    /// Rounds log color
    pub rounds_log_range: HsvRange,
    /// Rounds log pixel count below which the client is busy
    pub rounds_log_idle_threshold: u32,
    /// Rounds log pixel counts seen while an action resolves
    pub rounds_log_in_action: PixelWindow,
    /// Turn button color when the local player may act
    pub turn_ready_range: HsvRange,
    /// Turn button pixels needed to act
    pub turn_ready_threshold: u32,
    /// Attack token colors, each checked on its own
    pub attack_token_ranges: Vec<HsvRange>,
    /// Attack token pixels needed for one range to match
    pub attack_token_threshold: u32,
}

impl Default for PhaseCalibration {
    fn default() -> Self {
        Self {
            deck_edit_range: HsvRange::new(Hsv::new(10, 70, 140), Hsv::new(20, 180, 255)),
            deck_edit_threshold: 700,
            rounds_log_range: HsvRange::new(Hsv::new(20, 80, 130), Hsv::new(30, 150, 180)),
            rounds_log_idle_threshold: 590,
            rounds_log_in_action: PixelWindow { min: 110, max: 140 },
            turn_ready_range: HsvRange::new(Hsv::new(5, 200, 200), Hsv::new(260, 255, 255)),
            turn_ready_threshold: 100,
            attack_token_ranges: vec![
                HsvRange::new(Hsv::new(5, 120, 224), Hsv::new(25, 255, 255)),
                HsvRange::new(Hsv::new(10, 120, 245), Hsv::new(30, 225, 255)),
            ],
            attack_token_threshold: 1000,
        }
    }
}

/// Mana reader settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ResourceCalibration {
    /// Template match ratio a candidate must exceed
    pub mana_accept_ratio: f64,
    /// Capture rounds before giving up on mana
    pub mana_retry_rounds: usize,
    /// Sobel gradient magnitude that counts as an edge
    pub edge_threshold: f32,
    /// Lit spell mana indicator color
    pub spell_mana_range: HsvRange,
    /// Pixels needed for a lit indicator
    pub spell_mana_threshold: u32,
}

impl Default for ResourceCalibration {
    fn default() -> Self {
        Self {
            mana_accept_ratio: 0.95,
            mana_retry_rounds: 2,
            edge_threshold: 100.0,
            spell_mana_range: HsvRange::new(Hsv::new(5, 200, 200), Hsv::new(260, 255, 255)),
            spell_mana_threshold: 40,
        }
    }
}

/// Attack/health reader settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StatsCalibration {
    /// Color hypotheses, tried in order
    pub hypotheses: Vec<NamedHsvRange>,
    /// Side of the square mask handed to the digit recognizer
    pub recognizer_size: u32,
}

impl Default for StatsCalibration {
    fn default() -> Self {
        Self {
            hypotheses: vec![
                NamedHsvRange::new("white", Hsv::new(0, 0, 230), Hsv::new(0, 0, 255)),
                NamedHsvRange::new("green", Hsv::new(30, 80, 80), Hsv::new(180, 255, 255)),
                NamedHsvRange::new("light_red", Hsv::new(0, 250, 200), Hsv::new(0, 255, 255)),
                NamedHsvRange::new("elusive", Hsv::new(0, 0, 255), Hsv::new(180, 128, 255)),
            ],
            recognizer_size: 120,
        }
    }
}

/// Randomized delay bounds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Jitter {
    /// Shortest delay
    pub min_ms: u64,
    /// Longest delay
    pub max_ms: u64,
}

impl Jitter {
    /// Create new jitter bounds.
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Inclusive delay range.
    pub fn range(&self) -> RangeInclusive<u64> {
        self.min_ms..=self.max_ms
    }
}

/// Orchestrator waits and retry bounds.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TimingSettings {
    /// Pause after every tick
    pub tick_pause_ms: u64,
    /// Wait in inert phases
    pub idle_wait_ms: u64,
    /// Poll interval while waiting for the mulligan hand
    pub mulligan_poll_ms: u64,
    /// Polls allowed for the mulligan hand to fill and to clear
    pub mulligan_attempts: usize,
    /// Delay between mulligan clicks
    pub mulligan_click_jitter: Jitter,
    /// Delay after each blocker is placed
    pub block_jitter: Jitter,
    /// Poll interval while waiting for blocking to finish
    pub blocking_poll_ms: u64,
    /// Polls allowed for blocking to finish
    pub blocking_attempts: usize,
    /// First wait when a spell-only stack is observed
    pub stack_debounce_ms: u64,
    /// Wait per stacked spell after passing on it
    pub stack_wait_per_card_ms: u64,
    /// Wait after a commit, a skip or a played card
    pub action_settle_ms: u64,
    /// Delay before confirming a spell
    pub spell_confirm_ms: u64,
    /// Delay between target clicks
    pub target_jitter: Jitter,
    /// Delay after each attacker is moved
    pub attack_jitter: Jitter,
    /// Wait for card effects before committing an attack
    pub attack_settle_ms: u64,
    /// Continue clicks allowed on the end screen
    pub end_continue_attempts: usize,
    /// Wait between continue clicks
    pub end_continue_ms: u64,
    /// Delay between menu clicks
    pub menu_jitter: Jitter,
    /// Wait before dismissing the matchmaking dialog
    pub matchmaking_dismiss_ms: u64,
    /// Delay before recapturing frames when mana is unreadable
    pub capture_retry_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            tick_pause_ms: 1000,
            idle_wait_ms: 3000,
            mulligan_poll_ms: 1500,
            mulligan_attempts: 10,
            mulligan_click_jitter: Jitter::new(300, 500),
            block_jitter: Jitter::new(800, 1000),
            blocking_poll_ms: 1000,
            blocking_attempts: 10,
            stack_debounce_ms: 6000,
            stack_wait_per_card_ms: 2500,
            action_settle_ms: 4000,
            spell_confirm_ms: 1000,
            target_jitter: Jitter::new(300, 600),
            attack_jitter: Jitter::new(800, 1250),
            attack_settle_ms: 1000,
            end_continue_attempts: 16,
            end_continue_ms: 1500,
            menu_jitter: Jitter::new(700, 1000),
            matchmaking_dismiss_ms: 1000,
            capture_retry_ms: 50,
        }
    }
}

impl TimingSettings {
    /// Validate jitter bounds and retry counts.
    pub fn validate(&self) -> Result<()> {
        let jitters = [
            ("mulligan_click_jitter", self.mulligan_click_jitter),
            ("block_jitter", self.block_jitter),
            ("target_jitter", self.target_jitter),
            ("attack_jitter", self.attack_jitter),
            ("menu_jitter", self.menu_jitter),
        ];
        for (name, jitter) in jitters {
            if jitter.min_ms > jitter.max_ms {
                return Err(Error::Config(format!(
                    "timing.{name}: min_ms must be <= max_ms"
                )));
            }
        }

        if self.mulligan_attempts == 0 || self.blocking_attempts == 0 {
            return Err(Error::Config("timing retry counts must be > 0".into()));
        }

        Ok(())
    }
}

/// Menu and end-screen click targets.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NavigationSettings {
    /// Play tab
    pub play_button: RatioPoint,
    /// Versus AI mode
    pub vs_ai_button: RatioPoint,
    /// Versus player mode
    pub pvp_button: RatioPoint,
    /// Standard rotation toggle (PvP only)
    pub standard_rotation: RatioPoint,
    /// Eternal rotation toggle (PvP only)
    pub eternal_rotation: RatioPoint,
    /// First deck slot
    pub deck_slot: RatioPoint,
    /// Start match button
    pub start_match: RatioPoint,
    /// OK button of the "matchmaking failed" dialog
    pub matchmaking_ok: RatioPoint,
    /// Continue button on the end screen
    pub end_continue: RatioPoint,
    /// Where the pointer rests between actions
    pub pointer_rest: RatioPoint,
    /// How far up a card is dragged to play it, as a fraction of window height
    pub play_drag: f64,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            play_button: RatioPoint::new(0.04721, 0.33454),
            vs_ai_button: RatioPoint::new(0.15738, 0.33401),
            pvp_button: RatioPoint::new(0.15738, 0.25),
            standard_rotation: RatioPoint::new(0.70989, 0.05),
            eternal_rotation: RatioPoint::new(0.81970, 0.05),
            deck_slot: RatioPoint::new(0.33180, 0.30779),
            start_match: RatioPoint::new(0.83213, 0.89538),
            matchmaking_ok: RatioPoint::new(0.5, 0.546),
            end_continue: RatioPoint::new(0.66, 0.90),
            pointer_rest: RatioPoint::new(0.1041, 0.7592),
            play_drag: 3.0 / 7.0,
        }
    }
}
