//! Display-side derivations: unit conversions, number formatting, stat
//! abbreviations, and the stat/type color tables the shell renders with.
//! Colors are packed `0xRRGGBB`; the shell owns actual drawing.

use rand::seq::SliceRandom;
use rand::Rng;

pub const COLOR_HP: u32 = 0xF5_FF00;
pub const COLOR_ATK: u32 = 0xEE_4035;
pub const COLOR_DEF: u32 = 0x00_75C4;
pub const COLOR_SP_ATK: u32 = 0xF9_7306;
pub const COLOR_SP_DEF: u32 = 0x7B_519D;
pub const COLOR_SPD: u32 = 0x4A_C948;

/// Fallback when a color table has no match or all candidates are taken.
pub const COLOR_FALLBACK: u32 = 0x00_0000;

/// The six base-stat colors, in canonical stat order.
pub const STAT_COLORS: [u32; 6] = [
    COLOR_HP,
    COLOR_ATK,
    COLOR_DEF,
    COLOR_SP_ATK,
    COLOR_SP_DEF,
    COLOR_SPD,
];

#[must_use]
pub fn stat_abbr(stat_name: &str) -> &'static str {
    match stat_name.to_lowercase().as_str() {
        "hp" => "HP",
        "attack" => "Atk",
        "defense" => "Def",
        "special-attack" => "SpAtk",
        "special-defense" => "SpDef",
        "speed" => "Spd",
        _ => "",
    }
}

#[must_use]
pub fn stat_color(stat_name: &str) -> u32 {
    match stat_name.to_lowercase().as_str() {
        "hp" => COLOR_HP,
        "attack" => COLOR_ATK,
        "defense" => COLOR_DEF,
        "special-attack" => COLOR_SP_ATK,
        "special-defense" => COLOR_SP_DEF,
        "speed" => COLOR_SPD,
        _ => COLOR_FALLBACK,
    }
}

#[must_use]
pub fn type_color(type_name: &str) -> u32 {
    match type_name.to_lowercase().as_str() {
        "normal" => 0xA8_A77A,
        "fire" => 0xEE_8130,
        "water" => 0x63_90F0,
        "electric" => 0xF7_D02C,
        "grass" => 0x7A_C74C,
        "ice" => 0x96_D9D6,
        "fighting" => 0xC2_2E28,
        "poison" => 0xA3_3EA1,
        "ground" => 0xE2_BF65,
        "flying" => 0xA9_8FF3,
        "psychic" => 0xF9_5587,
        "bug" => 0xA6_B91A,
        "rock" => 0xB6_A136,
        "ghost" => 0x73_5797,
        "dragon" => 0x6F_35FC,
        "dark" => 0x70_5746,
        "steel" => 0xB7_B7CE,
        "fairy" => 0xD6_85AD,
        _ => COLOR_FALLBACK,
    }
}

/// HSL lightness of a packed RGB color, in `0.0..=1.0`. Used by the shell
/// to decide whether light or dark text is readable on a dominant color.
#[must_use]
pub fn lightness(color: u32) -> f32 {
    let r = ((color >> 16) & 0xFF) as f32 / 255.0;
    let g = ((color >> 8) & 0xFF) as f32 / 255.0;
    let b = (color & 0xFF) as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    (max + min) / 2.0
}

/// Picks a random candidate color not yet in `used`, recording the pick.
///
/// Bounded: each candidate is considered at most once, and when every
/// candidate is already taken the fallback color is returned instead of
/// retrying.
pub fn pick_free_color<R: Rng + ?Sized>(
    candidates: &[u32],
    used: &mut Vec<u32>,
    rng: &mut R,
) -> u32 {
    let mut order: Vec<u32> = candidates.to_vec();
    order.shuffle(rng);
    for color in order {
        if !used.contains(&color) {
            used.push(color);
            return color;
        }
    }
    COLOR_FALLBACK
}

/// Formats a number without a trailing `.0` when it is whole.
#[must_use]
pub fn format_decimal(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Kilograms to pounds, one decimal place.
#[must_use]
pub fn kg_to_lb(kg: f32) -> String {
    format!("{:.1}", kg * 2.204_622_6)
}

/// Metric height to the feet-and-inches notation the detail screen shows,
/// e.g. `6'69"`. Mirrors the upstream conversion digit-for-digit.
#[must_use]
pub fn meters_to_feet_inches(meters: f32) -> String {
    let inches = format!("{:.2}", meters * 3.937_007_87);
    match inches.split_once('.') {
        Some((feet, rem)) => format!("{feet}'{rem}\""),
        None => format!("{inches}'"),
    }
}
