use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

use crate::card::CardBackground;
use crate::normalize::Rarity;

/// Available UI themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dracula,
    Solarized,
    Gruvbox,
    EverforestLight,
}

impl Theme {
    pub fn config(self) -> ThemeConfig {
        match self {
            Theme::Dracula => dracula_theme(),
            Theme::Solarized => solarized_dark(),
            Theme::Gruvbox => gruvbox_theme(),
            Theme::EverforestLight => everforest_light_theme(),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dracula" => Ok(Theme::Dracula),
            "solarized" | "solarized_dark" => Ok(Theme::Solarized),
            "gruvbox" => Ok(Theme::Gruvbox),
            "everforest_light" | "everforest" => Ok(Theme::EverforestLight),
            other => Err(format!(
                "unknown theme '{other}' (expected dracula, solarized, gruvbox, everforest_light)"
            )),
        }
    }
}

/// Complete theme configuration for ratatui
#[derive(Clone)]
pub struct ThemeConfig {
    pub background: Color,
    pub list_normal: Style,
    pub list_selected: Style,
    pub border: Style,
    pub border_selected: Style,
    pub title: Style,
    pub text: Style,
    /// Prices, banners and the active tab.
    pub accent: Style,
    pub muted: Style,
    pub error: Style,
    pub favorite: Style,
}

/// Storefront rarity colors; these are the game's own and do not follow the theme.
pub fn rarity_color(rarity: Rarity) -> Color {
    match rarity {
        Rarity::Common => Color::Rgb(0xb1, 0xb1, 0xb1),
        Rarity::Uncommon => Color::Rgb(0x60, 0xaa, 0x3a),
        Rarity::Rare => Color::Rgb(0x49, 0xac, 0xf2),
        Rarity::Epic => Color::Rgb(0xb1, 0x5b, 0xe2),
        Rarity::Legendary => Color::Rgb(0xd3, 0x78, 0x41),
        Rarity::Icon => Color::Rgb(0x35, 0xae, 0xb8),
        Rarity::Unknown => Color::Rgb(0x80, 0x80, 0x80),
    }
}

/// Swatch color for a card: the gradient's first stop, or its rarity.
pub fn card_color(background: CardBackground) -> Color {
    match background {
        CardBackground::Gradient((r, g, b), _) => Color::Rgb(r, g, b),
        CardBackground::Rarity(rarity) => rarity_color(rarity),
    }
}

/// Returns a ThemeConfig based on the Solarized Dark color palette.
pub fn solarized_dark() -> ThemeConfig {
    let base03 = Color::Rgb(0, 43, 54);
    let base02 = Color::Rgb(7, 54, 66);
    let base01 = Color::Rgb(88, 110, 117);
    let base0 = Color::Rgb(131, 148, 150);
    let base3 = Color::Rgb(253, 246, 227);
    let yellow = Color::Rgb(181, 137, 0);
    let red = Color::Rgb(220, 50, 47);
    let magenta = Color::Rgb(211, 54, 130);
    let blue = Color::Rgb(38, 139, 210);

    ThemeConfig {
        background: base03,
        list_normal: Style::default().fg(base0).bg(base02),
        list_selected: Style::default()
            .fg(base3)
            .bg(blue)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(base01),
        border_selected: Style::default().fg(blue),
        title: Style::default().fg(blue).add_modifier(Modifier::BOLD),
        text: Style::default().fg(base0).bg(base02),
        accent: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
        muted: Style::default().fg(base01),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
        favorite: Style::default().fg(magenta),
    }
}

/// Returns a ThemeConfig based on the Dracula color palette.
pub fn dracula_theme() -> ThemeConfig {
    // Dracula palette
    let bg = Color::Rgb(40, 42, 54);
    let selection = Color::Rgb(68, 71, 90);
    let fg = Color::Rgb(248, 248, 242);
    let comment = Color::Rgb(98, 114, 164);
    let purple = Color::Rgb(189, 147, 249);
    let yellow = Color::Rgb(241, 250, 140);
    let red = Color::Rgb(255, 85, 85);
    let pink = Color::Rgb(255, 121, 198);

    ThemeConfig {
        background: bg,
        list_normal: Style::default().fg(fg).bg(bg),
        list_selected: Style::default()
            .fg(fg)
            .bg(selection)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(comment),
        border_selected: Style::default().fg(purple),
        title: Style::default().fg(purple).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg),
        accent: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
        muted: Style::default().fg(comment),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
        favorite: Style::default().fg(pink),
    }
}

/// Returns a ThemeConfig based on the Gruvbox Dark color palette.
pub fn gruvbox_theme() -> ThemeConfig {
    let bg0 = Color::Rgb(40, 40, 40);
    let fg1 = Color::Rgb(235, 219, 178);
    let gray = Color::Rgb(146, 131, 116);
    let yellow = Color::Rgb(250, 189, 47);
    let red = Color::Rgb(204, 36, 29);
    let orange = Color::Rgb(214, 93, 14);
    let purple = Color::Rgb(177, 98, 134);

    ThemeConfig {
        background: bg0,
        list_normal: Style::default().fg(fg1).bg(bg0),
        list_selected: Style::default()
            .fg(bg0)
            .bg(fg1)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(orange),
        title: Style::default().fg(orange).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg1).bg(bg0),
        accent: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
        muted: Style::default().fg(gray),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
        favorite: Style::default().fg(purple),
    }
}

/// Returns a ThemeConfig based on the Everforest Light color palette.
pub fn everforest_light_theme() -> ThemeConfig {
    let bg = Color::Rgb(253, 246, 227);
    let bg_view = Color::Rgb(243, 234, 211);
    let fg = Color::Rgb(92, 106, 114);
    let gray = Color::Rgb(147, 159, 149);
    let yellow = Color::Rgb(223, 160, 0);
    let red = Color::Rgb(248, 85, 82);
    let magenta = Color::Rgb(223, 105, 186);

    ThemeConfig {
        background: bg,
        list_normal: Style::default().fg(fg).bg(bg_view),
        list_selected: Style::default()
            .fg(bg)
            .bg(gray)
            .add_modifier(Modifier::BOLD),
        border: Style::default().fg(gray),
        border_selected: Style::default().fg(yellow),
        title: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
        text: Style::default().fg(fg).bg(bg_view),
        accent: Style::default().fg(yellow).add_modifier(Modifier::BOLD),
        muted: Style::default().fg(gray),
        error: Style::default().fg(red).add_modifier(Modifier::BOLD),
        favorite: Style::default().fg(magenta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_str() {
        assert_eq!(Theme::from_str("Dracula"), Ok(Theme::Dracula));
        assert_eq!(Theme::from_str("everforest_light"), Ok(Theme::EverforestLight));
        assert!(Theme::from_str("neon").is_err());
    }

    #[test]
    fn test_card_color_prefers_gradient() {
        let gradient = CardBackground::Gradient((1, 2, 3), (4, 5, 6));
        assert_eq!(card_color(gradient), Color::Rgb(1, 2, 3));
        assert_eq!(
            card_color(CardBackground::Rarity(Rarity::Epic)),
            Color::Rgb(0xb1, 0x5b, 0xe2)
        );
    }
}
