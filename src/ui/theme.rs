// Named, immutable styles handed to the screens when they are built.

use crossterm::style::{Attribute, Color, ContentStyle};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub title: ContentStyle,
    pub prompt: ContentStyle,
    pub input: ContentStyle,
    pub help: ContentStyle,
    pub success: ContentStyle,
    pub error: ContentStyle,
    pub filename: ContentStyle,
    pub url: ContentStyle,
    pub stats: ContentStyle,
    pub speed: ContentStyle,
    pub spinner: ContentStyle,
    pub bar_filled: ContentStyle,
    pub bar_empty: ContentStyle,
}

const PURPLE: Color = Color::Rgb { r: 0x7D, g: 0x56, b: 0xF4 };
const CYAN: Color = Color::Rgb { r: 0x00, g: 0xD7, b: 0xFF };
const GREY: Color = Color::Rgb { r: 0x62, g: 0x62, b: 0x62 };

impl Default for Theme {
    fn default() -> Self {
        let mut title = style(Color::Rgb { r: 0xFA, g: 0xFA, b: 0xFA }, &[Attribute::Bold]);
        title.background_color = Some(PURPLE);

        Self {
            title,
            prompt: style(Color::Rgb { r: 0xFF, g: 0x75, b: 0xB7 }, &[Attribute::Bold]),
            input: style(CYAN, &[]),
            help: style(GREY, &[]),
            success: style(Color::Rgb { r: 0x04, g: 0xB5, b: 0x75 }, &[Attribute::Bold]),
            error: style(Color::Rgb { r: 0xFF, g: 0x5F, b: 0x87 }, &[Attribute::Bold]),
            filename: style(PURPLE, &[Attribute::Bold]),
            url: style(CYAN, &[Attribute::Underlined]),
            stats: style(Color::Rgb { r: 0xFF, g: 0xF7, b: 0xDB }, &[]),
            speed: style(PURPLE, &[Attribute::Bold]),
            spinner: style(Color::AnsiValue(205), &[]),
            bar_filled: style(PURPLE, &[]),
            bar_empty: style(GREY, &[]),
        }
    }
}

impl Theme {
    /// No colors or attributes at all.
    pub fn plain() -> Self {
        let none = ContentStyle::new();
        Self {
            title: none,
            prompt: none,
            input: none,
            help: none,
            success: none,
            error: none,
            filename: none,
            url: none,
            stats: none,
            speed: none,
            spinner: none,
            bar_filled: none,
            bar_empty: none,
        }
    }

    /// Plain when `NO_COLOR` is set, colored otherwise.
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            Self::plain()
        } else {
            Self::default()
        }
    }
}

fn style(fg: Color, attributes: &[Attribute]) -> ContentStyle {
    let mut style = ContentStyle::new();
    style.foreground_color = Some(fg);
    for attribute in attributes {
        style.attributes.set(*attribute);
    }
    style
}
