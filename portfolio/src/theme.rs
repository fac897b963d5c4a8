use glam::Vec3;

pub const LIGHT_BACKGROUND: [u8; 4] = [0x65, 0x8e, 0xbf, 255];
pub const DARK_BACKGROUND: [u8; 4] = [0x18, 0x1b, 0x3b, 255];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Light targets a theme fades toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub sun_color: Vec3,
    pub sun_intensity: f32,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn background(self) -> [u8; 4] {
        match self {
            Theme::Light => LIGHT_BACKGROUND,
            Theme::Dark => DARK_BACKGROUND,
        }
    }

    pub fn lighting(self) -> Lighting {
        match self {
            Theme::Light => Lighting {
                ambient_color: Vec3::ONE,
                ambient_intensity: 0.3,
                sun_color: Vec3::new(1.0, 0.8, 0.6),
                sun_intensity: 1.0,
            },
            Theme::Dark => Lighting {
                ambient_color: Vec3::new(0.2, 0.2, 0.3),
                ambient_intensity: 0.75,
                sun_color: Vec3::new(0.2, 0.2, 0.3),
                sun_intensity: 0.3,
            },
        }
    }

    /// Label on the theme button; shows the theme a click switches to.
    pub fn button_label(self) -> &'static str {
        match self {
            Theme::Light => "MOON",
            Theme::Dark => "SUN",
        }
    }
}
