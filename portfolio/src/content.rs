//! Static tables: what can be clicked, where it links, and what its modal says.

/// Names (own or parent) that react to hover and click.
pub const INTERACTABLE: &[&str] = &[
    "Basket",
    "Behance",
    "Speakers",
    "Chair",
    "CV",
    "Dribbble",
    "IG",
    "Lamp",
    "Linkedin",
    "PC",
    "Phone",
    "PictureFrame",
    "Chest",
    "Picnic",
    "Project_3",
];

pub const SPEAKERS: &str = "Speakers";
pub const LAMP: &str = "Lamp";
pub const CHAIR: &str = "Chair";
/// Props that hop when clicked.
pub const BOUNCERS: &[&str] = &["Basket"];
/// The player-controlled node.
pub const CHARACTER: &str = "Character";

pub const EXTERNAL_LINKS: &[(&str, &str)] = &[
    ("Linkedin", "https://www.linkedin.com/in/masscity/"),
    ("Behance", "https://www.behance.net/muhamadsaputro1"),
    ("IG", "https://www.instagram.com/mass_city/"),
    ("Dribbble", "https://dribbble.com/masscity"),
    (
        "CV",
        "https://drive.google.com/file/d/1fS43JA80asxhomSJ7bch0yvdm1agD7Sk/view?usp=drive_link",
    ),
    (
        "Phone",
        "https://mail.google.com/mail/?view=cm&fs=1&to=andri.saputro98@gmail.com&su=I+Found+Your+Website!",
    ),
];

pub const DEFAULT_ACCENT: &str = "#1a1a1a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalEntry {
    pub title: &'static str,
    pub body: Option<&'static str>,
    /// `#rrggbb` or `#rrggbbaa`.
    pub accent: Option<&'static str>,
    pub link: Option<&'static str>,
    pub images: &'static [&'static str],
}

impl ModalEntry {
    pub fn accent(&self) -> &'static str {
        self.accent.unwrap_or(DEFAULT_ACCENT)
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }
}

pub const MODALS: &[(&str, ModalEntry)] = &[
    (
        "PC",
        ModalEntry {
            title: "Welcome to My Website",
            body: Some("Hello! Please feel free to look around my Portfolio!"),
            accent: Some("#2b7fbfff"),
            link: Some(
                "https://drive.google.com/file/d/1iB2tqXs-E7mtHesY6clckTBc-WIjdzcg/view?usp=drive_link",
            ),
            images: &[],
        },
    ),
    (
        "PictureFrame",
        ModalEntry {
            title: "Gallery",
            body: None,
            accent: Some("#ea7b36ff"),
            link: None,
            images: &["./media/IMG1.png", "./media/IMG2.png"],
        },
    ),
    (
        "Project_3",
        ModalEntry {
            title: "Weather App",
            body: Some(
                "Rise and shine as they say (but sometimes it's not all that shiny outside). \
                 Using a location-based API the user can automatically detect their location and \
                 my application will show them the weather near them. I also put some of my \
                 design skills to use using Figma.",
            ),
            accent: None,
            link: Some("https://example.com/"),
            images: &[],
        },
    ),
    (
        "Chest",
        ModalEntry {
            title: "About Me",
            body: Some(
                "Hi you found my chest, I'm Bella Xu and I am an aspiring creative developer and \
                 designer. I just started web development this year! In the signs, you will see \
                 some of my most recent projects that I'm proud of. I hope to add a lot more in \
                 the future. In my free time, I like to draw, watch TV shows (especially Pokemon), \
                 do clay sculpting and needle felting. Reach out if you wanna chat. Bella is OUT!!!",
            ),
            accent: None,
            link: None,
            images: &[],
        },
    ),
    (
        "Picnic",
        ModalEntry {
            title: "Uggh yesss",
            body: Some(
                "Picnics are my thanggg don't @ me. Lying down with some good grape juice inna wine \
                 glass and a nice book at a park is my total vibe. If this isn't max aura points \
                 idk what is.",
            ),
            accent: None,
            link: None,
            images: &[],
        },
    ),
];

pub fn is_interactable(name: &str) -> bool {
    INTERACTABLE.contains(&name)
}

pub fn modal_entry(name: &str) -> Option<(&'static str, &'static ModalEntry)> {
    MODALS.iter().find(|(n, _)| *n == name).map(|(n, e)| (*n, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_linked_or_modal_name_is_interactable() {
        for (name, _) in EXTERNAL_LINKS {
            assert!(is_interactable(name), "{name}");
        }
        for (name, _) in MODALS {
            assert!(is_interactable(name), "{name}");
        }
    }

    #[test]
    fn accents_parse_and_default() {
        for (name, entry) in MODALS {
            assert!(
                engine::graphics::parse_hex_color(entry.accent()).is_some(),
                "{name}"
            );
        }
        assert_eq!(modal_entry("Chest").map(|(_, e)| e.accent()), Some(DEFAULT_ACCENT));
    }

    #[test]
    fn gallery_is_the_only_entry_with_images() {
        let with_images: Vec<_> = MODALS
            .iter()
            .filter(|(_, e)| e.has_images())
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(with_images, vec!["PictureFrame"]);
    }
}
