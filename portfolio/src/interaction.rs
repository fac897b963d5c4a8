use crate::content::{BOUNCERS, CHAIR, EXTERNAL_LINKS, LAMP, SPEAKERS};
use crate::sfx::SoundId;

/// What a click on a named scene object does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenLink(&'static str),
    ToggleAudio,
    ToggleTheme,
    PlayBounce(String),
    PlayChairSpin,
    OpenModal(String),
}

impl Action {
    /// Sound that accompanies the action. Audio toggling handles its own sound.
    pub fn sound(&self) -> Option<SoundId> {
        match self {
            Action::OpenLink(_) | Action::ToggleAudio | Action::ToggleTheme => None,
            Action::PlayBounce(_) => Some(SoundId::Pokemon),
            Action::PlayChairSpin => Some(SoundId::Chair),
            Action::OpenModal(_) => Some(SoundId::Projects),
        }
    }
}

/// Fixed-priority lookup from object name to [`Action`].
#[derive(Debug, Clone)]
pub struct InteractionTable {
    pub links: Vec<(&'static str, &'static str)>,
    pub speakers: Vec<&'static str>,
    pub lamps: Vec<&'static str>,
    pub bouncers: Vec<&'static str>,
    pub chairs: Vec<&'static str>,
}

impl Default for InteractionTable {
    fn default() -> Self {
        Self {
            links: EXTERNAL_LINKS.to_vec(),
            speakers: vec![SPEAKERS],
            lamps: vec![LAMP],
            bouncers: BOUNCERS.to_vec(),
            chairs: vec![CHAIR],
        }
    }
}

impl InteractionTable {
    /// Links win over everything, then speakers, lamps, bouncers and chairs; anything else
    /// opens its modal.
    pub fn resolve(&self, name: &str) -> Action {
        if let Some((_, url)) = self.links.iter().find(|(n, _)| *n == name) {
            return Action::OpenLink(url);
        }
        if self.speakers.contains(&name) {
            return Action::ToggleAudio;
        }
        if self.lamps.contains(&name) {
            return Action::ToggleTheme;
        }
        if self.bouncers.contains(&name) {
            return Action::PlayBounce(name.to_string());
        }
        if self.chairs.contains(&name) {
            return Action::PlayChairSpin;
        }
        Action::OpenModal(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_order_is_fixed() {
        let table = InteractionTable::default();
        assert!(matches!(table.resolve("Linkedin"), Action::OpenLink(url) if url.contains("linkedin")));
        assert_eq!(table.resolve("Speakers"), Action::ToggleAudio);
        assert_eq!(table.resolve("Lamp"), Action::ToggleTheme);
        assert_eq!(table.resolve("Basket"), Action::PlayBounce("Basket".into()));
        assert_eq!(table.resolve("Chair"), Action::PlayChairSpin);
        assert_eq!(table.resolve("PC"), Action::OpenModal("PC".into()));
    }

    #[test]
    fn link_beats_bounce_for_a_name_in_both() {
        let table = InteractionTable {
            links: vec![("Basket", "https://example.com/basket")],
            ..InteractionTable::default()
        };
        assert!(table.bouncers.contains(&"Basket"));
        assert_eq!(table.resolve("Basket"), Action::OpenLink("https://example.com/basket"));
    }

    #[test]
    fn speaker_beats_lamp_and_chair() {
        let table = InteractionTable {
            lamps: vec!["Speakers", "Lamp"],
            chairs: vec!["Speakers", "Chair"],
            ..InteractionTable::default()
        };
        assert_eq!(table.resolve("Speakers"), Action::ToggleAudio);
    }

    #[test]
    fn sounds_follow_action_kind() {
        assert_eq!(Action::PlayChairSpin.sound(), Some(SoundId::Chair));
        assert_eq!(Action::PlayBounce("Basket".into()).sound(), Some(SoundId::Pokemon));
        assert_eq!(Action::OpenModal("x".into()).sound(), Some(SoundId::Projects));
        assert_eq!(Action::ToggleAudio.sound(), None);
    }
}
