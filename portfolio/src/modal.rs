use crate::content::{ModalEntry, modal_entry};

/// The open modal, if any, and the gallery position inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    current: Option<&'static str>,
    entry: Option<&'static ModalEntry>,
    image_index: usize,
}

impl ModalState {
    /// Opens the entry for `name`. Returns false (and changes nothing) when there is none.
    pub fn open(&mut self, name: &str) -> bool {
        let Some((key, entry)) = modal_entry(name) else {
            log::debug!("no modal content for {name:?}");
            return false;
        };
        self.show(key, entry);
        true
    }

    /// Shows `entry` under `name`, starting at its first image.
    pub fn show(&mut self, name: &'static str, entry: &'static ModalEntry) {
        self.current = Some(name);
        self.entry = Some(entry);
        self.image_index = 0;
    }

    pub fn close(&mut self) {
        self.current = None;
        self.entry = None;
        self.image_index = 0;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&'static str> {
        self.current
    }

    pub fn entry(&self) -> Option<&'static ModalEntry> {
        self.entry
    }

    pub fn show_carousel(&self) -> bool {
        self.entry.is_some_and(ModalEntry::has_images)
    }

    pub fn show_visit(&self) -> bool {
        self.entry.is_some_and(|e| e.link.is_some())
    }

    pub fn link(&self) -> Option<&'static str> {
        self.entry.and_then(|e| e.link)
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    pub fn current_image(&self) -> Option<&'static str> {
        self.entry
            .and_then(|e| e.images.get(self.image_index))
            .copied()
    }

    pub fn next(&mut self) {
        let count = self.image_count();
        if count > 0 {
            self.image_index = (self.image_index + 1) % count;
        }
    }

    pub fn previous(&mut self) {
        let count = self.image_count();
        if count > 0 {
            self.image_index = (self.image_index + count - 1) % count;
        }
    }

    fn image_count(&self) -> usize {
        self.entry.map_or(0, |e| e.images.len())
    }
}
