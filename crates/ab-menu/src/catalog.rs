use ab_core::asset::AssetRef;

use crate::selection::Selection;

/// Label shown for the silent effect slot.
pub const NONE_LABEL: &str = "None";

/// Ordered, append-only list of music tracks.
#[derive(Clone, Debug, Default)]
pub struct TrackCatalog {
    tracks: Vec<AssetRef>,
}

impl TrackCatalog {
    /// Nombre de pistes réelles (hors silence).
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track for `selection`, `None` for silence or out of range.
    #[must_use]
    pub fn get(&self, selection: Selection) -> Option<&AssetRef> {
        selection.index().and_then(|i| self.tracks.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetRef> {
        self.tracks.iter()
    }

    pub(crate) fn extend(&mut self, tracks: impl IntoIterator<Item = AssetRef>) {
        self.tracks.extend(tracks);
    }
}

/// Ordered, append-only list of `(label, handle)` sound effects.
///
/// The silent "None" slot is implicit: it is [`Selection::Silence`], never
/// stored, and has no handle.
pub struct EffectCatalog<S> {
    entries: Vec<(String, S)>,
}

impl<S> Default for EffectCatalog<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S> EffectCatalog<S> {
    /// Nombre d'effets réels (hors "None").
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label for `selection`; [`NONE_LABEL`] for silence or out of range.
    #[must_use]
    pub fn label(&self, selection: Selection) -> &str {
        selection
            .index()
            .and_then(|i| self.entries.get(i))
            .map_or(NONE_LABEL, |(label, _)| label.as_str())
    }

    /// Handle for `selection`, `None` for silence.
    #[must_use]
    pub fn handle(&self, selection: Selection) -> Option<&S> {
        selection
            .index()
            .and_then(|i| self.entries.get(i))
            .map(|(_, handle)| handle)
    }

    /// All labels, "None" first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(NONE_LABEL).chain(self.entries.iter().map(|(l, _)| l.as_str()))
    }

    pub(crate) fn extend(&mut self, entries: impl IntoIterator<Item = (String, S)>) {
        self.entries.extend(entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_maps_to_none_label_and_no_handle() {
        let mut effects = EffectCatalog::default();
        effects.extend([("Boop".to_string(), 1u8), ("Beep".to_string(), 2u8)]);

        assert_eq!(effects.label(Selection::Silence), NONE_LABEL);
        assert!(effects.handle(Selection::Silence).is_none());
        assert_eq!(effects.label(Selection::Entry(1)), "Beep");
        assert_eq!(effects.handle(Selection::Entry(0)), Some(&1));
        assert_eq!(effects.labels().collect::<Vec<_>>(), vec!["None", "Boop", "Beep"]);
    }

    #[test]
    fn track_lookup_skips_silence() {
        let mut tracks = TrackCatalog::default();
        tracks.extend([AssetRef::new("TrackA.ogg")]);
        assert!(tracks.get(Selection::Silence).is_none());
        assert_eq!(tracks.get(Selection::Entry(0)).map(AssetRef::label).as_deref(), Some("TrackA"));
        assert!(tracks.get(Selection::Entry(3)).is_none());
    }
}
