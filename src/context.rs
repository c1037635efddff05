use crate::boxes::FourCC;

pub const MHLR_COMPONENT_TYPE: FourCC = FourCC(*b"mhlr");
pub const QT_BRAND: FourCC = FourCC(*b"qt  ");

/// Which trailer layout applies to the entries of a sample description table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEntryLayout {
    Video,
    Sound,
    Timecode,
}

/// State carried from one atom to a later one during a single pass.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Set by `mvhd`; converts track and movie durations to seconds.
    pub movie_timescale: u32,
    /// Component type and sub-type from the media `hdlr` of the current track.
    pub component_type: FourCC,
    pub component_sub_type: FourCC,
    /// True until an `ftyp`/`styp` names a major brand other than `qt  `.
    pub quicktime_brand: bool,
    /// When set, `ftyp`/`styp` no longer change `quicktime_brand`.
    pub brand_pinned: bool,
    /// Key names from the most recent `keys` atom of the open `meta` block.
    pub metadata_keys: Vec<String>,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self {
            movie_timescale: 0,
            component_type: FourCC::default(),
            component_sub_type: FourCC::default(),
            quicktime_brand: true,
            brand_pinned: false,
            metadata_keys: Vec::new(),
        }
    }
}

impl ParseContext {
    pub fn with_brand_override(quicktime_brand: Option<bool>) -> Self {
        match quicktime_brand {
            Some(qt) => Self {
                quicktime_brand: qt,
                brand_pinned: true,
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    pub fn set_major_brand(&mut self, brand: FourCC) {
        if !self.brand_pinned {
            self.quicktime_brand = brand == QT_BRAND;
        }
    }

    /// Forget the handler of the previous track.
    pub fn reset_track(&mut self) {
        self.component_type = FourCC::default();
        self.component_sub_type = FourCC::default();
    }

    pub fn set_handler(&mut self, component_type: FourCC, component_sub_type: FourCC) {
        self.component_type = component_type;
        self.component_sub_type = component_sub_type;
    }

    /// Layout for sample description entries of the current track.
    ///
    /// QuickTime media handlers carry the `mhlr` component type; ISO files
    /// leave the field zero. A zero component type is only trusted outside
    /// QuickTime-branded files. This is a heuristic: legacy QuickTime files
    /// with a zero component type fall through to an unparsed trailer.
    pub fn sample_entry_layout(&self) -> Option<SampleEntryLayout> {
        let trusted = self.component_type == MHLR_COMPONENT_TYPE
            || (self.component_type.is_zero() && !self.quicktime_brand);
        if !trusted {
            return None;
        }
        match &self.component_sub_type.0 {
            b"vide" => Some(SampleEntryLayout::Video),
            b"soun" => Some(SampleEntryLayout::Sound),
            b"tmcd" => Some(SampleEntryLayout::Timecode),
            _ => None,
        }
    }

    /// Name recorded for a 1-based key index, if the key was printable.
    pub fn key_name(&self, index: u32) -> Option<&str> {
        let i = usize::try_from(index).ok()?.checked_sub(1)?;
        self.metadata_keys
            .get(i)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn seconds(duration: i64, timescale: u32) -> f64 {
        if timescale == 0 {
            0.0
        } else {
            duration as f64 / timescale as f64
        }
    }
}
