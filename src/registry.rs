use crate::boxes::FourCC;
use crate::known_boxes::AtomKind;

/// How a table entry matches an atom's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMatch {
    Exact(FourCC),
    /// Any tag at all.
    Any,
    /// Any tag in the `©xxx` international-text namespace.
    International,
}

impl TypeMatch {
    pub fn matches(&self, typ: FourCC) -> bool {
        match self {
            TypeMatch::Exact(t) => *t == typ,
            TypeMatch::Any => true,
            TypeMatch::International => typ.is_international(),
        }
    }
}

/// Ordered, first-match-wins mapping from type tag to decoder kind.
///
/// Tables are scoped: each container owns the table for its children.
#[derive(Debug)]
pub struct Registry {
    name: &'static str,
    entries: &'static [(TypeMatch, AtomKind)],
}

impl Registry {
    pub const fn new(name: &'static str, entries: &'static [(TypeMatch, AtomKind)]) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up the decoder for `typ`, falling back to [`AtomKind::Unparsed`].
    pub fn lookup(&self, typ: FourCC) -> AtomKind {
        self.entries
            .iter()
            .find(|(m, _)| m.matches(typ))
            .map(|(_, kind)| *kind)
            .unwrap_or(AtomKind::Unparsed)
    }
}

const fn tag(t: &[u8; 4]) -> TypeMatch {
    TypeMatch::Exact(FourCC(*t))
}

use crate::known_boxes::AtomKind as K;

pub static TOP_LEVEL: Registry = Registry::new(
    "file",
    &[
        (tag(b"ftyp"), K::FileType),
        (tag(b"styp"), K::FileType),
        (tag(b"mdat"), K::MediaData),
        (tag(b"free"), K::FreeSpace),
        (tag(b"skip"), K::FreeSpace),
        (tag(b"wide"), K::FreeSpace),
        (tag(b"moov"), K::Movie),
        (tag(b"sidx"), K::SegmentIndex),
        (tag(b"moof"), K::MovieFragment),
        (tag(b"ssix"), K::SubsegmentIndex),
    ],
);

pub static MOVIE: Registry = Registry::new(
    "moov",
    &[
        (tag(b"mvhd"), K::MovieHeader),
        (tag(b"trak"), K::Track),
        (tag(b"meta"), K::Metadata),
        (tag(b"udta"), K::UserData),
        (tag(b"mvex"), K::MovieExtends),
    ],
);

pub static TRACK: Registry = Registry::new(
    "trak",
    &[
        (tag(b"tkhd"), K::TrackHeader),
        (tag(b"tapt"), K::TrackAperture),
        (tag(b"edts"), K::Edits),
        (tag(b"tref"), K::TrackReferences),
        (tag(b"mdia"), K::Media),
        (tag(b"meta"), K::Metadata),
        (tag(b"udta"), K::UserData),
    ],
);

pub static TRACK_APERTURE: Registry = Registry::new(
    "tapt",
    &[
        (tag(b"clef"), K::ApertureDimensions),
        (tag(b"prof"), K::ApertureDimensions),
        (tag(b"enof"), K::ApertureDimensions),
    ],
);

pub static EDITS: Registry = Registry::new("edts", &[(tag(b"elst"), K::EditList)]);

pub static TRACK_REFERENCES: Registry =
    Registry::new("tref", &[(TypeMatch::Any, K::TrackReference)]);

pub static MEDIA: Registry = Registry::new(
    "mdia",
    &[
        (tag(b"mdhd"), K::MediaHeader),
        (tag(b"hdlr"), K::HandlerReference),
        (tag(b"minf"), K::MediaInformation),
    ],
);

pub static MEDIA_INFORMATION: Registry = Registry::new(
    "minf",
    &[
        (tag(b"vmhd"), K::VideoMediaHeader),
        (tag(b"smhd"), K::SoundMediaHeader),
        (tag(b"nmhd"), K::NullMediaHeader),
        (tag(b"gmhd"), K::BaseMediaHeader),
        (tag(b"hdlr"), K::HandlerReference),
        (tag(b"dinf"), K::DataInformation),
        (tag(b"stbl"), K::SampleTable),
    ],
);

pub static BASE_MEDIA_HEADER: Registry = Registry::new(
    "gmhd",
    &[
        (tag(b"gmin"), K::BaseMediaInfo),
        (tag(b"tmcd"), K::TimecodeMediaHeader),
    ],
);

pub static TIMECODE_MEDIA_HEADER: Registry =
    Registry::new("tmcd", &[(tag(b"tcmi"), K::TimecodeMediaInfo)]);

pub static DATA_INFORMATION: Registry =
    Registry::new("dinf", &[(tag(b"dref"), K::DataReference)]);

pub static DATA_REFERENCE: Registry =
    Registry::new("dref", &[(TypeMatch::Any, K::DataReferenceEntry)]);

pub static SAMPLE_TABLE: Registry = Registry::new(
    "stbl",
    &[
        (tag(b"stsd"), K::SampleDescription),
        (tag(b"stts"), K::TimeToSample),
        (tag(b"ctts"), K::CompositionOffset),
        (tag(b"cslg"), K::CompositionShift),
        (tag(b"stss"), K::SyncSample),
        (tag(b"stps"), K::SyncSample),
        (tag(b"sdtp"), K::SampleDependency),
        (tag(b"stsc"), K::SampleToChunk),
        (tag(b"stsz"), K::SampleSize),
        (tag(b"stco"), K::ChunkOffset),
        (tag(b"co64"), K::ChunkOffset64),
    ],
);

pub static VIDEO_SAMPLE_ENTRY: Registry = Registry::new(
    "video sample entry",
    &[
        (tag(b"colr"), K::ColorParameter),
        (tag(b"fiel"), K::FieldHandling),
        (tag(b"pasp"), K::PixelAspectRatio),
        (tag(b"clap"), K::CleanAperture),
        (tag(b"avcC"), K::AvcConfiguration),
        (tag(b"btrt"), K::BitRate),
    ],
);

pub static SOUND_SAMPLE_ENTRY: Registry = Registry::new(
    "sound sample entry",
    &[
        (tag(b"esds"), K::ElementaryStreamDescriptor),
        (tag(b"btrt"), K::BitRate),
    ],
);

pub static TIMECODE_SAMPLE_ENTRY: Registry =
    Registry::new("timecode sample entry", &[(tag(b"name"), K::InternationalText)]);

pub static METADATA: Registry = Registry::new(
    "meta",
    &[
        (tag(b"hdlr"), K::HandlerReference),
        (tag(b"keys"), K::MetadataKeys),
        (tag(b"ilst"), K::MetadataItemList),
    ],
);

pub static METADATA_ITEM_LIST: Registry =
    Registry::new("ilst", &[(TypeMatch::Any, K::MetadataItem)]);

pub static METADATA_ITEM: Registry =
    Registry::new("ilst item", &[(tag(b"data"), K::MetadataValue)]);

pub static USER_DATA: Registry = Registry::new(
    "udta",
    &[
        (tag(b"name"), K::UserDataName),
        (tag(b"meta"), K::Metadata),
        (TypeMatch::International, K::InternationalText),
    ],
);

pub static MOVIE_EXTENDS: Registry = Registry::new(
    "mvex",
    &[
        (tag(b"mehd"), K::MovieExtendsHeader),
        (tag(b"trex"), K::TrackExtends),
    ],
);

pub static MOVIE_FRAGMENT: Registry = Registry::new(
    "moof",
    &[
        (tag(b"mfhd"), K::MovieFragmentHeader),
        (tag(b"traf"), K::TrackFragment),
    ],
);

pub static TRACK_FRAGMENT: Registry = Registry::new(
    "traf",
    &[
        (tag(b"tfhd"), K::TrackFragmentHeader),
        (tag(b"trun"), K::TrackRun),
        (tag(b"tfdt"), K::TrackFragmentDecodeTime),
    ],
);

/// Child table for the plain containers of [`AtomKind::is_container`].
pub fn children_of(kind: AtomKind) -> Option<&'static Registry> {
    let table = match kind {
        K::Movie => &MOVIE,
        K::TrackAperture => &TRACK_APERTURE,
        K::Edits => &EDITS,
        K::TrackReferences => &TRACK_REFERENCES,
        K::Media => &MEDIA,
        K::MediaInformation => &MEDIA_INFORMATION,
        K::BaseMediaHeader => &BASE_MEDIA_HEADER,
        K::TimecodeMediaHeader => &TIMECODE_MEDIA_HEADER,
        K::DataInformation => &DATA_INFORMATION,
        K::SampleTable => &SAMPLE_TABLE,
        K::MetadataItemList => &METADATA_ITEM_LIST,
        K::MovieExtends => &MOVIE_EXTENDS,
        K::MovieFragment => &MOVIE_FRAGMENT,
        K::TrackFragment => &TRACK_FRAGMENT,
        _ => return None,
    };
    Some(table)
}
