/// Every payload layout the dumper knows how to decode.
///
/// Which tag maps to which kind depends on where the atom sits in the tree;
/// see [`crate::registry`]. Anything without a mapping is `Unparsed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomKind {
    Unparsed,

    // File level
    FileType,
    MediaData,
    FreeSpace,
    SegmentIndex,
    SubsegmentIndex,

    // Movie and track structure
    Movie,
    MovieHeader,
    Track,
    TrackHeader,
    TrackAperture,
    ApertureDimensions,
    Edits,
    EditList,
    TrackReferences,
    TrackReference,
    Media,
    MediaHeader,
    HandlerReference,
    MediaInformation,

    // Media information headers
    VideoMediaHeader,
    SoundMediaHeader,
    NullMediaHeader,
    BaseMediaHeader,
    BaseMediaInfo,
    TimecodeMediaHeader,
    TimecodeMediaInfo,
    DataInformation,
    DataReference,
    DataReferenceEntry,

    // Sample table
    SampleTable,
    SampleDescription,
    TimeToSample,
    CompositionOffset,
    CompositionShift,
    SyncSample,
    SampleDependency,
    SampleToChunk,
    SampleSize,
    ChunkOffset,
    ChunkOffset64,

    // Sample entry extensions
    ColorParameter,
    FieldHandling,
    PixelAspectRatio,
    CleanAperture,
    AvcConfiguration,
    BitRate,
    ElementaryStreamDescriptor,

    // Metadata and user data
    Metadata,
    MetadataKeys,
    MetadataItemList,
    MetadataItem,
    MetadataValue,
    UserData,
    UserDataName,
    InternationalText,

    // Fragments
    MovieExtends,
    MovieExtendsHeader,
    TrackExtends,
    MovieFragment,
    MovieFragmentHeader,
    TrackFragment,
    TrackFragmentHeader,
    TrackRun,
    TrackFragmentDecodeTime,
}

impl AtomKind {
    pub fn full_name(&self) -> &'static str {
        use AtomKind::*;
        match self {
            Unparsed => "Unparsed Atom",

            FileType => "File Type Atom",
            MediaData => "Media Data Atom",
            FreeSpace => "Free Space Atom",
            SegmentIndex => "Segment Index Atom",
            SubsegmentIndex => "Subsegment Index Atom",

            Movie => "Movie Atom",
            MovieHeader => "Movie Header Atom",
            Track => "Track Atom",
            TrackHeader => "Track Header Atom",
            TrackAperture => "Track Aperture Mode Dimensions Atom",
            ApertureDimensions => "Aperture Dimensions Atom",
            Edits => "Edit Atom",
            EditList => "Edit List Atom",
            TrackReferences => "Track Reference Atom",
            TrackReference => "Track Reference Type Atom",
            Media => "Media Atom",
            MediaHeader => "Media Header Atom",
            HandlerReference => "Handler Reference Atom",
            MediaInformation => "Media Information Atom",

            VideoMediaHeader => "Video Media Information Header Atom",
            SoundMediaHeader => "Sound Media Information Header Atom",
            NullMediaHeader => "Null Media Header Atom",
            BaseMediaHeader => "Base Media Information Header Atom",
            BaseMediaInfo => "Base Media Info Atom",
            TimecodeMediaHeader => "Timecode Media Information Atom",
            TimecodeMediaInfo => "Timecode Media Info Atom",
            DataInformation => "Data Information Atom",
            DataReference => "Data Reference Atom",
            DataReferenceEntry => "Data Reference Entry",

            SampleTable => "Sample Table Atom",
            SampleDescription => "Sample Description Atom",
            TimeToSample => "Time-to-Sample Atom",
            CompositionOffset => "Composition Offset Atom",
            CompositionShift => "Composition Shift Least Greatest Atom",
            SyncSample => "Sync Sample Atom",
            SampleDependency => "Sample Dependency Flags Atom",
            SampleToChunk => "Sample-to-Chunk Atom",
            SampleSize => "Sample Size Atom",
            ChunkOffset => "Chunk Offset Atom",
            ChunkOffset64 => "64-bit Chunk Offset Atom",

            ColorParameter => "Color Parameter Atom",
            FieldHandling => "Field Handling Atom",
            PixelAspectRatio => "Pixel Aspect Ratio Atom",
            CleanAperture => "Clean Aperture Atom",
            AvcConfiguration => "AVC Decoder Configuration Atom",
            BitRate => "Bit Rate Atom",
            ElementaryStreamDescriptor => "Elementary Stream Descriptor Atom",

            Metadata => "Metadata Atom",
            MetadataKeys => "Metadata Item Keys Atom",
            MetadataItemList => "Metadata Item List Atom",
            MetadataItem => "Metadata Item Atom",
            MetadataValue => "Metadata Value Atom",
            UserData => "User Data Atom",
            UserDataName => "User Data Name Atom",
            InternationalText => "International Text Atom",

            MovieExtends => "Movie Extends Atom",
            MovieExtendsHeader => "Movie Extends Header Atom",
            TrackExtends => "Track Extends Atom",
            MovieFragment => "Movie Fragment Atom",
            MovieFragmentHeader => "Movie Fragment Header Atom",
            TrackFragment => "Track Fragment Atom",
            TrackFragmentHeader => "Track Fragment Header Atom",
            TrackRun => "Track Fragment Run Atom",
            TrackFragmentDecodeTime => "Track Fragment Decode Time Atom",
        }
    }

    /// Plain containers whose payload is nothing but child atoms.
    pub fn is_container(&self) -> bool {
        use AtomKind::*;
        matches!(
            self,
            Movie
                | TrackAperture
                | Edits
                | TrackReferences
                | Media
                | MediaInformation
                | BaseMediaHeader
                | TimecodeMediaHeader
                | DataInformation
                | SampleTable
                | MetadataItemList
                | MovieExtends
                | MovieFragment
                | TrackFragment
        )
    }
}
