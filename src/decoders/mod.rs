//! Payload decoders, one `impl Dumper` block per area of the format.
//!
//! Every decoder starts with the atom's header line and reads fields through
//! the dumper's reader, so each byte it consumes is charged to the atom.

mod avc;
mod descriptor;
mod fragment;
mod media;
mod metadata;
mod movie;
mod sample_entry;
mod sample_table;

pub use descriptor::MAX_DESCRIPTOR_DEPTH;

use crate::dumper::Dumper;
use crate::known_boxes::AtomKind;
use crate::parser::Result;
use crate::registry;
use std::io::{Read, Seek, Write};

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    pub(crate) fn decode(&mut self, kind: AtomKind) -> Result<()> {
        use AtomKind::*;

        match kind {
            Unparsed => self.unparsed(),

            FileType => self.file_type(),
            MediaData | FreeSpace => self.skipped(),
            SegmentIndex => self.segment_index(),
            SubsegmentIndex => self.subsegment_index(),

            MovieHeader => self.movie_header(),
            Track => self.track(),
            TrackHeader => self.track_header(),
            ApertureDimensions => self.aperture_dimensions(),
            EditList => self.edit_list(),
            TrackReference => self.track_reference(),
            MediaHeader => self.media_header(),
            HandlerReference => self.handler_reference(),

            VideoMediaHeader => self.video_media_header(),
            SoundMediaHeader => self.sound_media_header(),
            NullMediaHeader => self.null_media_header(),
            BaseMediaInfo => self.base_media_info(),
            TimecodeMediaInfo => self.timecode_media_info(),
            DataReference => self.data_reference(),
            DataReferenceEntry => self.data_reference_entry(),

            SampleDescription => self.sample_description(),
            TimeToSample => self.time_to_sample(),
            CompositionOffset => self.composition_offset(),
            CompositionShift => self.composition_shift(),
            SyncSample => self.sync_sample(),
            SampleDependency => self.sample_dependency(),
            SampleToChunk => self.sample_to_chunk(),
            SampleSize => self.sample_size(),
            ChunkOffset => self.chunk_offset(),
            ChunkOffset64 => self.chunk_offset64(),

            ColorParameter => self.color_parameter(),
            FieldHandling => self.field_handling(),
            PixelAspectRatio => self.pixel_aspect_ratio(),
            CleanAperture => self.clean_aperture(),
            AvcConfiguration => self.avc_configuration(),
            BitRate => self.bit_rate(),
            ElementaryStreamDescriptor => self.elementary_stream_descriptor(),

            Metadata => self.metadata(),
            MetadataKeys => self.metadata_keys(),
            MetadataItem => self.metadata_item(),
            MetadataValue => self.metadata_value(),
            UserData => self.user_data(),
            UserDataName => self.user_data_name(),
            InternationalText => self.international_text(),

            MovieExtendsHeader => self.movie_extends_header(),
            TrackExtends => self.track_extends(),
            MovieFragmentHeader => self.movie_fragment_header(),
            TrackFragmentHeader => self.track_fragment_header(),
            TrackRun => self.track_run(),
            TrackFragmentDecodeTime => self.track_fragment_decode_time(),

            Movie | TrackAperture | Edits | TrackReferences | Media | MediaInformation
            | BaseMediaHeader | TimecodeMediaHeader | DataInformation | SampleTable
            | MetadataItemList | MovieExtends | MovieFragment | TrackFragment => {
                match registry::children_of(kind) {
                    Some(table) => self.container(table),
                    None => self.unparsed(),
                }
            }
        }
    }

    fn unparsed(&mut self) -> Result<()> {
        self.header()?;
        let left = self.rdr.remaining();
        if left > 0 {
            self.dump_bytes(left, 0)?;
            self.note_unparsed(left);
        }
        Ok(())
    }
}
