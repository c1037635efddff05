use crate::parser::{ParseError, Result};
use byteorder::{BigEndian, WriteBytesExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes AVC parameter sets as length-prefixed NAL units.
///
/// The target file is created on first use, so a run without any `avcC`
/// atom leaves no file behind.
#[derive(Debug)]
pub struct ParamSetExport {
    path: PathBuf,
    file: Option<BufWriter<File>>,
    buffer: Vec<u8>,
}

impl ParamSetExport {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: None,
            buffer: Vec::new(),
        }
    }

    /// Scratch space for the next `len`-byte parameter set. Grows to the next
    /// 256-byte boundary when too small.
    pub fn stage(&mut self, len: usize) -> &mut [u8] {
        if self.buffer.len() < len {
            self.buffer.resize((len + 255) & !255, 0);
        }
        &mut self.buffer[..len]
    }

    pub fn staged(&self, len: usize) -> &[u8] {
        &self.buffer[..len]
    }

    /// Write the first `len` staged bytes behind a `width`-byte big-endian
    /// length prefix.
    pub fn commit(&mut self, width: u8, len: usize) -> Result<()> {
        if width < 4 && (len as u64) >> (8 * width as u32) != 0 {
            return Err(ParseError::PrefixOverflow { size: len, width });
        }
        let Self { path, file, buffer } = self;
        let to_export = |source: std::io::Error| ParseError::Export {
            path: path.clone(),
            source,
        };

        if file.is_none() {
            let created = File::create(path.as_path()).map_err(to_export)?;
            tracing::info!(path = %path.display(), "writing parameter sets");
            *file = Some(BufWriter::new(created));
        }
        if let Some(out) = file.as_mut() {
            out.write_uint::<BigEndian>(len as u64, width as usize)
                .map_err(to_export)?;
            out.write_all(&buffer[..len]).map_err(to_export)?;
        }
        Ok(())
    }

    /// Flush the export file and release the scratch buffer.
    pub fn finish(&mut self) -> Result<()> {
        self.buffer = Vec::new();
        if let Some(file) = self.file.as_mut() {
            file.flush().map_err(|source| ParseError::Export {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_grows_in_256_byte_steps() {
        let mut export = ParamSetExport::new(PathBuf::from("unused"));
        assert_eq!(export.stage(3).len(), 3);
        assert_eq!(export.buffer.len(), 256);
        export.stage(257);
        assert_eq!(export.buffer.len(), 512);
        export.stage(10);
        assert_eq!(export.buffer.len(), 512);
    }

    #[test]
    fn one_byte_prefix_rejects_long_sets() {
        let mut export = ParamSetExport::new(PathBuf::from("unused"));
        export.stage(300);
        assert!(matches!(
            export.commit(1, 300),
            Err(ParseError::PrefixOverflow { size: 300, width: 1 })
        ));
        // nothing was opened
        assert!(export.file.is_none());
    }
}
