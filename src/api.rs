use crate::boxes::Atom;
use crate::dumper::Dumper;
use crate::parser::ParseError;
use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::{Path, PathBuf};

/// Knobs for a single dump.
#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    /// Write every avcC parameter set, length-prefixed, to this file.
    pub avcc_path: Option<PathBuf>,
    /// Force (or suppress) QuickTime-style `hdlr` names instead of
    /// deciding from the `ftyp` major brand.
    pub quicktime_brand: Option<bool>,
}

/// One atom of the tree as the dump saw it.
///
/// This is the JSON-serializable shape of a dump: the text output stays the
/// primary product, the outline lets callers check structure without
/// scraping it.
#[derive(Debug, Clone, Serialize)]
pub struct AtomSummary {
    /// Four-character type code
    pub typ: String,
    /// Absolute byte offset of the atom header
    pub offset: u64,
    /// Total size including header
    pub size: u64,
    /// 8, or 16 for the extended-size form
    pub header_size: u64,
    /// Name of the decoder that handled the atom
    pub handler: String,
    /// Bytes the decoder did not interpret
    #[serde(skip_serializing_if = "is_zero")]
    pub unparsed: u64,
    /// Set when the atom's version was newer than the decoder understands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unknown_version: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AtomSummary>,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

impl AtomSummary {
    pub(crate) fn from_atom(atom: &Atom) -> Self {
        Self {
            typ: atom.typ.to_string(),
            offset: atom.offset,
            size: atom.size,
            header_size: atom.header_size,
            handler: String::new(),
            unparsed: 0,
            unknown_version: None,
            children: Vec::new(),
        }
    }

    /// Depth-first iterator over this atom and everything below it.
    pub fn walk(&self) -> impl Iterator<Item = &AtomSummary> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Dump the atom tree of `input` to `out` and return its outline.
///
/// The text is written as it is decoded, so on error `out` holds everything
/// up to the failing atom.
///
/// # Example
/// ```no_run
/// use atomdump::{DumpOptions, dump};
/// use std::fs::File;
///
/// let file = File::open("movie.mov")?;
/// let outline = dump(file, std::io::stdout(), &DumpOptions::default())?;
/// println!("{} top-level atoms", outline.len());
/// # Ok::<(), atomdump::ParseError>(())
/// ```
pub fn dump<R: Read + Seek, W: Write>(
    input: R,
    out: W,
    opts: &DumpOptions,
) -> Result<Vec<AtomSummary>, ParseError> {
    let mut dumper = Dumper::new(input, out, opts)?;
    dumper.run()?;
    Ok(dumper.into_outline())
}

/// [`dump`] for a file on disk.
pub fn dump_file<W: Write>(
    path: impl AsRef<Path>,
    out: W,
    opts: &DumpOptions,
) -> anyhow::Result<Vec<AtomSummary>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let outline = dump(BufReader::new(file), out, opts)
        .with_context(|| format!("failed to dump {}", path.display()))?;
    Ok(outline)
}
