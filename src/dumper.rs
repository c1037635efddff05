use crate::api::{AtomSummary, DumpOptions};
use crate::boxes::{Atom, FourCC};
use crate::context::ParseContext;
use crate::export::ParamSetExport;
use crate::known_boxes::AtomKind;
use crate::parser::{AtomReader, ParseError, Result};
use crate::registry::{Registry, TOP_LEVEL};
use crate::util;
use std::fmt;
use std::io::{Read, Seek, Write};

const ATOM_INDENT: &str = "    ";
const VALUE_INDENT: &str = "  ";

/// Longest string `field_string` reads inline; longer ones are hex dumped.
const MAX_INLINE_STRING: u64 = 256;

/// Walks the atom tree of one input and writes the text dump to `out`.
///
/// A `Dumper` owns every piece of mutable state for a single pass: the
/// reader with its atom stack, the parse context, the optional parameter-set
/// export and the outline that `dump` hands back to callers.
pub struct Dumper<R, W> {
    pub(crate) rdr: AtomReader<R>,
    pub(crate) out: W,
    pub(crate) ctx: ParseContext,
    pub(crate) export: Option<ParamSetExport>,
    pub(crate) desc_depth: usize,
    open_nodes: Vec<AtomSummary>,
    roots: Vec<AtomSummary>,
}

impl<R: Read + Seek, W: Write> Dumper<R, W> {
    pub fn new(input: R, out: W, opts: &DumpOptions) -> Result<Self> {
        Ok(Self {
            rdr: AtomReader::new(input)?,
            out,
            ctx: ParseContext::with_brand_override(opts.quicktime_brand),
            export: opts.avcc_path.clone().map(ParamSetExport::new),
            desc_depth: 0,
            open_nodes: Vec::new(),
            roots: Vec::new(),
        })
    }

    /// Dump every top-level atom until the end of the input.
    pub fn run(&mut self) -> Result<()> {
        while let Some(atom) = self.rdr.open_atom()? {
            self.open_nodes.push(AtomSummary::from_atom(&atom));
            self.dispatch(&TOP_LEVEL)?;
            self.close()?;
        }
        if let Some(export) = self.export.as_mut() {
            export.finish()?;
        }
        self.out.flush().map_err(ParseError::Output)
    }

    /// Top-level atoms seen so far, with their children.
    pub fn into_outline(self) -> Vec<AtomSummary> {
        self.roots
    }

    pub fn context(&self) -> &ParseContext {
        &self.ctx
    }

    // ---------- tree walking ----------

    /// Open a nested atom, optionally bounded by `limit` bytes.
    pub(crate) fn open(&mut self, limit: Option<u64>) -> Result<Atom> {
        let atom = self.rdr.open_atom_within(limit.unwrap_or(u64::MAX))?;
        self.open_nodes.push(AtomSummary::from_atom(&atom));
        Ok(atom)
    }

    pub(crate) fn close(&mut self) -> Result<()> {
        self.rdr.close_atom()?;
        if let Some(node) = self.open_nodes.pop() {
            match self.open_nodes.last_mut() {
                Some(parent) => parent.children.push(node),
                None => self.roots.push(node),
            }
        }
        Ok(())
    }

    /// Decode the innermost atom with the handler `table` picks for it, then
    /// report whatever the handler left unread.
    pub(crate) fn dispatch(&mut self, table: &Registry) -> Result<()> {
        let typ = self.current_type();
        let kind = table.lookup(typ);
        if kind == AtomKind::Unparsed {
            tracing::debug!(%typ, table = table.name(), "no decoder for atom");
        }
        if let Some(node) = self.open_nodes.last_mut() {
            node.handler = kind.full_name().to_string();
        }

        self.decode(kind)?;

        let left = self.rdr.remaining();
        if left > 0 {
            tracing::warn!(%typ, offset = self.rdr.offset(), left, "unparsed bytes after decoder");
            self.line(0, format_args!("remainder...: {} unparsed bytes", left))?;
            self.dump_bytes(left, 2)?;
            self.note_unparsed(left);
        }
        Ok(())
    }

    /// Open, dispatch and close a single child atom.
    pub(crate) fn child(&mut self, table: &Registry, limit: Option<u64>) -> Result<()> {
        self.open(limit)?;
        self.dispatch(table)?;
        self.close()
    }

    /// Plain container: header line, then children until the payload is spent.
    pub(crate) fn container(&mut self, table: &Registry) -> Result<()> {
        self.header()?;
        self.walk_children(table)
    }

    pub(crate) fn walk_children(&mut self, table: &Registry) -> Result<()> {
        while self.rdr.remaining() > 0 {
            self.child(table, None)?;
        }
        Ok(())
    }

    /// Walk child atoms while more than a bare header's worth of bytes is
    /// left above `end_remaining`. Each child must end at or before it.
    pub(crate) fn walk_entries(&mut self, table: &Registry, end_remaining: u64) -> Result<()> {
        while self.rdr.remaining() > end_remaining + 8 {
            let limit = self.rdr.remaining() - end_remaining;
            self.child(table, Some(limit))?;
        }
        Ok(())
    }

    pub(crate) fn current_type(&self) -> FourCC {
        self.rdr.current().map(|a| a.typ).unwrap_or_default()
    }

    pub(crate) fn parent_type(&self) -> Option<FourCC> {
        self.rdr.parent().map(|a| a.typ)
    }

    pub(crate) fn note_unparsed(&mut self, n: u64) {
        if let Some(node) = self.open_nodes.last_mut() {
            node.unparsed += n;
        }
    }

    // ---------- headers ----------

    /// `type: s=<size>, o=<offset>` at the nesting depth of the current atom.
    pub(crate) fn header(&mut self) -> Result<()> {
        let Some(atom) = self.rdr.current() else {
            return Err(ParseError::NoOpenAtom {
                offset: self.rdr.offset(),
            });
        };
        let line = format!(
            "{}{}: s={}, o={}",
            ATOM_INDENT.repeat(self.rdr.depth().saturating_sub(1)),
            atom.typ,
            util::file_size(atom.size),
            util::file_size(atom.offset)
        );
        writeln!(self.out, "{}", line).map_err(ParseError::Output)
    }

    /// Header plus version and flags. Versions above `max_version` are
    /// reported and `None` is returned; the caller stops decoding.
    pub(crate) fn full_atom(&mut self, max_version: u8) -> Result<Option<(u8, u32)>> {
        self.full_atom_noted(max_version, None)
    }

    /// Like [`Self::full_atom`], appending `note` to the flags line when the
    /// lowest flag bit is set.
    pub(crate) fn full_atom_noted(
        &mut self,
        max_version: u8,
        note: Option<&str>,
    ) -> Result<Option<(u8, u32)>> {
        self.header()?;
        let version = self.rdr.read_u8()?;
        self.field("version", version)?;
        let flags = self.rdr.read_u24()?;
        match note {
            Some(note) if flags & 1 != 0 => {
                self.line(0, format_args!("flags: 0x{:06x} {}", flags, note))?
            }
            _ => self.line(0, format_args!("flags: 0x{:06x}", flags))?,
        }

        if version > max_version {
            self.unknown_version(version)?;
            return Ok(None);
        }
        Ok(Some((version, flags)))
    }

    pub(crate) fn unknown_version(&mut self, version: u8) -> Result<()> {
        let left = self.rdr.remaining();
        let typ = self.current_type();
        tracing::warn!(%typ, version, left, "unsupported atom version");
        self.line(
            0,
            format_args!("remainder...: unknown version {}, {} unparsed bytes", version, left),
        )?;
        self.dump_bytes(left, 2)?;
        if let Some(node) = self.open_nodes.last_mut() {
            node.unknown_version = Some(version);
            node.unparsed += left;
        }
        Ok(())
    }

    // ---------- output primitives ----------

    pub(crate) fn indent(&self, extra: usize) -> String {
        format!(
            "{}{}{}",
            ATOM_INDENT.repeat(self.rdr.depth().saturating_sub(1)),
            VALUE_INDENT,
            " ".repeat(extra)
        )
    }

    /// One value line, indented under the current atom plus `extra` spaces.
    pub(crate) fn line(&mut self, extra: usize, args: fmt::Arguments<'_>) -> Result<()> {
        let indent = self.indent(extra);
        writeln!(self.out, "{}{}", indent, args).map_err(ParseError::Output)
    }

    pub(crate) fn field(&mut self, name: &str, value: impl fmt::Display) -> Result<()> {
        self.line(0, format_args!("{}: {}", name, value))
    }

    /// `name (count):` heading of a list.
    pub(crate) fn count_field(&mut self, name: &str, count: impl fmt::Display) -> Result<()> {
        self.line(0, format_args!("{} ({}):", name, count))
    }

    /// Hex dump `size` bytes read from the input.
    pub(crate) fn dump_bytes(&mut self, size: u64, extra: usize) -> Result<()> {
        let indent = self.indent(extra);
        let mut row = [0u8; 16];
        let mut done = 0u64;
        while done < size {
            let n = (size - done).min(16) as usize;
            self.rdr.read_bytes(&mut row[..n])?;
            writeln!(self.out, "{}{}", indent, util::hex_row(size, done, &row[..n]))
                .map_err(ParseError::Output)?;
            done += n as u64;
        }
        Ok(())
    }

    /// Hex dump bytes already in memory.
    pub(crate) fn dump_buffer(&mut self, bytes: &[u8], extra: usize) -> Result<()> {
        let indent = self.indent(extra);
        write_rows(&mut self.out, &indent, bytes)
    }

    /// `prefix` followed by a `size`-byte string read from the input.
    ///
    /// Printable text shows quoted, with trailing NUL padding spelled out as
    /// ` + 0x00 ...`. Anything else, or text longer than 256 bytes, ends the
    /// line and is hex dumped at `dump_extra`.
    pub(crate) fn field_string(
        &mut self,
        extra: usize,
        prefix: fmt::Arguments<'_>,
        size: u64,
        dump_extra: usize,
    ) -> Result<()> {
        if size == 0 {
            return self.line(extra, prefix);
        }
        if size > MAX_INLINE_STRING {
            self.line(extra, prefix)?;
            return self.dump_bytes(size, dump_extra);
        }

        let buf = self.rdr.read_vec(size as usize)?;
        let text_len = buf.iter().take_while(|&&c| util::is_printable(c)).count();
        if !buf[text_len..].iter().all(|&c| c == 0) {
            self.line(extra, prefix)?;
            return self.dump_buffer(&buf, dump_extra);
        }

        let text = String::from_utf8_lossy(&buf[..text_len]);
        let padding = " 0x00".repeat(buf.len() - text_len);
        if padding.is_empty() {
            self.line(extra, format_args!("{}'{}'", prefix, text))
        } else {
            self.line(extra, format_args!("{}'{}' +{}", prefix, text, padding))
        }
    }

    /// Column heading for an indexed table of `count` rows.
    pub(crate) fn table_heading(&mut self, count: u32, columns: &str) -> Result<()> {
        self.line(4, format_args!("{}{}", util::index_heading(count), columns))
    }
}

/// Hex rows for an in-memory buffer, each prefixed with `indent`.
pub(crate) fn write_rows<W: Write>(out: &mut W, indent: &str, bytes: &[u8]) -> Result<()> {
    let total = bytes.len() as u64;
    for (i, chunk) in bytes.chunks(16).enumerate() {
        writeln!(out, "{}{}", indent, util::hex_row(total, i as u64 * 16, chunk))
            .map_err(ParseError::Output)?;
    }
    Ok(())
}
