use crate::boxes::{Atom, FourCC};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;

/// Maximum number of simultaneously open atoms.
pub const MAX_ATOM_DEPTH: usize = 64;

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("writing output: {0}")]
    Output(#[source] io::Error),
    #[error("unexpected end of file at offset {offset:#x}")]
    UnexpectedEof { offset: u64 },
    #[error("invalid size {size} for atom '{typ}' at offset {offset:#x}")]
    InvalidSize { typ: FourCC, size: u64, offset: u64 },
    #[error("atom header at offset {offset:#x} needs {needed} bytes but only {available} remain")]
    HeaderOverrun { offset: u64, needed: u64, available: u64 },
    #[error("atom '{typ}' at offset {offset:#x} declares {size} bytes but only {available} remain")]
    ExceedsParent { typ: FourCC, size: u64, offset: u64, available: u64 },
    #[error("read of {wanted} bytes at offset {offset:#x} overruns atom '{typ}' ({remaining} bytes left)")]
    Overread { typ: FourCC, offset: u64, wanted: u64, remaining: u64 },
    #[error("read at offset {offset:#x} with no open atom")]
    NoOpenAtom { offset: u64 },
    #[error("atom '{typ}' closed with {remaining} bytes unconsumed")]
    Unbalanced { typ: FourCC, remaining: u64 },
    #[error("{what} nested deeper than {limit} levels")]
    TooDeep { what: &'static str, limit: usize },
    #[error("check `{check}` failed at {file}:{line}")]
    Check { check: &'static str, file: &'static str, line: u32 },
    #[error("parameter set export to '{}': {source}", path.display())]
    Export { path: PathBuf, source: io::Error },
    #[error("parameter set of {size} bytes does not fit a {width}-byte length prefix")]
    PrefixOverflow { size: usize, width: u8 },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Forward-only big-endian reader that charges every byte to the innermost
/// open atom.
pub struct AtomReader<R> {
    inner: R,
    offset: u64,
    end: u64,
    stack: Vec<Atom>,
}

impl<R: Read + Seek> AtomReader<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let offset = inner.stream_position()?;
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(offset))?;
        Ok(Self {
            inner,
            offset,
            end,
            stack: Vec::new(),
        })
    }

    /// Number of open atoms.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn current(&self) -> Option<&Atom> {
        self.stack.last()
    }

    pub fn parent(&self) -> Option<&Atom> {
        self.stack.len().checked_sub(2).map(|i| &self.stack[i])
    }

    /// Bytes left in the innermost open atom.
    pub fn remaining(&self) -> u64 {
        self.stack.last().map_or(0, |a| a.remaining)
    }

    /// Open the next atom. At top level `Ok(None)` signals a clean end of
    /// file; nested atoms must fit their parent's remaining budget.
    pub fn open_atom(&mut self) -> Result<Option<Atom>> {
        self.open_bounded(None)
    }

    /// Open a nested atom that must also fit within `limit` bytes.
    pub fn open_atom_within(&mut self, limit: u64) -> Result<Atom> {
        match self.open_bounded(Some(limit))? {
            Some(atom) => Ok(atom),
            None => Err(ParseError::UnexpectedEof { offset: self.offset }),
        }
    }

    fn open_bounded(&mut self, limit: Option<u64>) -> Result<Option<Atom>> {
        let offset = self.offset;
        let top_level = self.stack.is_empty();
        let mut available = match self.stack.last() {
            Some(parent) => parent.remaining,
            None => self.end.saturating_sub(offset),
        };
        if let Some(limit) = limit {
            available = available.min(limit);
        }

        if top_level && available == 0 {
            return Ok(None);
        }
        if self.stack.len() >= MAX_ATOM_DEPTH {
            return Err(ParseError::TooDeep {
                what: "atoms",
                limit: MAX_ATOM_DEPTH,
            });
        }
        if available < 8 {
            return Err(header_overrun(top_level, offset, 8, available));
        }

        let size32 = self.raw(|r| r.read_u32::<BigEndian>())?;
        let mut typ = [0u8; 4];
        self.raw(|r| r.read_exact(&mut typ))?;
        let typ = FourCC(typ);
        self.offset += 8;

        let (size, header_size) = match size32 {
            0 if top_level => (available, 8),
            1 => {
                if available < 16 {
                    return Err(header_overrun(top_level, offset, 16, available));
                }
                let size64 = self.raw(|r| r.read_u64::<BigEndian>())?;
                self.offset += 8;
                (size64, 16)
            }
            n => (n as u64, 8),
        };

        if size < header_size {
            return Err(ParseError::InvalidSize { typ, size, offset });
        }
        if size > available {
            return Err(ParseError::ExceedsParent {
                typ,
                size,
                offset,
                available,
            });
        }

        let atom = Atom {
            typ,
            size,
            header_size,
            offset,
            remaining: size - header_size,
        };
        tracing::debug!(%typ, size, offset, depth = self.stack.len(), "open atom");
        self.stack.push(atom.clone());
        Ok(Some(atom))
    }

    /// Pop the innermost atom and debit its whole size from the parent.
    pub fn close_atom(&mut self) -> Result<Atom> {
        let atom = self
            .stack
            .pop()
            .ok_or(ParseError::NoOpenAtom { offset: self.offset })?;
        if atom.remaining != 0 {
            return Err(ParseError::Unbalanced {
                typ: atom.typ,
                remaining: atom.remaining,
            });
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.remaining -= atom.size;
        }
        Ok(atom)
    }

    fn charge(&mut self, n: u64) -> Result<()> {
        let offset = self.offset;
        let atom = self
            .stack
            .last_mut()
            .ok_or(ParseError::NoOpenAtom { offset })?;
        if n > atom.remaining {
            return Err(ParseError::Overread {
                typ: atom.typ,
                offset,
                wanted: n,
                remaining: atom.remaining,
            });
        }
        atom.remaining -= n;
        self.offset += n;
        Ok(())
    }

    fn raw<T>(&mut self, f: impl FnOnce(&mut R) -> io::Result<T>) -> Result<T> {
        let offset = self.offset;
        f(&mut self.inner).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => ParseError::UnexpectedEof { offset },
            _ => ParseError::Io(e),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.charge(1)?;
        self.raw(|r| r.read_u8())
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.charge(1)?;
        self.raw(|r| r.read_i8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.charge(2)?;
        self.raw(|r| r.read_u16::<BigEndian>())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.charge(2)?;
        self.raw(|r| r.read_i16::<BigEndian>())
    }

    pub fn read_u24(&mut self) -> Result<u32> {
        self.charge(3)?;
        self.raw(|r| r.read_u24::<BigEndian>())
    }

    pub fn read_i24(&mut self) -> Result<i32> {
        self.charge(3)?;
        self.raw(|r| r.read_i24::<BigEndian>())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.charge(4)?;
        self.raw(|r| r.read_u32::<BigEndian>())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.charge(4)?;
        self.raw(|r| r.read_i32::<BigEndian>())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.charge(8)?;
        self.raw(|r| r.read_u64::<BigEndian>())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.charge(8)?;
        self.raw(|r| r.read_i64::<BigEndian>())
    }

    pub fn read_fourcc(&mut self) -> Result<FourCC> {
        self.read_u32().map(FourCC::from_u32)
    }

    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.charge(buf.len() as u64)?;
        self.raw(|r| r.read_exact(buf))
    }

    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut v = vec![0u8; len];
        self.read_bytes(&mut v)?;
        Ok(v)
    }

    pub fn skip(&mut self, n: u64) -> Result<()> {
        self.charge(n)?;
        let delta = i64::try_from(n).map_err(|_| ParseError::InvalidSize {
            typ: self.stack.last().map(|a| a.typ).unwrap_or_default(),
            size: n,
            offset: self.offset,
        })?;
        self.raw(|r| r.seek(SeekFrom::Current(delta)))?;
        Ok(())
    }

    /// Look at the next four bytes without consuming them.
    pub fn peek_u32(&mut self) -> Result<Option<u32>> {
        if self.remaining() < 4 {
            return Ok(None);
        }
        let v = self.raw(|r| r.read_u32::<BigEndian>())?;
        self.raw(|r| r.seek(SeekFrom::Current(-4)))?;
        Ok(Some(v))
    }
}

fn header_overrun(top_level: bool, offset: u64, needed: u64, available: u64) -> ParseError {
    if top_level {
        ParseError::UnexpectedEof { offset }
    } else {
        ParseError::HeaderOverrun {
            offset,
            needed,
            available,
        }
    }
}
