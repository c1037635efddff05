use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn from_u32(v: u32) -> Self {
        FourCC(v.to_be_bytes())
    }

    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 4]
    }

    /// Tags in the `©xxx` namespace carry international text.
    pub fn is_international(&self) -> bool {
        self.0[0] == 0xa9
    }

    /// Printable rendering; `0xA9` shows as `©`, other non-ASCII bytes as `.`.
    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| match c {
                32..=126 => c as char,
                0xa9 => '©',
                _ => '.',
            })
            .collect()
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

/// An open atom on the reader's stack.
#[derive(Debug, Clone)]
pub struct Atom {
    pub typ: FourCC,
    pub size: u64,        // total size including header
    pub header_size: u64, // 8, or 16 for the extended-size form
    pub offset: u64,      // file offset of header start
    pub remaining: u64,   // bytes of this atom not yet consumed
}
