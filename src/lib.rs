/// Fail the current parse with a `ParseError::Check` naming the expression
/// and source location.
macro_rules! check {
    ($cond:expr) => {
        if !($cond) {
            return Err($crate::parser::ParseError::Check {
                check: stringify!($cond),
                file: file!(),
                line: line!(),
            });
        }
    };
}

pub mod api;
pub mod boxes;
pub mod context;
pub mod decoders;
pub mod dumper;
pub mod export;
pub mod known_boxes;
pub mod parser;
pub mod registry;
pub mod util;

pub use api::{AtomSummary, DumpOptions, dump, dump_file};
pub use boxes::{Atom, FourCC};
pub use context::ParseContext;
pub use decoders::MAX_DESCRIPTOR_DEPTH;
pub use dumper::Dumper;
pub use known_boxes::AtomKind;
pub use parser::{AtomReader, MAX_ATOM_DEPTH, ParseError};
pub use registry::{Registry, TypeMatch};
