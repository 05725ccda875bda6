pub mod file_filter;
pub mod literal_scanner;
pub mod source_walker;

pub use file_filter::FileFilter;
pub use literal_scanner::{
    extract_cases, ExtractedCase, LiteralScanner, MarkerSyntax, ScanOutcome, UnterminatedLiteral,
};
pub use source_walker::{SourceFile, SourceListing, SourceWalker};
