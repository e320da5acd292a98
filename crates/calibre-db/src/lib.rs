//! Incremental queries over [`File`] inputs.

pub use calibre_errors::Diagnostic;
use calibre_inputs::File;
use calibre_parse::Parse;

#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {}

pub trait FileParse {
    fn parse(self, db: &dyn salsa::Database) -> &Parse;
}

#[salsa::tracked]
impl FileParse for File {
    #[salsa::tracked(returns(ref), no_eq)]
    fn parse(self, db: &dyn salsa::Database) -> Parse {
        let _span = tracing::debug_span!("parse_file", path = %self.path(db)).entered();
        calibre_parse::parse(self.text(db))
    }
}

/// Every diagnostic for `file`, ordered by position.
#[salsa::tracked(returns(ref), no_eq)]
pub fn check_file(db: &dyn salsa::Database, file: File) -> Vec<Diagnostic> {
    let diagnostics = file.parse(db).errors().to_owned();
    tracing::debug!(path = %file.path(db), count = diagnostics.len(), "checked file");
    diagnostics
}
