//! Error-tolerant parser producing a lossless concrete syntax tree.
//!
//! [`parse`] never fails: malformed input yields `ERROR` nodes plus
//! diagnostics, and the tree always reproduces the source text exactly.

use std::sync::atomic::AtomicBool;

pub use calibre_errors::Diagnostic;
pub use calibre_tokenizer::{Token, TokenFlags};
pub use calibre_yellow::{Field, SyntaxKind, SyntaxNode, SyntaxToken, SyntaxTree, ast};

mod grammar;
mod parser;
pub mod precedence;
#[cfg(test)]
mod tests;

/// Returned by [`parse_cancellable`] when the flag was raised mid-parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("parsing was cancelled")]
pub struct Cancelled;

/// A syntax tree together with every lexical and syntax error found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    tree: SyntaxTree,
    errors: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    pub fn source_file(&self) -> ast::SourceFile<'_> {
        use ast::AstNode as _;

        // The grammar always produces a `SOURCE_FILE` root.
        ast::SourceFile::cast(self.root()).unwrap_or_else(|| unreachable!())
    }

    /// Diagnostics sorted by start offset.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Tree dump followed by one indented line per error.
    pub fn debug_dump(&self) -> String {
        let errors =
            self.errors.iter().map(|error| format!("  {}", error.message())).collect::<Vec<_>>();
        format!("{}\nErrors:\n{}", self.tree.debug_dump(), errors.join("\n"))
    }
}

/// Parses a complete source file.
#[tracing::instrument(level = "debug", skip_all, fields(source_len = text.len()))]
pub fn parse(text: &str) -> Parse {
    parse_with(text, None).unwrap_or_else(|Cancelled| unreachable!("no cancellation flag"))
}

/// Like [`parse`], but gives up with [`Cancelled`] once `cancelled` is set.
/// The flag is checked between top-level statements.
#[tracing::instrument(level = "debug", skip_all, fields(source_len = text.len()))]
pub fn parse_cancellable(text: &str, cancelled: &AtomicBool) -> Result<Parse, Cancelled> {
    parse_with(text, Some(cancelled))
}

fn parse_with(text: &str, cancelled: Option<&AtomicBool>) -> Result<Parse, Cancelled> {
    let mut parser = parser::Parser::new(text, cancelled);
    let statements = grammar::items::source_file(&mut parser)?;
    let (tree, errors) = parser.finish();
    tracing::debug!(statements, errors = errors.len(), "parsed source file");
    Ok(Parse { tree, errors })
}

/// Scans `text` into tokens, trivia excluded, ending with `EOF`.
#[tracing::instrument(level = "debug", skip_all, fields(source_len = text.len()))]
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let (tokens, errors) = calibre_tokenizer::tokenize(text);
    let errors = errors.iter().map(|error| Diagnostic::error(&error.message, error.range)).collect();
    (tokens, errors)
}
