use crate::frontmatter;
use crate::post::PostRecord;

/// One markdown file's worth of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    /// File stem; `.md` is added when written.
    pub filename: String,
    pub content: String,
    /// Set when the title had no usable characters and `filename` is the fallback.
    pub fallback_name: bool,
}

impl ExportDocument {
    /// Builds the document for `post` around an already rewritten body.
    ///
    /// `fallback` names the file when the title has no usable characters.
    pub fn for_post(post: &PostRecord, body: &str, fallback: &str) -> Self {
        let header = frontmatter::build(&post.title, &post.created, &post.author, &post.categories);
        let (filename, fallback_name) = match filename_for(&post.title) {
            name if name.is_empty() => (fallback.to_string(), true),
            name => (name, false),
        };
        ExportDocument {
            filename,
            content: assemble(&header, body),
            fallback_name,
        }
    }
}

pub fn assemble(header: &str, body: &str) -> String {
    format!("{header}\n{body}\n")
}

/// Keeps only `[A-Za-z0-9_]` from the trimmed title.
pub fn filename_for(title: &str) -> String {
    title
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
