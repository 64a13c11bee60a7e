use crate::contract::{MarkupConverter, RawPost};

/// A post ready for export: every field has been through the markup converter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostRecord {
    pub title: String,
    pub body: String,
    pub author: String,
    pub categories: Vec<String>,
    /// Passed through verbatim into the frontmatter.
    pub created: String,
}

impl PostRecord {
    /// Converts every field of a raw list item, not just the body, so titles
    /// and lookup values carrying entities or inline markup come out as plain
    /// markdown too.
    pub fn from_raw<C>(raw: &RawPost, converter: &C) -> Self
    where
        C: MarkupConverter + ?Sized,
    {
        PostRecord {
            title: converter.convert(&raw.title),
            body: converter.convert(&raw.body),
            author: converter.convert(&raw.author),
            categories: raw
                .categories
                .iter()
                .map(|c| converter.convert(c))
                .collect(),
            created: converter.convert(&raw.created),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MockMarkupConverter;

    #[test]
    fn from_raw_converts_every_field() {
        let mut converter = MockMarkupConverter::new();
        converter
            .expect_convert()
            .times(6)
            .returning(|s| format!("<{s}>"));

        let raw = RawPost {
            title: "T".into(),
            body: "B".into(),
            author: "A".into(),
            categories: vec!["News".into(), "Ops".into()],
            created: "C".into(),
        };
        let post = PostRecord::from_raw(&raw, &converter);

        assert_eq!(post.title, "<T>");
        assert_eq!(post.body, "<B>");
        assert_eq!(post.author, "<A>");
        assert_eq!(post.categories, vec!["<News>", "<Ops>"]);
        assert_eq!(post.created, "<C>");
    }
}
