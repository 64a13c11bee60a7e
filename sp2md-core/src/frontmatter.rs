//! Wiki.js page header.
//!
//! The field order is fixed; the wiki importer reads it positionally.

pub fn build(title: &str, created: &str, author: &str, categories: &[String]) -> String {
    format!(
        "---\ntitle: {title}\ndescription:\npublished: true\ndate: {created}\ntags: {tags}\neditor: {author}\ndateCreated: {created}\n---",
        tags = categories.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_field_in_order() {
        let header = build(
            "Hello",
            "2024-01-02T03:04:05Z",
            "Jane Doe",
            &["News".to_string(), "Updates".to_string()],
        );
        assert_eq!(
            header,
            "---\n\
             title: Hello\n\
             description:\n\
             published: true\n\
             date: 2024-01-02T03:04:05Z\n\
             tags: News, Updates\n\
             editor: Jane Doe\n\
             dateCreated: 2024-01-02T03:04:05Z\n\
             ---"
        );
    }

    #[test]
    fn no_categories_renders_empty_tags() {
        let header = build("t", "c", "a", &[]);
        assert!(header.contains("\ntags: \n"));
    }

    #[test]
    fn empty_fields_render_empty() {
        let header = build("", "", "", &[]);
        assert!(header.contains("\ntitle: \n"));
        assert!(header.contains("\neditor: \n"));
        assert!(header.contains("\ndateCreated: \n---"));
    }
}
