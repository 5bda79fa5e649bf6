//! Image container markup construction.
//!
//! An `ImageBlock` is the opaque serialized fragment that travels inside
//! note text and inside the rendered tree: a non-editable wrapper, the
//! image itself, and the resize handle. The markup shape is load-bearing -
//! the placeholder protector matches on the `image-container` class and
//! balances the nested handle `<div>`.

/// One embedded image plus its resize-container wrapper, serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock(String);

impl ImageBlock {
    /// Build the container fragment around an image data URL.
    pub fn for_data_url(data_url: &str) -> Self {
        let markup = format!(
            concat!(
                r#"<div class="image-container" contenteditable="false" "#,
                r#"style="position: relative; display: inline-block; max-width: 100%; margin: 10px 0;">"#,
                r#"<img src="{}" class="inserted-image resizable" "#,
                r#"style="width: auto; max-width: 100%; height: auto; display: block;" draggable="false">"#,
                r#"<div class="resize-handle"></div>"#,
                r#"</div>"#
            ),
            data_url
        );
        ImageBlock(markup)
    }

    /// Wrap an already-serialized fragment (a container loaded back from
    /// persisted note text).
    pub fn from_markup(markup: impl Into<String>) -> Self {
        ImageBlock(markup.into())
    }

    pub fn markup(&self) -> &str {
        &self.0
    }

    pub fn into_markup(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memo_editor_core::protect;

    #[test]
    fn test_container_shape() {
        let block = ImageBlock::for_data_url("data:image/png;base64,AAAA");
        let markup = block.markup();
        assert!(markup.starts_with(r#"<div class="image-container""#));
        assert!(markup.contains(r#"contenteditable="false""#));
        assert!(markup.contains(r#"class="inserted-image resizable""#));
        assert!(markup.contains(r#"class="resize-handle""#));
        assert!(markup.ends_with("</div>"));
    }

    #[test]
    fn test_container_is_protectable() {
        // The protector must treat a freshly built container as one
        // balanced fragment despite the nested handle div.
        let block = ImageBlock::for_data_url("data:image/png;base64,AAAA");
        let text = format!("a\n{}\nb", block.markup());
        let protected = protect(&text);
        assert_eq!(protected.fragments, vec![block.markup().to_owned()]);
    }
}
