/// Replacement text with `%{hash}` and `%{id}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTemplate(String);

impl EditTemplate {
    pub const HASH_PLACEHOLDER: &'static str = "%{hash}";
    pub const ID_PLACEHOLDER: &'static str = "%{id}";

    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    #[must_use]
    pub fn render(&self, id: &str, hash: &str) -> String {
        self.0
            .replace(Self::HASH_PLACEHOLDER, hash)
            .replace(Self::ID_PLACEHOLDER, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_both_placeholders() {
        let template = EditTemplate::new("deleted %{id}/%{hash}");
        assert_eq!(template.render("abc123", "deadbeef"), "deleted abc123/deadbeef");
    }

    #[test]
    fn substitutes_every_occurrence() {
        let template = EditTemplate::new("%{id} %{id} %{hash}");
        assert_eq!(template.render("x", "y"), "x x y");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        assert_eq!(EditTemplate::new("[removed]").render("x", "y"), "[removed]");
    }
}
