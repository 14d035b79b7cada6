/// Tag keywords the rewrite filters dispatch on. Everything else is `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HtmlName {
    Base,
    Body,
    Head,
    Img,
    Link,
    Noscript,
    Picture,
    Script,
    Source,
    Style,
    Other,
}

impl HtmlName {
    pub fn from_tag(tag: &str) -> Self {
        const KEYWORDS: &[(&str, HtmlName)] = &[
            ("base", HtmlName::Base),
            ("body", HtmlName::Body),
            ("head", HtmlName::Head),
            ("img", HtmlName::Img),
            ("link", HtmlName::Link),
            ("noscript", HtmlName::Noscript),
            ("picture", HtmlName::Picture),
            ("script", HtmlName::Script),
            ("source", HtmlName::Source),
            ("style", HtmlName::Style),
        ];
        KEYWORDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map(|(_, keyword)| *keyword)
            .unwrap_or(HtmlName::Other)
    }

    /// Elements whose text children are serialized verbatim.
    pub fn is_rawtext(self) -> bool {
        matches!(self, HtmlName::Script | HtmlName::Style)
    }
}
