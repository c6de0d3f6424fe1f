/// Enumerated processing contexts.
/// Stacked by design-file importers and exporters, and reported upon failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
    /// Design (Library), by name
    Design(String),
    /// Cell, by name
    Cell(String),
    /// Reference, by index within its parent and target name
    Reference(usize, String),
    /// Polygon element, by index within its cell
    Element(usize),
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Design(name) => write!(f, "design `{}`", name),
            Self::Cell(name) => write!(f, "cell `{}`", name),
            Self::Reference(idx, name) => write!(f, "reference #{} (to `{}`)", idx, name),
            Self::Element(idx) => write!(f, "element #{}", idx),
        }
    }
}
