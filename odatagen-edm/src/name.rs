use std::fmt;

/// A namespace-qualified schema element name, such as `Sales.Customer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Namespace the element is declared in
    pub namespace: String,
    /// Simple name, unique within the namespace
    pub name: String,
}

impl QualifiedName {
    /// Create a new qualified name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Split a dotted name at its last dot.
    ///
    /// Returns `None` when there is no namespace part.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (namespace, name) = qualified.rsplit_once('.')?;
        if namespace.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(namespace, name))
    }

    /// Whether this name lives in `namespace`.
    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace == namespace
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_at_last_dot() {
        let name = QualifiedName::parse("Microsoft.Dynamics.Order").unwrap();
        assert_eq!(name.namespace, "Microsoft.Dynamics");
        assert_eq!(name.name, "Order");
        assert_eq!(name.to_string(), "Microsoft.Dynamics.Order");
    }

    #[test]
    fn test_parse_rejects_unqualified() {
        assert!(QualifiedName::parse("Order").is_none());
        assert!(QualifiedName::parse(".Order").is_none());
        assert!(QualifiedName::parse("Sales.").is_none());
    }
}
