use std::fmt;
use std::sync::Arc;

/// A fully-qualified host name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Domain(Arc<str>);

/// A TLS key-exchange group identifier (classical, post-quantum or hybrid).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Group(Arc<str>);

macro_rules! opaque_name {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<Arc<str>>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

opaque_name!(Domain);
opaque_name!(Group);

/// One unit of work: probe `domain` offering only `group`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScanTask {
    pub domain: Domain,
    pub group: Group,
}

impl ScanTask {
    pub fn new(domain: Domain, group: Group) -> Self {
        Self { domain, group }
    }
}

impl fmt::Display for ScanTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.domain, self.group)
    }
}
