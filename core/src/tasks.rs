//! # Task enumeration
//!
//! The task space is the full cross product of the domain and group lists,
//! produced lazily in domain-major order.

use std::sync::Arc;

use pqprobe_common::error::ConfigError;
use pqprobe_common::scan::{Domain, Group, ScanTask};

#[derive(Clone, Debug)]
pub struct TaskSpace {
    domains: Arc<[Domain]>,
    groups: Arc<[Group]>,
}

impl TaskSpace {
    pub fn new<D, G>(domains: D, groups: G) -> Result<Self, ConfigError>
    where
        D: IntoIterator,
        D::Item: Into<Domain>,
        G: IntoIterator,
        G::Item: Into<Group>,
    {
        let domains: Arc<[Domain]> = domains.into_iter().map(Into::into).collect();
        let groups: Arc<[Group]> = groups.into_iter().map(Into::into).collect();

        if domains.is_empty() {
            return Err(ConfigError::EmptyInput { kind: "domain" });
        }
        if groups.is_empty() {
            return Err(ConfigError::EmptyInput { kind: "group" });
        }

        Ok(Self { domains, groups })
    }

    /// Total number of tasks: `|domains| × |groups|`.
    pub fn len(&self) -> usize {
        self.domains.len() * self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn iter(&self) -> TaskIter {
        TaskIter {
            space: self.clone(),
            next: 0,
        }
    }
}

impl IntoIterator for &TaskSpace {
    type Item = ScanTask;
    type IntoIter = TaskIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy domain-major walk over a [`TaskSpace`].
#[derive(Debug)]
pub struct TaskIter {
    space: TaskSpace,
    next: usize,
}

impl Iterator for TaskIter {
    type Item = ScanTask;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.space.len() {
            return None;
        }

        let width = self.space.groups.len();
        let domain = self.space.domains[self.next / width].clone();
        let group = self.space.groups[self.next % width].clone();
        self.next += 1;

        Some(ScanTask::new(domain, group))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.space.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TaskIter {}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
