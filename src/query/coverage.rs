//! Coverage references
//!
//! A [`Coverage`] names one or more remote coverages and binds them to a
//! symbolic iteration variable (`$i1`, `$i2`, ...). Variable names come from
//! a [`VariableAllocator`]: one process-wide allocator backs
//! [`Coverage::named`], and callers that need deterministic names (tests,
//! isolated query batches) own their own allocator.

use crate::query::axis::AxisSubset;
use crate::query::error::{QueryError, QueryResult};
use std::sync::atomic::{AtomicU64, Ordering};

static GLOBAL_VARIABLES: VariableAllocator = VariableAllocator::new();

/// Hands out unique iteration variable names
///
/// The counter is atomic, so an allocator can be shared between threads
/// without ever producing the same name twice.
#[derive(Debug)]
pub struct VariableAllocator {
    next: AtomicU64,
}

impl VariableAllocator {
    /// Create an allocator whose first variable is `$i1`
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create an allocator whose first variable is `$i<first>`
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The process-wide allocator
    pub fn global() -> &'static VariableAllocator {
        &GLOBAL_VARIABLES
    }

    /// Allocate the next variable name
    pub fn next_variable(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("$i{}", n)
    }

    /// Create a coverage bound to a fresh variable from this allocator
    pub fn coverage(&self, names: impl Into<CoverageNames>) -> QueryResult<Coverage> {
        Coverage::new(self, names)
    }
}

impl Default for VariableAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// One or more coverage names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageNames(Vec<String>);

impl CoverageNames {
    fn validate(self) -> QueryResult<Vec<String>> {
        if self.0.is_empty() || self.0.iter().any(|n| n.trim().is_empty()) {
            return Err(QueryError::NoCoverage);
        }
        Ok(self.0)
    }
}

impl From<&str> for CoverageNames {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for CoverageNames {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<Vec<String>> for CoverageNames {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<Vec<&str>> for CoverageNames {
    fn from(names: Vec<&str>) -> Self {
        Self(names.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for CoverageNames {
    fn from(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

/// A reference to named coverages on the remote service
///
/// Without a subset the whole coverage is addressed.
#[derive(Debug, Clone, PartialEq)]
pub struct Coverage {
    names: Vec<String>,
    variable: String,
    subset: Option<Vec<AxisSubset>>,
}

impl Coverage {
    /// Create a coverage reference with a variable from `allocator`
    pub fn new(allocator: &VariableAllocator, names: impl Into<CoverageNames>) -> QueryResult<Self> {
        let names = names.into().validate()?;
        Ok(Self {
            names,
            variable: allocator.next_variable(),
            subset: None,
        })
    }

    /// Create a coverage reference with a variable from the process-wide allocator
    pub fn named(names: impl Into<CoverageNames>) -> QueryResult<Self> {
        Self::new(VariableAllocator::global(), names)
    }

    /// Iteration variable bound to this coverage
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Override the iteration variable
    pub fn set_variable(&mut self, variable: impl Into<String>) {
        self.variable = variable.into();
    }

    /// Coverage names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Coverage names as they appear in the iteration clause
    pub fn used_coverage(&self) -> String {
        self.names.join(", ")
    }

    /// Replace the coverage names
    pub fn set_names(&mut self, names: impl Into<CoverageNames>) -> QueryResult<()> {
        self.names = names.into().validate()?;
        Ok(())
    }

    /// Restrict the coverage to the given axes, in order
    pub fn set_subset(&mut self, axes: Vec<AxisSubset>) -> QueryResult<()> {
        if axes.is_empty() {
            return Err(QueryError::EmptySubset);
        }
        self.subset = Some(axes);
        Ok(())
    }

    /// Builder form of [`Coverage::set_subset`]
    pub fn with_subset(mut self, axes: Vec<AxisSubset>) -> QueryResult<Self> {
        self.set_subset(axes)?;
        Ok(self)
    }

    /// Drop the subset, addressing the whole coverage again
    pub fn clear_subset(&mut self) {
        self.subset = None;
    }

    /// Current subset, if any
    pub fn subset(&self) -> Option<&[AxisSubset]> {
        self.subset.as_deref()
    }
}
