// Copyright 2026 the Viewtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree configuration.
//!
//! The check strategy is chosen once, when the tree is created, and applies
//! to every traversal that tree runs.

/// Decides which attached nodes a traversal updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CheckStrategy {
    /// Update a node only when it is dirty or a descendant is dirty.
    ///
    /// A second traversal with no intervening mutation updates nothing.
    #[default]
    OnPush,
    /// Update every attached node the traversal reaches, dirty or not.
    Always,
}

/// Construction-time settings for a [`Tree`](crate::tree::Tree).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    /// Which nodes a traversal updates.
    pub strategy: CheckStrategy,
}

impl TreeConfig {
    /// Returns a config using the given strategy.
    #[must_use]
    pub const fn with_strategy(strategy: CheckStrategy) -> Self {
        Self { strategy }
    }
}
