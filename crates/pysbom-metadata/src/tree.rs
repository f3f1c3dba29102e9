//! Dependency tree display.
//!
//! Formats a linked module list as a human-readable ASCII tree rooted at
//! the first module:
//! ```text
//! myapp v0.1.0
//! ├── flask v3.0.0
//! │   ├── click v8.1.7
//! │   └── werkzeug v3.0.1
//! │       └── markupsafe v2.1.3
//! └── jinja2 v3.1.2
//!     └── markupsafe v2.1.3 (shared)
//! ```
//!
//! Embedded dependency entries are snapshots without their own
//! dependencies, so children are expanded through the full module list.

use std::collections::{HashMap, HashSet};

use crate::error::{MetadataError, Result};
use crate::metadata::NOASSERTION;
use crate::module::Module;

/// Expansion stops below this depth.
const MAX_DEPTH: usize = 64;

/// Format the dependency tree of `modules`, rooted at `modules[0]`.
pub fn format_tree(modules: &[Module]) -> Result<String> {
    let root = modules.first().ok_or(MetadataError::EmptyModuleList {
        operation: "tree formatting",
    })?;

    let index: HashMap<String, &Module> = modules
        .iter()
        .map(|module| (module.name.to_lowercase(), module))
        .collect();

    let mut out = format!("{}\n", label(root));
    let mut state = TreeState {
        index: &index,
        expanded: HashSet::new(),
        path: vec![root.name.to_lowercase()],
        total: 0,
    };

    let count = root.modules.len();
    for (i, dep) in root.modules.values().enumerate() {
        state.format_dep(&mut out, dep, "", i == count - 1);
    }

    // Summary line
    out.push_str(&format!(
        "\n{} dependencies ({} unique)\n",
        state.total,
        state.expanded.len()
    ));

    Ok(out)
}

struct TreeState<'m> {
    index: &'m HashMap<String, &'m Module>,
    /// Lower-cased names whose subtree has been printed.
    expanded: HashSet<String>,
    /// Lower-cased names from the root to the current node.
    path: Vec<String>,
    total: usize,
}

impl TreeState<'_> {
    /// Recursively format a dependency entry.
    fn format_dep(&mut self, out: &mut String, dep: &Module, prefix: &str, is_last: bool) {
        let connector = if is_last { "└── " } else { "├── " };
        let key = dep.name.to_lowercase();
        self.total += 1;

        let marker = if self.path.contains(&key) {
            " (cycle)"
        } else if self.expanded.contains(&key) {
            " (shared)"
        } else if self.path.len() > MAX_DEPTH {
            " (...)"
        } else {
            ""
        };
        out.push_str(&format!("{prefix}{connector}{}{marker}\n", label(dep)));
        if !marker.is_empty() {
            return;
        }
        self.expanded.insert(key.clone());

        // prefer the fully linked module over the embedded snapshot
        let index = self.index;
        let Some(full) = index.get(&key).copied() else {
            return;
        };

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        self.path.push(key);
        let child_count = full.modules.len();
        for (i, child) in full.modules.values().enumerate() {
            self.format_dep(out, child, &child_prefix, i == child_count - 1);
        }
        self.path.pop();
    }
}

fn label(module: &Module) -> String {
    if module.version.is_empty() || module.version == NOASSERTION {
        module.name.clone()
    } else {
        format!("{} v{}", module.name, module.version)
    }
}
