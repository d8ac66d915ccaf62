// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Markdown renderers
//!
//! Each renderer takes one derived-fact structure plus a display name and
//! returns a complete document. Renderers never touch the repository.

mod architecture;
mod changelog;
mod development;
mod summary;

pub use architecture::architecture;
pub use changelog::changelog;
pub use development::development;
pub use summary::summary;

/// Escape characters that would break list items and link syntax
#[must_use]
pub fn escape_md(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Join document lines, ending with a single newline
pub(crate) fn finish(lines: Vec<String>) -> String {
    let mut doc = lines.join("\n");
    doc.push('\n');
    doc
}
