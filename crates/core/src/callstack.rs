// SPDX-License-Identifier: MIT

//! The reentrant call-stack trace that threads through arbitrary user
//! factory code (spec §3, §4.4). Built only on the failure path: a
//! successful `Get` never touches it.

use crate::id::Tag;
use std::fmt;

/// One frame: the factory being resolved, its tag, and the source
/// location of the `Get` call site that asked for it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub class_name: &'static str,
    pub tag: Tag,
    pub file: &'static str,
    pub line: u32,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tag.is_empty() {
            write!(f, "{}", self.class_name)?;
        } else {
            write!(f, "{}:{}", self.class_name, self.tag)?;
        }
        write!(f, "  --  line:{}  {}", self.line, self.file)
    }
}

/// Ordered sequence of frames, cleared at the start of each Processor
/// invocation (spec §3 "Call-stack frame").
#[derive(Debug, Default, Clone)]
pub struct CallStack(Vec<Frame>);

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn push(&mut self, frame: Frame) {
        self.0.push(frame);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the stack for diagnostics, innermost frame first (the order
    /// frames are pushed as the error unwinds outward), matching
    /// `JEventLoop::PrintCallStack`'s output.
    pub fn render(&self) -> String {
        let mut out = String::from(" Factory Call Stack\n============================\n");
        for frame in &self.0 {
            out.push_str(&format!(" {}\n", frame));
        }
        out.push_str("----------------------------\n");
        out
    }
}

#[cfg(test)]
#[path = "callstack_tests.rs"]
mod tests;
