// SPDX-License-Identifier: MIT OR Apache-2.0
//! Call-site and call-stack capture taken once, when an error is constructed.
//!
//! Capture records two things:
//!
//! - the `file:line` of the code that called the public constructor, via
//!   `#[track_caller]`;
//! - up to [`FRAME_CAPACITY`] raw return addresses, starting at that same
//!   caller, via [`backtrace::trace`].
//!
//! Raw addresses are cheap to collect; turning them into function names and
//! source positions is deferred until a trace is actually rendered.

use std::ffi::c_void;
use std::fmt;
use std::panic::Location;

/// Number of program-counter slots reserved by every full capture.
pub const FRAME_CAPACITY: usize = 100;

/// Upper bound on frames belonging to the unwinder and to this module that
/// sit above the constructor's caller.
const MAX_INTERNAL_FRAMES: usize = 32;

/// Location and stack snapshot taken at construction time.
#[derive(Clone, Default)]
pub(crate) struct Capture {
    pub(crate) location: String,
    pub(crate) frames: Frames,
}

impl Capture {
    /// Capture the caller's location and stack.
    ///
    /// `skip` is the number of constructor frames between the user's code and
    /// this call. Public constructors call this directly and pass `1`.
    #[track_caller]
    #[inline(never)]
    pub(crate) fn here(skip: usize) -> Self {
        let caller = Location::caller();
        Self {
            location: format!("{}:{}", caller.file(), caller.line()),
            // `here` itself is one more frame to step over.
            frames: Frames::collect(skip + 1),
        }
    }
}

/// A fixed-capacity sequence of captured return addresses.
///
/// A full capture always holds exactly [`FRAME_CAPACITY`] slots; slots past
/// the end of the real stack are zero. Errors produced by the cheap wrap path
/// hold no slots at all.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Frames {
    pcs: Vec<usize>,
}

impl Frames {
    #[inline(never)]
    fn collect(skip: usize) -> Self {
        let marker = Self::collect as fn(usize) -> Self as usize;
        let mut raw: Vec<(usize, usize)> = Vec::with_capacity(FRAME_CAPACITY + MAX_INTERNAL_FRAMES);
        backtrace::trace(|frame| {
            raw.push((frame.ip() as usize, frame.symbol_address() as usize));
            raw.len() < FRAME_CAPACITY + MAX_INTERNAL_FRAMES
        });

        // Everything up to and including this function's frame belongs to the
        // unwinder. If the marker cannot be found, keep the whole stack.
        let start = raw
            .iter()
            .position(|&(_, symbol)| symbol == marker)
            .map_or(0, |i| i + 1 + skip);

        let mut pcs = vec![0; FRAME_CAPACITY];
        for (slot, &(ip, _)) in pcs.iter_mut().zip(raw.iter().skip(start)) {
            *slot = ip;
        }
        Self { pcs }
    }

    /// The raw captured addresses, including trailing empty slots.
    pub fn program_counters(&self) -> &[usize] {
        &self.pcs
    }

    /// Number of occupied (non-zero) slots.
    pub fn depth(&self) -> usize {
        self.pcs.iter().take_while(|&&pc| pc != 0).count()
    }

    /// Resolve captured addresses into frames, outermost caller last.
    ///
    /// Iteration stops at the first empty slot or the first address that
    /// cannot be symbolised.
    pub fn resolve(&self) -> impl Iterator<Item = StackFrame> + '_ {
        self.pcs.iter().map_while(|&pc| resolve_pc(pc))
    }
}

impl fmt::Debug for Frames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frames")
            .field("capacity", &self.pcs.len())
            .field("depth", &self.depth())
            .finish()
    }
}

/// One symbolised stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Demangled function path without the trailing hash.
    pub function: String,
    /// Source file, or empty when debug info is missing.
    pub file: String,
    /// Source line, or `0` when debug info is missing.
    pub line: u32,
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

fn resolve_pc(pc: usize) -> Option<StackFrame> {
    if pc == 0 {
        return None;
    }
    let mut found = None;
    // Return addresses point just past the call instruction.
    backtrace::resolve((pc - 1) as *mut c_void, |symbol| {
        if found.is_some() {
            return;
        }
        if let Some(name) = symbol.name() {
            found = Some(StackFrame {
                function: format!("{name:#}"),
                file: symbol
                    .filename()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                line: symbol.lineno().unwrap_or(0),
            });
        }
    });
    found
}
